//! Users store: observable CRUD state over a user directory.
//!
//! Structurally a sibling of the payments store: watch-published snapshots,
//! one in-flight flag per operation class, failures as `None`/`false` plus a
//! displayable error. `is_saving` is shared by create, update, and delete;
//! `is_loading` belongs to list refreshes alone.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::user::{User, UserDraft, UserUpdate};

/// Snapshot of the users view state.
#[derive(Debug, Clone, Default)]
pub struct UsersState {
    /// Known users, newest first.
    pub users: Vec<User>,
    /// A list refresh is in flight.
    pub is_loading: bool,
    /// A create, update, or delete is in flight.
    pub is_saving: bool,
    /// Displayable failure from the most recent operation, if any.
    pub error: Option<String>,
}

/// Store owning the demo-user collection for the console.
pub struct UsersStore<D> {
    directory: Arc<D>,
    state: Arc<watch::Sender<UsersState>>,
}

impl<D> UsersStore<D> {
    /// Store over the given directory, starting empty.
    pub fn new(directory: Arc<D>) -> Self {
        let (state, _) = watch::channel(UsersState::default());
        Self {
            directory,
            state: Arc::new(state),
        }
    }

    /// Receiver observing every state change.
    pub fn subscribe(&self) -> watch::Receiver<UsersState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> UsersState {
        self.state.borrow().clone()
    }

    /// Look up a user by id.
    pub fn user_by_id(&self, id: &str) -> Option<User> {
        self.state
            .borrow()
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Clear the error slot; in-flight flags are untouched.
    pub fn clear_error(&self) {
        self.state.send_modify(|state| state.error = None);
    }
}

impl<D> Clone for UsersStore<D> {
    fn clone(&self) -> Self {
        Self {
            directory: Arc::clone(&self.directory),
            state: Arc::clone(&self.state),
        }
    }
}

impl<D: UserDirectory> UsersStore<D> {
    /// Reload the collection, optionally narrowed by a search string.
    pub async fn load_users(&self, search: Option<&str>) {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        match self.directory.list(search.map(str::to_owned)).await {
            Ok(users) => {
                self.state.send_modify(|state| {
                    state.users = users;
                    state.is_loading = false;
                });
            }
            Err(error) => {
                warn!(error = %error, "load users failed");
                self.state.send_modify(|state| {
                    state.error = Some(error.to_string());
                    state.is_loading = false;
                });
            }
        }
    }

    /// Create a user and prepend it to the collection.
    pub async fn add_user(&self, draft: UserDraft) -> Option<User> {
        self.state.send_modify(|state| {
            state.is_saving = true;
            state.error = None;
        });

        match self.directory.create(&draft).await {
            Ok(user) => {
                self.state.send_modify(|state| {
                    state.users.insert(0, user.clone());
                    state.is_saving = false;
                });
                Some(user)
            }
            Err(error) => {
                warn!(error = %error, "add user failed");
                self.record_failure(&error);
                None
            }
        }
    }

    /// Merge a partial update over a user and reconcile the result.
    ///
    /// The updated entity replaces its entry in place, or is prepended when
    /// the local collection does not know it.
    pub async fn update_user(&self, id: &str, update: UserUpdate) -> Option<User> {
        self.state.send_modify(|state| {
            state.is_saving = true;
            state.error = None;
        });

        match self.directory.update(id, &update).await {
            Ok(updated) => {
                self.state.send_modify(|state| {
                    match state.users.iter_mut().find(|user| user.id == updated.id) {
                        Some(existing) => *existing = updated.clone(),
                        None => state.users.insert(0, updated.clone()),
                    }
                    state.is_saving = false;
                });
                Some(updated)
            }
            Err(error) => {
                warn!(error = %error, "update user failed");
                self.record_failure(&error);
                None
            }
        }
    }

    /// Delete a user remotely, then drop it from the local collection.
    ///
    /// On failure the collection is left untouched and `false` is returned.
    pub async fn remove_user(&self, id: &str) -> bool {
        self.state.send_modify(|state| {
            state.is_saving = true;
            state.error = None;
        });

        match self.directory.delete(id).await {
            Ok(()) => {
                self.state.send_modify(|state| {
                    state.users.retain(|user| user.id != id);
                    state.is_saving = false;
                });
                true
            }
            Err(error) => {
                warn!(error = %error, "remove user failed");
                self.record_failure(&error);
                false
            }
        }
    }

    fn record_failure(&self, error: &UserDirectoryError) {
        self.state.send_modify(|state| {
            state.error = Some(error.to_string());
            state.is_saving = false;
        });
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
