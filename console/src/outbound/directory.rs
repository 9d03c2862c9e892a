//! In-memory user directory simulating the backend collection.
//!
//! The platform has no real users endpoint yet; this adapter stands in for
//! one behind the [`UserDirectory`] port, so the store and the views are
//! already written against the eventual CRUD contract.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use rand::RngCore;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::user::{EmailAddress, User, UserDraft, UserRole, UserUpdate};

/// Simulated user collection with newest-first ordering.
///
/// # Examples
/// ```
/// use console::InMemoryUserDirectory;
///
/// let directory = InMemoryUserDirectory::seeded();
/// ```
pub struct InMemoryUserDirectory {
    users: Mutex<Vec<User>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserDirectory {
    /// Empty directory on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Empty directory on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Directory pre-populated with the demo accounts.
    pub fn seeded() -> Self {
        Self::seeded_with_clock(Arc::new(DefaultClock))
    }

    /// Seeded directory on an injected clock.
    pub fn seeded_with_clock(clock: Arc<dyn Clock>) -> Self {
        let directory = Self::with_clock(clock);
        let now = directory.clock.utc();
        let demo = vec![
            demo_user("u_admin", "Admin Demo", "admin@example.com", UserRole::Admin, true, now),
            demo_user("u_editor", "Editor Demo", "editor@example.com", UserRole::Editor, true, now),
            demo_user("u_viewer", "Viewer Demo", "viewer@example.com", UserRole::Viewer, false, now),
        ];
        if let Ok(mut users) = directory.users.lock() {
            *users = demo;
        }
        directory
    }

    fn lock_users(&self) -> Result<std::sync::MutexGuard<'_, Vec<User>>, UserDirectoryError> {
        self.users
            .lock()
            .map_err(|_| UserDirectoryError::backend("user collection lock poisoned"))
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

fn demo_user(
    id: &str,
    name: &str,
    email: &str,
    role: UserRole,
    is_active: bool,
    now: chrono::DateTime<chrono::Utc>,
) -> User {
    User {
        id: id.to_owned(),
        name: name.to_owned(),
        email: EmailAddress::new(email)
            .unwrap_or_else(|err| panic!("demo email must satisfy validation: {err}")),
        role,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

fn generate_user_id() -> String {
    let mut bytes = [0u8; 4];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("usr_{}", hex::encode(bytes))
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list(&self, search: Option<String>) -> Result<Vec<User>, UserDirectoryError> {
        let users = self.lock_users()?;
        let needle = search.unwrap_or_default().trim().to_lowercase();
        if needle.is_empty() {
            return Ok(users.clone());
        }
        Ok(users
            .iter()
            .filter(|user| {
                user.name.to_lowercase().contains(&needle)
                    || user.email.as_str().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, UserDirectoryError> {
        let now = self.clock.utc();
        let user = User {
            id: generate_user_id(),
            name: draft.name.trim().to_owned(),
            email: draft.email.clone(),
            role: draft.role,
            is_active: draft.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        let mut users = self.lock_users()?;
        users.insert(0, user.clone());
        Ok(user)
    }

    async fn update(&self, id: &str, update: &UserUpdate) -> Result<User, UserDirectoryError> {
        let now = self.clock.utc();
        let mut users = self.lock_users()?;
        let Some(existing) = users.iter_mut().find(|user| user.id == id) else {
            return Err(UserDirectoryError::not_found(id));
        };
        let updated = update.apply(existing, now);
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), UserDirectoryError> {
        let mut users = self.lock_users()?;
        users.retain(|user| user.id != id);
        Ok(())
    }
}
