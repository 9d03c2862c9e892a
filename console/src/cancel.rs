//! Cooperative cancellation tokens.
//!
//! [`CancelToken`] is a cloneable handle over a watch flag. Tokens can be
//! derived from one or more parents with [`CancelToken::linked`]; a derived
//! token observes the first parent to cancel, while cancelling the child
//! never propagates upward. The transport combines a caller's token with its
//! own timeout so that whichever fires first decides the outcome.

use std::sync::Arc;

use futures_util::future::{BoxFuture, select_all};
use tokio::sync::watch;

/// Cloneable cancellation handle; clones observe the same flag.
#[derive(Debug, Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
    parents: Arc<[CancelToken]>,
}

impl CancelToken {
    /// Fresh, uncancelled token with no parents.
    pub fn new() -> Self {
        Self::linked(Vec::new())
    }

    /// Token cancelled as soon as it or any of `parents` is cancelled.
    pub fn linked(parents: impl IntoIterator<Item = CancelToken>) -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
            parents: parents.into_iter().collect::<Vec<_>>().into(),
        }
    }

    /// Token derived from this one alone.
    pub fn child(&self) -> Self {
        Self::linked([self.clone()])
    }

    /// Raise the flag; idempotent.
    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    /// Whether this token or any parent has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow() || self.parents.iter().any(Self::is_cancelled)
    }

    /// Completes once this token or any parent is cancelled.
    ///
    /// Returns immediately when already cancelled; otherwise waits on every
    /// flag in the parent chain and resolves with the first one raised.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        let mut receivers = Vec::new();
        self.collect_receivers(&mut receivers);
        let waits: Vec<BoxFuture<'static, ()>> = receivers
            .into_iter()
            .map(|receiver| Box::pin(wait_raised(receiver)) as BoxFuture<'static, ()>)
            .collect();
        let _ = select_all(waits).await;
    }

    fn collect_receivers(&self, sinks: &mut Vec<watch::Receiver<bool>>) {
        sinks.push(self.flag.subscribe());
        for parent in self.parents.iter() {
            parent.collect_receivers(sinks);
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

async fn wait_raised(mut receiver: watch::Receiver<bool>) {
    // The sender half outlives the receiver while its token is alive; a
    // closed channel means that token can no longer cancel, so park forever
    // and let a sibling flag win the select.
    if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
