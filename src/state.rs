use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::database::Repository;

/// Shared by every worker through `web::Data`
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    /// bcrypt work factor for new password hashes
    pub password_cost: u32,
    snapshot_lock: Mutex<()>,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, password_cost: u32) -> Self {
        Self {
            repo,
            password_cost,
            snapshot_lock: Mutex::new(()),
        }
    }

    /// Exclusive access to the studentInfo delete-then-insert sequence.
    /// Held across both awaits so two replacements never interleave.
    pub async fn lock_snapshots(&self) -> MutexGuard<'_, ()> {
        self.snapshot_lock.lock().await
    }
}
