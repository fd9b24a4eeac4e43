use crate::storage::models::user_models::SessionUser;
use crate::storage::{LocalStore, SESSION_KEY};
use anyhow::Result;
use std::sync::Arc;

/// Current-session repository over the local store.
/// At most one session record exists at a time.
#[derive(Clone)]
pub struct SessionsRepository {
    store: Arc<LocalStore>,
}

impl SessionsRepository {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub async fn current(&self) -> Result<Option<SessionUser>> {
        self.store.get(SESSION_KEY).await
    }

    pub async fn set(&self, user: &SessionUser) -> Result<()> {
        self.store.put(SESSION_KEY, user).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(SESSION_KEY).await
    }
}
