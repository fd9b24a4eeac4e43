use crate::error::Error;
use crate::storage::models::user_models::User;
use crate::storage::{LocalStore, USERS_KEY};
use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Users repository over the local store
#[derive(Clone)]
pub struct UsersRepository {
    store: Arc<LocalStore>,
}

impl UsersRepository {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    async fn load(&self) -> Result<Vec<User>> {
        Ok(self.store.get(USERS_KEY).await?.unwrap_or_default())
    }

    async fn save(&self, users: &[User]) -> Result<()> {
        self.store.put(USERS_KEY, &users).await
    }

    /// Append a new user record
    pub async fn create(&self, user: &User) -> Result<User> {
        info!("Creating new user: {}", user.email);

        let mut users = self.load().await?;
        if users.iter().any(|u| u.id == user.id) {
            return Err(Error::AlreadyExists(format!("User id {}", user.id)).into());
        }
        users.push(user.clone());
        self.save(&users).await?;

        Ok(user.clone())
    }

    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.id == *id))
    }

    /// Exact, case-sensitive email match
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.load().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    pub async fn get_all(&self) -> Result<Vec<User>> {
        self.load().await
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.load().await?.len())
    }

    /// Delete by id; returns whether a record was removed
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let mut users = self.load().await?;
        let before = users.len();
        users.retain(|u| u.id != *id);

        if users.len() == before {
            return Ok(false);
        }

        self.save(&users).await?;
        Ok(true)
    }
}
