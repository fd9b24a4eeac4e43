use crate::config::SecurityConfig;
use crate::error::Error;
use crate::security::{password, SecurityService};
use crate::storage::models::user_models::{
    AuthToken, LoginCredentials, SessionUser, User, UserRole,
};
use crate::storage::repositories::sessions::SessionsRepository;
use crate::storage::repositories::users::UsersRepository;
use crate::storage::LocalStore;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Authentication service gating protected views and user management
pub struct AuthService {
    users_repo: UsersRepository,
    sessions_repo: SessionsRepository,
    security: SecurityService,
    config: SecurityConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: Arc<LocalStore>, config: &SecurityConfig) -> Self {
        Self {
            users_repo: UsersRepository::new(store.clone()),
            sessions_repo: SessionsRepository::new(store),
            security: SecurityService::new(config.clone()),
            config: config.clone(),
        }
    }

    /// Seed the default administrator when no user set exists yet
    pub async fn ensure_default_admin(&self) -> Result<()> {
        if self.users_repo.count().await? > 0 {
            return Ok(());
        }

        let password_hash = password::hash_password(&self.config.default_admin_password, &self.config)?;
        let admin = User {
            id: Uuid::new_v4(),
            email: self.config.default_admin_email.clone(),
            password_hash,
            role: UserRole::Admin,
            created_at: Utc::now(),
        };

        self.users_repo.create(&admin).await?;
        info!("Seeded default administrator: {}", admin.email);

        Ok(())
    }

    /// Login with email/password. On success the session record (without
    /// credential material) is persisted and a bearer token returned.
    /// Failures carry no further detail.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(SessionUser, AuthToken)> {
        let user = self
            .users_repo
            .get_by_email(&credentials.email)
            .await?
            .ok_or_else(|| Error::Authentication("Invalid email or password".to_string()))?;

        let valid = password::verify_password(&credentials.password, &user.password_hash)?;
        if !valid {
            return Err(Error::Authentication("Invalid email or password".to_string()).into());
        }

        let session = SessionUser::from(&user);
        self.sessions_repo.set(&session).await?;

        let token = self.security.generate_token(&session)?;

        info!("User logged in: {}", user.email);

        Ok((session, token))
    }

    /// Clear the persisted session
    pub async fn logout(&self) -> Result<()> {
        self.sessions_repo.clear().await
    }

    /// The persisted session record, if any
    pub async fn current_session(&self) -> Result<Option<SessionUser>> {
        self.sessions_repo.current().await
    }

    /// Add a user. Admin-only; duplicate emails are rejected without
    /// mutation.
    pub async fn add_user(
        &self,
        caller: &SessionUser,
        email: &str,
        password_plain: &str,
        role: UserRole,
    ) -> Result<User> {
        if caller.role != UserRole::Admin {
            return Err(Error::Authorization("Only admins can add users".to_string()).into());
        }

        if self.users_repo.get_by_email(email).await?.is_some() {
            return Err(Error::AlreadyExists("Email already exists".to_string()).into());
        }

        let password_hash = password::hash_password(password_plain, &self.config)?;
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        };

        let created = self.users_repo.create(&user).await?;

        info!("New user added: {}", email);

        Ok(created)
    }

    /// Remove a user. Admin-only and never against the caller's own id.
    pub async fn remove_user(&self, caller: &SessionUser, user_id: &Uuid) -> Result<()> {
        if caller.role != UserRole::Admin {
            return Err(Error::Authorization("Only admins can remove users".to_string()).into());
        }

        if *user_id == caller.id {
            return Err(Error::Validation("Cannot remove own account".to_string()).into());
        }

        let removed = self.users_repo.delete(user_id).await?;
        if !removed {
            return Err(Error::NotFound(format!("User not found: {}", user_id)).into());
        }

        info!("User removed: {}", user_id);

        Ok(())
    }

    /// All users, stripped of credential material
    pub async fn list_users(&self) -> Result<Vec<SessionUser>> {
        let users = self.users_repo.get_all().await?;
        Ok(users.iter().map(SessionUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            password_hash_cost: 4,
            ..SecurityConfig::default()
        }
    }

    async fn service() -> (tempfile::TempDir, AuthService) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            LocalStore::open(&StorageConfig {
                data_file: dir.path().join("store.json"),
            })
            .unwrap(),
        );
        let auth = AuthService::new(store, &fast_config());
        auth.ensure_default_admin().await.unwrap();
        (dir, auth)
    }

    async fn admin_session(auth: &AuthService) -> SessionUser {
        auth.login(&LoginCredentials {
            email: "admin@v2x.com".to_string(),
            password: "admin123".to_string(),
        })
        .await
        .unwrap()
        .0
    }

    #[tokio::test]
    async fn seeded_admin_can_login() {
        let (_dir, auth) = service().await;

        let (session, token) = auth
            .login(&LoginCredentials {
                email: "admin@v2x.com".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(session.role, UserRole::Admin);
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(auth.current_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn wrong_password_declines() {
        let (_dir, auth) = service().await;

        let result = auth
            .login(&LoginCredentials {
                email: "admin@v2x.com".to_string(),
                password: "admin1234".to_string(),
            })
            .await;

        assert!(result.is_err());
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let (_dir, auth) = service().await;
        auth.ensure_default_admin().await.unwrap();
        assert_eq!(auth.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn logout_clears_the_session() {
        let (_dir, auth) = service().await;
        admin_session(&auth).await;

        auth.logout().await.unwrap();
        assert!(auth.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_can_add_user() {
        let (_dir, auth) = service().await;
        let admin = admin_session(&auth).await;

        let before = auth.list_users().await.unwrap().len();
        auth.add_user(&admin, "a@x.com", "pw", UserRole::Operator)
            .await
            .unwrap();
        assert_eq!(auth.list_users().await.unwrap().len(), before + 1);

        // and the new user can log in
        let (session, _) = auth
            .login(&LoginCredentials {
                email: "a@x.com".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.role, UserRole::Operator);
    }

    #[tokio::test]
    async fn non_admin_cannot_add_user() {
        let (_dir, auth) = service().await;
        let admin = admin_session(&auth).await;
        let operator = SessionUser::from(
            &auth
                .add_user(&admin, "ops@x.com", "pw", UserRole::Operator)
                .await
                .unwrap(),
        );

        let before = auth.list_users().await.unwrap().len();
        let result = auth
            .add_user(&operator, "a@x.com", "pw", UserRole::Operator)
            .await;

        assert!(result.is_err());
        assert_eq!(auth.list_users().await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let (_dir, auth) = service().await;
        let admin = admin_session(&auth).await;

        let before = auth.list_users().await.unwrap().len();
        let result = auth
            .add_user(&admin, "admin@v2x.com", "pw", UserRole::Operator)
            .await;

        assert!(result.is_err());
        assert_eq!(auth.list_users().await.unwrap().len(), before);
    }

    #[tokio::test]
    async fn admin_cannot_remove_self() {
        let (_dir, auth) = service().await;
        let admin = admin_session(&auth).await;

        let result = auth.remove_user(&admin, &admin.id).await;

        assert!(result.is_err());
        assert_eq!(auth.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn admin_can_remove_other_user() {
        let (_dir, auth) = service().await;
        let admin = admin_session(&auth).await;
        let user = auth
            .add_user(&admin, "a@x.com", "pw", UserRole::Operator)
            .await
            .unwrap();

        auth.remove_user(&admin, &user.id).await.unwrap();
        assert_eq!(auth.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_never_exposes_credentials() {
        let (_dir, auth) = service().await;
        let users = auth.list_users().await.unwrap();
        let encoded = serde_json::to_string(&users).unwrap();
        assert!(!encoded.contains("password"));
    }
}
