use crate::config::SecurityConfig;
use crate::error::Error;
use crate::storage::models::user_models::{AuthToken, SessionUser, UserRole};
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth;
pub mod password;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Get the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    pub fn user_role(&self) -> Option<UserRole> {
        match self.role.as_str() {
            "admin" => Some(UserRole::Admin),
            "operator" => Some(UserRole::Operator),
            _ => None,
        }
    }

    /// Session projection of the claims
    pub fn session_user(&self) -> Result<SessionUser> {
        Ok(SessionUser {
            id: self
                .user_id()
                .map_err(|e| Error::Authentication(format!("Invalid user ID in token: {}", e)))?,
            email: self.email.clone(),
            role: self
                .user_role()
                .ok_or_else(|| Error::Authentication("Unknown role in token".to_string()))?,
        })
    }
}

/// Security service for handling authentication and authorization
pub struct SecurityService {
    config: SecurityConfig,
}

impl SecurityService {
    /// Create a new security service
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user: &SessionUser) -> Result<AuthToken> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.jwt_expiration_minutes as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: match user.role {
                UserRole::Admin => "admin".to_string(),
                UserRole::Operator => "operator".to_string(),
            },
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Authentication(format!("Failed to generate JWT token: {}", e)))?;

        Ok(AuthToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_minutes * 60,
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::Authentication(format!("Invalid token: {}", e)))?;

        Ok(token_data)
    }

    /// Check if the claims carry the required role. Admins may do anything
    /// an operator can.
    pub fn has_role(&self, claims: &Claims, required_role: UserRole) -> bool {
        let user_role = match claims.user_role() {
            Some(role) => role,
            None => return false,
        };

        match required_role {
            UserRole::Admin => user_role == UserRole::Admin,
            UserRole::Operator => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SecurityService {
        SecurityService::new(SecurityConfig::default())
    }

    fn session(role: UserRole) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            email: "ops@v2x.com".to_string(),
            role,
        }
    }

    #[test]
    fn tokens_round_trip() {
        let service = service();
        let user = session(UserRole::Operator);

        let token = service.generate_token(&user).unwrap();
        assert_eq!(token.token_type, "Bearer");

        let data = service.validate_token(&token.access_token).unwrap();
        assert_eq!(data.claims.email, user.email);
        assert_eq!(data.claims.session_user().unwrap(), user);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let service = service();
        let token = service
            .generate_token(&session(UserRole::Admin))
            .unwrap();
        let mut tampered = token.access_token;
        tampered.push('x');
        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn role_hierarchy_admin_covers_operator() {
        let service = service();

        let admin = service
            .validate_token(
                &service
                    .generate_token(&session(UserRole::Admin))
                    .unwrap()
                    .access_token,
            )
            .unwrap()
            .claims;
        let operator = service
            .validate_token(
                &service
                    .generate_token(&session(UserRole::Operator))
                    .unwrap()
                    .access_token,
            )
            .unwrap()
            .claims;

        assert!(service.has_role(&admin, UserRole::Admin));
        assert!(service.has_role(&admin, UserRole::Operator));
        assert!(!service.has_role(&operator, UserRole::Admin));
        assert!(service.has_role(&operator, UserRole::Operator));
    }
}
