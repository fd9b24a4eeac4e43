use crate::config::SecurityConfig;
use crate::error::Error;
use anyhow::Result;
use bcrypt::{hash, verify};

/// Hash a password with bcrypt
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let cost = config.password_hash_cost;

    let hashed = hash(password, cost)
        .map_err(|e| Error::Authentication(format!("Failed to hash password: {}", e)))?;

    Ok(hashed)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let result = verify(password, hash)
        .map_err(|e| Error::Authentication(format!("Failed to verify password: {}", e)))?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let config = SecurityConfig {
            password_hash_cost: 4, // keep the test fast
            ..SecurityConfig::default()
        };

        let hashed = hash_password("admin123", &config).unwrap();
        assert_ne!(hashed, "admin123");
        assert!(verify_password("admin123", &hashed).unwrap());
        assert!(!verify_password("admin124", &hashed).unwrap());
    }
}
