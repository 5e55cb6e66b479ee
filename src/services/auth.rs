//! Login and password handling
//!
//! Passwords are stored as argon2 PHC strings on the user profile.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::{AmcError, AmcResult};
use crate::models::UserProfile;
use crate::storage::Storage;

/// Hash a password for storage
pub fn hash_password(password: &str) -> AmcResult<String> {
    if password.is_empty() {
        return Err(AmcError::Validation("Password cannot be empty".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AmcError::Authentication(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

pub struct AuthService<'a> {
    storage: &'a Storage,
}

impl<'a> AuthService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Authenticate a user by username (case-insensitive) and password
    pub fn login(&self, username: &str, password: &str) -> AmcResult<UserProfile> {
        let rejected = || AmcError::Authentication("Invalid username or password".into());

        let Some(user) = self.storage.users.get_by_username(username)? else {
            tracing::info!(username, "login rejected: unknown user");
            return Err(rejected());
        };

        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| verify_password(password, hash));

        if !verified {
            tracing::info!(username, "login rejected: bad password");
            return Err(rejected());
        }

        tracing::debug!(user = %user.id, role = %user.role, "login succeeded");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AmcPaths;
    use crate::models::Role;
    use tempfile::TempDir;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("kakinada123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("kakinada123", &hash));
        assert!(!verify_password("kakinada124", &hash));
        assert!(!verify_password("kakinada123", "not a phc string"));
    }

    #[test]
    fn test_empty_password_rejected() {
        assert!(hash_password("").unwrap_err().is_validation());
    }

    #[test]
    fn test_login() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(AmcPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let mut user = UserProfile::new("Supervisor", "Demo Supervisor", Role::Supervisor);
        user.password_hash = Some(hash_password("secret").unwrap());
        storage.users.upsert(user.clone()).unwrap();
        storage
            .users
            .upsert(UserProfile::new("nopass", "No Password", Role::JointDirector))
            .unwrap();

        let auth = AuthService::new(&storage);
        assert_eq!(auth.login("supervisor", "secret").unwrap().id, user.id);
        assert!(matches!(
            auth.login("supervisor", "wrong"),
            Err(AmcError::Authentication(_))
        ));
        assert!(matches!(auth.login("ghost", "secret"), Err(AmcError::Authentication(_))));
        assert!(matches!(auth.login("nopass", ""), Err(AmcError::Authentication(_))));
    }
}
