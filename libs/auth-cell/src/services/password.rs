use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use tracing::instrument;

pub struct PasswordService;

impl PasswordService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_original_password() {
        let hash = PasswordService::hash_password("correct horse battery").unwrap();
        assert!(PasswordService::verify_password("correct horse battery", &hash).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = PasswordService::hash_password("correct horse battery").unwrap();
        assert!(!PasswordService::verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn verify_errors_on_garbage_hash() {
        assert!(PasswordService::verify_password("anything", "not-a-phc-string").is_err());
    }
}
