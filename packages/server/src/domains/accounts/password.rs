//! Salted, stretched SHA-256 password hashes.
//!
//! Stored format: `sha256$<rounds>$<salt>$<hex digest>`.

use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const DEFAULT_ROUNDS: u32 = 100_000;
const ALGORITHM: &str = "sha256";

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    hash_password_with(password, &Uuid::new_v4().simple().to_string(), DEFAULT_ROUNDS)
}

pub fn hash_password_with(password: &str, salt: &str, rounds: u32) -> String {
    let digest = derive(password, salt, rounds.max(1));
    format!("{}${}${}${}", ALGORITHM, rounds.max(1), salt, hex::encode(digest))
}

/// Check a password against a stored hash. Malformed hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(4, '$');
    let (Some(algorithm), Some(rounds), Some(salt), Some(expected)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if algorithm != ALGORITHM || salt.is_empty() {
        return false;
    }
    let Ok(rounds) = rounds.parse::<u32>() else {
        return false;
    };
    let Ok(expected) = hex::decode(expected) else {
        return false;
    };
    let actual = derive(password, salt, rounds.max(1));
    constant_time_eq(&actual, &expected)
}

/// [`hash_password`] on the blocking thread pool; stretching is CPU-bound.
pub async fn hash_password_blocking(password: &str) -> anyhow::Result<String> {
    let password = password.to_string();
    Ok(tokio::task::spawn_blocking(move || hash_password(&password)).await?)
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(password: &str, stored: &str) -> anyhow::Result<bool> {
    let (password, stored) = (password.to_string(), stored.to_string());
    Ok(tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?)
}

fn derive(password: &str, salt: &str, rounds: u32) -> Vec<u8> {
    let mut digest = Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize();
    for _ in 1..rounds {
        digest = Sha256::new()
            .chain_update(digest)
            .chain_update(password.as_bytes())
            .finalize();
    }
    digest.to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_with_same_password() {
        let hash = hash_password_with("admin123", "pepper", 10);
        assert!(verify_password("admin123", &hash));
        assert!(!verify_password("admin124", &hash));
    }

    #[test]
    fn hash_format_has_four_parts() {
        let hash = hash_password_with("secret", "salt", 5);
        let parts: Vec<&str> = hash.split('$').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "sha256");
        assert_eq!(parts[1], "5");
        assert_eq!(parts[2], "salt");
        assert_eq!(parts[3].len(), 64);
    }

    #[test]
    fn different_salts_produce_different_hashes() {
        let first = hash_password("same password");
        let second = hash_password("same password");
        assert_ne!(first, second);
        assert!(verify_password("same password", &first));
        assert!(verify_password("same password", &second));
    }

    #[test]
    fn rounds_change_the_digest() {
        assert_ne!(
            hash_password_with("pw", "salt", 1),
            hash_password_with("pw", "salt", 2)
        );
    }

    #[tokio::test]
    async fn blocking_variants_agree() {
        let hash = hash_password_blocking("community").await.unwrap();
        assert!(verify_password("community", &hash));
        assert!(verify_password_blocking("community", &hash).await.unwrap());
        assert!(!verify_password_blocking("communitY", &hash).await.unwrap());
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "md5$1$salt$abcd"));
        assert!(!verify_password("pw", "sha256$many$salt$abcd"));
        assert!(!verify_password("pw", "sha256$1$salt$not-hex"));
        assert!(!verify_password("pw", "sha256$1$$00"));
    }
}
