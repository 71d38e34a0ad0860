//! Salted, iterated SHA-256 password hashing.
//!
//! Stored format: `sha256$<iterations>$<salt hex>$<digest hex>`.
//!
//! This is a placeholder scheme. SHA-256 is fast on GPUs even when iterated,
//! so production deployments should swap in a memory-hard password hash
//! (argon2, or bcrypt/scrypt) behind `PasswordHasherPort`. The scheme prefix
//! in stored hashes lets both formats coexist during migration.

use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::infrastructure::ports::PasswordHasherPort;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;
pub const DEFAULT_ITERATIONS: u32 = 100_000;

pub struct Sha256PasswordHasher {
    iterations: u32,
}

impl Sha256PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    fn digest(password: &str, salt: &[u8], iterations: u32) -> Vec<u8> {
        let mut digest = Sha256::new()
            .chain_update(salt)
            .chain_update(password.as_bytes())
            .finalize();
        for _ in 1..iterations {
            digest = Sha256::new()
                .chain_update(digest)
                .chain_update(password.as_bytes())
                .finalize();
        }
        digest.to_vec()
    }
}

impl Default for Sha256PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasherPort for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(password, &salt, self.iterations);
        format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        )
    }

    fn verify(&self, password: &str, stored: &str) -> bool {
        let mut parts = stored.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return false;
        };
        if scheme != SCHEME {
            return false;
        }
        let Ok(iterations) = iterations.parse::<u32>() else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
            return false;
        };
        if iterations == 0 {
            return false;
        }

        constant_time_eq(&Self::digest(password, &salt, iterations), &expected)
    }
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

    fn hasher() -> Sha256PasswordHasher {
        Sha256PasswordHasher::new(64)
    }

    #[test]
    fn hash_then_verify() {
        let hasher = hasher();
        let stored = hasher.hash("za warudo");
        assert!(stored.starts_with("sha256$64$"));
        assert!(hasher.verify("za warudo", &stored));
        assert!(!hasher.verify("ora ora", &stored));
    }

    #[test]
    fn same_password_gets_different_salts() {
        let hasher = hasher();
        assert_ne!(hasher.hash("golden wind"), hasher.hash("golden wind"));
    }

    #[test]
    fn verify_uses_stored_iteration_count() {
        let stored = Sha256PasswordHasher::new(10).hash("stone ocean");
        assert!(Sha256PasswordHasher::new(500).verify("stone ocean", &stored));
    }

    #[test]
    fn malformed_hashes_never_verify() {
        let hasher = hasher();
        for stored in [
            "",
            "plaintext",
            "md5$64$00$00",
            "sha256$abc$00$00",
            "sha256$0$00$00",
            "sha256$64$zz$00",
            "sha256$64$00$00$extra",
        ] {
            assert!(!hasher.verify("anything", stored), "{stored}");
        }
    }

    #[test]
    fn constant_time_eq_checks_length() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
