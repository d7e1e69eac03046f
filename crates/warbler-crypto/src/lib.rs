//! Warbler Crypto Library
//!
//! Password hashing for account signup and login. Hashes are Argon2id in PHC
//! string format, so the parameters travel with each stored hash.

pub mod password;

pub use password::{hash_password, verify_password};
