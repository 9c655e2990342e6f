//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signing and verifying the access and refresh tokens.
//! - [`cookies`] -- the cookies carrying the token pair.
//! - [`authenticator`] -- per-request validation with silent rotation.

pub mod authenticator;
pub mod cookies;
pub mod jwt;
pub mod password;
