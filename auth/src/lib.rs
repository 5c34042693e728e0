//! Credential primitives for the shop service
//!
//! - Password hashing (Argon2id)
//! - Session token signing and stateless verification (HS256)
//! - Authentication coordination
//!
//! Nothing here knows about accounts or stored sessions. The service
//! decides whether a verified token is still the current one.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("pw123").unwrap();
//! assert!(hasher.verify("pw123", &hash).unwrap());
//! ```
//!
//! ## Login Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//!
//! // Register: hash password
//! let hash = auth.hash_password("pw123").unwrap();
//!
//! // Login: verify and mint a session token
//! let session = auth.authenticate("pw123", &hash, "account-1").unwrap();
//!
//! // Stateless verification of an inbound token
//! let claims = auth.verify_session(&session.token).unwrap();
//! assert_eq!(claims.subject(), "account-1");
//! ```

pub mod authenticator;
pub mod password;
pub mod token;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::IssuedSession;
pub use authenticator::DEFAULT_SESSION_HOURS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::SessionClaims;
pub use token::TokenError;
pub use token::TokenSigner;
