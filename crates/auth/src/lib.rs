//! `chambers-auth`: session authentication gate and admin allow-list.
//!
//! This crate is intentionally decoupled from HTTP and storage: callers hand in
//! a session token source and get back a verified identity (or nothing).

pub mod admins;
pub mod claims;
pub mod cookie;
pub mod gate;
pub mod hs256;
pub mod revocation;
pub mod verifier;

pub use admins::AdminAllowList;
pub use claims::{SessionClaims, validate_claims};
pub use cookie::{CookieHeader, SESSION_COOKIE, SessionTokenSource, cookie_value};
pub use gate::AuthGate;
pub use hs256::{Hs256SessionVerifier, SessionTokenClaims};
pub use revocation::RevocationList;
pub use verifier::{SessionVerifier, VerificationError};
