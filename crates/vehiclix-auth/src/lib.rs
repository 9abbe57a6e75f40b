//! vehiclix-auth
//!
//! Bearer token validation and role checks. Tokens are issued elsewhere;
//! this crate only verifies them and exposes the caller's identity.

pub mod error;
pub mod jwt;
pub mod role;
