//! Request authentication.
//!
//! Every route requires a bearer token issued by the configured authority.
//! Token validation is the extent of this module; user management lives with
//! the identity provider.

mod jwt;

pub use jwt::TokenClaims;
