//! Authentication and authorization
//!
//! JWT bearer tokens, argon2 password hashing and the task ownership guard.

pub mod authorization;
mod jwt;
mod middleware;
mod password;

pub use authorization::{check_owner, require_owner};
pub use jwt::{Claims, JwtService};
pub use middleware::{auth_middleware, authenticate, parse_bearer, AuthUser};
pub use password::PasswordService;
