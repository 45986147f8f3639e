//! Authentication module
//!
//! Bearer tokens (HS256 JWT), argon2 password hashing and the middleware
//! that turns one into the other's user.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, TokenService};
pub use middleware::{bearer_token, identify_caller, AuthUser};
pub use password::PasswordService;
