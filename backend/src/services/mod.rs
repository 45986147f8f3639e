//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the auth primitives.

pub mod blog;
pub mod user;

pub use blog::BlogService;
pub use user::UserService;
