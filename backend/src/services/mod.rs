//! Business logic services
//!
//! Services encapsulate business logic and talk to storage only through the
//! repository ports.

pub mod task;
pub mod user;

pub use task::TaskService;
pub use user::UserService;
