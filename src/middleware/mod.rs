pub mod auth;
pub mod ownership;
pub mod response;

pub use auth::{require_auth, AuthGate, AuthUser};
pub use ownership::{require_owner, Owned};
pub use response::{ApiResponse, ApiResult};
