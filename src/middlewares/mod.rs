pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, bearer_token, get_current_user_email};
pub use cors::create_cors;
