pub mod auth;
pub mod cashier;
pub mod health;
pub mod order;
pub mod point;

pub use auth::auth_config;
pub use cashier::cashier_config;
pub use health::{health_config, index};
pub use order::order_config;
pub use point::point_config;

use actix_web::HttpRequest;

use crate::entities::users;
use crate::error::{AppError, AppResult};
use crate::middlewares::get_current_user_email;
use crate::services::AuthService;

/// Loads the user the auth middleware put in the request extensions.
pub(crate) async fn request_user(
    auth_service: &AuthService,
    req: &HttpRequest,
) -> AppResult<users::Model> {
    let email = get_current_user_email(req).ok_or(AppError::InvalidToken)?;
    auth_service.resolve_user_by_email(&email).await
}
