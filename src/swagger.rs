use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{AuthProvider, CashierStatus, OrderType, PointStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::token,
        handlers::auth::oauth_login,
        handlers::auth::me,
        handlers::auth::verify,
        handlers::auth::password_reset_request,
        handlers::auth::password_reset_confirm,
        handlers::auth::confirm_email,
        handlers::point::create_point,
        handlers::point::list_points,
        handlers::point::get_point,
        handlers::point::update_point,
        handlers::point::create_order_status,
        handlers::point::list_order_statuses,
        handlers::cashier::create_cashier,
        handlers::cashier::list_cashiers,
        handlers::cashier::update_cashier,
        handlers::order::create_order,
        handlers::order::list_orders,
        handlers::order::get_order,
        handlers::order::transition_status,
        handlers::order::get_history,
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            OAuthLoginRequest,
            OAuth2TokenForm,
            PasswordResetRequest,
            PasswordResetConfirm,
            ConfirmEmailRequest,
            UserResponse,
            Token,
            TokenVerifyResponse,
            CreatePointRequest,
            UpdatePointRequest,
            PointResponse,
            CreateOrderStatusRequest,
            OrderStatusResponse,
            CreateCashierRequest,
            UpdateCashierRequest,
            CashierResponse,
            CreateOrderRequest,
            TransitionStatusRequest,
            OrderResponse,
            OrderStatusHistoryResponse,
            AuthProvider,
            PointStatus,
            CashierStatus,
            OrderType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness probes"),
        (name = "auth", description = "Registration, login and token management"),
        (name = "points", description = "Service points and their status pipelines"),
        (name = "cashiers", description = "Cashier stations at a point"),
        (name = "orders", description = "Orders and status transitions"),
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
