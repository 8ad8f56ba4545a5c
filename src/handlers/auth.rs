use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};
use serde_json::json;

use crate::error::AppError;
use crate::middlewares::bearer_token;
use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = Token),
        (status = 400, description = "Invalid input or email already registered")
    )
)]
pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.register(request.into_inner()).await {
        Ok(token) => Ok(HttpResponse::Ok().json(token)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Token),
        (status = 401, description = "Invalid credentials"),
        (status = 400, description = "Wrong auth provider or inactive account")
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    match auth_service.login(&request.email, &request.password).await {
        Ok(token) => Ok(HttpResponse::Ok().json(token)),
        Err(e) => Ok(e.error_response()),
    }
}

/// OAuth2 password grant for interactive API docs and CLI clients.
#[utoipa::path(
    post,
    path = "/api/v1/auth/token",
    tag = "auth",
    request_body(content = OAuth2TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = Token),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn token(
    auth_service: web::Data<AuthService>,
    form: web::Form<OAuth2TokenForm>,
) -> Result<HttpResponse> {
    match auth_service.login(&form.username, &form.password).await {
        Ok(token) => Ok(HttpResponse::Ok().json(token)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login/oauth",
    tag = "auth",
    request_body = OAuthLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Token),
        (status = 400, description = "Unsupported provider, rejected provider token, or email registered with another provider")
    )
)]
pub async fn oauth_login(
    auth_service: web::Data<AuthService>,
    request: web::Json<OAuthLoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.oauth_login(request.into_inner()).await {
        Ok(token) => Ok(HttpResponse::Ok().json(token)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(auth_service: web::Data<AuthService>, req: HttpRequest) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(AppError::InvalidToken.error_response());
    };

    match auth_service.resolve_current_user(&token).await {
        Ok(user) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/verify",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Token is valid", body = TokenVerifyResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn verify(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(AppError::InvalidToken.error_response());
    };

    match auth_service.resolve_current_user(&token).await {
        Ok(user) => Ok(HttpResponse::Ok().json(TokenVerifyResponse {
            valid: true,
            user_id: user.id,
            email: user.email,
        })),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset/request",
    tag = "auth",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset email queued if the account exists")
    )
)]
pub async fn password_reset_request(
    auth_service: web::Data<AuthService>,
    request: web::Json<PasswordResetRequest>,
) -> Result<HttpResponse> {
    match auth_service.request_password_reset(&request.email).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "If the email is registered, a reset link has been sent"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/password-reset/confirm",
    tag = "auth",
    request_body = PasswordResetConfirm,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Weak password or OAuth account"),
        (status = 401, description = "Invalid or expired reset token")
    )
)]
pub async fn password_reset_confirm(
    auth_service: web::Data<AuthService>,
    request: web::Json<PasswordResetConfirm>,
) -> Result<HttpResponse> {
    let request = request.into_inner();
    match auth_service
        .confirm_password_reset(&request.token, &request.new_password)
        .await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Password has been reset"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/confirm-email",
    tag = "auth",
    request_body = ConfirmEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 401, description = "Invalid or expired verification token")
    )
)]
pub async fn confirm_email(
    auth_service: web::Data<AuthService>,
    request: web::Json<ConfirmEmailRequest>,
) -> Result<HttpResponse> {
    match auth_service.confirm_email(&request.token).await {
        Ok(user) => Ok(HttpResponse::Ok().json(user)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/token", web::post().to(token))
            .route("/login/oauth", web::post().to(oauth_login))
            .route("/me", web::get().to(me))
            .route("/verify", web::get().to(verify))
            .route("/password-reset/request", web::post().to(password_reset_request))
            .route("/password-reset/confirm", web::post().to(password_reset_confirm))
            .route("/confirm-email", web::post().to(confirm_email)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AuthProvider, users};
    use crate::external::OAuthClient;
    use crate::utils::JwtService;
    use actix_web::{App, http::StatusCode, test, web::Data};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};

    fn auth_service(db: DatabaseConnection) -> AuthService {
        AuthService::new(
            db,
            JwtService::new("test-secret", "HS256", 60).unwrap(),
            OAuthClient::new(),
        )
    }

    fn created_user() -> users::Model {
        users::Model {
            id: 1,
            email: "a@b.com".to_string(),
            full_name: None,
            hashed_password: Some("$2b$12$hash".to_string()),
            auth_provider: AuthProvider::Email,
            oauth_id: None,
            phone: None,
            avatar_url: None,
            is_active: true,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: None,
            last_login: Some(Utc::now()),
        }
    }

    #[actix_web::test]
    async fn test_register_responds_200_with_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .append_query_results([vec![created_user()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 1,
                rows_affected: 1,
            }])
            .into_connection();

        let app = test::init_service(
            App::new()
                .app_data(Data::new(auth_service(db)))
                .configure(auth_config),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(serde_json::json!({
                "email": "a@b.com",
                "password": "longpassword1"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["token_type"], "bearer");
        assert_eq!(body["user"]["email"], "a@b.com");
    }
}
