use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::handlers::request_user;
use crate::models::*;
use crate::services::{AuthService, CashierService};

#[utoipa::path(
    post,
    path = "/api/v1/points/{point_id}/cashiers",
    tag = "cashiers",
    params(
        ("point_id" = i32, Path, description = "Point id")
    ),
    request_body = CreateCashierRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Cashier created", body = CashierResponse),
        (status = 400, description = "Invalid cashier data"),
        (status = 403, description = "Caller does not own the point"),
        (status = 404, description = "Point not found")
    )
)]
pub async fn create_cashier(
    auth_service: web::Data<AuthService>,
    cashier_service: web::Data<CashierService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<CreateCashierRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match cashier_service
        .create_cashier(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(cashier) => Ok(HttpResponse::Created().json(cashier)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/points/{point_id}/cashiers",
    tag = "cashiers",
    params(
        ("point_id" = i32, Path, description = "Point id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cashiers of the point", body = Vec<CashierResponse>),
        (status = 404, description = "Point not found")
    )
)]
pub async fn list_cashiers(
    cashier_service: web::Data<CashierService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match cashier_service.list_cashiers(path.into_inner()).await {
        Ok(cashiers) => Ok(HttpResponse::Ok().json(cashiers)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/cashiers/{cashier_id}",
    tag = "cashiers",
    params(
        ("cashier_id" = i32, Path, description = "Cashier id")
    ),
    request_body = UpdateCashierRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cashier updated", body = CashierResponse),
        (status = 403, description = "Caller may not edit this cashier"),
        (status = 404, description = "Cashier not found")
    )
)]
pub async fn update_cashier(
    auth_service: web::Data<AuthService>,
    cashier_service: web::Data<CashierService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdateCashierRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match cashier_service
        .update_cashier(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(cashier) => Ok(HttpResponse::Ok().json(cashier)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cashier_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/points/{point_id}/cashiers",
        web::post().to(create_cashier),
    )
    .route("/points/{point_id}/cashiers", web::get().to(list_cashiers))
    .route("/cashiers/{cashier_id}", web::put().to(update_cashier));
}
