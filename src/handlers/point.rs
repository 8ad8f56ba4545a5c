use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::handlers::request_user;
use crate::models::*;
use crate::services::{AuthService, PointService};

#[utoipa::path(
    post,
    path = "/api/v1/points",
    tag = "points",
    request_body = CreatePointRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Point created", body = PointResponse),
        (status = 400, description = "Invalid point data"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_point(
    auth_service: web::Data<AuthService>,
    point_service: web::Data<PointService>,
    req: HttpRequest,
    request: web::Json<CreatePointRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match point_service.create_point(&user, request.into_inner()).await {
        Ok(point) => Ok(HttpResponse::Created().json(point)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/points",
    tag = "points",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Points owned by the caller", body = Vec<PointResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_points(
    auth_service: web::Data<AuthService>,
    point_service: web::Data<PointService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match point_service.list_points(&user).await {
        Ok(points) => Ok(HttpResponse::Ok().json(points)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/points/{point_id}",
    tag = "points",
    params(
        ("point_id" = i32, Path, description = "Point id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Point details", body = PointResponse),
        (status = 404, description = "Point not found")
    )
)]
pub async fn get_point(
    point_service: web::Data<PointService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match point_service.get_point(path.into_inner()).await {
        Ok(point) => Ok(HttpResponse::Ok().json(point)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/points/{point_id}",
    tag = "points",
    params(
        ("point_id" = i32, Path, description = "Point id")
    ),
    request_body = UpdatePointRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Point updated", body = PointResponse),
        (status = 403, description = "Caller does not own the point"),
        (status = 404, description = "Point not found")
    )
)]
pub async fn update_point(
    auth_service: web::Data<AuthService>,
    point_service: web::Data<PointService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<UpdatePointRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match point_service
        .update_point(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(point) => Ok(HttpResponse::Ok().json(point)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/points/{point_id}/statuses",
    tag = "points",
    params(
        ("point_id" = i32, Path, description = "Point id")
    ),
    request_body = CreateOrderStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Status stage created", body = OrderStatusResponse),
        (status = 400, description = "Invalid stage data or duplicate order index"),
        (status = 403, description = "Caller does not own the point"),
        (status = 404, description = "Point not found")
    )
)]
pub async fn create_order_status(
    auth_service: web::Data<AuthService>,
    point_service: web::Data<PointService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<CreateOrderStatusRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match point_service
        .create_order_status(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(status) => Ok(HttpResponse::Created().json(status)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/points/{point_id}/statuses",
    tag = "points",
    params(
        ("point_id" = i32, Path, description = "Point id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status pipeline ordered by index", body = Vec<OrderStatusResponse>),
        (status = 404, description = "Point not found")
    )
)]
pub async fn list_order_statuses(
    point_service: web::Data<PointService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match point_service.list_order_statuses(path.into_inner()).await {
        Ok(statuses) => Ok(HttpResponse::Ok().json(statuses)),
        Err(e) => Ok(e.error_response()),
    }
}

// Cashier routes also live under /points/{point_id}, so these are
// registered as flat resources rather than a /points scope.
pub fn point_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/points", web::post().to(create_point))
        .route("/points", web::get().to(list_points))
        .route("/points/{point_id}", web::get().to(get_point))
        .route("/points/{point_id}", web::put().to(update_point))
        .route(
            "/points/{point_id}/statuses",
            web::post().to(create_order_status),
        )
        .route(
            "/points/{point_id}/statuses",
            web::get().to(list_order_statuses),
        );
}
