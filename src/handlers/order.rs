use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

use crate::handlers::request_user;
use crate::models::*;
use crate::services::{AuthService, OrderService};

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Order created in the first pipeline stage", body = OrderResponse),
        (status = 400, description = "Point closed or order type not accepted"),
        (status = 404, description = "Point not found")
    )
)]
pub async fn create_order(
    auth_service: web::Data<AuthService>,
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    request: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.create_order(&user, request.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Created().json(order)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("page_size" = Option<u64>, Query, description = "Items per page")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's orders, newest first"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_orders(
    auth_service: web::Data<AuthService>,
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.list_orders(&user, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order details", body = OrderResponse),
        (status = 403, description = "Caller may not view this order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    auth_service: web::Data<AuthService>,
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.get_order(&user, path.into_inner()).await {
        Ok(order) => Ok(HttpResponse::Ok().json(order)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/status",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order id")
    ),
    request_body = TransitionStatusRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Order moved to the new stage", body = OrderResponse),
        (status = 403, description = "Caller may not move this order"),
        (status = 404, description = "Order or target stage not found"),
        (status = 409, description = "Order is already in a final stage")
    )
)]
pub async fn transition_status(
    auth_service: web::Data<AuthService>,
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i32>,
    request: web::Json<TransitionStatusRequest>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service
        .transition_status(&user, path.into_inner(), request.into_inner())
        .await
    {
        Ok(order) => Ok(HttpResponse::Ok().json(order)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/history",
    tag = "orders",
    params(
        ("order_id" = i32, Path, description = "Order id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Status trail, oldest first", body = Vec<OrderStatusHistoryResponse>),
        (status = 403, description = "Caller may not view this order"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_history(
    auth_service: web::Data<AuthService>,
    order_service: web::Data<OrderService>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let user = match request_user(&auth_service, &req).await {
        Ok(user) => user,
        Err(e) => return Ok(e.error_response()),
    };

    match order_service.get_history(&user, path.into_inner()).await {
        Ok(history) => Ok(HttpResponse::Ok().json(history)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn order_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/orders")
            .route("", web::post().to(create_order))
            .route("", web::get().to(list_orders))
            .route("/{order_id}", web::get().to(get_order))
            .route("/{order_id}/status", web::post().to(transition_status))
            .route("/{order_id}/history", web::get().to(get_history)),
    );
}
