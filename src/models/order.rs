use crate::entities::{OrderType, order_status_history, orders};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub point_id: i32,
    pub cashier_id: Option<i32>,
    /// Defaults to `immediate`.
    pub order_type: Option<OrderType>,
    /// Required for scheduled orders.
    pub scheduled_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub customer_notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionStatusRequest {
    pub new_status_id: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub point_id: i32,
    pub cashier_id: Option<i32>,
    pub order_number: String,
    pub order_type: OrderType,
    pub description: Option<String>,
    pub customer_notes: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub current_status_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<orders::Model> for OrderResponse {
    fn from(order: orders::Model) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            point_id: order.point_id,
            cashier_id: order.cashier_id,
            order_number: order.order_number,
            order_type: order.order_type,
            description: order.description,
            customer_notes: order.customer_notes,
            scheduled_time: order.scheduled_time,
            current_status_id: order.current_status_id,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusHistoryResponse {
    pub id: i32,
    pub order_id: i32,
    pub status_id: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub changed_by_user_id: Option<i32>,
}

impl From<order_status_history::Model> for OrderStatusHistoryResponse {
    fn from(row: order_status_history::Model) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            status_id: row.status_id,
            started_at: row.created_at,
            ended_at: row.ended_at,
            notes: row.notes,
            changed_by_user_id: row.changed_by_user_id,
        }
    }
}
