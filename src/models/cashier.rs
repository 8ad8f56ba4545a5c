use crate::entities::{CashierStatus, cashiers};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCashierRequest {
    #[schema(example = "3")]
    pub number: String,
    #[schema(example = "Window 3")]
    pub name: String,
    pub assigned_user_id: Option<i32>,
    pub max_concurrent_orders: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCashierRequest {
    pub number: Option<String>,
    pub name: Option<String>,
    pub status: Option<CashierStatus>,
    pub assigned_user_id: Option<i32>,
    pub max_concurrent_orders: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CashierResponse {
    pub id: i32,
    pub point_id: i32,
    pub assigned_user_id: Option<i32>,
    pub number: String,
    pub name: String,
    pub status: CashierStatus,
    pub is_active: bool,
    pub max_concurrent_orders: i32,
    pub created_at: DateTime<Utc>,
    pub last_activity: Option<DateTime<Utc>>,
}

impl From<cashiers::Model> for CashierResponse {
    fn from(cashier: cashiers::Model) -> Self {
        Self {
            id: cashier.id,
            point_id: cashier.point_id,
            assigned_user_id: cashier.assigned_user_id,
            number: cashier.number,
            name: cashier.name,
            status: cashier.status,
            is_active: cashier.is_active,
            max_concurrent_orders: cashier.max_concurrent_orders,
            created_at: cashier.created_at,
            last_activity: cashier.last_activity,
        }
    }
}
