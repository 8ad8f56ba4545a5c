use crate::entities::{PointStatus, order_statuses, points};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePointRequest {
    #[schema(example = "Main Street Branch")]
    pub name: String,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Per-weekday hours: {"monday": {"start": "09:00", "end": "18:00", "is_closed": false}, ...}
    #[schema(value_type = Object)]
    pub working_hours: Option<serde_json::Value>,
    pub accepts_online_orders: Option<bool>,
    pub accepts_scheduled_orders: Option<bool>,
    pub slot_duration_minutes: Option<i32>,
    pub slots_per_interval: Option<i32>,
    pub advance_booking_days: Option<i32>,
    pub enable_qr_code: Option<bool>,
    pub require_phone_verification: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdatePointRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<PointStatus>,
    #[schema(value_type = Object)]
    pub working_hours: Option<serde_json::Value>,
    pub accepts_online_orders: Option<bool>,
    pub accepts_scheduled_orders: Option<bool>,
    pub slot_duration_minutes: Option<i32>,
    pub slots_per_interval: Option<i32>,
    pub advance_booking_days: Option<i32>,
    pub enable_qr_code: Option<bool>,
    pub require_phone_verification: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PointResponse {
    pub id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub detailed_description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: PointStatus,
    #[schema(value_type = Object)]
    pub working_hours: Option<serde_json::Value>,
    pub accepts_online_orders: bool,
    pub accepts_scheduled_orders: bool,
    pub slot_duration_minutes: i32,
    pub slots_per_interval: i32,
    pub advance_booking_days: i32,
    pub enable_qr_code: bool,
    pub require_phone_verification: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<points::Model> for PointResponse {
    fn from(point: points::Model) -> Self {
        Self {
            id: point.id,
            owner_id: point.owner_id,
            name: point.name,
            description: point.description,
            detailed_description: point.detailed_description,
            address: point.address,
            latitude: point.latitude,
            longitude: point.longitude,
            status: point.status,
            working_hours: point.working_hours,
            accepts_online_orders: point.accepts_online_orders,
            accepts_scheduled_orders: point.accepts_scheduled_orders,
            slot_duration_minutes: point.slot_duration_minutes,
            slots_per_interval: point.slots_per_interval,
            advance_booking_days: point.advance_booking_days,
            enable_qr_code: point.enable_qr_code,
            require_phone_verification: point.require_phone_verification,
            created_at: point.created_at,
            updated_at: point.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateOrderStatusRequest {
    #[schema(example = "queued")]
    pub name: String,
    pub description: Option<String>,
    /// Hex display color, defaults to #007AFF.
    pub color: Option<String>,
    /// Position in the pipeline; unique within the point.
    pub order_index: i32,
    pub is_final: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderStatusResponse {
    pub id: i32,
    pub point_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub order_index: i32,
    pub is_final: bool,
    pub is_active: bool,
}

impl From<order_statuses::Model> for OrderStatusResponse {
    fn from(status: order_statuses::Model) -> Self {
        Self {
            id: status.id,
            point_id: status.point_id,
            name: status.name,
            description: status.description,
            color: status.color,
            order_index: status.order_index,
            is_final: status.is_final,
            is_active: status.is_active,
        }
    }
}
