use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    #[sea_orm(string_value = "immediate")]
    Immediate,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub point_id: i32,
    pub cashier_id: Option<i32>,
    #[sea_orm(unique)]
    pub order_number: String,
    pub order_type: OrderType,
    pub description: Option<String>,
    pub customer_notes: Option<String>,
    pub scheduled_time: Option<DateTime<Utc>>,
    // Pointer into the owning point's order_statuses pipeline.
    pub current_status_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
