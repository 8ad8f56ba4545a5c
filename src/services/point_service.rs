use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::PointStatus;
use crate::entities::order_statuses::{self, Entity as OrderStatuses};
use crate::entities::points::{self, Entity as Points};
use crate::entities::users;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderStatusRequest, CreatePointRequest, OrderStatusResponse, PointResponse,
    UpdatePointRequest,
};

fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> AppResult<()> {
    if let Some(lat) = latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        return Err(AppError::ValidationError("Latitude out of range".to_string()));
    }
    if let Some(lon) = longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        return Err(AppError::ValidationError("Longitude out of range".to_string()));
    }
    Ok(())
}

fn validate_color(color: &str) -> AppResult<()> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::ValidationError(
            "Color must be a #RRGGBB hex value".to_string(),
        ));
    }
    Ok(())
}

#[cfg_attr(not(test), derive(Clone))] // sea-orm mock (test-only) strips Clone from DatabaseConnection
pub struct PointService {
    db: DatabaseConnection,
}

impl PointService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_point(
        &self,
        owner: &users::Model,
        request: CreatePointRequest,
    ) -> AppResult<PointResponse> {
        if request.name.trim().is_empty() {
            return Err(AppError::ValidationError("Name must not be empty".to_string()));
        }
        if request.address.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Address must not be empty".to_string(),
            ));
        }
        validate_coordinates(request.latitude, request.longitude)?;

        let point = points::ActiveModel {
            owner_id: Set(owner.id),
            name: Set(request.name),
            description: Set(request.description),
            detailed_description: Set(request.detailed_description),
            address: Set(request.address),
            latitude: Set(request.latitude),
            longitude: Set(request.longitude),
            status: Set(PointStatus::Active),
            working_hours: Set(request.working_hours),
            accepts_online_orders: Set(request.accepts_online_orders.unwrap_or(true)),
            accepts_scheduled_orders: Set(request.accepts_scheduled_orders.unwrap_or(false)),
            slot_duration_minutes: Set(request.slot_duration_minutes.unwrap_or(30)),
            slots_per_interval: Set(request.slots_per_interval.unwrap_or(5)),
            advance_booking_days: Set(request.advance_booking_days.unwrap_or(7)),
            enable_qr_code: Set(request.enable_qr_code.unwrap_or(true)),
            require_phone_verification: Set(request.require_phone_verification.unwrap_or(false)),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };
        let point = point.insert(&self.db).await?;

        log::info!("point {} created by user {}", point.id, owner.id);
        Ok(point.into())
    }

    pub async fn list_points(&self, owner: &users::Model) -> AppResult<Vec<PointResponse>> {
        let points = Points::find()
            .filter(points::Column::OwnerId.eq(owner.id))
            .order_by_asc(points::Column::Id)
            .all(&self.db)
            .await?;

        Ok(points.into_iter().map(PointResponse::from).collect())
    }

    pub async fn get_point(&self, point_id: i32) -> AppResult<PointResponse> {
        let point = Points::find_by_id(point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;
        Ok(point.into())
    }

    pub async fn update_point(
        &self,
        actor: &users::Model,
        point_id: i32,
        request: UpdatePointRequest,
    ) -> AppResult<PointResponse> {
        validate_coordinates(request.latitude, request.longitude)?;

        let point = self.load_owned(actor, point_id).await?;

        let mut active: points::ActiveModel = point.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(description) = request.description {
            active.description = Set(Some(description));
        }
        if let Some(detailed) = request.detailed_description {
            active.detailed_description = Set(Some(detailed));
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(latitude) = request.latitude {
            active.latitude = Set(Some(latitude));
        }
        if let Some(longitude) = request.longitude {
            active.longitude = Set(Some(longitude));
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(working_hours) = request.working_hours {
            active.working_hours = Set(Some(working_hours));
        }
        if let Some(v) = request.accepts_online_orders {
            active.accepts_online_orders = Set(v);
        }
        if let Some(v) = request.accepts_scheduled_orders {
            active.accepts_scheduled_orders = Set(v);
        }
        if let Some(v) = request.slot_duration_minutes {
            active.slot_duration_minutes = Set(v);
        }
        if let Some(v) = request.slots_per_interval {
            active.slots_per_interval = Set(v);
        }
        if let Some(v) = request.advance_booking_days {
            active.advance_booking_days = Set(v);
        }
        if let Some(v) = request.enable_qr_code {
            active.enable_qr_code = Set(v);
        }
        if let Some(v) = request.require_phone_verification {
            active.require_phone_verification = Set(v);
        }
        active.updated_at = Set(Some(Utc::now()));

        let point = active.update(&self.db).await?;
        Ok(point.into())
    }

    pub async fn create_order_status(
        &self,
        actor: &users::Model,
        point_id: i32,
        request: CreateOrderStatusRequest,
    ) -> AppResult<OrderStatusResponse> {
        let point = self.load_owned(actor, point_id).await?;

        if request.name.trim().is_empty() {
            return Err(AppError::ValidationError("Name must not be empty".to_string()));
        }
        let color = request.color.unwrap_or_else(|| "#007AFF".to_string());
        validate_color(&color)?;

        // Pipeline positions are unambiguous: one status per index per point.
        let clash = OrderStatuses::find()
            .filter(order_statuses::Column::PointId.eq(point.id))
            .filter(order_statuses::Column::OrderIndex.eq(request.order_index))
            .one(&self.db)
            .await?;
        if clash.is_some() {
            return Err(AppError::ValidationError(format!(
                "order_index {} is already used at this point",
                request.order_index
            )));
        }

        let status = order_statuses::ActiveModel {
            point_id: Set(point.id),
            name: Set(request.name),
            description: Set(request.description),
            color: Set(color),
            order_index: Set(request.order_index),
            is_final: Set(request.is_final.unwrap_or(false)),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        };
        let status = status.insert(&self.db).await?;

        Ok(status.into())
    }

    pub async fn list_order_statuses(
        &self,
        point_id: i32,
    ) -> AppResult<Vec<OrderStatusResponse>> {
        Points::find_by_id(point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        let statuses = OrderStatuses::find()
            .filter(order_statuses::Column::PointId.eq(point_id))
            .order_by_asc(order_statuses::Column::OrderIndex)
            .all(&self.db)
            .await?;

        Ok(statuses.into_iter().map(OrderStatusResponse::from).collect())
    }

    async fn load_owned(&self, actor: &users::Model, point_id: i32) -> AppResult<points::Model> {
        let point = Points::find_by_id(point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        if point.owner_id != actor.id {
            return Err(AppError::Forbidden);
        }

        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AuthProvider;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn owner(id: i32) -> users::Model {
        users::Model {
            id,
            email: format!("user{id}@b.com"),
            full_name: None,
            hashed_password: Some("x".to_string()),
            auth_provider: AuthProvider::Email,
            oauth_id: None,
            phone: None,
            avatar_url: None,
            is_active: true,
            is_verified: true,
            created_at: Utc::now(),
            updated_at: None,
            last_login: None,
        }
    }

    fn point(owner_id: i32) -> points::Model {
        points::Model {
            id: 5,
            owner_id,
            name: "Main Street Branch".to_string(),
            description: None,
            detailed_description: None,
            address: "1 Main St".to_string(),
            latitude: None,
            longitude: None,
            status: PointStatus::Active,
            working_hours: None,
            accepts_online_orders: true,
            accepts_scheduled_orders: false,
            slot_duration_minutes: 30,
            slots_per_interval: 5,
            advance_booking_days: 7,
            enable_qr_code: true,
            require_phone_verification: false,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn status_at(order_index: i32) -> order_statuses::Model {
        order_statuses::Model {
            id: 1,
            point_id: 5,
            name: "queued".to_string(),
            description: None,
            color: "#007AFF".to_string(),
            order_index,
            is_final: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn request(order_index: i32) -> CreateOrderStatusRequest {
        CreateOrderStatusRequest {
            name: "in progress".to_string(),
            description: None,
            color: None,
            order_index,
            is_final: None,
        }
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#007AFF").is_ok());
        assert!(validate_color("007AFF").is_err());
        assert!(validate_color("#07AFF").is_err());
        assert!(validate_color("#GGGGGG").is_err());
    }

    #[tokio::test]
    async fn test_duplicate_order_index_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![point(10)]])
            .append_query_results([vec![status_at(2)]])
            .into_connection();

        let result = PointService::new(db)
            .create_order_status(&owner(10), 5, request(2))
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_only_owner_manages_statuses() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![point(99)]])
            .into_connection();

        let result = PointService::new(db)
            .create_order_status(&owner(10), 5, request(0))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_create_point_validates_coordinates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = PointService::new(db)
            .create_point(
                &owner(10),
                CreatePointRequest {
                    name: "Branch".to_string(),
                    description: None,
                    detailed_description: None,
                    address: "1 Main St".to_string(),
                    latitude: Some(123.0),
                    longitude: None,
                    working_hours: None,
                    accepts_online_orders: None,
                    accepts_scheduled_orders: None,
                    slot_duration_minutes: None,
                    slots_per_interval: None,
                    advance_booking_days: None,
                    enable_qr_code: None,
                    require_phone_verification: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_point_validates_coordinates() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![point(10)]])
            .into_connection();

        let result = PointService::new(db)
            .update_point(
                &owner(10),
                5,
                UpdatePointRequest {
                    name: None,
                    description: None,
                    detailed_description: None,
                    address: None,
                    latitude: Some(123.0),
                    longitude: None,
                    status: None,
                    working_hours: None,
                    accepts_online_orders: None,
                    accepts_scheduled_orders: None,
                    slot_duration_minutes: None,
                    slots_per_interval: None,
                    advance_booking_days: None,
                    enable_qr_code: None,
                    require_phone_verification: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
