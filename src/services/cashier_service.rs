use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::entities::CashierStatus;
use crate::entities::cashiers::{self, Entity as Cashiers};
use crate::entities::points::Entity as Points;
use crate::entities::users;
use crate::error::{AppError, AppResult};
use crate::models::{CashierResponse, CreateCashierRequest, UpdateCashierRequest};

#[cfg_attr(not(test), derive(Clone))] // sea-orm mock (test-only) strips Clone from DatabaseConnection
pub struct CashierService {
    db: DatabaseConnection,
}

impl CashierService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_cashier(
        &self,
        actor: &users::Model,
        point_id: i32,
        request: CreateCashierRequest,
    ) -> AppResult<CashierResponse> {
        let point = Points::find_by_id(point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;
        if point.owner_id != actor.id {
            return Err(AppError::Forbidden);
        }

        if request.number.trim().is_empty() || request.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Number and name must not be empty".to_string(),
            ));
        }
        let max_concurrent = request.max_concurrent_orders.unwrap_or(1);
        if !(1..=10).contains(&max_concurrent) {
            return Err(AppError::ValidationError(
                "max_concurrent_orders must be between 1 and 10".to_string(),
            ));
        }

        let cashier = cashiers::ActiveModel {
            point_id: Set(point.id),
            assigned_user_id: Set(request.assigned_user_id),
            number: Set(request.number),
            name: Set(request.name),
            status: Set(CashierStatus::Available),
            is_active: Set(true),
            max_concurrent_orders: Set(max_concurrent),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            last_activity: Set(None),
            ..Default::default()
        };
        let cashier = cashier.insert(&self.db).await?;

        Ok(cashier.into())
    }

    pub async fn list_cashiers(&self, point_id: i32) -> AppResult<Vec<CashierResponse>> {
        Points::find_by_id(point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        let cashiers = Cashiers::find()
            .filter(cashiers::Column::PointId.eq(point_id))
            .order_by_asc(cashiers::Column::Number)
            .all(&self.db)
            .await?;

        Ok(cashiers.into_iter().map(CashierResponse::from).collect())
    }

    /// The point owner may change anything; the assigned user may only flip
    /// their own station's status.
    pub async fn update_cashier(
        &self,
        actor: &users::Model,
        cashier_id: i32,
        request: UpdateCashierRequest,
    ) -> AppResult<CashierResponse> {
        let cashier = Cashiers::find_by_id(cashier_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Cashier not found".to_string()))?;

        let point = Points::find_by_id(cashier.point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        let is_owner = point.owner_id == actor.id;
        let is_assigned = cashier.assigned_user_id == Some(actor.id);
        if !is_owner && !is_assigned {
            return Err(AppError::Forbidden);
        }
        if !is_owner
            && (request.number.is_some()
                || request.name.is_some()
                || request.assigned_user_id.is_some()
                || request.max_concurrent_orders.is_some()
                || request.is_active.is_some())
        {
            return Err(AppError::Forbidden);
        }

        let now = Utc::now();
        let mut active: cashiers::ActiveModel = cashier.into();
        if let Some(number) = request.number {
            active.number = Set(number);
        }
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
            active.last_activity = Set(Some(now));
        }
        if let Some(assigned) = request.assigned_user_id {
            active.assigned_user_id = Set(Some(assigned));
        }
        if let Some(max_concurrent) = request.max_concurrent_orders {
            if !(1..=10).contains(&max_concurrent) {
                return Err(AppError::ValidationError(
                    "max_concurrent_orders must be between 1 and 10".to_string(),
                ));
            }
            active.max_concurrent_orders = Set(max_concurrent);
        }
        if let Some(is_active) = request.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Some(now));

        let cashier = active.update(&self.db).await?;
        Ok(cashier.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::points;
    use crate::entities::{AuthProvider, PointStatus};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn user(id: i32) -> users::Model {
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

    fn cashier(assigned_user_id: Option<i32>) -> cashiers::Model {
        cashiers::Model {
            id: 30,
            point_id: 5,
            assigned_user_id,
            number: "3".to_string(),
            name: "Window 3".to_string(),
            status: CashierStatus::Available,
            is_active: true,
            max_concurrent_orders: 1,
            created_at: Utc::now(),
            updated_at: None,
            last_activity: None,
        }
    }

    #[tokio::test]
    async fn test_create_cashier_requires_ownership() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![point(99)]])
            .into_connection();

        let result = CashierService::new(db)
            .create_cashier(
                &user(10),
                5,
                CreateCashierRequest {
                    number: "3".to_string(),
                    name: "Window 3".to_string(),
                    assigned_user_id: None,
                    max_concurrent_orders: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_assigned_user_cannot_rename_station() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cashier(Some(10))]])
            .append_query_results([vec![point(99)]])
            .into_connection();

        let result = CashierService::new(db)
            .update_cashier(
                &user(10),
                30,
                UpdateCashierRequest {
                    number: None,
                    name: Some("My Window".to_string()),
                    status: Some(CashierStatus::Busy),
                    assigned_user_id: None,
                    max_concurrent_orders: None,
                    is_active: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
