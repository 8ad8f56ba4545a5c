use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};

use crate::config::PaginationConfig;
use crate::entities::cashiers::Entity as Cashiers;
use crate::entities::order_status_history::{self, Entity as OrderStatusHistory};
use crate::entities::order_statuses::{self, Entity as OrderStatuses};
use crate::entities::orders::{self, Entity as Orders};
use crate::entities::points::{self, Entity as Points};
use crate::entities::users;
use crate::entities::{OrderType, PointStatus};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateOrderRequest, OrderResponse, OrderStatusHistoryResponse, PaginatedResponse,
    PaginationQuery, TransitionStatusRequest,
};
use crate::utils::generate_order_number;

#[cfg_attr(not(test), derive(Clone))] // sea-orm mock (test-only) strips Clone from DatabaseConnection
pub struct OrderService {
    db: DatabaseConnection,
    pagination: PaginationConfig,
}

impl OrderService {
    pub fn new(db: DatabaseConnection, pagination: PaginationConfig) -> Self {
        Self { db, pagination }
    }

    pub async fn create_order(
        &self,
        user: &users::Model,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        let point = Points::find_by_id(request.point_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        if point.status != PointStatus::Active {
            return Err(AppError::ValidationError(
                "Point is not accepting orders".to_string(),
            ));
        }

        let order_type = request.order_type.unwrap_or(OrderType::Immediate);
        match order_type {
            OrderType::Immediate if !point.accepts_online_orders => {
                return Err(AppError::ValidationError(
                    "Point does not accept online orders".to_string(),
                ));
            }
            OrderType::Scheduled => {
                if !point.accepts_scheduled_orders {
                    return Err(AppError::ValidationError(
                        "Point does not accept scheduled orders".to_string(),
                    ));
                }
                if request.scheduled_time.is_none() {
                    return Err(AppError::ValidationError(
                        "Scheduled orders require a scheduled_time".to_string(),
                    ));
                }
            }
            _ => {}
        }

        if let Some(cashier_id) = request.cashier_id {
            let cashier = Cashiers::find_by_id(cashier_id)
                .one(&self.db)
                .await?
                .filter(|c| c.point_id == point.id)
                .ok_or_else(|| AppError::NotFound("Cashier not found at this point".to_string()))?;
            if !cashier.is_active {
                return Err(AppError::ValidationError("Cashier is not active".to_string()));
            }
        }

        let order_number = self.generate_unique_order_number().await?;

        // New orders enter the point's pipeline at its first active stage.
        let initial_status = OrderStatuses::find()
            .filter(order_statuses::Column::PointId.eq(point.id))
            .filter(order_statuses::Column::IsActive.eq(true))
            .order_by_asc(order_statuses::Column::OrderIndex)
            .one(&self.db)
            .await?;

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let order = orders::ActiveModel {
            user_id: Set(user.id),
            point_id: Set(point.id),
            cashier_id: Set(request.cashier_id),
            order_number: Set(order_number),
            order_type: Set(order_type),
            description: Set(request.description),
            customer_notes: Set(request.customer_notes),
            scheduled_time: Set(request.scheduled_time),
            current_status_id: Set(initial_status.as_ref().map(|s| s.id)),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };
        let order = order.insert(&txn).await?;

        if let Some(status) = initial_status {
            let history = order_status_history::ActiveModel {
                order_id: Set(order.id),
                status_id: Set(status.id),
                created_at: Set(now),
                ended_at: Set(None),
                notes: Set(None),
                changed_by_user_id: Set(Some(user.id)),
                ..Default::default()
            };
            history.insert(&txn).await?;
        }

        txn.commit().await?;

        log::info!(
            "order {} created at point {} by user {}",
            order.order_number,
            order.point_id,
            user.id
        );
        Ok(order.into())
    }

    /// Moves an order to another stage of its point's pipeline. Closes the
    /// open history interval and opens a new one in the same transaction, so
    /// exactly one open row exists afterwards.
    pub async fn transition_status(
        &self,
        actor: &users::Model,
        order_id: i32,
        request: TransitionStatusRequest,
    ) -> AppResult<OrderResponse> {
        let txn = self.db.begin().await?;

        let order = Orders::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let point = Points::find_by_id(order.point_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Point not found".to_string()))?;

        if point.owner_id != actor.id {
            let assigned = match order.cashier_id {
                Some(cashier_id) => Cashiers::find_by_id(cashier_id)
                    .one(&txn)
                    .await?
                    .is_some_and(|c| c.assigned_user_id == Some(actor.id)),
                None => false,
            };
            if !assigned {
                return Err(AppError::Forbidden);
            }
        }

        let new_status = OrderStatuses::find_by_id(request.new_status_id)
            .filter(order_statuses::Column::PointId.eq(order.point_id))
            .filter(order_statuses::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .ok_or(AppError::StatusNotFound)?;

        if let Some(current_id) = order.current_status_id {
            let current = OrderStatuses::find_by_id(current_id)
                .one(&txn)
                .await?
                .ok_or(AppError::StatusNotFound)?;
            if current.is_final {
                return Err(AppError::OrderAlreadyFinal);
            }
        }

        let now = Utc::now();

        OrderStatusHistory::update_many()
            .col_expr(order_status_history::Column::EndedAt, Expr::value(now))
            .filter(order_status_history::Column::OrderId.eq(order.id))
            .filter(order_status_history::Column::EndedAt.is_null())
            .exec(&txn)
            .await?;

        let history = order_status_history::ActiveModel {
            order_id: Set(order.id),
            status_id: Set(new_status.id),
            created_at: Set(now),
            ended_at: Set(None),
            notes: Set(request.notes),
            changed_by_user_id: Set(Some(actor.id)),
            ..Default::default()
        };
        history.insert(&txn).await?;

        let mut active: orders::ActiveModel = order.into();
        active.current_status_id = Set(Some(new_status.id));
        active.updated_at = Set(Some(now));
        let order = active.update(&txn).await?;

        txn.commit().await?;

        log::info!(
            "order {} moved to status {} by user {}",
            order.order_number,
            new_status.name,
            actor.id
        );
        Ok(order.into())
    }

    pub async fn get_order(&self, actor: &users::Model, order_id: i32) -> AppResult<OrderResponse> {
        let order = self.load_authorized(actor, order_id).await?;
        Ok(order.into())
    }

    pub async fn list_orders(
        &self,
        actor: &users::Model,
        query: &PaginationQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let (page, page_size) = query.resolve(
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        );

        let paginator = Orders::find()
            .filter(orders::Column::UserId.eq(actor.id))
            .order_by_desc(orders::Column::CreatedAt)
            .paginate(&self.db, page_size);

        let total = paginator.num_items().await?;
        let items: Vec<OrderResponse> = paginator
            .fetch_page(page - 1)
            .await?
            .into_iter()
            .map(OrderResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, page, page_size, total))
    }

    pub async fn get_history(
        &self,
        actor: &users::Model,
        order_id: i32,
    ) -> AppResult<Vec<OrderStatusHistoryResponse>> {
        let order = self.load_authorized(actor, order_id).await?;

        let rows = OrderStatusHistory::find()
            .filter(order_status_history::Column::OrderId.eq(order.id))
            .order_by_asc(order_status_history::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(OrderStatusHistoryResponse::from).collect())
    }

    /// Visible to the customer who placed the order and to the point owner.
    async fn load_authorized(
        &self,
        actor: &users::Model,
        order_id: i32,
    ) -> AppResult<orders::Model> {
        let order = Orders::find_by_id(order_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        if order.user_id != actor.id {
            let owns_point = Points::find_by_id(order.point_id)
                .one(&self.db)
                .await?
                .is_some_and(|p| p.owner_id == actor.id);
            if !owns_point {
                return Err(AppError::Forbidden);
            }
        }

        Ok(order)
    }

    async fn generate_unique_order_number(&self) -> AppResult<String> {
        for _ in 0..5 {
            let candidate = generate_order_number();
            let taken = Orders::find()
                .filter(orders::Column::OrderNumber.eq(&candidate))
                .one(&self.db)
                .await?
                .is_some();
            if !taken {
                return Ok(candidate);
            }
        }
        Err(AppError::InternalError(
            "failed to generate a unique order number".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::cashiers;
    use crate::entities::{AuthProvider, CashierStatus};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn owner() -> users::Model {
        users::Model {
            id: 10,
            email: "owner@b.com".to_string(),
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

    fn status(id: i32, order_index: i32, is_final: bool) -> order_statuses::Model {
        order_statuses::Model {
            id,
            point_id: 5,
            name: format!("stage-{order_index}"),
            description: None,
            color: "#007AFF".to_string(),
            order_index,
            is_final,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn order(current_status_id: Option<i32>) -> orders::Model {
        orders::Model {
            id: 77,
            user_id: 2,
            point_id: 5,
            cashier_id: None,
            order_number: "ORD-20250830-K7R2MQ".to_string(),
            order_type: OrderType::Immediate,
            description: None,
            customer_notes: None,
            scheduled_time: None,
            current_status_id,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn history_row(status_id: i32) -> order_status_history::Model {
        order_status_history::Model {
            id: 900,
            order_id: 77,
            status_id,
            created_at: Utc::now(),
            ended_at: None,
            notes: None,
            changed_by_user_id: Some(10),
        }
    }

    fn service(db: DatabaseConnection) -> OrderService {
        OrderService::new(db, PaginationConfig::default())
    }

    #[tokio::test]
    async fn test_transition_from_final_status_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![order(Some(3))]])
            .append_query_results([vec![point(10)]])
            .append_query_results([vec![status(4, 3, false)]])
            // Current status is terminal.
            .append_query_results([vec![status(3, 2, true)]])
            .into_connection();

        let result = service(db)
            .transition_status(
                &owner(),
                77,
                TransitionStatusRequest {
                    new_status_id: 4,
                    notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::OrderAlreadyFinal)));
    }

    #[tokio::test]
    async fn test_transition_to_foreign_status_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![order(Some(1))]])
            .append_query_results([vec![point(10)]])
            // No status with that id belongs to the order's point.
            .append_query_results([Vec::<order_statuses::Model>::new()])
            .into_connection();

        let result = service(db)
            .transition_status(
                &owner(),
                77,
                TransitionStatusRequest {
                    new_status_id: 999,
                    notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::StatusNotFound)));
    }

    #[tokio::test]
    async fn test_transition_requires_point_owner_or_assigned_cashier() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![order(Some(1))]])
            // Point owned by someone else; order has no cashier.
            .append_query_results([vec![point(99)]])
            .into_connection();

        let result = service(db)
            .transition_status(
                &owner(),
                77,
                TransitionStatusRequest {
                    new_status_id: 2,
                    notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_transition_repoints_order_and_opens_new_history() {
        let mut moved = order(Some(1));
        moved.current_status_id = Some(2);
        moved.updated_at = Some(Utc::now());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![order(Some(1))]])
            .append_query_results([vec![point(10)]])
            .append_query_results([vec![status(2, 1, false)]])
            .append_query_results([vec![status(1, 0, false)]])
            .append_query_results([vec![history_row(2)]])
            .append_query_results([vec![moved]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 901,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let result = service(db)
            .transition_status(
                &owner(),
                77,
                TransitionStatusRequest {
                    new_status_id: 2,
                    notes: Some("called to window".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(result.current_status_id, Some(2));
    }

    #[tokio::test]
    async fn test_create_order_at_inactive_point_is_rejected() {
        let mut inactive = point(10);
        inactive.status = PointStatus::Maintenance;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![inactive]])
            .into_connection();

        let result = service(db)
            .create_order(
                &owner(),
                CreateOrderRequest {
                    point_id: 5,
                    cashier_id: None,
                    order_type: None,
                    scheduled_time: None,
                    description: None,
                    customer_notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_scheduled_order_requires_time() {
        let mut p = point(10);
        p.accepts_scheduled_orders = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![p]])
            .into_connection();

        let result = service(db)
            .create_order(
                &owner(),
                CreateOrderRequest {
                    point_id: 5,
                    cashier_id: None,
                    order_type: Some(OrderType::Scheduled),
                    scheduled_time: None,
                    description: None,
                    customer_notes: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_order_seeds_first_pipeline_stage() {
        let mut created = order(Some(1));
        created.user_id = 10;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![point(10)]])
            // Order-number uniqueness probe.
            .append_query_results([Vec::<orders::Model>::new()])
            .append_query_results([vec![status(1, 0, false)]])
            .append_query_results([vec![created]])
            .append_query_results([vec![history_row(1)]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 77,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 900,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let result = service(db)
            .create_order(
                &owner(),
                CreateOrderRequest {
                    point_id: 5,
                    cashier_id: None,
                    order_type: None,
                    scheduled_time: None,
                    description: Some("two coffees".to_string()),
                    customer_notes: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.current_status_id, Some(1));
    }

    #[tokio::test]
    async fn test_assigned_cashier_user_may_transition() {
        let mut o = order(Some(1));
        o.cashier_id = Some(30);
        let cashier = cashiers::Model {
            id: 30,
            point_id: 5,
            assigned_user_id: Some(10),
            number: "3".to_string(),
            name: "Window 3".to_string(),
            status: CashierStatus::Available,
            is_active: true,
            max_concurrent_orders: 1,
            created_at: Utc::now(),
            updated_at: None,
            last_activity: None,
        };
        let mut moved = order(Some(2));
        moved.cashier_id = Some(30);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![o]])
            .append_query_results([vec![point(99)]])
            .append_query_results([vec![cashier]])
            .append_query_results([vec![status(2, 1, false)]])
            .append_query_results([vec![status(1, 0, false)]])
            .append_query_results([vec![history_row(2)]])
            .append_query_results([vec![moved]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 901,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();

        let result = service(db)
            .transition_status(
                &owner(),
                77,
                TransitionStatusRequest {
                    new_status_id: 2,
                    notes: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.current_status_id, Some(2));
    }
}
