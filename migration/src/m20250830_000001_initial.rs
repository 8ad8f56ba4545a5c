use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Users::FullName).string_len(255))
                    .col(ColumnDef::new(Users::HashedPassword).string_len(255))
                    .col(
                        ColumnDef::new(Users::AuthProvider)
                            .string_len(32)
                            .not_null()
                            .default("email"),
                    )
                    .col(ColumnDef::new(Users::OauthId).string_len(255))
                    .col(ColumnDef::new(Users::Phone).string_len(20))
                    .col(ColumnDef::new(Users::AvatarUrl).text())
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Users::LastLogin).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Points::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Points::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Points::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Points::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Points::Description).text())
                    .col(ColumnDef::new(Points::DetailedDescription).text())
                    .col(ColumnDef::new(Points::Address).text().not_null())
                    .col(ColumnDef::new(Points::Latitude).double())
                    .col(ColumnDef::new(Points::Longitude).double())
                    .col(
                        ColumnDef::new(Points::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Points::WorkingHours).json_binary())
                    .col(
                        ColumnDef::new(Points::AcceptsOnlineOrders)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Points::AcceptsScheduledOrders)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Points::SlotDurationMinutes)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Points::SlotsPerInterval)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(
                        ColumnDef::new(Points::AdvanceBookingDays)
                            .integer()
                            .not_null()
                            .default(7),
                    )
                    .col(
                        ColumnDef::new(Points::EnableQrCode)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Points::RequirePhoneVerification)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Points::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Points::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_owner")
                            .from(Points::Table, Points::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderStatuses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderStatuses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderStatuses::PointId).integer().not_null())
                    .col(
                        ColumnDef::new(OrderStatuses::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderStatuses::Description).text())
                    .col(
                        ColumnDef::new(OrderStatuses::Color)
                            .string_len(7)
                            .not_null()
                            .default("#007AFF"),
                    )
                    .col(
                        ColumnDef::new(OrderStatuses::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OrderStatuses::IsFinal)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OrderStatuses::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(OrderStatuses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(OrderStatuses::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_statuses_point")
                            .from(OrderStatuses::Table, OrderStatuses::PointId)
                            .to(Points::Table, Points::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One slot per pipeline position within a point.
        manager
            .create_index(
                Index::create()
                    .name("idx_order_statuses_point_index")
                    .table(OrderStatuses::Table)
                    .col(OrderStatuses::PointId)
                    .col(OrderStatuses::OrderIndex)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cashiers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cashiers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cashiers::PointId).integer().not_null())
                    .col(ColumnDef::new(Cashiers::AssignedUserId).integer())
                    .col(ColumnDef::new(Cashiers::Number).string_len(50).not_null())
                    .col(ColumnDef::new(Cashiers::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Cashiers::Status)
                            .string_len(32)
                            .not_null()
                            .default("available"),
                    )
                    .col(
                        ColumnDef::new(Cashiers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Cashiers::MaxConcurrentOrders)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Cashiers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Cashiers::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Cashiers::LastActivity).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cashiers_point")
                            .from(Cashiers::Table, Cashiers::PointId)
                            .to(Points::Table, Points::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cashiers_assigned_user")
                            .from(Cashiers::Table, Cashiers::AssignedUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).integer().not_null())
                    .col(ColumnDef::new(Orders::PointId).integer().not_null())
                    .col(ColumnDef::new(Orders::CashierId).integer())
                    .col(ColumnDef::new(Orders::OrderNumber).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Orders::OrderType)
                            .string_len(32)
                            .not_null()
                            .default("immediate"),
                    )
                    .col(ColumnDef::new(Orders::Description).text())
                    .col(ColumnDef::new(Orders::CustomerNotes).text())
                    .col(ColumnDef::new(Orders::ScheduledTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Orders::CurrentStatusId).integer())
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Orders::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_user")
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_point")
                            .from(Orders::Table, Orders::PointId)
                            .to(Points::Table, Points::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_cashier")
                            .from(Orders::Table, Orders::CashierId)
                            .to(Cashiers::Table, Cashiers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_current_status")
                            .from(Orders::Table, Orders::CurrentStatusId)
                            .to(OrderStatuses::Table, OrderStatuses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_order_number")
                    .table(Orders::Table)
                    .col(Orders::OrderNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_orders_point_id")
                    .table(Orders::Table)
                    .col(Orders::PointId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OrderStatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderStatusHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrderStatusHistory::OrderId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderStatusHistory::StatusId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderStatusHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(OrderStatusHistory::EndedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(OrderStatusHistory::Notes).text())
                    .col(ColumnDef::new(OrderStatusHistory::ChangedByUserId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_status_history_order")
                            .from(OrderStatusHistory::Table, OrderStatusHistory::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_status_history_status")
                            .from(OrderStatusHistory::Table, OrderStatusHistory::StatusId)
                            .to(OrderStatuses::Table, OrderStatuses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_status_history_changed_by")
                            .from(OrderStatusHistory::Table, OrderStatusHistory::ChangedByUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_status_history_order_id")
                    .table(OrderStatusHistory::Table)
                    .col(OrderStatusHistory::OrderId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderStatusHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cashiers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OrderStatuses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Points::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    FullName,
    HashedPassword,
    AuthProvider,
    OauthId,
    Phone,
    AvatarUrl,
    IsActive,
    IsVerified,
    CreatedAt,
    UpdatedAt,
    LastLogin,
}

#[derive(DeriveIden)]
enum Points {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    DetailedDescription,
    Address,
    Latitude,
    Longitude,
    Status,
    WorkingHours,
    AcceptsOnlineOrders,
    AcceptsScheduledOrders,
    SlotDurationMinutes,
    SlotsPerInterval,
    AdvanceBookingDays,
    EnableQrCode,
    RequirePhoneVerification,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderStatuses {
    Table,
    Id,
    PointId,
    Name,
    Description,
    Color,
    OrderIndex,
    IsFinal,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Cashiers {
    Table,
    Id,
    PointId,
    AssignedUserId,
    Number,
    Name,
    Status,
    IsActive,
    MaxConcurrentOrders,
    CreatedAt,
    UpdatedAt,
    LastActivity,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    UserId,
    PointId,
    CashierId,
    OrderNumber,
    OrderType,
    Description,
    CustomerNotes,
    ScheduledTime,
    CurrentStatusId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OrderStatusHistory {
    Table,
    Id,
    OrderId,
    StatusId,
    CreatedAt,
    EndedAt,
    Notes,
    ChangedByUserId,
}
