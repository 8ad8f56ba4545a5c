pub mod cashiers;
pub mod order_status_history;
pub mod order_statuses;
pub mod orders;
pub mod points;
pub mod users;

pub use cashiers::CashierStatus;
pub use orders::OrderType;
pub use points::PointStatus;
pub use users::AuthProvider;
