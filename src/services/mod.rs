pub mod auth_service;
pub mod cashier_service;
pub mod order_service;
pub mod point_service;

pub use auth_service::AuthService;
pub use cashier_service::CashierService;
pub use order_service::OrderService;
pub use point_service::PointService;
