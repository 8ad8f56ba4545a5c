pub mod cashier;
pub mod order;
pub mod pagination;
pub mod point;
pub mod user;

pub use cashier::*;
pub use order::*;
pub use pagination::*;
pub use point::*;
pub use user::*;
