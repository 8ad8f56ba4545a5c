pub mod email;
pub mod jwt;
pub mod order_number;
pub mod password;

pub use email::*;
pub use jwt::*;
pub use order_number::*;
pub use password::*;
