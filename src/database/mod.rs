pub mod connection;

pub use connection::{create_connection, run_migrations};
