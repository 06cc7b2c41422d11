pub mod database;

pub use database::manager::DatabaseManager;
pub use database::postgres::PostgresTaskRepository;
