pub mod manager;
pub mod postgres;
