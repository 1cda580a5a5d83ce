pub mod config;
pub mod goal;
pub mod habit;
pub mod todo;
