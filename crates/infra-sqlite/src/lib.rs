// Runner Infrastructure - SQLite Adapter
// Implements: SubmissionRepository

mod connection;
mod migration;
mod submission_repository;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use submission_repository::SqliteSubmissionRepository;

// Note: sqlx::Error conversion is handled by a helper function
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
