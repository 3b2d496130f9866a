//! Repositories for database operations.

pub mod audit_log;
pub mod dashboard;
pub mod export;
pub mod output;
pub mod report;
pub mod unit;
pub mod user;

pub use audit_log::AuditLogRepository;
pub use dashboard::DashboardRepository;
pub use export::ExportRepository;
pub use output::OutputReadingRepository;
pub use report::ReportRepository;
pub use unit::UnitRepository;
pub use user::UserRepository;

/// Whether a sqlx error is a PostgreSQL unique violation (SQLSTATE 23505).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
