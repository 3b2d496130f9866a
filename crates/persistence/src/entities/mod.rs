//! Database entities (row mappings).

pub mod audit_log;
pub mod output_reading;
pub mod report;
pub mod unit;
pub mod user;

pub use audit_log::AuditLogEntity;
pub use output_reading::OutputReadingEntity;
pub use report::{QaReportEntity, QaTestEntity, ReportSummaryEntity};
pub use unit::UnitEntity;
pub use user::UserEntity;
