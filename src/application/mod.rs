//! Application layer - Use cases and orchestration

pub mod inspect;
pub mod report;
pub mod wordpress_migration;
pub mod writeas_migration;

pub use inspect::{inspect, PostSummary};
pub use report::{MigrationReport, SkippedPost};
pub use wordpress_migration::WordPressMigrationService;
pub use writeas_migration::WriteAsMigrationService;
