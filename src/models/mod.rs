pub mod category;
pub mod config;
pub mod initiative;
pub mod statistics;

pub use category::Category;
pub use config::{AdminConfig, InitiativedConfig, LifecycleConfig, ServerConfig, SweepConfig, UrgencyConfig};
pub use initiative::{Initiative, InitiativeStatus, NewInitiative, ANONYMOUS_CONTACT};
pub use statistics::{
    AdminStatistics, CategoryStats, DailyStats, DataMode, LocationStats, MonthlyStats,
    StatisticsReport, SummaryStats,
};
