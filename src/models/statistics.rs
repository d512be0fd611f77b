//! Dashboard statistics payload

use super::Category;
use serde::{Deserialize, Serialize};

/// Which dataset the aggregation engine reads.
///
/// `Synthetic` produces plausible demo numbers for an empty dataset; it is
/// an explicit parameter so callers (and tests) choose it deliberately
/// instead of the engine silently inferring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    Live,
    Synthetic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total: usize,
    pub pending: usize,
    pub responded: usize,
    /// Percentage, rounded to one decimal; 0 when there are no items
    pub response_rate: f64,
    /// Mean whole-day latency over responded items; absent when none exist
    pub average_response_time_days: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    pub total: usize,
    pub pending: usize,
    pub responded: usize,
    pub response_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStats {
    /// `YYYY-MM` of the window start
    pub month: String,
    pub total: usize,
    pub responded: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStats {
    pub location: String,
    pub total: usize,
    pub responded: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStats {
    /// ISO date (`YYYY-MM-DD`)
    pub date: String,
    pub count: usize,
}

/// Admin view: per-day submission and response counts over the last
/// 30 days, oldest day first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatistics {
    pub total: usize,
    pub pending: usize,
    pub responded: usize,
    pub daily_stats: Vec<DailyStats>,
    pub response_stats: Vec<DailyStats>,
}

/// Composite payload for the public dashboard.
///
/// `synthetic` marks demo output; real and synthetic sections are never
/// mixed in one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub synthetic: bool,
    pub summary: SummaryStats,
    pub category_stats: Vec<CategoryStats>,
    pub monthly_stats: Vec<MonthlyStats>,
    pub location_stats: Vec<LocationStats>,
    pub most_problematic_category: CategoryStats,
    pub least_problematic_category: CategoryStats,
}
