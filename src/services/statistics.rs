//! Aggregation engine
//!
//! Computes the dashboard statistics payload in a single pass over the
//! item set. `DataMode::Synthetic` generates plausible demo numbers for an
//! empty dataset; callers choose the mode explicitly and every random draw
//! goes through the supplied `Rng`, so tests stay deterministic.

use crate::models::{
    AdminStatistics, Category, CategoryStats, DailyStats, DataMode, Initiative, LocationStats,
    MonthlyStats, StatisticsReport, SummaryStats,
};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;

/// Number of 30-day windows in the monthly breakdown
pub const MONTHLY_WINDOWS: usize = 6;

/// Cap on the location breakdown
pub const LOCATION_LIMIT: usize = 10;

/// Days covered by the admin daily breakdown
pub const DAILY_WINDOW_DAYS: usize = 30;

/// Demo districts for synthetic location statistics
const DEMO_LOCATIONS: [&str; 10] = [
    "Center", "Bežigrad", "Šiška", "Vič", "Moste", "Sostro", "Šentvid", "Rožnik", "Trnovo",
    "Polje",
];

/// Build the full statistics report.
pub fn compute_statistics(
    items: &[Initiative],
    mode: DataMode,
    now: DateTime<Utc>,
    rng: &mut impl Rng,
) -> StatisticsReport {
    match mode {
        DataMode::Live => live_report(items, now),
        DataMode::Synthetic => synthetic_report(now, rng),
    }
}

/// Per-day submission and response counts for the admin dashboard.
///
/// Covers today and the 29 preceding days, oldest day first, with
/// zero-filled entries so the series always has exactly
/// `DAILY_WINDOW_DAYS` points.
pub fn compute_admin_statistics(items: &[Initiative], now: DateTime<Utc>) -> AdminStatistics {
    let today = now.date_naive();
    let mut created_counts = vec![0usize; DAILY_WINDOW_DAYS];
    let mut responded_counts = vec![0usize; DAILY_WINDOW_DAYS];
    let mut responded = 0;

    for item in items {
        if item.is_responded() {
            responded += 1;
        }

        let created_days_ago = (today - item.created_at.date_naive()).num_days();
        if (0..DAILY_WINDOW_DAYS as i64).contains(&created_days_ago) {
            created_counts[created_days_ago as usize] += 1;
        }

        if let Some(responded_at) = item.responded_at {
            let responded_days_ago = (today - responded_at.date_naive()).num_days();
            if (0..DAILY_WINDOW_DAYS as i64).contains(&responded_days_ago) {
                responded_counts[responded_days_ago as usize] += 1;
            }
        }
    }

    let series = |counts: &[usize]| -> Vec<DailyStats> {
        (0..DAILY_WINDOW_DAYS)
            .rev()
            .map(|days_ago| DailyStats {
                date: (today - Duration::days(days_ago as i64)).to_string(),
                count: counts[days_ago],
            })
            .collect()
    };

    AdminStatistics {
        total: items.len(),
        pending: items.len() - responded,
        responded,
        daily_stats: series(&created_counts),
        response_stats: series(&responded_counts),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rate in percent; zero denominators short-circuit to 0
fn rate(responded: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(responded as f64 / total as f64 * 100.0)
    }
}

/// Window `i` covers `[now - 30(i+1)d, now - 30i d)`, labeled by its start
fn window_label(now: DateTime<Utc>, i: usize) -> String {
    let start = now - Duration::days(30 * (i as i64 + 1));
    start.format("%Y-%m").to_string()
}

fn live_report(items: &[Initiative], now: DateTime<Utc>) -> StatisticsReport {
    let total = items.len();
    let mut responded = 0;

    let mut by_category: HashMap<Category, (usize, usize)> = HashMap::new();
    let mut monthly = vec![(0usize, 0usize); MONTHLY_WINDOWS];
    let mut location_order: Vec<String> = Vec::new();
    let mut by_location: HashMap<String, (usize, usize)> = HashMap::new();
    let mut response_days_sum = 0i64;
    let mut response_days_count = 0usize;

    for item in items {
        let is_responded = item.is_responded();
        if is_responded {
            responded += 1;
        }

        let cat = by_category.entry(item.category).or_insert((0, 0));
        cat.0 += 1;
        if is_responded {
            cat.1 += 1;
        }

        for (i, window) in monthly.iter_mut().enumerate() {
            let end = now - Duration::days(30 * i as i64);
            let start = now - Duration::days(30 * (i as i64 + 1));
            if item.created_at >= start && item.created_at < end {
                window.0 += 1;
                if is_responded {
                    window.1 += 1;
                }
                break;
            }
        }

        if !by_location.contains_key(&item.location) && by_location.len() < LOCATION_LIMIT {
            location_order.push(item.location.clone());
        }
        if let Some(loc) = by_location.get_mut(&item.location) {
            loc.0 += 1;
            if is_responded {
                loc.1 += 1;
            }
        } else if by_location.len() < LOCATION_LIMIT {
            by_location.insert(item.location.clone(), (1, if is_responded { 1 } else { 0 }));
        }

        if let Some(responded_at) = item.responded_at {
            let days = (responded_at.date_naive() - item.created_at.date_naive()).num_days();
            response_days_sum += days;
            response_days_count += 1;
        }
    }

    let category_stats: Vec<CategoryStats> = Category::ALL
        .iter()
        .map(|&category| {
            let (cat_total, cat_responded) = by_category.get(&category).copied().unwrap_or((0, 0));
            CategoryStats {
                category,
                total: cat_total,
                pending: cat_total - cat_responded,
                responded: cat_responded,
                response_rate: rate(cat_responded, cat_total),
            }
        })
        .collect();

    let monthly_stats: Vec<MonthlyStats> = monthly
        .iter()
        .enumerate()
        .map(|(i, &(m_total, m_responded))| MonthlyStats {
            month: window_label(now, i),
            total: m_total,
            responded: m_responded,
        })
        .collect();

    let location_stats: Vec<LocationStats> = location_order
        .iter()
        .map(|location| {
            let (l_total, l_responded) = by_location[location];
            LocationStats {
                location: location.clone(),
                total: l_total,
                responded: l_responded,
                pending: l_total - l_responded,
            }
        })
        .collect();

    let average_response_time_days = if response_days_count > 0 {
        Some(round1(response_days_sum as f64 / response_days_count as f64))
    } else {
        None
    };

    let (most_problematic, least_problematic) = extremes(&category_stats);

    StatisticsReport {
        synthetic: false,
        summary: SummaryStats {
            total,
            pending: total - responded,
            responded,
            response_rate: rate(responded, total),
            average_response_time_days,
        },
        category_stats,
        monthly_stats,
        location_stats,
        most_problematic_category: most_problematic,
        least_problematic_category: least_problematic,
    }
}

/// Lowest and highest response rate; ties break to the first occurrence in
/// the fixed category order for both.
fn extremes(category_stats: &[CategoryStats]) -> (CategoryStats, CategoryStats) {
    let mut most = &category_stats[0];
    let mut least = &category_stats[0];
    for stats in &category_stats[1..] {
        if stats.response_rate < most.response_rate {
            most = stats;
        }
        if stats.response_rate > least.response_rate {
            least = stats;
        }
    }
    (most.clone(), least.clone())
}

/// Plausible demo statistics for a freshly seeded environment.
///
/// The summary is derived from the synthetic category rows so the counts
/// stay internally consistent.
fn synthetic_report(now: DateTime<Utc>, rng: &mut impl Rng) -> StatisticsReport {
    let category_stats: Vec<CategoryStats> = Category::ALL
        .iter()
        .map(|&category| {
            let total = rng.gen_range(5..=50);
            let responded = rng.gen_range(0..=total);
            CategoryStats {
                category,
                total,
                pending: total - responded,
                responded,
                response_rate: rate(responded, total),
            }
        })
        .collect();

    let monthly_stats: Vec<MonthlyStats> = (0..MONTHLY_WINDOWS)
        .map(|i| {
            let total = rng.gen_range(10..=100);
            MonthlyStats {
                month: window_label(now, i),
                total,
                responded: rng.gen_range(0..=total),
            }
        })
        .collect();

    let location_stats: Vec<LocationStats> = DEMO_LOCATIONS
        .iter()
        .map(|&location| {
            let total = rng.gen_range(3..=25);
            let responded = rng.gen_range(0..=total);
            LocationStats {
                location: location.to_string(),
                total,
                responded,
                pending: total - responded,
            }
        })
        .collect();

    let total: usize = category_stats.iter().map(|c| c.total).sum();
    let responded: usize = category_stats.iter().map(|c| c.responded).sum();
    let (most_problematic, least_problematic) = extremes(&category_stats);

    StatisticsReport {
        synthetic: true,
        summary: SummaryStats {
            total,
            pending: total - responded,
            responded,
            response_rate: rate(responded, total),
            average_response_time_days: Some(round1(rng.gen_range(2.5..8.0))),
        },
        category_stats,
        monthly_stats,
        location_stats,
        most_problematic_category: most_problematic,
        least_problematic_category: least_problematic,
    }
}
