//! Reporting analytics.
//!
//! Pure aggregation over already-fetched report rows. Every function here is
//! total over any input slice, including the empty one: a malformed row
//! (missing timestamp) is excluded from the specific calculation that needs
//! the missing field, never dropped from totals, and never an error.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone};
use fasum_db::entities::{
    category,
    report::{self, Priority, ReportStatus},
};
use serde::Serialize;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Report counts per workflow status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    /// Baru. Rows with NULL status land here, never in `done`.
    pub new: u64,
    /// Menunggu.
    pub waiting: u64,
    /// Diproses.
    pub in_progress: u64,
    /// Selesai.
    pub done: u64,
}

/// Report counts per elevated priority. Normal-priority rows (including NULL
/// priority) count toward the total only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCounts {
    /// Rendah.
    pub low: u64,
    /// Sedang.
    pub medium: u64,
    /// Tinggi.
    pub high: u64,
    /// Mendesak.
    pub urgent: u64,
}

/// Status/priority overview of a report set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Every input row, regardless of field completeness.
    pub total: u64,
    /// Counts per status.
    pub by_status: StatusCounts,
    /// Counts per elevated priority.
    pub by_priority: PriorityCounts,
    /// `round(100 * done / total)`; 0 when the set is empty.
    pub resolution_rate_percent: u8,
    /// Rows created on or after the first day of the current month.
    /// Rows without a creation timestamp are excluded here but kept in `total`.
    pub this_month: u64,
}

/// Per-category rollup. Categories with zero associated reports are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    /// Category id.
    pub category_id: i32,
    /// Category name.
    pub name: String,
    /// Reports referencing this category.
    pub total: u64,
    /// Of those, currently Done.
    pub resolved: u64,
    /// Of those, not Done.
    pub pending: u64,
    /// `round(100 * resolved / total)`.
    pub percentage: u8,
}

/// One calendar-day slot of the trailing-window series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    /// Local calendar day.
    pub date: NaiveDate,
    /// Reports whose creation timestamp falls on this day.
    pub created: u64,
    /// Reports whose resolution timestamp falls on this day.
    pub resolved: u64,
    /// Among this day's created reports, those whose status is not Done
    /// *at query time*. Current status counted against a historical bucket,
    /// intentionally.
    pub still_pending: u64,
}

/// Elapsed-day statistics over resolved reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionTime {
    /// Arithmetic mean, rounded to the nearest day.
    pub average_days: i64,
    /// Minimum.
    pub fastest_days: i64,
    /// Maximum.
    pub slowest_days: i64,
}

fn percent(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part * 100) as f64 / total as f64).round() as u8
}

/// Reduce a report set into status counts, priority counts, the resolution
/// rate, and the current-month count.
#[must_use]
pub fn overview(reports: &[report::Model], now: DateTime<FixedOffset>) -> Overview {
    let mut by_status = StatusCounts::default();
    let mut by_priority = PriorityCounts::default();
    let mut this_month = 0;

    let month_start = now
        .timezone()
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single();

    for r in reports {
        match r.effective_status() {
            ReportStatus::New => by_status.new += 1,
            ReportStatus::Waiting => by_status.waiting += 1,
            ReportStatus::InProgress => by_status.in_progress += 1,
            ReportStatus::Done => by_status.done += 1,
        }

        match r.effective_priority() {
            Priority::Normal => {}
            Priority::Low => by_priority.low += 1,
            Priority::Medium => by_priority.medium += 1,
            Priority::High => by_priority.high += 1,
            Priority::Urgent => by_priority.urgent += 1,
        }

        let in_month = match (r.created_at, month_start) {
            (Some(created), Some(start)) => created >= start,
            _ => false,
        };
        if in_month {
            this_month += 1;
        }
    }

    let total = reports.len() as u64;

    Overview {
        total,
        resolution_rate_percent: percent(by_status.done, total),
        by_status,
        by_priority,
        this_month,
    }
}

/// Group reports by category.
///
/// Output order follows the input category order; categories with no
/// associated reports are omitted rather than zero-filled. Uncategorized
/// reports (NULL `category_id`) do not appear in any entry.
#[must_use]
pub fn category_breakdown(
    reports: &[report::Model],
    categories: &[category::Model],
) -> Vec<CategoryStat> {
    let mut totals: HashMap<i32, (u64, u64)> = HashMap::new();

    for r in reports {
        if let Some(category_id) = r.category_id {
            let entry = totals.entry(category_id).or_default();
            entry.0 += 1;
            if r.is_done() {
                entry.1 += 1;
            }
        }
    }

    categories
        .iter()
        .filter_map(|c| {
            let (total, resolved) = totals.get(&c.id).copied()?;
            Some(CategoryStat {
                category_id: c.id,
                name: c.name.clone(),
                total,
                resolved,
                pending: total - resolved,
                percentage: percent(resolved, total),
            })
        })
        .collect()
}

/// Bucket reports by calendar day over a trailing window.
///
/// Returns exactly `window_days` buckets, oldest to newest, ending on the
/// local calendar day of `now`. Reports without a creation timestamp fall
/// into no bucket.
#[must_use]
pub fn daily_series(
    reports: &[report::Model],
    window_days: u32,
    now: DateTime<FixedOffset>,
) -> Vec<DayBucket> {
    let tz = now.timezone();
    let today = now.date_naive();

    let mut created: HashMap<NaiveDate, u64> = HashMap::new();
    let mut resolved: HashMap<NaiveDate, u64> = HashMap::new();
    let mut still_pending: HashMap<NaiveDate, u64> = HashMap::new();

    for r in reports {
        if let Some(at) = r.created_at {
            let day = at.with_timezone(&tz).date_naive();
            *created.entry(day).or_default() += 1;
            if !r.is_done() {
                *still_pending.entry(day).or_default() += 1;
            }
        }
        if let Some(at) = r.resolved_at {
            let day = at.with_timezone(&tz).date_naive();
            *resolved.entry(day).or_default() += 1;
        }
    }

    (0..window_days)
        .rev()
        .map(|i| {
            let date = today - Duration::days(i64::from(i));
            DayBucket {
                date,
                created: created.get(&date).copied().unwrap_or(0),
                resolved: resolved.get(&date).copied().unwrap_or(0),
                still_pending: still_pending.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Compute elapsed-day statistics over Done reports carrying both a creation
/// and a resolution timestamp. A Done report missing either timestamp is
/// silently excluded. All fields are 0 when no report qualifies.
#[must_use]
pub fn resolution_time(reports: &[report::Model]) -> ResolutionTime {
    let durations: Vec<i64> = reports
        .iter()
        .filter(|r| r.is_done())
        .filter_map(|r| match (r.created_at, r.resolved_at) {
            (Some(created), Some(resolved)) => {
                let millis = (resolved - created).num_milliseconds();
                Some((millis as f64 / MILLIS_PER_DAY).round() as i64)
            }
            _ => None,
        })
        .collect();

    if durations.is_empty() {
        return ResolutionTime::default();
    }

    let sum: i64 = durations.iter().sum();
    let average_days = (sum as f64 / durations.len() as f64).round() as i64;

    ResolutionTime {
        average_days,
        fastest_days: durations.iter().copied().min().unwrap_or(0),
        slowest_days: durations.iter().copied().max().unwrap_or(0),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::prelude::Json;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn fixed_now() -> DateTime<FixedOffset> {
        ts("2024-01-15T12:00:00+00:00")
    }

    fn make_report(
        id: i32,
        status: Option<ReportStatus>,
        created_at: Option<&str>,
        resolved_at: Option<&str>,
    ) -> report::Model {
        report::Model {
            id,
            title: format!("Report {id}"),
            description: None,
            image_urls: Json::Array(vec![]),
            latitude: None,
            longitude: None,
            location_name: None,
            category_id: None,
            priority: None,
            status,
            admin_notes: None,
            resolved_at: resolved_at.map(ts),
            user_id: "u1".to_string(),
            reported_by: None,
            created_at: created_at.map(ts),
            updated_at: None,
        }
    }

    fn make_category(id: i32, name: &str) -> category::Model {
        category::Model {
            id,
            name: name.to_string(),
            icon: None,
            color: None,
            is_active: true,
            created_at: ts("2024-01-01T00:00:00+00:00"),
            updated_at: None,
        }
    }

    #[test]
    fn test_overview_status_buckets_sum_to_total() {
        let reports = vec![
            make_report(1, Some(ReportStatus::New), Some("2024-01-02T08:00:00+00:00"), None),
            make_report(2, Some(ReportStatus::Waiting), Some("2024-01-03T08:00:00+00:00"), None),
            make_report(3, Some(ReportStatus::InProgress), None, None),
            make_report(
                4,
                Some(ReportStatus::Done),
                Some("2024-01-04T08:00:00+00:00"),
                Some("2024-01-10T08:00:00+00:00"),
            ),
            // NULL status reads as New, never as Done.
            make_report(5, None, Some("2024-01-05T08:00:00+00:00"), None),
        ];

        let stats = overview(&reports, fixed_now());

        assert_eq!(stats.total, 5);
        assert_eq!(stats.by_status.new, 2);
        assert_eq!(stats.by_status.waiting, 1);
        assert_eq!(stats.by_status.in_progress, 1);
        assert_eq!(stats.by_status.done, 1);
        assert_eq!(
            stats.by_status.new
                + stats.by_status.waiting
                + stats.by_status.in_progress
                + stats.by_status.done,
            stats.total
        );
    }

    #[test]
    fn test_overview_resolution_rate_bounds() {
        let all_done: Vec<_> = (0..4)
            .map(|i| {
                make_report(
                    i,
                    Some(ReportStatus::Done),
                    Some("2024-01-02T08:00:00+00:00"),
                    Some("2024-01-03T08:00:00+00:00"),
                )
            })
            .collect();

        assert_eq!(overview(&all_done, fixed_now()).resolution_rate_percent, 100);
        assert_eq!(overview(&[], fixed_now()).resolution_rate_percent, 0);

        let one_of_three = vec![
            make_report(1, Some(ReportStatus::Done), None, None),
            make_report(2, Some(ReportStatus::New), None, None),
            make_report(3, Some(ReportStatus::New), None, None),
        ];
        // round(100 / 3) = 33
        assert_eq!(overview(&one_of_three, fixed_now()).resolution_rate_percent, 33);
    }

    #[test]
    fn test_overview_priority_defaults_to_normal() {
        let mut high = make_report(1, None, None, None);
        high.priority = Some(Priority::High);
        let reports = vec![
            high,
            // NULL priority reads as Normal: counted in total only.
            make_report(2, None, None, None),
        ];

        let stats = overview(&reports, fixed_now());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_priority.high, 1);
        assert_eq!(stats.by_priority.low, 0);
        assert_eq!(stats.by_priority.medium, 0);
        assert_eq!(stats.by_priority.urgent, 0);
    }

    #[test]
    fn test_overview_this_month_window() {
        let reports = vec![
            // Inside the current month (now = 2024-01-15).
            make_report(1, None, Some("2024-01-01T00:00:00+00:00"), None),
            make_report(2, None, Some("2024-01-14T23:59:59+00:00"), None),
            // Previous month.
            make_report(3, None, Some("2023-12-31T23:59:59+00:00"), None),
            // Missing timestamp: excluded from this_month, kept in total.
            make_report(4, None, None, None),
        ];

        let stats = overview(&reports, fixed_now());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.this_month, 2);
    }

    #[test]
    fn test_category_breakdown_omits_empty_categories() {
        let categories = vec![
            make_category(1, "Jalan"),
            make_category(2, "Taman"),
            make_category(3, "Lampu"),
        ];
        let mut r1 = make_report(
            1,
            Some(ReportStatus::Done),
            Some("2024-01-02T08:00:00+00:00"),
            Some("2024-01-04T08:00:00+00:00"),
        );
        r1.category_id = Some(1);
        let mut r2 = make_report(2, Some(ReportStatus::New), None, None);
        r2.category_id = Some(1);
        // Uncategorized: appears in no entry.
        let r3 = make_report(3, Some(ReportStatus::New), None, None);

        let breakdown = category_breakdown(&[r1, r2, r3], &categories);

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, "Jalan");
        assert_eq!(breakdown[0].total, 2);
        assert_eq!(breakdown[0].resolved, 1);
        assert_eq!(breakdown[0].pending, 1);
        assert_eq!(breakdown[0].percentage, 50);
    }

    #[test]
    fn test_category_breakdown_preserves_input_order() {
        let categories = vec![make_category(2, "Taman"), make_category(1, "Jalan")];
        let mut r1 = make_report(1, None, None, None);
        r1.category_id = Some(1);
        let mut r2 = make_report(2, None, None, None);
        r2.category_id = Some(2);

        let breakdown = category_breakdown(&[r1, r2], &categories);
        let names: Vec<_> = breakdown.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Taman", "Jalan"]);
    }

    #[test]
    fn test_daily_series_always_full_window() {
        let series = daily_series(&[], 30, fixed_now());
        assert_eq!(series.len(), 30);
        assert!(series.iter().all(|b| b.created == 0 && b.resolved == 0));
        // Oldest to newest, ending today.
        assert_eq!(series[29].date, fixed_now().date_naive());
        assert_eq!(
            series[0].date,
            fixed_now().date_naive() - Duration::days(29)
        );
    }

    #[test]
    fn test_daily_series_counts_by_local_day() {
        let reports = vec![
            make_report(1, Some(ReportStatus::New), Some("2024-01-14T09:00:00+00:00"), None),
            make_report(2, Some(ReportStatus::New), Some("2024-01-14T22:00:00+00:00"), None),
            make_report(
                3,
                Some(ReportStatus::Done),
                Some("2024-01-10T08:00:00+00:00"),
                Some("2024-01-14T10:00:00+00:00"),
            ),
            // No created_at: in no bucket.
            make_report(4, Some(ReportStatus::New), None, None),
        ];

        let series = daily_series(&reports, 30, fixed_now());
        let day = series
            .iter()
            .find(|b| b.date == ts("2024-01-14T00:00:00+00:00").date_naive())
            .unwrap();

        assert_eq!(day.created, 2);
        assert_eq!(day.resolved, 1);
        assert_eq!(day.still_pending, 2);
        assert_eq!(series.iter().map(|b| b.created).sum::<u64>(), 3);
    }

    #[test]
    fn test_daily_series_pending_uses_current_status() {
        // Created on the 10th, resolved on the 14th: the 10th's bucket shows
        // zero pending because "pending" reflects status at query time.
        let reports = vec![make_report(
            1,
            Some(ReportStatus::Done),
            Some("2024-01-10T08:00:00+00:00"),
            Some("2024-01-14T10:00:00+00:00"),
        )];

        let series = daily_series(&reports, 30, fixed_now());
        let created_day = series
            .iter()
            .find(|b| b.date == ts("2024-01-10T00:00:00+00:00").date_naive())
            .unwrap();

        assert_eq!(created_day.created, 1);
        assert_eq!(created_day.still_pending, 0);
    }

    #[test]
    fn test_resolution_time_statistics() {
        let reports = vec![
            make_report(
                1,
                Some(ReportStatus::Done),
                Some("2024-01-01T00:00:00+00:00"),
                Some("2024-01-05T00:00:00+00:00"),
            ),
            make_report(
                2,
                Some(ReportStatus::Done),
                Some("2024-01-01T00:00:00+00:00"),
                Some("2024-01-11T00:00:00+00:00"),
            ),
            // Open report: does not qualify.
            make_report(3, Some(ReportStatus::New), Some("2024-01-10T00:00:00+00:00"), None),
        ];

        let stats = resolution_time(&reports);
        assert_eq!(stats.fastest_days, 4);
        assert_eq!(stats.slowest_days, 10);
        assert_eq!(stats.average_days, 7);
    }

    #[test]
    fn test_resolution_time_excludes_done_without_created_at() {
        let reports = vec![make_report(
            1,
            Some(ReportStatus::Done),
            None,
            Some("2024-01-05T00:00:00+00:00"),
        )];

        // Counted as Done in the overview...
        assert_eq!(overview(&reports, fixed_now()).by_status.done, 1);
        // ...but contributes nothing to resolution-time statistics.
        assert_eq!(resolution_time(&reports), ResolutionTime::default());
    }

    #[test]
    fn test_resolution_time_rounds_sub_day_spans() {
        // 36 hours rounds to 2 days.
        let reports = vec![make_report(
            1,
            Some(ReportStatus::Done),
            Some("2024-01-01T00:00:00+00:00"),
            Some("2024-01-02T12:00:00+00:00"),
        )];

        assert_eq!(resolution_time(&reports).average_days, 2);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let reports = vec![
            make_report(
                1,
                Some(ReportStatus::Done),
                Some("2024-01-01T00:00:00+00:00"),
                Some("2024-01-05T00:00:00+00:00"),
            ),
            make_report(2, Some(ReportStatus::New), Some("2024-01-10T00:00:00+00:00"), None),
        ];

        let stats = overview(&reports, fixed_now());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.done, 1);
        assert_eq!(stats.by_status.new, 1);
        assert_eq!(stats.resolution_rate_percent, 50);
        assert_eq!(resolution_time(&reports).average_days, 4);
    }

    #[test]
    fn test_empty_input_yields_zero_valued_structures() {
        assert_eq!(overview(&[], fixed_now()), Overview::default());
        assert_eq!(category_breakdown(&[], &[make_category(1, "Jalan")]), vec![]);
        assert_eq!(daily_series(&[], 7, fixed_now()).len(), 7);
        assert_eq!(resolution_time(&[]), ResolutionTime::default());
    }

    #[test]
    fn test_series_respects_now_offset() {
        // 2024-01-15T01:00+07:00 is still 2024-01-14 in UTC; the bucket
        // boundary follows the caller's offset.
        let now = ts("2024-01-15T01:00:00+07:00");
        let reports = vec![make_report(
            1,
            Some(ReportStatus::New),
            Some("2024-01-14T20:00:00+00:00"),
            None,
        )];

        let series = daily_series(&reports, 2, now);
        assert_eq!(series[1].date, now.date_naive());
        // 20:00 UTC is 03:00+07:00 the next day.
        assert_eq!(series[1].created, 1);
    }
}
