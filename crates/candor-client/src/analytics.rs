//! Dashboard aggregates over fetched feedback records.
//!
//! All computations are pure.  The trailing-week trend buckets by local
//! calendar day; the day mapping and "today" are injected so tests stay
//! deterministic regardless of machine timezone.

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

use candor_shared::AdminFeedbackRecord;

/// One day of the submission trend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCount {
    pub day: NaiveDate,
    pub count: usize,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    /// Counts per category, in first-seen order.
    pub by_category: Vec<(String, usize)>,
    /// Counts per subcategory, in first-seen order.
    pub by_subcategory: Vec<(String, usize)>,
    /// Trailing 7 days ending today, oldest first.
    pub daily_trend: Vec<DayCount>,
    /// Display name of the most frequent submitter (ties go to the first
    /// one encountered).
    pub most_active_user: Option<String>,
}

/// Keep only records submitted within the trailing `days` window.
pub fn within_last_days<'a>(
    records: &'a [AdminFeedbackRecord],
    days: i64,
    now: DateTime<Utc>,
) -> Vec<&'a AdminFeedbackRecord> {
    let cutoff = now - Duration::days(days);
    records
        .iter()
        .filter(|r| r.submitted_at >= cutoff)
        .collect()
}

/// Compute dashboard stats with today's local date.
pub fn dashboard_stats(records: &[AdminFeedbackRecord]) -> DashboardStats {
    stats_at(records, Local::now().date_naive(), |ts| {
        ts.with_timezone(&Local).date_naive()
    })
}

/// Compute dashboard stats against an explicit `today` and timestamp→day
/// mapping.
pub fn stats_at(
    records: &[AdminFeedbackRecord],
    today: NaiveDate,
    local_day: impl Fn(&DateTime<Utc>) -> NaiveDate,
) -> DashboardStats {
    let by_category = count_by(records, |r| r.category.as_str());
    let by_subcategory = count_by(records, |r| r.subcategory.as_str());

    let daily_trend = (0..7)
        .map(|i| {
            let day = today - Duration::days(6 - i);
            let count = records
                .iter()
                .filter(|r| local_day(&r.submitted_at) == day)
                .count();
            DayCount { day, count }
        })
        .collect();

    // First-seen wins ties, so iterate rather than max_by_key (which
    // keeps the last maximum).
    let submissions_per_user = count_by(records, |r| r.full_name.as_str());
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in &submissions_per_user {
        if best.map_or(true, |(_, top)| *count > top) {
            best = Some((name, *count));
        }
    }
    let most_active_user = best.map(|(name, _)| name.to_string());

    DashboardStats {
        total: records.len(),
        by_category,
        by_subcategory,
        daily_trend,
        most_active_user,
    }
}

/// Count records per key, preserving first-seen order.
fn count_by<'a>(
    records: &'a [AdminFeedbackRecord],
    key: impl Fn(&'a AdminFeedbackRecord) -> &'a str,
) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let k = key(record);
        match counts.iter_mut().find(|(name, _)| name == k) {
            Some((_, count)) => *count += 1,
            None => counts.push((k.to_string(), 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_shared::SentimentLabel;
    use chrono::{Datelike, TimeZone, Utc};

    fn record(name: &str, category: &str, subcategory: &str, day: u32) -> AdminFeedbackRecord {
        AdminFeedbackRecord {
            id: 0,
            heading: "h".into(),
            category: category.into(),
            subcategory: subcategory.into(),
            message: "m".into(),
            submitted_at: Utc.with_ymd_and_hms(2026, 8, day, 10, 0, 0).unwrap(),
            image_url: None,
            full_name: name.into(),
            email: format!("{name}@example.com"),
            sentiment: SentimentLabel::Neutral,
        }
    }

    fn utc_day(ts: &DateTime<Utc>) -> NaiveDate {
        ts.date_naive()
    }

    #[test]
    fn counts_preserve_first_seen_order() {
        let records = vec![
            record("Ana", "Services", "Transportation", 1),
            record("Bo", "Events", "Hackathons", 2),
            record("Ana", "Services", "IT Support Services", 3),
        ];

        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let stats = stats_at(&records, today, utc_day);

        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.by_category,
            vec![("Services".to_string(), 2), ("Events".to_string(), 1)]
        );
        assert_eq!(stats.by_subcategory.len(), 3);
    }

    #[test]
    fn trend_covers_exactly_the_trailing_week() {
        let records = vec![
            record("Ana", "Others", "Other", 1),
            record("Ana", "Others", "Other", 6),
            record("Ana", "Others", "Other", 6),
            record("Ana", "Others", "Other", 7),
        ];

        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let stats = stats_at(&records, today, utc_day);

        assert_eq!(stats.daily_trend.len(), 7);
        assert_eq!(
            stats.daily_trend[0].day,
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
        );
        assert_eq!(stats.daily_trend[0].count, 1);
        assert_eq!(stats.daily_trend[5].count, 2); // Aug 6
        assert_eq!(stats.daily_trend[6].count, 1); // today
        // Aug 2..=5 are empty days, still present in the series.
        assert!(stats.daily_trend[1..5].iter().all(|d| d.count == 0));
    }

    #[test]
    fn most_active_user_ties_go_to_first_seen() {
        let records = vec![
            record("Ana", "Others", "Other", 1),
            record("Bo", "Others", "Other", 2),
            record("Bo", "Others", "Other", 3),
            record("Ana", "Others", "Other", 4),
        ];

        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let stats = stats_at(&records, today, utc_day);
        assert_eq!(stats.most_active_user.as_deref(), Some("Ana"));
    }

    #[test]
    fn empty_feed_has_no_most_active_user() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let stats = stats_at(&[], today, utc_day);
        assert_eq!(stats.most_active_user, None);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.daily_trend.len(), 7);
    }

    #[test]
    fn date_range_filter_is_inclusive_of_the_window() {
        let records = vec![
            record("Ana", "Others", "Other", 1),
            record("Ana", "Others", "Other", 7),
        ];

        let now = Utc.with_ymd_and_hms(2026, 8, 7, 23, 0, 0).unwrap();
        let recent = within_last_days(&records, 3, now);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].submitted_at.date_naive().day(), 7);
    }
}
