//! Display-side filtering and pagination of the administrative feed.

use chrono::NaiveDate;

use candor_shared::AdminFeedbackRecord;

/// Fixed page size used by the review table.
pub const PAGE_SIZE: usize = 6;

/// Filter criteria; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct FeedFilter {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    /// Exact-day match against the submission timestamp's UTC date.
    pub date: Option<NaiveDate>,
}

impl FeedFilter {
    pub fn matches(&self, record: &AdminFeedbackRecord) -> bool {
        if let Some(category) = &self.category {
            if record.category != *category {
                return false;
            }
        }
        if let Some(subcategory) = &self.subcategory {
            if record.subcategory != *subcategory {
                return false;
            }
        }
        if let Some(date) = self.date {
            if record.submitted_at.date_naive() != date {
                return false;
            }
        }
        true
    }

    /// Apply the filter, preserving the input order.
    pub fn apply<'a>(&self, records: &'a [AdminFeedbackRecord]) -> Vec<&'a AdminFeedbackRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// One fixed-size page of `items` (1-based page numbers).  Out-of-range
/// pages are empty rather than an error.
pub fn page_of<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1) * page_size;
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `len` items, rounding up.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        len.div_ceil(page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candor_shared::SentimentLabel;
    use chrono::{TimeZone, Utc};

    fn record(category: &str, subcategory: &str, day: u32) -> AdminFeedbackRecord {
        AdminFeedbackRecord {
            id: day as i64,
            heading: "h".into(),
            category: category.into(),
            subcategory: subcategory.into(),
            message: "m".into(),
            submitted_at: Utc.with_ymd_and_hms(2026, 8, day, 12, 0, 0).unwrap(),
            image_url: None,
            full_name: "Ana".into(),
            email: "ana@example.com".into(),
            sentiment: SentimentLabel::Neutral,
        }
    }

    #[test]
    fn category_and_date_must_both_match() {
        let records = vec![
            record("Services", "Transportation", 1),
            record("Services", "Transportation", 2),
            record("Events", "Hackathons", 1),
        ];

        let filter = FeedFilter {
            category: Some("Services".into()),
            subcategory: None,
            date: NaiveDate::from_ymd_opt(2026, 8, 1),
        };

        let matched = filter.apply(&records);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].category, "Services");
        assert_eq!(matched[0].id, 1);
    }

    #[test]
    fn category_alone_ignores_subcategory() {
        let records = vec![
            record("Department", "HR", 1),
            record("Department", "Development", 2),
            record("Others", "Other", 3),
        ];

        let filter = FeedFilter {
            category: Some("Department".into()),
            ..FeedFilter::default()
        };

        assert_eq!(filter.apply(&records).len(), 2);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let records = vec![record("Events", "Tech Talks", 4)];
        assert_eq!(FeedFilter::default().apply(&records).len(), 1);
    }

    #[test]
    fn pagination_is_fixed_size_and_one_based() {
        let items: Vec<u32> = (0..14).collect();

        assert_eq!(page_of(&items, 1, PAGE_SIZE), &[0, 1, 2, 3, 4, 5]);
        assert_eq!(page_of(&items, 2, PAGE_SIZE), &[6, 7, 8, 9, 10, 11]);
        assert_eq!(page_of(&items, 3, PAGE_SIZE), &[12, 13]);
        assert!(page_of(&items, 4, PAGE_SIZE).is_empty());
        assert!(page_of(&items, 0, PAGE_SIZE).is_empty());

        assert_eq!(total_pages(14, PAGE_SIZE), 3);
        assert_eq!(total_pages(12, PAGE_SIZE), 2);
        assert_eq!(total_pages(0, PAGE_SIZE), 0);
    }
}
