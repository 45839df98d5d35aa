use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::Datelike;

use super::model::ContractDataset;

/// Agencies kept in the per-agency amount distribution.
pub const TOP_AGENCIES: usize = 10;

// ---------------------------------------------------------------------------
// YearMonth – timeline bucket key
// ---------------------------------------------------------------------------

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// AggregateView – summary statistics over the filtered subset
// ---------------------------------------------------------------------------

/// Derived views recomputed whenever the filter criteria change.
/// Always computed from the filtered indices, never the full dataset.
#[derive(Debug, Clone, Default)]
pub struct AggregateView {
    pub total_contracts: usize,
    pub total_award_amount: f64,
    pub unique_recipients: usize,
    /// Records carrying each theme tag, descending by count, ties by tag
    /// name. A record with N tags contributes to N buckets; absent tags are
    /// omitted rather than listed with zero.
    pub theme_distribution: Vec<(String, usize)>,
    /// Summed award amount per agency, top [`TOP_AGENCIES`] only, descending
    /// by amount, ties by agency name.
    pub agency_totals: Vec<(String, f64)>,
    /// Summed award amount per calendar month, ascending. Months with no
    /// matching records are omitted, not zero-filled.
    pub monthly_timeline: Vec<(YearMonth, f64)>,
}

/// Compute the aggregate views for the rows named by `indices`.
///
/// An empty `indices` slice yields zero counts, a 0.0 sum, and empty
/// distributions; nothing here divides, so the degenerate case cannot fail.
pub fn compute_aggregates(dataset: &ContractDataset, indices: &[usize]) -> AggregateView {
    let mut total_award_amount = 0.0;
    let mut recipients: BTreeSet<&str> = BTreeSet::new();
    let mut theme_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut agency_sums: BTreeMap<&str, f64> = BTreeMap::new();
    let mut month_sums: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for &i in indices {
        let rec = &dataset.records[i];
        total_award_amount += rec.award_amount;
        recipients.insert(&rec.recipient_name);
        for tag in &rec.themes {
            *theme_counts.entry(tag).or_default() += 1;
        }
        *agency_sums.entry(&rec.awarding_agency_name).or_default() += rec.award_amount;
        let key = YearMonth {
            year: rec.action_date.year(),
            month: rec.action_date.month(),
        };
        *month_sums.entry(key).or_default() += rec.award_amount;
    }

    let mut theme_distribution: Vec<(String, usize)> = theme_counts
        .into_iter()
        .map(|(tag, n)| (tag.to_string(), n))
        .collect();
    theme_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let mut agency_totals: Vec<(String, f64)> = agency_sums
        .into_iter()
        .map(|(name, sum)| (name.to_string(), sum))
        .collect();
    agency_totals.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    agency_totals.truncate(TOP_AGENCIES);

    // BTreeMap iteration is already chronological.
    let monthly_timeline: Vec<(YearMonth, f64)> = month_sums.into_iter().collect();

    AggregateView {
        total_contracts: indices.len(),
        total_award_amount,
        unique_recipients: recipients.len(),
        theme_distribution,
        agency_totals,
        monthly_timeline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filtered_indices, FilterCriteria};
    use crate::data::model::ContractRecord;

    fn record(
        id: &str,
        recipient: &str,
        agency: &str,
        amount: f64,
        date: &str,
        themes: &[&str],
    ) -> ContractRecord {
        ContractRecord {
            award_id: id.into(),
            recipient_name: recipient.into(),
            awarding_agency_name: agency.into(),
            award_amount: amount,
            action_date: date.parse().unwrap(),
            award_description: String::new(),
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn five_records() -> ContractDataset {
        ContractDataset::from_records(
            vec![
                record("a1", "R1", "Agency A", 100.0, "2023-01-10", &["equity"]),
                record("a2", "R2", "Agency A", 200.0, "2023-02-20", &["equity", "inclusion"]),
                record("b1", "R1", "Agency B", 50.0, "2023-02-05", &[]),
                record("b2", "R3", "Agency B", 50.0, "2023-04-05", &[]),
                record("b3", "R4", "Agency B", 50.0, "2024-01-15", &["equity"]),
            ],
            0,
        )
    }

    #[test]
    fn unfiltered_totals_match_hand_computed_fixture() {
        let ds = five_records();
        let idx: Vec<usize> = (0..ds.len()).collect();
        let agg = compute_aggregates(&ds, &idx);

        assert_eq!(agg.total_contracts, 5);
        assert_eq!(agg.total_award_amount, 450.0);
        assert_eq!(agg.unique_recipients, 4);
        assert_eq!(
            agg.agency_totals,
            vec![("Agency A".to_string(), 300.0), ("Agency B".to_string(), 150.0)]
        );
    }

    #[test]
    fn amount_filter_feeds_aggregates() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.amount_range = (150.0, 1000.0);
        let idx = filtered_indices(&ds, &criteria);
        let agg = compute_aggregates(&ds, &idx);
        assert_eq!(agg.total_contracts, 1);
        assert_eq!(agg.total_award_amount, 200.0);
    }

    #[test]
    fn multi_theme_record_lands_in_every_bucket() {
        let ds = five_records();
        let idx: Vec<usize> = (0..ds.len()).collect();
        let agg = compute_aggregates(&ds, &idx);
        // a2 carries both tags, so equity=3 and inclusion=1; untagged rows
        // contribute nowhere.
        assert_eq!(
            agg.theme_distribution,
            vec![("equity".to_string(), 3), ("inclusion".to_string(), 1)]
        );
    }

    #[test]
    fn unique_recipients_bounded_by_total() {
        let ds = five_records();
        let idx: Vec<usize> = (0..ds.len()).collect();
        let agg = compute_aggregates(&ds, &idx);
        assert!(agg.unique_recipients <= agg.total_contracts);

        // Restrict to rows with all-distinct recipients: equality holds.
        let idx = vec![0, 1, 3];
        let agg = compute_aggregates(&ds, &idx);
        assert_eq!(agg.unique_recipients, agg.total_contracts);
    }

    #[test]
    fn agency_totals_capped_at_ten_and_sorted() {
        let records: Vec<ContractRecord> = (0..15)
            .map(|i| {
                record(
                    &format!("id{i}"),
                    "R",
                    &format!("Agency {i:02}"),
                    (i + 1) as f64 * 10.0,
                    "2023-06-01",
                    &[],
                )
            })
            .collect();
        let ds = ContractDataset::from_records(records, 0);
        let idx: Vec<usize> = (0..ds.len()).collect();
        let agg = compute_aggregates(&ds, &idx);

        assert_eq!(agg.agency_totals.len(), TOP_AGENCIES);
        assert!(agg
            .agency_totals
            .windows(2)
            .all(|w| w[0].1 >= w[1].1));
        // Highest-amount agency first, the five smallest dropped.
        assert_eq!(agg.agency_totals[0].0, "Agency 14");
        assert!(!agg.agency_totals.iter().any(|(name, _)| name == "Agency 04"));
    }

    #[test]
    fn equal_agency_sums_tie_break_by_name() {
        let ds = ContractDataset::from_records(
            vec![
                record("1", "R", "Zulu Agency", 100.0, "2023-01-01", &[]),
                record("2", "R", "Alpha Agency", 100.0, "2023-01-02", &[]),
            ],
            0,
        );
        let agg = compute_aggregates(&ds, &[0, 1]);
        assert_eq!(agg.agency_totals[0].0, "Alpha Agency");
        assert_eq!(agg.agency_totals[1].0, "Zulu Agency");
    }

    #[test]
    fn timeline_groups_by_month_across_years() {
        let ds = five_records();
        let idx: Vec<usize> = (0..ds.len()).collect();
        let agg = compute_aggregates(&ds, &idx);
        assert_eq!(
            agg.monthly_timeline,
            vec![
                (YearMonth { year: 2023, month: 1 }, 100.0),
                (YearMonth { year: 2023, month: 2 }, 250.0),
                (YearMonth { year: 2023, month: 4 }, 50.0),
                (YearMonth { year: 2024, month: 1 }, 50.0),
            ]
        );
        // 2023-03 has no records and is omitted rather than zero-filled.
        assert!(!agg
            .monthly_timeline
            .iter()
            .any(|(ym, _)| *ym == YearMonth { year: 2023, month: 3 }));
    }

    #[test]
    fn empty_subset_yields_empty_view() {
        let ds = five_records();
        let agg = compute_aggregates(&ds, &[]);
        assert_eq!(agg.total_contracts, 0);
        assert_eq!(agg.total_award_amount, 0.0);
        assert_eq!(agg.unique_recipients, 0);
        assert!(agg.theme_distribution.is_empty());
        assert!(agg.agency_totals.is_empty());
        assert!(agg.monthly_timeline.is_empty());
    }

    #[test]
    fn year_month_displays_zero_padded() {
        let ym = YearMonth { year: 2023, month: 4 };
        assert_eq!(ym.to_string(), "2023-04");
    }
}
