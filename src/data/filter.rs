use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::model::{ContractDataset, ContractRecord};

// ---------------------------------------------------------------------------
// FilterCriteria – the current sidebar selections
// ---------------------------------------------------------------------------

/// User-selected constraints, rebuilt from widget state on every interaction.
/// Empty `agencies` / `themes` sets mean "no restriction".
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive [start, end] bounds on action_date.
    pub date_range: (NaiveDate, NaiveDate),
    pub agencies: BTreeSet<String>,
    /// Inclusive [min, max] bounds on award_amount.
    pub amount_range: (f64, f64),
    pub themes: BTreeSet<String>,
}

impl FilterCriteria {
    /// Criteria that pass every record of the given dataset: full date and
    /// amount spans, no agency or theme restriction.
    pub fn unrestricted(dataset: &ContractDataset) -> Self {
        FilterCriteria {
            date_range: dataset.date_span,
            agencies: BTreeSet::new(),
            amount_range: dataset.amount_span,
            themes: BTreeSet::new(),
        }
    }

    /// Whether a single record passes all four predicates.
    pub fn matches(&self, rec: &ContractRecord) -> bool {
        let (start, end) = self.date_range;
        if rec.action_date < start || rec.action_date > end {
            return false;
        }
        if !self.agencies.is_empty() && !self.agencies.contains(&rec.awarding_agency_name) {
            return false;
        }
        let (lo, hi) = self.amount_range;
        if rec.award_amount < lo || rec.award_amount > hi {
            return false;
        }
        if !self.themes.is_empty() && self.themes.is_disjoint(&rec.themes) {
            return false;
        }
        true
    }
}

/// Return indices of records that pass the current criteria.
///
/// Pure function of its inputs: records are never mutated, the output is a
/// subsequence of `0..dataset.len()` in source order, and an empty result is
/// a valid outcome rather than an error.
pub fn filtered_indices(dataset: &ContractDataset, criteria: &FilterCriteria) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| criteria.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        id: &str,
        agency: &str,
        amount: f64,
        date: &str,
        themes: &[&str],
    ) -> ContractRecord {
        ContractRecord {
            award_id: id.into(),
            recipient_name: format!("Recipient {id}"),
            awarding_agency_name: agency.into(),
            award_amount: amount,
            action_date: date.parse().unwrap(),
            award_description: String::new(),
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Two Agency A awards ($100, $200) and three Agency B awards ($50 each).
    fn five_records() -> ContractDataset {
        ContractDataset::from_records(
            vec![
                record("a1", "Agency A", 100.0, "2023-01-10", &["equity"]),
                record("a2", "Agency A", 200.0, "2023-02-20", &["inclusion"]),
                record("b1", "Agency B", 50.0, "2023-03-05", &["equity", "accessibility"]),
                record("b2", "Agency B", 50.0, "2023-04-05", &[]),
                record("b3", "Agency B", 50.0, "2024-01-15", &["diversity"]),
            ],
            0,
        )
    }

    #[test]
    fn unrestricted_criteria_pass_everything() {
        let ds = five_records();
        let criteria = FilterCriteria::unrestricted(&ds);
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn output_is_an_order_preserving_subsequence() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.agencies.insert("Agency B".into());
        let idx = filtered_indices(&ds, &criteria);
        assert_eq!(idx, vec![2, 3, 4]);
        assert!(idx.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn amount_range_is_inclusive_on_both_ends() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.amount_range = (150.0, 1000.0);
        let idx = filtered_indices(&ds, &criteria);
        assert_eq!(idx, vec![1]);

        // Exact boundary values pass.
        criteria.amount_range = (100.0, 200.0);
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 1]);
    }

    #[test]
    fn date_range_is_inclusive_on_both_ends() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.date_range = ("2023-02-20".parse().unwrap(), "2023-03-05".parse().unwrap());
        assert_eq!(filtered_indices(&ds, &criteria), vec![1, 2]);
    }

    #[test]
    fn theme_filter_requires_intersection() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.themes.insert("equity".into());
        // Only a1 and b1 carry the tag, regardless of their other tags.
        assert_eq!(filtered_indices(&ds, &criteria), vec![0, 2]);
    }

    #[test]
    fn untagged_records_fail_any_theme_filter() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.themes.insert("accessibility".into());
        criteria.themes.insert("diversity".into());
        assert_eq!(filtered_indices(&ds, &criteria), vec![2, 4]);
    }

    #[test]
    fn empty_result_is_valid() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.amount_range = (10_000.0, 20_000.0);
        assert!(filtered_indices(&ds, &criteria).is_empty());
    }

    #[test]
    fn all_predicates_must_hold_together() {
        let ds = five_records();
        let mut criteria = FilterCriteria::unrestricted(&ds);
        criteria.agencies.insert("Agency B".into());
        criteria.themes.insert("equity".into());
        criteria.date_range = ("2023-01-01".parse().unwrap(), "2023-12-31".parse().unwrap());
        // b1 is the only Agency B award tagged equity inside 2023.
        assert_eq!(filtered_indices(&ds, &criteria), vec![2]);
    }
}
