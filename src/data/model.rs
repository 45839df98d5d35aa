use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// ContractRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single federal contract award (one row of the source table).
#[derive(Debug, Clone)]
pub struct ContractRecord {
    pub award_id: String,
    pub recipient_name: String,
    pub awarding_agency_name: String,
    /// Award amount in dollars, non-negative.
    pub award_amount: f64,
    pub action_date: NaiveDate,
    pub award_description: String,
    /// DEI theme tags attached to this award (may be empty).
    pub themes: BTreeSet<String>,
}

/// Raw record shape accepted from records-oriented JSON before validation.
/// Amounts arrive as strings or numbers, dates as ISO-8601 strings, themes
/// as a delimited string or a list of tags.
#[derive(Debug, Deserialize)]
pub struct RawRecord {
    pub award_id: String,
    pub recipient_name: String,
    pub awarding_agency_name: String,
    pub award_amount: serde_json::Value,
    pub action_date: String,
    #[serde(default)]
    pub award_description: String,
    #[serde(default)]
    pub dei_themes: ThemeField,
}

/// `dei_themes` in JSON is either `"equity;inclusion"` or `["equity", ...]`.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
pub enum ThemeField {
    #[default]
    Missing,
    Delimited(String),
    List(Vec<String>),
}

// ---------------------------------------------------------------------------
// ContractDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indexes.
/// Read-only after load; filtering hands out row indices into `records`.
#[derive(Debug, Clone)]
pub struct ContractDataset {
    /// All contract records (rows), in source order.
    pub records: Vec<ContractRecord>,
    /// Sorted set of distinct awarding agency names.
    pub agencies: BTreeSet<String>,
    /// Sorted set of distinct DEI theme tags.
    pub themes: BTreeSet<String>,
    /// Earliest and latest action_date in the dataset.
    pub date_span: (NaiveDate, NaiveDate),
    /// Smallest and largest award_amount in the dataset.
    pub amount_span: (f64, f64),
    /// Rows quarantined during load (unparseable date or amount).
    pub skipped_rows: usize,
}

impl ContractDataset {
    /// Build column indexes from the loaded records.
    pub fn from_records(records: Vec<ContractRecord>, skipped_rows: usize) -> Self {
        let mut agencies = BTreeSet::new();
        let mut themes = BTreeSet::new();
        let mut date_span: Option<(NaiveDate, NaiveDate)> = None;
        let mut amount_span: Option<(f64, f64)> = None;

        for rec in &records {
            agencies.insert(rec.awarding_agency_name.clone());
            for tag in &rec.themes {
                themes.insert(tag.clone());
            }
            date_span = Some(match date_span {
                None => (rec.action_date, rec.action_date),
                Some((lo, hi)) => (lo.min(rec.action_date), hi.max(rec.action_date)),
            });
            amount_span = Some(match amount_span {
                None => (rec.award_amount, rec.award_amount),
                Some((lo, hi)) => (lo.min(rec.award_amount), hi.max(rec.award_amount)),
            });
        }

        // An empty dataset still needs a well-formed span for the widgets.
        let fallback = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        ContractDataset {
            records,
            agencies,
            themes,
            date_span: date_span.unwrap_or((fallback, fallback)),
            amount_span: amount_span.unwrap_or((0.0, 0.0)),
            skipped_rows,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(agency: &str, amount: f64, date: &str, themes: &[&str]) -> ContractRecord {
        ContractRecord {
            award_id: format!("AWD-{agency}-{amount}"),
            recipient_name: "Acme Corp".into(),
            awarding_agency_name: agency.into(),
            award_amount: amount,
            action_date: date.parse().unwrap(),
            award_description: String::new(),
            themes: themes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn from_records_builds_indexes_and_spans() {
        let ds = ContractDataset::from_records(
            vec![
                record("NSF", 500.0, "2023-03-01", &["equity"]),
                record("DOJ", 100.0, "2024-06-15", &["inclusion", "equity"]),
            ],
            1,
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.agencies.len(), 2);
        assert!(ds.themes.contains("equity") && ds.themes.contains("inclusion"));
        assert_eq!(
            ds.date_span,
            ("2023-03-01".parse().unwrap(), "2024-06-15".parse().unwrap())
        );
        assert_eq!(ds.amount_span, (100.0, 500.0));
        assert_eq!(ds.skipped_rows, 1);
    }

    #[test]
    fn empty_dataset_has_defaulted_spans() {
        let ds = ContractDataset::from_records(Vec::new(), 0);
        assert!(ds.is_empty());
        assert_eq!(ds.amount_span, (0.0, 0.0));
        assert_eq!(ds.date_span.0, ds.date_span.1);
    }
}
