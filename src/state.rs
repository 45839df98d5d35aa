use crate::color::ColorMap;
use crate::data::aggregate::{compute_aggregates, AggregateView};
use crate::data::filter::{filtered_indices, FilterCriteria};
use crate::data::model::ContractDataset;

/// How many records the Featured Awards strip shows.
pub const FEATURED_AWARDS: usize = 5;

// ---------------------------------------------------------------------------
// Table sorting
// ---------------------------------------------------------------------------

/// Sortable columns of the contract table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    AwardId,
    Recipient,
    Agency,
    Amount,
    ActionDate,
}

impl SortColumn {
    pub const ALL: [SortColumn; 5] = [
        SortColumn::AwardId,
        SortColumn::Recipient,
        SortColumn::Agency,
        SortColumn::Amount,
        SortColumn::ActionDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::AwardId => "Award ID",
            SortColumn::Recipient => "Recipient",
            SortColumn::Agency => "Agency",
            SortColumn::Amount => "Amount",
            SortColumn::ActionDate => "Action Date",
        }
    }
}

/// Current table sort: column plus direction.
#[derive(Debug, Clone, Copy)]
pub struct TableSort {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for TableSort {
    fn default() -> Self {
        // Newest awards first, matching the dashboard's table default.
        TableSort {
            column: SortColumn::ActionDate,
            ascending: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<ContractDataset>,

    /// Current sidebar selections (None while no dataset is loaded).
    pub criteria: Option<FilterCriteria>,

    /// Indices of records passing the current criteria (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregate views over `visible_indices` (cached).
    pub aggregates: AggregateView,

    /// Stable theme-tag colours for the charts.
    pub theme_colors: ColorMap,

    /// Current contract-table sort.
    pub sort: TableSort,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            criteria: None,
            visible_indices: Vec::new(),
            aggregates: AggregateView::default(),
            theme_colors: ColorMap::default(),
            sort: TableSort::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset criteria to the full span and
    /// compute the initial (identity) filtered view.
    pub fn set_dataset(&mut self, dataset: ContractDataset) {
        self.criteria = Some(FilterCriteria::unrestricted(&dataset));
        self.visible_indices = (0..dataset.len()).collect();
        self.aggregates = compute_aggregates(&dataset, &self.visible_indices);
        self.theme_colors = ColorMap::new(dataset.themes.iter().map(String::as_str));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Recompute the cached filtered indices and aggregates after any
    /// criteria change. Cheap and deterministic, so it runs on every
    /// sidebar interaction.
    pub fn refilter(&mut self) {
        if let (Some(ds), Some(criteria)) = (&self.dataset, &self.criteria) {
            self.visible_indices = filtered_indices(ds, criteria);
            self.aggregates = compute_aggregates(ds, &self.visible_indices);
        }
    }

    /// Reset all filters back to the identity criteria.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.criteria = Some(FilterCriteria::unrestricted(ds));
        }
        self.refilter();
    }

    /// Visible indices reordered for the contract table. The cached
    /// `visible_indices` stay in source order; sorting is display-only.
    pub fn sorted_visible(&self) -> Vec<usize> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        let mut indices = self.visible_indices.clone();
        let records = &ds.records;
        indices.sort_by(|&a, &b| {
            let (ra, rb) = (&records[a], &records[b]);
            let ord = match self.sort.column {
                SortColumn::AwardId => ra.award_id.cmp(&rb.award_id),
                SortColumn::Recipient => ra.recipient_name.cmp(&rb.recipient_name),
                SortColumn::Agency => ra.awarding_agency_name.cmp(&rb.awarding_agency_name),
                SortColumn::Amount => ra.award_amount.total_cmp(&rb.award_amount),
                SortColumn::ActionDate => ra.action_date.cmp(&rb.action_date),
            };
            if self.sort.ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        indices
    }

    /// Toggle sort on a column: first click sorts ascending, a second click
    /// on the same column flips the direction.
    pub fn sort_by(&mut self, column: SortColumn) {
        if self.sort.column == column {
            self.sort.ascending = !self.sort.ascending;
        } else {
            self.sort = TableSort {
                column,
                ascending: true,
            };
        }
    }

    /// A deterministic spread of up to [`FEATURED_AWARDS`] visible records
    /// for the featured strip. Evenly strided over the filtered subset so
    /// the pick is stable frame to frame.
    pub fn featured_indices(&self) -> Vec<usize> {
        let n = self.visible_indices.len();
        if n <= FEATURED_AWARDS {
            return self.visible_indices.clone();
        }
        let stride = n / FEATURED_AWARDS;
        (0..FEATURED_AWARDS)
            .map(|k| self.visible_indices[k * stride + stride / 2])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ContractRecord;

    fn dataset() -> ContractDataset {
        let records = (0..12)
            .map(|i| ContractRecord {
                award_id: format!("C{i:02}"),
                recipient_name: format!("Recipient {}", i % 3),
                awarding_agency_name: "NSF".into(),
                award_amount: 100.0 * (i + 1) as f64,
                action_date: format!("2023-{:02}-01", i + 1).parse().unwrap(),
                award_description: String::new(),
                themes: std::collections::BTreeSet::new(),
            })
            .collect();
        ContractDataset::from_records(records, 0)
    }

    #[test]
    fn set_dataset_starts_with_identity_filter() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        assert_eq!(state.visible_indices.len(), 12);
        assert_eq!(state.aggregates.total_contracts, 12);
        assert_eq!(state.aggregates.unique_recipients, 3);
    }

    #[test]
    fn refilter_updates_cached_view() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.criteria.as_mut().unwrap().amount_range = (0.0, 300.0);
        state.refilter();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.aggregates.total_award_amount, 600.0);

        state.reset_filters();
        assert_eq!(state.visible_indices.len(), 12);
    }

    #[test]
    fn default_sort_is_newest_first_and_toggles() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        let sorted = state.sorted_visible();
        assert_eq!(sorted.first(), Some(&11));
        // Source-order cache is untouched by display sorting.
        assert_eq!(state.visible_indices.first(), Some(&0));

        state.sort_by(SortColumn::Amount);
        assert!(state.sort.ascending);
        assert_eq!(state.sorted_visible().first(), Some(&0));
        state.sort_by(SortColumn::Amount);
        assert!(!state.sort.ascending);
        assert_eq!(state.sorted_visible().first(), Some(&11));
    }

    #[test]
    fn featured_pick_is_deterministic_and_bounded() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        let picks = state.featured_indices();
        assert_eq!(picks.len(), FEATURED_AWARDS);
        assert_eq!(picks, state.featured_indices());
        assert!(picks.iter().all(|i| state.visible_indices.contains(i)));

        state.criteria.as_mut().unwrap().amount_range = (0.0, 300.0);
        state.refilter();
        assert_eq!(state.featured_indices().len(), 3);
    }
}
