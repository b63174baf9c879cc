use contracts::dashboards::d404_superstore_overview::SalesRecord;
use std::collections::BTreeSet;

/// Read-only subset of the loaded table, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct View<'a> {
    rows: Vec<&'a SalesRecord>,
}

impl<'a> View<'a> {
    /// Unfiltered view over every record.
    pub fn all(records: &'a [SalesRecord]) -> Self {
        Self {
            rows: records.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a SalesRecord> + '_ {
        self.rows.iter().copied()
    }

    /// Owned copy for the data table.
    pub fn to_records(&self) -> Vec<SalesRecord> {
        self.rows.iter().map(|r| (*r).clone()).collect()
    }
}

/// Keep rows whose sub-category is selected and, when `years` is given,
/// whose year is selected too. Empty sets select nothing.
pub fn filter_view<'a>(
    records: &'a [SalesRecord],
    sub_categories: &BTreeSet<String>,
    years: Option<&BTreeSet<i32>>,
) -> View<'a> {
    let rows = records
        .iter()
        .filter(|r| sub_categories.contains(&r.sub_category))
        .filter(|r| years.map_or(true, |ys| ys.contains(&r.year)))
        .collect();
    View { rows }
}

/// Category-only view; the year selection is ignored.
pub fn filter_by_category<'a>(
    records: &'a [SalesRecord],
    sub_categories: &BTreeSet<String>,
) -> View<'a> {
    filter_view(records, sub_categories, None)
}

pub fn filter_by_category_and_year<'a>(
    records: &'a [SalesRecord],
    sub_categories: &BTreeSet<String>,
    years: &BTreeSet<i32>,
) -> View<'a> {
    filter_view(records, sub_categories, Some(years))
}
