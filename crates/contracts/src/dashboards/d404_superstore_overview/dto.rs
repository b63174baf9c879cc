use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Source rows
// ---------------------------------------------------------------------------

/// One transaction line of the Super Store dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    /// Calendar year of `order_date`, fixed at load time.
    pub year: i32,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub state: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    /// Fraction in `0..=1`.
    pub discount: f64,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub ship_mode: Option<String>,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Values a user can pick from in the sidebar multiselects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Distinct years, ascending.
    pub years: Vec<i32>,
    /// Distinct sub-categories, ascending.
    pub sub_categories: Vec<String>,
}

/// Current sidebar selection.
///
/// Empty sets are taken literally: selecting no years yields no rows in
/// year-sensitive views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub years: BTreeSet<i32>,
    pub sub_categories: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new(
        years: impl IntoIterator<Item = i32>,
        sub_categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            years: years.into_iter().collect(),
            sub_categories: sub_categories.into_iter().map(Into::into).collect(),
        }
    }

    /// Session default: everything observed in the dataset is selected.
    pub fn all(options: &FilterOptions) -> Self {
        Self {
            years: options.years.iter().copied().collect(),
            sub_categories: options.sub_categories.iter().cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Summary card values computed over one view.
///
/// The `Default` value is exactly what an empty view produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub total_sales: f64,
    /// `None` when the view is empty.
    pub average_profit: Option<f64>,
    /// Distinct order ids, not line items.
    pub total_orders: usize,
    pub total_profit: f64,
    pub total_quantity: i64,
    /// Mean discount as a percentage, `None` when the view is empty.
    pub average_discount: Option<f64>,
    /// 0 when total sales is 0.
    pub profit_margin_percent: f64,
}

/// Pre-formatted card text, e.g. `Total Sales` / `$2,297,200.86`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Grouped aggregates
// ---------------------------------------------------------------------------

/// Column a view can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Year,
    Segment,
    Category,
    SubCategory,
    State,
    Region,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Segment => "Segment",
            Dimension::Category => "Category",
            Dimension::SubCategory => "Sub-Category",
            Dimension::State => "State",
            Dimension::Region => "Region",
        }
    }
}

/// Numeric column summed within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Sales,
    Profit,
}

impl Measure {
    pub fn label(self) -> &'static str {
        match self {
            Measure::Sales => "Sales",
            Measure::Profit => "Profit",
        }
    }
}

/// Group key; years order numerically, text lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Year(i32),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(y) => write!(f, "{}", y),
            GroupKey::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub key: GroupKey,
    pub value: f64,
}

/// Ordered `(key, sum)` series for one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub dimension: Dimension,
    pub measure: Measure,
    pub rows: Vec<GroupRow>,
}

impl GroupAggregate {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value for `key`, if that group is present.
    pub fn get(&self, key: &GroupKey) -> Option<f64> {
        self.rows.iter().find(|r| &r.key == key).map(|r| r.value)
    }
}

// ---------------------------------------------------------------------------
// Chart-specific rows
// ---------------------------------------------------------------------------

/// One coloured state on the choropleth map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSales {
    pub state: String,
    /// Two-letter postal code.
    pub code: String,
    pub sales: f64,
}

/// One dot of the Sales vs Profit scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub sales: f64,
    pub profit: f64,
    pub category: String,
    pub sub_category: String,
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Everything the dashboard page renders for one filter interaction.
///
/// All values are owned copies; nothing refers back into the loaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub options: FilterOptions,
    pub selection: FilterSelection,
    /// Category-filtered rows for the data table.
    pub records: Vec<SalesRecord>,
    pub metrics: MetricSet,
    pub cards: Vec<MetricCard>,
    /// Ignores the year selection.
    pub sales_by_year: GroupAggregate,
    /// Ignores the year selection.
    pub profit_by_year: GroupAggregate,
    pub sales_by_segment: GroupAggregate,
    pub sales_by_category: GroupAggregate,
    /// Pie chart series; the only output narrowed by the year selection.
    pub sub_category_sales: GroupAggregate,
    pub top_profitable_sub_categories: GroupAggregate,
    pub top_states_by_sales: GroupAggregate,
    pub state_map: Vec<StateSales>,
    pub scatter: Vec<ScatterPoint>,
}
