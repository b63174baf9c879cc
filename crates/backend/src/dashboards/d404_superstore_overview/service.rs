use contracts::dashboards::d404_superstore_overview::{
    DashboardSnapshot, Dimension, FilterOptions, FilterSelection, Measure, MetricCard, MetricSet,
    SalesRecord, ScatterPoint,
};
use std::collections::BTreeSet;

use super::filter::{filter_by_category, filter_by_category_and_year, View};
use super::grouping::{group_sum, top_n};
use super::metrics::compute_metrics;
use super::repository::Dataset;
use crate::shared::config::DashboardConfig;
use crate::shared::format::{format_money, format_number, format_optional_money, format_percent};
use crate::shared::geo::sales_by_state_map;

/// Sidebar choices: distinct years and sub-categories, ascending.
pub fn filter_options(records: &[SalesRecord]) -> FilterOptions {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    let sub_categories: BTreeSet<&str> = records.iter().map(|r| r.sub_category.as_str()).collect();
    FilterOptions {
        years: years.into_iter().collect(),
        sub_categories: sub_categories.into_iter().map(str::to_string).collect(),
    }
}

/// Card grid for the business overview row.
pub fn summary_cards(metrics: &MetricSet) -> Vec<MetricCard> {
    let card = |label: &str, value: String| MetricCard {
        label: label.to_string(),
        value,
    };
    vec![
        card("Total Sales", format_money(metrics.total_sales)),
        card("Average Profit", format_optional_money(metrics.average_profit)),
        card("Total Orders", format_number(metrics.total_orders)),
        card("Total Profit", format_money(metrics.total_profit)),
        card("Total Quantity", format_number(metrics.total_quantity.max(0) as usize)),
        card("Average Discount", format_percent(metrics.average_discount)),
        card("Profit Margin", format_percent(Some(metrics.profit_margin_percent))),
    ]
}

fn scatter_points(view: &View<'_>) -> Vec<ScatterPoint> {
    view.iter()
        .map(|r| ScatterPoint {
            sales: r.sales,
            profit: r.profit,
            category: r.category.clone(),
            sub_category: r.sub_category.clone(),
        })
        .collect()
}

/// Recompute every dashboard output for one filter interaction.
///
/// Everything except the sub-category pie works on the category-only view;
/// the year selection narrows the pie alone.
pub fn build_dashboard(
    dataset: &Dataset,
    selection: &FilterSelection,
    config: &DashboardConfig,
) -> DashboardSnapshot {
    let records = &dataset.records;
    let by_category = filter_by_category(records, &selection.sub_categories);
    let by_category_and_year =
        filter_by_category_and_year(records, &selection.sub_categories, &selection.years);

    tracing::debug!(
        "Dashboard views: {} rows by category, {} rows by category and year",
        by_category.len(),
        by_category_and_year.len()
    );

    let metrics = compute_metrics(&by_category);
    let profit_by_sub_category = group_sum(&by_category, Dimension::SubCategory, Measure::Profit);
    let sales_by_state = group_sum(&by_category, Dimension::State, Measure::Sales);

    DashboardSnapshot {
        options: filter_options(records),
        selection: selection.clone(),
        records: by_category.to_records(),
        cards: summary_cards(&metrics),
        metrics,
        sales_by_year: group_sum(&by_category, Dimension::Year, Measure::Sales),
        profit_by_year: group_sum(&by_category, Dimension::Year, Measure::Profit),
        sales_by_segment: group_sum(&by_category, Dimension::Segment, Measure::Sales),
        sales_by_category: group_sum(&by_category, Dimension::Category, Measure::Sales),
        sub_category_sales: group_sum(&by_category_and_year, Dimension::SubCategory, Measure::Sales),
        top_profitable_sub_categories: top_n(&profit_by_sub_category, config.top_products),
        top_states_by_sales: top_n(&sales_by_state, config.top_states),
        state_map: sales_by_state_map(&sales_by_state),
        scatter: scatter_points(&by_category),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d404_superstore_overview::test_support::sample_records;
    use contracts::dashboards::d404_superstore_overview::GroupKey;

    fn dataset() -> Dataset {
        Dataset::from_records(sample_records())
    }

    #[test]
    fn test_filter_options_sorted_distinct() {
        let options = filter_options(&sample_records());
        assert_eq!(options.years, vec![2020, 2021, 2022]);
        assert_eq!(options.sub_categories, vec!["Binders", "Chairs", "Phones", "Tables"]);
    }

    #[test]
    fn test_default_selection_covers_everything() {
        let dataset = dataset();
        let selection = FilterSelection::all(&filter_options(&dataset.records));
        let snapshot = build_dashboard(&dataset, &selection, &DashboardConfig::default());

        assert_eq!(snapshot.records, dataset.records);
        assert_eq!(snapshot.metrics.total_orders, 5);
        assert_eq!(snapshot.sales_by_year.len(), 3);
        assert_eq!(snapshot.sub_category_sales.len(), 4);
        assert_eq!(snapshot.top_profitable_sub_categories.len(), 3);
        assert_eq!(snapshot.top_states_by_sales.len(), 4);
        assert_eq!(snapshot.scatter.len(), 6);
        assert_eq!(snapshot.cards.len(), 7);
        assert_eq!(snapshot.cards[0].value, "$850.00");
        assert_eq!(snapshot.cards[2].value, "5");
    }

    #[test]
    fn test_year_selection_only_moves_the_pie() {
        let dataset = dataset();
        let options = filter_options(&dataset.records);
        let config = DashboardConfig::default();

        let all = build_dashboard(&dataset, &FilterSelection::all(&options), &config);
        let only_2021 = FilterSelection::new([2021], options.sub_categories.clone());
        let narrowed = build_dashboard(&dataset, &only_2021, &config);

        assert_eq!(all.sales_by_year, narrowed.sales_by_year);
        assert_eq!(all.profit_by_year, narrowed.profit_by_year);
        assert_eq!(all.metrics, narrowed.metrics);
        assert_ne!(all.sub_category_sales, narrowed.sub_category_sales);
        assert_eq!(narrowed.sub_category_sales.len(), 2);
        assert_eq!(
            narrowed.sub_category_sales.get(&GroupKey::Text("Phones".into())),
            Some(300.0)
        );
    }

    #[test]
    fn test_no_years_selected() {
        let dataset = dataset();
        let options = filter_options(&dataset.records);
        let selection = FilterSelection::new(Vec::<i32>::new(), options.sub_categories.clone());
        let snapshot = build_dashboard(&dataset, &selection, &DashboardConfig::default());

        assert!(snapshot.sub_category_sales.is_empty());
        assert_eq!(snapshot.records.len(), 6);
    }

    #[test]
    fn test_empty_selection_degrades() {
        let dataset = dataset();
        let snapshot = build_dashboard(
            &dataset,
            &FilterSelection::default(),
            &DashboardConfig::default(),
        );

        assert!(snapshot.records.is_empty());
        assert_eq!(snapshot.metrics, MetricSet::default());
        assert!(snapshot.sales_by_year.is_empty());
        assert!(snapshot.top_states_by_sales.is_empty());
        assert!(snapshot.state_map.is_empty());
        assert_eq!(snapshot.cards[1].value, "N/A");
        assert_eq!(snapshot.cards[5].value, "N/A");
        assert_eq!(snapshot.cards[6].value, "0.00%");
    }

    #[test]
    fn test_state_map_drops_uncoded_state_only() {
        let dataset = dataset();
        let selection = FilterSelection::all(&filter_options(&dataset.records));
        let snapshot = build_dashboard(&dataset, &selection, &DashboardConfig::default());

        let dc = GroupKey::Text("District of Columbia".into());
        assert_eq!(snapshot.top_states_by_sales.get(&dc), Some(120.0));
        assert!(snapshot.state_map.iter().all(|s| s.state != "District of Columbia"));
        assert_eq!(snapshot.state_map.len(), 3);
        let texas = snapshot.state_map.iter().find(|s| s.code == "TX").unwrap();
        assert_eq!(texas.sales, 280.0);
    }

    #[test]
    fn test_top_sizes_follow_config() {
        let dataset = dataset();
        let selection = FilterSelection::all(&filter_options(&dataset.records));
        let config = DashboardConfig {
            top_products: 1,
            top_states: 2,
        };
        let snapshot = build_dashboard(&dataset, &selection, &config);

        assert_eq!(snapshot.top_profitable_sub_categories.len(), 1);
        assert_eq!(
            snapshot.top_profitable_sub_categories.rows[0].key,
            GroupKey::Text("Phones".into())
        );
        assert_eq!(snapshot.top_states_by_sales.len(), 2);
        assert_eq!(
            snapshot.top_states_by_sales.rows[0].key,
            GroupKey::Text("New York".into())
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let dataset = dataset();
        let selection = FilterSelection::all(&filter_options(&dataset.records));
        let snapshot = build_dashboard(&dataset, &selection, &DashboardConfig::default());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["sales_by_year"]["rows"][0]["key"], 2020);
        assert!(json["metrics"]["average_profit"].is_number());
    }
}
