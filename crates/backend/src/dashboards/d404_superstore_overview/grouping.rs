use contracts::dashboards::d404_superstore_overview::{
    Dimension, GroupAggregate, GroupKey, GroupRow, Measure, SalesRecord,
};
use std::collections::BTreeMap;

use super::filter::View;
use super::metrics::CompensatedSum;

/// Key of `record` along `dimension`; `None` only for an absent optional column.
pub fn group_key(record: &SalesRecord, dimension: Dimension) -> Option<GroupKey> {
    let text = |s: &str| Some(GroupKey::Text(s.to_string()));
    match dimension {
        Dimension::Year => Some(GroupKey::Year(record.year)),
        Dimension::Segment => text(&record.segment),
        Dimension::Category => text(&record.category),
        Dimension::SubCategory => text(&record.sub_category),
        Dimension::State => text(&record.state),
        Dimension::Region => record.region.as_deref().and_then(text),
    }
}

pub fn measure_value(record: &SalesRecord, measure: Measure) -> f64 {
    match measure {
        Measure::Sales => record.sales,
        Measure::Profit => record.profit,
    }
}

/// Sum `measure` per distinct key present in the view, keys ascending.
pub fn group_sum(view: &View<'_>, dimension: Dimension, measure: Measure) -> GroupAggregate {
    let mut groups: BTreeMap<GroupKey, CompensatedSum> = BTreeMap::new();
    for r in view.iter() {
        if let Some(key) = group_key(r, dimension) {
            groups.entry(key).or_default().add(measure_value(r, measure));
        }
    }

    GroupAggregate {
        dimension,
        measure,
        rows: groups
            .into_iter()
            .map(|(key, sum)| GroupRow {
                key,
                value: sum.total(),
            })
            .collect(),
    }
}

/// First `n` groups by descending value. The sort is stable, so equal
/// values keep their ascending key order.
pub fn top_n(aggregate: &GroupAggregate, n: usize) -> GroupAggregate {
    let mut rows = aggregate.rows.clone();
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    rows.truncate(n);
    GroupAggregate {
        dimension: aggregate.dimension,
        measure: aggregate.measure,
        rows,
    }
}
