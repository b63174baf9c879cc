//! US state name to postal code lookup for the choropleth map.

use contracts::dashboards::d404_superstore_overview::{GroupAggregate, StateSales};

/// The 50 states, sorted by name so lookups can binary search.
pub static STATE_CODES: [(&str, &str); 50] = [
    ("Alabama", "AL"),
    ("Alaska", "AK"),
    ("Arizona", "AZ"),
    ("Arkansas", "AR"),
    ("California", "CA"),
    ("Colorado", "CO"),
    ("Connecticut", "CT"),
    ("Delaware", "DE"),
    ("Florida", "FL"),
    ("Georgia", "GA"),
    ("Hawaii", "HI"),
    ("Idaho", "ID"),
    ("Illinois", "IL"),
    ("Indiana", "IN"),
    ("Iowa", "IA"),
    ("Kansas", "KS"),
    ("Kentucky", "KY"),
    ("Louisiana", "LA"),
    ("Maine", "ME"),
    ("Maryland", "MD"),
    ("Massachusetts", "MA"),
    ("Michigan", "MI"),
    ("Minnesota", "MN"),
    ("Mississippi", "MS"),
    ("Missouri", "MO"),
    ("Montana", "MT"),
    ("Nebraska", "NE"),
    ("Nevada", "NV"),
    ("New Hampshire", "NH"),
    ("New Jersey", "NJ"),
    ("New Mexico", "NM"),
    ("New York", "NY"),
    ("North Carolina", "NC"),
    ("North Dakota", "ND"),
    ("Ohio", "OH"),
    ("Oklahoma", "OK"),
    ("Oregon", "OR"),
    ("Pennsylvania", "PA"),
    ("Rhode Island", "RI"),
    ("South Carolina", "SC"),
    ("South Dakota", "SD"),
    ("Tennessee", "TN"),
    ("Texas", "TX"),
    ("Utah", "UT"),
    ("Vermont", "VT"),
    ("Virginia", "VA"),
    ("Washington", "WA"),
    ("West Virginia", "WV"),
    ("Wisconsin", "WI"),
    ("Wyoming", "WY"),
];

/// Two-letter code for a full state name. Exact, case-sensitive match;
/// territories and the District of Columbia have no entry.
pub fn to_state_code(state_name: &str) -> Option<&'static str> {
    STATE_CODES
        .binary_search_by(|(name, _)| (*name).cmp(state_name))
        .ok()
        .map(|idx| STATE_CODES[idx].1)
}

/// Attach postal codes to a by-state aggregate. Rows whose key has no code
/// are left off the map; they still count everywhere else.
pub fn sales_by_state_map(by_state: &GroupAggregate) -> Vec<StateSales> {
    by_state
        .rows
        .iter()
        .filter_map(|row| {
            let state = row.key.to_string();
            match to_state_code(&state) {
                Some(code) => Some(StateSales {
                    code: code.to_string(),
                    state,
                    sales: row.value,
                }),
                None => {
                    tracing::debug!("no postal code for state {:?}, omitted from map", state);
                    None
                }
            }
        })
        .collect()
}
