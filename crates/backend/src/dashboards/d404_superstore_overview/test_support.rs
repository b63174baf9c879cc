use chrono::NaiveDate;
use contracts::dashboards::d404_superstore_overview::SalesRecord;

fn category_of(sub_category: &str) -> &'static str {
    match sub_category {
        "Chairs" | "Tables" | "Bookcases" | "Furnishings" => "Furniture",
        "Phones" | "Machines" | "Copiers" | "Accessories" => "Technology",
        _ => "Office Supplies",
    }
}

pub fn record(order_id: &str, sub_category: &str, year: i32, sales: f64, profit: f64) -> SalesRecord {
    let order_date = NaiveDate::from_ymd_opt(year, 3, 15).unwrap();
    SalesRecord {
        order_id: order_id.to_string(),
        order_date,
        ship_date: order_date + chrono::Days::new(4),
        year,
        category: category_of(sub_category).to_string(),
        sub_category: sub_category.to_string(),
        segment: "Consumer".to_string(),
        state: "California".to_string(),
        sales,
        profit,
        quantity: 1,
        discount: 0.0,
        region: Some("West".to_string()),
        city: None,
        customer_name: None,
        product_name: None,
        ship_mode: None,
    }
}

fn located(mut r: SalesRecord, state: &str, segment: &str, quantity: i64, discount: f64) -> SalesRecord {
    r.state = state.to_string();
    r.segment = segment.to_string();
    r.quantity = quantity;
    r.discount = discount;
    r
}

/// Six lines over five orders, three years and four sub-categories.
pub fn sample_records() -> Vec<SalesRecord> {
    vec![
        located(record("A", "Chairs", 2020, 100.0, 20.0), "California", "Consumer", 2, 0.0),
        located(record("A", "Binders", 2020, 50.0, 5.0), "California", "Consumer", 3, 0.2),
        located(record("B", "Chairs", 2021, 200.0, -10.0), "Texas", "Corporate", 1, 0.3),
        located(record("C", "Phones", 2021, 300.0, 60.0), "New York", "Home Office", 4, 0.0),
        located(record("D", "Tables", 2022, 80.0, -30.0), "Texas", "Consumer", 2, 0.5),
        located(record("E", "Phones", 2022, 120.0, 12.0), "District of Columbia", "Corporate", 1, 0.0),
    ]
}
