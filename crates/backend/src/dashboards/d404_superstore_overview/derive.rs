use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d404_superstore_overview::SalesRecord;

/// A parsed CSV row before derived fields are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSalesRow {
    pub order_id: String,
    pub order_date: NaiveDate,
    pub ship_date: NaiveDate,
    pub category: String,
    pub sub_category: String,
    pub segment: String,
    pub state: String,
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub discount: f64,
    pub region: Option<String>,
    pub city: Option<String>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub ship_mode: Option<String>,
}

/// Attach `year` (calendar year of the order date).
pub fn derive_fields(raw: RawSalesRow) -> SalesRecord {
    SalesRecord {
        year: raw.order_date.year(),
        order_id: raw.order_id,
        order_date: raw.order_date,
        ship_date: raw.ship_date,
        category: raw.category,
        sub_category: raw.sub_category,
        segment: raw.segment,
        state: raw.state,
        sales: raw.sales,
        profit: raw.profit,
        quantity: raw.quantity,
        discount: raw.discount,
        region: raw.region,
        city: raw.city,
        customer_name: raw.customer_name,
        product_name: raw.product_name,
        ship_mode: raw.ship_mode,
    }
}

pub fn derive_all(rows: Vec<RawSalesRow>) -> Vec<SalesRecord> {
    rows.into_iter().map(derive_fields).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(order_id: &str, order_date: NaiveDate) -> RawSalesRow {
        RawSalesRow {
            order_id: order_id.to_string(),
            order_date,
            ship_date: order_date,
            category: "Furniture".into(),
            sub_category: "Chairs".into(),
            segment: "Consumer".into(),
            state: "California".into(),
            sales: 10.0,
            profit: 1.0,
            quantity: 1,
            discount: 0.0,
            region: None,
            city: None,
            customer_name: None,
            product_name: None,
            ship_mode: None,
        }
    }

    #[test]
    fn test_year_from_order_date() {
        let d = NaiveDate::from_ymd_opt(2017, 12, 31).unwrap();
        let record = derive_fields(raw("CA-1", d));
        assert_eq!(record.year, 2017);
        assert_eq!(record.order_id, "CA-1");
    }

    #[test]
    fn test_derive_all_keeps_order() {
        let rows = vec![
            raw("A", NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()),
            raw("B", NaiveDate::from_ymd_opt(2016, 6, 15).unwrap()),
        ];
        let records = derive_all(rows);
        assert_eq!(records[0].year, 2019);
        assert_eq!(records[1].year, 2016);
        assert_eq!(records[1].order_id, "B");
    }
}
