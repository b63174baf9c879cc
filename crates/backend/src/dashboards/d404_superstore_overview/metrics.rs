use contracts::dashboards::d404_superstore_overview::MetricSet;
use std::collections::HashSet;

use super::filter::View;

/// Neumaier compensated sum, keeps long money columns from drifting.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, value: f64) {
        let t = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - t) + value;
        } else {
            self.compensation += (value - t) + self.sum;
        }
        self.sum = t;
    }

    pub(crate) fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Summary card values for one view.
pub fn compute_metrics(view: &View<'_>) -> MetricSet {
    let mut sales = CompensatedSum::default();
    let mut profit = CompensatedSum::default();
    let mut discount = CompensatedSum::default();
    let mut quantity = 0i64;
    let mut orders: HashSet<&str> = HashSet::new();

    for r in view.iter() {
        sales.add(r.sales);
        profit.add(r.profit);
        discount.add(r.discount);
        quantity += r.quantity;
        orders.insert(r.order_id.as_str());
    }

    let rows = view.len();
    let total_sales = sales.total();
    let total_profit = profit.total();

    let profit_margin_percent = if total_sales == 0.0 {
        0.0
    } else {
        total_profit / total_sales * 100.0
    };

    MetricSet {
        total_sales,
        average_profit: mean(total_profit, rows),
        total_orders: orders.len(),
        total_profit,
        total_quantity: quantity,
        average_discount: mean(discount.total(), rows).map(|d| d * 100.0),
        profit_margin_percent,
    }
}
