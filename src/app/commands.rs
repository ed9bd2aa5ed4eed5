use crate::adapters::json_store::JsonOrderStore;
use crate::adapters::line_import::LineImporter;
use crate::core::history;
use crate::core::ranking::PopularityRanker;
use crate::adapters::memory_store::InMemoryLineStore;
use crate::core::reconcile::{self, ReconcileReport};
use crate::core::{
    ConfigProvider, Customer, LineOperation, Order, PaymentMethod, RankedProduct, Result,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    pub order_id: u64,
    pub operations: Vec<LineOperation>,
    pub report: ReconcileReport,
    pub saved: bool,
}

/// Reconciles the stored order at `order_path` against lines imported from `lines_path`.
/// Nothing is written when `dry_run` is set or when any store call fails. A dry run
/// applies the same operations to a scratch copy of the stored lines.
pub fn reconcile_order_file<C: ConfigProvider + ?Sized>(
    config: &C,
    order_path: &Path,
    lines_path: &Path,
    dry_run: bool,
) -> Result<ReconcileOutcome> {
    let mut store = JsonOrderStore::open(order_path)?;
    let new_lines = LineImporter::from_config(config).read_path(lines_path)?;
    let old_lines = store.order().lines.clone();
    let order_id = store.order().id;
    let operations = reconcile::plan(&old_lines, &new_lines);
    tracing::debug!(
        "Order {}: {} stored lines, {} submitted lines, {} operations",
        order_id,
        old_lines.len(),
        new_lines.len(),
        operations.len()
    );

    let report = if dry_run {
        tracing::info!("🔍 Dry run, {} operations not applied", operations.len());
        let mut scratch = InMemoryLineStore::from_lines(old_lines.clone());
        reconcile::apply(&mut scratch, &operations)?
    } else {
        reconcile::apply(&mut store, &operations)?
    }
    .with_unchanged(old_lines.len());

    let saved = !dry_run && !report.is_noop();
    if saved {
        store.commit()?;
        tracing::info!("💾 Order {} saved to {}", order_id, order_path.display());
    }

    Ok(ReconcileOutcome {
        order_id,
        operations,
        report,
        saved,
    })
}

pub fn format_reconcile(outcome: &ReconcileOutcome) -> String {
    let mut out = String::new();
    for operation in &outcome.operations {
        let line = operation.line();
        let _ = writeln!(out, "{:<6} {} x{}", operation.kind(), line.product, line.count);
    }
    let report = &outcome.report;
    let _ = write!(
        out,
        "order {}: {} deleted, {} inserted, {} updated, {} unchanged{}",
        outcome.order_id,
        report.deleted,
        report.inserted,
        report.updated,
        report.unchanged,
        if outcome.saved { "" } else { " (not saved)" }
    );
    out
}

pub fn load_orders(path: &Path) -> Result<Vec<Order>> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

pub fn load_customer(path: &Path) -> Result<Customer> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

pub fn rank_orders<C: ConfigProvider + ?Sized>(
    config: &C,
    orders: &[Order],
    today: NaiveDate,
    lookback_override: Option<u32>,
) -> Vec<RankedProduct> {
    let ranker = PopularityRanker::new(lookback_override.unwrap_or_else(|| config.lookback_days()));
    tracing::debug!(
        "Ranking {} orders on {} with a {}-day window",
        orders.len(),
        today,
        ranker.lookback_days()
    );
    ranker.rank_with_totals(orders, today)
}

pub fn format_ranking(ranked: &[RankedProduct], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(ranked)?);
    }
    let mut out = String::new();
    for (position, entry) in ranked.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {} ({})", position + 1, entry.product, entry.total);
    }
    Ok(out.trim_end().to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerReport {
    pub customer: String,
    pub order_count: usize,
    pub active_order_ids: Vec<u64>,
    pub returnable_order_ids: Vec<u64>,
    pub most_expensive_order_id: Option<u64>,
    pub latest_order_ids: Vec<u64>,
    pub payment_methods: Vec<PaymentMethod>,
    pub products: String,
    pub approximate_total: u64,
}

const LATEST_ORDERS: usize = 3;

pub fn customer_report(customer: &Customer) -> CustomerReport {
    CustomerReport {
        customer: customer.name.clone(),
        order_count: customer.orders.len(),
        active_order_ids: history::active_orders(customer)
            .iter()
            .map(|order| order.id)
            .collect(),
        returnable_order_ids: customer
            .orders
            .iter()
            .filter(|order| history::can_be_returned(order))
            .map(|order| order.id)
            .collect(),
        most_expensive_order_id: history::most_expensive_order(customer).map(|order| order.id),
        latest_order_ids: history::latest_orders(customer, LATEST_ORDERS)
            .iter()
            .map(|order| order.id)
            .collect(),
        payment_methods: history::used_payment_methods(customer).into_iter().collect(),
        products: history::product_names_joined(customer),
        approximate_total: history::approximate_total_price(customer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderLine, OrderStatus, Product};

    #[test]
    fn test_format_ranking_text() {
        let ranked = vec![
            RankedProduct {
                product: Product::new("Chair"),
                total: 5,
            },
            RankedProduct {
                product: Product::new("Table"),
                total: 2,
            },
        ];
        assert_eq!(
            format_ranking(&ranked, false).unwrap(),
            "  1. Chair (5)\n  2. Table (2)"
        );
        assert!(format_ranking(&ranked, true).unwrap().contains("\"total\": 5"));
        assert_eq!(format_ranking(&[], false).unwrap(), "");
    }

    #[test]
    fn test_customer_report() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let customer = Customer::new(1, "Ana")
            .with_order(
                Order::new(1, 1, day(1))
                    .with_status(OrderStatus::Active)
                    .with_line(OrderLine::new(Product::new("Chair").with_unit_price_cents(999), 2)),
            )
            .with_order(
                Order::new(2, 1, day(2))
                    .with_payment_method(PaymentMethod::Card)
                    .with_line(OrderLine::new(Product::new("Table"), 1).with_special_offer(true)),
            );

        let report = customer_report(&customer);
        assert_eq!(report.order_count, 2);
        assert_eq!(report.active_order_ids, vec![1]);
        assert_eq!(report.returnable_order_ids, vec![1]);
        assert_eq!(report.most_expensive_order_id, Some(1));
        assert_eq!(report.latest_order_ids, vec![2, 1]);
        assert_eq!(report.payment_methods, vec![PaymentMethod::Cash, PaymentMethod::Card]);
        assert_eq!(report.products, "Chair,Table");
        assert_eq!(report.approximate_total, 19);
    }
}
