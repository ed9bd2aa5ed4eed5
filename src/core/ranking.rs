//! Product popularity ranking.
//!
//! Orders are first narrowed to the relevant ones: every active order, plus any order
//! whose delivery is due on or after the start of the lookback window (inclusive).
//! Future due dates count as recent. Quantities are summed per product across those orders and
//! the products are returned from highest to lowest total. Equal totals are ordered
//! by name, and by identity key when names collide, so the output never depends on
//! hash map iteration order.

use crate::core::{Order, Product, RankedProduct};
use chrono::{Days, NaiveDate};
use std::cmp::Ordering;
use std::collections::HashMap;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularityRanker {
    lookback_days: u32,
}

impl Default for PopularityRanker {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_DAYS)
    }
}

impl PopularityRanker {
    pub fn new(lookback_days: u32) -> Self {
        Self { lookback_days }
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// Active orders are always relevant; others when due no earlier than `lookback_days`
    /// before `today`, including orders due after `today`.
    pub fn is_relevant(&self, order: &Order, today: NaiveDate) -> bool {
        if order.is_active() {
            return true;
        }
        let window_start = today
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        order.delivery_due_date >= window_start
    }

    pub fn rank(&self, orders: &[Order], today: NaiveDate) -> Vec<Product> {
        self.rank_with_totals(orders, today)
            .into_iter()
            .map(|ranked| ranked.product)
            .collect()
    }

    pub fn rank_with_totals(&self, orders: &[Order], today: NaiveDate) -> Vec<RankedProduct> {
        let relevant: Vec<&Order> = orders
            .iter()
            .filter(|order| self.is_relevant(order, today))
            .collect();

        let totals = aggregate(relevant.iter().copied());
        tracing::debug!(
            "{} of {} orders relevant, {} distinct products purchased",
            relevant.len(),
            orders.len(),
            totals.len()
        );

        group_by_total(totals)
            .into_iter()
            .flat_map(|(total, products)| {
                products
                    .into_iter()
                    .map(move |product| RankedProduct { product, total })
            })
            .collect()
    }
}

/// Ranks with the default seven-day window.
pub fn rank_products_by_popularity(orders: &[Order], today: NaiveDate) -> Vec<Product> {
    PopularityRanker::default().rank(orders, today)
}

fn aggregate<'a>(orders: impl Iterator<Item = &'a Order>) -> HashMap<Product, u64> {
    let mut totals: HashMap<Product, u64> = HashMap::new();
    for line in orders.flat_map(|order| order.lines.iter()) {
        if line.count == 0 {
            continue;
        }
        *totals.entry(line.product.clone()).or_default() += u64::from(line.count);
    }
    totals
}

fn group_by_total(totals: HashMap<Product, u64>) -> Vec<(u64, Vec<Product>)> {
    let mut groups: HashMap<u64, Vec<Product>> = HashMap::new();
    for (product, total) in totals {
        groups.entry(total).or_default().push(product);
    }

    let mut groups: Vec<(u64, Vec<Product>)> = groups.into_iter().collect();
    groups.sort_by(|a, b| b.0.cmp(&a.0));
    for (_, products) in &mut groups {
        products.sort_by(by_name);
    }
    groups
}

fn by_name(a: &Product, b: &Product) -> Ordering {
    a.name.cmp(&b.name).then_with(|| a.key().cmp(&b.key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderLine, OrderStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn active_order(id: u64, lines: &[(&str, u32)]) -> Order {
        lines.iter().fold(
            Order::new(id, 1, day(1)).with_status(OrderStatus::Active),
            |order, (name, count)| order.with_line(OrderLine::new(Product::new(*name), *count)),
        )
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_ties_broken_by_name() {
        let orders = vec![
            active_order(1, &[("Table", 2), ("Chair", 1)]),
            active_order(2, &[("Armchair", 5), ("Chair", 4)]),
        ];
        let ranked = rank_products_by_popularity(&orders, day(20));
        assert_eq!(names(&ranked), vec!["Armchair", "Chair", "Table"]);
    }

    #[test]
    fn test_window_boundaries_are_inclusive() {
        let ranker = PopularityRanker::default();
        let today = day(20);
        let order = |due| Order::new(1, 1, day(1)).with_delivery_due_date(due);

        assert!(ranker.is_relevant(&order(day(13)), today));
        assert!(ranker.is_relevant(&order(day(20)), today));
        assert!(!ranker.is_relevant(&order(day(12)), today));
        assert!(ranker.is_relevant(&order(day(21)), today));
        assert!(ranker.is_relevant(&order(day(2)).with_status(OrderStatus::Active), today));
    }

    #[test]
    fn test_zero_counts_contribute_nothing() {
        let orders = vec![active_order(1, &[("Chair", 0), ("Table", 1)])];
        let ranked = PopularityRanker::default().rank_with_totals(&orders, day(20));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].product.name, "Table");
        assert_eq!(ranked[0].total, 1);
    }

    #[test]
    fn test_name_collision_falls_back_to_identity_key() {
        let orders = vec![Order::new(1, 1, day(1))
            .with_status(OrderStatus::Active)
            .with_line(OrderLine::new(Product::new("Chair").with_id(9), 1))
            .with_line(OrderLine::new(Product::new("Chair").with_id(3), 1))];
        let ranked = rank_products_by_popularity(&orders, day(20));
        let ids: Vec<Option<u64>> = ranked.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(3), Some(9)]);
    }

    #[test]
    fn test_name_order_is_case_sensitive() {
        let orders = vec![active_order(1, &[("chair", 1), ("Table", 1), ("Chair", 1)])];
        let ranked = rank_products_by_popularity(&orders, day(20));
        assert_eq!(names(&ranked), vec!["Chair", "Table", "chair"]);
    }

    #[test]
    fn test_custom_lookback() {
        let ranker = PopularityRanker::new(0);
        let today = day(20);
        let order = |due| Order::new(1, 1, day(1)).with_delivery_due_date(due);
        assert!(ranker.is_relevant(&order(today), today));
        assert!(ranker.is_relevant(&order(day(25)), today));
        assert!(!ranker.is_relevant(&order(day(19)), today));
    }
}
