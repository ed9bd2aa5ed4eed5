use crate::core::{Customer, LineStatus, Order, PaymentMethod, Product};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub fn active_orders(customer: &Customer) -> Vec<&Order> {
    customer.orders.iter().filter(|order| order.is_active()).collect()
}

pub fn find_order(orders: &[Order], order_id: u64) -> Option<&Order> {
    orders.iter().find(|order| order.id == order_id)
}

pub fn has_active_orders(customer: &Customer) -> bool {
    customer.orders.iter().any(Order::is_active)
}

/// Orders containing a special-offer line cannot be returned.
pub fn can_be_returned(order: &Order) -> bool {
    !order.lines.iter().any(|line| line.special_offer)
}

/// Ties keep the earliest order in the customer's list.
pub fn most_expensive_order(customer: &Customer) -> Option<&Order> {
    customer.orders.iter().reduce(|best, order| {
        if order.total_price_cents() > best.total_price_cents() {
            order
        } else {
            best
        }
    })
}

pub fn latest_orders(customer: &Customer, limit: usize) -> Vec<&Order> {
    let mut orders: Vec<&Order> = customer.orders.iter().collect();
    orders.sort_by(|a, b| b.creation_date.cmp(&a.creation_date));
    orders.truncate(limit);
    orders
}

pub fn used_payment_methods(customer: &Customer) -> BTreeSet<PaymentMethod> {
    customer
        .orders
        .iter()
        .map(|order| order.payment_method)
        .collect()
}

pub fn order_dates_ascending(customer: &Customer) -> BTreeSet<NaiveDate> {
    customer
        .orders
        .iter()
        .map(|order| order.creation_date)
        .collect()
}

pub fn orders_by_id(customer: &Customer) -> HashMap<u64, &Order> {
    customer
        .orders
        .iter()
        .map(|order| (order.id, order))
        .collect()
}

pub fn orders_by_payment_method(customer: &Customer) -> BTreeMap<PaymentMethod, Vec<&Order>> {
    let mut grouped: BTreeMap<PaymentMethod, Vec<&Order>> = BTreeMap::new();
    for order in &customer.orders {
        grouped.entry(order.payment_method).or_default().push(order);
    }
    grouped
}

/// Total quantity bought per product across all of the customer's orders.
pub fn product_counts(customer: &Customer) -> HashMap<Product, u64> {
    let mut counts: HashMap<Product, u64> = HashMap::new();
    for line in customer.orders.iter().flat_map(|order| &order.lines) {
        *counts.entry(line.product.clone()).or_default() += u64::from(line.count);
    }
    counts
}

/// Distinct products the customer bought, sorted by name.
pub fn ordered_products(customer: &Customer) -> Vec<Product> {
    let mut seen = HashSet::new();
    let mut products: Vec<Product> = customer
        .orders
        .iter()
        .flat_map(|order| &order.lines)
        .filter(|line| seen.insert(&line.product))
        .map(|line| line.product.clone())
        .collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    products
}

/// e.g. "Armchair,Chair,Table"
pub fn product_names_joined(customer: &Customer) -> String {
    let names: BTreeSet<&str> = customer
        .orders
        .iter()
        .flat_map(|order| &order.lines)
        .map(|line| line.product.name.as_str())
        .collect();
    names.into_iter().collect::<Vec<_>>().join(",")
}

/// Sum of all order totals in whole currency units, each order truncated.
pub fn approximate_total_price(customer: &Customer) -> u64 {
    customer
        .orders
        .iter()
        .map(|order| order.total_price_cents() / 100)
        .sum()
}

/// Customers owning an order due before `warning_date` that still has a line not in stock.
pub fn customers_to_notify_of_overdue_orders(
    orders: &[Order],
    warning_date: NaiveDate,
) -> BTreeSet<u64> {
    orders
        .iter()
        .filter(|order| {
            order.delivery_due_date < warning_date
                && order
                    .lines
                    .iter()
                    .any(|line| line.status != LineStatus::InStock)
        })
        .map(|order| order.customer_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{OrderLine, OrderStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn chair() -> Product {
        Product::new("Chair").with_unit_price_cents(2_550)
    }

    fn table() -> Product {
        Product::new("Table").with_unit_price_cents(10_000)
    }

    fn customer() -> Customer {
        Customer::new(1, "Ana")
            .with_order(
                Order::new(10, 1, day(1))
                    .with_status(OrderStatus::Active)
                    .with_payment_method(PaymentMethod::Card)
                    .with_line(OrderLine::new(chair(), 2)),
            )
            .with_order(
                Order::new(11, 1, day(5))
                    .with_payment_method(PaymentMethod::Cash)
                    .with_line(OrderLine::new(table(), 1))
                    .with_line(OrderLine::new(chair(), 1).with_special_offer(true)),
            )
            .with_order(
                Order::new(12, 1, day(3))
                    .with_status(OrderStatus::Inactive)
                    .with_payment_method(PaymentMethod::Card)
                    .with_line(OrderLine::new(Product::new("Armchair"), 1)),
            )
    }

    #[test]
    fn test_active_order_queries() {
        let customer = customer();
        let active: Vec<u64> = active_orders(&customer).iter().map(|o| o.id).collect();
        assert_eq!(active, vec![10]);
        assert!(has_active_orders(&customer));
        assert!(!has_active_orders(&Customer::new(2, "Bo")));
    }

    #[test]
    fn test_find_order() {
        let customer = customer();
        assert_eq!(find_order(&customer.orders, 11).map(|o| o.id), Some(11));
        assert!(find_order(&customer.orders, 99).is_none());
    }

    #[test]
    fn test_can_be_returned() {
        let customer = customer();
        assert!(can_be_returned(&customer.orders[0]));
        assert!(!can_be_returned(&customer.orders[1]));
    }

    #[test]
    fn test_most_expensive_and_latest() {
        let customer = customer();
        assert_eq!(most_expensive_order(&customer).map(|o| o.id), Some(11));
        assert!(most_expensive_order(&Customer::new(2, "Bo")).is_none());

        let latest: Vec<u64> = latest_orders(&customer, 2).iter().map(|o| o.id).collect();
        assert_eq!(latest, vec![11, 12]);
    }

    #[test]
    fn test_most_expensive_tie_keeps_first_order() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let priced = |id| {
            Order::new(id, 1, day)
                .with_line(OrderLine::new(Product::new("Chair").with_unit_price_cents(100), 1))
        };
        let customer = Customer::new(3, "Cy").with_order(priced(1)).with_order(priced(2));
        assert_eq!(most_expensive_order(&customer).map(|o| o.id), Some(1));
    }

    #[test]
    fn test_payment_method_queries() {
        let customer = customer();
        let methods: Vec<PaymentMethod> = used_payment_methods(&customer).into_iter().collect();
        assert_eq!(methods, vec![PaymentMethod::Cash, PaymentMethod::Card]);

        let grouped = orders_by_payment_method(&customer);
        assert_eq!(grouped[&PaymentMethod::Card].len(), 2);
        assert_eq!(grouped[&PaymentMethod::Cash].len(), 1);
        assert_eq!(orders_by_id(&customer)[&12].id, 12);
    }

    #[test]
    fn test_order_dates_ascending() {
        let dates: Vec<NaiveDate> = order_dates_ascending(&customer()).into_iter().collect();
        assert_eq!(dates, vec![day(1), day(3), day(5)]);
    }

    #[test]
    fn test_product_aggregates() {
        let customer = customer();
        let counts = product_counts(&customer);
        assert_eq!(counts[&chair()], 3);
        assert_eq!(counts[&table()], 1);

        let names: Vec<String> = ordered_products(&customer)
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Armchair", "Chair", "Table"]);
        assert_eq!(product_names_joined(&customer), "Armchair,Chair,Table");
    }

    #[test]
    fn test_approximate_total_price() {
        // 51.00 + (100.00 + 25.50 -> 125) + 0
        assert_eq!(approximate_total_price(&customer()), 176);
    }

    #[test]
    fn test_customers_to_notify() {
        let pending = OrderLine::new(chair(), 1).with_status(LineStatus::Pending);
        let orders = vec![
            Order::new(1, 7, day(1))
                .with_delivery_due_date(day(2))
                .with_line(pending.clone()),
            Order::new(2, 8, day(1))
                .with_delivery_due_date(day(2))
                .with_line(OrderLine::new(chair(), 1)),
            Order::new(3, 9, day(1))
                .with_delivery_due_date(day(20))
                .with_line(pending),
        ];
        let notify: Vec<u64> = customers_to_notify_of_overdue_orders(&orders, day(10))
            .into_iter()
            .collect();
        assert_eq!(notify, vec![7]);
    }
}
