use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A catalog item. Two products are the same product when their identity keys match,
/// regardless of which instance is holding the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub unit_price_cents: u64,
}

/// Identity of a [`Product`]: the explicit id when present, the name otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProductKey<'a> {
    Id(u64),
    Name(&'a str),
}

impl Product {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            unit_price_cents: 0,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_unit_price_cents(mut self, cents: u64) -> Self {
        self.unit_price_cents = cents;
        self
    }

    pub fn key(&self) -> ProductKey<'_> {
        match self.id {
            Some(id) => ProductKey::Id(id),
            None => ProductKey::Name(&self.name),
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    #[default]
    InStock,
    Pending,
    OutOfStock,
}

/// One product-quantity entry of an order.
///
/// Everything besides `product` and `count` is auxiliary: reconciliation never
/// rewrites it on a line that already exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: Product,
    pub count: u32,
    #[serde(default)]
    pub status: LineStatus,
    #[serde(default)]
    pub special_offer: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl OrderLine {
    pub fn new(product: Product, count: u32) -> Self {
        Self {
            product,
            count,
            status: LineStatus::default(),
            special_offer: false,
            annotations: BTreeMap::new(),
        }
    }

    pub fn with_status(mut self, status: LineStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_special_offer(mut self, special_offer: bool) -> Self {
        self.special_offer = special_offer;
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    /// Copy of this line carrying a different `count`; all other fields are kept.
    pub fn with_count(&self, count: u32) -> Self {
        Self {
            count,
            ..self.clone()
        }
    }

    pub fn price_cents(&self) -> u64 {
        u64::from(self.count) * self.product.unit_price_cents
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    OnDelivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer_id: u64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
    pub delivery_due_date: NaiveDate,
    pub creation_date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl Order {
    pub fn new(id: u64, customer_id: u64, creation_date: NaiveDate) -> Self {
        Self {
            id,
            customer_id,
            status: OrderStatus::default(),
            lines: Vec::new(),
            delivery_due_date: creation_date,
            creation_date,
            payment_method: PaymentMethod::default(),
        }
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_delivery_due_date(mut self, date: NaiveDate) -> Self {
        self.delivery_due_date = date;
        self
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_line(mut self, line: OrderLine) -> Self {
        self.lines.push(line);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }

    pub fn line_for(&self, product: &Product) -> Option<&OrderLine> {
        self.lines.iter().find(|line| line.product == *product)
    }

    /// Derived from the lines; never stored.
    pub fn total_price_cents(&self) -> u64 {
        self.lines.iter().map(OrderLine::price_cents).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub orders: Vec<Order>,
}

impl Customer {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            orders: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }
}

/// A single persistence call produced by reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOperation {
    Delete(OrderLine),
    Insert(OrderLine),
    Update(OrderLine),
}

impl LineOperation {
    pub fn line(&self) -> &OrderLine {
        match self {
            Self::Delete(line) | Self::Insert(line) | Self::Update(line) => line,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Delete(_) => "delete",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
        }
    }
}

/// A product with its aggregated purchase volume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
    pub product: Product,
    pub total: u64,
}
