pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{
    json_store::JsonOrderStore, line_import::LineImporter, memory_store::InMemoryLineStore,
};
pub use crate::core::ranking::{rank_products_by_popularity, PopularityRanker};
pub use crate::core::reconcile::{plan, ReconcileReport, Reconciler};
pub use domain::model::{
    Customer, LineOperation, LineStatus, Order, OrderLine, OrderStatus, PaymentMethod, Product,
    RankedProduct,
};
pub use domain::ports::{ConfigProvider, LineItemStore};
pub use utils::error::{OrderError, Result};
