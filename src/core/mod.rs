pub mod history;
pub mod ranking;
pub mod reconcile;

pub use crate::domain::model::{
    Customer, LineOperation, LineStatus, Order, OrderLine, OrderStatus, PaymentMethod, Product,
    ProductKey, RankedProduct,
};
pub use crate::domain::ports::{ConfigProvider, LineItemStore};
pub use crate::utils::error::Result;
