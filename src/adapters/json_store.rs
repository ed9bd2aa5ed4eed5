use crate::adapters::memory_store::InMemoryLineStore;
use crate::core::{LineItemStore, Order, OrderLine, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// One order persisted as a JSON document. Line operations are applied in memory and
/// written back by [`JsonOrderStore::save`].
#[derive(Debug)]
pub struct JsonOrderStore {
    path: PathBuf,
    order: Order,
    lines: InMemoryLineStore,
}

impl JsonOrderStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = fs::read(&path)?;
        let order: Order = serde_json::from_slice(&data)?;
        tracing::debug!(
            "Loaded order {} with {} lines from {}",
            order.id,
            order.lines.len(),
            path.display()
        );
        let lines = InMemoryLineStore::from_lines(order.lines.clone());
        Ok(Self { path, order, lines })
    }

    pub fn create(path: impl AsRef<Path>, order: Order) -> Result<Self> {
        let lines = InMemoryLineStore::from_lines(order.lines.clone());
        let store = Self {
            path: path.as_ref().to_path_buf(),
            order,
            lines,
        };
        store.save()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The order as last loaded or saved.
    pub fn order(&self) -> &Order {
        &self.order
    }

    /// Lines including operations not yet saved.
    pub fn current_lines(&self) -> &[OrderLine] {
        self.lines.lines()
    }

    pub fn save(&self) -> Result<()> {
        let mut order = self.order.clone();
        order.lines = self.lines.lines().to_vec();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&order)?)?;
        tracing::debug!("Saved order {} to {}", order.id, self.path.display());
        Ok(())
    }

    /// Saves and returns the persisted order.
    pub fn commit(mut self) -> Result<Order> {
        self.save()?;
        self.order.lines = self.lines.into_lines();
        Ok(self.order)
    }
}

impl LineItemStore for JsonOrderStore {
    fn insert(&mut self, line: &OrderLine) -> Result<()> {
        self.lines.insert(line)
    }

    fn update(&mut self, line: &OrderLine) -> Result<()> {
        self.lines.update(line)
    }

    fn delete(&mut self, line: &OrderLine) -> Result<()> {
        self.lines.delete(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Product;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_operations_persist_after_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("orders").join("order-1.json");
        let order = Order::new(1, 1, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .with_line(OrderLine::new(Product::new("Chair"), 3));

        let mut store = JsonOrderStore::create(&path, order).unwrap();
        store
            .update(&OrderLine::new(Product::new("Chair"), 5))
            .unwrap();

        let unsaved = JsonOrderStore::open(&path).unwrap();
        assert_eq!(unsaved.order().lines[0].count, 3);

        let committed = store.commit().unwrap();
        assert_eq!(committed.lines[0].count, 5);

        let reloaded = JsonOrderStore::open(&path).unwrap();
        assert_eq!(reloaded.order().lines[0].count, 5);
        assert_eq!(reloaded.current_lines().len(), 1);
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = JsonOrderStore::open(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, crate::utils::error::OrderError::IoError(_)));
    }
}
