use crate::core::{LineItemStore, LineOperation, OrderLine, Product, Result};
use crate::utils::error::OrderError;

/// Line store backed by a `Vec`, keyed by product.
///
/// Every accepted call is appended to an operation log. A failure can be armed for one
/// operation on one product to exercise partial application.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLineStore {
    lines: Vec<OrderLine>,
    log: Vec<LineOperation>,
    fail_on: Option<(&'static str, Product)>,
}

impl InMemoryLineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<OrderLine>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }

    /// Makes the next `operation` ("insert", "update" or "delete") on `product` fail.
    pub fn fail_on(mut self, operation: &'static str, product: Product) -> Self {
        self.fail_on = Some((operation, product));
        self
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<OrderLine> {
        self.lines
    }

    pub fn log(&self) -> &[LineOperation] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    fn position(&self, product: &Product) -> Option<usize> {
        self.lines.iter().position(|line| line.product == *product)
    }

    fn check_failure(&mut self, operation: &'static str, line: &OrderLine) -> Result<()> {
        let armed = matches!(
            &self.fail_on,
            Some((op, product)) if *op == operation && *product == line.product
        );
        if armed {
            self.fail_on = None;
            return Err(rejected(operation, line, "injected failure"));
        }
        Ok(())
    }
}

fn rejected(operation: &str, line: &OrderLine, message: &str) -> OrderError {
    OrderError::StoreError {
        operation: operation.to_string(),
        product: line.product.name.clone(),
        message: message.to_string(),
    }
}

impl LineItemStore for InMemoryLineStore {
    fn insert(&mut self, line: &OrderLine) -> Result<()> {
        self.check_failure("insert", line)?;
        if self.position(&line.product).is_some() {
            return Err(rejected("insert", line, "a line for this product already exists"));
        }
        self.lines.push(line.clone());
        self.log.push(LineOperation::Insert(line.clone()));
        Ok(())
    }

    fn update(&mut self, line: &OrderLine) -> Result<()> {
        self.check_failure("update", line)?;
        let index = self
            .position(&line.product)
            .ok_or_else(|| rejected("update", line, "no stored line for this product"))?;
        self.lines[index] = line.clone();
        self.log.push(LineOperation::Update(line.clone()));
        Ok(())
    }

    fn delete(&mut self, line: &OrderLine) -> Result<()> {
        self.check_failure("delete", line)?;
        let index = self
            .position(&line.product)
            .ok_or_else(|| rejected("delete", line, "no stored line for this product"))?;
        self.lines.remove(index);
        self.log.push(LineOperation::Delete(line.clone()));
        Ok(())
    }
}
