use crate::core::{LineItemStore, LineOperation, OrderLine, Product, Result};
use std::collections::HashMap;

/// Counts of store calls issued by one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub deleted: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl ReconcileReport {
    pub fn operations(&self) -> usize {
        self.deleted + self.inserted + self.updated
    }

    pub fn is_noop(&self) -> bool {
        self.operations() == 0
    }

    /// Fills `unchanged` from the number of lines stored before the run.
    pub fn with_unchanged(mut self, stored_lines: usize) -> Self {
        self.unchanged = stored_lines.saturating_sub(self.deleted + self.updated);
        self
    }
}

/// Computes the operations that move `old_lines` to `new_lines`.
///
/// Both slices must hold at most one line per product. Deletes come first (old order),
/// then inserts (new order), then updates (old order). An update carries the old line
/// with only `count` replaced.
pub fn plan(old_lines: &[OrderLine], new_lines: &[OrderLine]) -> Vec<LineOperation> {
    let old_by_product: HashMap<&Product, &OrderLine> =
        old_lines.iter().map(|line| (&line.product, line)).collect();
    let new_by_product: HashMap<&Product, &OrderLine> =
        new_lines.iter().map(|line| (&line.product, line)).collect();

    let deletes = old_lines
        .iter()
        .filter(|old| !new_by_product.contains_key(&old.product))
        .map(|old| LineOperation::Delete(old.clone()));

    let inserts = new_lines
        .iter()
        .filter(|new| !old_by_product.contains_key(&new.product))
        .map(|new| LineOperation::Insert(new.clone()));

    // 不能刪掉再新增，其他欄位要保留
    let updates = old_lines.iter().filter_map(|old| {
        let new = new_by_product.get(&old.product)?;
        (old.count != new.count).then(|| LineOperation::Update(old.with_count(new.count)))
    });

    deletes.chain(inserts).chain(updates).collect()
}

/// Issues every planned operation against `store`, stopping at the first failure.
///
/// Operations already issued stay applied; the store error is returned as is.
pub fn apply<S: LineItemStore + ?Sized>(
    store: &mut S,
    operations: &[LineOperation],
) -> Result<ReconcileReport> {
    let mut report = ReconcileReport::default();
    for operation in operations {
        tracing::debug!(
            "{} line '{}' (count {})",
            operation.kind(),
            operation.line().product,
            operation.line().count
        );
        match operation {
            LineOperation::Delete(line) => {
                store.delete(line)?;
                report.deleted += 1;
            }
            LineOperation::Insert(line) => {
                store.insert(line)?;
                report.inserted += 1;
            }
            LineOperation::Update(line) => {
                store.update(line)?;
                report.updated += 1;
            }
        }
    }
    Ok(report)
}

pub struct Reconciler<S: LineItemStore> {
    store: S,
}

impl<S: LineItemStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn reconcile(
        &mut self,
        old_lines: &[OrderLine],
        new_lines: &[OrderLine],
    ) -> Result<ReconcileReport> {
        let operations = plan(old_lines, new_lines);
        tracing::debug!(
            "Reconciling {} stored lines against {} submitted lines: {} operations",
            old_lines.len(),
            new_lines.len(),
            operations.len()
        );

        let report = apply(&mut self.store, &operations)?.with_unchanged(old_lines.len());

        tracing::info!(
            deleted = report.deleted,
            inserted = report.inserted,
            updated = report.updated,
            unchanged = report.unchanged,
            "Order lines reconciled"
        );
        Ok(report)
    }
}
