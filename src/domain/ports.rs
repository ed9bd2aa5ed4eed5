use crate::domain::model::OrderLine;
use crate::utils::error::Result;

/// Persistence for the line items of one order. Each call is a blocking unit of work
/// that may fail; callers must not assume idempotence.
pub trait LineItemStore {
    fn insert(&mut self, line: &OrderLine) -> Result<()>;
    fn update(&mut self, line: &OrderLine) -> Result<()>;
    fn delete(&mut self, line: &OrderLine) -> Result<()>;
}

impl<S: LineItemStore + ?Sized> LineItemStore for &mut S {
    fn insert(&mut self, line: &OrderLine) -> Result<()> {
        (**self).insert(line)
    }

    fn update(&mut self, line: &OrderLine) -> Result<()> {
        (**self).update(line)
    }

    fn delete(&mut self, line: &OrderLine) -> Result<()> {
        (**self).delete(line)
    }
}

pub trait ConfigProvider {
    fn lookback_days(&self) -> u32;
    fn import_delimiter(&self) -> u8;
    fn line_tag(&self) -> &str;
}
