// Adapters layer: concrete stores and the file import for submitted lines.

pub mod json_store;
pub mod line_import;
pub mod memory_store;
