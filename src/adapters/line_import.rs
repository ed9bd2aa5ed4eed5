use crate::core::{ConfigProvider, OrderLine, Product, Result};
use crate::utils::error::OrderError;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_DELIMITER: u8 = b';';
pub const DEFAULT_LINE_TAG: &str = "LINE";

/// Reads submitted order lines from delimited text such as
///
/// ```text
/// ORDER;42
/// LINE;Chair;5
/// LINE;Table;1;true
/// ```
///
/// Only rows tagged `LINE` are kept. The optional fourth cell is the special-offer flag.
/// Rows are validated here so the reconciler only ever sees non-negative counts and at
/// most one line per product.
#[derive(Debug, Clone)]
pub struct LineImporter {
    delimiter: u8,
    line_tag: String,
}

impl Default for LineImporter {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER, DEFAULT_LINE_TAG)
    }
}

impl LineImporter {
    pub fn new(delimiter: u8, line_tag: impl Into<String>) -> Self {
        Self {
            delimiter,
            line_tag: line_tag.into(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.import_delimiter(), config.line_tag())
    }

    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<OrderLine>> {
        let file = File::open(path.as_ref())?;
        tracing::debug!("Importing order lines from {}", path.as_ref().display());
        self.read(file)
    }

    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<OrderLine>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut lines = Vec::new();
        let mut seen = HashSet::new();
        let mut skipped = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            let line_no = record.position().map(|p| p.line()).unwrap_or(0);

            if record.get(0) != Some(self.line_tag.as_str()) {
                skipped += 1;
                continue;
            }

            let line = parse_line(&record, line_no)?;
            if !seen.insert(line.product.clone()) {
                return Err(OrderError::validation(format!(
                    "Duplicate product '{}' at line {}",
                    line.product, line_no
                )));
            }
            lines.push(line);
        }

        if skipped > 0 {
            tracing::warn!(
                "Skipped {} rows not tagged '{}'",
                skipped,
                self.line_tag
            );
        }
        tracing::info!("📥 Imported {} order lines", lines.len());
        Ok(lines)
    }
}

fn parse_line(record: &csv::StringRecord, line_no: u64) -> Result<OrderLine> {
    let import_error = |message: String| OrderError::ImportError {
        line: line_no,
        message,
    };

    let name = record
        .get(1)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| import_error("missing product name".to_string()))?;

    let raw_count = record
        .get(2)
        .filter(|count| !count.is_empty())
        .ok_or_else(|| import_error("missing count".to_string()))?;
    let count: i64 = raw_count
        .parse()
        .map_err(|_| import_error(format!("count '{}' is not an integer", raw_count)))?;
    if count < 0 {
        return Err(OrderError::validation(format!(
            "Negative items for '{}' at line {}",
            name, line_no
        )));
    }
    let count = u32::try_from(count)
        .map_err(|_| import_error(format!("count {} is too large", count)))?;

    let special_offer = match record.get(3) {
        None | Some("") | Some("false") | Some("0") => false,
        Some("true") | Some("1") => true,
        Some(other) => {
            return Err(import_error(format!(
                "special offer flag '{}' must be true or false",
                other
            )))
        }
    };

    Ok(OrderLine::new(Product::new(name), count).with_special_offer(special_offer))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn import(text: &str) -> Result<Vec<OrderLine>> {
        LineImporter::default().read(text.as_bytes())
    }

    #[test]
    fn test_keeps_only_tagged_rows() {
        let lines = import("ORDER;42\nLINE;Chair;5\nCOMMENT;ignored\nLINE;Table;1;true\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product.name, "Chair");
        assert_eq!(lines[0].count, 5);
        assert!(!lines[0].special_offer);
        assert_eq!(lines[1].product.name, "Table");
        assert!(lines[1].special_offer);
    }

    #[test]
    fn test_negative_count_is_validation_error() {
        let err = import("LINE;Chair;-1\n").unwrap_err();
        assert!(matches!(err, OrderError::ValidationError { .. }));
        assert!(err.to_string().contains("Negative items"));
    }

    #[test]
    fn test_malformed_rows_report_line_number() {
        let err = import("LINE;Chair;3\nLINE;Table;lots\n").unwrap_err();
        match err {
            OrderError::ImportError { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("lots"));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            import("LINE;Chair\n").unwrap_err(),
            OrderError::ImportError { line: 1, .. }
        ));
        assert!(matches!(
            import("LINE;;4\n").unwrap_err(),
            OrderError::ImportError { .. }
        ));
    }

    #[test]
    fn test_duplicate_products_rejected() {
        let err = import("LINE;Chair;1\nLINE;Chair;2\n").unwrap_err();
        assert!(matches!(err, OrderError::ValidationError { .. }));
    }

    #[test]
    fn test_custom_delimiter_and_tag() {
        let lines = LineImporter::new(b'|', "ITEM")
            .read("ITEM| Chair |2\nLINE;Table;1\n".as_bytes())
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product.name, "Chair");
    }

    #[test]
    fn test_empty_input() {
        assert!(import("").unwrap().is_empty());
    }
}
