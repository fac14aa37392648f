//! Output files: the rendered chart and an optional JSON dump of the
//! normalized datasets.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Dataset;
use crate::error::AppError;

/// Write a text document (SVG or HTML) to `path`.
pub fn write_document(path: &Path, contents: &str) -> Result<(), AppError> {
    std::fs::write(path, contents)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

/// Write the normalized datasets as pretty-printed JSON.
///
/// NaN fields are written as `null`.
pub fn write_datasets_json(path: &Path, datasets: &[Dataset]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON export '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, datasets)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON export: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write JSON export: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DataPoint;
    use chrono::NaiveDate;

    #[test]
    fn json_export_writes_nan_as_null() {
        let dir = std::env::temp_dir().join(format!("stock-chart-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("datasets.json");

        let data = vec![Dataset {
            name: "AAPL".to_string(),
            values: vec![DataPoint {
                timestamp: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap(),
                open: 1.0,
                high: 2.0,
                low: 0.5,
                close: f64::NAN,
                volume: 100.0,
            }],
        }];

        write_datasets_json(&path, &data).unwrap();
        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(json[0]["name"], "AAPL");
        assert_eq!(json[0]["values"][0]["timestamp"], "2020-01-02T00:00:00");
        assert!(json[0]["values"][0]["close"].is_null());
        assert_eq!(json[0]["values"][0]["high"], 2.0);
    }
}
