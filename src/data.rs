use crate::csv_reader::{self, CsvData};
use crate::error::BubbleError;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::Path;

/// In-memory table: a header plus rows of string values aligned to it
#[derive(Debug, Clone)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlotData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_csv(csv: CsvData) -> Self {
        Self {
            headers: csv.headers,
            rows: csv.rows,
        }
    }

    /// Load from a path: `-` reads CSV from stdin, `*.json` is an array of
    /// objects, anything else is CSV.
    pub fn load(path: &Path) -> Result<Self> {
        if path.as_os_str() == "-" {
            return Ok(Self::from_csv(csv_reader::read_csv_from_stdin()?));
        }

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse JSON in '{}'", path.display()))?;
            Self::from_json(&value)
        } else {
            Ok(Self::from_csv(csv_reader::read_csv_file(path)?))
        }
    }

    /// Create PlotData from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        if array.is_empty() {
            return Err(BubbleError::EmptyData.into());
        }

        // Headers come from the first object
        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| anyhow!("Items in array must be objects"))?;
        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Position of `name` in the header (exact match)
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
