use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::debug;

use crate::io_utils;

/// Header row plus the first rows of a delimited file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sample {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Reads the header and up to `limit` data rows (`0` reads everything).
pub fn read_sample(
    path: &Path,
    delimiter: u8,
    encoding: &'static Encoding,
    limit: usize,
) -> Result<Sample> {
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)
        .with_context(|| format!("Reading headers from {path:?}"))?;
    if headers.is_empty() || headers.iter().all(|header| header.trim().is_empty()) {
        bail!("No header row found in {path:?}");
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        if limit > 0 && idx >= limit {
            break;
        }
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        if decoded.len() != headers.len() {
            debug!(
                "Row {} has {} field(s); header has {}",
                idx + 2,
                decoded.len(),
                headers.len()
            );
        }
        rows.push(decoded);
    }
    Ok(Sample { headers, rows })
}
