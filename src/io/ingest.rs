//! CSV ingest.
//!
//! The first line is a header and is skipped. Every remaining record is handed
//! to [`Dataset::from_rows`] as text, so parsing errors carry the file line.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data::{ColumnSpec, Dataset, DatasetError};

/// Line number of the first data row (line 1 is the header).
const FIRST_DATA_LINE: usize = 2;

/// Load a CSV file into a design matrix / response vector pair.
pub fn load_dataset(path: &Path, spec: &ColumnSpec) -> Result<Dataset, DatasetError> {
    let file = File::open(path)
        .map_err(|e| DatasetError::Io(format!("Failed to open CSV '{}': {e}", path.display())))?;
    read_dataset(file, spec)
}

/// Parse CSV from any reader. Used directly by tests.
pub fn read_dataset<R: Read>(reader: R, spec: &ColumnSpec) -> Result<Dataset, DatasetError> {
    let records = read_records(reader)?;
    tracing::debug!(rows = records.len(), "read CSV records");
    Dataset::from_rows(&records, spec, FIRST_DATA_LINE)
}

fn read_records<R: Read>(reader: R) -> Result<Vec<Vec<String>>, DatasetError> {
    // Flexible so that a short row surfaces as a `MissingColumn` with a line
    // number instead of a generic csv length error.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut out = Vec::new();
    let mut record = StringRecord::new();
    loop {
        match reader.read_record(&mut record) {
            Ok(true) => out.push(record.iter().map(str::to_string).collect()),
            Ok(false) => break,
            Err(e) => return Err(DatasetError::Io(format!("Failed to read CSV: {e}"))),
        }
    }
    Ok(out)
}
