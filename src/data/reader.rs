use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::debug;

use super::dataset::Dataset;
use super::record::{Label, RealNumber, Record};
use crate::error::{ForestError, Result};

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(b' ')
        .flexible(true)
        .quoting(false);
    builder
}

/// Reads a sparse `label index:value ...` file into a dataset.
pub fn read_sparse_file<T: RealNumber, P: AsRef<Path>>(path: P) -> Result<Dataset<T>> {
    let path = path.as_ref();
    let reader = builder().from_path(path)?;
    let dataset = collect(reader)?;
    debug!(path = %path.display(), records = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Same as [`read_sparse_file`], from any byte source.
pub fn read_sparse<T: RealNumber, R: io::Read>(source: R) -> Result<Dataset<T>> {
    collect(builder().from_reader(source))
}

fn collect<T: RealNumber, R: io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset<T>> {
    let mut records = Vec::new();
    for (ordinal, result) in reader.records().enumerate() {
        let row = result?;
        let line = row
            .position()
            .map_or(ordinal + 1, |position| position.line() as usize);
        if let Some(record) = parse_record(line, &row)? {
            records.push(record);
        }
    }
    Ok(Dataset::new(records))
}

fn parse_record<T: RealNumber>(line: usize, row: &StringRecord) -> Result<Option<Record<T>>> {
    let mut tokens = row.iter().flat_map(str::split_whitespace);

    let Some(head) = tokens.next() else {
        return Ok(None);
    };
    let raw: i64 = head.parse().map_err(|_| ForestError::MalformedLabel {
        line,
        token: head.to_string(),
    })?;
    let label = Label::from_raw(raw).ok_or(ForestError::UnsetLabel { line })?;

    let mut features = BTreeMap::new();
    for token in tokens {
        let malformed = || ForestError::MalformedFeature {
            line,
            token: token.to_string(),
        };
        let (index, value) = token.split_once(':').ok_or_else(malformed)?;
        let index: usize = index.parse().map_err(|_| malformed())?;
        let value: T = value.parse().map_err(|_| malformed())?;
        if !value.is_finite() {
            return Err(malformed());
        }
        features.insert(index, value);
    }

    Ok(Some(Record::new(label, features)))
}
