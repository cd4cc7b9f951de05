// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helper functions to write and read the frame metrics CSV table.
//!
//! One row per frame, in recording order, one column per metric.
//! Columns are the union of the keys of all records, in order of first appearance,
//! so `frame_idx` and `timestamp` always come first.
//! A metric absent from a record is written as an empty cell.

use itertools::Itertools;
use std::{fs, io, path::Path};

use crate::core::record::{keys, MetricRecord, Value};
use crate::error::{Error, Result};

/// Name of the table file in the output directory.
pub const FILE_NAME: &str = "frame_metrics.csv";

/// Columns of the table: union of all record keys, in order of first appearance.
pub fn columns(records: &[MetricRecord]) -> Vec<&str> {
    records.iter().flat_map(MetricRecord::keys).unique().collect()
}

/// Serialize records into a CSV buffer.
pub fn to_bytes(records: &[MetricRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    to_writer(&mut writer, records)?;
    writer
        .into_inner()
        .map_err(|err| Error::Io(err.into_error()))
}

/// Serialize records with a given CSV writer.
pub fn to_writer<W: io::Write>(writer: &mut csv::Writer<W>, records: &[MetricRecord]) -> Result<()> {
    // First pass: all columns. Second pass: rows with empty cells for missing keys.
    let columns = columns(records);
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|column| cell(record, column)))?;
    }
    writer.flush()?;
    Ok(())
}

fn cell(record: &MetricRecord, column: &str) -> String {
    record
        .get(column)
        .map(|value| value.to_string())
        .unwrap_or_default()
}

/// Write records to a CSV file, replacing any previous content.
///
/// The whole table is serialized before touching the file,
/// so a serialization failure never leaves a truncated file behind.
pub fn write<P: AsRef<Path>>(file_path: P, records: &[MetricRecord]) -> Result<()> {
    let bytes = to_bytes(records)?;
    fs::write(file_path, bytes)?;
    Ok(())
}

/// Read a frame metrics CSV file.
pub fn read<P: AsRef<Path>>(file_path: P) -> Result<Vec<MetricRecord>> {
    let file = fs::File::open(file_path)?;
    from_reader(file)
}

/// Parse frame metrics from a CSV source.
///
/// Empty cells are absent metrics.
/// Unknown columns are kept, their values are parsed as floats.
pub fn from_reader<R: io::Read>(reader: R) -> Result<Vec<MetricRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut frame_idx = None;
        let mut timestamp = None;
        let mut entries = Vec::new();
        for (column, content) in headers.iter().zip(row.iter()) {
            if content.is_empty() {
                continue;
            }
            match (column, parse_cell(column, content)?) {
                (keys::FRAME_IDX, Value::Int(idx)) => frame_idx = Some(idx),
                (keys::TIMESTAMP, value) => timestamp = Some(value.as_f64()),
                (_, value) => entries.push((column.to_string(), value)),
            }
        }
        let frame_idx = frame_idx.ok_or_else(|| missing(keys::FRAME_IDX))?;
        let timestamp = timestamp.ok_or_else(|| missing(keys::TIMESTAMP))?;
        let mut record = MetricRecord::new(frame_idx, timestamp);
        entries
            .into_iter()
            .for_each(|(key, value)| record.insert(key, value));
        records.push(record);
    }
    Ok(records)
}

fn missing(column: &str) -> Error {
    Error::Parse {
        column: column.to_string(),
        value: String::new(),
    }
}

/// Counts are integers, everything else is a float.
///
/// Integers written as floats (`100.0`) by other tools are accepted.
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
fn parse_cell(column: &str, content: &str) -> Result<Value> {
    let parse_error = || Error::Parse {
        column: column.to_string(),
        value: content.to_string(),
    };
    let float: f64 = content.trim().parse().map_err(|_| parse_error())?;
    if keys::INTEGER_KEYS.contains(&column) {
        match content.trim().parse::<u64>() {
            Ok(int) => Ok(Value::Int(int)),
            Err(_) if float >= 0.0 && float.fract() == 0.0 => Ok(Value::Int(float as u64)),
            Err(_) => Err(parse_error()),
        }
    } else {
        Ok(Value::Float(float))
    }
}

// TESTS #############################################################
