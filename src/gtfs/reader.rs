use crate::gtfs::error::Error;
use crate::gtfs::layout::Columns;

use csv::StringRecord;
use std::io::{BufRead, BufReader, Read};
use std::str::FromStr;

const UTF8_BOM: [u8; 3] = [0xef, 0xbb, 0xbf];

/// Number of rows between two progress reports
pub const PROGRESS_INTERVAL: u64 = 100_000;

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.flexible(true).trim(csv::Trim::None);
    builder
}

/// Split a single CSV line into its fields.
///
/// Quoted fields may contain the delimiter and doubled quotes; the enclosing
/// quotes are stripped. Parsing uses the same configuration as table reads.
pub fn split_line(line: &str) -> Vec<String> {
    let mut reader = reader_builder()
        .has_headers(false)
        .from_reader(line.as_bytes());
    let mut rec = StringRecord::new();
    match reader.read_record(&mut rec) {
        Ok(true) => rec.iter().map(String::from).collect(),
        _ => Vec::new(),
    }
}

/// One data row of a table, addressed by column index.
#[derive(Debug, Clone, Copy)]
pub struct Row<'r> {
    record: &'r StringRecord,
}

impl<'r> Row<'r> {
    pub fn new(record: &'r StringRecord) -> Row<'r> {
        Row { record }
    }

    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// Field at `idx` with surrounding whitespace removed, `None` past the end of the row
    pub fn get(&self, idx: usize) -> Option<&'r str> {
        self.record.get(idx).map(str::trim)
    }

    /// Like [`Row::get`] but an empty field is also `None`
    pub fn non_empty(&self, idx: usize) -> Option<&'r str> {
        self.get(idx).filter(|s| !s.is_empty())
    }

    pub fn parse<T: FromStr>(&self, idx: usize) -> Option<T> {
        self.non_empty(idx).and_then(|s| s.parse().ok())
    }

    /// Parse a float and reject NaN and infinities
    pub fn parse_finite(&self, idx: usize) -> Option<f64> {
        self.parse::<f64>(idx).filter(|v| v.is_finite())
    }
}

/// Row counts gathered while scanning one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStats {
    pub file_name: String,
    /// Data rows decoded by the CSV layer
    pub rows: u64,
    /// Rows the consumer accepted
    pub kept: u64,
    /// Rows the CSV layer could not decode
    pub malformed: u64,
}

impl TableStats {
    pub fn summary(&self) -> String {
        format!(
            "{} rows, {} kept, {} malformed",
            self.rows, self.kept, self.malformed
        )
    }
}

/// Stream every data row of a table through `f`.
///
/// # Parameters
/// - `reader`: Raw table bytes, optionally starting with a UTF-8 BOM
/// - `file_name`: Table name used in errors and logs
/// - `total_bytes`: Uncompressed table size, used for progress percentages
/// - `columns`: Columns the consumer reads, resolved against the header row
/// - `f`: Called once per row with the resolved columns, returns whether the row was kept
///
/// # Returns
/// Row counts for the table. Rows that fail to decode are skipped; only I/O
/// failures abort the scan.
pub fn scan_table<R, C, F>(
    reader: R,
    file_name: &str,
    total_bytes: Option<u64>,
    columns: &C,
    mut f: F,
) -> Result<TableStats, Error>
where
    R: Read,
    C: Columns,
    F: FnMut(Row<'_>, &C) -> bool,
{
    let mut buffered = BufReader::new(reader);
    let has_bom = buffered
        .fill_buf()
        .map_err(|e| Error::NamedFileIO {
            file_name: file_name.to_owned(),
            source: Box::new(e),
        })?
        .starts_with(&UTF8_BOM);
    if has_bom {
        buffered.consume(UTF8_BOM.len());
    }

    let mut reader = reader_builder().has_headers(true).from_reader(buffered);
    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| Error::CSVError {
            file_name: file_name.to_owned(),
            source: e,
        })?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim().to_owned())
        .collect();
    let cols = resolve_columns(file_name, &headers, columns);

    let mut stats = TableStats {
        file_name: file_name.to_owned(),
        ..TableStats::default()
    };
    // Pre-allocate a StringRecord for performance reasons
    let mut rec = StringRecord::new();
    loop {
        match reader.read_record(&mut rec) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => {
                return Err(Error::CSVError {
                    file_name: file_name.to_owned(),
                    source: e,
                })
            }
            Err(e) => {
                log::debug!("{}: skipping malformed row: {}", file_name, e);
                stats.malformed += 1;
                continue;
            }
        }
        stats.rows += 1;
        if f(Row::new(&rec), &cols) {
            stats.kept += 1;
        }
        if stats.rows % PROGRESS_INTERVAL == 0 {
            report_progress(file_name, stats.rows, reader.position().byte(), total_bytes);
        }
    }
    log::debug!("{}: {}", file_name, stats.summary());
    Ok(stats)
}

fn resolve_columns<C: Columns>(file_name: &str, headers: &[String], columns: &C) -> C {
    if headers.iter().all(|h| h.is_empty()) {
        log::warn!("{} has no header row, reading configured column indices", file_name);
        return columns.clone();
    }
    let (resolved, missing) = columns.resolve(headers);
    for (idx, name) in missing {
        log::warn!(
            "{}: no '{}' column in header, reading index {}",
            file_name,
            name,
            idx
        );
    }
    resolved
}

fn report_progress(file_name: &str, rows: u64, position: u64, total_bytes: Option<u64>) {
    match total_bytes {
        Some(total) if total > 0 => {
            let percent = position as f64 / total as f64 * 100.0;
            log::info!("{}: processed {} rows ({:.1}%)", file_name, rows, percent);
        }
        _ => log::info!("{}: processed {} rows", file_name, rows),
    }
}
