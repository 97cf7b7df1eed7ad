// LinkedIn connections export reader: header normalization, preamble skip,
// blank padding drop. Rows come out lazily; validation happens downstream.

use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use encoding_rs::{Encoding, UTF_8};
use std::io::Read;

use crate::log_debug;
use crate::log_warn;
use crate::shared::errors::{AppError, AppResult};

/// Marker the export writes in the first cell of its notes block
const PREAMBLE_MARKER: &str = "Notes:";
/// Rows following the marker row that belong to the notes block
const PREAMBLE_TRAILING_ROWS: usize = 2;

const FIELD_COUNT: usize = 7;

/// Canonical fields of a connections export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    FirstName,
    LastName,
    ProfileUrl,
    Email,
    Company,
    Position,
    ConnectedOn,
}

impl CanonicalField {
    pub const REQUIRED: [CanonicalField; 3] = [
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::ProfileUrl,
    ];

    /// Header as the export writes it
    pub fn header(&self) -> &'static str {
        match self {
            CanonicalField::FirstName => "First Name",
            CanonicalField::LastName => "Last Name",
            CanonicalField::ProfileUrl => "URL",
            CanonicalField::Email => "Email Address",
            CanonicalField::Company => "Company",
            CanonicalField::Position => "Position",
            CanonicalField::ConnectedOn => "Connected On",
        }
    }

    /// Unknown headers map to `None` and their column is ignored
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim().trim_start_matches('\u{feff}').trim();
        [
            CanonicalField::FirstName,
            CanonicalField::LastName,
            CanonicalField::ProfileUrl,
            CanonicalField::Email,
            CanonicalField::Company,
            CanonicalField::Position,
            CanonicalField::ConnectedOn,
        ]
        .into_iter()
        .find(|field| field.header().eq_ignore_ascii_case(header))
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One data row keyed by canonical field; values are untrimmed, missing cells are empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based, header is row 1
    pub row_number: usize,
    values: [String; FIELD_COUNT],
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            values: Default::default(),
        }
    }

    pub fn with(mut self, field: CanonicalField, value: &str) -> Self {
        self.values[field.index()] = value.to_string();
        self
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        &self.values[field.index()]
    }

    pub fn is_blank_padding(&self) -> bool {
        CanonicalField::REQUIRED
            .iter()
            .all(|field| self.get(*field).trim().is_empty())
    }

    fn from_record(row_number: usize, columns: &[Option<CanonicalField>], record: &StringRecord) -> Self {
        let mut row = Self::new(row_number);
        for (column, value) in columns.iter().zip(record.iter()) {
            if let Some(field) = column {
                row.values[field.index()] = value.to_string();
            }
        }
        row
    }
}

/// Lazy sequence of rows after the header
///
/// A reader failure is yielded once as `Err`; the iterator is exhausted afterwards.
pub struct RawRows<R: Read> {
    records: StringRecordsIntoIter<R>,
    columns: Vec<Option<CanonicalField>>,
    data_index: usize,
    preamble_checked: bool,
    pending_skip: usize,
    failed: bool,
}

impl<R: Read> RawRows<R> {
    fn new(mut reader: csv::Reader<R>) -> AppResult<Self> {
        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.iter().all(|h| h.trim().trim_start_matches('\u{feff}').is_empty()) {
            return Err(AppError::ParseError("File has no header row".to_string()));
        }

        let columns: Vec<Option<CanonicalField>> =
            headers.iter().map(CanonicalField::from_header).collect();

        for field in CanonicalField::REQUIRED {
            if !columns.contains(&Some(field)) {
                log_warn!("Import file has no '{}' column", field.header());
            }
        }

        Ok(Self {
            records: reader.into_records(),
            columns,
            data_index: 0,
            preamble_checked: false,
            pending_skip: 0,
            failed: false,
        })
    }
}

impl<R: Read> Iterator for RawRows<R> {
    type Item = AppResult<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let record = match self.records.next()? {
                Ok(record) => record,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(AppError::from(e)));
                }
            };

            self.data_index += 1;
            let row = RawRow::from_record(self.data_index + 1, &self.columns, &record);

            if !self.preamble_checked {
                self.preamble_checked = true;
                if row.get(CanonicalField::FirstName).contains(PREAMBLE_MARKER) {
                    log_debug!("Skipping export notes block at row {}", row.row_number);
                    self.pending_skip = PREAMBLE_TRAILING_ROWS;
                    continue;
                }
            }

            if self.pending_skip > 0 {
                self.pending_skip -= 1;
                continue;
            }

            if row.is_blank_padding() {
                continue;
            }

            return Some(Ok(row));
        }
    }
}

/// CSV reader configuration for connection exports
#[derive(Debug, Clone)]
pub struct CsvRowParser {
    delimiter: u8,
    max_bytes: Option<usize>,
}

impl Default for CsvRowParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            max_bytes: None,
        }
    }
}

impl CsvRowParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Rows of an in-memory file; size and encoding are checked up front
    pub fn rows_from_bytes<'a>(&self, bytes: &'a [u8]) -> AppResult<RawRows<&'a [u8]>> {
        if let Some(max) = self.max_bytes {
            if bytes.len() > max {
                return Err(too_large(max));
            }
        }

        let body = utf8_body(bytes)?;
        RawRows::new(self.reader(body))
    }

    /// Rows of a stream; oversize input and invalid UTF-8 surface as an `Err` item when reached
    pub fn rows_from_reader<R: Read>(&self, reader: R) -> AppResult<RawRows<LimitedReader<R>>> {
        let limited = LimitedReader {
            inner: reader,
            remaining: self.max_bytes,
            limit: self.max_bytes.unwrap_or(usize::MAX),
        };
        RawRows::new(self.reader(limited))
    }

    fn reader<R: Read>(&self, input: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true) // Allow rows with different lengths
            .from_reader(input)
    }
}

/// Fails the read once more than `limit` bytes have come through
pub struct LimitedReader<R> {
    inner: R,
    remaining: Option<usize>,
    limit: usize,
}

impl<R: Read> Read for LimitedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let read = self.inner.read(buf)?;
        if let Some(remaining) = self.remaining.as_mut() {
            if read > *remaining {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    too_large(self.limit).to_string(),
                ));
            }
            *remaining -= read;
        }
        Ok(read)
    }
}

fn too_large(max: usize) -> AppError {
    AppError::ParseError(format!("File exceeds the {} byte import limit", max))
}

/// Strip a UTF-8 BOM and reject anything that is not valid UTF-8
fn utf8_body(bytes: &[u8]) -> AppResult<&[u8]> {
    let body = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) if encoding == UTF_8 => &bytes[bom_len..],
        Some((encoding, _)) => {
            return Err(AppError::ParseError(format!(
                "Unsupported file encoding: {}",
                encoding.name()
            )))
        }
        None => bytes,
    };

    if UTF_8
        .decode_without_bom_handling_and_without_replacement(body)
        .is_none()
    {
        return Err(AppError::ParseError("File is not valid UTF-8".to_string()));
    }

    Ok(body)
}
