//! Streaming CSV reader with iterator interface
//!
//! `RecordReader` reads one CSV row at a time, deserializes it into the row
//! type of a [`FromRow`] record, and converts it into the domain type. Row
//! errors carry the line number they occurred on and do not stop iteration.
//!
//! ```no_run
//! use fairshare::io::reader::RecordReader;
//! use fairshare::types::Participant;
//! use std::path::Path;
//!
//! let reader = RecordReader::<_, Participant>::open(Path::new("participants.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(participant) => println!("{}", participant.name),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::FromRow;
use crate::types::SplitError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::marker::PhantomData;
use std::path::Path;

/// CSV reader yielding converted records
///
/// The reader trims whitespace around every field and tolerates rows with
/// missing trailing columns, so optional columns may be left off entirely.
#[derive(Debug)]
pub struct RecordReader<R, T> {
    reader: csv::Reader<R>,
    headers: StringRecord,
    row: StringRecord,
    _record: PhantomData<T>,
}

impl<T: FromRow> RecordReader<File, T> {
    /// Open a CSV file for streaming
    ///
    /// # Errors
    ///
    /// - `FileNotFound` if nothing exists at `path`
    /// - `IoError` if the file cannot be opened for another reason
    /// - `ParseError` if the header row cannot be read
    pub fn open(path: &Path) -> Result<Self, SplitError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SplitError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => SplitError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            },
        })?;
        Self::from_reader(file)
    }
}

impl<R: Read, T: FromRow> RecordReader<R, T> {
    /// Wrap any reader producing CSV text with a header row
    pub fn from_reader(input: R) -> Result<Self, SplitError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(input);
        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            row: StringRecord::new(),
            _record: PhantomData,
        })
    }
}

impl<R: Read, T: FromRow> Iterator for RecordReader<R, T> {
    type Item = Result<T, SplitError>;

    /// Read and convert the next row
    ///
    /// Deserialization and conversion errors are reported as `ParseError`
    /// with the row's line number (the header is line 1).
    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.row.position().map(|pos| pos.line());
                let converted = self
                    .row
                    .deserialize::<T::Row>(Some(&self.headers))
                    .map_err(|e| SplitError::parse(line, e.to_string()))
                    .and_then(|row| T::from_row(row).map_err(|e| e.at_line(line)));
                Some(converted)
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
