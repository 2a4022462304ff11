//! Cutlist file export
//!
//! Cutlists are written as a flat table, one instruction record per row.
//! Rows have as many fields as the instruction has arguments and there is no
//! header row.

use gemcut_core::CutList;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Row {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: gemcut_core::WireError,
    },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Write every instruction as a CSV row
pub fn write_csv<W: Write>(cutlist: &CutList, writer: W) -> ExportResult<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);
    for record in cutlist.to_records() {
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Read a cutlist back from CSV rows
pub fn read_csv<R: Read>(reader: R) -> ExportResult<CutList> {
    let mut input = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut cutlist = CutList::new();
    for (row, record) in input.records().enumerate() {
        let record = record?;
        let fields: Vec<&str> = record.iter().collect();
        let instruction = gemcut_core::MachineInstruction::from_record(fields.as_slice())
            .map_err(|source| ExportError::Record { row: row + 1, source })?;
        cutlist.push(instruction);
    }
    Ok(cutlist)
}

pub fn save_csv(cutlist: &CutList, path: &Path) -> ExportResult<()> {
    write_csv(cutlist, File::create(path)?)
}

pub fn load_csv(path: &Path) -> ExportResult<CutList> {
    read_csv(File::open(path)?)
}
