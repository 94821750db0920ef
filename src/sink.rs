use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use serde::Serialize;

use crate::error::SinkError;
use crate::options::{OutputFormat, PipelineOptions};
use crate::table::Table;

/// Destination for finished tables, one per image.
pub trait TableSink {
    /// Persists `table` and returns where it went.
    fn write_table(&mut self, image_id: &str, table: &Table) -> Result<PathBuf, SinkError>;
}

fn write_records<W: Write>(
    writer: &mut Writer<W>,
    table: &Table,
    pad_rows: bool,
) -> Result<(), SinkError> {
    let width = table.width();
    writer.write_record(table.column_header())?;
    for row in table.rows() {
        if pad_rows && row.len() < width {
            let mut padded = row.clone();
            padded.resize(width, String::new());
            writer.write_record(&padded)?;
        } else {
            writer.write_record(row)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn csv_writer<W: Write>(writer: W, delimiter: u8) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer)
}

/// Writes a table as delimited text: an integer column header, then the rows.
///
/// Rows are written with their own length unless `pad_rows` is set, in which
/// case short rows get trailing empty cells up to the header width.
pub fn write_csv<W: Write>(
    writer: W,
    table: &Table,
    delimiter: u8,
    pad_rows: bool,
) -> Result<(), SinkError> {
    write_records(&mut csv_writer(writer, delimiter), table, pad_rows)
}

pub fn write_csv_to_string(
    table: &Table,
    delimiter: u8,
    pad_rows: bool,
) -> Result<String, SinkError> {
    let mut writer = csv_writer(Vec::<u8>::new(), delimiter);
    write_records(&mut writer, table, pad_rows)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| SinkError::Csv(error.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

#[derive(Debug, Clone)]
pub struct CsvDirSink {
    output_dir: PathBuf,
    delimiter: u8,
    pad_rows: bool,
}

impl CsvDirSink {
    /// Creates the output directory if it does not exist yet.
    pub fn new(output_dir: &Path, delimiter: u8, pad_rows: bool) -> Result<Self, SinkError> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            delimiter,
            pad_rows,
        })
    }
}

impl TableSink for CsvDirSink {
    fn write_table(&mut self, image_id: &str, table: &Table) -> Result<PathBuf, SinkError> {
        let path = self.output_dir.join(format!("{image_id}.csv"));
        let file = BufWriter::new(File::create(&path)?);
        write_csv(file, table, self.delimiter, self.pad_rows)?;
        Ok(path)
    }
}

#[derive(Serialize)]
struct JsonTable<'a> {
    image: &'a str,
    columns: usize,
    rows: &'a [Vec<String>],
}

#[derive(Debug, Clone)]
pub struct JsonDirSink {
    output_dir: PathBuf,
}

impl JsonDirSink {
    pub fn new(output_dir: &Path) -> Result<Self, SinkError> {
        fs::create_dir_all(output_dir)?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }
}

impl TableSink for JsonDirSink {
    fn write_table(&mut self, image_id: &str, table: &Table) -> Result<PathBuf, SinkError> {
        let path = self.output_dir.join(format!("{image_id}.json"));
        let mut file = BufWriter::new(File::create(&path)?);
        serde_json::to_writer_pretty(
            &mut file,
            &JsonTable {
                image: image_id,
                columns: table.width(),
                rows: table.rows(),
            },
        )?;
        file.flush()?;
        Ok(path)
    }
}

/// Builds the sink matching `options.format`.
pub fn sink_for(options: &PipelineOptions) -> Result<Box<dyn TableSink>, SinkError> {
    Ok(match options.format {
        OutputFormat::Csv => Box::new(CsvDirSink::new(
            &options.output_dir,
            options.delimiter,
            options.pad_rows,
        )?),
        OutputFormat::Json => Box::new(JsonDirSink::new(&options.output_dir)?),
    })
}
