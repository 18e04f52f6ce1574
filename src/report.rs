//! Report output: the tab-delimited sheet and its JSON twin.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::normalize::quote;
use crate::record::{group_headers, headers, VehicleRecord, COLUMNS};

pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct Report<'a> {
    pub version: &'a str,
    pub created: NaiveDateTime,
    pub vehicles: &'a [VehicleRecord],
    pub placeholder: &'a str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'a str,
    created: String,
    vehicles: &'a [VehicleRecord],
}

impl Report<'_> {
    pub fn write_file(&self, path: &Path, format: OutputFormat) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        match format {
            OutputFormat::Tsv => self.write_tsv(&mut file)?,
            OutputFormat::Json => self.write_json(&mut file)?,
        }
        file.flush()?;
        Ok(())
    }

    /// Version/creation preamble, group row, header row, one row per vehicle.
    ///
    /// Values are written as-is: a tab inside a value shifts the rest of its
    /// row. A value with a line break would split the row, so that cell is
    /// reported and left empty instead.
    pub fn write_tsv<W: Write>(&self, writer: W) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .flexible(true)
            .from_writer(writer);

        let created = quote(&self.created.format(CREATED_FORMAT).to_string());
        out.write_record(["WoT Version:", self.version, "", "Created:", created.as_str()])?;
        out.write_record(group_headers().into_iter().chain([""]))?;
        out.write_record(headers().into_iter().chain([""]))?;

        for vehicle in self.vehicles {
            let row: Vec<String> = vehicle
                .cells(self.placeholder)
                .into_iter()
                .zip(COLUMNS)
                .map(|(cell, column)| {
                    if cell.contains(['\n', '\r']) {
                        log::error!("Failed to write {} of {}: {:?}", column.header, vehicle.url, cell);
                        String::new()
                    } else {
                        cell
                    }
                })
                .chain([String::new()])
                .collect();
            out.write_record(&row)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Missing values are `null`; the placeholder only applies to the sheet.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        let report = JsonReport {
            version: self.version,
            created: self.created.format(CREATED_FORMAT).to_string(),
            vehicles: self.vehicles,
        };
        serde_json::to_writer_pretty(writer, &report)?;
        Ok(())
    }
}
