use crate::{
    cell_detection::{Cell, Histogram, PipelineResult, Reading, Series, Value},
    error::{WriteError, WriteResult},
    processing::{DerivedRow, PipelineOutput},
};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use spcell_common::{TIMESTAMP_FORMAT, Time};
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub(crate) const PROCESSED_SAMPLE_FILE: &str = "sample_processed.csv";
pub(crate) const BLANK_FILE: &str = "blank.csv";
pub(crate) const CELLS_FILE: &str = "cells.csv";
pub(crate) const RESULTS_FILE: &str = "results.csv";
pub(crate) const PARAMETERS_FILE: &str = "parameters.json";
pub(crate) const COARSE_HISTOGRAM_FILE: &str = "histogram_100";
pub(crate) const FINE_HISTOGRAM_FILE: &str = "histogram_1000";

/// A freshly created, timestamped output directory.
pub(crate) struct OutputDirectory {
    path: PathBuf,
}

impl OutputDirectory {
    /// Creates `<prefix><timestamp>`. An existing directory is an error, so
    /// runs never overwrite each other.
    pub(crate) fn create<Tz>(prefix: &Path, now: DateTime<Tz>) -> WriteResult<Self>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let mut name = OsString::from(prefix.as_os_str());
        name.push(now.format(TIMESTAMP_FORMAT).to_string());
        let path = PathBuf::from(name);
        if path.exists() {
            return Err(WriteError::DirectoryExists(path));
        }
        fs::create_dir(&path).map_err(|error| WriteError::IO {
            error,
            path: path.clone(),
        })?;
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Deletes the directory and everything written to it so far.
    pub(crate) fn remove(self) {
        if let Err(e) = fs::remove_dir_all(&self.path) {
            warn!("Could not remove {}: {e}", self.path.display());
        }
    }
}

// The unnamed first column holds the row index.
#[derive(Serialize)]
struct ProcessedSampleRecord {
    #[serde(rename = "")]
    index: usize,
    time: Time,
    intensity: Value,
    #[serde(rename = "Ion_Intensity")]
    ion_intensity: Value,
    #[serde(rename = "Ion_Blank_Substracted")]
    background_subtracted: Value,
    #[serde(rename = "Element_Mass")]
    element_mass: Value,
}

#[derive(Serialize)]
struct ReadingRecord {
    #[serde(rename = "")]
    index: usize,
    time: Time,
    intensity: Value,
}

#[derive(Serialize)]
struct CellRecord {
    #[serde(rename = "")]
    index: usize,
    total_mass: f64,
}

#[derive(Serialize)]
struct ResultRecord {
    #[serde(rename = "")]
    index: usize,
    key: String,
    value: String,
}

#[derive(Serialize)]
struct BinRecord {
    edge: f64,
    count: usize,
}

fn serialize_all<W, T, I>(writer: W, records: I) -> Result<(), csv::Error>
where
    W: Write,
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub(crate) fn write_processed_sample<W: Write>(
    writer: W,
    rows: &[DerivedRow],
) -> Result<(), csv::Error> {
    serialize_all(
        writer,
        rows.iter()
            .enumerate()
            .map(|(index, row)| ProcessedSampleRecord {
                index,
                time: row.time,
                intensity: row.intensity,
                ion_intensity: row.ion_intensity,
                background_subtracted: row.background_subtracted,
                element_mass: row.element_mass,
            }),
    )
}

pub(crate) fn write_series<W: Write>(writer: W, series: &Series) -> Result<(), csv::Error> {
    serialize_all(
        writer,
        series
            .iter()
            .enumerate()
            .map(|(index, &Reading { time, intensity })| ReadingRecord {
                index,
                time,
                intensity,
            }),
    )
}

pub(crate) fn write_cells<W: Write>(writer: W, cells: &[Cell]) -> Result<(), csv::Error> {
    serialize_all(
        writer,
        cells.iter().enumerate().map(|(index, cell)| CellRecord {
            index,
            total_mass: cell.total_mass,
        }),
    )
}

pub(crate) fn write_results<W: Write>(
    writer: W,
    result: &PipelineResult,
) -> Result<(), csv::Error> {
    serialize_all(
        writer,
        result
            .entries()
            .enumerate()
            .map(|(index, (key, field))| ResultRecord {
                index,
                key: key.to_string(),
                value: field.to_string(),
            }),
    )
}

pub(crate) fn write_histogram<W: Write>(
    writer: W,
    histogram: &Histogram,
) -> Result<(), csv::Error> {
    serialize_all(
        writer,
        histogram.bins().iter().map(|bin| BinRecord {
            edge: bin.edge,
            count: bin.count,
        }),
    )
}

/// The configuration of a run, written next to its results.
#[derive(Serialize)]
pub(crate) struct RunParameters<'a, S: Serialize, R: Serialize> {
    pub(crate) input: &'a Path,
    pub(crate) settings: &'a S,
    pub(crate) run_info: &'a R,
}

fn create(path: &Path) -> WriteResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|error| WriteError::IO {
            error,
            path: path.to_owned(),
        })
}

fn write_csv<F>(directory: &OutputDirectory, name: &str, write: F) -> WriteResult<()>
where
    F: FnOnce(BufWriter<File>) -> Result<(), csv::Error>,
{
    let path = directory.file(name);
    write(create(&path)?).map_err(|error| WriteError::Csv { error, path })
}

/// Persists every table of a run into `directory`.
#[tracing::instrument(skip_all, fields(directory = %directory.path().display()))]
pub(crate) fn write_run<S: Serialize, R: Serialize>(
    directory: &OutputDirectory,
    blank: &Series,
    output: &PipelineOutput,
    parameters: &RunParameters<S, R>,
) -> WriteResult<()> {
    write_csv(directory, PROCESSED_SAMPLE_FILE, |w| {
        write_processed_sample(w, &output.derived_rows)
    })?;
    write_csv(directory, BLANK_FILE, |w| write_series(w, blank))?;
    write_csv(directory, CELLS_FILE, |w| write_cells(w, &output.cells))?;
    write_csv(directory, RESULTS_FILE, |w| write_results(w, &output.result))?;

    if let Some(histograms) = &output.histograms {
        write_csv(directory, &format!("{COARSE_HISTOGRAM_FILE}.csv"), |w| {
            write_histogram(w, &histograms.coarse)
        })?;
        write_csv(directory, &format!("{FINE_HISTOGRAM_FILE}.csv"), |w| {
            write_histogram(w, &histograms.fine)
        })?;
    }

    let path = directory.file(PARAMETERS_FILE);
    let mut file = create(&path)?;
    serde_json::to_writer_pretty(&mut file, parameters)
        .map_err(|error| WriteError::Json {
            error,
            path: path.clone(),
        })?;
    file.flush()
        .map_err(|error| WriteError::IO { error, path })?;

    info!("Results written to {}", directory.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_detection::{ClassifierPolicy, histogram::Bin};
    use chrono::Utc;

    fn as_string(write: impl FnOnce(&mut Vec<u8>) -> Result<(), csv::Error>) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn processed_sample_has_empty_missing_cells() {
        let rows = [
            DerivedRow {
                time: 0.0,
                intensity: Value::new(5.0),
                ion_intensity: Value::new(0.0),
                ..Default::default()
            },
            DerivedRow {
                time: 0.5,
                intensity: Value::new(150.0),
                ion_intensity: Value::MISSING,
                background_subtracted: Value::new(130.0),
                element_mass: Value::new(0.25),
            },
        ];
        let text = as_string(|w| write_processed_sample(w, &rows));
        assert_eq!(
            text,
            ",time,intensity,Ion_Intensity,Ion_Blank_Substracted,Element_Mass\n\
             0,0.0,5.0,0.0,,\n\
             1,0.5,150.0,,130.0,0.25\n"
        );
    }

    #[test]
    fn cells_table() {
        let cells = [Cell { total_mass: 8.0 }, Cell { total_mass: 2.5 }];
        let text = as_string(|w| write_cells(w, &cells));
        assert_eq!(text, ",total_mass\n0,8.0\n1,2.5\n");
    }

    #[test]
    fn results_table_marks_undefined() {
        let result = PipelineResult {
            ion_blank_threshold: 20.0,
            detected_cells: 0,
            mass_mean: None,
            mass_std: None,
            ionic_concentration: Some(0.5),
        };
        let text = as_string(|w| write_results(w, &result));
        assert_eq!(
            text,
            ",key,value\n\
             0,Ion Blank Threshold,20\n\
             1,Detected Cells,0\n\
             2,Mass Mean,undefined\n\
             3,Mass Std,undefined\n\
             4,Ionic Concentration,0.5\n"
        );
    }

    #[test]
    fn histogram_table() {
        let histogram = Histogram::new(&[Value::new(0.0), Value::new(1.0)], 2).unwrap();
        let text = as_string(|w| write_histogram(w, &histogram));
        assert_eq!(text, "edge,count\n0.0,1\n0.5,1\n");
        assert_eq!(
            histogram.bins(),
            &[
                Bin {
                    edge: 0.0,
                    count: 1
                },
                Bin {
                    edge: 0.5,
                    count: 1
                }
            ]
        );
    }

    #[test]
    fn run_is_written_to_fresh_directory() {
        let prefix = std::env::temp_dir().join(format!("spcell-writer-{}-", std::process::id()));
        let now = Utc::now();
        let directory = OutputDirectory::create(&prefix, now).unwrap();
        assert!(matches!(
            OutputDirectory::create(&prefix, now),
            Err(WriteError::DirectoryExists(_))
        ));

        let output = PipelineOutput {
            derived_rows: vec![DerivedRow::default()],
            cells: vec![],
            result: PipelineResult {
                ion_blank_threshold: 1.0,
                detected_cells: 0,
                mass_mean: None,
                mass_std: None,
                ionic_concentration: None,
            },
            histograms: None,
        };
        let policy = ClassifierPolicy::SingleThreshold {
            ion_threshold: 10.0,
        };
        let parameters = RunParameters {
            input: Path::new("input"),
            settings: &policy,
            run_info: &(),
        };
        write_run(&directory, &Series::default(), &output, &parameters).unwrap();
        for name in [
            PROCESSED_SAMPLE_FILE,
            BLANK_FILE,
            CELLS_FILE,
            RESULTS_FILE,
            PARAMETERS_FILE,
        ] {
            assert!(directory.file(name).exists(), "{name} not written");
        }
        let parameters = fs::read_to_string(directory.file(PARAMETERS_FILE)).unwrap();
        assert!(parameters.contains("single-threshold"));

        let path = directory.path().to_owned();
        directory.remove();
        assert!(!path.exists());
    }
}
