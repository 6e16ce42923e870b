use crate::{
    cell_detection::{Real, Reading, Series, Value},
    error::{DataShapeError, LoadResult},
};
use spcell_common::Time;
use std::{fs::File, io::Read, path::Path};
use tracing::{debug, info};

pub(crate) const SAMPLE_TIME_FILE: &str = "SAMPLE TIME.csv";
pub(crate) const SAMPLE_INTENSITY_FILE: &str = "SAMPLE Y.csv";
pub(crate) const BLANK_TIME_FILE: &str = "BLANK TIME.csv";
pub(crate) const BLANK_INTENSITY_FILE: &str = "BLANK Y.csv";

const VALUE_COLUMN: &str = "Sample 1";
const DELIMITER: u8 = b';';
/// Rows between the header and the first reading (the units row).
const SKIPPED_ROWS: usize = 1;

/// The sample and blank series of one instrument export.
#[derive(Default, Clone, Debug)]
pub(crate) struct RawExport {
    pub(crate) sample: Series,
    pub(crate) blank: Series,
}

/// Loads the four export tables found in `input`.
#[tracing::instrument(skip_all, fields(input = %input.display()))]
pub(crate) fn load_export(input: &Path) -> LoadResult<RawExport> {
    let sample = read_series(
        open(&input.join(SAMPLE_TIME_FILE))?,
        SAMPLE_TIME_FILE,
        open(&input.join(SAMPLE_INTENSITY_FILE))?,
        SAMPLE_INTENSITY_FILE,
    )?;
    let blank = read_series(
        open(&input.join(BLANK_TIME_FILE))?,
        BLANK_TIME_FILE,
        open(&input.join(BLANK_INTENSITY_FILE))?,
        BLANK_INTENSITY_FILE,
    )?;
    info!(
        "Found {} sample and {} blank readings",
        sample.len(),
        blank.len()
    );
    Ok(RawExport { sample, blank })
}

fn open(path: &Path) -> LoadResult<File> {
    File::open(path).map_err(|error| DataShapeError::IO {
        error,
        path: path.to_owned(),
    })
}

/// Combines a time table and an intensity table, aligned by row position.
pub(crate) fn read_series<T: Read, I: Read>(
    time: T,
    time_table: &str,
    intensity: I,
    intensity_table: &str,
) -> LoadResult<Series> {
    let time_column = read_column(time, time_table)?;
    let intensity_column = read_column(intensity, intensity_table)?;
    if time_column.len() != intensity_column.len() {
        return Err(DataShapeError::MisalignedRows {
            time_table: time_table.to_owned(),
            time_rows: time_column.len(),
            intensity_table: intensity_table.to_owned(),
            intensity_rows: intensity_column.len(),
        });
    }
    time_column
        .into_iter()
        .zip(intensity_column)
        .enumerate()
        .map(|(row, (time, intensity))| -> LoadResult<Reading> {
            let time = parse_time(&time).ok_or_else(|| DataShapeError::InvalidTime {
                value: time,
                row,
                table: time_table.to_owned(),
            })?;
            Ok(Reading::new(time, parse_intensity(&intensity)))
        })
        .collect()
}

/// Reads the raw text of the value column, without the header and units rows.
fn read_column<R: Read>(reader: R, table: &str) -> LoadResult<Vec<String>> {
    let csv_error = |error| DataShapeError::Csv {
        error,
        table: table.to_owned(),
    };
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    let column = csv_reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .position(|header| header.trim() == VALUE_COLUMN)
        .ok_or_else(|| DataShapeError::MissingColumn {
            column: VALUE_COLUMN,
            table: table.to_owned(),
        })?;

    let values = csv_reader
        .records()
        .skip(SKIPPED_ROWS)
        .map(|record| -> LoadResult<String> {
            let record = record.map_err(csv_error)?;
            Ok(record.get(column).unwrap_or_default().trim().to_owned())
        })
        .collect::<LoadResult<Vec<_>>>()?;
    debug!("Read {} rows from {table}", values.len());
    Ok(values)
}

fn parse_time(field: &str) -> Option<Time> {
    field.trim().parse::<Time>().ok().filter(|time| time.is_finite())
}

/// Blank, unreadable and non-finite cells load as missing.
fn parse_intensity(field: &str) -> Value {
    field
        .trim()
        .parse::<Real>()
        .map(Value::new)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIME: &str = "Time;Sample 1\ns;s\n0.0;0.0\n0.1;0.0001\n0.2;0.0002\n0.3;0.0003\n";
    const INTENSITY: &str = "Y;Sample 1\ncps;cps\n0;10\n1;\n2;NaN\n3;abc\n";

    #[test]
    fn units_row_is_skipped() {
        let series =
            read_series(TIME.as_bytes(), "time", INTENSITY.as_bytes(), "intensity").unwrap();
        assert_eq!(series.len(), 4);
        let times: Vec<_> = series.iter().map(|r| r.time).collect();
        assert_eq!(times, vec![0.0, 0.0001, 0.0002, 0.0003]);
    }

    #[test]
    fn unreadable_intensities_are_missing() {
        let series =
            read_series(TIME.as_bytes(), "time", INTENSITY.as_bytes(), "intensity").unwrap();
        let intensities: Vec<_> = series.intensities().collect();
        assert_eq!(
            intensities,
            vec![
                Value::new(10.0),
                Value::MISSING,
                Value::MISSING,
                Value::MISSING
            ]
        );
    }

    #[test]
    fn short_rows_are_missing() {
        let intensity = "Y;Sample 1\ncps;cps\n0;1\n1\n2;3\n3;4\n";
        let series = read_series(TIME.as_bytes(), "time", intensity.as_bytes(), "intensity")
            .unwrap();
        assert_eq!(series.iter().nth(1).map(|r| r.intensity), Some(Value::MISSING));
    }

    #[test]
    fn missing_column() {
        let intensity = "Y;Sample 2\ncps;cps\n0;10\n";
        assert!(matches!(
            read_series(TIME.as_bytes(), "time", intensity.as_bytes(), "intensity"),
            Err(DataShapeError::MissingColumn { column: "Sample 1", .. })
        ));
    }

    #[test]
    fn misaligned_rows() {
        let intensity = "Y;Sample 1\ncps;cps\n0;10\n";
        assert!(matches!(
            read_series(TIME.as_bytes(), "time", intensity.as_bytes(), "intensity"),
            Err(DataShapeError::MisalignedRows {
                time_rows: 4,
                intensity_rows: 1,
                ..
            })
        ));
    }

    #[test]
    fn invalid_time() {
        let time = "Time;Sample 1\ns;s\n0.0;0.0\n0.1;\n0.2;x\n0.3;0.3\n";
        assert!(matches!(
            read_series(time.as_bytes(), "time", INTENSITY.as_bytes(), "intensity"),
            Err(DataShapeError::InvalidTime { row: 1, .. })
        ));
    }

    #[test]
    fn missing_directory() {
        assert!(matches!(
            load_export(Path::new("/nonexistent/spcell/export")),
            Err(DataShapeError::IO { .. })
        ));
    }
}
