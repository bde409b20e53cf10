use std::path::Path;

use csv::ReaderBuilder;
use ndarray::Array2;

use crate::errors::{SimForestError, SimForestResult};

/// Reads a numeric CSV file into a points matrix, one row per record.
/// Every record must have the same number of fields.
pub fn read_points<P: AsRef<Path>>(path: P, has_headers: bool) -> SimForestResult<Array2<f64>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut values = Vec::new();
    let mut n_rows = 0;
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(n_rows + 1, |pos| pos.line() as usize);
        for field in record.iter() {
            let value = field.parse::<f64>().map_err(|_| SimForestError::Parse {
                line,
                value: field.to_string(),
            })?;
            values.push(value);
        }
        n_rows += 1;
    }

    if n_rows == 0 {
        return Err(SimForestError::EmptyInput);
    }
    let n_cols = values.len() / n_rows;
    Array2::from_shape_vec((n_rows, n_cols), values).map_err(|e| {
        SimForestError::InvalidParameter(format!("points do not form a matrix: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("simforest_{}_{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_points() {
        let path = write_temp("points.csv", "x1,x2\n1.0, 2.0\n-3.5,4\n");
        let x = read_points(&path, true).unwrap();
        assert_eq!(x, ndarray::array![[1.0, 2.0], [-3.5, 4.0]]);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_points_parse_error() {
        let path = write_temp("bad.csv", "1.0,2.0\n3.0,abc\n");
        let err = read_points(&path, false).unwrap_err();
        assert!(matches!(
            err,
            SimForestError::Parse { line: 2, ref value } if value == "abc"
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_points_ragged_rows() {
        let path = write_temp("ragged.csv", "1.0,2.0\n3.0\n");
        assert!(matches!(
            read_points(&path, false),
            Err(SimForestError::Csv(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_read_points_empty() {
        let path = write_temp("empty.csv", "x1,x2\n");
        assert!(matches!(
            read_points(&path, true),
            Err(SimForestError::EmptyInput)
        ));
        std::fs::remove_file(path).unwrap();
    }
}
