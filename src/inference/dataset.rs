//! Tabular input: the feature list and uploaded CSV data restricted to it.

use crate::error::{ServiceError, ServiceResult};
use std::path::Path;

/// Header of the single column in a feature list file.
const FEATURE_COLUMN: &str = "0";

/// Ordered column names fed to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureList(Vec<String>);

impl FeatureList {
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    pub fn columns(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a feature list from a CSV file with a column headed `0`.
    pub fn load(path: &Path) -> ServiceResult<Self> {
        let fail = |reason: String| ServiceError::ArtifactLoadFailure {
            path: path.to_path_buf(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| fail(e.to_string()))?;
        Self::from_csv(&bytes).map_err(fail)
    }

    fn from_csv(bytes: &[u8]) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers = reader.headers().map_err(|e| e.to_string())?;
        let index = headers
            .iter()
            .position(|h| h.trim() == FEATURE_COLUMN)
            .ok_or_else(|| format!("no column named {FEATURE_COLUMN:?}"))?;

        let mut columns = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| e.to_string())?;
            let name = record
                .get(index)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| format!("empty feature name on line {}", columns.len() + 2))?;
            columns.push(name.to_string());
        }

        if columns.is_empty() {
            return Err("feature list is empty".to_string());
        }
        Ok(Self(columns))
    }
}

/// Numeric model input: one row per record, columns in feature-list order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Parse an uploaded CSV and keep only the listed features, in list order.
    ///
    /// Every listed column must be present in the header; extra columns are
    /// ignored. Every selected cell must parse as a finite number.
    pub fn from_csv(bytes: &[u8], features: &FeatureList) -> ServiceResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ServiceError::MalformedCsv(format!("upload is not UTF-8: {e}")))?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| ServiceError::MalformedCsv(e.to_string()))?
            .clone();

        let mut missing = Vec::new();
        let mut indices = Vec::with_capacity(features.len());
        for feature in features.columns() {
            match headers.iter().position(|h| h == feature.as_str()) {
                Some(index) => indices.push(index),
                None => missing.push(feature.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(ServiceError::MissingFeatureColumns(missing));
        }

        let mut rows = Vec::new();
        for (row_number, record) in reader.records().enumerate() {
            let record = record.map_err(|e| ServiceError::MalformedCsv(e.to_string()))?;
            let row = indices
                .iter()
                .zip(features.columns())
                .map(|(&index, feature)| {
                    let cell = record.get(index).unwrap_or_default();
                    cell.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .ok_or_else(|| {
                            ServiceError::MalformedCsv(format!(
                                "row {}: column {feature:?} is not a finite number: {cell:?}",
                                row_number + 1
                            ))
                        })
                })
                .collect::<ServiceResult<Vec<f64>>>()?;
            rows.push(row);
        }

        Ok(Self {
            columns: features.columns().to_vec(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(names: &[&str]) -> FeatureList {
        FeatureList::new(names.iter().map(|n| n.to_string()).collect())
    }

    #[test]
    fn feature_list_reads_column_zero_in_order() {
        let list = FeatureList::from_csv(b"0\nrooms\narea\nage\n").unwrap();
        assert_eq!(list.columns(), ["rooms", "area", "age"]);
    }

    #[test]
    fn feature_list_skips_a_leading_index_column() {
        let list = FeatureList::from_csv(b",0\n0,area\n1,rooms\n").unwrap();
        assert_eq!(list.columns(), ["area", "rooms"]);
    }

    #[test]
    fn feature_list_without_zero_column_fails() {
        assert!(FeatureList::from_csv(b"feature\narea\n").is_err());
    }

    #[test]
    fn missing_feature_file_is_an_artifact_failure() {
        let err = FeatureList::load(Path::new("no/such/features.csv")).unwrap_err();
        assert!(matches!(err, ServiceError::ArtifactLoadFailure { .. }));
    }

    #[test]
    fn selects_listed_columns_in_list_order() {
        let csv = b"id,area,noise,rooms\n1,50.5,x,2\n2,80,y,3\n";
        let matrix = FeatureMatrix::from_csv(csv, &features(&["rooms", "area"])).unwrap();

        assert_eq!(matrix.columns, ["rooms", "area"]);
        assert_eq!(matrix.rows, vec![vec![2.0, 50.5], vec![3.0, 80.0]]);
    }

    #[test]
    fn reports_every_missing_column() {
        let csv = b"area\n1\n";
        let err = FeatureMatrix::from_csv(csv, &features(&["rooms", "area", "age"])).unwrap_err();

        match err {
            ServiceError::MissingFeatureColumns(missing) => {
                assert_eq!(missing, vec!["rooms".to_string(), "age".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let csv = b"area\n12\nlarge\n";
        let err = FeatureMatrix::from_csv(csv, &features(&["area"])).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedCsv(msg) if msg.contains("row 2")));
    }

    #[test]
    fn non_finite_cells_are_malformed() {
        for cell in ["NaN", "inf", "-infinity"] {
            let csv = format!("area\n12\n{cell}\n");
            let err = FeatureMatrix::from_csv(csv.as_bytes(), &features(&["area"])).unwrap_err();
            assert!(
                matches!(&err, ServiceError::MalformedCsv(msg) if msg.contains("row 2")),
                "{cell}: {err:?}"
            );
        }
    }

    #[test]
    fn non_utf8_upload_is_malformed() {
        let err = FeatureMatrix::from_csv(&[0xff, 0xfe, 0x00], &features(&["area"])).unwrap_err();
        assert!(matches!(err, ServiceError::MalformedCsv(_)));
    }

    #[test]
    fn header_only_upload_has_no_rows() {
        let matrix = FeatureMatrix::from_csv(b"area\n", &features(&["area"])).unwrap();
        assert_eq!(matrix.num_rows(), 0);
    }
}
