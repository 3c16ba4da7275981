use crate::errors::SelectorError;
use crate::utils::selected_indices;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct Data {
    pub X: Vec<Vec<f64>>,        // Matrix of feature values, one row per sample
    pub y: Vec<u8>,              // Vector for target classes
    pub features: Vec<String>,   // Feature names
    pub samples: Vec<String>,    // Sample names
    pub feature_len: usize,
    pub sample_len: usize,
    pub classes: Vec<String>
}

impl Data {
    /// Create a new `Data` instance with default values
    pub fn new() -> Data {
        Data {
            X: Vec::new(),
            y: Vec::new(),
            features: Vec::new(),
            samples: Vec::new(),
            feature_len: 0,
            sample_len: 0,
            classes: Vec::new()
        }
    }

    /// Build a `Data` from an in-memory matrix (one row per sample)
    pub fn from_matrix(X: Vec<Vec<f64>>, y: Vec<u8>) -> Result<Data, SelectorError> {
        if X.len() != y.len() {
            return Err(SelectorError::data(format!("X has {} samples but y has {} labels", X.len(), y.len())));
        }
        let feature_len = X.first().map(|row| row.len()).unwrap_or(0);
        if let Some(i) = X.iter().position(|row| row.len() != feature_len) {
            return Err(SelectorError::data(format!("sample #{} has {} values, expected {}", i, X[i].len(), feature_len)));
        }

        Ok(Data {
            features: (0..feature_len).map(|j| format!("feature_{}", j)).collect(),
            samples: (0..X.len()).map(|i| format!("sample_{}", i)).collect(),
            feature_len,
            sample_len: X.len(),
            X,
            y,
            classes: Vec::new()
        })
    }

    /// Load data from `X.tsv` and `y.tsv` files.
    ///
    /// With `features_in_rows`, X has sample names as header and one feature per line;
    /// otherwise X has feature names as header and one sample per line.
    pub fn load_data(&mut self, X_path: &str, y_path: &str, features_in_rows: bool) -> Result<(), SelectorError> {
        info!("Loading files {} and {}...", X_path, y_path);

        let (header, rows) = read_tsv(X_path)?;

        if features_in_rows {
            self.samples = header;
            self.features = rows.iter().map(|(name, _)| name.clone()).collect();
            self.X = (0..self.samples.len())
                .map(|i| rows.iter().map(|(_, values)| values[i]).collect())
                .collect();
        } else {
            self.features = header;
            self.samples = rows.iter().map(|(name, _)| name.clone()).collect();
            self.X = rows.into_iter().map(|(_, values)| values).collect();
        }

        let (_, y_rows) = read_y(y_path)?;
        let y_map: HashMap<String, u8> = y_rows.into_iter().collect();

        // Reorder `y` to match the order of `samples` from X.tsv
        let mut y = Vec::with_capacity(self.samples.len());
        for sample_name in &self.samples {
            match y_map.get(sample_name) {
                Some(class) => y.push(*class),
                None => return Err(SelectorError::data(format!("No y value available for sample {}", sample_name))),
            }
        }
        if y_map.len() > self.samples.len() {
            warn!("{} labels in {} do not match any sample of {}", y_map.len() - self.samples.len(), y_path, X_path);
        }
        self.y = y;

        self.feature_len = self.features.len();
        self.sample_len = self.samples.len();

        Ok(())
    }

    pub fn set_classes(&mut self, classes: Vec<String>) {
        self.classes = classes;
    }

    /// Sorted list of the distinct classes present in y
    pub fn class_labels(&self) -> Vec<u8> {
        let mut labels = self.y.clone();
        labels.sort_unstable();
        labels.dedup();
        labels
    }

    /// Rows of the given samples restricted to the features selected by `mask`
    pub fn project(&self, samples: &[usize], mask: &[bool]) -> Vec<Vec<f64>> {
        let columns = selected_indices(mask);
        samples.iter()
            .map(|&i| columns.iter().map(|&j| self.X[i][j]).collect())
            .collect()
    }

    /// Labels of the given samples
    pub fn labels(&self, samples: &[usize]) -> Vec<u8> {
        samples.iter().map(|&i| self.y[i]).collect()
    }

    /// Names of the features selected by `mask`
    pub fn selected_feature_names(&self, mask: &[bool]) -> Vec<String> {
        selected_indices(mask).into_iter()
            .filter_map(|j| self.features.get(j).cloned())
            .collect()
    }
}

/// Read a tab-separated matrix: a header line, then `name\tvalue\tvalue...` lines.
fn read_tsv(path: &str) -> Result<(Vec<String>, Vec<(String, Vec<f64>)>), SelectorError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(File::open(path)?));

    let header: Vec<String> = reader.headers()?.iter().skip(1).map(String::from).collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let mut fields = record.iter();
        let name = fields.next().unwrap_or("").to_string();
        let values = fields
            .map(|v| {
                let v = v.trim();
                // Missing cells (empty, NA) are not imputed
                v.parse::<f64>().map_err(|_| {
                    SelectorError::data(format!("{}: invalid value '{}' on line {}", path, v, line + 2))
                })
            })
            .collect::<Result<Vec<f64>, SelectorError>>()?;

        if values.len() != header.len() {
            return Err(SelectorError::data(format!(
                "{}: line {} has {} values, expected {}", path, line + 2, values.len(), header.len()
            )));
        }
        rows.push((name, values));
    }

    Ok((header, rows))
}

/// Read a tab-separated `sample\tclass` file with a header line.
fn read_y(path: &str) -> Result<(Vec<String>, Vec<(String, u8)>), SelectorError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(File::open(path)?));

    let header: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if let (Some(sample_name), Some(value)) = (record.get(0), record.get(1)) {
            let target: u8 = value.trim().parse().map_err(|_| {
                SelectorError::data(format!("{}: invalid class '{}' on line {}", path, value, line + 2))
            })?;
            rows.push((sample_name.to_string(), target));
        }
    }

    Ok((header, rows))
}

/// Cut `text` to at most `max_chars` characters, ending with "..." when shortened
fn truncate(text: String, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text
    }
}

/// Implement a custom Display trait for Data
impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Features: {}   Samples: {}", self.feature_len, self.sample_len)?;

        let truncated_samples = truncate(self.samples.join("\t"), 100);

        writeln!(f, "X:                  {}", truncated_samples)?;
        // Limit to the first 20 rows
        for j in (0..self.feature_len).take(20) {
            let feature = &self.features[j];
            let row_display: String = (0..self.sample_len)
                .map(|i| format!("{:.2}", self.X[i][j]))
                .collect::<Vec<_>>()
                .join("\t");
            let truncated_row = truncate(row_display, 80);

            writeln!(f, "{:<20} {}", feature, truncated_row)?;
        }

        writeln!(f, "\ny:")?;
        // Limit y to the first 20 entries
        for (i, sample) in self.y.iter().take(20).enumerate() {
            let class = self.classes.get(*sample as usize).cloned().unwrap_or_else(|| sample.to_string());
            writeln!(f, "{}\t{}", self.samples[i], class)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reuse the Display formatter
        write!(f, "{}", self)
    }
}
