//! Design matrix / response vector construction and the train/test split.
//!
//! Rows arrive as already-tokenized text (see `io::ingest`). This module
//! only maps columns: an intercept constant, the selected feature columns,
//! and the response column.

use nalgebra::{DMatrix, DVector};

/// Which columns of a raw row feed the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Feature column indices, in design-matrix order (after the intercept).
    pub features: Vec<usize>,
    /// Response column index. `None` means "last column of the first row".
    pub response: Option<usize>,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            features: vec![1, 5, 12, 10],
            response: None,
        }
    }
}

/// Errors at the data-loading boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// A cell could not be parsed as a finite f64.
    Input {
        line: usize,
        column: usize,
        value: String,
    },
    /// A row is too short for the requested column.
    MissingColumn {
        line: usize,
        column: usize,
        width: usize,
    },
    /// No data rows after the header.
    NoRows,
    /// Inconsistent column selection (e.g. the response doubles as a feature).
    InvalidColumns(String),
    /// Split fraction outside `[0, 1]`.
    InvalidFraction(f64),
    /// One side of the split has no rows.
    EmptySplit { train: usize, test: usize },
    /// Design matrix and response vector disagree on row count.
    Misaligned { rows: usize, responses: usize },
    /// File could not be opened or read.
    Io(String),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Input {
                line,
                column,
                value,
            } => write!(f, "Line {line}, column {column}: cannot parse '{value}' as a number."),
            DatasetError::MissingColumn {
                line,
                column,
                width,
            } => write!(f, "Line {line}: column {column} requested but row has {width} fields."),
            DatasetError::NoRows => write!(f, "Dataset has no data rows."),
            DatasetError::InvalidColumns(msg) => write!(f, "Invalid column selection: {msg}"),
            DatasetError::InvalidFraction(v) => {
                write!(f, "Train fraction must be within [0, 1], got {v}.")
            }
            DatasetError::EmptySplit { train, test } => write!(
                f,
                "Split leaves an empty side (train={train}, test={test}); need rows in both."
            ),
            DatasetError::Misaligned { rows, responses } => write!(
                f,
                "Design matrix has {rows} rows but response vector has {responses} entries."
            ),
            DatasetError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for DatasetError {}

/// Design matrix (intercept in column 0) plus row-aligned response vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: DMatrix<f64>,
    y: DVector<f64>,
}

/// Contiguous train/test partition of a [`Dataset`].
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

impl Dataset {
    pub fn new(x: DMatrix<f64>, y: DVector<f64>) -> Result<Self, DatasetError> {
        if x.nrows() != y.len() {
            return Err(DatasetError::Misaligned {
                rows: x.nrows(),
                responses: y.len(),
            });
        }
        Ok(Self { x, y })
    }

    /// Build from tokenized data rows (header already removed).
    ///
    /// `first_line` is the 1-based file line of `rows[0]`, used in error messages.
    pub fn from_rows<R, S>(rows: &[R], spec: &ColumnSpec, first_line: usize) -> Result<Self, DatasetError>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let first = rows.first().ok_or(DatasetError::NoRows)?;
        let response = match spec.response {
            Some(idx) => idx,
            None => first
                .as_ref()
                .len()
                .checked_sub(1)
                .ok_or_else(|| DatasetError::InvalidColumns("first row is empty".to_string()))?,
        };
        if spec.features.contains(&response) {
            return Err(DatasetError::InvalidColumns(format!(
                "response column {response} is also listed as a feature"
            )));
        }

        let n = rows.len();
        let k = spec.features.len() + 1;
        let mut x = DMatrix::<f64>::zeros(n, k);
        let mut y = DVector::<f64>::zeros(n);

        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let line = first_line + i;
            x[(i, 0)] = 1.0;
            for (j, &col) in spec.features.iter().enumerate() {
                x[(i, j + 1)] = parse_cell(row, line, col)?;
            }
            y[i] = parse_cell(row, line, response)?;
        }

        Ok(Self { x, y })
    }

    pub fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    pub fn y(&self) -> &DVector<f64> {
        &self.y
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    /// Feature count, excluding the intercept column.
    pub fn n_features(&self) -> usize {
        self.x.ncols().saturating_sub(1)
    }

    /// Split rows `[0, floor(n·f))` into train and the rest into test.
    ///
    /// Row order is preserved and nothing is shuffled.
    pub fn split(&self, train_frac: f64) -> Result<Split, DatasetError> {
        if !(train_frac.is_finite() && (0.0..=1.0).contains(&train_frac)) {
            return Err(DatasetError::InvalidFraction(train_frac));
        }
        let n = self.n_rows();
        let n_train = ((n as f64) * train_frac).floor() as usize;
        let n_train = n_train.min(n);
        let n_test = n - n_train;

        Ok(Split {
            train: Dataset {
                x: self.x.rows(0, n_train).into_owned(),
                y: self.y.rows(0, n_train).into_owned(),
            },
            test: Dataset {
                x: self.x.rows(n_train, n_test).into_owned(),
                y: self.y.rows(n_train, n_test).into_owned(),
            },
        })
    }
}

impl Split {
    /// Both sides must have rows to fit and evaluate.
    pub fn require_non_empty(&self) -> Result<(), DatasetError> {
        let (train, test) = (self.train.n_rows(), self.test.n_rows());
        if train == 0 || test == 0 {
            return Err(DatasetError::EmptySplit { train, test });
        }
        Ok(())
    }
}

fn parse_cell<S: AsRef<str>>(row: &[S], line: usize, column: usize) -> Result<f64, DatasetError> {
    let raw = row.get(column).ok_or(DatasetError::MissingColumn {
        line,
        column,
        width: row.len(),
    })?;
    let raw = raw.as_ref().trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DatasetError::Input {
            line,
            column,
            value: raw.to_string(),
        }),
    }
}
