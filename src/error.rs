use crate::data::DatasetError;
use crate::math::RegressionError;
use crate::run::RunError;

/// Exit code for usage, configuration and input-file problems.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when the data cannot support a fit (empty split, too few rows).
pub const EXIT_INSUFFICIENT: u8 = 3;
/// Exit code for numerical failures inside the regression engine.
pub const EXIT_NUMERIC: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<DatasetError> for AppError {
    fn from(err: DatasetError) -> Self {
        let code = match err {
            DatasetError::EmptySplit { .. } => EXIT_INSUFFICIENT,
            _ => EXIT_INPUT,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<RegressionError> for AppError {
    fn from(err: RegressionError) -> Self {
        let code = match err {
            RegressionError::EmptyInput => EXIT_INSUFFICIENT,
            RegressionError::SingularMatrix { rows, cols } if rows < cols => EXIT_INSUFFICIENT,
            _ => EXIT_NUMERIC,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<RunError> for AppError {
    fn from(err: RunError) -> Self {
        let code = AppError::from(err.source.clone()).exit_code();
        AppError::new(code, err.to_string())
    }
}
