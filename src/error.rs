//! Error types.
//!
//! Two tiers, matching the load/query asymmetry of the dashboard:
//!
//! - [`LoadError`] — fatal dataset validation failures raised once at startup.
//! - [`AppError`] — binary-level error carrying a process exit code.
//!
//! Query-time "failures" (unknown month, absent year) are not errors at all:
//! the engine returns an empty table instead.

/// A fatal error raised while loading and validating the dataset.
///
/// Any of these aborts startup; there is no partial-load or recovery mode.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The source file is absent, unreadable, or the payload is empty.
    DataSource(String),
    /// One or more required columns are missing from the header.
    Schema { missing: Vec<String> },
    /// A null, unparseable, or out-of-range value in a required column.
    Integrity(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::DataSource(msg) => write!(f, "data source error: {msg}"),
            LoadError::Schema { missing } => {
                write!(f, "schema error: missing required column(s): {}", missing.join(", "))
            }
            LoadError::Integrity(msg) => write!(f, "integrity error: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        let code = match &err {
            LoadError::DataSource(_) | LoadError::Schema { .. } => 2,
            LoadError::Integrity(_) => 3,
        };
        AppError::new(code, err.to_string())
    }
}

/// Application-level error with a process exit code.
///
/// Exit codes:
/// - 2: input/schema problems (bad path, missing columns, bad flags)
/// - 3: data integrity problems (nulls, negative values)
/// - 4: runtime failures (terminal, export I/O)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_lists_missing_columns() {
        let err = LoadError::Schema {
            missing: vec!["Revenue".to_string(), "Profit".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Revenue"));
        assert!(msg.contains("Profit"));
    }

    #[test]
    fn load_error_exit_codes() {
        let app: AppError = LoadError::DataSource("gone".to_string()).into();
        assert_eq!(app.exit_code(), 2);
        let app: AppError = LoadError::Schema { missing: vec![] }.into();
        assert_eq!(app.exit_code(), 2);
        let app: AppError = LoadError::Integrity("negative".to_string()).into();
        assert_eq!(app.exit_code(), 3);
    }
}
