use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a path on disk and a usable [`Dataset`].
///
/// [`Dataset`]: super::model::Dataset
#[derive(Error, Debug)]
pub enum DataError {
    /// The path suffix is neither `.csv` nor `.json`.
    #[error("Unsupported file format for {}: use CSV or JSON", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Any other failure opening or reading the file.
    #[error("Failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its content is not valid CSV/JSON.
    #[error("Failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    /// A column referenced by name does not exist in the dataset.
    #[error("Missing column '{column}'")]
    MissingColumn { column: String },
}

/// The parser-level cause behind [`DataError::Parse`].
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that does not describe a table.
    #[error("unexpected JSON layout: {0}")]
    Shape(String),
}

impl DataError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        DataError::MissingColumn {
            column: column.into(),
        }
    }

    /// Classify an I/O failure on `path`, singling out a missing file.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::FileNotFound { path }
        } else {
            DataError::Io { path, source }
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: impl Into<ParseError>) -> Self {
        DataError::Parse {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether the failure came from malformed file content.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, DataError::Parse { .. })
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_singled_out() {
        let err = DataError::io(
            "nope.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, DataError::FileNotFound { .. }));

        let err = DataError::io(
            "locked.csv",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn messages_name_the_culprit() {
        let err = DataError::UnsupportedFormat {
            path: PathBuf::from("products.xlsx"),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported file format for products.xlsx: use CSV or JSON"
        );
        assert_eq!(
            DataError::missing_column("price").to_string(),
            "Missing column 'price'"
        );
    }
}
