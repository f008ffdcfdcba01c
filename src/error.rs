use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The storage engine failed to open, read or write.
    #[error("Can't {op}: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Can't create data directory {}: {source}", .path.display())]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine a data directory for the database")]
    NoDataDir,

    #[error("A card with front '{0}' already exists")]
    DuplicateKey(String),

    /// A value did not fit the range expected on one side of the storage boundary.
    #[error("Value out of range: {0}")]
    Conversion(String),

    #[error("Invalid card: {0}")]
    InvalidCard(&'static str),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// Attaches the failing operation to a rusqlite error, splitting out range
// failures so they surface as conversion errors.
pub(crate) trait StoreContext<T> {
    fn context(self, op: &'static str) -> Result<T>;
}

impl<T> StoreContext<T> for rusqlite::Result<T> {
    fn context(self, op: &'static str) -> Result<T> {
        self.map_err(|source| match source {
            rusqlite::Error::IntegralValueOutOfRange(column, value) => {
                Error::Conversion(format!("column {} holds {}", column, value))
            }
            rusqlite::Error::ToSqlConversionFailure(e) => Error::Conversion(e.to_string()),
            rusqlite::Error::FromSqlConversionFailure(column, _, e) => {
                Error::Conversion(format!("column {}: {}", column, e))
            }
            source => Error::Store { op, source },
        })
    }
}
