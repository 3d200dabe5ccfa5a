/// Error types for the geoip-dat library
use crate::dat::DatabaseKind;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, GeoIpError>;

/// Main error type for opening and querying legacy databases
#[derive(Debug)]
pub enum GeoIpError {
    /// The database file does not exist or could not be opened
    NotFound {
        /// Path passed to `open`
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// A read against an already opened database failed
    Io(io::Error),

    /// The file violates the legacy binary layout (bad trailer, bad pointer,
    /// truncated record, unterminated string)
    Structural(String),

    /// A dynamically typed argument had the wrong kind
    TypeMismatch {
        /// What the operation accepts
        expected: &'static str,
        /// What it was given
        found: &'static str,
    },

    /// Lookup address is not dotted-decimal IPv4 or not a 32-bit integer
    MalformedAddress(String),

    /// The database edition has no record decoder
    Unsupported(DatabaseKind),
}

impl GeoIpError {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        GeoIpError::Structural(msg.into())
    }

    /// True for the `NotFound` variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, GeoIpError::NotFound { .. })
    }

    /// True for the `Structural` variant
    pub fn is_structural(&self) -> bool {
        matches!(self, GeoIpError::Structural(_))
    }
}

impl fmt::Display for GeoIpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoIpError::NotFound { path, source } => {
                write!(f, "Failed to open {}: {}", path.display(), source)
            }
            GeoIpError::Io(e) => write!(f, "I/O error: {}", e),
            GeoIpError::Structural(msg) => write!(f, "Corrupt database: {}", msg),
            GeoIpError::TypeMismatch { expected, found } => {
                write!(f, "wrong argument type {} (expected {})", found, expected)
            }
            GeoIpError::MalformedAddress(addr) => {
                write!(f, "Invalid IPv4 address: {:?}", addr)
            }
            GeoIpError::Unsupported(kind) => {
                write!(f, "Unsupported database edition: {}", kind)
            }
        }
    }
}

impl std::error::Error for GeoIpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeoIpError::NotFound { source, .. } => Some(source),
            GeoIpError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GeoIpError {
    fn from(err: io::Error) -> Self {
        // Short reads mean the file ended before the layout said it would
        if err.kind() == io::ErrorKind::UnexpectedEof {
            GeoIpError::Structural(format!("read past end of file: {}", err))
        } else {
            GeoIpError::Io(err)
        }
    }
}
