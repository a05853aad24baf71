//! Partition analysis error types

use thiserror::Error;

/// The main error type for partition-table analysis
///
/// Every variant carries the device identity and, where one applies, the byte
/// offset at which the failure occurred. Underlying I/O errors are attached
/// as sources so callers can walk the chain for diagnostics; classification
/// goes through [`Error::kind`], never through the message text.
#[derive(Error, Debug)]
pub enum Error {
    /// The device or image file could not be opened
    #[error("error opening device {device}")]
    Open {
        device: String,
        #[source]
        source: std::io::Error,
    },

    /// The underlying seek call failed
    #[error("error seeking device {device} offset {offset}")]
    Seek {
        device: String,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// A seek landed at a position other than the one requested
    ///
    /// Seen on truncated or sparse devices.
    #[error("unexpected position seeking device {device} offset {offset}, seeked to {actual} instead")]
    UnexpectedPosition {
        device: String,
        offset: u64,
        actual: u64,
    },

    /// Fewer bytes were available than the fixed record size, or the read errored
    #[error("error reading device {device} offset {offset}")]
    Read {
        device: String,
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// More than one DOS entry carries the bootable status
    #[error("multiple bootable partitions: index {first} and index {second}")]
    MultipleBootable { first: usize, second: usize },
}

/// Error classification, compared by value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Seek,
    UnexpectedPosition,
    Read,
    MultipleBootable,
}

impl Error {
    /// Get the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Open { .. } => ErrorKind::Open,
            Error::Seek { .. } => ErrorKind::Seek,
            Error::UnexpectedPosition { .. } => ErrorKind::UnexpectedPosition,
            Error::Read { .. } => ErrorKind::Read,
            Error::MultipleBootable { .. } => ErrorKind::MultipleBootable,
        }
    }
}

/// Result type alias for partition-table analysis
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_kind_classification() {
        let err = Error::UnexpectedPosition {
            device: "/dev/null".to_string(),
            offset: 512,
            actual: 0,
        };
        assert_eq!(err.kind(), ErrorKind::UnexpectedPosition);

        let err = Error::MultipleBootable { first: 1, second: 3 };
        assert_eq!(err.kind(), ErrorKind::MultipleBootable);
    }

    #[test]
    fn test_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::Open {
            device: "missing.img".to_string(),
            source: io,
        };

        let cause = err.source().expect("open error carries a source");
        let io = cause
            .downcast_ref::<std::io::Error>()
            .expect("source is an io::Error");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_unexpected_position_has_no_source() {
        let err = Error::UnexpectedPosition {
            device: "disk.img".to_string(),
            offset: 1024,
            actual: 512,
        };
        assert!(err.source().is_none());
    }

    #[test]
    fn test_display_includes_device_and_offset() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = Error::Read {
            device: "disk.img".to_string(),
            offset: 51200,
            source: io,
        };
        let msg = err.to_string();
        assert!(msg.contains("disk.img"));
        assert!(msg.contains("51200"));
    }
}
