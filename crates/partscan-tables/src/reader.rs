//! Fixed-size record reads at absolute offsets

use partscan_core::{Error, ReadSeek, Result};
use std::io::SeekFrom;

/// Read exactly `N` bytes at an absolute byte offset.
///
/// The post-seek position is checked against the request before reading;
/// a mismatch means the device is shorter than the offset (truncated or
/// sparse) and is surfaced as [`Error::UnexpectedPosition`] rather than a
/// read error. A short read, including end-of-stream, fails the whole
/// record: partial records are never returned.
pub(crate) fn read_record<const N: usize>(
    stream: &mut dyn ReadSeek,
    device: &str,
    offset: u64,
) -> Result<[u8; N]> {
    let pos = stream
        .seek(SeekFrom::Start(offset))
        .map_err(|source| Error::Seek {
            device: device.to_string(),
            offset,
            source,
        })?;

    if pos != offset {
        return Err(Error::UnexpectedPosition {
            device: device.to_string(),
            offset,
            actual: pos,
        });
    }

    let mut buf = [0u8; N];
    stream.read_exact(&mut buf).map_err(|source| Error::Read {
        device: device.to_string(),
        offset,
        source,
    })?;

    Ok(buf)
}
