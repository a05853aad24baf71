//! Shared stream traits

use std::io::{Read, Seek};

/// Combined trait for Read + Seek
///
/// Everything the decode pipeline needs from a byte source: a block device,
/// a disk-image file, or an in-memory cursor in tests. The source is owned
/// by the caller and only borrowed for the duration of one analysis.
pub trait ReadSeek: Read + Seek {}

/// Blanket implementation for any type that implements Read + Seek
impl<T: Read + Seek> ReadSeek for T {}
