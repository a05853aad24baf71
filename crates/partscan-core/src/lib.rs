//! # partscan-core
//!
//! Error handling and stream abstractions shared by the partscan crates.
//!
//! The decode pipeline itself lives in `partscan-tables`; this crate only
//! provides what every layer agrees on:
//! - [`Error`] / [`Result`]: one tagged error enum for the whole analysis,
//!   classified by [`ErrorKind`] and chained to the underlying I/O error.
//! - [`ReadSeek`]: the byte-source trait the decoders borrow.

pub mod error;
pub mod traits;

pub use error::{Error, ErrorKind, Result};
pub use traits::ReadSeek;
