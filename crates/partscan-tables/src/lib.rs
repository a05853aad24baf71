//! # partscan-tables
//!
//! Partition-table decoders for raw block devices and disk images.
//!
//! Two on-disk schemes are recognized:
//! - **DOS/MBR**: the 512-byte master boot record and its chained extended
//!   boot records, walked recursively into one flat catalog.
//! - **GPT**: entered when an MBR entry carries the protective type (0xEE);
//!   the header at logical block 1 and its partition-entry array.
//!
//! ## Example
//!
//! ```rust,no_run
//! use partscan_tables::analyze;
//!
//! let table = analyze("/dev/sda").unwrap();
//! print!("{}", table);
//! for entry in table.gpt_entries() {
//!     println!("{}", entry);
//! }
//! ```

pub mod gpt;
pub mod guid;
pub mod mbr;
pub mod table;

mod reader;

pub use gpt::types::{GptHeader, GptPartitionEntry};
pub use mbr::types::{BootRecord, Chs, DosPartitionEntry, PartitionStatus, PartitionType};
pub use table::{analyze, PartitionTable};

/// Fixed logical block size in bytes
///
/// All LBA fields in both schemes are converted to byte offsets with this
/// block size.
pub const BLOCK_SIZE: u64 = 512;
