//! GPT table reading
//!
//! Entered only after the DOS walk has seen a GPT-protective entry. The
//! header sits at logical block 1; each array slot is read individually at
//! the offset computed from the header's array LBA and entry stride.

pub mod types;

use crate::reader::read_record;
use crate::table::PartitionTable;
use crate::BLOCK_SIZE;
use partscan_core::{ReadSeek, Result};
use tracing::debug;
use types::{GptHeader, GptPartitionEntry};

/// Absolute byte offset of the GPT header (logical block 1)
pub const GPT_HEADER_OFFSET: u64 = BLOCK_SIZE;

/// Decode the GPT header and its partition-entry array into `table`.
///
/// Used entries are appended in array-index order; slots with a zero type
/// GUID are skipped. Any seek or read failure aborts and propagates, taking
/// the whole analysis with it.
pub(crate) fn read(
    stream: &mut dyn ReadSeek,
    device: &str,
    table: &mut PartitionTable,
) -> Result<()> {
    let raw: [u8; GptHeader::SIZE] = read_record(stream, device, GPT_HEADER_OFFSET)?;
    let header = GptHeader::from_bytes(&raw);
    debug!(device, %header, "decoded GPT header");

    // Saturate rather than overflow on hostile array LBAs; the resulting
    // read at the end of the address space fails like any truncated device.
    let array_offset = header.partition_array_lba.saturating_mul(BLOCK_SIZE);
    for index in 0..header.partition_count {
        let offset =
            array_offset.saturating_add(index as u64 * header.partition_entry_size as u64);
        let raw: [u8; GptPartitionEntry::ENTRY_SIZE] = read_record(stream, device, offset)?;
        let entry = GptPartitionEntry::from_bytes(&raw);
        if entry.is_used() {
            table.gpt.push(entry);
        }
    }

    table.gpt_header = Some(header);
    Ok(())
}
