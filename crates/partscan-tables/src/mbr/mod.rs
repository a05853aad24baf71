//! MBR/EBR chain walking
//!
//! The walk starts at the master boot record in sector 0 and recurses into
//! every extended entry it finds, so the accumulated DOS sequence lists the
//! four primary slots first and then each EBR chain's logical partitions in
//! discovery order.

pub mod types;

use crate::reader::read_record;
use crate::table::PartitionTable;
use crate::BLOCK_SIZE;
use partscan_core::{ReadSeek, Result};
use std::collections::HashSet;
use tracing::{debug, warn};
use types::{BootRecord, DosPartitionEntry, PartitionStatus};

/// Decode the boot record at `base` and recurse into its extended entries.
///
/// Used, non-extended entries are appended to the table in slot order. At
/// the top level only (`base == 0`) every other slot is padded with an empty
/// placeholder, so the primary table always reports exactly 4 slots; EBR
/// levels are not padded. Any decode failure aborts the whole analysis.
///
/// `visited` holds the boot-record offsets already decoded on this walk; an
/// extended entry pointing back at one of them is skipped instead of
/// recursing without bound, since nothing stops a hand-crafted image from
/// containing a cyclic EBR chain.
pub(crate) fn walk(
    stream: &mut dyn ReadSeek,
    device: &str,
    base: u64,
    table: &mut PartitionTable,
    visited: &mut HashSet<u64>,
) -> Result<()> {
    visited.insert(base);
    debug!(device, base, "decoding boot record");

    let raw: [u8; BootRecord::SIZE] = read_record(stream, device, base)?;
    let record = BootRecord::from_bytes(&raw);

    for entry in &record.entries {
        if entry.is_used() && !entry.is_extended() {
            if let PartitionStatus::Unexpected(b) = entry.status {
                warn!(device, base, status = b, "anomalous partition status byte");
            }
            table.dos.push(*entry);
        } else if base == 0 {
            table.dos.push(DosPartitionEntry::default());
        }
    }

    for entry in &record.entries {
        if entry.is_extended() {
            let offset = base.saturating_add(entry.lba as u64 * BLOCK_SIZE);
            if visited.contains(&offset) {
                warn!(device, base, offset, "cyclic extended-partition chain, skipping");
                continue;
            }
            walk(stream, device, offset, table, visited)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbr::types::PartitionType;
    use partscan_core::ErrorKind;
    use std::io::Cursor;

    /// Write one 16-byte partition entry into a boot record at `record_off`
    fn set_entry(
        disk: &mut [u8],
        record_off: usize,
        slot: usize,
        status: u8,
        kind: u8,
        lba: u32,
        sectors: u32,
    ) {
        let off = record_off + BootRecord::PARTITION_TABLE_OFFSET + slot * 16;
        disk[off] = status;
        disk[off + 4] = kind;
        disk[off + 8..off + 12].copy_from_slice(&lba.to_le_bytes());
        disk[off + 12..off + 16].copy_from_slice(&sectors.to_le_bytes());
    }

    fn walk_from_zero(disk: Vec<u8>) -> Result<PartitionTable> {
        let mut cursor = Cursor::new(disk);
        let mut table = PartitionTable::default();
        let mut visited = HashSet::new();
        walk(&mut cursor, "mem", 0, &mut table, &mut visited)?;
        Ok(table)
    }

    #[test]
    fn test_empty_mbr_yields_four_placeholders() {
        let mut disk = vec![0u8; 512];
        disk[0x1FE] = 0x55;
        disk[0x1FF] = 0xAA;

        let table = walk_from_zero(disk).unwrap();
        assert_eq!(table.dos_entries().len(), 4);
        assert!(table.dos_entries().iter().all(|e| !e.is_used()));
    }

    #[test]
    fn test_primary_slots_keep_slot_order() {
        let mut disk = vec![0u8; 512];
        set_entry(&mut disk, 0, 1, 0x00, 0x83, 2048, 4096);
        set_entry(&mut disk, 0, 3, 0x80, 0x82, 8192, 1024);

        let table = walk_from_zero(disk).unwrap();
        let dos = table.dos_entries();
        assert_eq!(dos.len(), 4);
        assert!(!dos[0].is_used());
        assert_eq!(dos[1].kind, PartitionType::LinuxData);
        assert!(!dos[2].is_used());
        assert_eq!(dos[3].kind, PartitionType::LinuxSwap);
        assert!(dos[3].is_bootable());
    }

    #[test]
    fn test_extended_chain_appends_logicals_after_primaries() {
        // MBR slot 0: Linux data; slot 1: extended at LBA 100.
        // EBR 1 at sector 100: logical swap, chain link to LBA 100 further.
        // EBR 2 at sector 200: logical data, end of chain.
        let mut disk = vec![0u8; 512 * 256];
        set_entry(&mut disk, 0, 0, 0x80, 0x83, 2048, 4096);
        set_entry(&mut disk, 0, 1, 0x00, 0x05, 100, 150);
        set_entry(&mut disk, 100 * 512, 0, 0x00, 0x82, 1, 49);
        set_entry(&mut disk, 100 * 512, 1, 0x00, 0x05, 100, 50);
        set_entry(&mut disk, 200 * 512, 0, 0x00, 0x83, 1, 49);

        let table = walk_from_zero(disk).unwrap();
        let dos = table.dos_entries();
        // 4 primary slots (extended slot padded), then the 2 logicals in
        // chain order with no placeholder padding.
        assert_eq!(dos.len(), 6);
        assert_eq!(dos[0].kind, PartitionType::LinuxData);
        assert!(!dos[1].is_used());
        assert_eq!(dos[4].kind, PartitionType::LinuxSwap);
        assert_eq!(dos[5].kind, PartitionType::LinuxData);
    }

    #[test]
    fn test_extended_offset_is_base_relative() {
        // A chain of three logical partitions, each EBR linking 10 sectors
        // past its own base.
        let mut disk = vec![0u8; 512 * 64];
        set_entry(&mut disk, 0, 0, 0x00, 0x05, 10, 40);
        set_entry(&mut disk, 10 * 512, 0, 0x00, 0x83, 1, 9);
        set_entry(&mut disk, 10 * 512, 1, 0x00, 0x05, 10, 10);
        set_entry(&mut disk, 20 * 512, 0, 0x00, 0x82, 1, 9);
        set_entry(&mut disk, 20 * 512, 1, 0x00, 0x05, 10, 10);
        set_entry(&mut disk, 30 * 512, 0, 0x00, 0xFD, 1, 9);

        let table = walk_from_zero(disk).unwrap();
        let logicals: Vec<_> = table
            .dos_entries()
            .iter()
            .filter(|e| e.is_used())
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            logicals,
            vec![
                PartitionType::LinuxData,
                PartitionType::LinuxSwap,
                PartitionType::LinuxRaid
            ]
        );
    }

    #[test]
    fn test_cyclic_chain_terminates() {
        // EBR at sector 10 with two chain links at LBA 0, i.e. both resolve
        // to the EBR's own offset.
        let mut disk = vec![0u8; 512 * 16];
        set_entry(&mut disk, 0, 0, 0x00, 0x05, 10, 6);
        set_entry(&mut disk, 10 * 512, 0, 0x00, 0x83, 1, 5);
        set_entry(&mut disk, 10 * 512, 1, 0x00, 0x05, 0, 0);
        set_entry(&mut disk, 10 * 512, 2, 0x00, 0x0F, 0, 0);

        let table = walk_from_zero(disk).unwrap();
        // The logical partition is kept; both self-referential links are
        // skipped instead of recursing forever.
        assert_eq!(
            table.dos_entries().iter().filter(|e| e.is_used()).count(),
            1
        );
    }

    #[test]
    fn test_truncated_ebr_aborts_walk() {
        // Extended entry points past the end of the image.
        let mut disk = vec![0u8; 512];
        set_entry(&mut disk, 0, 0, 0x00, 0x05, 1000, 10);

        let err = walk_from_zero(disk).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Read);
    }
}
