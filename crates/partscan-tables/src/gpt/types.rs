//! GPT header and partition entry records

use crate::guid;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// GPT header, as found at logical block 1
///
/// The meaningful prefix is 92 bytes; the sector is padded out to the
/// declared header size with reserved bytes that are not retained. The
/// signature and both CRC fields are decoded but not verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GptHeader {
    /// Header signature ("EFI PART" conventionally)
    pub signature: [u8; 8],
    pub minor_version: u16,
    pub major_version: u16,
    pub header_size: u32,
    pub header_crc: u32,
    pub reserved: u32,
    /// LBA of this header
    pub current_lba: u64,
    /// LBA of the backup header
    pub backup_lba: u64,
    pub first_usable_lba: u64,
    pub last_usable_lba: u64,
    /// Disk GUID, mixed-endian on disk
    pub disk_guid: Uuid,
    /// Starting LBA of the partition-entry array
    pub partition_array_lba: u64,
    /// Number of slots in the partition-entry array
    pub partition_count: u32,
    /// On-disk stride of one array slot
    pub partition_entry_size: u32,
    /// CRC of the partition-entry array
    pub partition_array_crc: u32,
}

impl GptHeader {
    /// Size of the decoded header prefix in bytes
    pub const SIZE: usize = 92;

    /// Parse a GPT header from its 92 meaningful on-disk bytes
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let mut signature = [0u8; 8];
        signature.copy_from_slice(&bytes[0..8]);

        let mut disk_guid = [0u8; 16];
        disk_guid.copy_from_slice(&bytes[56..72]);

        Self {
            signature,
            minor_version: u16::from_le_bytes([bytes[8], bytes[9]]),
            major_version: u16::from_le_bytes([bytes[10], bytes[11]]),
            header_size: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
            header_crc: u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]),
            reserved: u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]),
            current_lba: u64::from_le_bytes([
                bytes[24], bytes[25], bytes[26], bytes[27], bytes[28], bytes[29], bytes[30],
                bytes[31],
            ]),
            backup_lba: u64::from_le_bytes([
                bytes[32], bytes[33], bytes[34], bytes[35], bytes[36], bytes[37], bytes[38],
                bytes[39],
            ]),
            first_usable_lba: u64::from_le_bytes([
                bytes[40], bytes[41], bytes[42], bytes[43], bytes[44], bytes[45], bytes[46],
                bytes[47],
            ]),
            last_usable_lba: u64::from_le_bytes([
                bytes[48], bytes[49], bytes[50], bytes[51], bytes[52], bytes[53], bytes[54],
                bytes[55],
            ]),
            disk_guid: guid::from_mixed_endian(&disk_guid),
            partition_array_lba: u64::from_le_bytes([
                bytes[72], bytes[73], bytes[74], bytes[75], bytes[76], bytes[77], bytes[78],
                bytes[79],
            ]),
            partition_count: u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]),
            partition_entry_size: u32::from_le_bytes([bytes[84], bytes[85], bytes[86], bytes[87]]),
            partition_array_crc: u32::from_le_bytes([bytes[88], bytes[89], bytes[90], bytes[91]]),
        }
    }
}

impl fmt::Display for GptHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Signature {} Ver {}.{} HeaderSize {:04x} HeaderCRC {:08x} CurrentLBA {} BackupLBA {} FirstUsableLBA {} LastUsableLBA {} UUID {} PartitionArrayLBA {} PartitionCount {} PartitionEntrySize {} PartitionArrayCRC {:08x}",
            String::from_utf8_lossy(&self.signature),
            self.major_version,
            self.minor_version,
            self.header_size,
            self.header_crc,
            self.current_lba,
            self.backup_lba,
            self.first_usable_lba,
            self.last_usable_lba,
            self.disk_guid,
            self.partition_array_lba,
            self.partition_count,
            self.partition_entry_size,
            self.partition_array_crc
        )
    }
}

/// One 128-byte GPT partition entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GptPartitionEntry {
    /// Partition type GUID, mixed-endian on disk
    pub type_guid: Uuid,
    /// Unique partition GUID, mixed-endian on disk
    pub unique_guid: Uuid,
    /// First LBA (inclusive)
    pub first_lba: u64,
    /// Last LBA (inclusive)
    pub last_lba: u64,
    /// Attribute flags
    pub flags: u64,
    /// Partition name (36 UTF-16LE code units on disk, NUL-trimmed)
    pub name: String,
}

impl GptPartitionEntry {
    /// Size of a partition entry in bytes
    pub const ENTRY_SIZE: usize = 128;

    /// Length of the name field in UTF-16 code units
    pub const NAME_UNITS: usize = 36;

    /// Parse a partition entry from its 128 on-disk bytes
    pub fn from_bytes(bytes: &[u8; Self::ENTRY_SIZE]) -> Self {
        let mut type_guid = [0u8; 16];
        type_guid.copy_from_slice(&bytes[0..16]);
        let mut unique_guid = [0u8; 16];
        unique_guid.copy_from_slice(&bytes[16..32]);

        Self {
            type_guid: guid::from_mixed_endian(&type_guid),
            unique_guid: guid::from_mixed_endian(&unique_guid),
            first_lba: u64::from_le_bytes([
                bytes[32], bytes[33], bytes[34], bytes[35], bytes[36], bytes[37], bytes[38],
                bytes[39],
            ]),
            last_lba: u64::from_le_bytes([
                bytes[40], bytes[41], bytes[42], bytes[43], bytes[44], bytes[45], bytes[46],
                bytes[47],
            ]),
            flags: u64::from_le_bytes([
                bytes[48], bytes[49], bytes[50], bytes[51], bytes[52], bytes[53], bytes[54],
                bytes[55],
            ]),
            name: Self::parse_name(&bytes[56..128]),
        }
    }

    /// True iff the type GUID is non-zero
    pub fn is_used(&self) -> bool {
        !self.type_guid.is_nil()
    }

    /// Decode the UTF-16LE name field, stopping at the first NUL
    fn parse_name(bytes: &[u8]) -> String {
        let mut units = Vec::with_capacity(Self::NAME_UNITS);
        for pair in bytes.chunks_exact(2).take(Self::NAME_UNITS) {
            let unit = u16::from_le_bytes([pair[0], pair[1]]);
            if unit == 0 {
                break;
            }
            units.push(unit);
        }
        String::from_utf16_lossy(&units)
    }
}

impl fmt::Display for GptPartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {:#x} {}",
            self.type_guid, self.unique_guid, self.first_lba, self.last_lba, self.flags, self.name
        )
    }
}
