//! DOS partition entry types and CHS addressing

use serde::Serialize;
use std::fmt;

/// CHS (Cylinder-Head-Sector) address
///
/// Legacy geometric disk addressing, packed into 3 bytes per the IBM PC BIOS
/// convention. The raw bytes are kept as stored; the 10-bit cylinder and
/// 6-bit sector are derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Chs {
    /// Head (byte 0)
    pub head: u8,
    /// Sector in bits 5-0; bits 7-6 are the high bits of the cylinder (byte 1)
    pub sector: u8,
    /// Bits 7-0 of the cylinder (byte 2)
    pub cylinder: u8,
}

impl Chs {
    /// Parse a CHS address from its 3 on-disk bytes
    pub fn from_bytes(bytes: &[u8; 3]) -> Self {
        Self {
            head: bytes[0],
            sector: bytes[1],
            cylinder: bytes[2],
        }
    }

    /// Encode back to the 3 on-disk bytes
    pub fn to_bytes(&self) -> [u8; 3] {
        [self.head, self.sector, self.cylinder]
    }

    /// The full 10-bit cylinder number
    pub fn cylinder(&self) -> u16 {
        self.cylinder as u16 | (((self.sector & 0xC0) as u16) << 2)
    }

    /// The 6-bit sector number
    pub fn sector(&self) -> u8 {
        self.sector & 0x3F
    }

    /// True iff all three raw bytes are zero
    pub fn is_zero(&self) -> bool {
        self.head == 0 && self.sector == 0 && self.cylinder == 0
    }
}

impl fmt::Display for Chs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.cylinder(), self.head, self.sector())
    }
}

/// DOS partition type codes
///
/// One byte identifying the partition's content class. Values without a
/// named variant are preserved verbatim and rendered as raw hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartitionType {
    /// Empty/unused partition entry
    Empty,
    /// DOS extended partition, CHS
    DosExtended,
    /// Windows 98 extended partition, LBA
    Win98Extended,
    /// Linux extended partition
    LinuxExtended,
    /// Linux swap
    LinuxSwap,
    /// Linux native data
    LinuxData,
    /// Linux LVM physical volume
    LinuxLvm,
    /// Linux RAID member
    LinuxRaid,
    /// GPT protective MBR entry
    GptProtective,
    /// Unrecognized partition type
    Unknown(u8),
}

impl PartitionType {
    /// Create a partition type from a byte value
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00 => Self::Empty,
            0x05 => Self::DosExtended,
            0x0F => Self::Win98Extended,
            0x85 => Self::LinuxExtended,
            0x82 => Self::LinuxSwap,
            0x83 => Self::LinuxData,
            0x8E => Self::LinuxLvm,
            0xFD => Self::LinuxRaid,
            0xEE => Self::GptProtective,
            _ => Self::Unknown(b),
        }
    }

    /// Get the byte value of this partition type
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Empty => 0x00,
            Self::DosExtended => 0x05,
            Self::Win98Extended => 0x0F,
            Self::LinuxExtended => 0x85,
            Self::LinuxSwap => 0x82,
            Self::LinuxData => 0x83,
            Self::LinuxLvm => 0x8E,
            Self::LinuxRaid => 0xFD,
            Self::GptProtective => 0xEE,
            Self::Unknown(b) => b,
        }
    }

    /// True for any of the three extended-partition markers
    pub fn is_extended(self) -> bool {
        matches!(
            self,
            Self::DosExtended | Self::Win98Extended | Self::LinuxExtended
        )
    }
}

impl fmt::Display for PartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::DosExtended => write!(f, "DOS Extended"),
            Self::Win98Extended => write!(f, "Win98 Extended"),
            Self::LinuxExtended => write!(f, "Linux Extended"),
            Self::LinuxSwap => write!(f, "Linux Swap"),
            Self::LinuxData => write!(f, "Linux Data"),
            Self::LinuxLvm => write!(f, "Linux LVM"),
            Self::LinuxRaid => write!(f, "Linux RAID"),
            Self::GptProtective => write!(f, "GPT Protective"),
            Self::Unknown(b) => write!(f, "{:02x}", b),
        }
    }
}

impl Default for PartitionType {
    fn default() -> Self {
        Self::Empty
    }
}

/// DOS partition status byte
///
/// 0x80 means bootable, 0x00 not bootable. Anything else is anomalous but
/// preserved verbatim rather than treated as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartitionStatus {
    Unbootable,
    Bootable,
    Unexpected(u8),
}

impl PartitionStatus {
    /// Create a partition status from a byte value
    pub fn from_byte(b: u8) -> Self {
        match b {
            0x00 => Self::Unbootable,
            0x80 => Self::Bootable,
            _ => Self::Unexpected(b),
        }
    }

    /// Get the byte value of this status
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Unbootable => 0x00,
            Self::Bootable => 0x80,
            Self::Unexpected(b) => b,
        }
    }
}

impl fmt::Display for PartitionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unbootable => write!(f, "Unbootable"),
            Self::Bootable => write!(f, "Bootable"),
            Self::Unexpected(b) => write!(f, "Unexpected {:02x}", b),
        }
    }
}

impl Default for PartitionStatus {
    fn default() -> Self {
        Self::Unbootable
    }
}

/// One 16-byte DOS partition entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DosPartitionEntry {
    pub status: PartitionStatus,
    pub first: Chs,
    pub kind: PartitionType,
    pub last: Chs,
    pub lba: u32,
    pub sectors: u32,
}

impl DosPartitionEntry {
    /// Size of a partition entry in bytes
    pub const ENTRY_SIZE: usize = 16;

    /// Parse a partition entry from its 16 on-disk bytes
    pub fn from_bytes(bytes: &[u8; 16]) -> Self {
        Self {
            status: PartitionStatus::from_byte(bytes[0]),
            first: Chs::from_bytes(&[bytes[1], bytes[2], bytes[3]]),
            kind: PartitionType::from_byte(bytes[4]),
            last: Chs::from_bytes(&[bytes[5], bytes[6], bytes[7]]),
            lba: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            sectors: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }

    /// Encode back to the 16 on-disk bytes
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0] = self.status.to_byte();
        bytes[1..4].copy_from_slice(&self.first.to_bytes());
        bytes[4] = self.kind.to_byte();
        bytes[5..8].copy_from_slice(&self.last.to_bytes());
        bytes[8..12].copy_from_slice(&self.lba.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.sectors.to_le_bytes());
        bytes
    }

    /// True iff any field is non-zero
    pub fn is_used(&self) -> bool {
        self.status != PartitionStatus::Unbootable
            || !self.first.is_zero()
            || self.kind != PartitionType::Empty
            || !self.last.is_zero()
            || self.lba != 0
            || self.sectors != 0
    }

    /// True for the three extended-partition markers
    pub fn is_extended(&self) -> bool {
        self.kind.is_extended()
    }

    /// True iff the status byte is exactly the bootable value
    pub fn is_bootable(&self) -> bool {
        self.status == PartitionStatus::Bootable
    }

    /// True iff this entry is the GPT-protective marker
    pub fn is_gpt_protective(&self) -> bool {
        self.kind == PartitionType::GptProtective
    }
}

impl fmt::Display for DosPartitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_used() {
            write!(
                f,
                "{} {} {} {} {} {}",
                self.status, self.first, self.kind, self.last, self.lba, self.sectors
            )
        } else {
            write!(f, "(Empty)")
        }
    }
}

/// One 512-byte boot record
///
/// The same shape is read at every boot-record offset, whether the device's
/// master boot record or a nested extended boot record:
///
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0x000   446   Bootstrap code (not interpreted)
/// 0x1BE   16    Partition entry 1
/// 0x1CE   16    Partition entry 2
/// 0x1DE   16    Partition entry 3
/// 0x1EE   16    Partition entry 4
/// 0x1FE   2     Boot signature (0xAA55 conventionally, not validated)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootRecord {
    pub entries: [DosPartitionEntry; 4],
    pub signature: u16,
}

impl BootRecord {
    /// Size of a boot record in bytes (always 512)
    pub const SIZE: usize = 512;

    /// Offset of the first partition entry
    pub const PARTITION_TABLE_OFFSET: usize = 0x1BE;

    /// Offset of the boot signature
    pub const SIGNATURE_OFFSET: usize = 0x1FE;

    /// Number of partition entries in a boot record
    pub const NUM_ENTRIES: usize = 4;

    /// Parse a boot record from its 512 on-disk bytes
    pub fn from_bytes(bytes: &[u8; Self::SIZE]) -> Self {
        let mut entries = [DosPartitionEntry::default(); Self::NUM_ENTRIES];
        for (i, entry) in entries.iter_mut().enumerate() {
            let start = Self::PARTITION_TABLE_OFFSET + i * DosPartitionEntry::ENTRY_SIZE;
            let mut raw = [0u8; DosPartitionEntry::ENTRY_SIZE];
            raw.copy_from_slice(&bytes[start..start + DosPartitionEntry::ENTRY_SIZE]);
            *entry = DosPartitionEntry::from_bytes(&raw);
        }
        let signature = u16::from_le_bytes([
            bytes[Self::SIGNATURE_OFFSET],
            bytes[Self::SIGNATURE_OFFSET + 1],
        ]);
        Self { entries, signature }
    }

    /// Encode the partition table and signature back into a 512-byte sector
    ///
    /// The bootstrap area is zero-filled; it is not retained on decode.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        for (i, entry) in self.entries.iter().enumerate() {
            let start = Self::PARTITION_TABLE_OFFSET + i * DosPartitionEntry::ENTRY_SIZE;
            bytes[start..start + DosPartitionEntry::ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
        }
        bytes[Self::SIGNATURE_OFFSET..Self::SIGNATURE_OFFSET + 2]
            .copy_from_slice(&self.signature.to_le_bytes());
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chs_derived_fields() {
        // head=2, sector byte=0b01_000011, cylinder low byte=0x0A
        let chs = Chs::from_bytes(&[2, 0b0100_0011, 0x0A]);
        assert_eq!(chs.cylinder(), 266); // 0x0A + (0b01 << 8)
        assert_eq!(chs.sector(), 3);
        assert_eq!(chs.head, 2);
        assert_eq!(chs.to_string(), "266/2/3");
    }

    #[test]
    fn test_chs_round_trip() {
        let raw = [0xFE, 0xFF, 0xFF];
        assert_eq!(Chs::from_bytes(&raw).to_bytes(), raw);
    }

    #[test]
    fn test_chs_is_zero() {
        assert!(Chs::from_bytes(&[0, 0, 0]).is_zero());
        assert!(!Chs::from_bytes(&[0, 1, 0]).is_zero());
    }

    #[test]
    fn test_partition_type_round_trip() {
        for b in 0..=u8::MAX {
            assert_eq!(PartitionType::from_byte(b).to_byte(), b);
        }
    }

    #[test]
    fn test_partition_type_display() {
        assert_eq!(PartitionType::from_byte(0x83).to_string(), "Linux Data");
        assert_eq!(PartitionType::from_byte(0xEE).to_string(), "GPT Protective");
        assert_eq!(PartitionType::from_byte(0xAB).to_string(), "ab");
    }

    #[test]
    fn test_extended_markers() {
        assert!(PartitionType::from_byte(0x05).is_extended());
        assert!(PartitionType::from_byte(0x0F).is_extended());
        assert!(PartitionType::from_byte(0x85).is_extended());
        assert!(!PartitionType::from_byte(0x83).is_extended());
    }

    #[test]
    fn test_status_preserves_anomalous_byte() {
        let status = PartitionStatus::from_byte(0x42);
        assert_eq!(status, PartitionStatus::Unexpected(0x42));
        assert_eq!(status.to_byte(), 0x42);
        assert_eq!(status.to_string(), "Unexpected 42");
    }

    #[test]
    fn test_entry_round_trip() {
        let raw: [u8; 16] = [
            0x80, 0x01, 0x01, 0x00, 0x83, 0xFE, 0xFF, 0xFF, 0x00, 0x08, 0x00, 0x00, 0x00, 0x20,
            0x03, 0x00,
        ];
        let entry = DosPartitionEntry::from_bytes(&raw);
        assert_eq!(entry.to_bytes(), raw);
        assert!(entry.is_used());
        assert!(entry.is_bootable());
        assert!(!entry.is_extended());
        assert_eq!(entry.lba, 2048);
        assert_eq!(entry.sectors, 0x0003_2000);
    }

    #[test]
    fn test_empty_entry() {
        let entry = DosPartitionEntry::from_bytes(&[0u8; 16]);
        assert!(!entry.is_used());
        assert_eq!(entry.to_string(), "(Empty)");
        assert_eq!(entry, DosPartitionEntry::default());
    }

    #[test]
    fn test_entry_used_on_any_nonzero_field() {
        let mut raw = [0u8; 16];
        raw[12] = 1; // sector count only
        assert!(DosPartitionEntry::from_bytes(&raw).is_used());
    }

    #[test]
    fn test_boot_record_round_trip() {
        let mut raw = [0u8; BootRecord::SIZE];
        // Entry 1: bootable Linux data at LBA 2048
        raw[0x1BE] = 0x80;
        raw[0x1BE + 4] = 0x83;
        raw[0x1BE + 8..0x1BE + 12].copy_from_slice(&2048u32.to_le_bytes());
        raw[0x1BE + 12..0x1BE + 16].copy_from_slice(&4096u32.to_le_bytes());
        // Entry 2: extended at LBA 8192
        raw[0x1CE + 4] = 0x05;
        raw[0x1CE + 8..0x1CE + 12].copy_from_slice(&8192u32.to_le_bytes());
        raw[0x1CE + 12..0x1CE + 16].copy_from_slice(&1024u32.to_le_bytes());
        raw[0x1FE] = 0x55;
        raw[0x1FF] = 0xAA;

        let record = BootRecord::from_bytes(&raw);
        assert_eq!(record.signature, 0xAA55);
        assert_eq!(record.entries[0].kind, PartitionType::LinuxData);
        assert_eq!(record.entries[1].kind, PartitionType::DosExtended);
        assert_eq!(record.to_bytes()[0x1BE..], raw[0x1BE..]);
    }
}
