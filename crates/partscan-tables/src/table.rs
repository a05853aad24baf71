//! The aggregate partition catalog

use crate::gpt::{
    self,
    types::{GptHeader, GptPartitionEntry},
};
use crate::mbr::{self, types::DosPartitionEntry};
use partscan_core::{Error, ReadSeek, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// The merged, ordered result of one analysis run
///
/// The DOS sequence lists entries in physical discovery order: the four
/// top-level MBR slots (unused ones kept as placeholders), then each EBR
/// chain's logical partitions. The GPT sequence, present only when the MBR
/// carries a protective entry, lists used array slots in index order.
/// Built once per analysis and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PartitionTable {
    pub(crate) dos: Vec<DosPartitionEntry>,
    pub(crate) gpt: Vec<GptPartitionEntry>,
    pub(crate) gpt_header: Option<GptHeader>,
}

impl PartitionTable {
    /// Run the full decode pipeline against a borrowed byte source.
    ///
    /// Walks the MBR/EBR chain from sector 0, then reads the GPT exactly
    /// once if any accumulated entry is GPT-protective. Any failure aborts
    /// the whole analysis; no partial table is returned.
    pub fn parse(stream: &mut dyn ReadSeek, device: &str) -> Result<Self> {
        let mut table = Self::default();
        let mut visited = HashSet::new();
        mbr::walk(stream, device, 0, &mut table, &mut visited)?;

        if table.dos.iter().any(|e| e.is_gpt_protective()) {
            debug!(device, "GPT-protective entry present, reading GPT");
            gpt::read(stream, device, &mut table)?;
        }

        Ok(table)
    }

    /// The DOS sequence, discovery order
    pub fn dos_entries(&self) -> &[DosPartitionEntry] {
        &self.dos
    }

    /// The GPT sequence, array-index order, used entries only
    pub fn gpt_entries(&self) -> &[GptPartitionEntry] {
        &self.gpt
    }

    /// The decoded GPT header, if the disk carried one
    pub fn gpt_header(&self) -> Option<&GptHeader> {
        self.gpt_header.as_ref()
    }

    /// Find the bootable DOS entry.
    ///
    /// Returns the 1-based position of the single bootable entry, or 0 when
    /// none is bootable. More than one bootable entry is ambiguous and
    /// surfaced as [`Error::MultipleBootable`] carrying the positions of the
    /// first two matches, rather than resolved by convention.
    pub fn bootable(&self) -> Result<usize> {
        let mut found = 0;
        for (i, entry) in self.dos.iter().enumerate() {
            if entry.is_bootable() {
                if found != 0 {
                    return Err(Error::MultipleBootable {
                        first: found,
                        second: i + 1,
                    });
                }
                found = i + 1;
            }
        }
        Ok(found)
    }
}

impl fmt::Display for PartitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.dos.iter().enumerate() {
            writeln!(f, "{} {}", i + 1, entry)?;
        }
        if let Some(header) = &self.gpt_header {
            writeln!(f, "GPT {}", header)?;
            for (i, entry) in self.gpt.iter().enumerate() {
                writeln!(f, "{} {}", i + 1, entry)?;
            }
        }
        writeln!(f, "Total partitions: {}", self.dos.len())?;
        match self.bootable() {
            Ok(index) => write!(f, "Bootable: {}", index),
            Err(err) => write!(f, "Bootable: {}", err),
        }
    }
}

/// Open a device or image file and decode its partition tables.
///
/// The file handle lives only for the duration of this call and is dropped
/// on every exit path.
pub fn analyze(path: impl AsRef<Path>) -> Result<PartitionTable> {
    let path = path.as_ref();
    let device = path.display().to_string();
    let mut file = File::open(path).map_err(|source| Error::Open {
        device: device.clone(),
        source,
    })?;
    PartitionTable::parse(&mut file, &device)
}
