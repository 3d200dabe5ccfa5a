//! Legacy trailer parsing
//!
//! The file carries no header. Structural parameters live in a short
//! trailer near the end of the file:
//!
//! ```text
//! ... tree ... | ... data ... | 00 00 00 | info text | FF FF FF | edition | segments (3 bytes LE)
//! ```
//!
//! Both the info text and the trailer are found by scanning backwards from
//! `len - 3`, one byte at a time, for a three-byte delimiter.

use super::types::*;
use crate::charset;
use crate::error::{GeoIpError, Result};
use crate::storage::ByteSource;
use tracing::{debug, warn};

/// Smallest file that can carry a trailer delimiter and an edition byte
pub const MIN_FILE_SIZE: u64 = 4;

/// Structural parameters read from the trailer.
///
/// Fixed at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DatHeader {
    /// Declared edition
    pub kind: DatabaseKind,
    /// Number of tree nodes; pointers at or above this are leaves
    pub segments: u32,
    /// Pointer width
    pub record_length: RecordLength,
    /// Bytes occupied by the tree, which is also where the data region starts
    pub tree_size: u64,
    /// Total file size
    pub file_size: u64,
    /// False when no delimiter was found and Country was assumed
    pub has_trailer: bool,
}

impl DatHeader {
    /// Fail with `Structural` if the file cannot hold a trailer
    pub fn check_min_size(len: u64) -> Result<()> {
        if len < MIN_FILE_SIZE {
            return Err(GeoIpError::structural(format!(
                "file is {} bytes, too short to contain a trailer",
                len
            )));
        }
        Ok(())
    }

    /// Locate and parse the trailer
    pub fn from_source<S: ByteSource + ?Sized>(source: &S) -> Result<Self> {
        let len = source.len();
        Self::check_min_size(len)?;

        // Delimiter start positions range over len-3 down to len-22
        let tail_len = len.min(STRUCTURE_INFO_MAX_SIZE + 2);
        let tail_start = len - tail_len;
        let tail = source.read_bytes(tail_start, tail_len as usize)?;

        let Some(idx) = scan_back(&tail, STRUCTURE_DELIMITER, STRUCTURE_INFO_MAX_SIZE) else {
            warn!(file_size = len, "no structure trailer found, assuming Country edition");
            return Ok(Self::with_kind(DatabaseKind::Country, COUNTRY_BEGIN, len, false));
        };

        let fields = &tail[idx + STRUCTURE_DELIMITER.len()..];
        let Some(&raw_edition) = fields.first() else {
            return Err(GeoIpError::structural(
                "trailer delimiter is not followed by an edition byte",
            ));
        };
        let edition = if raw_edition >= EDITION_OFFSET_THRESHOLD {
            raw_edition - 105
        } else {
            raw_edition
        };
        let kind = DatabaseKind::from_edition(edition);

        let segments = match kind {
            DatabaseKind::RegionRev0 => STATE_BEGIN_REV0,
            DatabaseKind::RegionRev1 => STATE_BEGIN_REV1,
            k if k.has_segment_record() => {
                let seg = fields.get(1..1 + SEGMENT_RECORD_LENGTH).ok_or_else(|| {
                    GeoIpError::structural(format!(
                        "{} trailer is truncated before its segment count",
                        kind
                    ))
                })?;
                read_u24_le(seg)
            }
            _ => COUNTRY_BEGIN,
        };

        if segments == 0 {
            return Err(GeoIpError::structural(format!(
                "{} trailer declares zero tree segments",
                kind
            )));
        }

        let header = Self::with_kind(kind, segments, len, true);
        debug!(
            kind = %header.kind,
            segments = header.segments,
            record_length = header.record_length.record_bytes(),
            tree_size = header.tree_size,
            file_size = len,
            "parsed database trailer"
        );
        Ok(header)
    }

    fn with_kind(kind: DatabaseKind, segments: u32, file_size: u64, has_trailer: bool) -> Self {
        let record_length = kind.record_length();
        DatHeader {
            kind,
            segments,
            record_length,
            tree_size: segments as u64 * record_length.node_bytes() as u64,
            file_size,
            has_trailer,
        }
    }

    /// File position of the record a leaf offset points at
    pub fn record_position(&self, leaf_offset: u32) -> u64 {
        self.tree_size + leaf_offset as u64
    }

    /// Bytes available after the tree (zero if the tree overruns the file)
    pub fn data_size(&self) -> u64 {
        self.file_size.saturating_sub(self.tree_size)
    }
}

/// Find the legacy info string, e.g. `"GEO-533LITE 20100504 Build 1 ..."`.
///
/// Text runs from the `00 00 00` delimiter to the structure trailer (or end
/// of file), with any trailing NULs dropped. A delimiter inside the tree
/// region is a run of zero pointer bytes, and text with interior NULs is
/// record data; both mean the file carries no info block.
pub fn database_info<S: ByteSource + ?Sized>(
    source: &S,
    header: &DatHeader,
) -> Result<Option<String>> {
    let len = source.len();
    if len < INFO_DELIMITER.len() as u64 {
        return Ok(None);
    }

    let tail_len = len.min(DATABASE_INFO_MAX_SIZE + 2);
    let tail_start = len - tail_len;
    let tail = source.read_bytes(tail_start, tail_len as usize)?;

    let Some(idx) = scan_back(&tail, INFO_DELIMITER, DATABASE_INFO_MAX_SIZE) else {
        return Ok(None);
    };
    if tail_start + (idx as u64) < header.tree_size {
        return Ok(None);
    }

    let mut text = &tail[idx + INFO_DELIMITER.len()..];
    if let Some(end) = memchr::memmem::find(text, &STRUCTURE_DELIMITER) {
        text = &text[..end];
    }
    while let [rest @ .., 0] = text {
        text = rest;
    }

    if text.is_empty() || memchr::memchr(0, text).is_some() {
        return Ok(None);
    }
    Ok(Some(charset::normalize_owned(text)))
}

/// Scan a tail buffer backwards for `delim`, starting with the window that
/// ends at the last byte and moving one byte per step for at most `steps`
/// steps. Returns the index of the delimiter within `tail`.
fn scan_back(tail: &[u8], delim: [u8; 3], steps: u64) -> Option<usize> {
    let last = tail.len().checked_sub(delim.len())?;
    (0..steps as usize)
        .map_while(|i| last.checked_sub(i))
        .find(|&pos| tail[pos..pos + delim.len()] == delim)
}

/// Little-endian 24-bit integer from the first three bytes of `b`
#[inline]
pub(crate) fn read_u24_le(b: &[u8]) -> u32 {
    (b[0] as u32) | ((b[1] as u32) << 8) | ((b[2] as u32) << 16)
}
