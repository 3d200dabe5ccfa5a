//! Structural verification of legacy database files
//!
//! Run at open time when `verify` is requested, or standalone through
//! [`validate_database`]. Checks:
//!
//! - Trailer presence and a known edition
//! - Tree region fits inside the file and leaves room for data
//! - Both pointers of the root node are in range
//! - Traversals along the edges of the address space terminate, and the
//!   records they land on decode
//!
//! Without verification, the same corruption surfaces later as a
//! `Structural` error from the lookup that hits it.
//!
//! ```rust,no_run
//! use geoip_dat::validation::validate_database;
//! use std::path::Path;
//!
//! let report = validate_database(Path::new("GeoLiteCity.dat"))?;
//! if !report.is_valid() {
//!     for error in &report.errors {
//!         eprintln!("  ERROR: {}", error);
//!     }
//! }
//! # Ok::<(), geoip_dat::GeoIpError>(())
//! ```

use crate::dat::{DatHeader, DatabaseKind, SearchTree};
use crate::error::Result;
use crate::record;
use crate::storage::{self, ByteSource, LoadMode};
use std::path::Path;

/// Addresses whose traversals are checked: both edges of the address
/// space and both sides of the first split
const PROBE_ADDRESSES: [u32; 4] = [0, 0x7FFF_FFFF, 0x8000_0000, u32::MAX];

/// Validation report with detailed findings
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Problems that make the database unusable
    pub errors: Vec<String>,
    /// Suspicious but non-fatal findings
    pub warnings: Vec<String>,
    /// Informational messages about database properties
    pub info: Vec<String>,
    /// Database statistics
    pub stats: DatabaseStats,
}

/// Database statistics gathered during validation
#[derive(Debug, Clone, Default)]
pub struct DatabaseStats {
    /// File size in bytes
    pub file_size: u64,
    /// Declared edition
    pub kind: Option<DatabaseKind>,
    /// Tree node count
    pub segments: u32,
    /// Pointer width in bytes
    pub record_length: usize,
    /// Tree region size in bytes
    pub tree_size: u64,
    /// Data region size in bytes
    pub data_size: u64,
    /// Number of probe traversals that reached a leaf
    pub probes_resolved: usize,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            stats: DatabaseStats::default(),
        }
    }

    /// Check if database passed all validations (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.info.push(msg.into());
    }
}

impl DatabaseStats {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        let kind = self
            .kind
            .map(|k| k.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        format!(
            "Edition: {}, Segments: {}, Record length: {}, Tree: {} KB, Data: {} KB",
            kind,
            self.segments,
            self.record_length,
            self.tree_size / 1024,
            self.data_size / 1024
        )
    }
}

/// Open `path` fully in memory and verify it
pub fn validate_database(path: &Path) -> Result<ValidationReport> {
    let (source, header) = storage::load(path, LoadMode::Memory)?;
    Ok(verify(source.as_ref(), &header))
}

/// Verify an opened source against its parsed trailer
pub fn verify<S: ByteSource + ?Sized>(source: &S, header: &DatHeader) -> ValidationReport {
    let mut report = ValidationReport::new();
    let file_size = source.len();

    report.stats = DatabaseStats {
        file_size,
        kind: Some(header.kind),
        segments: header.segments,
        record_length: header.record_length.record_bytes(),
        tree_size: header.tree_size,
        data_size: header.data_size(),
        probes_resolved: 0,
    };
    report.info(format!(
        "File size: {} bytes ({} KB)",
        file_size,
        file_size / 1024
    ));

    if !header.has_trailer {
        report.warning("No structure trailer found; edition assumed to be Country");
    }
    match header.kind {
        DatabaseKind::Other(edition) => {
            report.warning(format!("Unknown edition byte {}", edition));
        }
        kind => report.info(format!("Edition: {}", kind)),
    }

    if header.segments == 0 {
        report.error("Trailer declares zero tree segments");
        return report;
    }

    if header.tree_size > file_size {
        report.error(format!(
            "Tree region ({} nodes, {} bytes) exceeds file size ({} bytes)",
            header.segments, header.tree_size, file_size
        ));
        return report;
    }

    let has_records = header.kind.is_city() || header.kind.is_name();
    if has_records && header.tree_size == file_size {
        report.error("File has no data region after the tree");
        return report;
    }

    let tree = SearchTree::new(source, header);
    check_root(&tree, header, file_size, &mut report);

    for ipnum in PROBE_ADDRESSES {
        let leaf = match tree.resolve(ipnum) {
            Ok(leaf) => leaf,
            Err(e) => {
                report.error(format!(
                    "Traversal for {} failed: {}",
                    crate::address::num_to_addr(ipnum),
                    e
                ));
                continue;
            }
        };
        report.stats.probes_resolved += 1;

        if has_records && !leaf.is_unassigned() {
            if let Err(e) = record::decode(source, header, leaf) {
                report.error(format!(
                    "Record for {} failed to decode: {}",
                    crate::address::num_to_addr(ipnum),
                    e
                ));
            }
        }
    }

    if report.is_valid() {
        report.info(report.stats.summary());
    }
    report
}

fn check_root<S: ByteSource + ?Sized>(
    tree: &SearchTree<'_, S>,
    header: &DatHeader,
    file_size: u64,
    report: &mut ValidationReport,
) {
    for side in 0..2u8 {
        let pointer = match tree.read_record(0, side) {
            Ok(p) => p,
            Err(e) => {
                report.error(format!("Root node unreadable: {}", e));
                return;
            }
        };
        if pointer < header.segments {
            continue;
        }

        let leaf_offset = pointer - header.segments;
        if leaf_offset > 0 && header.record_position(leaf_offset) >= file_size {
            report.error(format!(
                "Root {} pointer {} lands past end of file",
                if side == 0 { "left" } else { "right" },
                pointer
            ));
        }
    }
}
