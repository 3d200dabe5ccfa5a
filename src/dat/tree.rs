//! Search tree traversal
//!
//! The tree is a flat array of `segments` nodes at the start of the file.
//! Each node holds two little-endian pointers (left for a 0 bit, right for
//! a 1 bit). A pointer below `segments` is the index of the next node; a
//! pointer at or above it is a leaf, and `pointer - segments` is an offset
//! into the data region.
//!
//! Every address reaches a leaf within 32 levels in a well-formed file, so
//! running out of bits is reported as corruption rather than "not found".

use super::format::DatHeader;
use super::types::IPV4_BITS;
use crate::error::{GeoIpError, Result};
use crate::storage::ByteSource;
use tracing::trace;

/// Where a traversal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupResult {
    /// Offset into the data region (relative to the end of the tree)
    pub leaf_offset: u32,
    /// Number of address bits consumed before reaching the leaf
    pub prefix_len: u8,
}

impl LookupResult {
    /// The leaf every unassigned range points at
    pub fn is_unassigned(&self) -> bool {
        self.leaf_offset == 0
    }
}

/// Search tree over a byte source
pub struct SearchTree<'a, S: ByteSource + ?Sized> {
    source: &'a S,
    header: &'a DatHeader,
}

impl<'a, S: ByteSource + ?Sized> SearchTree<'a, S> {
    /// Create a new search tree
    pub fn new(source: &'a S, header: &'a DatHeader) -> Self {
        Self { source, header }
    }

    /// Walk the tree for `ipnum`, most significant bit first
    pub fn resolve(&self, ipnum: u32) -> Result<LookupResult> {
        let segments = self.header.segments;
        let mut node = 0u32;

        for bit_index in 0..IPV4_BITS {
            let bit = ((ipnum >> (31 - bit_index)) & 1) as u8;
            let record = self.read_record(node, bit)?;

            if record >= segments {
                let result = LookupResult {
                    leaf_offset: record - segments,
                    prefix_len: bit_index + 1,
                };
                trace!(
                    ipnum,
                    leaf_offset = result.leaf_offset,
                    prefix_len = result.prefix_len,
                    "resolved leaf"
                );
                return Ok(result);
            }
            node = record;
        }

        Err(GeoIpError::structural(format!(
            "traversal for {} did not reach a leaf within {} levels",
            crate::address::num_to_addr(ipnum),
            IPV4_BITS
        )))
    }

    /// Read one pointer of a node.
    ///
    /// `side` 0 is the left pointer, 1 the right.
    pub fn read_record(&self, node: u32, side: u8) -> Result<u32> {
        if node >= self.header.segments {
            return Err(GeoIpError::structural(format!(
                "node index {} exceeds segment count {}",
                node, self.header.segments
            )));
        }

        let width = self.header.record_length.record_bytes();
        let offset = node as u64 * self.header.record_length.node_bytes() as u64
            + side as u64 * width as u64;

        let mut buf = [0u8; 4];
        self.source
            .read_into(offset, &mut buf[..width])
            .map_err(|e| match e {
                GeoIpError::Structural(msg) => {
                    GeoIpError::Structural(format!("tree node {}: {}", node, msg))
                }
                other => other,
            })?;

        Ok(u32::from_le_bytes(buf))
    }
}
