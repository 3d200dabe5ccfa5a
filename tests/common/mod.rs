//! Test fixtures: writes small legacy-format databases
//!
//! The tree is built as an arena of nodes, one per address bit, and
//! serialized with the edition's pointer width. Leaf offset 0 is kept for
//! unassigned space, so the data region starts with a pad byte.

#![allow(dead_code)]

use geoip_dat::countries;
use geoip_dat::dat::types::{INFO_DELIMITER, STRUCTURE_DELIMITER};
use geoip_dat::DatabaseKind;
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodePointer {
    Node(u32),
    Data(u32),
    Empty,
}

#[derive(Debug, Clone)]
struct Node {
    left: NodePointer,
    right: NodePointer,
}

impl Node {
    fn empty() -> Self {
        Node {
            left: NodePointer::Empty,
            right: NodePointer::Empty,
        }
    }

    fn side_mut(&mut self, bit: u32) -> &mut NodePointer {
        if bit == 0 {
            &mut self.left
        } else {
            &mut self.right
        }
    }
}

/// Builder for legacy `.dat` files
pub struct DatBuilder {
    kind: DatabaseKind,
    nodes: Vec<Node>,
    data: Vec<u8>,
    info: Option<Vec<u8>>,
}

impl DatBuilder {
    pub fn new(kind: DatabaseKind) -> Self {
        DatBuilder {
            kind,
            nodes: vec![Node::empty()],
            data: vec![0],
            info: None,
        }
    }

    /// Attach an info string after a `00 00 00` delimiter
    pub fn info(&mut self, text: &[u8]) -> &mut Self {
        self.info = Some(text.to_vec());
        self
    }

    /// Map `cidr` to a record. Networks must not overlap.
    pub fn insert(&mut self, cidr: &str, record: &[u8]) -> &mut Self {
        let (addr, prefix_len) = cidr.split_once('/').unwrap_or((cidr, "32"));
        let ipnum = geoip_dat::parse_addr(addr).unwrap();
        let prefix_len: u32 = prefix_len.parse().unwrap();
        assert!((1..=32).contains(&prefix_len));

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(record);

        let mut node = 0usize;
        for depth in 0..prefix_len {
            let bit = (ipnum >> (31 - depth)) & 1;
            let last = depth + 1 == prefix_len;
            let current = *self.nodes[node].side_mut(bit);

            if last {
                assert_eq!(current, NodePointer::Empty, "{} overlaps", cidr);
                *self.nodes[node].side_mut(bit) = NodePointer::Data(offset);
                break;
            }

            node = match current {
                NodePointer::Node(n) => n as usize,
                NodePointer::Empty => {
                    let id = self.nodes.len();
                    self.nodes.push(Node::empty());
                    *self.nodes[node].side_mut(bit) = NodePointer::Node(id as u32);
                    id
                }
                NodePointer::Data(_) => panic!("{} overlaps an inserted network", cidr),
            };
        }
        self
    }

    /// Number of tree nodes
    pub fn segments(&self) -> u32 {
        self.nodes.len() as u32
    }

    pub fn build(&self) -> Vec<u8> {
        let segments = self.segments();
        let width = self.kind.record_length().record_bytes();

        let value = |p: NodePointer| match p {
            NodePointer::Node(n) => n,
            NodePointer::Data(offset) => segments + offset,
            NodePointer::Empty => segments,
        };

        let mut out = Vec::new();
        for node in &self.nodes {
            out.extend_from_slice(&value(node.left).to_le_bytes()[..width]);
            out.extend_from_slice(&value(node.right).to_le_bytes()[..width]);
        }
        out.extend_from_slice(&self.data);

        if let Some(info) = &self.info {
            out.extend_from_slice(&INFO_DELIMITER);
            out.extend_from_slice(info);
        }

        out.extend_from_slice(&STRUCTURE_DELIMITER);
        out.push(self.kind.edition());
        out.extend_from_slice(&segments.to_le_bytes()[..3]);
        out
    }

    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }
}

/// Fields of a City record before encoding
#[derive(Debug, Clone, Default)]
pub struct CityFields<'a> {
    pub country: &'a str,
    pub region: &'a [u8],
    pub city: &'a [u8],
    pub postal: &'a [u8],
    pub latitude: f64,
    pub longitude: f64,
    pub metro_code: u32,
    pub area_code: u32,
}

impl CityFields<'_> {
    /// Encode for `kind`; the metro/area combo is written for US records in
    /// rev1 files only
    pub fn encode(&self, kind: DatabaseKind) -> Vec<u8> {
        let index = countries::index_of(self.country).unwrap();
        let mut out = vec![index];
        for text in [self.region, self.city, self.postal] {
            out.extend_from_slice(text);
            out.push(0);
        }
        for degrees in [self.latitude, self.longitude] {
            let raw = ((degrees + 180.0) * 10000.0).round() as u32;
            out.extend_from_slice(&raw.to_le_bytes()[..3]);
        }
        if kind == DatabaseKind::CityRev1 && index == countries::US_INDEX {
            let combo = self.metro_code * 1000 + self.area_code;
            out.extend_from_slice(&combo.to_le_bytes()[..3]);
        }
        out
    }
}

/// Encode a name record
pub fn name_record(name: &[u8]) -> Vec<u8> {
    let mut out = name.to_vec();
    out.push(0);
    out
}

pub const CITY_INFO: &[u8] = b"GEO-533LITE 20240102 Build 1 Copyright (c) 2024 fixture";

/// City rev1 fixture:
/// - 24.24.24.0/24: Deer Park, NY
/// - 201.85.50.0/24: Jundia\xED (Latin-1), Sao Paulo state
/// - 119.236.232.0/24: Hong Kong with region "00"
/// - 81.2.69.0/24: London, no postal code
pub fn city_fixture(kind: DatabaseKind) -> DatBuilder {
    let mut b = DatBuilder::new(kind);
    b.insert(
        "24.24.24.0/24",
        &CityFields {
            country: "US",
            region: b"NY",
            city: b"Deer Park",
            postal: b"11729",
            latitude: 40.7627,
            longitude: -73.3227,
            metro_code: 501,
            area_code: 631,
        }
        .encode(kind),
    )
    .insert(
        "201.85.50.0/24",
        &CityFields {
            country: "BR",
            region: b"27",
            city: b"Jundia\xED",
            postal: b"",
            latitude: -23.2,
            longitude: -46.8833,
            ..Default::default()
        }
        .encode(kind),
    )
    .insert(
        "119.236.232.0/24",
        &CityFields {
            country: "HK",
            region: b"00",
            city: b"Central District",
            postal: b"",
            latitude: 22.2833,
            longitude: 114.15,
            ..Default::default()
        }
        .encode(kind),
    )
    .insert(
        "81.2.69.0/24",
        &CityFields {
            country: "GB",
            region: b"H9",
            city: b"London",
            postal: b"",
            latitude: 51.5142,
            longitude: -0.0931,
            ..Default::default()
        }
        .encode(kind),
    )
    .info(CITY_INFO);
    b
}

/// Organization-style fixture for `kind` (Organization, Isp or Domain)
pub fn org_fixture(kind: DatabaseKind) -> DatBuilder {
    let mut b = DatBuilder::new(kind);
    b.insert("24.24.0.0/16", &name_record(b"Road Runner"))
        .insert("201.85.0.0/16", &name_record(b"Telef\xF3nica Brasil"))
        .insert("8.8.8.0/24", &name_record(b"Google"));
    b
}

/// Assert two floats agree to the precision the format stores
pub fn assert_coord(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "{} != {}",
        actual,
        expected
    );
}
