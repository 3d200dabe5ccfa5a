//! Legacy format constants and edition types

use std::fmt;

/// Trailer delimiter preceding the edition byte
pub const STRUCTURE_DELIMITER: [u8; 3] = [0xFF, 0xFF, 0xFF];

/// Delimiter preceding the database info string
pub const INFO_DELIMITER: [u8; 3] = [0x00, 0x00, 0x00];

/// How far back from the end of the file the trailer may start
pub const STRUCTURE_INFO_MAX_SIZE: u64 = 20;

/// How far back from the end of the file the info string may start
pub const DATABASE_INFO_MAX_SIZE: u64 = 100;

/// Width of the little-endian segment count following the edition byte
pub const SEGMENT_RECORD_LENGTH: usize = 3;

/// Edition bytes at or above this value carry a +105 offset
pub const EDITION_OFFSET_THRESHOLD: u8 = 106;

/// Fixed node count of Country, Proxy and Netspeed editions
pub const COUNTRY_BEGIN: u32 = 16_776_960;

/// Fixed node count of Region rev0 editions
pub const STATE_BEGIN_REV0: u32 = 16_700_000;

/// Fixed node count of Region rev1 editions
pub const STATE_BEGIN_REV1: u32 = 16_000_000;

/// Upper bound on the size of a City record
pub const FULL_RECORD_LENGTH: usize = 50;

/// Upper bound on the size of a name record (Organization, ISP, Domain)
pub const MAX_ORG_RECORD_LENGTH: usize = 300;

/// Number of address bits, and so the tree depth
pub const IPV4_BITS: u8 = 32;

/// Database edition declared in the trailer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum DatabaseKind {
    /// Country edition (also the default when no trailer is present)
    Country,
    /// City, revision 0 (no metro/area code)
    CityRev0,
    /// City, revision 1
    CityRev1,
    /// Region, revision 0
    RegionRev0,
    /// Region, revision 1
    RegionRev1,
    /// Organization names
    Organization,
    /// ISP names
    Isp,
    /// Domain names
    Domain,
    /// Autonomous system numbers
    Asnum,
    /// Anonymous proxy flags
    Proxy,
    /// Connection speed
    Netspeed,
    /// Any edition byte this reader does not know
    Other(u8),
}

impl DatabaseKind {
    /// Map an edition byte (already offset-corrected) to a kind
    pub fn from_edition(edition: u8) -> Self {
        match edition {
            1 => DatabaseKind::Country,
            2 => DatabaseKind::CityRev1,
            3 => DatabaseKind::RegionRev1,
            4 => DatabaseKind::Isp,
            5 => DatabaseKind::Organization,
            6 => DatabaseKind::CityRev0,
            7 => DatabaseKind::RegionRev0,
            8 => DatabaseKind::Proxy,
            9 => DatabaseKind::Asnum,
            10 => DatabaseKind::Netspeed,
            11 => DatabaseKind::Domain,
            other => DatabaseKind::Other(other),
        }
    }

    /// Edition byte as written in the trailer
    pub fn edition(self) -> u8 {
        match self {
            DatabaseKind::Country => 1,
            DatabaseKind::CityRev1 => 2,
            DatabaseKind::RegionRev1 => 3,
            DatabaseKind::Isp => 4,
            DatabaseKind::Organization => 5,
            DatabaseKind::CityRev0 => 6,
            DatabaseKind::RegionRev0 => 7,
            DatabaseKind::Proxy => 8,
            DatabaseKind::Asnum => 9,
            DatabaseKind::Netspeed => 10,
            DatabaseKind::Domain => 11,
            DatabaseKind::Other(b) => b,
        }
    }

    /// True for both City revisions
    pub fn is_city(self) -> bool {
        matches!(self, DatabaseKind::CityRev0 | DatabaseKind::CityRev1)
    }

    /// True for editions whose records are a single NUL-terminated name
    pub fn is_name(self) -> bool {
        matches!(
            self,
            DatabaseKind::Organization | DatabaseKind::Isp | DatabaseKind::Domain
        )
    }

    /// True when the segment count is stored in the trailer rather than fixed
    pub fn has_segment_record(self) -> bool {
        self.is_city() || self.is_name() || self == DatabaseKind::Asnum
    }

    /// Pointer width for this edition
    pub fn record_length(self) -> RecordLength {
        if self.is_name() {
            RecordLength::Org
        } else {
            RecordLength::Standard
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseKind::Country => write!(f, "Country"),
            DatabaseKind::CityRev0 => write!(f, "City rev0"),
            DatabaseKind::CityRev1 => write!(f, "City rev1"),
            DatabaseKind::RegionRev0 => write!(f, "Region rev0"),
            DatabaseKind::RegionRev1 => write!(f, "Region rev1"),
            DatabaseKind::Organization => write!(f, "Organization"),
            DatabaseKind::Isp => write!(f, "ISP"),
            DatabaseKind::Domain => write!(f, "Domain"),
            DatabaseKind::Asnum => write!(f, "ASNum"),
            DatabaseKind::Proxy => write!(f, "Proxy"),
            DatabaseKind::Netspeed => write!(f, "Netspeed"),
            DatabaseKind::Other(b) => write!(f, "unknown edition {}", b),
        }
    }
}

/// Tree pointer width in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum RecordLength {
    /// 3-byte pointers (6 bytes per node)
    Standard = 3,
    /// 4-byte pointers (8 bytes per node), used by name editions
    Org = 4,
}

impl RecordLength {
    /// Bytes in a single pointer
    pub fn record_bytes(self) -> usize {
        self as usize
    }

    /// Bytes in a node (two pointers)
    pub fn node_bytes(self) -> usize {
        self.record_bytes() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edition_round_trip() {
        for edition in 0u8..=20 {
            assert_eq!(DatabaseKind::from_edition(edition).edition(), edition);
        }
    }

    #[test]
    fn test_record_length() {
        assert_eq!(DatabaseKind::CityRev1.record_length(), RecordLength::Standard);
        assert_eq!(DatabaseKind::Organization.record_length(), RecordLength::Org);
        assert_eq!(DatabaseKind::Isp.record_length().node_bytes(), 8);
        assert_eq!(DatabaseKind::Country.record_length().node_bytes(), 6);
    }

    #[test]
    fn test_segment_record_editions() {
        assert!(DatabaseKind::CityRev0.has_segment_record());
        assert!(DatabaseKind::Domain.has_segment_record());
        assert!(DatabaseKind::Asnum.has_segment_record());
        assert!(!DatabaseKind::Country.has_segment_record());
        assert!(!DatabaseKind::RegionRev1.has_segment_record());
    }
}
