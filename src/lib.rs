//! geoip-dat - Lookups against legacy GeoIP `.dat` databases
//!
//! Reads the binary City and Organization (plus ISP and Domain) editions of
//! the legacy GeoIP format and resolves IPv4 addresses to location or
//! organization records. Databases are read-only; building them is out of
//! scope.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use geoip_dat::{Database, LoadMode, Record};
//!
//! let db = Database::open_with("GeoLiteCity.dat", LoadMode::Memory, true)?;
//!
//! match db.look_up("24.24.24.24")? {
//!     Record::City(city) => {
//!         println!("{} {:?} ({}, {})", city.country_code, city.city,
//!                  city.latitude, city.longitude);
//!     }
//!     Record::NotFound => println!("unassigned"),
//!     other => println!("{:?}", other),
//! }
//! # Ok::<(), geoip_dat::GeoIpError>(())
//! ```
//!
//! # Load modes
//!
//! | Mode         | What is held in memory |
//! |--------------|------------------------|
//! | `filesystem` | nothing                |
//! | `memory`     | the whole file         |
//! | `index`      | the search tree        |
//! | `mmap`       | a shared mapping       |
//!
//! `index` is the default. All modes return identical records.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │  address   dotted-decimal <-> u32      │
//! ├────────────────────────────────────────┤
//! │  database  open / look_up / info       │
//! ├──────────────────┬─────────────────────┤
//! │  dat::tree       │  record + charset   │
//! │  32-level walk   │  City / Org decode  │
//! ├──────────────────┴─────────────────────┤
//! │  dat::format     trailer parsing       │
//! ├────────────────────────────────────────┤
//! │  storage         ByteSource per mode   │
//! └────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Dotted-decimal address conversion
pub mod address;
/// Windows-1252 text normalization
pub mod charset;
/// Built-in country table
pub mod countries;
/// Legacy file format: trailer, editions and search tree
pub mod dat;
/// Opened database handle
pub mod database;
/// Error types
pub mod error;
/// Record decoders
pub mod record;
/// Region name tables
pub mod regions;
/// Byte sources for each load mode
pub mod storage;
/// Structural verification reports
pub mod validation;

// Re-exports for Rust consumers

pub use crate::address::{addr_to_num, num_to_addr, parse_addr, Network};
pub use crate::dat::{DatHeader, DatabaseKind};
pub use crate::database::{Database, OpenOptions};
pub use crate::error::{GeoIpError, Result};
pub use crate::record::{LocationRecord, OrganizationRecord, Record};
pub use crate::storage::{ByteSource, LoadMode};
pub use crate::validation::ValidationReport;

// Version information
/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
