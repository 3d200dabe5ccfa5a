//! Opened database handle
//!
//! A [`Database`] ties a [`ByteSource`] to the trailer parsed from it. The
//! storage strategy is picked once at open time; lookups go through the
//! same tree walk and record decoders whichever strategy is in use.

use crate::address::{self, Network};
use crate::dat::{self, DatHeader, DatabaseKind, LookupResult, SearchTree};
use crate::error::{GeoIpError, Result};
use crate::record::{self, Record};
use crate::storage::{self, ByteSource, LoadMode, MemorySource};
use crate::validation::{self, ValidationReport};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Options for opening a database
///
/// ```no_run
/// use geoip_dat::{LoadMode, OpenOptions};
///
/// let db = OpenOptions::new()
///     .mode(LoadMode::Memory)
///     .verify(true)
///     .open("GeoLiteCity.dat")?;
/// # Ok::<(), geoip_dat::GeoIpError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenOptions {
    /// Storage strategy
    pub mode: LoadMode,
    /// Run a structural pass at open time and fail if it finds errors
    pub verify: bool,
}

impl OpenOptions {
    /// Index mode, no verification
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage strategy
    pub fn mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable the open-time structural pass
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Open `path` with these options
    pub fn open(&self, path: impl AsRef<Path>) -> Result<Database> {
        Database::open_with(path, self.mode, self.verify)
    }
}

/// Read-only legacy GeoIP database
///
/// Cheap to share across threads: every storage strategy reads with
/// positioned I/O or from immutable memory.
///
/// ```no_run
/// use geoip_dat::Database;
///
/// let db = Database::open("GeoLiteCity.dat")?;
/// if let Some(city) = db.look_up("24.24.24.24")?.as_city() {
///     println!("{:?} {:?}", city.city, city.region_name);
/// }
/// # Ok::<(), geoip_dat::GeoIpError>(())
/// ```
pub struct Database {
    source: Box<dyn ByteSource>,
    header: DatHeader,
    mode: LoadMode,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("header", &self.header)
            .finish()
    }
}

impl Database {
    /// Open in index mode without verification
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, LoadMode::default(), false)
    }

    /// Open under an explicit storage strategy.
    ///
    /// Fails with `NotFound` if the file cannot be opened and with
    /// `Structural` if the trailer is invalid or, when `verify` is set, if
    /// the structural pass reports errors.
    pub fn open_with(path: impl AsRef<Path>, mode: LoadMode, verify: bool) -> Result<Self> {
        let path = path.as_ref();
        let (source, header) = storage::load(path, mode)?;

        let db = Database {
            source,
            header,
            mode,
            path: Some(path.to_path_buf()),
        };
        debug!(
            path = %path.display(),
            mode = %mode,
            kind = %header.kind,
            segments = header.segments,
            record_length = header.record_length.record_bytes(),
            resident_bytes = db.source.resident_bytes(),
            "opened database"
        );

        if verify {
            db.check()?;
        }
        Ok(db)
    }

    /// Wrap an in-memory copy of a database file
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let source = MemorySource::from_vec(data);
        let header = DatHeader::from_source(&source)?;
        Ok(Database {
            source: Box::new(source),
            header,
            mode: LoadMode::Memory,
            path: None,
        })
    }

    fn check(&self) -> Result<()> {
        let report = self.validate();
        if report.is_valid() {
            return Ok(());
        }
        warn!(
            path = ?self.path,
            errors = report.errors.len(),
            first = %report.errors[0],
            "database failed verification"
        );
        Err(GeoIpError::Structural(report.errors.join("; ")))
    }

    /// Declared edition
    pub fn kind(&self) -> DatabaseKind {
        self.header.kind
    }

    /// Storage strategy in use
    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Structural parameters read from the trailer
    pub fn header(&self) -> &DatHeader {
        &self.header
    }

    /// Path the database was opened from, `None` for [`Database::from_bytes`]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Bytes of the file held in process memory
    pub fn resident_bytes(&self) -> usize {
        self.source.resident_bytes()
    }

    /// Look up a dotted-decimal IPv4 address.
    ///
    /// Fails with `MalformedAddress` unless `addr` is exactly four decimal
    /// octets. Addresses that fall in unassigned space yield
    /// [`Record::NotFound`].
    pub fn look_up(&self, addr: &str) -> Result<Record> {
        let ipnum = address::parse_addr(addr)
            .ok_or_else(|| GeoIpError::MalformedAddress(addr.to_string()))?;
        self.look_up_num(ipnum)
    }

    /// Look up an address given as a 32-bit integer
    pub fn look_up_num(&self, ipnum: u32) -> Result<Record> {
        self.ensure_supported()?;
        let leaf = self.resolve(ipnum)?;
        record::decode(self.source.as_ref(), &self.header, leaf)
    }

    /// Look up an [`Ipv4Addr`]
    pub fn look_up_ip(&self, addr: Ipv4Addr) -> Result<Record> {
        self.look_up_num(u32::from(addr))
    }

    /// Look up a dynamically typed address: a string or an integer.
    ///
    /// Anything else fails with `TypeMismatch`.
    pub fn look_up_value(&self, addr: &Value) -> Result<Record> {
        match addr {
            Value::String(s) => self.look_up(s),
            Value::Number(_) => self.look_up_num(address::ipnum_from_value(addr)?),
            other => Err(address::type_mismatch("string or integer", other)),
        }
    }

    /// Walk the tree without decoding the record
    pub fn resolve(&self, ipnum: u32) -> Result<LookupResult> {
        SearchTree::new(self.source.as_ref(), &self.header).resolve(ipnum)
    }

    /// Address range sharing the leaf that `addr` resolves to
    pub fn network_of(&self, addr: &str) -> Result<Network> {
        let ipnum = address::parse_addr(addr)
            .ok_or_else(|| GeoIpError::MalformedAddress(addr.to_string()))?;
        let leaf = self.resolve(ipnum)?;
        Ok(Network::from_prefix(ipnum, leaf.prefix_len))
    }

    /// Build and release information embedded near the end of the file
    pub fn info(&self) -> Result<Option<String>> {
        dat::database_info(self.source.as_ref(), &self.header)
    }

    /// Run the structural pass against this database
    pub fn validate(&self) -> ValidationReport {
        validation::verify(self.source.as_ref(), &self.header)
    }

    /// Release the file handle or buffer.
    ///
    /// Equivalent to dropping the database.
    pub fn close(self) {
        debug!(path = ?self.path, mode = %self.mode, "closed database");
    }

    fn ensure_supported(&self) -> Result<()> {
        let kind = self.header.kind;
        if kind.is_city() || kind.is_name() {
            Ok(())
        } else {
            Err(GeoIpError::Unsupported(kind))
        }
    }
}
