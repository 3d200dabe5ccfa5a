//! Byte-range access to an opened database file
//!
//! Every load mode is a [`ByteSource`]: a read-only, random-offset view of
//! the file. The tree navigator and record decoders only ever talk to this
//! trait, so the mode is fixed at open time and never consulted again.
//!
//! | Mode         | Resident memory        | Per-lookup I/O               |
//! |--------------|------------------------|------------------------------|
//! | `filesystem` | none                   | one `pread` per tree level   |
//! | `memory`     | whole file             | none                         |
//! | `index`      | tree region only       | one `pread` per record       |
//! | `mmap`       | shared page cache      | page faults                  |
//!
//! All sources are `Send + Sync`. File reads are positioned (`pread`), so
//! concurrent lookups through one handle never race on a shared cursor.

use crate::dat::DatHeader;
use crate::error::{GeoIpError, Result};
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Storage strategy chosen when a database is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Positioned reads against the open file, nothing cached
    Filesystem,
    /// Whole file read into a heap buffer at open time
    Memory,
    /// Tree region cached in memory, records read from the file
    #[default]
    Index,
    /// Whole file memory-mapped
    Mmap,
}

impl LoadMode {
    /// All modes, in the order they are usually benchmarked
    pub const ALL: [LoadMode; 4] = [
        LoadMode::Filesystem,
        LoadMode::Memory,
        LoadMode::Index,
        LoadMode::Mmap,
    ];

    /// Lowercase mode name
    pub fn as_str(self) -> &'static str {
        match self {
            LoadMode::Filesystem => "filesystem",
            LoadMode::Memory => "memory",
            LoadMode::Index => "index",
            LoadMode::Mmap => "mmap",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "filesystem" | "standard" => Ok(LoadMode::Filesystem),
            "memory" => Ok(LoadMode::Memory),
            "index" => Ok(LoadMode::Index),
            "mmap" => Ok(LoadMode::Mmap),
            other => Err(format!(
                "unknown load mode {:?} (expected filesystem, memory, index or mmap)",
                other
            )),
        }
    }
}

/// Random-offset read access to database bytes
pub trait ByteSource: Send + Sync {
    /// Total size of the underlying file
    fn len(&self) -> u64;

    /// Fill `buf` with the bytes starting at `offset`.
    ///
    /// Fails with `Structural` if the range runs past the end of the file.
    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Bytes resident in process memory for this source
    fn resident_bytes(&self) -> usize;

    /// True when the file is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read exactly `len` bytes at `offset`.
    ///
    /// In-memory sources borrow; file-backed sources allocate.
    fn read_bytes(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        let mut buf = vec![0u8; len];
        self.read_into(offset, &mut buf)?;
        Ok(Cow::Owned(buf))
    }

    /// Read up to `max` bytes at `offset`, stopping at end of file.
    fn read_up_to(&self, offset: u64, max: usize) -> Result<Cow<'_, [u8]>> {
        let available = self.len().saturating_sub(offset);
        if available == 0 {
            return Err(GeoIpError::structural(format!(
                "offset {} is at or past end of file ({} bytes)",
                offset,
                self.len()
            )));
        }
        let len = (max as u64).min(available) as usize;
        self.read_bytes(offset, len)
    }
}

fn check_range(offset: u64, len: usize, total: u64) -> Result<()> {
    match offset.checked_add(len as u64) {
        Some(end) if end <= total => Ok(()),
        _ => Err(GeoIpError::structural(format!(
            "read of {} bytes at offset {} exceeds file size {}",
            len, offset, total
        ))),
    }
}

fn slice_of(data: &[u8], offset: u64, len: usize) -> Result<&[u8]> {
    check_range(offset, len, data.len() as u64)?;
    let start = offset as usize;
    Ok(&data[start..start + len])
}

/// Open `path` for reading, mapping failures to `NotFound`
pub(crate) fn open_file(path: &Path) -> Result<(File, u64)> {
    let not_found = |source: io::Error| GeoIpError::NotFound {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(not_found)?;
    let metadata = file.metadata().map_err(not_found)?;
    if metadata.is_dir() {
        return Err(not_found(io::Error::other("is a directory")));
    }
    Ok((file, metadata.len()))
}

/// Direct positioned reads, no caching
pub struct FileSource {
    #[cfg(unix)]
    file: File,
    #[cfg(not(unix))]
    file: std::sync::Mutex<File>,
    len: u64,
}

impl FileSource {
    /// Wrap an open file of known length
    pub fn new(file: File, len: u64) -> Self {
        Self {
            #[cfg(unix)]
            file,
            #[cfg(not(unix))]
            file: std::sync::Mutex::new(file),
            len,
        }
    }

    #[cfg(unix)]
    fn pread(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        use std::os::unix::fs::FileExt;
        self.file.read_exact_at(buf, offset)
    }

    #[cfg(not(unix))]
    fn pread(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        use std::io::{Seek, SeekFrom};
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("file handle lock poisoned"))?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        check_range(offset, buf.len(), self.len)?;
        self.pread(offset, buf)?;
        Ok(())
    }

    fn resident_bytes(&self) -> usize {
        0
    }
}

/// Whole file in a heap buffer
pub struct MemorySource {
    data: Vec<u8>,
}

impl MemorySource {
    /// Use an already loaded buffer
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Read the remainder of `file` into memory
    pub fn load(mut file: File, len: u64) -> Result<Self> {
        let mut data = Vec::with_capacity(len as usize);
        file.read_to_end(&mut data).map_err(GeoIpError::Io)?;
        Ok(Self { data })
    }

    /// The full buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl ByteSource for MemorySource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(slice_of(&self.data, offset, buf.len())?);
        Ok(())
    }

    fn read_bytes(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        slice_of(&self.data, offset, len).map(Cow::Borrowed)
    }

    fn resident_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Whole file memory-mapped
pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    /// Map `file` read-only
    pub fn map(file: &File) -> Result<Self> {
        // SAFETY: the mapping is read-only and the format is immutable once
        // built. A concurrent writer could change bytes under us, which the
        // bounds checks on every read keep memory-safe.
        let mmap = unsafe { Mmap::map(file) }.map_err(GeoIpError::Io)?;
        Ok(Self { mmap })
    }
}

impl ByteSource for MmapSource {
    fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(slice_of(&self.mmap, offset, buf.len())?);
        Ok(())
    }

    fn read_bytes(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        slice_of(&self.mmap, offset, len).map(Cow::Borrowed)
    }

    fn resident_bytes(&self) -> usize {
        0
    }
}

/// Tree region in memory, data region read from the file
pub struct IndexSource {
    index: Vec<u8>,
    file: FileSource,
}

impl IndexSource {
    /// Cache the first `index_len` bytes of `file`.
    ///
    /// `index_len` is clamped to the file length, so a trailer claiming a
    /// larger tree than the file holds does not fail here.
    pub fn load(file: FileSource, index_len: u64) -> Result<Self> {
        let index_len = index_len.min(file.len());
        let mut index = vec![0u8; index_len as usize];
        file.read_into(0, &mut index)?;
        Ok(Self { index, file })
    }

    /// Size of the cached tree region
    pub fn index_len(&self) -> usize {
        self.index.len()
    }
}

impl ByteSource for IndexSource {
    fn len(&self) -> u64 {
        self.file.len()
    }

    fn read_into(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        match offset.checked_add(buf.len() as u64) {
            Some(end) if end <= self.index.len() as u64 => {
                buf.copy_from_slice(slice_of(&self.index, offset, buf.len())?);
                Ok(())
            }
            _ => self.file.read_into(offset, buf),
        }
    }

    fn read_bytes(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        match offset.checked_add(len as u64) {
            Some(end) if end <= self.index.len() as u64 => {
                slice_of(&self.index, offset, len).map(Cow::Borrowed)
            }
            _ => {
                let mut buf = vec![0u8; len];
                self.file.read_into(offset, &mut buf)?;
                Ok(Cow::Owned(buf))
            }
        }
    }

    fn resident_bytes(&self) -> usize {
        self.index.len()
    }
}

/// Open `path` under `mode` and parse its trailer.
///
/// The file handle is released on every error path by drop.
pub fn load(path: &Path, mode: LoadMode) -> Result<(Box<dyn ByteSource>, DatHeader)> {
    let (file, len) = open_file(path)?;

    let source: Box<dyn ByteSource> = match mode {
        LoadMode::Filesystem => Box::new(FileSource::new(file, len)),
        LoadMode::Memory => Box::new(MemorySource::load(file, len)?),
        LoadMode::Mmap => {
            DatHeader::check_min_size(len)?;
            Box::new(MmapSource::map(&file)?)
        }
        LoadMode::Index => {
            // The trailer decides how much to cache
            let file = FileSource::new(file, len);
            let header = DatHeader::from_source(&file)?;
            let source = IndexSource::load(file, header.tree_size)?;
            return Ok((Box::new(source), header));
        }
    };

    let header = DatHeader::from_source(source.as_ref())?;
    Ok((source, header))
}
