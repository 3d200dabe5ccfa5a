//! Decoded lookup results
//!
//! Records are built fresh for every lookup and never cached. Text fields
//! pass through [`crate::charset::normalize`] on the way out.
//!
//! City layout at `tree_size + leaf_offset`:
//!
//! ```text
//! country index (1) | region\0 | city\0 | postal\0 | lat (3 LE) | lon (3 LE) | [metro*1000+area (3 LE)]
//! ```
//!
//! The trailing metro/area combo exists only in City rev1 files and only for
//! United States records. Name editions store a single NUL-terminated string.

use crate::charset;
use crate::countries::{self, US_INDEX};
use crate::dat::format::read_u24_le;
use crate::dat::types::{FULL_RECORD_LENGTH, MAX_ORG_RECORD_LENGTH};
use crate::dat::{DatHeader, DatabaseKind, LookupResult};
use crate::error::{GeoIpError, Result};
use crate::regions;
use crate::storage::ByteSource;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Coordinates are stored as `(degrees + 180) * 10000`
const COORD_SCALE: f64 = 10000.0;
const COORD_BIAS: f64 = 180.0;

/// A City edition record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRecord {
    /// Two-letter country code
    pub country_code: String,
    /// Three-letter country code
    pub country_code3: String,
    /// Country name
    pub country_name: String,
    /// Two-letter continent code
    pub continent_code: String,
    /// Region code (state/province abbreviation or FIPS code)
    #[serde(rename = "region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Region name, when the code maps to a known region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    /// City name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Metro (DMA) code, US records in rev1 files only
    #[serde(rename = "dma_code", skip_serializing_if = "Option::is_none")]
    pub metro_code: Option<u32>,
    /// Telephone area code, US records in rev1 files only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_code: Option<u32>,
    /// Address bits shared by the whole leaf
    #[serde(skip)]
    pub prefix_len: u8,
}

impl LocationRecord {
    /// Field map keyed like the serialized form; absent optionals are omitted
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("country_code".into(), json!(self.country_code));
        map.insert("country_code3".into(), json!(self.country_code3));
        map.insert("country_name".into(), json!(self.country_name));
        map.insert("continent_code".into(), json!(self.continent_code));
        let optional = [
            ("region", self.region.as_deref()),
            ("region_name", self.region_name.as_deref()),
            ("city", self.city.as_deref()),
            ("postal_code", self.postal_code.as_deref()),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                map.insert(key.into(), json!(v));
            }
        }
        map.insert("latitude".into(), json!(self.latitude));
        map.insert("longitude".into(), json!(self.longitude));
        if let Some(code) = self.metro_code {
            map.insert("dma_code".into(), json!(code));
        }
        if let Some(code) = self.area_code {
            map.insert("area_code".into(), json!(code));
        }
        Value::Object(map)
    }
}

/// A record from a name edition (Organization, ISP, Domain)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationRecord {
    /// Organization, ISP or domain name
    pub name: String,
    /// Address bits shared by the whole leaf
    #[serde(skip)]
    pub prefix_len: u8,
}

/// Result of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// City edition record
    City(LocationRecord),
    /// Organization edition record
    Organization(OrganizationRecord),
    /// ISP edition record
    Isp(OrganizationRecord),
    /// Domain edition record
    Domain(OrganizationRecord),
    /// The address falls in an unassigned range
    NotFound,
}

impl Record {
    /// False for `NotFound`
    pub fn is_found(&self) -> bool {
        !matches!(self, Record::NotFound)
    }

    /// The City record, if this is one
    pub fn as_city(&self) -> Option<&LocationRecord> {
        match self {
            Record::City(r) => Some(r),
            _ => None,
        }
    }

    /// The name record of any name edition
    pub fn as_name(&self) -> Option<&OrganizationRecord> {
        match self {
            Record::Organization(r) | Record::Isp(r) | Record::Domain(r) => Some(r),
            _ => None,
        }
    }

    /// Leaf prefix length, zero for `NotFound`
    pub fn prefix_len(&self) -> u8 {
        match self {
            Record::City(r) => r.prefix_len,
            Record::Organization(r) | Record::Isp(r) | Record::Domain(r) => r.prefix_len,
            Record::NotFound => 0,
        }
    }

    /// Hash-style view: City fields by name, `{"name"}`, `{"isp"}` or
    /// `{"domain"}` for name editions, `null` when not found.
    pub fn to_json(&self) -> Value {
        match self {
            Record::City(r) => r.to_json(),
            Record::Organization(r) => json!({ "name": r.name }),
            Record::Isp(r) => json!({ "isp": r.name }),
            Record::Domain(r) => json!({ "domain": r.name }),
            Record::NotFound => Value::Null,
        }
    }
}

/// Decode the record a traversal landed on
pub fn decode<S: ByteSource + ?Sized>(
    source: &S,
    header: &DatHeader,
    leaf: LookupResult,
) -> Result<Record> {
    if leaf.is_unassigned() {
        return Ok(Record::NotFound);
    }

    match header.kind {
        kind if kind.is_city() => decode_city(source, header, leaf).map(Record::City),
        kind if kind.is_name() => {
            let record = decode_name(source, header, leaf)?;
            Ok(match kind {
                DatabaseKind::Isp => Record::Isp(record),
                DatabaseKind::Domain => Record::Domain(record),
                _ => Record::Organization(record),
            })
        }
        other => Err(GeoIpError::Unsupported(other)),
    }
}

/// Decode a City record
pub fn decode_city<S: ByteSource + ?Sized>(
    source: &S,
    header: &DatHeader,
    leaf: LookupResult,
) -> Result<LocationRecord> {
    let position = header.record_position(leaf.leaf_offset);
    let buf = source.read_up_to(position, FULL_RECORD_LENGTH)?;
    let mut cursor = FieldCursor::new(&buf, position);

    let country_index = cursor.byte("country")?;
    let country = countries::by_index(country_index);

    let region = cursor.text("region")?;
    let city = cursor.text("city")?;
    let postal_code = cursor.text("postal code")?;

    let latitude = cursor.u24("latitude")? as f64 / COORD_SCALE - COORD_BIAS;
    let longitude = cursor.u24("longitude")? as f64 / COORD_SCALE - COORD_BIAS;

    let (metro_code, area_code) =
        if header.kind == DatabaseKind::CityRev1 && country_index == US_INDEX {
            let combo = cursor.u24("metro/area code")?;
            (Some(combo / 1000), Some(combo % 1000))
        } else {
            (None, None)
        };

    let region_name = region
        .as_deref()
        .and_then(|code| regions::region_name(country.code, code))
        .map(str::to_string);

    Ok(LocationRecord {
        country_code: country.code.to_string(),
        country_code3: country.code3.to_string(),
        country_name: country.name.to_string(),
        continent_code: country.continent.to_string(),
        region,
        region_name,
        city,
        postal_code,
        latitude,
        longitude,
        metro_code,
        area_code,
        prefix_len: leaf.prefix_len,
    })
}

/// Decode a single NUL-terminated name record
pub fn decode_name<S: ByteSource + ?Sized>(
    source: &S,
    header: &DatHeader,
    leaf: LookupResult,
) -> Result<OrganizationRecord> {
    let position = header.record_position(leaf.leaf_offset);
    let buf = source.read_up_to(position, MAX_ORG_RECORD_LENGTH)?;
    let mut cursor = FieldCursor::new(&buf, position);
    let name = cursor.text("name")?.unwrap_or_default();

    Ok(OrganizationRecord {
        name,
        prefix_len: leaf.prefix_len,
    })
}

/// Sequential reader over one record's bytes
struct FieldCursor<'a> {
    buf: &'a [u8],
    pos: usize,
    /// File position of `buf[0]`, for error messages
    base: u64,
}

impl<'a> FieldCursor<'a> {
    fn new(buf: &'a [u8], base: u64) -> Self {
        Self { buf, pos: 0, base }
    }

    fn truncated(&self, field: &str) -> GeoIpError {
        GeoIpError::structural(format!(
            "record at offset {} is truncated in its {} field",
            self.base, field
        ))
    }

    fn byte(&mut self, field: &str) -> Result<u8> {
        let b = *self.buf.get(self.pos).ok_or_else(|| self.truncated(field))?;
        self.pos += 1;
        Ok(b)
    }

    fn u24(&mut self, field: &str) -> Result<u32> {
        let bytes = self
            .buf
            .get(self.pos..self.pos + 3)
            .ok_or_else(|| self.truncated(field))?;
        self.pos += 3;
        Ok(read_u24_le(bytes))
    }

    /// NUL-terminated text; an empty string reads as `None`
    fn text(&mut self, field: &str) -> Result<Option<String>> {
        let rest = self.buf.get(self.pos..).unwrap_or_default();
        let len = memchr::memchr(0, rest).ok_or_else(|| {
            GeoIpError::structural(format!(
                "unterminated {} field in record at offset {}",
                field, self.base
            ))
        })?;
        self.pos += len + 1;

        if len == 0 {
            return Ok(None);
        }
        Ok(Some(charset::normalize_owned(&rest[..len])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dat::RecordLength;
    use crate::storage::MemorySource;

    fn header(kind: DatabaseKind, file_size: u64) -> DatHeader {
        DatHeader {
            kind,
            segments: 1,
            record_length: kind.record_length(),
            tree_size: kind.record_length().node_bytes() as u64,
            file_size,
            has_trailer: true,
        }
    }

    fn coord(deg: f64) -> [u8; 3] {
        let raw = ((deg + 180.0) * 10000.0).round() as u32;
        let b = raw.to_le_bytes();
        [b[0], b[1], b[2]]
    }

    /// Tree placeholder, a one-byte pad so the record sits at leaf offset 1,
    /// then the record itself
    fn file_with_record(kind: DatabaseKind, record: &[u8]) -> (MemorySource, DatHeader) {
        let node = kind.record_length().node_bytes();
        let mut data = vec![0u8; node + 1];
        data.extend_from_slice(record);
        let h = header(kind, data.len() as u64);
        (MemorySource::from_vec(data), h)
    }

    fn leaf(offset: u32) -> LookupResult {
        LookupResult {
            leaf_offset: offset,
            prefix_len: 24,
        }
    }

    fn city_bytes(country: u8, region: &[u8], city: &[u8], postal: &[u8]) -> Vec<u8> {
        let mut rec = vec![country];
        for field in [region, city, postal] {
            rec.extend_from_slice(field);
            rec.push(0);
        }
        rec.extend_from_slice(&coord(42.4278));
        rec.extend_from_slice(&coord(-76.4982));
        rec
    }

    #[test]
    fn test_city_rev1_us_record() {
        let mut rec = city_bytes(US_INDEX, b"NY", b"Ithaca", b"14850");
        rec.extend_from_slice(&(555u32 * 1000 + 607).to_le_bytes()[..3]);
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &rec);

        let r = decode_city(&source, &h, leaf(1)).unwrap();
        assert_eq!(r.country_code, "US");
        assert_eq!(r.country_code3, "USA");
        assert_eq!(r.country_name, "United States");
        assert_eq!(r.continent_code, "NA");
        assert_eq!(r.region.as_deref(), Some("NY"));
        assert_eq!(r.region_name.as_deref(), Some("New York"));
        assert_eq!(r.city.as_deref(), Some("Ithaca"));
        assert_eq!(r.postal_code.as_deref(), Some("14850"));
        assert!((r.latitude - 42.4278).abs() < 1e-4);
        assert!((r.longitude + 76.4982).abs() < 1e-4);
        assert_eq!(r.metro_code, Some(555));
        assert_eq!(r.area_code, Some(607));
        assert_eq!(r.prefix_len, 24);
    }

    #[test]
    fn test_city_rev0_has_no_metro() {
        let rec = city_bytes(US_INDEX, b"NY", b"Ithaca", b"");
        let (source, h) = file_with_record(DatabaseKind::CityRev0, &rec);

        let r = decode_city(&source, &h, leaf(1)).unwrap();
        assert_eq!(r.metro_code, None);
        assert_eq!(r.area_code, None);
        assert_eq!(r.postal_code, None);
    }

    #[test]
    fn test_unknown_region_has_no_name() {
        let hk = countries::index_of("HK").unwrap();
        let rec = city_bytes(hk, b"00", b"Central District", b"");
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &rec);

        let r = decode_city(&source, &h, leaf(1)).unwrap();
        assert_eq!(r.region.as_deref(), Some("00"));
        assert_eq!(r.region_name, None);
        assert_eq!(r.metro_code, None);
    }

    #[test]
    fn test_latin1_city_keeps_field_boundaries() {
        let br = countries::index_of("BR").unwrap();
        let rec = city_bytes(br, b"27", b"Jundia\xED", b"13200");
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &rec);

        let r = decode_city(&source, &h, leaf(1)).unwrap();
        assert_eq!(r.city.as_deref(), Some("Jundiaí"));
        assert_eq!(r.postal_code.as_deref(), Some("13200"));
        assert!((r.latitude - 42.4278).abs() < 1e-4);
    }

    #[test]
    fn test_truncated_coordinates() {
        let rec = vec![US_INDEX, b'N', b'Y', 0, 0, 0, 0x01, 0x02];
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &rec);
        let err = decode_city(&source, &h, leaf(1)).unwrap_err();
        assert!(err.is_structural());
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn test_unterminated_city() {
        let rec = vec![US_INDEX, b'N', b'Y', 0, b'X', b'Y'];
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &rec);
        assert!(decode_city(&source, &h, leaf(1)).unwrap_err().is_structural());
    }

    #[test]
    fn test_record_past_eof() {
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &[]);
        assert!(decode_city(&source, &h, leaf(1)).unwrap_err().is_structural());
    }

    #[test]
    fn test_name_record() {
        let (source, h) = file_with_record(DatabaseKind::Organization, b"Road Runner\0junk");
        assert_eq!(h.record_length, RecordLength::Org);
        let r = decode_name(&source, &h, leaf(1)).unwrap();
        assert_eq!(r.name, "Road Runner");
    }

    #[test]
    fn test_unterminated_name() {
        let (source, h) = file_with_record(DatabaseKind::Organization, b"Road Runner");
        assert!(decode_name(&source, &h, leaf(1)).unwrap_err().is_structural());
    }

    #[test]
    fn test_decode_dispatch() {
        let (source, h) = file_with_record(DatabaseKind::Isp, b"Example ISP\0");
        let r = decode(&source, &h, leaf(1)).unwrap();
        assert_eq!(r, Record::Isp(OrganizationRecord { name: "Example ISP".into(), prefix_len: 24 }));
        assert_eq!(r.to_json(), json!({ "isp": "Example ISP" }));

        let r = decode(&source, &h, leaf(0)).unwrap();
        assert_eq!(r, Record::NotFound);
        assert_eq!(r.to_json(), Value::Null);

        let h = header(DatabaseKind::Country, source.len());
        assert!(matches!(
            decode(&source, &h, leaf(1)),
            Err(GeoIpError::Unsupported(DatabaseKind::Country))
        ));
    }

    #[test]
    fn test_city_json_shape() {
        let mut rec = city_bytes(US_INDEX, b"NY", b"Ithaca", b"");
        rec.extend_from_slice(&(555u32 * 1000 + 607).to_le_bytes()[..3]);
        let (source, h) = file_with_record(DatabaseKind::CityRev1, &rec);
        let value = decode(&source, &h, leaf(1)).unwrap().to_json();

        assert_eq!(value["city"], "Ithaca");
        assert_eq!(value["region"], "NY");
        assert_eq!(value["dma_code"], 555);
        assert_eq!(value["area_code"], 607);
        assert!(value.get("postal_code").is_none());
        assert!(value.get("prefix_len").is_none());
    }

    #[test]
    fn test_found_city_is_never_null() {
        // Country index 0 with every string field empty
        let rec = city_bytes(0, b"", b"", b"");
        let (source, h) = file_with_record(DatabaseKind::CityRev0, &rec);
        let record = decode(&source, &h, leaf(1)).unwrap();
        assert!(record.is_found());

        let value = record.to_json();
        assert!(value.is_object());
        assert_eq!(value, serde_json::to_value(record.as_city().unwrap()).unwrap());
        assert!(value.get("city").is_none());
        assert!(value.get("dma_code").is_none());

        let odd = LocationRecord {
            latitude: f64::NAN,
            longitude: f64::INFINITY,
            ..record.as_city().unwrap().clone()
        };
        let value = Record::City(odd).to_json();
        assert!(value.is_object());
        assert_eq!(value["latitude"], Value::Null);
        assert!(value.get("country_code").is_some());
    }
}
