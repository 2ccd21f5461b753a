//! Parsing of `ListVersionsResult` XML.
//!
//! The parsed listing is re-served to API clients as camelCase JSON. Owner
//! information is dropped.

use chrono::{DateTime, Utc};
use quick_xml::Reader;
use quick_xml::events::Event;
use serde::Serialize;

use crate::error::XmlError;

/// A page of object versions below a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVersionsResult {
    /// Bucket name.
    pub name: String,
    /// Prefix the listing was restricted to.
    pub prefix: String,
    /// Key marker the listing started after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_marker: Option<String>,
    /// Version marker the listing started after.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id_marker: Option<String>,
    /// Key marker for the next page, when truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_key_marker: Option<String>,
    /// Version marker for the next page, when truncated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version_id_marker: Option<String>,
    /// Page size limit the store applied.
    pub max_keys: u32,
    /// Whether more versions follow.
    pub is_truncated: bool,
    /// Object versions, in listing order.
    pub versions: Vec<ObjectVersion>,
    /// Delete markers, in listing order.
    pub delete_markers: Vec<DeleteMarker>,
}

/// One stored version of an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectVersion {
    /// Object key.
    pub key: String,
    /// Version identifier.
    pub version_id: String,
    /// Whether this is the current version.
    pub is_latest: bool,
    /// Upload time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    /// Entity tag, quotes included.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    /// Size in bytes.
    pub size: u64,
    /// Storage class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

/// A delete marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMarker {
    /// Object key.
    pub key: String,
    /// Version identifier of the marker.
    pub version_id: String,
    /// Whether the marker is the current version.
    pub is_latest: bool,
    /// Deletion time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Parse a `ListVersionsResult` document.
///
/// # Errors
///
/// Returns [`XmlError`] if the XML is malformed, the root element is not
/// `ListVersionsResult`, or a value fails to parse.
pub fn parse_list_versions(xml: &[u8]) -> Result<ListVersionsResult, XmlError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                let root = tag_name(name.as_ref())?;
                if root != "ListVersionsResult" {
                    return Err(XmlError::UnexpectedElement(root.to_owned()));
                }
                return read_list_versions(&mut reader);
            }
            Event::Empty(e) => {
                let name = e.local_name();
                let root = tag_name(name.as_ref())?;
                if root != "ListVersionsResult" {
                    return Err(XmlError::UnexpectedElement(root.to_owned()));
                }
                return Ok(ListVersionsResult::default());
            }
            Event::Eof => {
                return Err(XmlError::MissingElement("ListVersionsResult".to_owned()));
            }
            _ => {}
        }
    }
}

fn read_list_versions(reader: &mut Reader<&[u8]>) -> Result<ListVersionsResult, XmlError> {
    let mut result = ListVersionsResult::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                match tag_name(name.as_ref())? {
                    "Name" => result.name = read_text_content(reader)?,
                    "Prefix" => result.prefix = read_text_content(reader)?,
                    "KeyMarker" => result.key_marker = non_empty(read_text_content(reader)?),
                    "VersionIdMarker" => {
                        result.version_id_marker = non_empty(read_text_content(reader)?);
                    }
                    "NextKeyMarker" => {
                        result.next_key_marker = non_empty(read_text_content(reader)?);
                    }
                    "NextVersionIdMarker" => {
                        result.next_version_id_marker = non_empty(read_text_content(reader)?);
                    }
                    "MaxKeys" => result.max_keys = parse_number(&read_text_content(reader)?)?,
                    "IsTruncated" => result.is_truncated = parse_bool(&read_text_content(reader)?)?,
                    "Version" => result.versions.push(read_version(reader)?),
                    "DeleteMarker" => result.delete_markers.push(read_delete_marker(reader)?),
                    _ => skip_element(reader)?,
                }
            }
            Event::End(_) => return Ok(result),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF in ListVersionsResult".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

fn read_version(reader: &mut Reader<&[u8]>) -> Result<ObjectVersion, XmlError> {
    let mut version = ObjectVersion::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                match tag_name(name.as_ref())? {
                    "Key" => version.key = read_text_content(reader)?,
                    "VersionId" => version.version_id = read_text_content(reader)?,
                    "IsLatest" => version.is_latest = parse_bool(&read_text_content(reader)?)?,
                    "LastModified" => {
                        version.last_modified = Some(parse_timestamp(&read_text_content(reader)?)?);
                    }
                    "ETag" => version.etag = non_empty(read_text_content(reader)?),
                    "Size" => version.size = parse_number(&read_text_content(reader)?)?,
                    "StorageClass" => version.storage_class = non_empty(read_text_content(reader)?),
                    _ => skip_element(reader)?,
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF in Version".to_owned(),
                ));
            }
            _ => {}
        }
    }

    if version.key.is_empty() {
        return Err(XmlError::MissingElement("Version/Key".to_owned()));
    }
    Ok(version)
}

fn read_delete_marker(reader: &mut Reader<&[u8]>) -> Result<DeleteMarker, XmlError> {
    let mut marker = DeleteMarker::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name();
                match tag_name(name.as_ref())? {
                    "Key" => marker.key = read_text_content(reader)?,
                    "VersionId" => marker.version_id = read_text_content(reader)?,
                    "IsLatest" => marker.is_latest = parse_bool(&read_text_content(reader)?)?,
                    "LastModified" => {
                        marker.last_modified = Some(parse_timestamp(&read_text_content(reader)?)?);
                    }
                    _ => skip_element(reader)?,
                }
            }
            Event::End(_) => break,
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF in DeleteMarker".to_owned(),
                ));
            }
            _ => {}
        }
    }

    if marker.key.is_empty() {
        return Err(XmlError::MissingElement("DeleteMarker/Key".to_owned()));
    }
    Ok(marker)
}

fn tag_name(name: &[u8]) -> Result<&str, XmlError> {
    std::str::from_utf8(name).map_err(|e| XmlError::ParseError(e.to_string()))
}

/// Read the text content of the current element and consume its end tag.
///
/// Entity and character references arrive as separate events and are
/// resolved in place.
fn read_text_content(reader: &mut Reader<&[u8]>) -> Result<String, XmlError> {
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => {
                let decoded = e
                    .decode()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?;
                text.push_str(&decoded);
            }
            Event::GeneralRef(e) => {
                if let Some(ch) = e
                    .resolve_char_ref()
                    .map_err(|err| XmlError::ParseError(err.to_string()))?
                {
                    text.push(ch);
                } else {
                    let entity = e
                        .decode()
                        .map_err(|err| XmlError::ParseError(err.to_string()))?;
                    let resolved = quick_xml::escape::resolve_predefined_entity(&entity)
                        .ok_or_else(|| XmlError::ParseError(format!("unknown entity &{entity};")))?;
                    text.push_str(resolved);
                }
            }
            Event::End(_) => return Ok(text),
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while reading text content".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

/// Skip over an element and all its children.
fn skip_element(reader: &mut Reader<&[u8]>) -> Result<(), XmlError> {
    let mut depth: u32 = 1;
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Event::Eof => {
                return Err(XmlError::UnexpectedElement(
                    "unexpected EOF while skipping element".to_owned(),
                ));
            }
            _ => {}
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn parse_bool(s: &str) -> Result<bool, XmlError> {
    match s.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(XmlError::ParseError(format!("invalid boolean: {other}"))),
    }
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, XmlError>
where
    T::Err: std::fmt::Display,
{
    s.trim()
        .parse::<T>()
        .map_err(|e| XmlError::ParseError(format!("invalid number '{s}': {e}")))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, XmlError> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ").map(|ndt| ndt.and_utc())
        })
        .map_err(|e| XmlError::ParseError(format!("invalid timestamp '{s}': {e}")))
}
