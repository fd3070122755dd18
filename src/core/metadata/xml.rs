//! XML serialization of the metadata document
//!
//! Output is deterministic: equal documents produce equal bytes. Optional
//! fields that are absent are omitted rather than written empty.

use super::{PackageMetadataDocument, PhotoRecord};
use crate::domain::{PhotopackError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn xml_error<E: std::fmt::Display>(err: E) -> PhotopackError {
    PhotopackError::Metadata(format!("XML write failed: {err}"))
}

fn write_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)?;
    Ok(())
}

fn write_optional(writer: &mut XmlWriter, name: &str, text: Option<&str>) -> Result<()> {
    match text {
        Some(text) => write_element(writer, name, text),
        None => Ok(()),
    }
}

fn open(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_error)
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_error)
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Serializes the document as UTF-8 XML
///
/// # Examples
///
/// ```
/// use photopack::core::metadata::xml::to_xml;
/// use photopack::core::metadata::{CommonInfo, PackageMetadataDocument};
///
/// let doc = PackageMetadataDocument {
///     common: CommonInfo {
///         standard_version: "05".to_string(),
///         metadata_file: "PHOTO05.XML".to_string(),
///         photo_folder: "PIC".to_string(),
///         drawing_folder: None,
///         drawing_file_names: vec![],
///         software_name: "photopack".to_string(),
///         software_version: "0.4.0".to_string(),
///     },
///     photos: vec![],
/// };
/// let bytes = to_xml(&doc).unwrap();
/// assert!(String::from_utf8(bytes).unwrap().contains("<photodata DTD_version=\"05\">"));
/// ```
pub fn to_xml(doc: &PackageMetadataDocument) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_error)?;

    let mut root = BytesStart::new("photodata");
    root.push_attribute(("DTD_version", doc.common.standard_version.as_str()));
    writer.write_event(Event::Start(root)).map_err(xml_error)?;

    let common = &doc.common;
    open(&mut writer, "commonInfo")?;
    write_element(&mut writer, "standardVersion", &common.standard_version)?;
    write_element(&mut writer, "metadataFile", &common.metadata_file)?;
    write_element(&mut writer, "photoFolder", &common.photo_folder)?;
    write_optional(&mut writer, "drawingFolder", common.drawing_folder.as_deref())?;
    for name in &common.drawing_file_names {
        write_element(&mut writer, "drawingFileName", name)?;
    }
    open(&mut writer, "software")?;
    write_element(&mut writer, "name", &common.software_name)?;
    write_element(&mut writer, "version", &common.software_version)?;
    close(&mut writer, "software")?;
    close(&mut writer, "commonInfo")?;

    for record in &doc.photos {
        write_photo(&mut writer, record)?;
    }

    close(&mut writer, "photodata")?;
    Ok(writer.into_inner().into_inner())
}

fn write_photo(writer: &mut XmlWriter, record: &PhotoRecord) -> Result<()> {
    open(writer, "photoInfo")?;

    open(writer, "photoFile")?;
    write_element(writer, "sequence", &record.sequence.to_string())?;
    write_element(writer, "fileName", &record.file_name)?;
    close(writer, "photoFile")?;

    open(writer, "classification")?;
    write_element(writer, "majorCategory", &record.major_category)?;
    write_element(writer, "category", &record.category)?;
    write_optional(writer, "constructionType", record.construction_type.as_deref())?;
    write_optional(writer, "workType", record.work_type.as_deref())?;
    write_optional(writer, "detailType", record.detail_type.as_deref())?;
    write_element(writer, "title", &record.title)?;
    write_optional(writer, "shootingLocation", record.shooting_location.as_deref())?;
    write_optional(writer, "shootingDate", record.shooting_date.as_deref())?;
    write_element(writer, "representative", flag(record.is_representative))?;
    write_element(
        writer,
        "submissionFrequency",
        flag(record.is_submission_frequency_photo),
    )?;
    close(writer, "classification")?;

    write_optional(writer, "drawingFileName", record.linked_drawing.as_deref())?;

    if let Some(location) = &record.location {
        open(writer, "location")?;
        write_element(writer, "datum", &location.datum)?;
        write_element(writer, "latitude", &location.latitude.to_string())?;
        write_element(writer, "longitude", &location.longitude.to_string())?;
        close(writer, "location")?;
    }

    close(writer, "photoInfo")
}
