//! Package writing for 3MF files

use std::collections::BTreeSet;
use std::io::{Seek, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::{CONTENT_TYPES_PATH, MODEL_PATH, RELS_PATH};
use crate::error::{Error, Result};

const RELS_CONTENT_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";
const MODEL_CONTENT_TYPE: &str = "application/vnd.ms-package.3dmanufacturing-3dmodel+xml";
const XML_CONTENT_TYPE: &str = "text/xml";

/// Create a 3MF package (ZIP archive) from model data
///
/// The package contains:
/// - `[Content_Types].xml`
/// - `_rels/.rels`
/// - `3D/3dmodel.model`
/// - each of `extra_parts`, as `(path, bytes)`, in the given order
///
/// Every entry carries the same fixed timestamp, so identical input gives
/// identical archive bytes. Extensions of extra parts get a `text/xml`
/// default content type unless already declared.
///
/// # Errors
///
/// Archive failures are [`Error::Zip`]; failed writes into an entry are
/// [`Error::XmlWrite`].
///
/// # Returns
///
/// Returns the writer after finishing the ZIP archive
pub fn create_package<W: Write + Seek>(
    writer: W,
    model_xml: &str,
    extra_parts: &[(&str, &[u8])],
) -> Result<W> {
    let options = SimpleFileOptions::default().last_modified_time(zip::DateTime::default());
    let mut zip = ZipWriter::new(writer);

    let content_types = content_types_xml(extra_parts);
    zip.start_file(CONTENT_TYPES_PATH, options)?;
    zip.write_all(content_types.as_bytes())
        .map_err(|e| Error::xml_write(format!("Failed to write Content_Types: {}", e)))?;

    let rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/{}" Id="rel0" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#,
        MODEL_PATH
    );
    zip.start_file(RELS_PATH, options)?;
    zip.write_all(rels.as_bytes())
        .map_err(|e| Error::xml_write(format!("Failed to write relationships: {}", e)))?;

    zip.start_file(MODEL_PATH, options)?;
    zip.write_all(model_xml.as_bytes())
        .map_err(|e| Error::xml_write(format!("Failed to write model XML: {}", e)))?;

    for (path, data) in extra_parts {
        zip.start_file(*path, options)?;
        zip.write_all(data)
            .map_err(|e| Error::xml_write(format!("Failed to write {}: {}", path, e)))?;
    }

    Ok(zip.finish()?)
}

fn content_types_xml(extra_parts: &[(&str, &[u8])]) -> String {
    let extra_extensions: BTreeSet<&str> = extra_parts
        .iter()
        .filter_map(|(path, _)| path.rsplit_once('.').map(|(_, ext)| ext))
        .filter(|ext| !ext.contains('/') && *ext != "rels" && *ext != "model")
        .collect();

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
"#,
    );
    xml.push_str(&format!(
        "  <Default Extension=\"rels\" ContentType=\"{}\"/>\n",
        RELS_CONTENT_TYPE
    ));
    xml.push_str(&format!(
        "  <Default Extension=\"model\" ContentType=\"{}\"/>\n",
        MODEL_CONTENT_TYPE
    ));
    for ext in extra_extensions {
        xml.push_str(&format!(
            "  <Default Extension=\"{}\" ContentType=\"{}\"/>\n",
            ext, XML_CONTENT_TYPE
        ));
    }
    xml.push_str("</Types>");
    xml
}
