//! XML writing for the package documents
//!
//! [`write_model_xml`] serializes the geometry document (`3D/3dmodel.model`)
//! and [`write_config_xml`] the per-object config sidecar. Both write with
//! two-space indentation and produce identical bytes for identical input.

mod config;
mod core;

use crate::error::{Error, Result};
use crate::model::*;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write as IoWrite;

pub use config::write_config_xml;

/// Write a Model to XML format
///
/// The root `<model>` element carries `unit`, `xml:lang` and `xmlns`,
/// followed by `extra_root_attributes` in the given order. Vendor namespace
/// declarations belong there so they appear once, at the root.
pub fn write_model_xml<W: IoWrite>(
    model: &Model,
    extra_root_attributes: &[(String, String)],
    writer: W,
) -> Result<()> {
    let mut xml_writer = Writer::new_with_indent(writer, b' ', 2);

    write_declaration(&mut xml_writer)?;

    let mut model_elem = BytesStart::new("model");
    model_elem.push_attribute(("unit", model.unit.as_str()));
    model_elem.push_attribute(("xml:lang", model.language.as_str()));
    model_elem.push_attribute(("xmlns", model.xmlns.as_str()));
    for (name, value) in extra_root_attributes {
        model_elem.push_attribute((name.as_str(), value.as_str()));
    }

    xml_writer
        .write_event(Event::Start(model_elem))
        .map_err(|e| Error::xml_write(format!("Failed to write model element: {}", e)))?;

    for entry in &model.metadata {
        write_metadata(&mut xml_writer, entry)?;
    }

    write_resources(&mut xml_writer, &model.resources)?;

    core::write_build(&mut xml_writer, &model.build)?;

    xml_writer
        .write_event(Event::End(BytesEnd::new("model")))
        .map_err(|e| Error::xml_write(format!("Failed to close model element: {}", e)))?;

    Ok(())
}

fn write_declaration<W: IoWrite>(writer: &mut Writer<W>) -> Result<()> {
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| Error::xml_write(format!("Failed to write XML declaration: {}", e)))?;
    Ok(())
}

/// Write a metadata entry
fn write_metadata<W: IoWrite>(writer: &mut Writer<W>, entry: &MetadataEntry) -> Result<()> {
    let mut elem = BytesStart::new("metadata");
    elem.push_attribute(("name", entry.name.as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write metadata element: {}", e)))?;

    writer
        .write_event(Event::Text(BytesText::new(&entry.value)))
        .map_err(|e| Error::xml_write(format!("Failed to write metadata value: {}", e)))?;

    writer
        .write_event(Event::End(BytesEnd::new("metadata")))
        .map_err(|e| Error::xml_write(format!("Failed to close metadata element: {}", e)))?;

    Ok(())
}

/// Write resources section
fn write_resources<W: IoWrite>(writer: &mut Writer<W>, resources: &Resources) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new("resources")))
        .map_err(|e| Error::xml_write(format!("Failed to write resources element: {}", e)))?;

    for object in &resources.objects {
        core::write_object(writer, object)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("resources")))
        .map_err(|e| Error::xml_write(format!("Failed to close resources element: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slic3r_namespace() -> Vec<(String, String)> {
        vec![(
            "xmlns:slic3rpe".to_string(),
            "http://schemas.slic3r.org/3mf/2017/06".to_string(),
        )]
    }

    #[test]
    fn test_write_minimal_model() {
        let model = Model::new();

        let mut buffer = Vec::new();
        write_model_xml(&model, &[], &mut buffer).unwrap();

        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.contains("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<model"));
        assert!(xml.contains("unit=\"millimeter\""));
        assert!(xml.contains("xml:lang=\"en-US\""));
        assert!(xml.contains("<resources"));
        assert!(xml.contains("<build"));
    }

    #[test]
    fn test_extra_root_attributes_written_once() {
        let model = Model::new();

        let mut buffer = Vec::new();
        write_model_xml(&model, &slic3r_namespace(), &mut buffer).unwrap();

        let xml = String::from_utf8(buffer).unwrap();
        assert_eq!(xml.matches("xmlns:slic3rpe=").count(), 1);
        let root = xml.lines().find(|line| line.starts_with("<model")).unwrap();
        assert!(root.contains("xmlns:slic3rpe=\"http://schemas.slic3r.org/3mf/2017/06\""));
    }

    #[test]
    fn test_write_model_with_metadata() {
        let mut model = Model::new();
        model
            .metadata
            .push(MetadataEntry::new("slic3rpe:Version3mf", "1"));
        model.metadata.push(MetadataEntry::new("Title", "A & B"));

        let mut buffer = Vec::new();
        write_model_xml(&model, &slic3r_namespace(), &mut buffer).unwrap();

        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.contains("<metadata name=\"slic3rpe:Version3mf\">1</metadata>"));
        assert!(xml.contains("<metadata name=\"Title\">A &amp; B</metadata>"));
    }

    #[test]
    fn test_write_model_with_simple_mesh() {
        let mut model = Model::new();

        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(10.0, 0.0, 0.0));
        mesh.vertices.push(Vertex::new(5.0, 10.5, 0.0));
        mesh.triangles.push(Triangle::new(0, 1, 2));

        let mut object = Object::new(1, mesh);
        object.name = Some("bracket".to_string());

        model.resources.objects.push(object);
        model.build.items.push(BuildItem::new(1));

        let mut buffer = Vec::new();
        write_model_xml(&model, &[], &mut buffer).unwrap();

        let xml = String::from_utf8(buffer).unwrap();
        assert!(xml.contains("<object id=\"1\" type=\"model\" name=\"bracket\">"));
        assert!(xml.contains("<mesh>"));
        assert!(xml.contains("<vertex x=\"5\" y=\"10.5\" z=\"0\"/>"));
        assert!(xml.contains("v1=\"0\" v2=\"1\" v3=\"2\""));
        assert!(xml.contains("<item objectid=\"1\"/>"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut model = Model::new();
        let mut mesh = Mesh::new();
        mesh.vertices.push(Vertex::new(0.1, 0.2, 0.3));
        model.resources.objects.push(Object::new(4, mesh));

        let mut first = Vec::new();
        write_model_xml(&model, &slic3r_namespace(), &mut first).unwrap();
        let mut second = Vec::new();
        write_model_xml(&model, &slic3r_namespace(), &mut second).unwrap();
        assert_eq!(first, second);
    }
}
