//! Config sidecar writing

use crate::error::{Error, Result};
use crate::model::{ConfigDocument, ConfigMetadata, ConfigObject, ConfigVolume};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::io::Write as IoWrite;

/// Write a config document to XML
///
/// Produces `<config>` with one `<object id=".." instances_count="..">` per
/// config object, its `<metadata type=".." key=".." value=".."/>` entries,
/// then one `<volume firstid=".." lastid="..">` per volume.
pub fn write_config_xml<W: IoWrite>(config: &ConfigDocument, writer: W) -> Result<()> {
    let mut xml_writer = Writer::new_with_indent(writer, b' ', 1);

    super::write_declaration(&mut xml_writer)?;

    xml_writer
        .write_event(Event::Start(BytesStart::new("config")))
        .map_err(|e| Error::xml_write(format!("Failed to write config element: {}", e)))?;

    for object in &config.objects {
        write_config_object(&mut xml_writer, object)?;
    }

    xml_writer
        .write_event(Event::End(BytesEnd::new("config")))
        .map_err(|e| Error::xml_write(format!("Failed to close config element: {}", e)))?;

    Ok(())
}

fn write_config_object<W: IoWrite>(writer: &mut Writer<W>, object: &ConfigObject) -> Result<()> {
    let mut elem = BytesStart::new("object");
    elem.push_attribute(("id", object.id.to_string().as_str()));
    elem.push_attribute(("instances_count", object.instances_count.to_string().as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write config object: {}", e)))?;

    for meta in &object.metadata {
        write_config_metadata(writer, meta)?;
    }

    for volume in &object.volumes {
        write_config_volume(writer, volume)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("object")))
        .map_err(|e| Error::xml_write(format!("Failed to close config object: {}", e)))?;

    Ok(())
}

fn write_config_volume<W: IoWrite>(writer: &mut Writer<W>, volume: &ConfigVolume) -> Result<()> {
    let mut elem = BytesStart::new("volume");
    elem.push_attribute(("firstid", volume.ids.first_id.to_string().as_str()));
    elem.push_attribute(("lastid", volume.ids.last_id.to_string().as_str()));

    writer
        .write_event(Event::Start(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write volume element: {}", e)))?;

    for meta in &volume.metadata {
        write_config_metadata(writer, meta)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("volume")))
        .map_err(|e| Error::xml_write(format!("Failed to close volume element: {}", e)))?;

    Ok(())
}

fn write_config_metadata<W: IoWrite>(writer: &mut Writer<W>, meta: &ConfigMetadata) -> Result<()> {
    let mut elem = BytesStart::new("metadata");
    elem.push_attribute(("type", meta.scope.as_str()));
    elem.push_attribute(("key", meta.key.as_str()));
    elem.push_attribute(("value", meta.value.as_str()));

    writer
        .write_event(Event::Empty(elem))
        .map_err(|e| Error::xml_write(format!("Failed to write config metadata: {}", e)))?;

    Ok(())
}
