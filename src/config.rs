//! Config sidecar synthesis
//!
//! Builds the [`ConfigDocument`] that tells the slicer which extruder and
//! wipe options apply to each merged object, and which element id ranges
//! make up its volumes.
//!
//! [`synthesize`] reads the per-part records of a [`Bundle`] and cannot fail.
//! [`synthesize_columns`] accepts the same information as parallel columns
//! and checks every column length before building anything.

use tracing::{debug, info};

use crate::bundle::Bundle;
use crate::error::{Error, Result};
use crate::model::{
    ConfigDocument, ConfigMetadata, ConfigObject, ConfigVolume, IDENTITY_MATRIX, IdPair,
    VOLUME_TYPE_MODEL_PART,
};
use crate::part::PrintSettings;

/// Every object is placed exactly once
const INSTANCES_COUNT: usize = 1;

/// Settings supplied as parallel columns
///
/// `extruders`, `wipe_into_infill`, `wipe_into_model` and `object_names`
/// have one entry per object. `names` has one entry per volume, flattened
/// across objects in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsColumns {
    /// Extruder per object
    pub extruders: Vec<String>,
    /// Wipe-into-infill flag per object
    pub wipe_into_infill: Vec<bool>,
    /// Wipe-into-model flag per object
    pub wipe_into_model: Vec<bool>,
    /// Display name per object
    pub object_names: Vec<String>,
    /// Display name per volume
    pub names: Vec<String>,
}

/// Build the config document for a bundle
///
/// One config object per merged part, in merge order, with one volume per
/// region.
pub fn synthesize(bundle: &Bundle) -> ConfigDocument {
    let objects = bundle
        .entries()
        .iter()
        .map(|entry| {
            config_object(
                entry.object_id,
                &entry.name,
                &entry.settings,
                entry
                    .regions
                    .iter()
                    .map(|region| (region.ids, region.name.as_str())),
            )
        })
        .collect();

    let config = ConfigDocument { objects };
    info!(
        objects = config.objects.len(),
        volumes = config.volume_count(),
        "Synthesized config"
    );
    config
}

/// Build the config document from parallel columns
///
/// `object_ids` and `id_pairs` have one entry per object, and each object's
/// id pair list gives its volumes in order.
///
/// # Errors
///
/// Returns [`Error::Validation`] if any column is shorter or longer than
/// the number of objects or volumes it describes, or if an object has no
/// volumes. Nothing is built in that case.
///
/// # Example
///
/// ```
/// use paint3mf::{IdPair, SettingsColumns, synthesize_columns};
///
/// let columns = SettingsColumns {
///     extruders: vec!["1".to_string()],
///     wipe_into_infill: vec![false],
///     wipe_into_model: vec![true],
///     object_names: vec!["cube".to_string()],
///     names: vec!["cube".to_string()],
/// };
/// let config = synthesize_columns(&[1], &[vec![IdPair::new(0, 11)]], &columns).unwrap();
/// assert_eq!(config.objects[0].get("wipe_into_objects"), Some("1"));
/// ```
pub fn synthesize_columns(
    object_ids: &[usize],
    id_pairs: &[Vec<IdPair>],
    columns: &SettingsColumns,
) -> Result<ConfigDocument> {
    let object_count = object_ids.len();
    check_length("id_pairs", object_count, id_pairs.len())?;
    check_length("extruders", object_count, columns.extruders.len())?;
    check_length("wipe_into_infill", object_count, columns.wipe_into_infill.len())?;
    check_length("wipe_into_model", object_count, columns.wipe_into_model.len())?;
    check_length("object_names", object_count, columns.object_names.len())?;

    if let Some(index) = id_pairs.iter().position(Vec::is_empty) {
        return Err(Error::Validation(format!(
            "Object {} has no volumes",
            object_ids[index]
        )));
    }

    let volume_count: usize = id_pairs.iter().map(Vec::len).sum();
    check_length("names", volume_count, columns.names.len())?;

    debug!(objects = object_count, volumes = volume_count, "Config columns validated");

    let mut names = columns.names.iter();
    let objects = object_ids
        .iter()
        .zip(id_pairs)
        .enumerate()
        .map(|(index, (&object_id, pairs))| {
            let settings = PrintSettings {
                extruder: columns.extruders[index].clone(),
                wipe_into_infill: columns.wipe_into_infill[index],
                wipe_into_model: columns.wipe_into_model[index],
            };
            let volumes = pairs.iter().copied().zip(names.by_ref().map(String::as_str));
            config_object(object_id, &columns.object_names[index], &settings, volumes)
        })
        .collect();

    let config = ConfigDocument { objects };
    info!(
        objects = config.objects.len(),
        volumes = config.volume_count(),
        "Synthesized config"
    );
    Ok(config)
}

fn check_length(column: &str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::length_mismatch(column, expected, actual))
    }
}

fn config_object<'a>(
    object_id: usize,
    name: &str,
    settings: &PrintSettings,
    volumes: impl Iterator<Item = (IdPair, &'a str)>,
) -> ConfigObject {
    ConfigObject {
        id: object_id,
        instances_count: INSTANCES_COUNT,
        metadata: vec![
            ConfigMetadata::object("name", name),
            ConfigMetadata::object("extruder", settings.extruder.as_str()),
            ConfigMetadata::object("wipe_into_infill", flag(settings.wipe_into_infill)),
            ConfigMetadata::object("wipe_into_objects", flag(settings.wipe_into_model)),
        ],
        volumes: volumes
            .enumerate()
            .map(|(index, (ids, volume_name))| ConfigVolume {
                ids,
                metadata: vec![
                    ConfigMetadata::volume("name", volume_name),
                    ConfigMetadata::volume("volume_type", VOLUME_TYPE_MODEL_PART),
                    // vertices are placed at merge time
                    ConfigMetadata::volume("matrix", IDENTITY_MATRIX),
                    ConfigMetadata::volume("source_object_id", index.to_string()),
                    ConfigMetadata::volume("source_volume_id", "0"),
                ],
            })
            .collect(),
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
