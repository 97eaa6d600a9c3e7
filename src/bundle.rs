//! Merging parts into one print job
//!
//! A [`Bundle`] owns the merged geometry document and one [`BundleEntry`] per
//! merged part. Each entry carries the part's object id, print settings and
//! regions, so the geometry document and the config sidecar are generated
//! from the same records and cannot drift apart.
//!
//! # Id spaces
//!
//! - **Object ids** number the mesh resources of the geometry document. They
//!   continue from the document's largest existing id, starting at 1.
//! - **Element ids** number triangles across the whole bundle, starting at 0
//!   and running contiguously through the parts in input order. Regions are
//!   inclusive element id ranges ([`IdPair`]) and the regions of one part
//!   partition that part's range exactly.

use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::config;
use crate::error::{Error, Result};
use crate::mesh_ops::{self, BoundingBox};
use crate::model::{BuildItem, ConfigDocument, IdPair, Model, Object};
use crate::opc;
use crate::part::{Part, PrintSettings};
use crate::profile::VendorProfile;
use crate::region::RunSequence;
use crate::writer;

/// A contiguous range of elements sharing one paint label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Element ids covered by the region
    pub ids: IdPair,
    /// Paint label of the run the region came from, `None` for a whole-part region
    pub label: Option<u32>,
    /// Volume name written to the config sidecar
    pub name: String,
}

/// One merged part: its object id, settings and regions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    /// Object id in the geometry document
    pub object_id: usize,
    /// Display name
    pub name: String,
    /// Print options
    pub settings: PrintSettings,
    /// Regions in run order
    pub regions: Vec<Region>,
}

impl BundleEntry {
    /// Id ranges of the regions, in order
    pub fn id_pairs(&self) -> Vec<IdPair> {
        self.regions.iter().map(|region| region.ids).collect()
    }
}

/// Split a part's element range into regions
///
/// Without runs the whole range `base..base + element_count` is one region.
/// With runs, each run becomes one range in run order.
///
/// # Errors
///
/// - [`Error::InvalidModel`] if `element_count` is zero
/// - [`Error::Partition`] if the run lengths do not sum to `element_count`
///
/// # Example
///
/// ```
/// use paint3mf::{IdPair, RunSequence, partition_ids};
///
/// let runs = RunSequence::from_pairs(&[(1, 100), (2, 150), (1, 50)]).unwrap();
/// let pairs = partition_ids(1000, 300, Some(&runs)).unwrap();
/// assert_eq!(
///     pairs,
///     vec![
///         IdPair::new(1000, 1099),
///         IdPair::new(1100, 1249),
///         IdPair::new(1250, 1299),
///     ]
/// );
/// ```
pub fn partition_ids(
    base: usize,
    element_count: usize,
    runs: Option<&RunSequence>,
) -> Result<Vec<IdPair>> {
    Ok(partition_runs("part", base, element_count, runs)?
        .into_iter()
        .map(|(ids, _)| ids)
        .collect())
}

fn partition_runs(
    part: &str,
    base: usize,
    element_count: usize,
    runs: Option<&RunSequence>,
) -> Result<Vec<(IdPair, Option<u32>)>> {
    if element_count == 0 {
        return Err(Error::InvalidModel(format!(
            "Part '{}' has no triangles to assign ids to",
            part
        )));
    }

    let Some(runs) = runs else {
        return Ok(vec![(IdPair::new(base, base + element_count - 1), None)]);
    };

    runs.validate_against(part, element_count)?;

    let mut next = base;
    Ok(runs
        .runs()
        .iter()
        .map(|run| {
            let ids = IdPair::new(next, next + run.length - 1);
            next += run.length;
            (ids, Some(run.label))
        })
        .collect())
}

/// The merge target for one conversion
#[derive(Debug, Clone)]
pub struct Bundle {
    model: Model,
    profile: VendorProfile,
    entries: Vec<BundleEntry>,
    next_element_id: usize,
}

impl Bundle {
    /// Create an empty bundle
    pub fn new(profile: VendorProfile) -> Self {
        Self::with_model(Model::new(), profile)
    }

    /// Create a bundle that appends to an existing geometry document
    ///
    /// New objects get ids above the document's largest id and new element
    /// ids start after the document's existing triangles.
    pub fn with_model(mut model: Model, profile: VendorProfile) -> Self {
        profile.apply_to(&mut model);
        let next_element_id = model.element_count();
        Self {
            model,
            profile,
            entries: Vec::new(),
            next_element_id,
        }
    }

    /// Merge all `parts`, in order, into a new bundle
    ///
    /// Either every part is merged or an error is returned and nothing is kept.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use paint3mf::{Bundle, Part, PartSource, VendorProfile};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let profile = VendorProfile::default();
    /// let parts = vec![
    ///     Part::load(&PartSource::new("base.stl", "base"), &profile)?,
    ///     Part::load(&PartSource::new("lid.stl", "lid").with_colors("lid.colors"), &profile)?,
    /// ];
    /// let bundle = Bundle::assemble(&parts, profile)?;
    /// bundle.write_to_file("job.3mf")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn assemble(parts: &[Part], profile: VendorProfile) -> Result<Self> {
        let mut bundle = Self::new(profile);
        for part in parts {
            bundle.add_part(part)?;
        }
        Ok(bundle)
    }

    /// Merge one part into the bundle
    ///
    /// The part's mesh is transformed and appended as a new object, and its
    /// element range is split into regions. Every check runs before anything
    /// is committed, so a failed call leaves the bundle unchanged.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidModel`] if the part's mesh is empty or the part was
    ///   loaded for a different vendor profile
    /// - [`Error::Partition`] if an annotation does not cover the mesh exactly
    pub fn add_part(&mut self, part: &Part) -> Result<&BundleEntry> {
        if part.profile() != &self.profile {
            return Err(Error::InvalidModel(format!(
                "Part '{}' was loaded for vendor profile '{}' but the bundle targets '{}'",
                part.name(),
                part.profile().namespace_prefix(),
                self.profile.namespace_prefix()
            )));
        }

        let element_count = part.element_count();
        if part.mesh().vertices.is_empty() || element_count == 0 {
            return Err(Error::InvalidModel(format!(
                "Part '{}' has an empty mesh",
                part.name()
            )));
        }

        // Both annotations must match the mesh even though only one defines regions
        for runs in [part.colors(), part.supports()].into_iter().flatten() {
            runs.validate_against(part.name(), element_count)?;
        }

        let base = self.next_element_id;
        let spans = partition_runs(part.name(), base, element_count, part.region_runs())?;
        let whole = spans.len() == 1;
        let regions: Vec<Region> = spans
            .into_iter()
            .enumerate()
            .map(|(index, (ids, label))| Region {
                ids,
                label,
                name: if whole {
                    part.name().to_string()
                } else {
                    format!("{}_{}", part.name(), index + 1)
                },
            })
            .collect();

        let object_id = self.next_object_id();
        let mut object = Object::new(object_id, mesh_ops::transform_mesh(part.mesh(), part.transform()));
        object.name = Some(part.name().to_string());
        self.model.resources.objects.push(object);
        self.model.build.items.push(BuildItem::new(object_id));

        self.next_element_id = base + element_count;

        info!(
            name = %part.name(),
            object_id,
            first_id = base,
            last_id = base + element_count - 1,
            regions = regions.len(),
            "Merged part"
        );
        if part.colors().is_some() && part.supports().is_some() {
            debug!(name = %part.name(), "Colors define regions; supports validated only");
        }

        let index = self.entries.len();
        self.entries.push(BundleEntry {
            object_id,
            name: part.name().to_string(),
            settings: part.settings().clone(),
            regions,
        });
        Ok(&self.entries[index])
    }

    /// The id the next merged object will get
    pub fn next_object_id(&self) -> usize {
        self.model.max_object_id().map_or(1, |id| id + 1)
    }

    /// The first element id the next merged part will get
    pub fn next_element_id(&self) -> usize {
        self.next_element_id
    }

    /// Merged entries, in part order
    pub fn entries(&self) -> &[BundleEntry] {
        &self.entries
    }

    /// The merged geometry document
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The vendor profile
    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    /// Object ids of the merged parts, in order
    pub fn object_ids(&self) -> Vec<usize> {
        self.entries.iter().map(|entry| entry.object_id).collect()
    }

    /// Region id ranges of each merged part, in order
    pub fn id_pairs(&self) -> Vec<Vec<IdPair>> {
        self.entries.iter().map(BundleEntry::id_pairs).collect()
    }

    /// Bounding box over all geometry in the document
    ///
    /// Merged vertices are already placed, so no transform is applied.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for object in &self.model.resources.objects {
            for vertex in &object.mesh.vertices {
                bbox.expand((vertex.x, vertex.y, vertex.z));
            }
        }
        bbox
    }

    /// Build the config sidecar for the merged parts
    pub fn config(&self) -> ConfigDocument {
        config::synthesize(self)
    }

    /// Write the bundle as a 3MF package
    ///
    /// The package holds the geometry document and the config sidecar at the
    /// profile's config path.
    pub fn to_writer<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let config = self.config();

        let mut model_xml = Vec::new();
        writer::write_model_xml(&self.model, &self.profile.root_attributes(), &mut model_xml)?;
        let model_xml = String::from_utf8(model_xml)
            .map_err(|e| Error::xml_write(format!("Failed to convert XML to UTF-8: {}", e)))?;

        let mut config_xml = Vec::new();
        writer::write_config_xml(&config, &mut config_xml)?;

        let writer = opc::create_package(
            writer,
            &model_xml,
            &[(self.profile.config_path(), config_xml.as_slice())],
        )?;

        info!(
            objects = config.objects.len(),
            volumes = config.volume_count(),
            "Wrote bundle package"
        );

        Ok(writer)
    }

    /// Write the bundle as a 3MF file
    ///
    /// The package is built in memory first; the file is only created once
    /// the whole package has been produced.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let package = self.to_writer(Cursor::new(Vec::new()))?.into_inner();
        fs::write(path, package).map_err(|e| Error::file_access(path, e))?;
        Ok(())
    }
}
