//! Source parts: one painted mesh with its placement and print options
//!
//! A [`Part`] is built either by [`Part::load`] from a [`PartSource`] record
//! (mesh file, transform text, optional annotation files) or directly from an
//! in-memory mesh with [`Part::new`]. Loading is all-or-nothing: any failure
//! returns an error and no partially populated part.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::import;
use crate::mesh_ops::{self, BoundingBox};
use crate::model::Mesh;
use crate::profile::VendorProfile;
use crate::region::{self, RegionCodec, RunSequence, ZlibRunCodec};
use crate::transform::Transform4;

/// Print options applied to a whole part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintSettings {
    /// Extruder number, 1-indexed, as text
    pub extruder: String,
    /// Purge into this part's infill when changing filament
    pub wipe_into_infill: bool,
    /// Purge into this part itself when changing filament
    pub wipe_into_model: bool,
}

impl PrintSettings {
    /// Settings for an extruder with wiping disabled
    pub fn new(extruder: impl Into<String>) -> Self {
        Self {
            extruder: extruder.into(),
            wipe_into_infill: false,
            wipe_into_model: false,
        }
    }
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self::new("1")
    }
}

/// Everything needed to load one part
#[derive(Debug, Clone, PartialEq)]
pub struct PartSource {
    /// STL file holding the mesh
    pub mesh_path: PathBuf,
    /// Placement transform, 16 numbers in row-major order
    pub transform: String,
    /// Optional color annotation file
    pub colors_path: Option<PathBuf>,
    /// Optional support annotation file
    pub supports_path: Option<PathBuf>,
    /// Display name
    pub name: String,
    /// Print options
    pub settings: PrintSettings,
}

impl PartSource {
    /// A source with identity placement, no annotations and default settings
    pub fn new(mesh_path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            mesh_path: mesh_path.into(),
            transform: Transform4::identity().serialize(),
            colors_path: None,
            supports_path: None,
            name: name.into(),
            settings: PrintSettings::default(),
        }
    }

    /// Set the placement transform text
    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = transform.into();
        self
    }

    /// Set the color annotation file
    pub fn with_colors(mut self, path: impl Into<PathBuf>) -> Self {
        self.colors_path = Some(path.into());
        self
    }

    /// Set the support annotation file
    pub fn with_supports(mut self, path: impl Into<PathBuf>) -> Self {
        self.supports_path = Some(path.into());
        self
    }

    /// Set the extruder
    pub fn with_extruder(mut self, extruder: impl Into<String>) -> Self {
        self.settings.extruder = extruder.into();
        self
    }

    /// Set the wipe-into-infill flag
    pub fn with_wipe_into_infill(mut self, wipe: bool) -> Self {
        self.settings.wipe_into_infill = wipe;
        self
    }

    /// Set the wipe-into-model flag
    pub fn with_wipe_into_model(mut self, wipe: bool) -> Self {
        self.settings.wipe_into_model = wipe;
        self
    }
}

/// One loaded input part
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    name: String,
    mesh: Mesh,
    transform: Transform4,
    colors: Option<RunSequence>,
    supports: Option<RunSequence>,
    settings: PrintSettings,
    profile: VendorProfile,
}

impl Part {
    /// Load a part using the default region codec
    ///
    /// # Errors
    ///
    /// - [`Error::FileAccess`](crate::Error::FileAccess) if a file cannot be read
    /// - [`Error::Decode`](crate::Error::Decode) for malformed mesh, transform or annotation data
    ///
    /// # Example
    ///
    /// ```no_run
    /// use paint3mf::{Part, PartSource, VendorProfile};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let source = PartSource::new("body.stl", "body")
    ///     .with_transform("1 0 0 20 0 1 0 0 0 0 1 0 0 0 0 1")
    ///     .with_colors("body.colors")
    ///     .with_extruder("2");
    /// let part = Part::load(&source, &VendorProfile::default())?;
    /// println!("{} triangles", part.element_count());
    /// # Ok(())
    /// # }
    /// ```
    pub fn load(source: &PartSource, profile: &VendorProfile) -> Result<Self> {
        Self::load_with_codec(source, profile, &ZlibRunCodec)
    }

    /// Load a part, decoding annotations with `codec`
    pub fn load_with_codec(
        source: &PartSource,
        profile: &VendorProfile,
        codec: &dyn RegionCodec,
    ) -> Result<Self> {
        let mesh = import::load_stl(&source.mesh_path)?;
        let transform = Transform4::deserialize(&source.transform)?;
        let colors = load_optional_runs(source.colors_path.as_deref(), codec)?;
        let supports = load_optional_runs(source.supports_path.as_deref(), codec)?;

        let part = Part {
            name: source.name.clone(),
            mesh,
            transform,
            colors,
            supports,
            settings: source.settings.clone(),
            profile: profile.clone(),
        };

        info!(
            name = %part.name,
            path = %source.mesh_path.display(),
            triangles = part.element_count(),
            color_runs = part.colors.as_ref().map_or(0, RunSequence::len),
            support_runs = part.supports.as_ref().map_or(0, RunSequence::len),
            "Loaded part"
        );

        Ok(part)
    }

    /// Create a part from an in-memory mesh
    ///
    /// The part starts with identity placement, default settings, no
    /// annotations and the default vendor profile.
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform4::identity(),
            colors: None,
            supports: None,
            settings: PrintSettings::default(),
            profile: VendorProfile::default(),
        }
    }

    /// Set the placement transform
    pub fn with_transform(mut self, transform: Transform4) -> Self {
        self.transform = transform;
        self
    }

    /// Set the print options
    pub fn with_settings(mut self, settings: PrintSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Attach a color annotation
    pub fn with_colors(mut self, colors: RunSequence) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Attach a support annotation
    pub fn with_supports(mut self, supports: RunSequence) -> Self {
        self.supports = Some(supports);
        self
    }

    /// Target a different vendor profile
    ///
    /// A part can only be merged into a bundle built for the same profile.
    pub fn with_profile(mut self, profile: &VendorProfile) -> Self {
        self.profile = profile.clone();
        self
    }

    /// A copy of this part moved by `placement` after its own transform
    pub fn placed(&self, placement: &Transform4) -> Part {
        let mut part = self.clone();
        part.transform = *placement * self.transform;
        part
    }

    /// Bounding box of the placed part
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`](crate::Error::InvalidModel) if the mesh has no vertices.
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        mesh_ops::compute_part_bbox(self)
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Untransformed mesh
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Number of addressable elements (triangles)
    pub fn element_count(&self) -> usize {
        self.mesh.element_count()
    }

    /// Placement transform
    pub fn transform(&self) -> &Transform4 {
        &self.transform
    }

    /// Color annotation, if any
    pub fn colors(&self) -> Option<&RunSequence> {
        self.colors.as_ref()
    }

    /// Support annotation, if any
    pub fn supports(&self) -> Option<&RunSequence> {
        self.supports.as_ref()
    }

    /// The annotation that splits this part into regions
    ///
    /// Colors take precedence; supports are used when the part has no colors.
    pub fn region_runs(&self) -> Option<&RunSequence> {
        self.colors.as_ref().or(self.supports.as_ref())
    }

    /// Print options
    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    /// Vendor profile the part was loaded for
    pub fn profile(&self) -> &VendorProfile {
        &self.profile
    }

    /// Document language tag
    pub fn language(&self) -> &str {
        self.profile.language()
    }
}

fn load_optional_runs(path: Option<&Path>, codec: &dyn RegionCodec) -> Result<Option<RunSequence>> {
    path.map(|path| region::load_runs(path, codec)).transpose()
}
