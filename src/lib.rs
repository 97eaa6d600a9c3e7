//! # paint3mf
//!
//! Assemble painted mesh parts into one multi-material 3MF print job.
//!
//! Each input part is a triangle mesh with a placement transform, optional
//! paint annotations (run-length label streams counting triangles) and print
//! options. The parts are merged into one geometry document together with a
//! config sidecar that tells the slicer which extruder and wipe options apply
//! to each painted region, referenced by exact triangle id range.
//!
//! ## Features
//!
//! - Pure Rust implementation with no unsafe code
//! - ASCII and binary STL import
//! - Zlib run-length paint annotations, or any [`RegionCodec`]
//! - Strict id partitioning: regions always cover their part exactly
//! - Slic3r PE / PrusaSlicer config sidecar, other vendors via [`VendorProfile`]
//! - Deterministic output: identical input gives identical package bytes
//!
//! ## Example
//!
//! ```no_run
//! use paint3mf::{Bundle, Part, PartSource, VendorProfile};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = VendorProfile::default();
//!
//! let body = PartSource::new("body.stl", "body").with_colors("body.colors");
//! let badge = PartSource::new("badge.stl", "badge")
//!     .with_transform("1 0 0 12 0 1 0 0 0 0 1 3 0 0 0 1")
//!     .with_extruder("3");
//!
//! let parts = vec![Part::load(&body, &profile)?, Part::load(&badge, &profile)?];
//! let bundle = Bundle::assemble(&parts, profile)?;
//!
//! println!("Bundle contains {} objects", bundle.entries().len());
//! bundle.write_to_file("job.3mf")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events when parts
//! are loaded and merged and when the config and package are written. Install
//! any subscriber to see them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bundle;
pub mod config;
pub mod error;
pub mod import;
pub mod mesh_ops;
pub mod model;
pub mod opc;
pub mod part;
pub mod profile;
pub mod region;
pub mod transform;
pub mod writer;

pub use bundle::{Bundle, BundleEntry, Region, partition_ids};
pub use config::{SettingsColumns, synthesize, synthesize_columns};
pub use error::{Error, Result};
pub use mesh_ops::{BoundingBox, Point3d, Vector3};
pub use model::{
    Build, BuildItem, ConfigDocument, ConfigMetadata, ConfigObject, ConfigVolume, IdPair, Mesh,
    MetadataEntry, MetadataScope, Model, Object, Resources, Triangle, Vertex,
};
pub use part::{Part, PartSource, PrintSettings};
pub use profile::VendorProfile;
pub use region::{RegionCodec, Run, RunSequence, ZlibRunCodec};
pub use transform::Transform4;
