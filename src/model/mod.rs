//! Data structures for the geometry document and its config sidecar

// Declare all submodules
mod config;
mod core;

// Re-export all public types from core module
pub use self::core::{
    Build, BuildItem, CORE_NAMESPACE, Mesh, MetadataEntry, Model, Object, Resources,
    Triangle, Vertex,
};

// Re-export all public types from config module
pub use config::{
    ConfigDocument, ConfigMetadata, ConfigObject, ConfigVolume, IDENTITY_MATRIX, IdPair,
    MetadataScope, VOLUME_TYPE_MODEL_PART,
};
