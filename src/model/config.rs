//! Slicer config sidecar types
//!
//! The config document cross-references geometry object ids and element id
//! ranges with per-object and per-volume print settings.

/// Matrix value declared on every volume
///
/// Vertices are transformed while merging, so the slicer must not apply
/// another transform.
pub const IDENTITY_MATRIX: &str = "1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1";

/// Volume type marker for printable regions
pub const VOLUME_TYPE_MODEL_PART: &str = "ModelPart";

/// Inclusive range of element ids forming one region of the merged document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdPair {
    /// First element id of the range
    pub first_id: usize,
    /// Last element id of the range (inclusive)
    pub last_id: usize,
}

impl IdPair {
    /// Create a new id range
    pub fn new(first_id: usize, last_id: usize) -> Self {
        Self { first_id, last_id }
    }

    /// Number of element ids in the range
    pub fn len(&self) -> usize {
        self.last_id - self.first_id + 1
    }

    /// Always false: a range holds at least its first id
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` lies inside the range
    pub fn contains(&self, id: usize) -> bool {
        (self.first_id..=self.last_id).contains(&id)
    }
}

/// Scope of a config metadata entry, written as the `type` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataScope {
    /// Applies to the whole object
    Object,
    /// Applies to a single volume
    Volume,
}

impl MetadataScope {
    /// Attribute value for this scope
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataScope::Object => "object",
            MetadataScope::Volume => "volume",
        }
    }
}

/// A `<metadata type=".." key=".." value=".."/>` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMetadata {
    /// Scope of the entry
    pub scope: MetadataScope,
    /// Setting key
    pub key: String,
    /// Setting value
    pub value: String,
}

impl ConfigMetadata {
    /// Create an object-scoped entry
    pub fn object(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scope: MetadataScope::Object,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a volume-scoped entry
    pub fn volume(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            scope: MetadataScope::Volume,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A `<volume>` element: one region of a merged object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigVolume {
    /// Element id range covered by the volume
    pub ids: IdPair,
    /// Volume settings
    pub metadata: Vec<ConfigMetadata>,
}

/// An `<object>` element keyed by a geometry object id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigObject {
    /// Geometry object id
    pub id: usize,
    /// Number of placed instances
    pub instances_count: usize,
    /// Object settings
    pub metadata: Vec<ConfigMetadata>,
    /// Volumes in region order
    pub volumes: Vec<ConfigVolume>,
}

impl ConfigObject {
    /// Get an object-level setting by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|meta| meta.key == key)
            .map(|meta| meta.value.as_str())
    }
}

impl ConfigVolume {
    /// Get a volume-level setting by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|meta| meta.key == key)
            .map(|meta| meta.value.as_str())
    }
}

/// The `<config>` document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    /// Objects in geometry document order
    pub objects: Vec<ConfigObject>,
}

impl ConfigDocument {
    /// Find the config object for a geometry object id
    pub fn object(&self, id: usize) -> Option<&ConfigObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    /// Total number of volumes across all objects
    pub fn volume_count(&self) -> usize {
        self.objects.iter().map(|object| object.volumes.len()).sum()
    }
}
