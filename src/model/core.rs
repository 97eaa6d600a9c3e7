//! Core geometry document types

/// Default 3MF core namespace for the `<model>` root element
pub const CORE_NAMESPACE: &str = "http://schemas.microsoft.com/3dmanufacturing/core/2015/02";

/// A 3D vertex with x, y, z coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Vertex {
    /// Create a new vertex
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A triangle defined by three vertex indices
///
/// Triangles are the mesh elements that paint annotations and id ranges
/// refer to: element `n` of a mesh is `mesh.triangles[n]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triangle {
    /// Index of first vertex
    pub v1: usize,
    /// Index of second vertex
    pub v2: usize,
    /// Index of third vertex
    pub v3: usize,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v1: usize, v2: usize, v3: usize) -> Self {
        Self { v1, v2, v3 }
    }
}

/// A 3D mesh containing vertices and triangles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// List of vertices
    pub vertices: Vec<Vertex>,
    /// List of triangles
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mesh with pre-allocated capacity
    ///
    /// This is useful for performance when the number of vertices and triangles
    /// is known in advance, as it avoids multiple reallocations.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Number of addressable elements (triangles) in the mesh
    pub fn element_count(&self) -> usize {
        self.triangles.len()
    }
}

/// A mesh resource in the geometry document
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Object ID
    pub id: usize,
    /// Object name (optional)
    pub name: Option<String>,
    /// Mesh data
    pub mesh: Mesh,
}

impl Object {
    /// Create a new object around a mesh
    pub fn new(id: usize, mesh: Mesh) -> Self {
        Self {
            id,
            name: None,
            mesh,
        }
    }
}

/// Resources section containing mesh objects
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resources {
    /// List of objects, in document order
    pub objects: Vec<Object>,
}

impl Resources {
    /// Create a new empty resources section
    pub fn new() -> Self {
        Self::default()
    }
}

/// An item to be built, referencing an object
///
/// Merged objects carry pre-transformed vertices, so items have no transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildItem {
    /// Reference to object ID
    pub objectid: usize,
}

impl BuildItem {
    /// Create a new build item
    pub fn new(objectid: usize) -> Self {
        Self { objectid }
    }
}

/// Build section specifying which objects to manufacture
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Build {
    /// List of items to build
    pub items: Vec<BuildItem>,
}

impl Build {
    /// Create a new empty build section
    pub fn new() -> Self {
        Self::default()
    }
}

/// Metadata entry of the geometry document
///
/// Represents a `<metadata name="...">value</metadata>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    /// Name of the metadata entry
    pub name: String,
    /// Value of the metadata entry
    pub value: String,
}

impl MetadataEntry {
    /// Create a new metadata entry
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Geometry document (the `3D/3dmodel.model` part of the package)
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Unit of measurement (e.g., "millimeter", "inch")
    pub unit: String,
    /// Document language tag written as `xml:lang`
    pub language: String,
    /// XML namespace
    pub xmlns: String,
    /// Metadata entries
    pub metadata: Vec<MetadataEntry>,
    /// Resources (objects)
    pub resources: Resources,
    /// Build section
    pub build: Build,
}

impl Model {
    /// Create a new empty model
    pub fn new() -> Self {
        Self {
            unit: "millimeter".to_string(),
            language: "en-US".to_string(),
            xmlns: CORE_NAMESPACE.to_string(),
            metadata: Vec::new(),
            resources: Resources::new(),
            build: Build::new(),
        }
    }

    /// Get metadata value by name
    pub fn get_metadata(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.value.as_str())
    }

    /// Check if metadata with the given name exists
    pub fn has_metadata(&self, name: &str) -> bool {
        self.metadata.iter().any(|entry| entry.name == name)
    }

    /// Largest object id in the document, if any object exists
    pub fn max_object_id(&self) -> Option<usize> {
        self.resources.objects.iter().map(|object| object.id).max()
    }

    /// Total number of triangles across all objects
    pub fn element_count(&self) -> usize {
        self.resources
            .objects
            .iter()
            .map(|object| object.mesh.element_count())
            .sum()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
