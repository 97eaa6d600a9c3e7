//! STL mesh import
//!
//! Supports both ASCII and binary STL. Binary files are recognized by their
//! exact size (`84 + 50 * triangle_count` bytes); anything else must be ASCII
//! and start with `solid`.
//!
//! Corners with bit-identical coordinates are welded into one vertex.
//! Triangle order is preserved, so triangle `n` of the file is element `n`
//! of the mesh, which is what paint annotations count against.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Mesh, Triangle, Vertex};

/// STL binary header size in bytes
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute)
const TRIANGLE_SIZE: usize = 50;

/// Load a mesh from an STL file
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the file cannot be read and
/// [`Error::Decode`] if its content is not valid STL.
pub fn load_stl<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::file_access(path, e))?;
    let mesh = parse_stl(&bytes)?;

    debug!(
        path = %path.display(),
        vertices = mesh.vertices.len(),
        triangles = mesh.triangles.len(),
        "Imported STL mesh"
    );

    Ok(mesh)
}

/// Read an STL mesh from any reader
pub fn read_stl<R: Read>(mut reader: R) -> Result<Mesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_stl(&bytes)
}

/// Parse STL bytes, detecting the flavor
pub fn parse_stl(bytes: &[u8]) -> Result<Mesh> {
    if is_binary_stl(bytes) {
        return parse_binary(bytes);
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_SIZE)]);
    if head.trim_start().starts_with("solid") {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::decode_with_context("ASCII STL", &e.to_string()))?;
        return parse_ascii(text);
    }

    Err(Error::decode_with_context(
        "STL",
        &format!(
            "{} bytes is neither a complete binary STL nor an ASCII STL",
            bytes.len()
        ),
    ))
}

/// Whether the byte length matches the triangle count in a binary header
fn is_binary_stl(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_SIZE + 4 {
        return false;
    }
    let count = u32::from_le_bytes([
        bytes[HEADER_SIZE],
        bytes[HEADER_SIZE + 1],
        bytes[HEADER_SIZE + 2],
        bytes[HEADER_SIZE + 3],
    ]) as usize;
    count
        .checked_mul(TRIANGLE_SIZE)
        .and_then(|body| body.checked_add(HEADER_SIZE + 4))
        == Some(bytes.len())
}

fn parse_binary(bytes: &[u8]) -> Result<Mesh> {
    let count = (bytes.len() - HEADER_SIZE - 4) / TRIANGLE_SIZE;
    let mut builder = MeshBuilder::with_capacity(count);

    for record in bytes[HEADER_SIZE + 4..].chunks_exact(TRIANGLE_SIZE) {
        // Skip normal (12 bytes), read 3 vertices (36 bytes total)
        let a = read_vertex(&record[12..24]);
        let b = read_vertex(&record[24..36]);
        let c = read_vertex(&record[36..48]);
        builder.push_triangle([a, b, c]);
    }

    Ok(builder.finish())
}

/// Read a vertex from 12 bytes (3 f32s)
fn read_vertex(buf: &[u8]) -> [f32; 3] {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    [x, y, z]
}

fn parse_ascii(text: &str) -> Result<Mesh> {
    let mut builder = MeshBuilder::with_capacity(0);
    let mut corners: Vec<[f32; 3]> = Vec::with_capacity(3);
    let mut in_loop = false;

    for (number, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "outer" => {
                in_loop = true;
                corners.clear();
            }
            "vertex" => {
                if !in_loop {
                    return Err(stl_line_error(number, "vertex outside of a loop"));
                }
                let mut coords = [0.0_f32; 3];
                for coord in coords.iter_mut() {
                    let token = parts
                        .next()
                        .ok_or_else(|| stl_line_error(number, "vertex needs 3 coordinates"))?;
                    *coord = token.parse::<f32>().map_err(|_| {
                        stl_line_error(number, &format!("'{}' is not a number", token))
                    })?;
                }
                corners.push(coords);
            }
            "endloop" => {
                if corners.len() != 3 {
                    return Err(stl_line_error(
                        number,
                        &format!("facet has {} vertices, expected 3", corners.len()),
                    ));
                }
                builder.push_triangle([corners[0], corners[1], corners[2]]);
                in_loop = false;
            }
            "endsolid" => break,
            _ => {
                // solid, facet, endfacet and unknown lines carry nothing we need
            }
        }
    }

    if in_loop {
        return Err(Error::decode_with_context(
            "ASCII STL",
            "unterminated facet loop",
        ));
    }

    Ok(builder.finish())
}

fn stl_line_error(index: usize, message: &str) -> Error {
    Error::decode_with_context(&format!("ASCII STL line {}", index + 1), message)
}

/// Welds identical corners while triangles are appended
struct MeshBuilder {
    mesh: Mesh,
    index: HashMap<[u32; 3], usize>,
}

impl MeshBuilder {
    fn with_capacity(triangles: usize) -> Self {
        Self {
            mesh: Mesh::with_capacity(triangles / 2 + 3, triangles),
            index: HashMap::with_capacity(triangles / 2 + 3),
        }
    }

    fn vertex(&mut self, corner: [f32; 3]) -> usize {
        let key = [corner[0].to_bits(), corner[1].to_bits(), corner[2].to_bits()];
        let vertices = &mut self.mesh.vertices;
        *self.index.entry(key).or_insert_with(|| {
            vertices.push(Vertex::new(
                f64::from(corner[0]),
                f64::from(corner[1]),
                f64::from(corner[2]),
            ));
            vertices.len() - 1
        })
    }

    fn push_triangle(&mut self, corners: [[f32; 3]; 3]) {
        let v1 = self.vertex(corners[0]);
        let v2 = self.vertex(corners[1]);
        let v3 = self.vertex(corners[2]);
        self.mesh.triangles.push(Triangle::new(v1, v2, v3));
    }

    fn finish(self) -> Mesh {
        self.mesh
    }
}
