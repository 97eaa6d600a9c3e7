//! Shared fixtures for integration tests
//!
//! Writes STL meshes and region annotation files into a temporary directory
//! and reads entries back out of written packages.

#![allow(dead_code)]

use paint3mf::{RunSequence, ZlibRunCodec};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Corner positions of a zig-zag strip of `triangles` triangles
///
/// Triangle `i` uses corners `i`, `i + 1` and `i + 2`, so consecutive
/// triangles share an edge and the mesh has `triangles + 2` vertices.
fn strip_corners(triangles: usize) -> Vec<[[f32; 3]; 3]> {
    let corner = |k: usize| [(k / 2) as f32 + 0.5 * (k % 2) as f32, (k % 2) as f32, 0.0];
    (0..triangles)
        .map(|i| [corner(i), corner(i + 1), corner(i + 2)])
        .collect()
}

/// Write an ASCII STL strip with `triangles` facets
pub fn write_ascii_stl(dir: &Path, name: &str, triangles: usize) -> PathBuf {
    let mut text = format!("solid {}\n", name);
    for facet in strip_corners(triangles) {
        text.push_str("  facet normal 0 0 1\n    outer loop\n");
        for [x, y, z] in facet {
            text.push_str(&format!("      vertex {} {} {}\n", x, y, z));
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str(&format!("endsolid {}\n", name));

    let path = dir.join(format!("{}.stl", name));
    std::fs::write(&path, text).unwrap();
    path
}

/// Write a binary STL strip with `triangles` facets
pub fn write_binary_stl(dir: &Path, name: &str, triangles: usize) -> PathBuf {
    let mut bytes = vec![0u8; 80];
    bytes.extend_from_slice(&(triangles as u32).to_le_bytes());
    for facet in strip_corners(triangles) {
        bytes.extend_from_slice(&[0u8; 12]);
        for corner in facet {
            for value in corner {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes.extend_from_slice(&[0u8; 2]);
    }

    let path = dir.join(format!("{}.stl", name));
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Write a zlib run annotation file
pub fn write_runs(dir: &Path, name: &str, runs: &[(u32, usize)]) -> PathBuf {
    let runs = RunSequence::from_pairs(runs).unwrap();
    let encoded = ZlibRunCodec.encode(&runs).unwrap();

    let path = dir.join(name);
    std::fs::write(&path, encoded).unwrap();
    path
}

/// Read one entry of a written package as text
pub fn read_entry(package: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(package)).unwrap();
    let mut content = String::new();
    archive
        .by_name(name)
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    content
}

/// Names of all entries in a written package, in archive order
pub fn entry_names(package: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(package)).unwrap();
    archive.file_names().map(str::to_string).collect()
}
