#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any byte string either imports or fails with an error, never panics
    if let Ok(mesh) = paint3mf::import::parse_stl(data) {
        for triangle in &mesh.triangles {
            assert!(triangle.v1 < mesh.vertices.len());
            assert!(triangle.v2 < mesh.vertices.len());
            assert!(triangle.v3 < mesh.vertices.len());
        }
    }
});
