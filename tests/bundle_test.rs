//! End-to-end tests: load parts from disk, merge them, write the package

mod common;

use paint3mf::{
    Bundle, Error, IdPair, Part, PartSource, SettingsColumns, Transform4, VendorProfile,
    synthesize_columns,
};
use std::io::Cursor;
use tempfile::tempdir;

const CONFIG_PATH: &str = "Metadata/Slic3r_PE_model.config";

fn load(source: &PartSource) -> Part {
    Part::load(source, &VendorProfile::default()).expect("Failed to load part")
}

/// A painted part's runs become contiguous id ranges after the parts before it
#[test]
fn test_runs_partition_after_base() {
    let dir = tempdir().unwrap();
    let plain = common::write_ascii_stl(dir.path(), "plain", 40);
    let painted = common::write_binary_stl(dir.path(), "painted", 300);
    let colors = common::write_runs(dir.path(), "painted.colors", &[(1, 100), (2, 150), (1, 50)]);

    let parts = vec![
        load(&PartSource::new(&plain, "plain")),
        load(&PartSource::new(&painted, "painted").with_colors(&colors)),
    ];
    let bundle = Bundle::assemble(&parts, VendorProfile::default()).unwrap();

    let base = 40;
    assert_eq!(
        bundle.entries()[1].id_pairs(),
        vec![
            IdPair::new(base, base + 99),
            IdPair::new(base + 100, base + 249),
            IdPair::new(base + 250, base + 299),
        ]
    );
    let labels: Vec<_> = bundle.entries()[1]
        .regions
        .iter()
        .map(|region| region.label)
        .collect();
    assert_eq!(labels, vec![Some(1), Some(2), Some(1)]);
}

/// Runs that do not cover the mesh fail the whole merge
#[test]
fn test_short_runs_fail_assembly() {
    let dir = tempdir().unwrap();
    let mesh = common::write_binary_stl(dir.path(), "part", 300);
    let colors = common::write_runs(dir.path(), "part.colors", &[(1, 100), (2, 190)]);

    let part = load(&PartSource::new(&mesh, "part").with_colors(&colors));
    let err = Bundle::assemble(&[part], VendorProfile::default()).unwrap_err();

    assert!(matches!(err, Error::Partition(_)));
    assert!(err.to_string().contains("cover 290 elements but the mesh has 300"));
}

/// Two parts, one whole and one with two runs
#[test]
fn test_config_for_whole_and_painted_parts() {
    let dir = tempdir().unwrap();
    let first = common::write_ascii_stl(dir.path(), "first", 12);
    let second = common::write_ascii_stl(dir.path(), "second", 12);
    let supports = common::write_runs(dir.path(), "second.supports", &[(0, 5), (1, 7)]);

    let parts = vec![
        load(&PartSource::new(&first, "first").with_extruder("2")),
        load(
            &PartSource::new(&second, "second")
                .with_supports(&supports)
                .with_wipe_into_model(true),
        ),
    ];
    let bundle = Bundle::assemble(&parts, VendorProfile::default()).unwrap();
    let config = bundle.config();

    assert_eq!(config.objects.len(), 2);

    let first = config.object(1).unwrap();
    assert_eq!(first.volumes.len(), 1);
    assert_eq!(first.volumes[0].ids, IdPair::new(0, 11));
    assert_eq!(first.get("extruder"), Some("2"));
    assert_eq!(first.get("wipe_into_objects"), Some("0"));

    let second = config.object(2).unwrap();
    assert_eq!(second.volumes.len(), 2);
    assert_eq!(second.volumes[0].ids, IdPair::new(12, 16));
    assert_eq!(second.volumes[1].ids, IdPair::new(17, 23));
    assert_eq!(second.get("wipe_into_objects"), Some("1"));
    assert_eq!(second.volumes[0].get("name"), Some("second_1"));
}

/// Parallel columns shorter than the object list are rejected up front
#[test]
fn test_short_columns_rejected() {
    let columns = SettingsColumns {
        extruders: vec!["1".to_string()],
        wipe_into_infill: vec![false, false],
        wipe_into_model: vec![false, false],
        object_names: vec!["a".to_string(), "b".to_string()],
        names: vec!["a".to_string(), "b".to_string()],
    };
    let id_pairs = vec![vec![IdPair::new(0, 9)], vec![IdPair::new(10, 19)]];

    let err = synthesize_columns(&[1, 2], &id_pairs, &columns).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_write_package() {
    let dir = tempdir().unwrap();
    let base = common::write_ascii_stl(dir.path(), "base", 4);
    let lid = common::write_binary_stl(dir.path(), "lid", 6);
    let colors = common::write_runs(dir.path(), "lid.colors", &[(1, 2), (3, 4)]);

    let parts = vec![
        load(&PartSource::new(&base, "base")),
        load(
            &PartSource::new(&lid, "lid")
                .with_transform("1 0 0 0 0 1 0 0 0 0 1 10 0 0 0 1")
                .with_colors(&colors)
                .with_extruder("3"),
        ),
    ];
    let bundle = Bundle::assemble(&parts, VendorProfile::default()).unwrap();

    let output = dir.path().join("job.3mf");
    bundle.write_to_file(&output).unwrap();
    let package = std::fs::read(&output).unwrap();

    let names = common::entry_names(&package);
    assert!(names.contains(&"[Content_Types].xml".to_string()));
    assert!(names.contains(&"_rels/.rels".to_string()));
    assert!(names.contains(&"3D/3dmodel.model".to_string()));
    assert!(names.contains(&CONFIG_PATH.to_string()));

    let model = common::read_entry(&package, "3D/3dmodel.model");
    assert_eq!(model.matches("xmlns:slic3rpe=").count(), 1);
    assert!(model.contains("<metadata name=\"slic3rpe:Version3mf\">1</metadata>"));
    assert!(model.contains("<metadata name=\"Application\">Canvas</metadata>"));
    assert!(model.contains("<object id=\"1\" type=\"model\" name=\"base\">"));
    assert!(model.contains("<object id=\"2\" type=\"model\" name=\"lid\">"));
    assert!(model.contains("z=\"10\""));
    assert_eq!(model.matches("<triangle ").count(), 10);
    assert!(!model.contains("transform="));

    let config = common::read_entry(&package, CONFIG_PATH);
    assert!(config.contains("<object id=\"2\" instances_count=\"1\">"));
    assert!(config.contains("<metadata type=\"object\" key=\"extruder\" value=\"3\"/>"));
    assert!(config.contains("<volume firstid=\"4\" lastid=\"5\">"));
    assert!(config.contains("<volume firstid=\"6\" lastid=\"9\">"));
    assert!(config.contains(
        "<metadata type=\"volume\" key=\"matrix\" value=\"1 0 0 0 0 1 0 0 0 0 1 0 0 0 0 1\"/>"
    ));
}

#[test]
fn test_package_bytes_are_deterministic() {
    let dir = tempdir().unwrap();
    let mesh = common::write_ascii_stl(dir.path(), "part", 8);
    let part = load(&PartSource::new(&mesh, "part"));

    let write = || {
        Bundle::assemble(std::slice::from_ref(&part), VendorProfile::default())
            .unwrap()
            .to_writer(Cursor::new(Vec::new()))
            .unwrap()
            .into_inner()
    };
    assert_eq!(write(), write());
}

#[test]
fn test_alternate_vendor_profile() {
    let dir = tempdir().unwrap();
    let mesh = common::write_ascii_stl(dir.path(), "part", 2);
    let profile = VendorProfile::default()
        .with_namespace("acme", "http://example.com/acme/2024")
        .with_application("Acme Studio")
        .with_config_path("Metadata/acme.config");

    let part = Part::load(&PartSource::new(&mesh, "part"), &profile).unwrap();
    let package = Bundle::assemble(&[part], profile)
        .unwrap()
        .to_writer(Cursor::new(Vec::new()))
        .unwrap()
        .into_inner();

    let model = common::read_entry(&package, "3D/3dmodel.model");
    assert!(model.contains("xmlns:acme=\"http://example.com/acme/2024\""));
    assert!(model.contains("<metadata name=\"acme:Version3mf\">1</metadata>"));
    assert!(!model.contains("slic3rpe"));
    assert!(common::entry_names(&package).contains(&"Metadata/acme.config".to_string()));
}

#[test]
fn test_missing_mesh_file() {
    let dir = tempdir().unwrap();
    let source = PartSource::new(dir.path().join("absent.stl"), "absent");

    let err = Part::load(&source, &VendorProfile::default()).unwrap_err();
    assert!(matches!(err, Error::FileAccess { .. }));
    assert!(err.to_string().contains("absent.stl"));
}

#[test]
fn test_bad_transform_text() {
    let dir = tempdir().unwrap();
    let mesh = common::write_ascii_stl(dir.path(), "part", 2);
    let source = PartSource::new(&mesh, "part").with_transform("1 0 0 0 0 1 0 0 0 0 1 0 0 0 0");

    let err = Part::load(&source, &VendorProfile::default()).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(err.to_string().contains("expected 16 values, got 15"));
}

#[test]
fn test_corrupt_annotation_file() {
    let dir = tempdir().unwrap();
    let mesh = common::write_ascii_stl(dir.path(), "part", 2);
    let colors = dir.path().join("part.colors");
    std::fs::write(&colors, b"not zlib at all").unwrap();

    let err = Part::load(
        &PartSource::new(&mesh, "part").with_colors(&colors),
        &VendorProfile::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_placed_part_bounding_box() {
    let dir = tempdir().unwrap();
    let mesh = common::write_ascii_stl(dir.path(), "part", 4);
    let part = load(&PartSource::new(&mesh, "part"));

    let before = part.bounding_box().unwrap();
    let moved = part.placed(&Transform4::translation(0.0, 0.0, 5.0));
    let after = moved.bounding_box().unwrap();

    assert_eq!(before.min(), Some((0.0, 0.0, 0.0)));
    assert_eq!(after.min(), Some((0.0, 0.0, 5.0)));
    assert_eq!(before.size(), after.size());

    let bundle = Bundle::assemble(&[moved], VendorProfile::default()).unwrap();
    assert_eq!(bundle.bounding_box(), after);
}

/// The file holds exactly the in-memory package, and a failed write leaves nothing behind
#[test]
fn test_write_to_file_matches_package() {
    let dir = tempdir().unwrap();
    let mesh = common::write_ascii_stl(dir.path(), "part", 6);
    let bundle = Bundle::assemble(
        &[load(&PartSource::new(&mesh, "part"))],
        VendorProfile::default(),
    )
    .unwrap();

    let output = dir.path().join("job.3mf");
    bundle.write_to_file(&output).unwrap();
    let expected = bundle.to_writer(Cursor::new(Vec::new())).unwrap().into_inner();
    assert_eq!(std::fs::read(&output).unwrap(), expected);

    let unreachable = dir.path().join("missing").join("job.3mf");
    let err = bundle.write_to_file(&unreachable).unwrap_err();
    assert!(matches!(err, Error::FileAccess { .. }));
    assert!(!unreachable.exists());
}

/// Parts built in memory carry the default profile and cannot leak it into another vendor's bundle
#[test]
fn test_in_memory_part_with_alternate_profile() {
    let dir = tempdir().unwrap();
    let mesh_path = common::write_ascii_stl(dir.path(), "part", 2);
    let mesh = load(&PartSource::new(&mesh_path, "part")).mesh().clone();
    let profile = VendorProfile::default().with_namespace("acme", "http://example.com/acme/2024");

    let err = Bundle::assemble(&[Part::new("p", mesh.clone())], profile.clone()).unwrap_err();
    assert!(matches!(err, Error::InvalidModel(_)));

    let package = Bundle::assemble(&[Part::new("p", mesh).with_profile(&profile)], profile)
        .unwrap()
        .to_writer(Cursor::new(Vec::new()))
        .unwrap()
        .into_inner();
    let model = common::read_entry(&package, "3D/3dmodel.model");
    assert!(model.contains("xmlns:acme="));
    assert!(!model.contains("slic3rpe"));
}
