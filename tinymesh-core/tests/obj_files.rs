use std::fs;

use tempfile::tempdir;
use tinymesh_core::{BoundingBox, Cylinder, Mesh, MeshError, Ray, Sphere, Vector};

#[test]
fn test_box_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("box.obj");

    let b = BoundingBox::new(Vector::new(-1.0, -2.0, -3.0), Vector::new(1.0, 2.0, 3.0));
    let mesh = Mesh::from_box(&b);
    mesh.save_obj(&path, "box");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("g box\n"));
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 8);
    assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 6);
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);

    let mut loaded = Mesh::new();
    loaded.load(&path);
    assert_eq!(loaded, mesh);
    assert_eq!(loaded.bounding_box(), b);
}

#[test]
fn test_smooth_sphere_round_trip_is_exact() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sphere.obj");

    let mut mesh = Mesh::sphere(&Sphere::new(Vector::new(0.25, -1.0, 3.5), 1.7), 10, 6);
    mesh.translate(&Vector::new(0.1, 0.2, 0.3));
    mesh.smooth_normals();

    mesh.write_obj(&path, "sphere").unwrap();
    let loaded = Mesh::read_obj(&path).unwrap();

    assert_eq!(loaded.vertices(), mesh.vertices());
    assert_eq!(loaded.normals(), mesh.normals());
    assert_eq!(loaded.vertex_indices(), mesh.vertex_indices());
    assert_eq!(loaded.normal_indices(), mesh.normal_indices());
}

#[test]
fn test_cylinder_keeps_distinct_normal_indices() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cylinder.obj");

    let mesh = Mesh::cylinder(&Cylinder::new(Vector::zeros(), Vector::new(0.0, 2.0, 0.0), 0.5), 8);
    mesh.write_obj(&path, "cylinder").unwrap();
    let loaded = Mesh::read_obj(&path).unwrap();

    assert_eq!(loaded, mesh);
    assert!(loaded.validate().is_ok());
    assert_ne!(loaded.vertex_indices(), loaded.normal_indices());
}

#[test]
fn test_load_missing_file_empties_mesh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.obj");

    let mut mesh = Mesh::new();
    mesh.load(&path);
    assert!(mesh.is_empty());
    assert_eq!(mesh.vertex_count(), 0);

    let mut cube = Mesh::from_box(&BoundingBox::cube(1.0));
    cube.load(&path);
    assert!(cube.is_empty());
    assert_eq!(cube.vertex_count(), 0);
    assert_eq!(cube.normal_count(), 0);

    match Mesh::read_obj(&path) {
        Err(MeshError::Read { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected read error, got {other:?}"),
    }
}

#[test]
fn test_latin1_comment_does_not_block_import() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("latin1.obj");
    fs::write(
        &path,
        b"# Cr\xe9\xe9 par export\ng fen\xeatre\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n",
    )
    .unwrap();

    let mesh = Mesh::read_obj(&path).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);

    let mut loaded = Mesh::from_box(&BoundingBox::cube(1.0));
    loaded.load(&path);
    assert_eq!(loaded, mesh);
}

#[test]
fn test_write_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.obj");

    let mesh = Mesh::from_box(&BoundingBox::cube(1.0));
    assert!(matches!(mesh.write_obj(&path, "cube"), Err(MeshError::Write { .. })));

    // Silent variant only logs.
    mesh.save_obj(&path, "cube");
    assert!(!path.exists());
}

#[test]
fn test_foreign_obj_with_quads_and_comments() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreign.obj");
    fs::write(
        &path,
        "# exported elsewhere\n\
         mtllib scene.mtl\n\
         o Plane\n\
         v -1 0 -1\n\
         v 1 0 -1\n\
         v 1 0 1\n\
         v -1 0 1\n\
         vt 0 0\n\
         vn 0 1 0\n\
         usemtl None\n\
         f 1/1/1 2/1/1 3/1/1 4/1/1\n\
         f 1/1/1 3/1/1 2/1/1\n\
         f 1//1 4//1 3//1\n",
    )
    .unwrap();

    let mesh = Mesh::read_obj(&path).unwrap();
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(mesh.triangle_count(), 2);
    assert!(mesh.validate().is_ok());
}

#[test]
fn test_pick_loaded_mesh() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("pick.obj");
    Mesh::from_box(&BoundingBox::cube(1.0)).write_obj(&path, "cube").unwrap();

    let mesh = Mesh::read_obj(&path).unwrap();
    let ray = Ray::new(Vector::new(0.2, 0.3, 10.0), Vector::new(0.0, 0.0, -1.0));
    let hit = mesh.intersect(&ray).unwrap();
    assert!((hit.t - 9.0).abs() < 1e-12);
    assert_eq!(mesh.normal(mesh.normal_index(hit.triangle, 0)), Vector::new(0.0, 0.0, 1.0));
}
