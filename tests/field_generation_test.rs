use nightmeadow::r#gen::blade::{INDICES_PER_BLADE, VERTS_PER_BLADE};
use nightmeadow::r#gen::field::generate_field;
use nightmeadow::r#gen::mesh::MeshData;

#[test]
fn buffer_lengths_scale_with_blade_count() {
    for n in [0usize, 1, 7, 250] {
        let mesh = generate_field(n, 12.0, 1).unwrap();
        assert_eq!(mesh.positions.len(), n * 15, "positions for {n} blades");
        assert_eq!(mesh.uvs.len(), n * 10, "uvs for {n} blades");
        assert_eq!(mesh.colors.len(), n * 15, "colors for {n} blades");
        assert_eq!(mesh.normals.len(), n * 15, "normals for {n} blades");
        assert_eq!(mesh.indices.len(), n * 9, "indices for {n} blades");
    }
}

#[test]
fn blade_indices_stay_inside_their_own_blade() {
    let n = 200;
    let mesh = generate_field(n, 10.0, 99).unwrap();
    for i in 0..n {
        let lo = (i * VERTS_PER_BLADE) as u32;
        let hi = lo + VERTS_PER_BLADE as u32 - 1;
        for &index in &mesh.indices[i * INDICES_PER_BLADE..(i + 1) * INDICES_PER_BLADE] {
            assert!(
                (lo..=hi).contains(&index),
                "blade {i} references vertex {index}, outside [{lo}, {hi}]"
            );
        }
    }
}

#[test]
fn four_blades_make_twenty_vertices() {
    let mesh = generate_field(4, 10.0, 7).unwrap();
    assert_eq!(mesh.vertex_count(), 20);
    assert_eq!(mesh.indices.len(), 36);
    assert!(mesh.indices.iter().all(|&i| i <= 19));
}

#[test]
fn blade_color_bands_run_base_to_tip() {
    let mesh = generate_field(3, 5.0, 3).unwrap();
    for blade in 0..3 {
        let color_r = |v: usize| mesh.colors[(blade * 5 + v) * 3];
        // bottom-left, bottom-right: black; top-right, top-left: gray; tip: white
        assert_eq!(color_r(0), 0.0);
        assert_eq!(color_r(1), 0.0);
        assert_eq!(color_r(2), 0.5);
        assert_eq!(color_r(3), 0.5);
        assert_eq!(color_r(4), 1.0);
    }
}

#[test]
fn blade_centers_are_uniform_over_the_disk() {
    // Recover each blade's center from its shared UV and count how many fall
    // inside the half-area inner disk (radius R / sqrt(2)). For a uniform
    // distribution that's half the samples.
    let n = 20_000;
    let radius = 10.0f32;
    let mesh = generate_field(n, radius, 4242).unwrap();

    let mut inside = 0usize;
    for i in 0..n {
        let u = mesh.uvs[i * 10];
        let v = mesh.uvs[i * 10 + 1];
        let x = (u * 2.0 - 1.0) * radius;
        let z = (v * 2.0 - 1.0) * radius;
        if x * x + z * z <= radius * radius / 2.0 {
            inside += 1;
        }
    }

    let ratio = inside as f64 / n as f64;
    assert!(
        (0.47..=0.53).contains(&ratio),
        "inner half-area disk holds {ratio} of samples, expected ~0.5"
    );
}

#[test]
fn centers_never_leave_the_disk() {
    let radius = 25.0f32;
    let mesh = generate_field(500, radius, 1).unwrap();
    for i in 0..500 {
        let u = mesh.uvs[i * 10];
        let v = mesh.uvs[i * 10 + 1];
        let x = (u * 2.0 - 1.0) * radius;
        let z = (v * 2.0 - 1.0) * radius;
        assert!(x * x + z * z <= radius * radius * 1.0001);
    }
}

#[test]
fn same_seed_grows_the_same_meadow() {
    let a = generate_field(64, 25.0, 123).unwrap();
    let b = generate_field(64, 25.0, 123).unwrap();
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.indices, b.indices);
}

#[test]
fn validation_rejects_mismatched_attributes() {
    let mut mesh = MeshData::default();
    mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 0.0]);
    mesh.uvs.push(0.5);
    assert!(mesh.validate().is_err());

    let mut mesh = MeshData::default();
    mesh.push_vertex([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 0.0]);
    mesh.indices.extend_from_slice(&[0, 0, 1]);
    assert!(mesh.validate().is_err(), "index beyond vertex count");
}
