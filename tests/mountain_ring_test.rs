use nightmeadow::r#gen::mountain::{generate_cone_ring, generate_mountain, generate_ridge_ring};

#[test]
fn same_seed_yields_bit_identical_mountains() {
    let a = generate_mountain(42, 0, 1, 30.0);
    let b = generate_mountain(42, 0, 1, 30.0);
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.normals, b.normals);
    assert_eq!(a.indices, b.indices);
}

#[test]
fn different_seed_yields_different_mountains() {
    let a = generate_mountain(42, 0, 1, 30.0);
    let b = generate_mountain(43, 0, 1, 30.0);
    assert_ne!(a.positions, b.positions);
}

#[test]
fn different_index_yields_different_mountains() {
    let ring = generate_cone_ring(12345, 4, 30.0);
    // Strip ring placement by comparing vertex counts only loosely; the
    // dimensions themselves are drawn per index, so positions must differ.
    assert_ne!(ring[0].positions, ring[1].positions);
    assert_ne!(ring[1].positions, ring[2].positions);
}

#[test]
fn ring_has_one_valid_mesh_per_mountain() {
    let ring = generate_cone_ring(12345, 88, 30.0);
    assert_eq!(ring.len(), 88);
    for (i, mesh) in ring.iter().enumerate() {
        mesh.validate().unwrap_or_else(|e| panic!("mountain {i}: {e}"));
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        assert!(!mesh.indices.is_empty());
    }
}

#[test]
fn whole_ring_is_reproducible() {
    let a = generate_cone_ring(12345, 16, 30.0);
    let b = generate_cone_ring(12345, 16, 30.0);
    for (ma, mb) in a.iter().zip(&b) {
        assert_eq!(ma.positions, mb.positions);
    }
}

#[test]
fn mountains_sit_near_their_ring_positions() {
    let ring_radius = 30.0f32;
    let ring = generate_cone_ring(7, 8, ring_radius);
    for (i, mesh) in ring.iter().enumerate() {
        let theta = i as f32 / 8.0 * std::f32::consts::TAU;
        let cx = theta.cos() * ring_radius * 1.05;
        let cz = theta.sin() * ring_radius * 1.05;
        // Mean vertex position lands within jitter + base-radius reach.
        let n = mesh.vertex_count() as f32;
        let mut mx = 0.0;
        let mut mz = 0.0;
        for v in 0..mesh.vertex_count() {
            let p = mesh.position(v);
            mx += p.x / n;
            mz += p.z / n;
        }
        let dist = ((mx - cx).powi(2) + (mz - cz).powi(2)).sqrt();
        assert!(dist < 3.0, "mountain {i} drifted {dist} from its slot");
    }
}

#[test]
fn ridge_ring_shape_and_determinism() {
    let segments = 78;
    let a = generate_ridge_ring(12345, segments, 30.0);
    let b = generate_ridge_ring(12345, segments, 30.0);
    assert_eq!(a.positions, b.positions);

    assert_eq!(a.vertex_count(), (segments + 1) * 2);
    assert_eq!(a.indices.len(), segments * 6);
    a.validate().unwrap();

    // Even vertices are peaks, odd vertices sit on the base circle.
    for i in 0..=segments {
        let peak_y = a.positions[i * 2 * 3 + 1];
        let base_y = a.positions[(i * 2 + 1) * 3 + 1];
        assert!((base_y - 0.05).abs() < 1e-6);
        assert!(peak_y > 0.05 && peak_y < 17.0, "peak height {peak_y}");
    }

    let c = generate_ridge_ring(999, segments, 30.0);
    assert_ne!(a.positions, c.positions);
}
