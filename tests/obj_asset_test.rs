//! Checks that the bundled OBJ asset parses into valid mesh data.

use minimal_scene::resources;

#[test]
fn bundled_apple_obj_parses() {
    let text = std::fs::read_to_string("assets/models/apple.obj")
        .expect("assets/models/apple.obj should ship with the crate");
    let (vertices, indices) = resources::read_obj(&text, 0.01).unwrap();

    assert!(!vertices.is_empty());
    assert_eq!(indices.len() % 3, 0, "index list must form whole triangles");
    assert!(
        indices.iter().all(|&i| (i as usize) < vertices.len()),
        "all indices must be in range"
    );
}

#[test]
fn apple_fits_the_scene_at_one_percent_scale() {
    let text = std::fs::read_to_string("assets/models/apple.obj").unwrap();
    let (vertices, _) = resources::read_obj(&text, 0.01).unwrap();

    // The model is authored tens of units tall; at 1% it should sit well
    // within a one-unit grid cell.
    let max_extent = vertices
        .iter()
        .flat_map(|v| v.position)
        .fold(0.0f32, |acc, c| acc.max(c.abs()));
    assert!(max_extent > 0.05, "model should not be degenerate");
    assert!(max_extent < 1.0, "model should fit a grid cell");
}
