use std::collections::HashMap;

use arena_viewer::{
    config::RenderConfig,
    scene::{ARENA_MESHES, ARENA_TEXTURES, ObjectSpec, arena_layout},
};
use cgmath::Vector3;

fn layout() -> Vec<ObjectSpec> {
    arena_layout(Vector3::from(RenderConfig::default().light_position))
}

#[test]
fn arena_has_every_object_once() {
    let specs = layout();
    let mut per_texture: HashMap<&str, usize> = HashMap::new();
    for spec in &specs {
        *per_texture.entry(spec.texture).or_default() += 1;
    }

    assert_eq!(specs.len(), 17 * 17 + 16 * 2 + 9 + 1 + 3);
    assert_eq!(per_texture["gravel"], 289);
    assert_eq!(per_texture["rocks"], 41);
    assert_eq!(per_texture["the-sun"], 1);
    assert_eq!(per_texture["barrel"], 3);
}

#[test]
fn only_registered_names_are_referenced() {
    for spec in layout() {
        assert!(ARENA_MESHES.contains(&spec.mesh), "{}", spec.mesh);
        assert!(ARENA_TEXTURES.contains(&spec.texture), "{}", spec.texture);
        assert!(["cube", "basic"].contains(&spec.shader), "{}", spec.shader);
    }
}

#[test]
fn floor_comes_first_and_is_explicitly_scaled() {
    let specs = layout();
    let first = &specs[0];
    assert_eq!(first.texture, "gravel");
    assert_eq!(first.transform.position, Vector3::new(-16.0, -3.0, -16.0));
    assert_eq!(first.transform.scale, Some(Vector3::new(1.0, 1.0, 1.0)));

    let floor_end = &specs[288];
    assert_eq!(floor_end.transform.position, Vector3::new(16.0, -3.0, 16.0));
    assert_eq!(specs[289].texture, "rocks");
}

#[test]
fn walls_and_pillars_use_default_scale_and_rotation() {
    for spec in layout().iter().filter(|s| s.texture == "rocks") {
        assert_eq!(spec.transform.scale, None);
        assert_eq!(spec.transform.rotation, None);
        let p = spec.transform.position;
        let is_wall = p.x.abs() == 15.0 && p.y == -1.0;
        let is_pillar = [(3.0, 2.0), (8.0, 7.0), (2.0, -5.0)].contains(&(p.x, p.z))
            && [-1.0, 1.0, 3.0].contains(&p.y);
        assert!(is_wall || is_pillar, "unexpected rock at {p:?}");
    }
}

#[test]
fn the_sun_sits_at_the_light() {
    let specs = layout();
    let sun = specs
        .iter()
        .find(|s| s.texture == "the-sun")
        .expect("the sun is placed");
    assert_eq!(sun.shader, "basic");
    assert_eq!(sun.mesh, "cube");
    assert_eq!(sun.transform.position, Vector3::new(-25.0, 20.0, 5.0));
    assert_eq!(sun.transform.scale, Some(Vector3::new(5.0, 5.0, 5.0)));
    assert_eq!(sun.transform.rotation, Some(Vector3::new(0.0, 0.0, 90.0)));
}

#[test]
fn barrels_are_drawn_last() {
    let specs = layout();
    let barrels = &specs[specs.len() - 3..];
    let positions: Vec<_> = barrels.iter().map(|s| s.transform.position).collect();
    assert_eq!(
        positions,
        vec![
            Vector3::new(-5.0, -2.0, -5.0),
            Vector3::new(5.0, -2.0, 5.0),
            Vector3::new(10.0, -2.0, -5.0),
        ]
    );
    for barrel in barrels {
        assert_eq!(barrel.mesh, "barrel");
        assert_eq!(barrel.shader, "cube");
        assert_eq!(barrel.transform.scale, Some(Vector3::new(0.5, 0.5, 0.5)));
    }
}

#[test]
fn layout_is_deterministic() {
    assert_eq!(layout(), layout());
}
