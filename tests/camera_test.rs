mod common;

use approx::assert_relative_eq;
use arena_viewer::{
    camera::{Camera, CameraController},
    config::CameraConfig,
    input::Binding,
};
use cgmath::{Point3, Vector4};

use crate::common::test_utils::ScriptedInput;

fn setup() -> (Camera, CameraController) {
    let config = CameraConfig::default();
    (Camera::from_config(&config), CameraController::from_config(&config))
}

#[test]
fn forward_for_one_second_moves_seven_units_down_negative_z() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::holding(&[Binding::Forward]);

    controller.update(&mut camera, &mut input, 1.0);

    assert_relative_eq!(camera.position, Point3::new(0.0, 0.0, -7.0), epsilon = 1e-5);
    assert_relative_eq!(camera.target, Point3::new(0.0, 0.0, -8.0), epsilon = 1e-5);
}

#[test]
fn no_movement_input_keeps_the_position() {
    let (mut camera, controller) = setup();
    camera.position = Point3::new(3.0, 1.0, -2.0);
    let mut input = ScriptedInput::new();

    for dt in [0.0, 0.016, 0.5, 3.0, 120.0] {
        controller.update(&mut camera, &mut input, dt);
        assert_eq!(camera.position, Point3::new(3.0, 1.0, -2.0));
    }
}

#[test]
fn opposite_bindings_cancel_out() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::holding(&[Binding::Forward, Binding::Back, Binding::Left, Binding::Right]);

    controller.update(&mut camera, &mut input, 1.0);

    assert_eq!(camera.position, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn diagonal_movement_is_normalised() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::holding(&[Binding::Forward, Binding::Right]);

    controller.update(&mut camera, &mut input, 1.0);

    let step = 7.0 / 2f32.sqrt();
    assert_relative_eq!(camera.position, Point3::new(step, 0.0, -step), epsilon = 1e-5);
}

#[test]
fn movement_follows_yaw() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::new();

    // Turn first: yaw += 1.0 * 1.0 * 0.5
    input.move_mouse(1.0, 0.0);
    controller.update(&mut camera, &mut input, 1.0);
    assert_relative_eq!(camera.yaw, 0.5);
    assert_eq!(camera.position, Point3::new(0.0, 0.0, 0.0));

    input.hold(Binding::Forward);
    controller.update(&mut camera, &mut input, 1.0);

    let expected = Point3::new(-7.0 * 0.5f32.sin(), 0.0, -7.0 * 0.5f32.cos());
    assert_relative_eq!(camera.position, expected, epsilon = 1e-5);
}

#[test]
fn target_is_one_unit_ahead_and_lifted_by_pitch() {
    let (mut camera, controller) = setup();
    camera.position = Point3::new(2.0, 1.0, 2.0);
    let mut input = ScriptedInput::new();
    input.move_mouse(0.0, 2.0);

    controller.update(&mut camera, &mut input, 1.0);

    assert_relative_eq!(camera.pitch, 1.0);
    assert_relative_eq!(camera.target, Point3::new(2.0, 2.0, 1.0), epsilon = 1e-5);
}

#[test]
fn pitch_stays_within_limits() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::new();

    let sequence = [40.0, -3.0, 0.5, -200.0, 7.0, 7.0, 7.0, -0.1, 1000.0, -1000.0];
    for dy in sequence {
        input.move_mouse(0.0, dy);
        controller.update(&mut camera, &mut input, 0.25);
        assert!((-1.5..=1.5).contains(&camera.pitch), "pitch {} escaped", camera.pitch);
    }

    input.move_mouse(0.0, 1000.0);
    controller.update(&mut camera, &mut input, 1.0);
    assert_eq!(camera.pitch, 1.5);
    input.move_mouse(0.0, -1000.0);
    controller.update(&mut camera, &mut input, 1.0);
    assert_eq!(camera.pitch, -1.5);
}

#[test]
fn position_stays_inside_the_arena() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::new();

    let moves = [
        (Binding::Right, 10.0),
        (Binding::Forward, 3.0),
        (Binding::Left, 0.5),
        (Binding::Back, 60.0),
        (Binding::Left, 60.0),
    ];
    for (binding, dt) in moves {
        input.release_all();
        input.hold(binding);
        input.move_mouse(0.3, 0.0);
        controller.update(&mut camera, &mut input, dt);
        assert!(camera.position.x.abs() <= 14.0, "x {} escaped", camera.position.x);
        assert!(camera.position.z.abs() <= 14.0, "z {} escaped", camera.position.z);
    }

    input.release_all();
    camera.yaw = 0.0;
    input.hold(Binding::Right);
    controller.update(&mut camera, &mut input, 10.0);
    assert_eq!(camera.position.x, 14.0);
}

#[test]
fn height_is_not_clamped() {
    let (mut camera, controller) = setup();
    camera.position = Point3::new(0.0, 250.0, 0.0);
    let mut input = ScriptedInput::new();

    controller.update(&mut camera, &mut input, 1.0);

    assert_eq!(camera.position.y, 250.0);
}

#[test]
fn pausing_freezes_the_camera_until_resumed() {
    let (mut camera, controller) = setup();
    let mut input = ScriptedInput::holding(&[Binding::Forward]);
    controller.update(&mut camera, &mut input, 0.5);
    let frozen = camera;

    input.paused = true;
    input.hold(Binding::Left);
    input.move_mouse(3.0, -2.0);
    for _ in 0..10 {
        controller.update(&mut camera, &mut input, 0.2);
    }
    assert_eq!(camera.position, frozen.position);
    assert_eq!(camera.yaw, frozen.yaw);
    assert_eq!(camera.pitch, frozen.pitch);
    // Deltas are left alone while paused.
    assert_eq!(input.mouse_reads(), 2);

    input.paused = false;
    input.release_all();
    controller.update(&mut camera, &mut input, 1.0);
    assert_eq!(camera.position, frozen.position);
    assert_relative_eq!(camera.yaw, frozen.yaw + 1.5);
    assert_relative_eq!(camera.pitch, frozen.pitch - 1.0);
    assert_eq!(input.pending_mouse(), (0.0, 0.0));
}

#[test]
fn projection_maps_depth_into_wgpu_range() {
    let (camera, _) = setup();
    let projection = camera.projection_matrix(1400, 600);

    let near = projection * Vector4::new(0.0, 0.0, -camera.znear, 1.0);
    let far = projection * Vector4::new(0.0, 0.0, -camera.zfar, 1.0);

    assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
    assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
}
