// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end episodes.

use boxpile_env::boxpile_index::Extent3;
use boxpile_env::{Action, BoxGeometry, BoxPileEnv, Pose, RotationFlags};

const EPSILON: f64 = 1e-9;

const CORNER: &str = r#"{
    "dx": 1000, "dy": 1500, "dz": 1000,
    "shape": { "x": 100, "z": 100 },
    "boxes": {
        "placed": {
            "2": { "dx": 136, "dy": 150, "dz": 136, "x": 68, "y": 75, "z": 68,
                   "rx": false, "ry": false, "rz": false }
        },
        "unplaced": { "1": { "dx": 100, "dy": 100, "dz": 100 } }
    }
}"#;

#[test]
fn corner_box_builds_relief_and_queues_next() {
    let env = BoxPileEnv::from_json_str(CORNER).unwrap();
    assert!(env.selected().is_none());

    let obs = env.observation();
    assert_eq!(obs.relief.len(), 14 * 14);
    for &(x, h, z) in &obs.relief {
        assert!((0..14).contains(&x) && (0..14).contains(&z));
        // Fully covered cells sit at the box top; the last row and column are
        // covered 6/10 of the way.
        let cover = |c: i32| if c == 13 { 0.6 } else { 1.0 };
        assert!(
            (h - 150.0 * cover(x) * cover(z)).abs() < EPSILON,
            "cell ({x}, {z})"
        );
    }

    let next = env.next().unwrap();
    assert_eq!(env.catalog().label(next.id), Some("1"));
    assert_eq!(next.geometry, BoxGeometry::new(100.0, 100.0, 100.0));
    assert_eq!(next.pose, Pose::new(500.0, 50.0, 500.0));
    assert_eq!(next.rotation, RotationFlags::default());
    assert!(obs.selected.is_empty());
    assert_eq!(obs.next.len(), 100);
}

#[test]
fn walking_off_the_edge_ends_the_episode() {
    let mut env = BoxPileEnv::from_json_str(CORNER).unwrap();
    env.start();
    let mut steps = 0;
    let last = loop {
        let step = env.step(Action::MinusX);
        steps += 1;
        if step.done {
            break step;
        }
        assert!((step.reward - -0.2).abs() < EPSILON);
    };
    assert_eq!(last.reward, -10.0);
    assert_eq!(steps, 451);
    let selected = env.selected().unwrap();
    assert!(selected.pose.x - selected.geometry.dx / 2.0 < 0.0);
}

#[test]
fn walking_off_the_far_z_edge_ends_the_episode() {
    let mut env = BoxPileEnv::from_json_str(CORNER).unwrap();
    env.start();
    let mut steps = 0;
    let last = loop {
        let step = env.step(Action::PlusZ);
        steps += 1;
        if step.done {
            break step;
        }
        assert!((step.reward - -0.2).abs() < EPSILON);
    };
    assert_eq!(last.reward, -10.0);
    // The cube starts with its far face at z = 550 and may reach z = 1000.
    assert_eq!(steps, 451);
    let selected = *env.selected().unwrap();
    assert_eq!(selected.pose.x, 500.0);
    assert!(selected.pose.z + selected.geometry.dz / 2.0 > 1000.0);

    // Terminated: the box stays where it died.
    let after = env.step(Action::MinusZ);
    assert!(after.done);
    assert_eq!(env.selected().unwrap().pose.z, selected.pose.z);
}

#[test]
fn rotate_x_swaps_width_and_height() {
    let json = r#"{ "dx": 1000, "dy": 1500, "dz": 1000, "shape": { "x": 100, "z": 100 },
        "boxes": { "unplaced": { "b": { "dx": 100, "dy": 50, "dz": 70 } } } }"#;
    let mut env = BoxPileEnv::from_json_str(json).unwrap();
    env.start();
    let step = env.step(Action::RotateX);
    assert!(!step.done);
    let selected = env.selected().unwrap();
    assert_eq!(selected.geometry, BoxGeometry::new(50.0, 100.0, 70.0));
    assert!(selected.rotation.rx);

    env.step(Action::RotateX);
    let selected = env.selected().unwrap();
    assert_eq!(selected.geometry, BoxGeometry::new(100.0, 50.0, 70.0));
    assert!(!selected.rotation.rx);
}

#[test]
fn stacking_next_to_the_corner_box() {
    let mut env = BoxPileEnv::from_json_str(CORNER).unwrap();
    env.start();
    // Slide the cube over the corner box: its footprint becomes [86, 186] on both axes.
    for _ in 0..364 {
        assert!(!env.step(Action::MinusX).done);
        assert!(!env.step(Action::MinusZ).done);
    }
    let selected = env.selected().unwrap();
    assert_eq!(selected.pose, Pose::new(136.0, 50.0, 136.0));

    let step = env.step(Action::Push);
    assert!(!step.done);
    assert!(env.is_idle());

    let placed = env
        .catalog()
        .iter_placed()
        .find(|p| env.catalog().label(p.id) == Some("1"))
        .unwrap();
    assert_eq!(placed.pose.y, 200.0);

    // Cells fully under the cube now report its top.
    let height = |cell| env.relief().height(cell).unwrap();
    assert!((height((10, 10)) - 250.0).abs() < EPSILON);
    assert!((height((15, 15)) - 250.0).abs() < EPSILON);
    // The cube covers 4/10 of cell 8 along each axis; the corner box covers all of it.
    let shared = 0.16 * 250.0 + 0.84 * 150.0;
    assert!((height((8, 8)) - shared).abs() < 1e-6);

    // Reward: resting volume against what was actually under the cube.
    let resting = 100.0 * 150.0 * 100.0;
    let filled = 50.0 * 150.0 * 50.0;
    let expected = resting / 10.0 * (resting - filled);
    assert!((step.reward - expected).abs() < 1e-3);
}

#[test]
fn observation_survives_a_json_roundtrip() {
    let mut env = BoxPileEnv::from_json_str(CORNER).unwrap();
    let obs = env.start();
    let json = serde_json::to_string(&obs).unwrap();
    assert!(json.starts_with(r#"{"r":[[0,150.0,0],"#));
    let back: boxpile_env::Observation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, obs);
    assert_eq!(env.container(), Extent3::new(1000.0, 1500.0, 1000.0));
}
