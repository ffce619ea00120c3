//! Trajectory Tests - Idle Capture, Free Fall, Rebound Budget and Group Follow
//!
//! Drives TrajectorySimulator against the in-memory SandboxWorld host and
//! checks the frame-by-frame behavior of the parent and its followers.

use glam::Vec3;
use gravity_module_engine::world::SandboxWorld;
use gravity_module_engine::{
    ContactEvent, FrameContext, FrameOutcome, ObjectId, TrajectoryConfig, TrajectoryError,
    TrajectoryHost, TrajectorySimulator,
};

const DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 100_000;

fn flat_world_with_parent(position: Vec3) -> (SandboxWorld, ObjectId) {
    let mut world = SandboxWorld::flat(0.0);
    let parent = world.spawn(position);
    (world, parent)
}

/// Root at (0, 2, 0) plus two followers at different heights.
fn grouped_world() -> (SandboxWorld, ObjectId, Vec<ObjectId>) {
    let mut world = SandboxWorld::flat(0.0);
    let parent = world.spawn(Vec3::new(0.0, 2.0, 0.0));
    let a = world.spawn(Vec3::new(3.0, 1.0, 0.0));
    let b = world.spawn(Vec3::new(-3.0, 4.0, 1.0));
    world.create_group(parent, &[a, b]);
    (world, parent, vec![a, b])
}

fn position(world: &SandboxWorld, id: ObjectId) -> Vec3 {
    world.position(id).expect("object exists")
}

/// Run until the parent reports a contact matching `pred`.
fn run_until_contact(
    sim: &mut TrajectorySimulator,
    world: &mut SandboxWorld,
    frame: FrameContext,
    pred: impl Fn(ContactEvent) -> bool,
) -> (usize, Vec3) {
    for i in 0..MAX_FRAMES {
        if let FrameOutcome::Stepped {
            position,
            contact: Some(event),
            ..
        } = sim.update(world, frame).unwrap()
        {
            if pred(event) {
                return (i, position);
            }
        }
    }
    panic!("no matching contact within {MAX_FRAMES} frames");
}

// ============================================================================
// Idle Capture
// ============================================================================

#[test]
fn test_idle_update_tracks_manual_moves() {
    let (mut world, parent) = flat_world_with_parent(Vec3::new(0.0, 1.0, 0.0));
    let mut sim = TrajectorySimulator::new(parent);

    for p in [
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(-4.0, 0.5, 8.0),
        Vec3::new(0.0, 100.0, 0.0),
    ] {
        world.set_position(parent, p);
        let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();

        assert_eq!(outcome, FrameOutcome::RestCaptured(p));
        assert_eq!(sim.state().rest_position, p);
        assert_eq!(position(&world, parent), p, "idle update must not move the parent");
    }
}

#[test]
fn test_idle_capture_ignores_pause() {
    let (mut world, parent) = flat_world_with_parent(Vec3::ONE);
    let mut sim = TrajectorySimulator::new(parent);

    world.set_position(parent, Vec3::new(5.0, 5.0, 5.0));
    sim.update(&mut world, FrameContext::paused(DT)).unwrap();
    assert_eq!(sim.state().rest_position, Vec3::new(5.0, 5.0, 5.0));
}

// ============================================================================
// Free Fall
// ============================================================================

#[test]
fn test_free_fall_matches_euler_recurrence() {
    let start = Vec3::new(0.0, 1000.0, 0.0);
    let (mut world, parent) = flat_world_with_parent(start);
    let gravity = 9.807;
    let (vx, vz) = (2.0, -1.5);

    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            gravity,
            initial_speed: Vec3::new(vx, 0.0, vz),
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    let steps = 120;
    let mut expected = start;
    let mut v: f32 = 0.0;
    for _ in 0..steps {
        let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();
        assert!(matches!(outcome, FrameOutcome::Stepped { contact: None, .. }));

        expected.x += DT * vx;
        expected.z += DT * vz;
        v = v - gravity * DT;
        expected.y += DT * v;
    }

    assert_eq!(position(&world, parent), expected);
    assert_eq!(sim.state().vertical_velocity, v);

    let closed_form = -gravity * DT * steps as f32;
    assert!(
        (v - closed_form).abs() < 1e-3,
        "velocity {v} should be close to -g*dt*N = {closed_form}"
    );
}

#[test]
fn test_paused_and_hidden_frames_freeze_time() {
    let (mut world, parent) = flat_world_with_parent(Vec3::new(0.0, 50.0, 0.0));
    let mut sim = TrajectorySimulator::new(parent);
    sim.activate(&mut world).unwrap();

    sim.update(&mut world, FrameContext::running(DT)).unwrap();
    let after_one = position(&world, parent);
    let velocity = sim.state().vertical_velocity;

    for _ in 0..10 {
        assert_eq!(
            sim.update(&mut world, FrameContext::paused(DT)).unwrap(),
            FrameOutcome::Frozen
        );
        assert_eq!(
            sim.update(&mut world, FrameContext::hidden(DT)).unwrap(),
            FrameOutcome::Frozen
        );
    }

    assert_eq!(position(&world, parent), after_one);
    assert_eq!(sim.state().vertical_velocity, velocity);
    assert_eq!(sim.state().rest_position, Vec3::new(0.0, 50.0, 0.0));
}

// ============================================================================
// Rebound Budget
// ============================================================================

#[test]
fn test_zero_budget_without_repeat_stops_at_first_contact() {
    let start = Vec3::new(0.0, 1.0, 0.0);
    let (mut world, parent) = flat_world_with_parent(start);
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            rebound_count: 0,
            repeat_on_finish: false,
            initial_speed: Vec3::new(1.0, 0.0, 0.0),
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    // Replay the recurrence alongside to know the contact-adjusted height
    let mut y = start.y;
    let mut v: f32 = 0.0;
    let mut contact_position = None;
    for _ in 0..MAX_FRAMES {
        let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();
        v = v - 9.807 * DT;
        y += DT * v;
        if let FrameOutcome::Stepped {
            position,
            contact: Some(event),
            ..
        } = outcome
        {
            assert_eq!(event, ContactEvent::Stopped);
            y -= DT * v;
            contact_position = Some(position);
            break;
        }
    }

    let frozen = contact_position.expect("parent should reach the ground");
    assert!(!sim.is_active());
    assert_eq!(frozen.y, y);
    assert!(frozen.y >= 0.0);
    assert!(frozen.x > 0.0, "horizontal drift still applied on contact frame");
    assert_eq!(position(&world, parent), frozen);

    // Idle again: rest position re-captured at the frozen spot
    let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();
    assert_eq!(outcome, FrameOutcome::RestCaptured(frozen));
    assert_eq!(sim.state().rest_position, frozen);
    assert_eq!(position(&world, parent), frozen);
}

#[test]
fn test_exhausted_budget_with_repeat_relaunches_exactly() {
    let start = Vec3::new(0.0, 1.0, 0.0);
    let (mut world, parent) = flat_world_with_parent(start);
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            rebound_count: 2,
            repeat_on_finish: true,
            initial_speed: Vec3::new(0.5, 2.0, 0.0),
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    let mut rebounds = Vec::new();
    let mut relaunched_at = None;
    for _ in 0..MAX_FRAMES {
        if let FrameOutcome::Stepped {
            position,
            contact: Some(event),
            ..
        } = sim.update(&mut world, FrameContext::running(DT)).unwrap()
        {
            match event {
                ContactEvent::Rebounded { remaining } => rebounds.push(remaining),
                ContactEvent::Relaunched => {
                    relaunched_at = Some(position);
                    break;
                }
                ContactEvent::Stopped => panic!("repeat is on, must not stop"),
            }
        }
    }

    assert_eq!(rebounds, vec![1, 0]);
    assert_eq!(relaunched_at, Some(start));
    assert_eq!(position(&world, parent), start);
    assert_eq!(sim.state().vertical_velocity, 2.0);
    assert_eq!(sim.state().remaining_rebounds, 2);
    assert!(sim.is_active());
}

#[test]
fn test_unlimited_lossy_rebounds_terminate_and_stop() {
    let (mut world, parent) = flat_world_with_parent(Vec3::new(0.0, 2.0, 0.0));
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            rebound_count: -1,
            rebound_factor: 0.5,
            repeat_on_finish: false,
            initial_speed: Vec3::new(0.0, -1.0, 0.0),
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    run_until_contact(&mut sim, &mut world, FrameContext::running(0.01), |e| {
        e == ContactEvent::Stopped
    });
    assert!(!sim.is_active());
    assert!(sim.state().vertical_velocity.abs() < 0.1);
    // Unlimited budget never decrements
    assert_eq!(sim.state().remaining_rebounds, -1);
}

#[test]
fn test_unlimited_lossy_rebounds_terminate_and_relaunch() {
    let start = Vec3::new(0.0, 2.0, 0.0);
    let (mut world, parent) = flat_world_with_parent(start);
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            rebound_count: -1,
            rebound_factor: 0.5,
            repeat_on_finish: true,
            initial_speed: Vec3::new(0.0, -1.0, 0.0),
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    let (_, relaunch_position) =
        run_until_contact(&mut sim, &mut world, FrameContext::running(0.01), |e| {
            e == ContactEvent::Relaunched
        });
    assert_eq!(relaunch_position, start);
    assert_eq!(sim.state().vertical_velocity, -1.0);
    assert_eq!(sim.state().remaining_rebounds, -1);
}

#[test]
fn test_elastic_unlimited_rebounds_keep_going() {
    let (mut world, parent) = flat_world_with_parent(Vec3::new(0.0, 1.0, 0.0));
    let mut sim = TrajectorySimulator::new(parent);
    sim.activate(&mut world).unwrap();

    let mut contacts = 0;
    for _ in 0..2_000 {
        if let FrameOutcome::Stepped {
            contact: Some(event),
            ..
        } = sim.update(&mut world, FrameContext::running(DT)).unwrap()
        {
            assert!(matches!(event, ContactEvent::Rebounded { remaining: -1 }));
            contacts += 1;
        }
    }
    assert!(contacts >= 3, "expected several bounces, got {contacts}");
    assert!(sim.is_active());
}

#[test]
fn test_deactivate_returns_to_rest() {
    let start = Vec3::new(1.0, 3.0, -2.0);
    let (mut world, parent) = flat_world_with_parent(start);
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            initial_speed: Vec3::new(4.0, 1.0, 4.0),
            ..TrajectoryConfig::default()
        },
    );
    sim.update(&mut world, FrameContext::running(DT)).unwrap();
    sim.activate(&mut world).unwrap();
    for _ in 0..30 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }
    assert_ne!(position(&world, parent), start);

    sim.deactivate(&mut world).unwrap();
    assert!(!sim.is_active());
    assert_eq!(position(&world, parent), start);
}

// ============================================================================
// Group Follow
// ============================================================================

#[test]
fn test_enable_group_follow_captures_siblings() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::new(parent);
    sim.config.initial_speed = Vec3::new(0.0, 3.0, 0.0);

    sim.set_group_follows(&mut world, true).unwrap();
    assert_eq!(
        sim.state().follower_rest_positions,
        vec![position(&world, siblings[0]), position(&world, siblings[1])]
    );
    assert_eq!(sim.state().follower_velocities, vec![3.0, 3.0]);
}

#[test]
fn test_followers_move_with_own_velocity() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            initial_speed: Vec3::new(1.0, 0.0, 0.0),
            group_follows: true,
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    let before: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();
    // Sibling a starts 1m up and hits the ground before the parent
    for _ in 0..40 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }

    for (i, &s) in siblings.iter().enumerate() {
        let now = position(&world, s);
        assert!(now.x > before[i].x, "follower {i} drifts horizontally");
        assert_ne!(now.y, before[i].y, "follower {i} moves vertically");
    }
    let velocities = &sim.state().follower_velocities;
    assert_ne!(velocities[0], velocities[1]);
}

#[test]
fn test_follower_positional_reset_restores_capture() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::new(parent);
    sim.set_group_follows(&mut world, true).unwrap();
    let captured: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();

    sim.activate(&mut world).unwrap();
    for _ in 0..25 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }
    let velocities = sim.state().follower_velocities.clone();

    sim.reset_follower_positions(&mut world).unwrap();
    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), captured[i]);
    }
    assert_eq!(sim.state().follower_velocities, velocities, "velocities untouched");
}

#[test]
fn test_follower_velocity_reset_restores_launch_speed() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::new(parent);
    sim.config.initial_speed = Vec3::new(0.0, 1.25, 0.0);
    sim.set_group_follows(&mut world, true).unwrap();
    sim.activate(&mut world).unwrap();
    for _ in 0..25 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }
    let moved: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();

    sim.reset_follower_velocities(&world).unwrap();
    assert_eq!(sim.state().follower_velocities, vec![1.25, 1.25]);
    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), moved[i], "positions untouched");
    }
}

#[test]
fn test_relaunch_resets_followers() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            rebound_count: 0,
            repeat_on_finish: true,
            initial_speed: Vec3::new(0.0, 0.5, 0.0),
            group_follows: true,
            ..TrajectoryConfig::default()
        },
    );
    let captured: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();
    sim.activate(&mut world).unwrap();

    run_until_contact(&mut sim, &mut world, FrameContext::running(DT), |e| {
        e == ContactEvent::Relaunched
    });

    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), captured[i]);
    }
    assert_eq!(sim.state().follower_velocities, vec![0.5, 0.5]);
}

#[test]
fn test_followers_do_not_consume_budget() {
    let (mut world, parent, _) = grouped_world();
    // Parent high up; followers touch the ground long before it does
    world.set_position(parent, Vec3::new(0.0, 500.0, 0.0));
    let mut sim = TrajectorySimulator::with_config(
        parent,
        TrajectoryConfig {
            rebound_count: 3,
            group_follows: true,
            ..TrajectoryConfig::default()
        },
    );
    sim.activate(&mut world).unwrap();

    for _ in 0..300 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }
    assert_eq!(sim.state().remaining_rebounds, 3);
    assert!(sim.is_active());
}

#[test]
fn test_deactivate_resets_followers() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::new(parent);
    sim.config.group_follows = true;
    let captured: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();

    sim.activate(&mut world).unwrap();
    for _ in 0..20 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }
    sim.deactivate(&mut world).unwrap();

    assert_eq!(position(&world, parent), Vec3::new(0.0, 2.0, 0.0));
    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), captured[i]);
    }
}

/// Grouped world mid-flight whose group then gains a third member.
fn grown_group_mid_flight() -> (SandboxWorld, TrajectorySimulator, Vec<ObjectId>, ObjectId) {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::new(parent);
    sim.config.group_follows = true;
    sim.activate(&mut world).unwrap();
    for _ in 0..10 {
        sim.update(&mut world, FrameContext::running(DT)).unwrap();
    }

    let late = world.spawn(Vec3::new(9.0, 9.0, 9.0));
    let mut members = siblings.clone();
    members.push(late);
    world.create_group(parent, &members);
    (world, sim, siblings, late)
}

#[test]
fn test_membership_change_skips_followers_but_parent_keeps_going() {
    let (mut world, mut sim, siblings, late) = grown_group_mid_flight();
    let parent = sim.parent();

    let parent_before = position(&world, parent);
    let followers_before: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();
    let late_before = position(&world, late);

    let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();
    assert!(matches!(
        outcome,
        FrameOutcome::Stepped {
            followers_skipped: true,
            ..
        }
    ));
    assert!(position(&world, parent).y < parent_before.y, "parent still falls");
    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), followers_before[i], "followers untouched");
    }
    assert_eq!(position(&world, late), late_before);

    let err = sim.reset_follower_positions(&mut world).unwrap_err();
    assert!(matches!(
        err,
        TrajectoryError::FollowerMismatch {
            captured: 2,
            velocities: 2,
            siblings: 3,
        }
    ));
    assert!(sim.reset_follower_velocities(&world).is_err());

    // Recapturing brings the module back in sync
    assert_eq!(sim.capture_followers(&world).unwrap(), 3);
    let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();
    assert!(matches!(
        outcome,
        FrameOutcome::Stepped {
            followers_skipped: false,
            ..
        }
    ));
    assert_ne!(position(&world, late), late_before);
}

#[test]
fn test_deactivate_after_membership_change_still_stops() {
    let (mut world, mut sim, siblings, late) = grown_group_mid_flight();
    let parent = sim.parent();
    let followers_before: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();

    let err = sim.deactivate(&mut world).unwrap_err();
    assert!(matches!(err, TrajectoryError::FollowerMismatch { siblings: 3, .. }));

    assert!(!sim.is_active());
    assert_eq!(position(&world, parent), Vec3::new(0.0, 2.0, 0.0));
    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), followers_before[i]);
    }
    assert_eq!(position(&world, late), Vec3::new(9.0, 9.0, 9.0));

    // Idle from here on, no more errors
    let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();
    assert_eq!(outcome, FrameOutcome::RestCaptured(Vec3::new(0.0, 2.0, 0.0)));
    sim.deactivate(&mut world).unwrap();
}

#[test]
fn test_group_follow_switched_on_while_active_captures_on_next_frame() {
    let (mut world, parent, siblings) = grouped_world();
    let mut sim = TrajectorySimulator::new(parent);
    sim.activate(&mut world).unwrap();
    sim.update(&mut world, FrameContext::running(DT)).unwrap();

    let captured: Vec<Vec3> = siblings.iter().map(|&s| position(&world, s)).collect();
    sim.config.group_follows = true;
    let outcome = sim.update(&mut world, FrameContext::running(DT)).unwrap();

    assert!(matches!(
        outcome,
        FrameOutcome::Stepped {
            followers_skipped: false,
            ..
        }
    ));
    assert_eq!(sim.state().follower_rest_positions, captured);
    for (i, &s) in siblings.iter().enumerate() {
        assert!(position(&world, s).y < captured[i].y);
    }

    sim.deactivate(&mut world).unwrap();
    for (i, &s) in siblings.iter().enumerate() {
        assert_eq!(position(&world, s), captured[i]);
    }
}
