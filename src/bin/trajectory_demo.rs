//! Trajectory Demo
//!
//! Run with: `cargo run --bin trajectory_demo -- [options]`
//!
//! Headless run of the gravity module against an in-memory world with a
//! gently sloped ground. Prints the parent's trajectory, then saves the
//! module to a JSON snapshot and restores it into a fresh simulator.
//!
//! Options:
//! - `--frames N`: number of 60 Hz frames to simulate (default 240)
//! - `--group`: add three followers to the parent's group
//! - `--config PATH`: load trajectory parameters from a JSON file
//! - `--snapshot PATH`: where to write the snapshot (default: temp dir)
//!
//! Library events go to stderr; set `RUST_LOG=debug` to see activation,
//! relaunch and follower capture.

use std::path::PathBuf;

use glam::Vec3;
use tracing_subscriber::EnvFilter;

use gravity_module_engine::game::persistence::{load_module_data, save_module_data};
use gravity_module_engine::world::SlopedGround;
use gravity_module_engine::{
    ContactEvent, FrameContext, FrameOutcome, SandboxWorld, TrajectoryConfig, TrajectoryError,
    TrajectorySimulator,
};

// ============================================================================
// OPTIONS
// ============================================================================

struct DemoOptions {
    frames: usize,
    group: bool,
    config: Option<PathBuf>,
    snapshot: PathBuf,
}

impl DemoOptions {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Self {
            frames: 240,
            group: false,
            config: None,
            snapshot: std::env::temp_dir().join("trajectory_demo_snapshot.json"),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--frames" => {
                    let value = args.next().ok_or("--frames needs a value")?;
                    options.frames = value
                        .parse()
                        .map_err(|e| format!("invalid --frames '{value}': {e}"))?;
                }
                "--group" => options.group = true,
                "--config" => {
                    options.config = Some(args.next().ok_or("--config needs a path")?.into());
                }
                "--snapshot" => {
                    options.snapshot = args.next().ok_or("--snapshot needs a path")?.into();
                }
                other => return Err(format!("unknown option '{other}'")),
            }
        }
        Ok(options)
    }
}

fn load_config(options: &DemoOptions) -> Result<TrajectoryConfig, TrajectoryError> {
    let Some(path) = &options.config else {
        return Ok(TrajectoryConfig {
            initial_speed: Vec3::new(1.5, 6.0, 0.0),
            rebound_count: 4,
            rebound_factor: 0.7,
            ..TrajectoryConfig::default()
        });
    };
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// `RUST_LOG` directives if given and valid, otherwise `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

const DEFAULT_LOG_FILTER: &str = "info";

// ============================================================================
// RUN
// ============================================================================

fn run(options: &DemoOptions) -> Result<(), TrajectoryError> {
    let mut world = SandboxWorld::new(SlopedGround::new(0.0, 0.05, 0.0));
    let parent = world.spawn(Vec3::new(0.0, 3.0, 0.0));

    let mut sim = TrajectorySimulator::with_config(parent, load_config(options)?);

    if options.group {
        let followers: Vec<_> = (1..=3)
            .map(|i| world.spawn(Vec3::new(0.0, 3.0 + i as f32, 2.0 * i as f32)))
            .collect();
        world.create_group(parent, &followers);
        sim.set_group_follows(&mut world, true)?;
    }

    // One idle frame captures the rest position
    sim.update(&mut world, FrameContext::running(0.0))?;
    sim.activate(&mut world)?;
    println!(
        "Launching from {:?} (followers: {})",
        sim.state().rest_position,
        sim.state().follower_count()
    );

    let dt = 1.0 / 60.0;
    for frame in 0..options.frames {
        match sim.update(&mut world, FrameContext::running(dt))? {
            FrameOutcome::Stepped {
                position,
                contact: Some(event),
                ..
            } => match event {
                ContactEvent::Rebounded { remaining } => println!(
                    "frame {frame:4}: rebound at ({:.2}, {:.2}, {:.2}), {remaining} left",
                    position.x, position.y, position.z
                ),
                ContactEvent::Stopped => {
                    println!("frame {frame:4}: stopped at {position:?}");
                    break;
                }
                ContactEvent::Relaunched => println!("frame {frame:4}: relaunched"),
            },
            FrameOutcome::Stepped { position, .. } if frame % 30 == 0 => {
                println!("frame {frame:4}: y = {:.3}", position.y);
            }
            _ => {}
        }
    }

    let data = sim.export();
    save_module_data(&options.snapshot, &data)?;
    println!("Saved {} keys to {}", data.len(), options.snapshot.display());

    let mut restored = TrajectorySimulator::new(parent);
    restored.import(&load_module_data(&options.snapshot)?)?;
    println!(
        "Restored: active = {}, remaining rebounds = {}, vy = {:.3}",
        restored.is_active(),
        restored.state().remaining_rebounds,
        restored.state().vertical_velocity
    );
    Ok(())
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    let env_filter = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(env_filter.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    println!("=== Gravity Module Trajectory Demo ===");

    let options = match DemoOptions::from_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Demo failed: {e}");
        std::process::exit(1);
    }
}
