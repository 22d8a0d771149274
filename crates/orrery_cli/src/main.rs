//! Orrery CLI
//!
//! Run, check and inspect solar system simulations.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orrery_sim::{FileSource, Orrery, PositionSource, SimConfig, CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod headless;

use headless::{RunPlan, ScheduledEvent};

#[derive(Parser)]
#[command(name = "orrery")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Trajectory-driven solar system simulation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation headless and report the final frame
    Run {
        /// Project directory (holds orrery.toml and the data directory)
        #[arg(default_value = ".")]
        dir: String,

        /// Config file (defaults to <dir>/orrery.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of frames to run
        #[arg(short, long, default_value = "600")]
        frames: u64,

        /// Simulated frame rate
        #[arg(long, default_value = "60")]
        fps: f64,

        /// Override the initial speed factor
        #[arg(short, long)]
        speed: Option<f64>,

        /// Follow a body with the camera
        #[arg(short, long)]
        track: Option<String>,

        /// Scheduled control, FRAME:EVENT (e.g. 120:pause, 30:scrub=500)
        #[arg(short, long = "event")]
        events: Vec<ScheduledEvent>,

        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Viewport height in pixels
        #[arg(long, default_value = "720")]
        height: u32,

        /// Print the final scene snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the config and load every trajectory
    Check {
        /// Project directory
        #[arg(default_value = ".")]
        dir: String,

        /// Config file (defaults to <dir>/orrery.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write a default orrery.toml
    Init {
        /// Project directory
        #[arg(default_value = ".")]
        dir: String,

        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// Show version and preset information
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            dir,
            config,
            frames,
            fps,
            speed,
            track,
            events,
            width,
            height,
            json,
        } => {
            let options = RunOptions {
                frames,
                fps,
                speed,
                track,
                events,
                width,
                height,
                json,
            };
            cmd_run(Path::new(&dir), config.as_deref(), options)
        }

        Commands::Check { dir, config } => cmd_check(Path::new(&dir), config.as_deref()),

        Commands::Init { dir, force } => cmd_init(Path::new(&dir), force),

        Commands::Info => cmd_info(),
    }
}

struct RunOptions {
    frames: u64,
    fps: f64,
    speed: Option<f64>,
    track: Option<String>,
    events: Vec<ScheduledEvent>,
    width: u32,
    height: u32,
    json: bool,
}

/// Load the config and the directory its data paths are relative to
fn load_config(dir: &Path, config: Option<&Path>) -> Result<(SimConfig, PathBuf)> {
    match config {
        Some(path) => {
            let config = SimConfig::load(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            Ok((config, root))
        }
        None => {
            let config = SimConfig::load_from_dir(dir)
                .with_context(|| format!("Failed to load config from {}", dir.display()))?;
            Ok((config, dir.to_path_buf()))
        }
    }
}

fn cmd_run(dir: &Path, config: Option<&Path>, options: RunOptions) -> Result<()> {
    let (mut config, root) = load_config(dir, config)?;
    if let Some(speed) = options.speed {
        config.playback.speed = speed;
    }
    if options.track.is_some() {
        config.camera.track = options.track;
    }

    let source = FileSource::from_config(&config.data, &root);
    let mut orrery = Orrery::new(&config, &source).context("Failed to build simulation")?;
    orrery.set_viewport(options.width, options.height);

    info!(
        "Running {} bodies for {} frames at {} fps",
        orrery.scene().len(),
        options.frames,
        options.fps
    );

    let plan = RunPlan {
        frames: options.frames,
        fps: options.fps,
        events: options.events,
    };
    let summary = headless::run(&mut orrery, &plan);

    info!(
        "Finished at frame {} (sample {}, time {:.2}, {} loops)",
        summary.frames, summary.last.sample_index, summary.last.time, summary.loops
    );

    let snapshot = orrery.snapshot();
    if options.json {
        let json =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "frame {}  sample {}  time {:.3}  speed {}  {}",
        snapshot.frame,
        snapshot.sample_index,
        snapshot.time,
        snapshot.speed,
        if snapshot.paused { "paused" } else { "running" }
    );
    let eye = snapshot.camera.eye;
    let target = snapshot.camera.target;
    println!(
        "camera eye ({:.2}, {:.2}, {:.2})  target ({:.2}, {:.2}, {:.2})",
        eye.x, eye.y, eye.z, target.x, target.y, target.z
    );
    println!();
    for (name, body) in &snapshot.bodies {
        let sample = match body.sample {
            Some(sample) => format!("{}/{}", sample, body.samples),
            None => "-".to_string(),
        };
        println!(
            "  {:<10} {:>10}  ({:>10.2}, {:>10.2}, {:>10.2})",
            name, sample, body.position.x, body.position.y, body.position.z
        );
    }

    Ok(())
}

fn cmd_check(dir: &Path, config: Option<&Path>) -> Result<()> {
    let (config, root) = load_config(dir, config)?;
    let source = FileSource::from_config(&config.data, &root);

    info!(
        "Checking {} bodies against {}",
        config.bodies.len(),
        source.dir().display()
    );

    let mut failed = 0;
    for body in &config.bodies {
        match source.load(body) {
            Ok(samples) if body.trajectory.is_some() && samples.is_empty() => {
                warn!("{}: trajectory has no samples", body.name);
            }
            Ok(samples) => println!("  {:<10} {:>6} samples", body.name, samples.len()),
            Err(err) => {
                warn!("{}: {}", body.name, err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} trajectories failed to load",
            failed,
            config.bodies.len()
        );
    }

    info!("Config OK");
    Ok(())
}

fn cmd_init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            path.display()
        );
    }

    let content = SimConfig::default()
        .to_toml()
        .context("Failed to serialize default config")?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}

fn cmd_info() -> Result<()> {
    let config = SimConfig::default();

    println!("Orrery");
    println!("======");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Defaults:");
    println!("  - config file: {}", CONFIG_FILE);
    println!("  - data directory: {}", config.data.dir);
    println!("  - coordinate scale: {}", config.data.scale);
    println!(
        "  - time scale: {} samples/ms at speed {}",
        config.playback.time_scale, config.playback.speed
    );
    println!(
        "  - camera: radius {}, fov {} deg, clip {}..{}",
        config.camera.radius, config.camera.fov_degrees, config.camera.near, config.camera.far
    );
    println!();
    println!("Preset bodies:");
    for body in &config.bodies {
        println!(
            "  - {:<10} scale {:<5} spin {:<6} {}",
            body.name,
            body.scale,
            body.spin,
            body.trajectory.as_deref().unwrap_or("(fixed)")
        );
    }

    Ok(())
}
