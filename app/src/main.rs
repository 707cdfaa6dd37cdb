mod preview;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hexgrove::{NoisePolicy, PresetRegistry, TerrainConfig, build_terrain, generate_plant};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Procedural plants and hex terrain", long_about = None)]
struct Cli {
    /// Override log level (trace|debug|info|warn|error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available plant presets
    Presets {
        /// Extra presets (TOML) layered over the built-in ones
        #[arg(long)]
        presets: Option<PathBuf>,
    },
    /// Grow a plant from a preset
    Plant {
        #[arg(short, long, default_value = "tree")]
        preset: String,
        /// Fix the alternative draws; random when omitted
        #[arg(long)]
        seed: Option<u64>,
        /// Override the preset's iteration count
        #[arg(short, long)]
        iterations: Option<u32>,
        #[arg(long)]
        presets: Option<PathBuf>,
        /// Write a PNG preview here
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 512)]
        size: u32,
    },
    /// Build the hex terrain mesh
    Terrain {
        /// Terrain configuration (TOML); defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Give every tile its own noise field
        #[arg(long)]
        per_cell: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 512)]
        size: u32,
    },
}

fn load_registry(extra: Option<&Path>) -> Result<PresetRegistry> {
    let mut registry = PresetRegistry::builtin();
    if let Some(path) = extra {
        let src = fs::read_to_string(path)
            .with_context(|| format!("reading presets from {}", path.display()))?;
        let custom = PresetRegistry::from_toml_str(&src)
            .with_context(|| format!("parsing presets in {}", path.display()))?;
        info!(count = custom.len(), "loaded custom presets");
        registry.extend(custom);
    }
    Ok(registry)
}

fn load_terrain_config(path: Option<&Path>) -> Result<TerrainConfig> {
    match path {
        Some(path) => {
            let src = fs::read_to_string(path)
                .with_context(|| format!("reading terrain config {}", path.display()))?;
            TerrainConfig::from_toml_str(&src)
                .with_context(|| format!("parsing terrain config {}", path.display()))
        }
        None => Ok(TerrainConfig::default()),
    }
}

fn run_plant(
    name: &str,
    seed: Option<u64>,
    iterations: Option<u32>,
    presets: Option<&Path>,
    out: Option<&Path>,
    size: u32,
) -> Result<()> {
    let registry = load_registry(presets)?;
    let mut preset = registry.require(name)?.clone();
    if let Some(n) = iterations {
        preset.grammar = preset.grammar.with_iterations(n);
    }
    if preset.grammar.iterations() > 10 {
        warn!(
            iterations = preset.grammar.iterations(),
            "expansion grows exponentially, this may take a while"
        );
    }

    let start = Instant::now();
    let plant = generate_plant(&preset, seed)?;
    info!(
        preset = name,
        branches = plant.branches.len(),
        leaves = plant.leaves.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "plant generated"
    );

    if let Some(path) = out {
        preview::render_plant(&plant, size)
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("saved plant preview to {}", path.display());
    }
    Ok(())
}

fn run_terrain(
    config: Option<&Path>,
    seed: Option<u64>,
    per_cell: bool,
    out: Option<&Path>,
    size: u32,
) -> Result<()> {
    let mut config = load_terrain_config(config)?;
    if let Some(seed) = seed {
        config.noise.seed = seed;
    }
    if per_cell {
        config.noise.policy = NoisePolicy::PerCell;
    }

    let start = Instant::now();
    let terrain = build_terrain(&config)?;
    info!(
        columns = terrain.column_count(),
        vertices = terrain.mesh.vertex_count(),
        tallest = terrain.max_column_height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "terrain generated"
    );

    if let Some(path) = out {
        preview::render_terrain(&terrain, config.max_height as f32, config.hex_radius, size)
            .save(path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("saved terrain preview to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --log-level beats RUST_LOG
    let filter = match cli.log_level.as_deref() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Presets { presets } => {
            let registry = load_registry(presets.as_deref())?;
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(())
        }
        Command::Plant {
            preset,
            seed,
            iterations,
            presets,
            out,
            size,
        } => run_plant(
            &preset,
            seed,
            iterations,
            presets.as_deref(),
            out.as_deref(),
            size,
        ),
        Command::Terrain {
            config,
            seed,
            per_cell,
            out,
            size,
        } => run_terrain(config.as_deref(), seed, per_cell, out.as_deref(), size),
    }
}
