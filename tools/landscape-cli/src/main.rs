//! `landscape` — render point datasets to PNG and compare frames.
//!
//! Usage:
//!   landscape render <points.json> -o <out.png> [--width W --height H] [--config cfg.json]
//!                    [--ramp ramp.png] [--sprite sprite.png] [--sigma S] [--radius R] ...
//!   landscape compare <a.png> <b.png> [-d diff.png] [-s sidebyside.png] [--tolerance N]
//!   landscape ramp -o <ramp.png>

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use landscape_cli::{compare_surfaces, generate_diff_image, generate_sidebyside};
use landscape_render::assets::{load_ramp_or, load_sprite, load_surface, save_ramp_strip, save_surface};
use landscape_render::{
    Compositor, DensityRamp, EdgePolicy, MarkerShape, PointDataset, RenderConfig,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "landscape")]
#[command(about = "Point-density landscape renderer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a point dataset to a PNG
    Render {
        /// Dataset JSON: an array of {"x", "y", "color"?} records
        points: PathBuf,
        #[arg(short, long, default_value = "landscape.png")]
        output: PathBuf,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "600")]
        height: u32,
        /// Render configuration JSON; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Density ramp strip (1xK or Kx1 PNG); the built-in ramp is used if absent or unreadable
        #[arg(long)]
        ramp: Option<PathBuf>,
        /// Marker sprite for `--marker textured`
        #[arg(long)]
        sprite: Option<PathBuf>,
        #[arg(long)]
        sigma: Option<f64>,
        #[arg(long)]
        radius: Option<f64>,
        #[arg(long, value_enum)]
        marker: Option<MarkerArg>,
        #[arg(long, value_enum)]
        edge: Option<EdgeArg>,
        /// Present the marker pass only, skipping the blur
        #[arg(long)]
        particles_only: bool,
    },

    /// Compare two PNG frames pixel by pixel; exits 1 if they differ
    Compare {
        a: PathBuf,
        b: PathBuf,
        /// Write a diff image
        #[arg(short, long)]
        diff: Option<PathBuf>,
        /// Write an [A | diff | B] image
        #[arg(short, long)]
        side_by_side: Option<PathBuf>,
        /// Largest per-channel difference still counted as equal
        #[arg(long, default_value = "0")]
        tolerance: u8,
    },

    /// Write the built-in density ramp as a strip PNG
    Ramp {
        #[arg(short, long, default_value = "ramp.png")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MarkerArg {
    Disk,
    Square,
    Textured,
}

impl From<MarkerArg> for MarkerShape {
    fn from(m: MarkerArg) -> Self {
        match m {
            MarkerArg::Disk => MarkerShape::Disk,
            MarkerArg::Square => MarkerShape::Square,
            MarkerArg::Textured => MarkerShape::Textured,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeArg {
    Clamp,
    Repeat,
    Mirror,
    Transparent,
}

impl From<EdgeArg> for EdgePolicy {
    fn from(e: EdgeArg) -> Self {
        match e {
            EdgeArg::Clamp => EdgePolicy::Clamp,
            EdgeArg::Repeat => EdgePolicy::Repeat,
            EdgeArg::Mirror => EdgePolicy::Mirror,
            EdgeArg::Transparent => EdgePolicy::Transparent,
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render {
            points,
            output,
            width,
            height,
            config,
            ramp,
            sprite,
            sigma,
            radius,
            marker,
            edge,
            particles_only,
        } => {
            let mut cfg = match config {
                Some(path) => RenderConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => RenderConfig::default(),
            };
            if let Some(s) = sigma {
                cfg.sigma = s;
            }
            if let Some(r) = radius {
                cfg.radius = r;
            }
            if let Some(m) = marker {
                cfg.marker = m.into();
            }
            if let Some(e) = edge {
                cfg.edge_policy = e.into();
            }
            cfg.particles_only |= particles_only;
            cfg.validate()?;

            let dataset = PointDataset::load(&points)
                .with_context(|| format!("loading dataset {}", points.display()))?;
            let ramp = match ramp {
                Some(path) => load_ramp_or(path, DensityRamp::landscape()),
                None => DensityRamp::landscape(),
            };

            let mut compositor = Compositor::new(dataset, ramp, width, height)?;
            if let Some(path) = sprite {
                let sprite = load_sprite(&path)
                    .with_context(|| format!("loading sprite {}", path.display()))?;
                compositor = compositor.with_sprite(sprite);
            }
            compositor.render(&cfg)?;
            save_surface(compositor.surface(), &output)?;
            info!(output = %output.display(), width, height, "frame written");
        }

        Commands::Compare {
            a,
            b,
            diff,
            side_by_side,
            tolerance,
        } => {
            let sa = load_surface(&a).with_context(|| format!("loading {}", a.display()))?;
            let sb = load_surface(&b).with_context(|| format!("loading {}", b.display()))?;
            let result = compare_surfaces(&sa, &sb, tolerance)?;
            println!("{result}");

            if let Some(path) = diff {
                save_surface(&generate_diff_image(&sa, &sb)?, &path)?;
                println!("Diff saved: {}", path.display());
            }
            if let Some(path) = side_by_side {
                save_surface(&generate_sidebyside(&sa, &sb)?, &path)?;
                println!("Side-by-side saved: {}", path.display());
            }
            if !result.matches() {
                process::exit(1);
            }
        }

        Commands::Ramp { output } => {
            let ramp = DensityRamp::landscape();
            save_ramp_strip(&ramp, &output)?;
            info!(output = %output.display(), entries = ramp.len(), "ramp written");
        }
    }
    Ok(())
}
