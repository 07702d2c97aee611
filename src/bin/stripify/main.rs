//! Stripify CLI - triangle strip generation for procedural meshes.
//!
//! Usage: stripify <COMMAND> [OPTIONS]
//!
//! Run `stripify --help` for available commands. Set `RUST_LOG=info` (or
//! `debug`) for pass-level logging.

mod shapes;

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

use stripify::model::{MeshData, TexturedMesh};
use stripify::render::{build_render_buffers, Topology};
use stripify::strip::{StripOptions, DEFAULT_MAX_STRIP_LENGTH};
use stripify::Progress;

#[derive(Parser)]
#[command(name = "stripify")]
#[command(author, version, about = "Seam-aware triangle strip generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stripify a square grid of quads
    Grid {
        /// Number of quads along each side
        #[arg(short, long, default_value = "64")]
        size: usize,

        /// Start a second UV chart at this column, creating a texture seam
        #[arg(long)]
        seam_column: Option<usize>,

        #[command(flatten)]
        strip: StripArgs,
    },

    /// Stripify an open cylinder with a wrapping UV seam
    Tube {
        /// Number of quads around the axis
        #[arg(long, default_value = "32")]
        segments: usize,

        /// Number of quads along the axis
        #[arg(long, default_value = "16")]
        rings: usize,

        #[command(flatten)]
        strip: StripArgs,
    },
}

#[derive(Args)]
struct StripArgs {
    /// Maximum number of faces per strip
    #[arg(short, long, default_value_t = DEFAULT_MAX_STRIP_LENGTH)]
    max_strip_length: usize,

    /// Emit a plain triangle list instead of strips
    #[arg(long)]
    no_strips: bool,

    /// Stripify connected components in parallel
    #[arg(long)]
    parallel: bool,
}

impl StripArgs {
    fn options(&self) -> StripOptions {
        StripOptions::default()
            .with_max_strip_length(self.max_strip_length)
            .with_stripify(!self.no_strips)
            .with_parallel(self.parallel)
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Grid {
            size,
            seam_column,
            strip,
        } => {
            if size == 0 {
                return Err("grid size must be at least 1".into());
            }
            println!("Grid: {}x{} quads{}", size, size, match seam_column {
                Some(c) => format!(", seam at column {}", c),
                None => String::new(),
            });
            cmd_stripify(shapes::grid(size, seam_column), &strip)?;
        }

        Commands::Tube {
            segments,
            rings,
            strip,
        } => {
            if segments < 3 || rings == 0 {
                return Err("tube needs at least 3 segments and 1 ring".into());
            }
            println!("Tube: {} segments, {} rings", segments, rings);
            cmd_stripify(shapes::tube(segments, rings), &strip)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Parallel components report out of order; only ever move forward.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, raw_percent, message);
        let _ = std::io::stderr().flush();

        if raw_percent == 100 {
            eprintln!();
        }
    })
}

fn cmd_stripify(data: MeshData, args: &StripArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.options();

    let start = Instant::now();
    let model = TexturedMesh::from_data(data)?;
    let loaded = start.elapsed();

    println!(
        "Loaded: {} vertices, {} faces, {} duplicated vertices ({:.2?})",
        model.num_vertices(),
        model.num_faces(),
        model.duplications().len(),
        loaded
    );

    let progress = create_progress();
    let start = Instant::now();
    let buffers = build_render_buffers(&model, &options, &progress)?;
    let elapsed = start.elapsed();

    match buffers.topology {
        Topology::TriangleStrip => {
            let strips = &buffers.strips;
            let mode = if options.parallel { "parallel" } else { "sequential" };
            println!("Strips: {} ({})", strips.len(), mode);
            println!("  Single-triangle strips: {}", strips.singletons());
            println!("  Longest strip: {} faces", strips.longest());
            println!("  Average length: {:.2} faces", strips.average_length());
            println!("  Swaps: {}", buffers.swaps);
        }
        Topology::TriangleList => println!("Triangle list (strips disabled)"),
    }

    let list_indices = model.num_faces() * 3;
    println!(
        "Indices: {} ({:.1}% of a triangle list)",
        buffers.indices.len(),
        if list_indices == 0 {
            0.0
        } else {
            100.0 * buffers.indices.len() as f64 / list_indices as f64
        }
    );
    println!(
        "Buffers: {} vertex bytes, {} index bytes, {} draws ({:.2?})",
        buffers.vertex_bytes().len(),
        buffers.index_bytes().len(),
        buffers.draws.len(),
        elapsed
    );

    Ok(())
}
