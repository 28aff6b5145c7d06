use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;

use cave_generator::{ascii, export};
use cave_generator::{CaveConfig, CaveGenerator, CaveMap, CaveMode, Result};

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate connected cellular-automaton caves and their meshes")]
struct Args {
    /// Load settings from a JSON file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective settings to a JSON file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// Width of the grid in tiles (before the border)
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in tiles (before the border)
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Seed text; numbers are used directly, words are hashed
    #[arg(short, long)]
    seed: Option<String>,

    /// Draw a fresh seed on every regeneration
    #[arg(short, long)]
    random: bool,

    /// Chance (percent) for an interior tile to start as wall
    #[arg(short, long)]
    fill: Option<u32>,

    /// Number of smoothing passes
    #[arg(short, long)]
    passes: Option<usize>,

    /// Smoothing and carving style
    #[arg(short, long, value_enum)]
    mode: Option<CaveMode>,

    /// Wall regions smaller than this are removed
    #[arg(long)]
    wall_threshold: Option<usize>,

    /// Floor regions smaller than this are sealed
    #[arg(long)]
    room_threshold: Option<usize>,

    /// Wall margin added around the map
    #[arg(long)]
    border: Option<usize>,

    /// Disk radius for organic passages
    #[arg(long)]
    passage_radius: Option<i32>,

    /// Square half-width for structured corridors
    #[arg(long)]
    corridor_half_width: Option<i32>,

    /// World-space size of one tile in the mesh
    #[arg(long)]
    square_size: Option<f32>,

    /// Height of the extruded walls
    #[arg(long)]
    wall_height: Option<f32>,

    /// Export the grid as PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per tile in the PNG
    #[arg(long, default_value = "4")]
    scale: u32,

    /// Export floor and wall meshes as Wavefront OBJ
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Export a JSON summary of rooms and passages
    #[arg(long)]
    json: Option<PathBuf>,

    /// Export the map as a text file
    #[arg(long)]
    ascii_file: Option<PathBuf>,

    /// Print the map to stdout
    #[arg(long)]
    print: bool,

    /// Keep running and regenerate on Enter
    #[arg(short, long)]
    interactive: bool,
}

impl Args {
    fn apply(&self, config: &mut CaveConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(seed) = &self.seed {
            config.seed = seed.clone();
            config.use_random_seed = false;
        }
        if self.random {
            config.use_random_seed = true;
        }
        if let Some(fill) = self.fill {
            config.fill_percent = fill;
        }
        if let Some(passes) = self.passes {
            config.smoothing_passes = passes;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(threshold) = self.wall_threshold {
            config.wall_threshold = threshold;
        }
        if let Some(threshold) = self.room_threshold {
            config.room_threshold = threshold;
        }
        if let Some(border) = self.border {
            config.border_size = border;
        }
        if let Some(radius) = self.passage_radius {
            config.passage_radius = radius;
        }
        if let Some(half_width) = self.corridor_half_width {
            config.corridor_half_width = half_width;
        }
        if let Some(size) = self.square_size {
            config.square_size = size;
        }
        if let Some(height) = self.wall_height {
            config.wall_height = height;
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            println!("Loading config from {}", path.display());
            CaveConfig::load(path)?
        }
        None => CaveConfig::default(),
    };
    args.apply(&mut config);

    if let Some(path) = &args.save_config {
        config.save(path)?;
        println!("Saved config to {}", path.display());
    }

    let mut generator = CaveGenerator::new(config)?;
    let stdin = io::stdin();

    loop {
        match generator.regenerate() {
            Ok(map) => {
                report(&map);
                write_outputs(args, &map)?;
            }
            // Degenerate seeds are worth another try in interactive mode
            Err(err) if args.interactive && err.is_no_rooms() => println!("{}", err),
            Err(err) => return Err(err),
        }

        if !args.interactive {
            break;
        }
        print!("Press Enter to regenerate, q to quit: ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 || line.trim().eq_ignore_ascii_case("q") {
            break;
        }
    }

    Ok(())
}

fn report(map: &CaveMap) {
    let stats = &map.stats;
    println!("Seed: {}", map.seed);
    println!("Map size: {}x{} (border {})", stats.width, stats.height, map.border_size);
    println!(
        "Pruned {} wall regions and {} floor pockets",
        stats.wall_regions_removed, stats.floor_regions_sealed
    );
    println!(
        "{} rooms, {} passages, {:.1}% floor",
        stats.rooms,
        stats.passages,
        100.0 * stats.floor_tiles as f64 / (stats.width * stats.height) as f64
    );
    println!(
        "Mesh: {} vertices, {} floor triangles, {} outlines, {} wall triangles",
        stats.floor_vertices, stats.floor_triangles, stats.outlines, stats.wall_triangles
    );
}

fn write_outputs(args: &Args, map: &CaveMap) -> Result<()> {
    if args.print {
        print!("{}", ascii::render_cave(map, true));
    }
    if let Some(path) = &args.png {
        export::export_grid_png(map, path, args.scale)?;
        println!("Saved grid image to {}", path.display());
    }
    if let Some(path) = &args.obj {
        export::export_obj(&map.mesh, path)?;
        println!("Saved mesh to {}", path.display());
    }
    if let Some(path) = &args.json {
        export::export_summary_json(map, path)?;
        println!("Saved summary to {}", path.display());
    }
    if let Some(path) = &args.ascii_file {
        ascii::export_cave_file(map, path)?;
        println!("Saved text map to {}", path.display());
    }
    Ok(())
}
