//! Renders a batch of seeds side by side for comparing settings
//! Generates one tile per seed and saves them as a single contact sheet

use std::path::PathBuf;

use clap::Parser;
use cave_generator::export::{create_contact_sheet, render_cave};
use cave_generator::{generate_cave, CaveConfig, CaveMode, CaveSeed};

#[derive(Parser, Debug)]
#[command(name = "cave_gallery")]
#[command(about = "Render many cave seeds into one comparison image")]
struct Args {
    /// First seed of the batch
    #[arg(short, long, default_value = "1")]
    start: u64,

    /// Number of consecutive seeds
    #[arg(short, long, default_value = "9")]
    count: u64,

    /// Tiles per row
    #[arg(long, default_value = "3")]
    columns: u32,

    #[arg(short = 'W', long, default_value = "96")]
    width: usize,

    #[arg(short = 'H', long, default_value = "64")]
    height: usize,

    #[arg(short, long, value_enum, default_value = "organic")]
    mode: CaveMode,

    #[arg(short, long, default_value = "47")]
    fill: u32,

    /// Pixels per tile
    #[arg(long, default_value = "3")]
    scale: u32,

    #[arg(short, long, default_value = "cave_gallery.png")]
    output: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = CaveConfig {
        width: args.width,
        height: args.height,
        mode: args.mode,
        fill_percent: args.fill,
        ..CaveConfig::default()
    };

    println!(
        "Rendering {} {} caves ({}x{}) starting at seed {}...",
        args.count, config.mode, config.width, config.height, args.start
    );

    let mut tiles = Vec::new();
    for value in args.start..args.start.saturating_add(args.count) {
        let seed = CaveSeed::from_value(value);
        match generate_cave(&config, &seed) {
            Ok(map) => {
                println!(
                    "  Seed {}: {} rooms, {} passages",
                    value, map.stats.rooms, map.stats.passages
                );
                tiles.push((format!("S{}", value), render_cave(&map, args.scale)));
            }
            Err(err) if err.is_no_rooms() => println!("  Seed {}: no rooms, skipped", value),
            Err(err) => {
                eprintln!("Error: {}", err);
                std::process::exit(1);
            }
        }
    }

    if tiles.is_empty() {
        eprintln!("Error: no seed produced a cave");
        std::process::exit(1);
    }

    let sheet = create_contact_sheet(&tiles, args.columns);
    if let Err(err) = sheet.save(&args.output) {
        eprintln!("Error: failed to save {}: {}", args.output.display(), err);
        std::process::exit(1);
    }
    println!("Saved {} tiles to {}", tiles.len(), args.output.display());
}
