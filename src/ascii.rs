//! Plain-text rendering of cave grids

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::cave::CaveMap;
use crate::grid::{Grid, TileType};

pub const WALL_CHAR: char = '#';
pub const FLOOR_CHAR: char = '.';
pub const MAIN_ROOM_CHAR: char = 'M';

/// Render a grid as text, one line per row, top row (largest `y`) first.
/// Cells flagged in `highlight` are drawn as `M`.
pub fn render_grid(grid: &Grid, highlight: Option<&[bool]>) -> String {
    let mut result = String::with_capacity((grid.width + 1) * grid.height);

    for y in (0..grid.height).rev() {
        for x in 0..grid.width {
            let idx = y * grid.width + x;
            let ch = match grid.tiles()[idx] {
                TileType::Wall => WALL_CHAR,
                TileType::Floor if highlight.is_some_and(|h| h.get(idx) == Some(&true)) => MAIN_ROOM_CHAR,
                TileType::Floor => FLOOR_CHAR,
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

/// Render a generated cave, optionally marking the main room.
pub fn render_cave(map: &CaveMap, mark_main_room: bool) -> String {
    if mark_main_room {
        let mask = map.main_room_mask();
        render_grid(&map.grid, Some(mask.as_slice()))
    } else {
        render_grid(&map.grid, None)
    }
}

/// Write the map with a short header to a text file.
pub fn export_cave_file(map: &CaveMap, path: &Path) -> io::Result<()> {
    let mut file = File::create(path)?;
    let stats = &map.stats;

    writeln!(file, "=== CAVE ===")?;
    writeln!(file, "Seed: {}", map.seed)?;
    writeln!(file, "Size: {}x{} (border {})", stats.width, stats.height, map.border_size)?;
    writeln!(file, "Rooms: {}  Passages: {}", stats.rooms, stats.passages)?;
    writeln!(file)?;
    write!(file, "{}", render_cave(map, true))?;
    writeln!(file)?;
    writeln!(file, "{} wall  {} floor  {} main room", WALL_CHAR, FLOOR_CHAR, MAIN_ROOM_CHAR)?;

    Ok(())
}
