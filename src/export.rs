//! Image, mesh and summary export

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::cave::{CaveMap, CaveStats};
use crate::error::Result;
use crate::grid::{TileType, NEIGHBORS_4};
use crate::mesh::{CaveMesh, MeshBuffers};
use crate::rooms::{Passage, RoomId};

pub const WALL_COLOR: [u8; 3] = [40, 36, 34];
pub const FLOOR_COLOR: [u8; 3] = [176, 160, 132];
pub const MAIN_ROOM_COLOR: [u8; 3] = [214, 190, 120];
/// Floor tiles touching a wall
pub const EDGE_COLOR: [u8; 3] = [120, 104, 86];

const BACKGROUND: [u8; 3] = [30, 30, 30];
const LABEL_BACKGROUND: [u8; 3] = [50, 50, 50];
const LABEL_HEIGHT: u32 = 14;

/// Render the bordered grid, `scale` pixels per tile.
pub fn render_cave(map: &CaveMap, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let grid = &map.grid;
    let main_room = map.main_room_mask();
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32 * scale, grid.height as u32 * scale);

    for (x, y, &tile) in grid.iter() {
        let color = match tile {
            TileType::Wall => WALL_COLOR,
            TileType::Floor => {
                let (xi, yi) = (x as i32, y as i32);
                let touches_wall = NEIGHBORS_4
                    .iter()
                    .any(|&(dx, dy)| grid.is_wall_or_outside(xi + dx, yi + dy));
                if touches_wall {
                    EDGE_COLOR
                } else if main_room[y * grid.width + x] {
                    MAIN_ROOM_COLOR
                } else {
                    FLOOR_COLOR
                }
            }
        };

        // Flip vertically so +y points up, matching the mesh
        let py0 = (grid.height - 1 - y) as u32 * scale;
        let px0 = x as u32 * scale;
        for dy in 0..scale {
            for dx in 0..scale {
                img.put_pixel(px0 + dx, py0 + dy, Rgb(color));
            }
        }
    }

    img
}

/// Export the grid as a PNG.
pub fn export_grid_png(map: &CaveMap, path: &Path, scale: u32) -> Result<()> {
    render_cave(map, scale).save(path)?;
    Ok(())
}

/// Write both meshes as Wavefront OBJ, one object each.
pub fn write_obj<W: Write>(mesh: &CaveMesh, out: &mut W) -> Result<()> {
    writeln!(out, "# cave_generator mesh")?;
    let mut offset = 0;
    for (name, buffers) in [("floor", &mesh.floor), ("walls", &mesh.walls)] {
        write_obj_object(out, name, buffers, offset)?;
        offset += buffers.vertices.len();
    }
    Ok(())
}

fn write_obj_object<W: Write>(out: &mut W, name: &str, buffers: &MeshBuffers, offset: usize) -> Result<()> {
    writeln!(out, "o {}", name)?;
    for v in &buffers.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for n in &buffers.normals {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    // OBJ indices are 1-based and global across objects
    for tri in buffers.triangles.chunks_exact(3) {
        let a = tri[0] as usize + offset + 1;
        let b = tri[1] as usize + offset + 1;
        let c = tri[2] as usize + offset + 1;
        writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }
    Ok(())
}

pub fn export_obj(mesh: &CaveMesh, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj(mesh, &mut out)?;
    out.flush()?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct RoomSummary {
    id: RoomId,
    size: usize,
    edge_tiles: usize,
    is_main_room: bool,
    connected: Vec<RoomId>,
}

#[derive(Debug, Serialize)]
struct CaveSummary<'a> {
    seed: &'a str,
    seed_value: u64,
    border_size: usize,
    stats: CaveStats,
    rooms: Vec<RoomSummary>,
    passages: &'a [Passage],
}

/// Summary of one cave as pretty-printed JSON.
pub fn summary_json(map: &CaveMap) -> Result<String> {
    let summary = CaveSummary {
        seed: &map.seed.text,
        seed_value: map.seed.value,
        border_size: map.border_size,
        stats: map.stats,
        rooms: map
            .rooms
            .rooms
            .iter()
            .map(|room| RoomSummary {
                id: room.id,
                size: room.size(),
                edge_tiles: room.edge_tiles.len(),
                is_main_room: room.is_main_room,
                connected: room.connected.clone(),
            })
            .collect(),
        passages: map.passages(),
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

pub fn export_summary_json(map: &CaveMap, path: &Path) -> Result<()> {
    std::fs::write(path, summary_json(map)?)?;
    Ok(())
}

/// Lay out labelled tiles on a sheet, `columns` per row.
pub fn create_contact_sheet(tiles: &[(String, RgbImage)], columns: u32) -> RgbImage {
    let columns = columns.max(1);
    let tile_w = tiles.iter().map(|(_, img)| img.width()).max().unwrap_or(0);
    let tile_h = tiles.iter().map(|(_, img)| img.height()).max().unwrap_or(0);
    let rows = (tiles.len() as u32).div_ceil(columns);

    let sheet_w = tile_w * columns.min(tiles.len().max(1) as u32);
    let sheet_h = (tile_h + LABEL_HEIGHT) * rows;
    let mut sheet: RgbImage = ImageBuffer::from_pixel(sheet_w, sheet_h, Rgb(BACKGROUND));

    for (idx, (label, tile)) in tiles.iter().enumerate() {
        let col = idx as u32 % columns;
        let row = idx as u32 / columns;
        let offset_x = col * tile_w;
        let label_y = row * (tile_h + LABEL_HEIGHT);

        for ly in 0..LABEL_HEIGHT {
            for lx in 0..tile_w {
                sheet.put_pixel(offset_x + lx, label_y + ly, Rgb(LABEL_BACKGROUND));
            }
        }
        draw_label(&mut sheet, label, offset_x + 3, label_y + 3);

        for (tx, ty, pixel) in tile.enumerate_pixels() {
            sheet.put_pixel(offset_x + tx, label_y + LABEL_HEIGHT + ty, *pixel);
        }
    }

    sheet
}

/// Draw text with a 5x7 bitmap font. Characters without a glyph leave a gap.
fn draw_label(img: &mut RgbImage, text: &str, x: u32, y: u32) {
    let color = Rgb([220, 220, 220]);
    for (i, c) in text.chars().enumerate() {
        let Some(bitmap) = glyph(c) else {
            continue;
        };
        let cx = x + i as u32 * 6;
        for (row, bits) in bitmap.iter().enumerate() {
            for col in 0..5 {
                if (bits >> (4 - col)) & 1 == 1 {
                    let (px, py) = (cx + col, y + row as u32);
                    if px < img.width() && py < img.height() {
                        img.put_pixel(px, py, color);
                    }
                }
            }
        }
    }
}

fn glyph(c: char) -> Option<[u8; 7]> {
    let bitmap = match c.to_ascii_uppercase() {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00110, 0b01000, 0b10000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b00100, 0b00100, 0b00000, 0b00100, 0b00100, 0b00000],
        '#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        _ => return None,
    };
    Some(bitmap)
}
