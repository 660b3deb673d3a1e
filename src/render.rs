use crate::StringToAnyhow;
use raygrid::{Game, Tile};
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

const MINIMAP_SCALE: f32 = 0.25;
const PLAYER_RADIUS: f32 = 10.;
const DARK_GRAY: Color = Color {
    r: 0x22,
    g: 0x22,
    b: 0x22,
    a: 0xff,
};

/// Draw the 3D view and, if asked, the minimap over it.
pub fn frame(
    canvas: &mut Canvas<Window>,
    game: &Game,
    height: u32,
    minimap: bool,
) -> anyhow::Result<()> {
    let width = game.slices().len() as u32;

    // DRAW CEILING
    canvas.set_draw_color(Color::RGB(0x33, 0x33, 0x44));
    canvas.fill_rect(Rect::new(0, 0, width, height / 2)).ah()?;

    // DRAW FLOOR
    canvas.set_draw_color(Color::RGB(0x55, 0x55, 0x55));
    canvas
        .fill_rect(Rect::new(0, height as i32 / 2, width, height / 2))
        .ah()?;

    walls(canvas, game, height)?;

    if minimap {
        overlay(canvas, game)?;
    }

    Ok(())
}

fn walls(canvas: &mut Canvas<Window>, game: &Game, height: u32) -> anyhow::Result<()> {
    let tile = game.map.tile_size();
    let view = game.player.pose.angle;

    for (i, slice) in game.slices().iter().enumerate() {
        // corrected for fisheye, clamped for rays that start against a wall
        let perpendicular = slice.distance * (slice.angle - view).cos();
        let line_height = ((tile * height as f32) / perpendicular).min(height as f32) as i32;

        // slightly darken walls hit on column lines for contrast
        let shade = if slice.was_hit_vertical() { 0xaa } else { 0xdd };
        canvas.set_draw_color(Color::RGB(shade, shade, shade));

        let top = (height as i32 - line_height) / 2;
        canvas
            .draw_line(
                Point::new(i as i32, top),
                Point::new(i as i32, top + line_height),
            )
            .ah()?;
    }

    Ok(())
}

fn scaled(v: f32) -> i32 {
    (v * MINIMAP_SCALE) as i32
}

fn overlay(canvas: &mut Canvas<Window>, game: &Game) -> anyhow::Result<()> {
    let tile = game.map.tile_size();
    let side = scaled(tile).max(1) as u32;

    for ((col, row), cell) in game.map.iter() {
        let origin = game.map.cell_origin(col, row);
        let rect = Rect::new(scaled(origin.x), scaled(origin.y), side, side);
        canvas.set_draw_color(match cell {
            Tile::Wall => DARK_GRAY,
            Tile::Empty => Color::WHITE,
        });
        canvas.fill_rect(rect).ah()?;
        canvas.set_draw_color(DARK_GRAY);
        canvas.draw_rect(rect).ah()?;
    }

    let pos = game.player.pose.pos;
    let eye = Point::new(scaled(pos.x), scaled(pos.y));

    canvas.set_blend_mode(BlendMode::Blend);
    canvas.set_draw_color(Color::RGBA(0xff, 0, 0, 0x55));
    for slice in game.slices() {
        canvas
            .draw_line(eye, Point::new(scaled(slice.point.x), scaled(slice.point.y)))
            .ah()?;
    }
    canvas.set_blend_mode(BlendMode::None);

    let r = scaled(PLAYER_RADIUS).max(1);
    canvas.set_draw_color(Color::RED);
    canvas
        .fill_rect(Rect::new(eye.x() - r / 2, eye.y() - r / 2, r as u32, r as u32))
        .ah()?;
    let nose = pos + game.player.pose.facing() * 30.;
    canvas
        .draw_line(eye, Point::new(scaled(nose.x), scaled(nose.y)))
        .ah()?;

    Ok(())
}
