pub mod canvas;

use bracket_geometry::prelude::Rect;
use bracket_terminal::prelude::{BLACK, BTerm, RGB};

use crate::data::Rgb;
use crate::map::WorldGrid;
use crate::viewport::Viewport;

pub use canvas::PixelCanvas;

/// Something that can fill pixel rectangles and show the result.
pub trait Renderer {
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    fn present(&mut self) {}
}

pub fn draw_map<R: Renderer + ?Sized>(renderer: &mut R, grid: &WorldGrid, viewport: &Viewport) {
    for (col, row, point) in viewport.visible_cells() {
        let tile = grid.tile_or_grass(point);
        renderer.fill_rect(viewport.cell_rect(col, row), tile.color);
    }
}

pub fn draw_player<R: Renderer + ?Sized>(renderer: &mut R, viewport: &Viewport) {
    renderer.fill_rect(viewport.marker_rect(), Rgb::PLAYER);
}

/// Maps window pixels onto console cells of `cell_pixels` square pixels.
pub struct TerminalRenderer<'a> {
    ctx: &'a mut BTerm,
    cell_pixels: i32,
}

impl<'a> TerminalRenderer<'a> {
    pub fn new(ctx: &'a mut BTerm, cell_pixels: i32) -> Self {
        Self {
            ctx,
            cell_pixels: cell_pixels.max(1),
        }
    }
}

impl Renderer for TerminalRenderer<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let (screen_w, screen_h) = self.ctx.get_char_size();
        let (first_x, last_x) = cell_span(rect.x1, rect.x2, self.cell_pixels);
        let (first_y, last_y) = cell_span(rect.y1, rect.y2, self.cell_pixels);
        let bg: RGB = color.into();

        for y in first_y.max(0)..=last_y.min(screen_h as i32 - 1) {
            for x in first_x.max(0)..=last_x.min(screen_w as i32 - 1) {
                self.ctx.set(x, y, RGB::named(BLACK), bg, b' ' as u16);
            }
        }
    }
}

/// Console cells touched by the half-open pixel span `[start, end)`; at least one.
fn cell_span(start: i32, end: i32, cell_pixels: i32) -> (i32, i32) {
    let first = start.div_euclid(cell_pixels);
    let last = (end - 1).max(start).div_euclid(cell_pixels);
    (first, last)
}

#[cfg(test)]
mod tests {
    use bracket_geometry::prelude::Point;

    use super::*;
    use crate::map::Tile;
    use crate::viewport::{Fov, MIN_FOV};

    #[derive(Default)]
    struct Recorder {
        rects: Vec<(Rect, Rgb)>,
    }

    impl Renderer for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: Rgb) {
            self.rects.push((rect, color));
        }
    }

    #[test]
    fn pixel_spans_cover_partial_cells() {
        assert_eq!(cell_span(0, 10, 10), (0, 0));
        assert_eq!(cell_span(10, 30, 10), (1, 2));
        assert_eq!(cell_span(4, 6, 10), (0, 0));
        assert_eq!(cell_span(795, 805, 10), (79, 80));
    }

    #[test]
    fn map_draws_one_rect_per_visible_tile() {
        let fov = Fov::for_window(100, MIN_FOV, 2, 800, 600);
        let viewport = Viewport::recompute(800, 600, fov, Point::new(0, 0));
        let mut grid = WorldGrid::empty();
        let rock = Tile {
            kind: crate::map::TileKind::Resource(crate::data::TileType(3)),
            color: Rgb(139, 69, 19),
        };
        grid.set_tile(Point::new(-4, -3), rock);

        let mut recorder = Recorder::default();
        draw_map(&mut recorder, &grid, &viewport);
        draw_player(&mut recorder, &viewport);

        assert_eq!(recorder.rects.len(), 8 * 6 + 1);
        assert_eq!(recorder.rects[0], (Rect::with_size(0, 0, 100, 100), rock.color));
        assert_eq!(recorder.rects[1].1, Rgb::GRASS);
        assert_eq!(
            recorder.rects.last(),
            Some(&(Rect::with_size(400, 300, 100, 100), Rgb::PLAYER))
        );
    }
}
