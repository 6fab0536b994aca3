use std::ops::RangeInclusive;

use bracket_geometry::prelude::{Point, Rect};
use tracing::debug;

pub const MIN_FOV: i32 = 2;

/// Field-of-view divisor: window pixels per tile along each axis.
///
/// Never below `MIN_FOV`, never above the shorter window side, so both
/// tile counts stay positive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Fov {
    value: i32,
    min: i32,
    max: i32,
    step: i32,
}

impl Fov {
    pub fn new(initial: i32, min: i32, max: i32, step: i32) -> Self {
        let min = min.max(MIN_FOV);
        let max = max.max(min);
        Self {
            value: initial.clamp(min, max),
            min,
            max,
            step: step.max(1),
        }
    }

    pub fn for_window(initial: i32, min: i32, step: i32, window_w: i32, window_h: i32) -> Self {
        Self::new(initial, min, window_w.min(window_h), step)
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn increase(&mut self) -> i32 {
        self.value = (self.value + self.step).min(self.max);
        self.value
    }

    pub fn decrease(&mut self) -> i32 {
        self.value = (self.value - self.step).max(self.min);
        self.value
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub window_w: i32,
    pub window_h: i32,
    pub tiles_x: i32,
    pub tiles_y: i32,
    pub tile_w: i32,
    pub tile_h: i32,
    pub range_x: RangeInclusive<i32>,
    pub range_y: RangeInclusive<i32>,
}

impl Viewport {
    pub fn recompute(window_w: i32, window_h: i32, fov: Fov, center: Point) -> Self {
        let tiles_x = (window_w / fov.value()).max(1);
        let tiles_y = (window_h / fov.value()).max(1);
        let viewport = Self {
            window_w,
            window_h,
            tiles_x,
            tiles_y,
            tile_w: window_w / tiles_x,
            tile_h: window_h / tiles_y,
            range_x: centered_range(center.x, tiles_x),
            range_y: centered_range(center.y, tiles_y),
        };
        debug!(
            fov = fov.value(),
            tiles_x,
            tiles_y,
            tile_w = viewport.tile_w,
            tile_h = viewport.tile_h,
            "viewport recomputed"
        );
        viewport
    }

    pub fn recenter(&mut self, center: Point) {
        self.range_x = centered_range(center.x, self.tiles_x);
        self.range_y = centered_range(center.y, self.tiles_y);
    }

    /// The `tiles_x * tiles_y` cells that get drawn, as `(col, row, world point)`.
    ///
    /// The ranges hold one extra coordinate per axis when the tile count is
    /// even; the trailing one is generated but never drawn.
    pub fn visible_cells(&self) -> impl Iterator<Item = (i32, i32, Point)> + '_ {
        let origin_x = *self.range_x.start();
        let origin_y = *self.range_y.start();
        (0..self.tiles_x).flat_map(move |col| {
            (0..self.tiles_y).map(move |row| (col, row, Point::new(origin_x + col, origin_y + row)))
        })
    }

    pub fn cell_rect(&self, col: i32, row: i32) -> Rect {
        Rect::with_size(col * self.tile_w, row * self.tile_h, self.tile_w, self.tile_h)
    }

    pub fn marker_rect(&self) -> Rect {
        Rect::with_size(self.window_w / 2, self.window_h / 2, self.tile_w, self.tile_h)
    }
}

fn centered_range(center: i32, tiles: i32) -> RangeInclusive<i32> {
    let half = tiles / 2;
    (center - half)..=(center + half)
}
