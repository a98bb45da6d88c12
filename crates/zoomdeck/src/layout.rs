//! Fixed placement of slides and outline rows in content space.
//!
//! Everything here is a pure function of an index and a few constants, so
//! positions can be recomputed on demand instead of being cached.

use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::parser::Slide;

pub const GRID_COLUMNS: usize = 3;
pub const GRID_GAP_X: f32 = 150.0;
pub const GRID_GAP_Y: f32 = 100.0;
pub const GRID_ORIGIN: Pos2 = pos2(50.0, 50.0);

/// Margin added past the last slide when computing [`ContentBounds`].
pub const CONTENT_MARGIN: f32 = 100.0;

pub const OUTLINE_ORIGIN: Pos2 = pos2(20.0, 20.0);
pub const OUTLINE_ITEM_SIZE: Vec2 = vec2(700.0, 50.0);
pub const OUTLINE_GAP_Y: f32 = 15.0;

/// Extent of the slide grid, measured from the content origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentBounds {
    pub max_x: f32,
    pub max_y: f32,
}

impl ContentBounds {
    pub const ZERO: Self = Self {
        max_x: 0.0,
        max_y: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        self.max_x <= 0.0 || self.max_y <= 0.0
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_max(Pos2::ZERO, pos2(self.max_x, self.max_y))
    }
}

/// Top-left corner of the slide at `index` in the 3-column grid.
pub fn slide_grid_position(index: usize, slide_size: Vec2) -> Pos2 {
    let row = index / GRID_COLUMNS;
    let col = index % GRID_COLUMNS;
    pos2(
        col as f32 * (slide_size.x + GRID_GAP_X) + GRID_ORIGIN.x,
        row as f32 * (slide_size.y + GRID_GAP_Y) + GRID_ORIGIN.y,
    )
}

/// Rectangle of the outline row at `index` in the single-column list.
pub fn outline_list_position(index: usize) -> Rect {
    let y = OUTLINE_ORIGIN.y + index as f32 * (OUTLINE_ITEM_SIZE.y + OUTLINE_GAP_Y);
    Rect::from_min_size(pos2(OUTLINE_ORIGIN.x, y), OUTLINE_ITEM_SIZE)
}

/// Smallest extent covering every slide, plus [`CONTENT_MARGIN`].
/// An empty deck yields [`ContentBounds::ZERO`].
pub fn content_bounds(slides: &[Slide]) -> ContentBounds {
    if slides.is_empty() {
        return ContentBounds::ZERO;
    }
    let (max_x, max_y) = slides.iter().fold((0.0f32, 0.0f32), |(mx, my), s| {
        let r = s.rect();
        (mx.max(r.max.x), my.max(r.max.y))
    });
    ContentBounds {
        max_x: max_x + CONTENT_MARGIN,
        max_y: max_y + CONTENT_MARGIN,
    }
}

/// Bounding box of the first `count` outline rows, or `None` when there are none.
pub fn outline_bounds(count: usize) -> Option<Rect> {
    (0..count)
        .map(outline_list_position)
        .reduce(|acc, r| acc.union(r))
}
