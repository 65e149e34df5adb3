// Spatial hash over placed rectangles.
//
// The layouter tests tens of thousands of spiral candidates per word; bucketing
// rectangles by cell keeps each test proportional to the local neighbourhood
// instead of the whole cloud.

use std::collections::HashMap;

use crate::geometry::Rect;

/// Rectangles covering more cells than this are kept in a flat list instead.
const MAX_CELLS_PER_RECT: i64 = 1024;

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: i32,
    /// Cell coordinates -> indices into the caller's rectangle list.
    cells: HashMap<(i32, i32), Vec<usize>>,
    /// Huge rectangles, checked against every query.
    oversized: Vec<usize>,
}

impl SpatialGrid {
    /// Cell size should be roughly the size of a typical rectangle.
    pub fn new(cell_size: i32) -> Self {
        Self {
            cell_size: cell_size.max(1),
            cells: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    fn cell_bounds(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        (
            rect.x.div_euclid(self.cell_size),
            (rect.right() - 1).div_euclid(self.cell_size),
            rect.y.div_euclid(self.cell_size),
            (rect.bottom() - 1).div_euclid(self.cell_size),
        )
    }

    fn cell_count(&self, rect: &Rect) -> i64 {
        let (min_x, max_x, min_y, max_y) = self.cell_bounds(rect);
        (max_x as i64 - min_x as i64 + 1) * (max_y as i64 - min_y as i64 + 1)
    }

    fn cell_range(&self, rect: &Rect) -> impl Iterator<Item = (i32, i32)> {
        let (min_x, max_x, min_y, max_y) = self.cell_bounds(rect);
        (min_x..=max_x).flat_map(move |cx| (min_y..=max_y).map(move |cy| (cx, cy)))
    }

    /// Register `rects[index]`.
    pub fn insert(&mut self, index: usize, rect: &Rect) {
        if self.cell_count(rect) > MAX_CELLS_PER_RECT {
            self.oversized.push(index);
            return;
        }
        let cells: Vec<(i32, i32)> = self.cell_range(rect).collect();
        for cell in cells {
            self.cells.entry(cell).or_default().push(index);
        }
    }

    /// Exact overlap test against every registered rectangle that could touch `rect`.
    pub fn overlaps_any(&self, rect: &Rect, rects: &[Rect]) -> bool {
        if self.oversized.iter().any(|&i| rects[i].overlaps(rect)) {
            return true;
        }
        // A huge query walks fewer rectangles than cells.
        if self.cell_count(rect) > MAX_CELLS_PER_RECT {
            return rects.iter().any(|r| r.overlaps(rect));
        }
        self.cell_range(rect).any(|cell| {
            self.cells.get(&cell).is_some_and(|indices| {
                indices.iter().any(|&i| rects[i].overlaps(rect))
            })
        })
    }
}
