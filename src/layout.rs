//! Sub-plot grid and figure regions.
//!
//! Regions are expressed as fractions of the figure with the origin at the
//! bottom-left, then converted to pixel rectangles (top-left origin) for
//! the backend.

use crate::ir::PixelRect;

/// Rows and columns for `n` sub-plots: `rows * cols == n`, `rows >= cols`,
/// with `cols` as large as possible.
pub fn grid_dimensions(n: usize) -> (usize, usize) {
    let n = n.max(1);
    let mut cols = isqrt(n);
    while n % cols != 0 {
        cols -= 1;
    }
    (n / cols, cols)
}

fn isqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r.max(1)
}

/// A region in figure fractions, `y` measured from the bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FracRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FracRect {
    pub fn to_pixels(&self, fig_width: u32, fig_height: u32) -> PixelRect {
        let w = fig_width as f64;
        let h = fig_height as f64;
        PixelRect {
            left: (self.x * w).round() as i32,
            top: ((1.0 - self.y - self.height) * h).round() as i32,
            width: (self.width * w).round().max(1.0) as u32,
            height: (self.height * h).round().max(1.0) as u32,
        }
    }
}

/// Placement of every sub-plot and the optional legend column
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub rows: usize,
    pub cols: usize,
    pub margin: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    /// Fraction of figure width reserved for the legend, if any
    pub legend_ratio: Option<f64>,
}

impl FigureLayout {
    pub fn new(n_groups: usize, margin: f64, legend_ratio: Option<f64>) -> Self {
        let (rows, cols) = grid_dimensions(n_groups);
        let usable_width = 1.0 - legend_ratio.unwrap_or(0.0) - 2.0 * margin;
        Self {
            rows,
            cols,
            margin,
            plot_width: usable_width / cols as f64,
            plot_height: (1.0 - 2.0 * margin) / rows as f64,
            legend_ratio,
        }
    }

    /// Grid position of group `k` as (row from bottom, column)
    pub fn grid_position(&self, k: usize) -> (usize, usize) {
        (k / self.cols, k % self.cols)
    }

    pub fn cell(&self, k: usize) -> FracRect {
        let (row, col) = self.grid_position(k);
        FracRect {
            x: col as f64 * self.plot_width + self.margin,
            y: row as f64 * self.plot_height + self.margin,
            width: self.plot_width,
            height: self.plot_height,
        }
    }

    pub fn legend_rect(&self) -> Option<FracRect> {
        self.legend_ratio.map(|ratio| FracRect {
            x: self.cols as f64 * self.plot_width + self.margin,
            y: self.margin,
            width: ratio,
            height: 1.0 - 2.0 * self.margin,
        })
    }
}
