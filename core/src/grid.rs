//! Mapping between screen pixels and the placement grid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Default screen width in pixels.
pub const DEFAULT_SCREEN_WIDTH: u32 = 1024;
/// Default screen height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 600;
/// Default edge length of a grid cell in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 24;
/// Height of the toolbar band reserved at the top of the screen.
pub const DEFAULT_TOP_BOUNDARY: u32 = 48;
/// Horizontal margin reserved on both sides of the playfield.
pub const DEFAULT_LEFT_BOUNDARY: u32 = 0;

/// Position on screen measured in whole pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal offset growing to the right.
    pub x: i32,
    /// Vertical offset growing downwards.
    pub y: i32,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Snaps a cursor position onto the top-left corner of the cell containing it.
///
/// Cursors above or left of the boundaries clamp onto the first row or column.
/// Snapping is idempotent: snapping an already snapped point returns it
/// unchanged.
#[must_use]
pub fn snap_to_grid(
    cursor: PixelPoint,
    cell_size: u32,
    top_boundary: i32,
    left_boundary: i32,
) -> PixelPoint {
    let size = i32::try_from(cell_size.max(1)).unwrap_or(i32::MAX);
    let column = cursor.x.saturating_sub(left_boundary).div_euclid(size).max(0);
    let row = cursor.y.saturating_sub(top_boundary).div_euclid(size).max(0);
    PixelPoint::new(
        column.saturating_mul(size).saturating_add(left_boundary),
        row.saturating_mul(size).saturating_add(top_boundary),
    )
}

/// Reasons a playfield description is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlayfieldError {
    /// Cells must span at least one pixel.
    #[error("cell size must be greater than zero")]
    ZeroCellSize,
    /// The reserved bands leave no room for a single cell.
    #[error("boundaries leave no room for cells on a {width}x{height} screen")]
    NoPlayableArea {
        /// Screen width in pixels.
        width: u32,
        /// Screen height in pixels.
        height: u32,
    },
}

/// Screen geometry shared by the editor, the simulation and the serializer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Playfield {
    width: u32,
    height: u32,
    cell_size: u32,
    top_boundary: u32,
    left_boundary: u32,
}

impl Playfield {
    /// Creates a playfield after validating that at least one cell fits.
    pub fn new(
        width: u32,
        height: u32,
        cell_size: u32,
        top_boundary: u32,
        left_boundary: u32,
    ) -> Result<Self, PlayfieldError> {
        if cell_size == 0 {
            return Err(PlayfieldError::ZeroCellSize);
        }
        let horizontal = left_boundary.saturating_mul(2);
        if horizontal >= width || top_boundary >= height {
            return Err(PlayfieldError::NoPlayableArea { width, height });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(PlayfieldError::NoPlayableArea { width, height });
        }
        Ok(Self {
            width,
            height,
            cell_size,
            top_boundary,
            left_boundary,
        })
    }

    /// Screen width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Screen height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Edge length of a single cell in pixels.
    #[must_use]
    pub const fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Height of the band reserved above the playable area.
    #[must_use]
    pub const fn top_boundary(&self) -> u32 {
        self.top_boundary
    }

    /// Width of the margin reserved on either side of the playable area.
    #[must_use]
    pub const fn left_boundary(&self) -> u32 {
        self.left_boundary
    }

    /// Number of columns, counting a partially visible last column.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        let span = self.width - self.left_boundary * 2;
        span.div_ceil(self.cell_size)
    }

    /// Number of rows, counting a partially visible last row.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        let span = self.height - self.top_boundary;
        span.div_ceil(self.cell_size)
    }

    /// Reports whether the cursor lies inside the playable rectangle.
    #[must_use]
    pub fn contains(&self, cursor: PixelPoint) -> bool {
        let left = i64::from(self.left_boundary);
        let right = i64::from(self.width) - left;
        let top = i64::from(self.top_boundary);
        let bottom = i64::from(self.height);
        let (x, y) = (i64::from(cursor.x), i64::from(cursor.y));
        x >= left && x < right && y >= top && y < bottom
    }

    /// Reports whether the cell lies on the grid.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns() && cell.row() < self.rows()
    }

    /// Resolves the cell under the cursor, rejecting cursors outside the playfield.
    #[must_use]
    pub fn cell_at(&self, cursor: PixelPoint) -> Option<CellCoord> {
        if !self.contains(cursor) {
            return None;
        }
        let snapped = self.snap(cursor);
        self.cell_from_origin(snapped)
    }

    /// Snaps a cursor using this playfield's geometry.
    #[must_use]
    pub fn snap(&self, cursor: PixelPoint) -> PixelPoint {
        snap_to_grid(
            cursor,
            self.cell_size,
            self.top_pixels(),
            self.left_pixels(),
        )
    }

    /// Pixel position of the top-left corner of a cell.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> PixelPoint {
        let size = i64::from(self.cell_size);
        let x = i64::from(cell.column()) * size + i64::from(self.left_boundary);
        let y = i64::from(cell.row()) * size + i64::from(self.top_boundary);
        PixelPoint::new(clamp_to_i32(x), clamp_to_i32(y))
    }

    /// Converts a grid-aligned pixel position back into its cell.
    ///
    /// Returns `None` when the point is not a cell corner or lies outside the
    /// grid.
    #[must_use]
    pub fn cell_from_origin(&self, point: PixelPoint) -> Option<CellCoord> {
        let size = i64::from(self.cell_size);
        let dx = i64::from(point.x) - i64::from(self.left_boundary);
        let dy = i64::from(point.y) - i64::from(self.top_boundary);
        if dx < 0 || dy < 0 || dx % size != 0 || dy % size != 0 {
            return None;
        }
        let column = u32::try_from(dx / size).ok()?;
        let row = u32::try_from(dy / size).ok()?;
        let cell = CellCoord::new(column, row);
        self.contains_cell(cell).then_some(cell)
    }

    fn top_pixels(&self) -> i32 {
        i32::try_from(self.top_boundary).unwrap_or(i32::MAX)
    }

    fn left_pixels(&self) -> i32 {
        i32::try_from(self.left_boundary).unwrap_or(i32::MAX)
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            top_boundary: DEFAULT_TOP_BOUNDARY,
            left_boundary: DEFAULT_LEFT_BOUNDARY,
        }
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
