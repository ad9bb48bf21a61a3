//! Row-major pixel grids.

use serde::{Deserialize, Serialize};

/// Errors produced when building a [`Grid`] from a raw buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid grid buffer length (expected {expected} cells, got {got})")]
    InvalidBuffer { expected: usize, got: usize },
}

/// Dense 2D grid stored row-major: `data[row * width + col]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Depth map in millimeters. `0` means the sensor had no return.
pub type DepthMap = Grid<u16>;

/// RGB8 color image.
pub type ColorImage = Grid<Rgb>;

/// One RGB8 pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const YELLOW: Rgb = Rgb([255, 255, 0]);
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const GREEN: Rgb = Rgb([0, 255, 0]);

    /// ITU-R BT.601 luma, integer arithmetic.
    #[inline]
    pub fn luma(self) -> u8 {
        let [r, g, b] = self.0;
        ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
    }
}

impl<T> Grid<T> {
    /// Wrap a row-major buffer. Both dimensions must be non-zero.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let Some(expected) = width.checked_mul(height) else {
            return Err(GridError::InvalidDimensions { width, height });
        };
        if data.len() != expected {
            return Err(GridError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> T,
    ) -> Result<Self, GridError> {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self::from_vec(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col)
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get_mut(row * self.width + col)
    }

    /// One full row, or `None` when `row` is out of bounds.
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.data.get(start..start + self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.data.chunks_exact(self.width)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [T]> {
        self.data.chunks_exact_mut(self.width)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Apply `f` to every cell, keeping the layout.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(&mut f).collect(),
        }
    }
}

impl<T: Clone> Grid<T> {
    /// Grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Result<Self, GridError> {
        let len = width
            .checked_mul(height)
            .ok_or(GridError::InvalidDimensions { width, height })?;
        Self::from_vec(width, height, vec![value; len])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        let err = Grid::<u16>::from_vec(0, 4, Vec::new()).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidDimensions {
                width: 0,
                height: 4
            }
        );
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = Grid::from_vec(3, 2, vec![0u16; 5]).unwrap_err();
        assert_eq!(err, GridError::InvalidBuffer { expected: 6, got: 5 });
    }

    #[test]
    fn indexing_is_row_major() {
        let grid = Grid::from_fn(4, 3, |row, col| (row * 10 + col) as u16).expect("grid");
        assert_eq!(grid.get(2, 3), Some(&23));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 4), None);
        assert_eq!(grid.row(1), Some(&[10u16, 11, 12, 13][..]));
        assert_eq!(grid.rows().count(), 3);
    }

    #[test]
    fn luma_matches_bt601_extremes() {
        assert_eq!(Rgb::BLACK.luma(), 0);
        assert_eq!(Rgb::WHITE.luma(), 255);
        assert_eq!(Rgb([255, 0, 0]).luma(), 76);
    }
}
