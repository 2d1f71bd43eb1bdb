//! Toroidal activation field.

use lenia_core::{wrap_index, Bounds, Error, FieldStats, Position, Result};
use serde::{Deserialize, Serialize};

/// A 2D toroidal grid of activation values, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl Field {
    /// A zero dimension gives an empty field with no addressable cells
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0.0; width * height],
        }
    }

    /// Wrap existing row-major cells
    pub fn from_cells(width: usize, height: usize, cells: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Validation(format!(
                "field dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        if cells.len() != width * height {
            return Err(Error::Validation(format!(
                "field of {}x{} needs {} cells, got {}",
                width,
                height,
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Get value at position (with toroidal wrapping)
    pub fn get(&self, pos: Position) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.cells[self.pos_to_index(pos)]
    }

    /// Set value at position (with toroidal wrapping)
    pub fn set(&mut self, pos: Position, value: f32) {
        if self.is_empty() {
            return;
        }
        let index = self.pos_to_index(pos);
        self.cells[index] = value;
    }

    /// Value of an in-range cell, wrapping coordinates past the edges
    pub fn value_at(&self, x: usize, y: usize) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        self.cells[(y % self.height) * self.width + (x % self.width)]
    }

    /// Value at a signed offset from `(x, y)`, wrapping around both axes
    #[inline]
    pub fn wrapped(&self, x: isize, y: isize) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        let xx = wrap_index(x, self.width);
        let yy = wrap_index(y, self.height);
        self.cells[yy * self.width + xx]
    }

    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [f32] {
        &mut self.cells
    }

    pub fn fill(&mut self, value: f32) {
        self.cells.fill(value);
    }

    pub fn clamp_to(&mut self, bounds: Bounds) {
        for v in &mut self.cells {
            *v = bounds.clamp(*v);
        }
    }

    /// Translate the whole field: `new(x, y) = old(x - dx, y - dy)`
    pub fn shifted(&self, dx: i32, dy: i32) -> Field {
        let mut out = Field::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.cells[y * self.width + x] =
                    self.wrapped(x as isize - dx as isize, y as isize - dy as isize);
            }
        }
        out
    }

    /// Rotate by `angle` radians about the grid centre.
    ///
    /// Nearest-neighbour resampling; source coordinates wrap, so no cell is
    /// ever left unfilled.
    pub fn rotated(&self, angle: f32) -> Field {
        let (sin_a, cos_a) = angle.sin_cos();
        let cx = self.width as f32 / 2.0;
        let cy = self.height as f32 / 2.0;

        let mut out = Field::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let rx = x as f32 - cx;
                let ry = y as f32 - cy;
                let src_x = (rx * cos_a + ry * sin_a + cx).round() as isize;
                let src_y = (-rx * sin_a + ry * cos_a + cy).round() as isize;
                out.cells[y * self.width + x] = self.wrapped(src_x, src_y);
            }
        }
        out
    }

    pub fn stats(&self, active_threshold: f32) -> FieldStats {
        FieldStats::from_cells(self.width, &self.cells, active_threshold)
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        let wrapped = pos.wrap(self.width as i32, self.height as i32);
        wrapped.y as usize * self.width + wrapped.x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = Field::new(10, 6);
        assert_eq!(field.width(), 10);
        assert_eq!(field.height(), 6);
        assert_eq!(field.len(), 60);
        assert!(field.cells().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_cells_checks_length() {
        assert!(Field::from_cells(3, 3, vec![0.0; 9]).is_ok());
        assert!(matches!(
            Field::from_cells(3, 3, vec![0.0; 8]),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_toroidal_wrapping() {
        let mut field = Field::new(10, 10);
        field.set(Position::new(9, 9), 0.5);

        // (-1, -1) wraps to (9, 9)
        assert_eq!(field.get(Position::new(-1, -1)), 0.5);
        assert_eq!(field.wrapped(-1, -11), 0.5);
        assert_eq!(field.value_at(19, 9), 0.5);

        field.set(Position::new(10, 10), 0.25);
        assert_eq!(field.value_at(0, 0), 0.25);
    }

    #[test]
    fn test_shift_wraps() {
        let mut field = Field::new(4, 3);
        field.set(Position::new(3, 0), 1.0);

        let right = field.shifted(1, 0);
        assert_eq!(right.get(Position::new(0, 0)), 1.0);
        assert_eq!(right.get(Position::new(3, 0)), 0.0);

        let up = field.shifted(0, -1);
        assert_eq!(up.get(Position::new(3, 2)), 1.0);

        // Shifting back restores the original
        assert_eq!(right.shifted(-1, 0), field);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let mut field = Field::new(8, 8);
        for (i, v) in field.cells_mut().iter_mut().enumerate() {
            *v = i as f32 / 64.0;
        }
        assert_eq!(field.rotated(0.0), field);
    }

    #[test]
    fn test_rotation_preserves_value_set() {
        let mut field = Field::new(16, 16);
        field.set(Position::new(8, 8), 0.7);
        let rotated = field.rotated(2.0f32.to_radians());
        // The centre maps onto itself
        assert_eq!(rotated.get(Position::new(8, 8)), 0.7);
        assert!(rotated.cells().iter().all(|&v| v == 0.0 || v == 0.7));
    }

    #[test]
    fn test_clamp_to() {
        let mut field = Field::from_cells(2, 1, vec![-0.5, 1.5]).unwrap();
        field.clamp_to(Bounds::headroom());
        assert_eq!(field.cells(), &[0.0, 0.95]);
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(Field::from_cells(0, 0, vec![]), Err(Error::Validation(_))));
        assert!(matches!(Field::from_cells(0, 4, vec![]), Err(Error::Validation(_))));

        // A zero-sized field holds nothing and reads as zero
        let mut field = Field::new(0, 5);
        assert!(field.is_empty());
        assert_eq!(field.value_at(3, 2), 0.0);
        assert_eq!(field.get(Position::new(-1, 7)), 0.0);
        assert_eq!(field.wrapped(-1, 7), 0.0);
        field.set(Position::new(1, 1), 0.5);
        assert!(field.is_empty());
    }
}
