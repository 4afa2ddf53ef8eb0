//! Rectangular `#`/`.` bitmaps with copy-based rotation and reflection

use std::fmt;
use std::iter;

use aoc_framework::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: unexpected character {ch:?}")]
    InvalidCell { line: usize, ch: char },
}

impl From<BitmapError> for ParseError {
    fn from(err: BitmapError) -> Self {
        match err {
            BitmapError::RaggedRow { line, .. } | BitmapError::InvalidCell { line, .. } => {
                ParseError::InvalidLine {
                    line,
                    reason: err.to_string(),
                }
            }
        }
    }
}

/// Row-major grid of booleans, `true` meaning `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Bitmap {
    /// An all-clear bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Parses rows of `#` and `.`; `first_line` is the 1-based number of the
    /// first row in the original input, used in error messages.
    pub fn parse<'a>(
        rows: impl IntoIterator<Item = &'a str>,
        first_line: usize,
    ) -> Result<Self, BitmapError> {
        let mut width = None;
        let mut height = 0;
        let mut cells = Vec::new();

        for (offset, row) in rows.into_iter().enumerate() {
            let line = first_line + offset;
            let row = row.trim_end();
            let expected = *width.get_or_insert(row.len());
            if row.len() != expected {
                return Err(BitmapError::RaggedRow {
                    line,
                    expected,
                    found: row.len(),
                });
            }
            for ch in row.chars() {
                cells.push(match ch {
                    '#' => true,
                    '.' => false,
                    ch => return Err(BitmapError::InvalidCell { line, ch }),
                });
            }
            height += 1;
        }

        Ok(Self {
            width: width.unwrap_or(0),
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

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.cells[y * self.width + x] = value;
    }

    pub fn row(&self, y: usize) -> &[bool] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    /// Coordinates of every set cell, row-major.
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(|(i, _)| (i % self.width, i / self.width))
    }

    pub fn count_set(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Clockwise quarter turn into a fresh buffer.
    pub fn rotate_cw(&self) -> Self {
        let mut out = Self::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(self.height - 1 - y, x, self.get(x, y));
            }
        }
        out
    }

    /// Mirror left-right into a fresh buffer.
    pub fn flip_horizontal(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.set(self.width - 1 - x, y, self.get(x, y));
            }
        }
        out
    }

    /// All 8 orientations: the 4 rotations, then the 4 rotations of the mirror
    /// image. The first item is `self` unchanged.
    pub fn symmetries(&self) -> impl Iterator<Item = Bitmap> + '_ {
        [self.clone(), self.flip_horizontal()]
            .into_iter()
            .flat_map(|base| iter::successors(Some(base), |b| Some(b.rotate_cw())).take(4))
    }

    /// Copy of the `width`×`height` window whose top-left corner is `(x, y)`.
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Self {
        let mut out = Self::new(width, height);
        for dy in 0..height {
            for dx in 0..width {
                out.set(dx, dy, self.get(x + dx, y + dy));
            }
        }
        out
    }

    /// Copies `other` into `self` with its top-left corner at `(x, y)`.
    pub fn blit(&mut self, other: &Bitmap, x: usize, y: usize) {
        for dy in 0..other.height {
            for dx in 0..other.width {
                self.set(x + dx, y + dy, other.get(dx, dy));
            }
        }
    }
}

impl fmt::Display for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for &cell in self.row(y) {
                f.write_str(if cell { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(text: &str) -> Bitmap {
        Bitmap::parse(text.lines(), 1).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let b = bitmap("#..\n.##");
        assert_eq!((b.width(), b.height()), (3, 2));
        assert!(b.get(0, 0) && b.get(2, 1) && !b.get(1, 0));
        assert_eq!(b.to_string(), "#..\n.##\n");
        assert_eq!(b.count_set(), 3);
        assert_eq!(b.iter_set().collect::<Vec<_>>(), vec![(0, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        assert_eq!(
            Bitmap::parse("##\n#".lines(), 10),
            Err(BitmapError::RaggedRow {
                line: 11,
                expected: 2,
                found: 1
            })
        );
        let err = Bitmap::parse(["#x"], 4).unwrap_err();
        assert_eq!(err, BitmapError::InvalidCell { line: 4, ch: 'x' });
        assert!(matches!(
            ParseError::from(err),
            ParseError::InvalidLine { line: 4, .. }
        ));
    }

    #[test]
    fn test_rotation_non_square() {
        let b = bitmap("#..\n.##");
        let r = b.rotate_cw();
        assert_eq!(r.to_string(), ".#\n#.\n#.\n");
        assert_eq!(r.rotate_cw().rotate_cw().rotate_cw(), b);
    }

    #[test]
    fn test_odd_size_rotation_keeps_center() {
        let b = bitmap("#..\n.#.\n..#");
        assert_eq!(b.rotate_cw().to_string(), "..#\n.#.\n#..\n");
        assert!(b.rotate_cw().get(1, 1));
    }

    #[test]
    fn test_symmetries_are_distinct_for_asymmetric_shape() {
        let b = bitmap("##.\n#..\n#..");
        let all: Vec<Bitmap> = b.symmetries().collect();
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], b);
        assert_eq!(all[4], b.flip_horizontal());
        for (i, a) in all.iter().enumerate() {
            for other in &all[i + 1..] {
                assert_ne!(a, other);
            }
        }
    }

    #[test]
    fn test_crop_and_blit() {
        let b = bitmap("####\n#..#\n#..#\n####");
        let inner = b.crop(1, 1, 2, 2);
        assert_eq!(inner.count_set(), 0);

        let mut canvas = Bitmap::new(4, 2);
        canvas.blit(&b.crop(0, 0, 2, 2), 2, 0);
        assert_eq!(canvas.to_string(), "..##\n..#.\n");
    }
}
