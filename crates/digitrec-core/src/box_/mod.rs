//! Box, Boxa - Rectangle regions
//!
//! These structures represent rectangular regions in an image. A `Box`
//! is half-open: it covers columns `x..x + w` and rows `y..y + h`.

use crate::error::{Error, Result};

/// A rectangle region
///
/// A simple `Copy` type since it's small and frequently copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Box {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Box {
    /// Create a new box
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "box dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a box without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a box from its top-left and (exclusive) bottom-right corners
    ///
    /// # Errors
    ///
    /// Returns an error unless `x1 < x2` and `y1 < y2`.
    pub fn from_corners(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self> {
        if x1 >= x2 || y1 >= y2 {
            return Err(Error::InvalidParameter(format!(
                "corners ({}, {})-({}, {}) do not span a box",
                x1, y1, x2, y2
            )));
        }
        Ok(Self {
            x: x1,
            y: y1,
            w: x2 - x1,
            h: y2 - y1,
        })
    }

    /// Top-left and (exclusive) bottom-right corners as `((x, y), (x, y))`
    pub fn corners(&self) -> ((i32, i32), (i32, i32)) {
        ((self.x, self.y), (self.right(), self.bottom()))
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Check if the box is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if this box overlaps with another
    pub fn overlaps(&self, other: &Box) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Clip the box to fit within `[0, width) x [0, height)`
    pub fn clip(&self, width: i32, height: i32) -> Option<Box> {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);

        if x < right && y < bottom {
            Some(Box {
                x,
                y,
                w: right - x,
                h: bottom - y,
            })
        } else {
            None
        }
    }
}

/// Array of boxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boxa {
    boxes: Vec<Box>,
}

impl Boxa {
    /// Create a new empty Boxa
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Create a Boxa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            boxes: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of boxes
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Get a box by index
    pub fn get(&self, index: usize) -> Option<&Box> {
        self.boxes.get(index)
    }

    /// Add a box
    pub fn push(&mut self, b: Box) {
        self.boxes.push(b);
    }

    /// Get all boxes as a slice
    pub fn boxes(&self) -> &[Box] {
        &self.boxes
    }

    /// Iterate over the boxes
    pub fn iter(&self) -> std::slice::Iter<'_, Box> {
        self.boxes.iter()
    }

    /// Smallest box containing every box of the array
    pub fn bounding_box(&self) -> Option<Box> {
        let first = self.boxes.first()?;
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.right(), first.bottom());
        for b in &self.boxes[1..] {
            x0 = x0.min(b.x);
            y0 = y0.min(b.y);
            x1 = x1.max(b.right());
            y1 = y1.max(b.bottom());
        }
        Some(Box::new_unchecked(x0, y0, x1 - x0, y1 - y0))
    }
}

impl FromIterator<Box> for Boxa {
    fn from_iter<T: IntoIterator<Item = Box>>(iter: T) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Boxa {
    type Item = &'a Box;
    type IntoIter = std::slice::Iter<'a, Box>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

impl IntoIterator for Boxa {
    type Item = Box;
    type IntoIter = std::vec::IntoIter<Box>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.into_iter()
    }
}

impl std::ops::Index<usize> for Boxa {
    type Output = Box;

    fn index(&self, index: usize) -> &Self::Output {
        &self.boxes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_new() {
        assert!(Box::new(0, 0, -1, 2).is_err());
        let b = Box::new(2, 3, 4, 5).unwrap();
        assert_eq!(b.right(), 6);
        assert_eq!(b.bottom(), 8);
        assert_eq!(b.area(), 20);
    }

    #[test]
    fn test_from_corners() {
        let b = Box::from_corners(5, 5, 15, 15).unwrap();
        assert_eq!(b, Box::new_unchecked(5, 5, 10, 10));
        assert_eq!(b.corners(), ((5, 5), (15, 15)));
        assert!(Box::from_corners(5, 5, 5, 15).is_err());
        assert!(Box::from_corners(5, 9, 7, 3).is_err());
    }

    #[test]
    fn test_clip() {
        let b = Box::new_unchecked(-2, -2, 5, 5);
        assert_eq!(b.clip(10, 10), Some(Box::new_unchecked(0, 0, 3, 3)));
        assert_eq!(Box::new_unchecked(12, 0, 3, 3).clip(10, 10), None);
    }

    #[test]
    fn test_boxa_bounding_box() {
        let boxa: Boxa = [Box::new_unchecked(1, 1, 2, 2), Box::new_unchecked(5, 0, 1, 8)]
            .into_iter()
            .collect();
        assert_eq!(boxa.len(), 2);
        assert_eq!(boxa.bounding_box(), Some(Box::new_unchecked(1, 0, 5, 8)));
        assert_eq!(Boxa::new().bounding_box(), None);
    }
}
