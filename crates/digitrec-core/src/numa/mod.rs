//! Numa - Numeric arrays
//!
//! Arrays of floating-point numbers. In digitrec they carry the row and
//! column projections produced by [`Pix::row_sums`](crate::Pix::row_sums)
//! and [`Pix::column_sums`](crate::Pix::column_sums).

use crate::error::{Error, Result};

/// Array of floating-point numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Numa {
    data: Vec<f32>,
}

impl Numa {
    /// Create a new empty Numa
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a Numa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Get the number of values
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a value by index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.data.get(index).copied()
    }

    /// Add a value to the end
    pub fn push(&mut self, val: f32) {
        self.data.push(val);
    }

    /// Set a value at index
    pub fn set(&mut self, index: usize, val: f32) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = val;
        Ok(())
    }

    /// Get the underlying data as a slice
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Get the maximum value and its index
    ///
    /// Ties resolve to the lowest index.
    pub fn max(&self) -> Option<(f32, usize)> {
        let mut best: Option<(f32, usize)> = None;
        for (i, &v) in self.data.iter().enumerate() {
            match best {
                Some((b, _)) if v <= b => {}
                _ => best = Some((v, i)),
            }
        }
        best
    }

    /// Get the sum of all values
    pub fn sum(&self) -> Option<f32> {
        if self.data.is_empty() {
            return None;
        }
        Some(self.data.iter().sum())
    }

    /// Number of non-zero values
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Create an iterator over values
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, f32>> {
        self.data.iter().copied()
    }
}

impl<'a> IntoIterator for &'a Numa {
    type Item = f32;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, f32>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Numa {
    type Item = f32;
    type IntoIter = std::vec::IntoIter<f32>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl FromIterator<f32> for Numa {
    fn from_iter<T: IntoIterator<Item = f32>>(iter: T) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Index<usize> for Numa {
    type Output = f32;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}
