//! Range extraction from 1-D projections
//!
//! A [`Range`] is a maximal run of non-zero projection values. Runs are
//! half-open: `end` is the index of the first zero after the run, so a
//! range can be used directly as a slice bound.

/// Half-open index range `[start, end)` over a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Create a range. Returns `None` unless `start < end`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Number of indices covered
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false for a constructed range
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether `index` falls inside the range
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }
}

impl From<Range> for std::ops::Range<usize> {
    fn from(r: Range) -> Self {
        r.start..r.end
    }
}

/// Extract the runs of non-zero values from a projection.
///
/// The scan opens a run at a non-zero value and closes it at the next
/// zero. Output ranges are non-overlapping and strictly increasing.
///
/// A run still open when the sequence ends is dropped: ink touching the
/// far edge of the image yields no range for that run.
pub fn extract_ranges(values: &[f32]) -> Vec<Range> {
    let mut ranges = Vec::new();
    let mut open: Option<usize> = None;
    for (i, &v) in values.iter().enumerate() {
        match (open, v != 0.0) {
            (None, true) => open = Some(i),
            (Some(start), false) => {
                ranges.extend(Range::new(start, i));
                open = None;
            }
            _ => {}
        }
    }
    ranges
}
