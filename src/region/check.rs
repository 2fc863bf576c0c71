//! Structural checks for the canonical banded form

use super::ops::{band_end, compute_extents};
use crate::protocol::Rect;
use thiserror::Error;

/// First broken invariant found by [`validate_rects`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("rectangle {index} is empty: {rect}")]
    EmptyRect { index: usize, rect: Rect },

    #[error("rectangle {index} does not share its band's bottom edge")]
    RaggedBand { index: usize },

    #[error("rectangle {index} overlaps or touches its left neighbour")]
    UnsortedSpan { index: usize },

    #[error("band at rectangle {index} starts above the previous band's bottom")]
    UnsortedBand { index: usize },

    #[error("band at rectangle {index} repeats the spans of the band above it")]
    Uncoalesced { index: usize },

    #[error("cached extents {cached} differ from computed {computed}")]
    StaleExtents { cached: Rect, computed: Rect },
}

/// Check a rectangle list and its cached extents against the canonical form
pub fn validate_rects(rects: &[Rect], extents: &Rect) -> Result<(), InvariantViolation> {
    let mut prev_band: Option<(usize, usize)> = None;
    let mut start = 0;

    while start < rects.len() {
        let end = band_end(rects, start);
        let band = &rects[start..end];

        for (offset, rect) in band.iter().enumerate() {
            let index = start + offset;
            if rect.is_empty() {
                return Err(InvariantViolation::EmptyRect { index, rect: *rect });
            }
            if rect.bottom != band[0].bottom {
                return Err(InvariantViolation::RaggedBand { index });
            }
            if offset > 0 && band[offset - 1].right >= rect.left {
                return Err(InvariantViolation::UnsortedSpan { index });
            }
        }

        if let Some((prev_start, prev_end)) = prev_band {
            let prev = &rects[prev_start..prev_end];
            if prev[0].bottom > band[0].top {
                return Err(InvariantViolation::UnsortedBand { index: start });
            }
            let same_spans = prev.len() == band.len()
                && prev
                    .iter()
                    .zip(band)
                    .all(|(p, c)| p.left == c.left && p.right == c.right);
            if prev[0].bottom == band[0].top && same_spans {
                return Err(InvariantViolation::Uncoalesced { index: start });
            }
        }

        prev_band = Some((start, end));
        start = end;
    }

    let computed = compute_extents(rects);
    if computed != *extents {
        return Err(InvariantViolation::StaleExtents {
            cached: *extents,
            computed,
        });
    }

    Ok(())
}
