//! Band sweep over two rectangle lists
//!
//! Both inputs are in canonical banded form. The sweep walks the bands of
//! both lists top to bottom, splits them at every distinct top/bottom edge,
//! combines the spans of vertically overlapping bands, and coalesces each
//! output band with the previous one when their spans line up.

use crate::protocol::Rect;

/// Boolean operation applied by the sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BandOp {
    Union,
    Intersect,
    Subtract,
}

impl BandOp {
    /// Parts of the first operand not covered vertically by the second
    fn keeps_first(self) -> bool {
        matches!(self, BandOp::Union | BandOp::Subtract)
    }

    /// Parts of the second operand not covered vertically by the first
    fn keeps_second(self) -> bool {
        matches!(self, BandOp::Union)
    }

    fn combine(self, out: &mut Vec<Rect>, b1: &[Rect], b2: &[Rect], top: i32, bottom: i32) {
        match self {
            BandOp::Union => union_spans(out, b1, b2, top, bottom),
            BandOp::Intersect => intersect_spans(out, b1, b2, top, bottom),
            BandOp::Subtract => subtract_spans(out, b1, b2, top, bottom),
        }
    }
}

/// Index one past the end of the band starting at `start`
pub(crate) fn band_end(rects: &[Rect], start: usize) -> usize {
    let top = rects[start].top;
    let mut end = start + 1;
    while end < rects.len() && rects[end].top == top {
        end += 1;
    }
    end
}

/// Run `op` over two canonical rectangle lists, producing a canonical list
pub(crate) fn region_op(a: &[Rect], b: &[Rect], op: BandOp) -> Vec<Rect> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut i1 = 0;
    let mut i2 = 0;
    let mut prev_band = 0;

    // Bottom of the last vertical span handled; band tops left over from a
    // partially consumed band are clamped to it.
    let mut ybot = i32::MIN;

    while i1 < a.len() && i2 < b.len() {
        let e1 = band_end(a, i1);
        let e2 = band_end(b, i2);
        let r1 = a[i1];
        let r2 = b[i2];

        let ytop = if r1.top < r2.top {
            if op.keeps_first() {
                let top = r1.top.max(ybot);
                let bot = r1.bottom.min(r2.top);
                if top < bot {
                    let cur = out.len();
                    append_band(&mut out, &a[i1..e1], top, bot);
                    prev_band = coalesce(&mut out, prev_band, cur);
                }
            }
            r2.top
        } else if r2.top < r1.top {
            if op.keeps_second() {
                let top = r2.top.max(ybot);
                let bot = r2.bottom.min(r1.top);
                if top < bot {
                    let cur = out.len();
                    append_band(&mut out, &b[i2..e2], top, bot);
                    prev_band = coalesce(&mut out, prev_band, cur);
                }
            }
            r1.top
        } else {
            r1.top
        };

        ybot = r1.bottom.min(r2.bottom);
        if ybot > ytop {
            let cur = out.len();
            op.combine(&mut out, &a[i1..e1], &b[i2..e2], ytop, ybot);
            if out.len() > cur {
                prev_band = coalesce(&mut out, prev_band, cur);
            }
        }

        if r1.bottom == ybot {
            i1 = e1;
        }
        if r2.bottom == ybot {
            i2 = e2;
        }
    }

    if op.keeps_first() {
        prev_band = append_rest(&mut out, a, i1, ybot, prev_band);
    }
    if op.keeps_second() {
        append_rest(&mut out, b, i2, ybot, prev_band);
    }

    out.shrink_to_fit();
    out
}

/// Copy the bands of `rects` from `start` on, clamping the first to `ybot`
fn append_rest(
    out: &mut Vec<Rect>,
    rects: &[Rect],
    start: usize,
    ybot: i32,
    mut prev_band: usize,
) -> usize {
    let mut i = start;
    while i < rects.len() {
        let end = band_end(rects, i);
        let top = rects[i].top.max(ybot);
        let bottom = rects[i].bottom;
        if top < bottom {
            let cur = out.len();
            append_band(out, &rects[i..end], top, bottom);
            prev_band = coalesce(out, prev_band, cur);
        }
        i = end;
    }
    prev_band
}

fn append_band(out: &mut Vec<Rect>, band: &[Rect], top: i32, bottom: i32) {
    out.extend(band.iter().map(|r| Rect::new(r.left, top, r.right, bottom)));
}

/// Merge the band starting at `cur` into the one starting at `prev` when
/// they touch vertically and have identical spans.
///
/// Returns the start of the last band in `out`.
fn coalesce(out: &mut Vec<Rect>, prev: usize, cur: usize) -> usize {
    let prev_len = cur - prev;
    let cur_len = out.len() - cur;
    if prev_len != cur_len || cur_len == 0 {
        return cur;
    }
    if out[prev].bottom != out[cur].top {
        return cur;
    }
    let same_spans = out[prev..cur]
        .iter()
        .zip(&out[cur..])
        .all(|(p, c)| p.left == c.left && p.right == c.right);
    if !same_spans {
        return cur;
    }

    let bottom = out[cur].bottom;
    for rect in &mut out[prev..cur] {
        rect.bottom = bottom;
    }
    out.truncate(cur);
    prev
}

/// Append a span to the band starting at `band_start`, merging it with the
/// last span when they touch or overlap
fn push_span(out: &mut Vec<Rect>, band_start: usize, left: i32, right: i32, top: i32, bottom: i32) {
    if let Some(last) = out[band_start..].last_mut() {
        if last.right >= left {
            if last.right < right {
                last.right = right;
            }
            return;
        }
    }
    out.push(Rect::new(left, top, right, bottom));
}

fn union_spans(out: &mut Vec<Rect>, b1: &[Rect], b2: &[Rect], top: i32, bottom: i32) {
    let band_start = out.len();
    let mut i = 0;
    let mut j = 0;

    while i < b1.len() || j < b2.len() {
        let take_first = match (b1.get(i), b2.get(j)) {
            (Some(r1), Some(r2)) => r1.left <= r2.left,
            (Some(_), None) => true,
            _ => false,
        };
        let span = if take_first {
            i += 1;
            b1[i - 1]
        } else {
            j += 1;
            b2[j - 1]
        };
        push_span(out, band_start, span.left, span.right, top, bottom);
    }
}

fn intersect_spans(out: &mut Vec<Rect>, b1: &[Rect], b2: &[Rect], top: i32, bottom: i32) {
    let mut i = 0;
    let mut j = 0;

    while i < b1.len() && j < b2.len() {
        let left = b1[i].left.max(b2[j].left);
        let right = b1[i].right.min(b2[j].right);
        if left < right {
            out.push(Rect::new(left, top, right, bottom));
        }

        // Advance whichever span ends first
        if b1[i].right < b2[j].right {
            i += 1;
        } else if b2[j].right < b1[i].right {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
}

fn subtract_spans(
    out: &mut Vec<Rect>,
    minuend: &[Rect],
    subtrahend: &[Rect],
    top: i32,
    bottom: i32,
) {
    let mut j = 0;

    for span in minuend {
        let mut left = span.left;
        let right = span.right;

        // Spans of the subtrahend entirely to the left are done with
        while j < subtrahend.len() && subtrahend[j].right <= left {
            j += 1;
        }

        let mut k = j;
        while k < subtrahend.len() && subtrahend[k].left < right {
            let cut = subtrahend[k];
            if cut.left > left {
                out.push(Rect::new(left, top, cut.left, bottom));
            }
            left = left.max(cut.right);
            if left >= right {
                break;
            }
            k += 1;
        }

        if left < right {
            out.push(Rect::new(left, top, right, bottom));
        }
    }
}

/// Smallest rectangle enclosing a canonical list
pub(crate) fn compute_extents(rects: &[Rect]) -> Rect {
    let (first, last) = match (rects.first(), rects.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Rect::EMPTY,
    };
    let mut extents = Rect::new(first.left, first.top, first.right, last.bottom);
    for rect in rects {
        extents.left = extents.left.min(rect.left);
        extents.right = extents.right.max(rect.right);
    }
    extents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect::new(left, top, right, bottom)
    }

    #[test]
    fn test_union_overlapping_squares() {
        let out = region_op(&[r(0, 0, 10, 10)], &[r(5, 5, 15, 15)], BandOp::Union);
        assert_eq!(out, vec![r(0, 0, 10, 5), r(0, 5, 15, 10), r(5, 10, 15, 15)]);
    }

    #[test]
    fn test_union_coalesces_vertically() {
        let out = region_op(&[r(0, 0, 10, 5)], &[r(0, 5, 10, 10)], BandOp::Union);
        assert_eq!(out, vec![r(0, 0, 10, 10)]);
    }

    #[test]
    fn test_union_merges_touching_spans() {
        let out = region_op(&[r(0, 0, 5, 5)], &[r(5, 0, 10, 5)], BandOp::Union);
        assert_eq!(out, vec![r(0, 0, 10, 5)]);
    }

    #[test]
    fn test_intersect() {
        let out = region_op(&[r(0, 0, 10, 10)], &[r(5, 5, 15, 15)], BandOp::Intersect);
        assert_eq!(out, vec![r(5, 5, 10, 10)]);

        let out = region_op(&[r(0, 0, 10, 10)], &[r(10, 0, 20, 10)], BandOp::Intersect);
        assert!(out.is_empty());
    }

    #[test]
    fn test_subtract() {
        let out = region_op(&[r(0, 0, 10, 10)], &[r(5, 5, 15, 15)], BandOp::Subtract);
        assert_eq!(out, vec![r(0, 0, 10, 5), r(0, 5, 5, 10)]);
    }

    #[test]
    fn test_subtract_hole() {
        let out = region_op(&[r(0, 0, 9, 9)], &[r(3, 3, 6, 6)], BandOp::Subtract);
        assert_eq!(
            out,
            vec![r(0, 0, 9, 3), r(0, 3, 3, 6), r(6, 3, 9, 6), r(0, 6, 9, 9)]
        );
    }

    #[test]
    fn test_subtract_spanning_cut() {
        // One cut spanning two minuend spans
        let a = [r(0, 0, 2, 2), r(4, 0, 6, 2)];
        let out = region_op(&a, &[r(1, 0, 5, 2)], BandOp::Subtract);
        assert_eq!(out, vec![r(0, 0, 1, 2), r(5, 0, 6, 2)]);
    }

    #[test]
    fn test_empty_operands() {
        let a = [r(0, 0, 4, 4)];
        assert_eq!(region_op(&a, &[], BandOp::Union), a.to_vec());
        assert_eq!(region_op(&[], &a, BandOp::Union), a.to_vec());
        assert!(region_op(&a, &[], BandOp::Intersect).is_empty());
        assert_eq!(region_op(&a, &[], BandOp::Subtract), a.to_vec());
        assert!(region_op(&[], &a, BandOp::Subtract).is_empty());
    }

    #[test]
    fn test_extents() {
        assert_eq!(compute_extents(&[]), Rect::EMPTY);
        let rects = [r(2, 0, 4, 1), r(0, 1, 3, 2), r(5, 1, 9, 2)];
        assert_eq!(compute_extents(&rects), r(0, 0, 9, 2));
    }
}
