//! Clip-region engine
//!
//! A [`Region`] is a set of pixels stored as a sorted list of
//! non-overlapping rectangles grouped into horizontal bands. Every
//! operation keeps the list in canonical form: bands sorted top to bottom,
//! spans sorted left to right and never touching, and no two vertically
//! adjacent bands with identical spans. Because the form is canonical, two
//! regions covering the same pixels compare equal.

mod check;
mod ops;

pub use check::{validate_rects, InvariantViolation};

use crate::protocol::*;
use ops::{band_end, compute_extents, region_op, BandOp};

/// Mode for [`combine_region`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CombineMode {
    And = 1,
    Or = 2,
    Xor = 3,
    Diff = 4,
    Copy = 5,
}

impl CombineMode {
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(CombineMode::And),
            2 => Some(CombineMode::Or),
            3 => Some(CombineMode::Xor),
            4 => Some(CombineMode::Diff),
            5 => Some(CombineMode::Copy),
            _ => None,
        }
    }
}

/// A 2D region in canonical banded form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
    extents: Rect,
}

impl Region {
    /// Create an empty region
    pub fn new() -> Self {
        Region::default()
    }

    /// Create a region covering a single rectangle (empty if degenerate)
    pub fn from_rect(rect: Rect) -> Self {
        let mut region = Region::new();
        region.set_rect(rect);
        region
    }

    /// Create the union of arbitrary rectangles.
    ///
    /// Input may overlap, be unsorted or contain degenerate rectangles,
    /// which are dropped. Single-rectangle regions are merged pairwise,
    /// so each rectangle takes part in a logarithmic number of unions.
    pub fn from_rects(rects: &[Rect]) -> Self {
        let mut layer: Vec<Vec<Rect>> = rects
            .iter()
            .filter(|rect| !rect.is_empty())
            .map(|rect| vec![*rect])
            .collect();

        while layer.len() > 1 {
            let mut next = Vec::with_capacity(layer.len().div_ceil(2));
            let mut iter = layer.into_iter();
            while let Some(first) = iter.next() {
                match iter.next() {
                    Some(second) => next.push(region_op(&first, &second, BandOp::Union)),
                    None => next.push(first),
                }
            }
            layer = next;
        }

        let normalized = layer.pop().unwrap_or_default();
        log::trace!("Normalized {} input rects into {}", rects.len(), normalized.len());
        Region::from_canonical(normalized)
    }

    /// Decode request data in native byte order and normalize it
    pub fn from_request_data(data: &[u8]) -> RegionResult<Self> {
        Self::from_request_data_with(&RectParser::default(), data)
    }

    /// Decode request data with an explicit parser and normalize it
    pub fn from_request_data_with(parser: &RectParser, data: &[u8]) -> RegionResult<Self> {
        let rects = parser.parse_rects(data)?;
        Ok(Region::from_rects(&rects))
    }

    fn from_canonical(rects: Vec<Rect>) -> Self {
        let extents = compute_extents(&rects);
        Region { rects, extents }
    }

    /// Member rectangles in band order
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Number of member rectangles
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Bounding rectangle, or [`Rect::EMPTY`] for an empty region
    pub fn extents(&self) -> Rect {
        self.extents
    }

    /// Number of pixels covered, saturating at `u64::MAX`
    pub fn area(&self) -> u64 {
        self.rects
            .iter()
            .fold(0u64, |total, rect| total.saturating_add(rect.area()))
    }

    /// Replace the contents with a single rectangle
    pub fn set_rect(&mut self, rect: Rect) {
        self.rects.clear();
        if rect.is_empty() {
            self.extents = Rect::EMPTY;
        } else {
            self.rects.push(rect);
            self.extents = rect;
        }
    }

    /// Remove every rectangle
    pub fn clear(&mut self) {
        self.rects.clear();
        self.extents = Rect::EMPTY;
    }

    fn replace(&mut self, rects: Vec<Rect>) {
        self.extents = compute_extents(&rects);
        self.rects = rects;
    }

    pub fn union(&self, other: &Region) -> Region {
        Region::from_canonical(self.op(other, BandOp::Union))
    }

    pub fn intersect(&self, other: &Region) -> Region {
        Region::from_canonical(self.op(other, BandOp::Intersect))
    }

    /// Pixels of `self` not in `other`
    pub fn subtract(&self, other: &Region) -> Region {
        Region::from_canonical(self.op(other, BandOp::Subtract))
    }

    pub fn xor(&self, other: &Region) -> Region {
        Region::from_canonical(xor_rects(&self.rects, &other.rects))
    }

    pub fn union_with(&mut self, other: &Region) {
        let rects = self.op(other, BandOp::Union);
        self.replace(rects);
    }

    pub fn intersect_with(&mut self, other: &Region) {
        let rects = self.op(other, BandOp::Intersect);
        self.replace(rects);
    }

    pub fn subtract_with(&mut self, other: &Region) {
        let rects = self.op(other, BandOp::Subtract);
        self.replace(rects);
    }

    pub fn xor_with(&mut self, other: &Region) {
        let rects = xor_rects(&self.rects, &other.rects);
        self.replace(rects);
    }

    fn op(&self, other: &Region, op: BandOp) -> Vec<Rect> {
        // Shortcuts that skip the sweep entirely
        match op {
            BandOp::Union if other.is_empty() => return self.rects.clone(),
            BandOp::Union if self.is_empty() => return other.rects.clone(),
            BandOp::Intersect | BandOp::Subtract if self.is_empty() => return Vec::new(),
            BandOp::Intersect if other.is_empty() => return Vec::new(),
            BandOp::Subtract if !self.extents.intersects(&other.extents) => {
                return self.rects.clone()
            }
            BandOp::Intersect if !self.extents.intersects(&other.extents) => return Vec::new(),
            _ => {}
        }

        let rects = region_op(&self.rects, &other.rects, op);
        log::trace!(
            "{:?}: {} x {} rects -> {}",
            op,
            self.rects.len(),
            other.rects.len(),
            rects.len()
        );
        rects
    }

    /// Translate by `(dx, dy)`.
    ///
    /// Returns `false` and leaves the region untouched if any coordinate
    /// would overflow.
    pub fn offset(&mut self, dx: i32, dy: i32) -> bool {
        if self.is_empty() {
            return true;
        }
        let moved: Option<Vec<Rect>> = self
            .rects
            .iter()
            .map(|rect| rect.checked_offset(dx, dy))
            .collect();
        let (Some(moved), Some(extents)) = (moved, self.extents.checked_offset(dx, dy)) else {
            log::warn!(
                "Offset ({}, {}) overflows region extents {}; ignored",
                dx,
                dy,
                self.extents
            );
            return false;
        };
        self.rects = moved;
        self.extents = extents;
        true
    }

    /// Flip horizontally inside `client_rect`.
    ///
    /// Mirroring reverses the order of spans within each band, so every
    /// band is reversed after its rectangles are flipped. Returns `false`
    /// and leaves the region untouched on coordinate overflow.
    pub fn mirror(&mut self, client_rect: &Rect) -> bool {
        let mirrored: Option<Vec<Rect>> = self
            .rects
            .iter()
            .map(|rect| rect.mirror(client_rect))
            .collect();
        let Some(mut mirrored) = mirrored else {
            log::warn!(
                "Mirroring region {} in client {} overflows; ignored",
                self.extents,
                client_rect
            );
            return false;
        };

        let mut start = 0;
        while start < mirrored.len() {
            let end = band_end(&mirrored, start);
            mirrored[start..end].reverse();
            start = end;
        }

        self.replace(mirrored);
        true
    }

    /// Check whether `(x, y)` lies in the region (right/bottom exclusive)
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        if !self.extents.contains_point(x, y) {
            return false;
        }

        // Bottoms increase monotonically across bands
        let start = self.rects.partition_point(|rect| rect.bottom <= y);
        if start == self.rects.len() || self.rects[start].top > y {
            return false;
        }
        let band = &self.rects[start..band_end(&self.rects, start)];

        let index = band.partition_point(|rect| rect.right <= x);
        index < band.len() && band[index].left <= x
    }

    /// Check whether `rect` overlaps any part of the region
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        if !self.extents.intersects(rect) {
            return false;
        }

        let start = self.rects.partition_point(|r| r.bottom <= rect.top);
        self.rects[start..]
            .iter()
            .take_while(|r| r.top < rect.bottom)
            .any(|r| r.intersects(rect))
    }

    /// Encode the region for a reply of at most `max_size` bytes.
    ///
    /// An empty region is sent as a single empty rectangle so that the
    /// reply always carries one record.
    pub fn get_data(&self, encoder: &RectEncoder, max_size: u32) -> RegionData {
        let rects: &[Rect] = if self.rects.is_empty() {
            &[Rect::EMPTY]
        } else {
            &self.rects
        };
        let reply = encoder.encode_reply(rects, max_size);
        if !reply.is_complete() {
            log::debug!(
                "Region reply truncated: {} of {} bytes",
                reply.data.len(),
                reply.total_size
            );
        }
        reply
    }

    /// Encode the region and release it
    pub fn into_data(self, encoder: &RectEncoder, max_size: u32) -> RegionData {
        self.get_data(encoder, max_size)
    }

    /// Check the canonical-form invariants
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        validate_rects(&self.rects, &self.extents)
    }
}

impl From<Rect> for Region {
    fn from(rect: Rect) -> Self {
        Region::from_rect(rect)
    }
}

impl FromIterator<Rect> for Region {
    fn from_iter<I: IntoIterator<Item = Rect>>(iter: I) -> Self {
        let rects: Vec<Rect> = iter.into_iter().collect();
        Region::from_rects(&rects)
    }
}

/// `(a \ b) ∪ (b \ a)`, computed from temporaries
fn xor_rects(a: &[Rect], b: &[Rect]) -> Vec<Rect> {
    if a.is_empty() {
        return b.to_vec();
    }
    if b.is_empty() {
        return a.to_vec();
    }
    let a_only = region_op(a, b, BandOp::Subtract);
    let b_only = region_op(b, a, BandOp::Subtract);
    region_op(&a_only, &b_only, BandOp::Union)
}

// Request-layer entry points. Destination and sources cannot alias in
// safe code; results are computed into fresh storage and swapped into the
// destination, so in-place variants on `Region` cover `dst == src`.

pub fn create_empty_region() -> Region {
    Region::new()
}

pub fn create_region_from_rects(rects: &[Rect]) -> Region {
    Region::from_rects(rects)
}

/// Decode the first `size` bytes of `data` as rectangle records
pub fn create_region_from_req_data(data: &[u8], size: usize) -> RegionResult<Region> {
    if size > data.len() {
        return Err(RegionError::CountMismatch {
            count: size / RECT_RECORD_SIZE,
            len: data.len(),
        });
    }
    Region::from_request_data(&data[..size])
}

pub fn set_region_rect(region: &mut Region, rect: &Rect) {
    region.set_rect(*rect);
}

pub fn get_region_data(region: &Region, max_size: u32) -> RegionData {
    region.get_data(&RectEncoder::default(), max_size)
}

pub fn get_region_data_and_free(region: Region, max_size: u32) -> RegionData {
    region.into_data(&RectEncoder::default(), max_size)
}

pub fn is_region_empty(region: &Region) -> bool {
    region.is_empty()
}

pub fn get_region_extents(region: &Region) -> Rect {
    region.extents()
}

pub fn offset_region(region: &mut Region, x: i32, y: i32) {
    region.offset(x, y);
}

pub fn mirror_region(client_rect: &Rect, region: &mut Region) {
    region.mirror(client_rect);
}

pub fn copy_region<'a>(dst: &'a mut Region, src: &Region) -> &'a mut Region {
    dst.clone_from(src);
    dst
}

pub fn intersect_region<'a>(dst: &'a mut Region, a: &Region, b: &Region) -> &'a mut Region {
    let rects = a.op(b, BandOp::Intersect);
    dst.replace(rects);
    dst
}

pub fn subtract_region<'a>(dst: &'a mut Region, a: &Region, b: &Region) -> &'a mut Region {
    let rects = a.op(b, BandOp::Subtract);
    dst.replace(rects);
    dst
}

pub fn union_region<'a>(dst: &'a mut Region, a: &Region, b: &Region) -> &'a mut Region {
    let rects = a.op(b, BandOp::Union);
    dst.replace(rects);
    dst
}

pub fn xor_region<'a>(dst: &'a mut Region, a: &Region, b: &Region) -> &'a mut Region {
    let rects = xor_rects(&a.rects, &b.rects);
    dst.replace(rects);
    dst
}

/// Combine `a` and `b` into `dst`; `Copy` ignores `b`
pub fn combine_region<'a>(
    dst: &'a mut Region,
    a: &Region,
    b: &Region,
    mode: CombineMode,
) -> &'a mut Region {
    match mode {
        CombineMode::And => intersect_region(dst, a, b),
        CombineMode::Or => union_region(dst, a, b),
        CombineMode::Xor => xor_region(dst, a, b),
        CombineMode::Diff => subtract_region(dst, a, b),
        CombineMode::Copy => copy_region(dst, a),
    }
}

pub fn point_in_region(region: &Region, x: i32, y: i32) -> bool {
    region.contains_point(x, y)
}

pub fn rect_in_region(region: &Region, rect: &Rect) -> bool {
    region.intersects_rect(rect)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect::new(left, top, right, bottom)
    }

    #[test]
    fn test_empty_region() {
        let region = create_empty_region();
        assert!(is_region_empty(&region));
        assert_eq!(get_region_extents(&region), Rect::EMPTY);
        assert_eq!(region.validate(), Ok(()));
    }

    #[test]
    fn test_set_region_rect() {
        let mut region = Region::from_rects(&[r(0, 0, 3, 3), r(10, 10, 20, 20)]);
        set_region_rect(&mut region, &r(1, 2, 3, 4));
        assert_eq!(region.rects(), &[r(1, 2, 3, 4)]);
        assert_eq!(region.extents(), r(1, 2, 3, 4));

        set_region_rect(&mut region, &r(5, 5, 5, 9));
        assert!(region.is_empty());
        assert_eq!(region.extents(), Rect::EMPTY);
    }

    #[test]
    fn test_from_rects_normalizes() {
        let region = Region::from_rects(&[
            r(5, 5, 15, 15),
            r(0, 0, 0, 100), // degenerate
            r(0, 0, 10, 10),
            r(2, 2, 4, 4), // covered
        ]);
        assert_eq!(
            region.rects(),
            &[r(0, 0, 10, 5), r(0, 5, 15, 10), r(5, 10, 15, 15)]
        );
        assert_eq!(region.extents(), r(0, 0, 15, 15));
        assert_eq!(region.validate(), Ok(()));
    }

    #[test]
    fn test_from_rects_coalesces_grid() {
        // Four quadrants of a square collapse into one rectangle
        let region = Region::from_rects(&[
            r(5, 5, 10, 10),
            r(0, 0, 5, 5),
            r(0, 5, 5, 10),
            r(5, 0, 10, 5),
        ]);
        assert_eq!(region.rects(), &[r(0, 0, 10, 10)]);
    }

    #[test]
    fn test_combine_scenario() {
        let a = Region::from_rect(r(0, 0, 10, 10));
        let b = Region::from_rect(r(5, 5, 15, 15));
        let mut dst = Region::new();

        intersect_region(&mut dst, &a, &b);
        assert_eq!(dst.rects(), &[r(5, 5, 10, 10)]);

        union_region(&mut dst, &a, &b);
        assert_eq!(
            dst.rects(),
            &[r(0, 0, 10, 5), r(0, 5, 15, 10), r(5, 10, 15, 15)]
        );

        subtract_region(&mut dst, &a, &b);
        assert_eq!(dst.rects(), &[r(0, 0, 10, 5), r(0, 5, 5, 10)]);

        xor_region(&mut dst, &a, &b);
        assert_eq!(
            dst.rects(),
            &[
                r(0, 0, 10, 5),
                r(0, 5, 5, 10),
                r(10, 5, 15, 10),
                r(5, 10, 15, 15)
            ]
        );
        assert_eq!(dst.area(), 150);
    }

    #[test]
    fn test_in_place_aliasing() {
        let original = Region::from_rects(&[r(0, 0, 4, 4), r(6, 0, 8, 8)]);

        let mut region = original.clone();
        let snapshot = region.clone();
        region.union_with(&snapshot);
        assert_eq!(region, original);

        region.intersect_with(&snapshot);
        assert_eq!(region, original);

        region.xor_with(&snapshot);
        assert!(region.is_empty());

        let mut region = original.clone();
        region.subtract_with(&snapshot);
        assert!(region.is_empty());
        assert_eq!(region.extents(), Rect::EMPTY);
    }

    #[test]
    fn test_copy_region() {
        let src = Region::from_rects(&[r(0, 0, 2, 2), r(4, 4, 6, 6)]);
        let mut dst = Region::from_rect(r(100, 100, 200, 200));
        copy_region(&mut dst, &src);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_combine_modes() {
        let a = Region::from_rect(r(0, 0, 10, 10));
        let b = Region::from_rect(r(5, 0, 15, 10));
        let mut dst = Region::new();

        combine_region(&mut dst, &a, &b, CombineMode::And);
        assert_eq!(dst.rects(), &[r(5, 0, 10, 10)]);
        combine_region(&mut dst, &a, &b, CombineMode::Or);
        assert_eq!(dst.rects(), &[r(0, 0, 15, 10)]);
        combine_region(&mut dst, &a, &b, CombineMode::Xor);
        assert_eq!(dst.rects(), &[r(0, 0, 5, 10), r(10, 0, 15, 10)]);
        combine_region(&mut dst, &a, &b, CombineMode::Diff);
        assert_eq!(dst.rects(), &[r(0, 0, 5, 10)]);
        combine_region(&mut dst, &a, &b, CombineMode::Copy);
        assert_eq!(dst, a);

        assert_eq!(CombineMode::from_u32(3), Some(CombineMode::Xor));
        assert_eq!(CombineMode::from_u32(0), None);
    }

    #[test]
    fn test_empty_operands() {
        let a = Region::from_rects(&[r(0, 0, 4, 4), r(2, 2, 6, 6)]);
        let empty = Region::new();
        assert_eq!(a.union(&empty), a);
        assert_eq!(empty.union(&a), a);
        assert!(a.intersect(&empty).is_empty());
        assert_eq!(a.subtract(&empty), a);
        assert!(empty.subtract(&a).is_empty());
        assert_eq!(a.xor(&empty), a);
    }

    #[test]
    fn test_offset_region() {
        let mut region = Region::from_rects(&[r(0, 0, 10, 10), r(5, 5, 15, 15)]);
        offset_region(&mut region, 3, -2);
        assert_eq!(region.extents(), r(3, -2, 18, 13));
        assert_eq!(region.rects()[0], r(3, -2, 13, 3));
        assert_eq!(region.validate(), Ok(()));
    }

    #[test]
    fn test_offset_overflow_is_ignored() {
        let mut region = Region::from_rect(r(0, 0, i32::MAX - 1, 10));
        let before = region.clone();
        assert!(!region.offset(5, 0));
        assert_eq!(region, before);
    }

    #[test]
    fn test_area_of_huge_regions() {
        let full = Region::from_rect(r(i32::MIN, i32::MIN, i32::MAX, i32::MAX));
        let side = u32::MAX as u64;
        assert_eq!(full.area(), side * side);

        let bands = Region::from_rects(&[
            r(i32::MIN, -1_500_000_000, i32::MAX, 0),
            r(i32::MIN, 1, i32::MAX, 1_500_000_001),
        ]);
        assert_eq!(bands.len(), 2);
        assert_eq!(bands.area(), 2 * side * 1_500_000_000);
    }

    #[test]
    fn test_mirror_region() {
        let mut region = Region::from_rect(r(2, 0, 4, 4));
        mirror_region(&r(0, 0, 4, 4), &mut region);
        assert_eq!(region.rects(), &[r(0, 0, 2, 4)]);

        let mut region = Region::from_rect(r(2, 0, 8, 4));
        mirror_region(&r(0, 0, 10, 10), &mut region);
        assert_eq!(region.rects(), &[r(2, 0, 8, 4)]);
    }

    #[test]
    fn test_mirror_reverses_bands() {
        let mut region = Region::from_rects(&[r(0, 0, 2, 2), r(5, 0, 6, 2), r(1, 2, 3, 4)]);
        assert!(region.mirror(&r(0, 0, 10, 4)));
        assert_eq!(
            region.rects(),
            &[r(4, 0, 5, 2), r(8, 0, 10, 2), r(7, 2, 9, 4)]
        );
        assert_eq!(region.extents(), r(4, 0, 10, 4));
        assert_eq!(region.validate(), Ok(()));
    }

    #[test]
    fn test_mirror_overflow_is_ignored() {
        let mut region = Region::from_rect(r(i32::MIN, 0, 0, 1));
        let before = region.clone();
        assert!(!region.mirror(&r(0, 0, 10, 10)));
        assert_eq!(region, before);
    }

    #[test]
    fn test_point_in_region() {
        let region = Region::from_rects(&[r(0, 0, 10, 10), r(5, 5, 15, 15)]);
        assert!(point_in_region(&region, 0, 0));
        assert!(point_in_region(&region, 14, 7));
        assert!(point_in_region(&region, 9, 4));
        assert!(!point_in_region(&region, 10, 4));
        assert!(!point_in_region(&region, 4, 12));
        assert!(!point_in_region(&region, 15, 15));
        assert!(!point_in_region(&region, -1, 0));
    }

    #[test]
    fn test_rect_in_region() {
        let region = Region::from_rects(&[r(0, 0, 10, 10), r(20, 0, 30, 10)]);
        assert!(rect_in_region(&region, &r(5, 5, 25, 6)));
        assert!(rect_in_region(&region, &r(9, 9, 100, 100)));
        // Inside the extents but only over the gap
        assert!(!rect_in_region(&region, &r(10, 0, 20, 10)));
        assert!(!rect_in_region(&region, &r(0, 10, 30, 20)));
        assert!(!rect_in_region(&region, &r(5, 5, 5, 6)));
    }

    #[test]
    fn test_get_region_data() {
        let region = Region::from_rects(&[r(0, 0, 10, 10), r(5, 5, 15, 15)]);
        let reply = get_region_data(&region, 32);
        assert_eq!(reply.total_size, 48);
        assert_eq!(reply.rect_count(), 2);

        let reply = get_region_data_and_free(region.clone(), 48);
        assert!(reply.is_complete());
        let decoded = create_region_from_req_data(&reply.data, reply.data.len()).unwrap();
        assert_eq!(decoded, region);
    }

    #[test]
    fn test_empty_region_data() {
        let reply = get_region_data(&Region::new(), 1024);
        assert_eq!(reply.total_size, RECT_RECORD_SIZE as u32);
        let decoded = Region::from_request_data(&reply.data).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_malformed_request_data() {
        let data = vec![0u8; 20];
        assert_eq!(
            create_region_from_req_data(&data, 20),
            Err(RegionError::MalformedData { len: 20 })
        );
        assert!(matches!(
            create_region_from_req_data(&data, 32),
            Err(RegionError::CountMismatch { .. })
        ));
        assert!(create_region_from_req_data(&data, 16).is_ok());
    }
}
