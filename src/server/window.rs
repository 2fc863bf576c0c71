//! Per-window clipping state
//!
//! A [`WindowSurface`] is the part of a window the window manager hands to
//! the region engine: its geometry, an optional shape region and the
//! region still waiting to be repainted. Shape and update regions are kept
//! relative to the window's top-left corner.

use super::marshal::RequestMarshaller;
use crate::protocol::*;
use crate::region::Region;

/// Clipping state of one window
#[derive(Debug, Clone)]
pub struct WindowSurface {
    /// Window rectangle in parent coordinates
    window_rect: Rect,
    /// Client area in parent coordinates
    client_rect: Rect,
    /// Right-to-left layout: client coordinates are mirrored
    layout_rtl: bool,
    /// Window shape, if any
    shape: Option<Region>,
    /// Pending repaint area
    update: Region,
}

impl WindowSurface {
    pub fn new(window_rect: Rect, client_rect: Rect) -> Self {
        WindowSurface {
            window_rect,
            client_rect,
            layout_rtl: false,
            shape: None,
            update: Region::new(),
        }
    }

    pub fn window_rect(&self) -> Rect {
        self.window_rect
    }

    pub fn client_rect(&self) -> Rect {
        self.client_rect
    }

    pub fn is_layout_rtl(&self) -> bool {
        self.layout_rtl
    }

    pub fn set_layout_rtl(&mut self, rtl: bool) {
        self.layout_rtl = rtl;
    }

    pub fn shape(&self) -> Option<&Region> {
        self.shape.as_ref()
    }

    /// Window rectangle in window-relative coordinates
    fn local_bounds(&self) -> Rect {
        Rect::new(
            0,
            0,
            self.window_rect.right.saturating_sub(self.window_rect.left),
            self.window_rect.bottom.saturating_sub(self.window_rect.top),
        )
    }

    /// Client area in window-relative coordinates
    fn local_client(&self) -> Rect {
        Rect::new(
            self.client_rect.left.saturating_sub(self.window_rect.left),
            self.client_rect.top.saturating_sub(self.window_rect.top),
            self.client_rect.right.saturating_sub(self.window_rect.left),
            self.client_rect.bottom.saturating_sub(self.window_rect.top),
        )
    }

    /// Area of the window that can be drawn, in window coordinates
    pub fn visible_region(&self) -> Region {
        let bounds = Region::from_rect(self.local_bounds());
        match &self.shape {
            Some(shape) => bounds.intersect(shape),
            None => bounds,
        }
    }

    /// Install a shape from request data; empty data removes the shape.
    ///
    /// Right-to-left windows send their shape in mirrored coordinates. A
    /// shape that cannot be mirrored is rejected and the old one is kept.
    pub fn set_shape_data(
        &mut self,
        marshaller: &RequestMarshaller,
        data: &[u8],
    ) -> RegionResult<()> {
        if data.is_empty() {
            self.set_shape(None);
            return Ok(());
        }
        let mut shape = marshaller.decode_region(data)?;
        if self.layout_rtl {
            mirror_checked(&mut shape, &self.window_rect)?;
        }
        self.set_shape(Some(shape));
        Ok(())
    }

    pub fn set_shape(&mut self, shape: Option<Region>) {
        self.shape = shape;
        let visible = self.visible_region();
        self.update.intersect_with(&visible);
    }

    /// Encode the shape for a reply, or `None` for an unshaped window
    pub fn shape_data(
        &self,
        marshaller: &RequestMarshaller,
        max_size: u32,
    ) -> RegionResult<Option<RegionData>> {
        let Some(shape) = &self.shape else {
            return Ok(None);
        };
        let mut shape = shape.clone();
        if self.layout_rtl {
            mirror_checked(&mut shape, &self.window_rect)?;
        }
        Ok(Some(marshaller.encode_region_and_free(shape, max_size)))
    }

    /// Check whether a point in parent coordinates hits the window
    pub fn hit_test(&self, x: i32, y: i32) -> bool {
        if !self.window_rect.contains_point(x, y) {
            return false;
        }
        match &self.shape {
            Some(shape) => shape.contains_point(
                x.saturating_sub(self.window_rect.left),
                y.saturating_sub(self.window_rect.top),
            ),
            None => true,
        }
    }

    /// Add a window-relative rectangle to the update region
    pub fn invalidate_rect(&mut self, rect: &Rect) {
        self.invalidate(&Region::from_rect(*rect));
    }

    /// Add a window-relative region to the update region, cropped to the
    /// visible part of the window
    pub fn invalidate(&mut self, region: &Region) {
        let added = region.intersect(&self.visible_region());
        if added.is_empty() {
            return;
        }
        self.update.union_with(&added);
        log::trace!(
            "Update region now {} rects, extents {}",
            self.update.len(),
            self.update.extents()
        );
    }

    /// Remove a window-relative rectangle from the update region
    pub fn validate_rect(&mut self, rect: &Rect) {
        self.validate(&Region::from_rect(*rect));
    }

    /// Remove a window-relative region from the update region
    pub fn validate(&mut self, region: &Region) {
        self.update.subtract_with(region);
    }

    pub fn needs_repaint(&self) -> bool {
        !self.update.is_empty()
    }

    /// Check whether a window-relative rectangle touches the pending
    /// repaint area
    pub fn needs_repaint_in(&self, rect: &Rect) -> bool {
        self.update.intersects_rect(rect)
    }

    pub fn update_region(&self) -> &Region {
        &self.update
    }

    /// Pending repaint area of the client, in client coordinates, mirrored
    /// for right-to-left windows
    pub fn client_update_region(&self) -> RegionResult<Region> {
        let client = self.local_client();
        let mut region = self.update.intersect(&Region::from_rect(client));
        if !region.offset(client.left.saturating_neg(), client.top.saturating_neg()) {
            return Err(RegionError::CoordinateOverflow {
                extents: region.extents(),
            });
        }
        if self.layout_rtl {
            mirror_checked(&mut region, &self.client_rect)?;
        }
        Ok(region)
    }

    /// Hand the pending repaint area over to the painter
    pub fn take_update_region(&mut self) -> Region {
        std::mem::take(&mut self.update)
    }

    /// Move and resize the window; pending updates outside the new visible
    /// area are dropped
    pub fn set_rects(&mut self, window_rect: Rect, client_rect: Rect) {
        self.window_rect = window_rect;
        self.client_rect = client_rect;
        let visible = self.visible_region();
        self.update.intersect_with(&visible);
    }
}

fn mirror_checked(region: &mut Region, rect: &Rect) -> RegionResult<()> {
    if region.mirror(rect) {
        Ok(())
    } else {
        Err(RegionError::CoordinateOverflow {
            extents: region.extents(),
        })
    }
}
