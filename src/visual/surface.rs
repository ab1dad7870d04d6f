use std::sync::Arc;

use image::{Rgba, RgbaImage};

use crate::foundation::core::{Point, Rect, Size};
use crate::foundation::error::KinemaResult;
use crate::visual::ops;

/// Immutable RGBA image plus a whole-surface opacity.
///
/// Pixels are shared behind an `Arc`, so cloning a surface (and therefore a [`Visual`]) is
/// cheap; every transform returns a new surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pixels: Arc<RgbaImage>,
    alpha: u8,
}

impl Surface {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
            alpha: u8::MAX,
        }
    }

    /// A `width` x `height` surface filled with one straight-alpha color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Bounding box of the surface placed at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// `true` when both surfaces share the same pixel allocation.
    pub fn shares_pixels(&self, other: &Surface) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    pub fn with_alpha(&self, alpha: u8) -> Self {
        Self {
            pixels: Arc::clone(&self.pixels),
            alpha,
        }
    }

    fn with_pixels(&self, pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
            alpha: self.alpha,
        }
    }

    pub fn flipped(&self, x: bool, y: bool) -> Self {
        if !x && !y {
            return self.clone();
        }
        self.with_pixels(ops::flip(&self.pixels, x, y))
    }

    /// Resample to exactly `size` pixels (rounded).
    pub fn scaled(&self, size: Size) -> KinemaResult<Self> {
        let w = ops::edge_px(size.width, "scaled width")?;
        let h = ops::edge_px(size.height, "scaled height")?;
        if (w, h) == self.pixels.dimensions() {
            return Ok(self.clone());
        }
        Ok(self.with_pixels(ops::resize(&self.pixels, w, h)))
    }

    /// Resample by per-axis factors.
    pub fn scaled_by(&self, fx: f64, fy: f64) -> KinemaResult<Self> {
        let size = self.size();
        self.scaled(Size::new(size.width * fx, size.height * fy))
    }

    /// Rotate counter-clockwise by `degrees`; the result grows to fit.
    pub fn rotated(&self, degrees: f64) -> KinemaResult<Self> {
        if degrees == 0.0 {
            return Ok(self.clone());
        }
        Ok(self.with_pixels(ops::rotate(&self.pixels, degrees)?))
    }

    /// Clear (`fill`) and/or stamp `eraser` over `area`, in surface-local pixels.
    pub fn erased(&self, area: Rect, fill: bool, eraser: Option<&Surface>) -> Self {
        if !fill && eraser.is_none() {
            return self.clone();
        }
        let mut out = self.pixels.as_ref().clone();
        if fill {
            ops::clear_rect(&mut out, area);
        }
        if let Some(eraser) = eraser {
            ops::stamp(&mut out, &eraser.to_rgba8(), area.origin());
        }
        self.with_pixels(out)
    }

    /// Pixels with the surface opacity folded into each alpha channel.
    pub fn to_rgba8(&self) -> RgbaImage {
        ops::bake_alpha(&self.pixels, self.alpha)
    }
}

impl From<RgbaImage> for Surface {
    fn from(value: RgbaImage) -> Self {
        Self::new(value)
    }
}

/// The per-tick visual state of an entity: what to draw and where.
#[derive(Clone, Debug, PartialEq)]
pub struct Visual {
    pub image: Surface,
    pub rect: Rect,
}

impl Visual {
    pub fn new(image: Surface, rect: Rect) -> Self {
        Self { image, rect }
    }

    /// Place `image` with its top-left corner at `origin`, sized to the image.
    pub fn at(image: Surface, origin: Point) -> Self {
        let rect = Rect::from_origin_size(origin, image.size());
        Self { image, rect }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visual/surface.rs"]
mod tests;
