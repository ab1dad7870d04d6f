use image::{Rgba, RgbaImage, imageops};

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{KinemaError, KinemaResult};
use crate::foundation::math::mul_div255;

/// Largest edge a transformed surface may have.
pub(crate) const MAX_EDGE_PX: u32 = 16_384;

pub(crate) fn edge_px(v: f64, what: &str) -> KinemaResult<u32> {
    if !v.is_finite() || v < 0.0 {
        return Err(KinemaError::invalid_argument(format!(
            "{what} must be finite and >= 0, got {v}"
        )));
    }
    let px = v.round();
    if px > f64::from(MAX_EDGE_PX) {
        return Err(KinemaError::invalid_argument(format!(
            "{what} of {px}px exceeds the {MAX_EDGE_PX}px limit"
        )));
    }
    Ok(px as u32)
}

pub(crate) fn flip(src: &RgbaImage, x: bool, y: bool) -> RgbaImage {
    match (x, y) {
        (false, false) => src.clone(),
        (true, false) => imageops::flip_horizontal(src),
        (false, true) => imageops::flip_vertical(src),
        (true, true) => imageops::rotate180(src),
    }
}

pub(crate) fn resize(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if (width, height) == src.dimensions() {
        return src.clone();
    }
    if width == 0 || height == 0 || src.width() == 0 || src.height() == 0 {
        return RgbaImage::new(width, height);
    }
    imageops::resize(src, width, height, imageops::FilterType::Nearest)
}

/// Counter-clockwise rotation on screen, growing the canvas to the rotated bounding box.
pub(crate) fn rotate(src: &RgbaImage, degrees: f64) -> KinemaResult<RgbaImage> {
    if !degrees.is_finite() {
        return Err(KinemaError::invalid_argument(format!(
            "rotation angle must be finite, got {degrees}"
        )));
    }
    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    if src.width() == 0 || src.height() == 0 {
        return Ok(src.clone());
    }

    // y points down, so a visually counter-clockwise turn is a negative kurbo angle.
    let forward = Affine::rotate(-degrees.to_radians());
    let inverse = forward.inverse();
    let bbox = forward.transform_rect_bbox(Rect::new(-w / 2.0, -h / 2.0, w / 2.0, h / 2.0));
    let out_w = edge_px(bbox.width(), "rotated width")?;
    let out_h = edge_px(bbox.height(), "rotated height")?;

    let mut out = RgbaImage::new(out_w, out_h);
    let (half_ow, half_oh) = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);
    for (ox, oy, px) in out.enumerate_pixels_mut() {
        let p = Point::new(f64::from(ox) + 0.5 - half_ow, f64::from(oy) + 0.5 - half_oh);
        let q = inverse * p;
        let (sx, sy) = (q.x + w / 2.0, q.y + h / 2.0);
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *px = *src.get_pixel(sx.floor() as u32, sy.floor() as u32);
        }
    }
    Ok(out)
}

fn pixel_span(rect: Rect, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    let x0 = rect.x0.min(rect.x1).round().clamp(0.0, f64::from(width)) as u32;
    let x1 = rect.x0.max(rect.x1).round().clamp(0.0, f64::from(width)) as u32;
    let y0 = rect.y0.min(rect.y1).round().clamp(0.0, f64::from(height)) as u32;
    let y1 = rect.y0.max(rect.y1).round().clamp(0.0, f64::from(height)) as u32;
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Make every pixel inside `rect` fully transparent.
pub(crate) fn clear_rect(dst: &mut RgbaImage, rect: Rect) {
    let Some((x0, y0, x1, y1)) = pixel_span(rect, dst.width(), dst.height()) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            dst.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        }
    }
}

/// Alpha-blend `top` onto `dst` with its top-left corner at `at`.
pub(crate) fn stamp(dst: &mut RgbaImage, top: &RgbaImage, at: Point) {
    imageops::overlay(dst, top, at.x.round() as i64, at.y.round() as i64);
}

/// Fold a surface-level opacity into the per-pixel alpha channel.
pub(crate) fn bake_alpha(src: &RgbaImage, alpha: u8) -> RgbaImage {
    if alpha == u8::MAX {
        return src.clone();
    }
    let mut out = src.clone();
    for px in out.pixels_mut() {
        px.0[3] = mul_div255(px.0[3], alpha);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/visual/ops.rs"]
mod tests;
