/// Pixel canvas the scene is painted into before it becomes terminal cells.
///
/// Drawing calls take logical world coordinates and scale them through the
/// viewport. Rect edges round outward (floor start, ceil end) so thin
/// features such as platform seams never vanish at small sizes; polygons
/// fill pixels whose centres fall inside and always mark at least one.

use crate::domain::material::Rgb;
use crate::domain::physics::Rect;
use super::viewport::Viewport;

pub struct Canvas {
    pub width: usize,
    pub height: usize,
    pixels: Vec<Rgb>,
    scale_x: f32,
    scale_y: f32,
}

impl Canvas {
    pub fn new(vp: &Viewport) -> Self {
        Canvas::with_size(vp.px_w, vp.px_h, vp.scale_x, vp.scale_y)
    }

    pub fn with_size(width: usize, height: usize, scale_x: f32, scale_y: f32) -> Self {
        Canvas { width, height, pixels: vec![Rgb::BLACK; width * height], scale_x, scale_y }
    }

    /// Adopt a new viewport, reallocating only if the pixel size changed.
    pub fn resize(&mut self, vp: &Viewport) {
        if self.width != vp.px_w || self.height != vp.px_h {
            self.width = vp.px_w;
            self.height = vp.px_h;
            self.pixels = vec![Rgb::BLACK; self.width * self.height];
        }
        self.scale_x = vp.scale_x;
        self.scale_y = vp.scale_y;
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    #[inline]
    fn blend(&mut self, x: usize, y: usize, color: Rgb, alpha: f32) {
        if x < self.width && y < self.height {
            let px = &mut self.pixels[y * self.width + x];
            *px = px.lerp(color, alpha);
        }
    }

    /// Pixel span [lo, hi) covered by a logical interval, clamped to `limit`.
    fn span(start: f32, len: f32, scale: f32, limit: usize) -> (usize, usize) {
        let lo = (start * scale).floor().max(0.0) as usize;
        let hi = ((start + len) * scale).ceil().max(0.0) as usize;
        (lo.min(limit), hi.max(lo).min(limit))
    }

    /// Top-to-bottom gradient over the whole canvas. `stops` are
    /// (position 0..1, colour) in ascending order.
    pub fn vertical_gradient(&mut self, stops: &[(f32, Rgb)]) {
        let Some(&(_, first)) = stops.first() else { return };
        let h = self.height.max(1) as f32;
        for y in 0..self.height {
            let t = (y as f32 + 0.5) / h;
            let mut color = first;
            for pair in stops.windows(2) {
                let (t0, c0) = pair[0];
                let (t1, c1) = pair[1];
                if t >= t0 {
                    color = if t1 > t0 { c0.lerp(c1, (t - t0) / (t1 - t0)) } else { c1 };
                }
            }
            self.pixels[y * self.width..(y + 1) * self.width].fill(color);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let (x0, x1) = Self::span(rect.x, rect.w, self.scale_x, self.width);
        let (y0, y1) = Self::span(rect.y, rect.h, self.scale_y, self.height);
        for y in y0..y1 {
            self.pixels[y * self.width + x0..y * self.width + x1].fill(color);
        }
    }

    /// Alpha-composite `color` over a rect.
    pub fn blend_rect(&mut self, rect: Rect, color: Rgb, alpha: f32) {
        let (x0, x1) = Self::span(rect.x, rect.w, self.scale_x, self.width);
        let (y0, y1) = Self::span(rect.y, rect.h, self.scale_y, self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, alpha);
            }
        }
    }

    /// Darken everything (overlay screens).
    pub fn dim(&mut self, alpha: f32) {
        for px in &mut self.pixels {
            *px = px.lerp(Rgb::BLACK, alpha);
        }
    }

    /// Scanline fill of a convex polygon given in logical coordinates.
    pub fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgb) {
        if points.len() < 3 || self.width == 0 || self.height == 0 { return; }

        let px: Vec<(f32, f32)> = points.iter()
            .map(|&(x, y)| (x * self.scale_x, y * self.scale_y))
            .collect();

        let min_y = px.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = px.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let row_lo = (min_y - 0.5).ceil().max(0.0) as usize;
        let row_hi = ((max_y - 0.5).floor().max(-1.0) + 1.0) as usize;

        let mut filled = false;
        for row in row_lo..row_hi.min(self.height) {
            let cy = row as f32 + 0.5;
            let mut lo = f32::INFINITY;
            let mut hi = f32::NEG_INFINITY;
            for i in 0..px.len() {
                let a = px[i];
                let b = px[(i + 1) % px.len()];
                if (a.1 <= cy && cy < b.1) || (b.1 <= cy && cy < a.1) {
                    let x = a.0 + (cy - a.1) * (b.0 - a.0) / (b.1 - a.1);
                    lo = lo.min(x);
                    hi = hi.max(x);
                }
            }
            if lo > hi { continue; }
            let c0 = (lo - 0.5).ceil().max(0.0) as usize;
            let c1 = ((hi - 0.5).floor() + 1.0).max(0.0) as usize;
            for col in c0..c1.min(self.width) {
                self.put(col, row, color);
                filled = true;
            }
        }

        if !filled {
            let n = px.len() as f32;
            let cx = px.iter().map(|p| p.0).sum::<f32>() / n;
            let cy = px.iter().map(|p| p.1).sum::<f32>() / n;
            if cx >= 0.0 && cy >= 0.0 {
                self.put(cx as usize, cy as usize, color);
            }
        }
    }
}
