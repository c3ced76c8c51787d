//! Software RGBA surface
//!
//! Pixel coverage is decided by pixel centers. Colors are kept as straight
//! alpha floats and converted to RGBA8 only when the frame is presented.
//! Text is not rasterized; runs are collected for the host to overlay.

use std::ops::Range;

use glam::Vec2;

use super::surface::{Falloff, Surface, TextRun};
use crate::sim::Rect;
use crate::theme::Color;

#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    text: Vec<TextRun>,
}

/// Source-over blend of straight-alpha colors
fn blend_over(dst: Color, src: Color) -> Color {
    let out_a = src.a + dst.a * (1.0 - src.a);
    if out_a <= 0.0 {
        return Color::TRANSPARENT;
    }
    let mix = |s: f32, d: f32| (s * src.a + d * dst.a * (1.0 - src.a)) / out_a;
    Color::rgba(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), out_a)
}

/// Pixel indices whose centers fall in [lo, hi)
fn span(lo: f32, hi: f32, limit: u32) -> Range<u32> {
    let start = (lo - 0.5).ceil().max(0.0);
    let end = (hi - 0.5).ceil().min(limit as f32);
    if end <= start {
        return 0..0;
    }
    start as u32..end as u32
}

/// Pixel indices whose centers fall in [lo, hi]
fn span_inclusive(lo: f32, hi: f32, limit: u32) -> Range<u32> {
    let start = (lo - 0.5).ceil().max(0.0);
    let end = ((hi - 0.5).floor() + 1.0).min(limit as f32);
    if end <= start {
        return 0..0;
    }
    start as u32..end as u32
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl PixelBuffer {
    /// Transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; (width as usize) * (height as usize)],
            text: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Text runs drawn since the last `clear`
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    /// Frame as tightly packed RGBA8 rows
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.pixels.iter().map(|c| c.to_rgba8()).collect()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Blend `color` into every pixel whose center satisfies `covered`,
    /// scanning only the given box
    fn fill_where(
        &mut self,
        xs: Range<u32>,
        ys: Range<u32>,
        color: Color,
        covered: impl Fn(Vec2) -> bool,
    ) {
        for y in ys {
            for x in xs.clone() {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if covered(center) {
                    let i = self.index(x, y);
                    self.pixels[i] = blend_over(self.pixels[i], color);
                }
            }
        }
    }
}

impl Surface for PixelBuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
        self.text.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let xs = span(rect.x, rect.right(), self.width);
        let ys = span(rect.y, rect.bottom(), self.height);
        self.fill_where(xs, ys, color, |_| true);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if color.a <= 0.0 || radius <= 0.0 {
            return;
        }
        let xs = span_inclusive(center.x - radius, center.x + radius, self.width);
        let ys = span_inclusive(center.y - radius, center.y + radius, self.height);
        let r_sq = radius * radius;
        self.fill_where(xs, ys, color, |p| p.distance_squared(center) <= r_sq);
    }

    fn fill_triangle(&mut self, a: Vec2, b: Vec2, c: Vec2, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let min = a.min(b).min(c);
        let max = a.max(b).max(c);
        let xs = span_inclusive(min.x, max.x, self.width);
        let ys = span_inclusive(min.y, max.y, self.height);
        let edge = |p: Vec2, q: Vec2, r: Vec2| (q - p).perp_dot(r - p);
        let area = edge(a, b, c);
        if area.abs() < 1e-6 {
            return;
        }
        self.fill_where(xs, ys, color, |p| {
            let w0 = edge(b, c, p) * area.signum();
            let w1 = edge(c, a, p) * area.signum();
            let w2 = edge(a, b, p) * area.signum();
            w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        if color.a <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let min = from.min(to) - Vec2::splat(half);
        let max = from.max(to) + Vec2::splat(half);
        let xs = span_inclusive(min.x, max.x, self.width);
        let ys = span_inclusive(min.y, max.y, self.height);
        self.fill_where(xs, ys, color, |p| distance_to_segment(p, from, to) <= half);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        if color.a <= 0.0 || width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let outer = radius + half;
        let xs = span_inclusive(center.x - outer, center.x + outer, self.width);
        let ys = span_inclusive(center.y - outer, center.y + outer, self.height);
        self.fill_where(xs, ys, color, |p| (p.distance(center) - radius).abs() <= half);
    }

    fn fill_text(&mut self, run: TextRun) {
        self.text.push(run);
    }

    fn erase_radial(&mut self, center: Vec2, radius: f32, falloff: &Falloff) {
        if radius <= 0.0 {
            return;
        }
        let xs = span_inclusive(center.x - radius, center.x + radius, self.width);
        let ys = span_inclusive(center.y - radius, center.y + radius, self.height);
        for y in ys {
            for x in xs.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = p.distance(center) / radius;
                if t > 1.0 {
                    continue;
                }
                let i = self.index(x, y);
                self.pixels[i].a *= 1.0 - falloff.alpha_at(t);
            }
        }
    }

    fn new_layer(&self) -> Self {
        Self::new(self.width, self.height)
    }

    fn composite(&mut self, layer: &Self) {
        if layer.width != self.width || layer.height != self.height {
            log::warn!(
                "Skipping composite of {}x{} layer onto {}x{} surface",
                layer.width,
                layer.height,
                self.width,
                self.height
            );
            return;
        }
        for (dst, src) in self.pixels.iter_mut().zip(&layer.pixels) {
            if src.a > 0.0 {
                *dst = blend_over(*dst, *src);
            }
        }
        self.text.extend(layer.text.iter().cloned());
    }
}
