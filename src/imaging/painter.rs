//! Rasterize a [`Scene`] onto an RGBA canvas.
//!
//! Draw ops are applied in order: chip backgrounds land before the labels
//! that sit on them because the compositor emits them that way.

use super::fonts::FontCache;
use crate::layout::{DrawOp, Face, Scene};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;

/// Fill colors for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba<u8>,
    pub text: Rgba<u8>,
    pub chip: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba([255, 255, 255, 255]),
            text: Rgba([0, 0, 0, 255]),
            chip: Rgba([200, 200, 200, 255]),
        }
    }
}

/// Canvas of the scene's size filled with the background color.
pub fn blank_canvas(width: u32, height: u32, palette: &Palette) -> RgbaImage {
    RgbaImage::from_pixel(width, height, palette.background)
}

pub fn paint(scene: &Scene, fonts: &FontCache, palette: &Palette) -> RgbaImage {
    let mut canvas = blank_canvas(scene.width, scene.height, palette);

    for op in &scene.ops {
        match op {
            DrawOp::Text {
                face,
                x,
                baseline,
                text,
            } => draw_line(&mut canvas, fonts, *face, *x, *baseline, text, palette.text),
            DrawOp::Chip {
                x,
                y,
                width,
                height,
                radius,
            } => fill_rounded_rect(&mut canvas, *x, *y, *width, *height, *radius, palette.chip),
        }
    }

    canvas
}

/// `draw_text_mut` positions by line top, so lift by the ascent.
fn draw_line(
    canvas: &mut RgbaImage,
    fonts: &FontCache,
    face: Face,
    x: f32,
    baseline: f32,
    text: &str,
    color: Rgba<u8>,
) {
    if text.is_empty() || face.size <= 0.0 {
        return;
    }
    let top = baseline - fonts.ascent(face);
    draw_text_mut(
        canvas,
        color,
        x.round() as i32,
        top.round() as i32,
        fonts.scale(face),
        fonts.font(face.role),
        text,
    );
}

/// Axis-aligned rectangle with quarter-circle corners.
///
/// Coordinates are rounded to whole pixels; the radius is clamped to half the
/// shorter side. Degenerate rectangles draw nothing.
pub fn fill_rounded_rect(
    canvas: &mut RgbaImage,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    radius: f32,
    color: Rgba<u8>,
) {
    let (x0, y0) = (x.round() as i32, y.round() as i32);
    let (w, h) = (width.round() as i32, height.round() as i32);
    if w <= 0 || h <= 0 {
        return;
    }
    let r = (radius.round() as i32).clamp(0, w.min(h) / 2);

    if r == 0 {
        draw_filled_rect_mut(canvas, Rect::at(x0, y0).of_size(w as u32, h as u32), color);
        return;
    }

    if w > 2 * r {
        draw_filled_rect_mut(
            canvas,
            Rect::at(x0 + r, y0).of_size((w - 2 * r) as u32, h as u32),
            color,
        );
    }
    if h > 2 * r {
        draw_filled_rect_mut(
            canvas,
            Rect::at(x0, y0 + r).of_size(w as u32, (h - 2 * r) as u32),
            color,
        );
    }

    let (left, right) = (x0 + r, x0 + w - 1 - r);
    let (top, bottom) = (y0 + r, y0 + h - 1 - r);
    for center in [(left, top), (right, top), (left, bottom), (right, bottom)] {
        draw_filled_circle_mut(canvas, center, r, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BlockKind, CanvasSpec, VerticalBudget, compose};
    use crate::test_helpers::{sample_input, system_fonts};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn white(w: u32, h: u32) -> RgbaImage {
        blank_canvas(w, h, &Palette::default())
    }

    #[test]
    fn rounded_rect_fills_center_and_spares_corners() {
        let mut img = white(40, 30);
        fill_rounded_rect(&mut img, 5.0, 5.0, 30.0, 20.0, 5.0, RED);

        assert_eq!(*img.get_pixel(20, 15), RED);
        assert_eq!(*img.get_pixel(5, 15), RED, "left edge midpoint");
        assert_eq!(*img.get_pixel(20, 5), RED, "top edge midpoint");
        // the very corner pixel is outside the arc
        assert_eq!(*img.get_pixel(5, 5), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(34, 24), Rgba([255, 255, 255, 255]));
        // nothing leaks outside the box
        assert_eq!(*img.get_pixel(2, 15), Rgba([255, 255, 255, 255]));
        assert_eq!(*img.get_pixel(37, 15), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn zero_radius_is_plain_rect() {
        let mut img = white(10, 10);
        fill_rounded_rect(&mut img, 2.0, 2.0, 4.0, 4.0, 0.0, RED);
        assert_eq!(*img.get_pixel(2, 2), RED);
        assert_eq!(*img.get_pixel(5, 5), RED);
        assert_eq!(*img.get_pixel(6, 6), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn degenerate_rect_draws_nothing() {
        let mut img = white(10, 10);
        fill_rounded_rect(&mut img, 2.0, 2.0, 0.0, 5.0, 3.0, RED);
        fill_rounded_rect(&mut img, 2.0, 2.0, 5.0, -1.0, 3.0, RED);
        assert!(img.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn oversized_radius_is_clamped() {
        let mut img = white(20, 20);
        fill_rounded_rect(&mut img, 0.0, 0.0, 10.0, 6.0, 50.0, RED);
        assert_eq!(*img.get_pixel(5, 3), RED);
    }

    #[test]
    fn rect_partly_off_canvas_is_clipped() {
        let mut img = white(10, 10);
        fill_rounded_rect(&mut img, 6.0, 6.0, 20.0, 20.0, 2.0, RED);
        assert_eq!(*img.get_pixel(9, 9), RED);
    }

    #[test]
    fn empty_scene_is_background_only() {
        let Some(fonts) = system_fonts() else {
            eprintln!("skipping: no TrueType font installed");
            return;
        };
        let scene = Scene {
            width: 300,
            height: 300,
            ops: Vec::new(),
            blocks: Vec::new(),
            budget: VerticalBudget::allocate(&CanvasSpec::STANDARD, 0),
            overflow: 0.0,
            spill: 0.0,
        };
        let img = paint(&scene, &fonts, &Palette::default());
        assert_eq!(img.dimensions(), (300, 300));
        assert!(img.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn painted_card_has_ink_in_each_block() {
        let Some(fonts) = system_fonts() else {
            eprintln!("skipping: no TrueType font installed");
            return;
        };
        let scene = compose(&sample_input(), &CanvasSpec::STANDARD, &*fonts);
        let palette = Palette::default();
        let img = paint(&scene, &fonts, &palette);
        assert_eq!(img.dimensions(), (300, 300));

        for kind in BlockKind::ORDER {
            let Some(block) = scene.block(kind) else { continue };
            if block.items == 0 {
                continue;
            }
            let top = block.top.max(0.0) as u32;
            let bottom = (block.bottom.ceil() as u32).min(299);
            let inked = (top..=bottom)
                .flat_map(|y| (0..300).map(move |x| (x, y)))
                .any(|(x, y)| *img.get_pixel(x, y) != palette.background);
            assert!(inked, "{kind} block ({top}..{bottom}) has no ink");
        }
    }

    #[test]
    fn chip_background_uses_chip_color() {
        let Some(fonts) = system_fonts() else {
            eprintln!("skipping: no TrueType font installed");
            return;
        };
        let scene = compose(&sample_input(), &CanvasSpec::STANDARD, &*fonts);
        let palette = Palette::default();
        let img = paint(&scene, &fonts, &palette);

        let chip_pixels = img.pixels().filter(|p| **p == palette.chip).count();
        assert!(chip_pixels > 0);
    }
}
