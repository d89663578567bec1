//! Canvas2D software renderer.
//!
//! Walks the editor's display list and draws to an HTML `<canvas>` via
//! `CanvasRenderingContext2d`. Shape geometry comes from `sb-render`
//! outlines; this module only turns paths, text and images into calls.

use sb_core::kurbo::{Affine, BezPath, PathEl};
use sb_core::model::{Element, Payload, ShapeProps, TextAlign, TextDecoration, TextProps};
use sb_core::{Color, Viewport};
use sb_render::handles::{HANDLE_RADIUS, Handle, handle_positions};
use sb_render::{element_transform, outline};
use std::collections::HashMap;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// Theme-dependent colors for the canvas renderer.
pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub selection: &'static str,
    pub handle_fill: &'static str,
    pub placeholder_border: &'static str,
    pub placeholder_text: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#F5F5F7",
            grid: "rgba(0, 0, 0, 0.05)",
            selection: "#4FC3F7",
            handle_fill: "#FFFFFF",
            placeholder_border: "#86868B",
            placeholder_text: "#86868B",
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: "#1C1C1E",
            grid: "rgba(255, 255, 255, 0.04)",
            selection: "#4FC3F7",
            handle_fill: "#2C2C2E",
            placeholder_border: "#636366",
            placeholder_text: "#98989D",
        }
    }
}

/// Everything one frame needs.
pub struct Frame<'a> {
    pub elements: &'a [&'a Element],
    pub viewport: &'a Viewport,
    pub selected: Option<&'a Element>,
    /// Draw resize/rotate handles on the selection.
    pub show_handles: bool,
    pub images: &'a HashMap<String, HtmlImageElement>,
    pub width: f64,
    pub height: f64,
}

pub fn render_scene(ctx: &CanvasRenderingContext2d, frame: &Frame, theme: &CanvasTheme) {
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
    draw_grid(ctx, frame.width, frame.height, theme);

    ctx.save();
    let vp = frame.viewport;
    let _ = ctx.translate(vp.pan.x, vp.pan.y);
    let _ = ctx.scale(vp.zoom, vp.zoom);

    for el in frame.elements.iter().filter(|el| el.visible()) {
        ctx.save();
        set_transform(ctx, element_transform(el));
        draw_element(ctx, el, frame.images, theme);
        ctx.restore();
    }

    if let Some(sel) = frame.selected {
        draw_selection(ctx, sel, vp.zoom, frame.show_handles, theme);
    }
    ctx.restore();
}

fn draw_element(
    ctx: &CanvasRenderingContext2d,
    el: &Element,
    images: &HashMap<String, HtmlImageElement>,
    theme: &CanvasTheme,
) {
    match el.payload() {
        Payload::Shape(shape) => {
            if let Some(path) = outline(el) {
                paint_shape(ctx, &path, shape);
            }
        }
        Payload::TextShape { shape, text } => {
            if let Some(path) = outline(el) {
                paint_shape(ctx, &path, shape);
            }
            // The host overlays an input while editing.
            if !el.is_editing() {
                draw_caption(ctx, el.width(), el.height(), text);
            }
        }
        Payload::Text(text) => {
            if !el.is_editing() {
                draw_text(ctx, el.width(), text);
            }
        }
        Payload::Image(image) => match images.get(&image.src).filter(|img| img.complete()) {
            Some(img) => {
                let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                    img,
                    0.0,
                    0.0,
                    el.width(),
                    el.height(),
                );
            }
            None => draw_image_placeholder(ctx, el.width(), el.height(), theme),
        },
        Payload::Draw(draw) => {
            let Some(path) = outline(el) else {
                return;
            };
            trace(ctx, &path);
            if let Some(fill) = draw.fill {
                ctx.set_fill_style_str(&css(fill));
                ctx.fill();
            }
            ctx.set_line_cap("round");
            ctx.set_line_join("round");
            ctx.set_stroke_style_str(&css(draw.stroke));
            ctx.set_line_width(draw.stroke_width);
            ctx.stroke();
        }
    }
}

// ─── Drawing primitives ─────────────────────────────────────────────────

fn paint_shape(ctx: &CanvasRenderingContext2d, path: &BezPath, shape: &ShapeProps) {
    trace(ctx, path);
    if !shape.color.is_transparent() {
        ctx.set_fill_style_str(&css(shape.color));
        ctx.fill();
    }
    let Some(stroke) = shape.stroke.filter(|_| shape.stroke_width > 0.0) else {
        return;
    };
    ctx.set_stroke_style_str(&css(stroke));
    ctx.set_line_width(shape.stroke_width);
    let dash = shape.stroke_style.dash_pattern();
    if !dash.is_empty() {
        set_dash(ctx, dash.iter().map(|d| d * shape.stroke_width));
    }
    ctx.stroke();
    set_dash(ctx, std::iter::empty());
}

fn set_font(ctx: &CanvasRenderingContext2d, text: &TextProps) {
    ctx.set_font(&format!(
        "{}{}px {}",
        text.font_style.css_prefix(),
        text.font_size,
        text.font_family
    ));
}

fn align_x(align: TextAlign, width: f64) -> (f64, &'static str) {
    match align {
        TextAlign::Left => (0.0, "left"),
        TextAlign::Center => (width / 2.0, "center"),
        TextAlign::Right => (width, "right"),
    }
}

/// Plain text: lines flow down from the top of the box.
fn draw_text(ctx: &CanvasRenderingContext2d, width: f64, text: &TextProps) {
    set_font(ctx, text);
    ctx.set_text_baseline("top");
    let (x, align) = align_x(text.align, width);
    ctx.set_text_align(align);
    let content = text.text_transform.apply(&text.text);
    let step = text.font_size * text.line_height;
    for (i, line) in content.lines().enumerate() {
        draw_line(ctx, line, x, i as f64 * step, text);
    }
}

/// Shape captions are centered both ways inside the box.
fn draw_caption(ctx: &CanvasRenderingContext2d, width: f64, height: f64, text: &TextProps) {
    set_font(ctx, text);
    ctx.set_text_baseline("middle");
    ctx.set_text_align("center");
    let content = text.text_transform.apply(&text.text);
    let lines: Vec<&str> = content.lines().collect();
    let step = text.font_size * text.line_height;
    let top = height / 2.0 - step * (lines.len().saturating_sub(1)) as f64 / 2.0;
    for (i, line) in lines.iter().enumerate() {
        draw_line(ctx, line, width / 2.0, top + i as f64 * step, text);
    }
}

fn draw_line(ctx: &CanvasRenderingContext2d, line: &str, x: f64, y: f64, text: &TextProps) {
    ctx.set_fill_style_str(&css(text.text_color));
    if text.letter_spacing == 0.0 {
        let _ = ctx.fill_text(line, x, y);
        if let Some(stroke) = text.text_stroke.filter(|_| text.text_stroke_width > 0.0) {
            ctx.set_stroke_style_str(&css(stroke));
            ctx.set_line_width(text.text_stroke_width);
            let _ = ctx.stroke_text(line, x, y);
        }
    } else {
        draw_spaced(ctx, line, x, y, text.letter_spacing);
    }
    if text.text_decoration != TextDecoration::None {
        decorate(ctx, line, x, y, text);
    }
}

/// Canvas2D has no portable letter spacing; place glyphs one by one.
fn draw_spaced(ctx: &CanvasRenderingContext2d, line: &str, x: f64, y: f64, spacing: f64) {
    let total = spaced_width(ctx, line, spacing);
    let start = match ctx.text_align().as_str() {
        "center" => x - total / 2.0,
        "right" => x - total,
        _ => x,
    };
    ctx.save();
    ctx.set_text_align("left");
    let mut cursor = start;
    let mut buf = [0u8; 4];
    for ch in line.chars() {
        let glyph = ch.encode_utf8(&mut buf);
        let _ = ctx.fill_text(glyph, cursor, y);
        cursor += measure(ctx, glyph) + spacing;
    }
    ctx.restore();
}

fn spaced_width(ctx: &CanvasRenderingContext2d, line: &str, spacing: f64) -> f64 {
    let n = line.chars().count() as f64;
    measure(ctx, line) + spacing * (n - 1.0).max(0.0)
}

fn measure(ctx: &CanvasRenderingContext2d, s: &str) -> f64 {
    ctx.measure_text(s).map(|m| m.width()).unwrap_or(0.0)
}

fn decorate(ctx: &CanvasRenderingContext2d, line: &str, x: f64, y: f64, text: &TextProps) {
    let w = spaced_width(ctx, line, text.letter_spacing);
    let x0 = match ctx.text_align().as_str() {
        "center" => x - w / 2.0,
        "right" => x - w,
        _ => x,
    };
    let middle = ctx.text_baseline() == "middle";
    let size = text.font_size;
    let offset = match (text.text_decoration, middle) {
        (TextDecoration::Underline, true) => size * 0.5,
        (TextDecoration::Underline, false) => size,
        (_, true) => 0.0,
        (_, false) => size * 0.5,
    };
    ctx.begin_path();
    ctx.move_to(x0, y + offset);
    ctx.line_to(x0 + w, y + offset);
    ctx.set_stroke_style_str(&css(text.text_color));
    ctx.set_line_width((size / 15.0).max(1.0));
    ctx.stroke();
}

fn draw_image_placeholder(ctx: &CanvasRenderingContext2d, w: f64, h: f64, theme: &CanvasTheme) {
    ctx.set_stroke_style_str(theme.placeholder_border);
    ctx.set_line_width(1.0);
    set_dash(ctx, [4.0, 4.0].into_iter());
    ctx.stroke_rect(0.0, 0.0, w, h);
    set_dash(ctx, std::iter::empty());

    ctx.set_font("11px Inter, system-ui, sans-serif");
    ctx.set_fill_style_str(theme.placeholder_text);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    let _ = ctx.fill_text("image", w / 2.0, h / 2.0);
}

/// Rotated outline plus handles. Sizes are divided by the zoom so they stay
/// constant on screen.
fn draw_selection(
    ctx: &CanvasRenderingContext2d,
    el: &Element,
    zoom: f64,
    show_handles: bool,
    theme: &CanvasTheme,
) {
    ctx.save();
    set_transform(ctx, element_transform(el));
    ctx.set_stroke_style_str(theme.selection);
    ctx.set_line_width(1.5 / zoom);
    ctx.stroke_rect(0.0, 0.0, el.width(), el.height());
    ctx.restore();

    if !show_handles {
        return;
    }
    let r = HANDLE_RADIUS / zoom;
    ctx.set_fill_style_str(theme.handle_fill);
    ctx.set_stroke_style_str(theme.selection);
    ctx.set_line_width(1.5 / zoom);
    for (handle, p) in handle_positions(el, zoom) {
        ctx.begin_path();
        if handle == Handle::Rotate {
            let _ = ctx.arc(p.x, p.y, r, 0.0, std::f64::consts::TAU);
        } else {
            let half = r / 2.0 + 1.0 / zoom;
            ctx.rect(p.x - half, p.y - half, half * 2.0, half * 2.0);
        }
        ctx.fill();
        ctx.stroke();
    }
}

fn draw_grid(ctx: &CanvasRenderingContext2d, width: f64, height: f64, theme: &CanvasTheme) {
    ctx.set_fill_style_str(theme.grid);
    let spacing = 20.0;
    let mut x = 0.0;
    while x < width {
        let mut y = 0.0;
        while y < height {
            ctx.fill_rect(x, y, 1.0, 1.0);
            y += spacing;
        }
        x += spacing;
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

/// Replay a kurbo path as the context's current path.
fn trace(ctx: &CanvasRenderingContext2d, path: &BezPath) {
    ctx.begin_path();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => ctx.move_to(p.x, p.y),
            PathEl::LineTo(p) => ctx.line_to(p.x, p.y),
            PathEl::QuadTo(c, p) => ctx.quadratic_curve_to(c.x, c.y, p.x, p.y),
            PathEl::CurveTo(c1, c2, p) => ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
            PathEl::ClosePath => ctx.close_path(),
        }
    }
}

/// Append an affine to the current transform.
fn set_transform(ctx: &CanvasRenderingContext2d, t: Affine) {
    let [a, b, c, d, e, f] = t.as_coeffs();
    let _ = ctx.transform(a, b, c, d, e, f);
}

fn set_dash(ctx: &CanvasRenderingContext2d, pattern: impl Iterator<Item = f64>) {
    let array = js_sys::Array::new();
    for d in pattern {
        array.push(&JsValue::from_f64(d));
    }
    let _ = ctx.set_line_dash(&array);
}

fn css(color: Color) -> String {
    color.to_hex()
}
