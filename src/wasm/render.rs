use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::dom::js;
use crate::curve::{CurveFrame, Halo, Path, Viewport};
use crate::error::{GreetingError, GreetingResult};
use crate::palette::{self, rgba};
use crate::particles::{Confetti, ConfettiShape, Dust, Ember};

const GRID_STEP: f64 = 20.0;

/// A 2d context together with the size it was fitted to.
pub struct Surface {
    pub ctx: CanvasRenderingContext2d,
    pub view: Viewport,
}

pub fn context_2d(canvas: &HtmlCanvasElement) -> GreetingResult<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .map_err(js)?
        .ok_or_else(|| GreetingError::dom("2d canvas not supported"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| GreetingError::dom("unexpected canvas context type"))
}

impl Surface {
    /// Sizes the backing store to the canvas's laid-out box at the device
    /// pixel ratio; drawing then happens in CSS pixels.
    pub fn fit_layout(canvas: &HtmlCanvasElement, pixel_ratio: f64) -> GreetingResult<Self> {
        let ctx = context_2d(canvas)?;
        let rect = canvas.get_bounding_client_rect();
        let view = Viewport::new(rect.width(), rect.height(), pixel_ratio);
        let (width, height) = view.backing_size();
        canvas.set_width(width);
        canvas.set_height(height);
        ctx.set_transform(view.pixel_ratio, 0.0, 0.0, view.pixel_ratio, 0.0, 0.0)
            .map_err(js)?;
        Ok(Self { ctx, view })
    }

    /// Sizes the canvas to the window, one backing pixel per CSS pixel.
    pub fn fit_window(canvas: &HtmlCanvasElement, window: &Window) -> GreetingResult<Self> {
        let ctx = context_2d(canvas)?;
        let (width, height) = window_size(window)?;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        Ok(Self {
            ctx,
            view: Viewport::new(width, height, 1.0),
        })
    }

    /// Re-fits after a window resize, keeping the context.
    pub fn refit_window(&mut self, canvas: &HtmlCanvasElement, width: f64, height: f64) {
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        self.view = Viewport::new(width, height, 1.0);
    }

    pub fn clear(&self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.view.width, self.view.height);
    }
}

pub fn window_size(window: &Window) -> GreetingResult<(f64, f64)> {
    let width = window.inner_width().map_err(js)?.as_f64().unwrap_or(0.0);
    let height = window.inner_height().map_err(js)?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

fn trace(ctx: &CanvasRenderingContext2d, path: &Path) {
    let mut points = path.points.iter();
    let Some(first) = points.next() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in points {
        ctx.line_to(p.x, p.y);
    }
    if path.closed {
        ctx.close_path();
    }
}

fn backdrop(ctx: &CanvasRenderingContext2d, view: &Viewport, grid: bool) -> GreetingResult<()> {
    let (w, h) = (view.width, view.height);
    let gradient = ctx.create_linear_gradient(0.0, 0.0, w, h);
    gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0.95)").map_err(js)?;
    gradient.add_color_stop(0.5, "rgba(30, 0, 50, 0.95)").map_err(js)?;
    gradient.add_color_stop(1.0, "rgba(75, 0, 130, 0.95)").map_err(js)?;
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, w, h);

    if !grid {
        return Ok(());
    }
    ctx.set_stroke_style_str("rgba(255, 20, 147, 0.1)");
    ctx.set_line_width(0.5);
    let mut x = 0.0;
    while x <= w {
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, h);
        ctx.stroke();
        x += GRID_STEP;
    }
    let mut y = 0.0;
    while y <= h {
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(w, y);
        ctx.stroke();
        y += GRID_STEP;
    }

    let center = view.center();
    ctx.set_shadow_blur(10.0);
    ctx.set_shadow_color("rgba(255, 20, 147, 0.5)");
    ctx.set_stroke_style_str("rgba(255, 20, 147, 0.4)");
    ctx.set_line_width(2.0);
    ctx.begin_path();
    ctx.move_to(0.0, center.y);
    ctx.line_to(w, center.y);
    ctx.stroke();
    ctx.begin_path();
    ctx.move_to(center.x, 0.0);
    ctx.line_to(center.x, h);
    ctx.stroke();
    ctx.set_shadow_blur(0.0);
    Ok(())
}

fn halo(ctx: &CanvasRenderingContext2d, view: &Viewport, halo: &Halo) -> GreetingResult<()> {
    let c = view.center();
    let gradient = ctx
        .create_radial_gradient(c.x, c.y, 0.0, c.x, c.y, halo.radius.max(1.0))
        .map_err(js)?;
    gradient
        .add_color_stop(0.0, &rgba(255, 20, 147, halo.inner_alpha))
        .map_err(js)?;
    gradient
        .add_color_stop(0.5, &rgba(255, 105, 180, halo.mid_alpha))
        .map_err(js)?;
    gradient
        .add_color_stop(1.0, "rgba(255, 20, 147, 0)")
        .map_err(js)?;
    ctx.set_fill_style_canvas_gradient(&gradient);
    ctx.fill_rect(0.0, 0.0, view.width, view.height);
    Ok(())
}

/// Paints one heart frame: backdrop, glowing curve, halo, sparkles.
pub fn draw_heart(ctx: &CanvasRenderingContext2d, view: &Viewport, frame: &CurveFrame) -> GreetingResult<()> {
    let style = &frame.style;
    backdrop(ctx, view, style.grid)?;

    let color = style.color.to_string();
    ctx.set_stroke_style_str(&color);
    ctx.set_line_width(style.line_width);
    ctx.set_shadow_blur(style.glow);
    ctx.set_shadow_color(&color);
    for path in &frame.paths {
        trace(ctx, path);
        ctx.stroke();
    }
    ctx.set_shadow_blur(0.0);

    halo(ctx, view, &style.halo)?;

    ctx.set_shadow_blur(5.0);
    ctx.set_shadow_color(palette::LIGHT_PINK);
    for sparkle in &frame.sparkles {
        ctx.begin_path();
        ctx.arc(sparkle.center.x, sparkle.center.y, sparkle.radius, 0.0, TAU)
            .map_err(js)?;
        ctx.set_fill_style_str(&rgba(255, 182, 193, sparkle.alpha));
        ctx.fill();
    }
    ctx.set_shadow_blur(0.0);
    Ok(())
}

pub fn draw_dust(surface: &Surface, bodies: &[Dust]) -> GreetingResult<()> {
    let ctx = &surface.ctx;
    surface.clear();
    for dust in bodies {
        ctx.begin_path();
        ctx.arc(dust.pos.x, dust.pos.y, dust.size, 0.0, TAU)
            .map_err(js)?;
        ctx.set_fill_style_str(dust.color);
        ctx.set_global_alpha(dust.opacity);
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

pub fn draw_confetti(surface: &Surface, bodies: &[Confetti]) -> GreetingResult<()> {
    let ctx = &surface.ctx;
    surface.clear();
    for piece in bodies {
        ctx.save();
        let placed = ctx
            .translate(piece.pos.x, piece.pos.y)
            .and_then(|_| ctx.rotate(piece.rotation.to_radians()));
        if let Err(err) = placed {
            ctx.restore();
            return Err(js(err));
        }
        ctx.set_fill_style_str(piece.color);
        let half = piece.size / 2.0;
        match piece.shape {
            ConfettiShape::Strip => ctx.fill_rect(-half, -half, piece.size, half),
            ConfettiShape::Disc => {
                ctx.begin_path();
                if ctx.arc(0.0, 0.0, half, 0.0, TAU).is_ok() {
                    ctx.fill();
                }
            }
        }
        ctx.restore();
    }
    Ok(())
}

pub fn draw_burst(surface: &Surface, origin: crate::curve::Point2, bodies: &[Ember]) -> GreetingResult<()> {
    let ctx = &surface.ctx;
    surface.clear();
    for ember in bodies {
        let at = ember.position(origin);
        ctx.begin_path();
        ctx.arc(at.x, at.y, Ember::RADIUS * ember.scale(), 0.0, TAU)
            .map_err(js)?;
        ctx.set_fill_style_str(ember.color);
        ctx.set_global_alpha(ember.opacity());
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}
