use kurbo::{Cap, Join, Shape as _, Stroke, StrokeOpts};

use crate::{
    foundation::{
        core::{BezPath, Canvas, Point, Rect, Rgba8},
        error::{FolioError, FolioResult},
    },
    render::backend::{FrameOutput, FrameRGBA, RenderSettings, SceneBackend},
    scene::primitive::Primitive,
};

/// Flattening tolerance for strokes and pill outlines, in pixels.
const TOLERANCE: f64 = 0.1;

pub struct CpuBackend {
    settings: RenderSettings,
    surface: Option<CpuSurface>,
    ctx: Option<vello_cpu::RenderContext>,
}

struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            surface: None,
            ctx: None,
        }
    }

    fn ensure_surface(&mut self, canvas: Canvas) -> FolioResult<(u16, u16)> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| FolioError::render("surface width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| FolioError::render("surface height exceeds u16"))?;

        let reuse = matches!(&self.surface, Some(s) if s.width == width && s.height == height);
        if !reuse {
            self.surface = Some(CpuSurface {
                width,
                height,
                pixmap: vello_cpu::Pixmap::new(width, height),
            });
        }
        Ok((width, height))
    }
}

impl SceneBackend for CpuBackend {
    fn begin_frame(&mut self, canvas: Canvas, background: Option<Rgba8>) -> FolioResult<()> {
        let (width, height) = self.ensure_surface(canvas)?;
        if let Some(s) = &mut self.surface {
            clear_pixmap(&mut s.pixmap);
        }
        let mut ctx = vello_cpu::RenderContext::new(width, height);

        if let Some(bg) = self.settings.background_for(background) {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(bg));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(width),
                f64::from(height),
            ));
        }
        self.ctx = Some(ctx);
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive) -> FolioResult<()> {
        let ctx = self
            .ctx
            .as_mut()
            .ok_or_else(|| FolioError::render("draw called before begin_frame"))?;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match primitive {
            Primitive::Segment {
                from,
                to,
                width,
                color,
                opacity,
                z: _,
            }
            | Primitive::Rung {
                from,
                to,
                width,
                color,
                opacity,
                z: _,
            } => {
                if *width <= 0.0 || *opacity <= 0.0 {
                    return Ok(());
                }
                // A single straight stroke never overlaps itself, so alpha goes on the paint.
                let outline = stroke_outline(&line_path(&[*from, *to]), *width);
                ctx.set_paint(color_to_cpu(color.with_opacity(*opacity)));
                ctx.fill_path(&bezpath_to_cpu(&outline));
            }
            Primitive::Polyline {
                points,
                width,
                color,
                opacity,
                z: _,
            } => {
                if points.len() < 2 || *width <= 0.0 || *opacity <= 0.0 {
                    return Ok(());
                }
                let outline = stroke_outline(&line_path(points), *width);
                ctx.set_paint(color_to_cpu(*color));
                with_opacity(ctx, *opacity, |ctx| ctx.fill_path(&bezpath_to_cpu(&outline)));
            }
            Primitive::Label {
                fill,
                border,
                border_width,
                opacity,
                ..
            } => {
                let Some(bounds) = primitive.label_bounds() else {
                    return Ok(());
                };
                if *opacity <= 0.0 || bounds.area() <= 0.0 {
                    return Ok(());
                }
                let pill = pill_path(bounds);
                let rim = (*border_width > 0.0).then(|| stroke_outline(&pill, *border_width));
                with_opacity(ctx, *opacity, |ctx| {
                    ctx.set_paint(color_to_cpu(*fill));
                    ctx.fill_path(&bezpath_to_cpu(&pill));
                    if let Some(rim) = &rim {
                        ctx.set_paint(color_to_cpu(*border));
                        ctx.fill_path(&bezpath_to_cpu(rim));
                    }
                });
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> FolioResult<FrameOutput> {
        let mut ctx = self
            .ctx
            .take()
            .ok_or_else(|| FolioError::render("finish called before begin_frame"))?;
        let surface = self
            .surface
            .as_mut()
            .ok_or_else(|| FolioError::render("cpu surface was not initialized"))?;

        ctx.flush();
        ctx.render_to_pixmap(&mut surface.pixmap);

        Ok(FrameOutput::Rgba(FrameRGBA {
            width: u32::from(surface.width),
            height: u32::from(surface.height),
            data: surface.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }))
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn with_opacity(
    ctx: &mut vello_cpu::RenderContext,
    opacity: f32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) {
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    draw(ctx);
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn line_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
    }
    for p in iter {
        path.line_to(*p);
    }
    path
}

fn pill_path(bounds: Rect) -> BezPath {
    let radius = bounds.width().min(bounds.height()) * 0.5;
    kurbo::RoundedRect::from_rect(bounds, radius).to_path(TOLERANCE)
}

/// Round-capped, round-joined outline of `path`, ready to be filled.
fn stroke_outline(path: &BezPath, width: f64) -> BezPath {
    let style = Stroke::new(width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    kurbo::stroke(path.iter(), &style, &StrokeOpts::default(), TOLERANCE)
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
