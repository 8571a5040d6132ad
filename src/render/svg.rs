use crate::{
    foundation::{
        core::{Canvas, Point, Rgba8},
        error::{FolioError, FolioResult},
    },
    render::backend::{FrameOutput, RenderSettings, SceneBackend},
    scene::primitive::Primitive,
};

/// Label text size at scale 1, in pixels.
pub const LABEL_FONT_SIZE: f64 = 15.0;
pub const LABEL_FONT_FAMILY: &str = "sans-serif";

/// Serializes a frame as standalone SVG markup. Unlike the raster backend, labels carry text.
pub struct SvgBackend {
    settings: RenderSettings,
    doc: Option<String>,
}

impl SvgBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            doc: None,
        }
    }

    fn doc_mut(&mut self) -> FolioResult<&mut String> {
        self.doc
            .as_mut()
            .ok_or_else(|| FolioError::render("svg draw called before begin_frame"))
    }
}

impl SceneBackend for SvgBackend {
    fn begin_frame(&mut self, canvas: Canvas, background: Option<Rgba8>) -> FolioResult<()> {
        let mut doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height,
        );
        doc.push('\n');
        if let Some(bg) = self.settings.background_for(background) {
            doc.push_str(&format!(
                r#"<rect width="{}" height="{}" {}/>"#,
                canvas.width,
                canvas.height,
                paint_attrs("fill", bg, 1.0),
            ));
            doc.push('\n');
        }
        self.doc = Some(doc);
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive) -> FolioResult<()> {
        let element = match primitive {
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
            } => format!(
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" {} stroke-width="{}" stroke-linecap="round"/>"#,
                num(from.x),
                num(from.y),
                num(to.x),
                num(to.y),
                paint_attrs("stroke", *color, *opacity),
                num(*width),
            ),
            Primitive::Polyline {
                points,
                width,
                color,
                opacity,
                z: _,
            } => format!(
                r#"<polyline points="{}" fill="none" {} stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                points_attr(points),
                paint_attrs("stroke", *color, *opacity),
                num(*width),
            ),
            Primitive::Label {
                text,
                center,
                scale,
                fill,
                border,
                border_width,
                text_color,
                opacity,
                ..
            } => {
                let Some(bounds) = primitive.label_bounds() else {
                    return Ok(());
                };
                let radius = bounds.width().min(bounds.height()) * 0.5;
                format!(
                    concat!(
                        r#"<g opacity="{}">"#,
                        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" {} {} stroke-width="{}"/>"#,
                        r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="central" font-family="{}" font-size="{}" {}>{}</text>"#,
                        "</g>"
                    ),
                    num(f64::from(opacity.clamp(0.0, 1.0))),
                    num(bounds.x0),
                    num(bounds.y0),
                    num(bounds.width()),
                    num(bounds.height()),
                    num(radius),
                    paint_attrs("fill", *fill, 1.0),
                    paint_attrs("stroke", *border, 1.0),
                    num(*border_width),
                    num(center.x),
                    num(center.y),
                    LABEL_FONT_FAMILY,
                    num(LABEL_FONT_SIZE * scale),
                    paint_attrs("fill", *text_color, 1.0),
                    escape_text(text),
                )
            }
        };
        let doc = self.doc_mut()?;
        doc.push_str(&element);
        doc.push('\n');
        Ok(())
    }

    fn finish(&mut self) -> FolioResult<FrameOutput> {
        let mut doc = self
            .doc
            .take()
            .ok_or_else(|| FolioError::render("svg finish called before begin_frame"))?;
        doc.push_str("</svg>\n");
        Ok(FrameOutput::Svg(doc))
    }
}

/// `fill="rgb(..)" fill-opacity=".."` (or the stroke pair), folding the color alpha into the
/// opacity attribute.
fn paint_attrs(kind: &str, color: Rgba8, opacity: f32) -> String {
    let alpha = color.alpha_f32(opacity);
    if alpha >= 1.0 {
        format!(r#"{kind}="{}""#, color.css_rgb())
    } else {
        format!(
            r#"{kind}="{}" {kind}-opacity="{}""#,
            color.css_rgb(),
            num(f64::from(alpha))
        )
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", num(p.x), num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compact decimal: three places at most, trailing zeros dropped.
fn num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" || s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg.rs"]
mod tests;
