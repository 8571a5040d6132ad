use std::sync::Arc;

use anyhow::Context as _;

use crate::{
    foundation::{
        core::{Canvas, Rgba8},
        error::{FolioError, FolioResult},
    },
    render::{
        backend::{FrameOutput, FrameRGBA, RenderSettings, SceneBackend},
        svg::SvgBackend,
    },
    scene::primitive::Primitive,
};

/// Renders through SVG markup and rasterizes it with `resvg`, so label text shows up in pixels.
pub struct SvgRasterBackend {
    markup: SvgBackend,
    canvas: Option<Canvas>,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl SvgRasterBackend {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            markup: SvgBackend::new(settings),
            canvas: None,
            fontdb: None,
        }
    }

    /// Loading system fonts is slow; do it once per backend, on first use.
    fn fontdb(&mut self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_insert_with(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!(faces = db.len(), "loaded system fonts for svg raster");
                Arc::new(db)
            })
            .clone()
    }
}

impl SceneBackend for SvgRasterBackend {
    fn begin_frame(&mut self, canvas: Canvas, background: Option<Rgba8>) -> FolioResult<()> {
        self.canvas = Some(canvas);
        self.markup.begin_frame(canvas, background)
    }

    fn draw(&mut self, primitive: &Primitive) -> FolioResult<()> {
        self.markup.draw(primitive)
    }

    fn finish(&mut self) -> FolioResult<FrameOutput> {
        let canvas = self
            .canvas
            .take()
            .ok_or_else(|| FolioError::render("svg raster finish called before begin_frame"))?;
        let FrameOutput::Svg(doc) = self.markup.finish()? else {
            return Err(FolioError::render("svg backend did not produce markup"));
        };
        let fontdb = self.fontdb();
        let data = rasterize_svg_markup(&doc, canvas, fontdb)?;
        Ok(FrameOutput::Rgba(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        }))
    }
}

/// Parse `markup` and rasterize it at `canvas` size into premultiplied RGBA8.
pub fn rasterize_svg_markup(
    markup: &str,
    canvas: Canvas,
    fontdb: Arc<usvg::fontdb::Database>,
) -> FolioResult<Vec<u8>> {
    let opts = usvg::Options {
        fontdb,
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(markup.as_bytes(), &opts).context("parse svg tree")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
        .ok_or_else(|| FolioError::render("failed to allocate svg pixmap"))?;

    let sx = (canvas.width as f32) / tree.size().width();
    let sy = (canvas.height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/render/svg_raster.rs"]
mod tests;
