use crate::{
    foundation::{
        core::{Canvas, Rgba8},
        error::{FolioError, FolioResult},
    },
    scene::primitive::{Primitive, Scene},
};

/// A rendered frame as RGBA8 pixels.
///
/// Raster backends output **premultiplied alpha**; the flag makes that explicit at API
/// boundaries.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixels, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// What a backend produces for one frame.
#[derive(Clone, Debug)]
pub enum FrameOutput {
    Rgba(FrameRGBA),
    Svg(String),
}

impl FrameOutput {
    pub fn into_rgba(self) -> FolioResult<FrameRGBA> {
        match self {
            Self::Rgba(frame) => Ok(frame),
            Self::Svg(_) => Err(FolioError::render(
                "backend produced svg markup, not pixels",
            )),
        }
    }

    pub fn as_svg(&self) -> Option<&str> {
        match self {
            Self::Svg(s) => Some(s),
            Self::Rgba(_) => None,
        }
    }
}

/// A drawing surface that receives a frame's primitives far-to-near.
///
/// Call order per frame is always `begin_frame`, zero or more `draw`, then `finish`.
pub trait SceneBackend {
    fn begin_frame(&mut self, canvas: Canvas, background: Option<Rgba8>) -> FolioResult<()>;

    fn draw(&mut self, primitive: &Primitive) -> FolioResult<()>;

    fn finish(&mut self) -> FolioResult<FrameOutput>;

    fn render_scene(&mut self, scene: &Scene) -> FolioResult<FrameOutput> {
        execute_scene(self, scene)
    }
}

/// Drive `backend` through one frame of `scene` in stacking order.
///
/// Primitives are visited by ascending stacking key; equal keys keep their insertion order.
pub fn execute_scene<B: SceneBackend + ?Sized>(
    backend: &mut B,
    scene: &Scene,
) -> FolioResult<FrameOutput> {
    let mut ordered: Vec<&Primitive> = scene.primitives.iter().collect();
    ordered.sort_by_key(|p| p.z());

    backend.begin_frame(scene.canvas, scene.background)?;
    for prim in ordered {
        backend.draw(prim)?;
    }
    backend.finish()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Raster backend powered by `vello_cpu`. Labels are drawn as pills without text.
    Cpu,
    /// SVG markup, text included.
    Svg,
    /// SVG markup rasterized by `resvg`, text included.
    SvgRaster,
}

#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Used when a scene carries no background of its own.
    pub clear_rgba: Option<[u8; 4]>,
}

impl RenderSettings {
    pub(crate) fn background_for(&self, scene_background: Option<Rgba8>) -> Option<Rgba8> {
        scene_background.or_else(|| {
            self.clear_rgba.map(|[r, g, b, a]| Rgba8 { r, g, b, a })
        })
    }
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> FolioResult<Box<dyn SceneBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
        BackendKind::Svg => Ok(Box::new(crate::render::svg::SvgBackend::new(
            settings.clone(),
        ))),
        BackendKind::SvgRaster => Ok(Box::new(
            crate::render::svg_raster::SvgRasterBackend::new(settings.clone()),
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
