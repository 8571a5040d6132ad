use crate::foundation::core::{Canvas, Point, Rect, Rgba8, Vec2};

/// Stacking key for the tree field, below every helix element.
pub const Z_TREE_FIELD: i32 = -100_000;
/// Stacking key for strand polylines, below every rung and label.
pub const Z_STRANDS: i32 = -10_000;

/// Map a `z` depth cue in `[-1, 1]` to a stacking key. Monotonic: nearer is higher.
pub fn depth_key(z: f64) -> i32 {
    if !z.is_finite() {
        return 0;
    }
    (z.clamp(-1.0, 1.0) * 1000.0).round() as i32
}

#[derive(Clone, Debug, PartialEq)]
/// Immutable draw primitive emitted by the scene builders.
///
/// Positions are in canvas pixels; `opacity` multiplies the color alpha.
pub enum Primitive {
    /// A single tree branch.
    Segment {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
        opacity: f32,
        z: i32,
    },
    /// One helix strand.
    Polyline {
        points: Vec<Point>,
        width: f64,
        color: Rgba8,
        opacity: f32,
        z: i32,
    },
    /// A base-pair rung between antipodal strand points.
    Rung {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba8,
        opacity: f32,
        z: i32,
    },
    /// A menu label pill.
    Label {
        index: usize,
        text: String,
        center: Point,
        /// Unscaled pill size.
        size: Vec2,
        scale: f64,
        fill: Rgba8,
        border: Rgba8,
        border_width: f64,
        text_color: Rgba8,
        opacity: f32,
        hovered: bool,
        z: i32,
    },
}

impl Primitive {
    pub fn z(&self) -> i32 {
        match self {
            Self::Segment { z, .. }
            | Self::Polyline { z, .. }
            | Self::Rung { z, .. }
            | Self::Label { z, .. } => *z,
        }
    }

    /// Axis-aligned extent of a label pill after scaling; `None` for line primitives.
    pub fn label_bounds(&self) -> Option<Rect> {
        match self {
            Self::Label {
                center,
                size,
                scale,
                ..
            } => {
                let half = Vec2::new(size.x * scale * 0.5, size.y * scale * 0.5);
                Some(Rect::from_points(*center - half, *center + half))
            }
            _ => None,
        }
    }
}

/// One frame's worth of primitives for a canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub canvas: Canvas,
    pub background: Option<Rgba8>,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(canvas: Canvas, background: Option<Rgba8>) -> Self {
        Self {
            canvas,
            background,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, prim: Primitive) {
        self.primitives.push(prim);
    }

    pub fn extend(&mut self, prims: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(prims);
    }

    /// Stable sort by stacking key: far-to-near, insertion order within a key.
    pub fn sort_by_depth(&mut self) {
        self.primitives.sort_by_key(Primitive::z);
    }

    pub fn labels(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Label { .. }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/primitive.rs"]
mod tests;
