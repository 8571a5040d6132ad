use crate::{
    foundation::{
        core::{Canvas, Point, Rgba8},
        error::{FolioError, FolioResult},
        math::Rng64,
    },
    scene::primitive::{Primitive, Z_TREE_FIELD},
    tree::generator::{BranchRule, BranchSegment, generate},
};

/// Recursion is bounded; 2^16 - 1 segments per tree is already far past what reads as a tree.
pub const MAX_TREE_DEPTH: u32 = 16;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub count: usize,
    pub initial_angle_deg: f64,
    pub initial_length: f64,
    pub max_depth: u32,
    pub branching: BranchRule,
    pub color: Rgba8,
    pub width_per_depth: f64,
    /// `opacity_scale` is drawn once per tree from `[opacity_min, opacity_max)`.
    pub opacity_min: f64,
    pub opacity_max: f64,
    /// Roots sit within this many pixels of the bottom edge.
    pub root_band_px: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            count: 8,
            initial_angle_deg: -90.0,
            initial_length: 120.0,
            max_depth: 6,
            branching: BranchRule::default(),
            color: Rgba8::rgb(100, 150, 200),
            width_per_depth: 0.5,
            opacity_min: 0.1,
            opacity_max: 0.4,
            root_band_px: 100.0,
        }
    }
}

impl TreeConfig {
    pub fn validate(&self) -> FolioResult<()> {
        if self.max_depth > MAX_TREE_DEPTH {
            return Err(FolioError::validation(format!(
                "tree max_depth must be <= {MAX_TREE_DEPTH} (got {})",
                self.max_depth
            )));
        }
        let b = &self.branching;
        if !(b.spread_min_deg.is_finite() && b.spread_max_deg.is_finite())
            || b.spread_min_deg > b.spread_max_deg
        {
            return Err(FolioError::validation(
                "tree spread range must be finite with min <= max",
            ));
        }
        if !b.length_factor.is_finite() || b.length_factor <= 0.0 {
            return Err(FolioError::validation("tree length_factor must be > 0"));
        }
        if !self.initial_length.is_finite() || self.initial_length < 0.0 {
            return Err(FolioError::validation("tree initial_length must be >= 0"));
        }
        if !(0.0..=1.0).contains(&self.opacity_min)
            || !(0.0..=1.0).contains(&self.opacity_max)
            || self.opacity_min > self.opacity_max
        {
            return Err(FolioError::validation(
                "tree opacity range must lie in [0, 1] with min <= max",
            ));
        }
        if !self.width_per_depth.is_finite() || self.width_per_depth < 0.0 {
            return Err(FolioError::validation("tree width_per_depth must be >= 0"));
        }
        Ok(())
    }
}

/// A generated tree. Geometry and opacity are fixed for its lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct Tree {
    origin: Point,
    branches: Vec<BranchSegment>,
    opacity_scale: f64,
}

impl Tree {
    pub fn grow(origin: Point, config: &TreeConfig, rng: &mut Rng64) -> Self {
        let branches = generate(
            origin.x,
            origin.y,
            config.initial_angle_deg,
            config.initial_length,
            config.max_depth,
            &config.branching,
            rng,
        );
        let opacity_scale = rng.next_range(config.opacity_min, config.opacity_max);
        Self {
            origin,
            branches,
            opacity_scale,
        }
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn branches(&self) -> &[BranchSegment] {
        &self.branches
    }

    pub fn opacity_scale(&self) -> f64 {
        self.opacity_scale
    }
}

/// The fixed set of background trees plus the surface size they are drawn onto.
#[derive(Clone, Debug)]
pub struct TreeField {
    trees: Vec<Tree>,
    config: TreeConfig,
    viewport: Canvas,
}

impl TreeField {
    #[tracing::instrument(skip(config, rng))]
    pub fn new(config: &TreeConfig, viewport: Canvas, rng: &mut Rng64) -> FolioResult<Self> {
        config.validate()?;
        let trees = (0..config.count)
            .map(|_| {
                let x = rng.next_range(0.0, viewport.width_f64());
                let y = viewport.height_f64() - rng.next_range(0.0, config.root_band_px);
                Tree::grow(Point::new(x, y), config, rng)
            })
            .collect::<Vec<_>>();
        tracing::debug!(
            trees = trees.len(),
            segments_per_tree = trees.first().map_or(0, |t| t.branches.len()),
            "tree field generated"
        );
        Ok(Self {
            trees,
            config: config.clone(),
            viewport,
        })
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn viewport(&self) -> Canvas {
        self.viewport
    }

    pub fn segment_count(&self) -> usize {
        self.trees.iter().map(|t| t.branches.len()).sum()
    }

    /// Track a new surface size. Trees keep their absolute coordinates; nothing is regrown.
    pub fn resize(&mut self, viewport: Canvas) {
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "tree field resized"
        );
        self.viewport = viewport;
    }

    /// One segment primitive per branch. Alpha fades with recursion (`opacity_scale * depth /
    /// max_depth`) and width grows toward the trunk (`depth * width_per_depth`).
    pub fn primitives(&self) -> impl Iterator<Item = Primitive> + '_ {
        let max_depth = f64::from(self.config.max_depth.max(1));
        self.trees.iter().flat_map(move |tree| {
            tree.branches.iter().map(move |b| Primitive::Segment {
                from: Point::new(b.x1, b.y1),
                to: Point::new(b.x2, b.y2),
                width: f64::from(b.depth) * self.config.width_per_depth,
                color: self.config.color,
                opacity: (tree.opacity_scale * f64::from(b.depth) / max_depth) as f32,
                z: Z_TREE_FIELD,
            })
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tree/field.rs"]
mod tests;
