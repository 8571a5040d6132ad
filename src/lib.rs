//! phylofolio is the generative decoration layer of a personal academic portfolio: a field of
//! procedurally grown phylogenetic trees behind a slowly rotating DNA double helix whose
//! rungs double as a navigation menu.
//!
//! # Pipeline overview
//!
//! 1. **Generate**: a seeded [`Rng64`] grows the [`TreeField`] once at mount time.
//! 2. **Tick**: a [`FrameScheduler`] drives a 20 Hz [`RotationTicker`] and a frame loop.
//! 3. **Project**: every rotation change re-projects the [`HelixGeometry`]; the [`HelixMenu`]
//!    places labels between their collapsed and expanded targets.
//! 4. **Render**: each frame becomes a [`Scene`] of depth-keyed [`Primitive`]s, drawn by any
//!    [`SceneBackend`] (CPU raster, SVG markup, or SVG rasterized with `resvg`).
//!
//! A [`Stage`] owns all of the above for one page lifetime.
#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod content;
pub mod foundation;
pub mod helix;
pub mod render;
pub mod scene;
pub mod schedule;
pub mod stage;
pub mod tree;

pub use animation::ease::Ease;
pub use animation::transition::{Lerp, Tween};
pub use config::scene::{SEED_ENV, SceneConfig, TimingConfig};
pub use content::publications::{Publication, PublicationCategory, Publications};
pub use foundation::core::{Affine, BezPath, Canvas, Fps, Point, Rect, Rgba8, Transform2D, Vec2};
pub use foundation::error::{FolioError, FolioResult};
pub use foundation::math::{Rng64, normalize_degrees};
pub use helix::geometry::{HelixGeometry, HelixPoint, StrandPoint, project};
pub use helix::menu::{
    HelixConfig, HelixMenu, HelixStyle, LabelTarget, MenuItem, MenuLayout, Placement,
};
pub use helix::rotation::{RotationState, RotationTicker};
pub use render::backend::{
    BackendKind, FrameOutput, FrameRGBA, RenderSettings, SceneBackend, create_backend,
    execute_scene,
};
pub use render::cpu::CpuBackend;
pub use render::svg::SvgBackend;
pub use render::svg_raster::{SvgRasterBackend, rasterize_svg_markup};
pub use scene::primitive::{Primitive, Scene, Z_STRANDS, Z_TREE_FIELD, depth_key};
pub use schedule::clock::{ClockEvent, FrameScheduler, SourceGuard, SourceId};
pub use stage::runtime::{Stage, StageStats};
pub use tree::field::{MAX_TREE_DEPTH, Tree, TreeConfig, TreeField};
pub use tree::generator::{BranchRule, BranchSegment, generate};
