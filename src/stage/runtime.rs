//! The page: tree field and helix menu mounted on one clock, drawn onto an optional surface.
//!
//! Mounting registers two clock sources, a display-refresh frame loop that redraws everything
//! and a fixed-interval rotation ticker. Both are held as guards and cancelled exactly once
//! on [`Stage::unmount`] or drop. Frames that arrive while no surface is attached are counted
//! and skipped; the first frame is effectively deferred until one is attached.

use crate::{
    config::scene::SceneConfig,
    foundation::{
        core::{Canvas, Point},
        error::FolioResult,
        math::Rng64,
    },
    helix::{
        menu::HelixMenu,
        rotation::{RotationState, RotationTicker},
    },
    render::backend::{FrameOutput, SceneBackend},
    scene::primitive::Scene,
    schedule::clock::{ClockEvent, FrameScheduler, SourceGuard},
    tree::field::TreeField,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageStats {
    pub frames_rendered: u64,
    /// Frame callbacks that found no surface attached.
    pub frames_skipped: u64,
    pub rotation_ticks: u64,
}

pub struct Stage {
    config: SceneConfig,
    canvas: Canvas,
    scheduler: FrameScheduler,
    frame_loop: Option<SourceGuard>,
    rotation_loop: Option<SourceGuard>,
    ticker: RotationTicker,
    field: TreeField,
    menu: HelixMenu,
    surface: Option<Box<dyn SceneBackend>>,
    last_frame: Option<FrameOutput>,
    stats: StageStats,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("canvas", &self.canvas)
            .field("now_ms", &self.scheduler.now_ms())
            .field("mounted", &self.is_mounted())
            .field("surface", &self.surface.is_some())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Generate the tree field, build the menu, and start both clock sources.
    #[tracing::instrument(skip(config), fields(seed = config.seed))]
    pub fn mount(config: SceneConfig, canvas: Canvas) -> FolioResult<Self> {
        config.validate()?;
        let mut rng = Rng64::new(config.seed);
        let field = TreeField::new(&config.tree, canvas, &mut rng)?;
        let ticker = RotationTicker::new(config.timing.rotation_step_deg)?;
        let menu = HelixMenu::new(config.helix.clone(), ticker.state())?;

        let mut scheduler = FrameScheduler::new();
        let frame_loop = scheduler.request_frames();
        let rotation_loop = scheduler.every(config.timing.rotation_period_ms)?;
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            segments = field.segment_count(),
            "stage mounted"
        );

        Ok(Self {
            config,
            canvas,
            scheduler,
            frame_loop: Some(frame_loop),
            rotation_loop: Some(rotation_loop),
            ticker,
            field,
            menu,
            surface: None,
            last_frame: None,
            stats: StageStats::default(),
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn now_ms(&self) -> f64 {
        self.scheduler.now_ms()
    }

    pub fn stats(&self) -> StageStats {
        self.stats
    }

    pub fn field(&self) -> &TreeField {
        &self.field
    }

    pub fn menu(&self) -> &HelixMenu {
        &self.menu
    }

    pub fn rotation(&self) -> &RotationState {
        self.ticker.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.frame_loop.as_ref().is_some_and(SourceGuard::is_active)
            || self.rotation_loop.as_ref().is_some_and(SourceGuard::is_active)
    }

    pub fn attach_surface(&mut self, backend: Box<dyn SceneBackend>) {
        tracing::debug!("surface attached");
        self.surface = Some(backend);
    }

    pub fn detach_surface(&mut self) -> Option<Box<dyn SceneBackend>> {
        self.surface.take()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Output of the most recent rendered frame.
    pub fn last_frame(&self) -> Option<&FrameOutput> {
        self.last_frame.as_ref()
    }

    pub fn take_last_frame(&mut self) -> Option<FrameOutput> {
        self.last_frame.take()
    }

    /// Run the clock forward and dispatch whatever came due: rotation ticks first, then at most
    /// one redraw. A backlog of rotation periods is applied in one step. Nothing fires after
    /// unmount.
    pub fn advance(&mut self, dt_ms: f64) -> FolioResult<()> {
        for event in self.scheduler.advance(dt_ms) {
            match event {
                ClockEvent::Tick {
                    source, periods, ..
                } => {
                    if !is_live(&self.rotation_loop, source) {
                        continue;
                    }
                    let rotation = self.ticker.advance_by(periods);
                    self.menu.sync_rotation(&rotation);
                    self.stats.rotation_ticks += periods;
                }
                ClockEvent::Frame { source, now_ms } => {
                    if !is_live(&self.frame_loop, source) {
                        continue;
                    }
                    self.render_frame(now_ms)?;
                }
            }
        }
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn render_frame(&mut self, now_ms: f64) -> FolioResult<()> {
        if self.surface.is_none() {
            self.stats.frames_skipped += 1;
            tracing::trace!(now_ms, "frame skipped: no surface");
            return Ok(());
        }
        let scene = self.scene_at(now_ms);
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        self.last_frame = Some(surface.render_scene(&scene)?);
        self.stats.frames_rendered += 1;
        Ok(())
    }

    /// Everything visible at `now_ms`: the tree field, then the helix menu.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn scene_at(&self, now_ms: f64) -> Scene {
        let mut scene = Scene::new(self.canvas, self.config.background);
        scene.extend(self.field.primitives());
        scene.extend(self.menu.primitives(now_ms));
        scene
    }

    /// Track a new viewport size. Tree geometry is kept as is.
    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.field.resize(canvas);
    }

    /// Update hover from a pointer position. Returns the hovered label, if any.
    pub fn pointer_move(&mut self, point: Point) -> Option<usize> {
        let now = self.scheduler.now_ms();
        let hit = self.menu.label_at(point, now);
        self.menu.set_hovered(hit, now);
        hit
    }

    pub fn pointer_leave(&mut self) {
        self.menu.set_hovered(None, self.scheduler.now_ms());
    }

    /// A click on any label toggles the menu. Returns the clicked label.
    pub fn click(&mut self, point: Point) -> Option<usize> {
        let now = self.scheduler.now_ms();
        let hit = self.menu.label_at(point, now)?;
        let expanded = self.menu.toggle(now);
        tracing::debug!(label = hit, expanded, "menu clicked");
        Some(hit)
    }

    pub fn set_expanded(&mut self, expanded: bool) {
        self.menu.set_expanded(expanded, self.scheduler.now_ms());
    }

    /// Stop both clock sources. Safe to call repeatedly, and before anything fired.
    pub fn unmount(&mut self) {
        if let Some(guard) = self.frame_loop.take() {
            guard.cancel();
        }
        if let Some(guard) = self.rotation_loop.take() {
            guard.cancel();
        }
        self.surface = None;
        tracing::debug!(stats = ?self.stats, "stage unmounted");
    }
}

fn is_live(guard: &Option<SourceGuard>, source: crate::schedule::clock::SourceId) -> bool {
    guard
        .as_ref()
        .is_some_and(|g| g.id() == source && g.is_active())
}

#[cfg(test)]
#[path = "../../tests/unit/stage/runtime.rs"]
mod tests;
