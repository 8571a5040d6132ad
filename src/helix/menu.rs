//! DNA-helix navigation menu: strands, base-pair rungs, and labels riding the helix.
//!
//! Labels move between two targets. COLLAPSED follows the rotating helix (just outside the
//! anchor point, scaled and faded by its `z`); EXPANDED is a fixed horizontal row. A single
//! eased progress value blends the two, so the helix keeps spinning while the menu opens or
//! closes, and a settled collapse lands exactly on the collapsed targets again.

use crate::{
    animation::{
        ease::Ease,
        transition::{Lerp, Tween},
    },
    foundation::{
        core::{Affine, Point, Rect, Rgba8, Transform2D, Vec2},
        error::{FolioError, FolioResult},
    },
    helix::{
        geometry::{HelixGeometry, HelixPoint},
        rotation::RotationState,
    },
    scene::primitive::{Primitive, Z_STRANDS, depth_key},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MenuItem {
    pub label: String,
    /// Helix index the collapsed label rides on.
    pub anchor_index: usize,
}

impl MenuItem {
    pub fn new(label: impl Into<String>, anchor_index: usize) -> Self {
        Self {
            label: label.into(),
            anchor_index,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HelixStyle {
    pub strand1: Rgba8,
    pub strand2: Rgba8,
    pub strand_width: f64,
    pub strand_opacity: f32,
    pub rung_color: Rgba8,
    pub rung_width: f64,
    pub rung_opacity_back: f32,
    pub rung_opacity_front: f32,
    pub label_size: Vec2,
    pub label_fill: Rgba8,
    pub label_fill_alpha_back: f32,
    pub label_fill_alpha_front: f32,
    pub label_fill_alpha_hover: f32,
    pub label_border: Rgba8,
    pub label_border_hover: Rgba8,
    pub label_border_width: f64,
    pub label_text: Rgba8,
}

impl Default for HelixStyle {
    fn default() -> Self {
        Self {
            strand1: Rgba8::rgb(0x4a, 0x9e, 0xff),
            strand2: Rgba8::rgb(0xa0, 0xc4, 0xff),
            strand_width: 3.0,
            strand_opacity: 0.8,
            rung_color: Rgba8::rgb(0x4a, 0x9e, 0xff),
            rung_width: 1.5,
            rung_opacity_back: 0.2,
            rung_opacity_front: 0.6,
            label_size: Vec2::new(130.0, 46.0),
            label_fill: Rgba8::rgb(0x4a, 0x9e, 0xff),
            label_fill_alpha_back: 0.08,
            label_fill_alpha_front: 0.15,
            label_fill_alpha_hover: 0.25,
            label_border: Rgba8 {
                r: 0x4a,
                g: 0x9e,
                b: 0xff,
                a: 102,
            },
            label_border_hover: Rgba8::rgb(0x6e, 0xb5, 0xff),
            label_border_width: 2.0,
            label_text: Rgba8::rgb(0xff, 0xff, 0xff),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MenuLayout {
    /// Top-left of the menu box in canvas pixels.
    pub origin: Vec2,
    /// Every `rung_stride`-th index gets a base-pair rung.
    pub rung_stride: usize,
    /// Collapsed labels sit this far outside the helix, along the anchor's radial direction.
    pub label_offset: f64,
    pub collapsed_min_scale: f64,
    pub collapsed_min_opacity: f64,
    pub hover_scale: f64,
    pub hover_border_boost: f64,
    pub expanded_row_y: f64,
    pub expanded_slot_spacing: f64,
    /// Helix container transform once fully expanded (collapsed is identity).
    pub expanded_container: Transform2D,
    pub transition_ms: f64,
    pub ease: Ease,
}

impl Default for MenuLayout {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            rung_stride: 2,
            label_offset: 24.0,
            collapsed_min_scale: 0.85,
            collapsed_min_opacity: 0.5,
            hover_scale: 1.15,
            hover_border_boost: 0.25,
            expanded_row_y: 300.0,
            expanded_slot_spacing: 150.0,
            expanded_container: Transform2D {
                scale: Vec2::new(0.6, 0.6),
                anchor: Vec2::new(165.0, 160.0),
                ..Transform2D::default()
            },
            transition_ms: 300.0,
            ease: Ease::Standard,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HelixConfig {
    pub geometry: HelixGeometry,
    pub items: Vec<MenuItem>,
    pub style: HelixStyle,
    pub layout: MenuLayout,
}

impl Default for HelixConfig {
    fn default() -> Self {
        let geometry = HelixGeometry::default();
        let n = geometry.point_count;
        let items = ["Research", "Writings", "Resume", "Contact"]
            .iter()
            .enumerate()
            .map(|(i, label)| MenuItem::new(*label, i * n / 4 + n / 8))
            .collect();
        Self {
            geometry,
            items,
            style: HelixStyle::default(),
            layout: MenuLayout::default(),
        }
    }
}

impl HelixConfig {
    pub fn validate(&self) -> FolioResult<()> {
        self.geometry.validate()?;
        for item in &self.items {
            if item.anchor_index >= self.geometry.point_count {
                return Err(FolioError::validation(format!(
                    "menu item '{}' anchor_index {} is outside the helix (point_count {})",
                    item.label, item.anchor_index, self.geometry.point_count
                )));
            }
        }
        if self.layout.rung_stride == 0 {
            return Err(FolioError::validation("helix rung_stride must be > 0"));
        }
        if !self.layout.transition_ms.is_finite() || self.layout.transition_ms < 0.0 {
            return Err(FolioError::validation(
                "menu transition_ms must be finite and >= 0",
            ));
        }
        let s = &self.style.label_size;
        if !(s.x.is_finite() && s.y.is_finite()) || s.x <= 0.0 || s.y <= 0.0 {
            return Err(FolioError::validation("menu label_size must be > 0"));
        }
        Ok(())
    }
}

/// Where a label is (or is headed), before hover emphasis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelTarget {
    pub center: Point,
    pub scale: f64,
    pub opacity: f64,
    pub z: f64,
}

impl Lerp for LabelTarget {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            center: <Point as Lerp>::lerp(&a.center, &b.center, t),
            scale: a.scale + (b.scale - a.scale) * t,
            opacity: a.opacity + (b.opacity - a.opacity) * t,
            z: a.z + (b.z - a.z) * t,
        }
    }
}

/// Settled endpoints return their target untouched so a full round trip is exact.
fn blend<T: Lerp>(collapsed: T, expanded: T, progress: f64) -> T {
    if progress <= 0.0 {
        collapsed
    } else if progress >= 1.0 {
        expanded
    } else {
        T::lerp(&collapsed, &expanded, progress)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Collapsed,
    Expanding(f64),
    Expanded,
    Collapsing(f64),
}

#[derive(Clone, Debug)]
pub struct HelixMenu {
    config: HelixConfig,
    expanded: bool,
    hovered: Option<usize>,
    progress: Tween<f64>,
    hover: Vec<Tween<f64>>,
    rotation: RotationState,
    points: Vec<HelixPoint>,
}

impl HelixMenu {
    pub fn new(config: HelixConfig, rotation: &RotationState) -> FolioResult<Self> {
        config.validate()?;
        let ease = config.layout.ease;
        let hover = vec![Tween::settled(0.0, ease); config.items.len()];
        let points = config.geometry.project(rotation);
        Ok(Self {
            config,
            expanded: false,
            hovered: None,
            progress: Tween::settled(0.0, ease),
            hover,
            rotation: *rotation,
            points,
        })
    }

    pub fn config(&self) -> &HelixConfig {
        &self.config
    }

    pub fn points(&self) -> &[HelixPoint] {
        &self.points
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Recompute the helix from scratch if the rotation moved.
    pub fn sync_rotation(&mut self, rotation: &RotationState) {
        if *rotation != self.rotation {
            self.rotation = *rotation;
            self.points = self.config.geometry.project(rotation);
        }
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn set_expanded(&mut self, expanded: bool, now_ms: f64) {
        if expanded == self.expanded {
            return;
        }
        self.expanded = expanded;
        let target = if expanded { 1.0 } else { 0.0 };
        self.progress
            .retarget(target, now_ms, self.config.layout.transition_ms);
        tracing::debug!(expanded, now_ms, "menu expansion toggled");
    }

    pub fn toggle(&mut self, now_ms: f64) -> bool {
        self.set_expanded(!self.expanded, now_ms);
        self.expanded
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Out-of-range indices clear the hover.
    pub fn set_hovered(&mut self, index: Option<usize>, now_ms: f64) {
        let index = index.filter(|&i| i < self.config.items.len());
        if index == self.hovered {
            return;
        }
        let ms = self.config.layout.transition_ms;
        if let Some(prev) = self.hovered {
            self.hover[prev].retarget(0.0, now_ms, ms);
        }
        if let Some(next) = index {
            self.hover[next].retarget(1.0, now_ms, ms);
        }
        self.hovered = index;
    }

    pub fn placement(&self, now_ms: f64) -> Placement {
        let p = self.progress.sample(now_ms);
        match (self.expanded, self.progress.is_settled(now_ms)) {
            (true, true) => Placement::Expanded,
            (false, true) => Placement::Collapsed,
            (true, false) => Placement::Expanding(p),
            (false, false) => Placement::Collapsing(p),
        }
    }

    pub fn collapsed_target(&self, index: usize) -> Option<LabelTarget> {
        let item = self.config.items.get(index)?;
        let p = self.points.get(item.anchor_index)?.strand1;
        let g = &self.config.geometry;
        let layout = &self.config.layout;

        let radial = (p.x - g.center_x) / g.radius;
        let depth01 = (p.z + 1.0) * 0.5;
        let opacity = if p.z > 0.0 {
            1.0
        } else {
            1.0 - (1.0 - layout.collapsed_min_opacity) * (-p.z)
        };
        Some(LabelTarget {
            center: Point::new(p.x + radial * layout.label_offset, p.y) + layout.origin,
            scale: layout.collapsed_min_scale + (1.0 - layout.collapsed_min_scale) * depth01,
            opacity,
            z: p.z,
        })
    }

    pub fn expanded_target(&self, index: usize) -> Option<LabelTarget> {
        if index >= self.config.items.len() {
            return None;
        }
        let layout = &self.config.layout;
        let slot = index as f64 - (self.config.items.len() as f64 - 1.0) * 0.5;
        Some(LabelTarget {
            center: Point::new(
                self.config.geometry.center_x + slot * layout.expanded_slot_spacing,
                layout.expanded_row_y,
            ) + layout.origin,
            scale: 1.0,
            opacity: 1.0,
            z: 1.0,
        })
    }

    /// Current label placement, blended between the collapsed and expanded targets.
    pub fn label_state(&self, index: usize, now_ms: f64) -> Option<LabelTarget> {
        let collapsed = self.collapsed_target(index)?;
        let expanded = self.expanded_target(index)?;
        Some(blend(collapsed, expanded, self.progress.sample(now_ms)))
    }

    pub fn container_transform(&self, now_ms: f64) -> Transform2D {
        blend(
            Transform2D::default(),
            self.config.layout.expanded_container,
            self.progress.sample(now_ms),
        )
    }

    fn hover_emphasis(&self, index: usize, now_ms: f64) -> f64 {
        self.hover.get(index).map_or(0.0, |h| h.sample(now_ms))
    }

    fn label_bounds(&self, index: usize, now_ms: f64) -> Option<(Rect, f64)> {
        let state = self.label_state(index, now_ms)?;
        let h = self.hover_emphasis(index, now_ms);
        let scale = state.scale * (1.0 + (self.config.layout.hover_scale - 1.0) * h);
        let size = self.config.style.label_size;
        let half = Vec2::new(size.x * scale * 0.5, size.y * scale * 0.5);
        Some((
            Rect::from_points(state.center - half, state.center + half),
            state.z,
        ))
    }

    /// Topmost label under `point`, if any.
    pub fn label_at(&self, point: Point, now_ms: f64) -> Option<usize> {
        (0..self.config.items.len())
            .filter_map(|i| {
                let (rect, z) = self.label_bounds(i, now_ms)?;
                rect.contains(point).then_some((depth_key(z), i))
            })
            .max()
            .map(|(_, i)| i)
    }

    /// Draw primitives for the current frame: two strands, the rungs, then the labels.
    pub fn primitives(&self, now_ms: f64) -> Vec<Primitive> {
        let style = &self.config.style;
        let layout = &self.config.layout;
        let xf = Affine::translate(layout.origin) * self.container_transform(now_ms).to_affine();

        let mut out = Vec::with_capacity(2 + self.points.len() + self.config.items.len());
        for (strand_points, color) in [
            (
                self.points
                    .iter()
                    .map(|p| xf * p.strand1.to_point())
                    .collect::<Vec<_>>(),
                style.strand1,
            ),
            (
                self.points
                    .iter()
                    .map(|p| xf * p.strand2.to_point())
                    .collect::<Vec<_>>(),
                style.strand2,
            ),
        ] {
            out.push(Primitive::Polyline {
                points: strand_points,
                width: style.strand_width,
                color,
                opacity: style.strand_opacity,
                z: Z_STRANDS,
            });
        }

        // Rungs are keyed by their strand-1 end.
        for p in self.points.iter().step_by(layout.rung_stride) {
            out.push(Primitive::Rung {
                from: xf * p.strand1.to_point(),
                to: xf * p.strand2.to_point(),
                width: style.rung_width,
                color: style.rung_color,
                opacity: rung_opacity(style, p.strand1.z),
                z: depth_key(p.strand1.z),
            });
        }

        for (i, item) in self.config.items.iter().enumerate() {
            let Some(state) = self.label_state(i, now_ms) else {
                continue;
            };
            let h = self.hover_emphasis(i, now_ms);
            let base_fill_alpha = if state.z > 0.0 {
                style.label_fill_alpha_front
            } else {
                style.label_fill_alpha_back
            };
            let fill_alpha = <f32 as Lerp>::lerp(&base_fill_alpha, &style.label_fill_alpha_hover, h);
            out.push(Primitive::Label {
                index: i,
                text: item.label.clone(),
                center: state.center,
                size: style.label_size,
                scale: state.scale * (1.0 + (layout.hover_scale - 1.0) * h),
                fill: style.label_fill.with_opacity(fill_alpha),
                border: <Rgba8 as Lerp>::lerp(&style.label_border, &style.label_border_hover, h),
                border_width: style.label_border_width * (1.0 + layout.hover_border_boost * h),
                text_color: style.label_text,
                opacity: state.opacity as f32,
                hovered: self.hovered == Some(i),
                z: depth_key(state.z),
            });
        }
        out
    }
}

/// Full front opacity while `z > 0`, fading linearly to the back opacity at `z = -1`.
pub(crate) fn rung_opacity(style: &HelixStyle, z: f64) -> f32 {
    if z > 0.0 {
        style.rung_opacity_front
    } else {
        let back = (-z).clamp(0.0, 1.0) as f32;
        style.rung_opacity_front - (style.rung_opacity_front - style.rung_opacity_back) * back
    }
}

#[cfg(test)]
#[path = "../../tests/unit/helix/menu.rs"]
mod tests;
