use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::{
    foundation::core::Rgba8,
    render::backend::{BackendKind, RenderSettings, create_backend},
    scene::primitive::Primitive,
};

/// Records how many primitives each frame carried.
struct CountingBackend {
    frames: Rc<RefCell<Vec<usize>>>,
    current: usize,
}

impl SceneBackend for CountingBackend {
    fn begin_frame(&mut self, _canvas: Canvas, _background: Option<Rgba8>) -> FolioResult<()> {
        self.current = 0;
        Ok(())
    }

    fn draw(&mut self, _primitive: &Primitive) -> FolioResult<()> {
        self.current += 1;
        Ok(())
    }

    fn finish(&mut self) -> FolioResult<FrameOutput> {
        self.frames.borrow_mut().push(self.current);
        Ok(FrameOutput::Svg(String::new()))
    }
}

fn stage() -> Stage {
    Stage::mount(SceneConfig::default(), Canvas::new(640, 480).unwrap()).unwrap()
}

fn counting(stage: &mut Stage) -> Rc<RefCell<Vec<usize>>> {
    let frames = Rc::new(RefCell::new(Vec::new()));
    stage.attach_surface(Box::new(CountingBackend {
        frames: frames.clone(),
        current: 0,
    }));
    frames
}

#[test]
fn frames_without_surface_are_skipped() {
    let mut s = stage();
    s.advance(16.0).unwrap();
    s.advance(16.0).unwrap();
    assert_eq!(s.stats().frames_skipped, 2);
    assert_eq!(s.stats().frames_rendered, 0);
    assert!(s.last_frame().is_none());

    let frames = counting(&mut s);
    s.advance(16.0).unwrap();
    assert_eq!(s.stats().frames_rendered, 1);
    // 8 trees of 63 segments, 2 strands, 12 rungs, 4 labels.
    assert_eq!(*frames.borrow(), vec![8 * 63 + 2 + 12 + 4]);
}

#[test]
fn rotation_advances_at_twenty_hertz() {
    let mut s = stage();
    s.advance(1000.0).unwrap();
    assert_eq!(s.stats().rotation_ticks, 20);
    assert!((s.rotation().angle_degrees() - 6.0).abs() < 1e-9);
    assert_eq!(s.menu().rotation(), s.rotation());
}

#[test]
fn long_gap_applies_rotation_backlog_in_one_step() {
    let mut s = stage();
    let frames = counting(&mut s);
    s.advance(1e8).unwrap();

    assert_eq!(s.stats().rotation_ticks, 2_000_000);
    let expected = (2_000_000.0 * 0.3) % 360.0;
    assert!((s.rotation().angle_degrees() - expected).abs() < 1e-6);
    assert_eq!(s.menu().rotation(), s.rotation());
    assert_eq!(frames.borrow().len(), 1);
}

#[test]
fn unmount_stops_everything_once() {
    let mut s = stage();
    let frames = counting(&mut s);
    s.advance(100.0).unwrap();
    let ticks = s.stats().rotation_ticks;
    assert!(s.is_mounted());

    s.unmount();
    s.unmount();
    assert!(!s.is_mounted());
    assert!(!s.has_surface());
    s.advance(1000.0).unwrap();
    assert_eq!(s.stats().rotation_ticks, ticks);
    assert_eq!(frames.borrow().len(), 1);
}

#[test]
fn unmount_before_first_frame_is_safe() {
    let mut s = stage();
    s.unmount();
    s.advance(500.0).unwrap();
    assert_eq!(s.stats(), StageStats::default());
}

#[test]
fn click_on_label_toggles_menu() {
    let mut s = stage();
    let center = s.menu().label_state(0, s.now_ms()).unwrap().center;
    assert_eq!(s.click(Point::new(-1000.0, -1000.0)), None);
    assert!(!s.menu().is_expanded());

    assert_eq!(s.click(center), Some(0));
    assert!(s.menu().is_expanded());
    s.advance(400.0).unwrap();
    s.set_expanded(false);
    assert!(!s.menu().is_expanded());
}

#[test]
fn pointer_hover_follows_labels() {
    let mut s = stage();
    let center = s.menu().label_state(2, 0.0).unwrap().center;
    assert_eq!(s.pointer_move(center), Some(2));
    assert_eq!(s.menu().hovered(), Some(2));
    s.pointer_leave();
    assert_eq!(s.menu().hovered(), None);
}

#[test]
fn resize_keeps_tree_geometry() {
    let mut s = stage();
    let before = s.field().trees().to_vec();
    s.resize(Canvas::new(200, 100).unwrap());
    assert_eq!(s.canvas(), Canvas::new(200, 100).unwrap());
    assert_eq!(s.field().trees(), before.as_slice());
    assert_eq!(s.scene_at(0.0).canvas, Canvas::new(200, 100).unwrap());
}

#[test]
fn svg_surface_produces_markup() {
    let mut s = stage();
    s.attach_surface(create_backend(BackendKind::Svg, &RenderSettings::default()).unwrap());
    s.advance(16.0).unwrap();
    let svg = s.last_frame().and_then(FrameOutput::as_svg).unwrap();
    assert!(svg.contains(">Research</text>"));
    assert!(s.detach_surface().is_some());
}

#[test]
fn same_seed_same_scene() {
    let a = stage();
    let b = stage();
    assert_eq!(a.scene_at(0.0), b.scene_at(0.0));
}
