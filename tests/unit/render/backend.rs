use super::*;
use crate::{
    foundation::core::Point,
    scene::primitive::{Z_STRANDS, Z_TREE_FIELD},
};

#[derive(Default)]
struct MockBackend {
    calls: Vec<String>,
}

impl SceneBackend for MockBackend {
    fn begin_frame(&mut self, canvas: Canvas, _background: Option<Rgba8>) -> FolioResult<()> {
        self.calls
            .push(format!("begin {}x{}", canvas.width, canvas.height));
        Ok(())
    }

    fn draw(&mut self, primitive: &Primitive) -> FolioResult<()> {
        self.calls.push(format!("draw {}", primitive.z()));
        Ok(())
    }

    fn finish(&mut self) -> FolioResult<FrameOutput> {
        self.calls.push("finish".to_string());
        Ok(FrameOutput::Svg(String::new()))
    }
}

fn segment(z: i32) -> Primitive {
    Primitive::Segment {
        from: Point::new(0.0, 0.0),
        to: Point::new(1.0, 1.0),
        width: 1.0,
        color: Rgba8::rgb(1, 2, 3),
        opacity: 1.0,
        z,
    }
}

#[test]
fn execute_scene_calls_in_depth_order() {
    let mut scene = Scene::new(Canvas::new(4, 3).unwrap(), None);
    scene.push(segment(5));
    scene.push(segment(Z_STRANDS));
    scene.push(segment(-5));
    scene.push(segment(Z_TREE_FIELD));

    let mut backend = MockBackend::default();
    let out = execute_scene(&mut backend, &scene).unwrap();
    assert_eq!(out.as_svg(), Some(""));
    assert_eq!(
        backend.calls,
        vec![
            "begin 4x3",
            "draw -100000",
            "draw -10000",
            "draw -5",
            "draw 5",
            "finish"
        ]
    );
}

#[test]
fn scene_background_wins_over_clear_color() {
    let settings = RenderSettings {
        clear_rgba: Some([1, 2, 3, 255]),
    };
    assert_eq!(
        settings.background_for(Some(Rgba8::rgb(9, 9, 9))),
        Some(Rgba8::rgb(9, 9, 9))
    );
    assert_eq!(settings.background_for(None), Some(Rgba8::rgb(1, 2, 3)));
    assert_eq!(RenderSettings::default().background_for(None), None);
}

#[test]
fn straight_alpha_conversion_undoes_premultiply() {
    let frame = FrameRGBA {
        width: 2,
        height: 1,
        data: vec![64, 32, 0, 128, 10, 20, 30, 255],
        premultiplied: true,
    };
    let straight = frame.to_straight_rgba8();
    assert_eq!(&straight[..4], &[128, 64, 0, 128]);
    assert_eq!(&straight[4..], &[10, 20, 30, 255]);
    assert_eq!(frame.pixel(1, 0), Some([10, 20, 30, 255]));
    assert_eq!(frame.pixel(2, 0), None);
}

#[test]
fn svg_output_is_not_pixels() {
    assert!(FrameOutput::Svg("<svg/>".into()).into_rgba().is_err());
}

#[test]
fn every_backend_kind_is_constructible() {
    for kind in [BackendKind::Cpu, BackendKind::Svg, BackendKind::SvgRaster] {
        assert!(create_backend(kind, &RenderSettings::default()).is_ok());
    }
}
