use super::*;
use crate::{foundation::core::Vec2, scene::primitive::Scene};

fn label(text: &str) -> Primitive {
    Primitive::Label {
        index: 0,
        text: text.into(),
        center: Point::new(50.0, 20.0),
        size: Vec2::new(100.0, 40.0),
        scale: 1.0,
        fill: Rgba8::rgb(74, 158, 255).with_opacity(0.15),
        border: Rgba8::rgb(110, 181, 255),
        border_width: 2.0,
        text_color: Rgba8::rgb(255, 255, 255),
        opacity: 1.0,
        hovered: true,
        z: 0,
    }
}

fn markup(scene: &Scene) -> String {
    let mut backend = SvgBackend::new(RenderSettings::default());
    backend
        .render_scene(scene)
        .unwrap()
        .as_svg()
        .unwrap()
        .to_string()
}

#[test]
fn document_has_size_and_background() {
    let scene = Scene::new(Canvas::new(320, 200).unwrap(), Some(Rgba8::rgb(10, 14, 26)));
    let doc = markup(&scene);
    assert!(doc.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="320" height="200""#));
    assert!(doc.contains(r#"<rect width="320" height="200" fill="rgb(10,14,26)"/>"#));
    assert!(doc.trim_end().ends_with("</svg>"));
}

#[test]
fn lines_carry_opacity_and_round_caps() {
    let mut scene = Scene::new(Canvas::new(10, 10).unwrap(), None);
    scene.push(Primitive::Segment {
        from: Point::new(1.0, 2.5),
        to: Point::new(3.0, 4.0),
        width: 1.5,
        color: Rgba8::rgb(100, 150, 200),
        opacity: 0.25,
        z: 0,
    });
    let doc = markup(&scene);
    assert!(doc.contains(
        r#"<line x1="1" y1="2.5" x2="3" y2="4" stroke="rgb(100,150,200)" stroke-opacity="0.25" stroke-width="1.5" stroke-linecap="round"/>"#
    ));
}

#[test]
fn labels_render_escaped_text() {
    let mut scene = Scene::new(Canvas::new(100, 40).unwrap(), None);
    scene.push(label("R&D <2>"));
    let doc = markup(&scene);
    assert!(doc.contains(">R&amp;D &lt;2&gt;</text>"));
    assert!(doc.contains(r#"rx="20""#));
    assert!(doc.contains(r#"stroke="rgb(110,181,255)""#));
}

#[test]
fn numbers_are_compact() {
    assert_eq!(num(1.0), "1");
    assert_eq!(num(0.1 + 0.2), "0.3");
    assert_eq!(num(-0.0001), "0");
    assert_eq!(num(f64::NAN), "0");
    assert_eq!(num(12.3456), "12.346");
}
