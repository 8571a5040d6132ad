use super::*;
use crate::scene::primitive::Scene;

#[test]
fn rasterized_background_matches_scene() {
    let mut backend = SvgRasterBackend::new(RenderSettings::default());
    let scene = Scene::new(Canvas::new(12, 6).unwrap(), Some(Rgba8::rgb(10, 14, 26)));
    let frame = backend.render_scene(&scene).unwrap().into_rgba().unwrap();
    assert_eq!((frame.width, frame.height), (12, 6));
    assert_eq!(frame.pixel(5, 3), Some([10, 14, 26, 255]));
}

#[test]
fn invalid_markup_is_reported() {
    let db = Arc::new(usvg::fontdb::Database::new());
    let err = rasterize_svg_markup("<svg", Canvas::new(4, 4).unwrap(), db).unwrap_err();
    assert!(err.to_string().contains("parse svg tree"));
}
