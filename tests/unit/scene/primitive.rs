use super::*;

fn rung(z: i32) -> Primitive {
    Primitive::Rung {
        from: Point::new(0.0, 0.0),
        to: Point::new(1.0, 0.0),
        width: 1.0,
        color: Rgba8::rgb(0, 0, 0),
        opacity: 1.0,
        z,
    }
}

#[test]
fn depth_key_is_monotonic_and_clamped() {
    let zs = [-1.5, -1.0, -0.5, -0.001, 0.0, 0.3, 0.999, 1.0];
    let keys: Vec<i32> = zs.iter().map(|&z| depth_key(z)).collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(depth_key(1.0), 1000);
    assert_eq!(depth_key(-7.0), -1000);
    assert_eq!(depth_key(f64::NAN), 0);
    assert!(Z_TREE_FIELD < Z_STRANDS);
    assert!(Z_STRANDS < depth_key(-1.0));
}

#[test]
fn sort_is_stable_far_to_near() {
    let mut scene = Scene::new(Canvas::new(10, 10).unwrap(), None);
    scene.extend([rung(5), rung(-3), rung(5), rung(0)]);
    scene.push(Primitive::Segment {
        from: Point::ZERO,
        to: Point::new(1.0, 1.0),
        width: 1.0,
        color: Rgba8::rgb(1, 1, 1),
        opacity: 1.0,
        z: Z_TREE_FIELD,
    });
    scene.sort_by_depth();
    let keys: Vec<i32> = scene.primitives.iter().map(Primitive::z).collect();
    assert_eq!(keys, vec![Z_TREE_FIELD, -3, 0, 5, 5]);
}

#[test]
fn label_bounds_scale_around_center() {
    let label = Primitive::Label {
        index: 0,
        text: "Research".to_string(),
        center: Point::new(50.0, 20.0),
        size: Vec2::new(40.0, 10.0),
        scale: 2.0,
        fill: Rgba8::rgb(0, 0, 0),
        border: Rgba8::rgb(0, 0, 0),
        border_width: 2.0,
        text_color: Rgba8::rgb(255, 255, 255),
        opacity: 1.0,
        hovered: false,
        z: 0,
    };
    let r = label.label_bounds().unwrap();
    assert_eq!(r, Rect::new(10.0, 10.0, 90.0, 30.0));
    assert!(rung(0).label_bounds().is_none());
}
