use super::*;

#[test]
fn settled_tween_is_constant() {
    let tw = Tween::settled(3.0, Ease::Linear);
    assert_eq!(tw.sample(0.0), 3.0);
    assert_eq!(tw.sample(1e9), 3.0);
    assert!(tw.is_settled(0.0));
}

#[test]
fn linear_tween_interpolates_and_settles() {
    let mut tw = Tween::settled(0.0, Ease::Linear);
    tw.retarget(1.0, 100.0, 200.0);
    assert_eq!(tw.sample(100.0), 0.0);
    assert_eq!(tw.sample(200.0), 0.5);
    assert_eq!(tw.sample(300.0), 1.0);
    assert!(!tw.is_settled(250.0));
    assert!(tw.is_settled(300.0));
    assert_eq!(*tw.target(), 1.0);
}

#[test]
fn retarget_mid_flight_starts_from_current_value() {
    let mut tw = Tween::settled(0.0, Ease::Linear);
    tw.retarget(1.0, 0.0, 100.0);
    tw.retarget(0.0, 25.0, 100.0);
    assert_eq!(tw.sample(25.0), 0.25);
    assert_eq!(tw.sample(125.0), 0.0);
}

#[test]
fn zero_duration_jumps_to_target() {
    let mut tw = Tween::settled(Point::new(0.0, 0.0), Ease::Standard);
    tw.retarget(Point::new(4.0, 2.0), 10.0, 0.0);
    assert_eq!(tw.sample(10.0), Point::new(4.0, 2.0));
}

#[test]
fn color_lerp_rounds_channels() {
    let a = Rgba8::rgb(0, 100, 255);
    let b = Rgba8::rgb(255, 100, 0);
    let mid = <Rgba8 as Lerp>::lerp(&a, &b, 0.5);
    assert_eq!(mid, Rgba8::rgb(128, 100, 128));
    assert_eq!(<Rgba8 as Lerp>::lerp(&a, &b, 0.0), a);
}

#[test]
fn transform_lerp_blends_components() {
    let a = Transform2D::default();
    let b = Transform2D {
        translate: Vec2::new(10.0, 20.0),
        scale: Vec2::new(0.5, 0.5),
        ..Transform2D::default()
    };
    let mid = <Transform2D as Lerp>::lerp(&a, &b, 0.5);
    assert_eq!(mid.translate, Vec2::new(5.0, 10.0));
    assert_eq!(mid.scale, Vec2::new(0.75, 0.75));
    assert_eq!(<Transform2D as Lerp>::lerp(&a, &b, 0.0), a);
}
