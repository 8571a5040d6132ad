use super::*;

#[test]
fn rng_is_seed_deterministic() {
    let mut a = Rng64::new(42);
    let mut b = Rng64::new(42);
    for _ in 0..64 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
    let mut c = Rng64::new(43);
    assert_ne!(Rng64::new(42).next_u64(), c.next_u64());
}

#[test]
fn rng_ranges_stay_in_bounds() {
    let mut rng = Rng64::new(7);
    for _ in 0..10_000 {
        let u = rng.next_f64_01();
        assert!((0.0..1.0).contains(&u));
        let v = rng.next_range(25.0, 40.0);
        assert!((25.0..40.0).contains(&v));
    }
    assert_eq!(rng.next_range(5.0, 5.0), 5.0);
}

#[test]
fn normalize_degrees_wraps_into_half_open_range() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(360.0), 0.0);
    assert_eq!(normalize_degrees(725.0), 5.0);
    assert_eq!(normalize_degrees(-90.0), 270.0);
    let tiny = normalize_degrees(-1e-20);
    assert!((0.0..360.0).contains(&tiny));
    assert_eq!(normalize_degrees(f64::NAN), 0.0);
}
