use gemcut_toolpath::{orthogonal_offset, Vec2};
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = f64> {
    -1000.0f64..1000.0
}

proptest! {
    #[test]
    fn offset_is_orthogonal_with_requested_norm(
        x1 in coordinate(),
        y1 in coordinate(),
        x2 in coordinate(),
        y2 in coordinate(),
        magnitude in 0.001f64..100.0,
    ) {
        let start = Vec2::new(x1, y1);
        let end = Vec2::new(x2, y2);
        prop_assume!((end - start).norm() > 1e-6);

        let offset = orthogonal_offset(start, end, magnitude).unwrap();
        let direction = (end - start).normalize();

        prop_assert!(offset.dot(&direction).abs() < 1e-9 * magnitude.max(1.0));
        prop_assert!((offset.norm() - magnitude).abs() < 1e-9 * magnitude.max(1.0));
    }

    #[test]
    fn negative_magnitude_mirrors_offset(
        x2 in 1.0f64..50.0,
        y2 in -50.0f64..50.0,
        magnitude in 0.01f64..10.0,
    ) {
        let start = Vec2::zeros();
        let end = Vec2::new(x2, y2);
        let positive = orthogonal_offset(start, end, magnitude).unwrap();
        let negative = orthogonal_offset(start, end, -magnitude).unwrap();
        prop_assert!((positive + negative).norm() < 1e-12);
    }
}

#[test]
fn test_zero_length_segment_is_invalid() {
    let p = Vec2::new(3.0, -7.5);
    let err = orthogonal_offset(p, p, 1.0).unwrap_err();
    assert!(err.to_string().starts_with("Invalid geometry"));
}

#[test]
fn test_non_finite_segment_is_invalid() {
    let err = orthogonal_offset(Vec2::zeros(), Vec2::new(f64::NAN, 1.0), 1.0).unwrap_err();
    assert!(err.to_string().starts_with("Invalid geometry"));
}
