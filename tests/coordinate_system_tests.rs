use approx::assert_relative_eq;
use emblab::core::{BandScale, EmbeddedPoint, EmbeddingScales, LinearScale, Margins, PixelArea};
use proptest::prelude::*;

fn area(width: f64, height: f64) -> PixelArea {
    PixelArea::new(width, height, Margins::zero())
}

#[test]
fn horizontal_scale_maps_domain_onto_width() {
    let scale = LinearScale::horizontal((0.0, 1.0), area(200.0, 100.0)).expect("valid scale");
    assert_relative_eq!(scale.map(0.75), 150.0);
    assert_relative_eq!(scale.invert(150.0), 0.75);
}

#[test]
fn upward_vertical_scale_puts_domain_start_at_bottom() {
    let scale = LinearScale::vertical((-1.0, 1.0), area(100.0, 400.0), true).expect("valid scale");
    assert_relative_eq!(scale.map(-1.0), 400.0);
    assert_relative_eq!(scale.map(1.0), 0.0);
    assert_relative_eq!(scale.invert(200.0), 0.0);
}

#[test]
fn zero_extent_domain_collapses_onto_range_start() {
    let scale = LinearScale::horizontal((3.0, 3.0), area(200.0, 100.0)).expect("valid scale");
    assert_eq!(scale.map(3.0), 0.0);
    assert_eq!(scale.map(100.0), 0.0);

    let flat = LinearScale::new((0.0, 10.0), (5.0, 5.0)).expect("valid scale");
    assert_eq!(flat.invert(42.0), 0.0);
}

#[test]
fn non_finite_scale_bounds_are_rejected() {
    assert!(LinearScale::new((0.0, f64::NAN), (0.0, 1.0)).is_err());
    assert!(LinearScale::new((0.0, 1.0), (f64::INFINITY, 1.0)).is_err());
}

#[test]
fn band_invert_picks_nearest_row() {
    let bands = BandScale::new(4, (0.0, 100.0), 0.3).expect("valid bands");
    assert_eq!(bands.invert(-50.0), Some(0));
    assert_eq!(bands.invert(500.0), Some(3));
    let center = bands.position(2).expect("row 2") + bands.bandwidth() * 0.5;
    assert_eq!(bands.invert(center), Some(2));
    assert_eq!(BandScale::new(0, (0.0, 100.0), 0.3).expect("empty").invert(10.0), None);
}

#[test]
fn band_padding_outside_unit_interval_is_rejected() {
    assert!(BandScale::new(3, (0.0, 100.0), 1.0).is_err());
    assert!(BandScale::new(3, (0.0, 100.0), -0.1).is_err());
}

#[test]
fn embedding_scales_keep_aspect_ratio() {
    let points = vec![
        EmbeddedPoint::new(0.0, 0.0, 0),
        EmbeddedPoint::new(4.0, 1.0, 0),
        EmbeddedPoint::new(2.0, 2.0, 1),
    ];
    let scales = EmbeddingScales::fit(&points, area(400.0, 400.0)).expect("valid scales");
    let (x0, x1) = scales.x.domain();
    let (y0, y1) = scales.y.domain();
    assert_relative_eq!(x1 - x0, y1 - y0);
    assert_relative_eq!((y0 + y1) * 0.5, 1.0);

    let pixel = scales.to_pixel(2.0, 1.0);
    assert_relative_eq!(pixel.x, 200.0);
    assert_relative_eq!(pixel.y, 200.0);
}

#[test]
fn embedding_scales_ignore_non_finite_points() {
    let points = vec![
        EmbeddedPoint::new(0.0, 0.0, 0),
        EmbeddedPoint::new(f64::NAN, 9.0, 0),
        EmbeddedPoint::new(2.0, 2.0, 0),
    ];
    let scales = EmbeddingScales::fit(&points, area(100.0, 100.0)).expect("valid scales");
    assert_eq!(scales.x.domain(), (0.0, 2.0));
    assert_eq!(scales.y.domain(), (0.0, 2.0));
}

proptest! {
    #[test]
    fn linear_round_trip_property(
        start in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        extent in 1.0f64..4_096.0,
        factor in 0.0f64..1.0
    ) {
        let scale = LinearScale::horizontal((start, start + span), area(extent, 10.0))
            .expect("valid scale");
        let value = start + factor * span;
        let recovered = scale.invert(scale.map(value));
        prop_assert!((recovered - value).abs() <= 1e-6 * span.max(1.0));
    }

    #[test]
    fn band_round_trip_property(
        count in 1usize..200,
        extent in 10.0f64..4_096.0,
        padding in 0.05f64..0.9,
        pick in 0.0f64..1.0
    ) {
        let bands = BandScale::new(count, (0.0, extent), padding).expect("valid bands");
        let index = ((count - 1) as f64 * pick).round() as usize;
        let center = bands.position(index).expect("in range") + bands.bandwidth() * 0.5;
        prop_assert_eq!(bands.invert(center), Some(index));
    }
}
