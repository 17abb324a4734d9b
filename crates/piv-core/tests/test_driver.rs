mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;

use piv_core::consts::PARALLEL_CELL_THRESHOLD;
use piv_core::correlate::direct::DirectCorrelator;
use piv_core::error::PivError;
use piv_core::field::{
    extended_search_area_piv, extended_search_area_piv_with_progress, get_coordinates,
    process_cell, CellStatus, GridSpec, PivSettings,
};
use piv_core::frame::Frame;
use piv_core::pipeline::config::{CorrelationMethod, Sig2NoiseMethod, SubpixelMethod};

fn settings(method: CorrelationMethod) -> PivSettings {
    PivSettings {
        grid: GridSpec::new(24, 12),
        dt: 1.0,
        correlation_method: method,
        ..PivSettings::default()
    }
}

#[test]
fn test_identical_frames_give_zero_field() {
    let frame = common::particle_frame(64, 64, common::PARTICLES_64, 7);
    for method in [CorrelationMethod::Fft, CorrelationMethod::Direct] {
        let field = extended_search_area_piv(&frame, &frame, &settings(method)).unwrap();
        assert_eq!(field.shape(), (4, 4));
        for ((u, v), status) in field.u.iter().zip(field.v.iter()).zip(field.status.iter()) {
            assert_eq!(*status, CellStatus::Ok, "{method}");
            assert!(u.abs() < 1e-6, "{method}: u={u}");
            assert!(v.abs() < 1e-6, "{method}: v={v}");
        }
    }
}

#[test]
fn test_integer_translation_recovered_on_interior_cells() {
    for seed in [1, 2, 3] {
        let (a, b) = common::translated_pair(3, 2, seed);
        for method in [CorrelationMethod::Fft, CorrelationMethod::Direct] {
            let field = extended_search_area_piv(&a, &b, &settings(method)).unwrap();
            for (r, c) in common::interior_cells(4, 4) {
                let (u, v) = (field.u[[r, c]], field.v[[r, c]]);
                assert!((u - 2.0).abs() < 0.1, "{method} seed={seed} ({r},{c}): u={u}");
                assert!((v - 3.0).abs() < 0.1, "{method} seed={seed} ({r},{c}): v={v}");
                assert!(
                    field.sig2noise[[r, c]] > 2.5,
                    "{method} seed={seed} ({r},{c}): s2n={}",
                    field.sig2noise[[r, c]]
                );
            }
        }
    }
}

#[test]
fn test_fft_and_direct_agree() {
    let (a, b) = common::translated_pair(-2, 1, 5);
    let fft = extended_search_area_piv(&a, &b, &settings(CorrelationMethod::Fft)).unwrap();
    let direct = extended_search_area_piv(&a, &b, &settings(CorrelationMethod::Direct)).unwrap();
    assert_eq!(fft.shape(), direct.shape());
    for (f, d) in fft.u.iter().zip(direct.u.iter()) {
        assert!((f - d).abs() < 0.5, "fft={f} direct={d}");
    }
    for (f, d) in fft.v.iter().zip(direct.v.iter()) {
        assert!((f - d).abs() < 0.5, "fft={f} direct={d}");
    }
}

#[test]
fn test_subpixel_translation_recovered() {
    let positions = common::particle_positions(64, 64, common::PARTICLES_64, 21);
    let render = |dy, dx| {
        Frame::new(
            common::render_particles(64, 64, &positions, common::PARTICLE_SIGMA, dy, dx),
            8,
        )
    };
    let a = render(0.0, 0.0);
    let b = render(1.3, -0.6);
    let field = extended_search_area_piv(&a, &b, &settings(CorrelationMethod::Fft)).unwrap();
    for (r, c) in common::interior_cells(4, 4) {
        let (u, v) = (field.u[[r, c]], field.v[[r, c]]);
        assert!((u + 0.6).abs() < 0.15, "({r},{c}): u={u}");
        assert!((v - 1.3).abs() < 0.15, "({r},{c}): v={v}");
    }
}

#[test]
fn test_extended_search_area_keeps_grid_and_finds_shift() {
    let (a, b) = common::translated_pair(3, 2, 4);
    let mut s = settings(CorrelationMethod::Fft);
    s.grid = GridSpec::new(24, 12).with_search_area(40);
    let field = extended_search_area_piv(&a, &b, &s).unwrap();
    assert_eq!(field.shape(), (4, 4));
    for (r, c) in common::interior_cells(4, 4) {
        assert!((field.u[[r, c]] - 2.0).abs() < 0.1, "u={}", field.u[[r, c]]);
        assert!((field.v[[r, c]] - 3.0).abs() < 0.1, "v={}", field.v[[r, c]]);
    }
}

#[test]
fn test_velocity_scales_with_dt() {
    let (a, b) = common::translated_pair(3, 2, 1);
    let mut s = settings(CorrelationMethod::Fft);
    let pixels = extended_search_area_piv(&a, &b, &s).unwrap();
    s.dt = 0.5;
    let scaled = extended_search_area_piv(&a, &b, &s).unwrap();
    for (p, q) in pixels.u.iter().zip(scaled.u.iter()) {
        assert!((q - 2.0 * p).abs() < 1e-9);
    }
    for (p, q) in pixels.v.iter().zip(scaled.v.iter()) {
        assert!((q - 2.0 * p).abs() < 1e-9);
    }
}

#[test]
fn test_field_shape_matches_coordinates() {
    let frame = common::particle_frame(48, 100, 300, 9);
    let mut s = settings(CorrelationMethod::Fft);
    s.grid = GridSpec::new(16, 8);
    let field = extended_search_area_piv(&frame, &frame, &s).unwrap();
    let coords = get_coordinates(frame.shape(), 16, 8).unwrap();
    assert_eq!(field.shape(), (coords.y.len(), coords.x.len()));
    assert_eq!(field.sig2noise.dim(), field.shape());
    assert_eq!(field.status.dim(), field.shape());
}

#[test]
fn test_flat_frames_are_degenerate_not_errors() {
    let flat = Frame::new(Array2::from_elem((64, 64), 0.25), 8);
    let field = extended_search_area_piv(&flat, &flat, &settings(CorrelationMethod::Fft)).unwrap();
    assert_eq!(field.count_status(CellStatus::Degenerate), 16);
    assert!(field.u.iter().all(|&u| u == 0.0));
    assert!(field.v.iter().all(|&v| v == 0.0));
    assert!(field.sig2noise.iter().all(|&s| s == 0.0));
}

#[test]
fn test_sig2noise_is_finite_and_non_negative() {
    let a = common::particle_frame(64, 64, common::PARTICLES_64, 30);
    let b = common::particle_frame(64, 64, common::PARTICLES_64, 31);
    for method in [Sig2NoiseMethod::Peak2Peak, Sig2NoiseMethod::Peak2Mean] {
        let mut s = settings(CorrelationMethod::Fft);
        s.sig2noise_method = method;
        let field = extended_search_area_piv(&a, &b, &s).unwrap();
        assert!(field.sig2noise.iter().all(|s| s.is_finite() && *s >= 0.0));
    }
}

#[test]
fn test_border_peaks_have_zero_confidence() {
    let a = common::particle_frame(64, 64, common::PARTICLES_64, 40);
    let b = common::particle_frame(64, 64, common::PARTICLES_64, 41);
    let field = extended_search_area_piv(&a, &b, &settings(CorrelationMethod::Direct)).unwrap();
    for (status, s2n) in field.status.iter().zip(field.sig2noise.iter()) {
        if *status == CellStatus::BorderPeak {
            assert_eq!(*s2n, 0.0);
        }
    }
}

#[test]
fn test_every_subpixel_method_tracks_translation() {
    let (a, b) = common::translated_pair(3, 2, 2);
    for subpixel in [
        SubpixelMethod::Gaussian,
        SubpixelMethod::Parabolic,
        SubpixelMethod::Centroid,
    ] {
        let mut s = settings(CorrelationMethod::Fft);
        s.subpixel_method = subpixel;
        let field = extended_search_area_piv(&a, &b, &s).unwrap();
        for (r, c) in common::interior_cells(4, 4) {
            assert!((field.u[[r, c]] - 2.0).abs() < 0.5, "{subpixel}");
            assert!((field.v[[r, c]] - 3.0).abs() < 0.5, "{subpixel}");
        }
    }
}

#[test]
fn test_progress_reaches_cell_count() {
    let (a, b) = common::translated_pair(1, 1, 3);
    let calls = AtomicUsize::new(0);
    let last = AtomicUsize::new(0);
    let field = extended_search_area_piv_with_progress(
        &a,
        &b,
        &settings(CorrelationMethod::Fft),
        |done| {
            calls.fetch_add(1, Ordering::Relaxed);
            last.fetch_max(done, Ordering::Relaxed);
        },
    )
    .unwrap();
    let cells = field.u.len();
    assert!(cells >= PARALLEL_CELL_THRESHOLD);
    assert_eq!(calls.load(Ordering::Relaxed), cells);
    assert_eq!(last.load(Ordering::Relaxed), cells);
}

#[test]
fn test_overlap_not_smaller_than_window_rejected() {
    let frame = common::particle_frame(64, 64, 100, 1);
    let mut s = settings(CorrelationMethod::Fft);
    s.grid = GridSpec::new(24, 24);
    let err = extended_search_area_piv(&frame, &frame, &s).unwrap_err();
    assert!(matches!(err, PivError::InvalidGridSpec(_)), "got {err:?}");
}

#[test]
fn test_non_positive_dt_rejected() {
    let frame = common::particle_frame(64, 64, 100, 1);
    for dt in [0.0, -0.02, f64::NAN] {
        let mut s = settings(CorrelationMethod::Fft);
        s.dt = dt;
        let err = extended_search_area_piv(&frame, &frame, &s).unwrap_err();
        assert!(matches!(err, PivError::InvalidSettings(_)), "dt={dt}: {err:?}");
    }
}

#[test]
fn test_frame_shape_mismatch_rejected() {
    let a = common::particle_frame(64, 64, 100, 1);
    let b = common::particle_frame(64, 48, 100, 1);
    let err = extended_search_area_piv(&a, &b, &settings(CorrelationMethod::Fft)).unwrap_err();
    assert!(
        matches!(
            err,
            PivError::ShapeMismatch {
                expected: (64, 64),
                actual: (64, 48)
            }
        ),
        "got {err:?}"
    );
}

#[test]
fn test_image_smaller_than_window_rejected() {
    let frame = common::particle_frame(16, 16, 20, 1);
    let err = extended_search_area_piv(&frame, &frame, &settings(CorrelationMethod::Fft))
        .unwrap_err();
    assert!(matches!(err, PivError::InvalidGridSpec(_)), "got {err:?}");
}

#[test]
fn test_integer_frames_from_array() {
    let (a, b) = common::translated_pair(3, 2, 6);
    let to_counts = |f: &Frame| f.data.mapv(|v| (v * 4095.0).round() as i32);
    let a = Frame::from_array(&to_counts(&a));
    let b = Frame::from_array(&to_counts(&b));
    assert_eq!(a.original_bit_depth, 32);
    assert_eq!(a.shape(), (64, 64));

    for method in [CorrelationMethod::Fft, CorrelationMethod::Direct] {
        let field = extended_search_area_piv(&a, &b, &settings(method)).unwrap();
        for (r, c) in common::interior_cells(4, 4) {
            let (u, v) = (field.u[[r, c]], field.v[[r, c]]);
            assert!((u - 2.0).abs() < 0.1, "{method} ({r},{c}): u={u}");
            assert!((v - 3.0).abs() < 0.1, "{method} ({r},{c}): v={v}");
            assert!(field.sig2noise[[r, c]] > 2.5);
        }
    }
}

#[test]
fn test_process_cell_with_search_area_smaller_than_window() {
    let (a, b) = common::translated_pair(3, 2, 1);
    let s = PivSettings {
        grid: GridSpec::new(24, 12).with_search_area(16),
        dt: 1.0,
        ..PivSettings::default()
    };
    let cell = process_cell(&a, &b, 1, 1, &s, &DirectCorrelator);
    assert!(cell.dx.is_finite() && cell.dy.is_finite());
    assert!(cell.sig2noise >= 0.0);
}
