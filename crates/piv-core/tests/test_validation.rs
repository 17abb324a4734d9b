use ndarray::{array, Array1, Array2};

use piv_core::error::PivError;
use piv_core::field::Coordinates;
use piv_core::postprocess::{sig2noise_val, uniform, KeepInvalid, OutlierFiller, OutlierSettings};

#[test]
fn test_sig2noise_val_masks_low_confidence() {
    let u = array![[1.0, 2.0], [3.0, 4.0]];
    let v = array![[-1.0, -2.0], [-3.0, -4.0]];
    let s2n = array![[5.0, 1.0], [2.5, 0.0]];

    let validated = sig2noise_val(&u, &v, &s2n, 2.5).unwrap();
    assert_eq!(validated.mask, array![[false, true], [false, true]]);
    assert_eq!(validated.invalid_count(), 2);
    assert_eq!(validated.u[[0, 0]], 1.0);
    assert_eq!(validated.v[[1, 0]], -3.0);
    assert!(validated.u[[0, 1]].is_nan());
    assert!(validated.v[[1, 1]].is_nan());
}

#[test]
fn test_sig2noise_val_zero_threshold_keeps_everything() {
    let u = Array2::from_elem((3, 3), 0.5);
    let s2n = Array2::zeros((3, 3));
    let validated = sig2noise_val(&u, &u, &s2n, 0.0).unwrap();
    assert_eq!(validated.invalid_count(), 0);
    assert_eq!(validated.u, u);
}

#[test]
fn test_sig2noise_val_shape_mismatch() {
    let u = Array2::<f64>::zeros((3, 3));
    let s2n = Array2::<f64>::zeros((3, 4));
    let err = sig2noise_val(&u, &u, &s2n, 1.0).unwrap_err();
    assert!(matches!(err, PivError::ShapeMismatch { .. }), "got {err:?}");
}

#[test]
fn test_sig2noise_val_rejects_nan_threshold() {
    let u = Array2::<f64>::zeros((2, 2));
    assert!(matches!(
        sig2noise_val(&u, &u, &u, f64::NAN),
        Err(PivError::InvalidSettings(_))
    ));
}

#[test]
fn test_uniform_divides_coordinates_and_velocities() {
    let coords = Coordinates {
        x: Array1::from(vec![10.0, 20.0, 30.0]),
        y: Array1::from(vec![5.0, 15.0]),
    };
    let u = Array2::from_elem((2, 3), 4.0);
    let v = Array2::from_elem((2, 3), -8.0);

    let (scaled, su, sv) = uniform(&coords, &u, &v, 2.0).unwrap();
    assert_eq!(scaled.x, Array1::from(vec![5.0, 10.0, 15.0]));
    assert_eq!(scaled.y, Array1::from(vec![2.5, 7.5]));
    assert!(su.iter().all(|&x| x == 2.0));
    assert!(sv.iter().all(|&x| x == -4.0));
}

#[test]
fn test_uniform_preserves_nan() {
    let coords = Coordinates {
        x: Array1::from(vec![1.0]),
        y: Array1::from(vec![1.0]),
    };
    let u = array![[f64::NAN]];
    let (_, su, _) = uniform(&coords, &u, &u, 96.52).unwrap();
    assert!(su[[0, 0]].is_nan());
}

#[test]
fn test_uniform_rejects_non_positive_factor() {
    let coords = Coordinates {
        x: Array1::zeros(2),
        y: Array1::zeros(2),
    };
    let u = Array2::<f64>::zeros((2, 2));
    for factor in [0.0, -1.0, f64::INFINITY] {
        assert!(matches!(
            uniform(&coords, &u, &u, factor),
            Err(PivError::InvalidSettings(_))
        ));
    }
}

#[test]
fn test_keep_invalid_is_identity() {
    let u = array![[1.0, f64::NAN], [3.0, 4.0]];
    let v = array![[0.0, f64::NAN], [1.0, 2.0]];
    let mask = array![[false, true], [false, false]];
    let settings = OutlierSettings {
        max_iter: 10,
        kernel_size: 2,
    };
    let (fu, fv) = KeepInvalid.fill(&u, &v, &mask, &settings).unwrap();
    assert_eq!(fu[[0, 0]], 1.0);
    assert!(fu[[0, 1]].is_nan());
    assert!(fv[[0, 1]].is_nan());
    assert_eq!(fv[[1, 1]], 2.0);
}
