use std::f64::consts::{FRAC_PI_3, FRAC_PI_6, TAU};

/// Signs applied to phases a, b and c.
pub(super) type PhaseSigns = [f64; 3];

/// Trapezoidal back-EMF shape of phase a at electrical angle `theta_e`.
///
/// Flat at +1 over `[π/6, 5π/6]` and at -1 over `[7π/6, 11π/6]`, with linear
/// transitions in between.
pub(super) fn back_emf_shape(theta_e: f64) -> f64 {
    let theta = theta_e.rem_euclid(TAU);
    if theta < FRAC_PI_6 {
        theta / FRAC_PI_6
    } else if theta < 5.0 * FRAC_PI_6 {
        1.0
    } else if theta < 7.0 * FRAC_PI_6 {
        1.0 - (theta - 5.0 * FRAC_PI_6) / FRAC_PI_6
    } else if theta < 11.0 * FRAC_PI_6 {
        -1.0
    } else {
        -1.0 + (theta - 11.0 * FRAC_PI_6) / FRAC_PI_6
    }
}

/// Back-EMF shapes of all three phases, each lagging the previous by 120°.
pub(super) fn back_emf_shapes(theta_e: f64) -> PhaseSigns {
    [
        back_emf_shape(theta_e),
        back_emf_shape(theta_e - 2.0 * FRAC_PI_3),
        back_emf_shape(theta_e - 4.0 * FRAC_PI_3),
    ]
}

/// Six-step commutation: the phase signs energized at electrical angle `theta_e`.
///
/// Each sector spans 60° and is centered on a multiple of 60°, so the two
/// energized phases are the ones on the flat parts of their back-EMF.
pub(super) fn six_step(theta_e: f64) -> PhaseSigns {
    // The sector is a small non-negative integer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let sector = ((theta_e.rem_euclid(TAU) + FRAC_PI_6) / FRAC_PI_3).floor() as u8;

    match sector % 6 {
        0 => [0.0, -1.0, 1.0],
        1 => [1.0, -1.0, 0.0],
        2 => [1.0, 0.0, -1.0],
        3 => [0.0, 1.0, -1.0],
        4 => [-1.0, 1.0, 0.0],
        _ => [-1.0, 0.0, 1.0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::PI;

    use approx::assert_relative_eq;

    #[test]
    fn back_emf_is_trapezoidal() {
        assert_relative_eq!(back_emf_shape(0.0), 0.0);
        assert_relative_eq!(back_emf_shape(FRAC_PI_6 / 2.0), 0.5);
        assert_relative_eq!(back_emf_shape(PI / 2.0), 1.0);
        assert_relative_eq!(back_emf_shape(PI), 0.0, epsilon = 1e-12);
        assert_relative_eq!(back_emf_shape(3.0 * PI / 2.0), -1.0);
        assert_relative_eq!(back_emf_shape(TAU - FRAC_PI_6 / 2.0), -0.5, epsilon = 1e-12);
        assert_relative_eq!(back_emf_shape(TAU + PI / 2.0), 1.0);
        assert_relative_eq!(back_emf_shape(-PI / 2.0), -1.0);
    }

    #[test]
    fn phases_lag_by_a_third_of_a_turn() {
        for step in 0..36 {
            let theta_e = f64::from(step) * TAU / 36.0;
            let [a, b, c] = back_emf_shapes(theta_e);
            assert!(a.abs() <= 1.0 && b.abs() <= 1.0 && c.abs() <= 1.0);
            assert_relative_eq!(b, back_emf_shape(theta_e + 4.0 * FRAC_PI_3), epsilon = 1e-12);
            assert_relative_eq!(c, back_emf_shape(theta_e + 2.0 * FRAC_PI_3), epsilon = 1e-12);
        }
    }

    #[test]
    fn commutation_drives_flat_phases() {
        // At each sector center the energized phases sit on a flat part of
        // their back-EMF with matching sign, and the floating phase is at zero.
        for sector in 0..6 {
            let theta_e = f64::from(sector) * FRAC_PI_3;
            let signs = six_step(theta_e);
            let shapes = back_emf_shapes(theta_e);
            for (sign, shape) in signs.iter().zip(shapes) {
                if *sign == 0.0 {
                    assert_relative_eq!(shape, 0.0, epsilon = 1e-12);
                } else {
                    assert_relative_eq!(shape, *sign, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn sectors_wrap_around() {
        assert_eq!(six_step(TAU - 0.01), six_step(0.0));
        assert_eq!(six_step(-FRAC_PI_3), six_step(5.0 * FRAC_PI_3));
        assert_eq!(six_step(TAU + FRAC_PI_3), six_step(FRAC_PI_3));
    }
}
