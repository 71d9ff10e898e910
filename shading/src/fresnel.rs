//! Fresnel

use scenegraph::base::Float;

/// Guard for near zero denominators when callers turn reflectance values
/// into sampling weights.
pub const DENOM_EPS: Float = 1e-8;

/// Schlick's approximation to the Fresnel reflectance.
///
/// * `eta`   - Relative index of refraction across the interface.
/// * `ndotw` - Cosine of the angle between surface normal and direction.
pub fn schlick_fresnel(eta: Float, ndotw: Float) -> Float {
    let r = (1.0 - eta) / (1.0 + eta);
    let f0 = r * r;
    let m = 1.0 - ndotw.abs();
    let m2 = m * m;
    f0 + (1.0 - f0) * m2 * m2 * m
}

/// Fresnel reflectance for unpolarised light crossing a dielectric interface,
/// averaged over both polarizations.
///
/// The caller supplies cosines consistent with Snell's law; use
/// [`dielectric_reflectance`] to derive the transmitted cosine.
///
/// * `eta_i`  - Index of refraction on the incident side.
/// * `eta_t`  - Index of refraction on the transmitted side.
/// * `ndotwi` - Cosine of the angle between normal and incident direction.
/// * `ndotwt` - Cosine of the angle between normal and transmitted direction.
pub fn fresnel_dielectric(eta_i: Float, eta_t: Float, ndotwi: Float, ndotwt: Float) -> Float {
    let r_parl = (eta_t * ndotwi - eta_i * ndotwt) / (eta_t * ndotwi + eta_i * ndotwt);
    let r_perp = (eta_i * ndotwi - eta_t * ndotwt) / (eta_i * ndotwi + eta_t * ndotwt);
    (r_parl * r_parl + r_perp * r_perp) * 0.5
}

/// Dielectric reflectance with the transmitted cosine derived from Snell's
/// law.
///
/// * `eta_i`  - Index of refraction on the incident side.
/// * `eta_t`  - Index of refraction on the transmitted side.
/// * `ndotwi` - Cosine of the angle between normal and incident direction. A
///   negative value means the direction exits the medium.
pub fn dielectric_reflectance(eta_i: Float, eta_t: Float, ndotwi: Float) -> Float {
    let cos_theta_i = ndotwi.clamp(-1.0, 1.0);

    // Swap the indices of refraction when exiting the medium.
    let (eta_i, eta_t, cos_theta_i) = if cos_theta_i > 0.0 {
        (eta_i, eta_t, cos_theta_i)
    } else {
        (eta_t, eta_i, -cos_theta_i)
    };

    // Compute the transmitted cosine using Snell's law.
    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();
    fresnel_dielectric(eta_i, eta_t, cos_theta_i, cos_theta_t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn schlick_at_normal_incidence() {
        // At |cos| = 1 only the base reflectance remains.
        assert!(approx_eq!(
            Float,
            schlick_fresnel(1.5, 1.0),
            0.04,
            epsilon = 1e-6
        ));
        assert!(approx_eq!(
            Float,
            schlick_fresnel(1.5, -1.0),
            0.04,
            epsilon = 1e-6
        ));
        assert_eq!(schlick_fresnel(1.0, 1.0), 0.0);
    }

    #[test]
    fn matched_indices_reflect_nothing() {
        for i in 1..=10 {
            let cos = i as Float / 10.0;
            assert_eq!(fresnel_dielectric(1.5, 1.5, cos, cos), 0.0);
            assert!(approx_eq!(
                Float,
                dielectric_reflectance(1.5, 1.5, cos),
                0.0,
                epsilon = 1e-6
            ));
        }
    }

    #[test]
    fn total_internal_reflection() {
        // Exiting glass into air beyond the critical angle.
        assert_eq!(dielectric_reflectance(1.5, 1.0, 0.3), 1.0);
        assert_eq!(dielectric_reflectance(1.0, 1.5, -0.3), 1.0);
        // Below the critical angle some light is transmitted.
        assert!(dielectric_reflectance(1.5, 1.0, 0.9) < 1.0);
    }

    #[test]
    fn grazing_reflectance_approaches_one() {
        assert!(dielectric_reflectance(1.0, 1.5, 0.001) > 0.99);
        assert!(schlick_fresnel(1.5, 0.001) > 0.99);
    }

    proptest! {
        #[test]
        fn schlick_fifth_power(eta in 1.0..3.0f32, ndotw in -1.0..1.0f32) {
            let r = (1.0 - eta) / (1.0 + eta);
            let f0 = r * r;
            let m = 1.0 - ndotw.abs();
            let expected = f0 + (1.0 - f0) * m.powi(5);
            prop_assert!(approx_eq!(
                Float,
                schlick_fresnel(eta, ndotw),
                expected,
                epsilon = 1e-5
            ));
        }

        #[test]
        fn reciprocity(
            eta_i in 1.0..3.0f32,
            eta_t in 1.0..3.0f32,
            ndotwi in 0.01..1.0f32,
            ndotwt in 0.01..1.0f32,
        ) {
            prop_assert_eq!(
                fresnel_dielectric(eta_i, eta_t, ndotwi, ndotwt),
                fresnel_dielectric(eta_t, eta_i, ndotwt, ndotwi)
            );
        }

        #[test]
        fn reflectance_is_a_fraction(eta in 1.0..3.0f32, ndotwi in -1.0..1.0f32) {
            let f = dielectric_reflectance(1.0, eta, ndotwi);
            prop_assert!((0.0..=1.0).contains(&f));
        }
    }
}
