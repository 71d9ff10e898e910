//! Über shader

use crate::flags::{BxdfFlags, SampledComponent, ShadingFlags};
use crate::fresnel::{dielectric_reflectance, schlick_fresnel};
use scenegraph::base::Float;
use scenegraph::material::Layers;

/// Roughness below which a component is treated as a delta distribution.
pub const ROUGHNESS_EPS: Float = 1e-4;

/// Scalar layer parameters needed to pick a component at a shading point.
///
/// These are the material inputs after evaluation at the shading point.
#[derive(Clone, Copy, Debug)]
pub struct UberShaderData {
    /// Probability of light passing straight through.
    pub transparency: Float,

    /// Index of refraction of the coating layer.
    pub coating_ior: Float,

    /// Index of refraction of the reflection layer.
    pub reflection_ior: Float,

    /// Roughness of the reflection layer.
    pub reflection_roughness: Float,

    /// Index of refraction of the refraction layer.
    pub refraction_ior: Float,

    /// Roughness of the refraction layer.
    pub refraction_roughness: Float,
}

/// Chooses the BxDF component to sample at a shading point and returns the
/// packed flag word describing it.
///
/// Layers are considered top to bottom: transparency, refraction, coating,
/// reflection, then diffuse as the fallback. Each candidate layer draws one
/// uniform sample and wins with the probability of its share of the energy;
/// the Fresnel terms decide how much energy reaches the layers below.
///
/// * `layers`   - Active layers of the material.
/// * `data`     - Evaluated layer parameters.
/// * `ndotwi`   - Cosine of the angle between normal and incident direction.
/// * `sample1d` - Uniform sample source in `[0, 1)`.
pub fn select_component<F>(
    layers: Layers,
    data: &UberShaderData,
    ndotwi: Float,
    mut sample1d: F,
) -> ShadingFlags
where
    F: FnMut() -> Float,
{
    let mut result = ShadingFlags::new();
    let mut flags = BxdfFlags::empty();

    if layers.contains(Layers::EMISSION) {
        flags |= BxdfFlags::EMISSIVE;
    }

    if layers.contains(Layers::TRANSPARENCY) && sample1d() < data.transparency {
        flags |= BxdfFlags::TRANSPARENCY | BxdfFlags::SINGULAR;
        result.set_flags(flags);
        result.set_sampled_component(SampledComponent::Transparency);
        return result;
    }

    if layers.contains(Layers::REFRACTION) {
        let fresnel = dielectric_reflectance(1.0, data.refraction_ior, ndotwi);
        if sample1d() >= fresnel {
            // Transmission side; the BRDF bit stays clear.
            if data.refraction_roughness < ROUGHNESS_EPS {
                flags |= BxdfFlags::SINGULAR;
            }
            result.set_flags(flags);
            result.set_sampled_component(SampledComponent::Refraction);
            return result;
        }
    }

    // The remaining components are reflection side models.
    flags |= BxdfFlags::BRDF;

    if layers.contains(Layers::COATING) {
        let fresnel = schlick_fresnel(data.coating_ior, ndotwi);
        if sample1d() < fresnel {
            flags |= BxdfFlags::SINGULAR;
            result.set_flags(flags);
            result.set_sampled_component(SampledComponent::Coating);
            return result;
        }
    }

    if layers.contains(Layers::REFLECTION) {
        let fresnel = dielectric_reflectance(1.0, data.reflection_ior, ndotwi);
        if sample1d() < fresnel {
            if data.reflection_roughness < ROUGHNESS_EPS {
                flags |= BxdfFlags::SINGULAR;
            }
            result.set_flags(flags);
            result.set_sampled_component(SampledComponent::Reflection);
            return result;
        }
    }

    flags |= BxdfFlags::DIFFUSE;
    result.set_flags(flags);
    result.set_sampled_component(SampledComponent::Diffuse);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> UberShaderData {
        UberShaderData {
            transparency: 0.0,
            coating_ior: 1.5,
            reflection_ior: 1.5,
            reflection_roughness: 0.01,
            refraction_ior: 1.5,
            refraction_roughness: 0.0,
        }
    }

    #[test]
    fn diffuse_fallback_draws_no_samples() {
        let result = select_component(Layers::DIFFUSE, &data(), 1.0, || {
            panic!("no sample should be drawn")
        });
        assert_eq!(result.flags(), BxdfFlags::BRDF | BxdfFlags::DIFFUSE);
        assert_eq!(result.sampled_component(), SampledComponent::Diffuse);
        assert!(result.is_reflection());
    }

    #[test]
    fn emission_layer_marks_the_word() {
        let result = select_component(
            Layers::EMISSION | Layers::DIFFUSE,
            &data(),
            1.0,
            || unreachable!(),
        );
        assert!(result.is_emissive());
        assert_eq!(
            result.flags(),
            BxdfFlags::EMISSIVE | BxdfFlags::BRDF | BxdfFlags::DIFFUSE
        );
        assert_eq!(result.sampled_component(), SampledComponent::Diffuse);
    }

    #[test]
    fn transparency_wins_below_its_probability() {
        let mut d = data();
        d.transparency = 0.7;

        let result = select_component(Layers::TRANSPARENCY, &d, 1.0, || 0.3);
        assert_eq!(
            result.flags(),
            BxdfFlags::TRANSPARENCY | BxdfFlags::SINGULAR
        );
        assert_eq!(result.sampled_component(), SampledComponent::Transparency);
        assert!(result.is_transparency());
        assert!(result.is_btdf());
        assert!(!result.is_refraction());

        // Above the probability the layer is skipped.
        let result = select_component(Layers::TRANSPARENCY, &d, 1.0, || 0.9);
        assert_eq!(result.flags(), BxdfFlags::BRDF | BxdfFlags::DIFFUSE);
        assert_eq!(result.sampled_component(), SampledComponent::Diffuse);
    }

    #[test]
    fn refraction_takes_the_transmitted_share() {
        // At normal incidence the reflectance for ior 1.5 is 0.04, so a
        // sample of 0.5 picks the transmission side.
        let result = select_component(Layers::REFRACTION, &data(), 1.0, || 0.5);
        assert_eq!(result.flags(), BxdfFlags::SINGULAR);
        assert_eq!(result.sampled_component(), SampledComponent::Refraction);
        assert!(result.is_btdf());
        assert!(result.is_refraction());
        assert!(result.is_singular());

        // A rough refraction layer is not singular.
        let mut d = data();
        d.refraction_roughness = 0.2;
        let result = select_component(Layers::REFRACTION, &d, 1.0, || 0.5);
        assert_eq!(result.flags(), BxdfFlags::empty());
        assert!(!result.is_singular());

        // A sample below the reflectance stays on the reflection side.
        let result = select_component(Layers::REFRACTION, &data(), 1.0, || 0.01);
        assert_eq!(result.flags(), BxdfFlags::BRDF | BxdfFlags::DIFFUSE);
        assert_eq!(result.sampled_component(), SampledComponent::Diffuse);
    }

    #[test]
    fn coating_wins_at_grazing_angles() {
        let result = select_component(
            Layers::COATING | Layers::DIFFUSE,
            &data(),
            0.1,
            || 0.5,
        );
        assert_eq!(result.flags(), BxdfFlags::BRDF | BxdfFlags::SINGULAR);
        assert_eq!(result.sampled_component(), SampledComponent::Coating);
        assert!(!result.is_reflection());
    }

    #[test]
    fn reflection_wins_at_grazing_angles() {
        let result = select_component(
            Layers::REFLECTION | Layers::DIFFUSE,
            &data(),
            0.1,
            || 0.5,
        );
        assert_eq!(result.flags(), BxdfFlags::BRDF);
        assert_eq!(result.sampled_component(), SampledComponent::Reflection);
        // Roughness 0.01 is above the delta threshold.
        assert!(!result.is_singular());
        // Sampled reflection without the diffuse bit does not satisfy the
        // reflection predicate.
        assert!(!result.is_reflection());

        let mut d = data();
        d.reflection_roughness = 0.0;
        let result = select_component(Layers::REFLECTION, &d, 0.1, || 0.5);
        assert_eq!(result.flags(), BxdfFlags::BRDF | BxdfFlags::SINGULAR);
    }

    #[test]
    fn one_sample_per_candidate_layer() {
        let layers = Layers::TRANSPARENCY
            | Layers::REFRACTION
            | Layers::COATING
            | Layers::REFLECTION
            | Layers::DIFFUSE;
        let mut samples = vec![0.5, 0.01, 0.9, 0.9].into_iter();
        let mut draws = 0;

        let result = select_component(layers, &data(), 1.0, || {
            draws += 1;
            samples.next().unwrap()
        });
        assert_eq!(draws, 4);
        assert_eq!(result.flags(), BxdfFlags::BRDF | BxdfFlags::DIFFUSE);
        assert_eq!(result.sampled_component(), SampledComponent::Diffuse);
    }
}
