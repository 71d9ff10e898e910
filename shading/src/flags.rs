//! Shading flags

use bitflags::bitflags;

bitflags! {
    /// Properties of the BxDF component active at a shading point.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BxdfFlags: u32 {
        /// Delta distribution; mirror reflection or ideal refraction.
        const SINGULAR = 1 << 0;
        /// Reflection side model (BRDF). Clear means a transmission side
        /// model (BTDF).
        const BRDF = 1 << 1;
        /// The material emits light.
        const EMISSIVE = 1 << 2;
        /// Light passes straight through unchanged.
        const TRANSPARENCY = 1 << 3;
        /// Diffuse reflection.
        const DIFFUSE = 1 << 4;
    }
}

/// The layer component a sampling decision selected at a shading point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SampledComponent {
    Transparency = 0,
    Coating = 1,
    Reflection = 2,
    Refraction = 3,
    Diffuse = 4,
}

impl SampledComponent {
    fn from_bits(value: u32) -> Self {
        match value {
            1 => Self::Coating,
            2 => Self::Reflection,
            3 => Self::Refraction,
            4 => Self::Diffuse,
            _ => Self::Transparency,
        }
    }
}

const FLAGS_MASK: u32 = 0xff;
const COMPONENT_SHIFT: u32 = 8;
const COMPONENT_MASK: u32 = 0xff << COMPONENT_SHIFT;

/// Packed per shading point BxDF state.
///
/// Bits 0-7 hold the `BxdfFlags` set, bits 8-15 the `SampledComponent`; the
/// remaining bits are always zero. This layout is shared with downstream
/// consumers of the word, so `bits`/`from_bits` expose it directly.
///
/// A value is created fresh for each shading point evaluation; the sampled
/// component is meaningful only after a sampling decision wrote it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShadingFlags(u32);

impl ShadingFlags {
    /// Creates an empty flag word.
    pub fn new() -> Self {
        Self(0)
    }

    /// Creates a flag word from its packed representation.
    ///
    /// * `bits` - The packed word.
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Returns the packed representation.
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Returns the flag set in bits 0-7.
    pub fn flags(&self) -> BxdfFlags {
        BxdfFlags::from_bits_truncate(self.0 & FLAGS_MASK)
    }

    /// Replaces the flag set in bits 0-7, leaving the other bits untouched.
    ///
    /// * `flags` - The new flag set.
    pub fn set_flags(&mut self, flags: BxdfFlags) {
        self.0 = (self.0 & !FLAGS_MASK) | flags.bits();
    }

    /// Returns the sampled component stored in bits 8-15.
    pub fn sampled_component(&self) -> SampledComponent {
        SampledComponent::from_bits((self.0 & COMPONENT_MASK) >> COMPONENT_SHIFT)
    }

    /// Replaces the sampled component in bits 8-15, leaving the other bits
    /// untouched.
    ///
    /// * `component` - The selected component.
    pub fn set_sampled_component(&mut self, component: SampledComponent) {
        self.0 = (self.0 & !COMPONENT_MASK) | ((component as u32) << COMPONENT_SHIFT);
    }

    /// Returns true if the active component is a delta distribution.
    pub fn is_singular(&self) -> bool {
        self.flags().contains(BxdfFlags::SINGULAR)
    }

    /// Returns true if the material emits light.
    pub fn is_emissive(&self) -> bool {
        self.flags().contains(BxdfFlags::EMISSIVE)
    }

    /// Returns true if the active component is a transmission side model.
    pub fn is_btdf(&self) -> bool {
        !self.flags().contains(BxdfFlags::BRDF)
    }

    /// Returns true if the active component is a diffuse reflection model.
    ///
    /// Requires both `BRDF` and `DIFFUSE`, so reflection components that are
    /// not diffuse do not satisfy it.
    pub fn is_reflection(&self) -> bool {
        self.flags().contains(BxdfFlags::BRDF | BxdfFlags::DIFFUSE)
    }

    /// Returns true if light passes straight through the surface.
    pub fn is_transparency(&self) -> bool {
        self.flags().contains(BxdfFlags::TRANSPARENCY)
    }

    /// Returns true if the active component refracts light; transmission
    /// without pass-through transparency.
    pub fn is_refraction(&self) -> bool {
        self.is_btdf() && !self.is_transparency()
    }
}
