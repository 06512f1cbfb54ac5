use rand::Rng;
use strum::IntoEnumIterator;
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_sampling::SimpleSamplers;

pub struct EnumUtils;
impl EnumUtils {
    pub fn get_all_variants_of_enum<T: IntoEnumIterator>() -> Vec<T> {
        let out: Vec<T> = T::iter().collect();
        out
    }
    /// Picks one variant of the enum uniformly at random.
    pub fn sample_variant_uniformly<T: IntoEnumIterator, R: Rng + ?Sized>(rng: &mut R) -> Result<T, SceneError> {
        let mut variants = Self::get_all_variants_of_enum::<T>();
        let idx = SimpleSamplers::uniform_index(variants.len(), rng)?;
        Ok(variants.swap_remove(idx))
    }
}
