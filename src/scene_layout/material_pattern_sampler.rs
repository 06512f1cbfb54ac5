use itertools::iproduct;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_sampling::SimpleSamplers;

/// Random material names of the form `<pattern><variant>`, e.g. `Plugin/Checker_3`.  Each
/// pattern is assumed to come in `variants` numbered versions, `0..variants`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialPatternSampler {
    patterns: Vec<String>,
    variants: usize
}
impl MaterialPatternSampler {
    pub fn new(patterns: Vec<String>, variants: usize) -> Result<Self, SceneError> {
        if patterns.is_empty() {
            return Err(SceneError::new_invalid_arguments_error("Material sampler needs at least one pattern.", file!(), line!()));
        }
        if variants == 0 {
            return Err(SceneError::new_invalid_arguments_error("Material sampler needs at least one variant per pattern.", file!(), line!()));
        }
        Ok(Self { patterns, variants })
    }
    /// Patterns given as one whitespace separated string, the way a visual plugin lists them.
    pub fn new_from_pattern_string(patterns: &str, variants: usize) -> Result<Self, SceneError> {
        Self::new(patterns.split_whitespace().map(|s| s.to_string()).collect(), variants)
    }
    pub fn patterns(&self) -> &Vec<String> {
        &self.patterns
    }
    pub fn variants(&self) -> usize {
        self.variants
    }
    pub fn num_materials(&self) -> usize {
        self.patterns.len() * self.variants
    }
    /// Every name `sample_material_name` can return.
    pub fn all_material_names(&self) -> Vec<String> {
        iproduct!(self.patterns.iter(), 0..self.variants).map(|(p, v)| format!("{}{}", p, v)).collect()
    }
    /// Pattern and variant are drawn independently and uniformly.
    pub fn sample_material_name<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, SceneError> {
        let pattern_idx = SimpleSamplers::uniform_index(self.patterns.len(), rng)?;
        let variant = SimpleSamplers::uniform_index(self.variants, rng)?;
        Ok(format!("{}{}", self.patterns[pattern_idx], variant))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use crate::utils::utils_sampling::new_scene_rng;
    use super::*;

    #[test]
    fn samples_stay_within_patterns_and_variants() {
        let sampler = MaterialPatternSampler::new_from_pattern_string("Plugin/Checker_  Plugin/Gradient_ ", 4).unwrap();
        assert_eq!(sampler.patterns(), &vec!["Plugin/Checker_".to_string(), "Plugin/Gradient_".to_string()]);
        assert_eq!(sampler.num_materials(), 8);

        let all: HashSet<String> = sampler.all_material_names().into_iter().collect();
        assert!(all.contains("Plugin/Gradient_3"));
        assert!(!all.contains("Plugin/Gradient_4"));

        let mut seen = HashSet::new();
        for seed in 0..50 {
            let mut rng = new_scene_rng(Some(seed));
            for _ in 0..20 {
                let name = sampler.sample_material_name(&mut rng).unwrap();
                assert!(all.contains(&name), "{} is outside the pattern range", name);
                seen.insert(name);
            }
        }
        assert_eq!(seen, all);
    }

    #[test]
    fn single_variant_always_uses_index_zero() {
        let sampler = MaterialPatternSampler::new(vec!["Gazebo/Wood".to_string()], 1).unwrap();
        let mut rng = new_scene_rng(Some(2));
        assert_eq!(sampler.sample_material_name(&mut rng).unwrap(), "Gazebo/Wood0");
    }

    #[test]
    fn empty_patterns_or_zero_variants_are_rejected() {
        assert!(MaterialPatternSampler::new_from_pattern_string("   ", 3).is_err());
        assert!(MaterialPatternSampler::new(vec!["Plugin/Perlin_".to_string()], 0).is_err());
    }
}
