use rand::{Rng, SeedableRng};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Normal, Distribution};
use crate::utils::utils_errors::SceneError;

/// The random number generator used by every sampler in the crate.  Seeding it makes a whole
/// run reproducible.
pub type SceneRng = ChaCha8Rng;

pub fn new_scene_rng(seed: Option<u64>) -> SceneRng {
    return match seed {
        None => { ChaCha8Rng::from_entropy() }
        Some(seed) => { ChaCha8Rng::seed_from_u64(seed) }
    }
}

pub struct SimpleSamplers;
impl SimpleSamplers {
    pub fn uniform_sample<R: Rng + ?Sized>(bounds: (f64, f64), rng: &mut R) -> f64 {
        return if bounds.0 == bounds.1 {
            bounds.0
        } else {
            rng.gen_range(bounds.0.min(bounds.1)..bounds.0.max(bounds.1))
        }
    }
    pub fn uniform_samples<R: Rng + ?Sized>(bounds: &Vec<(f64, f64)>, rng: &mut R) -> Vec<f64> {
        let mut out_vec = vec![];
        for b in bounds {
            out_vec.push(Self::uniform_sample(*b, rng));
        }
        out_vec
    }
    pub fn normal_samples<R: Rng + ?Sized>(means_and_standard_deviations: &Vec<(f64, f64)>, rng: &mut R) -> Result<Vec<f64>, SceneError> {
        let mut out_vec = vec![];
        for (mean, standard_deviation) in means_and_standard_deviations {
            if *standard_deviation == 0.0 {
                out_vec.push(*mean);
                continue;
            }
            let distribution = match Normal::new(*mean, *standard_deviation) {
                Ok(d) => { d }
                Err(e) => {
                    return Err(SceneError::new_generic_error_str(&format!("Invalid normal distribution ({}, {}): {}", mean, standard_deviation, e), file!(), line!()));
                }
            };
            out_vec.push(distribution.sample(rng));
        }
        Ok(out_vec)
    }
    /// Uniform integer in `[min, max]`, both ends included.
    pub fn uniform_usize_inclusive<R: Rng + ?Sized>(min: usize, max: usize, rng: &mut R) -> usize {
        if min >= max { return min; }
        rng.gen_range(min..=max)
    }
    pub fn uniform_index<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Result<usize, SceneError> {
        if length == 0 {
            return Err(SceneError::new_generic_error_str("Cannot sample an index from an empty collection.", file!(), line!()));
        }
        Ok(rng.gen_range(0..length))
    }
    pub fn coin_flip<R: Rng + ?Sized>(probability: f64, rng: &mut R) -> bool {
        rng.gen_bool(probability.max(0.0).min(1.0))
    }
    /// Returns a random permutation of `0..length` (Fisher-Yates).
    pub fn shuffled_indices<R: Rng + ?Sized>(length: usize, rng: &mut R) -> Vec<usize> {
        let mut out: Vec<usize> = (0..length).collect();
        out.shuffle(rng);
        out
    }
}
