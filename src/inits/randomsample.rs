use crate::error::{invalid_arg, Result};
use crate::{KMeans, KMeansConfig, KMeansState, memory::*};
use rand::seq::index;
use std::ops::DerefMut;

#[inline(always)] pub fn calculate<T: Primitive>(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>) -> Result<()> {
	if state.k == 0 || state.k > kmean.sample_cnt {
		return Err(invalid_arg!("cannot draw {} distinct centroids from {} samples", state.k, kmean.sample_cnt));
	}
	// Distinct indices, in the order they were drawn: centroid i is the i-th drawn sample
	let drawn = index::sample(config.rnd.borrow_mut().deref_mut(), kmean.sample_cnt, state.k);
	drawn.iter()
		.enumerate()
		.for_each(|(ci, si)| { // Copy randomly chosen samples into state.centroids
			state.set_centroid_from_iter(ci, kmean.sample_unchecked(si).iter().cloned());
		});
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::prelude::*;
	use std::collections::HashSet;

	fn random_kmean(sample_cnt: usize, sample_dims: usize, seed: u64) -> KMeans<f64> {
		let mut rnd = StdRng::seed_from_u64(seed);
		let mut samples = vec![0.0f64; sample_cnt * sample_dims];
		samples.iter_mut().for_each(|v| *v = rnd.gen_range(0.0..1.0));
		KMeans::new(samples, sample_cnt, sample_dims).unwrap()
	}

	#[test]
	fn draws_distinct_samples() {
		let kmean = random_kmean(50, 3, 7);
		let conf = KMeansConfig::build().seed(11).build();
		let mut state = KMeansState::new(kmean.sample_cnt(), kmean.sample_dims(), 50);
		calculate(&kmean, &mut state, &conf).unwrap();

		// k == n: every sample is used exactly once
		let mut used = HashSet::new();
		for ci in 0..state.k {
			let si = kmean.samples().position(|s| s == state.centroid(ci)).unwrap();
			assert!(used.insert(si), "sample {} was drawn twice", si);
		}
		assert_eq!(used.len(), 50);
	}

	#[test]
	fn same_seed_same_centroids() {
		let kmean = random_kmean(200, 4, 3);
		let draw = |seed| {
			let conf = KMeansConfig::build().seed(seed).build();
			let mut state = KMeansState::new(kmean.sample_cnt(), kmean.sample_dims(), 8);
			calculate(&kmean, &mut state, &conf).unwrap();
			state.centroids
		};
		assert_eq!(draw(42), draw(42));
		assert_ne!(draw(42), draw(43));
	}

	#[test]
	fn rejects_invalid_k() {
		let kmean = random_kmean(5, 2, 1);
		let conf = KMeansConfig::default();
		for k in [0, 6] {
			let mut state = KMeansState::new(kmean.sample_cnt(), kmean.sample_dims(), k);
			assert!(matches!(calculate(&kmean, &mut state, &conf), Err(crate::KMeansError::InvalidArgument(_))));
		}
	}
}
