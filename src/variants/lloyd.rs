use crate::error::{invalid_arg, Result};
use crate::{KMeans, KMeansState, KMeansConfig, memory::*};
use std::ops::DerefMut;
use tracing::{debug, trace};

pub(crate) struct Lloyd<T: Primitive> {
    _p: std::marker::PhantomData<T>
}
impl<T: Primitive> Lloyd<T> {
    fn update_centroids(data: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>) -> Result<()> {
        let used_centroids_cnt = data.update_cluster_frequencies(&state.assignments, &mut state.centroid_frequency);
        if used_centroids_cnt != state.k {
            debug!(empty = state.k - used_centroids_cnt, policy = ?config.empty_cluster_policy, "empty clusters after assignment");
        }
        state.centroids = data.compute_centroids(
            &state.assignments, &state.centroid_frequency, &state.centroids,
            config.empty_cluster_policy, config.rnd.borrow_mut().deref_mut())?;
        Ok(())
    }

    #[inline(always)] pub fn calculate<'a, F>(data: &KMeans<T>, k: usize, num_iters: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
                where for<'c> F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        data.check_k(k)?;
        if num_iters == 0 {
            return Err(invalid_arg!("num_iters must be at least 1"));
        }

        let mut state = KMeansState::new(data.sample_cnt, data.sample_dims, k);
        state.distsum = T::infinity();

        // Initialize clusters and notify subscriber
        init(data, &mut state, config)?;
        debug!(k, sample_cnt = data.sample_cnt, sample_dims = data.sample_dims, num_iters, "centroids initialized");
        (config.init_done)(&state);
        let mut abort_strategy = config.abort_strategy.create_logic();

        for i in 1..=num_iters {
            let reassigned = data.update_cluster_assignments(&mut state);
            let new_distsum: T = state.centroid_distances.iter().cloned().sum();
            Self::update_centroids(data, &mut state, config)?;
            state.iterations = i;

            // Notify subscriber about finished iteration
            (config.iteration_done)(&state, i, new_distsum);
            trace!(iteration = i, distsum = %new_distsum, reassigned, "iteration done");

            // nothing to compare against in the first iteration
            let proceed = abort_strategy.next(new_distsum, (i > 1).then_some(reassigned));
            state.distsum = new_distsum;
            if !proceed {
                debug!(iteration = i, "abort strategy ended calculation early");
                break;
            }
        }

        debug!(iterations = state.iterations, distsum = %state.distsum, "k-means finished");
        Ok(state)
    }
}
