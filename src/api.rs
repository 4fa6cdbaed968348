use crate::error::{invalid_arg, KMeansError, Result};
use crate::{distances, memory::*, AbortStrategy, EmptyClusterPolicy};
use rand::prelude::*;
use rayon::prelude::*;
use std::cell::RefCell;
use std::slice::ChunksExact;
use tracing::warn;

pub type InitDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>);
pub type IterationDoneCallbackFn<'a, T> = &'a dyn Fn(&KMeansState<T>, usize, T);

/// Amount of iterations used by [`crate::run`] when the caller has no preference.
pub const DEFAULT_NUM_ITERS: usize = 100;
/// Seed of the random generator in [`KMeansConfig::default`].
pub const DEFAULT_SEED: u64 = 0;

/// This is a structure holding various configuration options for the a k-means calculations, such as
/// the random number generator to use, or a couple of callbacks, that can be set to get status information from
/// a running k-means calculation.
///
/// For a more detailed information about all possible options, have a look at [`KMeansConfigBuilder`].
pub struct KMeansConfig<'a, T: Primitive> {
    /// Callback that is called, when the initialization phase finished
    /// ## Arguments
    /// - **state**: Current [`KMeansState`] after the initialization
    pub(crate) init_done: InitDoneCallbackFn<'a, T>,
    /// Callback that is called after each iteration
    /// ## Arguments
    /// - **state**: Current[`KMeansState`] after the iteration
    /// - **iteration_id**: Number of the current iteration
    /// - **distsum**: New distance sum (**state** contains the distsum from the previous iteration)
    pub(crate) iteration_done: IterationDoneCallbackFn<'a, T>,
    /// Random number generator to use
    pub(crate) rnd: Box<RefCell<dyn RngCore>>,
    /// The abort-strategy to use for the running calculation
    pub(crate) abort_strategy: AbortStrategy<T>,
    /// How clusters without any assigned sample are updated
    pub(crate) empty_cluster_policy: EmptyClusterPolicy,
}
impl<'a, T: Primitive> Default for KMeansConfig<'a, T> {
    fn default() -> Self {
        Self {
            init_done: &|_| {},
            iteration_done: &|_,_,_| {},
            rnd: Box::new(RefCell::new(StdRng::seed_from_u64(DEFAULT_SEED))),
            abort_strategy: AbortStrategy::Never,
            empty_cluster_policy: EmptyClusterPolicy::default(),
        }
    }
}
impl<'a, T: Primitive> KMeansConfig<'a, T> {
    /// Use the [`KMeansConfigBuilder`] to build a [`KMeansConfig`] instance.
    pub fn build() -> KMeansConfigBuilder<'a, T> {
        KMeansConfigBuilder { config: KMeansConfig::default() }
    }
}
impl<'a, T: Primitive> std::fmt::Debug for KMeansConfig<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KMeansConfig")
            .field("abort_strategy", &self.abort_strategy)
            .field("empty_cluster_policy", &self.empty_cluster_policy)
            .finish_non_exhaustive()
    }
}

pub struct KMeansConfigBuilder<'a, T: Primitive> {
    config: KMeansConfig<'a, T>
}
impl<'a, T: Primitive> KMeansConfigBuilder<'a, T> {
    /// Set the callback that should be called after the centroid initialization, before the iteration starts.
    pub fn init_done(mut self, init_done: InitDoneCallbackFn<'a, T>) -> Self {
        self.config.init_done = init_done; self
    }
    /// Set the callback that should be called after each iteration during a running k-means calculation.
    pub fn iteration_done(mut self, iteration_done: IterationDoneCallbackFn<'a, T>) -> Self {
        self.config.iteration_done = iteration_done; self
    }
    /// Set the random number generator that should be used in the k-means calculation.
    /// Use a seeded generator for deterministically repeatable results.
    pub fn random_generator<R: RngCore + 'static>(mut self, rnd: R) -> Self {
        self.config.rnd = Box::new(RefCell::new(rnd)); self
    }
    /// Use a [`StdRng`] seeded with **seed** as random number generator.
    /// ## Default
    /// [`DEFAULT_SEED`]
    pub fn seed(self, seed: u64) -> Self {
        self.random_generator(StdRng::seed_from_u64(seed))
    }
    /// Set the abort-strategy to use during a running k-means calculation. For more information,
    /// see documentation of [`AbortStrategy`].
    /// ## Default
    /// [`AbortStrategy::Never`]
    pub fn abort_strategy(mut self, abort_strategy: AbortStrategy<T>) -> Self {
        self.config.abort_strategy = abort_strategy; self
    }
    /// Set how clusters that lost all of their samples are updated.
    /// ## Default
    /// [`EmptyClusterPolicy::RetainPrevious`]
    pub fn empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.config.empty_cluster_policy = policy; self
    }
    /// Return the internally built configuration structure.
    pub fn build(self) -> KMeansConfig<'a, T> { self.config }
}


/// This is the internally used data-structure, storing the current state during calculation, as
/// well as the final result, as returned by the API.
/// All mutations are done in this structure, making [`KMeans`] immutable, and therefore allowing
/// it to be used in parallel, without having to duplicate the input-data.
///
/// ## Generics
/// - **T**: Underlying primitive type that was used for the calculation
///
/// ## Fields
/// - **k**: The amount of clusters that were requested when calculating this k-means result
/// - **distsum**: The total sum of distances from all samples to their assigned centroids
/// - **centroids**: Calculated cluster centers [row-major] = [<centroid0>,<centroid1>,<centroid2>,...]
/// - **centroid_frequency**: Amount of samples in each centroid
/// - **assignments**: Vector mapping each sample to its respective nearest cluster
/// - **centroid_distances**: Vector containing each sample's distance to its assigned centroid
/// - **iterations**: Amount of iterations that were actually run
///
/// ## Note
/// **assignments**, **centroid_frequency**, **centroid_distances** and **distsum** describe the last
/// assignment step, which ran against the centroids as they were *before* the last update step.
/// **centroids** holds the result of that last update step.
#[derive(Clone, Debug)]
pub struct KMeansState<T: Primitive> {
    pub k: usize,
    pub distsum: T,
    pub centroids: Vec<T>,
    pub centroid_frequency: Vec<usize>,
    pub assignments: Vec<usize>,
    pub centroid_distances: Vec<T>,
    pub iterations: usize,

    pub(crate) sample_dims: usize
}
impl<T: Primitive> KMeansState<T> {
    pub(crate) fn new(sample_cnt: usize, sample_dims: usize, k: usize) -> Self {
        Self {
            k,
            distsum: T::zero(),
            centroids: vec![T::zero(); sample_dims * k],
            centroid_frequency: vec![0usize;k],
            assignments: vec![0usize;sample_cnt],
            centroid_distances: vec![T::infinity();sample_cnt],
            iterations: 0,
            sample_dims
        }
    }
    pub(crate) fn set_centroid_from_iter(&mut self, idx: usize, src: impl Iterator<Item = T>) {
        self.centroids.iter_mut().skip(self.sample_dims * idx).take(self.sample_dims)
                .zip(src)
                .for_each(|(c,s)| *c = s);
    }

    /// Coordinates of centroid **idx**.
    pub fn centroid(&self, idx: usize) -> &[T] {
        &self.centroids[self.sample_dims * idx..self.sample_dims * (idx + 1)]
    }
    /// Amount of dimensions of each centroid.
    pub fn sample_dims(&self) -> usize { self.sample_dims }
}


/// Entrypoint of this crate's API-Surface.
///
/// An instance of this struct owns the dataset: `sample_cnt` embeddings of `sample_dims` components each,
/// stored contiguously in row-major order. The primitive type of the samples is the type used internally
/// for all calculations, as well as for the result stored in the returned [`KMeansState`].
///
/// The dataset is never mutated by a calculation, so multiple runs can be done in parallel on the same instance.
///
/// ## Steps
/// - Assignment step [`KMeans::assign_clusters`]
/// - Update step [`KMeans::update_centroids`]
/// - Full k-Means clustering (Lloyd) [`KMeans::kmeans_lloyd`]
///
/// ## Supported initialization methods
/// - Random-Sample [`KMeans::init_random_sample`]
/// - Precomputed [`KMeans::init_precomputed`]
#[derive(Clone, Debug)]
pub struct KMeans<T: Primitive> {
    pub(crate) sample_cnt: usize,
    pub(crate) sample_dims: usize,
    pub(crate) samples: Vec<T>
}
impl<T: Primitive> KMeans<T> {
    /// Create a new instance of the [`KMeans`] structure.
    ///
    /// ## Arguments
    /// - **samples**: Vector of samples [row-major] = [<sample0>,<sample1>,<sample2>,...]
    /// - **sample_cnt**: Amount of samples, contained in the passed **samples** vector
    /// - **sample_dims**: Amount of dimensions each sample from the **sample** vector has
    ///
    /// ## Errors
    /// [`KMeansError::InvalidArgument`] if there are no samples, samples have no dimensions, or the
    /// vector does not hold exactly `sample_cnt * sample_dims` values.
    pub fn new(samples: Vec<T>, sample_cnt: usize, sample_dims: usize) -> Result<Self> {
        if sample_cnt == 0 {
            return Err(invalid_arg!("dataset contains no samples"));
        }
        if sample_dims == 0 {
            return Err(invalid_arg!("samples must have at least one dimension"));
        }
        if Some(samples.len()) != sample_cnt.checked_mul(sample_dims) {
            return Err(invalid_arg!(
                "sample buffer holds {} values, expected {} samples of {} dimensions",
                samples.len(), sample_cnt, sample_dims
            ));
        }
        Ok(Self { sample_cnt, sample_dims, samples })
    }

    /// Create a new instance from individual embeddings, which all need the same dimensionality.
    pub fn from_embeddings<E: AsRef<[T]>>(embeddings: &[E]) -> Result<Self> {
        let sample_dims = embeddings.first().map(|e| e.as_ref().len()).unwrap_or(0);
        let mut samples = Vec::with_capacity(embeddings.len() * sample_dims);
        for (idx, e) in embeddings.iter().enumerate() {
            let e = e.as_ref();
            if e.len() != sample_dims {
                return Err(invalid_arg!(
                    "embedding {} has {} dimensions, embedding 0 has {}", idx, e.len(), sample_dims
                ));
            }
            samples.extend_from_slice(e);
        }
        Self::new(samples, embeddings.len(), sample_dims)
    }

    /// Amount of samples (N).
    pub fn sample_cnt(&self) -> usize { self.sample_cnt }
    /// Amount of dimensions of each sample (D).
    pub fn sample_dims(&self) -> usize { self.sample_dims }
    /// Components of sample **idx**, or `None` if out of range.
    pub fn sample(&self, idx: usize) -> Option<&[T]> {
        (idx < self.sample_cnt).then(|| self.sample_unchecked(idx))
    }
    /// Iterator over all samples, in order.
    pub fn samples(&self) -> ChunksExact<'_, T> {
        self.samples.chunks_exact(self.sample_dims)
    }
    pub(crate) fn sample_unchecked(&self, idx: usize) -> &[T] {
        &self.samples[self.sample_dims * idx..self.sample_dims * (idx + 1)]
    }

    pub(crate) fn check_k(&self, k: usize) -> Result<()> {
        if k == 0 {
            return Err(invalid_arg!("k must be at least 1"));
        }
        if k > self.sample_cnt {
            return Err(invalid_arg!("k ({}) exceeds the amount of samples ({})", k, self.sample_cnt));
        }
        Ok(())
    }

    fn check_centroids(&self, centroids: &[T], k: usize) -> Result<()> {
        if k == 0 {
            return Err(invalid_arg!("k must be at least 1"));
        }
        if centroids.len() != k * self.sample_dims {
            return Err(invalid_arg!(
                "centroid buffer holds {} values, expected {} centroids of {} dimensions",
                centroids.len(), k, self.sample_dims
            ));
        }
        Ok(())
    }

    fn check_assignments(&self, assignments: &[usize], k: usize) -> Result<()> {
        if assignments.len() != self.sample_cnt {
            return Err(invalid_arg!(
                "{} assignments given for {} samples", assignments.len(), self.sample_cnt
            ));
        }
        if let Some((idx, &cid)) = assignments.iter().enumerate().find(|(_, &cid)| cid >= k) {
            return Err(invalid_arg!("sample {} is assigned to cluster {}, but k is {}", idx, cid, k));
        }
        Ok(())
    }

    /// Assign every sample to its nearest centroid, writing the index and distance per sample.
    /// Returns the amount of samples whose assignment changed.
    pub(crate) fn assign_into(&self, centroids: &[T], assignments: &mut [usize], centroid_distances: &mut [T]) -> usize {
        // manually calculate work-packet size, because rayon does not do static scheduling (which is more apropriate here)
        let work_packet_size = (self.sample_cnt / rayon::current_num_threads()).max(1);
        self.samples.par_chunks_exact(self.sample_dims)
            .with_min_len(work_packet_size)
            .zip(assignments.par_iter_mut())
            .zip(centroid_distances.par_iter_mut())
            .map(|((s, assignment), centroid_dist)| {
                let (best_idx, best_dist) = distances::nearest_centroid(s, centroids, self.sample_dims);
                let changed = *assignment != best_idx;
                *assignment = best_idx;
                *centroid_dist = best_dist;
                changed as usize
            })
            .sum()
    }

    pub(crate) fn update_cluster_assignments(&self, state: &mut KMeansState<T>) -> usize {
        self.assign_into(&state.centroids, &mut state.assignments, &mut state.centroid_distances)
    }

    pub(crate) fn update_cluster_frequencies(&self, assignments: &[usize], centroid_frequency: &mut[usize]) -> usize {
        centroid_frequency.iter_mut().for_each(|v| *v = 0);
        let mut used_centroids_cnt = 0;
        assignments.iter().cloned()
            .for_each(|centroid_id| {
                if centroid_frequency[centroid_id] == 0 {
                    used_centroids_cnt += 1; // Count the amount of centroids with more than 0 samples
                }
                centroid_frequency[centroid_id] += 1;
            });
        used_centroids_cnt
    }

    /// Compute the mean of every cluster. **centroid_frequency** must already match **assignments**.
    /// Summation runs in sample order, so the result is bit-for-bit reproducible.
    pub(crate) fn compute_centroids(&self, assignments: &[usize], centroid_frequency: &[usize], previous: &[T],
                policy: EmptyClusterPolicy, rnd: &mut dyn RngCore) -> Result<Vec<T>> {
        let dims = self.sample_dims;
        let mut new_centroids = vec![T::zero(); previous.len()];
        // Sum all samples in a cluster together into new_centroids
        self.samples.chunks_exact(dims)
            .zip(assignments.iter().cloned())
            .for_each(|(s, centroid_id)| {
                new_centroids[centroid_id * dims..(centroid_id + 1) * dims].iter_mut()
                    .zip(s.iter())
                    .for_each(|(c, sv)| *c += sv);
            });

        for (ci, (c, cfreq)) in new_centroids.chunks_exact_mut(dims).zip(centroid_frequency.iter().cloned()).enumerate() {
            if cfreq > 0 {
                let cfreq = T::from_count(cfreq);
                c.iter_mut().for_each(|v| *v = *v / cfreq);
                continue;
            }
            warn!(cluster = ci, ?policy, "cluster has no assigned samples");
            match policy {
                EmptyClusterPolicy::Propagate => c.iter_mut().for_each(|v| *v = T::nan()),
                EmptyClusterPolicy::RetainPrevious => c.copy_from_slice(&previous[ci * dims..(ci + 1) * dims]),
                EmptyClusterPolicy::Reseed => {
                    let sample_id = rnd.gen_range(0..self.sample_cnt);
                    c.copy_from_slice(self.sample_unchecked(sample_id));
                },
                EmptyClusterPolicy::Fail => return Err(KMeansError::NumericAnomaly { cluster: ci }),
            }
        }
        Ok(new_centroids)
    }


    /// Assignment step: find the nearest centroid for every sample.
    ///
    /// Ties between equidistant centroids resolve to the lowest centroid index. The samples are
    /// processed in parallel; the result is identical to a sequential scan.
    ///
    /// ## Arguments
    /// - **centroids**: **k** centroids [row-major] = [<centroid0>,<centroid1>,...]
    /// - **k**: Amount of centroids in **centroids**
    ///
    /// ## Returns
    /// One centroid index in `[0, k)` per sample.
    pub fn assign_clusters(&self, centroids: &[T], k: usize) -> Result<Vec<usize>> {
        self.check_centroids(centroids, k)?;
        let mut assignments = vec![0usize; self.sample_cnt];
        let mut centroid_distances = vec![T::infinity(); self.sample_cnt];
        self.assign_into(centroids, &mut assignments, &mut centroid_distances);
        Ok(assignments)
    }

    /// Update step: recompute every centroid as the mean of the samples assigned to it.
    ///
    /// ## Arguments
    /// - **assignments**: One cluster index in `[0, k)` per sample
    /// - **k**: Amount of clusters
    /// - **previous**: Centroids before this update [row-major], used by [`EmptyClusterPolicy::RetainPrevious`]
    /// - **policy**: What to do with clusters without samples
    /// - **rnd**: Random number generator, used by [`EmptyClusterPolicy::Reseed`]
    ///
    /// ## Returns
    /// The new **k** centroids [row-major].
    pub fn update_centroids(&self, assignments: &[usize], k: usize, previous: &[T],
                policy: EmptyClusterPolicy, rnd: &mut dyn RngCore) -> Result<Vec<T>> {
        self.check_centroids(previous, k)?;
        self.check_assignments(assignments, k)?;
        let mut centroid_frequency = vec![0usize; k];
        self.update_cluster_frequencies(assignments, &mut centroid_frequency);
        self.compute_centroids(assignments, &centroid_frequency, previous, policy, rnd)
    }


    /// Normal K-Means algorithm implementation (Lloyd).
    ///
    /// The centroids are initialized once, then exactly **num_iters** rounds of assignment step
    /// followed by update step are run (unless an opt-in [`AbortStrategy`] stops earlier).
    ///
    /// ## Arguments
    /// - **k**: Amount of clusters to search for
    /// - **num_iters**: Amount of iterations to run
    /// - **init**: Initialization-Method to use for the initialization of the **k** centroids
    /// - **config**: [`KMeansConfig`] instance, containing several configuration options for the calculation.
    ///
    /// ## Returns
    /// Instance of [`KMeansState`], containing the final state (result).
    ///
    /// ## Errors
    /// [`KMeansError::InvalidArgument`] when `k == 0`, `k > sample_cnt` or `num_iters == 0`, checked before
    /// anything is computed. [`KMeansError::NumericAnomaly`] when a cluster runs empty under
    /// [`EmptyClusterPolicy::Fail`].
    ///
    /// ## Example
    /// ```rust
    /// use kmeans::*;
    ///
    /// let (sample_cnt, sample_dims, k, num_iters) = (2000, 32, 4, 100);
    ///
    /// // Generate some random data
    /// let mut samples = vec![0.0f64;sample_cnt * sample_dims];
    /// samples.iter_mut().for_each(|v| *v = rand::random());
    ///
    /// let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
    /// let conf = KMeansConfig::build().seed(7).build();
    /// let result = kmean.kmeans_lloyd(k, num_iters, KMeans::init_random_sample, &conf).unwrap();
    ///
    /// assert_eq!(result.assignments.len(), sample_cnt);
    /// assert_eq!(result.centroids.len(), k * sample_dims);
    /// ```
    pub fn kmeans_lloyd<'a, F>(&self, k: usize, num_iters: usize, init: F, config: &KMeansConfig<'a, T>) -> Result<KMeansState<T>>
                where for<'c> F: FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'c, T>) -> Result<()> {
        crate::variants::Lloyd::calculate(self, k, num_iters, init, config)
    }

    /// Random sample initialization method (a.k.a. Forgy)
    ///
    /// ## Description
    /// This initialization method draws k distinct samples uniformly at random (without replacement)
    /// from the configured random generator; centroid i is the i-th drawn sample.
    ///
    /// ## Note
    /// This method is not meant for direct invocation. Pass a reference to it, to an instance-method of [`KMeans`].
    pub fn init_random_sample(kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>) -> Result<()> {
        crate::inits::randomsample::calculate(kmean, state, config)
    }

    /// Precomputed initialization method
    ///
    /// ## Description
    /// Starts from the given **k** centroids [row-major], e.g. to reproduce a known starting point.
    pub fn init_precomputed(centroids: Vec<T>) -> impl FnOnce(&KMeans<T>, &mut KMeansState<T>, &KMeansConfig<'_, T>) -> Result<()> {
        move |kmean: &KMeans<T>, state: &mut KMeansState<T>, config: &KMeansConfig<'_, T>| {
            crate::inits::precomputed::calculate(kmean, state, config, centroids)
        }
    }
}


/// Cluster **dataset** into **k** clusters with the Lloyd algorithm, initialized from **k** distinct
/// random samples drawn by a [`StdRng`] seeded with **seed**.
///
/// Runs exactly **num_iters** iterations and uses the default [`KMeansConfig`] otherwise.
/// Use [`DEFAULT_NUM_ITERS`] and [`DEFAULT_SEED`] when there is no reason to choose differently.
///
/// ## Example
/// ```rust
/// use kmeans::*;
///
/// let dataset = KMeans::from_embeddings(&[[0.0f32, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0]]).unwrap();
/// let result = run(&dataset, 2, DEFAULT_NUM_ITERS, DEFAULT_SEED).unwrap();
///
/// assert_eq!(result.assignments.len(), 4);
/// assert_eq!(result.centroids.len(), 2 * 2);
/// assert_eq!(result.iterations, DEFAULT_NUM_ITERS);
/// ```
pub fn run<T: Primitive>(dataset: &KMeans<T>, k: usize, num_iters: usize, seed: u64) -> Result<KMeansState<T>> {
    let config = KMeansConfig::build().seed(seed).build();
    dataset.kmeans_lloyd(k, num_iters, KMeans::init_random_sample, &config)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_assignments() {
        calculate_cluster_assignments_multiplex(1);
        calculate_cluster_assignments_multiplex(2);
        calculate_cluster_assignments_multiplex(3);
        calculate_cluster_assignments_multiplex(97);
        calculate_cluster_assignments_multiplex(100);
    }

    fn calculate_cluster_assignments_multiplex(sample_dims: usize) {
        calculate_cluster_assignments::<f64>(sample_dims, 1e-10f64);
        calculate_cluster_assignments::<f32>(sample_dims, 1e-5f32);
    }

    // parallel assignment step has to match a plain sequential scan
    fn calculate_cluster_assignments<T: Primitive>(sample_dims: usize, max_diff: T) {
        let sample_cnt = 1000;
        let k = 5;

        let mut rnd = StdRng::seed_from_u64(sample_dims as u64);
        let mut samples = vec![T::zero();sample_cnt * sample_dims];
        samples.iter_mut().for_each(|i| *i = rnd.gen_range(T::zero()..T::one()));

        let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();

        let mut state = KMeansState::new(kmean.sample_cnt, kmean.sample_dims, k);
        state.centroids.iter_mut()
            .zip(kmean.samples.iter())
            .for_each(|(c,s)| *c = *s);

        // calculate distances using method that (hopefully) works.
        let mut should_assignments = state.assignments.clone();
        let mut should_centroid_distances = state.centroid_distances.clone();
        kmean.samples.chunks_exact(kmean.sample_dims)
            .zip(should_assignments.iter_mut())
            .zip(should_centroid_distances.iter_mut())
            .for_each(|((s, assignment), centroid_dist)| {
                let (best_idx, best_dist) = state.centroids
                    .chunks_exact(kmean.sample_dims)
                    .map(|c| {
                        s.iter().cloned().zip(c.iter().cloned())
                            .map(|(sv,cv)| sv - cv)
                            .map(|v| v * v)
                            .sum::<T>()
                            .sqrt()
                    })
                    .enumerate()
                    .min_by(|(_,d0), (_,d1)| d0.partial_cmp(d1).unwrap())
                    .unwrap();
                *assignment = best_idx;
                *centroid_dist = best_dist;
            });

        // calculate distances using parallel code
        kmean.update_cluster_assignments(&mut state);

        for i in 0..should_assignments.len() {
            assert_approx_eq!(state.centroid_distances[i], should_centroid_distances[i], max_diff);
        }
        assert_eq!(state.assignments, should_assignments);
        assert_eq!(kmean.assign_clusters(&state.centroids, k).unwrap(), should_assignments);
    }

    #[test]
    fn equidistant_sample_goes_to_lower_index() {
        let kmean = KMeans::from_embeddings(&[[1.0f64, 0.0], [0.0, 0.0], [2.0, 0.0]]).unwrap();
        let assignments = kmean.assign_clusters(&[0.0, 0.0, 2.0, 0.0], 2).unwrap();
        assert_eq!(assignments, vec![0, 0, 1]);
        // swapped centroid order: the tie still resolves to the lower index
        let assignments = kmean.assign_clusters(&[2.0, 0.0, 0.0, 0.0], 2).unwrap();
        assert_eq!(assignments, vec![0, 1, 0]);
    }

    #[test]
    fn dataset_validation() {
        assert!(matches!(KMeans::<f64>::new(vec![], 0, 2), Err(KMeansError::InvalidArgument(_))));
        assert!(matches!(KMeans::new(vec![1.0f64], 1, 0), Err(KMeansError::InvalidArgument(_))));
        assert!(matches!(KMeans::new(vec![1.0f64, 2.0, 3.0], 2, 2), Err(KMeansError::InvalidArgument(_))));
        assert!(matches!(KMeans::<f32>::from_embeddings::<Vec<f32>>(&[]), Err(KMeansError::InvalidArgument(_))));
        assert!(matches!(
            KMeans::from_embeddings(&[vec![1.0f32, 2.0], vec![3.0]]),
            Err(KMeansError::InvalidArgument(_))
        ));

        let kmean = KMeans::from_embeddings(&[vec![1.0f32, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(kmean.sample_cnt(), 2);
        assert_eq!(kmean.sample_dims(), 2);
        assert_eq!(kmean.sample(1), Some(&[3.0f32, 4.0][..]));
        assert_eq!(kmean.sample(2), None);
        assert_eq!(kmean.samples().count(), 2);
    }

    #[test]
    fn step_argument_validation() {
        let kmean = KMeans::from_embeddings(&[[0.0f64, 0.0], [1.0, 1.0], [2.0, 2.0]]).unwrap();
        let mut rnd = StdRng::seed_from_u64(0);
        let policy = EmptyClusterPolicy::default();

        assert!(matches!(kmean.assign_clusters(&[], 0), Err(KMeansError::InvalidArgument(_))));
        assert!(matches!(kmean.assign_clusters(&[0.0, 0.0, 1.0], 2), Err(KMeansError::InvalidArgument(_))));
        assert!(matches!(
            kmean.update_centroids(&[0, 1], 2, &[0.0; 4], policy, &mut rnd),
            Err(KMeansError::InvalidArgument(_))
        ));
        assert!(matches!(
            kmean.update_centroids(&[0, 1, 2], 2, &[0.0; 4], policy, &mut rnd),
            Err(KMeansError::InvalidArgument(_))
        ));
        assert!(matches!(
            kmean.update_centroids(&[0, 1, 1], 2, &[0.0; 6], policy, &mut rnd),
            Err(KMeansError::InvalidArgument(_))
        ));
    }

    #[test]
    fn update_computes_cluster_means() {
        let kmean = KMeans::from_embeddings(&[[0.0f64, 0.0], [0.0, 1.0], [10.0, 0.0], [10.0, 1.0], [4.0, 4.0]]).unwrap();
        let mut rnd = StdRng::seed_from_u64(0);
        let centroids = kmean.update_centroids(&[0, 0, 1, 1, 0], 2, &[0.0; 4], EmptyClusterPolicy::Fail, &mut rnd).unwrap();
        assert_eq!(centroids.len(), 4);
        assert_approx_eq!(centroids[0], 4.0 / 3.0, 1e-15);
        assert_approx_eq!(centroids[1], 5.0 / 3.0, 1e-15);
        assert_eq!(&centroids[2..], &[10.0, 0.5]);
    }

    #[test]
    fn empty_cluster_policies() {
        let kmean = KMeans::from_embeddings(&[[1.0f64, 0.0], [3.0, 0.0], [7.0, 7.0]]).unwrap();
        let previous = [2.0, 0.0, 100.0, 100.0];
        let assignments = [0, 0, 0];
        let mut rnd = StdRng::seed_from_u64(5);

        let retained = kmean.update_centroids(&assignments, 2, &previous, EmptyClusterPolicy::RetainPrevious, &mut rnd).unwrap();
        assert_eq!(&retained[2..], &[100.0, 100.0]);
        assert_approx_eq!(retained[0], 11.0 / 3.0, 1e-15);

        let propagated = kmean.update_centroids(&assignments, 2, &previous, EmptyClusterPolicy::Propagate, &mut rnd).unwrap();
        assert!(propagated[2].is_nan() && propagated[3].is_nan());
        assert!(propagated[0].is_finite() && propagated[1].is_finite());

        let reseeded = kmean.update_centroids(&assignments, 2, &previous, EmptyClusterPolicy::Reseed, &mut rnd).unwrap();
        assert!(kmean.samples().any(|s| s == &reseeded[2..]));

        let failed = kmean.update_centroids(&assignments, 2, &previous, EmptyClusterPolicy::Fail, &mut rnd);
        assert_eq!(failed, Err(KMeansError::NumericAnomaly { cluster: 1 }));
    }
}
