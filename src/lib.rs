//! # kmeans - API documentation
//!
//! Kmeans is a small rust library for deterministic k-means clustering of embeddings: a fixed
//! amount of vectors, all with the same amount of dimensions.
//!
//! ## Design target
//! Runs are reproducible: the only randomness is the centroid initialization, drawn from an explicitly
//! seeded random number generator, and the Lloyd loop runs a fixed amount of iterations unless an
//! [`AbortStrategy`] is opted into. Samples are given using a raw row-major vector, instead of any
//! high-level matrix crate. The assignment step (the `O(N·K·D)` part of every iteration) is
//! parallelized with rayon.
//!
//! ## Algorithm
//! 1. Draw **k** distinct samples uniformly at random as initial centroids ([`KMeans::init_random_sample`]).
//! 2. Assign every sample to its nearest centroid by euclidean distance, ties going to the lowest
//!    centroid index ([`KMeans::assign_clusters`]).
//! 3. Replace every centroid with the mean of its samples ([`KMeans::update_centroids`]). Clusters without
//!    samples are handled as configured by [`EmptyClusterPolicy`].
//! 4. Repeat 2. and 3. **num_iters** times.
//!
//! The returned assignments are the ones computed in the last iteration's step 2, i.e. against the
//! centroids *before* the final update.
//!
//! ## Supported primitive types
//! - [`f32`]
//! - [`f64`]
//!
//! ## Example
//! ```rust
//! use kmeans::*;
//!
//! let (sample_cnt, sample_dims, k, num_iters) = (2000, 64, 4, 100);
//!
//! // Generate some random data
//! let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//! samples.iter_mut().for_each(|v| *v = rand::random());
//!
//! let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
//! let result = run(&kmean, k, num_iters, 42).unwrap();
//!
//! println!("Centroids: {:?}", result.centroids);
//! println!("Cluster-Assignments: {:?}", result.assignments);
//! println!("Error: {}", result.distsum);
//! ```
//!
//! ## Example (using the status event callbacks)
//! ```rust
//! use kmeans::*;
//!
//! let (sample_cnt, sample_dims, k, num_iters) = (2000, 64, 4, 50);
//!
//! // Generate some random data
//! let mut samples = vec![0.0f64;sample_cnt * sample_dims];
//! samples.iter_mut().for_each(|v| *v = rand::random());
//!
//! let init_done = |_: &KMeansState<f64>| println!("Initialization completed.");
//! let iteration_done = |s: &KMeansState<f64>, nr: usize, new_distsum: f64|
//!     println!("Iteration {} - Error: {:.2} -> {:.2}", nr, s.distsum, new_distsum);
//! let conf = KMeansConfig::build()
//!     .seed(7)
//!     .init_done(&init_done)
//!     .iteration_done(&iteration_done)
//!     .abort_strategy(AbortStrategy::AssignmentsStable)
//!     .empty_cluster_policy(EmptyClusterPolicy::Reseed)
//!     .build();
//!
//! let kmean = KMeans::new(samples, sample_cnt, sample_dims).unwrap();
//! let result = kmean.kmeans_lloyd(k, num_iters, KMeans::init_random_sample, &conf).unwrap();
//!
//! println!("Stopped after {} iterations", result.iterations);
//! ```
//!
//! ## Short API-Overview / Description
//! Entry-point of the library is the [`KMeans`] struct, which takes over the sample data into its ownership.
//! It is generic over the underlying primitive type that is used for all calculations.
//!
//! Calling [`KMeans::kmeans_lloyd`] does not mutate the struct, so multiple runs can be done in parallel.
//! Internally, a new instance of [`KMeansState`] is used to store the state (and finally the result)
//! of a calculation. [`run`] is a shortcut using random-sample initialization and a seeded generator.
//!
//! Logging is done through `tracing` (`debug` per run, `trace` per iteration, `warn` for emptied clusters);
//! install a subscriber to see it.

#[macro_use] mod helpers;
mod error;
mod memory;
mod api;
mod distances;
mod variants;
mod inits;
mod abort_strategy;
mod empty_cluster;

pub use abort_strategy::AbortStrategy;
pub use api::{run, KMeansState, KMeansConfig, KMeansConfigBuilder, KMeans, DEFAULT_NUM_ITERS, DEFAULT_SEED,
              InitDoneCallbackFn, IterationDoneCallbackFn};
pub use distances::{centroid_distances, euclidean_distance};
pub use empty_cluster::EmptyClusterPolicy;
pub use error::{KMeansError, Result};
pub use memory::Primitive;
