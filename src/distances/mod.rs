mod euclideandistance;

pub use euclideandistance::{centroid_distances, euclidean_distance};
pub(crate) use euclideandistance::nearest_centroid;
