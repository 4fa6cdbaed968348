/// What the update step does with a cluster that has no samples assigned to it.
///
/// The mean of zero samples is undefined, so one of these has to be picked explicitly.
/// The default is [`EmptyClusterPolicy::RetainPrevious`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Write the result of `0 / 0` (NaN) into every component of the centroid.
    /// NaN centroids never win the nearest-centroid search afterwards, so the cluster stays empty.
    /// An argmin that returns the first NaN would instead pull every sample into that cluster;
    /// this one does not.
    Propagate,
    /// Keep the centroid's coordinates from before the update.
    #[default]
    RetainPrevious,
    /// Move the centroid onto a uniformly drawn sample, using the run's random generator.
    Reseed,
    /// Abort the calculation with [`crate::KMeansError::NumericAnomaly`].
    Fail,
}
