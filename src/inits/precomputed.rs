use crate::error::{invalid_arg, Result};
use crate::{KMeans, KMeansConfig, KMeansState, memory::*};

#[inline(always)]
pub fn calculate<T: Primitive>(
    kmean: &KMeans<T>, state: &mut KMeansState<T>, _config: &KMeansConfig<'_, T>, computed: Vec<T>,
) -> Result<()> {
    if computed.len() != state.k * kmean.sample_dims {
        return Err(invalid_arg!(
            "precomputed centroids hold {} values, expected {} ({} centroids of {} dimensions)",
            computed.len(), state.k * kmean.sample_dims, state.k, kmean.sample_dims
        ));
    }
    computed.chunks_exact(kmean.sample_dims).enumerate().for_each(|(ci, c)| {
        state.set_centroid_from_iter(ci, c.iter().cloned());
    });
    Ok(())
}
