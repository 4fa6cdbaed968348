use crate::Primitive;

/// Euclidean distance between two equally sized vectors: `sqrt(Σ (a[d] - b[d])²)`.
///
/// Components are not assumed to lie in any particular range. When the plain sum of squares
/// overflows to infinity or underflows to zero (or a subnormal), the distance is recomputed with
/// every difference scaled by the largest absolute difference. Only distances that are truly
/// beyond the range of `T` come out as infinite, and only equal vectors come out as zero.
#[inline(always)]
pub fn euclidean_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    let sqsum = a.iter().cloned()
        .zip(b.iter().cloned())
        .map(|(av, bv)| av - bv)        // <sample> - <centroid>
        .map(|v| v * v)                 // <vec_components> ^2
        .sum::<T>();
    if sqsum.is_normal() || sqsum.is_nan() {
        sqsum.sqrt()
    } else {
        scaled_euclidean_distance(a, b)
    }
}

fn scaled_euclidean_distance<T: Primitive>(a: &[T], b: &[T]) -> T {
    let scale = a.iter().cloned()
        .zip(b.iter().cloned())
        .map(|(av, bv)| (av - bv).abs())
        .fold(T::zero(), |m, v| m.max(v));
    if scale.is_infinite() || scale.is_zero() {
        return scale;
    }
    let scaled_sqsum = a.iter().cloned()
        .zip(b.iter().cloned())
        .map(|(av, bv)| (av - bv) / scale)
        .map(|v| v * v)
        .sum::<T>();
    scale * scaled_sqsum.sqrt()
}

/// Distances from one sample to every centroid of a row-major centroid buffer.
/// The i-th entry of the result belongs to centroid i.
pub fn centroid_distances<T: Primitive>(sample: &[T], centroids: &[T], sample_dims: usize) -> Vec<T> {
    iter_centroid_distances(sample, centroids, sample_dims).collect()
}

#[inline(always)]
fn iter_centroid_distances<'a, T: Primitive>(sample: &'a [T], centroids: &'a [T], sample_dims: usize) -> impl Iterator<Item = T> + 'a {
    centroids.chunks_exact(sample_dims).map(move |c| euclidean_distance(sample, c))
}

/// Index and distance of the centroid closest to `sample`.
///
/// Scans left to right, so equidistant centroids resolve to the lowest index. A NaN distance
/// (e.g. against a centroid of an emptied cluster) never beats a comparable one.
/// `centroids` must hold at least one centroid.
pub(crate) fn nearest_centroid<T: Primitive>(sample: &[T], centroids: &[T], sample_dims: usize) -> (usize, T) {
    let mut best = (0, T::nan());
    for (idx, dist) in iter_centroid_distances(sample, centroids, sample_dims).enumerate() {
        if dist < best.1 || (best.1.is_nan() && !dist.is_nan()) {
            best = (idx, dist);
        }
    }
    best
}
