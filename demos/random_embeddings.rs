use kmeans::*;
use rand::prelude::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG=kmeans=trace shows every iteration
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kmeans=debug")))
        .with_target(false)
        .init();

    let (sample_cnt, sample_dims, k) = (20000, 128, 16);

    // Generate some random embeddings in [0, 1)
    let mut rnd = StdRng::seed_from_u64(1337);
    let mut samples = vec![0.0f32; sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rnd.gen_range(0.0..1.0));

    let kmean = KMeans::new(samples, sample_cnt, sample_dims)?;
    let start = Instant::now();
    let result = run(&kmean, k, DEFAULT_NUM_ITERS, DEFAULT_SEED)?;

    println!("Clustered {} embeddings ({} dims) into {} clusters in {:.2?}", sample_cnt, sample_dims, k, start.elapsed());
    println!("Cluster sizes: {:?}", result.centroid_frequency);
    println!("Error: {}", result.distsum);
    Ok(())
}
