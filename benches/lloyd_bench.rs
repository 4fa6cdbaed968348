use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kmeans::{run, KMeans};
use rand::prelude::*;

fn random_kmean(sample_cnt: usize, sample_dims: usize) -> KMeans<f32> {
    let mut rnd = StdRng::seed_from_u64(1337);
    let mut samples = vec![0.0f32; sample_cnt * sample_dims];
    samples.iter_mut().for_each(|v| *v = rnd.gen_range(0.0..1.0));
    KMeans::new(samples, sample_cnt, sample_dims).unwrap()
}

fn bench_assignment(c: &mut Criterion) {
    let kmean = random_kmean(20000, 200);
    let k = 32;
    let centroids: Vec<f32> = kmean.samples().take(k).flatten().cloned().collect();

    c.bench_function("assign_clusters_20000x200_k32", |b| {
        b.iter(|| {
            let _ = black_box(kmean.assign_clusters(black_box(&centroids), k));
        });
    });
}

fn bench_lloyd(c: &mut Criterion) {
    let mut group = c.benchmark_group("lloyd");
    group.sample_size(10);
    for (sample_cnt, sample_dims) in [(2000, 200), (10000, 8), (20000, 256)] {
        let kmean = random_kmean(sample_cnt, sample_dims);
        group.bench_function(format!("{}x{}_k32_10iters", sample_cnt, sample_dims), |b| {
            b.iter(|| {
                let _ = black_box(run(&kmean, 32, 10, 0));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_assignment, bench_lloyd);
criterion_main!(benches);
