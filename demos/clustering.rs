//! DBSCAN on a simple 2D dataset.
//!
//! Run with `RUST_LOG=debug` to see the per-phase log lines.

use pardbscan::{Clustering, Dbscan, NOISE, NOISE_LABEL};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Three well-separated clusters in 2D, plus one outlier.
    let data: Vec<Vec<f32>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
        // Outlier
        vec![20.0, 20.0],
    ];

    // --- Labels and core flags ---
    let dbscan = Dbscan::new(1.0, 3);
    let fit = match dbscan.fit(&data) {
        Ok(fit) => fit,
        Err(e) => {
            eprintln!("dbscan failed: {e}");
            std::process::exit(1);
        }
    };
    println!("=== DBSCAN (eps=1.0, min_pts=3) ===");
    for (i, (&label, &core)) in fit.labels.iter().zip(&fit.core_flags).enumerate() {
        let tag = if label == NOISE_LABEL {
            "NOISE".to_string()
        } else {
            format!("cluster {}", label)
        };
        let kind = if core { "core" } else { "" };
        println!("  point {:2} ({:5.1}, {:5.1}) => {} {}", i, data[i][0], data[i][1], tag, kind);
    }
    println!(
        "  {} clusters, {} core points, {} noise",
        fit.n_clusters(),
        fit.core_count(),
        fit.noise_count()
    );

    // --- Hard labels through the `Clustering` trait ---
    let labels = match dbscan.fit_predict(&data) {
        Ok(labels) => labels,
        Err(e) => {
            eprintln!("dbscan failed: {e}");
            std::process::exit(1);
        }
    };
    let noise = labels.iter().filter(|&&l| l == NOISE).count();
    println!("\n=== fit_predict: {} noise points ===", noise);
}
