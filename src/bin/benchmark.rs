use geo_sssp::graph::generators::{generate_coordinate_grid, generate_named};
use geo_sssp::{Coord, Dijkstra, EngineConfig, ShortestPathEngine};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

fn time<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Grid sides to test (vertices = side^2)
    let grid_sides = vec![32, 100, 316, 500];
    let origin = Coord::new(26.2389, 73.0243)?;

    println!("=====================================================");
    println!("Benchmark: coordinate grids (haversine weights)");
    println!("=====================================================");
    println!(
        "{:<10} | {:<10} | {:<14} | {:<14} | {:<10}",
        "Vertices", "Edges", "Corner (ms)", "All (ms)", "Settled"
    );
    println!("-----------------------------------------------------");

    for &side in &grid_sides {
        let graph = generate_coordinate_grid(origin, side, side, 0.0005)?;
        let (vertices, edges) = (graph.vertex_count(), graph.edge_count());
        let engine = ShortestPathEngine::from_graph(graph, Dijkstra::new(), EngineConfig::default());

        let source = origin;
        let target = Coord::new(
            origin.lat() + (side - 1) as f64 * 0.0005,
            origin.lng() + (side - 1) as f64 * 0.0005,
        )?;

        let (path, corner_time) = time(|| engine.find_path(&source, &target));
        let path = path?;
        let (table, all_time) = time(|| engine.find_all_distances(&source));
        let table = table?;

        println!(
            "{:<10} | {:<10} | {:<14.3} | {:<14.3} | {:<10}",
            vertices,
            edges,
            corner_time.as_secs_f64() * 1000.0,
            all_time.as_secs_f64() * 1000.0,
            table.reached_count()
        );
        assert!(path.is_reachable(), "grid corners must be connected");
    }

    println!();
    println!("=====================================================");
    println!("Benchmark: random identifier graphs (integer weights)");
    println!("=====================================================");

    let sizes = vec![1_000, 10_000, 100_000];
    let edge_factor = 2.0;
    let mut rng = StdRng::seed_from_u64(2024);

    for &size in &sizes {
        let graph = generate_named(&mut rng, size, edge_factor, 100)?;
        let engine = ShortestPathEngine::from_graph(graph, Dijkstra::new(), EngineConfig::default());

        let sources: Vec<String> = (0..8).map(|i| format!("v{}", i * size / 8)).collect();

        let (sequential, seq_time) = time(|| {
            sources
                .iter()
                .map(|s| engine.find_all_distances(s))
                .collect::<Result<Vec<_>, _>>()
        });
        let sequential = sequential?;
        let (batch, batch_time) = time(|| engine.find_all_distances_batch(&sources));
        let batch = batch?;

        let reached: usize = batch.iter().map(|t| t.reached_count()).sum();
        assert_eq!(
            reached,
            sequential.iter().map(|t| t.reached_count()).sum::<usize>()
        );

        println!(
            "{} vertices: 8 sources sequential {:.2} ms, parallel {:.2} ms ({:.2}x)",
            size,
            seq_time.as_secs_f64() * 1000.0,
            batch_time.as_secs_f64() * 1000.0,
            seq_time.as_secs_f64() / batch_time.as_secs_f64().max(f64::EPSILON)
        );
    }

    Ok(())
}
