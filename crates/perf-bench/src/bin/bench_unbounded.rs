use std::hint::black_box;
use std::time::Instant;

use perf_bench::*;

fn main() {
    let weights = generate_unbounded_matrix();

    let start_time = Instant::now();
    let mut rescued_total = 0usize;

    // The negative cycle is found while building the first closure.
    for _ in 0..ITERATIONS {
        match rescue_core::solve(black_box(&weights), black_box(0)) {
            Ok(rescued) => rescued_total += rescued.len(),
            Err(e) => {
                eprintln!("solve failed: {e}");
                return;
            }
        }
    }

    let elapsed_time = start_time.elapsed();

    println!(
        "--- Unbounded Short-Circuit Benchmark ({} waypoints, {} runs) ---",
        NUM_WAYPOINTS, ITERATIONS
    );
    println!("Rescued (checksum): {}", black_box(rescued_total));
    println!("Elapsed Time: {:?}", elapsed_time);
    println!("Per Run: {:?}", elapsed_time / ITERATIONS as u32);
}
