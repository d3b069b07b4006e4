use common::types::Weight;

/// Waypoints per benchmark matrix. The exhaustive search visits every
/// ordering of every subset, so this is kept small.
pub const NUM_WAYPOINTS: usize = 7;
pub const NUM_VERTICES: usize = NUM_WAYPOINTS + 2;
pub const ITERATIONS: usize = 20;

/// Dense matrix where every off-diagonal edge costs `1 + (i + j) % 3`.
///
/// The direct walk costs at least 1, so a budget of 0 forces the search
/// through every subset size before it reports infeasible.
pub fn generate_exhaustive_matrix() -> Vec<Vec<Weight>> {
    (0..NUM_VERTICES)
        .map(|i| {
            (0..NUM_VERTICES)
                .map(|j| if i == j { 0 } else { 1 + ((i + j) % 3) as Weight })
                .collect()
        })
        .collect()
}

/// Same shape as [`generate_exhaustive_matrix`] with a negative two-cycle
/// planted between the last two waypoints.
pub fn generate_unbounded_matrix() -> Vec<Vec<Weight>> {
    let mut weights = generate_exhaustive_matrix();
    let (a, b) = (NUM_VERTICES - 3, NUM_VERTICES - 2);
    weights[a][b] = -5;
    weights[b][a] = 1;
    weights
}
