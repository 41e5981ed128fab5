use thiserror::Error;

/// Errors that prevent a boundary value solve from running to completion.
#[derive(Debug, Error)]
pub enum Error<E>
where
    E: std::error::Error + 'static,
{
    #[error("mesh needs at least 2 nodes, got {0}")]
    TooFewNodes(usize),

    #[error("mesh is not strictly increasing at node {index}")]
    NonIncreasingMesh { index: usize },

    #[error("initial guess has {guess} points for {mesh} mesh nodes")]
    GuessLength { mesh: usize, guess: usize },

    #[error("initial guess is not finite at node {0}")]
    NonFiniteGuess(usize),

    #[error("initial mesh has {mesh} nodes but max_nodes is {max_nodes}")]
    MaxNodes { mesh: usize, max_nodes: usize },

    #[error("tolerance must be positive, got {0}")]
    Tolerance(f64),

    #[error("at least one Newton iteration is required")]
    NewtonIterations,

    #[error("right-hand side failed at x = {x}")]
    Rhs {
        x: f64,
        #[source]
        source: E,
    },

    #[error("right-hand side is not finite at x = {x}")]
    NonFiniteRhs { x: f64 },
}
