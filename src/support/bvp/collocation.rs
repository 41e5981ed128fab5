//! Collocation equations, their Newton solution, and residual estimates.
//!
//! On each interval `[x_i, x_{i+1}]` of width `h` the cubic through the node
//! values and slopes must satisfy the ODE at the midpoint:
//!
//! ```text
//! y_mid = (y_i + y_{i+1}) / 2 + h/8 (f_i - f_{i+1})
//! r_i   = y_{i+1} - y_i - h/6 (f_i + 4 f(y_mid) + f_{i+1})
//! ```
//!
//! The linearized system is block bidiagonal with a two-point border from
//! the boundary conditions. It is solved by condensing the interior blocks
//! onto one end, sweeping from whichever end keeps the transfer matrices bounded.

use std::array::from_fn;

use nalgebra::{DMatrix, DVector};

use super::{BoundaryValueProblem, Config, Error, mesh};

/// Relative finite-difference step, the square root of machine epsilon.
const FD_STEP: f64 = 1.490_116_119_384_765_6e-8;

/// Newton stops once interval residuals fall below this fraction of the tolerance.
const NEWTON_TOLERANCE_FACTOR: f64 = 0.05;

const ARMIJO_SIGMA: f64 = 0.2;
const MAX_HALVINGS: usize = 4;

/// Transfer-matrix magnitude above which a condensation sweep is distrusted.
const GROWTH_LIMIT: f64 = 1e8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NewtonOutcome {
    Converged,
    Stalled,
    Singular,
}

pub(super) struct Newton<const N: usize> {
    pub outcome: NewtonOutcome,
    pub collocation: Collocation<N>,
}

/// Collocation equations evaluated for one set of node values.
pub(super) struct Collocation<const N: usize> {
    pub f: Vec<[f64; N]>,
    y_mid: Vec<[f64; N]>,
    f_mid: Vec<[f64; N]>,
    residuals: Vec<[f64; N]>,
    bc: [f64; N],
}

impl<const N: usize> Collocation<N> {
    /// Interval residual as a relative slope error.
    fn scaled(&self, i: usize, h: f64) -> [f64; N] {
        from_fn(|k| 1.5 / h * self.residuals[i][k] / (1.0 + self.f_mid[i][k].abs()))
    }

    fn is_converged(&self, x: &[f64], config: &Config) -> bool {
        let interior = x.windows(2).enumerate().all(|(i, w)| {
            self.scaled(i, w[1] - w[0])
                .iter()
                .all(|r| r.abs() < NEWTON_TOLERANCE_FACTOR * config.tolerance)
        });
        interior && self.bc.iter().all(|g| g.abs() < config.bc_tolerance)
    }

    fn cost(&self, x: &[f64]) -> f64 {
        let interior: f64 = x
            .windows(2)
            .enumerate()
            .flat_map(|(i, w)| self.scaled(i, w[1] - w[0]))
            .map(|r| r * r)
            .sum();
        interior + self.bc.iter().map(|g| g * g).sum::<f64>()
    }
}

/// Runs damped Newton iterations on the collocation equations, updating `y` in place.
pub(super) fn newton<P, const N: usize>(
    problem: &P,
    x: &[f64],
    y: &mut [[f64; N]],
    config: &Config,
) -> Result<Newton<N>, Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    let mut collocation = evaluate(problem, x, y)?;

    for _ in 0..config.max_newton_iterations {
        if collocation.is_converged(x, config) {
            return Ok(Newton {
                outcome: NewtonOutcome::Converged,
                collocation,
            });
        }

        let Some(step) = newton_step(problem, x, y, &collocation)? else {
            return Ok(Newton {
                outcome: NewtonOutcome::Singular,
                collocation,
            });
        };

        // Backtrack until the residual norm decreases enough. A trial that
        // cannot be evaluated is replaced by any shorter one that can.
        let cost = collocation.cost(x);
        let mut alpha = 1.0;
        let mut best = trial(problem, x, y, &step, alpha);
        for _ in 0..MAX_HALVINGS {
            if matches!(&best, Ok((_, c)) if c.cost(x) < (1.0 - 2.0 * alpha * ARMIJO_SIGMA) * cost)
            {
                break;
            }
            alpha *= 0.5;
            let next = trial(problem, x, y, &step, alpha);
            if next.is_ok() || best.is_err() {
                best = next;
            }
        }

        let (next_y, next_collocation) = best?;
        y.copy_from_slice(&next_y);
        collocation = next_collocation;
    }

    let outcome = if collocation.is_converged(x, config) {
        NewtonOutcome::Converged
    } else {
        NewtonOutcome::Stalled
    };
    Ok(Newton {
        outcome,
        collocation,
    })
}

/// Relative RMS residual of the cubic interpolant on each interval.
///
/// Combines the midpoint residual with residuals at the two interior
/// Lobatto points using the five-point Lobatto quadrature weights.
pub(super) fn rms_residuals<P, const N: usize>(
    problem: &P,
    x: &[f64],
    y: &[[f64; N]],
    collocation: &Collocation<N>,
) -> Result<Vec<f64>, Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    let offset = 0.5 * (3.0_f64 / 7.0).sqrt();
    let f = &collocation.f;

    (0..x.len() - 1)
        .map(|i| {
            let h = x[i + 1] - x[i];
            let mid = x[i] + 0.5 * h;
            let r_mid = collocation.scaled(i, h);

            let mut sides = [[0.0; N]; 2];
            for (side, xs) in sides.iter_mut().zip([mid - offset * h, mid + offset * h]) {
                let (ys, slope) = mesh::hermite(x[i], h, (&y[i], &y[i + 1]), (&f[i], &f[i + 1]), xs);
                let fs = rhs(problem, xs, &ys)?;
                *side = from_fn(|k| (slope[k] - fs[k]) / (1.0 + fs[k].abs()));
            }

            let sum: f64 = (0..N)
                .map(|k| {
                    32.0 / 45.0 * r_mid[k].powi(2)
                        + 49.0 / 90.0 * (sides[0][k].powi(2) + sides[1][k].powi(2))
                })
                .sum();
            Ok((0.5 * sum).sqrt())
        })
        .collect()
}

fn rhs<P, const N: usize>(problem: &P, x: f64, y: &[f64; N]) -> Result<[f64; N], Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    let f = problem
        .rhs(x, y)
        .map_err(|source| Error::Rhs { x, source })?;
    if f.iter().all(|v| v.is_finite()) {
        Ok(f)
    } else {
        Err(Error::NonFiniteRhs { x })
    }
}

fn evaluate<P, const N: usize>(
    problem: &P,
    x: &[f64],
    y: &[[f64; N]],
) -> Result<Collocation<N>, Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    let f = x
        .iter()
        .zip(y)
        .map(|(&xi, yi)| rhs(problem, xi, yi))
        .collect::<Result<Vec<_>, _>>()?;

    let intervals = x.len() - 1;
    let mut y_mid = Vec::with_capacity(intervals);
    let mut f_mid = Vec::with_capacity(intervals);
    let mut residuals = Vec::with_capacity(intervals);

    for i in 0..intervals {
        let h = x[i + 1] - x[i];
        let ym: [f64; N] =
            from_fn(|k| 0.5 * (y[i][k] + y[i + 1][k]) + h / 8.0 * (f[i][k] - f[i + 1][k]));
        let fm = rhs(problem, x[i] + 0.5 * h, &ym)?;
        residuals.push(from_fn(|k| {
            y[i + 1][k] - y[i][k] - h / 6.0 * (f[i][k] + 4.0 * fm[k] + f[i + 1][k])
        }));
        y_mid.push(ym);
        f_mid.push(fm);
    }

    let bc = problem.boundary_residuals(&y[0], &y[intervals]);

    Ok(Collocation {
        f,
        y_mid,
        f_mid,
        residuals,
        bc,
    })
}

type TrialResult<const N: usize, E> = Result<(Vec<[f64; N]>, Collocation<N>), Error<E>>;

fn trial<P, const N: usize>(
    problem: &P,
    x: &[f64],
    y: &[[f64; N]],
    step: &[[f64; N]],
    alpha: f64,
) -> TrialResult<N, P::Error>
where
    P: BoundaryValueProblem<N>,
{
    let candidate: Vec<[f64; N]> = y
        .iter()
        .zip(step)
        .map(|(yi, di)| from_fn(|k| yi[k] + alpha * di[k]))
        .collect();
    let collocation = evaluate(problem, x, &candidate)?;
    Ok((candidate, collocation))
}

/// Returns the full Newton step, or `None` if the linear system is singular.
fn newton_step<P, const N: usize>(
    problem: &P,
    x: &[f64],
    y: &[[f64; N]],
    collocation: &Collocation<N>,
) -> Result<Option<Vec<[f64; N]>>, Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    let node_jacobians = x
        .iter()
        .zip(y)
        .zip(&collocation.f)
        .map(|((&xi, yi), fi)| jacobian(problem, xi, yi, fi))
        .collect::<Result<Vec<_>, _>>()?;

    let eye = DMatrix::<f64>::identity(N, N);
    let intervals = x.len() - 1;
    let mut a = Vec::with_capacity(intervals);
    let mut b = Vec::with_capacity(intervals);

    for i in 0..intervals {
        let h = x[i + 1] - x[i];
        let j_mid = jacobian(
            problem,
            x[i] + 0.5 * h,
            &collocation.y_mid[i],
            &collocation.f_mid[i],
        )?;
        let (j_left, j_right) = (&node_jacobians[i], &node_jacobians[i + 1]);

        let mid_left = &j_mid * (&eye * 0.5 + j_left * (h / 8.0));
        let mid_right = &j_mid * (&eye * 0.5 - j_right * (h / 8.0));
        a.push((j_left + mid_left * 4.0) * (-h / 6.0) - &eye);
        b.push((j_right + mid_right * 4.0) * (-h / 6.0) + &eye);
    }

    let r: Vec<DVector<f64>> = collocation
        .residuals
        .iter()
        .map(|ri| DVector::from_row_slice(ri))
        .collect();
    let (ga, gb) = boundary_jacobians(problem, &y[0], &y[intervals], &collocation.bc);
    let g = DVector::from_row_slice(&collocation.bc);

    Ok(condense(&a, &b, &r, &ga, &gb, &g)
        .map(|deltas| deltas.iter().map(|d| from_fn(|k| d[k])).collect()))
}

/// Forward-difference Jacobian of the right-hand side.
fn jacobian<P, const N: usize>(
    problem: &P,
    x: f64,
    y: &[f64; N],
    f0: &[f64; N],
) -> Result<DMatrix<f64>, Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    let mut jac = DMatrix::zeros(N, N);
    for k in 0..N {
        let mut shifted = *y;
        let step = perturb(&mut shifted, k);
        let fk = rhs(problem, x, &shifted)?;
        for row in 0..N {
            jac[(row, k)] = (fk[row] - f0[row]) / step;
        }
    }
    Ok(jac)
}

fn boundary_jacobians<P, const N: usize>(
    problem: &P,
    ya: &[f64; N],
    yb: &[f64; N],
    g0: &[f64; N],
) -> (DMatrix<f64>, DMatrix<f64>)
where
    P: BoundaryValueProblem<N>,
{
    let mut ga = DMatrix::zeros(N, N);
    let mut gb = DMatrix::zeros(N, N);
    for k in 0..N {
        let mut shifted = *ya;
        let step = perturb(&mut shifted, k);
        let g = problem.boundary_residuals(&shifted, yb);
        for row in 0..N {
            ga[(row, k)] = (g[row] - g0[row]) / step;
        }

        let mut shifted = *yb;
        let step = perturb(&mut shifted, k);
        let g = problem.boundary_residuals(ya, &shifted);
        for row in 0..N {
            gb[(row, k)] = (g[row] - g0[row]) / step;
        }
    }
    (ga, gb)
}

/// Shifts component `k` and returns the step actually taken.
fn perturb<const N: usize>(y: &mut [f64; N], k: usize) -> f64 {
    let base = y[k];
    y[k] = base + FD_STEP * base.abs().max(1.0);
    y[k] - base
}

struct Sweep {
    deltas: Vec<DVector<f64>>,
    growth: f64,
}

/// Solves `A_i δ_i + B_i δ_{i+1} = -r_i` with `Ga δ_0 + Gb δ_last = -g`.
fn condense(
    a: &[DMatrix<f64>],
    b: &[DMatrix<f64>],
    r: &[DVector<f64>],
    ga: &DMatrix<f64>,
    gb: &DMatrix<f64>,
    g: &DVector<f64>,
) -> Option<Vec<DVector<f64>>> {
    let forward = sweep(a, b, r, ga, gb, g);
    if forward.as_ref().is_some_and(|s| s.growth <= GROWTH_LIMIT) {
        return forward.map(|s| s.deltas);
    }

    // Reversing the node order swaps the roles of A and B, and of Ga and Gb.
    let reversed_a: Vec<_> = b.iter().rev().cloned().collect();
    let reversed_b: Vec<_> = a.iter().rev().cloned().collect();
    let reversed_r: Vec<_> = r.iter().rev().cloned().collect();
    let backward = sweep(&reversed_a, &reversed_b, &reversed_r, gb, ga, g).map(|mut s| {
        s.deltas.reverse();
        s
    });

    match (forward, backward) {
        (Some(f), Some(b)) => Some(if f.growth <= b.growth { f.deltas } else { b.deltas }),
        (f, b) => f.or(b).map(|s| s.deltas),
    }
}

/// Expresses every `δ_i` as `P_i δ_0 + q_i`, then closes with the boundary rows.
fn sweep(
    a: &[DMatrix<f64>],
    b: &[DMatrix<f64>],
    r: &[DVector<f64>],
    ga: &DMatrix<f64>,
    gb: &DMatrix<f64>,
    g: &DVector<f64>,
) -> Option<Sweep> {
    let n = g.len();
    let mut p = Vec::with_capacity(a.len() + 1);
    let mut q = Vec::with_capacity(a.len() + 1);
    p.push(DMatrix::<f64>::identity(n, n));
    q.push(DVector::<f64>::zeros(n));
    let mut growth = 1.0_f64;

    for ((ai, bi), ri) in a.iter().zip(b).zip(r) {
        let lu = bi.clone().lu();
        let p_next = -lu.solve(&(ai * &p[p.len() - 1]))?;
        let q_next = -lu.solve(&(ri + ai * &q[q.len() - 1]))?;
        growth = growth.max(p_next.amax());
        p.push(p_next);
        q.push(q_next);
    }

    let (p_end, q_end) = (p.last()?, q.last()?);
    let delta0 = (ga + gb * p_end).lu().solve(&-(g + gb * q_end))?;
    let deltas: Vec<DVector<f64>> = p
        .iter()
        .zip(&q)
        .map(|(pi, qi)| pi * &delta0 + qi)
        .collect();

    let finite = growth.is_finite() && deltas.iter().all(|d| d.iter().all(|v| v.is_finite()));
    finite.then_some(Sweep { deltas, growth })
}
