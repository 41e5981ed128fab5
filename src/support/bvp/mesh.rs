use super::Error;

/// Residual ratio above which an interval is split in three instead of two.
const THIRDS_THRESHOLD: f64 = 100.0;

pub(super) fn validate<E: std::error::Error + 'static, const N: usize>(
    mesh: &[f64],
    guess: &[[f64; N]],
    max_nodes: usize,
) -> Result<(), Error<E>> {
    if mesh.len() < 2 {
        return Err(Error::TooFewNodes(mesh.len()));
    }
    if let Some(index) = mesh.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(Error::NonIncreasingMesh { index: index + 1 });
    }
    if guess.len() != mesh.len() {
        return Err(Error::GuessLength {
            mesh: mesh.len(),
            guess: guess.len(),
        });
    }
    if let Some(index) = guess.iter().position(|y| y.iter().any(|v| !v.is_finite())) {
        return Err(Error::NonFiniteGuess(index));
    }
    if mesh.len() > max_nodes {
        return Err(Error::MaxNodes {
            mesh: mesh.len(),
            max_nodes,
        });
    }
    Ok(())
}

/// Value and derivative of the cubic Hermite interpolant on `[x0, x0 + h]`.
pub(super) fn hermite<const N: usize>(
    x0: f64,
    h: f64,
    (y0, y1): (&[f64; N], &[f64; N]),
    (f0, f1): (&[f64; N], &[f64; N]),
    x: f64,
) -> ([f64; N], [f64; N]) {
    let t = (x - x0) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    let d00 = (6.0 * t2 - 6.0 * t) / h;
    let d10 = 3.0 * t2 - 4.0 * t + 1.0;
    let d01 = (-6.0 * t2 + 6.0 * t) / h;
    let d11 = 3.0 * t2 - 2.0 * t;

    let mut value = [0.0; N];
    let mut slope = [0.0; N];
    for k in 0..N {
        value[k] = h00 * y0[k] + h10 * h * f0[k] + h01 * y1[k] + h11 * h * f1[k];
        slope[k] = d00 * y0[k] + d10 * f0[k] + d01 * y1[k] + d11 * f1[k];
    }
    (value, slope)
}

/// Inserts nodes into every interval whose residual exceeds `tolerance`.
///
/// One node goes at the midpoint of a moderately failing interval and two
/// at the thirds of a badly failing one. New values come from the cubic
/// interpolant so the next Newton pass starts close to the current solution.
pub(super) fn refine<const N: usize>(
    x: &[f64],
    y: &[[f64; N]],
    f: &[[f64; N]],
    rms: &[f64],
    tolerance: f64,
) -> (Vec<f64>, Vec<[f64; N]>) {
    let mut new_x = Vec::with_capacity(x.len() * 2);
    let mut new_y = Vec::with_capacity(x.len() * 2);

    for i in 0..rms.len() {
        new_x.push(x[i]);
        new_y.push(y[i]);

        let h = x[i + 1] - x[i];
        let inserts: &[f64] = if rms[i] >= THIRDS_THRESHOLD * tolerance {
            &[1.0 / 3.0, 2.0 / 3.0]
        } else if rms[i] > tolerance {
            &[0.5]
        } else {
            &[]
        };

        for &fraction in inserts {
            let xs = x[i] + fraction * h;
            let (ys, _) = hermite(x[i], h, (&y[i], &y[i + 1]), (&f[i], &f[i + 1]), xs);
            new_x.push(xs);
            new_y.push(ys);
        }
    }

    if let (Some(&xl), Some(&yl)) = (x.last(), y.last()) {
        new_x.push(xl);
        new_y.push(yl);
    }

    (new_x, new_y)
}
