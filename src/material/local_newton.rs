/// Holds the results of a converged scalar Newton iteration
#[derive(Clone, Copy, Debug)]
pub struct NewtonSolution {
    /// Holds the root
    pub x: f64,

    /// Holds the derivative of the residual at the root
    pub drdx: f64,

    /// Holds the number of iterations
    pub iterations: usize,
}

/// Holds the information about a failed scalar Newton iteration
#[derive(Clone, Copy, Debug)]
pub struct NewtonFailure {
    /// Holds the last iterate
    pub x: f64,

    /// Holds the last residual
    pub residual: f64,

    /// Holds the number of iterations performed
    pub iterations: usize,
}

/// Solves the scalar equation r(x) = 0 with x ≥ 0 by the Newton-Raphson method
///
/// The closure returns `(r, dr/dx)`. The iterates are projected onto x ≥ 0 since the
/// unknown is a plastic multiplier. Convergence is achieved when `|r| ≤ tol`.
///
/// # Input
///
/// * `x0` -- initial guess (≥ 0)
/// * `tol` -- absolute tolerance on the residual
/// * `max_iterations` -- maximum number of iterations
/// * `residual` -- function returning (r(x), dr/dx(x))
pub fn newton_non_negative<F>(x0: f64, tol: f64, max_iterations: usize, mut residual: F) -> Result<NewtonSolution, NewtonFailure>
where
    F: FnMut(f64) -> (f64, f64),
{
    let mut x = f64::max(x0, 0.0);
    let (mut r, mut drdx) = residual(x);
    for it in 0..max_iterations {
        if r.abs() <= tol {
            return Ok(NewtonSolution {
                x,
                drdx,
                iterations: it,
            });
        }
        if drdx == 0.0 || !drdx.is_finite() || !r.is_finite() {
            return Err(NewtonFailure {
                x,
                residual: r,
                iterations: it,
            });
        }
        x = f64::max(x - r / drdx, 0.0);
        (r, drdx) = residual(x);
    }
    if r.abs() <= tol {
        return Ok(NewtonSolution {
            x,
            drdx,
            iterations: max_iterations,
        });
    }
    Err(NewtonFailure {
        x,
        residual: r,
        iterations: max_iterations,
    })
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
