//! Wigner quasi-probability distributions of Fock-basis density matrices.
//!
//! The evaluator in this module implements the standard recursive construction
//! of the Wigner function: for each pair of Fock indices (*m*, *n*) there is a
//! complex-valued phase-space kernel field equal to the Wigner transform of
//! the projector ∣*m*⟩⟨*n*∣, and these kernels obey a two-index recursion
//! seeded by the vacuum Gaussian. The evaluator walks the recursion in
//! row-major order, holding one row of kernels at a time in a fixed-size
//! scratch table, and folds each kernel into a real accumulator weighted by
//! the corresponding density-matrix entry. Off-diagonal entries are folded
//! together with their conjugate partners, so a Hermitian input is assumed
//! rather than checked; see [`wigner`].
//!
//! Conventions: the complex phase-space coordinate is `A = (x + i·p) / 2`, and
//! the returned values carry an overall factor of 1/2, so that the vacuum
//! state evaluates to `exp(-2|A|²) / (2π)` and a Riemann sum of the output
//! over a sufficiently wide grid approximates Tr ρ.
//!
//! Floating-point error in the recursion compounds with each row, so
//! precision degrades as the basis cutoff grows; results are typically good
//! to well below plotting accuracy for cutoffs in the tens, but no correction
//! is applied.

use std::f64::consts::PI;
use ndarray as nd;
use num_complex::Complex64 as C64;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WignerError {
    /// Returned when the density matrix is not square.
    #[error("error in wigner evaluation: density matrix is not square")]
    NonSquare,

    /// Returned when the density matrix has zero size.
    #[error("error in wigner evaluation: density matrix is empty")]
    EmptyState,

    /// Returned when a quadrature sampling grid is empty (or, for marginals,
    /// has fewer than two points).
    #[error("error in wigner evaluation: degenerate sampling grid")]
    EmptyGrid,

    /// Returned when the shape of sampled Wigner data doesn't match the
    /// sampling grids it is claimed to live on.
    #[error("error in marginal evaluation: data shape doesn't match grids")]
    GridMismatch,
}
use WignerError::*;
pub type WignerResult<T> = Result<T, WignerError>;

/// Construct coordinate meshes over the rectangular grid spanned by `xvec`
/// and `pvec`.
///
/// Both outputs have shape `(pvec.len(), xvec.len())`, with `x` varying along
/// rows: `q[(i, j)] == xvec[j]` and `p[(i, j)] == pvec[i]`.
pub fn meshgrid(xvec: &nd::Array1<f64>, pvec: &nd::Array1<f64>)
    -> WignerResult<(nd::Array2<f64>, nd::Array2<f64>)>
{
    if xvec.is_empty() || pvec.is_empty() { return Err(EmptyGrid); }
    let shape = (pvec.len(), xvec.len());
    let qgrid = nd::Array2::from_shape_fn(shape, |(_, j)| xvec[j]);
    let pgrid = nd::Array2::from_shape_fn(shape, |(i, _)| pvec[i]);
    Ok((qgrid, pgrid))
}

/// Evaluate the Wigner function of the Fock-basis density matrix `rho` at
/// every point of the grid spanned by the quadrature samples `xvec` and
/// `pvec`.
///
/// Returns the two coordinate meshes (see [`meshgrid`]) together with the
/// Wigner values, all of shape `(pvec.len(), xvec.len())`. The values carry
/// an overall factor of 1/2; see the [module docs][self] for conventions.
///
/// `rho` must be square; its side length sets the basis cutoff. `rho` is
/// assumed Hermitian with trace near 1 — neither is checked, and the result
/// for other inputs is well-defined numerically but physically meaningless,
/// since each off-diagonal entry is folded in together with the conjugate of
/// its mirror. Renormalize first (e.g. with
/// [`renormalized`][crate::fock::renormalized]) if the trace has drifted.
pub fn wigner(
    rho: &nd::Array2<C64>,
    xvec: &nd::Array1<f64>,
    pvec: &nd::Array1<f64>,
) -> WignerResult<(nd::Array2<f64>, nd::Array2<f64>, nd::Array2<f64>)>
{
    let cutoff = rho.nrows();
    if rho.ncols() != cutoff { return Err(NonSquare); }
    if cutoff == 0 { return Err(EmptyState); }
    let (qgrid, pgrid) = meshgrid(xvec, pvec)?;

    // complex phase-space coordinate A = (x + i p) / 2
    let coord: nd::Array2<C64> =
        nd::Zip::from(&qgrid).and(&pgrid)
        .map_collect(|&q, &p| C64::new(q, p) / 2.0);

    // kernel table: slot n holds the field for the projector ∣m⟩⟨n∣ of the
    // current row m; seeded with the vacuum kernel exp(-2|A|²)/π
    let mut kernels: Vec<nd::Array2<C64>> = Vec::with_capacity(cutoff);
    kernels.push(coord.mapv(|a| C64::from((-2.0 * a.norm_sqr()).exp() / PI)));

    let mut acc: nd::Array2<f64> =
        kernels[0].mapv(|w0| rho[[0, 0]].re * w0.re);

    // first row: kernels for ∣0⟩⟨n∣, each folded in with its ∣n⟩⟨0∣ partner
    for n in 1..cutoff {
        let rtn = (n as f64).sqrt();
        let next: nd::Array2<C64> =
            nd::Zip::from(&coord).and(&kernels[n - 1])
            .map_collect(|&a, &wl| 2.0 * a * wl / rtn);
        nd::Zip::from(&mut acc).and(&next)
            .for_each(|w, &wk| { *w += 2.0 * (rho[[0, n]] * wk).re; });
        kernels.push(next);
    }

    for m in 1..cutoff {
        let rtm = (m as f64).sqrt();
        // slot m still holds the kernel for ∣m-1⟩⟨m∣ from the previous row;
        // it is the predecessor of both the diagonal update and the first
        // off-diagonal step below, so stash it before overwriting
        let w_prev_diag = kernels[m].clone();
        let diag: nd::Array2<C64> =
            nd::Zip::from(&coord).and(&w_prev_diag).and(&kernels[m - 1])
            .map_collect(|&a, &wp, &wd| (2.0 * a.conj() * wp - rtm * wd) / rtm);
        nd::Zip::from(&mut acc).and(&diag)
            .for_each(|w, &wk| { *w += (rho[[m, m]] * wk).re; });
        kernels[m] = diag;

        let mut w_prev_offdiag = w_prev_diag;
        for n in m + 1..cutoff {
            let rtn = (n as f64).sqrt();
            let next: nd::Array2<C64> =
                nd::Zip::from(&coord).and(&kernels[n - 1]).and(&w_prev_offdiag)
                .map_collect(|&a, &wl, &wp| (2.0 * a * wl - rtm * wp) / rtn);
            w_prev_offdiag = std::mem::replace(&mut kernels[n], next);
            nd::Zip::from(&mut acc).and(&kernels[n])
                .for_each(|w, &wk| { *w += 2.0 * (rho[[m, n]] * wk).re; });
        }
    }

    acc.mapv_inplace(|w| w / 2.0);
    Ok((qgrid, pgrid, acc))
}

/// Integrate sampled Wigner data `w` along each quadrature axis, giving the
/// marginal probability densities over `x` and `p` respectively.
///
/// Integration is a Riemann sum over uniformly spaced grids, so both grids
/// need at least two points, and `w` must have shape
/// `(pvec.len(), xvec.len())` as returned by [`wigner`].
pub fn marginals(
    xvec: &nd::Array1<f64>,
    pvec: &nd::Array1<f64>,
    w: &nd::Array2<f64>,
) -> WignerResult<(nd::Array1<f64>, nd::Array1<f64>)>
{
    if xvec.len() < 2 || pvec.len() < 2 { return Err(EmptyGrid); }
    if w.dim() != (pvec.len(), xvec.len()) { return Err(GridMismatch); }
    let dx = xvec[1] - xvec[0];
    let dp = pvec[1] - pvec[0];
    let xdist = w.sum_axis(nd::Axis(0)) * dp;
    let pdist = w.sum_axis(nd::Axis(1)) * dx;
    Ok((xdist, pdist))
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use rand::{ SeedableRng, rngs::StdRng };
    use crate::fock;
    use super::*;

    const TAU: f64 = 2.0 * PI;

    fn point_grid() -> nd::Array1<f64> { nd::array![0.0] }

    #[test]
    fn vacuum_closed_form() {
        let rho = fock::density(&fock::vacuum(4).unwrap());
        let xvec = nd::Array1::linspace(-5.0, 5.0, 41);
        let pvec = nd::Array1::linspace(-5.0, 5.0, 37);
        let (qgrid, pgrid, w) = wigner(&rho, &xvec, &pvec).unwrap();
        nd::Zip::from(&qgrid).and(&pgrid).and(&w)
            .for_each(|&q, &p, &wk| {
                let asq = (q * q + p * p) / 4.0;
                let expected = (-2.0 * asq).exp() / TAU;
                assert!((wk - expected).abs() < 1e-12);
            });
    }

    #[test]
    fn vacuum_origin() {
        let rho: nd::Array2<C64> =
            nd::array![
                [C64::from(1.0), C64::from(0.0)],
                [C64::from(0.0), C64::from(0.0)],
            ];
        let (_, _, w) = wigner(&rho, &point_grid(), &point_grid()).unwrap();
        assert_eq!(w.dim(), (1, 1));
        assert!((w[[0, 0]] - 1.0 / TAU).abs() < 1e-12);
    }

    #[test]
    fn one_photon_negative_at_origin() {
        let rho: nd::Array2<C64> =
            nd::array![
                [C64::from(0.0), C64::from(0.0)],
                [C64::from(0.0), C64::from(1.0)],
            ];
        let (_, _, w) = wigner(&rho, &point_grid(), &point_grid()).unwrap();
        assert!(w[[0, 0]] < 0.0);
        assert!((w[[0, 0]] + 1.0 / TAU).abs() < 1e-12);
    }

    #[test]
    fn grid_sum_normalization() {
        let mut rng = StdRng::seed_from_u64(10546);
        let rho = fock::random_density(5, &mut rng).unwrap();
        let xvec = nd::Array1::linspace(-8.0, 8.0, 201);
        let pvec = nd::Array1::linspace(-8.0, 8.0, 201);
        let (_, _, w) = wigner(&rho, &xvec, &pvec).unwrap();
        let dx = xvec[1] - xvec[0];
        let dp = pvec[1] - pvec[0];
        let integral: f64 = w.sum() * dx * dp;
        assert!((integral - 1.0).abs() < 0.03);
    }

    #[test]
    fn coherent_state_peak() {
        let alpha = C64::new(0.8, 0.4);
        let rho = fock::density(&fock::coherent(alpha, 16).unwrap());
        let xvec = nd::Array1::linspace(-5.0, 5.0, 161);
        let pvec = nd::Array1::linspace(-5.0, 5.0, 161);
        let (qgrid, pgrid, w) = wigner(&rho, &xvec, &pvec).unwrap();
        let (imax, jmax) =
            (0..pvec.len()).cartesian_product(0..xvec.len())
            .max_by(|l, r| w[*l].total_cmp(&w[*r]))
            .unwrap();
        // peak sits at (x, p) = (2 Re α, 2 Im α) to within one grid cell
        let dx = xvec[1] - xvec[0];
        assert!((qgrid[[imax, jmax]] - 2.0 * alpha.re).abs() <= dx);
        assert!((pgrid[[imax, jmax]] - 2.0 * alpha.im).abs() <= dx);
    }

    #[test]
    fn non_hermitian_input_is_accepted() {
        let rho: nd::Array2<C64> =
            nd::array![
                [C64::from(0.5), C64::new(0.1, 0.2)],
                [C64::from(0.0), C64::from(0.5)],
            ];
        let grid = nd::Array1::linspace(-2.0, 2.0, 11);
        assert!(wigner(&rho, &grid, &grid).is_ok());
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let grid = nd::Array1::linspace(-1.0, 1.0, 5);
        let empty: nd::Array1<f64> = nd::Array1::zeros(0);

        let nonsquare: nd::Array2<C64> = nd::Array2::zeros((2, 3));
        assert!(matches!(wigner(&nonsquare, &grid, &grid), Err(NonSquare)));

        let nullstate: nd::Array2<C64> = nd::Array2::zeros((0, 0));
        assert!(matches!(wigner(&nullstate, &grid, &grid), Err(EmptyState)));

        let rho = fock::density(&fock::vacuum(2).unwrap());
        assert!(matches!(wigner(&rho, &empty, &grid), Err(EmptyGrid)));
        assert!(matches!(wigner(&rho, &grid, &empty), Err(EmptyGrid)));
    }

    #[test]
    fn marginals_integrate_to_trace() {
        let rho = fock::density(&fock::coherent(C64::new(0.5, -0.5), 20).unwrap());
        let xvec = nd::Array1::linspace(-7.0, 7.0, 141);
        let pvec = nd::Array1::linspace(-7.0, 7.0, 141);
        let (_, _, w) = wigner(&rho, &xvec, &pvec).unwrap();
        let (xdist, pdist) = marginals(&xvec, &pvec, &w).unwrap();
        let dx = xvec[1] - xvec[0];
        let dp = pvec[1] - pvec[0];
        assert!((xdist.sum() * dx - 1.0).abs() < 0.02);
        assert!((pdist.sum() * dp - 1.0).abs() < 0.02);

        let short = nd::array![0.0];
        assert!(matches!(marginals(&short, &pvec, &w), Err(EmptyGrid)));
        let wrong: nd::Array2<f64> = nd::Array2::zeros((3, 3));
        assert!(matches!(marginals(&xvec, &pvec, &wrong), Err(GridMismatch)));
    }
}
