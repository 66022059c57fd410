//! Constructors for states and operators of a single bosonic mode in a
//! truncated Fock basis, plus assorted density-matrix helpers.
//!
//! Everything here works in the finite basis { ∣0⟩, …, ∣`cutoff` - 1⟩ }, so
//! all operators are ordinary `cutoff × cutoff` complex matrices and the
//! usual infinite-dimensional identities hold only approximately. In
//! particular the ladder commutator [a, a†] deviates from the identity in the
//! topmost Fock level, and a coherent state with ∣α∣² comparable to `cutoff`
//! loses significant weight to the truncation. Callers should pick `cutoff`
//! comfortably above the largest photon number their states populate.

use itertools::Itertools;
use ndarray as nd;
use ndarray_linalg::{ Eigh, UPLO };
use num_complex::Complex64 as C64;
use num_traits::One;
use rand::{
    Rng,
    distributions::Distribution,
};
use statrs::distribution::Normal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FockError {
    /// Returned when asked to construct in a basis of dimension 0.
    #[error("error in Fock construction: basis must have dimension at least 1")]
    EmptyBasis,

    /// Returned when a number-state index lies at or beyond the basis cutoff.
    #[error("error in Fock construction: number-state index exceeds the cutoff")]
    NumberOutOfBounds,

    /// Returned when renormalizing a density matrix whose trace is
    /// numerically zero.
    #[error("error in renormalization: trace is numerically zero")]
    ZeroTrace,

    /// Error from the underlying eigensolver.
    #[error("eigensolver error: {0}")]
    LinalgError(#[from] ndarray_linalg::error::LinalgError),
}
use FockError::*;
pub type FockResult<T> = Result<T, FockError>;

/// Conjugate transpose.
pub fn dagger(m: &nd::Array2<C64>) -> nd::Array2<C64> {
    m.t().mapv(|c| c.conj())
}

/// Construct the number state ∣n⟩.
pub fn number(n: usize, cutoff: usize) -> FockResult<nd::Array1<C64>> {
    if cutoff == 0 { return Err(EmptyBasis); }
    if n >= cutoff { return Err(NumberOutOfBounds); }
    let mut psi: nd::Array1<C64> = nd::Array1::zeros(cutoff);
    psi[n] = C64::one();
    Ok(psi)
}

/// Construct the vacuum state ∣0⟩.
pub fn vacuum(cutoff: usize) -> FockResult<nd::Array1<C64>> {
    number(0, cutoff)
}

/// Construct the coherent state ∣α⟩ ∝ Σ αⁿ/√(n!) ∣n⟩, renormalized to unit
/// norm after truncation.
pub fn coherent(alpha: C64, cutoff: usize) -> FockResult<nd::Array1<C64>> {
    if cutoff == 0 { return Err(EmptyBasis); }
    let mut psi: nd::Array1<C64> = nd::Array1::zeros(cutoff);
    let mut amp = C64::one();
    psi[0] = amp;
    for n in 1..cutoff {
        amp *= alpha / C64::from((n as f64).sqrt());
        psi[n] = amp;
    }
    let norm = psi.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
    psi.mapv_inplace(|c| c / norm);
    Ok(psi)
}

/// Construct the annihilation operator a, with ⟨n-1∣a∣n⟩ = √n.
pub fn annihilation(cutoff: usize) -> FockResult<nd::Array2<C64>> {
    if cutoff == 0 { return Err(EmptyBasis); }
    let mut op: nd::Array2<C64> = nd::Array2::zeros((cutoff, cutoff));
    for n in 1..cutoff {
        op[[n - 1, n]] = C64::from((n as f64).sqrt());
    }
    Ok(op)
}

/// Construct the creation operator a†.
pub fn creation(cutoff: usize) -> FockResult<nd::Array2<C64>> {
    annihilation(cutoff).map(|a| dagger(&a))
}

/// Construct the displacement operator D(α) = exp(α a† - conj(α) a).
///
/// The generator is anti-Hermitian, so the exponential is evaluated
/// spectrally: with H = -i (α a† - conj(α) a) Hermitian, D = V e^{iΛ} V† for
/// the eigendecomposition H = V Λ V†.
pub fn displacement(alpha: C64, cutoff: usize) -> FockResult<nd::Array2<C64>> {
    let a = annihilation(cutoff)?;
    let adag = dagger(&a);
    let generator: nd::Array2<C64> =
        adag.mapv(|c| alpha * c) - a.mapv(|c| alpha.conj() * c);
    let h = generator.mapv(|c| -C64::i() * c);
    let (evals, evecs) = h.eigh(UPLO::Lower)?;
    let phases: nd::Array1<C64> = evals.mapv(C64::cis);
    Ok((&evecs * &phases).dot(&dagger(&evecs)))
}

/// Construct the pure-state density matrix ∣ψ⟩⟨ψ∣.
pub fn density(psi: &nd::Array1<C64>) -> nd::Array2<C64> {
    let n = psi.len();
    nd::Array2::from_shape_fn((n, n), |(i, j)| psi[i] * psi[j].conj())
}

/// Trace of a density matrix.
pub fn trace(rho: &nd::Array2<C64>) -> C64 { rho.diag().sum() }

/// Return a copy of `rho` rescaled to unit trace.
pub fn renormalized(rho: &nd::Array2<C64>) -> FockResult<nd::Array2<C64>> {
    let tr = trace(rho);
    if tr.norm() < f64::EPSILON { return Err(ZeroTrace); }
    Ok(rho.mapv(|c| c / tr))
}

/// Return `true` if `rho` is square and every element matches its mirror
/// under conjugate transposition to within `tol`.
pub fn is_hermitian(rho: &nd::Array2<C64>, tol: f64) -> bool {
    rho.nrows() == rho.ncols()
        && (0..rho.nrows()).cartesian_product(0..rho.ncols())
            .all(|(i, j)| (rho[[i, j]] - rho[[j, i]].conj()).norm() <= tol)
}

/// Photon-number probabilities of `rho` (the real part of its diagonal).
pub fn photon_dist(rho: &nd::Array2<C64>) -> nd::Array1<f64> {
    rho.diag().mapv(|c| c.re)
}

/// Sample a random mixed state from the Ginibre ensemble: ρ = G G† / Tr(G G†)
/// for G a matrix of standard complex Gaussian entries.
///
/// The result is Hermitian, positive semi-definite, and trace-1 by
/// construction, making it a convenient fixture for testing routines that
/// consume density matrices.
pub fn random_density<R>(cutoff: usize, rng: &mut R) -> FockResult<nd::Array2<C64>>
where R: Rng + ?Sized
{
    if cutoff == 0 { return Err(EmptyBasis); }
    let normal = Normal::standard();
    let g: nd::Array2<C64> =
        nd::Array2::from_shape_simple_fn(
            (cutoff, cutoff),
            || C64::new(normal.sample(rng), normal.sample(rng)),
        );
    let gg = g.dot(&dagger(&g));
    renormalized(&gg)
}
