//! Numerical tools for single-mode continuous-variable quantum states in a
//! truncated Fock (photon-number) basis.
//!
//! The core routine is [`wigner::wigner`], which evaluates the Wigner
//! quasi-probability distribution of a Fock-basis density matrix over a
//! rectangular phase-space grid using the standard recursive construction of
//! the Fock-projector kernels. [`fock`] provides the states and operators
//! needed to build such density matrices in the first place.
//!
//! # Example
//!
//! ```
//! use ndarray as nd;
//! use num_complex::Complex64 as C64;
//! use phase_space::{ fock, wigner::wigner };
//!
//! // density matrix of a (truncated) coherent state ∣α⟩, α = 1
//! let psi = fock::coherent(C64::new(1.0, 0.0), 16).unwrap();
//! let rho = fock::density(&psi);
//!
//! // sample its Wigner function on a square phase-space window
//! let xvec = nd::Array1::linspace(-5.0, 5.0, 101);
//! let pvec = nd::Array1::linspace(-5.0, 5.0, 101);
//! let (_q, _p, w) = wigner(&rho, &xvec, &pvec).unwrap();
//!
//! // a Gaussian blob centered at (x, p) = (2 Re α, 2 Im α)
//! assert_eq!(w.dim(), (101, 101));
//! assert!(w.iter().all(|wk| wk.is_finite()));
//! ```

pub mod fock;
pub mod wigner;
