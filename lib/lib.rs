//! This package implements the algebra behind networks of small stabilizer
//! tensors ("legos") wired together leg to leg, as used to build quantum
//! error-correcting codes out of reusable pieces.
//!
//! - [`binmat`] provides binary matrices over GF(2) with row reduction and
//! variable elimination.
//! - [`network`] describes legos, their connections, and the
//! [`TensorNetwork`][network::TensorNetwork] snapshot every operation consumes
//! and produces.
//! - [`fusion`] contracts a selection of connected legos into a single
//! equivalent lego.
//! - [`rules`] implements structure-preserving rewrite rules in the style of
//! the [ZX-calculus][wiki] (bialgebra, Hopf, color change, ...).
//! - [`splice`] attaches stoppers to dangling legs and splices two-legged legos
//! into existing wires.
//! - [`history`] records every edit as a reversible [`Operation`][history::Operation]
//! and drives undo/redo.
//!
//! Every operation is a pure function of its inputs: a network and a selection
//! go in, an [`Edit`][history::Edit] holding the complete new network and the
//! operation record comes out.
//!
//! [wiki]: https://en.wikipedia.org/wiki/ZX-calculus
//!
//! # Further reading
//! - C. Cao and B. Lackey, "Quantum Lego: Building quantum error correction
//! codes from tensor networks."
//! [arXiv:2109.08158](https://arxiv.org/abs/2109.08158)
//! - J. van de Wetering, "ZX-calculus for the working quantum computer
//! scientist." [arXiv:2012.13966](https://arxiv.org/abs/2012.13966)
//!

use thiserror::Error;

pub mod binmat;
pub mod config;
pub mod network;
pub mod fusion;
pub mod rules;
pub mod splice;
pub mod history;

/// Top-level error type, collecting the errors of each module.
#[derive(Debug, Error)]
pub enum LegoError {
    /// An operation referenced something absent from the network.
    #[error("{0}")]
    Reference(#[from] network::ReferenceError),

    /// A precondition on the shape of the selection did not hold.
    #[error("{0}")]
    Validation(#[from] rules::ValidationError),

    /// Contraction of the selection failed.
    #[error("{0}")]
    Fusion(#[from] fusion::FusionError),
}
pub type LegoResult<T> = Result<T, LegoError>;

/// Handy macro to create [`BinMatrix`][binmat::BinMatrix]es from rows of
/// literal bits.
///
/// ```
/// use lego_calc::{ bmat, binmat::BinMatrix };
///
/// let h = bmat!([1, 0, 0, 1], [0, 1, 1, 0]);
/// assert_eq!(h.shape(), (2, 4));
/// assert_eq!(h.num_legs(), 2);
/// assert_eq!(bmat!([1]), BinMatrix::scalar(true));
/// ```
///
/// *Panics if the rows have unequal lengths.*
#[macro_export]
macro_rules! bmat {
    ( $( [ $( $b:expr ),* $(,)? ] ),+ $(,)? ) => {
        $crate::binmat::BinMatrix::from_rows(
            vec![ $( vec![ $( ($b) as u8 ),* ] ),+ ]
        )
    };
}
