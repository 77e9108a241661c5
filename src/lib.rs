//! `sinusoid-fit` library crate.
//!
//! Models a signal as a DC offset plus a sum of sinusoids whose frequencies are
//! integer combinations ("modes") of a few base frequencies, and fits the
//! amplitude/phase of every component to time-series data.
//!
//! ```
//! use sinusoid_fit::SinusoidModel;
//!
//! let mut model = SinusoidModel::new([1.2, 2.3], [[1, 0], [0, 1], [1, 1]]).unwrap();
//! model.set_fit_parameters(&[0.1, 1.0, 0.0, 0.5, 1.0, 0.25, 2.0]).unwrap();
//! let y = model.value(0.5);
//! assert!(y.is_finite());
//! ```
//!
//! Layout:
//!
//! - `models`: the sinusoid value object, the model and parameter packing
//! - `fit`: solver interface and the fitting orchestration
//! - `math`: Levenberg–Marquardt, linear least squares and phase helpers
//! - `report`: fixed-width table rendering
//! - `data`: deterministic synthetic samples

pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{IntoFrequencies, Mode, ModeExtension};
pub use error::ModelError;
pub use fit::{FitReport, LeastSquaresSolver, SolverConfig, SolverOutcome, SolverStatus};
pub use math::LevenbergMarquardt;
pub use models::{Sinusoid, SinusoidModel};
