//! Regression engine: closed-form OLS fit, prediction and MSE.

pub mod ols;

pub use ols::*;
