//! # Polynomial calculator engine
//!
//! The engine behind a calculator UI: it parses loosely formatted
//! single-variable polynomial strings, performs exact arithmetic on the
//! sparse representation, and renders results back in normalized form.
//! A limit resolver built on the same pieces handles 0/0 indeterminate
//! forms through synthetic division and a square-root rationalization.
//!
//! Accepted polynomial notation (coefficient-variable adjacency, any term
//! order, duplicate degrees accumulate):
//! * `3x^2 - 5x + 6`
//! * `x^2 + 2x^2 - 1` (collapses to `3x^2 - 1`)
//! * `2.5x - 0.5`, `-x`, `+3x`, `3*x^2` (`*` marks are dropped)
//!
//! Operations:
//! * [`poly::Poly::parse`] / the `Display` impl - string to polynomial and
//!   back, with sign normalization and 4-decimal rounding
//! * [`ops::add`], [`ops::sub`], [`ops::mul`] - elementwise and
//!   distributed arithmetic
//! * [`ops::div`] - long division producing quotient and remainder
//! * [`ops::synthetic_div`] - O(n) division by a linear binomial
//! * [`parse::eval_at`] - numeric evaluation of one-variable arithmetic
//!   expressions (`+ - * / ^`, brackets, `sin`/`cos`/`sqrt`/... function
//!   set, implicit multiplication)
//! * [`limit::evaluate_limit`] - limit of an expression at a point, with
//!   0/0 resolution and signed-infinity classification
//!
//! Every entry point returns a typed [`errors::CalcError`] instead of
//! panicking; rendering errors for users is the caller's job.

#[macro_use]
extern crate pest_derive;

pub mod errors;
pub mod limit;
pub mod ops;
pub mod parse;
pub mod poly;
pub mod stack;
