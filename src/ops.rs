//! Arithmetic over polynomials: addition, subtraction, multiplication,
//! Euclidean long division, and synthetic division by a linear binomial.
//!
//! Every operation takes its operands by reference and returns a fresh
//! polynomial; only long division mutates anything, and that is its own
//! working copy of the dividend.

use crate::errors::*;
use crate::poly::Poly;

/// Quotient and remainder produced by long division
#[derive(Clone, Debug)]
pub struct DivisionResult {
    pub quotient: Poly,
    pub remainder: Poly,
}

pub fn add(a: &Poly, b: &Poly) -> Poly {
    let mut out = a.clone();
    for (deg, c) in b.terms() {
        out.add_coef(deg, c);
    }
    out
}

pub fn neg(a: &Poly) -> Poly {
    let mut out = Poly::new();
    for (deg, c) in a.terms() {
        out.add_coef(deg, -c);
    }
    out
}

pub fn sub(a: &Poly, b: &Poly) -> Poly {
    add(a, &neg(b))
}

/// Full distribution: out[d1+d2] += a[d1] * b[d2]
pub fn mul(a: &Poly, b: &Poly) -> Poly {
    let mut out = Poly::new();
    for (d1, c1) in a.terms() {
        for (d2, c2) in b.terms() {
            out.add_coef(d1 + d2, c1 * c2);
        }
    }
    out
}

/// Polynomial long division.
///
/// Fails with `DividedByZero` when the divisor has no surviving term.
/// The loop condition re-derives the remainder's leading degree after every
/// subtraction step: cancellation can wipe out what was the leading term,
/// so a cached degree would overshoot.
pub fn div(dividend: &Poly, divisor: &Poly) -> Result<DivisionResult, CalcError> {
    let divisor_deg = divisor.degree().ok_or(CalcError::DividedByZero)?;
    let divisor_lead = divisor.coef(divisor_deg);

    let mut quotient = Poly::new();
    let mut remainder = dividend.clone();

    while let Some(rem_deg) = remainder.degree() {
        if rem_deg < divisor_deg {
            break;
        }
        let new_deg = rem_deg - divisor_deg;
        let new_coef = remainder.coef(rem_deg) / divisor_lead;
        quotient.add_coef(new_deg, new_coef);
        for (deg, c) in divisor.terms() {
            remainder.add_coef(deg + new_deg, -c * new_coef);
        }
    }

    Ok(DivisionResult { quotient, remainder })
}

/// Synthetic division (Briot-Ruffini): divides a polynomial given as dense
/// descending coefficients by the binomial `x - root` in O(n).
///
/// Returns the quotient coefficients (descending) and the remainder, which
/// is the value of the polynomial at `root`.
pub fn synthetic_div(coefs: &[f64], root: f64) -> (Vec<f64>, f64) {
    if coefs.is_empty() {
        return (Vec::new(), 0.0);
    }

    let n = coefs.len();
    let mut quotient = Vec::with_capacity(n - 1);
    let mut carry = coefs[0];
    quotient.push(carry);

    for (i, &c) in coefs.iter().enumerate().skip(1) {
        let next = c + carry * root;
        if i < n - 1 {
            quotient.push(next);
        }
        carry = next;
    }

    (quotient, carry)
}
