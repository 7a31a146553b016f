use std::collections::BTreeMap;
use std::fmt;

use crate::errors::*;

/// Coefficients whose magnitude does not exceed this value are treated
/// as absent when picking leading terms and when printing
pub const EPSILON: f64 = 1e-10;

/// Defensive cap on raw input length, applied before tokenization
pub(crate) const MAX_INPUT_LEN: usize = 256;

/// Largest exponent `parse` accepts; keeps degree sums in later
/// arithmetic far away from `u32` overflow
pub(crate) const MAX_DEGREE: u32 = 1_000;

/// Polynomial parse result: either a polynomial or an error
pub type PolyResult = Result<Poly, CalcError>;

/// Single-variable polynomial: a sparse map from degree to coefficient.
///
/// The ordered container makes descending-degree iteration a contract,
/// not an accident of key order. Entries with negligible coefficients may
/// remain stored after arithmetic; they are filtered out whenever a
/// leading term is selected and when the polynomial is displayed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Poly {
    coefs: BTreeMap<u32, f64>,
}

impl Poly {
    pub fn new() -> Self {
        Poly {
            coefs: BTreeMap::new(),
        }
    }

    /// Creates a degree-0 polynomial
    pub fn constant(c: f64) -> Self {
        let mut p = Poly::new();
        p.add_coef(0, c);
        p
    }

    /// Builds a polynomial from dense coefficients in descending-degree
    /// order, e.g. `[1.0, -5.0, 6.0]` is `x^2 - 5x + 6`
    pub fn from_coefs_desc(coefs: &[f64]) -> Self {
        let deg = coefs.len();
        let mut p = Poly::new();
        for (i, &c) in coefs.iter().enumerate() {
            p.add_coef((deg - 1 - i) as u32, c);
        }
        p
    }

    /// Returns the stored coefficient for a degree, 0 for absent entries
    pub fn coef(&self, deg: u32) -> f64 {
        *self.coefs.get(&deg).unwrap_or(&0.0)
    }

    /// Adds `c` to the coefficient at `deg`, creating the entry if needed
    pub fn add_coef(&mut self, deg: u32, c: f64) {
        *self.coefs.entry(deg).or_insert(0.0) += c;
    }

    /// The highest degree with a non-negligible coefficient.
    /// `None` means the polynomial is zero
    pub fn degree(&self) -> Option<u32> {
        self.coefs
            .iter()
            .rev()
            .find(|(_, c)| c.abs() > EPSILON)
            .map(|(&d, _)| d)
    }

    pub fn is_zero(&self) -> bool {
        self.degree().is_none()
    }

    /// All stored terms as (degree, coefficient) pairs in ascending degree
    /// order, negligible entries included
    pub fn terms(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.coefs.iter().map(|(&d, &c)| (d, c))
    }

    /// Evaluates the polynomial at `x`
    pub fn eval(&self, x: f64) -> f64 {
        self.coefs
            .iter()
            .map(|(&d, &c)| c * x.powi(d as i32))
            .sum()
    }

    /// Dense coefficients from the leading degree down to 0, the layout
    /// synthetic division works on. The zero polynomial yields an empty
    /// vector
    pub fn coefs_desc(&self) -> Vec<f64> {
        match self.degree() {
            Some(deg) => (0..=deg).rev().map(|d| self.coef(d)).collect(),
            None => Vec::new(),
        }
    }

    /// Parses a loosely formatted polynomial string, e.g. `3x^2 - x + 10`,
    /// `x^2+2x^2` (duplicate degrees accumulate), `-x`, `2.5x - 1`.
    ///
    /// Coefficient-variable adjacency is the accepted notation: `*` marks
    /// are dropped, whitespace is ignored. Any fragment that is not a
    /// constant, a linear term, or a power term fails with `InvalidTerm`
    /// naming the fragment.
    pub fn parse(text: &str) -> PolyResult {
        if text.len() > MAX_INPUT_LEN {
            return Err(CalcError::InputTooLong(text.len()));
        }

        let cleaned: String = text.chars().filter(|c| !c.is_whitespace() && *c != '*').collect();

        // rewrite "-" as "+-" so the string splits into signed terms
        let mut signed = cleaned.replace('-', "+-");
        if signed.starts_with("+-") {
            signed.remove(0);
        } else if signed.starts_with('+') {
            signed.remove(0);
        }

        let mut poly = Poly::new();
        for term in signed.split('+').filter(|t| !t.is_empty()) {
            let (deg, coef) = parse_term(term)?;
            poly.add_coef(deg, coef);
        }
        Ok(poly)
    }
}

// classifies one signed fragment into (degree, coefficient)
fn parse_term(term: &str) -> Result<(u32, f64), CalcError> {
    if !term.contains('x') {
        let val: f64 = term
            .parse()
            .map_err(|_| CalcError::InvalidTerm(term.to_string()))?;
        if !val.is_finite() {
            return Err(CalcError::InvalidTerm(term.to_string()));
        }
        return Ok((0, val));
    }

    if let Some(pos) = term.find("x^") {
        let exp = &term[pos + 2..];
        if exp.is_empty() || !exp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CalcError::InvalidTerm(term.to_string()));
        }
        let deg: u32 = exp
            .parse()
            .map_err(|_| CalcError::InvalidTerm(term.to_string()))?;
        if deg > MAX_DEGREE {
            return Err(CalcError::InvalidTerm(term.to_string()));
        }
        let coef = parse_coef(&term[..pos], term)?;
        return Ok((deg, coef));
    }

    // linear term: everything before the trailing 'x' is the coefficient
    match term.strip_suffix('x') {
        Some(coef_str) if !coef_str.contains('x') => Ok((1, parse_coef(coef_str, term)?)),
        _ => Err(CalcError::InvalidTerm(term.to_string())),
    }
}

// coefficient prefix of a variable term: empty and "+" mean 1, "-" means -1,
// otherwise a plain decimal number
fn parse_coef(coef_str: &str, term: &str) -> Result<f64, CalcError> {
    match coef_str {
        "" | "+" => Ok(1.0),
        "-" => Ok(-1.0),
        _ => {
            if !is_plain_number(coef_str) {
                return Err(CalcError::InvalidTerm(term.to_string()));
            }
            coef_str
                .parse()
                .map_err(|_| CalcError::InvalidTerm(term.to_string()))
        }
    }
}

// [sign] digits [. digits] - no exponent notation, no "inf"/"nan"
fn is_plain_number(s: &str) -> bool {
    let digits = s.strip_prefix('-').or_else(|| s.strip_prefix('+')).unwrap_or(s);
    !digits.is_empty()
        && digits.bytes().filter(|&b| b == b'.').count() <= 1
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && digits != "."
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut wrote = false;
        for (&deg, &c) in self.coefs.iter().rev() {
            if c.abs() <= EPSILON {
                continue;
            }
            let sign = if !wrote {
                if c < 0.0 { "-" } else { "" }
            } else if c < 0.0 {
                " - "
            } else {
                " + "
            };
            // rounded to 4 decimal places to hide float noise
            let mag = (c.abs() * 10000.0).round() / 10000.0;
            write!(f, "{}", sign)?;
            if deg == 0 {
                write!(f, "{}", mag)?;
            } else {
                if (mag - 1.0).abs() > EPSILON {
                    write!(f, "{}", mag)?;
                }
                if deg == 1 {
                    write!(f, "x")?;
                } else {
                    write!(f, "x^{}", deg)?;
                }
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}
