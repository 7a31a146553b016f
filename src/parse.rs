use pest::Parser;
use std::f64::consts::{E, PI};

use crate::errors::*;
use crate::poly::MAX_INPUT_LEN;
use crate::stack::{CalcResult, Stack, UNARY_MINUS};

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

/// evaluates a one-variable arithmetic expression at the point `x` and
/// returns either the value or an error.
///
/// Accepted notation mirrors the keypad input of the calculator UI:
/// `+ - * / ^` (also `**` for power), brackets, the fixed function set
/// (`sin`, `cos`, `tan`, `sqrt`, `ln`, ...), the constants `pi` and `e`,
/// and implicit multiplication (`2x`, `(x+1)(x-1)`, `3sin(x)`)
pub fn eval_at(expr: &str, x: f64) -> CalcResult {
    if expr.len() > MAX_INPUT_LEN {
        return Err(CalcError::InputTooLong(expr.len()));
    }

    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        Err(..) => return Err(CalcError::ParseFailed("invalid expression".to_string())),
    };

    let mut is_last_value = false;
    let mut is_last_func = false;

    let mut stk = Stack::new();
    for pair in pairs {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str().to_lowercase();
        match rule {
            Rule::int | Rule::float => {
                let v: f64 = match val.parse() {
                    Ok(v) => v,
                    Err(..) => return Err(CalcError::InvalidNumber(val)),
                };
                push_value(&mut stk, v, is_last_value, is_last_func)?;
                is_last_value = true;
                is_last_func = false;
            }
            Rule::open_b => {
                if is_last_value {
                    stk.push("*", None)?;
                }
                stk.push("(", None)?;
                is_last_value = false;
                is_last_func = false;
            }
            Rule::close_b => {
                stk.push(")", None)?;
                is_last_value = true;
                is_last_func = false;
            }
            Rule::operator => {
                if val == "+" && !is_last_value {
                    // unary plus is a no-op
                } else if val == "-" && !is_last_value {
                    stk.push(UNARY_MINUS, None)?;
                } else {
                    stk.push(&val, None)?;
                }
                is_last_value = false;
                is_last_func = false;
            }
            Rule::ident => {
                if Stack::is_func(&val) {
                    if is_last_value {
                        stk.push("*", None)?;
                    }
                    stk.push(&val, None)?;
                    is_last_value = false;
                    is_last_func = true;
                } else {
                    let v = match val.as_str() {
                        "x" => x,
                        "pi" => PI,
                        "e" => E,
                        _ => return Err(CalcError::UnknownIdent(val)),
                    };
                    push_value(&mut stk, v, is_last_value, is_last_func)?;
                    is_last_value = true;
                    is_last_func = false;
                }
            }
            Rule::EOI => {}
            _ => return Err(CalcError::Unreachable),
        }
    }
    stk.calculate()
}

// a value right after a function name gets wrapped in brackets so that
// `sin 2 + 1` applies the function to 2 only; a value right after another
// value gets an implicit multiplication sign
fn push_value(stk: &mut Stack, v: f64, is_last_value: bool, is_last_func: bool) -> Result<(), CalcError> {
    if is_last_func {
        stk.push("(", None)?;
    } else if is_last_value {
        stk.push("*", None)?;
    }
    stk.push("", Some(v))?;
    if is_last_func {
        stk.push(")", None)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_expr() {
        let v = eval_at("2+3", 0.0);
        assert_eq!(v, Ok(5.0));
        let v = eval_at("(3+2)(4-9)", 0.0);
        assert_eq!(v, Ok(-25.0));
        let v = eval_at("2^3^2", 0.0);
        assert_eq!(v, Ok(512.0));
        let v = eval_at("10 - 2*3", 0.0);
        assert_eq!(v, Ok(4.0));
        let v = eval_at("x^2 - 4", 3.0);
        assert_eq!(v, Ok(5.0));
        let v = eval_at("2x + 1", 4.0);
        assert_eq!(v, Ok(9.0));
        let v = eval_at("(x+1)(x-1)", 5.0);
        assert_eq!(v, Ok(24.0));
        let v = eval_at("-x", 2.5);
        assert_eq!(v, Ok(-2.5));
        let v = eval_at("x**2", 3.0);
        assert_eq!(v, Ok(9.0));
    }

    #[test]
    fn test_functions_and_constants() {
        assert!(close(eval_at("sin(pi/2)", 0.0).unwrap(), 1.0));
        assert!(close(eval_at("ln(e)", 0.0).unwrap(), 1.0));
        assert!(close(eval_at("log(e)", 0.0).unwrap(), 1.0));
        assert!(close(eval_at("sqrt(x)", 16.0).unwrap(), 4.0));
        assert!(close(eval_at("2sin(x)", PI / 2.0).unwrap(), 2.0));
        assert!(close(eval_at("sin cos 0", 0.0).unwrap(), 1.0f64.sin()));
        assert!(close(eval_at("abs(-3) + cbrt(27)", 0.0).unwrap(), 6.0));
    }

    #[test]
    fn test_eval_errors() {
        assert_eq!(
            eval_at("2 + y", 0.0),
            Err(CalcError::UnknownIdent("y".to_string()))
        );
        assert_eq!(
            eval_at("2 + #", 0.0),
            Err(CalcError::ParseFailed("invalid expression".to_string()))
        );
        assert_eq!(eval_at("2 +", 0.0), Err(CalcError::TooManyOps));
        assert_eq!(eval_at("", 0.0), Err(CalcError::EmptyExpression));
        let long = "1+".repeat(200);
        assert_eq!(eval_at(&long, 0.0), Err(CalcError::InputTooLong(400)));
    }

    #[test]
    fn test_non_finite_values_flow() {
        // the caller classifies infinities; evaluation itself must not fail
        let v = eval_at("1/x", 0.0).unwrap();
        assert!(v.is_infinite());
    }
}
