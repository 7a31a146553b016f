use std::fmt;

#[derive(Clone, PartialEq)]
pub enum CalcError {
    InvalidTerm(String),
    InvalidNumber(String),
    InputTooLong(usize),

    DividedByZero,
    NotFinite(String),

    EmptyValue,
    EmptyExpression,
    InvalidOp(String),
    TooManyOps,
    InsufficientOps,
    ClosingBracketMismatch,
    UnknownIdent(String),

    ParseFailed(String),

    Unreachable,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::InvalidTerm(s) => write!(f, "'{}' is not a valid polynomial term", s),
            CalcError::InvalidNumber(s) => write!(f, "Failed to convert '{}' to a number", s),
            CalcError::InputTooLong(l) => write!(f, "Input of {} characters exceeds the allowed length", l),

            CalcError::DividedByZero => write!(f, "Divisor is the zero polynomial"),
            CalcError::NotFinite(s) => write!(f, "'{}' did not evaluate to a finite number", s),

            CalcError::EmptyValue => write!(f, "Nor value neither operator found"),
            CalcError::EmptyExpression => write!(f, "Nothing to calculate"),
            CalcError::InvalidOp(s) => write!(f, "Invalid operator '{}'", s),
            CalcError::TooManyOps => write!(f, "Too many operators"),
            CalcError::InsufficientOps => write!(f, "Too many numbers"),
            CalcError::ClosingBracketMismatch => write!(f, "Mismatched closing bracket"),
            CalcError::UnknownIdent(s) => write!(f, "Unknown name '{}'", s),

            CalcError::ParseFailed(s) => write!(f, "Failed to parse expression: {}", s),

            CalcError::Unreachable => write!(f, "unreachable"),
        }
    }
}

impl fmt::Debug for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::InvalidTerm(s) => write!(f, "'{}' is not a valid polynomial term", s),
            CalcError::InvalidNumber(s) => write!(f, "Failed to convert '{}' to a number", s),
            CalcError::InputTooLong(l) => write!(f, "Input of {} characters exceeds the allowed length", l),

            CalcError::DividedByZero => write!(f, "Divisor is the zero polynomial"),
            CalcError::NotFinite(s) => write!(f, "'{}' did not evaluate to a finite number", s),

            CalcError::EmptyValue => write!(f, "Nor value neither operator found"),
            CalcError::EmptyExpression => write!(f, "Nothing to calculate"),
            CalcError::InvalidOp(s) => write!(f, "Invalid operator '{}'", s),
            CalcError::TooManyOps => write!(f, "Too many operators"),
            CalcError::InsufficientOps => write!(f, "Too many numbers"),
            CalcError::ClosingBracketMismatch => write!(f, "Mismatched closing bracket"),
            CalcError::UnknownIdent(s) => write!(f, "Unknown name '{}'", s),

            CalcError::ParseFailed(s) => write!(f, "Failed to parse expression: {}", s),

            CalcError::Unreachable => write!(f, "unreachable"),
        }
    }
}
