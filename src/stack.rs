use crate::errors::*;

use lazy_static::lazy_static;

/// Expression evaluation result: either a number or an error
pub type CalcResult = Result<f64, CalcError>;
pub(crate) type CalcErrorResult = Result<(), CalcError>;

#[derive(Clone, Debug)]
pub(crate) enum Entry {
    Val(f64),
    Op(String, i32, bool),
    OpenB,
    Func(String),
}

pub(crate) struct Stack {
    queue: Vec<Entry>,
    output: Vec<Entry>,
    values: Vec<f64>,
}

pub(crate) const UNARY_MINUS: &str = "---";

lazy_static! {
    pub(crate) static ref STD_FUNCS: Vec<&'static str> = [
        "sqrt", "cbrt", "exp", "ln", "log", "abs", "signum", "round", "ceil", "trunc", "floor",
        "sin", "cos", "tan", "asin", "acos", "atan",
    ]
    .to_vec();
}

macro_rules! one_arg_op {
    ($id:ident) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.is_empty() {
                return Err(CalcError::TooManyOps);
            }

            // non-empty - unwrap is fine
            let v = self.values.pop().unwrap();
            self.values.push(v.$id());
            Ok(())
        }
    };
}
macro_rules! two_arg_op {
    ($id:ident, $op:tt) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.len() < 2 {
                return Err(CalcError::TooManyOps);
            }

            let v2 = self.values.pop().unwrap();
            let v1 = self.values.pop().unwrap();
            self.values.push(v1 $op v2);
            Ok(())
        }
    };
}

impl Stack {
    fn priority(op: &str) -> (i32, bool) {
        match op {
            UNARY_MINUS => (20, true),  // negate
            "**" | "^" => (17, true),   // power
            "*" | "/" => (12, false),   // mult, div
            "+" | "-" => (8, false),    // add, sub
            _ => (0, false),            // invalid op
        }
    }

    pub(crate) fn is_func(s: &str) -> bool {
        for fname in STD_FUNCS.iter() {
            if *fname == s {
                return true;
            }
        }
        false
    }

    // move operators from the queue to output while the top operator in the
    // queue has equal or greater priority
    fn pop_while_priority(&mut self, priority: i32) {
        loop {
            if self.queue.is_empty() {
                return;
            }
            // queue is not empty, so unwrap is OK
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::OpenB => {
                    self.queue.push(e);
                    return;
                }
                Entry::Func(..) => {
                    self.output.push(e);
                }
                Entry::Op(_, p, right) => {
                    if *p > priority || (*p == priority && !*right) {
                        self.output.push(e);
                    } else {
                        self.queue.push(e);
                        return;
                    }
                }
                _ => return, // unreachable
            }
        }
    }

    // move operators from the queue to output until the first open bracket
    fn pop_until_bracket(&mut self) -> CalcErrorResult {
        loop {
            if self.queue.is_empty() {
                return Err(CalcError::ClosingBracketMismatch);
            }

            // unwrap is ok - vector is not empty
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::Val(..) | Entry::Op(..) | Entry::Func(..) => self.output.push(e),
                Entry::OpenB => return Ok(()),
            }
        }
    }

    // move all operators from queue to output
    // Must be called only after the expression ends.
    fn pop_all(&mut self) -> CalcErrorResult {
        while let Some(v) = self.queue.pop() {
            match &v {
                Entry::OpenB => {} // do nothing - allows to omit last closing brackets
                Entry::Op(..) => self.output.push(v),
                Entry::Func(..) => self.output.push(v),
                _ => return Err(CalcError::Unreachable),
            }
        }
        Ok(())
    }

    // ------------ PUBLIC -----------------

    pub(crate) fn new() -> Self {
        Stack {
            queue: Vec::new(),
            output: Vec::new(),
            values: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, op: &str, val: Option<f64>) -> CalcErrorResult {
        if op.is_empty() {
            if let Some(v) = val {
                self.output.push(Entry::Val(v))
            } else {
                return Err(CalcError::EmptyValue);
            }
            return Ok(());
        }

        if Stack::is_func(op) {
            self.queue.push(Entry::Func(op.to_owned()));
            return Ok(());
        }

        if op == "(" {
            self.queue.push(Entry::OpenB);
            return Ok(());
        }

        if op == ")" {
            return self.pop_until_bracket();
        }

        let (pri, right_assoc) = Stack::priority(op);
        if pri == 0 {
            return Err(CalcError::InvalidOp(op.to_owned()));
        }

        self.pop_while_priority(pri);
        self.queue.push(Entry::Op(op.to_owned(), pri, right_assoc));

        Ok(())
    }

    pub(crate) fn calculate(&mut self) -> CalcResult {
        self.pop_all()?;
        if self.output.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        self.values = Vec::new();

        for i in 0..self.output.len() {
            let o = self.output[i].clone();
            match o {
                Entry::Val(v) => {
                    self.values.push(v);
                }
                Entry::Op(op, ..) => {
                    self.process_operator(&op)?;
                }
                Entry::Func(fname) => {
                    self.process_function(&fname)?;
                }
                _ => return Err(CalcError::Unreachable),
            }
        }

        if self.values.len() != 1 {
            return Err(CalcError::InsufficientOps);
        }

        // values is never empty after calculation - unwrap is fine
        Ok(self.values.pop().unwrap())
    }

    fn process_operator(&mut self, op: &str) -> CalcErrorResult {
        match op {
            "/" => self.divide(),
            "*" => self.multiply(),
            "+" => self.addition(),
            "-" => self.subtract(),
            "**" | "^" => self.power(),
            UNARY_MINUS => self.negate(),
            _ => Err(CalcError::InvalidOp(op.to_string())),
        }
    }

    fn process_function(&mut self, fname: &str) -> CalcErrorResult {
        match fname {
            "sin" => self.sin(),
            "cos" => self.cos(),
            "tan" => self.tan(),
            "asin" => self.asin(),
            "acos" => self.acos(),
            "atan" => self.atan(),
            "ln" | "log" => self.ln(),
            "exp" => self.exp(),
            "round" => self.round(),
            "ceil" => self.ceil(),
            "floor" => self.floor(),
            "trunc" => self.trunc(),
            "abs" => self.abs(),
            "signum" => self.signum(),
            "sqrt" => self.sqrt(),
            "cbrt" => self.cbrt(),
            _ => Err(CalcError::InvalidOp(fname.to_string())),
        }
    }

    fn negate(&mut self) -> CalcErrorResult {
        if self.values.is_empty() {
            return Err(CalcError::TooManyOps);
        }

        // non-empty - unwrap is fine
        let v = self.values.pop().unwrap();
        self.values.push(-v);
        Ok(())
    }

    fn power(&mut self) -> CalcErrorResult {
        if self.values.len() < 2 {
            return Err(CalcError::TooManyOps);
        }

        let v2 = self.values.pop().unwrap();
        let v1 = self.values.pop().unwrap();
        self.values.push(v1.powf(v2));
        Ok(())
    }

    two_arg_op!(addition, +);
    two_arg_op!(subtract, -);
    two_arg_op!(multiply, *);
    two_arg_op!(divide, /);

    one_arg_op!(sin);
    one_arg_op!(cos);
    one_arg_op!(tan);
    one_arg_op!(asin);
    one_arg_op!(acos);
    one_arg_op!(atan);

    one_arg_op!(abs);
    one_arg_op!(floor);
    one_arg_op!(ceil);
    one_arg_op!(round);
    one_arg_op!(trunc);
    one_arg_op!(sqrt);
    one_arg_op!(cbrt);
    one_arg_op!(exp);
    one_arg_op!(ln);
    one_arg_op!(signum);
}

#[cfg(test)]
mod tests {
    use super::*;

    // feeds a pre-tokenized sequence into the stack
    fn run(tokens: &[(&str, Option<f64>)]) -> CalcResult {
        let mut stk = Stack::new();
        for (op, val) in tokens {
            stk.push(op, *val)?;
        }
        stk.calculate()
    }

    #[test]
    fn test_priorities() {
        // 2 + 3 * 4
        let v = run(&[
            ("", Some(2.0)),
            ("+", None),
            ("", Some(3.0)),
            ("*", None),
            ("", Some(4.0)),
        ]);
        assert_eq!(v, Ok(14.0));

        // 2 ^ 3 ^ 2 is right associative: 2 ^ 9
        let v = run(&[
            ("", Some(2.0)),
            ("^", None),
            ("", Some(3.0)),
            ("^", None),
            ("", Some(2.0)),
        ]);
        assert_eq!(v, Ok(512.0));

        // unary minus binds tighter than power: -2 ^ 2 is (-2) ^ 2
        let v = run(&[
            (UNARY_MINUS, None),
            ("", Some(2.0)),
            ("^", None),
            ("", Some(2.0)),
        ]);
        assert_eq!(v, Ok(4.0));
    }

    #[test]
    fn test_brackets_and_funcs() {
        // (2 + 3) * 4
        let v = run(&[
            ("(", None),
            ("", Some(2.0)),
            ("+", None),
            ("", Some(3.0)),
            (")", None),
            ("*", None),
            ("", Some(4.0)),
        ]);
        assert_eq!(v, Ok(20.0));

        // sqrt(9) + 1
        let v = run(&[
            ("sqrt", None),
            ("(", None),
            ("", Some(9.0)),
            (")", None),
            ("+", None),
            ("", Some(1.0)),
        ]);
        assert_eq!(v, Ok(4.0));

        // trailing closing bracket may be omitted: sqrt(16
        let v = run(&[("sqrt", None), ("(", None), ("", Some(16.0))]);
        assert_eq!(v, Ok(4.0));
    }

    #[test]
    fn test_stack_errors() {
        let v = run(&[("", Some(1.0)), ("+", None)]);
        assert_eq!(v, Err(CalcError::TooManyOps));

        let v = run(&[("", Some(1.0)), ("", Some(2.0))]);
        assert_eq!(v, Err(CalcError::InsufficientOps));

        let v = run(&[("", Some(1.0)), (")", None)]);
        assert_eq!(v, Err(CalcError::ClosingBracketMismatch));

        let v = run(&[]);
        assert_eq!(v, Err(CalcError::EmptyExpression));

        let v = run(&[("", None)]);
        assert_eq!(v, Err(CalcError::EmptyValue));
    }
}
