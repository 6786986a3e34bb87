//! The expression language of the command line.
//!
//! Atoms are interval literals in the same syntax the library prints
//! (`[1, 2]`, `(0, 4]`, `[1,)`, `(,)`, `empty`), bare numbers standing
//! for points, the constants `pi` and `e`, and the variable `x` under
//! the `roots` command.  Operators are `+ - * /`, integer powers with
//! `^`, and the named functions of the library.

use anyhow::{anyhow, bail, Context, Result};
use enclose_lib::{Error, Interval};
use std::iter::Peekable;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

#[derive(Clone, Copy, Debug)]
pub(crate) enum Func {
    Exp,
    Ln,
    Log2,
    Log10,
    Sqrt,
    Sin,
    Cos,
    Tan,
    Atan,
    Abs,
    Recip,
}

fn function(name: &str) -> Option<Func> {
    match name {
        "exp" => Some(Func::Exp),
        "ln" => Some(Func::Ln),
        "log2" => Some(Func::Log2),
        "log10" => Some(Func::Log10),
        "sqrt" => Some(Func::Sqrt),
        "sin" => Some(Func::Sin),
        "cos" => Some(Func::Cos),
        "tan" => Some(Func::Tan),
        "atan" => Some(Func::Atan),
        "abs" => Some(Func::Abs),
        "recip" => Some(Func::Recip),
        _ => None,
    }
}

#[derive(Debug)]
pub(crate) enum Expr {
    Literal(Interval<f64>),
    Var,
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, i32),
    Call(Func, Box<Expr>),
}

pub(crate) fn parse(input: &str) -> Result<Expr> {
    let mut parser = Parser {
        tokens: tokenize(input)?.into_iter().peekable(),
    };
    let expr = parser.expr()?;
    match parser.tokens.next() {
        None => Ok(expr),
        Some(tok) => bail!("trailing {tok:?} after the expression"),
    }
}

/// Evaluates with `x` bound to the given interval, if any.
pub(crate) fn eval(
    e: &Expr,
    x: Option<&Interval<f64>>,
) -> Result<Interval<f64>> {
    match e {
        Expr::Literal(i) => Ok(*i),
        Expr::Var => x.copied().ok_or_else(|| {
            anyhow!("the variable x only has a value under the roots command")
        }),
        Expr::Neg(a) => Ok(eval(a, x)?.neg()),
        Expr::Add(a, b) => Ok(eval(a, x)?.add(&eval(b, x)?)),
        Expr::Sub(a, b) => Ok(eval(a, x)?.sub(&eval(b, x)?)),
        Expr::Mul(a, b) => Ok(eval(a, x)?.mul(&eval(b, x)?)),
        Expr::Div(a, b) => Ok(eval(a, x)?.div(&eval(b, x)?)),
        Expr::Pow(a, n) => Ok(eval(a, x)?.pow_int(*n)),
        Expr::Call(f, a) => {
            let v = eval(a, x)?;
            Ok(match f {
                Func::Exp => v.exp(),
                Func::Ln => v.ln()?,
                Func::Log2 => v.log2()?,
                Func::Log10 => v.log10()?,
                Func::Sqrt => v.sqrt()?,
                Func::Sin => v.sin(),
                Func::Cos => v.cos(),
                Func::Tan => v.tan(),
                Func::Atan => v.atan(),
                Func::Abs => v.abs(),
                Func::Recip => v.reciprocal(),
            })
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut it = input.chars().peekable();
    while let Some(&c) = it.peek() {
        match c {
            c if c.is_whitespace() => {
                it.next();
            }
            '[' => {
                it.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                it.next();
                tokens.push(Token::RBracket);
            }
            '(' => {
                it.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                it.next();
                tokens.push(Token::RParen);
            }
            ',' => {
                it.next();
                tokens.push(Token::Comma);
            }
            '+' => {
                it.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                it.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                it.next();
                tokens.push(Token::Star);
            }
            '/' => {
                it.next();
                tokens.push(Token::Slash);
            }
            '^' => {
                it.next();
                tokens.push(Token::Caret);
            }
            '0'..='9' | '.' => tokens.push(number(&mut it)?),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&c) = it.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        it.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => bail!("unexpected character {other:?}"),
        }
    }
    Ok(tokens)
}

fn number(it: &mut Peekable<std::str::Chars>) -> Result<Token> {
    let mut text = String::new();
    while let Some(&c) = it.peek() {
        if c.is_ascii_digit() || c == '.' {
            text.push(c);
            it.next();
        } else if c == 'e' || c == 'E' {
            // Only an exponent when digits follow; a bare `e` after a
            // number is the constant (as in `2e`, a syntax error later).
            let mut ahead = it.clone();
            ahead.next();
            let mut signed = ahead.clone();
            let has_sign =
                matches!(signed.peek(), Some(&d) if d == '+' || d == '-');
            if has_sign {
                signed.next();
            }
            if !matches!(signed.peek(), Some(&d) if d.is_ascii_digit()) {
                break;
            }
            text.push(c);
            it.next();
            if has_sign {
                if let Some(&s) = it.peek() {
                    text.push(s);
                    it.next();
                }
            }
        } else {
            break;
        }
    }
    text.parse::<f64>()
        .map(Token::Number)
        .map_err(|e| anyhow!("cannot read {text:?} as a number: {e}"))
}

fn build_interval(
    lower: Option<f64>,
    lower_closed: bool,
    upper: Option<f64>,
    upper_closed: bool,
) -> Result<Interval<f64>, Error> {
    match (lower, upper) {
        (Some(lo), Some(hi)) => match (lower_closed, upper_closed) {
            (true, true) => Interval::closed(lo, hi),
            (true, false) => Interval::closed_open(lo, hi),
            (false, true) => Interval::open_closed(lo, hi),
            (false, false) => Interval::open(lo, hi),
        },
        (Some(lo), None) => {
            if lower_closed {
                Interval::unbounded_above(lo)
            } else {
                Interval::unbounded_above_open(lo)
            }
        }
        (None, Some(hi)) => {
            if upper_closed {
                Interval::unbounded_below(hi)
            } else {
                Interval::unbounded_below_open(hi)
            }
        }
        (None, None) => Ok(Interval::universe()),
    }
}

struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
}

impl Parser {
    fn expect(&mut self, t: &Token, what: &str) -> Result<()> {
        match self.tokens.next() {
            Some(tok) if tok == *t => Ok(()),
            other => bail!("expected {what}, found {other:?}"),
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        let mut lhs = self.term()?;
        loop {
            match self.tokens.peek() {
                Some(Token::Plus) => {
                    self.tokens.next();
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.tokens.next();
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                Some(_) | None => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        loop {
            match self.tokens.peek() {
                Some(Token::Star) => {
                    self.tokens.next();
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Slash) => {
                    self.tokens.next();
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(_) | None => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr> {
        if matches!(self.tokens.peek(), Some(Token::Minus)) {
            self.tokens.next();
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.atom()?;
        if matches!(self.tokens.peek(), Some(Token::Caret)) {
            self.tokens.next();
            let n = self.exponent()?;
            return Ok(Expr::Pow(Box::new(base), n));
        }
        Ok(base)
    }

    fn exponent(&mut self) -> Result<i32> {
        let negative = matches!(self.tokens.peek(), Some(Token::Minus));
        if negative {
            self.tokens.next();
        }
        match self.tokens.next() {
            Some(Token::Number(v))
                if v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX) =>
            {
                let n = v as i32;
                Ok(if negative { -n } else { n })
            }
            other => bail!("^ needs an integer exponent, found {other:?}"),
        }
    }

    fn atom(&mut self) -> Result<Expr> {
        match self.tokens.next() {
            Some(Token::Number(v)) => Ok(Expr::Literal(Interval::point(v)?)),
            Some(Token::Ident(name)) => {
                if let Some(f) = function(&name) {
                    self.expect(&Token::LParen, "( after a function name")?;
                    let arg = self.expr()?;
                    self.expect(&Token::RParen, ") after the argument")?;
                    return Ok(Expr::Call(f, Box::new(arg)));
                }
                match name.as_str() {
                    "x" => Ok(Expr::Var),
                    "pi" => Ok(Expr::Literal(Interval::point(
                        std::f64::consts::PI,
                    )?)),
                    "e" => Ok(Expr::Literal(Interval::point(
                        std::f64::consts::E,
                    )?)),
                    "empty" => Ok(Expr::Literal(Interval::empty())),
                    other => bail!("unknown name {other:?}"),
                }
            }
            Some(Token::LBracket) => {
                let lower = if matches!(self.tokens.peek(), Some(Token::Comma))
                {
                    None
                } else {
                    Some(self.constant()?)
                };
                self.interval(lower, true)
            }
            Some(Token::LParen) => {
                if matches!(self.tokens.peek(), Some(Token::Comma)) {
                    return self.interval(None, false);
                }
                let inner = self.expr()?;
                match self.tokens.peek() {
                    Some(Token::RParen) => {
                        self.tokens.next();
                        Ok(inner)
                    }
                    // `(a, b]` style literal: the part before the comma
                    // must boil down to a single value.
                    Some(Token::Comma) => {
                        let lo = Self::single_value(&inner)?;
                        self.interval(Some(lo), false)
                    }
                    other => {
                        bail!("expected ) or , in parentheses, found {other:?}")
                    }
                }
            }
            other => bail!("unexpected {other:?} at the start of a value"),
        }
    }

    /// The rest of an interval literal, from the comma on.
    fn interval(
        &mut self,
        lower: Option<f64>,
        lower_closed: bool,
    ) -> Result<Expr> {
        self.expect(&Token::Comma, ", inside an interval literal")?;
        let upper = if matches!(
            self.tokens.peek(),
            Some(Token::RBracket) | Some(Token::RParen)
        ) {
            None
        } else {
            Some(self.constant()?)
        };
        let upper_closed = match self.tokens.next() {
            Some(Token::RBracket) => true,
            Some(Token::RParen) => false,
            other => bail!("expected ] or ) closing an interval, found {other:?}"),
        };
        Ok(Expr::Literal(build_interval(
            lower,
            lower_closed,
            upper,
            upper_closed,
        )?))
    }

    /// A bound inside an interval literal: any constant sub-expression
    /// that evaluates to a single point, like `-1`, `pi` or `2*pi`.
    fn constant(&mut self) -> Result<f64> {
        let e = self.expr()?;
        Self::single_value(&e)
    }

    fn single_value(e: &Expr) -> Result<f64> {
        let v = eval(e, None)?;
        if v.is_point() {
            v.lower().context("interval bound is not a value")
        } else {
            bail!("interval bounds must be single numbers, not {v}")
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn run(input: &str) -> Interval<f64> {
        eval(&parse(input).unwrap(), None).unwrap()
    }

    #[test]
    fn test_literals() {
        assert_eq!(run("[1, 2]"), Interval::closed(1.0, 2.0).unwrap());
        assert_eq!(run("(0, 4]"), Interval::open_closed(0.0, 4.0).unwrap());
        assert_eq!(run("[1,)"), Interval::unbounded_above(1.0).unwrap());
        assert_eq!(run("(, 4)"), Interval::unbounded_below_open(4.0).unwrap());
        assert_eq!(run("(,)"), Interval::universe());
        assert_eq!(run("empty"), Interval::empty());
        assert_eq!(run("2.5"), Interval::point(2.5).unwrap());
        assert_eq!(run("[-2, 3]"), Interval::closed(-2.0, 3.0).unwrap());
        assert_eq!(run("1e3"), Interval::point(1000.0).unwrap());
        assert_eq!(
            run("[pi, 2*pi]"),
            Interval::closed(
                std::f64::consts::PI,
                2.0 * std::f64::consts::PI
            )
            .unwrap()
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            run("[1, 2] + [3, 4]"),
            Interval::closed(4.0, 6.0).unwrap()
        );
        assert_eq!(
            run("[1, 2] * [3, 4] - [1, 1]"),
            Interval::closed(2.0, 7.0).unwrap()
        );
        assert_eq!(run("-[1, 2]"), Interval::closed(-2.0, -1.0).unwrap());
        assert_eq!(run("[2, 3]^2"), Interval::closed(4.0, 9.0).unwrap());
        assert_eq!(run("[2, 4]^-1"), Interval::closed(0.25, 0.5).unwrap());
        assert_eq!(run("[1, 1] / (0, 4]").lower(), Some(0.25));
        // Precedence: * binds tighter than +.
        assert_eq!(
            run("1 + 2 * 3"),
            Interval::point(7.0).unwrap()
        );
        assert_eq!(
            run("(1 + 2) * 3"),
            Interval::point(9.0).unwrap()
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            run("sqrt([-4, 9])"),
            Interval::closed(0.0, 3.0).unwrap()
        );
        assert_eq!(
            run("abs([-3, 2])"),
            Interval::closed(0.0, 3.0).unwrap()
        );
        assert!(run("sin([0, 7])").contains(1.0));
        assert!(run("exp(0)").contains(1.0));
    }

    #[test]
    fn test_errors() {
        assert!(parse("[1, ").is_err());
        assert!(parse("[2, 1]").is_err());
        assert!(parse("1 +").is_err());
        assert!(parse("sqrt 2").is_err());
        assert!(parse("[1, 2] [3, 4]").is_err());
        assert!(parse("nope(1)").is_err());
        assert!(parse("[1, 2]^0.5").is_err());
        // x only has a meaning when a domain is supplied.
        let e = parse("x + [1, 1]").unwrap();
        assert!(eval(&e, None).is_err());
        assert!(eval(&e, Some(&Interval::closed(0.0, 1.0).unwrap())).is_ok());
        // ln of an entirely non-positive interval.
        assert!(eval(&parse("ln([-3, -2])").unwrap(), None).is_err());
    }
}
