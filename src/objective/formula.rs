//! Formula compiler.
//!
//! Turns formula text such as `"(1 - x)^2 + 100*(y - x^2)^2"` into an
//! [`Objective`] by recursive descent.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/' | '%') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | name | name '(' sum (',' sum)* ')' | '(' sum ')'
//! ```
//!
//! `^` is right associative and binds tighter than unary minus, so
//! `-x^2` is `-(x^2)` and `2^-1` is `0.5`.

use super::{normalize, Objective};
use crate::error::CompileError;

/// A compiled formula over the variables `x` (component 0) and `y`
/// (component 1).
///
/// Evaluating at a point that lacks a referenced component yields `+inf`.
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    root: Expr,
    arity: usize,
}

impl Formula {
    /// Compiles `source`.
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(CompileError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let root = parser.sum()?;
        if let Some(tok) = parser.peek() {
            return Err(CompileError::UnexpectedToken {
                found: tok.kind.to_string(),
                offset: tok.offset,
            });
        }
        let arity = root.arity();
        Ok(Self {
            source: source.to_string(),
            root,
            arity,
        })
    }

    /// The formula text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// One past the highest component index the formula reads.
    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl Objective for Formula {
    fn evaluate(&self, x: &[f64]) -> f64 {
        if x.len() < self.arity {
            return f64::INFINITY;
        }
        normalize(self.root.eval(x))
    }
}

impl std::str::FromStr for Formula {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Formula::compile(s)
    }
}

// ---------------------------------------------------------------------------
// Syntax tree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Func {
    Sin,
    Cos,
    Tan,
    Ln,
    Sqrt,
    Abs,
    Exp,
    Pow,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "log" | "ln" => Func::Ln,
            "sqrt" => Func::Sqrt,
            "abs" => Func::Abs,
            "exp" => Func::Exp,
            "pow" => Func::Pow,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Ln => "log",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Exp => "exp",
            Func::Pow => "pow",
        }
    }

    fn arity(self) -> usize {
        match self {
            Func::Pow => 2,
            _ => 1,
        }
    }

    fn apply(self, args: &[f64]) -> f64 {
        let a = args[0];
        match self {
            Func::Sin => a.sin(),
            Func::Cos => a.cos(),
            Func::Tan => a.tan(),
            Func::Ln => a.ln(),
            Func::Sqrt => a.sqrt(),
            Func::Abs => a.abs(),
            Func::Exp => a.exp(),
            Func::Pow => a.powf(args[1]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Const(f64),
    Var(usize),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    Call(Func, Vec<Expr>),
}

impl Expr {
    fn eval(&self, x: &[f64]) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Var(i) => x[*i],
            Expr::Neg(e) => -e.eval(x),
            Expr::Binary(op, l, r) => {
                let (l, r) = (l.eval(x), r.eval(x));
                match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Rem => l % r,
                    BinOp::Pow => l.powf(r),
                }
            }
            Expr::Call(f, args) => {
                let values: Vec<f64> = args.iter().map(|a| a.eval(x)).collect();
                f.apply(&values)
            }
        }
    }

    fn arity(&self) -> usize {
        match self {
            Expr::Const(_) => 0,
            Expr::Var(i) => i + 1,
            Expr::Neg(e) => e.arity(),
            Expr::Binary(_, l, r) => l.arity().max(r.arity()),
            Expr::Call(_, args) => args.iter().map(Expr::arity).max().unwrap_or(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Number(f64),
    Ident(String),
    Op(BinOp),
    LParen,
    RParen,
    Comma,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::Ident(s) => f.write_str(s),
            TokenKind::Op(op) => f.write_str(match op {
                BinOp::Add => "+",
                BinOp::Sub => "-",
                BinOp::Mul => "*",
                BinOp::Div => "/",
                BinOp::Rem => "%",
                BinOp::Pow => "^",
            }),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        let kind = match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let text = &source[start..i];
                let value = text.parse::<f64>().map_err(|_| CompileError::UnexpectedToken {
                    found: text.to_string(),
                    offset: start,
                })?;
                TokenKind::Number(value)
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                TokenKind::Ident(source[start..i].to_string())
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                TokenKind::Op(BinOp::Pow)
            }
            _ => {
                i += 1;
                match c {
                    b'+' => TokenKind::Op(BinOp::Add),
                    b'-' => TokenKind::Op(BinOp::Sub),
                    b'*' => TokenKind::Op(BinOp::Mul),
                    b'/' => TokenKind::Op(BinOp::Div),
                    b'%' => TokenKind::Op(BinOp::Rem),
                    b'^' => TokenKind::Op(BinOp::Pow),
                    b'(' => TokenKind::LParen,
                    b')' => TokenKind::RParen,
                    b',' => TokenKind::Comma,
                    _ => {
                        let ch = source[start..].chars().next().unwrap_or('?');
                        return Err(CompileError::UnexpectedChar { ch, offset: start });
                    }
                }
            }
        };
        tokens.push(Token {
            kind,
            offset: start,
        });
    }

    Ok(tokens)
}

/// Returns the end of the number literal starting at `i`.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Result<Token, CompileError> {
        let tok = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(CompileError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(tok)
    }

    fn eat_op(&mut self, ops: &[BinOp]) -> Option<BinOp> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Op(op),
                ..
            }) if ops.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), CompileError> {
        let tok = self.next()?;
        if tok.kind == kind {
            Ok(())
        } else {
            Err(CompileError::UnexpectedToken {
                found: tok.kind.to_string(),
                offset: tok.offset,
            })
        }
    }

    fn sum(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.product()?;
        while let Some(op) = self.eat_op(&[BinOp::Add, BinOp::Sub]) {
            let rhs = self.product()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn product(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.eat_op(&[BinOp::Mul, BinOp::Div, BinOp::Rem]) {
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CompileError> {
        match self.eat_op(&[BinOp::Sub, BinOp::Add]) {
            Some(BinOp::Sub) => Ok(Expr::Neg(Box::new(self.unary()?))),
            Some(_) => self.unary(),
            None => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, CompileError> {
        let base = self.primary()?;
        if self.eat_op(&[BinOp::Pow]).is_some() {
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, CompileError> {
        let tok = self.next()?;
        match tok.kind {
            TokenKind::Number(n) => Ok(Expr::Const(n)),
            TokenKind::LParen => {
                let inner = self.sum()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Ident(name) => {
                if matches!(self.peek(), Some(t) if t.kind == TokenKind::LParen) {
                    self.pos += 1;
                    self.call(name, tok.offset)
                } else {
                    variable(&name, tok.offset)
                }
            }
            other => Err(CompileError::UnexpectedToken {
                found: other.to_string(),
                offset: tok.offset,
            }),
        }
    }

    /// Parses the argument list of `name(`, the opening paren already consumed.
    fn call(&mut self, name: String, offset: usize) -> Result<Expr, CompileError> {
        let func = Func::lookup(&name).ok_or(CompileError::UnknownFunction { name, offset })?;

        let mut args = vec![self.sum()?];
        loop {
            let tok = self.next()?;
            match tok.kind {
                TokenKind::Comma => args.push(self.sum()?),
                TokenKind::RParen => break,
                other => {
                    return Err(CompileError::UnexpectedToken {
                        found: other.to_string(),
                        offset: tok.offset,
                    })
                }
            }
        }

        if args.len() != func.arity() {
            return Err(CompileError::Arity {
                name: func.name(),
                expected: func.arity(),
                got: args.len(),
            });
        }
        Ok(Expr::Call(func, args))
    }
}

fn variable(name: &str, offset: usize) -> Result<Expr, CompileError> {
    match name {
        "x" => Ok(Expr::Var(0)),
        "y" => Ok(Expr::Var(1)),
        "PI" | "pi" => Ok(Expr::Const(std::f64::consts::PI)),
        "E" => Ok(Expr::Const(std::f64::consts::E)),
        _ => Err(CompileError::UnknownIdentifier {
            name: name.to_string(),
            offset,
        }),
    }
}
