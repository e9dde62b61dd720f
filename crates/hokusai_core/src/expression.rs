//! Parameter expressions used by conditions and assignments.
//!
//! The grammar is deliberately small: literals, identifiers, unary `!` and
//! `-`, the usual arithmetic, comparison and logical operators, and
//! parentheses. Statements assign to a parameter with `=`, `+=`, `-=`, `*=` or
//! `/=` and are separated by `,` or `;`.

use crate::{ParamStore, Value};
use hokusai_error::{ExpressionError, ExpressionErrorKind, HokusaiResult};
use logos::Logos;
use std::cmp::Ordering;
use std::fmt::Display;

fn unquote(slice: &str) -> String {
    slice[1..slice.len() - 1].to_string()
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum Token {
    #[token("true", |_| true)]
    #[token("True", |_| true)]
    #[token("TRUE", |_| true)]
    #[token("false", |_| false)]
    #[token("False", |_| false)]
    #[token("FALSE", |_| false)]
    Bool(bool),
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),
    #[regex(r"[0-9]*\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),
    #[regex(r#""[^"]*""#, |lex| unquote(lex.slice()))]
    #[regex(r"'[^']*'", |lex| unquote(lex.slice()))]
    Str(String),
    /// Parameter name; dots allowed after the first character (`flag.seen`).
    #[regex(r"[\p{L}_][\p{L}\p{N}_.]*", |lex| lex.slice().to_string())]
    Ident(String),
    #[token("||")]
    Or,
    #[token("&&")]
    And,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    #[token(";")]
    Separator,
}

fn syntax(source: &str, offset: usize, message: impl Into<String>) -> ExpressionError {
    ExpressionError::new(ExpressionErrorKind::Syntax {
        source_text: source.to_string(),
        offset,
        message: message.into(),
    })
}

fn lex(source: &str) -> Result<Vec<(usize, Token)>, ExpressionError> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| match token {
            Ok(token) => Ok((span.start, token)),
            Err(_) => Err(syntax(
                source,
                span.start,
                format!("unexpected input '{}'", &source[span]),
            )),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
enum UnaryOp {
    #[strum(serialize = "!")]
    Not,
    #[strum(serialize = "-")]
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
enum BinaryOp {
    #[strum(serialize = "||")]
    Or,
    #[strum(serialize = "&&")]
    And,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
    #[strum(serialize = "%")]
    Rem,
}

/// Binding power and operator for a binary token; higher binds tighter.
fn binary_op_info(token: &Token) -> Option<(u8, BinaryOp)> {
    match token {
        Token::Or => Some((1, BinaryOp::Or)),
        Token::And => Some((2, BinaryOp::And)),
        Token::EqEq => Some((3, BinaryOp::Eq)),
        Token::BangEq => Some((3, BinaryOp::Ne)),
        Token::Lt => Some((4, BinaryOp::Lt)),
        Token::LtEq => Some((4, BinaryOp::Le)),
        Token::Gt => Some((4, BinaryOp::Gt)),
        Token::GtEq => Some((4, BinaryOp::Ge)),
        Token::Plus => Some((5, BinaryOp::Add)),
        Token::Minus => Some((5, BinaryOp::Sub)),
        Token::Star => Some((6, BinaryOp::Mul)),
        Token::Slash => Some((6, BinaryOp::Div)),
        Token::Percent => Some((6, BinaryOp::Rem)),
        _ => None,
    }
}

const UNARY_POWER: u8 = 7;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Literal(Value),
    Ident(String),
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self, ExpressionError> {
        Ok(Self {
            source,
            tokens: lex(source)?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |(offset, _)| *offset)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn error(&self, message: impl Into<String>) -> ExpressionError {
        syntax(self.source, self.offset(), message)
    }

    fn expression(&mut self, min_power: u8) -> Result<Node, ExpressionError> {
        let mut left = match self.next() {
            Some(Token::Bool(b)) => Node::Literal(Value::Bool(b)),
            Some(Token::Int(i)) => Node::Literal(Value::Int(i)),
            Some(Token::Float(f)) => Node::Literal(Value::Float(f)),
            Some(Token::Str(text)) => Node::Literal(Value::Str(text)),
            Some(Token::Ident(name)) => Node::Ident(name),
            Some(Token::Bang) => {
                Node::Unary(UnaryOp::Not, Box::new(self.expression(UNARY_POWER)?))
            }
            Some(Token::Minus) => {
                Node::Unary(UnaryOp::Neg, Box::new(self.expression(UNARY_POWER)?))
            }
            Some(Token::LParen) => {
                let inner = self.expression(0)?;
                if self.next() != Some(Token::RParen) {
                    self.pos -= 1;
                    return Err(self.error("expected ')'"));
                }
                inner
            }
            Some(_) => {
                self.pos -= 1;
                return Err(self.error("expected a value"));
            }
            None => return Err(self.error("unexpected end of expression")),
        };

        while let Some((power, op)) = self.peek().and_then(binary_op_info) {
            if power <= min_power {
                break;
            }
            self.pos += 1;
            let right = self.expression(power)?;
            left = Node::Binary(op, Box::new(left), Box::new(right));
        }

        Ok(left)
    }
}

fn mismatch(operator: impl Display, left: &Value, right: &Value) -> ExpressionError {
    ExpressionError::new(ExpressionErrorKind::TypeMismatch {
        operator: operator.to_string(),
        left: left.type_name(),
        right: right.type_name(),
    })
}

fn arithmetic(op: BinaryOp, left: Value, right: Value) -> Result<Value, ExpressionError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => {
            let (a, b) = (*a, *b);
            if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b == 0 {
                return Err(ExpressionError::new(ExpressionErrorKind::DivisionByZero));
            }
            Ok(Value::Int(match op {
                BinaryOp::Add => a.wrapping_add(b),
                BinaryOp::Sub => a.wrapping_sub(b),
                BinaryOp::Mul => a.wrapping_mul(b),
                BinaryOp::Div => a.wrapping_div(b),
                BinaryOp::Rem => a.wrapping_rem(b),
                _ => return Err(mismatch(op, &left, &right)),
            }))
        }
        (Value::Str(a), _) if op == BinaryOp::Add => Ok(Value::Str(format!("{}{}", a, right))),
        (_, Value::Str(b)) if op == BinaryOp::Add => Ok(Value::Str(format!("{}{}", left, b))),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::Rem => a % b,
                _ => return Err(mismatch(op, &left, &right)),
            })),
            _ => Err(mismatch(op, &left, &right)),
        },
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => left.as_f64()?.partial_cmp(&right.as_f64()?),
    }
}

fn eval(node: &Node, params: &ParamStore) -> Result<Value, ExpressionError> {
    match node {
        Node::Literal(value) => Ok(value.clone()),
        Node::Ident(name) => params.get(name).cloned().ok_or_else(|| {
            ExpressionError::new(ExpressionErrorKind::UndefinedParameter(name.clone()))
        }),
        Node::Unary(op, operand) => {
            let value = eval(operand, params)?;
            match (op, &value) {
                (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
                (UnaryOp::Neg, Value::Int(i)) => Ok(Value::Int(i.wrapping_neg())),
                (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
                _ => Err(mismatch(op, &value, &value)),
            }
        }
        Node::Binary(op @ (BinaryOp::And | BinaryOp::Or), left, right) => {
            let l = eval(left, params)?;
            let Value::Bool(l) = l else {
                return Err(mismatch(op, &l, &Value::Bool(false)));
            };
            if (*op == BinaryOp::And && !l) || (*op == BinaryOp::Or && l) {
                return Ok(Value::Bool(l));
            }
            match eval(right, params)? {
                Value::Bool(r) => Ok(Value::Bool(r)),
                other => Err(mismatch(op, &Value::Bool(l), &other)),
            }
        }
        Node::Binary(op, left, right) => {
            let l = eval(left, params)?;
            let r = eval(right, params)?;
            match op {
                BinaryOp::Eq => Ok(Value::Bool(compare(&l, &r) == Some(Ordering::Equal))),
                BinaryOp::Ne => Ok(Value::Bool(compare(&l, &r) != Some(Ordering::Equal))),
                BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                    let ordering = compare(&l, &r).ok_or_else(|| mismatch(op, &l, &r))?;
                    Ok(Value::Bool(match op {
                        BinaryOp::Lt => ordering == Ordering::Less,
                        BinaryOp::Le => ordering != Ordering::Greater,
                        BinaryOp::Gt => ordering == Ordering::Greater,
                        _ => ordering != Ordering::Less,
                    }))
                }
                _ => arithmetic(*op, l, r),
            }
        }
    }
}

/// A parsed expression, evaluated against a [`ParamStore`].
///
/// # Examples
///
/// ```
/// use hokusai_core::{Expression, ParamStore};
///
/// let mut params = ParamStore::new();
/// params.set("x", 5);
/// let cond = Expression::parse("x > 0 && !(x == 3)").unwrap();
/// assert!(cond.eval_bool(&params).unwrap());
/// ```
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
#[display("{}", source)]
pub struct Expression {
    source: String,
    root: Node,
}

impl Expression {
    /// Parse expression text.
    ///
    /// # Errors
    ///
    /// Returns a syntax error naming the offending byte offset.
    pub fn parse(source: &str) -> HokusaiResult<Self> {
        let mut parser = Parser::new(source)?;
        let root = parser.expression(0)?;
        if !parser.at_end() {
            return Err(parser.error("unexpected trailing input").into());
        }
        Ok(Self {
            source: source.trim().to_string(),
            root,
        })
    }

    /// Original text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate to a value.
    ///
    /// # Errors
    ///
    /// Returns an error for undefined parameters, type mismatches and integer
    /// division by zero.
    pub fn eval(&self, params: &ParamStore) -> HokusaiResult<Value> {
        Ok(eval(&self.root, params)?)
    }

    /// Evaluate as a condition.
    ///
    /// # Errors
    ///
    /// As [`Expression::eval`], plus an error if the result is not a boolean.
    pub fn eval_bool(&self, params: &ParamStore) -> HokusaiResult<bool> {
        let value = self.eval(params)?;
        value.as_bool().ok_or_else(|| {
            ExpressionError::new(ExpressionErrorKind::NotBoolean {
                source_text: self.source.clone(),
                found: value.type_name(),
            })
            .into()
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Assignment {
    target: String,
    operator: Option<BinaryOp>,
    value: Node,
}

/// One or more assignments, applied in order.
///
/// # Examples
///
/// ```
/// use hokusai_core::{ParamStore, Statements, Value};
///
/// let mut params = ParamStore::new();
/// Statements::parse("hp = 10; hp -= 3, name = \"Ann\"").unwrap().apply(&mut params).unwrap();
/// assert_eq!(params.get("hp"), Some(&Value::Int(7)));
/// assert_eq!(params.get("name"), Some(&Value::Str("Ann".into())));
/// ```
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
#[display("{}", source)]
pub struct Statements {
    source: String,
    assignments: Vec<Assignment>,
}

impl Statements {
    /// Parse statement text.
    ///
    /// # Errors
    ///
    /// Returns a syntax error if any statement is not `name op expression`.
    pub fn parse(source: &str) -> HokusaiResult<Self> {
        let mut parser = Parser::new(source)?;
        let mut assignments = Vec::new();

        while !parser.at_end() {
            if parser.peek() == Some(&Token::Separator) {
                parser.pos += 1;
                continue;
            }
            let Some(Token::Ident(target)) = parser.next() else {
                parser.pos -= 1;
                return Err(parser.error("expected a parameter name").into());
            };
            let operator = match parser.next() {
                Some(Token::Assign) => None,
                Some(Token::PlusAssign) => Some(BinaryOp::Add),
                Some(Token::MinusAssign) => Some(BinaryOp::Sub),
                Some(Token::StarAssign) => Some(BinaryOp::Mul),
                Some(Token::SlashAssign) => Some(BinaryOp::Div),
                _ => {
                    parser.pos -= 1;
                    return Err(parser.error("expected an assignment operator").into());
                }
            };
            let value = parser.expression(0)?;
            match parser.peek() {
                None | Some(Token::Separator) => {}
                Some(_) => return Err(parser.error("expected ',' or ';'").into()),
            }
            assignments.push(Assignment {
                target,
                operator,
                value,
            });
        }

        if assignments.is_empty() {
            return Err(syntax(source, 0, "no statements").into());
        }

        Ok(Self {
            source: source.trim().to_string(),
            assignments,
        })
    }

    /// Original text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Apply every assignment to `params`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing statement; earlier assignments stay applied.
    pub fn apply(&self, params: &mut ParamStore) -> HokusaiResult<()> {
        for assignment in &self.assignments {
            let value = eval(&assignment.value, params)?;
            let value = match assignment.operator {
                None => value,
                Some(op) => {
                    let current = params.get(&assignment.target).cloned().ok_or_else(|| {
                        ExpressionError::new(ExpressionErrorKind::UndefinedParameter(
                            assignment.target.clone(),
                        ))
                    })?;
                    arithmetic(op, current, value)?
                }
            };
            params.set(assignment.target.clone(), value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ParamStore {
        let mut p = ParamStore::new();
        p.set("x", 5);
        p.set("rate", 0.5);
        p.set("flag", true);
        p.set("name", "Ann");
        p
    }

    fn value(text: &str) -> Value {
        Expression::parse(text).unwrap().eval(&params()).unwrap()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(value("1 + 2 * 3"), Value::Int(7));
        assert_eq!(value("(1 + 2) * 3"), Value::Int(9));
        assert_eq!(value("-x + 1"), Value::Int(-4));
        assert_eq!(value("10 - 4 - 3"), Value::Int(3));
        assert_eq!(value("x % 3"), Value::Int(2));
    }

    #[test]
    fn test_mixed_numbers_widen() {
        assert_eq!(value("x * rate"), Value::Float(2.5));
        assert_eq!(value("x > 4.5"), Value::Bool(true));
        assert_eq!(value("x == 5.0"), Value::Bool(true));
    }

    #[test]
    fn test_logic_short_circuits() {
        assert_eq!(value("flag || missing"), Value::Bool(true));
        assert_eq!(value("!flag && missing"), Value::Bool(false));
    }

    #[test]
    fn test_strings() {
        assert_eq!(value("name == \"Ann\""), Value::Bool(true));
        assert_eq!(value("name + '!'"), Value::Str("Ann!".into()));
    }

    #[test]
    fn test_eval_errors() {
        let p = params();
        assert!(Expression::parse("y > 0").unwrap().eval(&p).is_err());
        assert!(Expression::parse("x / 0").unwrap().eval(&p).is_err());
        assert!(Expression::parse("flag + 1").unwrap().eval(&p).is_err());
        assert!(Expression::parse("x + 1").unwrap().eval_bool(&p).is_err());
    }

    #[test]
    fn test_syntax_errors() {
        assert!(Expression::parse("").is_err());
        assert!(Expression::parse("x >").is_err());
        assert!(Expression::parse("(x > 0").is_err());
        assert!(Expression::parse("x > 0 y").is_err());
        assert!(Expression::parse("x # 1").is_err());
        assert!(Expression::parse("\"open").is_err());
    }

    #[test]
    fn test_lexer_literals_and_names() {
        let mut p = params();
        p.set("flag.seen", true);
        assert_eq!(value("True && !FALSE"), Value::Bool(true));
        assert_eq!(value(".5 + 1"), Value::Float(1.5));
        assert_eq!(value("x>=5&&x<=5"), Value::Bool(true));
        assert_eq!(
            Expression::parse("flag.seen").unwrap().eval(&p).unwrap(),
            Value::Bool(true)
        );
        assert!(Expression::parse("truely").unwrap().eval(&p).is_err());
    }

    #[test]
    fn test_syntax_error_offset() {
        let err = Expression::parse("x > 0 @ 1").unwrap_err();
        assert!(format!("{}", err).contains("offset 6"));
    }

    #[test]
    fn test_statements() {
        let mut p = params();
        Statements::parse("x += 2; rate *= 2, created = x > 6")
            .unwrap()
            .apply(&mut p)
            .unwrap();
        assert_eq!(p.get("x"), Some(&Value::Int(7)));
        assert_eq!(p.get("rate"), Some(&Value::Float(1.0)));
        assert_eq!(p.get("created"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_compound_assignment_requires_existing_value() {
        let mut p = ParamStore::new();
        assert!(Statements::parse("score += 1").unwrap().apply(&mut p).is_err());
    }

    #[test]
    fn test_statement_syntax_errors() {
        assert!(Statements::parse("x").is_err());
        assert!(Statements::parse("x == 1").is_err());
        assert!(Statements::parse("x = 1 y = 2").is_err());
        assert!(Statements::parse(" ; ").is_err());
    }
}
