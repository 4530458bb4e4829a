//! SQL expression AST + the `Transpile` trait that renders it to text.
//!
//! Grounded on the teacher's `store/postgres/query/{condition,expression,mod}.rs`:
//! a small closed expression tree, transpiled through a `Transpile` trait
//! over `fmt::Formatter` (teacher's own `Transpile`/`Transpiler` pattern),
//! rather than building strings by hand at each call site.

use std::fmt::{self, Display, Formatter};

/// Renders a value into Postgres-compatible SQL text.
pub trait Transpile: 'static {
    fn transpile(&self, fmt: &mut Formatter) -> fmt::Result;

    fn transpile_to_string(&self) -> String {
        struct Transpiler<'a, T: ?Sized>(&'a T);
        impl<T: Transpile + ?Sized> Display for Transpiler<'_, T> {
            fn fmt(&self, fmt: &mut Formatter<'_>) -> fmt::Result {
                self.0.transpile(fmt)
            }
        }

        Transpiler(self).to_string()
    }
}

/// A scalar SQL expression: a column reference, a `$n` parameter
/// placeholder, a function call, or a literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Column(String),
    /// 1-indexed, matching `tokio_postgres`'s `$1`, `$2`, ... placeholders.
    Parameter(usize),
    Function(Function),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Function {
    /// `expr::TEXT` cast, used when comparing a JSONB scalar to a typed parameter.
    CastText(Box<Expression>),
}

impl Transpile for Expression {
    fn transpile(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            Self::Column(name) => fmt.write_str(name),
            Self::Parameter(index) => write!(fmt, "${index}"),
            Self::Function(Function::CastText(inner)) => {
                inner.transpile(fmt)?;
                fmt.write_str("::text")
            }
            Self::Literal(Literal::Text(text)) => {
                write!(fmt, "'{}'", text.replace('\'', "''"))
            }
            Self::Literal(Literal::Number(n)) => write!(fmt, "{n}"),
            Self::Literal(Literal::Bool(b)) => write!(fmt, "{b}"),
            Self::Literal(Literal::Null) => fmt.write_str("NULL"),
        }
    }
}
