//! Validated transformation terms.
//!
//! The validator lowers the general expression AST into this representation.
//! Every shape constraint of the language (keyword arity, argument kinds,
//! binder counts) is encoded structurally, so the evaluator can match on it
//! exhaustively and a malformed expression cannot reach evaluation.

use crate::{Ident, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// A string literal naming a host type, e.g. `'Array'`.
    TypeName(String),
    /// An identifier bound in the type-variable environment.
    TypeVar(String),
    /// `all()`, the dynamic-any type.
    All,
    /// `none()`, the bottom type.
    None,
    /// `unknown()`, the top-of-unknown type.
    Unknown,
    /// `type(base, p1, ...)`, templatization of a base type.
    Templatized { base: Box<Term>, params: Vec<Term> },
    /// `union(t1, t2, ...)`.
    Union(Vec<Term>),
    /// `record({...})`.
    Record(Vec<RecordEntry>),
    /// `rawTypeOf(t)`.
    RawTypeOf(Box<Term>),
    /// `templateTypeOf(t, i)`.
    TemplateTypeOf { arg: Box<Term>, index: usize },
    /// `cond(b, then, otherwise)`.
    Cond {
        pred: BoolTerm,
        then: Box<Term>,
        otherwise: Box<Term>,
    },
    /// `mapunion(u, (binder) => body)`.
    Mapunion {
        source: Box<Term>,
        binder: Ident,
        body: Box<Term>,
    },
    /// `maprecord(r, (key, value) => body)`.
    Maprecord {
        source: Box<Term>,
        key: Ident,
        value: Ident,
        body: Box<Term>,
    },
    /// `typeOfVar(name)`.
    TypeOfVar(Ident),
}

/// A boolean form, only reachable as the first argument of `cond`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoolTerm {
    pub kind: BoolKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoolKind {
    /// `eq(a, b)`, host type equivalence.
    Eq(Box<Term>, Box<Term>),
    /// `sub(a, b)`, host subtyping.
    Sub(Box<Term>, Box<Term>),
    /// `streq(a, b)`, string comparison over names and name variables.
    StrEq(StrArg, StrArg),
}

/// An argument of `streq`.
#[derive(Debug, Clone, PartialEq)]
pub enum StrArg {
    /// An identifier resolved through the name-variable environment.
    Var(Ident),
    /// A string literal.
    Lit { value: String, span: Span },
}

/// One property of a `record({...})` constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEntry {
    /// `name: value`.
    Plain {
        name: String,
        value: Term,
        span: Span,
    },
    /// `[key]: value`; `key` resolves through the name-variable environment.
    Computed { key: Ident, value: Term },
}
