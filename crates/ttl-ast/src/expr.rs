//! The general expression AST consumed by the validator.
//!
//! The parser produces these nodes without judging whether they form a
//! well-formed transformation expression; that narrowing is the validator's
//! job. The accessor methods at the bottom are the only operations the core
//! performs on raw nodes.

use crate::Span;

/// An identifier with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

/// Expression node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An identifier, e.g. a type variable or a function parameter.
    Name(String),
    /// A string literal, e.g. a type name.
    Str(String),
    /// A number literal.
    Num(f64),
    /// A call with an identifier head, e.g. `union(T, 'string')`.
    Call { head: Ident, args: Vec<Node> },
    /// An arrow function, e.g. `(x) => type('Array', x)`.
    Function { params: Vec<Ident>, body: Box<Node> },
    /// An object literal, e.g. `{a: T, [k]: v}`.
    ObjectLit { props: Vec<Property> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// A single property of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub kind: PropertyKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    /// `name: value`. A shorthand property (`{a}`) carries no value; the
    /// validator rejects it.
    Plain { name: Ident, value: Option<Node> },
    /// `[key]: value` where `key` is resolved through the name-variable
    /// environment at evaluation time.
    Computed { key: Ident, value: Node },
}

impl Node {
    pub fn is_name(&self) -> bool {
        matches!(self.kind, NodeKind::Name(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, NodeKind::Str(_))
    }

    pub fn is_call(&self) -> bool {
        matches!(self.kind, NodeKind::Call { .. })
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::Function { .. })
    }

    /// The text of a name or string literal node.
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Name(s) | NodeKind::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Num(d) => Some(d),
            _ => None,
        }
    }

    /// The head identifier of a call node.
    pub fn call_head(&self) -> Option<&Ident> {
        match &self.kind {
            NodeKind::Call { head, .. } => Some(head),
            _ => None,
        }
    }

    /// The arguments of a call node, in order.
    pub fn call_args(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Call { args, .. } => args,
            _ => &[],
        }
    }

    /// The formal parameters of a function node.
    pub fn fn_params(&self) -> &[Ident] {
        match &self.kind {
            NodeKind::Function { params, .. } => params,
            _ => &[],
        }
    }

    /// The body of a function node.
    pub fn fn_body(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::Function { body, .. } => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> Node {
        Node {
            kind: NodeKind::Name(s.to_string()),
            span: Span::new(0, s.len()),
        }
    }

    #[test]
    fn text_accessor_covers_names_and_strings() {
        assert_eq!(name("T").as_text(), Some("T"));
        let lit = Node {
            kind: NodeKind::Str("Array".to_string()),
            span: Span::new(0, 7),
        };
        assert_eq!(lit.as_text(), Some("Array"));
        let num = Node {
            kind: NodeKind::Num(1.0),
            span: Span::new(0, 1),
        };
        assert_eq!(num.as_text(), None);
    }

    #[test]
    fn call_accessors() {
        let call = Node {
            kind: NodeKind::Call {
                head: Ident {
                    name: "union".to_string(),
                    span: Span::new(0, 5),
                },
                args: vec![name("T"), name("S")],
            },
            span: Span::new(0, 11),
        };
        assert!(call.is_call());
        assert_eq!(call.call_head().unwrap().name, "union");
        assert_eq!(call.call_args().len(), 2);
        assert!(name("T").call_args().is_empty());
    }
}
