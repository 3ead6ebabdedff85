//! Parser: consume tokens and produce an expression AST.
//!
//! This is a hand-written recursive-descent parser for the expression subset
//! transformation annotations are written in: identifiers, string and number
//! literals, calls, arrow functions, and object literals. The parser does not
//! judge whether the expression is a well-formed transformation term; that
//! narrowing belongs to the validator.

use ttl_ast::{Ident, Node, NodeKind, Property, PropertyKind, Span};
use ttl_lexer::{Lexer, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

#[derive(Debug)]
pub struct ParseResult {
    pub node: Option<Node>,
    pub errors: Vec<ParseError>,
}

/// Parse an annotation expression string into an AST node and parse errors.
///
/// The node is `Some` only when the whole input forms a single expression
/// with no lexical or syntactic problems.
pub fn parse_str(source: &str) -> ParseResult {
    tracing::debug!(len = source.len(), "parsing transformation expression");
    let tokens: Vec<Token> = Lexer::new(source).collect();
    let mut parser = Parser::new(tokens);
    let node = parser.parse_root();
    ParseResult {
        node: if parser.errors.is_empty() { node } else { None },
        errors: parser.errors,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("tokens not empty"))
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn matches_token(&mut self, kind: &TokenKind) -> bool {
        if std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn ast_span(&self, span: &ttl_lexer::Span) -> Span {
        Span {
            range: span.range.clone(),
        }
    }

    fn error_here(&mut self, message: impl Into<String>) {
        let span = self.ast_span(&self.current().span);
        self.errors.push(ParseError {
            message: message.into(),
            span,
        });
    }

    /// Parse a whole annotation: one expression followed by end of input.
    fn parse_root(&mut self) -> Option<Node> {
        let expr = self.parse_expr()?;
        match self.current().kind.clone() {
            TokenKind::Eof => Some(expr),
            TokenKind::Error(message) => {
                self.error_here(message);
                None
            }
            _ => {
                self.error_here("unexpected trailing input after expression");
                None
            }
        }
    }

    fn parse_expr(&mut self) -> Option<Node> {
        match self.current().kind.clone() {
            TokenKind::Ident(_) => self.parse_name_or_call(),
            TokenKind::StringLiteral(value) => {
                let tok = self.advance();
                Some(Node {
                    kind: NodeKind::Str(value),
                    span: self.ast_span(&tok.span),
                })
            }
            TokenKind::NumberLiteral(value) => {
                let tok = self.advance();
                Some(Node {
                    kind: NodeKind::Num(value),
                    span: self.ast_span(&tok.span),
                })
            }
            TokenKind::LParen => self.parse_function(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::Error(message) => {
                self.error_here(message);
                None
            }
            _ => {
                self.error_here("expected an expression");
                None
            }
        }
    }

    fn parse_ident(&mut self, context: &str) -> Option<Ident> {
        match self.current().kind.clone() {
            TokenKind::Ident(name) => {
                let tok = self.advance();
                Some(Ident {
                    name,
                    span: self.ast_span(&tok.span),
                })
            }
            _ => {
                self.error_here(format!("expected {context}"));
                None
            }
        }
    }

    fn parse_name_or_call(&mut self) -> Option<Node> {
        let head = self.parse_ident("identifier")?;
        if !matches!(self.current().kind, TokenKind::LParen) {
            let span = head.span.clone();
            return Some(Node {
                kind: NodeKind::Name(head.name),
                span,
            });
        }
        self.advance(); // consume `(`

        let mut args = Vec::new();
        if !matches!(self.current().kind, TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.matches_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.current().clone();
        if !self.matches_token(&TokenKind::RParen) {
            self.error_here("expected `)` to close argument list");
            return None;
        }
        let span = head.span.to(&self.ast_span(&close.span));
        Some(Node {
            kind: NodeKind::Call { head, args },
            span,
        })
    }

    /// Parse `(p1, p2, ...) => body`. A bare `(` can only open an arrow
    /// function in this expression subset; there is no grouping.
    fn parse_function(&mut self) -> Option<Node> {
        let open = self.advance(); // consume `(`
        let start = open.span.range.start;

        let mut params = Vec::new();
        if !matches!(self.current().kind, TokenKind::RParen) {
            loop {
                params.push(self.parse_ident("function parameter name")?);
                if !self.matches_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        if !self.matches_token(&TokenKind::RParen) {
            self.error_here("expected `)` to close parameter list");
            return None;
        }
        if !self.matches_token(&TokenKind::FatArrow) {
            self.error_here("expected `=>` after function parameter list");
            return None;
        }
        let body = self.parse_expr()?;
        let span = Span::new(start, body.span.range.end);
        Some(Node {
            kind: NodeKind::Function {
                params,
                body: Box::new(body),
            },
            span,
        })
    }

    fn parse_object_literal(&mut self) -> Option<Node> {
        let open = self.advance(); // consume `{`
        let start = open.span.range.start;

        let mut props = Vec::new();
        if !matches!(self.current().kind, TokenKind::RBrace) {
            loop {
                props.push(self.parse_property()?);
                if !self.matches_token(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let close = self.current().clone();
        if !self.matches_token(&TokenKind::RBrace) {
            self.error_here("expected `}` to close object literal");
            return None;
        }
        let span = Span::new(start, close.span.range.end);
        Some(Node {
            kind: NodeKind::ObjectLit { props },
            span,
        })
    }

    fn parse_property(&mut self) -> Option<Property> {
        // Computed property: `[key]: value`.
        if matches!(self.current().kind, TokenKind::LBracket) {
            let open = self.advance();
            let key = self.parse_ident("computed property key")?;
            if !self.matches_token(&TokenKind::RBracket) {
                self.error_here("expected `]` after computed property key");
                return None;
            }
            if !self.matches_token(&TokenKind::Colon) {
                self.error_here("expected `:` after computed property key");
                return None;
            }
            let value = self.parse_expr()?;
            let span = Span::new(open.span.range.start, value.span.range.end);
            return Some(Property {
                kind: PropertyKind::Computed { key, value },
                span,
            });
        }

        // Plain property: `name: value`, or shorthand `name` with no value.
        let name = self.parse_ident("property name")?;
        if self.matches_token(&TokenKind::Colon) {
            let value = self.parse_expr()?;
            let span = name.span.to(&value.span);
            Some(Property {
                kind: PropertyKind::Plain {
                    name,
                    value: Some(value),
                },
                span,
            })
        } else {
            let span = name.span.clone();
            Some(Property {
                kind: PropertyKind::Plain { name, value: None },
                span,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> Node {
        let result = parse_str(src);
        assert!(result.errors.is_empty(), "errors: {:?}", result.errors);
        result.node.expect("no node parsed")
    }

    #[test]
    fn parses_bare_name() {
        let node = parse_ok("T");
        assert_eq!(node.kind, NodeKind::Name("T".to_string()));
        assert_eq!(node.span, Span::new(0, 1));
    }

    #[test]
    fn parses_string_literal() {
        let node = parse_ok("'Array'");
        assert_eq!(node.kind, NodeKind::Str("Array".to_string()));
    }

    #[test]
    fn parses_call_with_arguments() {
        let node = parse_ok("union(T, 'string')");
        let head = node.call_head().expect("call");
        assert_eq!(head.name, "union");
        let args = node.call_args();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].kind, NodeKind::Name("T".to_string()));
        assert_eq!(args[1].kind, NodeKind::Str("string".to_string()));
    }

    #[test]
    fn parses_nullary_call() {
        let node = parse_ok("none()");
        assert_eq!(node.call_head().unwrap().name, "none");
        assert!(node.call_args().is_empty());
    }

    #[test]
    fn parses_nested_calls() {
        let node = parse_ok("mapunion(T, (x) => type('Array', x))");
        let args = node.call_args();
        assert_eq!(args.len(), 2);
        assert!(args[1].is_function());
        assert_eq!(args[1].fn_params().len(), 1);
        assert!(args[1].fn_body().unwrap().is_call());
    }

    #[test]
    fn parses_two_parameter_function() {
        let node = parse_ok("(k, v) => record({[k]: v})");
        let params = node.fn_params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "k");
        assert_eq!(params[1].name, "v");
    }

    #[test]
    fn parses_object_literal_properties() {
        let node = parse_ok("{a: T, [k]: v, b}");
        let props = match &node.kind {
            NodeKind::ObjectLit { props } => props,
            other => panic!("expected object literal, got {other:?}"),
        };
        assert_eq!(props.len(), 3);
        assert!(matches!(
            &props[0].kind,
            PropertyKind::Plain { name, value: Some(_) } if name.name == "a"
        ));
        assert!(matches!(
            &props[1].kind,
            PropertyKind::Computed { key, .. } if key.name == "k"
        ));
        assert!(matches!(
            &props[2].kind,
            PropertyKind::Plain { value: None, .. }
        ));
    }

    #[test]
    fn parses_number_argument() {
        let node = parse_ok("templateTypeOf(T, 0)");
        assert_eq!(node.call_args()[1].as_number(), Some(0.0));
    }

    #[test]
    fn rejects_trailing_input() {
        let result = parse_str("T S");
        assert!(result.node.is_none());
        assert!(
            result
                .errors
                .iter()
                .any(|e| e.message.contains("trailing input"))
        );
    }

    #[test]
    fn rejects_missing_arrow() {
        let result = parse_str("(x) type('Array', x)");
        assert!(result.node.is_none());
        assert!(result.errors.iter().any(|e| e.message.contains("=>")));
    }

    #[test]
    fn rejects_unterminated_call() {
        let result = parse_str("union(T,");
        assert!(result.node.is_none());
        assert!(!result.errors.is_empty());
    }

    #[test]
    fn reports_lexer_errors() {
        let result = parse_str("T & S");
        assert!(result.node.is_none());
        assert!(result.errors.iter().any(|e| e.message.contains('&')));
    }
}
