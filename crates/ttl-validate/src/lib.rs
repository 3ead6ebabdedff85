//! Syntactic validation of transformation expressions.
//!
//! The parser produces a general expression AST; this crate decides whether
//! that AST is a well-formed transformation term. Validation warns on every
//! rule violation and lowers accepted expressions to [`ttl_ast::Term`], the
//! shape the evaluator consumes. An expression rejected here is never
//! evaluated.

mod warning;

pub use warning::{ValidationCode, ValidationWarning};

use ttl_ast::{
    BoolKind, BoolTerm, Ident, Keyword, Node, NodeKind, OperationKind, PropertyKind, RecordEntry,
    Span, StrArg, Term, TermKind,
};
use ttl_parser::{parse_str, ParseError};

/// Where an annotation came from, for diagnostic rendering by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

/// The outcome of parsing and validating one annotation.
#[derive(Debug)]
pub struct AnnotationResult {
    /// The validated term; `Some` iff the annotation is well formed.
    pub term: Option<Term>,
    pub parse_errors: Vec<ParseError>,
    pub warnings: Vec<ValidationWarning>,
    pub position: SourcePosition,
}

impl AnnotationResult {
    pub fn is_valid(&self) -> bool {
        self.term.is_some()
    }
}

/// Parse an annotation string and validate the resulting expression.
///
/// `file`, `line` and `column` locate the enclosing annotation and are passed
/// through for diagnostic rendering; spans in errors and warnings are byte
/// ranges into `source`.
pub fn parse_and_validate(
    source: &str,
    file: &str,
    line: u32,
    column: u32,
) -> AnnotationResult {
    let position = SourcePosition {
        file: file.to_string(),
        line,
        column,
    };
    let parsed = parse_str(source);
    let mut validator = Validator::new();
    let term = match &parsed.node {
        Some(node) => validator.validate(node),
        None => {
            validator.warn_invalid_expression("type transformation", &Span::new(0, source.len()));
            None
        }
    };
    tracing::debug!(
        valid = term.is_some(),
        warnings = validator.warnings.len(),
        "validated annotation"
    );
    AnnotationResult {
        term,
        parse_errors: parsed.errors,
        warnings: validator.into_warnings(),
        position,
    }
}

/// Checks that an expression AST is a well-formed transformation term and
/// lowers it. Warnings accumulate across calls; each recursive check stops at
/// the first violation in its own subterm.
#[derive(Debug, Default)]
pub struct Validator {
    warnings: Vec<ValidationWarning>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ValidationWarning> {
        self.warnings
    }

    /// Validate a whole expression. Returns the lowered term iff the
    /// expression is well formed; warnings describe every violation found.
    pub fn validate(&mut self, node: &Node) -> Option<Term> {
        self.validate_expr(node)
    }

    fn warn(&mut self, code: ValidationCode, subject: &str, span: &Span) {
        self.warnings.push(ValidationWarning {
            code,
            subject: subject.to_string(),
            span: span.clone(),
        });
    }

    fn warn_invalid(&mut self, subject: &str, span: &Span) {
        self.warn(ValidationCode::Invalid, subject, span);
    }

    fn warn_invalid_expression(&mut self, subject: &str, span: &Span) {
        self.warn(ValidationCode::InvalidExpression, subject, span);
    }

    fn warn_invalid_inside(&mut self, subject: &str, span: &Span) {
        self.warn(ValidationCode::InvalidInside, subject, span);
    }

    fn warn_missing_param(&mut self, subject: &str, span: &Span) {
        self.warn(ValidationCode::MissingParam, subject, span);
    }

    fn warn_extra_param(&mut self, subject: &str, span: &Span) {
        self.warn(ValidationCode::ExtraParam, subject, span);
    }

    fn check_param_count(&mut self, node: &Node, keyword: Keyword) -> bool {
        let count = node.call_args().len();
        if count < keyword.min_params() {
            self.warn_missing_param(keyword.name(), &node.span);
            return false;
        }
        if count > keyword.max_params() {
            self.warn_extra_param(keyword.name(), &node.span);
            return false;
        }
        true
    }

    fn validate_expr(&mut self, node: &Node) -> Option<Term> {
        match &node.kind {
            NodeKind::Name(name) => Some(Term {
                kind: TermKind::TypeVar(name.clone()),
                span: node.span.clone(),
            }),
            NodeKind::Str(name) => Some(Term {
                kind: TermKind::TypeName(name.clone()),
                span: node.span.clone(),
            }),
            NodeKind::Call { head, .. } => {
                let keyword = match Keyword::lookup(&head.name) {
                    Some(k) => k,
                    None => {
                        self.warn_invalid_expression("type transformation", &node.span);
                        return None;
                    }
                };
                match keyword.kind() {
                    OperationKind::TypeConstructor => {
                        self.validate_type_constructor(node, keyword)
                    }
                    OperationKind::Operation => self.validate_operation(node, keyword),
                    // A boolean predicate is only meaningful as the first
                    // argument of a cond.
                    OperationKind::BooleanTypePredicate
                    | OperationKind::BooleanStringPredicate => {
                        self.warn_invalid_expression("type transformation", &node.span);
                        None
                    }
                }
            }
            NodeKind::Num(_) | NodeKind::Function { .. } | NodeKind::ObjectLit { .. } => {
                self.warn_invalid_expression("type transformation", &node.span);
                None
            }
        }
    }

    fn validate_type_constructor(&mut self, node: &Node, keyword: Keyword) -> Option<Term> {
        let kind = match keyword {
            Keyword::Type => self.validate_templatized(node)?,
            Keyword::Union => self.validate_union(node)?,
            Keyword::None => self.validate_nullary(node, keyword, TermKind::None)?,
            Keyword::All => self.validate_nullary(node, keyword, TermKind::All)?,
            Keyword::Unknown => self.validate_nullary(node, keyword, TermKind::Unknown)?,
            Keyword::RawTypeOf => self.validate_raw_type_of(node)?,
            Keyword::TemplateTypeOf => self.validate_template_type_of(node)?,
            Keyword::Record => self.validate_record(node)?,
            // Covered by the dispatch in validate_expr.
            _ => unreachable!("not a type constructor: {}", keyword.name()),
        };
        Some(Term {
            kind,
            span: node.span.clone(),
        })
    }

    fn validate_operation(&mut self, node: &Node, keyword: Keyword) -> Option<Term> {
        let kind = match keyword {
            Keyword::Cond => self.validate_cond(node)?,
            Keyword::Mapunion => self.validate_mapunion(node)?,
            Keyword::Maprecord => self.validate_maprecord(node)?,
            Keyword::TypeOfVar => self.validate_type_of_var(node)?,
            _ => unreachable!("not an operation: {}", keyword.name()),
        };
        Some(Term {
            kind,
            span: node.span.clone(),
        })
    }

    /// `type(base, p1, ...)`: the base must be a type name or type variable,
    /// the remaining parameters must be valid expressions.
    fn validate_templatized(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::Type) {
            return None;
        }
        let args = node.call_args();
        let base = &args[0];
        let base_term = match &base.kind {
            NodeKind::Name(name) => Term {
                kind: TermKind::TypeVar(name.clone()),
                span: base.span.clone(),
            },
            NodeKind::Str(name) => Term {
                kind: TermKind::TypeName(name.clone()),
                span: base.span.clone(),
            },
            _ => {
                self.warn_invalid("type name or type variable", &node.span);
                self.warn_invalid_inside("template type operation", &node.span);
                return None;
            }
        };
        let mut params = Vec::with_capacity(args.len() - 1);
        for arg in &args[1..] {
            match self.validate_expr(arg) {
                Some(term) => params.push(term),
                None => {
                    self.warn_invalid_inside("template type operation", &node.span);
                    return None;
                }
            }
        }
        Some(TermKind::Templatized {
            base: Box::new(base_term),
            params,
        })
    }

    fn validate_union(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::Union) {
            return None;
        }
        let mut alternates = Vec::with_capacity(node.call_args().len());
        for arg in node.call_args() {
            match self.validate_expr(arg) {
                Some(term) => alternates.push(term),
                None => {
                    self.warn_invalid_inside("union type", &node.span);
                    return None;
                }
            }
        }
        Some(TermKind::Union(alternates))
    }

    fn validate_nullary(
        &mut self,
        node: &Node,
        keyword: Keyword,
        kind: TermKind,
    ) -> Option<TermKind> {
        if !self.check_param_count(node, keyword) {
            return None;
        }
        Some(kind)
    }

    fn validate_raw_type_of(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::RawTypeOf) {
            return None;
        }
        match self.validate_expr(&node.call_args()[0]) {
            Some(arg) => Some(TermKind::RawTypeOf(Box::new(arg))),
            None => {
                self.warn_invalid_inside(Keyword::RawTypeOf.name(), &node.span);
                None
            }
        }
    }

    /// `templateTypeOf(t, i)`: the index must be a non-negative integer
    /// number literal.
    fn validate_template_type_of(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::TemplateTypeOf) {
            return None;
        }
        let args = node.call_args();
        let arg = match self.validate_expr(&args[0]) {
            Some(term) => term,
            None => {
                self.warn_invalid_inside(Keyword::TemplateTypeOf.name(), &node.span);
                return None;
            }
        };
        let index = match args[1].as_number() {
            Some(d) => d,
            None => {
                self.warn_invalid("index", &node.span);
                self.warn_invalid_inside(Keyword::TemplateTypeOf.name(), &node.span);
                return None;
            }
        };
        if !is_mathematical_integer(index) || index < 0.0 {
            self.warn_invalid("index", &node.span);
            self.warn_invalid_inside(Keyword::TemplateTypeOf.name(), &node.span);
            return None;
        }
        Some(TermKind::TemplateTypeOf {
            arg: Box::new(arg),
            index: index as usize,
        })
    }

    /// `record({...})`: the sole argument is an object literal with at least
    /// one property, each property carrying a valid value expression.
    fn validate_record(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::Record) {
            return None;
        }
        let record = &node.call_args()[0];
        let props = match &record.kind {
            NodeKind::ObjectLit { props } => props,
            _ => {
                self.warn_invalid("record expression", &record.span);
                return None;
            }
        };
        if props.is_empty() {
            self.warn_missing_param("record expression", &record.span);
            return None;
        }
        let mut entries = Vec::with_capacity(props.len());
        for prop in props {
            match &prop.kind {
                PropertyKind::Plain { name, value } => {
                    let value = match value {
                        Some(v) => v,
                        None => {
                            self.warn_invalid("property, missing type", &prop.span);
                            self.warn_invalid_inside(Keyword::Record.name(), &prop.span);
                            return None;
                        }
                    };
                    match self.validate_expr(value) {
                        Some(term) => entries.push(RecordEntry::Plain {
                            name: name.name.clone(),
                            value: term,
                            span: prop.span.clone(),
                        }),
                        None => {
                            self.warn_invalid_inside(Keyword::Record.name(), &prop.span);
                            return None;
                        }
                    }
                }
                PropertyKind::Computed { key, value } => match self.validate_expr(value) {
                    Some(term) => entries.push(RecordEntry::Computed {
                        key: key.clone(),
                        value: term,
                    }),
                    None => {
                        self.warn_invalid_inside(Keyword::Record.name(), &prop.span);
                        return None;
                    }
                },
            }
        }
        Some(TermKind::Record(entries))
    }

    /// The first argument of a `cond` must be a boolean predicate call.
    fn validate_bool(&mut self, node: &Node) -> Option<BoolTerm> {
        if !node.is_call() {
            self.warn_invalid_expression("boolean", &node.span);
            return None;
        }
        let head = node.call_head().map(|h| h.name.as_str()).unwrap_or("");
        let keyword = match Keyword::lookup(head) {
            Some(k) if k.is_boolean_predicate() => k,
            _ => {
                self.warn_invalid("boolean predicate", &node.span);
                return None;
            }
        };
        if !self.check_param_count(node, keyword) {
            return None;
        }
        let args = node.call_args();
        let kind = match keyword.kind() {
            OperationKind::BooleanTypePredicate => {
                let lhs = self.validate_expr(&args[0]);
                let rhs = lhs.as_ref().and_then(|_| self.validate_expr(&args[1]));
                match (lhs, rhs) {
                    (Some(lhs), Some(rhs)) => match keyword {
                        Keyword::Eq => BoolKind::Eq(Box::new(lhs), Box::new(rhs)),
                        Keyword::Sub => BoolKind::Sub(Box::new(lhs), Box::new(rhs)),
                        _ => unreachable!("not a type predicate: {}", keyword.name()),
                    },
                    _ => {
                        self.warn_invalid_inside("boolean", &node.span);
                        return None;
                    }
                }
            }
            OperationKind::BooleanStringPredicate => {
                let lhs = self.validate_string_arg(&args[0]);
                let rhs = lhs.as_ref().and_then(|_| self.validate_string_arg(&args[1]));
                match (lhs, rhs) {
                    (Some(lhs), Some(rhs)) => BoolKind::StrEq(lhs, rhs),
                    _ => {
                        self.warn_invalid_inside("boolean", &node.span);
                        return None;
                    }
                }
            }
            _ => unreachable!("not a boolean predicate: {}", keyword.name()),
        };
        Some(BoolTerm {
            kind,
            span: node.span.clone(),
        })
    }

    /// An argument of `streq`: an identifier or a non-empty string literal.
    fn validate_string_arg(&mut self, node: &Node) -> Option<StrArg> {
        match &node.kind {
            NodeKind::Name(name) => Some(StrArg::Var(Ident {
                name: name.clone(),
                span: node.span.clone(),
            })),
            NodeKind::Str(value) => {
                if value.is_empty() {
                    self.warn_invalid("string parameter", &node.span);
                    return None;
                }
                Some(StrArg::Lit {
                    value: value.clone(),
                    span: node.span.clone(),
                })
            }
            _ => {
                self.warn_invalid("string", &node.span);
                None
            }
        }
    }

    fn validate_cond(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::Cond) {
            return None;
        }
        let args = node.call_args();
        let pred = match self.validate_bool(&args[0]) {
            Some(p) => p,
            None => {
                self.warn_invalid_inside("conditional", &node.span);
                return None;
            }
        };
        let then = match self.validate_expr(&args[1]) {
            Some(t) => t,
            None => {
                self.warn_invalid_inside("conditional", &node.span);
                return None;
            }
        };
        let otherwise = match self.validate_expr(&args[2]) {
            Some(t) => t,
            None => {
                self.warn_invalid_inside("conditional", &node.span);
                return None;
            }
        };
        Some(TermKind::Cond {
            pred,
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        })
    }

    /// Shared shape check for the map-function argument of `mapunion` and
    /// `maprecord`: it must be a function literal with exactly
    /// `required_params` formals and a valid body.
    fn validate_map_function(
        &mut self,
        arg: &Node,
        keyword: Keyword,
        required_params: usize,
    ) -> Option<(Vec<Ident>, Term)> {
        if !arg.is_function() {
            self.warn_invalid("map function", &arg.span);
            self.warn_invalid_inside(keyword.name(), &arg.span);
            return None;
        }
        let params = arg.fn_params();
        if params.len() < required_params {
            self.warn_missing_param("map function", &arg.span);
            self.warn_invalid_inside(keyword.name(), &arg.span);
            return None;
        }
        if params.len() > required_params {
            self.warn_extra_param("map function", &arg.span);
            self.warn_invalid_inside(keyword.name(), &arg.span);
            return None;
        }
        let body_node = arg.fn_body()?;
        let body = match self.validate_expr(body_node) {
            Some(term) => term,
            None => {
                self.warn_invalid_inside("map function body", &body_node.span);
                return None;
            }
        };
        Some((params.to_vec(), body))
    }

    fn validate_mapunion(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::Mapunion) {
            return None;
        }
        let args = node.call_args();
        let source = match self.validate_expr(&args[0]) {
            Some(term) => term,
            None => {
                self.warn_invalid_inside(Keyword::Mapunion.name(), &args[0].span);
                return None;
            }
        };
        let (params, body) = self.validate_map_function(&args[1], Keyword::Mapunion, 1)?;
        let binder = params.into_iter().next()?;
        Some(TermKind::Mapunion {
            source: Box::new(source),
            binder,
            body: Box::new(body),
        })
    }

    fn validate_maprecord(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::Maprecord) {
            return None;
        }
        let args = node.call_args();
        let source = match self.validate_expr(&args[0]) {
            Some(term) => term,
            None => {
                self.warn_invalid_inside(Keyword::Maprecord.name(), &args[0].span);
                return None;
            }
        };
        let (params, body) = self.validate_map_function(&args[1], Keyword::Maprecord, 2)?;
        let mut params = params.into_iter();
        let key = params.next()?;
        let value = params.next()?;
        Some(TermKind::Maprecord {
            source: Box::new(source),
            key,
            value,
            body: Box::new(body),
        })
    }

    fn validate_type_of_var(&mut self, node: &Node) -> Option<TermKind> {
        if !self.check_param_count(node, Keyword::TypeOfVar) {
            return None;
        }
        let arg = &node.call_args()[0];
        match &arg.kind {
            NodeKind::Name(name) => Some(TermKind::TypeOfVar(Ident {
                name: name.clone(),
                span: arg.span.clone(),
            })),
            _ => {
                self.warn_invalid("name", &node.span);
                self.warn_invalid_inside(Keyword::TypeOfVar.name(), &node.span);
                None
            }
        }
    }
}

fn is_mathematical_integer(d: f64) -> bool {
    d.is_finite() && d.fract() == 0.0
}

#[cfg(test)]
mod tests;
