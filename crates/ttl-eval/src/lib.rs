//! Semantic evaluation of transformation terms.
//!
//! The evaluator interprets a validated [`Term`] against two environments
//! (type variables and name variables) and a host type system, producing a
//! host type. It is total: dynamic failures are reported as warnings and the
//! failing subterm yields the host's unknown type, so downstream checking
//! degrades instead of cascading. Only the higher-order forms short-circuit,
//! and only on pre-checks (duplicate binders, wrong argument shape) detected
//! before their mapping begins.

mod env;
mod warning;

pub use env::Bindings;
pub use warning::{EvalWarning, EvalWarningCode};

use ttl_ast::{BoolKind, BoolTerm, RecordEntry, Span, StrArg, Term, TermKind};
use ttl_types::TypeHost;

/// The two environments a term is evaluated under. Extension produces new
/// environments; nothing is mutated in place.
struct Env<H: TypeHost> {
    type_vars: Bindings<H::Type>,
    name_vars: Bindings<String>,
}

impl<H: TypeHost> Env<H> {
    fn with_type_var(&self, name: &str, ty: H::Type) -> Self {
        Env {
            type_vars: self.type_vars.bind(name, ty),
            name_vars: self.name_vars.clone(),
        }
    }

    fn with_property(&self, value_var: &str, ty: H::Type, key_var: &str, key: String) -> Self {
        Env {
            type_vars: self.type_vars.bind(value_var, ty),
            name_vars: self.name_vars.bind(key_var, key),
        }
    }
}

/// Evaluates transformation terms against a host type system, collecting
/// warnings as it goes.
pub struct Evaluator<'h, H: TypeHost> {
    host: &'h H,
    warnings: Vec<EvalWarning>,
}

/// Evaluate a term in one call, returning the resulting type and the
/// warnings produced along the way.
pub fn eval<H: TypeHost>(
    host: &H,
    term: &Term,
    type_vars: &Bindings<H::Type>,
    name_vars: &Bindings<String>,
) -> (H::Type, Vec<EvalWarning>) {
    let mut evaluator = Evaluator::new(host);
    let ty = evaluator.eval_with_names(term, type_vars, name_vars);
    (ty, evaluator.into_warnings())
}

impl<'h, H: TypeHost> Evaluator<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self {
            host,
            warnings: Vec::new(),
        }
    }

    pub fn warnings(&self) -> &[EvalWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<EvalWarning> {
        self.warnings
    }

    /// Evaluate a term with an empty name-variable environment.
    pub fn eval(&mut self, term: &Term, type_vars: &Bindings<H::Type>) -> H::Type {
        self.eval_with_names(term, type_vars, &Bindings::new())
    }

    pub fn eval_with_names(
        &mut self,
        term: &Term,
        type_vars: &Bindings<H::Type>,
        name_vars: &Bindings<String>,
    ) -> H::Type {
        let env = Env {
            type_vars: type_vars.clone(),
            name_vars: name_vars.clone(),
        };
        self.eval_term(term, &env)
    }

    fn warn(&mut self, code: EvalWarningCode, span: &Span) {
        self.warnings.push(EvalWarning {
            code,
            span: span.clone(),
        });
    }

    fn unknown(&self) -> H::Type {
        self.host.unknown_type()
    }

    fn eval_term(&mut self, term: &Term, env: &Env<H>) -> H::Type {
        tracing::trace!(?term.span, "evaluating term");
        match &term.kind {
            TermKind::TypeName(name) => self.eval_type_name(name, &term.span),
            TermKind::TypeVar(name) => self.eval_type_var(name, &term.span, env),
            TermKind::All => self.host.all_type(),
            TermKind::None => self.host.no_type(),
            TermKind::Unknown => self.unknown(),
            TermKind::Templatized { base, params } => {
                self.eval_templatized(base, params, &term.span, env)
            }
            TermKind::Union(alternates) => {
                let types = alternates
                    .iter()
                    .map(|alt| self.eval_term(alt, env))
                    .collect();
                self.host.union(types)
            }
            TermKind::Record(entries) => self.eval_record(entries, &term.span, env),
            TermKind::RawTypeOf(arg) => self.eval_raw_type_of(arg, &term.span, env),
            TermKind::TemplateTypeOf { arg, index } => {
                self.eval_template_type_of(arg, *index, &term.span, env)
            }
            TermKind::Cond {
                pred,
                then,
                otherwise,
            } => {
                if self.eval_bool(pred, env) {
                    self.eval_term(then, env)
                } else {
                    self.eval_term(otherwise, env)
                }
            }
            TermKind::Mapunion {
                source,
                binder,
                body,
            } => self.eval_mapunion(source, &binder.name, body, &term.span, env),
            TermKind::Maprecord {
                source,
                key,
                value,
                body,
            } => self.eval_maprecord(source, &key.name, &value.name, body, &term.span, env),
            TermKind::TypeOfVar(name) => {
                match self.host.slot_type(&name.name) {
                    Some(ty) => ty,
                    None => {
                        self.warn(
                            EvalWarningCode::VarUndefined {
                                name: name.name.clone(),
                            },
                            &term.span,
                        );
                        self.unknown()
                    }
                }
            }
        }
    }

    fn eval_type_name(&mut self, name: &str, span: &Span) -> H::Type {
        match self.host.resolve(name) {
            Some(ty) => ty,
            None => {
                self.warn(
                    EvalWarningCode::UnknownTypeName {
                        name: name.to_string(),
                    },
                    span,
                );
                self.unknown()
            }
        }
    }

    fn eval_type_var(&mut self, name: &str, span: &Span, env: &Env<H>) -> H::Type {
        match env.type_vars.get(name) {
            Some(ty) => ty.clone(),
            None => {
                self.warn(
                    EvalWarningCode::UnknownTypeVar {
                        name: name.to_string(),
                    },
                    span,
                );
                self.unknown()
            }
        }
    }

    fn eval_templatized(
        &mut self,
        base: &Term,
        params: &[Term],
        span: &Span,
        env: &Env<H>,
    ) -> H::Type {
        let base_ty = self.eval_term(base, env);
        if !self.host.is_templatizable(&base_ty) {
            self.warn(
                EvalWarningCode::BaseTypeInvalid {
                    ty: self.host.display(&base_ty),
                },
                span,
            );
            return self.unknown();
        }
        let args = params
            .iter()
            .map(|param| self.eval_term(param, env))
            .collect();
        self.host.templatize(&base_ty, args)
    }

    /// Build a record type. An unresolved computed key fails the whole
    /// record; plain properties use their literal name.
    fn eval_record(&mut self, entries: &[RecordEntry], span: &Span, env: &Env<H>) -> H::Type {
        let mut props = Vec::with_capacity(entries.len());
        for entry in entries {
            match entry {
                RecordEntry::Plain { name, value, .. } => {
                    let ty = self.eval_term(value, env);
                    props.push((name.clone(), ty));
                }
                RecordEntry::Computed { key, value } => {
                    let resolved = match env.name_vars.get(&key.name) {
                        Some(name) => name.clone(),
                        None => {
                            self.warn(
                                EvalWarningCode::UnknownNameVar {
                                    name: key.name.clone(),
                                },
                                span,
                            );
                            return self.unknown();
                        }
                    };
                    let ty = self.eval_term(value, env);
                    props.push((resolved, ty));
                }
            }
        }
        self.host.record(props)
    }

    fn eval_raw_type_of(&mut self, arg: &Term, span: &Span, env: &Env<H>) -> H::Type {
        let ty = self.eval_term(arg, env);
        if !self.host.is_templatized(&ty) {
            self.warn(
                EvalWarningCode::TempTypeInvalid {
                    op: "rawTypeOf",
                    ty: self.host.display(&ty),
                },
                span,
            );
            return self.unknown();
        }
        self.host.raw_type(&ty)
    }

    fn eval_template_type_of(
        &mut self,
        arg: &Term,
        index: usize,
        span: &Span,
        env: &Env<H>,
    ) -> H::Type {
        let ty = self.eval_term(arg, env);
        if !self.host.is_templatized(&ty) {
            self.warn(
                EvalWarningCode::TempTypeInvalid {
                    op: "templateTypeOf",
                    ty: self.host.display(&ty),
                },
                span,
            );
            return self.unknown();
        }
        let params = self.host.template_params(&ty);
        // The bound check is strict, so an index equal to the length passes
        // it; with no parameter at that position the result falls back to
        // unknown without a warning.
        if index > params.len() {
            self.warn(
                EvalWarningCode::IndexOutOfBounds {
                    index,
                    len: params.len(),
                },
                span,
            );
            return self.unknown();
        }
        params.into_iter().nth(index).unwrap_or_else(|| self.unknown())
    }

    fn eval_mapunion(
        &mut self,
        source: &Term,
        binder: &str,
        body: &Term,
        span: &Span,
        env: &Env<H>,
    ) -> H::Type {
        // The binder must not already be bound in the environment.
        if env.type_vars.contains(binder) {
            self.warn(
                EvalWarningCode::DuplicateVariable {
                    name: binder.to_string(),
                },
                span,
            );
            return self.unknown();
        }

        let union_ty = self.eval_term(source, env);
        // A non-union argument is treated as a singleton union.
        if !self.host.is_union(&union_ty) {
            let inner = env.with_type_var(binder, union_ty);
            return self.eval_term(body, &inner);
        }

        let alternates = self.host.union_alternates(&union_ty);
        let mapped = alternates
            .into_iter()
            .map(|alt| {
                let inner = env.with_type_var(binder, alt);
                self.eval_term(body, &inner)
            })
            .collect();
        self.host.union(mapped)
    }

    fn eval_maprecord(
        &mut self,
        source: &Term,
        key: &str,
        value: &str,
        body: &Term,
        span: &Span,
        env: &Env<H>,
    ) -> H::Type {
        let rec_ty = self.eval_term(source, env);
        if !self.host.is_record(&rec_ty) {
            self.warn(
                EvalWarningCode::RecTypeInvalid {
                    ty: self.host.display(&rec_ty),
                },
                span,
            );
            return self.unknown();
        }

        // Neither binder may already be bound in its environment.
        if env.name_vars.contains(key) {
            self.warn(
                EvalWarningCode::DuplicateVariable {
                    name: key.to_string(),
                },
                span,
            );
            return self.unknown();
        }
        if env.type_vars.contains(value) {
            self.warn(
                EvalWarningCode::DuplicateVariable {
                    name: value.to_string(),
                },
                span,
            );
            return self.unknown();
        }

        let mut props: Vec<(String, H::Type)> = Vec::new();
        for (prop_name, prop_ty) in self.host.own_properties(&rec_ty) {
            let inner = env.with_property(value, prop_ty, key, prop_name);
            let mapped = self.eval_term(body, &inner);

            // A body yielding the bottom type drops the property.
            if self.host.is_no_type(&mapped) {
                continue;
            }
            if !self.host.is_record(&mapped) {
                self.warn(
                    EvalWarningCode::MaprecordBodyInvalid {
                        ty: self.host.display(&mapped),
                    },
                    span,
                );
                return self.unknown();
            }
            for (new_name, new_ty) in self.host.own_properties(&mapped) {
                self.put_property(&mut props, new_name, new_ty);
            }
        }
        self.host.record(props)
    }

    /// The property merge rule: a fresh name is inserted; a clash between two
    /// record types joins their properties (recursively on further clashes);
    /// any other clash lets the new value replace the old one.
    fn put_property(&self, props: &mut Vec<(String, H::Type)>, name: String, value: H::Type) {
        let existing = props.iter().position(|(n, _)| *n == name);
        match existing {
            Option::None => props.push((name, value)),
            Some(i) => {
                let joined = self.host.is_record(&props[i].1) && self.host.is_record(&value);
                let replacement = if joined {
                    self.join_records(&props[i].1, &value)
                } else {
                    value
                };
                props[i].1 = replacement;
            }
        }
    }

    fn join_records(&self, a: &H::Type, b: &H::Type) -> H::Type {
        let mut props: Vec<(String, H::Type)> = Vec::new();
        for (name, ty) in self.host.own_properties(a) {
            self.put_property(&mut props, name, ty);
        }
        for (name, ty) in self.host.own_properties(b) {
            self.put_property(&mut props, name, ty);
        }
        self.host.record(props)
    }

    fn eval_bool(&mut self, pred: &BoolTerm, env: &Env<H>) -> bool {
        match &pred.kind {
            BoolKind::Eq(lhs, rhs) => {
                let a = self.eval_term(lhs, env);
                let b = self.eval_term(rhs, env);
                self.host.equivalent(&a, &b)
            }
            BoolKind::Sub(lhs, rhs) => {
                let a = self.eval_term(lhs, env);
                let b = self.eval_term(rhs, env);
                self.host.subtype(&a, &b)
            }
            BoolKind::StrEq(lhs, rhs) => {
                let a = self.eval_string_arg(lhs, env);
                let b = self.eval_string_arg(rhs, env);
                // An empty string marks an unresolved side; the comparison is
                // then false without looking further.
                if a.is_empty() || b.is_empty() {
                    return false;
                }
                a == b
            }
        }
    }

    fn eval_string_arg(&mut self, arg: &StrArg, env: &Env<H>) -> String {
        match arg {
            StrArg::Var(ident) => match env.name_vars.get(&ident.name) {
                Some(value) => value.clone(),
                None => {
                    self.warn(
                        EvalWarningCode::UnknownStrVar {
                            name: ident.name.clone(),
                        },
                        &ident.span,
                    );
                    String::new()
                }
            },
            StrArg::Lit { value, .. } => value.clone(),
        }
    }
}
