//! The internal type language.

use std::fmt;

/// Primitive types of the host language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
}

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Number => "number",
            Primitive::String => "string",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::Undefined => "undefined",
        }
    }
}

/// A type in the host type language.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// The top-of-unknown type; the evaluator's universal fallback.
    Unknown,
    /// The bottom type.
    No,
    /// The dynamic-any type.
    All,
    Primitive(Primitive),
    /// A named object type. Templatizable iff `template_arity > 0`.
    Nominal { name: String, template_arity: usize },
    /// A base type applied to an ordered tuple of type parameters.
    Templatized { base: Box<Type>, args: Vec<Type> },
    /// A union of alternates. Built through [`Type::union`], which flattens
    /// and deduplicates; the variant itself stores alternates verbatim.
    Union(Vec<Type>),
    /// A structural type with named properties in insertion order.
    Record(Vec<(String, Type)>),
}

impl Type {
    pub fn number() -> Self {
        Type::Primitive(Primitive::Number)
    }

    pub fn string() -> Self {
        Type::Primitive(Primitive::String)
    }

    pub fn boolean() -> Self {
        Type::Primitive(Primitive::Boolean)
    }

    pub fn nominal(name: impl Into<String>, template_arity: usize) -> Self {
        Type::Nominal {
            name: name.into(),
            template_arity,
        }
    }

    pub fn templatized(base: Type, args: Vec<Type>) -> Self {
        Type::Templatized {
            base: Box::new(base),
            args,
        }
    }

    /// Deduplicating union constructor: flattens nested unions, drops
    /// alternates equivalent to an earlier one, collapses singletons, and
    /// maps the empty union to the bottom type.
    pub fn union(alternates: Vec<Type>) -> Self {
        let mut flat: Vec<Type> = Vec::new();
        collect_alternates(alternates, &mut flat);
        match flat.len() {
            0 => Type::No,
            1 => flat.remove(0),
            _ => Type::Union(flat),
        }
    }

    pub fn is_templatizable(&self) -> bool {
        matches!(self, Type::Nominal { template_arity, .. } if *template_arity > 0)
    }

    pub fn is_union(&self) -> bool {
        matches!(self, Type::Union(_))
    }

    pub fn alternates(&self) -> &[Type] {
        match self {
            Type::Union(alts) => alts,
            _ => &[],
        }
    }

    pub fn is_templatized(&self) -> bool {
        matches!(self, Type::Templatized { .. })
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Type::Record(_))
    }

    pub fn properties(&self) -> &[(String, Type)] {
        match self {
            Type::Record(props) => props,
            _ => &[],
        }
    }

    pub fn is_no_type(&self) -> bool {
        matches!(self, Type::No)
    }
}

fn collect_alternates(types: Vec<Type>, out: &mut Vec<Type>) {
    for ty in types {
        match ty {
            Type::Union(inner) => collect_alternates(inner, out),
            other => {
                if !out.iter().any(|seen| equivalent(seen, &other)) {
                    out.push(other);
                }
            }
        }
    }
}

/// Structural equivalence. Unions compare as sets of alternates; records
/// compare as name-to-type maps.
pub fn equivalent(a: &Type, b: &Type) -> bool {
    match (a, b) {
        (Type::Unknown, Type::Unknown) | (Type::No, Type::No) | (Type::All, Type::All) => true,
        (Type::Primitive(x), Type::Primitive(y)) => x == y,
        (Type::Nominal { name: x, .. }, Type::Nominal { name: y, .. }) => x == y,
        (
            Type::Templatized { base: xb, args: xa },
            Type::Templatized { base: yb, args: ya },
        ) => {
            equivalent(xb, yb)
                && xa.len() == ya.len()
                && xa.iter().zip(ya).all(|(x, y)| equivalent(x, y))
        }
        (Type::Union(xs), Type::Union(ys)) => {
            xs.iter().all(|x| ys.iter().any(|y| equivalent(x, y)))
                && ys.iter().all(|y| xs.iter().any(|x| equivalent(x, y)))
        }
        (Type::Record(xs), Type::Record(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(name, x)| {
                    ys.iter()
                        .any(|(other, y)| name == other && equivalent(x, y))
                })
        }
        _ => false,
    }
}

/// Subtyping. Bottom is below everything, everything is below the all type,
/// and the unknown type is compatible in both directions. Unions distribute
/// on either side, templatized types require a subtyped base with equivalent
/// arguments, and records use width subtyping.
pub fn subtype(a: &Type, b: &Type) -> bool {
    if equivalent(a, b) {
        return true;
    }
    match (a, b) {
        (Type::No, _) => true,
        (_, Type::All) => true,
        (Type::Unknown, _) | (_, Type::Unknown) => true,
        (Type::Union(alts), _) => alts.iter().all(|alt| subtype(alt, b)),
        (_, Type::Union(alts)) => alts.iter().any(|alt| subtype(a, alt)),
        (
            Type::Templatized { base: ab, args: aa },
            Type::Templatized { base: bb, args: ba },
        ) => {
            subtype(ab, bb)
                && aa.len() == ba.len()
                && aa.iter().zip(ba).all(|(x, y)| equivalent(x, y))
        }
        // A templatized type is below its raw base.
        (Type::Templatized { base, .. }, _) => subtype(base, b),
        (Type::Record(xs), Type::Record(ys)) => ys.iter().all(|(name, required)| {
            xs.iter()
                .any(|(own, ty)| own == name && subtype(ty, required))
        }),
        _ => false,
    }
}

/// Accumulates named properties and yields a record type. A property added
/// under an existing name replaces the earlier type but keeps its position.
#[derive(Debug, Default)]
pub struct RecordTypeBuilder {
    props: Vec<(String, Type)>,
}

impl RecordTypeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(&mut self, name: impl Into<String>, ty: Type) -> &mut Self {
        let name = name.into();
        match self.props.iter().position(|(n, _)| *n == name) {
            Some(i) => self.props[i].1 = ty,
            None => self.props.push((name, ty)),
        }
        self
    }

    pub fn build(self) -> Type {
        Type::Record(self.props)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown => write!(f, "?"),
            Type::No => write!(f, "None"),
            Type::All => write!(f, "*"),
            Type::Primitive(p) => write!(f, "{}", p.name()),
            Type::Nominal { name, .. } => write!(f, "{name}"),
            Type::Templatized { base, args } => {
                write!(f, "{base}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            Type::Union(alts) => {
                write!(f, "(")?;
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{alt}")?;
                }
                write!(f, ")")
            }
            Type::Record(props) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in props.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
