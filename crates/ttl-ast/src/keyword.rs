//! The closed keyword table defining the DSL surface.

/// Sentinel for keywords that accept any number of trailing arguments.
pub const VAR_ARGS: usize = usize::MAX;

/// Operational classification of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    TypeConstructor,
    Operation,
    BooleanTypePredicate,
    BooleanStringPredicate,
}

/// Keywords of the type transformation language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    All,
    Cond,
    Eq,
    Mapunion,
    Maprecord,
    None,
    RawTypeOf,
    Sub,
    Streq,
    Record,
    TemplateTypeOf,
    Type,
    TypeOfVar,
    Union,
    Unknown,
}

impl Keyword {
    pub const ALL: [Keyword; 15] = [
        Keyword::All,
        Keyword::Cond,
        Keyword::Eq,
        Keyword::Mapunion,
        Keyword::Maprecord,
        Keyword::None,
        Keyword::RawTypeOf,
        Keyword::Sub,
        Keyword::Streq,
        Keyword::Record,
        Keyword::TemplateTypeOf,
        Keyword::Type,
        Keyword::TypeOfVar,
        Keyword::Union,
        Keyword::Unknown,
    ];

    /// Look a surface name up in the table. Matching is case-insensitive;
    /// the canonical spelling is the one returned by [`Keyword::name`].
    pub fn lookup(name: &str) -> Option<Keyword> {
        Keyword::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Keyword::All => "all",
            Keyword::Cond => "cond",
            Keyword::Eq => "eq",
            Keyword::Mapunion => "mapunion",
            Keyword::Maprecord => "maprecord",
            Keyword::None => "none",
            Keyword::RawTypeOf => "rawTypeOf",
            Keyword::Sub => "sub",
            Keyword::Streq => "streq",
            Keyword::Record => "record",
            Keyword::TemplateTypeOf => "templateTypeOf",
            Keyword::Type => "type",
            Keyword::TypeOfVar => "typeOfVar",
            Keyword::Union => "union",
            Keyword::Unknown => "unknown",
        }
    }

    pub fn min_params(self) -> usize {
        match self {
            Keyword::All | Keyword::None | Keyword::Unknown => 0,
            Keyword::Record | Keyword::RawTypeOf | Keyword::TypeOfVar => 1,
            Keyword::Eq
            | Keyword::Sub
            | Keyword::Streq
            | Keyword::Mapunion
            | Keyword::Maprecord
            | Keyword::TemplateTypeOf
            | Keyword::Type
            | Keyword::Union => 2,
            Keyword::Cond => 3,
        }
    }

    pub fn max_params(self) -> usize {
        match self {
            Keyword::All | Keyword::None | Keyword::Unknown => 0,
            Keyword::Record | Keyword::RawTypeOf | Keyword::TypeOfVar => 1,
            Keyword::Eq
            | Keyword::Sub
            | Keyword::Streq
            | Keyword::Mapunion
            | Keyword::Maprecord
            | Keyword::TemplateTypeOf => 2,
            Keyword::Cond => 3,
            Keyword::Type | Keyword::Union => VAR_ARGS,
        }
    }

    pub fn kind(self) -> OperationKind {
        match self {
            Keyword::All
            | Keyword::None
            | Keyword::Unknown
            | Keyword::Type
            | Keyword::Union
            | Keyword::Record
            | Keyword::RawTypeOf
            | Keyword::TemplateTypeOf => OperationKind::TypeConstructor,
            Keyword::Cond | Keyword::Mapunion | Keyword::Maprecord | Keyword::TypeOfVar => {
                OperationKind::Operation
            }
            Keyword::Eq | Keyword::Sub => OperationKind::BooleanTypePredicate,
            Keyword::Streq => OperationKind::BooleanStringPredicate,
        }
    }

    /// Whether this keyword heads a boolean form (the first argument of a
    /// `cond`).
    pub fn is_boolean_predicate(self) -> bool {
        matches!(
            self.kind(),
            OperationKind::BooleanTypePredicate | OperationKind::BooleanStringPredicate
        )
    }
}
