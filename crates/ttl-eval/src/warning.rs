//! Evaluator warning codes and messages.

use std::fmt;
use ttl_ast::Span;

/// A dynamic failure reported during evaluation. Warnings never abort
/// evaluation; the failing subterm yields the unknown type instead.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalWarning {
    pub code: EvalWarningCode,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalWarningCode {
    /// Type variable unresolved.
    UnknownTypeVar { name: String },
    /// Name variable unresolved in `streq`.
    UnknownStrVar { name: String },
    /// Type name unresolved.
    UnknownTypeName { name: String },
    /// Name variable unresolved in `record`.
    UnknownNameVar { name: String },
    /// First argument of `type(...)` is not templatizable.
    BaseTypeInvalid { ty: String },
    /// Argument of `rawTypeOf`/`templateTypeOf` is not templatized.
    TempTypeInvalid { op: &'static str, ty: String },
    /// `templateTypeOf` index overflow.
    IndexOutOfBounds { index: usize, len: usize },
    /// A `mapunion`/`maprecord` binder shadows an existing binding.
    DuplicateVariable { name: String },
    /// First argument of `maprecord` is not a record.
    RecTypeInvalid { ty: String },
    /// A `maprecord` body produced a type that is neither a record nor the
    /// bottom type.
    MaprecordBodyInvalid { ty: String },
    /// `typeOfVar` argument is not a slot in the host scope.
    VarUndefined { name: String },
}

impl EvalWarningCode {
    /// The stable identifier for this code.
    pub fn id(&self) -> &'static str {
        match self {
            EvalWarningCode::UnknownTypeVar { .. } => "UNKNOWN_TYPEVAR",
            EvalWarningCode::UnknownStrVar { .. } => "UNKNOWN_STRVAR",
            EvalWarningCode::UnknownTypeName { .. } => "UNKNOWN_TYPENAME",
            EvalWarningCode::UnknownNameVar { .. } => "UNKNOWN_NAMEVAR",
            EvalWarningCode::BaseTypeInvalid { .. } => "BASETYPE_INVALID",
            EvalWarningCode::TempTypeInvalid { .. } => "TEMPTYPE_INVALID",
            EvalWarningCode::IndexOutOfBounds { .. } => "INDEX_OUTOFBOUNDS",
            EvalWarningCode::DuplicateVariable { .. } => "DUPLICATE_VARIABLE",
            EvalWarningCode::RecTypeInvalid { .. } => "RECTYPE_INVALID",
            EvalWarningCode::MaprecordBodyInvalid { .. } => "MAPRECORD_BODY_INVALID",
            EvalWarningCode::VarUndefined { .. } => "VAR_UNDEFINED",
        }
    }

    /// The message parameters, in catalogue order.
    pub fn payload(&self) -> Vec<String> {
        match self {
            EvalWarningCode::UnknownTypeVar { name }
            | EvalWarningCode::UnknownStrVar { name }
            | EvalWarningCode::UnknownTypeName { name }
            | EvalWarningCode::UnknownNameVar { name }
            | EvalWarningCode::DuplicateVariable { name }
            | EvalWarningCode::VarUndefined { name } => vec![name.clone()],
            EvalWarningCode::BaseTypeInvalid { ty }
            | EvalWarningCode::RecTypeInvalid { ty }
            | EvalWarningCode::MaprecordBodyInvalid { ty } => vec![ty.clone()],
            EvalWarningCode::TempTypeInvalid { op, ty } => {
                vec![op.to_string(), ty.clone()]
            }
            EvalWarningCode::IndexOutOfBounds { index, len } => {
                vec![index.to_string(), len.to_string()]
            }
        }
    }
}

impl fmt::Display for EvalWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalWarningCode::UnknownTypeVar { name } => {
                write!(f, "reference to an unknown type variable {name}")
            }
            EvalWarningCode::UnknownStrVar { name } => {
                write!(f, "reference to an unknown string variable {name}")
            }
            EvalWarningCode::UnknownTypeName { name } => {
                write!(f, "reference to an unknown type name {name}")
            }
            EvalWarningCode::UnknownNameVar { name } => {
                write!(f, "reference to an unknown name variable {name}")
            }
            EvalWarningCode::BaseTypeInvalid { ty } => {
                write!(f, "the type {ty} cannot be templatized")
            }
            EvalWarningCode::TempTypeInvalid { op, ty } => {
                write!(f, "expected templatized type in {op} found {ty}")
            }
            EvalWarningCode::IndexOutOfBounds { index, len } => {
                write!(f, "index out of bounds in templateTypeOf: {index} > {len}")
            }
            EvalWarningCode::DuplicateVariable { name } => {
                write!(f, "the variable {name} is already defined")
            }
            EvalWarningCode::RecTypeInvalid { ty } => {
                write!(
                    f,
                    "the first parameter of a maprecord must be a record type, found {ty}"
                )
            }
            EvalWarningCode::MaprecordBodyInvalid { ty } => {
                write!(
                    f,
                    "the body of a maprecord function must evaluate to a record type \
                     or a no type, found {ty}"
                )
            }
            EvalWarningCode::VarUndefined { name } => {
                write!(f, "variable {name} is undefined in the scope")
            }
        }
    }
}
