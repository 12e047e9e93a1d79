use thiserror::Error;

/// Coarse classification of every [`CalcError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// unparseable expression, unknown identifier, bad call
    InvalidExpression,
    /// text that is not a number in the requested base
    Parse,
    /// mathematically undefined operation
    Domain,
    /// conversion asked for a category or unit the catalog does not know
    UnknownCategoryOrUnit,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Failed to parse expression: {0}")]
    InvalidExpression(String),
    #[error("Nothing to calculate")]
    EmptyExpression,
    #[error("Unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("Function '{0}' requires {1} argument(s)")]
    WrongArgCount(String, String),

    #[error("Failed to convert '{0}' to a base {1} integer")]
    StrToInt(String, u32),
    #[error("Failed to convert '{0}' to a number")]
    StrToNumber(String),
    #[error("Unsupported base {0}")]
    InvalidBase(u32),

    #[error("'{0}' divided by zero")]
    DividedByZero(String),
    #[error("Argument {1} of '{0}' is out of range ({2})")]
    ArgumentOutOfRange(String, String, String),
    #[error("Function '{0}' supports only integers")]
    OnlyInt(String),
    #[error("Function '{0}' is not supported for negative numbers")]
    NotForNegative(String),
    #[error("Result of '{0}' is not a finite number")]
    NotFinite(String),
    #[error("Argument of '{0}' is too large")]
    TooLarge(String),
    #[error("Cannot shift by '{0}'")]
    InvalidShift(String),

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Unknown unit '{1}' in category '{0}'")]
    UnknownUnit(String, String),
}

impl CalcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::InvalidExpression(..)
            | CalcError::EmptyExpression
            | CalcError::UnknownIdentifier(..)
            | CalcError::WrongArgCount(..) => ErrorKind::InvalidExpression,
            CalcError::StrToInt(..) | CalcError::StrToNumber(..) | CalcError::InvalidBase(..) => ErrorKind::Parse,
            CalcError::DividedByZero(..)
            | CalcError::ArgumentOutOfRange(..)
            | CalcError::OnlyInt(..)
            | CalcError::NotForNegative(..)
            | CalcError::NotFinite(..)
            | CalcError::TooLarge(..)
            | CalcError::InvalidShift(..) => ErrorKind::Domain,
            CalcError::UnknownCategory(..) | CalcError::UnknownUnit(..) => ErrorKind::UnknownCategoryOrUnit,
        }
    }
}
