use thiserror::Error;

use crate::construct::PersonId;

#[derive(Error, Debug)]
pub enum GeneaError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {message}")]
    Parse { message: String, col: Option<usize> },
    #[error("Relation {0} is unknown")]
    UnknownRelation(String),
    #[error("Relation {0} needs a specifier")]
    SpecifierRequired(String),
    #[error("Relation {0} does not allow a specifier")]
    SpecifierNotAllowed(String),
    #[error("Relation {step}: {relation} does not exist")]
    RelationNotSet { step: usize, relation: String },
    #[error("No {relation} named {specifier}")]
    NoMatch { relation: String, specifier: String },
    #[error("No {0} is set")]
    NotSet(String),
    #[error("Grouping relation {0} must be last")]
    GroupNotLast(String),
    #[error("Relation {0} can not be set or removed")]
    UnsupportedRelation(String),
    #[error("Can't add a sibling if no parent is known")]
    NoKnownParent,
    #[error("{0} is not a valid ID")]
    UnknownPerson(PersonId),
    #[error("Invalid sex {0}, expected M or F")]
    InvalidSex(String),
    #[error("Invalid date {0}")]
    InvalidDate(String),
    #[error("Expected {expected} arguments, got {found}")]
    ArgumentCount { expected: &'static str, found: usize },
    #[error("Corrupted data at line {line}: {message}")]
    Corrupted { line: usize, message: String },
    #[error("Your cursor is nobody, create at least one person before")]
    NoCursor,
    #[error("Nobody exists")]
    Empty,
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, GeneaError>;

// Helper conversions
impl From<::config::ConfigError> for GeneaError {
    fn from(e: ::config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
