//! Hard errors. Any of these aborts the whole run.

use crate::model::Location;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("No section defined yet.\n{location}")]
    NoSection { location: Location },

    #[error("Already know section {name:?} from {original}\n{location}")]
    DuplicateSection {
        name: String,
        location: Location,
        original: Location,
    },

    #[error("Already know symbol {command:?} from {original}\n{location}")]
    DuplicateSymbol {
        command: String,
        location: Location,
        original: Location,
    },

    #[error("Malformed section tag {content:?}: expected \"name : description\"\n{location}")]
    MalformedSection { content: String, location: Location },

    #[error("Malformed nomenclature {value:?}: expected \"label:text\"\n{location}")]
    MalformedNomenclature { value: String, location: Location },

    #[error("No closing \":\" found after \"%:\".\n{location}")]
    UnterminatedTag { location: Location },
}

impl ParseError {
    /// Location of the line that triggered the error.
    pub fn location(&self) -> &Location {
        match self {
            ParseError::NoSection { location }
            | ParseError::DuplicateSection { location, .. }
            | ParseError::DuplicateSymbol { location, .. }
            | ParseError::MalformedSection { location, .. }
            | ParseError::MalformedNomenclature { location, .. }
            | ParseError::UnterminatedTag { location } => location,
        }
    }

    /// Location of the earlier declaration, for duplicates.
    pub fn original(&self) -> Option<&Location> {
        match self {
            ParseError::DuplicateSection { original, .. }
            | ParseError::DuplicateSymbol { original, .. } => Some(original),
            _ => None,
        }
    }
}
