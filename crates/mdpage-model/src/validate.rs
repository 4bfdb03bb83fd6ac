use std::fmt;

use thiserror::Error;

use crate::{Entry, Group, Page};

/// Structural problems reported before rendering.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("title is empty")]
    TitleEmpty,
    #[error("title should not end with period")]
    TitleEndsWithPeriod,
    #[error("description should end with period")]
    DescriptionWithoutPeriod,
}

/// Single validation issue with its position in the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub location: String,
    pub kind: ValidationErrorKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)
    }
}

/// All issues found in a page, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Page {
    /// Check titles and descriptions of every group and entry.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        for (idx, group) in self.groups.iter().enumerate() {
            group.collect_errors(&format!("group({idx})"), &mut errors);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }
}

impl Group {
    fn collect_errors(&self, location: &str, errors: &mut Vec<ValidationError>) {
        if let Some(kind) = check_title(&self.title) {
            errors.push(ValidationError {
                location: location.to_owned(),
                kind,
            });
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            entry.collect_errors(&format!("{location}.entry({idx})"), errors);
        }
    }
}

impl Entry {
    fn collect_errors(&self, location: &str, errors: &mut Vec<ValidationError>) {
        if let Some(kind) = check_title(&self.title) {
            errors.push(ValidationError {
                location: location.to_owned(),
                kind,
            });
        }
        if !self.description.is_empty() && !self.description.ends_with('.') {
            errors.push(ValidationError {
                location: location.to_owned(),
                kind: ValidationErrorKind::DescriptionWithoutPeriod,
            });
        }
    }
}

fn check_title(title: &str) -> Option<ValidationErrorKind> {
    if title.is_empty() {
        Some(ValidationErrorKind::TitleEmpty)
    } else if title.ends_with('.') {
        Some(ValidationErrorKind::TitleEndsWithPeriod)
    } else {
        None
    }
}
