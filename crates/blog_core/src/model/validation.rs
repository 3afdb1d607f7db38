//! Field validation rules shared by post and user write paths.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum post title length, in characters.
pub const TITLE_MAX_CHARS: usize = 64;
/// Maximum post body length, in characters.
pub const CONTENT_MAX_CHARS: usize = 1024;

/// Rejected field values on a post or user write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    NilId,
    MissingTitle,
    TitleTooLong { max: usize, actual: usize },
    MissingContent,
    ContentTooLong { max: usize, actual: usize },
    MissingName,
    InvalidEmail(String),
}

impl ValidationError {
    /// Name of the offending input field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NilId => "id",
            Self::MissingTitle | Self::TitleTooLong { .. } => "title",
            Self::MissingContent | Self::ContentTooLong { .. } => "content",
            Self::MissingName => "name",
            Self::InvalidEmail(_) => "email",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "id must not be nil"),
            Self::MissingTitle => write!(f, "title is required"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title must be at most {max} characters (got {actual})")
            }
            Self::MissingContent => write!(f, "content is required"),
            Self::ContentTooLong { max, actual } => {
                write!(f, "content must be at most {max} characters (got {actual})")
            }
            Self::MissingName => write!(f, "name is required"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
        }
    }
}

impl Error for ValidationError {}

/// Checks the post title: present and within [`TITLE_MAX_CHARS`].
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    check_text(
        title,
        TITLE_MAX_CHARS,
        ValidationError::MissingTitle,
        |max, actual| ValidationError::TitleTooLong { max, actual },
    )
}

/// Checks the post body: present and within [`CONTENT_MAX_CHARS`].
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    check_text(
        content,
        CONTENT_MAX_CHARS,
        ValidationError::MissingContent,
        |max, actual| ValidationError::ContentTooLong { max, actual },
    )
}

fn check_text(
    value: &str,
    max: usize,
    missing: ValidationError,
    too_long: impl FnOnce(usize, usize) -> ValidationError,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing);
    }
    let actual = value.chars().count();
    if actual > max {
        return Err(too_long(max, actual));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_limit_counts_characters_not_bytes() {
        let title: String = "あ".repeat(TITLE_MAX_CHARS);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert_eq!(validate_title(&title), Ok(()));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        assert_eq!(validate_title("  \n"), Err(ValidationError::MissingTitle));
        assert_eq!(validate_content("\t"), Err(ValidationError::MissingContent));
    }

    #[test]
    fn errors_report_their_field() {
        let err = validate_content(&"a".repeat(CONTENT_MAX_CHARS + 1)).unwrap_err();
        assert_eq!(err.field(), "content");
        assert_eq!(
            err,
            ValidationError::ContentTooLong {
                max: 1024,
                actual: 1025
            }
        );
    }
}
