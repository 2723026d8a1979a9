//! Submission input validation.
//!
//! A submission carries the delivered work for a milestone: who delivered
//! it (exactly one of an individual student or a group), descriptive notes,
//! and at least one pre-uploaded file reference. File upload itself happens
//! elsewhere; the core only sees opaque references.

use crate::error::CoreError;
use crate::types::DbId;

/// Minimum submission notes length after trimming.
pub const MIN_NOTES_LENGTH: usize = 10;

/// Validate that exactly one submitter identity is present.
pub fn validate_identity(
    by_student_id: Option<DbId>,
    by_group_id: Option<DbId>,
) -> Result<(), CoreError> {
    match (by_student_id, by_group_id) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (None, None) => Err(CoreError::Validation(
            "a submission requires either by_student_id or by_group_id".to_string(),
        )),
        (Some(_), Some(_)) => Err(CoreError::Validation(
            "a submission cannot carry both by_student_id and by_group_id".to_string(),
        )),
    }
}

/// Validate submission notes: at least [`MIN_NOTES_LENGTH`] chars after trim.
pub fn validate_notes(notes: &str) -> Result<(), CoreError> {
    if notes.trim().chars().count() < MIN_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "submission notes must be at least {MIN_NOTES_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the attached file references: at least one, none blank.
pub fn validate_files(files: &[String]) -> Result<(), CoreError> {
    if files.is_empty() {
        return Err(CoreError::Validation(
            "a submission requires at least one file".to_string(),
        ));
    }
    if files.iter().any(|f| f.trim().is_empty()) {
        return Err(CoreError::Validation(
            "submission file references must not be blank".to_string(),
        ));
    }
    Ok(())
}
