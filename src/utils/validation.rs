use thiserror::Error;

use crate::i18n::Message;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const LOCATION_MAX_CHARS: usize = 500;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Event title cannot be empty")]
    EmptyTitle,

    #[error("At least one time slot is required")]
    NoSlots,

    #[error("Event title and time slots are missing")]
    EmptyTitleAndNoSlots,

    #[error("Event title cannot be longer than {TITLE_MAX_CHARS} characters")]
    TitleTooLong,

    #[error("Description cannot be longer than {DESCRIPTION_MAX_CHARS} characters")]
    DescriptionTooLong,

    #[error("Location cannot be longer than {LOCATION_MAX_CHARS} characters")]
    LocationTooLong,

    #[error("Multiple choice needs at least two time slots")]
    MultipleChoiceNeedsTwoSlots,
}

impl ValidationError {
    /// Field name used in logs.
    pub fn field(self) -> &'static str {
        match self {
            ValidationError::EmptyTitle | ValidationError::TitleTooLong => "title",
            ValidationError::NoSlots | ValidationError::MultipleChoiceNeedsTwoSlots => "slots",
            ValidationError::EmptyTitleAndNoSlots => "title+slots",
            ValidationError::DescriptionTooLong => "description",
            ValidationError::LocationTooLong => "location",
        }
    }

    pub fn message(self) -> Message {
        match self {
            ValidationError::EmptyTitle => Message::FormNoTitle,
            ValidationError::NoSlots => Message::FormNoSlots,
            ValidationError::EmptyTitleAndNoSlots => Message::FormNoTitleNoSlots,
            ValidationError::TitleTooLong => Message::TitleTooLong,
            ValidationError::DescriptionTooLong => Message::DescriptionTooLong,
            ValidationError::LocationTooLong => Message::LocationTooLong,
            ValidationError::MultipleChoiceNeedsTwoSlots => Message::MultipleChoiceNeedsTwoSlots,
        }
    }
}

pub fn validate_event_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong);
    }

    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.trim().chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

pub fn validate_location(location: &str) -> Result<(), ValidationError> {
    if location.trim().chars().count() > LOCATION_MAX_CHARS {
        return Err(ValidationError::LocationTooLong);
    }
    Ok(())
}

/// Checks a create/edit form; a missing title and missing slots are
/// reported together.
pub fn validate_event_form(
    title: &str,
    description: &str,
    location: &str,
    slot_count: usize,
) -> Result<(), ValidationError> {
    match (validate_event_title(title), slot_count) {
        (Err(ValidationError::EmptyTitle), 0) => return Err(ValidationError::EmptyTitleAndNoSlots),
        (Err(e), _) => return Err(e),
        (Ok(()), 0) => return Err(ValidationError::NoSlots),
        (Ok(()), _) => {}
    }
    validate_description(description)?;
    validate_location(location)?;
    Ok(())
}

pub fn validate_multiple_choice(multiple_choice: bool, slot_count: usize) -> Result<(), ValidationError> {
    if multiple_choice && slot_count < 2 {
        return Err(ValidationError::MultipleChoiceNeedsTwoSlots);
    }
    Ok(())
}

/// Trimmed text, or `None` for an optional field left blank.
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
