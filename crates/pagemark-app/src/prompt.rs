//! The annotation-detail prompt shown after a drag.

/// What the user answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Confirm {
        /// Label, normally one of the offered choices.
        value: String,
        /// Captured content for the label.
        annotation_value: Option<String>,
    },
    Discard,
}

/// Asks the user for the label and content of a new annotation.
///
/// `choices` are the data element names of the document's type; it may be
/// empty, in which case the user types a free label.
pub trait AnnotationPrompt {
    fn request_details(&mut self, choices: &[String]) -> PromptResponse;
}

impl<F> AnnotationPrompt for F
where
    F: FnMut(&[String]) -> PromptResponse,
{
    fn request_details(&mut self, choices: &[String]) -> PromptResponse {
        self(choices)
    }
}
