//! Submission state shared by the auth forms.
//!
//! `Idle → Submitting → Success | Error`. An error keeps the form usable: the next edit
//! clears it back to `Idle`, and a resubmission goes straight to `Submitting`.
//! `Success` is final; the form navigates away.

use api::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error(String),
}

impl FormStatus {
    /// Move to `Submitting`. Returns `false`, leaving the state untouched, when a
    /// submission is already in flight or the form already succeeded.
    pub fn begin_submit(&mut self) -> bool {
        match self {
            FormStatus::Idle | FormStatus::Error(_) => {
                *self = FormStatus::Submitting;
                true
            }
            FormStatus::Submitting | FormStatus::Success => false,
        }
    }

    /// A field was edited.
    pub fn edit(&mut self) {
        if let FormStatus::Error(_) = self {
            *self = FormStatus::Idle;
        }
    }

    /// Record the outcome of the submission.
    pub fn finish<T>(&mut self, result: &Result<T, AuthError>) {
        *self = match result {
            Ok(_) => FormStatus::Success,
            Err(e) => FormStatus::Error(e.user_message()),
        };
    }

    /// Reject the submission before it is sent.
    pub fn reject(&mut self, message: impl Into<String>) {
        *self = FormStatus::Error(message.into());
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, FormStatus::Submitting)
    }

    /// Inputs are editable in `Idle` and `Error`.
    pub fn accepts_input(&self) -> bool {
        matches!(self, FormStatus::Idle | FormStatus::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FormStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}
