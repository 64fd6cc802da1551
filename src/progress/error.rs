use thiserror::Error;

pub type SessionResult<T> = std::result::Result<T, QuizError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("NoSelection: pick an option before checking")]
    NoSelection,

    #[error("AlreadyChecked: answer is locked")]
    AlreadyChecked,

    #[error("NotChecked: check the answer before moving on")]
    NotChecked,

    #[error("OptionOutOfRange: option {option} of {options}")]
    OptionOutOfRange { option: usize, options: usize },

    #[error("AnswerCountMismatch: expected {expected}, got {given}")]
    AnswerCountMismatch { expected: usize, given: usize },

    #[error("Finished: quiz is already completed")]
    Finished,
}
