//! A single quiz attempt, question by question.
//!
//! Each question is first *unchecked* (selection may change), then *checked*
//! (selection locked, answer logged). Advancing past the last checked question
//! scores the attempt and completes the session.

use tracing::debug;

use crate::model::entity::{Lesson, Question, QuizResult, UserAnswer, percentage};
use crate::progress::{QuizError, SessionResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizState {
    InProgress {
        index: usize,
        selected: Option<usize>,
        checked: bool,
    },
    Completed(QuizResult),
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    lesson_id: String,
    questions: Vec<Question>,
    answers: Vec<UserAnswer>,
    state: QuizState,
}

/// `round(100 * correct / total)`; a zero-question quiz scores 0.
pub fn score(correct: usize, total: usize) -> u8 {
    percentage(correct, total)
}

impl QuizSession {
    pub fn new(lesson_id: &str, questions: Vec<Question>) -> Self {
        let state = if questions.is_empty() {
            QuizState::Completed(QuizResult {
                lesson_id: lesson_id.to_string(),
                score: 0,
                completed: true,
                answers: Vec::new(),
            })
        } else {
            QuizState::InProgress {
                index: 0,
                selected: None,
                checked: false,
            }
        };

        Self {
            lesson_id: lesson_id.to_string(),
            questions,
            answers: Vec::new(),
            state,
        }
    }

    /// `None` for lessons that carry no quiz.
    pub fn for_lesson(lesson: &Lesson) -> Option<Self> {
        lesson
            .questions()
            .map(|questions| Self::new(&lesson.id, questions.to_vec()))
    }

    pub fn lesson_id(&self) -> &str {
        &self.lesson_id
    }

    pub fn state(&self) -> &QuizState {
        &self.state
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::InProgress { index, .. } => self.questions.get(index),
            QuizState::Completed(_) => None,
        }
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn correct_so_far(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            QuizState::Completed(result) => Some(result),
            QuizState::InProgress { .. } => None,
        }
    }

    /// Picks an option for the current question. Allowed until it is checked.
    pub fn select(&mut self, option: usize) -> SessionResult<()> {
        let options = self.current_question().map_or(0, |q| q.options.len());
        match &mut self.state {
            QuizState::Completed(_) => Err(QuizError::Finished),
            QuizState::InProgress { checked: true, .. } => Err(QuizError::AlreadyChecked),
            QuizState::InProgress { selected, .. } => {
                if option >= options {
                    return Err(QuizError::OptionOutOfRange { option, options });
                }
                *selected = Some(option);
                Ok(())
            }
        }
    }

    /// Locks the selection, logs the answer and reports whether it was right.
    pub fn check(&mut self) -> SessionResult<bool> {
        let QuizState::InProgress {
            index,
            selected,
            checked,
        } = &mut self.state
        else {
            return Err(QuizError::Finished);
        };
        if *checked {
            return Err(QuizError::AlreadyChecked);
        }
        let Some(option) = *selected else {
            return Err(QuizError::NoSelection);
        };
        let question = &self.questions[*index];

        let is_correct = question.is_correct(option);
        self.answers.push(UserAnswer {
            question_id: question.id.clone(),
            selected_option: option,
            is_correct,
        });
        *checked = true;
        Ok(is_correct)
    }

    /// Moves to the next question, or completes the quiz after the last one.
    pub fn advance(&mut self) -> SessionResult<Option<&QuizResult>> {
        let index = match self.state {
            QuizState::Completed(_) => return Err(QuizError::Finished),
            QuizState::InProgress { checked: false, .. } => return Err(QuizError::NotChecked),
            QuizState::InProgress { index, .. } => index,
        };

        if index + 1 < self.questions.len() {
            self.state = QuizState::InProgress {
                index: index + 1,
                selected: None,
                checked: false,
            };
            return Ok(None);
        }

        let result = QuizResult {
            lesson_id: self.lesson_id.clone(),
            score: score(self.correct_so_far(), self.questions.len()),
            completed: true,
            answers: self.answers.clone(),
        };
        debug!(
            "quiz for lesson {} finished with score {}",
            self.lesson_id, result.score
        );
        self.state = QuizState::Completed(result);
        Ok(self.result())
    }
}

/// Runs a whole attempt from one selection per question, in order.
pub fn grade(lesson_id: &str, questions: &[Question], selections: &[usize]) -> SessionResult<QuizResult> {
    if selections.len() != questions.len() {
        return Err(QuizError::AnswerCountMismatch {
            expected: questions.len(),
            given: selections.len(),
        });
    }

    let mut session = QuizSession::new(lesson_id, questions.to_vec());
    for &option in selections {
        session.select(option)?;
        session.check()?;
        session.advance()?;
    }

    match session.state {
        QuizState::Completed(result) => Ok(result),
        QuizState::InProgress { .. } => Err(QuizError::NotChecked),
    }
}
