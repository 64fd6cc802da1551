use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::repo::{ResourceType, ResourceTyped};

/// One user's completion state for one course.
///
/// `overall_progress` is derived from `completed_lessons` and must be refreshed
/// through [`UserProgress::refresh`] after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    user_id: Uuid,
    course_id: String,
    completed_lessons: Vec<String>,
    quiz_results: Vec<QuizResult>,
    last_accessed: DateTime<Utc>,
    overall_progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub lesson_id: String,
    /// Percentage, 0-100.
    pub score: u8,
    pub completed: bool,
    pub answers: Vec<UserAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_option: usize,
    pub is_correct: bool,
}

impl ResourceTyped for UserProgress {
    fn get_resource_type() -> ResourceType {
        ResourceType::UserProgress
    }
}

/// `round(100 * part / total)`, rounding halves up. Zero when `total` is zero,
/// never above 100.
pub fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part * 200 + total) / (total * 2);
    pct.min(100) as u8
}

impl UserProgress {
    pub fn new(user_id: Uuid, course_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            course_id: course_id.to_string(),
            completed_lessons: Vec::new(),
            quiz_results: Vec::new(),
            last_accessed: now,
            overall_progress: 0,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn course_id(&self) -> &str {
        &self.course_id
    }

    pub fn completed_lessons(&self) -> &[String] {
        &self.completed_lessons
    }

    pub fn quiz_results(&self) -> &[QuizResult] {
        &self.quiz_results
    }

    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed
    }

    pub fn overall_progress(&self) -> u8 {
        self.overall_progress
    }

    pub fn belongs_to(&self, user_id: Uuid, course_id: &str) -> bool {
        self.user_id == user_id && self.course_id == course_id
    }

    pub fn is_lesson_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.iter().any(|l| l == lesson_id)
    }

    pub fn quiz_result(&self, lesson_id: &str) -> Option<&QuizResult> {
        self.quiz_results.iter().find(|q| q.lesson_id == lesson_id)
    }

    /// Appends the lesson to the completion set. Returns false if it was there.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> bool {
        if self.is_lesson_completed(lesson_id) {
            return false;
        }
        self.completed_lessons.push(lesson_id.to_string());
        true
    }

    /// Stores `result` for `lesson_id`, replacing an earlier result in place.
    /// A completed result also marks the lesson as done. Scores above 100 are
    /// capped.
    pub fn record_quiz_result(&mut self, lesson_id: &str, mut result: QuizResult) {
        result.lesson_id = lesson_id.to_string();
        result.score = result.score.min(100);
        let completed = result.completed;

        match self.quiz_results.iter_mut().find(|q| q.lesson_id == lesson_id) {
            Some(existing) => *existing = result,
            None => self.quiz_results.push(result),
        }

        if completed {
            self.complete_lesson(lesson_id);
        }
    }

    /// Re-derives `overall_progress` and stamps the access time.
    pub fn refresh(&mut self, total_lessons: usize, now: DateTime<Utc>) {
        self.overall_progress = percentage(self.completed_lessons.len(), total_lessons);
        self.last_accessed = now;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::fixed_now;

    fn result(lesson: &str, score: u8, completed: bool) -> QuizResult {
        QuizResult {
            lesson_id: lesson.to_string(),
            score,
            completed,
            answers: vec![],
        }
    }

    #[test]
    fn percentage_rounds_and_guards() {
        assert_eq!(percentage(1, 4), 25);
        assert_eq!(percentage(4, 4), 100);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 0), 0);
        assert_eq!(percentage(5, 4), 100);
    }

    #[test]
    fn complete_lesson_is_idempotent() {
        let mut p = UserProgress::new(Uuid::nil(), "1", fixed_now());
        assert!(p.complete_lesson("l1"));
        assert!(!p.complete_lesson("l1"));
        assert_eq!(p.completed_lessons(), ["l1"]);
    }

    #[test]
    fn quiz_result_is_replaced_in_place() {
        let mut p = UserProgress::new(Uuid::nil(), "1", fixed_now());
        p.record_quiz_result("l2", result("l2", 50, false));
        p.record_quiz_result("l4", result("l4", 100, true));
        p.record_quiz_result("l2", result("l2", 100, true));

        assert_eq!(p.quiz_results().len(), 2);
        assert_eq!(p.quiz_results()[0], result("l2", 100, true));
        assert_eq!(p.quiz_results()[1].lesson_id, "l4");
        assert_eq!(p.completed_lessons(), ["l4", "l2"]);
    }

    #[test]
    fn recorded_result_takes_the_lesson_key() {
        let mut p = UserProgress::new(Uuid::nil(), "1", fixed_now());
        p.record_quiz_result("l2", result("other", 0, false));
        assert!(p.quiz_result("l2").is_some());
        assert!(p.quiz_result("other").is_none());
    }

    #[test]
    fn recorded_score_is_capped() {
        let mut p = UserProgress::new(Uuid::nil(), "1", fixed_now());
        p.record_quiz_result("l2", result("l2", 250, true));
        assert_eq!(p.quiz_result("l2").map(|r| r.score), Some(100));
    }

    #[test]
    fn refresh_derives_progress() {
        let mut p = UserProgress::new(Uuid::nil(), "1", fixed_now());
        p.complete_lesson("l1");
        p.refresh(4, fixed_now());
        assert_eq!(p.overall_progress(), 25);
        p.refresh(0, fixed_now());
        assert_eq!(p.overall_progress(), 0);
    }
}
