use tracing::{debug, trace};
use uuid::Uuid;

use crate::identity::ActiveUser;
use crate::model::entity::{Course, Lesson, QuizResult, UserProgress};
use crate::model::{ModelManager, StorageResult};
use crate::progress::Catalog;
use crate::utils::Clock;

/// Numbers behind the learner dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<'a> {
    pub enrolled_courses: Vec<&'a Course>,
    pub completed_lessons: usize,
    pub quizzes_taken: usize,
    /// Up to three ledger entries of enrolled courses, most recent first.
    pub recent_activity: Vec<&'a UserProgress>,
}

const RECENT_ACTIVITY_LIMIT: usize = 3;

/// Owns the catalog and the active user's progress ledger.
///
/// Reads never fail: a missing user, course or ledger entry yields 0, false
/// or an empty list. Mutations on missing data are silent no-ops; only storage
/// failures surface as errors.
#[derive(Debug)]
pub struct ProgressEngine {
    mm: ModelManager,
    clock: Clock,
    catalog: Catalog,
    ledger: Vec<UserProgress>,
    ledger_owner: Option<Uuid>,
}

impl ProgressEngine {
    pub fn init(mm: ModelManager, clock: Clock, seed_catalog: bool) -> StorageResult<Self> {
        let catalog = Catalog::load(&mm, seed_catalog)?;
        Ok(Self::with_catalog(mm, clock, catalog))
    }

    pub fn with_catalog(mm: ModelManager, clock: Clock, catalog: Catalog) -> Self {
        Self {
            mm,
            clock,
            catalog,
            ledger: Vec::new(),
            ledger_owner: None,
        }
    }

    /// Swaps in the persisted ledger of `active`. Call whenever the signed-in
    /// user changes; reads only see the loaded user's ledger.
    pub fn load_ledger(&mut self, active: Option<&ActiveUser>) -> StorageResult<()> {
        match active {
            Some(active) => self.ensure_ledger(active.user_id()),
            None => {
                self.ledger.clear();
                self.ledger_owner = None;
                Ok(())
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn courses(&self) -> &[Course] {
        self.catalog.courses()
    }

    pub fn progress_ledger(&self) -> &[UserProgress] {
        &self.ledger
    }

    pub fn get_course(&self, id: &str) -> Option<&Course> {
        self.catalog.get(id)
    }

    pub fn get_enrolled_courses(&self, active: Option<&ActiveUser>) -> Vec<&Course> {
        match active {
            Some(active) => self.catalog.enrolled(active),
            None => Vec::new(),
        }
    }

    pub fn get_course_progress(&self, active: Option<&ActiveUser>, course_id: &str) -> u8 {
        self.entry(active, course_id)
            .map_or(0, UserProgress::overall_progress)
    }

    pub fn get_lesson_completion(
        &self,
        active: Option<&ActiveUser>,
        course_id: &str,
        lesson_id: &str,
    ) -> bool {
        self.entry(active, course_id)
            .is_some_and(|p| p.is_lesson_completed(lesson_id))
    }

    pub fn quiz_result(
        &self,
        active: Option<&ActiveUser>,
        course_id: &str,
        lesson_id: &str,
    ) -> Option<&QuizResult> {
        self.entry(active, course_id)
            .and_then(|p| p.quiz_result(lesson_id))
    }

    #[tracing::instrument(skip(self, active), fields(user = ?active.map(ActiveUser::user_id)))]
    pub fn mark_lesson_completed(
        &mut self,
        active: Option<&ActiveUser>,
        course_id: &str,
        lesson_id: &str,
    ) -> StorageResult<()> {
        let Some(user_id) = active.map(ActiveUser::user_id) else {
            trace!("no active user, nothing to mark");
            return Ok(());
        };
        let Some(total_lessons) = self.catalog.get(course_id).map(Course::total_lessons) else {
            trace!("unknown course, nothing to mark");
            return Ok(());
        };

        self.ensure_ledger(user_id)?;
        if self.get_lesson_completion(active, course_id, lesson_id) {
            trace!("lesson already completed");
            return Ok(());
        }

        let now = self.clock.now();
        let progress = self.update_entry(user_id, course_id, |entry| {
            entry.complete_lesson(lesson_id);
            entry.refresh(total_lessons, now);
        })?;
        debug!("lesson completed, course progress now {}%", progress);
        Ok(())
    }

    #[tracing::instrument(skip(self, active, result), fields(user = ?active.map(ActiveUser::user_id)))]
    pub fn save_quiz_result(
        &mut self,
        active: Option<&ActiveUser>,
        course_id: &str,
        lesson_id: &str,
        result: QuizResult,
    ) -> StorageResult<()> {
        let Some(user_id) = active.map(ActiveUser::user_id) else {
            trace!("no active user, quiz result dropped");
            return Ok(());
        };
        let Some(total_lessons) = self.catalog.get(course_id).map(Course::total_lessons) else {
            trace!("unknown course, quiz result dropped");
            return Ok(());
        };

        self.ensure_ledger(user_id)?;

        let now = self.clock.now();
        let score = result.score;
        let progress = self.update_entry(user_id, course_id, |entry| {
            entry.record_quiz_result(lesson_id, result);
            entry.refresh(total_lessons, now);
        })?;
        debug!(
            "quiz scored {}%, course progress now {}%",
            score, progress
        );
        Ok(())
    }

    /// First lesson, in module order, the user has not completed yet, or the
    /// very first lesson once everything is done.
    pub fn continue_lesson(&self, active: Option<&ActiveUser>, course_id: &str) -> Option<&Lesson> {
        let course = self.catalog.get(course_id)?;
        course
            .lessons()
            .find(|l| !self.get_lesson_completion(active, course_id, &l.id))
            .or_else(|| course.first_lesson())
    }

    pub fn dashboard(&self, active: Option<&ActiveUser>) -> Dashboard<'_> {
        let enrolled_courses = self.get_enrolled_courses(active);
        let Some(active) = active else {
            return Dashboard {
                enrolled_courses,
                completed_lessons: 0,
                quizzes_taken: 0,
                recent_activity: Vec::new(),
            };
        };

        let own: Vec<&UserProgress> = self
            .ledger
            .iter()
            .filter(|p| p.user_id() == active.user_id())
            .collect();

        let mut recent_activity: Vec<&UserProgress> = own
            .iter()
            .copied()
            .filter(|p| active.is_enrolled(p.course_id()))
            .collect();
        recent_activity.sort_by_key(|p| std::cmp::Reverse(p.last_accessed()));
        recent_activity.truncate(RECENT_ACTIVITY_LIMIT);

        Dashboard {
            enrolled_courses,
            completed_lessons: own.iter().map(|p| p.completed_lessons().len()).sum(),
            quizzes_taken: own.iter().map(|p| p.quiz_results().len()).sum(),
            recent_activity,
        }
    }

    fn entry(&self, active: Option<&ActiveUser>, course_id: &str) -> Option<&UserProgress> {
        let user_id = active?.user_id();
        self.ledger.iter().find(|p| p.belongs_to(user_id, course_id))
    }

    /// Applies `change` to a copy of the (user, course) entry, creating it if
    /// needed, and swaps the copy in only once the whole collection is stored.
    /// Returns the entry's refreshed progress.
    fn update_entry<F>(&mut self, user_id: Uuid, course_id: &str, change: F) -> StorageResult<u8>
    where
        F: FnOnce(&mut UserProgress),
    {
        let mut ledger = self.ledger.clone();
        let idx = match ledger.iter().position(|p| p.belongs_to(user_id, course_id)) {
            Some(idx) => idx,
            None => {
                debug!("creating ledger entry for course {}", course_id);
                ledger.push(UserProgress::new(user_id, course_id, self.clock.now()));
                ledger.len() - 1
            }
        };
        change(&mut ledger[idx]);
        let progress = ledger[idx].overall_progress();

        // whole-collection overwrite
        self.mm.save_owned(user_id, &ledger)?;
        self.ledger = ledger;
        Ok(progress)
    }

    fn ensure_ledger(&mut self, user_id: Uuid) -> StorageResult<()> {
        if self.ledger_owner != Some(user_id) {
            self.ledger = self.mm.load_owned(user_id)?;
            self.ledger_owner = Some(user_id);
            trace!("loaded {} ledger entries for {}", self.ledger.len(), user_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;

    use super::*;
    use crate::model::entity::{Difficulty, LessonContent, Module, UserAnswer, VideoContent};
    use crate::model::{MemoryStore, Store, StorageError, seed};
    use crate::utils::{fixed_clock, fixed_now};

    fn lesson(id: &str) -> Lesson {
        Lesson {
            id: id.into(),
            title: format!("Lesson {id}"),
            duration: None,
            content: LessonContent::Video(VideoContent {
                video_id: "vid".into(),
                description: String::new(),
            }),
        }
    }

    fn course(id: &str, modules: Vec<Vec<&str>>) -> Course {
        Course {
            id: id.into(),
            title: format!("Course {id}"),
            description: String::new(),
            instructor: "Someone".into(),
            thumbnail: String::new(),
            duration: "1 week".into(),
            modules: modules
                .into_iter()
                .enumerate()
                .map(|(i, lessons)| Module {
                    id: format!("{id}-m{i}"),
                    title: format!("Module {i}"),
                    lessons: lessons.into_iter().map(lesson).collect(),
                })
                .collect(),
            difficulty: Difficulty::Beginner,
            category: "Testing".into(),
            rating: 4.0,
        }
    }

    fn engine() -> ProgressEngine {
        let catalog = Catalog::new(vec![
            course("c4", vec![vec!["a", "b"], vec!["c", "d"]]),
            course("empty", vec![vec![]]),
            course("c1", vec![vec!["x"]]),
        ]);
        ProgressEngine::with_catalog(ModelManager::in_memory(), fixed_clock(), catalog)
    }

    fn user(courses: &[&str]) -> ActiveUser {
        ActiveUser::new(
            Uuid::new_v4(),
            courses.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn quiz(lesson: &str, score: u8, completed: bool) -> QuizResult {
        QuizResult {
            lesson_id: lesson.into(),
            score,
            completed,
            answers: vec![UserAnswer {
                question_id: "q1".into(),
                selected_option: 0,
                is_correct: score > 0,
            }],
        }
    }

    #[test]
    fn progress_is_a_rounded_percentage() {
        let mut engine = engine();
        let u = user(&["c4"]);
        let active = Some(&u);

        assert_eq!(engine.get_course_progress(active, "c4"), 0);
        engine.mark_lesson_completed(active, "c4", "a").unwrap();
        assert_eq!(engine.get_course_progress(active, "c4"), 25);

        for l in ["b", "c", "d"] {
            engine.mark_lesson_completed(active, "c4", l).unwrap();
        }
        assert_eq!(engine.get_course_progress(active, "c4"), 100);
        assert!(engine.get_lesson_completion(active, "c4", "d"));
    }

    #[test]
    fn marking_twice_is_idempotent() {
        let mut engine = engine();
        let u = user(&["c4"]);
        engine.mark_lesson_completed(Some(&u), "c4", "a").unwrap();
        let once = engine.progress_ledger().to_vec();

        engine.clock.advance(Duration::hours(1));
        engine.mark_lesson_completed(Some(&u), "c4", "a").unwrap();
        assert_eq!(engine.progress_ledger(), once.as_slice());
    }

    #[test]
    fn no_active_user_is_a_noop() {
        let mut engine = engine();
        engine.mark_lesson_completed(None, "c4", "a").unwrap();
        engine
            .save_quiz_result(None, "c4", "b", quiz("b", 100, true))
            .unwrap();
        assert!(engine.progress_ledger().is_empty());
        assert_eq!(engine.get_course_progress(None, "c4"), 0);
        assert!(!engine.get_lesson_completion(None, "c4", "a"));
        assert!(engine.get_enrolled_courses(None).is_empty());
    }

    #[test]
    fn unknown_course_is_a_noop() {
        let mut engine = engine();
        let u = user(&[]);
        engine.mark_lesson_completed(Some(&u), "nope", "a").unwrap();
        engine
            .save_quiz_result(Some(&u), "nope", "a", quiz("a", 100, true))
            .unwrap();
        assert!(engine.progress_ledger().is_empty());
    }

    #[test]
    fn zero_lesson_course_stays_at_zero() {
        let mut engine = engine();
        let u = user(&["empty"]);
        engine.mark_lesson_completed(Some(&u), "empty", "ghost").unwrap();
        assert_eq!(engine.get_course_progress(Some(&u), "empty"), 0);
        assert!(engine.get_lesson_completion(Some(&u), "empty", "ghost"));
    }

    #[test]
    fn foreign_lessons_never_exceed_hundred() {
        let mut engine = engine();
        let u = user(&["c1"]);
        engine.mark_lesson_completed(Some(&u), "c1", "x").unwrap();
        engine.mark_lesson_completed(Some(&u), "c1", "stray").unwrap();
        assert_eq!(engine.get_course_progress(Some(&u), "c1"), 100);
    }

    #[test]
    fn quiz_result_replaces_in_place() {
        let mut engine = engine();
        let u = user(&["c4"]);
        let active = Some(&u);

        engine
            .save_quiz_result(active, "c4", "b", quiz("b", 0, false))
            .unwrap();
        assert_eq!(engine.get_course_progress(active, "c4"), 0);
        engine
            .save_quiz_result(active, "c4", "d", quiz("d", 50, true))
            .unwrap();
        engine
            .save_quiz_result(active, "c4", "b", quiz("b", 100, true))
            .unwrap();

        let entry = &engine.progress_ledger()[0];
        assert_eq!(entry.quiz_results().len(), 2);
        assert_eq!(entry.quiz_results()[0], quiz("b", 100, true));
        assert_eq!(entry.completed_lessons(), ["d", "b"]);
        assert_eq!(engine.get_course_progress(active, "c4"), 50);
        assert_eq!(
            engine.quiz_result(active, "c4", "b").map(|r| r.score),
            Some(100)
        );
    }

    #[test]
    fn completed_quiz_does_not_duplicate_lesson() {
        let mut engine = engine();
        let u = user(&["c4"]);
        engine.mark_lesson_completed(Some(&u), "c4", "b").unwrap();
        engine
            .save_quiz_result(Some(&u), "c4", "b", quiz("b", 100, true))
            .unwrap();
        assert_eq!(engine.progress_ledger()[0].completed_lessons(), ["b"]);
        assert_eq!(engine.get_course_progress(Some(&u), "c4"), 25);
    }

    #[test]
    fn ledger_is_persisted_per_user() {
        let mm = ModelManager::in_memory();
        let catalog = Catalog::new(vec![course("c4", vec![vec!["a", "b", "c", "d"]])]);
        let mut engine = ProgressEngine::with_catalog(mm.clone(), fixed_clock(), catalog.clone());
        let ann = user(&["c4"]);
        let bob = user(&["c4"]);

        engine.mark_lesson_completed(Some(&ann), "c4", "a").unwrap();
        engine.mark_lesson_completed(Some(&bob), "c4", "b").unwrap();
        engine.mark_lesson_completed(Some(&bob), "c4", "c").unwrap();

        let mut fresh = ProgressEngine::with_catalog(mm, fixed_clock(), catalog);
        fresh.load_ledger(Some(&ann)).unwrap();
        assert_eq!(fresh.get_course_progress(Some(&ann), "c4"), 25);
        // bob's ledger is not loaded
        assert_eq!(fresh.get_course_progress(Some(&bob), "c4"), 0);

        fresh.load_ledger(Some(&bob)).unwrap();
        assert_eq!(fresh.get_course_progress(Some(&bob), "c4"), 50);
        assert!(!fresh.get_lesson_completion(Some(&bob), "c4", "a"));

        fresh.load_ledger(None).unwrap();
        assert!(fresh.progress_ledger().is_empty());
    }

    #[test]
    fn last_accessed_uses_the_clock() {
        let mut engine = engine();
        let u = user(&["c4"]);
        engine.mark_lesson_completed(Some(&u), "c4", "a").unwrap();
        engine.clock.advance(Duration::minutes(10));
        engine.mark_lesson_completed(Some(&u), "c4", "b").unwrap();
        assert_eq!(
            engine.progress_ledger()[0].last_accessed(),
            fixed_now() + Duration::minutes(10)
        );
    }

    #[test]
    fn continue_lesson_finds_first_incomplete() {
        let mut engine = engine();
        let u = user(&["c4"]);
        let active = Some(&u);
        let next = |e: &ProgressEngine| e.continue_lesson(active, "c4").map(|l| l.id.clone());

        assert_eq!(next(&engine).as_deref(), Some("a"));
        engine.mark_lesson_completed(active, "c4", "a").unwrap();
        engine.mark_lesson_completed(active, "c4", "c").unwrap();
        assert_eq!(next(&engine).as_deref(), Some("b"));

        for l in ["b", "d"] {
            engine.mark_lesson_completed(active, "c4", l).unwrap();
        }
        assert_eq!(next(&engine).as_deref(), Some("a"));
        assert!(engine.continue_lesson(active, "empty").is_none());
    }

    #[test]
    fn continue_lesson_after_leading_empty_module() {
        let catalog = Catalog::new(vec![course("late", vec![vec![], vec!["a", "b"]])]);
        let mut engine =
            ProgressEngine::with_catalog(ModelManager::in_memory(), fixed_clock(), catalog);
        let u = user(&["late"]);
        let active = Some(&u);

        for l in ["a", "b"] {
            engine.mark_lesson_completed(active, "late", l).unwrap();
        }
        assert_eq!(
            engine.continue_lesson(active, "late").map(|l| l.id.as_str()),
            Some("a")
        );
    }

    #[test]
    fn dashboard_summarises_enrolled_activity() {
        let mut engine = engine();
        let u = user(&["c4", "c1"]);
        let active = Some(&u);

        engine.mark_lesson_completed(active, "c4", "a").unwrap();
        engine.clock.advance(Duration::minutes(1));
        engine.mark_lesson_completed(active, "c1", "x").unwrap();
        engine.clock.advance(Duration::minutes(1));
        engine
            .save_quiz_result(active, "c4", "b", quiz("b", 100, true))
            .unwrap();
        engine.clock.advance(Duration::minutes(1));
        // not enrolled: counted, but not listed as recent
        engine.mark_lesson_completed(active, "empty", "ghost").unwrap();

        let dashboard = engine.dashboard(active);
        assert_eq!(dashboard.enrolled_courses.len(), 2);
        assert_eq!(dashboard.completed_lessons, 4);
        assert_eq!(dashboard.quizzes_taken, 1);
        let recent: Vec<&str> = dashboard
            .recent_activity
            .iter()
            .map(|p| p.course_id())
            .collect();
        assert_eq!(recent, ["c4", "c1"]);

        let empty = engine.dashboard(None);
        assert!(empty.recent_activity.is_empty());
        assert_eq!(empty.completed_lessons, 0);
    }

    #[test]
    fn seeded_engine_matches_catalog() {
        let engine = ProgressEngine::init(ModelManager::in_memory(), fixed_clock(), true).unwrap();
        assert_eq!(engine.courses().len(), seed::catalog().len());
        assert_eq!(
            engine.get_course("1").map(Course::total_lessons),
            Some(4)
        );
        assert!(engine.get_course("missing").is_none());
    }

    /// Memory store whose next `failures` writes error out.
    #[derive(Debug, Default)]
    struct FailingWrites {
        inner: MemoryStore,
        failures: Arc<AtomicUsize>,
    }

    impl Store for FailingWrites {
        fn read(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> StorageResult<()> {
            let pending = self.failures.load(Ordering::SeqCst);
            if pending > 0 {
                self.failures.store(pending - 1, Ordering::SeqCst);
                return Err(StorageError::IoError(std::io::Error::other("disk full")));
            }
            self.inner.write(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn failed_write_keeps_ledger_and_retry_persists() {
        let failures = Arc::new(AtomicUsize::new(0));
        let mm = ModelManager::new(FailingWrites {
            inner: MemoryStore::new(),
            failures: failures.clone(),
        });
        let catalog = Catalog::new(vec![course("c4", vec![vec!["a", "b", "c", "d"]])]);
        let mut engine = ProgressEngine::with_catalog(mm.clone(), fixed_clock(), catalog.clone());
        let u = user(&["c4"]);
        let active = Some(&u);

        failures.store(1, Ordering::SeqCst);
        assert!(engine.mark_lesson_completed(active, "c4", "a").is_err());
        assert!(engine.progress_ledger().is_empty());
        assert!(!engine.get_lesson_completion(active, "c4", "a"));

        engine.mark_lesson_completed(active, "c4", "a").unwrap();
        assert_eq!(engine.get_course_progress(active, "c4"), 25);

        failures.store(1, Ordering::SeqCst);
        let before = engine.progress_ledger().to_vec();
        assert!(
            engine
                .save_quiz_result(active, "c4", "b", quiz("b", 100, true))
                .is_err()
        );
        assert_eq!(engine.progress_ledger(), before.as_slice());

        engine
            .save_quiz_result(active, "c4", "b", quiz("b", 100, true))
            .unwrap();

        let mut fresh = ProgressEngine::with_catalog(mm, fixed_clock(), catalog);
        fresh.load_ledger(active).unwrap();
        assert_eq!(fresh.get_course_progress(active, "c4"), 50);
        assert_eq!(fresh.quiz_result(active, "c4", "b").map(|r| r.score), Some(100));
    }
}
