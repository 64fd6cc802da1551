//! Session-scoped wiring of the identity store into the progress engine.

use crate::config::Config;
use crate::identity::{ActiveUser, IdentityResult, IdentityStore};
use crate::model::entity::{Course, Lesson, ProfileUpdate, QuizResult, User, UserCreate};
use crate::model::{ModelManager, StorageResult};
use crate::progress::{Dashboard, ProgressEngine};
use crate::utils::Clock;

#[derive(Debug)]
pub struct AppState {
    identity: IdentityStore,
    progress: ProgressEngine,
}

impl AppState {
    pub fn new(mm: ModelManager, clock: Clock, config: &Config) -> StorageResult<Self> {
        let identity = IdentityStore::init(mm.clone(), config.app().demo_user())?;
        let mut progress = ProgressEngine::init(mm, clock, config.app().seed_catalog())?;
        progress.load_ledger(identity.active_user().as_ref())?;
        Ok(Self { identity, progress })
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    pub fn progress(&self) -> &ProgressEngine {
        &self.progress
    }

    pub fn current_user(&self) -> Option<&User> {
        self.identity.current_user()
    }

    pub fn active_user(&self) -> Option<ActiveUser> {
        self.identity.active_user()
    }

    pub fn signup(&mut self, data: UserCreate) -> IdentityResult<User> {
        let user = self.identity.signup(data)?.clone();
        self.reload_ledger()?;
        Ok(user)
    }

    pub fn login(&mut self, email: &str, password: &str) -> IdentityResult<User> {
        let user = self.identity.login(email, password)?.clone();
        self.reload_ledger()?;
        Ok(user)
    }

    pub fn logout(&mut self) -> StorageResult<()> {
        self.identity.logout()?;
        self.reload_ledger()
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> IdentityResult<()> {
        self.identity.update_profile(update)
    }

    pub fn enroll(&mut self, course_id: &str) -> StorageResult<()> {
        if self.progress.get_course(course_id).is_none() {
            tracing::trace!("enroll into unknown course {}, ignored", course_id);
            return Ok(());
        }
        self.identity.enroll(course_id)
    }

    pub fn unenroll(&mut self, course_id: &str) -> StorageResult<()> {
        self.identity.unenroll(course_id)
    }

    pub fn mark_lesson_completed(&mut self, course_id: &str, lesson_id: &str) -> StorageResult<()> {
        let active = self.identity.active_user();
        self.progress
            .mark_lesson_completed(active.as_ref(), course_id, lesson_id)
    }

    pub fn save_quiz_result(
        &mut self,
        course_id: &str,
        lesson_id: &str,
        result: QuizResult,
    ) -> StorageResult<()> {
        let active = self.identity.active_user();
        self.progress
            .save_quiz_result(active.as_ref(), course_id, lesson_id, result)
    }

    pub fn course_progress(&self, course_id: &str) -> u8 {
        self.progress
            .get_course_progress(self.active_user().as_ref(), course_id)
    }

    pub fn lesson_completion(&self, course_id: &str, lesson_id: &str) -> bool {
        self.progress
            .get_lesson_completion(self.active_user().as_ref(), course_id, lesson_id)
    }

    pub fn quiz_result(&self, course_id: &str, lesson_id: &str) -> Option<&QuizResult> {
        self.progress
            .quiz_result(self.active_user().as_ref(), course_id, lesson_id)
    }

    pub fn enrolled_courses(&self) -> Vec<&Course> {
        self.progress
            .get_enrolled_courses(self.active_user().as_ref())
    }

    pub fn continue_lesson(&self, course_id: &str) -> Option<&Lesson> {
        self.progress
            .continue_lesson(self.active_user().as_ref(), course_id)
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        self.progress.dashboard(self.active_user().as_ref())
    }

    fn reload_ledger(&mut self) -> StorageResult<()> {
        let active = self.identity.active_user();
        self.progress.load_ledger(active.as_ref())
    }
}
