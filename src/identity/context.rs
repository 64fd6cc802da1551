//! The slice of the signed-in user that the progress engine is allowed to see.

use uuid::Uuid;

use crate::model::entity::User;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUser {
    user_id: Uuid,
    enrolled_course_ids: Vec<String>,
}

impl ActiveUser {
    pub fn new(user_id: Uuid, enrolled_course_ids: Vec<String>) -> Self {
        Self {
            user_id,
            enrolled_course_ids,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn enrolled_course_ids(&self) -> &[String] {
        &self.enrolled_course_ids
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_course_ids.iter().any(|c| c == course_id)
    }
}

impl From<&User> for ActiveUser {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.enrolled_courses().to_vec())
    }
}
