use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::repo::{ResourceType, ResourceTyped};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: Uuid,
    name: String,
    email: String,
    // plaintext, demo-grade only
    password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    #[serde(default)]
    enrolled_courses: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Profile fields a user may edit. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

impl ResourceTyped for User {
    fn get_resource_type() -> ResourceType {
        ResourceType::User
    }
}

impl User {
    pub fn new(data: UserCreate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            password: data.password,
            profile_picture: None,
            bio: None,
            enrolled_courses: Vec::new(),
        }
    }

    pub fn with_profile(mut self, profile_picture: Option<String>, bio: Option<String>) -> Self {
        self.profile_picture = profile_picture;
        self.bio = bio;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn profile_picture(&self) -> Option<&str> {
        self.profile_picture.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn enrolled_courses(&self) -> &[String] {
        &self.enrolled_courses
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|c| c == course_id)
    }

    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }

    /// Returns false if the course was already enrolled.
    pub fn enroll(&mut self, course_id: &str) -> bool {
        if self.is_enrolled(course_id) {
            return false;
        }
        self.enrolled_courses.push(course_id.to_string());
        true
    }

    /// Returns false if the course was not enrolled.
    pub fn unenroll(&mut self, course_id: &str) -> bool {
        let before = self.enrolled_courses.len();
        self.enrolled_courses.retain(|c| c != course_id);
        before != self.enrolled_courses.len()
    }

    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(bio) = update.bio {
            self.bio = Some(bio).filter(|b| !b.is_empty());
        }
        if let Some(picture) = update.profile_picture {
            self.profile_picture = Some(picture).filter(|p| !p.is_empty());
        }
    }
}
