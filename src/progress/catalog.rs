use tracing::debug;

use crate::identity::ActiveUser;
use crate::model::entity::{Course, Difficulty};
use crate::model::{ModelManager, ResourceType, StorageResult, seed};

/// In-memory copy of the course catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    courses: Vec<Course>,
}

/// Narrowing for course listings. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    pub term: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }

    /// Loads the persisted catalog, writing the fixed seed first if storage
    /// has none and seeding is enabled.
    pub fn load(mm: &ModelManager, seed_catalog: bool) -> StorageResult<Self> {
        if seed_catalog && !mm.contains(ResourceType::Course)? {
            let courses = seed::catalog();
            debug!("seeding catalog with {} courses", courses.len());
            mm.save_all(&courses)?;
        }
        Ok(Self::new(mm.load_all()?))
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn enrolled(&self, active: &ActiveUser) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| active.is_enrolled(&c.id))
            .collect()
    }

    pub fn search(&self, filter: &CourseFilter) -> Vec<&Course> {
        let term = filter
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        self.courses
            .iter()
            .filter(|c| match &term {
                Some(term) => {
                    c.title.to_lowercase().contains(term)
                        || c.description.to_lowercase().contains(term)
                }
                None => true,
            })
            .filter(|c| match filter.category.as_deref() {
                Some(category) if !category.is_empty() => c.category == category,
                _ => true,
            })
            .filter(|c| filter.difficulty.is_none_or(|d| c.difficulty == d))
            .collect()
    }

    /// Unique categories in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for course in &self.courses {
            if !seen.contains(&course.category.as_str()) {
                seen.push(&course.category);
            }
        }
        seen
    }
}
