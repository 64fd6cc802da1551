use serde::{Deserialize, Serialize};

use crate::model::repo::{ResourceType, ResourceTyped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            other => Err(format!("unknown difficulty `{other}`")),
        }
    }
}

/// Catalog entry. Seeded once and never edited by learners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub thumbnail: String,
    pub duration: String,
    pub modules: Vec<Module>,
    pub difficulty: Difficulty,
    pub category: String,
    pub rating: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub content: LessonContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonKind {
    Video,
    Quiz,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LessonContent {
    Video(VideoContent),
    Quiz(QuizContent),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    /// External (YouTube) video id.
    pub video_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizContent {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl ResourceTyped for Course {
    fn get_resource_type() -> ResourceType {
        ResourceType::Course
    }
}

impl Course {
    /// Sum of lesson counts over all modules.
    pub fn total_lessons(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// All lessons in module order.
    pub fn lessons(&self) -> impl Iterator<Item = &Lesson> {
        self.modules.iter().flat_map(|m| m.lessons.iter())
    }

    /// First lesson of the first non-empty module.
    pub fn first_lesson(&self) -> Option<&Lesson> {
        self.lessons().next()
    }

    pub fn find_lesson(&self, lesson_id: &str) -> Option<(&Module, &Lesson)> {
        self.modules.iter().find_map(|m| {
            m.lessons
                .iter()
                .find(|l| l.id == lesson_id)
                .map(|l| (m, l))
        })
    }

    /// Neighbour of a lesson, crossing into the adjacent module at the edges.
    ///
    /// Only the directly adjacent module is considered: an empty neighbour
    /// module ends navigation.
    pub fn adjacent_lesson(&self, lesson_id: &str, direction: Direction) -> Option<&Lesson> {
        let (module_idx, lesson_idx) = self.modules.iter().enumerate().find_map(|(mi, m)| {
            m.lessons
                .iter()
                .position(|l| l.id == lesson_id)
                .map(|li| (mi, li))
        })?;
        let module = &self.modules[module_idx];

        match direction {
            Direction::Next => {
                if lesson_idx + 1 < module.lessons.len() {
                    return module.lessons.get(lesson_idx + 1);
                }
                self.modules
                    .get(module_idx + 1)
                    .and_then(|m| m.lessons.first())
            }
            Direction::Previous => {
                if lesson_idx > 0 {
                    return module.lessons.get(lesson_idx - 1);
                }
                module_idx
                    .checked_sub(1)
                    .and_then(|i| self.modules.get(i))
                    .and_then(|m| m.lessons.last())
            }
        }
    }
}

impl Lesson {
    pub fn kind(&self) -> LessonKind {
        match self.content {
            LessonContent::Video(_) => LessonKind::Video,
            LessonContent::Quiz(_) => LessonKind::Quiz,
        }
    }

    pub fn questions(&self) -> Option<&[Question]> {
        match &self.content {
            LessonContent::Quiz(quiz) => Some(&quiz.questions),
            LessonContent::Video(_) => None,
        }
    }
}

impl Question {
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}
