mod user;
pub use user::{ProfileUpdate, User, UserCreate};

mod course;
pub use course::{
    Course, Difficulty, Direction, Lesson, LessonContent, LessonKind, Module, Question,
    QuizContent, VideoContent,
};

mod user_progress;
pub use user_progress::{QuizResult, UserAnswer, UserProgress, percentage};
