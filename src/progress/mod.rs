mod catalog;
pub use catalog::{Catalog, CourseFilter};

mod engine;
pub use engine::{Dashboard, ProgressEngine};

mod error;
pub use error::{QuizError, SessionResult};

mod quiz;
pub use quiz::{QuizSession, QuizState, grade, score};
