//! Fixed catalog written to storage on first start, plus the demo account.

use crate::model::entity::{
    Course, Difficulty, Lesson, LessonContent, Module, Question, QuizContent, User, UserCreate,
    VideoContent,
};

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";

const PEXELS: &str = "https://images.pexels.com/photos";

fn thumbnail(photo: u32) -> String {
    format!(
        "{PEXELS}/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=1"
    )
}

fn video(id: &str, title: &str, duration: &str, video_id: &str, description: &str) -> Lesson {
    Lesson {
        id: id.into(),
        title: title.into(),
        duration: Some(duration.into()),
        content: LessonContent::Video(VideoContent {
            video_id: video_id.into(),
            description: description.into(),
        }),
    }
}

fn quiz(id: &str, title: &str, questions: Vec<Question>) -> Lesson {
    Lesson {
        id: id.into(),
        title: title.into(),
        duration: None,
        content: LessonContent::Quiz(QuizContent { questions }),
    }
}

fn question(id: &str, text: &str, options: &[&str], correct_answer: usize) -> Question {
    Question {
        id: id.into(),
        text: text.into(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_answer,
    }
}

fn module(id: &str, title: &str, lessons: Vec<Lesson>) -> Module {
    Module {
        id: id.into(),
        title: title.into(),
        lessons,
    }
}

pub fn catalog() -> Vec<Course> {
    vec![
        Course {
            id: "1".into(),
            title: "Introduction to Web Development".into(),
            description: "Learn the fundamentals of web development, including HTML, CSS, and \
                JavaScript. Build your first responsive website and understand core concepts."
                .into(),
            instructor: "Sarah Johnson".into(),
            thumbnail: thumbnail(1181263),
            duration: "8 weeks".into(),
            difficulty: Difficulty::Beginner,
            category: "Web Development".into(),
            rating: 4.7,
            modules: vec![
                module(
                    "m1",
                    "HTML Fundamentals",
                    vec![
                        video(
                            "l1",
                            "Introduction to HTML",
                            "15:30",
                            "qz0aGYrrlhU",
                            "Learn the basics of HTML and how to structure a webpage.",
                        ),
                        quiz(
                            "l2",
                            "HTML Quiz",
                            vec![
                                question(
                                    "q1",
                                    "What does HTML stand for?",
                                    &[
                                        "Hyper Text Markup Language",
                                        "Highly Typed Modern Language",
                                        "Home Tool Markup Language",
                                        "Hyper Transfer Method Language",
                                    ],
                                    0,
                                ),
                                question(
                                    "q2",
                                    "Which tag is used to create a hyperlink?",
                                    &["<link>", "<a>", "<href>", "<p>"],
                                    1,
                                ),
                            ],
                        ),
                    ],
                ),
                module(
                    "m2",
                    "CSS Styling",
                    vec![
                        video(
                            "l3",
                            "CSS Basics",
                            "18:45",
                            "1PnVor36_40",
                            "Learn how to style your HTML elements with CSS.",
                        ),
                        quiz(
                            "l4",
                            "CSS Quiz",
                            vec![
                                question(
                                    "q3",
                                    "Which property is used to change the background color?",
                                    &["color", "bgcolor", "background-color", "background"],
                                    2,
                                ),
                                question(
                                    "q4",
                                    "Which CSS property controls the text size?",
                                    &["font-size", "text-size", "font-style", "text-style"],
                                    0,
                                ),
                            ],
                        ),
                    ],
                ),
            ],
        },
        Course {
            id: "2".into(),
            title: "Advanced React Development".into(),
            description: "Take your React skills to the next level. Learn about hooks, context \
                API, and advanced state management techniques."
                .into(),
            instructor: "Michael Chen".into(),
            thumbnail: thumbnail(5483071),
            duration: "10 weeks".into(),
            difficulty: Difficulty::Advanced,
            category: "JavaScript Frameworks".into(),
            rating: 4.9,
            modules: vec![module(
                "m3",
                "React Hooks",
                vec![video(
                    "l5",
                    "Understanding useState and useEffect",
                    "22:15",
                    "TNhaISOUy6Q",
                    "Learn about the most commonly used React hooks and how to implement them \
                        effectively.",
                )],
            )],
        },
        Course {
            id: "3".into(),
            title: "Python for Data Science".into(),
            description: "Explore data analysis and visualization techniques using Python. Learn \
                libraries such as pandas, numpy, and matplotlib."
                .into(),
            instructor: "Alex Rodriguez".into(),
            thumbnail: thumbnail(577585),
            duration: "12 weeks".into(),
            difficulty: Difficulty::Intermediate,
            category: "Data Science".into(),
            rating: 4.5,
            modules: vec![module(
                "m4",
                "Introduction to Python",
                vec![video(
                    "l6",
                    "Python Basics",
                    "19:30",
                    "kqtD5dpn9C8",
                    "Learn the fundamentals of Python programming language.",
                )],
            )],
        },
        Course {
            id: "4".into(),
            title: "UX/UI Design Fundamentals".into(),
            description: "Learn the principles of user experience and interface design. Create \
                wireframes, prototypes, and understand user research."
                .into(),
            instructor: "Emily Parker".into(),
            thumbnail: thumbnail(196644),
            duration: "6 weeks".into(),
            difficulty: Difficulty::Beginner,
            category: "Design".into(),
            rating: 4.6,
            modules: vec![module(
                "m5",
                "Design Thinking",
                vec![video(
                    "l7",
                    "Introduction to UX Design",
                    "17:20",
                    "v4PUm0HbRtU",
                    "Understanding the basics of user experience design and the design thinking \
                        process.",
                )],
            )],
        },
    ]
}

pub fn demo_user() -> User {
    User::new(UserCreate {
        name: "Demo User".into(),
        email: DEMO_EMAIL.into(),
        password: DEMO_PASSWORD.into(),
    })
    .with_profile(Some(thumbnail(220453)), Some("Enthusiastic learner".into()))
}
