use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coursetrack::error::{AppResult, run_with_error_handler};
use coursetrack::identity::{IdentityError, IdentityResult};
use coursetrack::model::entity::{Course, Difficulty, LessonContent, ProfileUpdate, UserCreate};
use coursetrack::progress::{CourseFilter, QuizSession};
use coursetrack::state::AppState;
use coursetrack::{Config, build_state};

#[derive(Parser, Debug)]
#[command(about = "Browse courses, enroll and track your learning progress", long_about = None)]
pub struct Cli {
    /// Override the data directory from config.toml
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Browse the catalog and manage enrollment
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Lessons of a course
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Quizzes
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },

    /// Completion of one course, or of every enrolled course
    Progress { course_id: Option<String> },

    /// Overview of the signed-in learner
    Dashboard,

    /// Print the effective configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        picture: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    List {
        /// Matches title or description
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        difficulty: Option<Difficulty>,
    },
    Show { course_id: String },
    Enroll { course_id: String },
    Unenroll { course_id: String },
    Enrolled,
    /// Show the lesson to pick up next
    Continue { course_id: String },
}

#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Show { course_id: String, lesson_id: String },
    /// Mark a video lesson as watched
    Complete { course_id: String, lesson_id: String },
}

#[derive(Subcommand, Debug)]
pub enum QuizCommands {
    Take {
        course_id: String,
        lesson_id: String,
        /// Selected option per question, zero based
        #[arg(long, value_delimiter = ',', required = true)]
        answers: Vec<usize>,
    },
}

fn main() {
    coursetrack::setup_trace();
    let cli = Cli::parse();
    run_with_error_handler(|| run(cli));
}

fn run(cli: Cli) -> AppResult<()> {
    let mut config = Config::get_or_init(cfg!(debug_assertions)).clone();
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    if let Commands::Config = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let mut state = build_state(&config)?;

    match cli.command {
        Commands::User { action } => user_command(&mut state, action),
        Commands::Course { action } => course_command(&mut state, action),
        Commands::Lesson { action } => lesson_command(&mut state, action),
        Commands::Quiz { action } => quiz_command(&mut state, action),
        Commands::Progress { course_id } => {
            print_progress(&state, course_id.as_deref());
            Ok(())
        }
        Commands::Dashboard => {
            print_dashboard(&state);
            Ok(())
        }
        Commands::Config => Ok(()),
    }
}

/// Validation failures are shown to the user, storage failures propagate.
fn report<T>(result: IdentityResult<T>) -> AppResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(IdentityError::StorageError(e)) => Err(e.into()),
        Err(e) => {
            tracing::debug!("rejected: {}", e);
            eprintln!("{}", e.client_display());
            Ok(None)
        }
    }
}

fn require_login(state: &AppState) -> bool {
    if state.current_user().is_none() {
        eprintln!("Please log in first.");
        return false;
    }
    true
}

fn user_command(state: &mut AppState, action: UserCommands) -> AppResult<()> {
    match action {
        UserCommands::Signup {
            name,
            email,
            password,
        } => {
            if let Some(user) = report(state.signup(UserCreate {
                name,
                email,
                password,
            }))? {
                println!("Welcome, {}! You are now logged in.", user.name());
            }
        }
        UserCommands::Login { email, password } => {
            if let Some(user) = report(state.login(&email, &password))? {
                println!("Welcome back, {}!", user.name());
            }
        }
        UserCommands::Logout => {
            state.logout()?;
            println!("Logged out.");
        }
        UserCommands::Whoami => match state.current_user() {
            Some(user) => {
                println!("{} <{}>", user.name(), user.email());
                if let Some(bio) = user.bio() {
                    println!("{bio}");
                }
                println!("Enrolled courses: {}", user.enrolled_courses().len());
            }
            None => println!("Not logged in."),
        },
        UserCommands::Update { name, bio, picture } => {
            if !require_login(state) {
                return Ok(());
            }
            let update = ProfileUpdate {
                name,
                bio,
                profile_picture: picture,
            };
            if report(state.update_profile(update))?.is_some() {
                println!("Profile updated successfully");
            }
        }
    }
    Ok(())
}

fn course_line(state: &AppState, course: &Course) -> String {
    let enrolled = state
        .current_user()
        .is_some_and(|u| u.is_enrolled(&course.id));
    let mut line = format!(
        "[{}] {} ({}, {}, {:.1}*) by {}",
        course.id, course.title, course.difficulty, course.category, course.rating, course.instructor
    );
    if enrolled {
        line.push_str(&format!(" - {}% complete", state.course_progress(&course.id)));
    }
    line
}

fn course_command(state: &mut AppState, action: CourseCommands) -> AppResult<()> {
    match action {
        CourseCommands::List {
            search,
            category,
            difficulty,
        } => {
            let filter = CourseFilter {
                term: search,
                category,
                difficulty,
            };
            let courses = state.progress().catalog().search(&filter);
            if courses.is_empty() {
                println!("We couldn't find any courses matching your search criteria.");
                println!(
                    "Categories: {}",
                    state.progress().catalog().categories().join(", ")
                );
            }
            for course in courses {
                println!("{}", course_line(state, course));
            }
        }
        CourseCommands::Show { course_id } => {
            let Some(course) = state.progress().get_course(&course_id) else {
                println!("Course not found.");
                return Ok(());
            };
            println!("{}", course_line(state, course));
            println!("{}", course.description);
            println!("{} lessons, {}", course.total_lessons(), course.duration);
            for module in &course.modules {
                println!("  {}", module.title);
                for lesson in &module.lessons {
                    let mark = if state.lesson_completion(&course.id, &lesson.id) {
                        "x"
                    } else {
                        " "
                    };
                    println!("    [{mark}] {} {} ({:?})", lesson.id, lesson.title, lesson.kind());
                }
            }
        }
        CourseCommands::Enroll { course_id } => {
            if !require_login(state) {
                return Ok(());
            }
            if state.progress().get_course(&course_id).is_none() {
                println!("Course not found.");
                return Ok(());
            }
            state.enroll(&course_id)?;
            println!("Enrolled in course {course_id}.");
        }
        CourseCommands::Unenroll { course_id } => {
            if !require_login(state) {
                return Ok(());
            }
            state.unenroll(&course_id)?;
            println!("Left course {course_id}. Your progress is kept.");
        }
        CourseCommands::Enrolled => {
            let courses = state.enrolled_courses();
            if courses.is_empty() {
                println!("You haven't enrolled in any courses yet.");
            }
            for course in courses {
                println!("{}", course_line(state, course));
            }
        }
        CourseCommands::Continue { course_id } => match state.continue_lesson(&course_id) {
            Some(lesson) => println!("Next up: {} {}", lesson.id, lesson.title),
            None => println!("Nothing to continue in course {course_id}."),
        },
    }
    Ok(())
}

fn lesson_command(state: &mut AppState, action: LessonCommands) -> AppResult<()> {
    match action {
        LessonCommands::Show {
            course_id,
            lesson_id,
        } => {
            let Some((module, lesson)) = state
                .progress()
                .get_course(&course_id)
                .and_then(|c| c.find_lesson(&lesson_id))
            else {
                println!("Lesson not found.");
                return Ok(());
            };
            println!("{} / {}", module.title, lesson.title);
            match &lesson.content {
                LessonContent::Video(video) => {
                    println!("https://www.youtube.com/watch?v={}", video.video_id);
                    println!("{}", video.description);
                }
                LessonContent::Quiz(quiz) => {
                    println!("Quiz with {} questions", quiz.questions.len());
                    if let Some(result) = state.quiz_result(&course_id, &lesson_id) {
                        println!("Last score: {}%", result.score);
                    }
                }
            }
            if state.lesson_completion(&course_id, &lesson_id) {
                println!("Completed.");
            }
            if let Some(course) = state.progress().get_course(&course_id) {
                use coursetrack::model::entity::Direction;
                if let Some(prev) = course.adjacent_lesson(&lesson_id, Direction::Previous) {
                    println!("Previous: {} {}", prev.id, prev.title);
                }
                if let Some(next) = course.adjacent_lesson(&lesson_id, Direction::Next) {
                    println!("Next: {} {}", next.id, next.title);
                }
            }
        }
        LessonCommands::Complete {
            course_id,
            lesson_id,
        } => {
            if !require_login(state) {
                return Ok(());
            }
            state.mark_lesson_completed(&course_id, &lesson_id)?;
            println!(
                "Course {} is {}% complete.",
                course_id,
                state.course_progress(&course_id)
            );
        }
    }
    Ok(())
}

fn quiz_command(state: &mut AppState, action: QuizCommands) -> AppResult<()> {
    let QuizCommands::Take {
        course_id,
        lesson_id,
        answers,
    } = action;

    if !require_login(state) {
        return Ok(());
    }

    let session = state
        .progress()
        .get_course(&course_id)
        .and_then(|c| c.find_lesson(&lesson_id))
        .and_then(|(_, lesson)| QuizSession::for_lesson(lesson));
    let Some(mut session) = session else {
        println!("Quiz not found.");
        return Ok(());
    };

    if answers.len() != session.total_questions() {
        println!(
            "This quiz has {} questions, {} answers given.",
            session.total_questions(),
            answers.len()
        );
        return Ok(());
    }

    for option in answers {
        if let Some(question) = session.current_question() {
            println!("{}", question.text);
        }
        session.select(option)?;
        let correct = session.check()?;
        println!("  -> {}", if correct { "Correct" } else { "Incorrect" });
        session.advance()?;
    }

    if let Some(result) = session.result().cloned() {
        println!("Quiz Completed! Your score: {}%", result.score);
        state.save_quiz_result(&course_id, &lesson_id, result)?;
    }
    Ok(())
}

fn print_progress(state: &AppState, course_id: Option<&str>) {
    match course_id {
        Some(course_id) => println!("{}% complete", state.course_progress(course_id)),
        None => {
            for course in state.enrolled_courses() {
                println!("{:>3}% {}", state.course_progress(&course.id), course.title);
            }
        }
    }
}

fn print_dashboard(state: &AppState) {
    let Some(user) = state.current_user() else {
        println!("Not logged in.");
        return;
    };
    let dashboard = state.dashboard();
    println!("Welcome back, {}!", user.name());
    println!("Enrolled courses:  {}", dashboard.enrolled_courses.len());
    println!("Completed lessons: {}", dashboard.completed_lessons);
    println!("Quizzes completed: {}", dashboard.quizzes_taken);
    if !dashboard.recent_activity.is_empty() {
        println!("Recent activity:");
    }
    for entry in dashboard.recent_activity {
        let title = state
            .progress()
            .get_course(entry.course_id())
            .map_or(entry.course_id(), |c| c.title.as_str());
        println!(
            "  {} - {}% complete, last accessed {}",
            title,
            entry.overall_progress(),
            entry.last_accessed().format("%b %-d, %Y")
        );
    }
}
