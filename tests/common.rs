use coursetrack::model::entity::UserCreate;
use coursetrack::state::AppState;
use coursetrack::{Config, build_state};
use tempfile::TempDir;

/// `TestEnv` owns a temporary data directory that is deleted on `Drop`.
pub struct TestEnv {
    _dir: TempDir,
    config: Config,
}

pub fn setup_env() -> TestEnv {
    let dir = tempfile::tempdir().expect("Unable to create temp dir");
    let config = Config::default().with_data_dir(dir.path().join("data"));
    TestEnv { _dir: dir, config }
}

impl TestEnv {
    /// A fresh session over the same data directory, like reloading the app.
    pub fn state(&self) -> AppState {
        build_state(&self.config).expect("Unable to build state")
    }
}

enum Step {
    Run(Box<dyn Fn(&mut AppState)>),
    Restart,
}

pub struct Action {
    pub name: &'static str,
    step: Step,
}

impl Action {
    pub fn new<F>(name: &'static str, f: F) -> Self
    where
        F: Fn(&mut AppState) + 'static,
    {
        Self {
            name,
            step: Step::Run(Box::new(f)),
        }
    }

    pub fn restart() -> Self {
        Self {
            name: "restart",
            step: Step::Restart,
        }
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn run(self, env: &TestEnv) {
        let mut state = env.state();
        for action in self.actions {
            println!("==> Running test action `{}`", action.name);
            match action.step {
                Step::Run(f) => f(&mut state),
                Step::Restart => state = env.state(),
            }
        }
    }
}

// Common actions builders

pub fn signup_action(name: &'static str, email: &'static str) -> Action {
    Action::new("signup", move |state| {
        state
            .signup(UserCreate {
                name: name.into(),
                email: email.into(),
                password: "secret".into(),
            })
            .expect("signup failed");
    })
}

pub fn login_action(email: &'static str) -> Action {
    Action::new("login", move |state| {
        state.login(email, "secret").expect("login failed");
    })
}

pub fn enroll_action(course_id: &'static str) -> Action {
    Action::new("enroll", move |state| {
        state.enroll(course_id).expect("enroll failed");
    })
}

pub fn complete_action(course_id: &'static str, lesson_id: &'static str) -> Action {
    Action::new("complete lesson", move |state| {
        state
            .mark_lesson_completed(course_id, lesson_id)
            .expect("mark completed failed");
    })
}

pub fn expect_progress(course_id: &'static str, expected: u8) -> Action {
    Action::new("expect progress", move |state| {
        assert_eq!(state.course_progress(course_id), expected);
    })
}
