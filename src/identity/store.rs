use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::identity::{ActiveUser, IdentityError, IdentityResult};
use crate::model::entity::{ProfileUpdate, User, UserCreate};
use crate::model::{ModelManager, ResourceType, StorageResult, seed};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Session {
    user_id: Uuid,
}

/// Owns the registered users, the signed-in user and their enrollments.
#[derive(Debug)]
pub struct IdentityStore {
    mm: ModelManager,
    current: Option<User>,
    demo_enabled: bool,
}

impl IdentityStore {
    /// Restores the previous session, if any, and makes sure the demo account
    /// exists when it is enabled.
    #[tracing::instrument(skip(mm))]
    pub fn init(mm: ModelManager, demo_enabled: bool) -> StorageResult<Self> {
        if demo_enabled && !mm.contains(ResourceType::DemoUser)? {
            debug!("creating demo account");
            mm.save_record(ResourceType::DemoUser, &seed::demo_user())?;
        }

        let current = match mm.load_record::<Session>(ResourceType::Session)? {
            Some(session) => {
                let users: Vec<User> = mm.load_all()?;
                let user = users.into_iter().find(|u| u.id() == session.user_id);
                if user.is_none() {
                    debug!("session points at unknown user {}", session.user_id);
                }
                user
            }
            None => None,
        };

        Ok(Self {
            mm,
            current,
            demo_enabled,
        })
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn active_user(&self) -> Option<ActiveUser> {
        self.current.as_ref().map(ActiveUser::from)
    }

    pub fn users(&self) -> StorageResult<Vec<User>> {
        self.mm.load_all()
    }

    #[tracing::instrument(skip(self, data), fields(email = %data.email))]
    pub fn signup(&mut self, data: UserCreate) -> IdentityResult<&User> {
        let name = data.name.trim();
        let email = data.email.trim();
        if name.is_empty() {
            return Err(IdentityError::field_required("name"));
        }
        if email.is_empty() {
            return Err(IdentityError::field_required("email"));
        }
        if data.password.is_empty() {
            return Err(IdentityError::field_required("password"));
        }

        let mut users: Vec<User> = self.mm.load_all()?;
        if users.iter().any(|u| u.email() == email) {
            return Err(IdentityError::email_taken(email));
        }

        let user = User::new(UserCreate {
            name: name.to_string(),
            email: email.to_string(),
            password: data.password,
        });
        users.push(user.clone());
        self.mm.save_all(&users)?;
        info!("registered user {}", user.id());

        Ok(self.start_session(user)?)
    }

    #[tracing::instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> IdentityResult<&User> {
        let mut users: Vec<User> = self.mm.load_all()?;

        if let Some(user) = users.iter().find(|u| u.matches_credentials(email, password)) {
            let user = user.clone();
            info!("user {} logged in", user.id());
            return Ok(self.start_session(user)?);
        }

        if self.demo_enabled && email == seed::DEMO_EMAIL && password == seed::DEMO_PASSWORD {
            let demo = match self.mm.load_record::<User>(ResourceType::DemoUser)? {
                Some(demo) => demo,
                None => {
                    let demo = seed::demo_user();
                    self.mm.save_record(ResourceType::DemoUser, &demo)?;
                    demo
                }
            };
            // keep the demo account in `users` so enrollment edits stick
            if !users.iter().any(|u| u.id() == demo.id()) {
                users.push(demo.clone());
                self.mm.save_all(&users)?;
            }
            info!("demo user logged in");
            return Ok(self.start_session(demo)?);
        }

        Err(IdentityError::InvalidCredentials)
    }

    pub fn logout(&mut self) -> StorageResult<()> {
        if let Some(user) = self.current.take() {
            info!("user {} logged out", user.id());
        }
        self.mm.remove_record(ResourceType::Session)
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> IdentityResult<()> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(IdentityError::field_required("name"));
            }
        }

        let Some(user) = self.current.as_mut() else {
            trace!("update_profile without active user, ignored");
            return Ok(());
        };
        user.apply_profile(update);
        self.persist_current()?;
        Ok(())
    }

    /// No-op when nobody is signed in or the course is already enrolled.
    pub fn enroll(&mut self, course_id: &str) -> StorageResult<()> {
        let Some(user) = self.current.as_mut() else {
            trace!("enroll without active user, ignored");
            return Ok(());
        };
        if user.enroll(course_id) {
            debug!("user {} enrolled in course {}", user.id(), course_id);
            self.persist_current()?;
        }
        Ok(())
    }

    /// Leaves the user's progress ledger untouched.
    pub fn unenroll(&mut self, course_id: &str) -> StorageResult<()> {
        let Some(user) = self.current.as_mut() else {
            trace!("unenroll without active user, ignored");
            return Ok(());
        };
        if user.unenroll(course_id) {
            debug!("user {} left course {}", user.id(), course_id);
            self.persist_current()?;
        }
        Ok(())
    }

    fn start_session(&mut self, user: User) -> StorageResult<&User> {
        self.mm.save_record(
            ResourceType::Session,
            &Session {
                user_id: user.id(),
            },
        )?;
        Ok(&*self.current.insert(user))
    }

    fn persist_current(&self) -> StorageResult<()> {
        let Some(current) = self.current.as_ref() else {
            return Ok(());
        };
        let mut users: Vec<User> = self.mm.load_all()?;
        match users.iter_mut().find(|u| u.id() == current.id()) {
            Some(stored) => *stored = current.clone(),
            None => users.push(current.clone()),
        }
        self.mm.save_all(&users)
    }
}
