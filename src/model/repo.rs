use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    User,
    Course,
    UserProgress,
    Session,
    DemoUser,
}

impl ResourceType {
    /// Key under which the resource's collection or record is persisted.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Course => "courses",
            Self::UserProgress => "progress",
            Self::Session => "current_user",
            Self::DemoUser => "demo_user",
        }
    }

    /// Key for collections partitioned per user, e.g. `progress_<uuid>`.
    pub fn owned_key(&self, owner: Uuid) -> String {
        format!("{}_{}", self.storage_key(), owner)
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn owned_key_is_prefixed_with_collection() {
        let id = Uuid::nil();
        assert_eq!(
            ResourceType::UserProgress.owned_key(id),
            "progress_00000000-0000-0000-0000-000000000000"
        );
    }
}
