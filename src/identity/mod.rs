mod context;
pub use context::ActiveUser;

mod error;
pub use error::{IdentityError, IdentityResult};

mod store;
pub use store::IdentityStore;
