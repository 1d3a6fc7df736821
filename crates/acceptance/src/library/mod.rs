//! Step library: the concrete actions and questions scenarios are made of

mod actions;
mod questions;

pub use actions::{ActivateTheirAccount, CreateAccount, CreateProject, SignIn, SignUp};
pub use questions::{AmIAuthenticated, HowManyProjectsDoIHave};
