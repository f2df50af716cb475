//! User accounts: registration, login and profiles

pub mod descriptor;
pub mod handlers;
pub mod model;

pub use descriptor::AccountDescriptor;
pub use model::{LoginRequest, Profile, RegisterRequest, UpdateProfile, User};
