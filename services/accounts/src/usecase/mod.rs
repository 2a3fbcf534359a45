pub mod account;
pub mod credential;
pub mod lifecycle;
pub mod onboarding;
pub mod policy;
pub mod role;

mod transition;
