mod credential_test;
mod helpers;
mod lifecycle_test;
mod onboarding_test;
mod role_test;
