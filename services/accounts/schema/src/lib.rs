pub mod account_role_history;
pub mod accounts;
pub mod identities;
pub mod outbox_events;
