pub mod account;
pub mod address;
pub mod call;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod event;
pub mod notifier;
pub mod status;

pub use dispatcher::{NotificationDispatcher, NotifyError};
