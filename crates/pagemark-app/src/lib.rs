//! Pagemark Application
//!
//! The viewer session that ties the core components together, plus the
//! configuration, notifications and backend client around it.

pub mod config;
pub mod notification;
pub mod prompt;
mod session;
mod shortcuts;

#[cfg(feature = "native")]
mod http;

pub use config::{AppConfig, ConfigError};
pub use notification::{Notification, NotificationCenter, NotificationLevel};
pub use prompt::{AnnotationPrompt, PromptResponse};
pub use session::ViewerSession;
pub use shortcuts::{Shortcut, ShortcutRegistry};

#[cfg(feature = "native")]
pub use http::HttpBackend;
