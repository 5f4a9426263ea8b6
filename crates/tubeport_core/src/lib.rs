//! Tubeport core: pure session state machine and view-model helpers.
mod credentials;
mod effect;
mod msg;
mod state;
mod task;
mod update;
mod validate;
mod view_model;

pub use credentials::normalize_inline_cookies;
pub use effect::Effect;
pub use msg::{CookieUploadResult, Msg};
pub use state::{AppState, ChainId};
pub use task::{StatusReport, Task, TaskStatus, Transition};
pub use update::update;
pub use validate::{is_admissible, UrlValidity};
pub use view_model::{AppViewModel, Notification, Severity, TaskView};
