//! Per-page controllers. Each module owns its view model, message and effect
//! types, reducer, views and boot glue for one of the server-routed pages.

pub mod auth;
pub mod feed;
pub mod new_post;
pub mod notifications;
pub mod post;
pub mod profile;
