//! `duka-dashboard` — derived view model over the repository streams.
//!
//! Combines the three repository streams into four independently-updating
//! derived values, each shared across observers behind a keep-alive window:
//! one pipeline and one recomputation per underlying mutation, however many
//! screens are watching.

pub mod aggregate;
pub mod model;
pub mod shared;

pub use model::Dashboard;
pub use shared::{KEEP_ALIVE, Shared, SharedSubscription};
