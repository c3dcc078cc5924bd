pub mod show;
pub mod show_manager;

pub use show::{PatchedFixture, PersistedItem, Show};
pub use show_manager::{ShowManager, SHOW_EXTENSION};
