//! desktidy - Desktop organization behind a small web interface
//!
//! This library moves files out of a user's Desktop folder into category
//! subfolders based on extension rules from a TOML configuration file, with
//! dry-run planning, optional pre-move backups, and a structural undo that
//! flattens category folders back to the Desktop root. A synchronous HTTP
//! façade exposes the operations as four endpoints.

pub mod config;
pub mod desktop;
pub mod organizer;
pub mod output;
pub mod server;
pub mod undo;

pub use config::{CategoryRule, Config, ConfigError, Rules};
pub use desktop::{DesktopError, DesktopLocator};
pub use organizer::{
    Action, BACKUP_DIR, FALLBACK_CATEGORY, OrganizeError, perform_organize, plan_organize,
    unique_destination,
};
pub use output::OutputFormatter;
pub use server::{ServerOptions, serve};
pub use undo::{UndoReport, undo};
