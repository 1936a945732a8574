//! Grimoire Engine library.
//!
//! Loads the subclass catalog and runs the progression rules for characters.
//!
//! ## Structure
//!
//! - `infrastructure/` - Catalog import, configuration, ports and adapters
//! - `stores/` - In-memory per-character and view state
//! - `use_cases/` - Progression operations over catalog and stores
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
