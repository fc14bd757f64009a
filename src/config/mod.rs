//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoggerConfig (validated, immutable)
//!     → formats/composer/watchdog: consumed once by InterceptorBuilder
//!     → declarations: consumed once by Registry
//!     → levels: handed to TracingSink
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → TracingSink::reload swaps the level table
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Only levels are hot reloadable; templates are read-only once built

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{DeclarationConfig, LevelsConfig, LoggerConfig, WatchdogConfig};
pub use validation::ValidationError;
