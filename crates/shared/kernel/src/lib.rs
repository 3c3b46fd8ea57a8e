//! Kernel utilities shared by herald applications.
//! Keep this crate lightweight; today it only owns layered config loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use herald_kernel::config::load_config;
//!
//! #[derive(serde::Deserialize)]
//! struct AppConfig {
//!     name: String,
//! }
//!
//! let cfg: AppConfig = load_config(Some("arena.toml")).unwrap();
//! # let _ = cfg.name;
//! ```
pub mod config;

pub use crate::config::{ConfigError, ConfigErrorExt, load_config, load_optional_config};
