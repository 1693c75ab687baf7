//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (RPC_URL, PRIVATE_KEY)
//!     → semantic validation
//!     → DeployerConfig (validated, immutable)
//!     → handed to the pipeline / info server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a new run re-reads it
//! - All fields have defaults so a bare environment still works
//! - Secrets only ever travel inside [`schema::Secret`], which redacts itself
//!   in Debug and Display output

pub mod loader;
pub mod schema;

pub use loader::{load_config, validate_config, ConfigError};
pub use schema::ChainConfig;
pub use schema::CompilerConfig;
pub use schema::ConfirmationConfig;
pub use schema::ContractConfig;
pub use schema::DeployerConfig;
pub use schema::Secret;
pub use schema::ServerConfig;
pub use schema::StoreConfig;
pub use schema::VrfConfig;
