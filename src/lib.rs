//! Lottery contract deployment toolkit: compile with solc, deploy over
//! JSON-RPC, persist the `{address, abi}` record, and serve it read-only.

pub mod blockchain;
pub mod compiler;
pub mod config;
pub mod oracle;
pub mod pipeline;
pub mod server;
pub mod store;

pub use config::DeployerConfig;
pub use pipeline::DeployError;
pub use store::DeploymentRecord;
