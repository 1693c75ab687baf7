//! Solidity compilation subsystem.
//!
//! # Data Flow
//! ```text
//! contracts/Lottery.sol
//!     → artifact.rs (SourceUnit, read once)
//!     → solc.rs (solc --standard-json subprocess)
//!     → CompiledArtifact { bytecode, abi }
//! ```
//!
//! Toolchain installation and version management are external; this module
//! invokes whatever `solc` the configuration points at and distinguishes
//! "binary missing" from "source does not compile".

pub mod artifact;
pub mod solc;

pub use artifact::{CompiledArtifact, SourceUnit};
pub use solc::SolcCompiler;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while producing a deployable artifact.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The solc binary could not be located or executed at all.
    #[error("solc toolchain unavailable ({path}): {reason}")]
    ToolchainUnavailable { path: String, reason: String },

    /// The source file could not be read.
    #[error("cannot read source {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// solc ran and reported compile errors. Diagnostics keep solc's own
    /// formatting, including file and line positions.
    #[error("compilation failed:\n{}", diagnostics.join("\n"))]
    Solc { diagnostics: Vec<String> },

    /// The standard JSON exchange itself broke: unserializable input,
    /// unparseable output, or a non-zero solc exit.
    #[error("solc interface error: {0}")]
    Interface(String),

    /// Compilation succeeded but the requested contract is not in the output.
    #[error("contract '{name}' not found in compiled output of {source_file}")]
    ContractMissing { name: String, source_file: String },

    /// Compilation succeeded but produced no creation bytecode, as happens
    /// for interfaces and abstract contracts.
    #[error("contract '{0}' has no creation bytecode (interface or abstract contract)")]
    EmptyBytecode(String),
}
