//! Compilation inputs and outputs.

use std::path::Path;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;

use crate::compiler::CompilerError;

/// A single Solidity source file, read once at pipeline start.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// File name (basename), used as the source key in the compiler input
    /// and in diagnostics.
    pub name: String,
    /// Full source text.
    pub content: String,
}

impl SourceUnit {
    /// Read a source file from disk.
    pub fn from_path(path: &Path) -> Result<Self, CompilerError> {
        let content = std::fs::read_to_string(path).map_err(|source| CompilerError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, content })
    }
}

/// Output of a successful compilation, ready for deployment.
///
/// Bytecode is guaranteed non-empty and the ABI well-formed; violations are
/// reported as compile failures, never as a partial artifact.
#[derive(Debug, Clone)]
pub struct CompiledArtifact {
    /// Name of the compiled contract.
    pub contract_name: String,
    /// Creation bytecode, without constructor arguments.
    pub bytecode: Bytes,
    /// Parsed contract interface.
    pub abi: JsonAbi,
}
