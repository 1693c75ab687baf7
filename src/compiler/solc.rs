//! solc invocation over the standard JSON interface.
//!
//! One compile is one subprocess: the input document goes in on stdin,
//! the output document comes back on stdout. solc exits zero even when the
//! source has errors; the verdict lives in the output's `errors` array.

use std::collections::BTreeMap;
use std::process::Stdio;

use alloy::json_abi::JsonAbi;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::compiler::artifact::{CompiledArtifact, SourceUnit};
use crate::compiler::CompilerError;
use crate::config::schema::CompilerConfig;

/// Handle to an external solc binary.
#[derive(Debug, Clone)]
pub struct SolcCompiler {
    solc_path: String,
    optimizer: bool,
    optimizer_runs: u32,
}

#[derive(Debug, Serialize)]
struct SolcInput<'a> {
    language: &'static str,
    sources: BTreeMap<&'a str, SolcSource<'a>>,
    settings: SolcSettings,
}

#[derive(Debug, Serialize)]
struct SolcSource<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct SolcSettings {
    optimizer: OptimizerSettings,
    #[serde(rename = "outputSelection")]
    output_selection: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct OptimizerSettings {
    enabled: bool,
    runs: u32,
}

#[derive(Debug, Deserialize)]
struct SolcOutput {
    #[serde(default)]
    errors: Vec<SolcDiagnostic>,
    #[serde(default)]
    contracts: BTreeMap<String, BTreeMap<String, SolcContract>>,
}

#[derive(Debug, Deserialize)]
struct SolcDiagnostic {
    severity: String,
    message: String,
    #[serde(rename = "formattedMessage")]
    formatted_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SolcContract {
    abi: JsonAbi,
    evm: SolcEvm,
}

#[derive(Debug, Deserialize)]
struct SolcEvm {
    bytecode: SolcBytecode,
}

#[derive(Debug, Deserialize)]
struct SolcBytecode {
    object: String,
}

impl SolcCompiler {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            solc_path: config.solc_path.clone(),
            optimizer: config.optimizer,
            optimizer_runs: config.optimizer_runs,
        }
    }

    /// Probe the binary with `--version`.
    ///
    /// Run once before compiling to tell "toolchain missing" apart from
    /// "source does not compile". Returns the reported version line.
    pub async fn ensure_available(&self) -> Result<String, CompilerError> {
        let output = Command::new(&self.solc_path)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(self.unavailable(format!("--version exited with {}", output.status)));
        }

        let banner = String::from_utf8_lossy(&output.stdout);
        let version = banner
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("unknown")
            .trim()
            .to_string();

        tracing::info!(solc = %self.solc_path, version = %version, "Compiler toolchain available");
        Ok(version)
    }

    /// Compile one source file and extract the named contract.
    pub async fn compile(
        &self,
        source: &SourceUnit,
        contract_name: &str,
    ) -> Result<CompiledArtifact, CompilerError> {
        tracing::info!(source = %source.name, contract = %contract_name, "Compiling contract");

        let input = self.standard_json_input(source)?;
        let stdout = self.run_solc(&input).await?;

        let mut parsed: SolcOutput = serde_json::from_slice(&stdout)
            .map_err(|e| CompilerError::Interface(format!("cannot parse solc output: {e}")))?;

        for diagnostic in parsed.errors.iter().filter(|d| d.severity != "error") {
            tracing::warn!(severity = %diagnostic.severity, "{}", diagnostic.rendered().trim_end());
        }
        let diagnostics = error_diagnostics(&parsed.errors);
        if !diagnostics.is_empty() {
            return Err(CompilerError::Solc { diagnostics });
        }

        let entry = parsed
            .contracts
            .get_mut(source.name.as_str())
            .and_then(|file| file.remove(contract_name))
            .ok_or_else(|| CompilerError::ContractMissing {
                name: contract_name.to_string(),
                source_file: source.name.clone(),
            })?;

        let bytecode = alloy::primitives::hex::decode(&entry.evm.bytecode.object)
            .map_err(|e| CompilerError::Interface(format!("invalid bytecode hex: {e}")))?;
        if bytecode.is_empty() {
            return Err(CompilerError::EmptyBytecode(contract_name.to_string()));
        }

        tracing::info!(
            contract = %contract_name,
            bytecode_bytes = bytecode.len(),
            abi_items = entry.abi.len(),
            "Contract compiled"
        );

        Ok(CompiledArtifact {
            contract_name: contract_name.to_string(),
            bytecode: bytecode.into(),
            abi: entry.abi,
        })
    }

    fn standard_json_input(&self, source: &SourceUnit) -> Result<Vec<u8>, CompilerError> {
        let input = SolcInput {
            language: "Solidity",
            sources: BTreeMap::from([(
                source.name.as_str(),
                SolcSource {
                    content: &source.content,
                },
            )]),
            settings: SolcSettings {
                optimizer: OptimizerSettings {
                    enabled: self.optimizer,
                    runs: self.optimizer_runs,
                },
                output_selection: serde_json::json!({ "*": { "*": ["abi", "evm.bytecode"] } }),
            },
        };
        serde_json::to_vec(&input)
            .map_err(|e| CompilerError::Interface(format!("cannot serialize compiler input: {e}")))
    }

    async fn run_solc(&self, input: &[u8]) -> Result<Vec<u8>, CompilerError> {
        let mut child = Command::new(&self.solc_path)
            .arg("--standard-json")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(e.to_string()))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| CompilerError::Interface("solc stdin not captured".to_string()))?;
        stdin
            .write_all(input)
            .await
            .map_err(|e| CompilerError::Interface(format!("writing compiler input: {e}")))?;
        // Dropping stdin closes the pipe; solc reads to EOF.
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| CompilerError::Interface(format!("waiting for solc: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CompilerError::Interface(format!(
                "solc exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }

    fn unavailable(&self, reason: String) -> CompilerError {
        CompilerError::ToolchainUnavailable {
            path: self.solc_path.clone(),
            reason,
        }
    }
}

impl SolcDiagnostic {
    /// solc's formatted message carries file:line:col context; fall back to
    /// the bare message when it is absent.
    fn rendered(&self) -> &str {
        self.formatted_message.as_deref().unwrap_or(&self.message)
    }
}

fn error_diagnostics(diagnostics: &[SolcDiagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|d| d.severity == "error")
        .map(|d| d.rendered().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_document_shape() {
        let compiler = SolcCompiler::new(&CompilerConfig::default());
        let source = SourceUnit {
            name: "Lottery.sol".to_string(),
            content: "pragma solidity ^0.8.19;".to_string(),
        };

        let bytes = compiler.standard_json_input(&source).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(doc["language"], "Solidity");
        assert_eq!(doc["sources"]["Lottery.sol"]["content"], source.content);
        let selection = &doc["settings"]["outputSelection"]["*"]["*"];
        assert!(selection.as_array().unwrap().contains(&"abi".into()));
        assert!(selection.as_array().unwrap().contains(&"evm.bytecode".into()));
    }

    #[test]
    fn test_only_error_severity_is_fatal() {
        let output: SolcOutput = serde_json::from_str(
            r#"{
                "errors": [
                    {"severity": "warning", "message": "unused variable",
                     "formattedMessage": "Warning: unused variable\n --> Lottery.sol:10:5"},
                    {"severity": "error", "message": "expected ';'",
                     "formattedMessage": "ParserError: expected ';'\n --> Lottery.sol:12:1"}
                ]
            }"#,
        )
        .unwrap();

        let fatal = error_diagnostics(&output.errors);
        assert_eq!(fatal.len(), 1);
        assert!(fatal[0].contains("Lottery.sol:12:1"));
    }

    #[test]
    fn test_diagnostic_falls_back_to_bare_message() {
        let diagnostic = SolcDiagnostic {
            severity: "error".to_string(),
            message: "stack too deep".to_string(),
            formatted_message: None,
        };
        assert_eq!(diagnostic.rendered(), "stack too deep");
    }

    #[test]
    fn test_output_with_contracts_parses() {
        let output: SolcOutput = serde_json::from_str(
            r#"{
                "contracts": {
                    "Lottery.sol": {
                        "Lottery": {
                            "abi": [],
                            "evm": {"bytecode": {"object": "6080604052"}}
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let entry = &output.contracts["Lottery.sol"]["Lottery"];
        assert_eq!(entry.evm.bytecode.object, "6080604052");
        assert!(entry.abi.is_empty());
    }

    #[test]
    fn test_contract_missing_reports_file_and_contract() {
        let err = CompilerError::ContractMissing {
            name: "Raffle".to_string(),
            source_file: "Lottery.sol".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "contract 'Raffle' not found in compiled output of Lottery.sol"
        );
        // The file name is display context only, not a wrapped cause.
        assert!(std::error::Error::source(&err).is_none());
    }
}
