use log::{debug, info};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

use super::error::OptimizeError;

const WASM_OPT: &str = "wasm-opt";

// bulk memory ops are rejected by older wasmd validators
const WASM_OPT_FLAGS: &[&str] = &["--disable-bulk-memory", "-Oz", "--strip-debug"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptimizeReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Shrinks `input` into `output` with binaryen's `wasm-opt`, creating the
/// output directory when needed.
pub fn optimize_wasm(input: &Path, output: &Path) -> Result<OptimizeReport, OptimizeError> {
    if !input.is_file() {
        return Err(OptimizeError::MissingInput {
            path: input.to_path_buf(),
        });
    }

    let version = Command::new(WASM_OPT)
        .arg("--version")
        .stdout(Stdio::piped())
        .output()
        .map_err(|e| OptimizeError::MissingWasmOpt { source: e })?;
    debug!(
        "using {}",
        String::from_utf8_lossy(&version.stdout).trim()
    );

    if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }

    info!("Optimizing {:?} into {:?}", input, output);
    let status = Command::new(WASM_OPT)
        .args(WASM_OPT_FLAGS)
        .arg(input)
        .arg("-o")
        .arg(output)
        .status()?;

    if !status.success() {
        return Err(OptimizeError::Failed { status });
    }

    Ok(OptimizeReport {
        input_bytes: fs::metadata(input)?.len(),
        output_bytes: fs::metadata(output)?.len(),
    })
}
