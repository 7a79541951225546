use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::Context;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::ProvisioningError;

/// Files from `configuration/` the function reads at start-up.
pub const CONFIGURATION_FILES: [&str; 2] = ["base.yaml", "production.yaml"];

/// Packaged when no compiled handler is found: answers every invocation
/// through the runtime API with a fixed greeting.
pub const STUB_BOOTSTRAP: &str = r#"#!/bin/sh
set -eu
API="http://${AWS_LAMBDA_RUNTIME_API}/2018-06-01/runtime/invocation"
while true; do
  HEADERS="$(mktemp)"
  curl -sS -LD "$HEADERS" "$API/next" -o /dev/null
  REQUEST_ID=$(grep -Fi Lambda-Runtime-Aws-Request-Id "$HEADERS" | tr -d '[:space:]' | cut -d: -f2)
  curl -sS -X POST "$API/$REQUEST_ID/response" \
    -d '{"statusCode":200,"body":"{\"message\":\"Hello from Lambda!\"}"}'
  rm -f "$HEADERS"
done
"#;

/// Zips the handler binary as `bootstrap` together with the configuration files.
#[tracing::instrument(name = "Packaging the function")]
pub fn package_function(
    binary_path: &Path,
    configuration_directory: &Path,
) -> Result<Vec<u8>, ProvisioningError> {
    build_archive(binary_path, configuration_directory).map_err(ProvisioningError::Packaging)
}

fn build_archive(binary_path: &Path, configuration_directory: &Path) -> anyhow::Result<Vec<u8>> {
    let bootstrap = match std::fs::read(binary_path) {
        Ok(binary) => binary,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(
                "Handler binary not found at {}. Packaging a stub handler instead.",
                binary_path.display()
            );
            STUB_BOOTSTRAP.as_bytes().to_vec()
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", binary_path.display()))
        }
    };

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let executable = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o755);
    zip.start_file("bootstrap", executable)?;
    zip.write_all(&bootstrap)?;

    let regular = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    for name in CONFIGURATION_FILES {
        let path = configuration_directory.join(name);
        let contents = std::fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        zip.start_file(format!("configuration/{name}"), regular)?;
        zip.write_all(&contents)?;
    }

    let archive = zip.finish()?.into_inner();
    tracing::info!("Function archive created: {} total bytes", archive.len());
    Ok(archive)
}
