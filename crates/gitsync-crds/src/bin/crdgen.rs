//! Generates the GitSync CustomResourceDefinition
//!
//! Writes YAML to the file named by `CRDGEN_OUTPUT`, or stdout when unset.
//! Logs go to stderr so the manifest can be piped straight to kubectl.

use std::env;
use std::io::Write;

use gitsync_crds::{CrdError, GitSync};
use kube::CustomResourceExt;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CrdError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let yaml = serde_yaml::to_string(&GitSync::crd())?;

    match env::var("CRDGEN_OUTPUT") {
        Ok(path) if !path.is_empty() => {
            std::fs::write(&path, yaml)?;
            info!("Wrote GitSync CRD to {}", path);
        }
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(yaml.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
