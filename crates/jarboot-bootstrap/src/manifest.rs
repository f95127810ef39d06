// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bootstrap manifest: a JSON snapshot of the dependency list, so packaging
// steps can read it without starting a JVM.

use std::path::Path;

use jarboot_core::DependencyManifest;
use jarboot_core::error::Result;
use tracing::{debug, instrument};

/// File name used when no destination is given.
pub const DEFAULT_MANIFEST: &str = "jar_dependencies.json";

/// Write `dependencies` to `dest` as pretty JSON, creating parent
/// directories as needed.
#[instrument(skip_all, fields(count = dependencies.len(), dest = %dest.as_ref().display()))]
pub fn write_dependencies(
    dependencies: &[String],
    dest: impl AsRef<Path>,
) -> Result<DependencyManifest> {
    let dest = dest.as_ref();
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let manifest = DependencyManifest::new(dependencies.to_vec());
    std::fs::write(dest, serde_json::to_string_pretty(&manifest)?)?;

    debug!("dependency manifest written");
    Ok(manifest)
}

/// Read a manifest written by [`write_dependencies`].
pub fn read_dependencies(path: impl AsRef<Path>) -> Result<DependencyManifest> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use jarboot_core::JarbootError;

    use super::*;

    #[test]
    fn write_creates_parents_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out").join(DEFAULT_MANIFEST);
        let deps = vec!["org.example:core:1.0".to_owned(), "org.example:util:2.3".to_owned()];

        let written = write_dependencies(&deps, &dest).unwrap();
        let read = read_dependencies(&dest).unwrap();

        assert_eq!(read, written);
        assert_eq!(read.dependencies, deps);
    }

    #[test]
    fn garbage_manifest_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_MANIFEST);
        std::fs::write(&path, "dependencies: [").unwrap();

        assert!(matches!(
            read_dependencies(&path),
            Err(JarbootError::Serialization(_))
        ));
    }
}
