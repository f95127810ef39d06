// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local Maven repository check.
//
// Maps each bootstrap identifier to its path in a Maven-layout repository
// and splits the list into artifacts already on disk and those still
// missing. Nothing is downloaded here.

use std::path::{Path, PathBuf};

use jarboot_core::Notation;
use jarboot_core::config::ENV_M2_REPO;
use jarboot_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Outcome of [`check_local_repo`], both lists in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRepoReport {
    /// Identifier and the artifact file found for it.
    pub present: Vec<(String, PathBuf)>,
    pub missing: Vec<String>,
}

impl LocalRepoReport {
    /// True when every identifier is already on disk.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// `$M2_REPO`, else `~/.m2/repository`.
pub fn default_local_repo() -> PathBuf {
    if let Ok(repo) = std::env::var(ENV_M2_REPO) {
        if !repo.trim().is_empty() {
            return PathBuf::from(repo);
        }
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_default();
    home.join(".m2").join("repository")
}

/// Split `dependencies` by whether their artifact exists under `repo`.
///
/// Fails with `InvalidNotation` on the first identifier that is not a
/// `group:artifact[:type[:classifier]]:version` coordinate.
#[instrument(skip_all, fields(count = dependencies.len(), repo = %repo.display()))]
pub fn check_local_repo(dependencies: &[String], repo: &Path) -> Result<LocalRepoReport> {
    let mut report = LocalRepoReport::default();

    for dependency in dependencies {
        let notation: Notation = dependency.parse()?;
        let artifact = repo.join(notation.repository_path());
        if artifact.is_file() {
            report.present.push((dependency.clone(), artifact));
        } else {
            report.missing.push(dependency.clone());
        }
    }

    debug!(
        present = report.present.len(),
        missing = report.missing.len(),
        "local repository checked"
    );
    Ok(report)
}
