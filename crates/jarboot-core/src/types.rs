// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared domain types used across all jarboot crates.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JarbootError;

// ---------------------------------------------------------------------------
// Runtime mode
// ---------------------------------------------------------------------------

/// How the Java-side resolver is reached from this process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    /// The process is itself a JVM; calls are plain in-process JNI calls.
    Native,
    /// No host JVM; calls go through an embedded VM started by the bridge.
    Bridged,
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Bridged => write!(f, "bridged"),
        }
    }
}

// ---------------------------------------------------------------------------
// Dependency notation
// ---------------------------------------------------------------------------

/// Parsed `group:artifact[:type[:classifier]]:version` coordinate.
///
/// The dispatcher treats identifiers as opaque strings; parsing only
/// happens where a Maven repository layout is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Notation {
    pub group: String,
    pub artifact: String,
    /// Packaging type, `jar` when omitted.
    pub kind: String,
    pub classifier: Option<String>,
    pub version: String,
}

impl Notation {
    /// Path of the artifact relative to a Maven repository root.
    pub fn repository_path(&self) -> PathBuf {
        let mut path: PathBuf = self.group.split('.').collect();
        path.push(&self.artifact);
        path.push(&self.version);

        let file = match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact, self.version, classifier, self.kind
            ),
            None => format!("{}-{}.{}", self.artifact, self.version, self.kind),
        };
        path.push(file);
        path
    }
}

impl FromStr for Notation {
    type Err = JarbootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(JarbootError::InvalidNotation(s.to_owned()));
        }

        let owned = |p: &str| p.to_owned();
        let (kind, classifier, version) = match parts.as_slice() {
            [_, _, version] => ("jar", None, *version),
            [_, _, kind, version] => (*kind, None, *version),
            [_, _, kind, classifier, version] => (*kind, Some(owned(*classifier)), *version),
            _ => return Err(JarbootError::InvalidNotation(s.to_owned())),
        };

        Ok(Self {
            group: owned(parts[0]),
            artifact: owned(parts[1]),
            kind: owned(kind),
            classifier,
            version: owned(version),
        })
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.kind)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{classifier}")?;
        }
        write!(f, ":{}", self.version)
    }
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// On-disk snapshot of a bootstrap dependency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyManifest {
    /// Identifiers in the order the resolver returned them.
    pub dependencies: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl DependencyManifest {
    pub fn new(dependencies: Vec<String>) -> Self {
        Self {
            dependencies,
            generated_at: Utc::now(),
        }
    }
}
