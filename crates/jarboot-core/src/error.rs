// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for jarboot.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all jarboot operations.
///
/// Every failure is fatal for the call that produced it. Nothing in the
/// workspace retries or substitutes an empty dependency list.
#[derive(Debug, Error)]
pub enum JarbootError {
    // -- Classpath --
    #[error("failed to load jars under {}: {reason}", path.display())]
    ClasspathLoad { path: PathBuf, reason: String },

    // -- JVM bridge --
    #[error("JVM bridge unavailable: {0}")]
    BridgeUnavailable(String),

    #[error("resolver invocation failed: {0}")]
    ResolverInvocation(String),

    // -- Dependency identifiers --
    #[error("invalid dependency notation: {0}")]
    InvalidNotation(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JarbootError {
    /// Shorthand for a [`JarbootError::ClasspathLoad`] on `path`.
    pub fn classpath(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ClasspathLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, JarbootError>;
