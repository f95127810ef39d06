// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable explanations for bootstrap failures.
//
// Every technical error is mapped to a plain message plus the one thing the
// operator should check first. The severity says where the fix lives.

use crate::error::JarbootError;

/// Where the fix for a failure lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Local setup: jar directory, config file, dependency notation.
    Setup,
    /// The machine: JDK missing, `JAVA_HOME`, VM options.
    Environment,
    /// The Java-side resolver itself failed.
    Resolver,
    /// Disk or serialization trouble unrelated to the JVM.
    Internal,
}

/// A human-readable error with plain message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// One-line summary.
    pub message: String,
    /// What to check first.
    pub suggestion: String,
    pub severity: Severity,
}

/// Convert a [`JarbootError`] into a [`HumanError`].
pub fn humanize_error(err: &JarbootError) -> HumanError {
    match err {
        JarbootError::ClasspathLoad { path, reason } => HumanError {
            message: "The resolver jars could not be loaded.".into(),
            suggestion: format!(
                "Check that {} exists, is readable and only holds valid jar files. ({reason})",
                path.display()
            ),
            severity: Severity::Setup,
        },

        JarbootError::BridgeUnavailable(detail) => humanize_bridge_error(detail),

        JarbootError::ResolverInvocation(detail) => HumanError {
            message: "The Java resolver failed while listing its dependencies.".into(),
            suggestion: format!("See the Java exception for the cause. ({detail})"),
            severity: Severity::Resolver,
        },

        JarbootError::InvalidNotation(notation) => HumanError {
            message: "A dependency identifier is malformed.".into(),
            suggestion: format!(
                "Use group:artifact[:type[:classifier]]:version, got {notation:?}."
            ),
            severity: Severity::Setup,
        },

        JarbootError::Config(detail) => HumanError {
            message: "The bootstrap configuration is invalid.".into(),
            suggestion: detail.clone(),
            severity: Severity::Setup,
        },

        JarbootError::Io(e) => HumanError {
            message: "A file could not be read or written.".into(),
            suggestion: e.to_string(),
            severity: Severity::Internal,
        },

        JarbootError::Serialization(e) => HumanError {
            message: "A JSON file is malformed.".into(),
            suggestion: e.to_string(),
            severity: Severity::Internal,
        },
    }
}

/// Bridge failures are either "no JVM at all" or "JVM up, class missing".
fn humanize_bridge_error(detail: &str) -> HumanError {
    let lower = detail.to_lowercase();
    if lower.contains("classnotfound") || lower.contains("noclassdeffound") {
        HumanError {
            message: "The resolver class is not on the classpath.".into(),
            suggestion: format!(
                "Check the jar directory and the configured resolver class. ({detail})"
            ),
            severity: Severity::Setup,
        }
    } else {
        HumanError {
            message: "No Java runtime could be started.".into(),
            suggestion: format!("Install a JDK and set JAVA_HOME. ({detail})"),
            severity: Severity::Environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_setup() {
        let err = JarbootError::classpath("/nope", "No such file or directory");
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Setup);
        assert!(human.suggestion.contains("/nope"));
    }

    #[test]
    fn missing_libjvm_is_environment() {
        let err = JarbootError::BridgeUnavailable("failed to load libjvm.so".into());
        assert_eq!(humanize_error(&err).severity, Severity::Environment);
    }

    #[test]
    fn missing_class_is_setup() {
        let err = JarbootError::BridgeUnavailable(
            "java.lang.ClassNotFoundException: jarboot.Bootstrap".into(),
        );
        assert_eq!(humanize_error(&err).severity, Severity::Setup);
    }

    #[test]
    fn jvm_startup_mentioning_class_path_is_environment() {
        let err = JarbootError::BridgeUnavailable(
            "failed to start JVM: invalid -Djava.class.path option (bad class path)".into(),
        );
        assert_eq!(humanize_error(&err).severity, Severity::Environment);
    }

    #[test]
    fn resolver_failure_is_resolver() {
        let err = JarbootError::ResolverInvocation("java.lang.IllegalStateException".into());
        assert_eq!(humanize_error(&err).severity, Severity::Resolver);
    }
}
