// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bootstrap configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JarbootError, Result};

/// Directory scanned for resolver jars when the caller supplies none.
pub const DEFAULT_JAR_DIR: &str = "jar_lib";

/// Fully-qualified name of the Java-side bootstrap object.
pub const DEFAULT_RESOLVER_CLASS: &str = "jarboot.Bootstrap";

/// Static method on [`DEFAULT_RESOLVER_CLASS`] returning the dependency list.
pub const DEFAULT_RESOLVER_METHOD: &str = "dependencies";

/// Environment variable overriding [`BootstrapConfig::jar_dir`].
pub const ENV_JAR_DIR: &str = "JARBOOT_JAR_DIR";
/// Environment variable overriding [`BootstrapConfig::resolver_class`].
pub const ENV_RESOLVER_CLASS: &str = "JARBOOT_RESOLVER_CLASS";
/// Whitespace-separated extra options for the embedded JVM.
pub const ENV_JVM_OPTS: &str = "JARBOOT_JVM_OPTS";
/// Maven local repository override, shared with Maven tooling.
pub const ENV_M2_REPO: &str = "M2_REPO";

/// Process-wide bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Directory whose jars are put on the classpath before every call.
    pub jar_dir: PathBuf,
    /// Java class exposing the static dependency method.
    pub resolver_class: String,
    /// Name of the static, no-argument method returning `java.util.List`.
    pub resolver_method: String,
    /// Extra `-X`/`-D` options passed to the embedded JVM on creation.
    pub jvm_options: Vec<String>,
    /// Maven local repository used by the local-repo check.
    pub local_repo: Option<PathBuf>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            jar_dir: PathBuf::from(DEFAULT_JAR_DIR),
            resolver_class: DEFAULT_RESOLVER_CLASS.to_owned(),
            resolver_method: DEFAULT_RESOLVER_METHOD.to_owned(),
            jvm_options: Vec::new(),
            local_repo: None,
        }
    }
}

impl BootstrapConfig {
    /// Defaults overridden by the `JARBOOT_*` and `M2_REPO` variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (the environment, a
    /// test map, ...). Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_JAR_DIR) {
            self.jar_dir = PathBuf::from(dir);
        }
        if let Some(class) = get(ENV_RESOLVER_CLASS) {
            self.resolver_class = class.trim().to_owned();
        }
        if let Some(opts) = get(ENV_JVM_OPTS) {
            self.jvm_options = opts.split_whitespace().map(str::to_owned).collect();
        }
        if let Some(repo) = get(ENV_M2_REPO) {
            self.local_repo = Some(PathBuf::from(repo));
        }
        self
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings the bridge could never use.
    pub fn validate(&self) -> Result<()> {
        if self.resolver_class.trim().is_empty() {
            return Err(JarbootError::Config("resolver_class is empty".into()));
        }
        if self.resolver_method.trim().is_empty() {
            return Err(JarbootError::Config("resolver_method is empty".into()));
        }
        if self.resolver_class.contains('/') {
            return Err(JarbootError::Config(format!(
                "resolver_class must use dotted notation, got {}",
                self.resolver_class
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_use_constant_jar_dir() {
        let config = BootstrapConfig::default();
        assert_eq!(config.jar_dir, PathBuf::from(DEFAULT_JAR_DIR));
        assert_eq!(config.resolver_class, DEFAULT_RESOLVER_CLASS);
        assert!(config.jvm_options.is_empty());
    }

    #[test]
    fn overrides_apply_and_skip_blank_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_JAR_DIR, "/opt/resolver/jars"),
            (ENV_RESOLVER_CLASS, "  "),
            (ENV_JVM_OPTS, "-Xmx256m  -Dfoo=bar"),
            (ENV_M2_REPO, "/srv/m2"),
        ]
        .into_iter()
        .collect();

        let config =
            BootstrapConfig::default().with_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.jar_dir, PathBuf::from("/opt/resolver/jars"));
        assert_eq!(config.resolver_class, DEFAULT_RESOLVER_CLASS);
        assert_eq!(config.jvm_options, vec!["-Xmx256m", "-Dfoo=bar"]);
        assert_eq!(config.local_repo, Some(PathBuf::from("/srv/m2")));
    }

    #[test]
    fn save_then_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jarboot.json");
        std::fs::write(&path, r#"{ "jar_dir": "/tmp/jars" }"#).unwrap();

        let config = BootstrapConfig::load(&path).unwrap();
        assert_eq!(config.jar_dir, PathBuf::from("/tmp/jars"));
        assert_eq!(config.resolver_method, DEFAULT_RESOLVER_METHOD);

        config.save(&path).unwrap();
        assert_eq!(BootstrapConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn slashed_class_name_is_rejected() {
        let config = BootstrapConfig {
            resolver_class: "jarboot/Bootstrap".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JarbootError::Config(_))));
    }
}
