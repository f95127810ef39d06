// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classpath registry: the process-wide, additive set of loaded jars.
//
// Loading a directory scans it for `*.jar` files, checks that each one is a
// zip archive, and registers the canonical paths. Registration is
// idempotent: a jar seen twice keeps its first position. Nothing is ever
// removed, so concurrent loads of the same or different directories only
// ever grow the set.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};

use jarboot_core::error::{JarbootError, Result};
use tracing::{debug, instrument};

/// Local file header signature of a zip archive.
const ZIP_MAGIC: [u8; 4] = *b"PK\x03\x04";
/// End-of-central-directory signature; an empty archive starts with it.
const ZIP_EMPTY_MAGIC: [u8; 4] = *b"PK\x05\x06";

/// Loads jars found under a directory into the process.
pub trait ClasspathLoader: Send + Sync {
    /// Register every jar directly under `dir`, returning the jars found.
    ///
    /// A missing or unreadable directory, or a file that is not a zip
    /// archive, fails with `ClasspathLoad`. An empty directory is fine.
    fn load_jars_under(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Every registered jar, in registration order.
    fn classpath(&self) -> Vec<PathBuf>;
}

#[derive(Debug, Default)]
struct RegistryState {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

/// Ordered, de-duplicated set of loaded jars.
#[derive(Debug, Default)]
pub struct JarRegistry {
    state: Mutex<RegistryState>,
}

static GLOBAL: LazyLock<Arc<JarRegistry>> = LazyLock::new(|| Arc::new(JarRegistry::new()));

impl JarRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process.
    pub fn global() -> Arc<JarRegistry> {
        Arc::clone(&GLOBAL)
    }

    /// Load several directories in order, stopping at the first failure.
    ///
    /// Jars from directories loaded before the failure stay registered.
    pub fn load_jar_dirs<I, P>(&self, dirs: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut found = Vec::new();
        for dir in dirs {
            found.extend(self.load_jars_under(dir.as_ref())?);
        }
        Ok(found)
    }

    /// Registered jars joined with the platform path separator.
    pub fn classpath_string(&self) -> Result<String> {
        let joined = std::env::join_paths(self.classpath())
            .map_err(|e| JarbootError::Config(format!("jar path cannot join a classpath: {e}")))?;
        Ok(joined.to_string_lossy().into_owned())
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("jar registry lock poisoned").order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn register(&self, jars: &[PathBuf]) -> usize {
        let mut state = self.state.lock().expect("jar registry lock poisoned");
        let mut added = 0;
        for jar in jars {
            if state.seen.insert(jar.clone()) {
                state.order.push(jar.clone());
                added += 1;
            }
        }
        added
    }
}

impl ClasspathLoader for JarRegistry {
    #[instrument(skip_all, fields(dir = %dir.display()))]
    fn load_jars_under(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let jars = scan_jars(dir)?;
        let added = self.register(&jars);
        debug!(found = jars.len(), added, "jar directory loaded");
        Ok(jars)
    }

    fn classpath(&self) -> Vec<PathBuf> {
        self.state
            .lock()
            .expect("jar registry lock poisoned")
            .order
            .clone()
    }
}

/// Canonical paths of the valid jars directly under `dir`, sorted by name.
fn scan_jars(dir: &Path) -> Result<Vec<PathBuf>> {
    let fail = |reason: String| JarbootError::classpath(dir, reason);

    let entries = std::fs::read_dir(dir).map_err(|e| fail(e.to_string()))?;

    let mut jars = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| fail(e.to_string()))?.path();
        let is_jar = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jar"));
        if is_jar && path.is_file() {
            jars.push(path);
        }
    }
    jars.sort();

    jars.into_iter()
        .map(|jar| {
            verify_archive(&jar).map_err(|reason| JarbootError::classpath(&jar, reason))?;
            jar.canonicalize()
                .map_err(|e| JarbootError::classpath(&jar, e.to_string()))
        })
        .collect()
}

/// Check that `path` opens and starts with a zip signature.
fn verify_archive(path: &Path) -> std::result::Result<(), String> {
    let mut magic = [0u8; 4];
    File::open(path)
        .and_then(|mut file| file.read_exact(&mut magic))
        .map_err(|e| format!("unreadable archive: {e}"))?;

    if magic == ZIP_MAGIC || magic == ZIP_EMPTY_MAGIC {
        Ok(())
    } else {
        Err("not a zip archive".into())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Write a minimal file with a zip header.
    pub(crate) fn write_jar(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut bytes = ZIP_MAGIC.to_vec();
        bytes.extend_from_slice(&[0u8; 26]);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn loads_only_jars_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        write_jar(dir.path(), "zeta-1.0.jar");
        write_jar(dir.path(), "alpha-2.0.JAR");
        std::fs::write(dir.path().join("README.txt"), "not a jar").unwrap();
        std::fs::create_dir(dir.path().join("nested.jar")).unwrap();

        let registry = JarRegistry::new();
        let jars = registry.load_jars_under(dir.path()).unwrap();

        let names: Vec<_> = jars
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["alpha-2.0.JAR", "zeta-1.0.jar"]);
        assert_eq!(registry.classpath(), jars);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = JarRegistry::new();
        assert!(registry.load_jars_under(dir.path()).unwrap().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn reloading_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_jar(dir.path(), "core.jar");

        let registry = JarRegistry::new();
        registry.load_jars_under(dir.path()).unwrap();
        registry.load_jars_under(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registration_is_additive_across_directories() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write_jar(first.path(), "a.jar");
        write_jar(second.path(), "b.jar");

        let registry = JarRegistry::new();
        let found = registry
            .load_jar_dirs([first.path(), second.path()])
            .unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(registry.classpath(), found);
        assert!(registry.classpath_string().unwrap().contains("b.jar"));
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = JarRegistry::new().load_jars_under(&missing).unwrap_err();
        assert!(matches!(err, JarbootError::ClasspathLoad { path, .. } if path == missing));
    }

    #[test]
    fn non_zip_jar_fails_and_registers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        write_jar(dir.path(), "good.jar");
        std::fs::write(dir.path().join("bad.jar"), b"plain text").unwrap();

        let registry = JarRegistry::new();
        let err = registry.load_jars_under(dir.path()).unwrap_err();
        assert!(matches!(err, JarbootError::ClasspathLoad { ref reason, .. } if reason.contains("zip")));
        assert!(registry.is_empty());
    }

    #[test]
    fn concurrent_loads_register_each_jar_once() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.jar", "b.jar", "c.jar"] {
            write_jar(dir.path(), name);
        }

        let registry = Arc::new(JarRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let path = dir.path().to_path_buf();
                std::thread::spawn(move || registry.load_jars_under(&path).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 3);
    }
}
