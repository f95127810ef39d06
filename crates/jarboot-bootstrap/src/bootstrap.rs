// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bootstrap dispatcher.
//
// One operation, `dependencies(jar_path)`: put the resolver jars on the
// classpath, probe how the resolver is reachable, and fetch its bootstrap
// dependency list through the matching call path. The mode is probed and
// the jars loaded on every call; only the process-wide jar set persists.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use jarboot_bridge::platform_backends;
use jarboot_bridge::traits::{InteropBridge, NativeResolver, ResolverRequest, RuntimeProbe};
use jarboot_core::error::Result;
use jarboot_core::{BootstrapConfig, DependencyManifest};
use tracing::{info, instrument};

use crate::classpath::{ClasspathLoader, JarRegistry};
use crate::dispatch::{Dispatch, FetchDependencies};
use crate::local_repo::{self, LocalRepoReport};
use crate::manifest;

/// Loads the resolver jars and fetches the bootstrap dependency list.
pub struct Bootstrap {
    config: BootstrapConfig,
    loader: Arc<dyn ClasspathLoader>,
    probe: Box<dyn RuntimeProbe>,
    native: Box<dyn NativeResolver>,
    bridge: Box<dyn InteropBridge>,
}

impl Bootstrap {
    /// Dispatcher over the process-wide jar registry and the backends of
    /// this build (JNI with the `jvm` feature, stubs otherwise).
    pub fn new(config: BootstrapConfig) -> Self {
        let (probe, native, bridge) = platform_backends();
        Self {
            config,
            loader: JarRegistry::global(),
            probe,
            native,
            bridge,
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ClasspathLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_probe(mut self, probe: impl RuntimeProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_native(mut self, native: impl NativeResolver + 'static) -> Self {
        self.native = Box::new(native);
        self
    }

    pub fn with_bridge(mut self, bridge: impl InteropBridge + 'static) -> Self {
        self.bridge = Box::new(bridge);
        self
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Bootstrap dependency identifiers, in resolver order.
    ///
    /// `jar_path` is used exactly when given, even if it holds no jars;
    /// otherwise the configured `jar_dir` is loaded. Classpath failures,
    /// bridge failures and resolver failures all propagate unchanged.
    #[instrument(skip(self), fields(mode = tracing::field::Empty))]
    pub fn dependencies(&self, jar_path: Option<&Path>) -> Result<Vec<String>> {
        let dir = jar_path.unwrap_or(self.config.jar_dir.as_path());
        self.loader.load_jars_under(dir)?;

        let mode = self.probe.runtime_mode();
        tracing::Span::current().record("mode", tracing::field::display(mode));

        let request = ResolverRequest {
            class_name: self.config.resolver_class.clone(),
            method: self.config.resolver_method.clone(),
            classpath: self.loader.classpath(),
            jvm_options: self.config.jvm_options.clone(),
        };

        let dependencies = Dispatch::select(mode, &*self.native, &*self.bridge)
            .fetch_dependencies(&request)?;

        info!(count = dependencies.len(), "bootstrap dependencies resolved");
        Ok(dependencies)
    }

    /// Fetch the list and write it as a manifest to `dest`.
    pub fn write_dependencies(
        &self,
        jar_path: Option<&Path>,
        dest: impl AsRef<Path>,
    ) -> Result<DependencyManifest> {
        let dependencies = self.dependencies(jar_path)?;
        manifest::write_dependencies(&dependencies, dest)
    }

    /// Fetch the list and check it against the local Maven repository.
    ///
    /// Uses the configured `local_repo`, else [`local_repo::default_local_repo`].
    pub fn check_local_repo(&self, jar_path: Option<&Path>) -> Result<LocalRepoReport> {
        let dependencies = self.dependencies(jar_path)?;
        let repo: PathBuf = self
            .config
            .local_repo
            .clone()
            .unwrap_or_else(local_repo::default_local_repo);
        local_repo::check_local_repo(&dependencies, &repo)
    }
}

static DEFAULT: OnceLock<Bootstrap> = OnceLock::new();

/// [`Bootstrap::dependencies`] on a process-wide dispatcher configured
/// from the environment.
pub fn dependencies(jar_path: Option<&Path>) -> Result<Vec<String>> {
    DEFAULT
        .get_or_init(|| Bootstrap::new(BootstrapConfig::from_env()))
        .dependencies(jar_path)
}
