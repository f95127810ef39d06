// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// jarboot: Load the resolver's own jars and fetch its bootstrap dependency
// list, in-process on a host JVM or through an embedded one.

pub mod bootstrap;
pub mod classpath;
pub mod dispatch;
#[cfg(feature = "jvm")]
pub mod jni_entry;
pub mod local_repo;
pub mod logging;
pub mod manifest;

pub use bootstrap::{dependencies, Bootstrap};
pub use classpath::{ClasspathLoader, JarRegistry};
pub use dispatch::{BridgedCall, Dispatch, FetchDependencies, NativeCall};
pub use local_repo::{check_local_repo, default_local_repo, LocalRepoReport};
pub use manifest::{read_dependencies, write_dependencies, DEFAULT_MANIFEST};

#[cfg(feature = "jvm")]
pub use jarboot_bridge::jvm::register_host_vm;
