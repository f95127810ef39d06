// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Collaborator traits the bootstrap dispatcher consumes.
//
// The resolver is reached in one of two ways. `NativeResolver` is the
// in-process call available when the host process is a JVM. `InteropBridge`
// is the reflective path: look the class up by name, call through the
// handle, and get back bridged values that still need converting to text.

use std::path::PathBuf;

use jarboot_core::error::Result;
use jarboot_core::RuntimeMode;

/// What to call on the Java side, and with which classpath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverRequest {
    /// Dotted class name, e.g. `jarboot.Bootstrap`.
    pub class_name: String,
    /// Static no-argument method returning a `java.util.List`.
    pub method: String,
    /// Every jar registered so far, in registration order.
    pub classpath: Vec<PathBuf>,
    /// Options for an embedded VM. Ignored by in-process backends.
    pub jvm_options: Vec<String>,
}

/// Side-effect-free classification of the host process.
pub trait RuntimeProbe: Send + Sync {
    fn runtime_mode(&self) -> RuntimeMode;
}

/// Direct, in-process call into the resolver.
///
/// Only meaningful when the probe reports [`RuntimeMode::Native`].
pub trait NativeResolver: Send + Sync {
    /// Call the resolver and return its identifiers as native strings.
    fn dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>>;
}

/// Reflective bridge into a separate VM instance.
pub trait InteropBridge: Send + Sync {
    /// Locate `request.class_name` through the bridge.
    ///
    /// Fails with `BridgeUnavailable` when the bridge cannot start or the
    /// class cannot be found.
    fn import(&self, request: &ResolverRequest) -> Result<Box<dyn BridgedObject>>;
}

/// Handle to a class living on the far side of an [`InteropBridge`].
pub trait BridgedObject {
    /// Invoke the dependency method; the result is still bridged.
    fn dependencies(&self) -> Result<Vec<Box<dyn BridgedValue>>>;
}

/// A single marshalled element of a bridged collection.
pub trait BridgedValue {
    /// The element's `toString()` on the far side.
    fn to_java_string(&self) -> Result<String>;
}
