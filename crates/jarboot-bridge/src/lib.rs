// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! jarboot: JVM bridge abstractions.
//!
//! This crate defines the collaborator traits the bootstrap dispatcher talks
//! to, and the backends that implement them:
//!
//! - [`jvm`] (feature `jvm`): JNI against the host VM that loaded this
//!   library, or against an embedded VM started through the invocation API.
//! - [`stub`]: used when the `jvm` feature is off; every call fails with
//!   `BridgeUnavailable`.
//! - [`memory`]: scripted in-process backends for tests and embedders.

pub mod memory;
pub mod traits;

#[cfg(feature = "jvm")]
pub mod jvm;

#[cfg(not(feature = "jvm"))]
pub mod stub;

use traits::{InteropBridge, NativeResolver, RuntimeProbe};

/// Backends for the current build.
///
/// RETURNS: the runtime probe, the in-process resolver and the interop bridge.
/// With the `jvm` feature these are the JNI implementations; without it, the
/// probe always reports bridged mode and both resolvers fail.
pub fn platform_backends() -> (
    Box<dyn RuntimeProbe>,
    Box<dyn NativeResolver>,
    Box<dyn InteropBridge>,
) {
    #[cfg(feature = "jvm")]
    {
        (
            Box::new(jvm::HostProbe),
            Box::new(jvm::HostJvm::new()),
            Box::new(jvm::EmbeddedJvm::new()),
        )
    }
    #[cfg(not(feature = "jvm"))]
    {
        (
            Box::new(stub::StubProbe),
            Box::new(stub::StubBridge),
            Box::new(stub::StubBridge),
        )
    }
}
