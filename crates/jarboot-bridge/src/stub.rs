// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds without the `jvm` feature.
//
// No JVM can ever be reached, so the probe reports bridged mode and every
// call fails with `BridgeUnavailable`. Real implementations live in `jvm`.

use jarboot_core::RuntimeMode;
use jarboot_core::error::{JarbootError, Result};

use crate::traits::*;

const NO_JVM: &str = "built without the `jvm` feature; no JVM backend is available";

/// Probe for builds that cannot host a JVM.
pub struct StubProbe;

impl RuntimeProbe for StubProbe {
    fn runtime_mode(&self) -> RuntimeMode {
        RuntimeMode::Bridged
    }
}

/// No-op bridge returned when JNI support is compiled out.
pub struct StubBridge;

impl NativeResolver for StubBridge {
    fn dependencies(&self, _request: &ResolverRequest) -> Result<Vec<String>> {
        tracing::warn!("NativeResolver::dependencies called on stub bridge");
        Err(JarbootError::BridgeUnavailable(NO_JVM.into()))
    }
}

impl InteropBridge for StubBridge {
    fn import(&self, request: &ResolverRequest) -> Result<Box<dyn BridgedObject>> {
        tracing::warn!(class = %request.class_name, "InteropBridge::import called on stub bridge");
        Err(JarbootError::BridgeUnavailable(NO_JVM.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ResolverRequest {
        ResolverRequest {
            class_name: "jarboot.Bootstrap".into(),
            method: "dependencies".into(),
            classpath: Vec::new(),
            jvm_options: Vec::new(),
        }
    }

    #[test]
    fn stub_reports_bridged_mode() {
        assert_eq!(StubProbe.runtime_mode(), RuntimeMode::Bridged);
    }

    #[test]
    fn every_call_is_bridge_unavailable() {
        assert!(matches!(
            NativeResolver::dependencies(&StubBridge, &request()),
            Err(JarbootError::BridgeUnavailable(_))
        ));
        assert!(matches!(
            StubBridge.import(&request()),
            Err(JarbootError::BridgeUnavailable(_))
        ));
    }
}
