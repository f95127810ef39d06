// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Call-path selection for the resolver.
//
// `Dispatch` is chosen once per call from the probed `RuntimeMode`. Both
// variants end in the same `Vec<String>`; only the bridged path has to
// stringify element by element.

use jarboot_bridge::traits::{InteropBridge, NativeResolver, ResolverRequest};
use jarboot_core::RuntimeMode;
use jarboot_core::error::Result;
use tracing::debug;

/// Anything that can produce the bootstrap dependency list.
pub trait FetchDependencies {
    fn fetch_dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>>;
}

/// Direct in-process call; the resolver already hands back strings.
pub struct NativeCall<'a> {
    resolver: &'a dyn NativeResolver,
}

impl<'a> NativeCall<'a> {
    pub fn new(resolver: &'a dyn NativeResolver) -> Self {
        Self { resolver }
    }
}

impl FetchDependencies for NativeCall<'_> {
    fn fetch_dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>> {
        self.resolver.dependencies(request)
    }
}

/// Reflective call through an interop bridge.
pub struct BridgedCall<'a> {
    bridge: &'a dyn InteropBridge,
}

impl<'a> BridgedCall<'a> {
    pub fn new(bridge: &'a dyn InteropBridge) -> Self {
        Self { bridge }
    }
}

impl FetchDependencies for BridgedCall<'_> {
    fn fetch_dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>> {
        let resolver = self.bridge.import(request)?;
        let values = resolver.dependencies()?;
        debug!(count = values.len(), "stringifying bridged dependency list");

        values.iter().map(|value| value.to_java_string()).collect()
    }
}

/// The call path selected for one `dependencies` call.
pub enum Dispatch<'a> {
    Native(NativeCall<'a>),
    Bridged(BridgedCall<'a>),
}

impl<'a> Dispatch<'a> {
    /// Pick the variant for `mode`.
    pub fn select(
        mode: RuntimeMode,
        native: &'a dyn NativeResolver,
        bridge: &'a dyn InteropBridge,
    ) -> Self {
        match mode {
            RuntimeMode::Native => Self::Native(NativeCall::new(native)),
            RuntimeMode::Bridged => Self::Bridged(BridgedCall::new(bridge)),
        }
    }

    pub fn mode(&self) -> RuntimeMode {
        match self {
            Self::Native(_) => RuntimeMode::Native,
            Self::Bridged(_) => RuntimeMode::Bridged,
        }
    }
}

impl FetchDependencies for Dispatch<'_> {
    fn fetch_dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>> {
        match self {
            Self::Native(call) => call.fetch_dependencies(request),
            Self::Bridged(call) => call.fetch_dependencies(request),
        }
    }
}

#[cfg(test)]
mod tests {
    use jarboot_bridge::memory::{MemoryBridge, MemoryResolver, MemoryValue};
    use jarboot_core::JarbootError;

    use super::*;

    const CLASS: &str = "jarboot.Bootstrap";

    fn request() -> ResolverRequest {
        ResolverRequest {
            class_name: CLASS.into(),
            method: "dependencies".into(),
            classpath: Vec::new(),
            jvm_options: Vec::new(),
        }
    }

    #[test]
    fn select_follows_mode() {
        let native = MemoryResolver::returning(Vec::<String>::new());
        let bridge = MemoryBridge::new();

        assert_eq!(
            Dispatch::select(RuntimeMode::Native, &native, &bridge).mode(),
            RuntimeMode::Native
        );
        assert_eq!(
            Dispatch::select(RuntimeMode::Bridged, &native, &bridge).mode(),
            RuntimeMode::Bridged
        );
    }

    #[test]
    fn native_call_does_not_touch_bridge() {
        let native = MemoryResolver::returning(["a:b:1"]);
        let bridge = MemoryBridge::new();
        let bridge_log = bridge.requests();

        let deps = Dispatch::select(RuntimeMode::Native, &native, &bridge)
            .fetch_dependencies(&request())
            .unwrap();
        assert_eq!(deps, vec!["a:b:1"]);
        assert!(bridge_log.lock().unwrap().is_empty());
    }

    #[test]
    fn bridged_call_fails_whole_list_on_one_bad_element() {
        let native = MemoryResolver::returning(Vec::<String>::new());
        let bridge = MemoryBridge::new().with_class(
            CLASS,
            [
                MemoryValue::Text("a:b:1".into()),
                MemoryValue::Broken("boom".into()),
            ],
        );

        let result = Dispatch::select(RuntimeMode::Bridged, &native, &bridge)
            .fetch_dependencies(&request());
        assert!(matches!(result, Err(JarbootError::ResolverInvocation(_))));
    }

    #[test]
    fn bridged_method_exception_propagates() {
        let bridge = MemoryBridge::new().with_throwing_class(CLASS, "IllegalStateException");

        let result = BridgedCall::new(&bridge).fetch_dependencies(&request());
        assert!(matches!(result, Err(JarbootError::ResolverInvocation(m)) if m == "IllegalStateException"));
    }
}
