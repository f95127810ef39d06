// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory backends.
//
// These stand in for a real JVM when exercising the dispatcher: a fixed
// probe, a native resolver returning a scripted list, and an interop bridge
// whose classes hand back bridged values. Every request is recorded so
// callers can check which classpath was sent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jarboot_core::RuntimeMode;
use jarboot_core::error::{JarbootError, Result};

use crate::traits::*;

/// Probe that always reports the same mode.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub RuntimeMode);

impl RuntimeProbe for FixedProbe {
    fn runtime_mode(&self) -> RuntimeMode {
        self.0
    }
}

/// Shared log of requests seen by a memory backend.
pub type RequestLog = Arc<Mutex<Vec<ResolverRequest>>>;

fn record(log: &RequestLog, request: &ResolverRequest) {
    log.lock()
        .expect("request log lock poisoned")
        .push(request.clone());
}

// ---------------------------------------------------------------------------
// Native side
// ---------------------------------------------------------------------------

/// In-process resolver returning a scripted list.
#[derive(Debug)]
pub struct MemoryResolver {
    outcome: std::result::Result<Vec<String>, String>,
    requests: RequestLog,
}

impl MemoryResolver {
    /// Resolver that answers every call with `dependencies`.
    pub fn returning<I, S>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcome: Ok(dependencies.into_iter().map(Into::into).collect()),
            requests: RequestLog::default(),
        }
    }

    /// Resolver whose every call fails with `ResolverInvocation(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
            requests: RequestLog::default(),
        }
    }

    /// Handle on the request log, valid after the resolver is boxed.
    pub fn requests(&self) -> RequestLog {
        Arc::clone(&self.requests)
    }
}

impl NativeResolver for MemoryResolver {
    fn dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>> {
        record(&self.requests, request);
        self.outcome
            .clone()
            .map_err(JarbootError::ResolverInvocation)
    }
}

// ---------------------------------------------------------------------------
// Bridged side
// ---------------------------------------------------------------------------

/// Element of a bridged collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryValue {
    /// An object whose `toString()` yields the text.
    Text(String),
    /// An object whose `toString()` throws.
    Broken(String),
}

impl BridgedValue for MemoryValue {
    fn to_java_string(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Broken(reason) => Err(JarbootError::ResolverInvocation(format!(
                "toString() threw: {reason}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
enum ClassBehaviour {
    Returns(Vec<MemoryValue>),
    Throws(String),
}

/// Interop bridge backed by a table of fake classes.
#[derive(Debug, Default)]
pub struct MemoryBridge {
    classes: HashMap<String, ClassBehaviour>,
    offline: Option<String>,
    requests: RequestLog,
}

impl MemoryBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class_name` whose dependency method returns `values`.
    pub fn with_class<I>(mut self, class_name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = MemoryValue>,
    {
        self.classes.insert(
            class_name.into(),
            ClassBehaviour::Returns(values.into_iter().collect()),
        );
        self
    }

    /// Register `class_name` whose dependency method throws.
    pub fn with_throwing_class(
        mut self,
        class_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.classes
            .insert(class_name.into(), ClassBehaviour::Throws(message.into()));
        self
    }

    /// Make every import fail as if the bridge library were missing.
    pub fn offline(mut self, reason: impl Into<String>) -> Self {
        self.offline = Some(reason.into());
        self
    }

    pub fn requests(&self) -> RequestLog {
        Arc::clone(&self.requests)
    }
}

impl InteropBridge for MemoryBridge {
    fn import(&self, request: &ResolverRequest) -> Result<Box<dyn BridgedObject>> {
        record(&self.requests, request);

        if let Some(reason) = &self.offline {
            return Err(JarbootError::BridgeUnavailable(reason.clone()));
        }

        let behaviour = self.classes.get(&request.class_name).ok_or_else(|| {
            JarbootError::BridgeUnavailable(format!(
                "java.lang.ClassNotFoundException: {}",
                request.class_name
            ))
        })?;

        Ok(Box::new(MemoryObject {
            behaviour: behaviour.clone(),
        }))
    }
}

struct MemoryObject {
    behaviour: ClassBehaviour,
}

impl BridgedObject for MemoryObject {
    fn dependencies(&self) -> Result<Vec<Box<dyn BridgedValue>>> {
        match &self.behaviour {
            ClassBehaviour::Returns(values) => Ok(values
                .iter()
                .cloned()
                .map(|v| Box::new(v) as Box<dyn BridgedValue>)
                .collect()),
            ClassBehaviour::Throws(message) => {
                Err(JarbootError::ResolverInvocation(message.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(class_name: &str) -> ResolverRequest {
        ResolverRequest {
            class_name: class_name.into(),
            method: "dependencies".into(),
            classpath: Vec::new(),
            jvm_options: Vec::new(),
        }
    }

    #[test]
    fn resolver_records_requests() {
        let resolver = MemoryResolver::returning(["a:b:1"]);
        let log = resolver.requests();

        let deps = resolver.dependencies(&request("x.Y")).unwrap();
        assert_eq!(deps, vec!["a:b:1"]);
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_class_is_bridge_unavailable() {
        let bridge = MemoryBridge::new().with_class("x.Y", Vec::new());
        let err = bridge.import(&request("x.Z")).err().unwrap();
        assert!(matches!(err, JarbootError::BridgeUnavailable(m) if m.contains("x.Z")));
    }

    #[test]
    fn bridged_values_stringify_individually() {
        let bridge = MemoryBridge::new().with_class(
            "x.Y",
            [
                MemoryValue::Text("a:b:1".into()),
                MemoryValue::Broken("NullPointerException".into()),
            ],
        );
        let object = bridge.import(&request("x.Y")).unwrap();
        let values = object.dependencies().unwrap();

        assert_eq!(values[0].to_java_string().unwrap(), "a:b:1");
        assert!(values[1].to_java_string().is_err());
    }
}
