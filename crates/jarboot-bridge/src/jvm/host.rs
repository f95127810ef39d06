// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-process resolver calls on the JVM that loaded this library.

use jni::JNIEnv;
use jni::objects::JClass;

use jarboot_core::error::{JarbootError, Result};

use super::{
    call_list_method, close_loader, described, find_class, host_vm, in_local_frame,
    jar_class_loader, java_string, to_jsize,
};
use crate::traits::{NativeResolver, ResolverRequest};

/// Resolver reached through the host VM.
///
/// Zero-sized; the VM itself is registered process-wide by `JNI_OnLoad`.
pub struct HostJvm;

impl HostJvm {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HostJvm {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeResolver for HostJvm {
    fn dependencies(&self, request: &ResolverRequest) -> Result<Vec<String>> {
        let vm = host_vm().ok_or_else(|| {
            JarbootError::BridgeUnavailable("no host JVM registered in this process".into())
        })?;
        let mut env = vm
            .attach_current_thread()
            .map_err(|e| JarbootError::BridgeUnavailable(format!("attach to host JVM: {e}")))?;

        tracing::debug!(
            class = %request.class_name,
            jars = request.classpath.len(),
            "host JVM: calling resolver in-process"
        );

        let context = format!("{}.{}", request.class_name, request.method);
        in_local_frame(&mut *env, |env| {
            let count = to_jsize(request.classpath.len(), "classpath")?;
            let loader = jar_class_loader(env, &request.classpath, count);
            let loader = described(env, "build class loader", loader)?;

            let outcome = find_class(env, &request.class_name, &loader)
                .and_then(|class| read_string_list(env, &class, &request.method));
            let outcome = described(env, &context, outcome);
            close_loader(env, &loader);
            outcome
        })
        .map_err(JarbootError::ResolverInvocation)
    }
}

/// Call the resolver and cast every element to `java.lang.String`.
fn read_string_list<'local>(
    env: &mut JNIEnv<'local>,
    class: &JClass<'local>,
    method: &str,
) -> jni::errors::Result<Vec<String>> {
    let array = call_list_method(env, class, method)?;
    let len = env.get_array_length(&array)?;

    let mut dependencies = Vec::with_capacity(usize::try_from(len).unwrap_or_default());
    for index in 0..len {
        let element = env.get_object_array_element(&array, index)?;
        if !env.is_instance_of(&element, "java/lang/String")? {
            return Err(jni::errors::Error::WrongJValueType(
                "java.lang.String",
                "non-string list element",
            ));
        }
        dependencies.push(java_string(env, element)?);
    }
    Ok(dependencies)
}
