// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reflective bridge into an embedded JVM.
//
// Only one VM may be created per process, so the embedded VM is started on
// the first import and shared by every later call. Handles and list
// elements are global references, so they stay valid across calls and
// threads. Threads stay attached, so all per-call work runs inside a local
// frame; the class loader behind an import is closed when the handle drops.

use std::sync::{Mutex, OnceLock};

use jni::objects::{GlobalRef, JClass};
use jni::{InitArgsBuilder, JNIEnv, JNIVersion, JavaVM};

use jarboot_core::error::{JarbootError, Result};

use super::{
    call_list_method, class_path_option, close_loader, described, find_class, in_local_frame,
    jar_class_loader, java_string, to_jsize, JavaFailure,
};
use crate::traits::{BridgedObject, BridgedValue, InteropBridge, ResolverRequest};

static EMBEDDED_VM: OnceLock<JavaVM> = OnceLock::new();

/// Serialises VM creation; `JNI_CreateJavaVM` fails if called twice.
static START_LOCK: Mutex<()> = Mutex::new(());

/// Return the embedded VM, starting it with `request`'s classpath and
/// options if this is the first call.
fn embedded_vm(request: &ResolverRequest) -> Result<&'static JavaVM> {
    if let Some(vm) = EMBEDDED_VM.get() {
        return Ok(vm);
    }

    let _guard = START_LOCK
        .lock()
        .map_err(|_| JarbootError::BridgeUnavailable("JVM start lock poisoned".into()))?;
    if let Some(vm) = EMBEDDED_VM.get() {
        return Ok(vm);
    }

    let class_path = class_path_option(&request.classpath);
    let mut builder = InitArgsBuilder::new().version(JNIVersion::V8);
    if let Some(option) = &class_path {
        builder = builder.option(option.as_str());
    }
    for option in &request.jvm_options {
        builder = builder.option(option.as_str());
    }

    let args = builder
        .build()
        .map_err(|e| JarbootError::BridgeUnavailable(format!("invalid JVM options: {e}")))?;
    let vm = JavaVM::new(args)
        .map_err(|e| JarbootError::BridgeUnavailable(format!("failed to start JVM: {e}")))?;

    tracing::info!(
        jars = request.classpath.len(),
        options = request.jvm_options.len(),
        "embedded JVM started"
    );
    Ok(EMBEDDED_VM.get_or_init(|| vm))
}

fn attach(vm: &'static JavaVM) -> Result<JNIEnv<'static>> {
    vm.attach_current_thread_permanently()
        .map_err(|e| JarbootError::BridgeUnavailable(format!("attach to embedded JVM: {e}")))
}

/// Bridge that looks classes up by name inside the embedded VM.
pub struct EmbeddedJvm;

impl EmbeddedJvm {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EmbeddedJvm {
    fn default() -> Self {
        Self::new()
    }
}

impl InteropBridge for EmbeddedJvm {
    fn import(&self, request: &ResolverRequest) -> Result<Box<dyn BridgedObject>> {
        let vm = embedded_vm(request)?;
        let mut env = attach(vm)?;

        let context = format!("import {}", request.class_name);
        let (loader, class) = in_local_frame(&mut env, |env| {
            let count = to_jsize(request.classpath.len(), "classpath")?;
            let loader = jar_class_loader(env, &request.classpath, count);
            let loader = described(env, "build class loader", loader)?;

            let class = find_class(env, &request.class_name, &loader);
            let class = match described(env, &context, class) {
                Ok(class) => class,
                Err(failure) => {
                    close_loader(env, &loader);
                    return Err(failure);
                }
            };
            Ok((env.new_global_ref(&loader)?, env.new_global_ref(&class)?))
        })
        .map_err(JarbootError::BridgeUnavailable)?;

        tracing::debug!(class = %request.class_name, "embedded JVM: class imported");
        Ok(Box::new(JvmClass {
            vm,
            loader,
            class,
            name: request.class_name.clone(),
            method: request.method.clone(),
        }))
    }
}

/// Imported resolver class and the loader that defined it.
struct JvmClass {
    vm: &'static JavaVM,
    loader: GlobalRef,
    class: GlobalRef,
    name: String,
    method: String,
}

impl BridgedObject for JvmClass {
    fn dependencies(&self) -> Result<Vec<Box<dyn BridgedValue>>> {
        let mut env = attach(self.vm)?;

        let context = format!("{}.{}", self.name, self.method);
        let elements = in_local_frame(&mut env, |env| {
            let collected = collect_elements(env, &self.class, &self.method);
            described(env, &context, collected)
        })
        .map_err(JarbootError::ResolverInvocation)?;

        Ok(elements
            .into_iter()
            .map(|obj| Box::new(JvmValue { vm: self.vm, obj }) as Box<dyn BridgedValue>)
            .collect())
    }
}

impl Drop for JvmClass {
    fn drop(&mut self) {
        let Ok(mut env) = attach(self.vm) else {
            return;
        };
        let _ = in_local_frame(&mut env, |env| {
            close_loader(env, self.loader.as_obj());
            Ok(())
        });
    }
}

/// Call the list method and pin every element as a global reference.
fn collect_elements(
    env: &mut JNIEnv,
    class: &GlobalRef,
    method: &str,
) -> jni::errors::Result<Vec<GlobalRef>> {
    let class = JClass::from(env.new_local_ref(class.as_obj())?);
    let array = call_list_method(env, &class, method)?;
    let len = env.get_array_length(&array)?;

    let mut elements = Vec::with_capacity(usize::try_from(len).unwrap_or_default());
    for index in 0..len {
        let element = env.get_object_array_element(&array, index)?;
        elements.push(env.new_global_ref(&element)?);
        env.delete_local_ref(element)?;
    }
    Ok(elements)
}

/// One element of the bridged list, still a Java object.
struct JvmValue {
    vm: &'static JavaVM,
    obj: GlobalRef,
}

impl BridgedValue for JvmValue {
    fn to_java_string(&self) -> Result<String> {
        let mut env = attach(self.vm)?;

        in_local_frame(&mut env, |env| {
            let text = env
                .call_method(self.obj.as_obj(), "toString", "()Ljava/lang/String;", &[])
                .and_then(|value| value.l());
            let text = described(env, "toString()", text)?;
            if text.is_null() {
                return Err(JavaFailure("toString() returned null".into()));
            }
            let text = java_string(env, text);
            described(env, "read toString()", text)
        })
        .map_err(JarbootError::ResolverInvocation)
    }
}
