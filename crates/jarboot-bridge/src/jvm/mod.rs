// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JVM bridge via JNI.
//
// Two ways into the resolver:
//
// - `HostJvm`: this library was loaded by a running JVM (`System.loadLibrary`)
//   and `JNI_OnLoad` captured that VM. Calls are ordinary in-process JNI and
//   the returned list elements are cast straight to `java.lang.String`.
// - `EmbeddedJvm`: a plain native process. The first import starts a VM
//   through the invocation API; it then lives for the rest of the process.
//   Classes are looked up by name and every element is converted with
//   `toString()` on the Java side.
//
// Both paths resolve the class through a fresh `URLClassLoader` over the
// registered jars, parented to the thread's context loader.

mod embedded;
mod host;

use std::path::PathBuf;
use std::sync::OnceLock;

use jni::objects::{JClass, JObject, JObjectArray, JString, JThrowable, JValue};
use jni::sys::{jint, jsize, JNI_ERR, JNI_TRUE, JNI_VERSION_1_8};
use jni::{JNIEnv, JavaVM};

use jarboot_core::RuntimeMode;

use crate::traits::RuntimeProbe;

pub use embedded::EmbeddedJvm;
pub use host::HostJvm;

// ---------------------------------------------------------------------------
// Host VM registration
// ---------------------------------------------------------------------------

/// The JVM that loaded this library, if any.
static HOST_VM: OnceLock<JavaVM> = OnceLock::new();

/// Record the JVM hosting this process.
///
/// Called from `JNI_OnLoad`; embedders that attach through other means can
/// call it directly. Only the first registration wins.
pub fn register_host_vm(vm: JavaVM) -> bool {
    let registered = HOST_VM.set(vm).is_ok();
    if registered {
        tracing::info!("host JVM registered; bootstrap calls run in-process");
    }
    registered
}

pub(crate) fn host_vm() -> Option<&'static JavaVM> {
    HOST_VM.get()
}

/// Entry point invoked by the JVM on `System.loadLibrary`.
///
/// # Safety
///
/// Must only be called by the JVM, with a valid `JavaVM*`.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn JNI_OnLoad(
    vm: *mut jni::sys::JavaVM,
    _reserved: *mut std::ffi::c_void,
) -> jint {
    // SAFETY: the JVM passes its own, live `JavaVM*`.
    match unsafe { JavaVM::from_raw(vm) } {
        Ok(vm) => {
            register_host_vm(vm);
            JNI_VERSION_1_8
        }
        Err(e) => {
            tracing::error!(error = %e, "JNI_OnLoad received an invalid JavaVM pointer");
            JNI_ERR
        }
    }
}

/// Reports native mode once a host VM has been registered.
pub struct HostProbe;

impl RuntimeProbe for HostProbe {
    fn runtime_mode(&self) -> RuntimeMode {
        if host_vm().is_some() {
            RuntimeMode::Native
        } else {
            RuntimeMode::Bridged
        }
    }
}

// ---------------------------------------------------------------------------
// Shared JNI helpers
// ---------------------------------------------------------------------------

/// Return type the resolver method must declare.
const LIST_SIG: &str = "()Ljava/util/List;";

/// Capacity hint for every local frame; loops release their per-item
/// references, so a call never holds more than a handful at once.
const LOCAL_FRAME_CAPACITY: i32 = 32;

/// Failure text gathered inside a local frame, after any pending Java
/// exception has been drained.
struct JavaFailure(String);

impl From<jni::errors::Error> for JavaFailure {
    fn from(e: jni::errors::Error) -> Self {
        Self(e.to_string())
    }
}

/// Run `f` inside a JNI local frame so every local reference it creates
/// is released when it returns. Threads attached permanently never free
/// locals otherwise.
fn in_local_frame<T>(
    env: &mut JNIEnv,
    f: impl FnOnce(&mut JNIEnv) -> Result<T, JavaFailure>,
) -> Result<T, String> {
    env.with_local_frame(LOCAL_FRAME_CAPACITY, f)
        .map_err(|JavaFailure(reason)| reason)
}

/// Tag a JNI failure with `context` and the pending exception's text.
fn described<T>(
    env: &mut JNIEnv,
    context: &str,
    result: jni::errors::Result<T>,
) -> Result<T, JavaFailure> {
    result.map_err(|e| JavaFailure(describe_failure(env, context, e)))
}

/// Checked conversion of a Rust length to a JNI array size.
fn to_jsize(len: usize, what: &str) -> Result<jsize, JavaFailure> {
    jsize::try_from(len)
        .map_err(|_| JavaFailure(format!("{what} of {len} entries exceeds the JNI array limit")))
}

/// Turn a JNI failure into text, draining any pending Java exception.
///
/// The exception's own `toString()` is preferred over the generic JNI
/// error since it names the Java-side cause.
fn describe_failure(env: &mut JNIEnv, context: &str, e: jni::errors::Error) -> String {
    if env.exception_check().unwrap_or(false) {
        let thrown = env.exception_occurred();
        let _ = env.exception_clear();
        if let Ok(throwable) = thrown {
            if let Ok(text) = throwable_text(env, &throwable) {
                return format!("{context}: {text}");
            }
        }
    }
    format!("{context}: {e}")
}

fn throwable_text(env: &mut JNIEnv, throwable: &JThrowable) -> jni::errors::Result<String> {
    let text = env
        .call_method(throwable, "toString", "()Ljava/lang/String;", &[])?
        .l()?;
    java_string(env, text)
}

/// Read a `java.lang.String` object into a Rust `String`, releasing the
/// local reference.
fn java_string(env: &mut JNIEnv, obj: JObject) -> jni::errors::Result<String> {
    let text = JString::from(obj);
    let value: String = env.get_string(&text)?.into();
    env.delete_local_ref(text)?;
    Ok(value)
}

/// `Thread.currentThread().getContextClassLoader()`, falling back to the
/// system loader for threads attached from native code.
fn parent_loader<'local>(env: &mut JNIEnv<'local>) -> jni::errors::Result<JObject<'local>> {
    let thread = env
        .call_static_method("java/lang/Thread", "currentThread", "()Ljava/lang/Thread;", &[])?
        .l()?;
    let context = env
        .call_method(&thread, "getContextClassLoader", "()Ljava/lang/ClassLoader;", &[])?
        .l()?;
    env.delete_local_ref(thread)?;
    if !context.is_null() {
        return Ok(context);
    }
    env.call_static_method(
        "java/lang/ClassLoader",
        "getSystemClassLoader",
        "()Ljava/lang/ClassLoader;",
        &[],
    )?
    .l()
}

/// Build `new URLClassLoader(jars, parent)`. `count` is `classpath.len()`
/// already checked against the JNI array limit.
fn jar_class_loader<'local>(
    env: &mut JNIEnv<'local>,
    classpath: &[PathBuf],
    count: jsize,
) -> jni::errors::Result<JObject<'local>> {
    let urls = env.new_object_array(count, "java/net/URL", JObject::null())?;

    for (index, jar) in (0..count).zip(classpath) {
        let path = env.new_string(jar.to_string_lossy())?;
        let file = env.new_object(
            "java/io/File",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&path)],
        )?;
        let uri = env
            .call_method(&file, "toURI", "()Ljava/net/URI;", &[])?
            .l()?;
        let url = env
            .call_method(&uri, "toURL", "()Ljava/net/URL;", &[])?
            .l()?;
        env.set_object_array_element(&urls, index, &url)?;

        env.delete_local_ref(url)?;
        env.delete_local_ref(uri)?;
        env.delete_local_ref(file)?;
        env.delete_local_ref(path)?;
    }

    let parent = parent_loader(env)?;
    env.new_object(
        "java/net/URLClassLoader",
        "([Ljava/net/URL;Ljava/lang/ClassLoader;)V",
        &[JValue::Object(&urls), JValue::Object(&parent)],
    )
}

/// `Class.forName(name, true, loader)`.
fn find_class<'local>(
    env: &mut JNIEnv<'local>,
    class_name: &str,
    loader: &JObject,
) -> jni::errors::Result<JClass<'local>> {
    let name = env.new_string(class_name)?;
    let class = env
        .call_static_method(
            "java/lang/Class",
            "forName",
            "(Ljava/lang/String;ZLjava/lang/ClassLoader;)Ljava/lang/Class;",
            &[
                JValue::Object(&name),
                JValue::Bool(JNI_TRUE),
                JValue::Object(loader),
            ],
        )?
        .l()?;
    Ok(JClass::from(class))
}

/// `loader.close()`, releasing the jar files it opened.
///
/// Must run with no Java exception pending; callers describe failures first.
fn close_loader(env: &mut JNIEnv, loader: &JObject) {
    if let Err(e) = env.call_method(loader, "close", "()V", &[]) {
        let reason = describe_failure(env, "URLClassLoader.close", e);
        tracing::warn!(%reason, "class loader did not close cleanly");
    }
}

/// Call the static list method and return `list.toArray()`.
fn call_list_method<'local>(
    env: &mut JNIEnv<'local>,
    class: &JClass<'local>,
    method: &str,
) -> jni::errors::Result<JObjectArray<'local>> {
    let list = env.call_static_method(class, method, LIST_SIG, &[])?.l()?;
    if list.is_null() {
        return Err(jni::errors::Error::NullPtr("resolver returned null"));
    }
    let array = env
        .call_method(&list, "toArray", "()[Ljava/lang/Object;", &[])?
        .l()?;
    env.delete_local_ref(list)?;
    Ok(JObjectArray::from(array))
}

/// `-Djava.class.path=...` for an embedded VM.
fn class_path_option(classpath: &[PathBuf]) -> Option<String> {
    if classpath.is_empty() {
        return None;
    }
    let joined = std::env::join_paths(classpath).ok()?;
    Some(format!("-Djava.class.path={}", joined.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_host_vm_mode_is_bridged() {
        // Nothing calls JNI_OnLoad under `cargo test`.
        assert_eq!(HostProbe.runtime_mode(), RuntimeMode::Bridged);
    }

    #[test]
    fn class_path_option_joins_jars() {
        let jars = [PathBuf::from("/a/one.jar"), PathBuf::from("/b/two.jar")];
        let option = class_path_option(&jars).unwrap();
        assert!(option.starts_with("-Djava.class.path=/a/one.jar"));
        assert!(option.ends_with("/b/two.jar"));
        assert_eq!(class_path_option(&[]), None);
    }

    #[test]
    fn oversized_lengths_are_rejected_not_truncated() {
        assert_eq!(to_jsize(3, "classpath").ok(), Some(3));
        assert_eq!(to_jsize(jsize::MAX as usize, "classpath").ok(), Some(jsize::MAX));

        let Err(JavaFailure(reason)) = to_jsize(jsize::MAX as usize + 1, "classpath") else {
            panic!("length above jsize::MAX must fail");
        };
        assert!(reason.contains("classpath"));
    }
}
