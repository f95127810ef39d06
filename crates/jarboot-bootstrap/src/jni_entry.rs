// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JNI export for JVM hosts.
//
// A Java host loads the cdylib and declares
//
//     package jarboot;
//     public final class Native {
//         public static native String[] dependencies(String jarPath);
//     }
//
// `JNI_OnLoad` registers the host VM, so calls arriving here run in native
// mode. A `null` jar path means the configured default directory. Failures
// are thrown as Java exceptions; the return value is then `null`.

use std::path::PathBuf;

use jni::JNIEnv;
use jni::objects::{JClass, JObject, JString};
use jni::sys::{jobjectArray, jsize};

use jarboot_core::error::{JarbootError, Result};

/// Java exception class thrown for each failure kind.
pub fn java_exception_class(err: &JarbootError) -> &'static str {
    match err {
        JarbootError::ClasspathLoad { .. } | JarbootError::Io(_) => {
            "java/lang/IllegalArgumentException"
        }
        JarbootError::BridgeUnavailable(_) => "java/lang/UnsupportedOperationException",
        JarbootError::ResolverInvocation(_) => "java/lang/IllegalStateException",
        JarbootError::InvalidNotation(_)
        | JarbootError::Config(_)
        | JarbootError::Serialization(_) => "java/lang/RuntimeException",
    }
}

/// `jarboot.Native.dependencies(String)`.
#[unsafe(no_mangle)]
pub extern "system" fn Java_jarboot_Native_dependencies<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    jar_path: JString<'local>,
) -> jobjectArray {
    match native_dependencies(&mut env, &jar_path) {
        Ok(array) => array,
        Err(err) => {
            tracing::error!(error = %err, "bootstrap dependency lookup failed");
            if !env.exception_check().unwrap_or(false) {
                let _ = env.throw_new(java_exception_class(&err), err.to_string());
            }
            std::ptr::null_mut()
        }
    }
}

fn native_dependencies(env: &mut JNIEnv, jar_path: &JString) -> Result<jobjectArray> {
    let jar_path = if jar_path.is_null() {
        None
    } else {
        let path: String = env.get_string(jar_path).map_err(marshal_err)?.into();
        Some(PathBuf::from(path))
    };

    let dependencies = crate::dependencies(jar_path.as_deref())?;

    let len = jsize::try_from(dependencies.len()).map_err(|_| {
        JarbootError::ResolverInvocation(format!(
            "{} dependencies exceed the JNI array limit",
            dependencies.len()
        ))
    })?;
    let array = env
        .new_object_array(len, "java/lang/String", JObject::null())
        .map_err(marshal_err)?;
    for (index, dependency) in (0..len).zip(&dependencies) {
        let text = env.new_string(dependency).map_err(marshal_err)?;
        env.set_object_array_element(&array, index, &text)
            .map_err(marshal_err)?;
        env.delete_local_ref(text).map_err(marshal_err)?;
    }
    Ok(array.into_raw())
}

fn marshal_err(e: jni::errors::Error) -> JarbootError {
    JarbootError::ResolverInvocation(format!("marshalling across JNI: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_map_to_distinct_java_exceptions() {
        let classpath = JarbootError::classpath("/nope", "missing");
        let bridge = JarbootError::BridgeUnavailable("no JVM".into());
        let resolver = JarbootError::ResolverInvocation("threw".into());

        assert_eq!(java_exception_class(&classpath), "java/lang/IllegalArgumentException");
        assert_eq!(java_exception_class(&bridge), "java/lang/UnsupportedOperationException");
        assert_eq!(java_exception_class(&resolver), "java/lang/IllegalStateException");
    }
}
