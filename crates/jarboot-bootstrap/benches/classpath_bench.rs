// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for jar directory scanning and registration in the
// jarboot-bootstrap crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use jarboot_bootstrap::{ClasspathLoader, JarRegistry};

/// Minimal zip local header followed by padding.
fn fake_jar() -> Vec<u8> {
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.resize(64, 0);
    bytes
}

/// Scan a directory of 200 jars into a fresh registry each iteration.
///
/// Covers directory listing, the zip signature check on every file and
/// canonicalisation.
fn bench_cold_load(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..200 {
        std::fs::write(dir.path().join(format!("dep-{i:03}.jar")), fake_jar()).expect("write jar");
    }

    c.bench_function("load_jars_under (200 jars, cold)", |b| {
        b.iter(|| {
            let registry = JarRegistry::new();
            let jars = registry
                .load_jars_under(black_box(dir.path()))
                .expect("load failed");
            black_box(jars);
        });
    });
}

/// Reload the same directory into a warm registry, the per-call path of
/// every `dependencies` call after the first.
fn bench_warm_reload(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    for i in 0..200 {
        std::fs::write(dir.path().join(format!("dep-{i:03}.jar")), fake_jar()).expect("write jar");
    }
    let registry = JarRegistry::new();
    registry.load_jars_under(dir.path()).expect("initial load");

    c.bench_function("load_jars_under (200 jars, warm)", |b| {
        b.iter(|| {
            let jars = registry
                .load_jars_under(black_box(dir.path()))
                .expect("load failed");
            black_box(jars);
        });
    });
}

criterion_group!(benches, bench_cold_load, bench_warm_reload);
criterion_main!(benches);
