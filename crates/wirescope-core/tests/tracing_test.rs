//! Tests for the wirescope tracing setup.

use std::sync::Mutex;

use wirescope_core::tracing::init_tracing;

static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn test_init_with_debug_filter() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("WIRESCOPE_LOG", "debug");
    init_tracing();
    tracing::debug!(target: "wirescope_core", "tracing initialised");
    std::env::remove_var("WIRESCOPE_LOG");
}

#[test]
fn test_init_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
    init_tracing();
}

#[test]
fn test_invalid_filter_falls_back() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("WIRESCOPE_LOG", "resolver=notalevel==");
    init_tracing();
    std::env::remove_var("WIRESCOPE_LOG");
}
