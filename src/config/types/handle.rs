//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads; the config is installed once at
//! startup and read from anywhere through [`cfg`].

use crate::config::PlaysyncConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<PlaysyncConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(PlaysyncConfig::default()));

#[inline]
pub fn cfg() -> Arc<PlaysyncConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: PlaysyncConfig) -> Arc<PlaysyncConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
