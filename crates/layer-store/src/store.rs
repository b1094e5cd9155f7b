//! The layer registry: an ordered, keyed set of layers with duplicate
//! discard, lazy residency, idle expiry, and cache maintenance.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use grib2_reader::{Layer, LayerKey, ParamId};

use crate::config::StoreConfig;
use crate::disk_cache::DiskCache;
use crate::handle::{LayerHandle, StoreContext};
use crate::{StoreError, StoreResult};

/// Relative float comparison for surface values; exact equality is too
/// fragile against the scale-factor decode.
fn surface_value_close(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    (a - b).abs() <= 1e-9 + 1e-6 * b.abs()
}

/// A keyed, totally-ordered set of layers.
///
/// Iteration order is the key order and therefore deterministic. The
/// registry mutex only guards the map itself; decoding happens under each
/// layer's own lock, so concurrent loads of different layers do not
/// serialize.
pub struct LayerStore {
    config: StoreConfig,
    ctx: Arc<StoreContext>,
    layers: Mutex<BTreeMap<LayerKey, Arc<LayerHandle>>>,
}

impl LayerStore {
    /// Create a store. The decoded-value cache directory is created when
    /// missing; failure to create it disables the disk cache but not the
    /// store.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        config.validate().map_err(StoreError::Config)?;
        let cache_dir = config.resolved_cache_directory();
        let cache = match DiskCache::new(&cache_dir) {
            Ok(cache) => Some(cache),
            Err(err) => {
                info!(dir = %cache_dir.display(), %err, "decoded cache unavailable, decoding in memory only");
                None
            }
        };
        let ctx = Arc::new(StoreContext {
            cache,
            idle: Duration::from_secs(config.layer_idle_expiry_seconds),
        });
        Ok(Self {
            config,
            ctx,
            layers: Mutex::new(BTreeMap::new()),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Insert a layer. On a key collision the resident layer wins and the
    /// new one is discarded; returns whether the layer was inserted.
    pub fn add_layer(&self, layer: Layer) -> bool {
        let key = layer.key();
        let mut layers = self.layers.lock().unwrap();
        if layers.contains_key(&key) {
            info!(param = %layer.param(), efftime = %layer.efftime(), "duplicate layer discarded");
            return false;
        }
        layers.insert(key, Arc::new(LayerHandle::new(layer, Arc::clone(&self.ctx))));
        true
    }

    /// Insert many layers; returns how many were actually added.
    pub fn add_layers(&self, layers: impl IntoIterator<Item = Layer>) -> usize {
        let mut added = 0;
        for layer in layers {
            if self.add_layer(layer) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.layers.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.lock().unwrap().is_empty()
    }

    /// Every layer, in key order.
    pub fn find_all(&self) -> Vec<Arc<LayerHandle>> {
        self.layers.lock().unwrap().values().cloned().collect()
    }

    /// Layers matching a parameter and effective time.
    pub fn find_layers(&self, param: ParamId, efftime: DateTime<Utc>) -> Vec<Arc<LayerHandle>> {
        self.layers
            .lock()
            .unwrap()
            .values()
            .filter(|h| h.layer().param() == param && h.layer().efftime() == efftime)
            .cloned()
            .collect()
    }

    /// Layers matching a parameter, effective time, and first surface.
    pub fn find_layers_surface(
        &self,
        param: ParamId,
        efftime: DateTime<Utc>,
        surface1_type: u8,
        surface1_value: f64,
    ) -> Vec<Arc<LayerHandle>> {
        self.layers
            .lock()
            .unwrap()
            .values()
            .filter(|h| {
                let layer = h.layer();
                layer.param() == param
                    && layer.efftime() == efftime
                    && layer.surface1().stype == surface1_type
                    && surface_value_close(layer.surface1().value, surface1_value)
            })
            .cloned()
            .collect()
    }

    /// Drop layers whose source file no longer exists. Returns the number
    /// removed.
    pub fn remove_missing_layers(&self) -> usize {
        let mut layers = self.layers.lock().unwrap();
        let before = layers.len();
        layers.retain(|_, handle| {
            let exists = handle.layer().source_exists();
            if !exists {
                debug!(
                    file = %handle.layer().source_path().display(),
                    "dropping layer with missing source file"
                );
            }
            exists
        });
        before - layers.len()
    }

    /// Drop layers superseded by a newer model run for the same
    /// (parameter, effective time, surface) triple. Returns the number
    /// removed.
    pub fn remove_obsolete_layers(&self) -> usize {
        let mut layers = self.layers.lock().unwrap();
        let mut newest: BTreeMap<(ParamId, DateTime<Utc>, u8, u64), DateTime<Utc>> =
            BTreeMap::new();
        for handle in layers.values() {
            let layer = handle.layer();
            let key = (
                layer.param(),
                layer.efftime(),
                layer.surface1().stype,
                layer.surface1().value.to_bits(),
            );
            let entry = newest.entry(key).or_insert(layer.reftime());
            if layer.reftime() > *entry {
                *entry = layer.reftime();
            }
        }
        let before = layers.len();
        layers.retain(|_, handle| {
            let layer = handle.layer();
            let key = (
                layer.param(),
                layer.efftime(),
                layer.surface1().stype,
                layer.surface1().value.to_bits(),
            );
            newest
                .get(&key)
                .map(|&newest_ref| layer.reftime() >= newest_ref)
                .unwrap_or(true)
        });
        let removed = before - layers.len();
        if removed > 0 {
            info!(removed, "removed obsolete layers");
        }
        removed
    }

    /// Evict decoded buffers whose idle timer has expired. Returns the
    /// number of layers whose data was dropped.
    pub fn sweep_idle(&self) -> usize {
        let now = Instant::now();
        let handles = self.find_all();
        let mut evicted = 0;
        for handle in handles {
            if handle.expire_idle(now) {
                evicted += 1;
            }
        }
        if evicted > 0 {
            debug!(evicted, "idle sweep evicted decoded layers");
        }
        evicted
    }

    /// Sweep the on-disk decoded cache per the configured age and size
    /// limits. Returns the number of files removed.
    pub fn expire_cache(&self) -> usize {
        let Some(cache) = &self.ctx.cache else {
            return 0;
        };
        cache.expire(
            Duration::from_secs(self.config.cache_max_age_days as u64 * 86400),
            self.config.cache_max_bytes,
        )
    }
}

impl std::fmt::Debug for LayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerStore")
            .field("layers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_value_close() {
        assert!(surface_value_close(50000.0, 50000.0));
        assert!(surface_value_close(50000.0, 50000.01));
        assert!(!surface_value_close(50000.0, 50001.0));
        assert!(surface_value_close(f64::NAN, f64::NAN));
        assert!(!surface_value_close(0.0, f64::NAN));
        assert!(surface_value_close(0.0, 0.0));
    }
}

// Heavier store tests that need real layers live in tests/store_tests.rs,
// where synthetic GRIB2 files are available.
