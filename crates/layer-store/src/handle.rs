//! Registered layers: immutable identity plus mutable residency state.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use grib2_reader::Layer;
use wx_common::LatLonBox;

use crate::disk_cache::DiskCache;
use crate::region;
use crate::result::LayerResult;
use crate::{StoreError, StoreResult};

/// Shared store internals every handle needs for lazy loading.
#[derive(Debug)]
pub(crate) struct StoreContext {
    pub(crate) cache: Option<DiskCache>,
    pub(crate) idle: Duration,
}

#[derive(Debug, Default)]
struct Residency {
    data: Option<Arc<Vec<f32>>>,
    expires: Option<Instant>,
}

/// A layer registered in a [`crate::LayerStore`].
///
/// The decoded buffer is shared read-only once resident; readers clone the
/// `Arc` under the lock, so an expiry sweep can never pull data out from
/// under them.
#[derive(Debug)]
pub struct LayerHandle {
    layer: Layer,
    ctx: Arc<StoreContext>,
    state: Mutex<Residency>,
}

impl LayerHandle {
    pub(crate) fn new(layer: Layer, ctx: Arc<StoreContext>) -> Self {
        Self {
            layer,
            ctx,
            state: Mutex::new(Residency::default()),
        }
    }

    /// The immutable layer this handle wraps.
    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Whether the decoded buffer is currently resident.
    pub fn is_resident(&self) -> bool {
        self.state.lock().unwrap().data.is_some()
    }

    /// Ensure the decoded buffer is resident and return it.
    ///
    /// Resident data just re-arms the idle timer. Otherwise the decoded
    /// cache is consulted by payload digest, and only on a miss is the
    /// payload decoded (and written back to the cache). Cache I/O failures
    /// fall back to the in-memory decode.
    pub fn check_load(&self) -> StoreResult<Arc<Vec<f32>>> {
        let mut state = self.state.lock().unwrap();
        if let Some(data) = &state.data {
            let data = Arc::clone(data);
            state.expires = Some(Instant::now() + self.ctx.idle);
            return Ok(data);
        }

        let expected = self.layer.grid().map(|g| g.len());
        let mut decoded: Option<Vec<f32>> = None;
        let mut digest: Option<String> = None;

        if let Some(cache) = &self.ctx.cache {
            match self.layer.read_payload() {
                Ok(payload) => {
                    let d = DiskCache::digest(&payload);
                    if let Some(data) = cache.load(&d) {
                        if Some(data.len()) == expected {
                            debug!(digest = %d, "decoded-cache hit");
                            decoded = Some(data);
                        } else {
                            info!(digest = %d, "decoded-cache entry has wrong size, re-decoding");
                        }
                    }
                    digest = Some(d);
                }
                Err(err) => {
                    // The decode below will surface the real error.
                    info!(%err, "payload read for cache digest failed");
                }
            }
        }

        let fresh = decoded.is_none();
        let data = match decoded {
            Some(data) => data,
            None => self.layer.decode().map_err(StoreError::Decode)?,
        };
        if fresh {
            if let (Some(cache), Some(digest)) = (&self.ctx.cache, &digest) {
                if let Err(err) = cache.store(digest, &data) {
                    info!(%err, "decoded-cache write failed, keeping in-memory copy");
                }
            }
        }

        let data = Arc::new(data);
        state.data = Some(Arc::clone(&data));
        state.expires = Some(Instant::now() + self.ctx.idle);
        Ok(data)
    }

    /// Drop the decoded buffer if its idle timer has run out at `now`.
    /// Returns true when the buffer was evicted.
    pub(crate) fn expire_idle(&self, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap();
        match (&state.data, state.expires) {
            (Some(_), Some(expires)) if expires <= now => {
                state.data = None;
                state.expires = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the decoded buffer unconditionally.
    pub fn expire_now(&self) {
        let mut state = self.state.lock().unwrap();
        state.data = None;
        state.expires = None;
    }

    /// Extract a rasterized region of this layer, decoding on demand.
    pub fn get_results(self: &Arc<Self>, bbox: &LatLonBox) -> StoreResult<LayerResult> {
        let data = self.check_load()?;
        region::extract(self, &data, bbox)
    }
}
