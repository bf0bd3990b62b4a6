//! Climate profile cache
//!
//! The only state shared between requests. Profiles are keyed by
//! `(lat, lon, years)` with coordinates quantised to 1e-4 degrees (~11 m), and
//! expire after a fixed TTL. Writers replace whole entries (last writer wins);
//! two concurrent misses for one key may both fetch upstream, which costs a
//! redundant fetch but never returns a wrong profile.

use super::profile::ClimateProfile;
use crate::config::CacheConfig;
use crate::data::Location;
use moka::sync::Cache;
use std::sync::Arc;

/// Cache key: quantised coordinates plus analysis length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileKey {
    lat_e4: i64,
    lon_e4: i64,
    years: u32,
}

impl ProfileKey {
    pub fn new(location: &Location, years: u32) -> Self {
        Self {
            lat_e4: (location.lat * 10_000.0).round() as i64,
            lon_e4: (location.lon * 10_000.0).round() as i64,
            years,
        }
    }
}

/// Storage for climate profiles; hosts may back this with any key-value store
pub trait ClimateCache: Send + Sync {
    fn get(&self, key: &ProfileKey) -> Option<Arc<ClimateProfile>>;

    fn insert(&self, key: ProfileKey, profile: Arc<ClimateProfile>);
}

/// In-process TTL cache backed by moka
#[derive(Clone)]
pub struct MokaClimateCache {
    inner: Cache<ProfileKey, Arc<ClimateProfile>>,
}

impl MokaClimateCache {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl())
            .build();
        Self { inner }
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl ClimateCache for MokaClimateCache {
    fn get(&self, key: &ProfileKey) -> Option<Arc<ClimateProfile>> {
        self.inner.get(key)
    }

    fn insert(&self, key: ProfileKey, profile: Arc<ClimateProfile>) {
        self.inner.insert(key, profile);
    }
}
