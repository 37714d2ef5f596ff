use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::models::user::UserProfile;

/// A pending fetch older than this is assumed abandoned and may be reclaimed.
const PENDING_TIMEOUT: Duration = Duration::from_secs(30);

enum Entry {
    Pending(Instant),
    Ready { profile: UserProfile, fetched_at: Instant },
}

/// Per-user profile cache shared by all workers. At most one request fetches
/// a given user's profile at a time; the others see it as loading.
#[derive(Clone)]
pub struct ProfileCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    ttl: Duration,
}

pub enum Lookup {
    Ready(UserProfile),
    /// Another request is fetching this profile right now.
    Pending,
    /// The caller now owns the fetch.
    Claimed(ProfileClaim),
}

impl ProfileCache {
    pub fn new(ttl: Duration) -> Self {
        ProfileCache {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    pub fn lookup_or_claim(&self, uid: &str) -> Lookup {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        match map.get(uid) {
            Some(Entry::Ready { profile, fetched_at }) if now.duration_since(*fetched_at) < self.ttl => {
                return Lookup::Ready(profile.clone());
            }
            Some(Entry::Pending(since)) if now.duration_since(*since) < PENDING_TIMEOUT => {
                return Lookup::Pending;
            }
            _ => {}
        }
        map.insert(uid.to_string(), Entry::Pending(now));
        Lookup::Claimed(ProfileClaim {
            cache: self.clone(),
            uid: uid.to_string(),
            fulfilled: false,
        })
    }

    pub fn invalidate(&self, uid: &str) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(uid);
    }

    /// Forget the entry holding the backend user `profile_id`. Entries are
    /// keyed by identity-provider uid, which need not match the backend id.
    pub fn forget_profile(&self, profile_id: &str) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, entry| match entry {
            Entry::Ready { profile, .. } => profile.id.as_deref() != Some(profile_id),
            Entry::Pending(_) => true,
        });
    }

    /// Drop every cached profile, e.g. after a role's privileges change.
    pub fn clear(&self) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, entry| matches!(entry, Entry::Pending(_)));
    }

    fn store(&self, uid: &str, profile: UserProfile) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(
            uid.to_string(),
            Entry::Ready {
                profile,
                fetched_at: Instant::now(),
            },
        );
    }

    fn release(&self, uid: &str) {
        let mut map = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if matches!(map.get(uid), Some(Entry::Pending(_))) {
            map.remove(uid);
        }
    }
}

/// Ownership of an in-flight profile fetch. Dropping it unfulfilled (fetch
/// failed, request abandoned) frees the slot for the next request.
pub struct ProfileClaim {
    cache: ProfileCache,
    uid: String,
    fulfilled: bool,
}

impl ProfileClaim {
    pub fn fulfil(mut self, profile: UserProfile) {
        self.cache.store(&self.uid, profile);
        self.fulfilled = true;
    }
}

impl Drop for ProfileClaim {
    fn drop(&mut self) {
        if !self.fulfilled {
            self.cache.release(&self.uid);
        }
    }
}
