use std::hash::Hash;

use small_map::SmallMap;

// ----------------------------------------------
// SmallSet
// ----------------------------------------------

// SmallMap starts with a fixed-size buffer but can expand into the heap.
// This allows us to mostly stay on the stack and avoid any allocations.
// We only care about the key being present or not, so value is an empty type.
pub struct SmallSet<const N: usize, T>(SmallMap<N, T, ()>);

impl<const N: usize, T> SmallSet<N, T>
    where T: Eq + Hash
{
    #[inline]
    pub fn new() -> Self {
        Self(SmallMap::new())
    }

    #[inline]
    pub fn contains(&self, key: &T) -> bool {
        self.0.get(key).is_some()
    }

    // Returns true if the key was not present before.
    #[inline]
    pub fn insert(&mut self, key: T) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.0.insert(key, ());
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = SmallMap::new();
    }
}

// ----------------------------------------------
// FNV-1a hash utilities
// ----------------------------------------------

pub type FNV1aHash = u64;
pub type StringHash = FNV1aHash;
pub const NULL_HASH: FNV1aHash = 0;

pub const fn fnv1a_from_str(s: &str) -> FNV1aHash {
    if s.is_empty() {
        return NULL_HASH;
    }

    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    let bytes = s.as_bytes();
    let mut hash = FNV_OFFSET;
    let mut i = 0;

    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }

    hash
}
