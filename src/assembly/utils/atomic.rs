pub(crate) use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicU64;

// f64 atomic built on AtomicU64 bit transmutation, since the
// standard library provides no floating point atomics.

pub(crate) struct AtomicF64 {
    storage: AtomicU64,
}

impl AtomicF64 {
    pub fn new(value: f64) -> Self {
        let as_u64 = value.to_bits();
        Self {
            storage: AtomicU64::new(as_u64),
        }
    }
    pub fn store(&self, value: f64, ordering: Ordering) {
        let as_u64 = value.to_bits();
        self.storage.store(as_u64, ordering)
    }
    pub fn load(&self, ordering: Ordering) -> f64 {
        let as_u64 = self.storage.load(ordering);
        f64::from_bits(as_u64)
    }
}

#[test]
fn test_atomic_f64() {
    let v = AtomicF64::new(1e20);
    assert_eq!(v.load(Ordering::Relaxed), 1e20);
    v.store(1e30, Ordering::Relaxed);
    assert_eq!(v.load(Ordering::Relaxed), 1e30);
}
