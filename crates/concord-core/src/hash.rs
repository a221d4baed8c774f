//! FNV-1a hashing.
//!
//! Ring positions must be identical across processes and releases, so the
//! std `DefaultHasher` (randomly keyed, unspecified algorithm) is not usable.
//!
//! Plain FNV-1a moves only a few output bits when the last input byte
//! changes, which clusters keys such as `"node-0"`..`"node-9"` into one arc of
//! the ring. [`ring_hash`] runs the murmur3 finalizer over the FNV-1a result to
//! spread such keys.

const FNV_OFFSET_BASIS_32: u32 = 0x811c_9dc5;
const FNV_PRIME_32: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the given bytes.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS_32;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME_32);
    }
    hash
}

/// Murmur3 `fmix32` finalizer: a bijection on `u32` with full avalanche.
pub fn fmix32(mut hash: u32) -> u32 {
    hash ^= hash >> 16;
    hash = hash.wrapping_mul(0x85eb_ca6b);
    hash ^= hash >> 13;
    hash = hash.wrapping_mul(0xc2b2_ae35);
    hash ^= hash >> 16;
    hash
}

/// Position of `bytes` on the 32-bit hash ring.
pub fn ring_hash(bytes: &[u8]) -> u32 {
    fmix32(fnv1a_32(bytes))
}
