//! File name hashing used by the SFAT node table.

/// Hash a file name with the multiplier stored in the SFAT header.
///
/// Every UTF-8 byte is sign extended before being folded into a signed 32 bit accumulator, and
/// the arithmetic wraps on overflow. Names longer than a handful of characters overflow, so the
/// wrapping has to match exactly for the hashes to agree with other tools.
///
/// ```
/// assert_eq!(nx_sarc::hash("A", nx_sarc::types::DEFAULT_HASH_KEY), 65);
/// ```
pub fn hash(name: &str, key: u32) -> u32 {
    name.bytes()
        .fold(0i32, |acc, byte| {
            (byte as i8 as i32).wrapping_add(acc.wrapping_mul(key as i32))
        }) as u32
}
