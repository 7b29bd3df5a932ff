// PoE bitmask conversions
//
// The port-state script exposes the PoE on/off state as one decimal
// integer. Bit n is port n. Reads walk the low bits least-significant
// first; writes pack the list back so element n lands on bit n again.

/// Number of bits read from the `portPoE` value.
pub const POE_MASK_WIDTH: usize = 4;

/// Unpack the low [`POE_MASK_WIDTH`] bits, port 0 first.
pub fn int_to_bool_list(num: u32) -> Vec<bool> {
    (0..POE_MASK_WIDTH).map(|n| num & (1 << n) != 0).collect()
}

/// Pack a per-port list into an integer, element 0 as the lowest bit.
///
/// Lists longer than 32 entries keep only the first 32.
pub fn bool_list_to_int(bools: &[bool]) -> u32 {
    bools
        .iter()
        .take(32)
        .rev()
        .fold(0, |acc, &on| (acc << 1) | u32::from(on))
}
