//! Byte-slice helpers shared by the round layers and the modes of operation.

/// XORs `rhs` into `dst`, byte by byte, over the shorter of the two slices.
#[inline]
pub fn xor_in_place(dst: &mut [u8], rhs: &[u8]) {
    for (d, r) in dst.iter_mut().zip(rhs.iter()) {
        *d ^= *r;
    }
}
