use core::fmt;

/// A packed (template id, observation domain id) pair.
///
/// ## Layout
/// ```text
///  63        48 47        32 31                         0
/// +------------+------------+----------------------------+
/// |  reserved  | template id|   observation domain id    |
/// +------------+------------+----------------------------+
/// ```
/// The two fields occupy disjoint bit ranges, so packing is injective over
/// the full domain of both. The reserved bits are always zero.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct CompositeKey(u64);

static_assertions::assert_eq_size!(CompositeKey, u64);
static_assertions::assert_impl_all!(CompositeKey: Copy, Send, Sync, core::hash::Hash);

const DOMAIN_MASK: u64 = 0xFFFF_FFFF;
const TEMPLATE_SHIFT: u32 = 32;

impl CompositeKey {
    /// Packs a template id and observation domain id into one key.
    #[inline(always)]
    pub const fn new(template_id: u16, observation_domain_id: u32) -> Self {
        Self(((template_id as u64) << TEMPLATE_SHIFT) | observation_domain_id as u64)
    }

    #[inline(always)]
    pub const fn template_id(self) -> u16 {
        (self.0 >> TEMPLATE_SHIFT) as u16
    }

    #[inline(always)]
    pub const fn observation_domain_id(self) -> u32 {
        (self.0 & DOMAIN_MASK) as u32
    }

    /// Raw packed value.
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<(u16, u32)> for CompositeKey {
    fn from((template_id, observation_domain_id): (u16, u32)) -> Self {
        Self::new(template_id, observation_domain_id)
    }
}

impl From<CompositeKey> for u64 {
    fn from(key: CompositeKey) -> Self {
        key.0
    }
}

impl fmt::Debug for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeKey")
            .field("template_id", &self.template_id())
            .field("observation_domain_id", &self.observation_domain_id())
            .finish()
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.template_id(), self.observation_domain_id())
    }
}

#[cfg(kani)]
mod proofs {
    use super::*;

    #[kani::proof]
    fn prove_packing_is_injective() {
        let (a, b): (u16, u32) = (kani::any(), kani::any());
        let (c, d): (u16, u32) = (kani::any(), kani::any());

        let same_key = CompositeKey::new(a, b) == CompositeKey::new(c, d);
        assert_eq!(same_key, a == c && b == d);
    }

    #[kani::proof]
    fn prove_unpack_inverts_pack() {
        let tid: u16 = kani::any();
        let oid: u32 = kani::any();
        let key = CompositeKey::new(tid, oid);

        assert_eq!(key.template_id(), tid);
        assert_eq!(key.observation_domain_id(), oid);
        assert_eq!(key.as_u64() >> 48, 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_template_id_above_domain() {
        let key = CompositeKey::new(0x0102, 0x0304_0506);
        assert_eq!(key.as_u64(), 0x0000_0102_0304_0506);
    }

    #[test]
    fn extremes_do_not_wrap() {
        let key = CompositeKey::new(u16::MAX, u32::MAX);
        assert_eq!(key.as_u64(), 0x0000_FFFF_FFFF_FFFF);
        assert_eq!(key.template_id(), u16::MAX);
        assert_eq!(key.observation_domain_id(), u32::MAX);

        assert_ne!(CompositeKey::new(1, 0), CompositeKey::new(0, u32::MAX));
    }
}
