use uuid::Uuid;

/// Maps opaque visitor tokens onto the fixed profile pool
///
/// The mapping is `(token mod profile_count) + id_start` over the full
/// 128-bit token value, so it is stable across requests and restarts for as
/// long as the pool configuration stays fixed. `profile_count` is clamped to
/// at least 1.
#[derive(Debug, Clone, Copy)]
pub struct IdentityResolver {
    profile_count: u32,
    id_start: u32,
}

impl IdentityResolver {
    pub fn new(profile_count: u32, id_start: u32) -> Self {
        Self {
            profile_count: profile_count.max(1),
            id_start,
        }
    }

    /// Resolves a visitor token to a profile id in `[id_start, id_start + profile_count)`
    pub fn resolve(&self, token: Uuid) -> u32 {
        (token.as_u128() % u128::from(self.profile_count)) as u32 + self.id_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = IdentityResolver::new(50, 101);
        let token = Uuid::new_v4();
        assert_eq!(resolver.resolve(token), resolver.resolve(token));
    }

    #[test]
    fn test_resolve_stays_in_pool_range() {
        let resolver = IdentityResolver::new(50, 101);
        for _ in 0..1000 {
            let profile_id = resolver.resolve(Uuid::new_v4());
            assert!((101..151).contains(&profile_id));
        }
    }

    #[test]
    fn test_resolve_uses_full_token_width() {
        let resolver = IdentityResolver::new(50, 101);

        // Tokens identical in their low 64 bits must still map differently
        // when the high bits differ; 2^64 mod 50 = 16.
        let low_only = Uuid::from_u128(0);
        let high_only = Uuid::from_u128(1u128 << 64);
        assert_eq!(resolver.resolve(low_only), 101);
        assert_eq!(resolver.resolve(high_only), 117);
    }

    #[test]
    fn test_resolve_applies_id_start_offset() {
        let resolver = IdentityResolver::new(10, 500);
        assert_eq!(resolver.resolve(Uuid::from_u128(13)), 503);
    }

    #[test]
    fn test_zero_profile_count_is_clamped() {
        let resolver = IdentityResolver::new(0, 101);
        assert_eq!(resolver.resolve(Uuid::from_u128(42)), 101);
    }
}
