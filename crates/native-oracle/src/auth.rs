//! Capability tokens for the writer and governance roles.
//!
//! Authority is injected, not ambient: [`crate::NativeOracle::new`] mints
//! one relayer token and one governance token, each bound to that instance.
//! Whoever holds a token holds the role; tokens cannot be cloned or
//! constructed outside this crate, and a token minted by one instance is
//! rejected by every other.

use std::fmt;

/// Identity of one oracle instance, used to bind tokens to it.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct InstanceId(u64);

impl InstanceId {
    pub(crate) fn generate() -> Self {
        Self(rand::random())
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({:016x})", self.0)
    }
}

/// The privileged writer capability: required for `record`/`record_batch`.
#[derive(Debug)]
pub struct RelayerToken {
    instance: InstanceId,
}

/// The governance capability: required to mutate callback bindings.
#[derive(Debug)]
pub struct GovernanceToken {
    instance: InstanceId,
}

impl RelayerToken {
    pub(crate) fn issue(instance: InstanceId) -> Self {
        Self { instance }
    }

    pub(crate) fn instance(&self) -> InstanceId {
        self.instance
    }
}

impl GovernanceToken {
    pub(crate) fn issue(instance: InstanceId) -> Self {
        Self { instance }
    }

    pub(crate) fn instance(&self) -> InstanceId {
        self.instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instances_are_distinct() {
        // Collisions over a u64 are possible in principle; over a handful of
        // draws they indicate a broken RNG.
        let a = InstanceId::generate();
        let b = InstanceId::generate();
        let c = InstanceId::generate();
        assert!(a != b || b != c);
    }

    #[test]
    fn test_tokens_carry_their_instance() {
        let instance = InstanceId::generate();
        let relayer = RelayerToken::issue(instance);
        let governance = GovernanceToken::issue(instance);
        assert_eq!(relayer.instance(), instance);
        assert_eq!(governance.instance(), instance);
    }
}
