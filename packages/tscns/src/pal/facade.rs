use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::{FakePlatform, MockPlatform};
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};

/// Switches between the real platform and test doubles without making every public type generic.
///
/// In non-test builds there is only one variant, so the dispatch compiles away.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Real(&'static BuildTargetPlatform),

    #[cfg(test)]
    Fake(FakePlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&BUILD_TARGET_PLATFORM)
    }
}

impl Platform for PlatformFacade {
    #[inline]
    fn tick_now(&self) -> i64 {
        match self {
            Self::Real(p) => p.tick_now(),
            #[cfg(test)]
            Self::Fake(p) => p.tick_now(),
            #[cfg(test)]
            Self::Mock(p) => p.tick_now(),
        }
    }

    #[inline]
    fn wall_ns_now(&self) -> i64 {
        match self {
            Self::Real(p) => p.wall_ns_now(),
            #[cfg(test)]
            Self::Fake(p) => p.wall_ns_now(),
            #[cfg(test)]
            Self::Mock(p) => p.wall_ns_now(),
        }
    }

    fn yield_now(&self) {
        match self {
            Self::Real(p) => p.yield_now(),
            #[cfg(test)]
            Self::Fake(p) => p.yield_now(),
            #[cfg(test)]
            Self::Mock(p) => p.yield_now(),
        }
    }
}

impl From<&'static BuildTargetPlatform> for PlatformFacade {
    fn from(p: &'static BuildTargetPlatform) -> Self {
        Self::Real(p)
    }
}

#[cfg(test)]
impl From<FakePlatform> for PlatformFacade {
    fn from(p: FakePlatform) -> Self {
        Self::Fake(p)
    }
}

#[cfg(test)]
impl From<MockPlatform> for PlatformFacade {
    fn from(p: MockPlatform) -> Self {
        Self::Mock(Arc::new(p))
    }
}

impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real(p) => p.fmt(f),
            #[cfg(test)]
            Self::Fake(p) => p.fmt(f),
            #[cfg(test)]
            Self::Mock(p) => p.fmt(f),
        }
    }
}
