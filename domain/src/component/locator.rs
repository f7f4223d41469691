//! Locators: component name → source location
//!
//! Like tool finders, locators are chained and the first match wins.
//! [`CachingLocator`] wraps any locator and remembers `Stable` answers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use url::Url;

use super::entities::{ComponentLocation, Stability};

/// Maps a component name to where it can be fetched from
pub trait Locator: Send + Sync {
    fn locate(&self, name: &str) -> Option<ComponentLocation>;
}

/// Ordered list of locators; the first that answers wins
#[derive(Clone, Default)]
pub struct LocatorChain {
    locators: Vec<Arc<dyn Locator>>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locator: impl Locator + 'static) -> Self {
        self.locators.push(Arc::new(locator));
        self
    }

    pub fn with_arc(mut self, locator: Arc<dyn Locator>) -> Self {
        self.locators.push(locator);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl Locator for LocatorChain {
    fn locate(&self, name: &str) -> Option<ComponentLocation> {
        self.locators.iter().find_map(|locator| locator.locate(name))
    }
}

impl fmt::Debug for LocatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocatorChain")
            .field("locators", &self.locators.len())
            .finish()
    }
}

/// Exact name → URI table
#[derive(Debug, Clone, Default)]
pub struct MappedLocator {
    entries: BTreeMap<String, Url>,
    stability: Stability,
}

impl MappedLocator {
    pub fn new(stability: Stability) -> Self {
        Self {
            entries: BTreeMap::new(),
            stability,
        }
    }

    pub fn with(mut self, name: impl Into<String>, uri: Url) -> Self {
        self.entries.insert(name.into(), uri);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Locator for MappedLocator {
    fn locate(&self, name: &str) -> Option<ComponentLocation> {
        self.entries.get(name).map(|uri| {
            ComponentLocation::new(name, uri.clone()).with_stability(self.stability)
        })
    }
}

/// Remembers `Stable` locations; everything else is asked again every time
pub struct CachingLocator {
    inner: Arc<dyn Locator>,
    cache: Mutex<HashMap<String, ComponentLocation>>,
}

impl CachingLocator {
    pub fn new(inner: Arc<dyn Locator>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn cached(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Locator for CachingLocator {
    fn locate(&self, name: &str) -> Option<ComponentLocation> {
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Some(hit.clone());
        }

        let location = self.inner.locate(name)?;
        if location.stability == Stability::Stable {
            self.cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_string(), location.clone());
        }
        Some(location)
    }
}

impl fmt::Debug for CachingLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingLocator")
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    struct Counting {
        calls: AtomicUsize,
        stability: Stability,
    }

    impl Locator for Counting {
        fn locate(&self, name: &str) -> Option<ComponentLocation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(
                ComponentLocation::new(name, url("https://example.org/x.jar"))
                    .with_stability(self.stability),
            )
        }
    }

    #[test]
    fn test_chain_first_match_wins() {
        let chain = LocatorChain::new()
            .with(MappedLocator::new(Stability::Stable).with("a", url("https://one/a.jar")))
            .with(
                MappedLocator::new(Stability::Dynamic)
                    .with("a", url("https://two/a.jar"))
                    .with("b", url("https://two/b.jar")),
            );

        let a = chain.locate("a").unwrap();
        assert_eq!(a.uri.as_str(), "https://one/a.jar");
        assert_eq!(a.stability, Stability::Stable);
        assert_eq!(chain.locate("b").unwrap().stability, Stability::Dynamic);
        assert!(chain.locate("c").is_none());
        assert!(LocatorChain::new().locate("a").is_none());
    }

    #[test]
    fn test_caching_locator_keeps_stable_hits() {
        let inner = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            stability: Stability::Stable,
        });
        let caching = CachingLocator::new(inner.clone());

        caching.locate("a").unwrap();
        caching.locate("a").unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(caching.cached(), 1);
    }

    #[test]
    fn test_caching_locator_rechecks_dynamic() {
        let inner = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            stability: Stability::Dynamic,
        });
        let caching = CachingLocator::new(inner.clone());

        caching.locate("a").unwrap();
        caching.locate("a").unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(caching.cached(), 0);
    }
}
