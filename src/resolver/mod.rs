//! Caching façade over the provider chain
//!
//! The resolver is the entry point for callers. It normalizes hostnames,
//! remembers the outcome for each hostname, and makes sure concurrent callers
//! asking for the same hostname share one chain evaluation.

use crate::auth::{hostname, AuthConfig, ProviderChain};
use crate::config::ResolverConfig;
use crate::error::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

type Evaluation = Shared<BoxFuture<'static, Result<Option<AuthConfig>>>>;

#[derive(Clone)]
enum Entry {
    /// Settled outcome, including "no credentials"
    Resolved(Option<AuthConfig>),
    /// Chain evaluation every caller for this key awaits
    InFlight { id: usize, evaluation: Evaluation },
}

pub struct Resolver {
    chain: Arc<ProviderChain>,
    cache: Mutex<HashMap<String, Entry>>,
    evaluations: AtomicUsize,
}

impl Resolver {
    pub fn new(chain: ProviderChain) -> Self {
        Self {
            chain: Arc::new(chain),
            cache: Mutex::new(HashMap::new()),
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Resolver over the default provider chain
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(ProviderChain::from_config(config))
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    /// Resolve credentials for a registry or daemon hostname
    ///
    /// `Ok(None)` means no source has credentials and the caller should
    /// proceed unauthenticated. Callers that arrive while an evaluation for
    /// the same hostname is running get its result, error included. Errors
    /// are not cached; a later call starts a new evaluation.
    pub async fn resolve(&self, hostname: &str) -> Result<Option<AuthConfig>> {
        let key = hostname::normalize(hostname);
        if key.is_empty() {
            debug!("Empty hostname, nothing to resolve");
            return Ok(None);
        }

        let (id, evaluation) = match self.entry(&key) {
            Entry::Resolved(auth) => {
                trace!("Cache hit for {}", key);
                return Ok(auth);
            }
            Entry::InFlight { id, evaluation } => (id, evaluation),
        };

        let outcome = evaluation.await;
        self.settle(&key, id, &outcome);
        outcome
    }

    /// Resolve credentials for the registry of an image reference
    pub async fn resolve_image(&self, image_ref: &str) -> Result<Option<AuthConfig>> {
        let registry = hostname::extract_registry(image_ref);
        debug!("Resolving auth for image: {} (registry: {})", image_ref, registry);
        self.resolve(registry).await
    }

    /// Number of provider chain evaluations started so far
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    /// Number of hostnames with a cached outcome
    pub fn cached_hosts(&self) -> usize {
        self.cache
            .lock()
            .values()
            .filter(|entry| matches!(entry, Entry::Resolved(_)))
            .count()
    }

    /// The entry for `key`, starting an evaluation when there is none.
    /// The lock covers only the map access, never the evaluation itself.
    fn entry(&self, key: &str) -> Entry {
        let mut cache = self.cache.lock();
        if let Some(entry) = cache.get(key) {
            return entry.clone();
        }

        let id = self.evaluations.fetch_add(1, Ordering::SeqCst);
        let chain = Arc::clone(&self.chain);
        let host = key.to_string();
        let evaluation = async move {
            debug!("Resolving credentials for {}", host);
            chain.resolve(&host).await
        }
        .boxed()
        .shared();

        let entry = Entry::InFlight { id, evaluation };
        cache.insert(key.to_string(), entry.clone());
        entry
    }

    /// Record the outcome of evaluation `id`, unless another caller already did
    fn settle(&self, key: &str, id: usize, outcome: &Result<Option<AuthConfig>>) {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(Entry::InFlight { id: current, .. }) if *current == id => {}
            _ => return,
        }

        match outcome {
            Ok(auth) => {
                cache.insert(key.to_string(), Entry::Resolved(auth.clone()));
            }
            Err(e) => {
                debug!("Not caching failed resolution for {}: {}", key, e);
                cache.remove(key);
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("chain", &*self.chain)
            .field("evaluations", &self.evaluations())
            .finish_non_exhaustive()
    }
}
