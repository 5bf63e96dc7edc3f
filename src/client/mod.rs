//! API client façade: the entry point UI layers talk to.
//!
//! ```text
//! query() ──→ Subscribe ──→ FetchRequested ──→ spawn fetch task
//!                                                   │
//!        QueryHandle ←── store change ←── FetchSucceeded / FetchFailed
//! ```

mod error;
mod handle;

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tokio::time::Instant;

use crate::api::endpoints::Login;
use crate::api::{
    ApiError, ApiRequest, Endpoint, EndpointKind, EndpointRegistry, InjectOptions, LoginRequest,
    RegistryError, Tag,
};
use crate::auth::{AuthIntent, AuthUser};
use crate::cache::{CacheIntent, CacheKey, RequestId};
use crate::config::{CacheConfig, Config};
use crate::store::{DebugMirror, RootState, Store};
use crate::transport::{HttpTransport, Transport};

pub use error::ClientError;
pub use handle::{QueryHandle, QueryResult};

type Decoder = Arc<dyn Fn(Value) -> Result<(Value, Vec<Tag>), ApiError> + Send + Sync>;

/// How to (re)issue the request behind one cache key.
#[derive(Clone)]
struct FetchPlan {
    request: ApiRequest,
    decode: Decoder,
}

impl FetchPlan {
    fn of<E: Endpoint>(args: E::Args) -> Self {
        let request = E::request(&args);
        let decode: Decoder = Arc::new(move |raw: Value| {
            let output: E::Output = serde_json::from_value(raw.clone()).map_err(|e| {
                ApiError::validation(format!("Unexpected '{}' response: {}", E::NAME, e))
            })?;
            let tags = E::provides_tags(&args, &output);
            Ok((raw, tags))
        });
        Self { request, decode }
    }
}

/// Fetch plan shared by the live handles of one key.
struct PlanSlot {
    plan: FetchPlan,
    handles: usize,
}

/// Typed client for the EV-charging backend with a shared query cache.
///
/// Cheap to clone; clones share the store, registry and transport.
#[derive(Clone)]
pub struct EvChargingApi {
    inner: Arc<ApiInner>,
}

struct ApiInner {
    store: Store,
    registry: RwLock<EndpointRegistry>,
    transport: Arc<dyn Transport>,
    cache: CacheConfig,
    plans: Mutex<HashMap<CacheKey, PlanSlot>>,
    next_request: AtomicU64,
    mirror: Option<DebugMirror>,
}

impl EvChargingApi {
    /// Build a client over an explicit transport.
    pub fn new(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let store = Store::new(config.cache.keep_unused_for());
        let mirror = config.store.debug_mirror.then(|| {
            let mirror = DebugMirror::new();
            store.subscribe(Arc::new(mirror.clone()));
            mirror
        });

        Self {
            inner: Arc::new(ApiInner {
                store,
                registry: RwLock::new(EndpointRegistry::with_defaults()),
                transport,
                cache: config.cache.clone(),
                plans: Mutex::new(HashMap::new()),
                next_request: AtomicU64::new(1),
                mirror,
            }),
        }
    }

    /// Build a client talking HTTP to `config.api.base_url`.
    pub fn connect(config: &Config) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config.api)
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn state(&self) -> Arc<RootState> {
        self.inner.store.state()
    }

    /// Debug mirror, present when `store.debug_mirror` is enabled.
    pub fn debug_mirror(&self) -> Option<&DebugMirror> {
        self.inner.mirror.as_ref()
    }

    /// Snapshot of the endpoint registry.
    pub fn registry(&self) -> EndpointRegistry {
        self.inner.registry.read().clone()
    }

    /// Register an additional endpoint.
    pub fn inject<E: Endpoint>(&self) -> Result<(), RegistryError> {
        self.inner.registry.write().inject::<E>()
    }

    pub fn inject_with<E: Endpoint>(&self, options: InjectOptions) -> Result<(), RegistryError> {
        self.inner.registry.write().inject_with::<E>(options)
    }

    fn ensure<E: Endpoint>(&self, expected: EndpointKind) -> Result<(), ClientError> {
        let kind = self.inner.registry.read().ensure::<E>()?;
        if kind != expected {
            return Err(ClientError::WrongKind {
                endpoint: E::NAME,
                expected,
                actual: kind,
            });
        }
        Ok(())
    }

    /// Subscribe to a query.
    ///
    /// Returns immediately. A fetch starts when the entry is uninitialized,
    /// errored, invalidated or stale and no request is already in flight;
    /// concurrent subscribers share that request.
    pub fn query<E: Endpoint>(&self, args: E::Args) -> Result<QueryHandle<E>, ClientError> {
        self.ensure::<E>(EndpointKind::Query)?;
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(ClientError::NoRuntime);
        }

        let key = CacheKey::new(E::NAME, &args).map_err(|e| ClientError::InvalidArgs {
            endpoint: E::NAME,
            message: e.to_string(),
        })?;

        self.inner
            .plans
            .lock()
            .entry(key.clone())
            .or_insert_with(|| PlanSlot {
                plan: FetchPlan::of::<E>(args),
                handles: 0,
            })
            .handles += 1;
        self.inner.store.dispatch(CacheIntent::Subscribe {
            key: key.clone(),
            now: Instant::now(),
        });
        self.start_fetch(&key, false);

        Ok(QueryHandle {
            api: self.clone(),
            key,
            _endpoint: PhantomData,
        })
    }

    /// Force a new request for `args`, superseding any in-flight one.
    ///
    /// Returns `false` without sending anything when no live handle holds
    /// that key or its entry is gone (e.g. after `reset_api_state`).
    pub fn refetch<E: Endpoint>(&self, args: &E::Args) -> Result<bool, ClientError> {
        self.ensure::<E>(EndpointKind::Query)?;
        let key = CacheKey::new(E::NAME, args).map_err(|e| ClientError::InvalidArgs {
            endpoint: E::NAME,
            message: e.to_string(),
        })?;
        Ok(self.start_fetch(&key, true))
    }

    /// Run a mutation. Results are not cached; on success the tags the
    /// mutation declares are invalidated and subscribed entries refetched.
    pub async fn mutate<E: Endpoint>(&self, args: E::Args) -> Result<E::Output, ClientError> {
        self.ensure::<E>(EndpointKind::Mutation)?;

        let token = self.token();
        let raw = self
            .inner
            .transport
            .execute(E::request(&args), token)
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = E::NAME, kind = e.kind(), error = %e, "Mutation failed");
                e
            })?;

        let output: E::Output = serde_json::from_value(raw).map_err(|e| {
            ApiError::validation(format!("Unexpected '{}' response: {}", E::NAME, e))
        })?;

        let tags = E::invalidates_tags(&args);
        if !tags.is_empty() {
            self.invalidate_tags(tags);
        }
        Ok(output)
    }

    /// Log in and move the auth slice to authenticated.
    ///
    /// On failure the auth slice is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, ClientError> {
        let response = self
            .mutate::<Login>(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        let user = response.user.clone();
        self.inner.store.dispatch(AuthIntent::LoginSuccess {
            user: response.user,
            token: response.token,
        });
        tracing::info!(user = %user.id, "Logged in");
        Ok(user)
    }

    pub fn logout(&self) {
        self.inner.store.dispatch(AuthIntent::Logout);
        tracing::info!("Logged out");
    }

    /// Drop every cache entry.
    ///
    /// Live handles report `Uninitialized` and their `refetch` returns
    /// `false`; query again to repopulate.
    pub fn reset_api_state(&self) {
        self.inner.store.dispatch(CacheIntent::Reset);
    }

    /// Mark entries providing `tags` stale and refetch the subscribed ones.
    pub fn invalidate_tags(&self, tags: Vec<Tag>) {
        let state = self.inner.store.dispatch(CacheIntent::InvalidateTags { tags });
        let stale: Vec<CacheKey> = state
            .api
            .entries()
            .filter(|(_, entry)| entry.is_invalidated() && entry.subscriber_count() > 0)
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            self.start_fetch(&key, false);
        }
    }

    fn token(&self) -> Option<String> {
        self.inner
            .store
            .select(|s| s.auth.token().map(str::to_string))
    }

    fn next_request_id(&self) -> RequestId {
        self.inner.next_request.fetch_add(1, Ordering::Relaxed)
    }

    /// Ask the cache to start a request for `key` and run it if granted.
    ///
    /// Returns whether a request was sent.
    fn start_fetch(&self, key: &CacheKey, force: bool) -> bool {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(key = %key, "No tokio runtime, fetch not started");
            return false;
        };
        let Some(plan) = self.inner.plans.lock().get(key).map(|slot| slot.plan.clone()) else {
            return false;
        };

        let request_id = self.next_request_id();
        let state = self.inner.store.dispatch(CacheIntent::FetchRequested {
            key: key.clone(),
            request_id,
            now: Instant::now(),
            refetch_after: self.inner.cache.refetch_after(),
            force,
        });

        let granted = state
            .api
            .entry(key)
            .is_some_and(|e| e.is_fetching() && e.latest_request() == Some(request_id));
        if !granted {
            return false;
        }

        let token = state.auth.token().map(str::to_string);
        let api = self.clone();
        let key = key.clone();

        tracing::debug!(key = %key, request_id, force, "Starting fetch");
        runtime.spawn(async move {
            let result = api
                .inner
                .transport
                .execute(plan.request, token)
                .await
                .and_then(|raw| (plan.decode)(raw));

            match result {
                Ok((data, tags)) => {
                    tracing::debug!(key = %key, request_id, "Fetch succeeded");
                    let state = api.inner.store.dispatch(CacheIntent::FetchSucceeded {
                        key: key.clone(),
                        request_id,
                        data,
                        tags,
                        now: Instant::now(),
                    });
                    let outdated = state.api.entry(&key).is_some_and(|e| {
                        e.is_invalidated() && e.subscriber_count() > 0 && !e.is_fetching()
                    });
                    if outdated {
                        tracing::debug!(key = %key, request_id, "Response predates an invalidation, refetching");
                        api.start_fetch(&key, false);
                    }
                }
                Err(error) => {
                    tracing::warn!(key = %key, request_id, kind = error.kind(), error = %error, "Fetch failed");
                    api.inner.store.dispatch(CacheIntent::FetchFailed {
                        key,
                        request_id,
                        error,
                    });
                }
            }
        });
        true
    }

    /// Drop one subscription to `key` and schedule its eviction.
    fn release(&self, key: &CacheKey) {
        {
            let mut plans = self.inner.plans.lock();
            let orphaned = match plans.get_mut(key) {
                Some(slot) => {
                    slot.handles = slot.handles.saturating_sub(1);
                    slot.handles == 0
                }
                None => false,
            };
            if orphaned {
                plans.remove(key);
            }
        }

        let state = self.inner.store.dispatch(CacheIntent::Unsubscribe {
            key: key.clone(),
            now: Instant::now(),
        });

        let unused = state
            .api
            .entry(key)
            .is_some_and(|e| e.subscriber_count() == 0);
        if !unused {
            return;
        }

        let keep_unused_for = self.inner.cache.keep_unused_for();
        if keep_unused_for.is_zero() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let store = self.inner.store.clone();
        runtime.spawn(async move {
            tokio::time::sleep(keep_unused_for).await;
            store.dispatch(CacheIntent::Sweep {
                now: Instant::now(),
                keep_unused_for,
            });
        });
    }
}
