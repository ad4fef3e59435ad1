//! Resolution Service - Main application use case
//!
//! Races every registered provider for the caller's public IP, keeps the
//! first answer, and resolves it against the offline geo database.

use crate::domain::entities::{Provider, ResolutionResult};
use crate::domain::errors::{AttemptError, ResolveError};
use crate::domain::ports::{GeoResolver, IpProvider};
use crate::domain::services::ServiceRegistry;
use crate::domain::value_objects::ExtractedIp;
use crate::infrastructure::RetryPolicy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::Instrument;

/// Wall-clock bound for a single provider attempt.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// One failed provider attempt, kept for diagnostics only.
#[derive(Debug, Clone)]
pub(crate) struct AttemptFailure {
    pub(crate) provider: String,
    pub(crate) error: AttemptError,
}

/// How a single race cycle ended.
#[derive(Debug, Clone)]
pub(crate) enum RaceOutcome {
    /// The first attempt to complete successfully
    Succeeded { provider: Provider, ip: ExtractedIp },
    /// Every attempt failed
    AllFailed { failures: Vec<AttemptFailure> },
}

/// Resolution service - main application use case.
///
/// This service orchestrates the lookup:
/// 1. Shuffles the provider catalog
/// 2. Queries all providers concurrently, first success wins
/// 3. Re-runs the whole race on total failure, per the retry policy
/// 4. Resolves the winning IP to a geo record
pub struct ResolutionService {
    registry: Arc<ServiceRegistry>,
    ip_provider: Arc<dyn IpProvider>,
    geo_resolver: Arc<dyn GeoResolver>,
    attempt_timeout: Duration,
    retry: RetryPolicy,
}

impl ResolutionService {
    /// Create a new resolution service with the default timeout and retry policy.
    pub fn new(
        registry: Arc<ServiceRegistry>,
        ip_provider: Arc<dyn IpProvider>,
        geo_resolver: Arc<dyn GeoResolver>,
    ) -> Self {
        Self {
            registry,
            ip_provider,
            geo_resolver,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Resolve the current public IP and geo-locate it.
    ///
    /// Shuffles with a freshly seeded random source on every call.
    pub async fn resolve(&self) -> Result<ResolutionResult, ResolveError> {
        let mut rng = StdRng::from_entropy();
        self.resolve_with_rng(&mut rng).await
    }

    /// Resolve using an explicit random source for the provider order.
    ///
    /// # Errors
    /// * `AllProvidersUnavailable` - every attempt of every cycle failed
    /// * `GeoNotFound` - an IP was resolved but has no database entry;
    ///   the race is not repeated since the address itself is the problem
    pub async fn resolve_with_rng<R>(&self, rng: &mut R) -> Result<ResolutionResult, ResolveError>
    where
        R: Rng + Send + ?Sized,
    {
        let mut attempts = 0;
        let mut cycle = 0;

        loop {
            cycle += 1;
            let providers = self.registry.randomized_list(rng);

            match self.race(providers).await {
                RaceOutcome::Succeeded { provider, ip } => {
                    tracing::info!("public IP {} resolved via {} (cycle {})", ip, provider.name, cycle);

                    let geo = self.geo_resolver.resolve(&ip).ok_or_else(|| {
                        tracing::warn!("no geo record for {}", ip);
                        ResolveError::GeoNotFound { ip: ip.to_string() }
                    })?;

                    let proxy = self.ip_provider.proxy().map(str::to_string);
                    return Ok(ResolutionResult::new(geo, &provider, proxy, cycle));
                }
                RaceOutcome::AllFailed { failures } => {
                    attempts += failures.len();
                    for failure in &failures {
                        tracing::debug!("attempt against {} failed: {}", failure.provider, failure.error);
                    }

                    if !self.retry.should_retry(cycle) {
                        return Err(ResolveError::AllProvidersUnavailable { attempts });
                    }

                    tracing::warn!(
                        "all {} providers failed in cycle {}, retrying in {:?}",
                        failures.len(),
                        cycle,
                        self.retry.delay
                    );
                    tokio::time::sleep(self.retry.delay).await;
                }
            }
        }
    }

    /// Query all `providers` concurrently and return the first success.
    ///
    /// Completion order decides the winner, not list order. Remaining
    /// attempts are aborted as soon as one succeeds.
    pub(crate) async fn race(&self, providers: Vec<Provider>) -> RaceOutcome {
        let mut tasks = JoinSet::new();

        for provider in providers {
            let ip_provider = Arc::clone(&self.ip_provider);
            let timeout = self.attempt_timeout;
            let span = tracing::debug_span!("fetch_ip", service = %provider.name);

            tasks.spawn(
                async move {
                    tracing::debug!("querying {}", provider.url);
                    let result = match tokio::time::timeout(timeout, ip_provider.attempt(&provider)).await {
                        Ok(result) => result,
                        Err(_) => Err(AttemptError::Timeout(timeout)),
                    };
                    (provider, result)
                }
                .instrument(span),
            );
        }

        let mut failures = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((provider, Ok(ip))) => {
                    tasks.abort_all();
                    return RaceOutcome::Succeeded { provider, ip };
                }
                Ok((provider, Err(error))) => {
                    failures.push(AttemptFailure {
                        provider: provider.name,
                        error,
                    });
                }
                Err(e) => {
                    tracing::debug!("attempt task did not complete: {}", e);
                    failures.push(AttemptFailure {
                        provider: String::from("<unknown>"),
                        error: AttemptError::Transport(e.to_string()),
                    });
                }
            }
        }

        RaceOutcome::AllFailed { failures }
    }
}
