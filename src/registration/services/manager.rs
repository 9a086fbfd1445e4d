//! Provider registration state machine with bounded retries.

use crate::registration::{
    domain::{
        RegistrationError, RegistrationOutcome, RegistrationRecord, RegistrationState,
        RetryPolicy,
    },
    ports::{DiscoveryClient, DiscoveryError, IdentityStore},
};
use crate::service_registry::domain::{HealthReport, ServiceTarget, TargetId};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, sleep, timeout};
use tracing::{Level, debug, info, warn};

const MIN_HEARTBEAT: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct Snapshot {
    target: ServiceTarget,
    state: RegistrationState,
}

/// Owns one provider's registration with the router.
///
/// `register` is serialized by a lock acquired with a short timeout: a
/// heartbeat and an explicit call never race to register twice, and a
/// caller that cannot get the lock returns instead of queueing. Ping,
/// deregistration and health updates are unguarded.
pub struct RegistrationManager<D, S>
where
    D: DiscoveryClient,
    S: IdentityStore,
{
    discovery: Arc<D>,
    identity: Arc<S>,
    policy: RetryPolicy,
    service_name: String,
    snapshot: Mutex<Snapshot>,
    registration_lock: AsyncMutex<()>,
}

impl<D, S> RegistrationManager<D, S>
where
    D: DiscoveryClient,
    S: IdentityStore,
{
    /// Creates a manager for `target`, keyed by its capability type.
    ///
    /// A previously persisted identifier is applied to the target. Without
    /// one, the identity location is prepared for the record written after
    /// the first successful registration. An unreadable record is logged and
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::IdentityLocation`] when the identity
    /// location cannot be prepared.
    pub fn new(
        discovery: Arc<D>,
        identity: Arc<S>,
        mut target: ServiceTarget,
        policy: RetryPolicy,
    ) -> Result<Self, RegistrationError> {
        let service_name = target.capability_type().to_string();
        match identity.load(&service_name) {
            Ok(Some(record)) => {
                info!(
                    service = %service_name,
                    target_id = %record.assigned_id(),
                    "reusing persisted registration id"
                );
                target.assign_id(record.assigned_id().clone());
            }
            Ok(None) => identity
                .prepare()
                .map_err(RegistrationError::IdentityLocation)?,
            Err(err) => {
                warn!(
                    service = %service_name,
                    error = %err,
                    "ignoring unreadable registration record"
                );
                identity
                    .prepare()
                    .map_err(RegistrationError::IdentityLocation)?;
            }
        }
        Ok(Self {
            discovery,
            identity,
            policy,
            service_name,
            snapshot: Mutex::new(Snapshot {
                target,
                state: RegistrationState::Unregistered,
            }),
            registration_lock: AsyncMutex::new(()),
        })
    }

    fn lock_snapshot(&self) -> std::sync::MutexGuard<'_, Snapshot> {
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: RegistrationState) {
        self.lock_snapshot().state = state;
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RegistrationState {
        self.lock_snapshot().state
    }

    /// Returns the target as last accepted by the router.
    #[must_use]
    pub fn target(&self) -> ServiceTarget {
        self.lock_snapshot().target.clone()
    }

    /// Returns the assigned identifier, if any.
    #[must_use]
    pub fn assigned_id(&self) -> Option<TargetId> {
        self.lock_snapshot().target.id().cloned()
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Registers with the router, or pings when already registered.
    ///
    /// Makes up to the policy's attempt budget, pausing between attempts.
    /// Never fails: exhaustion leaves the state `Unregistered` for the next
    /// call to retry.
    pub async fn register(&self) -> RegistrationOutcome {
        if self.state() == RegistrationState::Registered {
            self.ping().await;
            return RegistrationOutcome::AlreadyRegistered;
        }

        let Ok(_guard) = timeout(self.policy.lock_timeout(), self.registration_lock.lock()).await
        else {
            warn!(service = %self.service_name, "registration already in progress; skipping");
            return RegistrationOutcome::LockUnavailable;
        };
        if self.state() == RegistrationState::Registered {
            return RegistrationOutcome::AlreadyRegistered;
        }

        let attempts = self.policy.max_attempts();
        for attempt in 1..=attempts {
            self.set_state(RegistrationState::Registering);
            match self.attempt().await {
                Ok(registered) => {
                    self.complete(registered);
                    return RegistrationOutcome::Registered;
                }
                Err(err) => {
                    self.log_failure("registration attempt failed", Some(attempt), &err);
                    if attempt < attempts {
                        self.set_state(RegistrationState::FailedPendingRetry);
                        sleep(self.policy.wait()).await;
                    }
                }
            }
        }

        self.set_state(RegistrationState::Unregistered);
        warn!(
            service = %self.service_name,
            attempts,
            "registration retries exhausted; waiting for the next scheduled attempt"
        );
        RegistrationOutcome::Exhausted { attempts }
    }

    async fn attempt(&self) -> Result<ServiceTarget, DiscoveryError> {
        let target = self.target();
        let registered = self.discovery.register(&target).await?;
        if registered.id().is_none() {
            return Err(DiscoveryError::MalformedResponse(
                "registration response carried no target id".to_owned(),
            ));
        }
        Ok(registered)
    }

    fn complete(&self, registered: ServiceTarget) {
        let previous_id = {
            let mut snapshot = self.lock_snapshot();
            let previous = snapshot.target.id().cloned();
            snapshot.target = registered.clone();
            snapshot.state = RegistrationState::Registered;
            previous
        };
        let Some(assigned) = registered.id() else {
            return;
        };
        if previous_id.as_ref() != Some(assigned) {
            let record = RegistrationRecord::new(self.service_name.clone(), assigned.clone());
            if let Err(err) = self.identity.save(&record) {
                warn!(
                    service = %self.service_name,
                    error = %err,
                    "failed to persist registration id; a restart will register afresh"
                );
            }
        }
        info!(
            service = %self.service_name,
            target_id = %assigned,
            address = %registered.address(),
            "registered with router"
        );
    }

    /// Reports liveness; skipped until an identifier is assigned.
    pub async fn ping(&self) {
        let Some(id) = self.assigned_id() else {
            debug!(service = %self.service_name, "skipping ping: no registration id assigned");
            return;
        };
        if let Err(err) = self.discovery.ping(&id).await {
            self.log_failure("router ping failed", None, &err);
        }
    }

    /// Removes the registration from the router, best effort.
    ///
    /// Failures are logged and not retried.
    pub async fn deregister(&self) {
        if self.assigned_id().is_none() {
            debug!(
                service = %self.service_name,
                "skipping deregistration: no registration id assigned"
            );
            return;
        }
        let target = self.target();
        match self.discovery.deregister(&target).await {
            Ok(()) => {
                self.set_state(RegistrationState::Unregistered);
                info!(service = %self.service_name, "deregistered from router");
            }
            Err(err) => self.log_failure("router deregistration failed", None, &err),
        }
    }

    /// Reports the last operation as failed.
    pub async fn last_as_fail(&self, reason: &str) {
        self.report(HealthReport::unhealthy(reason)).await;
    }

    /// Reports the last operation as successful.
    pub async fn last_as_successful(&self) {
        self.report(HealthReport::healthy()).await;
    }

    async fn report(&self, report: HealthReport) {
        let Some(id) = self.assigned_id() else {
            warn!(
                service = %self.service_name,
                "cannot report health: no registration id assigned"
            );
            return;
        };
        if let Err(err) = self.discovery.update_state(&id, &report).await {
            self.log_failure("health update failed", None, &err);
        }
    }

    fn log_failure(&self, message: &str, attempt: Option<u32>, err: &DiscoveryError) {
        if tracing::enabled!(Level::DEBUG) {
            warn!(service = %self.service_name, attempt, error = ?err, "{message}");
        } else {
            warn!(service = %self.service_name, attempt, error = %err, "{message}");
        }
    }
}

impl<D, S> RegistrationManager<D, S>
where
    D: DiscoveryClient + 'static,
    S: IdentityStore + 'static,
{
    /// Calls `register` every `interval` on a background task, which
    /// registers while unregistered and pings once registered.
    ///
    /// The first call happens immediately. Abort the returned handle to
    /// stop.
    pub fn spawn_heartbeat(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(MIN_HEARTBEAT));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let outcome = manager.register().await;
                debug!(service = %manager.service_name, ?outcome, "heartbeat");
            }
        })
    }
}
