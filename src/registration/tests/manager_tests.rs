//! Tests for the registration state machine.

use crate::registration::{
    adapters::{InMemoryIdentityStore, LocalDiscoveryClient},
    domain::{RegistrationOutcome, RegistrationRecord, RegistrationState, RetryPolicy},
    ports::{
        DiscoveryError, IdentityStore, IdentityStoreError, MockDiscoveryClient, MockIdentityStore,
    },
    services::RegistrationManager,
};
use crate::service_registry::{
    adapters::memory::InMemoryServiceRegistry,
    domain::{CapabilityType, ServiceAddress, ServiceCategory, ServiceTarget, TargetId},
    services::TargetRegistryService,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

const WAIT: Duration = Duration::from_secs(5);

#[fixture]
fn target() -> ServiceTarget {
    ServiceTarget::new(
        CapabilityType::new("s3").expect("valid type"),
        ServiceAddress::parse("10.0.0.5:9000").expect("valid address"),
        ServiceCategory::ResourceProvider,
    )
}

fn unavailable() -> DiscoveryError {
    DiscoveryError::Status {
        status: 503,
        message: "router starting".to_owned(),
    }
}

fn assigned(target: &ServiceTarget, id: &str) -> ServiceTarget {
    target.clone().with_id(TargetId::new(id).expect("valid id"))
}

fn manager(
    discovery: MockDiscoveryClient,
    identity: InMemoryIdentityStore,
    target: ServiceTarget,
    attempts: u32,
) -> RegistrationManager<MockDiscoveryClient, InMemoryIdentityStore> {
    RegistrationManager::new(
        Arc::new(discovery),
        Arc::new(identity),
        target,
        RetryPolicy::new(attempts, WAIT),
    )
    .expect("manager should build")
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn first_registration_persists_assigned_id(target: ServiceTarget) {
    let mut discovery = MockDiscoveryClient::new();
    discovery
        .expect_register()
        .times(1)
        .returning(|sent| Ok(assigned(sent, "xyz")));
    let identity = InMemoryIdentityStore::new();
    let manager = manager(discovery, identity.clone(), target, 3);

    let outcome = manager.register().await;

    assert_eq!(outcome, RegistrationOutcome::Registered);
    assert_eq!(manager.state(), RegistrationState::Registered);
    let record = identity
        .load("s3")
        .expect("load should succeed")
        .expect("record should be saved");
    assert_eq!(record.assigned_id().as_str(), "xyz");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn persisted_id_is_sent_on_restart(target: ServiceTarget) {
    let mut discovery = MockDiscoveryClient::new();
    discovery
        .expect_register()
        .withf(|sent| sent.id().map(TargetId::as_str) == Some("abc"))
        .times(1)
        .returning(|sent| Ok(sent.clone()));
    let mut identity = MockIdentityStore::new();
    identity.expect_load().returning(|_| {
        Ok(Some(RegistrationRecord::new(
            "s3",
            TargetId::new("abc").expect("valid id"),
        )))
    });
    identity.expect_prepare().times(0);
    identity.expect_save().times(0);
    let manager = RegistrationManager::new(
        Arc::new(discovery),
        Arc::new(identity),
        target,
        RetryPolicy::new(3, WAIT),
    )
    .expect("manager should build");

    assert_eq!(manager.assigned_id().map(|id| id.to_string()), Some("abc".to_owned()));
    assert_eq!(manager.register().await, RegistrationOutcome::Registered);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn retries_are_bounded_and_spaced(target: ServiceTarget) {
    let calls = Arc::new(std::sync::Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);
    let mut discovery = MockDiscoveryClient::new();
    discovery.expect_register().times(3).returning(move |_| {
        recorded
            .lock()
            .expect("call log lock")
            .push(Instant::now());
        Err(unavailable())
    });
    let manager = manager(discovery, InMemoryIdentityStore::new(), target, 3);

    let outcome = manager.register().await;

    assert_eq!(outcome, RegistrationOutcome::Exhausted { attempts: 3 });
    assert_eq!(manager.state(), RegistrationState::Unregistered);
    let calls = calls.lock().expect("call log lock");
    assert_eq!(calls.len(), 3);
    for pair in calls.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= WAIT);
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn recovers_on_a_later_attempt(target: ServiceTarget) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let mut discovery = MockDiscoveryClient::new();
    discovery.expect_register().times(2).returning(move |sent| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(unavailable())
        } else {
            Ok(assigned(sent, "xyz"))
        }
    });
    let manager = manager(discovery, InMemoryIdentityStore::new(), target, 3);

    assert_eq!(manager.register().await, RegistrationOutcome::Registered);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn response_without_id_counts_as_failure(target: ServiceTarget) {
    let mut discovery = MockDiscoveryClient::new();
    discovery
        .expect_register()
        .times(2)
        .returning(|sent| Ok(sent.clone()));
    let manager = manager(discovery, InMemoryIdentityStore::new(), target, 2);

    assert_eq!(
        manager.register().await,
        RegistrationOutcome::Exhausted { attempts: 2 }
    );
    assert!(manager.assigned_id().is_none());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn registered_manager_pings_instead(target: ServiceTarget) {
    let mut discovery = MockDiscoveryClient::new();
    discovery
        .expect_register()
        .times(1)
        .returning(|sent| Ok(assigned(sent, "xyz")));
    discovery
        .expect_ping()
        .withf(|id| id.as_str() == "xyz")
        .times(1)
        .returning(|_| Ok(()));
    let manager = manager(discovery, InMemoryIdentityStore::new(), target, 3);

    assert_eq!(manager.register().await, RegistrationOutcome::Registered);
    assert_eq!(manager.register().await, RegistrationOutcome::AlreadyRegistered);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn concurrent_register_gives_up_on_the_lock(target: ServiceTarget) {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let mut discovery = MockDiscoveryClient::new();
    discovery.expect_register().times(2).returning(move |sent| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(unavailable())
        } else {
            Ok(assigned(sent, "xyz"))
        }
    });
    let manager = manager(discovery, InMemoryIdentityStore::new(), target, 3);

    let (first, second) = tokio::join!(manager.register(), manager.register());

    assert_eq!(first, RegistrationOutcome::Registered);
    assert_eq!(second, RegistrationOutcome::LockUnavailable);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn health_reports_wait_for_an_id(target: ServiceTarget) {
    let manager = manager(MockDiscoveryClient::new(), InMemoryIdentityStore::new(), target, 1);

    manager.last_as_fail("disk full").await;
    manager.last_as_successful().await;
    manager.ping().await;
    manager.deregister().await;

    assert_eq!(manager.state(), RegistrationState::Unregistered);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn health_reports_are_forwarded(target: ServiceTarget) {
    let mut discovery = MockDiscoveryClient::new();
    discovery
        .expect_register()
        .returning(|sent| Ok(assigned(sent, "xyz")));
    discovery
        .expect_update_state()
        .withf(|id, report| id.as_str() == "xyz" && report.reason() == Some("disk full"))
        .times(1)
        .returning(|_, _| Ok(()));
    discovery
        .expect_deregister()
        .times(1)
        .returning(|_| Ok(()));
    let manager = manager(discovery, InMemoryIdentityStore::new(), target, 1);

    manager.register().await;
    manager.last_as_fail("disk full").await;
    manager.deregister().await;

    assert_eq!(manager.state(), RegistrationState::Unregistered);
}

#[rstest]
fn unpreparable_identity_location_is_fatal(target: ServiceTarget) {
    let mut identity = MockIdentityStore::new();
    identity.expect_load().returning(|_| Ok(None));
    identity.expect_prepare().returning(|| {
        Err(IdentityStoreError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    });

    let result = RegistrationManager::new(
        Arc::new(MockDiscoveryClient::new()),
        Arc::new(identity),
        target,
        RetryPolicy::default(),
    );

    assert!(result.is_err());
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn heartbeat_registers_then_pings(target: ServiceTarget) {
    let pings = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&pings);
    let mut discovery = MockDiscoveryClient::new();
    discovery
        .expect_register()
        .times(1)
        .returning(|sent| Ok(assigned(sent, "xyz")));
    discovery.expect_ping().returning(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let manager = Arc::new(manager(discovery, InMemoryIdentityStore::new(), target, 1));

    let heartbeat = manager.spawn_heartbeat(Duration::from_secs(30));
    tokio::time::sleep(Duration::from_secs(65)).await;
    heartbeat.abort();

    assert_eq!(manager.state(), RegistrationState::Registered);
    assert!(pings.load(Ordering::SeqCst) >= 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn local_client_registers_with_an_in_process_router(target: ServiceTarget) {
    let registry = Arc::new(InMemoryServiceRegistry::new());
    let service = Arc::new(TargetRegistryService::new(
        Arc::clone(&registry),
        Arc::new(DefaultClock),
    ));
    let manager = RegistrationManager::new(
        Arc::new(LocalDiscoveryClient::new(Arc::clone(&service))),
        Arc::new(InMemoryIdentityStore::new()),
        target,
        RetryPolicy::new(1, WAIT),
    )
    .expect("manager should build");

    assert_eq!(manager.register().await, RegistrationOutcome::Registered);
    let listed = service
        .list(ServiceCategory::ResourceProvider)
        .await
        .expect("list should succeed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id(), manager.assigned_id().as_ref());

    manager.deregister().await;
    let listed = service
        .list(ServiceCategory::ResourceProvider)
        .await
        .expect("list should succeed");
    assert!(listed.is_empty());
}
