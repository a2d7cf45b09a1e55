//! Integration tests for the LemonSqueezy webhook pipeline.
//!
//! These tests drive signed fixture deliveries through:
//! 1. Signature verification and payload parsing
//! 2. Billing event translation and subscriber dispatch
//! 3. Subscription state transitions and the delivery log
//!
//! Uses in-memory adapters throughout.

use std::sync::Arc;

use secrecy::SecretString;

use saas_entitlements::adapters::{
    InMemoryFeatureCache, InMemoryPlanFeatureRepository, InMemoryPlanRepository,
    InMemorySubscriptionRepository, InMemoryWebhookEventLog, MockPaymentIntegration,
};
use saas_entitlements::application::{
    HandleWebhookCommand, PlanFeatureManager, SubscriptionEventSubscriber, SubscriptionManager,
    WebhookPipeline,
};
use saas_entitlements::domain::feature::{FeatureConfig, FeatureConfigRegistry, FeatureSetting};
use saas_entitlements::domain::foundation::{PlanId, SubscriberId, SubscriptionId, Timestamp};
use saas_entitlements::domain::subscription::{Plan, Subscription, SubscriptionStatus};
use saas_entitlements::domain::webhook::{WebhookError, WebhookOutcome, WebhookVerifier};
use saas_entitlements::ports::{CheckoutOptions, PlanRepository, SubscriptionRepository};

const SECRET: &str = "integration-signing-secret";

const CREATED: &str = include_str!("fixtures/subscription_created.json");
const CANCELLED: &str = include_str!("fixtures/subscription_cancelled.json");
const PAYMENT_SUCCESS: &str = include_str!("fixtures/subscription_payment_success.json");
const UNKNOWN_STATUS: &str = include_str!("fixtures/subscription_unknown_status.json");
const ORDER_CREATED: &str = include_str!("fixtures/order_created.json");

// =============================================================================
// Test Infrastructure
// =============================================================================

struct World {
    pipeline: Arc<WebhookPipeline>,
    manager: Arc<SubscriptionManager>,
    subscriptions: InMemorySubscriptionRepository,
    plans: InMemoryPlanRepository,
    log: InMemoryWebhookEventLog,
    verifier: WebhookVerifier,
}

impl World {
    fn new() -> Self {
        let subscriptions = InMemorySubscriptionRepository::new();
        let plans = InMemoryPlanRepository::new();
        let log = InMemoryWebhookEventLog::new();
        let verifier = WebhookVerifier::new(SecretString::new(SECRET.to_string()));

        let manager = Arc::new(SubscriptionManager::new(
            Arc::new(subscriptions.clone()),
            Arc::new(plans.clone()),
            Arc::new(MockPaymentIntegration::new()),
        ));
        let pipeline = WebhookPipeline::new(
            verifier.clone(),
            SubscriptionEventSubscriber::new(Arc::new(subscriptions.clone()), manager.clone()),
            Arc::new(log.clone()),
        );

        Self {
            pipeline: Arc::new(pipeline),
            manager,
            subscriptions,
            plans,
            log,
            verifier,
        }
    }

    async fn pending_subscription(&self) -> Subscription {
        let subscription = Subscription::new_pending(SubscriberId::new("acme").unwrap(), PlanId::new());
        self.subscriptions.save(&subscription).await.unwrap();
        subscription
    }

    async fn stored(&self, id: SubscriptionId) -> Subscription {
        self.subscriptions.find_by_id(&id).await.unwrap().unwrap()
    }

    fn signed(&self, payload: Vec<u8>) -> HandleWebhookCommand {
        let signature = self.verifier.sign(&payload).unwrap();
        HandleWebhookCommand {
            payload,
            signature: Some(signature),
        }
    }

    async fn deliver(&self, fixture: &str, id: SubscriptionId) -> Result<WebhookOutcome, WebhookError> {
        self.pipeline.handle(self.signed(body(fixture, id))).await
    }
}

fn body(fixture: &str, id: SubscriptionId) -> Vec<u8> {
    fixture
        .replace("{{subscription_id}}", &id.to_string())
        .into_bytes()
}

/// The created fixture with its subscription attributes rewritten.
fn created_with(id: SubscriptionId, edit: impl FnOnce(&mut serde_json::Value)) -> Vec<u8> {
    let mut payload: serde_json::Value = serde_json::from_slice(&body(CREATED, id)).unwrap();
    edit(&mut payload["data"]["attributes"]);
    serde_json::to_vec(&payload).unwrap()
}

fn ts(value: &str) -> Timestamp {
    Timestamp::parse(value).unwrap()
}

// =============================================================================
// Signature
// =============================================================================

#[tokio::test]
async fn invalid_signature_changes_nothing() {
    let world = World::new();
    let subscription = world.pending_subscription().await;

    let cmd = HandleWebhookCommand {
        payload: body(CREATED, subscription.id),
        signature: Some("00".repeat(32)),
    };
    let err = world.pipeline.handle(cmd).await.unwrap_err();

    assert!(matches!(err, WebhookError::InvalidSignature));
    assert_eq!(err.status_code(), http::StatusCode::UNAUTHORIZED);
    assert_eq!(world.stored(subscription.id).await, subscription);
    assert_eq!(world.log.len().await, 0);
}

#[tokio::test]
async fn signature_over_different_bytes_is_rejected() {
    let world = World::new();
    let subscription = world.pending_subscription().await;

    let mut cmd = world.signed(body(CREATED, subscription.id));
    cmd.payload.push(b'\n');

    assert!(matches!(
        world.pipeline.handle(cmd).await,
        Err(WebhookError::InvalidSignature)
    ));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn created_active_activates_and_records_external_id() {
    let world = World::new();
    let subscription = world.pending_subscription().await;

    let outcome = world.deliver(CREATED, subscription.id).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Processed);
    let stored = world.stored(subscription.id).await;
    assert_eq!(stored.status, SubscriptionStatus::Active);
    assert_eq!(stored.end_date, ts("2024-04-12T09:41:02Z"));
    assert_eq!(stored.external_subscription_id.as_deref(), Some("104577"));
    assert!(!stored.logs.is_empty());
}

#[tokio::test]
async fn cancellation_sets_grace_end_and_keeps_start_date() {
    let world = World::new();
    let subscription = world.pending_subscription().await;
    world.deliver(CREATED, subscription.id).await.unwrap();
    let activated = world.stored(subscription.id).await;

    world.deliver(CANCELLED, subscription.id).await.unwrap();

    let stored = world.stored(subscription.id).await;
    assert_eq!(stored.status, SubscriptionStatus::Cancelled);
    assert_eq!(stored.end_date, ts("2024-04-12T09:41:02Z"));
    assert_eq!(stored.start_date, activated.start_date);
    assert_eq!(stored.start_date, subscription.start_date);
}

#[tokio::test]
async fn payment_success_is_acknowledged_without_transition() {
    let world = World::new();
    let subscription = world.pending_subscription().await;
    world.deliver(CREATED, subscription.id).await.unwrap();
    let before = world.stored(subscription.id).await;

    let outcome = world.deliver(PAYMENT_SUCCESS, subscription.id).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Processed);
    assert_eq!(world.stored(subscription.id).await, before);
    assert_eq!(world.log.len().await, 2);
}

#[tokio::test]
async fn unknown_status_is_not_acceptable() {
    let world = World::new();
    let subscription = world.pending_subscription().await;

    let err = world.deliver(UNKNOWN_STATUS, subscription.id).await.unwrap_err();

    assert!(matches!(err, WebhookError::UnsupportedSubscriptionStatus(ref s) if s == "suspended"));
    assert_eq!(err.status_code(), http::StatusCode::NOT_ACCEPTABLE);
    assert_eq!(world.stored(subscription.id).await, subscription);
}

#[tokio::test]
async fn generic_event_is_ignored() {
    let world = World::new();

    let outcome = world.deliver(ORDER_CREATED, SubscriptionId::new()).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Ignored);
    assert_eq!(world.log.entries().await[0].event_name, "order_created");
}

#[tokio::test]
async fn unknown_subscription_is_retryable_server_error() {
    let world = World::new();

    let err = world.deliver(CREATED, SubscriptionId::new()).await.unwrap_err();

    assert!(matches!(err, WebhookError::SubscriptionNotFound(_)));
    assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.is_retryable());
    assert_eq!(world.subscriptions.len().await, 0);
    assert_eq!(world.log.len().await, 0);
}

#[tokio::test]
async fn created_with_disallowed_transition_changes_nothing() {
    let world = World::new();
    let subscription = world.pending_subscription().await;
    let payload = created_with(subscription.id, |attributes| {
        attributes["status"] = "cancelled".into();
        attributes["ends_at"] = "2024-04-12T09:41:02.000000Z".into();
    });

    let err = world.pipeline.handle(world.signed(payload)).await.unwrap_err();

    assert!(matches!(err, WebhookError::InvalidTransition(_)));
    assert_eq!(err.status_code(), http::StatusCode::NOT_ACCEPTABLE);
    let stored = world.stored(subscription.id).await;
    assert_eq!(stored, subscription);
    assert_eq!(serde_json::to_vec(&stored).unwrap(), serde_json::to_vec(&subscription).unwrap());
    assert_eq!(stored.external_subscription_id, None);
    assert_eq!(world.log.len().await, 0);
}

#[tokio::test]
async fn created_active_without_dates_changes_nothing() {
    let world = World::new();
    let subscription = world.pending_subscription().await;
    let payload = created_with(subscription.id, |attributes| {
        attributes["renews_at"] = serde_json::Value::Null;
        attributes["ends_at"] = serde_json::Value::Null;
    });

    let err = world.pipeline.handle(world.signed(payload)).await.unwrap_err();

    assert!(matches!(err, WebhookError::ParseError(_)));
    let stored = world.stored(subscription.id).await;
    assert_eq!(stored, subscription);
    assert_eq!(serde_json::to_vec(&stored).unwrap(), serde_json::to_vec(&subscription).unwrap());
    assert_eq!(stored.external_subscription_id, None);
    assert_eq!(world.log.len().await, 0);
}

// =============================================================================
// Idempotency and concurrency
// =============================================================================

#[tokio::test]
async fn redelivery_is_acknowledged_as_duplicate() {
    let world = World::new();
    let subscription = world.pending_subscription().await;
    world.deliver(CREATED, subscription.id).await.unwrap();
    let after_first = world.stored(subscription.id).await;

    let outcome = world.deliver(CREATED, subscription.id).await.unwrap();

    assert_eq!(outcome, WebhookOutcome::Duplicate);
    assert_eq!(world.stored(subscription.id).await, after_first);
    assert_eq!(world.log.len().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redeliveries_apply_once() {
    let world = World::new();
    let subscription = world.pending_subscription().await;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let pipeline = world.pipeline.clone();
            let cmd = world.signed(body(CREATED, subscription.id));
            tokio::spawn(async move { pipeline.handle(cmd).await })
        })
        .collect();

    let mut processed = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            WebhookOutcome::Processed => processed += 1,
            WebhookOutcome::Duplicate => duplicates += 1,
            WebhookOutcome::Ignored => panic!("subscription event ignored"),
        }
    }

    assert_eq!(processed, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(world.log.len().await, 1);
    assert_eq!(world.stored(subscription.id).await.status, SubscriptionStatus::Active);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_subscriptions_proceed_independently() {
    let world = Arc::new(World::new());
    let mut ids = Vec::new();
    for _ in 0..8 {
        ids.push(world.pending_subscription().await.id);
    }

    let handles: Vec<_> = ids
        .iter()
        .map(|&id| {
            let world = world.clone();
            tokio::spawn(async move { world.deliver(CREATED, id).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), WebhookOutcome::Processed);
    }

    for id in ids {
        assert_eq!(world.stored(id).await.status, SubscriptionStatus::Active);
    }
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn checkout_then_webhook_unlocks_plan_features() {
    let world = World::new();
    let plan = Plan::new("Team", "236640", 2900).unwrap();
    world.plans.save(&plan).await.unwrap();

    let registry = FeatureConfigRegistry::new([
        FeatureConfig::new("seats", FeatureSetting::Integer(1), "Seats"),
        FeatureConfig::new("sso", FeatureSetting::Boolean(false), "Single sign-on"),
    ]);
    let features = PlanFeatureManager::new(
        Arc::new(registry),
        Arc::new(InMemoryPlanFeatureRepository::new()),
        Arc::new(world.plans.clone()),
        world.manager.clone(),
        Arc::new(InMemoryFeatureCache::new()),
    );
    features
        .set_feature(&plan.id, "seats", FeatureSetting::Integer(25))
        .await
        .unwrap();
    features
        .set_feature(&plan.id, "sso", FeatureSetting::Boolean(true))
        .await
        .unwrap();

    let acme = SubscriberId::new("acme").unwrap();
    let subscription = world
        .manager
        .create_subscription(acme.clone(), "236640")
        .await
        .unwrap();
    let url = world
        .manager
        .get_checkout_url(&subscription, &CheckoutOptions::new().with_email("ada@example.com"))
        .await
        .unwrap();
    assert!(url.contains(&subscription.id.to_string()));

    world.deliver(CREATED, subscription.id).await.unwrap();

    let current = world.manager.get_subscription_for(&acme).await.unwrap().unwrap();
    assert_eq!(current.status, SubscriptionStatus::Active);
    assert!(features.has_feature_for_subscriber(&acme, "sso").await.unwrap());
    assert!(features.can_use_for_subscriber(&acme, "seats", 24).await.unwrap());
    assert!(!features.can_use_for_subscriber(&acme, "seats", 25).await.unwrap());
}
