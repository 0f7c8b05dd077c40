//! Content resolution pipeline tests: provider racing, fault handling,
//! timeouts, and enrichment broadcast.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use chat_coordinator::application::services::content::{ContentProvider, ProviderContent};
use chat_coordinator::application::services::coordinator::SendRequest;
use chat_coordinator::domain::commands::NullCommandDispatcher;
use chat_coordinator::domain::entities::{Message, MessageKind};
use chat_coordinator::domain::registry::{ClientRegistry, OutboundEvent};
use chat_coordinator::domain::repository::Repository;
use chat_coordinator::shared::error::ChatError;
use chat_coordinator::startup::default_providers;

use common::{drain, test_settings, TestCore};

/// Scripted provider: waits, then succeeds, returns empty, or faults.
struct FakeProvider {
    name: &'static str,
    delay: Duration,
    markup: Option<&'static str>,
    fail: bool,
}

impl FakeProvider {
    fn returning(name: &'static str, delay: Duration, markup: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            delay,
            markup: Some(markup),
            fail: false,
        })
    }

    fn empty(name: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            delay,
            markup: None,
            fail: false,
        })
    }

    fn faulty(name: &'static str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            delay,
            markup: None,
            fail: true,
        })
    }
}

#[async_trait]
impl ContentProvider for FakeProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_valid_content(&self, _url: &Url) -> bool {
        true
    }

    async fn get_content(&self, _url: &Url) -> Result<Option<ProviderContent>, ChatError> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(ChatError::Provider("scripted failure".into()));
        }
        Ok(self.markup.map(|markup| ProviderContent {
            title: None,
            markup: markup.into(),
        }))
    }
}

/// Build a core with the given providers and seed one committed message,
/// returning an observer channel subscribed to the message's room.
async fn pipeline_fixture(
    providers: Vec<Arc<dyn ContentProvider>>,
) -> (TestCore, tokio::sync::mpsc::UnboundedReceiver<OutboundEvent>) {
    let core = TestCore::with_collaborators(
        test_settings(),
        Arc::new(NullCommandDispatcher),
        providers,
    );
    let message = Message::new(42, "lobby", 1, "a link", MessageKind::Ordinary);
    core.core.repository.add_message(&message).await.unwrap();
    core.core.repository.commit().await.unwrap();

    let rx = core.core.registry.open_channel("obs");
    core.core.registry.register_connection("obs", 9);
    core.core.registry.subscribe("obs", "lobby");
    (core, rx)
}

fn enriched_contents(events: &[OutboundEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            OutboundEvent::MessageEnriched(payload) => Some(payload.content.clone()),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_first_non_empty_result_wins_over_faster_empty() {
    // Provider A is slow but has content; provider B finishes first with
    // nothing. A's result must be chosen.
    let (core, mut rx) = pipeline_fixture(vec![
        FakeProvider::returning("slow-rich", Duration::from_millis(200), "<div>rich</div>"),
        FakeProvider::empty("fast-empty", Duration::from_millis(50)),
    ])
    .await;

    let url = Url::parse("https://example.com/page").unwrap();
    core.core.content.resolve("lobby", 42, vec![url]).await;

    let message = core.core.repository.message_by_id(42).await.unwrap().unwrap();
    assert_eq!(message.enrichment.as_deref(), Some("<div>rich</div>"));
    assert_eq!(enriched_contents(&drain(&mut rx)), vec!["<div>rich</div>"]);
}

#[tokio::test(start_paused = true)]
async fn test_faster_non_empty_result_wins() {
    let (core, _rx) = pipeline_fixture(vec![
        FakeProvider::returning("slow", Duration::from_millis(200), "<div>slow</div>"),
        FakeProvider::returning("fast", Duration::from_millis(50), "<div>fast</div>"),
    ])
    .await;

    let url = Url::parse("https://example.com/page").unwrap();
    core.core.content.resolve("lobby", 42, vec![url]).await;

    let message = core.core.repository.message_by_id(42).await.unwrap().unwrap();
    assert_eq!(message.enrichment.as_deref(), Some("<div>fast</div>"));
}

#[tokio::test(start_paused = true)]
async fn test_provider_fault_does_not_poison_resolution() {
    let (core, mut rx) = pipeline_fixture(vec![
        FakeProvider::faulty("broken", Duration::from_millis(10)),
        FakeProvider::returning("working", Duration::from_millis(100), "<div>ok</div>"),
    ])
    .await;

    let url = Url::parse("https://example.com/page").unwrap();
    core.core.content.resolve("lobby", 42, vec![url]).await;

    let message = core.core.repository.message_by_id(42).await.unwrap().unwrap();
    assert_eq!(message.enrichment.as_deref(), Some("<div>ok</div>"));
    assert_eq!(enriched_contents(&drain(&mut rx)).len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hung_provider_times_out_as_empty() {
    // The timeout is 5s; a provider sleeping 60s yields nothing and the
    // URL resolves to no enrichment.
    let (core, mut rx) = pipeline_fixture(vec![
        FakeProvider::returning("hung", Duration::from_secs(60), "<div>late</div>"),
        FakeProvider::empty("empty", Duration::from_millis(10)),
    ])
    .await;

    let url = Url::parse("https://example.com/page").unwrap();
    core.core.content.resolve("lobby", 42, vec![url]).await;

    let message = core.core.repository.message_by_id(42).await.unwrap().unwrap();
    assert!(message.enrichment.is_none());
    assert!(enriched_contents(&drain(&mut rx)).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_all_providers_empty_yields_no_enrichment() {
    let (core, mut rx) = pipeline_fixture(vec![
        FakeProvider::empty("a", Duration::from_millis(10)),
        FakeProvider::empty("b", Duration::from_millis(20)),
    ])
    .await;

    let url = Url::parse("https://example.com/page").unwrap();
    core.core.content.resolve("lobby", 42, vec![url]).await;

    let message = core.core.repository.message_by_id(42).await.unwrap().unwrap();
    assert!(message.enrichment.is_none());
    assert!(enriched_contents(&drain(&mut rx)).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_multiple_links_enrich_independently() {
    let (core, mut rx) = pipeline_fixture(vec![
        FakeProvider::returning("echo", Duration::from_millis(20), "<div>resolved</div>"),
    ])
    .await;

    let urls = vec![
        Url::parse("https://example.com/one").unwrap(),
        Url::parse("https://example.com/two").unwrap(),
    ];
    core.core.content.resolve("lobby", 42, urls).await;

    let message = core.core.repository.message_by_id(42).await.unwrap().unwrap();
    let enrichment = message.enrichment.unwrap();
    assert_eq!(enrichment.matches("<div>resolved</div>").count(), 2);
    assert_eq!(enriched_contents(&drain(&mut rx)).len(), 2);
}

#[tokio::test]
async fn test_send_with_image_link_enriches_end_to_end() {
    let core = TestCore::with_collaborators(
        test_settings(),
        Arc::new(NullCommandDispatcher),
        default_providers(),
    );
    core.seed_user(1, "alice", &["lobby"]);
    core.seed_user(2, "bob", &["lobby"]);
    core.seed_room("lobby", &[1, 2]);

    let _alice_rx = core.connect(1, "a-1").await;
    let mut bob_rx = core.connect(2, "b-1").await;
    drain(&mut bob_rx);

    core.core
        .coordinator
        .send(SendRequest {
            user_id: 1,
            connection_id: "a-1".into(),
            room: "lobby".into(),
            content: "look: https://example.com/cat.png".into(),
            client_message_id: None,
        })
        .await
        .unwrap();

    // The pipeline runs detached from the send; wait for the broadcast.
    let enriched = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match bob_rx.recv().await {
                Some(OutboundEvent::MessageEnriched(payload)) => break payload,
                Some(_) => continue,
                None => panic!("channel closed before enrichment"),
            }
        }
    })
    .await
    .expect("enrichment should arrive");

    assert!(enriched.content.contains("cat.png"));

    let messages = core
        .core
        .repository
        .messages_by_room("lobby", 10)
        .await
        .unwrap();
    assert!(messages[0]
        .enrichment
        .as_deref()
        .unwrap()
        .contains("cat.png"));
}
