//! Terminal chat session behaviour.

mod common;

use common::Harness;
use std::time::Duration;
use study_companion::{
    cli::{
        chat::{run, ChatEvent, ChatSession},
        output::Output,
    },
    types::{AgentKind, AgentPreference},
    RateLimiter,
};

fn limiter() -> RateLimiter {
    RateLimiter::new(100, Duration::from_secs(60), None)
}

#[tokio::test]
async fn test_messages_build_history() {
    let harness = Harness::new();
    let companion = harness.companion();
    let limiter = limiter();
    let mut session = ChatSession::new(&companion, &limiter, "sam", AgentPreference::Auto);

    let event = session.handle("explain plants").await.unwrap();
    match event {
        ChatEvent::Reply(turn) => assert_eq!(turn.agent, Some(AgentKind::Teaching)),
        other => panic!("Expected reply, got {:?}", other),
    }

    session.handle("more examples").await.unwrap();

    assert_eq!(session.history().len(), 4);
    assert_eq!(harness.teaching.call_count(), 2);
    assert_eq!(harness.router.call_count(), 0);
}

#[tokio::test]
async fn test_switch_agent_and_clear() {
    let harness = Harness::new();
    let companion = harness.companion();
    let limiter = limiter();
    let mut session = ChatSession::new(&companion, &limiter, "sam", AgentPreference::Auto);

    let event = session.handle("/agent motivation").await.unwrap();
    assert_eq!(
        event,
        ChatEvent::Switched(AgentPreference::Agent(AgentKind::Motivation))
    );

    session.handle("explain atoms").await.unwrap();
    assert_eq!(harness.motivation.call_count(), 1);
    assert_eq!(harness.teaching.call_count(), 0);

    assert_eq!(session.handle("/clear").await.unwrap(), ChatEvent::Cleared);
    assert!(session.history().is_empty());

    assert!(matches!(
        session.handle("/agent coach").await.unwrap(),
        ChatEvent::Invalid(_)
    ));
    assert_eq!(
        session.preference(),
        AgentPreference::Agent(AgentKind::Motivation)
    );
}

#[tokio::test]
async fn test_rate_limited_message_is_not_sent() {
    let harness = Harness::new();
    let companion = harness.companion();
    let limiter = RateLimiter::new(1, Duration::from_secs(60), None);
    let mut session = ChatSession::new(&companion, &limiter, "sam", AgentPreference::Auto);

    session.handle("explain").await.unwrap();
    assert_eq!(
        session.handle("explain").await.unwrap(),
        ChatEvent::RateLimited
    );
    assert_eq!(harness.teaching.call_count(), 1);
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_run_stops_at_quit() {
    let harness = Harness::new();
    let companion = harness.companion();
    let limiter = limiter();
    let session = ChatSession::new(&companion, &limiter, "sam", AgentPreference::Auto);

    let input: &[u8] = b"explain rain\n\n/quit\nexplain snow\n";
    run(session, input, &Output::no_color()).await.unwrap();

    assert_eq!(harness.teaching.call_count(), 1);
}
