//! Async tests for the conversation engine
//!
//! Every test runs on a paused tokio clock, so pacing delays are real
//! suspension points but finish instantly.

use std::sync::Arc;
use std::time::Duration;

use contact_dialog::{
    aggregate::script, ContactMethod, ConversationEngine, DeliveryOutcome, DialogDomainEvent,
    FixedPacer, InquiryOption, InquiryTone, Message, NavigationTarget, RandomPacer,
    RecordingRelay, ResponseOutcome, Sender, UserContactRecord, TERMINAL_STEP,
};
use tokio::time::Instant;
use tokio_test::assert_ok;

const SCRIPT: [&str; 6] = [
    "I'm interested in hiring James",
    "Jane",
    "Acme Co",
    "phone call",
    "555-1234",
    "Need a quick chat about a role",
];

const DELAY: Duration = Duration::from_millis(1000);

fn engine_with(relay: &Arc<RecordingRelay>) -> ConversationEngine {
    ConversationEngine::new(relay.clone(), FixedPacer::new(DELAY))
}

async fn run_script(engine: &mut ConversationEngine) -> Vec<ResponseOutcome> {
    let mut outcomes = Vec::new();
    for text in SCRIPT {
        outcomes.push(assert_ok!(engine.submit_text(text).await));
    }
    outcomes
}

/// Bot messages after the last user message
fn closing_messages(transcript: &[Message]) -> Vec<&Message> {
    let last_user = transcript
        .iter()
        .rposition(|m| m.sender == Sender::User)
        .unwrap();
    transcript[last_user + 1..].iter().collect()
}

#[tokio::test(start_paused = true)]
async fn test_initialize_greets_and_offers_inquiry_options() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);

    assert!(engine.initialize().await);

    let transcript = engine.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript.iter().all(Message::is_bot));
    assert_eq!(transcript[0].text, script::GREETING);
    assert_eq!(transcript[1].text, script::INQUIRY_PROMPT);
    assert_eq!(transcript[1].options, InquiryOption::labels());
    assert!(!engine.state().is_typing);
}

#[tokio::test(start_paused = true)]
async fn test_initialize_runs_once() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);

    assert!(engine.initialize().await);
    assert!(!engine.initialize().await);
    assert!(!engine.initialize().await);

    assert_eq!(engine.transcript().len(), 2);
    let started = engine
        .events()
        .iter()
        .filter(|e| matches!(e, DialogDomainEvent::ConversationStarted(_)))
        .count();
    assert_eq!(started, 1);
}

#[tokio::test(start_paused = true)]
async fn test_blank_submission_on_fresh_session() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;

    let outcome = assert_ok!(engine.submit_text("").await);

    assert_eq!(outcome, ResponseOutcome::Rejected);
    assert_eq!(engine.transcript().len(), 2);
    assert!(engine.transcript().iter().all(Message::is_bot));
    assert_eq!(engine.state().step, 0);
}

#[tokio::test(start_paused = true)]
async fn test_bot_messages_are_never_instant() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);

    let started = Instant::now();
    engine.initialize().await;
    assert!(started.elapsed() >= DELAY * 2);

    let before_reply = Instant::now();
    engine.submit_text("I have a project in mind").await.unwrap();
    assert!(before_reply.elapsed() >= DELAY);
}

#[tokio::test(start_paused = true)]
async fn test_random_pacing_stays_in_band() {
    let relay = Arc::new(RecordingRelay::accepting());
    let pacer = RandomPacer::seeded(Duration::from_millis(800), Duration::from_millis(2000), 42);
    let mut engine = ConversationEngine::new(relay.clone(), pacer);

    let started = Instant::now();
    engine.initialize().await;
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_millis(1600));
    assert!(elapsed < Duration::from_millis(4000));
}

#[tokio::test(start_paused = true)]
async fn test_user_message_precedes_bot_reply() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;

    engine.submit_text("Just networking").await.unwrap();

    let transcript = engine.transcript();
    assert_eq!(transcript.len(), 4);
    assert_eq!(transcript[2].sender, Sender::User);
    assert_eq!(transcript[2].text, "Just networking");
    assert_eq!(transcript[3].sender, Sender::Bot);
    assert_eq!(transcript[3].text, script::ask_name(InquiryTone::General));
    assert!(transcript.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test(start_paused = true)]
async fn test_full_script_submits_once() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;

    let outcomes = run_script(&mut engine).await;

    assert_eq!(
        outcomes[..5],
        [
            ResponseOutcome::Advanced { step: 1 },
            ResponseOutcome::Advanced { step: 2 },
            ResponseOutcome::Advanced { step: 3 },
            ResponseOutcome::Advanced { step: 4 },
            ResponseOutcome::Advanced { step: 5 },
        ]
    );
    assert_eq!(outcomes[5], ResponseOutcome::Submitted(DeliveryOutcome::Delivered));

    let expected = UserContactRecord {
        name: Some("Jane".to_string()),
        company: Some("Acme Co".to_string()),
        inquiry_type: Some("I'm interested in hiring James".to_string()),
        contact_method: Some(ContactMethod::Phone),
        email: None,
        phone: Some("555-1234".to_string()),
        linkedin: None,
        details: Some("Need a quick chat about a role".to_string()),
    };
    assert_eq!(engine.state().collected_data, expected);
    assert_eq!(engine.state().step, TERMINAL_STEP);
    assert!(!engine.state().is_submitting);

    let payloads = relay.payloads().await;
    assert_eq!(payloads.len(), 1);
    let payload = &payloads[0];
    assert_eq!(payload.name, "Jane");
    assert_eq!(payload.company.as_deref(), Some("Acme Co"));
    assert_eq!(payload.inquiry_type, "I'm interested in hiring James");
    assert_eq!(payload.contact_method, ContactMethod::Phone);
    assert_eq!(payload.phone.as_deref(), Some("555-1234"));
    assert_eq!(payload.details, "Need a quick chat about a role");

    // 2 opening + 6 replies + 5 prompts + 4 closing lines
    assert_eq!(engine.transcript().len(), 17);
}

#[tokio::test(start_paused = true)]
async fn test_blank_retries_do_not_add_relay_calls() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;

    for text in SCRIPT {
        assert_eq!(engine.submit_text("  ").await.unwrap(), ResponseOutcome::Rejected);
        engine.submit_text(text).await.unwrap();
        assert_eq!(engine.submit_text("").await.unwrap(), ResponseOutcome::Rejected);
    }

    assert_eq!(relay.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_closing_sequence_on_success() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;
    run_script(&mut engine).await;

    let closing = closing_messages(engine.transcript());
    let texts: Vec<&str> = closing.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            script::acknowledgement(DeliveryOutcome::Delivered),
            script::expected_response_time(InquiryTone::General),
            script::THANK_YOU,
            script::FINAL_PROMPT,
        ]
    );
    assert_eq!(closing[3].options, NavigationTarget::labels());
}

#[tokio::test(start_paused = true)]
async fn test_declined_relay_keeps_closing_sequence() {
    let relay = Arc::new(RecordingRelay::declining());
    let mut engine = engine_with(&relay);
    engine.initialize().await;
    let outcomes = run_script(&mut engine).await;

    assert_eq!(outcomes[5], ResponseOutcome::Submitted(DeliveryOutcome::NotConfirmed));
    let closing = closing_messages(engine.transcript());
    assert_eq!(closing.len(), 4);
    assert!(closing.iter().all(|m| m.is_bot()));
    assert_eq!(closing[0].text, script::acknowledgement(DeliveryOutcome::NotConfirmed));
    assert_eq!(closing[3].text, script::FINAL_PROMPT);
    assert!(!engine.state().is_submitting);
    assert_eq!(relay.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_failure_changes_only_the_acknowledgement() {
    let ok_relay = Arc::new(RecordingRelay::accepting());
    let mut ok_engine = engine_with(&ok_relay);
    ok_engine.initialize().await;
    run_script(&mut ok_engine).await;

    let failing_relay = Arc::new(RecordingRelay::failing());
    let mut failing_engine = engine_with(&failing_relay);
    failing_engine.initialize().await;
    let outcomes = run_script(&mut failing_engine).await;
    assert_eq!(outcomes[5], ResponseOutcome::Submitted(DeliveryOutcome::NotConfirmed));

    let ok_texts: Vec<&str> = ok_engine.transcript().iter().map(|m| m.text.as_str()).collect();
    let failing_texts: Vec<&str> = failing_engine
        .transcript()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(ok_texts.len(), failing_texts.len());

    let differing: Vec<usize> = ok_texts
        .iter()
        .zip(&failing_texts)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(differing.len(), 1);
    assert_eq!(
        failing_texts[differing[0]],
        script::acknowledgement(DeliveryOutcome::NotConfirmed)
    );
    assert!(!failing_engine.state().is_submitting);
}

#[tokio::test(start_paused = true)]
async fn test_hiring_tone_sets_response_time() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;

    engine.select_option(InquiryOption::Hiring.label()).await.unwrap();
    for text in ["Sam", "Initech", "email", "sam@example.com", "A senior role"] {
        engine.submit_text(text).await.unwrap();
    }

    let closing = closing_messages(engine.transcript());
    assert_eq!(closing[1].text, script::expected_response_time(InquiryTone::Hiring));
    assert_eq!(engine.state().collected_data.email.as_deref(), Some("sam@example.com"));
}

#[tokio::test(start_paused = true)]
async fn test_submission_flags_bracket_closing_lines() {
    let relay = Arc::new(RecordingRelay::failing());
    let mut engine = engine_with(&relay);
    engine.initialize().await;
    run_script(&mut engine).await;

    let events = engine.events();
    let started = events
        .iter()
        .position(|e| matches!(e, DialogDomainEvent::SubmissionStarted(_)))
        .unwrap();
    let completed = events
        .iter()
        .position(|e| matches!(e, DialogDomainEvent::SubmissionCompleted(_)))
        .unwrap();

    let closing_between = events[started..completed]
        .iter()
        .filter(|e| matches!(e, DialogDomainEvent::MessageAppended(m) if m.message.is_bot()))
        .count();
    assert_eq!(closing_between, 4);
    assert_eq!(completed, events.len() - 1);

    let DialogDomainEvent::SubmissionCompleted(done) = &events[completed] else {
        unreachable!();
    };
    assert_eq!(done.outcome, DeliveryOutcome::NotConfirmed);
}

#[tokio::test(start_paused = true)]
async fn test_typing_indicator_wraps_each_bot_message() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;

    let events = engine.events();
    for (i, event) in events.iter().enumerate() {
        if let DialogDomainEvent::MessageAppended(appended) = event {
            assert!(appended.message.is_bot());
            assert!(matches!(
                &events[i - 1],
                DialogDomainEvent::TypingChanged(t) if t.is_typing
            ));
            assert!(matches!(
                &events[i + 1],
                DialogDomainEvent::TypingChanged(t) if !t.is_typing
            ));
        }
    }
    assert!(!engine.state().is_typing);
}

#[tokio::test(start_paused = true)]
async fn test_resume_option_navigates_once() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;
    run_script(&mut engine).await;
    let events_before = engine.events().len();

    let outcome = engine
        .select_option(NavigationTarget::Resume.label())
        .await
        .unwrap();

    assert_eq!(outcome, ResponseOutcome::Navigated(Some(NavigationTarget::Resume)));
    let new_events = &engine.events()[events_before..];
    let navigations = new_events
        .iter()
        .filter(|e| matches!(e, DialogDomainEvent::NavigationRequested(n) if n.target == NavigationTarget::Resume))
        .count();
    assert_eq!(navigations, 1);
    assert!(!new_events.iter().any(|e| matches!(e, DialogDomainEvent::StepAdvanced(_))));
    assert_eq!(engine.state().step, TERMINAL_STEP);
    assert_eq!(relay.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_terminal_free_text_is_ignored() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    engine.initialize().await;
    run_script(&mut engine).await;
    let transcript_len = engine.transcript().len();

    let outcome = engine.submit_text("anything else?").await.unwrap();

    assert_eq!(outcome, ResponseOutcome::Ignored);
    assert_eq!(engine.transcript().len(), transcript_len);
    assert_eq!(relay.call_count().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_subscribers_see_published_events() {
    let relay = Arc::new(RecordingRelay::accepting());
    let mut engine = engine_with(&relay);
    let mut receiver = engine.subscribe();

    engine.initialize().await;

    let mut received = Vec::new();
    while let Ok(event) = receiver.try_recv() {
        received.push(event);
    }
    assert_eq!(received, engine.events());
}
