//! Dialogue controller integration tests
//!
//! Drives the controller with plain text and inspects the prompts and
//! completion events it reports.

use std::time::Duration;

use voyage_concierge::dialogue::prompts::{self, BOOKING_ACK, FALLBACK, GREETING, HANDOFF, HELP};
use voyage_concierge::{
    BookingAnswers, DialogueConfig, DialogueEvent, DialogueState, FieldKey, Intent, TurnOutcome,
};

mod common;

use common::{VALID_ANSWERS, controller_with, immediate_controller};

#[test]
fn test_unmatched_idle_utterance_is_stateless() {
    let (ctl, sink) = immediate_controller();

    for text in ["هوا چطوره", "ساعت چنده", "ok", ""] {
        let before = ctl.snapshot();
        let outcome = ctl.handle_utterance(text);
        assert_eq!(outcome, TurnOutcome::Classified(Intent::Unknown));
        assert_eq!(ctl.snapshot(), before);
    }

    assert_eq!(sink.prompts(), vec![FALLBACK; 4]);
    assert!(sink.completions().is_empty());
}

#[test]
fn test_greeting_and_help_are_informational() {
    let (ctl, sink) = immediate_controller();

    assert_eq!(
        ctl.handle_utterance("سلام"),
        TurnOutcome::Classified(Intent::Greeting)
    );
    assert_eq!(
        ctl.handle_utterance("میشه کمک کنی"),
        TurnOutcome::Classified(Intent::Help)
    );

    assert_eq!(ctl.state(), DialogueState::Idle);
    assert!(ctl.answers().is_empty());
    assert_eq!(sink.prompts(), vec![GREETING, HELP]);
}

#[test]
fn test_booking_intent_asks_for_origin() {
    let (ctl, sink) = immediate_controller();

    let outcome = ctl.handle_utterance("میخوام بلیط رزرو کنم");

    assert_eq!(outcome, TurnOutcome::Classified(Intent::Booking));
    assert!(ctl.answers().is_empty());
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
    let prompts = sink.prompts();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0], BOOKING_ACK);
    assert_eq!(prompts[1], FieldKey::Origin.spec().question);
}

#[test]
fn test_valid_origin_moves_to_destination() {
    let (ctl, sink) = immediate_controller();
    let _ = ctl.handle_utterance("بلیط");
    sink.take();

    let outcome = ctl.handle_utterance("تهران");

    assert_eq!(outcome, TurnOutcome::Accepted(FieldKey::Origin));
    assert_eq!(ctl.answers().get(FieldKey::Origin), Some("تهران"));
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Destination));
    assert_eq!(sink.prompts(), vec![FieldKey::Destination.spec().question]);
}

#[test]
fn test_invalid_origin_is_reasked() {
    let (ctl, sink) = immediate_controller();
    let _ = ctl.handle_utterance("بلیط");
    sink.take();

    let outcome = ctl.handle_utterance("نمیدونم");

    let origin = FieldKey::Origin.spec();
    assert_eq!(outcome, TurnOutcome::Rejected(FieldKey::Origin));
    assert!(!ctl.answers().contains(FieldKey::Origin));
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
    assert_eq!(sink.prompts(), vec![origin.clarification]);
    assert_ne!(origin.clarification, origin.question);
}

#[test]
fn test_rejection_loops_without_limit_by_default() {
    let (ctl, sink) = immediate_controller();
    let _ = ctl.handle_utterance("پرواز");
    sink.take();

    for _ in 0..50 {
        assert_eq!(
            ctl.handle_utterance("هیچ جا"),
            TurnOutcome::Rejected(FieldKey::Origin)
        );
    }
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
    assert_eq!(sink.prompts().len(), 50);
}

#[test]
fn test_full_booking_completes_once() {
    let (ctl, sink) = immediate_controller();
    let _ = ctl.handle_utterance("سلام، یه بلیط میخوام");

    for (field, answer) in voyage_concierge::FIELDS.iter().zip(VALID_ANSWERS) {
        assert_eq!(ctl.handle_utterance(answer), TurnOutcome::Accepted(field.key));
    }

    assert!(ctl.is_complete());
    assert_eq!(ctl.state(), DialogueState::Idle);

    let completions = sink.completions();
    assert_eq!(completions.len(), 1);
    let answers = &completions[0];
    for (field, answer) in voyage_concierge::FIELDS.iter().zip(VALID_ANSWERS) {
        assert_eq!(answers.get(field.key), Some(answer));
    }

    // Summary comes right before the completion event
    let events = sink.events();
    let summary = prompts::booking_summary(answers);
    assert_eq!(
        events[events.len() - 2],
        DialogueEvent::Prompt { text: summary }
    );
    assert!(matches!(
        events[events.len() - 1],
        DialogueEvent::BookingComplete { .. }
    ));

    let _ = ctl.handle_utterance("ممنون");
    assert_eq!(sink.completions().len(), 1);
}

#[test]
fn test_registry_reports_complete_answers() {
    let mut answers = BookingAnswers::new();
    for (field, answer) in voyage_concierge::FIELDS.iter().zip(VALID_ANSWERS) {
        let next = voyage_concierge::next_required_field(&answers).map(|f| f.key);
        assert_eq!(next, Some(field.key));
        answers.insert(field.key, answer);
    }
    assert!(voyage_concierge::next_required_field(&answers).is_none());
    assert!(answers.is_complete());
}

#[test]
fn test_booking_keyword_mid_collection_is_an_answer() {
    let (ctl, sink) = immediate_controller();
    let _ = ctl.handle_utterance("رزرو");
    let _ = ctl.handle_utterance("تهران");
    sink.take();

    // No city in it, so it is a rejected destination, not a restart
    let outcome = ctl.handle_utterance("میخوام بلیط رزرو کنم");
    assert_eq!(outcome, TurnOutcome::Rejected(FieldKey::Destination));
    assert_eq!(ctl.answers().get(FieldKey::Origin), Some("تهران"));
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Destination));
    assert_eq!(sink.prompts(), vec![FieldKey::Destination.spec().clarification]);

    // With a city in it, it is stored verbatim as the answer
    let outcome = ctl.handle_utterance("بلیط برای مشهد");
    assert_eq!(outcome, TurnOutcome::Accepted(FieldKey::Destination));
    assert_eq!(ctl.answers().get(FieldKey::Destination), Some("بلیط برای مشهد"));
    assert_eq!(ctl.answers().get(FieldKey::Origin), Some("تهران"));
}

#[test]
fn test_new_booking_after_completion_resets_answers() {
    let (ctl, sink) = immediate_controller();
    let _ = ctl.handle_utterance("بلیط");
    for answer in VALID_ANSWERS {
        let _ = ctl.handle_utterance(answer);
    }
    assert!(ctl.answers().is_complete());
    sink.take();

    let _ = ctl.handle_utterance("یه پرواز دیگه رزرو کن");

    assert!(ctl.answers().is_empty());
    assert!(!ctl.is_complete());
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
    assert_eq!(
        sink.prompts(),
        vec![BOOKING_ACK, FieldKey::Origin.spec().question]
    );
}

#[test]
fn test_retry_cap_abandons_booking() {
    let (ctl, sink) = controller_with(DialogueConfig {
        max_attempts: Some(2),
        ..DialogueConfig::immediate()
    });
    let _ = ctl.handle_utterance("بلیط");
    let _ = ctl.handle_utterance("اصفهان");
    sink.take();

    assert_eq!(
        ctl.handle_utterance("نمیدونم"),
        TurnOutcome::Rejected(FieldKey::Destination)
    );
    assert_eq!(
        ctl.handle_utterance("هنوز نمیدونم"),
        TurnOutcome::Abandoned(FieldKey::Destination)
    );

    assert_eq!(ctl.state(), DialogueState::Idle);
    assert!(ctl.answers().is_empty());
    assert_eq!(
        sink.prompts(),
        vec![FieldKey::Destination.spec().clarification, HANDOFF]
    );

    // Back to idle: the next utterance is classified again
    assert_eq!(
        ctl.handle_utterance("سلام"),
        TurnOutcome::Classified(Intent::Greeting)
    );
}

#[test]
fn test_retry_counter_resets_per_field() {
    let (ctl, _sink) = controller_with(DialogueConfig {
        max_attempts: Some(2),
        ..DialogueConfig::immediate()
    });
    let _ = ctl.handle_utterance("بلیط");

    assert_eq!(ctl.handle_utterance("x"), TurnOutcome::Rejected(FieldKey::Origin));
    assert_eq!(ctl.handle_utterance("قم"), TurnOutcome::Accepted(FieldKey::Origin));
    assert_eq!(
        ctl.handle_utterance("y"),
        TurnOutcome::Rejected(FieldKey::Destination)
    );
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Destination));
}

#[tokio::test(start_paused = true)]
async fn test_ack_delay_defers_first_question() {
    let (ctl, sink) = controller_with(DialogueConfig::default());

    let _ = ctl.handle_utterance("بلیط میخوام");
    assert_eq!(sink.prompts(), vec![BOOKING_ACK]);
    assert_eq!(ctl.state(), DialogueState::Idle);
    assert_eq!(ctl.pending_continuations(), 1);

    tokio::time::sleep(Duration::from_millis(1400)).await;
    assert_eq!(sink.prompts().len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        sink.prompts(),
        vec![BOOKING_ACK, FieldKey::Origin.spec().question]
    );
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
}

#[tokio::test(start_paused = true)]
async fn test_completion_event_follows_summary_after_delay() {
    let (ctl, sink) = controller_with(DialogueConfig {
        ack_delay: Duration::ZERO,
        ..DialogueConfig::default()
    });
    let _ = ctl.handle_utterance("بلیط");
    for answer in VALID_ANSWERS {
        let _ = ctl.handle_utterance(answer);
    }

    assert!(ctl.is_complete());
    assert!(sink.completions().is_empty());
    assert!(sink.prompts().last().unwrap().starts_with("عالی!"));

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(sink.completions().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_reset_cancels_pending_question() {
    let (ctl, sink) = controller_with(DialogueConfig::default());

    let _ = ctl.handle_utterance("بلیط");
    ctl.reset();
    assert_eq!(ctl.pending_continuations(), 0);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(sink.prompts(), vec![BOOKING_ACK]);
    assert_eq!(ctl.state(), DialogueState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_new_booking_cancels_pending_completion() {
    let (ctl, sink) = controller_with(DialogueConfig {
        ack_delay: Duration::ZERO,
        ..DialogueConfig::default()
    });
    let _ = ctl.handle_utterance("بلیط");
    for answer in VALID_ANSWERS {
        let _ = ctl.handle_utterance(answer);
    }

    // Restart before the completion event fires
    let _ = ctl.handle_utterance("رزرو جدید");
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(sink.completions().is_empty());
    assert_eq!(ctl.state(), DialogueState::AwaitingField(FieldKey::Origin));
    assert!(ctl.answers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_repeated_booking_intent_asks_once() {
    let (ctl, sink) = controller_with(DialogueConfig::default());

    let _ = ctl.handle_utterance("بلیط");
    tokio::time::sleep(Duration::from_millis(500)).await;
    let _ = ctl.handle_utterance("پرواز");
    tokio::time::sleep(Duration::from_secs(5)).await;

    let origin_questions = sink
        .prompts()
        .iter()
        .filter(|p| *p == FieldKey::Origin.spec().question)
        .count();
    assert_eq!(origin_questions, 1);
    assert_eq!(
        sink.prompts(),
        vec![BOOKING_ACK, BOOKING_ACK, FieldKey::Origin.spec().question]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dropped_controller_never_fires() {
    let (ctl, sink) = controller_with(DialogueConfig::default());

    let _ = ctl.handle_utterance("بلیط");
    drop(ctl);
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(sink.prompts(), vec![BOOKING_ACK]);
}
