use std::collections::HashSet;

use tidechat_store::{
    fold_response, merge_with_history, partition_new, plan_context,
    ContextPlan, MessageRole, TranscriptMessage,
};

fn history(n: usize) -> Vec<TranscriptMessage> {
    (0..n)
        .map(|i| {
            if i % 2 == 0 {
                TranscriptMessage::user(format!("question {}", i))
            } else {
                TranscriptMessage::assistant(format!("answer {}", i))
            }
        })
        .collect()
}

#[test]
fn test_empty_submission_is_rejected() {
    assert_eq!(plan_context(&[]), ContextPlan::Reject);
}

#[test]
fn test_single_message_submission_loads_history() {
    let submitted = vec![TranscriptMessage::user("hi")];
    assert_eq!(plan_context(&submitted), ContextPlan::LoadHistory);
}

#[test]
fn test_multi_message_submission_is_used_as_is() {
    // The client already holds full context; history is not consulted
    assert_eq!(plan_context(&history(3)), ContextPlan::UseSubmitted);
    assert_eq!(plan_context(&history(2)), ContextPlan::UseSubmitted);
}

#[test]
fn test_merge_appends_single_message_to_history() {
    let stored = history(5);
    let stored_ids: Vec<String> = stored.iter().map(|m| m.id.clone()).collect();
    let newest = TranscriptMessage::user("hi");
    let newest_id = newest.id.clone();

    let merged = merge_with_history(stored, vec![newest]);

    assert_eq!(merged.len(), 6);
    for (i, id) in stored_ids.iter().enumerate() {
        assert_eq!(&merged[i].id, id);
    }
    assert_eq!(merged[5].id, newest_id);
}

#[test]
fn test_merge_with_empty_history() {
    let newest = TranscriptMessage::user("first ever");
    let merged = merge_with_history(Vec::new(), vec![newest.clone()]);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].id, newest.id);
}

#[test]
fn test_fold_response_appends_assistant_messages() {
    let prior = vec![TranscriptMessage::user("hi")];
    let folded = fold_response(prior, vec!["hello".to_string()]);

    assert_eq!(folded.len(), 2);
    assert_eq!(folded[0].role, MessageRole::User);
    assert_eq!(folded[1].role, MessageRole::Assistant);
    assert_eq!(folded[1].content.to_plain_text(), "hello");
}

#[test]
fn test_fold_response_assigns_unique_ids() {
    let folded = fold_response(
        vec![TranscriptMessage::user("hi")],
        vec!["a".to_string(), "b".to_string()],
    );

    let ids: HashSet<&str> = folded.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 3);
}

#[test]
fn test_fold_response_preserves_generation_order() {
    let folded = fold_response(
        Vec::new(),
        vec!["first".to_string(), "second".to_string(), "third".to_string()],
    );

    let texts: Vec<String> = folded.iter().map(|m| m.content.to_plain_text()).collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[test]
fn test_fold_response_with_no_generated_messages() {
    let prior = vec![TranscriptMessage::user("hi")];
    let folded = fold_response(prior.clone(), Vec::new());

    assert_eq!(folded.len(), 1);
    assert_eq!(folded[0].id, prior[0].id);
}

#[test]
fn test_partition_new_skips_persisted_ids() {
    let messages = history(5);
    let existing: HashSet<String> = messages[..3].iter().map(|m| m.id.clone()).collect();

    let fresh = partition_new(&messages, &existing);

    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh[0].id, messages[3].id);
    assert_eq!(fresh[1].id, messages[4].id);
}

#[test]
fn test_partition_new_all_persisted_is_empty() {
    let messages = history(4);
    let existing: HashSet<String> = messages.iter().map(|m| m.id.clone()).collect();

    assert!(partition_new(&messages, &existing).is_empty());
}

#[test]
fn test_partition_new_preserves_candidate_order() {
    let messages = history(6);
    // Knock out every other message
    let existing: HashSet<String> = messages
        .iter()
        .step_by(2)
        .map(|m| m.id.clone())
        .collect();

    let fresh = partition_new(&messages, &existing);

    assert_eq!(fresh.len(), 3);
    assert_eq!(fresh[0].id, messages[1].id);
    assert_eq!(fresh[1].id, messages[3].id);
    assert_eq!(fresh[2].id, messages[5].id);
}

#[test]
fn test_partition_new_dedup_is_by_id_not_content() {
    let persisted = TranscriptMessage::user("same text");
    let duplicate_text = TranscriptMessage::user("same text");

    let existing: HashSet<String> = [persisted.id.clone()].into();
    let candidate = vec![persisted, duplicate_text.clone()];

    let fresh = partition_new(&candidate, &existing);

    // Identical content under a different id is still a new message
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].id, duplicate_text.id);
}
