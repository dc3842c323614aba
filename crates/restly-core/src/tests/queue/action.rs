use crate::{Action, Command, SessionParams};

/// WHAT: Wire tags match the consumer's vocabulary
/// WHY: A renamed tag would silently stop the backend from reacting
#[test]
fn given_each_action_when_rendered_then_tag_matches_vocabulary() {
    // Given/When: Rendering every action
    let tags: Vec<_> = Action::ALL.iter().map(|a| a.to_string()).collect();

    // Then: Tags are the fixed vocabulary, in menu order
    assert_eq!(
        tags,
        ["set_session", "toggle_pause", "summarize_day", "nl_command"]
    );
}

/// WHAT: Tags round-trip through from_tag, unknown tags do not
/// WHY: The control page resolves actions by tag
#[test]
fn given_tag_when_looked_up_then_known_tags_resolve() {
    // Given/When/Then: Known tags resolve to themselves
    for action in Action::ALL {
        assert_eq!(Action::from_tag(action.as_str()), Some(action));
    }
    assert_eq!(Action::from_tag("reschedule_break"), None);
    assert_eq!(Action::from_tag(""), None);
}

/// WHAT: Typed commands report the action they are recorded under
/// WHY: submit relies on this mapping to pick the tag
#[test]
fn given_typed_commands_when_asked_for_action_then_matching_tag() {
    // Given/When/Then
    assert_eq!(
        Command::SetSession(SessionParams::default()).action(),
        Action::SetSession
    );
    assert_eq!(Command::TogglePause.action(), Action::TogglePause);
    assert_eq!(Command::SummarizeDay.action(), Action::SummarizeDay);
    assert_eq!(Command::nl("hi").action(), Action::NlCommand);
}

/// WHAT: Default session is 45 minutes of deep work
/// WHY: Matches the tray's quick-start entry
#[test]
fn given_default_session_params_when_inspected_then_45_minute_deep_work() {
    // Given/When
    let params = SessionParams::default();

    // Then
    assert_eq!(params.duration_minutes, 45);
    assert_eq!(params.session_type, "deep_work");
}
