//! Chat shell behavior: transcript, state transitions and startup halts.

mod common;

use common::{agent, config, initializer, RecordingView, Script, ScriptedProvider, Step};
use pretty_assertions::assert_eq;
use roci_search::agent::AgentDescriptor;
use roci_search::config::SearchConfig;
use roci_search::context::{Backend, SessionInitializer};
use roci_search::error::SearchError;
use roci_search::shell::{
    ChatMessage, ChatRole, ChatShell, ShellOptions, ShellState, TerminalView, MISSING_KEY_MESSAGE,
};

fn shell_with(
    scripts: Vec<Script>,
    options: ShellOptions,
) -> (ChatShell<RecordingView>, RecordingView) {
    let view = RecordingView::default();
    let provider = ScriptedProvider::with_scripts(scripts);
    let shell = ChatShell::start_with(initializer(config(), provider), options, view.clone())
        .expect("shell should start");
    (shell, view)
}

#[test]
fn startup_renders_an_empty_idle_page() {
    let (shell, view) = shell_with(vec![], ShellOptions::default());

    let frames = view.frames();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].transcript.is_empty());
    assert_eq!(frames[0].state, ShellState::Idle);
    assert_eq!(frames[0].sidebar.model, "gemini-2.0-flash-exp");
    assert_eq!(frames[0].sidebar.session_suffix, None);
    assert_eq!(shell.state(), ShellState::Idle);
}

#[test]
fn submission_appends_user_then_assistant() {
    let (mut shell, view) = shell_with(
        vec![Script::text(&["Paris is the capital of France."])],
        ShellOptions::default(),
    );

    let reply = shell
        .submit("What is the capital of France?")
        .unwrap()
        .cloned();

    assert_eq!(
        reply,
        Some(ChatMessage::assistant("Paris is the capital of France."))
    );
    assert_eq!(
        shell.transcript(),
        &[
            ChatMessage::user("What is the capital of France?"),
            ChatMessage::assistant("Paris is the capital of France."),
        ]
    );

    let frames = view.frames();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[1].state, ShellState::Busy);
    assert_eq!(frames[1].transcript, vec![ChatMessage::user("What is the capital of France?")]);
    assert_eq!(frames[2].state, ShellState::Idle);
    assert_eq!(frames[2].transcript.len(), 2);
}

#[test]
fn user_entry_keeps_raw_input() {
    let (mut shell, _) = shell_with(vec![], ShellOptions::default());

    shell.submit("  spaced question?  ").unwrap();

    assert_eq!(shell.transcript()[0].content, "  spaced question?  ");
    assert_eq!(shell.transcript()[0].role, ChatRole::User);
}

#[test]
fn runner_fault_is_rendered_as_assistant_turn() {
    let (mut shell, view) = shell_with(
        vec![Script::Steps(vec![Step::Fail("network unreachable")])],
        ShellOptions::default(),
    );

    shell.submit("What is the capital of France?").unwrap();

    let last = shell.transcript().last().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert_eq!(last.content, "Error: Stream error: network unreachable");
    assert_eq!(shell.state(), ShellState::Idle);
    assert!(view.errors().is_empty());
}

#[test]
fn blank_input_is_ignored() {
    let (mut shell, view) = shell_with(vec![], ShellOptions::default());

    assert!(shell.submit("   ").unwrap().is_none());
    assert!(shell.transcript().is_empty());
    assert_eq!(view.frames().len(), 1);
}

#[test]
fn session_is_stable_across_turns_and_shown_when_requested() {
    let (mut shell, view) = shell_with(
        vec![Script::text(&["one"]), Script::text(&["two"])],
        ShellOptions { show_session: true },
    );
    let id = shell.session_id().cloned().unwrap();

    shell.submit("first").unwrap();
    shell.submit("second").unwrap();

    assert_eq!(shell.session_id(), Some(&id));
    assert_eq!(shell.transcript().len(), 4);
    let suffix = id.suffix(8).to_string();
    assert!(view
        .frames()
        .iter()
        .all(|f| f.sidebar.session_suffix.as_deref() == Some(suffix.as_str())));
}

#[test]
fn invalidated_context_is_rebuilt_under_same_session() {
    let (mut shell, _) = shell_with(
        vec![Script::text(&["one"]), Script::text(&["two"])],
        ShellOptions::default(),
    );
    let id = shell.session_id().cloned().unwrap();

    shell.submit("first").unwrap();
    shell.invalidate_context();
    let reply = shell.submit("second").unwrap().cloned().unwrap();

    assert_eq!(reply.content, "two");
    assert_eq!(shell.session_id(), Some(&id));
}

#[test]
fn reset_clears_the_transcript() {
    let (mut shell, view) = shell_with(vec![Script::text(&["one"])], ShellOptions::default());
    shell.submit("first").unwrap();

    shell.reset().unwrap();

    assert!(shell.transcript().is_empty());
    assert!(view.frames().last().unwrap().transcript.is_empty());
}

#[test]
fn missing_credential_halts_before_any_input_is_rendered() {
    let view = RecordingView::default();
    let provider = ScriptedProvider::new();

    let result = ChatShell::start_with(
        initializer(SearchConfig::new(), provider.clone()),
        ShellOptions::default(),
        view.clone(),
    );

    assert!(matches!(result, Err(SearchError::MissingCredential(_))));
    assert_eq!(view.errors(), vec![MISSING_KEY_MESSAGE.to_string()]);
    assert!(view.frames().is_empty());
    assert!(provider.requests().is_empty());
}

#[test]
fn initialization_failure_halts_with_message() {
    let view = RecordingView::default();
    let init = SessionInitializer::new(config(), agent()).with_backend(Box::new(
        |_: &SearchConfig, _: &AgentDescriptor| -> Result<Backend, SearchError> {
            Err(SearchError::Configuration("store offline".into()))
        },
    ));

    let result = ChatShell::start_with(init, ShellOptions::default(), view.clone());

    assert!(result.is_err());
    assert_eq!(
        view.errors(),
        vec!["Initialization failed: Configuration error: store offline".to_string()]
    );
    assert!(view.frames().is_empty());
}

#[test]
fn terminal_view_shows_both_turn_entries() {
    let provider = ScriptedProvider::with_scripts(vec![Script::text(&["Paris."])]);
    let mut shell = ChatShell::start_with(
        initializer(config(), provider),
        ShellOptions::default(),
        TerminalView::new(Vec::new()),
    )
    .unwrap();

    shell.submit("What is the capital of France?").unwrap();

    let output = String::from_utf8(shell.view().get_ref().clone()).unwrap();
    assert!(output.contains("You: What is the capital of France?"));
    assert!(output.contains("Searching..."));
    assert!(output.contains("Assistant: Paris."));
}
