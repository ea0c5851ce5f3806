//! Property-based tests for timers, context merges, history and resume.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::{Duration as ChronoDuration, Utc};
use proptest::prelude::*;
use std::time::Duration;
use vigil::core::{Context, State, StateHistory, StateTransition, TimerRegistry};
use vigil::scenarios::{resume_target, CommandContext, CommandContextPatch, CommandState};
use vigil::StateError;

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8, index in 0..8usize) -> CommandState {
        match variant {
            0 => CommandState::OpenInput,
            1 => CommandState::StartCheck,
            2 => CommandState::CheckCommand(index),
            _ => CommandState::CloseInput,
        }
    }
}

fn titles(len: usize) -> Vec<String> {
    (0..len).map(|i| format!("Foo: Command {i}")).collect()
}

proptest! {
    #[test]
    fn timer_elapses_exactly_at_its_duration(
        duration_ms in 0u64..20_000,
        offset_ms in 0i64..40_000,
    ) {
        let created = Utc::now();
        let mut timers = TimerRegistry::new();
        timers.create(CommandState::OpenInput, Duration::from_millis(duration_ms), created);

        let now = created + ChronoDuration::milliseconds(offset_ms);
        prop_assert!(timers.has_timer(&CommandState::OpenInput));
        prop_assert_eq!(
            timers.has_elapsed(&CommandState::OpenInput, now),
            offset_ms as u64 >= duration_ms
        );
    }

    #[test]
    fn missing_timer_never_elapses(state in arbitrary_state(), offset_ms in 0i64..100_000) {
        let timers: TimerRegistry<CommandState> = TimerRegistry::new();
        let now = Utc::now() + ChronoDuration::milliseconds(offset_ms);
        prop_assert!(!timers.has_timer(&state));
        prop_assert!(!timers.has_elapsed(&state, now));
    }

    #[test]
    fn recreating_a_timer_replaces_it(first_ms in 1u64..10_000, second_ms in 1u64..10_000) {
        let start = Utc::now();
        let later = start + ChronoDuration::milliseconds(first_ms as i64);
        let mut timers = TimerRegistry::new();
        timers.create(CommandState::OpenInput, Duration::from_millis(first_ms), start);
        timers.create(CommandState::OpenInput, Duration::from_millis(second_ms), later);

        prop_assert_eq!(timers.len(), 1);
        prop_assert!(!timers.has_elapsed(
            &CommandState::OpenInput,
            later + ChronoDuration::milliseconds(second_ms as i64 - 1)
        ));
    }

    #[test]
    fn index_patch_keeps_the_command_list(len in 0usize..10, index in 0usize..20) {
        let mut context = CommandContext::new(titles(len));
        context.merge(CommandContextPatch::index(index));

        prop_assert_eq!(context.index, index);
        prop_assert_eq!(context.commands, titles(len));
    }

    #[test]
    fn empty_patch_changes_nothing(len in 0usize..10, index in 0usize..20) {
        let mut context = CommandContext { commands: titles(len), index };
        let before = context.clone();
        context.merge(CommandContextPatch::default());
        prop_assert_eq!(context, before);
    }

    #[test]
    fn resume_lands_on_the_current_check(len in 1usize..20, index in 0usize..25) {
        let context = CommandContext { commands: titles(len), index };

        match resume_target(&context) {
            Ok(CommandState::StartCheck) => prop_assert_eq!(index, 0),
            Ok(CommandState::CheckCommand(k)) => {
                prop_assert_eq!(k, index);
                prop_assert!(index > 0 && index < len);
            }
            Ok(CommandState::CloseInput) => prop_assert_eq!(index, len),
            Ok(other) => prop_assert!(false, "unexpected target {:?}", other),
            Err(StateError::ResumeOutOfRange { index: i, len: l }) => {
                prop_assert!(index > len);
                prop_assert_eq!((i, l), (index, len));
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn state_name_is_stable(state in arbitrary_state()) {
        prop_assert_eq!(state.name(), state.name());
    }

    #[test]
    fn history_preserves_order(
        transitions in prop::collection::vec(arbitrary_state(), 1..10)
    ) {
        let mut history = StateHistory::new();
        let mut expected_path = vec![CommandState::OpenInput];

        for (i, to_state) in transitions.iter().enumerate() {
            let from_state = if i == 0 {
                CommandState::OpenInput
            } else {
                transitions[i - 1]
            };

            history = history.record(StateTransition {
                from: from_state,
                to: *to_state,
                timestamp: Utc::now(),
                attempt: i,
            });
            expected_path.push(*to_state);
        }

        let path = history.get_path();
        prop_assert_eq!(path.len(), expected_path.len());
        for (state, expected) in path.iter().zip(&expected_path) {
            prop_assert_eq!(*state, expected);
        }
    }

    #[test]
    fn history_record_is_pure(from in arbitrary_state(), to in arbitrary_state()) {
        let history = StateHistory::new();
        let next = history.record(StateTransition {
            from,
            to,
            timestamp: Utc::now(),
            attempt: 1,
        });

        prop_assert_eq!(history.transitions().len(), 0);
        prop_assert_eq!(next.transitions().len(), 1);
    }

    #[test]
    fn history_roundtrip_serialization(
        transitions in prop::collection::vec(arbitrary_state(), 0..5)
    ) {
        let mut history = StateHistory::new();
        for pair in transitions.windows(2) {
            history = history.record(StateTransition {
                from: pair[0],
                to: pair[1],
                timestamp: Utc::now(),
                attempt: 0,
            });
        }

        let json = serde_json::to_string(&history).unwrap();
        let restored: StateHistory<CommandState> = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(history.get_path(), restored.get_path());
    }
}
