//! Property-based tests for task kind selection

use proptest::prelude::*;

use protonvpn_gui_core::task::{TaskError, TaskKind};

proptest! {
    /// Keys are case- and whitespace-insensitive
    #[test]
    fn known_keys_parse_in_any_case(
        key in prop_oneof![Just("gtask"), Just("native"), Just("worker"), Just("thread")],
        upper in any::<bool>(),
        pad in " {0,3}",
    ) {
        let raw = if upper { key.to_uppercase() } else { key.to_string() };
        let parsed: TaskKind = format!("{pad}{raw}{pad}").parse().unwrap();
        let expected = if matches!(key, "gtask" | "native") {
            TaskKind::Native
        } else {
            TaskKind::Worker
        };
        prop_assert_eq!(parsed, expected);
    }

    /// Anything else is rejected rather than silently defaulted
    #[test]
    fn unknown_keys_are_rejected(key in "[a-z]{1,12}") {
        prop_assume!(!matches!(key.as_str(), "gtask" | "native" | "worker" | "thread"));
        prop_assert_eq!(key.parse::<TaskKind>(), Err(TaskError::UnknownKind(key.clone())));
    }

    /// Display output parses back to the same kind
    #[test]
    fn key_round_trips(native in any::<bool>()) {
        let kind = if native { TaskKind::Native } else { TaskKind::Worker };
        prop_assert_eq!(kind.to_string().parse::<TaskKind>(), Ok(kind));
    }
}
