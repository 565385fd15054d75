//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_event() -> impl Strategy<Value = GameEvent> {
    prop_oneof![
        Just(GameEvent::Cipher1Solved),
        Just(GameEvent::Puzzle2Solved),
        Just(GameEvent::SecureChannelOpen),
        Just(GameEvent::Unrecognized),
    ]
}

fn arb_state() -> impl Strategy<Value = GameState> {
    (
        0u32..4,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(act, cipher1_active, cipher1_solved, have_drive, puzzle2_solved, secure_channel_open)| {
                GameState {
                    act,
                    cipher1_active,
                    cipher1_solved,
                    have_drive,
                    puzzle2_solved,
                    secure_channel_open,
                }
            },
        )
}

/// Flags other than `cipher1_active`, which is allowed to clear
fn latches(state: &GameState) -> [bool; 4] {
    [
        state.cipher1_solved,
        state.have_drive,
        state.puzzle2_solved,
        state.secure_channel_open,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // Applying an event twice equals applying it once
    #[test]
    fn prop_apply_is_idempotent(state in arb_state(), event in arb_event()) {
        let once = apply(&state, event);
        let twice = apply(&once, event);
        prop_assert_eq!(once, twice);
    }

    // No event ever clears a latch
    #[test]
    fn prop_flags_never_regress(
        state in arb_state(),
        events in proptest::collection::vec(arb_event(), 0..20),
    ) {
        let mut current = state;
        for event in events {
            let next = apply(&current, event);
            for (before, after) in latches(&current).into_iter().zip(latches(&next)) {
                prop_assert!(!before || after, "latch cleared by {:?}", event);
            }
            prop_assert_eq!(next.act, current.act, "events never touch act");
            current = next;
        }
    }

    // cipher1_active clears exactly when cipher1_solved is applied
    #[test]
    fn prop_cipher_active_only_cleared_by_solve(state in arb_state(), event in arb_event()) {
        let next = apply(&state, event);
        if state.cipher1_active && !next.cipher1_active {
            prop_assert_eq!(event, GameEvent::Cipher1Solved);
        }
        if event == GameEvent::Cipher1Solved {
            prop_assert!(!next.cipher1_active);
        } else {
            prop_assert_eq!(next.cipher1_active, state.cipher1_active);
        }
    }

    // Act transition fires iff all three puzzles are done in Act I
    #[test]
    fn prop_act_transition_iff_predicate(state in arb_state()) {
        let expected = state.act == 1
            && state.cipher1_solved
            && state.puzzle2_solved
            && state.secure_channel_open;
        let advanced = check_act_transition(&state);
        prop_assert_eq!(advanced.is_some(), expected);
        if let Some(next) = advanced {
            prop_assert_eq!(next.act, 2);
            prop_assert_eq!(latches(&next), latches(&state));
        }
    }

    // Once advanced, re-checking never fires again
    #[test]
    fn prop_act_transition_at_most_once(
        state in arb_state(),
        events in proptest::collection::vec(arb_event(), 0..10),
    ) {
        let mut current = state;
        let mut fired = 0;
        for event in events {
            current = apply(&current, event);
            if let Some(next) = check_act_transition(&current) {
                fired += 1;
                current = next;
            }
        }
        prop_assert!(fired <= 1);
    }

    // Order of distinct events does not matter for the final snapshot
    #[test]
    fn prop_apply_all_is_order_independent(
        state in arb_state(),
        events in proptest::collection::vec(arb_event(), 0..10),
    ) {
        let forward = apply_all(&state, events.iter().copied());
        let backward = apply_all(&state, events.iter().rev().copied());
        prop_assert_eq!(forward, backward);
    }
}
