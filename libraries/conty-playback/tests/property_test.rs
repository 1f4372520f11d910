//! Property-based tests for the navigation engine
//!
//! Random button presses and player reports must never leave the engine
//! with an empty or out-of-range selection, or advance twice on one
//! completion.

mod test_helpers;

use conty_playback::{PlayerSignal, PlayerState};
use proptest::prelude::*;
use test_helpers::*;

#[derive(Debug, Clone)]
enum Input {
    Select(usize),
    Ok,
    Home,
    Pause,
    Resume,
    /// Completion report for the n-th most recent play request
    Complete(usize),
    Fail(usize),
}

fn arbitrary_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        (0usize..3).prop_map(Input::Select),
        Just(Input::Ok),
        Just(Input::Home),
        Just(Input::Pause),
        Just(Input::Resume),
        (0usize..3).prop_map(Input::Complete),
        (0usize..3).prop_map(Input::Fail),
    ]
}

fn recent_token(shared: &Shared, back: usize) -> Option<conty_playback::SegmentToken> {
    let recorder = shared.lock().unwrap();
    let plays = &recorder.plays;
    plays
        .len()
        .checked_sub(back + 1)
        .map(|index| plays[index].1)
}

proptest! {
    #[test]
    fn prop_selection_stays_in_range(inputs in prop::collection::vec(arbitrary_input(), 1..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (mut engine, shared) = engine();
        runtime.block_on(engine.start_pack("menu")).unwrap();

        for input in inputs {
            let plays_before = shared.lock().unwrap().plays.len();
            match input {
                Input::Select(index) => {
                    engine.select(index).ok();
                }
                Input::Ok => engine.advance_ok().unwrap(),
                Input::Home => engine.advance_home().unwrap(),
                Input::Pause => {
                    engine.pause();
                }
                Input::Resume => {
                    engine.resume();
                }
                Input::Complete(back) | Input::Fail(back) => {
                    let Some(token) = recent_token(&shared, back) else { continue };
                    let signal = match input {
                        Input::Fail(_) => PlayerSignal::Failed { token, message: "boom".into() },
                        _ => PlayerSignal::Completed(token),
                    };
                    send(&shared, signal);
                    engine.pump().unwrap();
                    // one report starts at most one new stage
                    prop_assert!(shared.lock().unwrap().plays.len() <= plays_before + 1);
                }
            }

            prop_assert!(engine.is_active());
            let state = engine.state().unwrap();
            prop_assert!(!state.stages.is_empty());
            prop_assert!(state.selected_index < state.stages.len());
            if state.player_state != PlayerState::Stopped {
                prop_assert!(engine.has_live_player());
            }
        }
    }
}
