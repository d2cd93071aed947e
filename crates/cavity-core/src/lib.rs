pub mod game_trait;
pub mod input;

pub use game_trait::{FrameGame, GameMetadata};
pub use input::{InputState, LogicalInput};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game_trait::FrameGame;
    use crate::input::InputState;

    /// Input with every logical input held.
    pub fn all_held() -> InputState {
        InputState {
            left: true,
            right: true,
            jump: true,
        }
    }

    /// Run N frames with the same held input, returning all accumulated events.
    pub fn run_frames<G: FrameGame>(game: &mut G, n: usize, input: &InputState) -> Vec<G::Event> {
        let mut all_events = Vec::new();
        for _ in 0..n {
            all_events.extend(game.advance_frame(input));
        }
        all_events
    }

    /// Run frames from a list of `(frame_count, input)` segments.
    pub fn run_script<G: FrameGame>(game: &mut G, script: &[(usize, InputState)]) -> Vec<G::Event> {
        let mut all_events = Vec::new();
        for (frames, input) in script {
            all_events.extend(run_frames(game, *frames, input));
        }
        all_events
    }

    // ================================================================
    // Frame Game Contract Tests
    // ================================================================
    // These functions form a generic test suite that every FrameGame
    // implementation must pass. Game crates call them from their own
    // #[cfg(test)] modules with a concrete game instance.

    /// start_run() must produce a live run with a zeroed frame counter.
    pub fn contract_start_run_resets<G: FrameGame>(game: &mut G) {
        run_frames(game, 5, &InputState::default());
        game.start_run();
        assert_eq!(game.frame_count(), 0, "start_run must reset the frame counter");
        assert!(!game.is_finished(), "a fresh run must not be finished");
    }

    /// advance_frame() on a live run must bump the frame counter by one.
    pub fn contract_advance_counts_frames<G: FrameGame>(game: &mut G) {
        assert!(!game.is_finished(), "contract requires a live run");
        let before = game.frame_count();
        game.advance_frame(&InputState::default());
        assert_eq!(
            game.frame_count(),
            before + 1,
            "advance_frame must count exactly one frame"
        );
    }

    /// Two runs fed identical input must produce identical snapshots.
    pub fn contract_deterministic<G: FrameGame>(
        a: &mut G,
        b: &mut G,
        script: &[(usize, InputState)],
    ) {
        a.start_run();
        b.start_run();
        run_script(a, script);
        run_script(b, script);
        assert_eq!(
            a.snapshot(),
            b.snapshot(),
            "identical input must produce identical state"
        );
    }

    /// A finished run must ignore further frames entirely.
    pub fn contract_finished_is_frozen<G: FrameGame>(game: &mut G) {
        assert!(game.is_finished(), "contract requires a finished run");
        let before = game.snapshot();
        let frames = game.frame_count();
        let events = run_frames(game, 30, &all_held());
        assert!(events.is_empty(), "a finished run must not emit events");
        assert_eq!(game.frame_count(), frames, "a finished run must not count frames");
        assert_eq!(before, game.snapshot(), "state must not change after the run ends");
    }
}
