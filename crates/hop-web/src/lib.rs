pub mod runner;

pub use runner::GameRunner;

// Re-exported for the generated exports.
pub use hop_engine;
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `with_runner()` helper function
/// - The wasm-bindgen exports (game_init, game_tick, key handlers, record accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use hop_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// hop_web::export_game!(MyGame, "my-game");
/// ```
///
/// The calling crate must depend on `wasm-bindgen`, `log`, `console_log`
/// and `console_error_panic_hook`.
///
/// Page side, per `requestAnimationFrame`: call `game_tick()`, then copy
/// the floats at `get_record_ptr()` (layout in `hop_engine::bridge::protocol`)
/// onto the mesh.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                let runner = borrow.as_mut().expect("Game not initialized. Call game_init() first.");
                f(runner)
            })
        }

        fn install_runner() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
        }

        #[wasm_bindgen]
        pub fn game_init() {
            install_runner();
            with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_init_with_config(json: &str) {
            install_runner();
            with_runner(|r| r.init_with_json(json));
            log::info!("{}: initialized from config", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick() {
            with_runner(|r| r.tick());
        }

        /// `code` is a DOM `KeyboardEvent.code`, e.g. `"KeyW"` or `"Space"`.
        #[wasm_bindgen]
        pub fn game_key_down(code: &str) {
            with_runner(|r| r.key_down(code));
        }

        #[wasm_bindgen]
        pub fn game_key_up(code: &str) {
            with_runner(|r| r.key_up(code));
        }

        #[wasm_bindgen]
        pub fn game_blur() {
            with_runner(|r| r.blur());
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_record_ptr() -> *const f32 {
            with_runner(|r| r.record_ptr())
        }

        /// Copy of the current record, for pages that do not share memory.
        #[wasm_bindgen]
        pub fn get_record() -> $crate::js_sys::Float32Array {
            with_runner(|r| $crate::js_sys::Float32Array::from(r.record().as_floats()))
        }

        #[wasm_bindgen]
        pub fn get_record_floats() -> u32 {
            $crate::hop_engine::FRAME_RECORD_FLOATS as u32
        }

        #[wasm_bindgen]
        pub fn get_protocol_version() -> f32 {
            $crate::hop_engine::PROTOCOL_VERSION
        }

        #[wasm_bindgen]
        pub fn get_frame_count() -> u32 {
            with_runner(|r| r.frame_count())
        }
    };
}
