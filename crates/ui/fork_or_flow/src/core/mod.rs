//! Core of the client: state, intents, the reducer and the shell that ties
//! them to screens.
//!
//!   - `state`   : `RootState`, `SessionViewState` and the derived `View`
//!   - `intent`  : requests the reducer understands
//!   - `reducer` : intents → state transitions plus `Effect`s
//!   - `effects` : declarative side effects
//!   - `shell`   : event routing, action dispatch, screen swapping
//!   - `app`     : application wiring (settings, catalog, logging)
//!   - `loop`    : the terminal event loop
pub mod app;
pub mod effects;
pub mod intent;
pub mod r#loop;
pub mod reducer;
pub mod shell;
pub mod state;
