/*!
UI layer: key resolution and frame composition.

- `keymap`: key event → chord → action, with context fallback.
- `render`: draws the shell's screen, popup, navigation bar and status bar.
*/

pub mod keymap;
pub mod render;

pub use keymap::{chord_from_key, entries_for_chain, resolve_action_with_fallback};
