/*!
Key → action resolution.

Two independent steps:
- `chord_from_key` turns a crossterm `KeyEvent` into a normalised chord string
  (`"ctrl+c"`, `"shift+tab"`, `"enter"`, `"q"`).
- `resolve_action_with_fallback` looks the chord up in the keymap settings
  along a context chain (most specific first, `global` last) and maps the
  first bound label through `action_for_label`.

Labels are plain strings in the settings file so users can rebind without
touching code. Unknown labels are skipped, which lets a lower context still
answer for the same chord.
*/

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::config::KeymapSettings;
use crate::core::intent::Intent;
use crate::core::state::Tab;

/// Stateless label → action table.
pub fn action_for_label(label: &str) -> Option<Action> {
    let action = match label {
        "Quit" => Action::RequestQuit,
        "Help" => Action::Help,
        "Suspend" => Action::Suspend,
        "Back" => Action::Back,
        "Close" => Action::ClosePopup,
        "NextTab" => Intent::NextTab.into(),
        "PrevTab" => Intent::PrevTab.into(),
        "GoHome" => Intent::ChangeTab(Tab::Home).into(),
        "GoPeople" => Intent::ChangeTab(Tab::People).into(),
        "GoFeed" => Intent::ChangeTab(Tab::Feed).into(),
        "GoMessages" => Intent::ChangeTab(Tab::Messages).into(),
        _ => return None,
    };
    Some(action)
}

/// Normalise a key event into the chord notation used by the settings file.
pub fn chord_from_key(key: KeyEvent) -> Option<String> {
    let (key_str, include_shift) = match key.code {
        KeyCode::Enter => ("enter".to_string(), true),
        KeyCode::Tab => ("tab".to_string(), true),
        KeyCode::BackTab => ("tab".to_string(), true),
        KeyCode::Backspace => ("backspace".to_string(), true),
        KeyCode::Esc => ("esc".to_string(), true),
        KeyCode::Up => ("up".to_string(), true),
        KeyCode::Down => ("down".to_string(), true),
        KeyCode::Left => ("left".to_string(), true),
        KeyCode::Right => ("right".to_string(), true),
        KeyCode::Home => ("home".to_string(), true),
        KeyCode::End => ("end".to_string(), true),
        KeyCode::PageUp => ("pageup".to_string(), true),
        KeyCode::PageDown => ("pagedown".to_string(), true),
        KeyCode::F(n) => (format!("f{n}"), true),
        KeyCode::Char(' ') => ("space".to_string(), true),
        // the character already carries shift ('?' vs '/', 'Q' vs 'q')
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            (ch.to_ascii_lowercase().to_string(), false)
        }
        KeyCode::Char(ch) => (ch.to_string(), false),
        _ => return None,
    };

    let m = key.modifiers;
    let shift = key.code == KeyCode::BackTab || (include_shift && m.contains(KeyModifiers::SHIFT));
    let mut mods: Vec<&str> = Vec::new();
    if m.contains(KeyModifiers::CONTROL) {
        mods.push("ctrl");
    }
    if shift {
        mods.push("shift");
    }
    if m.contains(KeyModifiers::ALT) {
        mods.push("alt");
    }
    if m.contains(KeyModifiers::SUPER) {
        mods.push("meta");
    }

    Some(if mods.is_empty() {
        key_str
    } else {
        format!("{}+{}", mods.join("+"), key_str)
    })
}

/// Resolve a key along `context_chain` (most specific first).
pub fn resolve_action_with_fallback(
    keymap: &KeymapSettings,
    context_chain: &[&str],
    key: KeyEvent,
) -> Option<Action> {
    let chord = chord_from_key(key)?;
    context_chain
        .iter()
        .filter_map(|ctx| keymap.label_for(ctx, &chord))
        .find_map(action_for_label)
}

/// `(label, chords)` pairs of every context in the chain, most specific
/// binding first; a label shadowed by an earlier context is listed once.
pub fn entries_for_chain(
    keymap: &KeymapSettings,
    context_chain: &[&str],
) -> Vec<(String, Vec<String>)> {
    let mut out: Vec<(String, Vec<String>)> = Vec::new();
    for ctx in context_chain {
        let Some(bindings) = keymap.context(ctx) else {
            continue;
        };
        for (label, chords) in bindings {
            if action_for_label(label).is_none() || out.iter().any(|(l, _)| l == label) {
                continue;
            }
            out.push((label.clone(), chords.clone()));
        }
    }
    out
}
