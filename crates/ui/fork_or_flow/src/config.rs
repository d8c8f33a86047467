//! Settings sections of the terminal client and the store that holds them.
//!
//! Defaults are compiled in; the user file
//! (`<project_root>/fork_or_flow.settings.toml`) only carries what differs.

use std::collections::BTreeMap;
use std::path::Path;

use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use settings::{Settings, SettingsStore};

use crate::components::nav_bar::TABS;
use crate::theme::ColorMode;

pub const GLOBAL_CONTEXT: &str = "global";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Ticks per second.
    pub tick_rate: f64,
    /// Frames per second.
    pub frame_rate: f64,
    pub color_mode: ColorMode,
    pub show_status_bar: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate: 4.0,
            frame_rate: 30.0,
            color_mode: ColorMode::Auto,
            show_status_bar: true,
        }
    }
}

impl Settings for UiSettings {
    const SECTION: &'static str = "ui";
}

impl UiSettings {
    /// `(tick_rate, frame_rate)` with the command line overrides applied.
    /// Both must be finite and above zero.
    pub fn checked_rates(&self, tick: Option<f64>, frame: Option<f64>) -> Result<(f64, f64)> {
        Ok((
            positive_rate("tick_rate", tick.unwrap_or(self.tick_rate))?,
            positive_rate("frame_rate", frame.unwrap_or(self.frame_rate))?,
        ))
    }
}

fn positive_rate(name: &str, rate: f64) -> Result<f64> {
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(eyre!("ui.{name} must be greater than zero, got {rate}"))
    }
}

/// context -> action label -> chords
pub type Bindings = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeymapSettings {
    pub contexts: BTreeMap<String, Bindings>,
}

fn bindings(entries: &[(&str, &[&str])]) -> Bindings {
    entries
        .iter()
        .map(|(label, chords)| {
            (
                label.to_string(),
                chords.iter().map(|c| c.to_string()).collect(),
            )
        })
        .collect()
}

impl Default for KeymapSettings {
    fn default() -> Self {
        let mut global = bindings(&[
            ("Quit", &["q", "ctrl+c"]),
            ("NextTab", &["tab"]),
            ("PrevTab", &["shift+tab"]),
            ("Help", &["?", "f1"]),
            ("Suspend", &["ctrl+z"]),
            ("Back", &["esc"]),
        ]);
        for tab in TABS.iter() {
            global.insert(tab.action.to_string(), vec![tab.hotkey.to_string()]);
        }

        let mut contexts = BTreeMap::new();
        contexts.insert(GLOBAL_CONTEXT.to_string(), global);
        contexts.insert("onboarding".to_string(), bindings(&[("Back", &["esc"])]));
        contexts.insert("detail".to_string(), bindings(&[("Back", &["esc", "b"])]));
        contexts.insert("messages".to_string(), bindings(&[("Back", &["esc"])]));
        contexts.insert(
            "popup".to_string(),
            bindings(&[("Close", &["esc"]), ("Help", &["?"])]),
        );
        Self { contexts }
    }
}

impl Settings for KeymapSettings {
    const SECTION: &'static str = "keymap";
}

impl KeymapSettings {
    pub fn context(&self, name: &str) -> Option<&Bindings> {
        self.contexts.get(name)
    }

    /// Label bound to `chord` in `context`, if any.
    pub fn label_for(&self, context: &str, chord: &str) -> Option<&str> {
        self.context(context)?
            .iter()
            .find(|(_, chords)| chords.iter().any(|c| c == chord))
            .map(|(label, _)| label.as_str())
    }
}

/// One line per binding: `context  label  chord, chord`.
pub fn describe_keymap(keymap: &KeymapSettings) -> String {
    let mut out = String::new();
    for (context, bindings) in &keymap.contexts {
        for (label, chords) in bindings {
            out.push_str(&format!("{context:<12}{label:<12}{}\n", chords.join(", ")));
        }
    }
    out
}

/// `describe_keymap` for the keymap section currently held by `store`.
pub fn keymap_report(store: &SettingsStore) -> Result<String> {
    let keymap = store.get::<KeymapSettings>()?;
    Ok(describe_keymap(&keymap))
}

/// Open the user delta file and register every section.
pub fn build_settings_store(settings_file: &Path) -> Result<SettingsStore> {
    let store = SettingsStore::builder()
        .with_settings_file(settings_file)
        .build()?;
    store.register::<UiSettings>()?;
    store.register::<KeymapSettings>()?;
    tracing::debug!(file = %settings_file.display(), "settings loaded");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn temp_settings(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("fork_or_flow_{name}_{nanos}.settings.toml"))
    }

    #[test]
    fn defaults_without_user_file() {
        let store = build_settings_store(&temp_settings("defaults")).unwrap();
        let ui = store.get::<UiSettings>().unwrap();
        assert_eq!(*ui, UiSettings::default());
        let keymap = store.get::<KeymapSettings>().unwrap();
        assert_eq!(keymap.label_for("global", "q"), Some("Quit"));
        assert_eq!(keymap.label_for("global", "3"), Some("GoFeed"));
        assert_eq!(keymap.label_for("detail", "b"), Some("Back"));
        assert_eq!(keymap.label_for("people", "q"), None);
    }

    #[test]
    fn user_delta_overrides_single_binding() {
        let path = temp_settings("delta");
        std::fs::write(
            &path,
            "[ui]\nframe_rate = 60.0\n\n[keymap.contexts.global]\nQuit = [\"ctrl+q\"]\n",
        )
        .unwrap();
        let store = build_settings_store(&path).unwrap();

        let ui = store.get::<UiSettings>().unwrap();
        assert_eq!(ui.frame_rate, 60.0);
        assert_eq!(ui.tick_rate, 4.0);

        let keymap = store.get::<KeymapSettings>().unwrap();
        assert_eq!(keymap.label_for("global", "ctrl+q"), Some("Quit"));
        assert_eq!(keymap.label_for("global", "q"), None);
        // untouched labels keep their defaults
        assert_eq!(keymap.label_for("global", "tab"), Some("NextTab"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn describe_lists_every_context() {
        let text = describe_keymap(&KeymapSettings::default());
        assert!(text.lines().any(|l| l.starts_with("global") && l.contains("ctrl+c")));
        assert!(text.lines().any(|l| l.starts_with("detail") && l.ends_with("esc, b")));
        assert!(text.lines().any(|l| l.starts_with("popup") && l.contains("Close")));
    }

    #[test]
    fn non_positive_rates_from_the_file_are_rejected() {
        let path = temp_settings("zero_rate");
        std::fs::write(&path, "[ui]\nframe_rate = 0.0\ntick_rate = -1.0\n").unwrap();
        let store = build_settings_store(&path).unwrap();
        let ui = store.get::<UiSettings>().unwrap();

        let err = ui.checked_rates(None, None).unwrap_err();
        assert!(err.to_string().contains("tick_rate"));
        assert!(ui.checked_rates(Some(4.0), None).is_err());
        // valid overrides replace the bad values
        assert_eq!(ui.checked_rates(Some(4.0), Some(30.0)).unwrap(), (4.0, 30.0));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn default_rates_pass_and_overrides_win() {
        let ui = UiSettings::default();
        assert_eq!(ui.checked_rates(None, None).unwrap(), (4.0, 30.0));
        assert_eq!(ui.checked_rates(Some(10.0), None).unwrap(), (10.0, 30.0));
        assert!(ui.checked_rates(Some(f64::NAN), None).is_err());
        assert!(ui.checked_rates(None, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn keymap_report_reads_the_store() {
        let store = build_settings_store(&temp_settings("report")).unwrap();
        let report = keymap_report(&store).unwrap();
        assert_eq!(report, describe_keymap(&KeymapSettings::default()));
    }

    #[test]
    fn color_mode_reads_lowercase_names() {
        let path = temp_settings("color");
        std::fs::write(&path, "[ui]\ncolor_mode = \"ansi256\"\n").unwrap();
        let store = build_settings_store(&path).unwrap();
        assert_eq!(store.get::<UiSettings>().unwrap().color_mode, ColorMode::Ansi256);
        let _ = std::fs::remove_file(path);
    }
}
