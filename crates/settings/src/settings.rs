/// A typed section of the settings file.
///
/// The implementing type is the section model itself: its `Default` is the
/// built-in value, and the user file only carries the fields that differ.
///
/// ```ignore
/// #[derive(Default, Serialize, Deserialize)]
/// struct Ui { tick_rate: f64 }
///
/// impl Settings for Ui {
///     const SECTION: &'static str = "ui";
/// }
/// ```
pub trait Settings: 'static + Send + Sync {
    /// Top-level table name inside the settings file.
    const SECTION: &'static str;

    fn name() -> &'static str {
        Self::SECTION
    }
}
