use std::sync::Arc;

use app::{AppContext, Application};
use color_eyre::Result;
use settings::SettingsStore;
use tracing::info;

use crate::{
    cli::Cli,
    config::{build_settings_store, KeymapSettings, UiSettings},
    core::shell::Shell,
    data::Catalog,
    tui::Frame,
};

/// Application wiring: paths and logging (`AppContext`), the settings store,
/// the mock catalog and the shell.
pub struct App {
    pub context: AppContext,
    pub settings: SettingsStore,
    pub shell: Shell,
    pub tick_rate: f64,
    pub frame_rate: f64,
}

impl Application for App {
    const APP_ID: &'static str = "fork_or_flow";
    const LOG_ENV: Option<&'static str> = Some("FORK_OR_FLOW_LOG");
}

impl App {
    pub fn new(context: AppContext, cli: &Cli) -> Result<Self> {
        let settings_file = context.path_context().settings_file(None);
        let settings = build_settings_store(&settings_file)?;
        let ui = settings.get::<UiSettings>()?;
        let keymap = settings.get::<KeymapSettings>()?;

        let catalog = Arc::new(Catalog::embedded()?);
        info!(
            people = catalog.people.len(),
            events = catalog.events.len(),
            posts = catalog.posts.len(),
            conversations = catalog.conversations.len(),
            "catalog loaded"
        );

        let (tick_rate, frame_rate) = ui.checked_rates(cli.tick_rate, cli.frame_rate)?;
        let shell = Shell::new(catalog, (*keymap).clone(), (*ui).clone())?;

        Ok(Self {
            context,
            settings,
            shell,
            tick_rate,
            frame_rate,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!(
            app = self.context.app_id(),
            version = self.context.version(),
            tick_rate = self.tick_rate,
            frame_rate = self.frame_rate,
            "starting"
        );
        crate::core::r#loop::AppLoop::new(self)?.run().await
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        crate::ui::render::render(&mut self.shell, frame)
    }
}
