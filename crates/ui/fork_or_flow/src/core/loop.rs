use color_eyre::Result;
use ratatui::layout::Rect;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, trace};

use crate::{
    action::Action,
    core::app::App,
    tui::{Event, Tui},
};

/// The terminal event loop.
///
/// Owns the `Tui` while borrowing the `App`:
/// - terminal events → `Shell::handle_event` → action channel
/// - action channel → `Shell::update` (follow-ups go back into the channel)
/// - drawing on `Render` and `Resize`
/// - suspend/resume and quit
pub struct AppLoop<'a> {
    app: &'a mut App,
    tui: Tui,
}

impl<'a> AppLoop<'a> {
    pub fn new(app: &'a mut App) -> Result<Self> {
        let tui = Self::make_tui(app)?;
        Ok(Self { app, tui })
    }

    fn make_tui(app: &App) -> Result<Tui> {
        Ok(Tui::new()?
            .tick_rate(app.tick_rate)
            .frame_rate(app.frame_rate)
            .paste(true))
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

        self.tui.enter()?;

        loop {
            // 1. terminal events → actions
            if let Some(event) = self.tui.next_event().await {
                if !matches!(event, Event::Tick | Event::Render) {
                    trace!(?event, "event");
                }
                for action in self.app.shell.handle_event(&event)? {
                    action_tx.send(action).ok();
                }
            }

            // 2. drain the action channel
            while let Ok(action) = action_rx.try_recv() {
                match action {
                    Action::Resize(w, h) => {
                        self.tui.resize(Rect::new(0, 0, w, h))?;
                        self.draw(&action_tx)?;
                    }
                    Action::Render => self.draw(&action_tx)?,
                    _ => {}
                }
                for next in self.app.shell.update(action)? {
                    action_tx.send(next).ok();
                }
            }

            // 3. lifecycle
            if self.app.shell.should_suspend() {
                debug!("suspending");
                self.tui.suspend()?;
                self.tui.resume()?;
                action_tx.send(Action::Resume).ok();
            } else if self.app.shell.should_quit() {
                self.tui.stop()?;
                break;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn draw(&mut self, action_tx: &UnboundedSender<Action>) -> Result<()> {
        let app = &mut *self.app;
        self.tui.draw(|frame| {
            if let Err(err) = app.render(frame) {
                action_tx
                    .send(Action::Error(format!("Failed to draw: {err:?}")))
                    .ok();
            }
        })?;
        Ok(())
    }
}
