//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::controller::{ControllerHandle, RefreshState};
use crate::environment::Environment;
use crate::events::Event as ControllerEvent;
use crate::ui::dashboard::{DashboardState, TableAction, render_dashboard};
use crate::ui::gated::render_gated;
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub page_size_options: Vec<usize>,
    /// Page size both tables start with; the first option when unset.
    pub initial_page_size: Option<usize>,
}

impl UIConfig {
    pub fn new(
        with_background_color: bool,
        page_size_options: Vec<usize>,
        initial_page_size: Option<usize>,
    ) -> Self {
        Self {
            with_background_color,
            page_size_options,
            initial_page_size,
        }
    }
}

/// The different screens in the application.
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Shown instead of the tables while the subscription is inactive.
    Gated,
    /// Dashboard screen displaying both arbitrage tables.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    /// The environment in which the application is running.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Receives events from the refresh controller.
    event_receiver: mpsc::Receiver<ControllerEvent>,

    /// Latest committed view-state.
    state_receiver: watch::Receiver<RefreshState>,

    /// Whether the subscription is currently active.
    access: bool,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        event_receiver: mpsc::Receiver<ControllerEvent>,
        state_receiver: watch::Receiver<RefreshState>,
        access: bool,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            environment,
            current_screen: Screen::Splash,
            event_receiver,
            state_receiver,
            access,
            ui_config,
        }
    }

    /// The screen matching the current access flag, leaving an up-to-date one alone.
    fn settle_screen(&mut self) {
        let on_dashboard = matches!(self.current_screen, Screen::Dashboard(_));
        let on_gated = matches!(self.current_screen, Screen::Gated);
        if self.access && !on_dashboard {
            let snapshot = self.state_receiver.borrow().clone();
            self.current_screen = Screen::Dashboard(Box::new(DashboardState::new(
                self.environment.clone(),
                self.start_time,
                snapshot,
                &self.ui_config,
            )));
        } else if !self.access && !on_gated {
            self.current_screen = Screen::Gated;
        }
    }
}

/// Maps a key on the dashboard to a table action.
fn table_action(code: KeyCode) -> Option<TableAction> {
    match code {
        KeyCode::Tab | KeyCode::BackTab => Some(TableAction::SwitchTable),
        KeyCode::Left => Some(TableAction::PreviousColumn),
        KeyCode::Right => Some(TableAction::NextColumn),
        KeyCode::Enter | KeyCode::Char('s') => Some(TableAction::ToggleSort),
        KeyCode::Char('n') | KeyCode::PageDown => Some(TableAction::NextPage),
        KeyCode::Char('p') | KeyCode::PageUp => Some(TableAction::PreviousPage),
        KeyCode::Char('z') => Some(TableAction::CyclePageSize),
        _ => None,
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    controller: &ControllerHandle,
) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Queue all incoming events for processing
        while let Ok(event) = app.event_receiver.try_recv() {
            if let Screen::Dashboard(state) = &mut app.current_screen {
                state.add_event(event);
            }
        }

        if let Screen::Dashboard(state) = &mut app.current_screen {
            let snapshot = app.state_receiver.borrow_and_update().clone();
            state.update(snapshot);
        }
        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-content transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.settle_screen();
                continue;
            }
        }

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                // Handle exit events
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    controller.shutdown();
                    return Ok(());
                }

                if let Screen::Dashboard(state) = &mut app.current_screen {
                    if key.code == KeyCode::Char('r') {
                        if !controller.trigger_refresh() {
                            log::debug!("manual refresh already queued");
                        }
                    } else if let Some(action) = table_action(key.code) {
                        state.apply(action);
                    }
                } else if matches!(app.current_screen, Screen::Splash) {
                    // Any key press will skip the splash screen
                    app.settle_screen();
                } else if key.code == KeyCode::Char('t') {
                    app.access = true;
                    controller.set_access(true);
                    app.settle_screen();
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Gated => render_gated(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}
