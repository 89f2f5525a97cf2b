//! Session setup and initialization

use crate::config::Config;
use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::controller::{ControllerConfig, ControllerHandle, spawn_controller};
use crate::environment::Environment;
use crate::events::Event;
use crate::feeds::FeedClient;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for controller events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Handle to the running refresh controller
    pub controller: ControllerHandle,
    /// API deployment the feeds are read from
    pub environment: Environment,
    /// Resolved configuration the session was started with
    pub config: Config,
}

/// Sets up a dashboard session
///
/// This function handles the setup shared by every mode:
/// 1. Builds the feed client for the configured environment
/// 2. Creates the event channel
/// 3. Spawns the refresh controller with the configured access flag
///
/// # Arguments
/// * `config` - Resolved and validated configuration
/// * `shutdown` - Token cancelled when the session should end
///
/// # Returns
/// * `Ok(SessionData)` - Successfully set up session
/// * `Err` - Session setup failed
pub fn setup_session(
    config: Config,
    shutdown: CancellationToken,
) -> Result<SessionData, Box<dyn Error>> {
    let environment = config.environment()?;
    let feed = FeedClient::new(environment.clone())?;

    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let controller = spawn_controller(
        Arc::new(feed),
        ControllerConfig {
            refresh_interval: config.refresh_interval(),
            access: config.subscription_active,
        },
        event_sender,
        shutdown,
    );

    Ok(SessionData {
        event_receiver,
        controller,
        environment,
        config,
    })
}
