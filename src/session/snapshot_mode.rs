//! One-shot snapshot: a single refresh cycle printed as text

use super::SessionData;
use super::headless_mode::print_tables;
use crate::controller::{RefreshPhase, RefreshState};
use std::error::Error;
use tokio::sync::watch;

/// Runs one refresh cycle, prints both tables and stops the controller.
///
/// # Returns
/// * `Err` - The cycle failed; the error names the feed that failed
pub async fn run_snapshot_mode(session: SessionData, limit: usize) -> Result<(), Box<dyn Error>> {
    let mut state_receiver = session.controller.subscribe();
    let outcome = wait_for_cycle(&mut state_receiver).await;
    session.controller.shutdown();
    session.controller.join().await;

    let snapshot = outcome?;
    print_tables(&snapshot, limit);
    match snapshot.error {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

/// Waits for the first completed cycle, successful or not.
async fn wait_for_cycle(
    receiver: &mut watch::Receiver<RefreshState>,
) -> Result<RefreshState, Box<dyn Error>> {
    loop {
        {
            let state = receiver.borrow_and_update();
            match state.phase {
                RefreshPhase::Ready | RefreshPhase::Errored => return Ok(state.clone()),
                RefreshPhase::GatedOff => {
                    return Err("You need an active subscription to access this content.".into());
                }
                RefreshPhase::Idle | RefreshPhase::Refreshing => {}
            }
        }
        receiver
            .changed()
            .await
            .map_err(|_| "refresh controller stopped before completing a cycle")?;
    }
}
