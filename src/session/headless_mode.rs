//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::controller::RefreshState;
use crate::table::text::render_text;
use crate::table::{pair_table, track_table};
use crate::{logging, print_cmd_warn};
use std::error::Error;

/// Runs the application in headless mode
///
/// This function handles:
/// 1. Console event logging
/// 2. Printing both tables after every successful refresh
/// 3. Ctrl+C shutdown handling
///
/// # Arguments
/// * `session` - Session data from setup
/// * `page_size` - Rows printed per table
pub async fn run_headless_mode(
    mut session: SessionData,
    page_size: usize,
) -> Result<(), Box<dyn Error>> {
    logging::init_headless_logger();
    print_session_starting("headless", &session.environment);
    if !session.config.subscription_active {
        print_cmd_warn!(
            "Subscription inactive",
            "No data will be fetched until the subscription is active."
        );
    }

    // Trigger shutdown on Ctrl+C
    let shutdown = session.controller.shutdown_token();
    let ctrl_c_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_shutdown.cancel();
        }
    });

    let mut state_receiver = session.controller.subscribe();
    let mut printed_generation = 0;

    // Event loop: log events and print fresh data until shutdown
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", event);
                }
            }
            changed = state_receiver.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state_receiver.borrow_and_update().clone();
                if snapshot.generation != printed_generation {
                    printed_generation = snapshot.generation;
                    print_tables(&snapshot, page_size);
                }
            }
        }
    }

    print_session_shutdown();
    session.controller.join().await;
    print_session_exit_success();

    Ok(())
}

/// Prints the first page of both tables in their default order.
pub fn print_tables(snapshot: &RefreshState, page_size: usize) {
    let pairs = pair_table(&[page_size]);
    let track = track_table(&[page_size]);
    println!("ArbiPair");
    print!(
        "{}",
        render_text(&pairs, &snapshot.arbi_pair_data, snapshot.loading)
    );
    println!();
    println!("ArbiTrack");
    print!(
        "{}",
        render_text(&track, &snapshot.arbi_track_data, snapshot.loading)
    );
}
