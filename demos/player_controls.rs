//! Media Player Overlay
//!
//! This example wires the overlay of a video player to a coordinator:
//!
//! - Controls appear on pointer movement and hide after 2.5s of rest
//! - The settings panel and the mute button are plain toggles
//! - The volume slider reconciles muting without re-running handlers
//! - Hovering the settings panel freezes the controls open
//!
//! Run with: RUST_LOG=debug cargo run --example player_controls

use statecoord::builder::toggle;
use statecoord::state_enum;
use statecoord::{Coordinator, CoordinatorConfig, TokioScheduler, TransitionRule};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Visibility {
        Collapsed => "collapsed",
        Visible => "visible",
    }
}

state_enum! {
    enum Muting {
        Unmuted => "unmuted",
        Muted => "muted",
    }
}

const CONTROLS: &str = "controls";
const SETTINGS: &str = "settings";
const MUTED: &str = "player-muted";

fn register(coordinator: &Coordinator) -> Result<(), Box<dyn Error>> {
    coordinator
        .machine(CONTROLS)
        .initial(Visibility::Collapsed)
        .rule(
            TransitionRule::new(Visibility::Collapsed, Visibility::Visible)
                .handle(|| println!("  [cursor] shown")),
        )
        .rule(
            TransitionRule::new(Visibility::Visible, Visibility::Collapsed)
                .delay(Duration::from_millis(2500))
                .handle(|| println!("  [cursor] hidden")),
        )
        .register()?;

    // Opening settings hides the controls without triggering their handlers.
    let reconcile = coordinator.clone();
    coordinator
        .machine(SETTINGS)
        .initial(Visibility::Collapsed)
        .rule(
            TransitionRule::new(Visibility::Collapsed, Visibility::Visible)
                .try_handle(move || Ok(reconcile.set_state(CONTROLS, Visibility::Collapsed)?)),
        )
        .rule(TransitionRule::new(Visibility::Visible, Visibility::Collapsed))
        .register()?;

    let mut muting = toggle(Muting::Unmuted, Muting::Muted);
    muting[0] = muting[0].clone().handle(|| println!("  [audio] volume -> 0"));
    muting[1] = muting[1].clone().handle(|| println!("  [audio] volume restored"));
    coordinator.register(MUTED, muting, Muting::Unmuted)?;

    Ok(())
}

fn print_state(coordinator: &Coordinator, label: &str) -> Result<(), Box<dyn Error>> {
    println!(
        "{label}: controls={} settings={} muted={}",
        coordinator.get_state(CONTROLS)?,
        coordinator.get_state(SETTINGS)?,
        coordinator.get_state(MUTED)?,
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    println!("=== Media Player Overlay ===\n");

    let coordinator = Coordinator::with_config(
        Arc::new(TokioScheduler::current()?),
        CoordinatorConfig::default().with_debug(true),
    );
    register(&coordinator)?;
    print_state(&coordinator, "Initial")?;

    println!("\n1. Pointer moves for a second");
    for _ in 0..4 {
        let outcome = coordinator.transition(CONTROLS, Visibility::Visible)?;
        println!("  pointer move -> {outcome}");
        sleep(Duration::from_millis(250)).await;
    }
    print_state(&coordinator, "After movement")?;

    println!("\n2. Pointer rests for 3s");
    sleep(Duration::from_secs(3)).await;
    print_state(&coordinator, "After rest")?;

    println!("\n3. Hovering settings freezes the controls");
    coordinator.lock(CONTROLS, Visibility::Visible)?;
    sleep(Duration::from_secs(3)).await;
    let outcome = coordinator.transition(CONTROLS, Visibility::Collapsed)?;
    println!("  collapse request -> {outcome}");
    print_state(&coordinator, "Frozen")?;

    println!("\n4. Leaving settings unfreezes them");
    coordinator.unlock(CONTROLS)?;
    coordinator.transition(CONTROLS, Visibility::Collapsed)?;
    print_state(&coordinator, "Unfrozen")?;

    println!("\n5. Opening settings");
    coordinator.transition(CONTROLS, Visibility::Visible)?;
    coordinator.transition(SETTINGS, Visibility::Visible)?;
    print_state(&coordinator, "Settings open")?;

    println!("\n6. Mute button, then volume slider");
    coordinator.transition(MUTED, Muting::Muted)?;
    coordinator.set_state(MUTED, Muting::Unmuted)?;
    print_state(&coordinator, "Volume restored")?;

    println!("\n7. History of the controls");
    for record in coordinator.history(CONTROLS)? {
        println!("  {} -> {} ({})", record.from, record.to, record.cause);
    }

    println!("\n8. Snapshot");
    println!("{}", coordinator.snapshot(CONTROLS)?.to_json()?);

    coordinator.shutdown();
    println!("\n=== Example Complete ===");
    Ok(())
}
