use crate::reports;
use clap::Args;
use steady_core::bridge::MemoryBridge;
use steady_core::config::Config;
use steady_core::controller::AssistanceController;
use steady_core::error::SaResult;
use steady_core::scheduler::VirtualClock;
use steady_core::simulation::{sample_page, SimulationParams, TremorSimulator};
use steady_core::storage::{PersistedState, StorageWrite};
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub config: Config,

    #[command(flatten)]
    pub sim: SimulationParams,
}

pub fn run(args: DemoArgs, config: Config) -> SaResult<()> {
    // The session reads its switches back from storage on start.
    let mut state = PersistedState::default();
    StorageWrite::Config(config.assist.clone()).apply_to(&mut state);

    let mut controller = AssistanceController::new(
        sample_page(),
        VirtualClock::new(),
        MemoryBridge::with_state(state),
        config,
    );
    controller.start();
    if !controller.is_attached() {
        warn!("Assistance is disabled; the demo will run without any help");
    }

    info!(
        "Simulating severity {} at {}x speed",
        args.sim.severity, args.sim.playback_speed
    );
    let mut simulator = TremorSimulator::new(args.sim);
    let report = simulator.play(&mut controller);

    println!("\n=== STEADY ASSIST DEMO ===");
    reports::print_demo_outcomes(&report);
    reports::print_session_summary(&report, controller.bridge());
    Ok(())
}
