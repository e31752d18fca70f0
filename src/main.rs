use raycast_vehicle::physics::{PhysicsWorld, ARCADE_CHASSIS};
use raycast_vehicle::state::InputState;
use raycast_vehicle::{DriveType, VehicleConfig, VehicleCurves};

use tokio::time::{interval, Duration};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PLAYER: &str = "player";
const DEFAULT_TICKS: u64 = 600;

/// Scripted driver: launch, carve right, lift, brake to a stop.
fn scripted_input(tick: u64, brake_button: &str) -> InputState {
    let mut input = InputState::new();
    let (throttle, steer, brake) = match tick {
        0..=59 => (0.0, 0.0, false),     // settle on the springs
        60..=239 => (1.0, 0.0, false),
        240..=359 => (1.0, 0.6, false),
        360..=419 => (0.0, 0.0, false),
        _ => (0.0, 0.0, true),
    };
    input.set_axes(throttle, steer);
    input.set_button(brake_button, brake);
    input
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let drive = args.next().map(|s| DriveType::from_name(&s)).unwrap_or_default();
    let ticks = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_TICKS);

    info!(drive = drive.as_str(), ticks, "starting raycast vehicle demo");

    // Fixed timestep: ~60 Hz
    let dt = 1.0 / 60.0;
    let mut world = PhysicsWorld::new(dt);

    let config = VehicleConfig::preset(drive);
    world.spawn_vehicle(
        PLAYER,
        [0.0, ARCADE_CHASSIS.spawn_height, 0.0],
        config,
        VehicleCurves::arcade()?,
        &ARCADE_CHASSIS,
    )?;

    let mut ticker = interval(Duration::from_millis(16));

    for tick in 0..ticks {
        ticker.tick().await;

        world.set_input(PLAYER, scripted_input(tick, config.brake_button))?;
        world.step();

        if world.tick % 60 == 0 {
            let s = world.vehicle_snapshot(PLAYER)?;
            info!(
                tick = s.tick,
                x = s.position[0],
                y = s.position[1],
                z = s.position[2],
                speed = s.forward_speed,
                steer_deg = s.steer_angle.to_degrees(),
                grounded = s.grounded_wheels,
                forces = world.debug_overlay.forces.len(),
                "snapshot"
            );
        }
    }

    println!("{}", serde_json::to_string_pretty(&world.snapshot())?);

    Ok(())
}
