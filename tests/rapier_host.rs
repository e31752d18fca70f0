//! End-to-end runs of the rapier host: a 1 kg chassis on four raycast wheels
//! over a flat ground whose top face is y = 0.

use approx::assert_relative_eq;

use raycast_vehicle::arcade_tire::LayerMask;
use raycast_vehicle::physics::{PhysicsWorld, ARCADE_CHASSIS};
use raycast_vehicle::state::InputState;
use raycast_vehicle::vehicle::ARCADE_4WD;
use raycast_vehicle::{ConfigError, DriveType, VehicleConfig, VehicleCurves};

const DT: f32 = 1.0 / 60.0;

fn world_with(id: &str, config: VehicleConfig) -> PhysicsWorld {
    let mut world = PhysicsWorld::new(DT);
    world
        .spawn_vehicle(
            id,
            [0.0, ARCADE_CHASSIS.spawn_height, 0.0],
            config,
            VehicleCurves::arcade().unwrap(),
            &ARCADE_CHASSIS,
        )
        .unwrap();
    world
}

fn run(world: &mut PhysicsWorld, id: &str, ticks: usize, throttle: f32, brake: bool) {
    for _ in 0..ticks {
        let mut input = InputState::new();
        input.set_axes(throttle, 0.0);
        input.set_button("Jump", brake);
        world.set_input(id, input).unwrap();
        world.step();
    }
}

#[test]
fn idle_car_settles_on_its_springs() {
    let mut world = world_with("car", ARCADE_4WD);
    run(&mut world, "car", 240, 0.0, false);

    let s = world.vehicle_snapshot("car").unwrap();
    assert_eq!(s.tick, 240);
    assert_eq!(s.grounded_wheels, 4);

    // 4 * k * (rest - d) = m * g  ->  d = 0.5 - 9.81 / 40; mounts sit 0.1 below origin
    let expected = 0.5 - 9.81 / 40.0 + 0.1;
    assert_relative_eq!(s.position[1], expected, epsilon = 0.02);
    assert!(s.velocity.iter().all(|v| v.abs() < 0.05));
}

#[test]
fn throttle_then_brake() {
    let mut world = world_with("car", ARCADE_4WD);
    run(&mut world, "car", 120, 0.0, false);

    run(&mut world, "car", 60, 1.0, false);
    let fast = world.vehicle_snapshot("car").unwrap().forward_speed;
    assert!(fast > 2.0, "forward speed after throttle: {fast}");

    run(&mut world, "car", 30, 0.0, true);
    let slowed = world.vehicle_snapshot("car").unwrap().forward_speed;
    assert!(slowed < fast, "brake did not slow the car: {fast} -> {slowed}");
}

#[test]
fn every_drive_type_moves_forward() {
    for drive in [DriveType::FrontWheelDrive, DriveType::BackWheelDrive, DriveType::FourWheelDrive] {
        let mut world = world_with("car", VehicleConfig { drive_type: drive, ..ARCADE_4WD });
        run(&mut world, "car", 120, 0.0, false);
        run(&mut world, "car", 60, 1.0, false);

        let s = world.vehicle_snapshot("car").unwrap();
        assert!(s.forward_speed > 1.0, "{drive:?}: {}", s.forward_speed);
    }
}

#[test]
fn wheels_ignore_ground_outside_their_mask() {
    let cfg = VehicleConfig { ray_mask: LayerMask::layer(3), ..ARCADE_4WD };
    let mut world = world_with("car", cfg);
    run(&mut world, "car", 30, 1.0, false);

    let s = world.vehicle_snapshot("car").unwrap();
    assert_eq!(s.grounded_wheels, 0);
    assert!(world.debug_overlay.forces.is_empty());
    assert_eq!(world.debug_overlay.rays.len(), 8);
}

#[test]
fn overlay_holds_the_last_step_only() {
    let mut world = world_with("car", ARCADE_4WD);
    run(&mut world, "car", 90, 1.0, false);

    // 4 suspension rays + 4 drive rays
    assert_eq!(world.debug_overlay.rays.len(), 8);
    assert_eq!(world.debug_overlay.bases.len(), 4);
}

#[test]
fn invalid_config_is_rejected_at_spawn() {
    let mut world = PhysicsWorld::new(DT);
    let err = world
        .spawn_vehicle(
            "car",
            [0.0, 1.0, 0.0],
            VehicleConfig { max_speed: 0.0, ..ARCADE_4WD },
            VehicleCurves::arcade().unwrap(),
            &ARCADE_CHASSIS,
        )
        .unwrap_err();

    assert_eq!(err, ConfigError::NonPositive { field: "max_speed", value: 0.0 });
    assert!(world.vehicles.is_empty());
}

#[test]
fn unknown_vehicle_ids_error() {
    let mut world = PhysicsWorld::new(DT);
    let unknown = ConfigError::UnknownVehicle { id: "ghost".into() };

    assert_eq!(world.set_input("ghost", InputState::new()), Err(unknown.clone()));
    assert_eq!(world.vehicle_snapshot("ghost").map(|_| ()), Err(unknown.clone()));
    assert_eq!(world.despawn_vehicle("ghost"), Err(unknown));
}

#[test]
fn respawn_replaces_and_snapshot_is_sorted() {
    let mut world = world_with("b", ARCADE_4WD);
    world
        .spawn_vehicle("a", [5.0, 0.8, 0.0], ARCADE_4WD, VehicleCurves::arcade().unwrap(), &ARCADE_CHASSIS)
        .unwrap();
    let bodies_before = world.bodies.len();

    world
        .spawn_vehicle("b", [-5.0, 0.8, 0.0], ARCADE_4WD, VehicleCurves::arcade().unwrap(), &ARCADE_CHASSIS)
        .unwrap();
    assert_eq!(world.bodies.len(), bodies_before);

    world.step();
    let snap = world.snapshot();
    let ids: Vec<&str> = snap.vehicles.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert!(snap.vehicles[1].position[0] < 0.0);

    world.despawn_vehicle("a").unwrap();
    assert_eq!(world.snapshot().vehicles.len(), 1);
}
