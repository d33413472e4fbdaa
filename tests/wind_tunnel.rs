use lbm_aero::d2q9::{Lattice, Simulation};
use lbm_aero::{Float, LbmError, CS_2};

const TOLERANCE: Float = 1e-12;

fn viscosity_for_tau(tau: Float) -> Float {
    CS_2 * (tau - 0.5)
}

#[test]
fn test_free_stream_is_steady_after_one_tick() {
    let mut simulation = Simulation::new(10, 10, viscosity_for_tau(0.6), [0.1, 0.0]).unwrap();
    assert!((simulation.lattice().tau - 0.6).abs() < TOLERANCE);
    assert!(simulation.advance());
    let lattice = simulation.lattice();
    for y in 1..9 {
        for x in 1..9 {
            let [ux, uy] = lattice.velocity_at(x, y);
            assert!((ux - 0.1).abs() < TOLERANCE, "ux = {ux} at ({x}, {y})");
            assert!(uy.abs() < TOLERANCE, "uy = {uy} at ({x}, {y})");
        }
    }
    assert!((lattice.total_density() - 100.0).abs() < 1e-10);
}

#[test]
fn test_solid_node_has_zero_velocity_after_one_tick() {
    let mut simulation = Simulation::new(10, 10, viscosity_for_tau(0.6), [0.1, 0.0]).unwrap();
    simulation.set_obstacle_origin([5, 5]);
    simulation.bind_obstacle(&[[0.0, 0.0]]).unwrap();
    simulation.advance();
    assert!(simulation.lattice().is_solid(5, 5));
    assert_eq!(simulation.lattice().velocity_at(5, 5), [0.0, 0.0]);
}

#[test]
fn test_mass_is_conserved_around_obstacle_before_wake_reaches_ring() {
    let mut simulation = Simulation::new(60, 60, viscosity_for_tau(0.7), [0.08, 0.0]).unwrap();
    simulation.set_obstacle_origin([30, 30]);
    let offsets: Vec<[Float; 2]> = (-3..=3)
        .flat_map(|dy| (-1..=1).map(move |dx| [dx as Float, dy as Float]))
        .collect();
    simulation.bind_obstacle(&offsets).unwrap();
    let initial = simulation.lattice().total_mass();
    for _ in 0..20 {
        simulation.advance();
    }
    let lattice = simulation.lattice();
    assert!((lattice.total_mass() - initial).abs() < 1e-9 * initial);
    let [ux, _] = lattice.velocity_at(27, 30);
    assert!((ux - 0.08).abs() > 1e-6);
}

#[test]
fn test_flow_around_obstacle_stays_finite_and_bounded() {
    let mut simulation = Simulation::new(60, 30, 0.02, [0.08, 0.0]).unwrap();
    simulation.set_obstacle_origin([15, 15]);
    let offsets: Vec<[Float; 2]> = (-3..=3)
        .flat_map(|dy| (-1..=1).map(move |dx| [dx as Float, dy as Float]))
        .collect();
    simulation.bind_obstacle(&offsets).unwrap();
    for _ in 0..200 {
        simulation.advance();
    }
    simulation.refresh_curl();
    let lattice = simulation.lattice();
    assert!(!lattice.curl_is_stale());
    assert!(lattice.velocity().iter().all(|u| u[0].is_finite() && u[1].is_finite()));
    assert!(lattice.pressure().iter().all(|p| p.is_finite() && *p > 0.0));
    assert!(lattice.curl().iter().any(|c| c.abs() > 1e-6));
    assert!(lattice
        .pressure_gradient()
        .iter()
        .any(|g| g[0].abs() > 1e-9 || g[1].abs() > 1e-9));
    for tracer in simulation.tracers() {
        assert!(tracer.position[0] >= 1.0 && tracer.position[0] <= 58.0);
        assert!(tracer.position[1] >= 1.0 && tracer.position[1] <= 28.0);
        let x = tracer.position[0].round() as usize;
        let y = tracer.position[1].round() as usize;
        assert!(!lattice.is_solid(x, y));
    }
}

#[test]
fn test_obstacle_change_resets_tracers_and_seeds() {
    let mut simulation = Simulation::new(40, 20, 0.02, [0.1, 0.0]).unwrap();
    let initial_tracers = simulation.tracers().to_vec();
    let initial_seeds = simulation.streamline_seeds().to_vec();
    for _ in 0..20 {
        simulation.advance();
    }
    assert_ne!(simulation.tracers(), initial_tracers.as_slice());
    simulation.set_obstacle_origin([20, 10]);
    simulation.bind_obstacle(&[[0.0, 0.0]]).unwrap();
    assert_eq!(simulation.tracers(), initial_tracers.as_slice());
    assert_eq!(simulation.streamline_seeds(), initial_seeds.as_slice());
}

#[test]
fn test_obstacle_in_margin_is_rejected() {
    let mut simulation = Simulation::new(20, 20, 0.02, [0.1, 0.0]).unwrap();
    simulation.set_obstacle_origin([18, 10]);
    let result = simulation.bind_obstacle(&[[0.0, 0.0]]);
    assert!(matches!(
        result,
        Err(LbmError::ObstacleOutOfBounds { x: 18, y: 10 })
    ));
    assert_eq!(simulation.lattice().number_of_solid_nodes(), 0);
}

#[test]
fn test_paused_simulation_keeps_state() {
    let mut simulation = Simulation::new(20, 12, 0.02, [0.1, 0.0]).unwrap();
    simulation.bind_obstacle(&[[0.0, 0.0]]).unwrap();
    simulation.advance();
    let before = simulation.lattice().distribution().to_vec();
    simulation.set_running(false);
    for _ in 0..5 {
        assert!(!simulation.advance());
    }
    assert_eq!(simulation.lattice().distribution(), before.as_slice());
    simulation.set_running(true);
    assert!(simulation.advance());
    assert_ne!(simulation.lattice().distribution(), before.as_slice());
}

#[test]
fn test_streamlines_follow_free_stream() {
    let simulation = Simulation::new(50, 20, 0.02, [0.1, 0.0]).unwrap();
    let streamlines = simulation.streamlines();
    assert_eq!(streamlines.len(), simulation.streamline_seeds().len());
    for (streamline, seed) in streamlines.iter().zip(simulation.streamline_seeds()) {
        assert_eq!(streamline[0], seed.origin());
        assert!(streamline.len() <= seed.max_steps() + 1);
        assert!(streamline
            .iter()
            .all(|p| (p[1] - seed.origin()[1]).abs() < TOLERANCE && p[0] <= 48.0));
    }
}
