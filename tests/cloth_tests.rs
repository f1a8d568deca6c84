use weft::{
    ClothConfig, ClothNetwork, Edge, Floor, ForceConfig, Frame, NoOpStepObserver, Obstacles,
    Pulse, Sphere, StepObserver, StepStats, Vec3,
};

fn run_steps(
    cloth: &mut ClothNetwork<f32>,
    steps: usize,
    forces: &ForceConfig<f32>,
    obstacles: &Obstacles<f32>,
) {
    let mut frame = Frame::new(0.0, 1.0 / 60.0);
    for _ in 0..steps {
        cloth.step(frame, forces, obstacles, &mut NoOpStepObserver);
        frame = frame.next();
    }
}

#[test]
fn cloth_drapes_over_sphere() {
    let config = ClothConfig::new()
        .with_grid(10, 10)
        .with_span(250.0)
        .with_origin(Vec3::new(-125.0, 100.0, -125.0))
        .with_relaxation_passes(2);
    let mut cloth = ClothNetwork::new(config).unwrap();
    let sphere = Sphere::new(Vec3::new(0.0, 0.0, 0.0), 60.0);
    let obstacles = Obstacles::none().with_floor(Floor::new(-250.0)).with_sphere(sphere);

    run_steps(&mut cloth, 90, &ForceConfig::new(), &obstacles);

    for p in cloth.particles() {
        assert!(p.position.distance(sphere.center) >= sphere.radius - 1e-3);
        assert!(p.position.y >= -247.0 - 1e-3);
    }
    let centre = cloth.particle(5, 5).unwrap().position;
    assert!(centre.y > 0.0 && centre.y < 100.0, "centre at {:?}", centre);
    let corner = cloth.particle(0, 0).unwrap().position;
    assert!(corner.y < centre.y, "corners should hang below the top of the sphere");
}

#[test]
fn cloth_comes_to_rest_on_floor() {
    let config = ClothConfig::new().with_grid(6, 6).with_origin(Vec3::new(0.0, 50.0, 0.0));
    let mut cloth = ClothNetwork::new(config).unwrap();
    let obstacles = Obstacles::none().with_floor(Floor::new(0.0));
    run_steps(&mut cloth, 240, &ForceConfig::new(), &obstacles);
    for p in cloth.particles() {
        assert!(p.position.y >= 3.0 - 1e-4, "y = {}", p.position.y);
        assert!(p.position.y < 50.0);
    }
}

#[test]
fn wave_propagates_to_free_edge() {
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(10, 10)).unwrap();
    let forces = ForceConfig::none().with_wave(Edge::Near, 20.0, 0.5);
    let mut frame = Frame::new(0.0, 1.0 / 60.0);
    let mut far_edge_moved = false;
    for _ in 0..90 {
        cloth.step(frame, &forces, &Obstacles::none(), &mut NoOpStepObserver);
        frame = frame.next();
        if cloth.particle(3, 10).unwrap().position.y.abs() > 1e-3 {
            far_edge_moved = true;
        }
    }
    assert!(far_edge_moved, "constraint network never carried the wave to the far edge");
}

#[test]
fn wind_blows_sheet_along_normal() {
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(6, 6)).unwrap();
    let forces = ForceConfig::none().with_wind(Vec3::new(0.0, 1.0, 0.0), 10.0);
    run_steps(&mut cloth, 10, &forces, &Obstacles::none());
    for p in cloth.particles() {
        assert!(p.position.y > 0.0);
    }
}

#[test]
fn rain_pushes_sheet_down() {
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(8, 8)).unwrap();
    let forces = ForceConfig::none().with_rain(4.0, 5);
    run_steps(&mut cloth, 30, &forces, &Obstacles::none());
    let mean_y: f32 = cloth.positions().iter().map(|p| p.y).sum::<f32>() / cloth.particle_count() as f32;
    assert!(mean_y < 0.0, "mean height {}", mean_y);
}

#[test]
fn custom_force_runs_only_when_enabled() {
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(4, 4)).unwrap();
    cloth.set_custom_force(Box::new(Pulse::new(10.0, 0, 1.0)));
    let obstacles = Obstacles::none();

    run_steps(&mut cloth, 1, &ForceConfig::none(), &obstacles);
    assert!(cloth.positions().iter().all(|p| p.y == 0.0));

    run_steps(&mut cloth, 1, &ForceConfig::none().with_custom(true), &obstacles);
    assert!(cloth.particle(0, 0).unwrap().position.y > 0.0);

    cloth.clear_custom_force();
    cloth.reset();
    run_steps(&mut cloth, 1, &ForceConfig::none().with_custom(true), &obstacles);
    assert!(cloth.positions().iter().all(|p| p.y == 0.0));
}

#[test]
fn impulse_sets_particle_in_motion() {
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(4, 4)).unwrap();
    cloth.apply_impulse(2, 2, Vec3::new(0.0, 5.0, 0.0)).unwrap();
    run_steps(&mut cloth, 1, &ForceConfig::none(), &Obstacles::none());
    assert!(cloth.particle(2, 2).unwrap().position.y > 0.0);
    assert!(cloth.particle(2, 3).unwrap().position.y > 0.0, "springs should lift the neighbour");
}

#[test]
fn extra_relaxation_passes_stiffen_cloth() {
    let strain = |passes: usize| {
        let config = ClothConfig::new().with_grid(8, 8).with_relaxation_passes(passes);
        let mut cloth: ClothNetwork<f32> = ClothNetwork::new(config).unwrap();
        cloth.apply_impulse(4, 4, Vec3::new(0.0, 40.0, 0.0)).unwrap();
        run_steps(&mut cloth, 1, &ForceConfig::none(), &Obstacles::none());
        cloth.max_strain()
    };
    assert!(strain(8) < strain(1));
}

#[derive(Default)]
struct Recorder {
    forces: usize,
    integrations: usize,
    passes: Vec<usize>,
    collisions: usize,
    completed: Vec<StepStats>,
}

impl StepObserver for Recorder {
    fn on_forces_applied(&mut self) { self.forces += 1; }
    fn on_integrate(&mut self) { self.integrations += 1; }
    fn on_constraint_iteration(&mut self, pass: usize) { self.passes.push(pass); }
    fn on_collisions_resolved(&mut self) { self.collisions += 1; }
    fn on_step_complete(&mut self, stats: &StepStats) { self.completed.push(*stats); }
}

#[test]
fn observer_sees_every_phase() {
    let config = ClothConfig::new().with_grid(3, 3).with_relaxation_passes(3);
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(config).unwrap();
    let obstacles = Obstacles::none().with_floor(Floor::new(0.0));
    let mut recorder = Recorder::default();
    let stats = cloth.step(Frame::new(0.0, 0.016), &ForceConfig::new(), &obstacles, &mut recorder);

    assert_eq!(recorder.forces, 1);
    assert_eq!(recorder.integrations, 1);
    assert_eq!(recorder.passes, vec![0, 1, 2]);
    assert_eq!(recorder.collisions, 1);
    assert_eq!(recorder.completed, vec![stats]);
    // the sheet starts at y = 0, inside the floor clearance
    assert_eq!(stats.contacts, cloth.particle_count());
    assert_eq!(stats.skipped(), 0);
}

#[test]
fn collapsed_cloth_skips_degenerate_constraints() {
    let mut cloth: ClothNetwork<f32> = ClothNetwork::new(ClothConfig::new().with_grid(2, 2)).unwrap();
    for v in 0..=2 {
        for u in 0..=2 {
            let rest = cloth.particle(u, v).unwrap().rest_position();
            cloth.apply_impulse(u, v, -rest).unwrap();
        }
    }
    // every particle sits at the origin, so no constraint has a direction
    assert_eq!(cloth.enforce_constraints(), cloth.constraint_count());
    for p in cloth.positions() {
        assert_eq!(p, Vec3::zero());
    }

    let stats = cloth.step(
        Frame::new(0.0, 0.016),
        &ForceConfig::none(),
        &Obstacles::none(),
        &mut NoOpStepObserver,
    );
    assert_eq!(stats.degenerate_constraints, 0, "integration spreads the particles again");
    for p in cloth.positions() {
        assert!(p.is_finite());
    }
}
