use approx::assert_abs_diff_eq;
use filament_bridge::engine::{
    Error as EngineError, FiberEngineConfig, Invoker, MedyanEngine, PlaceholderTemplate,
    StaticParticleEngine,
};
use filament_bridge::{
    Coupler, CouplingConfig, Fiber, FiberState, Regime, TranslatorConfig,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

/// Stands in for the engine binary: reads the listing it was given and writes
/// a two-timepoint snapshot whose last timepoint moves every point by +1 in x.
struct ShiftingEngine {
    runs: Arc<AtomicUsize>,
}

impl Invoker for ShiftingEngine {
    fn invoke(&mut self, input: &Path, output: &Path, _system: &str) -> Result<String, EngineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let listing = fs::read_to_string(input.join("filaments.txt"))
            .map_err(|e| EngineError::io(input, e))?;

        let mut first = String::from("0 0.0 0 0 0 0\n");
        let mut last = String::from("1 1.0 0 0 0 0\n");
        for (i, line) in listing.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let mut tokens = line.split_whitespace().skip(1);
            let type_token = tokens.next().unwrap_or_default();
            let values: Vec<f64> = tokens.map(|t| t.parse().unwrap_or(f64::NAN)).collect();
            let moved: Vec<String> = values
                .chunks(3)
                .flat_map(|c| [c[0] + 1.0, c[1], c[2]])
                .map(|v| v.to_string())
                .collect();
            let original: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            first.push_str(&format!("FILAMENT {i} {type_token} 0 0 0\n{}\n", original.join(" ")));
            last.push_str(&format!("FILAMENT {i} {type_token} 0 0 0\n{}\n", moved.join(" ")));
        }

        fs::write(output.join("snapshot.traj"), first + &last)
            .map_err(|e| EngineError::io(output, e))?;
        Ok("Done with simulation!".to_string())
    }
}

fn config(root: &Path) -> CouplingConfig {
    let mut config = CouplingConfig::default();
    config.alternator.periods = [10.0, 1.0];
    config.particle_engine.time_step = 1.0;
    config.fiber_engine = FiberEngineConfig {
        input_directory: root.join("input"),
        output_directory: root.join("output"),
        transform: [100.0, 100.0, 100.0],
        box_extent: Some([1000.0, 1000.0, 1000.0]),
        time_step: 10.0,
        ..FiberEngineConfig::default()
    };
    config.translator = TranslatorConfig {
        box_center: [0.0; 3],
        box_size: 1000.0,
        ..TranslatorConfig::default()
    };
    config
}

fn fibers() -> FiberState {
    FiberState::with_fibers(
        [0.0; 3],
        [
            Fiber::new("1", "Actin-Polymer", vec![[10.0, 10.0, 10.0], [60.0, 10.0, 10.0]]),
            Fiber::new("2", "Actin-Polymer", vec![[-70.0, 100.0, 0.0], [10.0, 0.0, 100.0]]),
        ],
    )
}

#[test]
fn alternates_between_file_engine_and_particle_engine() {
    let root = tempdir().unwrap();
    let config = config(root.path());
    let runs = Arc::new(AtomicUsize::new(0));
    let engine = MedyanEngine::with_parts(
        config.fiber_engine.clone(),
        ShiftingEngine { runs: Arc::clone(&runs) },
        PlaceholderTemplate::bundled(),
    );

    let mut coupler =
        Coupler::from_config(&config, engine, StaticParticleEngine, fibers()).expect("valid setup");
    assert_eq!(coupler.monomers().topology_count(), 2);

    let mut regimes = Vec::new();
    let ticks = coupler
        .run_until(12.0, |report| regimes.push(report.regime))
        .expect("loop runs");

    assert_eq!(ticks, 3);
    assert_eq!(regimes, vec![Regime::Fiber, Regime::Particle, Regime::Fiber]);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
    assert_abs_diff_eq!(coupler.time(), 12.0, epsilon = 1e-12);

    let ids: Vec<&str> = coupler.fibers().ids().collect();
    assert_eq!(ids, vec!["1", "2"]);
    let first = &coupler.fibers().fibers["1"];
    assert_eq!(first.type_name, "Actin-Polymer");
    assert_abs_diff_eq!(first.points[0][0], 12.0, epsilon = 1e-9);
    assert_abs_diff_eq!(first.points[0][1], 10.0, epsilon = 1e-9);

    // NX/NY/NZ of the bundled template times the compartment size.
    assert_eq!(coupler.fibers().box_extent, [1000.0, 1000.0, 1000.0]);
    assert_eq!(coupler.monomers().topology_count(), 2);

}

#[test]
fn monomer_updates_carry_only_changes_after_the_first_projection() {
    let root = tempdir().unwrap();
    let config = config(root.path());
    let engine = MedyanEngine::with_parts(
        config.fiber_engine.clone(),
        ShiftingEngine { runs: Arc::new(AtomicUsize::new(0)) },
        PlaceholderTemplate::bundled(),
    );
    let mut coupler =
        Coupler::from_config(&config, engine, StaticParticleEngine, fibers()).expect("valid setup");
    let topologies_before: Vec<_> = coupler.monomers().topologies.keys().copied().collect();

    let report = coupler.step().expect("fiber tick");
    assert_eq!(report.regime, Regime::Fiber);
    assert!(report.switch.is_some());
    assert_eq!(report.monomer_update.topologies.added(), 0);
    assert_eq!(report.monomer_update.topologies.deleted(), 0);

    let topologies_after: Vec<_> = coupler.monomers().topologies.keys().copied().collect();
    assert_eq!(topologies_before, topologies_after);

    let report = coupler.step().expect("particle tick");
    assert_eq!(report.regime, Regime::Particle);
    assert!(report.monomer_update.particles.add.is_empty());
    assert!(report.monomer_update.particles.delete.is_empty());

}

#[test]
fn engine_without_box_extent_fails_the_tick_and_keeps_state() {
    let root = tempdir().unwrap();
    let mut config = config(root.path());
    config.fiber_engine.box_extent = None;
    let engine = MedyanEngine::with_parts(
        config.fiber_engine.clone(),
        ShiftingEngine { runs: Arc::new(AtomicUsize::new(0)) },
        PlaceholderTemplate::bundled(),
    );
    let mut coupler =
        Coupler::from_config(&config, engine, StaticParticleEngine, fibers()).expect("valid setup");
    let before = coupler.fibers().clone();

    let err = coupler.step().expect_err("no box extent anywhere");
    assert!(!err.is_recoverable());
    assert_eq!(coupler.fibers(), &before);
    assert_eq!(coupler.regime(), Regime::Fiber);
    assert_eq!(coupler.time(), 0.0);

}
