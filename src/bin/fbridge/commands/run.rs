use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;

use anyhow::{Context, Result, bail};

use filament_bridge::engine::{MedyanEngine, StaticParticleEngine};
use filament_bridge::io::{TrajectoryCodec, TypeEncoding};
use filament_bridge::{Coupler, CouplingConfig, FiberState, Point3};

use crate::cli::RunArgs;
use crate::display::{Context as DisplayContext, Progress, RunSummary, print_run_summary};
use crate::io::open_input;
use crate::util::text::format_point;

const TOTAL_STEPS: u8 = 3;

pub fn run_coupling(args: RunArgs, ctx: DisplayContext) -> Result<()> {
    if !(args.until.is_finite() && args.until > 0.0) {
        bail!("--until must be a positive time, got {}", args.until);
    }

    let mut progress = Progress::new(ctx.interactive, TOTAL_STEPS);

    progress.step("Loading configuration");
    let config = load_config(&args)?;
    let fibers = load_fibers(&args, &config)?;
    let load_substeps = vec![
        format!(
            "Alternating fiber {} / particle {}",
            config.alternator.periods[0], config.alternator.periods[1]
        ),
        format!("{} fibers in box {}", fibers.fiber_count(), format_point(&fibers.box_extent)),
    ];
    let load_substeps_ref: Vec<&str> = load_substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Loading configuration", &load_substeps_ref);

    progress.step("Running coupling loop");
    let engine =
        MedyanEngine::new(config.fiber_engine.clone()).context("Failed to set up the fiber engine")?;
    let mut coupler = Coupler::from_config(&config, engine, StaticParticleEngine, fibers)
        .context("Failed to initialize the coupling loop")?;

    let mut ticks_per_regime = BTreeMap::new();
    let mut switches = 0;
    let ticks = coupler
        .run_until(args.until, |report| {
            *ticks_per_regime.entry(report.regime).or_insert(0) += 1;
            if report.switch.is_some() {
                switches += 1;
            }
            progress.update(&format!("t = {:.6} ({})", report.time, report.regime));
        })
        .context("Coupling loop failed")?;
    progress.complete_step(
        "Running coupling loop",
        &[&format!("{ticks} ticks, {switches} regime switches")],
    );

    progress.step("Writing output");
    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        TrajectoryCodec::new(TypeEncoding::Name)
            .write_filaments(BufWriter::new(file), coupler.fibers().fibers.values())
            .with_context(|| format!("Failed to write filament listing: {}", path.display()))?;
    }
    progress.complete_step("Writing output", &[]);

    if ctx.interactive {
        print_run_summary(&RunSummary {
            end_time: coupler.time(),
            ticks,
            ticks_per_regime,
            switches,
            fibers: coupler.fibers().fiber_count(),
            topologies: coupler.monomers().topology_count(),
            particles: coupler.monomers().particle_count(),
            box_extent: coupler.fibers().box_extent,
        });
    }

    progress.finish();
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<CouplingConfig> {
    let Some(path) = &args.config else {
        return Ok(CouplingConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration: {}", path.display()))?;
    CouplingConfig::from_toml_str(&text)
        .with_context(|| format!("Invalid configuration: {}", path.display()))
}

fn load_fibers(args: &RunArgs, config: &CouplingConfig) -> Result<FiberState> {
    let Some(path) = &args.fibers else {
        return FiberState::chandrasekaran_2019().context("Failed to load the bundled fiber table");
    };

    let extent: Point3 = match args.extent.as_deref() {
        Some([x, y, z]) => [*x, *y, *z],
        Some(other) => bail!("--extent takes three values, got {}", other.len()),
        None => config.fiber_engine.box_extent.unwrap_or_default(),
    };

    let input = open_input(Some(path))?;
    let fibers = TrajectoryCodec::new(TypeEncoding::Name)
        .read_filaments(input)
        .with_context(|| format!("Failed to read filament listing: {}", path.display()))?;
    Ok(FiberState::with_fibers(extent, fibers))
}
