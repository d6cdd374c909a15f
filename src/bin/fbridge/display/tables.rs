use std::collections::BTreeMap;
use std::io::{self, Write};

use filament_bridge::{Fiber, Point3, Regime};

use crate::util::text::format_point;

/// Prints one row per fiber to stdout.
pub fn print_fibers(fibers: &BTreeMap<String, Fiber>) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{:<12} {:<20} {:>7} {:>10}", "ID", "TYPE", "POINTS", "LENGTH");
    for (id, fiber) in fibers {
        let _ = writeln!(
            stdout,
            "{:<12} {:<20} {:>7} {:>10.1}",
            id,
            fiber.type_name,
            fiber.points.len(),
            fiber.length()
        );
    }
}

pub fn print_extent(extent: &Point3) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{} {} {}", extent[0], extent[1], extent[2]);
    if extent.iter().any(|&v| v <= 0.0) {
        let _ = writeln!(
            io::stderr().lock(),
            "  note: a zero axis means the configuration does not define it"
        );
    }
}

pub struct RunSummary {
    pub end_time: f64,
    pub ticks: usize,
    pub ticks_per_regime: BTreeMap<Regime, usize>,
    pub switches: usize,
    pub fibers: usize,
    pub topologies: usize,
    pub particles: usize,
    pub box_extent: Point3,
}

#[rustfmt::skip]
pub fn print_run_summary(summary: &RunSummary) {
    let mut stderr = io::stderr().lock();
    let count = |regime: Regime| summary.ticks_per_regime.get(&regime).copied().unwrap_or(0);

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ┌─ Run ─────────────────────────────────────────┐");
    let _ = writeln!(stderr, "   │  End time          {:>26.6} │", summary.end_time);
    let _ = writeln!(stderr, "   │  Ticks             {:>26} │", summary.ticks);
    let _ = writeln!(stderr, "   │    fiber-active    {:>26} │", count(Regime::Fiber));
    let _ = writeln!(stderr, "   │    particle-active {:>26} │", count(Regime::Particle));
    let _ = writeln!(stderr, "   │  Regime switches   {:>26} │", summary.switches);
    let _ = writeln!(stderr, "   ├─ State ───────────────────────────────────────┤");
    let _ = writeln!(stderr, "   │  Fibers            {:>26} │", summary.fibers);
    let _ = writeln!(stderr, "   │  Topologies        {:>26} │", summary.topologies);
    let _ = writeln!(stderr, "   │  Particles         {:>26} │", summary.particles);
    let _ = writeln!(stderr, "   │  Box extent        {:>26} │", format_point(&summary.box_extent));
    let _ = writeln!(stderr, "   └───────────────────────────────────────────────┘");
    let _ = writeln!(stderr);
}
