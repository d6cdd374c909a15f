//! The alternating coupling loop.
//!
//! A [`Coupler`] owns both representations and one engine per regime. Every
//! tick first advances the [`Alternator`], then runs exactly one engine: the
//! one whose regime was active when the tick began. A regime switch caused by
//! the tick therefore takes effect on the next tick.
//!
//! After a fiber step the new fibers are projected into a monomer state and
//! the particle side receives the difference as a [`MonomerUpdate`]. After a
//! particle step the topologies are projected back and spliced into the
//! fibers they came from, in place of the part inside the particle box. A
//! failed step leaves both states and the controller as they were before the
//! tick.

mod alternator;
mod error;

pub use alternator::{Alternator, Regime, RegimeSelection, RegimeSwitch};
pub use error::Error;

use crate::config::CouplingConfig;
use crate::engine::{FiberEngine, ParticleEngine};
use crate::model::fiber::{Fiber, FiberState};
use crate::model::monomer::MonomerState;
use crate::reconcile::MonomerUpdate;
use crate::translate::{Translator, splice_cropped};
use serde::Serialize;
use tracing::{debug, warn};

/// What happened during one tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// Simulated time at the end of the tick.
    pub time: f64,
    pub dt: f64,
    /// The regime whose engine ran.
    pub regime: Regime,
    pub switch: Option<RegimeSwitch>,
    pub monomer_update: MonomerUpdate,
}

pub struct Coupler<F, P> {
    alternator: Alternator,
    translator: Translator,
    fiber_engine: F,
    particle_engine: P,
    fiber_time_step: f64,
    particle_time_step: f64,
    fibers: FiberState,
    monomers: MonomerState,
    time: f64,
}

impl<F: FiberEngine, P: ParticleEngine> Coupler<F, P> {
    /// Builds the loop and projects the initial fibers into the particle
    /// regime's box. That projection is the only full replacement of the
    /// monomer state; every later change goes through a [`MonomerUpdate`].
    pub fn new(
        alternator: Alternator,
        mut translator: Translator,
        fiber_engine: F,
        particle_engine: P,
        fibers: FiberState,
    ) -> Result<Self, Error> {
        let monomers = translator.fibers_to_monomers(&fibers.fibers, &MonomerState::default())?;
        Ok(Self {
            alternator,
            translator,
            fiber_engine,
            particle_engine,
            fiber_time_step: f64::INFINITY,
            particle_time_step: f64::INFINITY,
            fibers,
            monomers,
            time: 0.0,
        })
    }

    pub fn from_config(
        config: &CouplingConfig,
        fiber_engine: F,
        particle_engine: P,
        fibers: FiberState,
    ) -> Result<Self, Error> {
        config.validate()?;
        let alternator = Alternator::new(config.alternator.periods, config.alternator.initial)?;
        let translator = Translator::new(config.translator.clone());
        Ok(
            Self::new(alternator, translator, fiber_engine, particle_engine, fibers)?
                .with_time_steps(config.fiber_engine.time_step, config.particle_engine.time_step),
        )
    }

    /// Largest step each regime's engine takes in [`step`](Coupler::step).
    /// Unset time steps run a regime's whole period in one tick.
    pub fn with_time_steps(mut self, fiber: f64, particle: f64) -> Self {
        self.fiber_time_step = fiber;
        self.particle_time_step = particle;
        self
    }

    #[inline]
    pub fn fibers(&self) -> &FiberState {
        &self.fibers
    }

    #[inline]
    pub fn monomers(&self) -> &MonomerState {
        &self.monomers
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    #[inline]
    pub fn regime(&self) -> Regime {
        self.alternator.regime()
    }

    #[inline]
    pub fn selection(&self) -> RegimeSelection {
        self.alternator.selection()
    }

    #[inline]
    pub fn alternator(&self) -> &Alternator {
        &self.alternator
    }

    #[inline]
    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Length of the next [`step`](Coupler::step): the active regime's time
    /// step, cut short so it never runs past the regime's period.
    pub fn next_dt(&self) -> f64 {
        let time_step = match self.alternator.regime() {
            Regime::Fiber => self.fiber_time_step,
            Regime::Particle => self.particle_time_step,
        };
        time_step.min(self.alternator.remaining())
    }

    pub fn step(&mut self) -> Result<TickReport, Error> {
        self.tick(self.next_dt())
    }

    pub fn tick(&mut self, dt: f64) -> Result<TickReport, Error> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tick length must be positive and finite, got {dt}"
            )));
        }

        let regime = self.alternator.regime();
        let before = self.alternator.clone();
        let switch = self.alternator.advance(dt);

        let outcome = match regime {
            Regime::Fiber => self.fiber_step(dt),
            Regime::Particle => self.particle_step(dt),
        };

        match outcome {
            Ok(monomer_update) => {
                self.time += dt;
                debug!(
                    time = self.time,
                    %regime,
                    added = monomer_update.particles.added(),
                    deleted = monomer_update.particles.deleted(),
                    "tick complete"
                );
                Ok(TickReport {
                    time: self.time,
                    dt,
                    regime,
                    switch,
                    monomer_update,
                })
            }
            Err(err) => {
                self.alternator = before;
                warn!(%regime, error = %err, "tick failed, state left unchanged");
                Err(err)
            }
        }
    }

    /// Steps until simulated time reaches `end`, calling `on_tick` after each
    /// tick. Returns the number of ticks run.
    pub fn run_until<C>(&mut self, end: f64, mut on_tick: C) -> Result<usize, Error>
    where
        C: FnMut(&TickReport),
    {
        let tolerance = f64::EPSILON * end.abs().max(1.0);
        let mut ticks = 0;
        while end - self.time > tolerance {
            let dt = self.next_dt().min(end - self.time);
            let report = self.tick(dt)?;
            on_tick(&report);
            ticks += 1;
        }
        Ok(ticks)
    }

    fn fiber_step(&mut self, dt: f64) -> Result<MonomerUpdate, Error> {
        let next = self.fiber_engine.step(&self.fibers, dt)?;
        let projected = self
            .translator
            .fibers_to_monomers(&next.fibers, &self.monomers)?;
        let update = MonomerUpdate::between(&self.monomers, &projected);

        self.monomers.apply(&update);
        self.fibers = next;
        Ok(update)
    }

    fn particle_step(&mut self, dt: f64) -> Result<MonomerUpdate, Error> {
        let next = self.particle_engine.step(&self.monomers, dt)?;
        let derived = self.translator.monomers_to_fibers(&next)?;

        let bounds = self.translator.bounds();
        let mut fibers = self.fibers.clone();
        let removed: Vec<String> = self
            .monomers
            .topologies
            .keys()
            .filter_map(|id| self.translator.fiber_of(*id))
            .filter(|fiber_id| !derived.contains_key(*fiber_id))
            .map(str::to_string)
            .collect();
        for id in &removed {
            fibers.fibers.remove(id);
        }
        if !removed.is_empty() {
            debug!(removed = removed.len(), "fibers dissolved in the particle regime");
        }

        for (id, fiber) in derived {
            let fiber = match self.fibers.fibers.get(&id) {
                Some(original) => Fiber {
                    points: splice_cropped(original, &fiber.points, bounds.min, bounds.max),
                    ..fiber
                },
                None => fiber,
            };
            fibers.insert(fiber);
        }

        let update = MonomerUpdate::between(&self.monomers, &next);
        self.monomers.apply(&update);
        self.fibers = fibers;
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{self, StaticParticleEngine};
    use crate::translate::TranslatorConfig;

    /// Moves every fiber by `shift` along x.
    struct Drift {
        shift: f64,
        calls: usize,
    }

    impl FiberEngine for Drift {
        fn step(&mut self, state: &FiberState, _dt: f64) -> Result<FiberState, engine::Error> {
            self.calls += 1;
            let mut next = state.clone();
            for fiber in next.fibers.values_mut() {
                for p in &mut fiber.points {
                    p[0] += self.shift;
                }
            }
            Ok(next)
        }
    }

    struct Broken;

    impl FiberEngine for Broken {
        fn step(&mut self, _: &FiberState, _: f64) -> Result<FiberState, engine::Error> {
            Err(engine::Error::Timeout {
                after: std::time::Duration::from_secs(1),
                output: String::new(),
            })
        }
    }

    fn fibers() -> FiberState {
        FiberState::with_fibers(
            [4000.0, 2000.0, 2000.0],
            [Fiber::new(
                "1",
                "Actin-Polymer",
                vec![[1800.0, 1000.0, 1000.0], [1900.0, 1000.0, 1000.0]],
            )],
        )
    }

    fn coupler<F: FiberEngine>(engine: F) -> Coupler<F, StaticParticleEngine> {
        Coupler::new(
            Alternator::new([10.0, 0.001], Regime::Fiber).unwrap(),
            Translator::new(TranslatorConfig::default()),
            engine,
            StaticParticleEngine,
            fibers(),
        )
        .expect("initial projection succeeds")
        .with_time_steps(5.0, 0.001)
    }

    #[test]
    fn runs_one_engine_per_tick() {
        let mut c = coupler(Drift { shift: 10.0, calls: 0 });
        assert!(c.monomers().topology_count() == 1);

        let first = c.step().expect("fiber step");
        assert_eq!((first.regime, first.dt), (Regime::Fiber, 5.0));
        assert!(first.switch.is_none());

        let second = c.step().expect("fiber step");
        assert_eq!(second.regime, Regime::Fiber);
        assert_eq!(second.switch.map(|s| s.to), Some(Regime::Particle));
        assert_eq!(c.regime(), Regime::Particle);

        let third = c.step().expect("particle step");
        assert_eq!(third.regime, Regime::Particle);
        assert_eq!(third.dt, 0.001);
        assert_eq!(c.regime(), Regime::Fiber);
        assert_eq!(c.fiber_engine.calls, 2);
    }

    #[test]
    fn fiber_step_preserves_entity_ids() {
        let mut c = coupler(Drift { shift: 0.0, calls: 0 });
        let before = c.monomers().clone();
        let report = c.step().unwrap();

        assert!(report.monomer_update.particles.add.is_empty());
        assert!(report.monomer_update.particles.delete.is_empty());
        assert_eq!(c.monomers(), &before);
    }

    #[test]
    fn moved_fiber_yields_incremental_update() {
        let mut c = coupler(Drift { shift: 27.0, calls: 0 });
        let before = c.monomers().clone();
        let report = c.step().unwrap();

        let topology = before.topologies.keys().next().copied().unwrap();
        assert!(report.monomer_update.topologies.update.contains_key(&topology));
        assert!(report.monomer_update.particles.add.is_empty());
        assert!(
            report
                .monomer_update
                .particles
                .update
                .keys()
                .all(|id| before.particles.contains_key(id))
        );
    }

    #[test]
    fn particle_step_writes_fibers_back() {
        let mut c = coupler(Drift { shift: 0.0, calls: 0 });
        c.tick(10.0).unwrap();
        assert_eq!(c.regime(), Regime::Particle);

        c.tick(0.001).unwrap();
        let fiber = &c.fibers().fibers["1"];
        assert_eq!(fiber.points[0], [1800.0, 1000.0, 1000.0]);
        assert!(fiber.points.len() > 2);
        assert_eq!(c.fibers().fiber_count(), 1);
    }

    #[test]
    fn particle_step_keeps_fiber_parts_outside_the_box() {
        let mut c = coupler(Drift { shift: 0.0, calls: 0 });
        c.fibers = FiberState::with_fibers(
            [4000.0, 2000.0, 2000.0],
            [Fiber::new(
                "1",
                "Actin-Polymer",
                vec![[1000.0, 1000.0, 1000.0], [3160.0, 1000.0, 1000.0]],
            )],
        );
        c.tick(10.0).unwrap();
        c.tick(0.001).unwrap();

        let fiber = &c.fibers().fibers["1"];
        assert_eq!(fiber.points.first(), Some(&[1000.0, 1000.0, 1000.0]));
        assert_eq!(fiber.points.last(), Some(&[3160.0, 1000.0, 1000.0]));
        assert!(fiber.points[1..fiber.points.len() - 1]
            .iter()
            .all(|p| (1500.0..=2500.0).contains(&p[0]) && p[1] == 1000.0 && p[2] == 1000.0));
        assert!(fiber.points.windows(2).all(|w| w[0][0] < w[1][0]));

        let report = c.tick(5.0).unwrap();
        assert!(report.monomer_update.particles.add.is_empty());
        assert!(report.monomer_update.particles.delete.is_empty());
    }

    #[test]
    fn failed_tick_leaves_state_untouched() {
        let mut c = coupler(Broken);
        let fibers = c.fibers().clone();
        let monomers = c.monomers().clone();
        let alternator = c.alternator().clone();

        let err = c.tick(10.0).expect_err("engine times out");
        assert!(err.is_recoverable());
        assert_eq!(c.fibers(), &fibers);
        assert_eq!(c.monomers(), &monomers);
        assert_eq!(c.alternator(), &alternator);
        assert_eq!(c.time(), 0.0);
    }

    #[test]
    fn run_until_stops_at_end_time() {
        let mut c = coupler(Drift { shift: 0.0, calls: 0 });
        let mut regimes = Vec::new();
        let ticks = c
            .run_until(20.002, |report| regimes.push(report.regime))
            .expect("run succeeds");
        assert_eq!(ticks, 6);
        assert_eq!(
            regimes,
            vec![
                Regime::Fiber,
                Regime::Fiber,
                Regime::Particle,
                Regime::Fiber,
                Regime::Fiber,
                Regime::Particle
            ]
        );
        assert!((c.time() - 20.002).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_tick() {
        let mut c = coupler(Drift { shift: 0.0, calls: 0 });
        assert!(c.tick(0.0).is_err());
    }
}
