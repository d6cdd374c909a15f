use super::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

/// Relative tolerance for deciding that a regime's period has elapsed, so
/// that accumulated floating-point steps still trigger on time.
const PERIOD_TOLERANCE: f64 = 1e-9;

/// Which representation is currently authoritative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    #[default]
    Fiber,
    Particle,
}

impl Regime {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Regime::Fiber => Regime::Particle,
            Regime::Particle => Regime::Fiber,
        }
    }

    #[inline]
    fn index(self) -> usize {
        match self {
            Regime::Fiber => 0,
            Regime::Particle => 1,
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Regime::Fiber => write!(f, "fiber-active"),
            Regime::Particle => write!(f, "particle-active"),
        }
    }
}

/// Activation flags handed to the two drivers. Exactly one is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeSelection {
    pub fiber_active: bool,
    pub particle_active: bool,
}

impl From<Regime> for RegimeSelection {
    fn from(regime: Regime) -> Self {
        Self {
            fiber_active: regime == Regime::Fiber,
            particle_active: regime == Regime::Particle,
        }
    }
}

/// Emitted when a regime's period runs out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegimeSwitch {
    pub from: Regime,
    pub to: Regime,
    /// Total simulated time at which the switch happened.
    pub at: f64,
}

/// Two-state periodic controller.
///
/// Elapsed time within the active regime accumulates with every
/// [`advance`](Alternator::advance); once it reaches the regime's period the
/// controller flips and restarts the count from zero. Overshoot is not carried
/// into the next regime.
#[derive(Debug, Clone, PartialEq)]
pub struct Alternator {
    periods: [f64; 2],
    regime: Regime,
    elapsed: f64,
    clock: f64,
}

impl Alternator {
    /// `periods` are `[fiber_period, particle_period]`.
    pub fn new(periods: [f64; 2], initial: Regime) -> Result<Self, Error> {
        if let Some(bad) = periods.iter().find(|p| !(p.is_finite() && **p > 0.0)) {
            return Err(Error::InvalidConfig(format!(
                "regime periods must be positive and finite, got {bad}"
            )));
        }
        Ok(Self {
            periods,
            regime: initial,
            elapsed: 0.0,
            clock: 0.0,
        })
    }

    #[inline]
    pub fn regime(&self) -> Regime {
        self.regime
    }

    #[inline]
    pub fn selection(&self) -> RegimeSelection {
        self.regime.into()
    }

    #[inline]
    pub fn period(&self, regime: Regime) -> f64 {
        self.periods[regime.index()]
    }

    /// Time left before the active regime's period elapses.
    #[inline]
    pub fn remaining(&self) -> f64 {
        (self.period(self.regime) - self.elapsed).max(0.0)
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn advance(&mut self, dt: f64) -> Option<RegimeSwitch> {
        self.elapsed += dt;
        self.clock += dt;

        let period = self.period(self.regime);
        if self.elapsed < period * (1.0 - PERIOD_TOLERANCE) {
            return None;
        }

        let switch = RegimeSwitch {
            from: self.regime,
            to: self.regime.other(),
            at: self.clock,
        };
        self.regime = switch.to;
        self.elapsed = 0.0;
        info!(from = %switch.from, to = %switch.to, at = switch.at, "regime switch");
        Some(switch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flips_after_each_period() {
        let mut alt = Alternator::new([10.0, 0.001], Regime::Fiber).expect("valid periods");
        assert_eq!(
            alt.selection(),
            RegimeSelection {
                fiber_active: true,
                particle_active: false
            }
        );

        let switch = alt.advance(10.0).expect("fiber period elapsed");
        assert_eq!((switch.from, switch.to), (Regime::Fiber, Regime::Particle));
        assert_eq!(alt.regime(), Regime::Particle);
        assert!(alt.selection().particle_active);

        let back = alt.advance(0.001).expect("particle period elapsed");
        assert_eq!(back.to, Regime::Fiber);
        assert_eq!(alt.regime(), Regime::Fiber);
    }

    #[test]
    fn accumulates_partial_steps() {
        let mut alt = Alternator::new([10.0, 0.001], Regime::Fiber).unwrap();
        let switches = (0..10).filter_map(|_| alt.advance(1.0)).count();
        assert_eq!(switches, 1);
        assert_eq!(alt.regime(), Regime::Particle);
        assert_eq!(alt.elapsed(), 0.0);

        let switches = (0..10).filter_map(|_| alt.advance(0.0001)).count();
        assert_eq!(switches, 1);
        assert_eq!(alt.regime(), Regime::Fiber);
    }

    #[test]
    fn remaining_tracks_active_period() {
        let mut alt = Alternator::new([10.0, 1e-7], Regime::Particle).unwrap();
        assert_eq!(alt.remaining(), 1e-7);
        alt.advance(1e-7);
        assert_eq!(alt.regime(), Regime::Fiber);
        alt.advance(4.0);
        assert_eq!(alt.remaining(), 6.0);
        assert_eq!(alt.clock(), 1e-7 + 4.0);
    }

    #[test]
    fn rejects_non_positive_periods() {
        assert!(Alternator::new([0.0, 1.0], Regime::Fiber).is_err());
        assert!(Alternator::new([1.0, f64::NAN], Regime::Fiber).is_err());
    }

    #[test]
    fn regime_parses_from_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            initial: Regime,
        }
        let parsed: Wrapper = toml::from_str("initial = \"particle\"").unwrap();
        assert_eq!(parsed.initial, Regime::Particle);
    }
}
