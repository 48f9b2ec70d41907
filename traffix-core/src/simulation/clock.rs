use serde::Serialize;

use crate::{Error, SimHour};

/// Simulated hours added per tick at speed x1
pub const HOURS_PER_TICK: SimHour = 0.05;

/// Wall-clock-independent scaling of simulated time per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpeedMultiplier {
    X1,
    X5,
    X10,
}

impl SpeedMultiplier {
    pub fn factor(self) -> f64 {
        match self {
            SpeedMultiplier::X1 => 1.0,
            SpeedMultiplier::X5 => 5.0,
            SpeedMultiplier::X10 => 10.0,
        }
    }
}

impl TryFrom<u32> for SpeedMultiplier {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        match value {
            1 => Ok(SpeedMultiplier::X1),
            5 => Ok(SpeedMultiplier::X5),
            10 => Ok(SpeedMultiplier::X10),
            other => Err(Error::InvalidData(format!(
                "speed multiplier must be 1, 5 or 10, got {other}"
            ))),
        }
    }
}

/// Owner of simulated time
///
/// Mutated only by the simulator's tick and an explicit user seek; every
/// other component reads it.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationClock {
    hour: SimHour,
    pub playing: bool,
    pub speed: SpeedMultiplier,
}

impl Default for SimulationClock {
    fn default() -> Self {
        SimulationClock {
            hour: 0.0,
            playing: false,
            speed: SpeedMultiplier::X1,
        }
    }
}

impl SimulationClock {
    pub fn hour(&self) -> SimHour {
        self.hour
    }

    /// Advance one tick of simulated time, wrapping past 24 back to 0
    pub(crate) fn advance(&mut self) {
        self.hour = (self.hour + HOURS_PER_TICK * self.speed.factor()) % 24.0;
    }

    /// Scrub to an explicit simulated hour
    pub fn seek(&mut self, hour: SimHour) -> Result<(), Error> {
        if !(0.0..24.0).contains(&hour) {
            return Err(Error::InvalidData(format!(
                "simulated hour must be in [0, 24), got {hour}"
            )));
        }
        self.hour = hour;
        Ok(())
    }
}

/// Morning and evening rush windows: [8, 11] and [17, 20]
pub fn is_peak_hour(hour: SimHour) -> bool {
    (8.0..=11.0).contains(&hour) || (17.0..=20.0).contains(&hour)
}
