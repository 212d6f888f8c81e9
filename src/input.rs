//! Tilt input sources
//!
//! The simulation pulls samples from a `TiltSource` on its sensor timer.
//! A source with nothing to report returns `None`; a missing sensor is
//! just a source that never reports.

use std::collections::VecDeque;

use crate::entities::TiltSample;

pub trait TiltSource {
    /// Latest reading, if the sensor produced one since the last poll.
    fn poll(&mut self) -> Option<TiltSample>;
}

/// A sensor that never reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSensor;

impl TiltSource for NoSensor {
    fn poll(&mut self) -> Option<TiltSample> {
        None
    }
}

/// Replays a fixed queue of samples, then goes silent.
#[derive(Debug, Default, Clone)]
pub struct ScriptedTilt {
    samples: VecDeque<TiltSample>,
}

impl ScriptedTilt {
    pub fn new(samples: impl IntoIterator<Item = f32>) -> Self {
        Self {
            samples: samples.into_iter().map(|x| TiltSample { x }).collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl TiltSource for ScriptedTilt {
    fn poll(&mut self) -> Option<TiltSample> {
        self.samples.pop_front()
    }
}

/// Holds the most recent tilt reported by an outside producer (for the
/// terminal, the keyboard).  Reports it on every poll until cleared.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeldTilt {
    current: Option<TiltSample>,
}

impl HeldTilt {
    pub fn set(&mut self, x: f32) {
        self.current = Some(TiltSample { x });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl TiltSource for HeldTilt {
    fn poll(&mut self) -> Option<TiltSample> {
        self.current
    }
}
