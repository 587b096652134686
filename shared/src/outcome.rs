//! Outcome resolution for a simulated scan.
//!
//! A scan resolves with a single Bernoulli draw: a uniform sample in `[0, 1)`
//! succeeds when it lands above `1 - success_rate`.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::{
    collections::VecDeque,
    fmt,
    sync::{Arc, Mutex},
};

use crate::model::State;

/// Source of uniform `[0, 1)` samples.
pub trait DrawSource: Send {
    fn draw(&mut self) -> f64;
}

/// Draws from the thread-local RNG. Default for interactive sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngDraw;

impl DrawSource for ThreadRngDraw {
    fn draw(&mut self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Reproducible draws from a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededDraw {
    rng: StdRng,
}

impl SeededDraw {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl DrawSource for SeededDraw {
    fn draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same sample.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl DrawSource for FixedDraw {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

/// Replays queued samples, then falls back to a fixed one.
#[derive(Debug, Clone)]
pub struct ScriptedDraw {
    queue: VecDeque<f64>,
    fallback: f64,
}

impl ScriptedDraw {
    pub fn new(draws: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            queue: draws.into_iter().collect(),
            fallback,
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DrawSource for ScriptedDraw {
    fn draw(&mut self) -> f64 {
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}

/// Cloneable handle to a draw source, so one can travel inside an event.
#[derive(Clone)]
pub struct SharedDraw(Arc<Mutex<dyn DrawSource>>);

impl SharedDraw {
    pub fn new(source: impl DrawSource + 'static) -> Self {
        let inner: Arc<Mutex<dyn DrawSource>> = Arc::new(Mutex::new(source));
        Self(inner)
    }
}

impl DrawSource for SharedDraw {
    fn draw(&mut self) -> f64 {
        // Poisoning is ignored: sources hold no invariant across draws.
        let mut source = match self.0.lock() {
            Ok(source) => source,
            Err(poisoned) => poisoned.into_inner(),
        };
        source.draw()
    }
}

impl PartialEq for SharedDraw {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for SharedDraw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedDraw(..)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Matched,
    Rejected,
}

impl Outcome {
    #[must_use]
    pub fn from_draw(draw: f64, success_rate: f64) -> Self {
        if draw > 1.0 - success_rate {
            Self::Matched
        } else {
            Self::Rejected
        }
    }

    #[must_use]
    pub const fn state(self) -> State {
        match self {
            Self::Matched => State::Success,
            Self::Rejected => State::Failure,
        }
    }
}
