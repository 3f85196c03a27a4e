//! The shared die roller and its face statistics.

use std::collections::BTreeMap;
use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DieSize;

/// Something that produces one face value per call.
pub trait FaceSource: Send {
    /// A value in `1..=faces`.
    fn face(&mut self, faces: u32) -> u32;
}

/// Uniform faces drawn from a random number generator.
#[derive(Debug)]
pub struct RngFaces<R>(pub R);

impl<R: Rng + Send> FaceSource for RngFaces<R> {
    fn face(&mut self, faces: u32) -> u32 {
        self.0.random_range(1..=faces)
    }
}

/// Faces read from a fixed script, cycling when it runs out.
///
/// Values are clamped into `1..=faces`. An empty script always yields 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFaces {
    script: VecDeque<u32>,
}

impl ScriptedFaces {
    /// Script the given values in order.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
        }
    }
}

impl FaceSource for ScriptedFaces {
    fn face(&mut self, faces: u32) -> u32 {
        match self.script.pop_front() {
            Some(value) => {
                self.script.push_back(value);
                value.clamp(1, faces)
            }
            None => 1,
        }
    }
}

/// The process-wide die roller.
///
/// Passed explicitly to whatever rolls, so tests can swap in a
/// [`ScriptedFaces`] source. Counts how often each face came up on each
/// size for [`Roller::report`].
pub struct Roller {
    source: Box<dyn FaceSource>,
    counts: BTreeMap<DieSize, BTreeMap<u32, u64>>,
    total: u64,
}

impl Roller {
    /// A roller over any face source.
    pub fn new(source: impl FaceSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            counts: BTreeMap::new(),
            total: 0,
        }
    }

    /// A roller seeded from operating system entropy.
    pub fn from_entropy() -> Self {
        Self::new(RngFaces(StdRng::from_os_rng()))
    }

    /// A reproducible roller.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngFaces(StdRng::seed_from_u64(seed)))
    }

    /// A roller that replays the given faces.
    pub fn scripted(values: impl IntoIterator<Item = u32>) -> Self {
        Self::new(ScriptedFaces::new(values))
    }

    /// Roll one die and record the face.
    pub fn roll(&mut self, size: DieSize) -> u32 {
        let value = self.source.face(size.faces());
        *self
            .counts
            .entry(size)
            .or_default()
            .entry(value)
            .or_default() += 1;
        self.total += 1;
        value
    }

    /// Total dice rolled so far.
    pub fn total_rolls(&self) -> u64 {
        self.total
    }

    /// How often each face has come up for a size, faces in ascending order.
    /// Faces never rolled are included with a count of zero.
    pub fn distribution(&self, size: DieSize) -> Vec<(u32, u64)> {
        let counts = self.counts.get(&size);
        (1..=size.faces())
            .map(|face| {
                let n = counts.and_then(|c| c.get(&face)).copied().unwrap_or(0);
                (face, n)
            })
            .collect()
    }

    /// Sizes that have been rolled at least once, smallest first.
    pub fn rolled_sizes(&self) -> Vec<DieSize> {
        self.counts.keys().copied().collect()
    }

    /// Render total rolls and, per size, the percentage of each face.
    pub fn report(&self) -> String {
        let mut out = format!("Dice rolled: {}", self.total);
        for size in self.rolled_sizes() {
            let dist = self.distribution(size);
            let rolled: u64 = dist.iter().map(|(_, n)| n).sum();
            let faces: Vec<String> = dist
                .iter()
                .map(|(face, n)| {
                    let pct = *n as f64 * 100.0 / rolled as f64;
                    format!("{face}: {pct:.1}%")
                })
                .collect();
            out.push_str(&format!("\n{size} ({rolled}): {}", faces.join(", ")));
        }
        out
    }
}

impl std::fmt::Debug for Roller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Roller")
            .field("total", &self.total)
            .field("counts", &self.counts)
            .finish_non_exhaustive()
    }
}
