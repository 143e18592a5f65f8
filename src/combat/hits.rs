//! Hit-count distributions: exact binomial per die face, convolution of independent
//! groups, and a normal approximation for very large forces.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::data::rules::{HitMethod, PROBABILITY_TOLERANCE};
use crate::data::unit::{DIE_SIDES, FACE_BUCKETS};
use crate::error::{OddsError, Result};

/// Histogram of units by hit-die face. Bucket 0 holds units that cannot hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitProfile(pub [u32; FACE_BUCKETS]);

impl HitProfile {
    pub const EMPTY: HitProfile = HitProfile([0; FACE_BUCKETS]);

    /// Units in every bucket, including those that cannot hit.
    pub fn units(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Units able to score a hit (faces 1..=4).
    pub fn hitters(&self) -> u32 {
        self.0[1..].iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.units() == 0
    }

    pub fn add_face(&mut self, face: u8, count: u32) {
        self.0[face as usize] += count;
    }

    /// Bucket-wise subtraction. Callers guarantee `other` fits inside `self`.
    pub fn minus(&self, other: &HitProfile) -> HitProfile {
        let mut out = *self;
        for (slot, taken) in out.0.iter_mut().zip(other.0) {
            *slot -= taken;
        }
        out
    }

    /// Removes `casualties` units, cheapest face first (bucket 0 upward).
    pub fn after_casualties(&self, mut casualties: u32) -> HitProfile {
        let mut out = *self;
        for slot in out.0.iter_mut() {
            if *slot >= casualties {
                *slot -= casualties;
                break;
            }
            casualties -= *slot;
            *slot = 0;
        }
        out
    }
}

impl Index<usize> for HitProfile {
    type Output = u32;

    fn index(&self, face: usize) -> &u32 {
        &self.0[face]
    }
}

/// Probability mass function over 0..len() simultaneous hits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitDistribution(Vec<f64>);

impl HitDistribution {
    /// The "always zero hits" distribution.
    pub fn degenerate() -> Self {
        Self(vec![1.0])
    }

    pub fn from_probabilities(probabilities: Vec<f64>) -> Self {
        Self(probabilities)
    }

    #[inline]
    pub fn probability(&self, hits: usize) -> f64 {
        self.0.get(hits).copied().unwrap_or(0.0)
    }

    /// P(no hits).
    #[inline]
    pub fn miss_all(&self) -> f64 {
        self.probability(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest possible hit count.
    pub fn max_hits(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        self.0
            .iter()
            .enumerate()
            .map(|(hits, p)| hits as f64 * p)
            .sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate()
    }
}

/// Exact binomial distribution of successes for `count` dice that hit on `die_face` or lower.
pub fn hit_distribution(count: u32, die_face: u8) -> HitDistribution {
    let p = f64::from(die_face) / f64::from(DIE_SIDES);
    if count == 0 || p <= 0.0 {
        return HitDistribution::degenerate();
    }
    let n = count as usize;
    if p >= 1.0 {
        let mut certain = vec![0.0; n + 1];
        certain[n] = 1.0;
        return HitDistribution(certain);
    }

    let ln_p = p.ln();
    let ln_q = (1.0 - p).ln();
    let mut ln_factorial = Vec::with_capacity(n + 1);
    ln_factorial.push(0.0_f64);
    for k in 1..=n {
        ln_factorial.push(ln_factorial[k - 1] + (k as f64).ln());
    }

    let pmf = (0..=n)
        .map(|k| {
            let ln_choose = ln_factorial[n] - ln_factorial[k] - ln_factorial[n - k];
            (ln_choose + k as f64 * ln_p + (n - k) as f64 * ln_q).exp()
        })
        .collect();
    HitDistribution(pmf)
}

/// Distribution of the sum of two independent hit counts.
pub fn combine(first: &HitDistribution, second: &HitDistribution) -> Result<HitDistribution> {
    combine_within(first, second, PROBABILITY_TOLERANCE)
}

/// [combine] with an explicit tolerance for the mass check.
pub fn combine_within(
    first: &HitDistribution,
    second: &HitDistribution,
    tolerance: f64,
) -> Result<HitDistribution> {
    if first.is_empty() || second.is_empty() {
        return Err(OddsError::InvariantViolation {
            stage: "combine (empty distribution)".to_string(),
            total: 0.0,
        });
    }
    let mut total = vec![0.0; first.len() + second.len() - 1];
    for (hits_a, prob_a) in first.iter() {
        if prob_a == 0.0 {
            continue;
        }
        for (hits_b, prob_b) in second.iter() {
            total[hits_a + hits_b] += prob_a * prob_b;
        }
    }
    let combined = HitDistribution(total);
    check_mass(&combined, "combine", tolerance)?;
    Ok(combined)
}

/// Exact distribution of total hits for a histogram of hitters.
pub fn exact_hits(profile: &HitProfile) -> Result<HitDistribution> {
    exact_hits_within(profile, PROBABILITY_TOLERANCE)
}

pub fn exact_hits_within(profile: &HitProfile, tolerance: f64) -> Result<HitDistribution> {
    let mut total = HitDistribution::degenerate();
    for face in 1..FACE_BUCKETS {
        let count = profile[face];
        if count == 0 {
            continue;
        }
        total = combine_within(&total, &hit_distribution(count, face as u8), tolerance)?;
    }
    check_mass(&total, "exact_hits", tolerance)?;
    Ok(total)
}

/// Normal approximation of the total-hit distribution, renormalized onto 0..=hitters.
pub fn approximate_hits(profile: &HitProfile) -> HitDistribution {
    let n = profile.hitters() as usize;
    if n == 0 {
        return HitDistribution::degenerate();
    }

    // faces 1..=4 all have p in (0, 1), so any hitter makes the variance positive
    let (mean, variance) = (1..FACE_BUCKETS).fold((0.0, 0.0), |(mean, variance), face| {
        let count = f64::from(profile[face]);
        let p = face as f64 / f64::from(DIE_SIDES);
        (mean + count * p, variance + count * p * (1.0 - p))
    });

    let raw: Vec<f64> = (0..=n)
        .map(|hits| {
            let z = hits as f64 - mean;
            (-(z * z) / (2.0 * variance)).exp()
        })
        .collect();
    let normalization: f64 = raw.iter().sum();
    HitDistribution(raw.into_iter().map(|density| density / normalization).collect())
}

/// Hit distribution for a histogram under the chosen method; exact results are checked
/// against `tolerance`.
pub fn hits_for(profile: &HitProfile, method: HitMethod, tolerance: f64) -> Result<HitDistribution> {
    match method {
        HitMethod::Exact => exact_hits_within(profile, tolerance),
        HitMethod::Approximate => Ok(approximate_hits(profile)),
    }
}

fn check_mass(distribution: &HitDistribution, stage: &str, tolerance: f64) -> Result<()> {
    let total = distribution.total();
    if (1.0 - total).abs() > tolerance {
        return Err(OddsError::InvariantViolation {
            stage: stage.to_string(),
            total,
        });
    }
    Ok(())
}
