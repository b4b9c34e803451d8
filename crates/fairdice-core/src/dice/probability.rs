//! Monte Carlo win-rate estimation for the pre-match table.
//!
//! Not part of the fairness protocol, so any generator will do here.

use super::{Die, DieSet};
use rand::Rng;

/// Samples per die pair used by the pre-match table
pub const DEFAULT_TRIALS: u32 = 100_000;

/// Percentage of `trials` random roll pairs in which `a` shows a strictly higher face
pub fn estimate_win_rate<R: Rng + ?Sized>(a: &Die, b: &Die, trials: u32, rng: &mut R) -> f64 {
    if trials == 0 {
        return 0.0;
    }

    let a_faces = a.faces();
    let b_faces = b.faces();
    let wins = (0..trials)
        .filter(|_| {
            let roll_a = a_faces[rng.gen_range(0..a_faces.len())];
            let roll_b = b_faces[rng.gen_range(0..b_faces.len())];
            roll_a > roll_b
        })
        .count();

    wins as f64 / f64::from(trials) * 100.0
}

/// Exact percentage over all 36 face pairs
pub fn exact_win_rate(a: &Die, b: &Die) -> f64 {
    let total = a.faces().len() * b.faces().len();
    let wins = a
        .faces()
        .iter()
        .flat_map(|fa| b.faces().iter().map(move |fb| fa > fb))
        .filter(|&won| won)
        .count();

    wins as f64 / total as f64 * 100.0
}

/// Row `i`, column `j` holds the estimated chance that die `i` beats die `j`;
/// the diagonal is `None`.
pub fn win_rate_table<R: Rng + ?Sized>(
    dice: &DieSet,
    trials: u32,
    rng: &mut R,
) -> Vec<Vec<Option<f64>>> {
    dice.iter()
        .enumerate()
        .map(|(i, a)| {
            dice.iter()
                .enumerate()
                .map(|(j, b)| (i != j).then(|| estimate_win_rate(a, b, trials, rng)))
                .collect()
        })
        .collect()
}
