//! Game-over quotes
//!
//! A fixed, local pool of taunts and praise from the arena's master, picked
//! by how well the run went.

use crate::sim::RunSummary;

/// Which pool a run draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Novice,
    Adept,
    Master,
}

impl Verdict {
    pub fn for_score(score: u64) -> Self {
        if score > 2000 {
            Verdict::Master
        } else if score > 500 {
            Verdict::Adept
        } else {
            Verdict::Novice
        }
    }

    fn pool(self) -> &'static [&'static str] {
        match self {
            Verdict::Novice => NOVICE,
            Verdict::Adept => ADEPT,
            Verdict::Master => MASTER,
        }
    }
}

const NOVICE: &[&str] = &[
    "Down already? I had not even warmed my blade.",
    "Your inner strength is a puddle. Every technique you learn drains into it.",
    "Go fetch water for the monastery kitchen. Even that may be too demanding.",
    "A frog in a well, croaking at a patch of sky.",
    "I have seen scarecrows hold their ground longer.",
    "Talent like yours is rare. Rarely this scarce, I mean.",
];

const ADEPT: &[&str] = &[
    "Interesting. There is a shadow of real training in your footwork.",
    "You lasted a few exchanges. The provinces would call you a fighter.",
    "Your spin has some fire in it. Not much, but some.",
    "Hand me your technique manual and I might teach you what it means.",
    "Not a legend, but not a coward either.",
];

const MASTER: &[&str] = &[
    "Remarkable! I did not think such skill still walked this earth.",
    "Few have ever made me sweat. Count yourself among them.",
    "My flame blade could find no opening. Your cultivation is complete.",
    "The old sweeper of the temple would bow to you today.",
    "Tigers hide in these hills after all. My eyes are opened.",
];

/// Pick a quote for a finished run; `draw` is a uniform sample in [0, 1)
pub fn wisdom(summary: &RunSummary, draw: f32) -> &'static str {
    let pool = Verdict::for_score(summary.score).pool();
    let idx = ((draw.clamp(0.0, 1.0) * pool.len() as f32) as usize).min(pool.len() - 1);
    pool[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(score: u64) -> RunSummary {
        RunSummary { score, level: 1 }
    }

    #[test]
    fn test_verdict_thresholds() {
        assert_eq!(Verdict::for_score(0), Verdict::Novice);
        assert_eq!(Verdict::for_score(500), Verdict::Novice);
        assert_eq!(Verdict::for_score(501), Verdict::Adept);
        assert_eq!(Verdict::for_score(2000), Verdict::Adept);
        assert_eq!(Verdict::for_score(2001), Verdict::Master);
    }

    #[test]
    fn test_quote_comes_from_matching_pool() {
        assert!(NOVICE.contains(&wisdom(&run(10), 0.5)));
        assert!(ADEPT.contains(&wisdom(&run(900), 0.0)));
        assert!(MASTER.contains(&wisdom(&run(5000), 0.999)));
    }

    #[test]
    fn test_draw_edges_stay_in_bounds() {
        assert_eq!(wisdom(&run(5000), 1.0), MASTER[MASTER.len() - 1]);
        assert_eq!(wisdom(&run(5000), -3.0), MASTER[0]);
    }
}
