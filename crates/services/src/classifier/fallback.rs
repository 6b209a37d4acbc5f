use rand::Rng;

use quiz_core::model::Verdict;

/// Picks the verdict recorded when the classifier cannot be reached.
pub trait FallbackPolicy: Send + Sync {
    fn verdict(&self) -> Verdict;
}

/// Uniformly random verdict; the service default.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFallback;

impl FallbackPolicy for RandomFallback {
    fn verdict(&self) -> Verdict {
        let idx = rand::rng().random_range(0..Verdict::ALL.len());
        Verdict::ALL[idx]
    }
}

/// Always the same verdict.
#[derive(Debug, Clone, Copy)]
pub struct FixedFallback(pub Verdict);

impl FallbackPolicy for FixedFallback {
    fn verdict(&self) -> Verdict {
        self.0
    }
}
