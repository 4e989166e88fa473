//! Binomial comparison of the observed win split against a fair coin.
//!
//! Draws carry no information about relative strength, so the null model is
//! Binomial(n, 0.5) over the decisive games only. The output is descriptive -
//! the observed split next to the null distribution - not a hypothesis test
//! with a significance threshold.

use llarena_core::GameOutcome;

/// Binomial(n, p) null distribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinomialNull {
    pub n: u64,
    pub p: f64,
}

impl BinomialNull {
    pub fn fair(n: u64) -> Self {
        Self { n, p: 0.5 }
    }

    /// P(X = k).
    ///
    /// Computed in log space so large n cannot overflow the binomial
    /// coefficient: ln C(n, k) = sum over i of ln((n - k + i) / i).
    pub fn pmf(&self, k: u64) -> f64 {
        if k > self.n {
            return 0.0;
        }
        // C(n, k) is symmetric; sum the smaller tail
        let k_eff = k.min(self.n - k);
        let mut ln_coeff = 0.0_f64;
        for i in 1..=k_eff {
            ln_coeff += ((self.n - k_eff + i) as f64 / i as f64).ln();
        }
        let ln_p = ln_coeff + k as f64 * self.p.ln() + (self.n - k) as f64 * (1.0 - self.p).ln();
        ln_p.exp()
    }

    pub fn mean(&self) -> f64 {
        self.n as f64 * self.p
    }
}

/// The observed win split set against the fair-coin null
#[derive(Debug, Clone, PartialEq)]
pub struct BinomialComparison {
    /// Games that produced a winner
    pub decisive_games: u64,
    /// Player 1 wins among the decisive games
    pub observed_wins: u64,
    /// observed_wins / decisive_games
    pub observed_probability: f64,
    /// P(X = observed_wins) under the null
    pub pmf_at_observed: f64,
    /// Two-sided tail: total probability of outcomes no likelier than the
    /// observed one
    pub tail_probability: f64,
}

impl BinomialComparison {
    /// Compare a batch of outcomes against Binomial(decisive, 0.5).
    /// Returns None when no game was decisive - there is nothing to compare.
    pub fn against_fair_coin(outcomes: &[GameOutcome]) -> Option<Self> {
        let decisive: Vec<u8> = outcomes
            .iter()
            .filter_map(|o| match o {
                GameOutcome::Win(player) => Some(*player),
                GameOutcome::Draw => None,
            })
            .collect();

        if decisive.is_empty() {
            return None;
        }

        let n = decisive.len() as u64;
        let wins = decisive.iter().filter(|&&p| p == 1).count() as u64;
        let null = BinomialNull::fair(n);
        let pmf_at_observed = null.pmf(wins);

        // Float round-off must not exclude the observed outcome itself
        let threshold = pmf_at_observed * (1.0 + 1e-9);
        let tail_probability = (0..=n)
            .map(|k| null.pmf(k))
            .filter(|&p| p <= threshold)
            .sum::<f64>()
            .min(1.0);

        Some(Self {
            decisive_games: n,
            observed_wins: wins,
            observed_probability: wins as f64 / n as f64,
            pmf_at_observed,
            tail_probability,
        })
    }

    /// Human-readable block for the text report
    pub fn report(&self) -> String {
        let null = BinomialNull::fair(self.decisive_games);
        format!(
            "Fairness comparison (decisive games only):\n\
             Decisive games: {}\n\
             Player 1 wins: {} (observed win rate {:.3})\n\
             Expected under a fair coin: {:.1}\n\
             P(exactly this split | fair coin) = {:.6}\n\
             P(a split at least this uneven | fair coin) = {:.6}\n",
            self.decisive_games,
            self.observed_wins,
            self.observed_probability,
            null.mean(),
            self.pmf_at_observed,
            self.tail_probability,
        )
    }
}
