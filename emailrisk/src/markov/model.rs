// A single order-k Markov model: maps an n-gram to a log-probability,
// with add-epsilon smoothing for unseen n-grams, and computes the
// cross-entropy of a string against the model.

use std::collections::HashMap;

pub struct Model {
    order: usize,
    log_probs: HashMap<String, f64>,
    epsilon_log_prob: f64,
}

impl Model {
    pub fn new(order: usize, frequencies: &[(&str, f64)], epsilon: f64) -> Self {
        let total: f64 = frequencies.iter().map(|(_, f)| f).sum::<f64>() + epsilon;
        let log_probs = frequencies
            .iter()
            .map(|(gram, freq)| (gram.to_string(), ((freq + epsilon) / total).log2()))
            .collect();
        let epsilon_log_prob = (epsilon / total).log2();
        Self { order, log_probs, epsilon_log_prob }
    }

    fn log_prob(&self, gram: &str) -> f64 {
        self.log_probs.get(gram).copied().unwrap_or(self.epsilon_log_prob)
    }

    /// Cross-entropy of `s` under this model, in bits: the mean negative
    /// log2-probability per n-gram, with `order-1` padding characters
    /// ('_') at both ends so the first/last characters are scored too.
    pub fn cross_entropy(&self, s: &str) -> f64 {
        if s.is_empty() {
            return 0.0;
        }
        let pad: String = "_".repeat(self.order.saturating_sub(1));
        let padded: Vec<char> = format!("{pad}{s}{pad}").chars().collect();

        if padded.len() < self.order {
            return 0.0;
        }

        let grams: Vec<String> =
            (0..=padded.len() - self.order).map(|i| padded[i..i + self.order].iter().collect()).collect();

        if grams.is_empty() {
            return 0.0;
        }

        let sum: f64 = grams.iter().map(|g| -self.log_prob(g)).sum();
        sum / grams.len() as f64
    }
}
