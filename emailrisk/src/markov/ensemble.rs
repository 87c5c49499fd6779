// Bigram/trigram ensemble arbitration. Each order scores a string as
// "legit" or "fraud" by comparing cross-entropy against a legit model
// and a fraud model; the ensemble then arbitrates between the two
// orders with a fixed rule cascade, the same ordered-override shape
// `engine/fusion.rs::fuse()` uses for its composite score.

use super::data;
use super::model::Model;

pub struct Ensemble {
    legit_bigram: Model,
    fraud_bigram: Model,
    legit_trigram: Model,
    fraud_trigram: Model,
}

#[derive(Debug, Clone)]
pub struct OrderPrediction {
    pub order: usize,
    pub fraud: bool,
    pub confidence: f64,
    pub legit_entropy: f64,
    pub fraud_entropy: f64,
}

#[derive(Debug, Clone)]
pub struct EnsembleResult {
    pub prediction_fraud: bool,
    pub confidence: f64,
    pub reasoning: &'static str,
    pub per_order: Vec<OrderPrediction>,
}

fn predict(order: usize, legit: &Model, fraud: &Model, s: &str) -> OrderPrediction {
    let legit_entropy = legit.cross_entropy(s);
    let fraud_entropy = fraud.cross_entropy(s);
    let max = legit_entropy.max(fraud_entropy);

    let (is_fraud, confidence) = if max == 0.0 {
        (false, 0.0)
    } else {
        // Lower cross-entropy against a model means a better fit to it.
        let fraud_fits_better = fraud_entropy < legit_entropy;
        let gap = (legit_entropy - fraud_entropy).abs();
        (fraud_fits_better, (gap / max).min(1.0))
    };

    OrderPrediction { order, fraud: is_fraud, confidence, legit_entropy, fraud_entropy }
}

impl Ensemble {
    pub fn new() -> Self {
        Self {
            legit_bigram: Model::new(2, data::LEGIT_BIGRAMS, data::EPSILON),
            fraud_bigram: Model::new(2, data::FRAUD_BIGRAMS, data::EPSILON),
            legit_trigram: Model::new(3, data::LEGIT_TRIGRAMS, data::EPSILON),
            fraud_trigram: Model::new(3, data::FRAUD_TRIGRAMS, data::EPSILON),
        }
    }

    /// Arbitrates bigram vs. trigram predictions with a fixed rule
    /// cascade, evaluated in order — each rule only fires when the
    /// previous ones don't apply.
    pub fn predict(&self, local_part: &str) -> EnsembleResult {
        let bigram = predict(2, &self.legit_bigram, &self.fraud_bigram, local_part);
        let trigram = predict(3, &self.legit_trigram, &self.fraud_trigram, local_part);
        let agree = bigram.fraud == trigram.fraud;

        let (prediction_fraud, confidence, reasoning) = if agree && bigram.confidence.min(trigram.confidence) > 0.30 {
            (bigram.fraud, bigram.confidence.max(trigram.confidence), "both_agree_high_confidence")
        } else if trigram.confidence > 0.50 && trigram.confidence > 1.5 * bigram.confidence {
            (trigram.fraud, trigram.confidence, "3gram_high_confidence_override")
        } else if bigram.fraud && bigram.confidence > 0.20 && bigram.fraud_entropy > 6.0 {
            (true, bigram.confidence, "2gram_gibberish_detection")
        } else if !agree {
            (bigram.fraud, bigram.confidence, "disagree_default_to_2gram")
        } else if bigram.confidence >= trigram.confidence {
            (bigram.fraud, bigram.confidence, "highest_confidence_wins")
        } else {
            (trigram.fraud, trigram.confidence, "highest_confidence_wins")
        };

        EnsembleResult {
            prediction_fraud,
            confidence,
            reasoning,
            per_order: vec![bigram, trigram],
        }
    }
}

impl Default for Ensemble {
    fn default() -> Self {
        Self::new()
    }
}

pub fn detector_risk(result: &EnsembleResult) -> f64 {
    if result.prediction_fraud {
        result.confidence
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_name_is_not_fraud() {
        let ensemble = Ensemble::new();
        let result = ensemble.predict("johnsmith");
        assert!(!result.prediction_fraud);
    }

    #[test]
    fn random_consonant_string_is_fraud() {
        let ensemble = Ensemble::new();
        let result = ensemble.predict("qxzvqkxzq");
        assert!(result.prediction_fraud);
    }

    #[test]
    fn zero_cross_entropy_yields_zero_confidence() {
        let ensemble = Ensemble::new();
        let result = ensemble.predict("");
        assert_eq!(result.confidence, 0.0);
        assert!(!result.prediction_fraud);
    }
}
