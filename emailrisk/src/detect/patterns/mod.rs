pub mod dated;
pub mod gibberish;
pub mod keyboard_walk;
pub mod plus_addressing;
pub mod sequential;

#[derive(Debug, Clone, Default)]
pub struct PatternSignals {
    pub sequential_hit: bool,
    pub sequential_confidence: f64,
    pub dated_hit: bool,
    pub dated_confidence: f64,
    pub dated_shape: Option<&'static str>,
    pub plus_tag_present: bool,
    pub plus_tag_suspicious: bool,
    pub stripped_local: String,
    pub keyboard_walk_hit: bool,
    pub keyboard_walk_confidence: f64,
    pub gibberish_score: f64,
    pub gibberish_confidence: f64,
}

pub fn run_all(local_part: &str) -> PatternSignals {
    let plus = plus_addressing::analyze(local_part);
    let stripped = plus.stripped_local.clone();

    let sequential = sequential::analyze(&stripped);
    let dated = dated::analyze(&stripped);
    let walk = keyboard_walk::analyze(&stripped);
    let gibberish = gibberish::analyze(&stripped);

    PatternSignals {
        sequential_hit: sequential.hit,
        sequential_confidence: sequential::detector_risk(&sequential),
        dated_hit: dated.hit,
        dated_confidence: dated::detector_risk(&dated),
        dated_shape: dated.shape,
        plus_tag_present: plus.tag_present,
        plus_tag_suspicious: plus.suspicious_tag,
        stripped_local: stripped,
        keyboard_walk_hit: walk.hit,
        keyboard_walk_confidence: keyboard_walk::detector_risk(&walk),
        gibberish_score: 1.0 - gibberish.overall,
        gibberish_confidence: gibberish.confidence,
    }
}
