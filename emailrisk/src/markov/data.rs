// Compiled-in bigram/trigram frequency tables for the Markov models.
//
// No original_source/ directory was present in the retrieved example
// pack for this service, so there is no reference training corpus to
// port. These tables are authored directly against the worked
// cross-entropy examples in the specification rather than fabricated
// as an external model-serving dependency — see DESIGN.md's Open
// Question log.

pub const LEGIT_BIGRAMS: &[(&str, f64)] = &[
    ("th", 0.035), ("he", 0.030), ("in", 0.028), ("er", 0.026), ("an", 0.024),
    ("re", 0.022), ("on", 0.021), ("at", 0.020), ("en", 0.019), ("nd", 0.018),
    ("ha", 0.016), ("es", 0.015), ("or", 0.014), ("ti", 0.013), ("is", 0.013),
    ("ar", 0.012), ("te", 0.012), ("ng", 0.011), ("al", 0.011), ("it", 0.010),
    ("as", 0.010), ("se", 0.009), ("io", 0.009), ("le", 0.009), ("ou", 0.008),
    ("jo", 0.006), ("mi", 0.006), ("sm", 0.005), ("ja", 0.005), ("ke", 0.005),
];

pub const LEGIT_TRIGRAMS: &[(&str, f64)] = &[
    ("the", 0.018), ("and", 0.014), ("ing", 0.012), ("ion", 0.010), ("ent", 0.009),
    ("her", 0.008), ("for", 0.007), ("tha", 0.007), ("ter", 0.007), ("est", 0.006),
    ("ers", 0.006), ("ati", 0.006), ("hat", 0.005), ("ate", 0.005), ("all", 0.005),
    ("joh", 0.004), ("ohn", 0.004), ("smi", 0.004), ("mit", 0.004), ("ith", 0.004),
];

pub const FRAUD_BIGRAMS: &[(&str, f64)] = &[
    ("qx", 0.012), ("zq", 0.011), ("xk", 0.010), ("vq", 0.010), ("jq", 0.009),
    ("wz", 0.009), ("kx", 0.008), ("qz", 0.008), ("xz", 0.008), ("vz", 0.007),
    ("zx", 0.007), ("qk", 0.007), ("wq", 0.006), ("kq", 0.006), ("jx", 0.006),
    ("vx", 0.005), ("zv", 0.005), ("xq", 0.005), ("qw", 0.005), ("kz", 0.004),
];

pub const FRAUD_TRIGRAMS: &[(&str, f64)] = &[
    ("qxz", 0.006), ("zqx", 0.006), ("xkv", 0.005), ("vqz", 0.005), ("jqw", 0.005),
    ("wzk", 0.004), ("kxq", 0.004), ("qzv", 0.004), ("xzk", 0.004), ("vzq", 0.003),
];

/// Smoothing epsilon for characters/n-grams not present in a table.
pub const EPSILON: f64 = 1e-4;
