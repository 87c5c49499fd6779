// Synthetic fraud-sample generators, one per pattern family named in
// the batch detection-rate property. Deterministic given an index, so
// a run is reproducible without a real RNG dependency.

const NAMES: &[&str] = &["jsmith", "mchen", "alopez", "kwong", "dpatel", "rwhite", "tng", "sbrown"];
const DISPOSABLE_DOMAINS: &[&str] = &["mailinator.com", "10minutemail.com", "guerrillamail.com"];
const LEGIT_DOMAINS: &[&str] = &["example.com", "acme.org", "widgets.net"];

pub struct Sample {
    pub email: String,
    pub is_fraud: bool,
    pub family: &'static str,
}

fn pick<'a, T>(items: &'a [T], i: usize) -> &'a T {
    &items[i % items.len()]
}

pub fn generate(n: usize) -> Vec<Sample> {
    let families: &[fn(usize) -> Sample] = &[
        sequential,
        dated,
        plus_tagged,
        keyboard_walk,
        gibberish,
        disposable_domain,
        high_entropy,
        free_provider_plain,
        deep_subdomain,
        legit_plain,
        legit_name_with_dot,
    ];

    (0..n).map(|i| families[i % families.len()](i)).collect()
}

fn sequential(i: usize) -> Sample {
    Sample { email: format!("{}{:03}@{}", pick(NAMES, i), i, pick(LEGIT_DOMAINS, i)), is_fraud: true, family: "sequential" }
}

fn dated(i: usize) -> Sample {
    Sample {
        email: format!("{}{}@{}", pick(NAMES, i), 2020 + (i % 6), pick(LEGIT_DOMAINS, i)),
        is_fraud: true,
        family: "dated",
    }
}

fn plus_tagged(i: usize) -> Sample {
    Sample {
        email: format!("{}+signup{}@{}", pick(NAMES, i), i, pick(LEGIT_DOMAINS, i)),
        is_fraud: true,
        family: "plus_tagged",
    }
}

fn keyboard_walk(i: usize) -> Sample {
    let walks = ["qwerty", "asdfgh", "zxcvbn", "qazwsx"];
    Sample { email: format!("{}{}@{}", pick(&walks, i), i, pick(LEGIT_DOMAINS, i)), is_fraud: true, family: "keyboard_walk" }
}

fn gibberish(i: usize) -> Sample {
    let fragments = ["xqzvkp", "zjqxwv", "vkqxzj", "wzqkvx"];
    Sample { email: format!("{}{}@{}", pick(&fragments, i), i, pick(LEGIT_DOMAINS, i)), is_fraud: true, family: "gibberish" }
}

fn disposable_domain(i: usize) -> Sample {
    Sample {
        email: format!("{}@{}", pick(NAMES, i), pick(DISPOSABLE_DOMAINS, i)),
        is_fraud: true,
        family: "disposable_domain",
    }
}

fn high_entropy(i: usize) -> Sample {
    let fragments = ["x7q2kz9wvp", "q9zxk3mvpl", "z8qxv2kmnw"];
    Sample { email: format!("{}@{}", pick(&fragments, i), pick(LEGIT_DOMAINS, i)), is_fraud: true, family: "high_entropy" }
}

fn free_provider_plain(i: usize) -> Sample {
    Sample { email: format!("{}{}@gmail.com", pick(NAMES, i), i), is_fraud: false, family: "free_provider_plain" }
}

fn deep_subdomain(i: usize) -> Sample {
    Sample {
        email: format!("{}@a.b.c.{}", pick(NAMES, i), pick(LEGIT_DOMAINS, i)),
        is_fraud: true,
        family: "deep_subdomain",
    }
}

fn legit_plain(i: usize) -> Sample {
    Sample { email: format!("{}@{}", pick(NAMES, i), pick(LEGIT_DOMAINS, i)), is_fraud: false, family: "legit_plain" }
}

fn legit_name_with_dot(i: usize) -> Sample {
    Sample {
        email: format!("{}.{}@{}", pick(NAMES, i), pick(NAMES, i + 1), pick(LEGIT_DOMAINS, i)),
        is_fraud: false,
        family: "legit_name_with_dot",
    }
}
