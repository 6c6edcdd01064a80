//! Password generation for in-process backends.

use sm_models::PasswordPolicy;

use rand::Rng;
use rand::seq::SliceRandom;

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &str = "0123456789";
const SPECIAL: &str = "!@#$%^&*";
const AMBIGUOUS: &str = "lIO01";

/// Each enabled set contributes its minimum; the rest is drawn from all enabled sets.
pub(crate) fn generate(policy: &PasswordPolicy) -> String {
    let sets = [
        (policy.lowercase(), policy.min_lowercase(), LOWERCASE),
        (policy.uppercase(), policy.min_uppercase(), UPPERCASE),
        (policy.numbers(), policy.min_number(), NUMBERS),
        (policy.special(), policy.min_special(), SPECIAL),
    ];

    let mut rng = rand::rng();
    let mut password = Vec::with_capacity(usize::from(policy.length()));
    let mut pool = Vec::new();

    for (enabled, minimum, alphabet) in sets {
        if !enabled {
            continue;
        }

        let set = characters(alphabet, policy.avoid_ambiguous());
        for _ in 0..minimum.unwrap_or(0) {
            password.push(set[rng.random_range(0..set.len())]);
        }
        pool.extend(set);
    }

    while password.len() < usize::from(policy.length()) {
        password.push(pool[rng.random_range(0..pool.len())]);
    }

    password.shuffle(&mut rng);
    password.into_iter().collect()
}

fn characters(alphabet: &str, avoid_ambiguous: bool) -> Vec<char> {
    alphabet
        .chars()
        .filter(|c| !avoid_ambiguous || !AMBIGUOUS.contains(*c))
        .collect()
}
