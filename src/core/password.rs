use crate::core::ports::SecretSource;
use rand::seq::SliceRandom;
use rand::thread_rng;

/// Upper + lower case letters, digits, and punctuation. 94 characters.
pub const PASSWORD_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Generates fixed-length secrets sampled without replacement from the
/// shuffled alphabet, so no character repeats within one secret.
#[derive(Debug, Clone)]
pub struct PasswordGenerator {
    length: usize,
}

impl PasswordGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl SecretSource for PasswordGenerator {
    fn generate(&self) -> String {
        let mut rng = thread_rng();

        let mut alphabet: Vec<char> = PASSWORD_ALPHABET.chars().collect();
        alphabet.shuffle(&mut rng);

        alphabet.choose_multiple(&mut rng, self.length).collect()
    }
}
