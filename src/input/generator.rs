use rand::{Rng, RngCore};

/// Letters used for synthetic input. `q` and `v` are not part of it.
pub const ALPHABET: &[u8] = b"abcdefghijklmnoprstuwxyz";

pub fn generate(len: usize, rng: &mut dyn RngCore) -> Vec<u8> {
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
        .collect()
}
