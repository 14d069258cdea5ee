use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedovaný zdroj náhody pre jeden beh.
///
/// Každý beh si vytvorí vlastný stream, žiadny globálny generátor neexistuje.
/// Výstup závisí len od seedu a počtu predchádzajúcich ťahov.
#[derive(Debug, Clone)]
pub struct RandomStream {
    rng: ChaCha8Rng,
    draws: u64,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            draws: 0,
        }
    }

    /// Vektor nezávislých ±1, každá hodnota s pravdepodobnosťou 1/2.
    pub fn next_bernoulli_vector(&mut self, dim: usize) -> Array1<f64> {
        self.draws += dim as u64;
        Array1::from_iter((0..dim).map(|_| if self.rng.gen::<bool>() { 1.0 } else { -1.0 }))
    }

    /// Uniformná hodnota v [0, 1).
    pub fn next_uniform(&mut self) -> f64 {
        self.draws += 1;
        self.rng.gen::<f64>()
    }

    pub fn next_uniform_vector(&mut self, dim: usize) -> Array1<f64> {
        Array1::from_iter((0..dim).map(|_| self.next_uniform()))
    }

    /// Nový seed pre odvodený generátor (napr. pre CV splitter).
    pub fn next_seed(&mut self) -> u64 {
        self.draws += 1;
        self.rng.gen::<u64>()
    }

    pub fn draws(&self) -> u64 {
        self.draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = RandomStream::new(7);
        let mut b = RandomStream::new(7);
        assert_eq!(a.next_bernoulli_vector(16), b.next_bernoulli_vector(16));
        assert_eq!(a.next_uniform().to_bits(), b.next_uniform().to_bits());
        assert_eq!(a.draws(), 17);
    }

    #[test]
    fn bernoulli_vector_is_plus_minus_one() {
        let mut stream = RandomStream::new(1);
        let v = stream.next_bernoulli_vector(1000);
        assert!(v.iter().all(|&x| x == 1.0 || x == -1.0));
        let plus = v.iter().filter(|&&x| x > 0.0).count();
        assert!(plus > 400 && plus < 600);
    }

    #[test]
    fn uniform_in_unit_interval() {
        let mut stream = RandomStream::new(3);
        for _ in 0..1000 {
            let u = stream.next_uniform();
            assert!((0.0..1.0).contains(&u));
        }
    }
}
