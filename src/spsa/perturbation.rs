use ndarray::Array1;

use super::random_stream::RandomStream;

/// Generuje perturbačný vektor Δ_k. Nový vektor pre každý odhad gradientu,
/// opakované použitie by spravilo odhad vychýleným.
pub struct PerturbationGenerator {
    dim: usize,
}

impl PerturbationGenerator {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    pub fn generate(&self, stream: &mut RandomStream) -> Array1<f64> {
        stream.next_bernoulli_vector(self.dim)
    }
}
