pub mod representative;

pub use representative::RepresentativeSampler;
