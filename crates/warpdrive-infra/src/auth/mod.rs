//! Authentication infrastructure - the Rotur validator client.

mod rotur;

pub use rotur::RoturValidator;
