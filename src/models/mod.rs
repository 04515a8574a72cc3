pub mod analysis;

pub use analysis::{BiasAnalysis, BiasCategory, BiasFinding, NewAnalysis};
