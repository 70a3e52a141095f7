pub mod artifacts;
pub mod classifier;
pub mod dataset;

pub use artifacts::{ArtifactLoader, ModelArtifacts};
pub use classifier::{Classifier, LinearRegression};
pub use dataset::{FeatureList, FeatureMatrix};
