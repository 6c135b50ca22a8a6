pub mod error;
pub mod features;
pub mod gbdt;
pub mod metrics;
pub mod split;
pub mod trainer;

pub use error::{Result, TrainError};
pub use features::{CATEGORICAL_FEATURES, FeatureMatrix, NUMERIC_FEATURES, build_feature_matrix};
pub use gbdt::{GbdtModel, GbdtParams};
pub use metrics::{accuracy, roc_auc};
pub use split::{TrainSplit, stratified_split};
pub use trainer::{TrainOutcome, train_readmission_model};
