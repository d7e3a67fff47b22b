//! Fitted preprocessing transformers for the train/inference consistency core.
//!
//! Each transformer comes as an unfitted/fitted pair: the unfitted half
//! carries configuration and learns statistics from the **training partition
//! only**; the fitted half is immutable and is applied identically to the
//! training matrix, the held-out test rows, and any new record scored later.
//!
//! - [`Imputer`]: fills missing cells from training statistics.
//! - [`CategoryEncoder`]: maps categorical strings through immutable
//!   [`CategoryCodebook`]s; unseen values are hard errors.
//! - [`StandardScaler`]: per-column centering/scaling of the numeric matrix.

pub mod encode;
pub mod impute;
pub mod scale;
pub mod traits;

pub use encode::{CategoryCodebook, CategoryEncoder, FittedCategoryEncoder};
pub use impute::{FittedImputer, Imputer};
pub use scale::{FittedStandardScaler, StandardScaler};
pub use traits::{FittedTransformer, Transformer};
