mod eval;
pub use eval::EvalApp;

mod extract;
pub use extract::ExtractApp;

mod write_predictions;
pub use write_predictions::WritePredictionsApp;
