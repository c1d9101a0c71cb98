pub mod catalog;
pub mod cost;
pub mod error;
pub mod extract;
pub mod models;
pub mod normalizer;
pub mod policy;
pub mod prompt;
pub mod synthesizer;
pub mod transport;

pub use error::PlanError;
pub use extract::decode_model_text;
pub use models::*;
pub use normalizer::normalize;
pub use policy::{TripPolicy, MAX_TRAVELERS, MAX_TRIP_DAYS};
pub use prompt::build_prompt;
pub use synthesizer::synthesize;
pub use transport::{is_island, TransportKind};
