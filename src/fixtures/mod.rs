pub mod cache;
pub mod failover;
pub mod goals;
pub mod models;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod render;
pub mod transport;

pub use cache::{Clock, MatchCache, SystemClock};
pub use failover::MatchFetcher;
pub use goals::{GoalDetector, GoalEvent, ScoringSide};
pub use models::{FetchOutcome, MatchListing};
pub use registry::{ProviderCredentials, ProviderRegistry};
pub use transport::ReqwestTransport;
