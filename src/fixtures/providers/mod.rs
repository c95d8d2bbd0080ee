pub mod allsports;
pub mod api_football;
pub mod football_data;
pub mod openligadb;
pub mod scorebat;

pub use allsports::AllSportsApi;
pub use api_football::ApiFootball;
pub use football_data::FootballData;
pub use openligadb::OpenLigaDb;
pub use scorebat::ScoreBat;

use super::models::ProviderKind;
use super::provider::MatchAdapter;

static OPENLIGADB: OpenLigaDb = OpenLigaDb;
static FOOTBALL_DATA: FootballData = FootballData;
static API_FOOTBALL: ApiFootball = ApiFootball;
static ALLSPORTS: AllSportsApi = AllSportsApi;
static SCOREBAT: ScoreBat = ScoreBat;

/// The adapter that understands `kind`'s wire shape.
pub fn adapter_for(kind: ProviderKind) -> &'static dyn MatchAdapter {
    match kind {
        ProviderKind::OpenLigaDb => &OPENLIGADB,
        ProviderKind::FootballData => &FOOTBALL_DATA,
        ProviderKind::ApiFootball => &API_FOOTBALL,
        ProviderKind::AllSportsApi => &ALLSPORTS,
        ProviderKind::ScoreBat => &SCOREBAT,
    }
}
