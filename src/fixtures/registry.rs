use super::models::{AuthMode, DateParams, ProviderConfig, ProviderKind};

pub const OPENLIGADB_URL: &str = "https://api.openligadb.de";
pub const FOOTBALL_DATA_URL: &str = "https://api.football-data.org";
pub const API_FOOTBALL_URL: &str = "https://v3.football.api-sports.io";
pub const ALLSPORTS_URL: &str = "https://apiv2.allsportsapi.com";
pub const SCOREBAT_URL: &str = "https://www.scorebat.com";

const ISO_DATE: &str = "%Y-%m-%d";

/// Secrets and toggles the registry is built from. A `None` key disables
/// the provider that needs it.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    /// OpenLigaDB league shortcut, e.g. "bl1"
    pub openligadb_league: String,
    pub football_data_key: Option<String>,
    pub api_football_key: Option<String>,
    pub allsports_key: Option<String>,
    pub scorebat_token: Option<String>,
}

/// Providers in fetch priority order. Earlier entries are always tried first.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<ProviderConfig>) -> Self {
        ProviderRegistry { providers }
    }

    /// The default lineup: keyless sources first, then keyed ones from the
    /// richest to the thinnest feed.
    pub fn from_credentials(creds: &ProviderCredentials) -> Self {
        let league = if creds.openligadb_league.trim().is_empty() {
            "bl1"
        } else {
            creds.openligadb_league.trim()
        };

        ProviderRegistry::new(vec![
            ProviderConfig {
                name: "OpenLigaDB".into(),
                kind: ProviderKind::OpenLigaDb,
                base_url: OPENLIGADB_URL.into(),
                path: format!("/getmatchdata/{}", league),
                auth: AuthMode::None,
                credential: None,
                date_params: DateParams::None,
                date_format: ISO_DATE.into(),
                static_query: vec![],
            },
            ProviderConfig {
                name: "Football-Data".into(),
                kind: ProviderKind::FootballData,
                base_url: FOOTBALL_DATA_URL.into(),
                path: "/v4/matches".into(),
                auth: AuthMode::Header("X-Auth-Token".into()),
                credential: creds.football_data_key.clone(),
                date_params: DateParams::Range {
                    from: "dateFrom".into(),
                    to: "dateTo".into(),
                },
                date_format: ISO_DATE.into(),
                static_query: vec![],
            },
            ProviderConfig {
                name: "API-Football".into(),
                kind: ProviderKind::ApiFootball,
                base_url: API_FOOTBALL_URL.into(),
                path: "/fixtures".into(),
                auth: AuthMode::Header("x-apisports-key".into()),
                credential: creds.api_football_key.clone(),
                date_params: DateParams::Single("date".into()),
                date_format: ISO_DATE.into(),
                static_query: vec![],
            },
            ProviderConfig {
                name: "AllSportsAPI".into(),
                kind: ProviderKind::AllSportsApi,
                base_url: ALLSPORTS_URL.into(),
                path: "/football/".into(),
                auth: AuthMode::Query("APIkey".into()),
                credential: creds.allsports_key.clone(),
                date_params: DateParams::Range {
                    from: "from".into(),
                    to: "to".into(),
                },
                date_format: ISO_DATE.into(),
                static_query: vec![("met".into(), "Fixtures".into())],
            },
            ProviderConfig {
                name: "ScoreBat".into(),
                kind: ProviderKind::ScoreBat,
                base_url: SCOREBAT_URL.into(),
                path: "/video-api/v3/feed/".into(),
                auth: AuthMode::Query("token".into()),
                credential: creds.scorebat_token.clone(),
                date_params: DateParams::None,
                date_format: ISO_DATE.into(),
                static_query: vec![],
            },
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name.as_str()).collect()
    }

    /// Providers that will actually be queried.
    pub fn enabled_names(&self) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| !p.is_missing_credential())
            .map(|p| p.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_is_stable() {
        let reg = ProviderRegistry::from_credentials(&ProviderCredentials::default());
        assert_eq!(
            reg.names(),
            vec!["OpenLigaDB", "Football-Data", "API-Football", "AllSportsAPI", "ScoreBat"]
        );
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn test_missing_keys_disable_providers() {
        let reg = ProviderRegistry::from_credentials(&ProviderCredentials {
            football_data_key: Some("fd".into()),
            ..Default::default()
        });
        assert_eq!(reg.enabled_names(), vec!["OpenLigaDB", "Football-Data"]);
    }

    #[test]
    fn test_undated_providers() {
        let reg = ProviderRegistry::from_credentials(&ProviderCredentials::default());
        let undated: Vec<&str> = reg
            .iter()
            .filter(|p| !p.is_date_scoped())
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(undated, vec!["OpenLigaDB", "ScoreBat"]);
        assert!(reg.get("Football-Data").unwrap().is_date_scoped());
        assert!(reg.get("Nope").is_none());
    }

    #[test]
    fn test_openligadb_league_override() {
        let reg = ProviderRegistry::from_credentials(&ProviderCredentials {
            openligadb_league: "bl2".into(),
            ..Default::default()
        });
        let first = reg.iter().next().unwrap();
        assert_eq!(first.path, "/getmatchdata/bl2");
    }
}
