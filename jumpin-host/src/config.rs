use std::{env, str::FromStr};

use color_eyre::eyre::{Result, WrapErr};
use jumpin::config::RulesConfig;

const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug)]
pub struct HostConfig {
    /// `tracing_subscriber::EnvFilter` directives.
    pub log_filter: String,
    pub rules: RulesConfig,
}

impl HostConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut rules = RulesConfig::default();
        if let Some(seed) = parse(&lookup, "JUMPIN_SEED")? {
            rules.seed = Some(seed);
        }
        if let Some(hand_size) = parse(&lookup, "JUMPIN_HAND_SIZE")? {
            rules.hand_size = hand_size;
        }
        if let Some(penalty) = parse(&lookup, "JUMPIN_PENALTY")? {
            rules.missed_uno_penalty = penalty;
        }
        if let Some(max_players) = parse(&lookup, "JUMPIN_MAX_PLAYERS")? {
            rules.max_players = max_players;
        }

        Ok(Self {
            log_filter: lookup("JUMPIN_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            rules,
        })
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .wrap_err_with(|| format!("Invalid value {value:?} for {key}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = HostConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.rules.hand_size, 7);
        assert_eq!(config.rules.missed_uno_penalty, 3);
        assert_eq!(config.rules.seed, None);
    }

    #[test]
    fn variables_override_rules() {
        let config = HostConfig::from_lookup(lookup_in(&[
            ("JUMPIN_LOG", "debug"),
            ("JUMPIN_SEED", "99"),
            ("JUMPIN_HAND_SIZE", "5"),
            ("JUMPIN_PENALTY", " 2 "),
            ("JUMPIN_MAX_PLAYERS", "6"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.rules.seed, Some(99));
        assert_eq!(config.rules.hand_size, 5);
        assert_eq!(config.rules.missed_uno_penalty, 2);
        assert_eq!(config.rules.max_players, 6);
    }

    #[test]
    fn unparsable_values_are_errors() {
        let error = HostConfig::from_lookup(lookup_in(&[("JUMPIN_SEED", "lots")])).unwrap_err();
        assert!(error.to_string().contains("JUMPIN_SEED"));
    }
}
