//! Environment configuration

/// Runtime configuration read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Seed for a reproducible session; entropy when unset
    pub seed: Option<u64>,
    /// Divisor applied to every real suspension (1 = real time)
    pub speedup: u32,
    /// Persona selected at startup
    pub persona: Option<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            speedup: 1,
            persona: None,
        }
    }
}

impl SimConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparseable values are ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("AGENT_CHAT_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(e) => tracing::warn!(value = %raw, error = %e, "Ignoring invalid AGENT_CHAT_SEED"),
            }
        }

        if let Some(raw) = lookup("AGENT_CHAT_SPEEDUP") {
            match raw.trim().parse::<u32>() {
                Ok(speedup) if speedup >= 1 => config.speedup = speedup,
                _ => tracing::warn!(value = %raw, "Ignoring invalid AGENT_CHAT_SPEEDUP"),
            }
        }

        config.persona = lookup("AGENT_CHAT_PERSONA")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = SimConfig::from_lookup(|_| None);
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.speedup, 1);
    }

    #[test]
    fn test_reads_all_values() {
        let config = SimConfig::from_lookup(lookup_from(&[
            ("AGENT_CHAT_SEED", "1234"),
            ("AGENT_CHAT_SPEEDUP", "10"),
            ("AGENT_CHAT_PERSONA", " gemini-analyst "),
        ]));
        assert_eq!(config.seed, Some(1234));
        assert_eq!(config.speedup, 10);
        assert_eq!(config.persona.as_deref(), Some("gemini-analyst"));
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = SimConfig::from_lookup(lookup_from(&[
            ("AGENT_CHAT_SEED", "not-a-number"),
            ("AGENT_CHAT_SPEEDUP", "0"),
            ("AGENT_CHAT_PERSONA", "   "),
        ]));
        assert_eq!(config, SimConfig::default());
    }
}
