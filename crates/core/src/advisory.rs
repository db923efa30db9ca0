//! Post-deploy access hints
//!
//! Hints come from an ordered rule table matched against the lab name;
//! the first matching rule wins.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// Maps lab names containing any of `contains` to `hint`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvisoryRule {
    /// Substrings of the lab name that select this rule
    pub contains: Vec<String>,
    /// Access hint shown after a successful start
    pub hint: String,
}

impl AdvisoryRule {
    pub fn new(contains: &[&str], hint: &str) -> Self {
        Self {
            contains: contains.iter().map(|s| s.to_string()).collect(),
            hint: hint.to_string(),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.contains.iter().any(|pattern| name.contains(pattern.as_str()))
    }
}

static BUILTIN_RULES: Lazy<Vec<AdvisoryRule>> = Lazy::new(|| {
    vec![
        AdvisoryRule::new(
            &["web-vuln", "juice-shop"],
            "Access the Juice Shop at http://localhost:3000",
        ),
        AdvisoryRule::new(&["sql-injection", "dvwa"], "Access DVWA at http://localhost"),
        AdvisoryRule::new(
            &["android"],
            "Connect to the device with: adb connect localhost:5555",
        ),
        AdvisoryRule::new(
            &["ids"],
            "Get a shell in the attacker container with: docker exec -it attacker-lab /bin/sh",
        ),
    ]
});

/// Resolves the access hint for a lab name
#[derive(Debug, Clone)]
pub struct AdvisoryResolver {
    rules: Vec<AdvisoryRule>,
}

impl Default for AdvisoryResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AdvisoryResolver {
    /// Resolver with only the built-in catalog rules
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.clone(),
        }
    }

    /// Resolver that checks `rules` before the built-in catalog
    pub fn with_rules(rules: Vec<AdvisoryRule>) -> Self {
        let mut all = rules;
        all.extend(BUILTIN_RULES.iter().cloned());
        Self { rules: all }
    }

    pub fn rules(&self) -> &[AdvisoryRule] {
        &self.rules
    }

    pub fn hint_for(&self, name: &str) -> Option<String> {
        self.rules
            .iter()
            .find(|rule| rule.matches(name))
            .map(|rule| rule.hint.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_hints() {
        let resolver = AdvisoryResolver::builtin();

        let juice = resolver.hint_for("owasp-web-vuln").unwrap();
        assert!(juice.contains("Juice Shop"));
        assert!(juice.contains("http://localhost:3000"));

        let dvwa = resolver.hint_for("sql-injection-dvwa").unwrap();
        assert!(dvwa.contains("DVWA"));

        assert!(resolver.hint_for("android-pentest").unwrap().contains("adb connect"));
        assert!(resolver.hint_for("ids-lab").unwrap().contains("attacker-lab"));
        assert_eq!(resolver.hint_for("unrelated-lab"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let resolver = AdvisoryResolver::builtin();
        // matches both the Juice Shop and DVWA rules
        let hint = resolver.hint_for("juice-shop-dvwa").unwrap();
        assert!(hint.contains("Juice Shop"));
    }

    #[test]
    fn test_custom_rules_take_precedence() {
        let resolver = AdvisoryResolver::with_rules(vec![AdvisoryRule::new(
            &["dvwa-legacy"],
            "Access legacy DVWA at http://localhost:8080",
        )]);

        assert_eq!(
            resolver.hint_for("dvwa-legacy").as_deref(),
            Some("Access legacy DVWA at http://localhost:8080")
        );
        assert_eq!(
            resolver.hint_for("dvwa").as_deref(),
            Some("Access DVWA at http://localhost")
        );
        assert_eq!(resolver.rules().len(), 5);
    }
}
