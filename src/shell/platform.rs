//! Platform and environment detection.

/// Variables set by common CI providers.
const CI_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
///
/// Spinners and prompts are suppressed in CI; `CI=false` opts back in.
pub fn is_ci() -> bool {
    ci_from(|name| std::env::var(name).ok())
}

fn ci_from(lookup: impl Fn(&str) -> Option<String>) -> bool {
    CI_VARS.iter().any(|name| match lookup(name) {
        Some(value) => !matches!(value.trim(), "false" | "0"),
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    type Vars = HashMap<&'static str, &'static str>;

    fn lookup(vars: &Vars) -> impl Fn(&str) -> Option<String> + '_ {
        move |name: &str| vars.get(name).map(|v| v.to_string())
    }

    #[test]
    fn no_provider_variables_is_not_ci() {
        let vars = HashMap::new();
        assert!(!ci_from(lookup(&vars)));
    }

    #[test]
    fn any_provider_variable_is_ci() {
        for name in CI_VARS {
            let vars = HashMap::from([(*name, "true")]);
            assert!(ci_from(lookup(&vars)), "{name} should mark CI");
        }
        let jenkins = HashMap::from([("JENKINS_URL", "https://ci.example.com/")]);
        assert!(ci_from(lookup(&jenkins)));
    }

    #[test]
    fn explicit_false_is_not_ci() {
        let vars = HashMap::from([("CI", "false")]);
        assert!(!ci_from(lookup(&vars)));
        let vars = HashMap::from([("CI", "0")]);
        assert!(!ci_from(lookup(&vars)));
    }

    #[test]
    fn false_ci_does_not_mask_another_provider() {
        let vars = HashMap::from([("CI", "false"), ("GITHUB_ACTIONS", "true")]);
        assert!(ci_from(lookup(&vars)));
    }
}
