//! Platform environment detection.

/// Check if running in a CI environment.
///
/// Used in `main()` to force the non-interactive UI. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`, `TF_BUILD`.
pub fn is_ci() -> bool {
    is_ci_with(|key| std::env::var_os(key).is_some())
}

/// [`is_ci`] with a custom env var presence check.
pub fn is_ci_with<F>(is_set: F) -> bool
where
    F: Fn(&str) -> bool,
{
    [
        "CI",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "CIRCLECI",
        "TRAVIS",
        "JENKINS_URL",
        "TF_BUILD",
    ]
    .iter()
    .any(|key| is_set(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_any_known_variable() {
        assert!(is_ci_with(|k| k == "TF_BUILD"));
        assert!(is_ci_with(|k| k == "GITHUB_ACTIONS"));
    }

    #[test]
    fn no_variables_means_not_ci() {
        assert!(!is_ci_with(|_| false));
    }
}
