#[must_use]
pub(super) fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[must_use]
pub(super) fn read_env_u64(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|raw| parse_u64(&raw))
}

#[must_use]
pub(super) fn parse_u64(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}
