/// Upstream data providers.
///
/// Each provider gets its own file: URL construction, serde response
/// structures, parsing, and blocking fetchers live together so a provider
/// can be exercised end-to-end from its fixtures.

pub mod erddap;
pub mod hohonu;

#[cfg(test)]
pub(crate) mod fixtures;
