use crate::config::parser::parse_duration;
use crate::config::types::CrawlerConfig;

/// Raw positional arguments of the `status` command
///
/// Every value is kept as text so that a malformed argument can fall back
/// to the configured value instead of failing the whole invocation.
#[derive(Debug, Clone, Default)]
pub struct PositionalOverrides<'a> {
    pub max_concurrency: Option<&'a str>,
    pub requests_per_host: Option<&'a str>,
    pub rate_interval: Option<&'a str>,
}

impl PositionalOverrides<'_> {
    /// Applies the overrides that parse, silently keeping the current value
    /// for those that don't
    pub fn apply(&self, config: &mut CrawlerConfig) {
        if let Some(value) = self.max_concurrency.and_then(parse_positive::<usize>) {
            config.max_concurrent = value;
        } else if let Some(raw) = self.max_concurrency {
            tracing::debug!("Ignoring maxConcurrency argument {:?}", raw);
        }

        if let Some(value) = self.requests_per_host.and_then(parse_positive::<u32>) {
            config.requests_per_host = value;
        } else if let Some(raw) = self.requests_per_host {
            tracing::debug!("Ignoring requestsPerHost argument {:?}", raw);
        }

        match self.rate_interval.map(parse_duration) {
            Some(Ok(interval)) if !interval.is_zero() => config.rate_interval = interval,
            Some(_) => tracing::debug!("Ignoring rateInterval argument {:?}", self.rate_interval),
            None => {}
        }
    }
}

fn parse_positive<T>(raw: &str) -> Option<T>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    raw.trim().parse::<T>().ok().filter(|v| *v > T::default())
}
