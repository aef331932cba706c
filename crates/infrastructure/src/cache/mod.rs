//! Cache implementations
//!
//! - `CachingProvider`: Moka-backed decorator around any transit data provider

mod caching_provider;

pub use caching_provider::{CacheStats, CachingProvider};

/// Build a cache key from an operation name, its path arguments and options
///
/// Options are serialized in name order, so equal option sets always yield
/// the same key.
#[must_use]
pub fn cache_key(operation: &str, args: &[&str], options: &[(String, String)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.extend_pairs(options);
    let args: Vec<String> = args
        .iter()
        .map(|a| url::form_urlencoded::byte_serialize(a.as_bytes()).collect())
        .collect();
    format!("{operation}:{}?{}", args.join("/"), query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_deterministic() {
        let opts = vec![("results".to_string(), "3".to_string())];
        let a = cache_key("stop", &["123"], &opts);
        let b = cache_key("stop", &["123"], &opts);
        assert_eq!(a, b);
        assert_eq!(a, "stop:123?results=3");
    }

    #[test]
    fn test_cache_key_escapes_arguments() {
        let a = cache_key("trip", &["a/b", "S1"], &[]);
        let b = cache_key("trip", &["a", "b/S1"], &[]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_cache_key_differs_by_operation() {
        assert_ne!(
            cache_key("departures", &["1"], &[]),
            cache_key("arrivals", &["1"], &[])
        );
    }
}
