//! Configuration management for restcrud

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use crate::utils::encode_uri_component;

/// HTTP method enumeration, one per verb operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        write!(f, "{}", method)
    }
}

/// Query component of the request URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Already encoded, appended as-is after the `?`.
    Raw(String),
    /// Key/value pairs encoded at dispatch time, in insertion order.
    Map(Vec<(String, String)>),
}

impl Query {
    /// Encode the query without the leading `?`.
    pub fn encode(&self, encoding: QueryEncoding) -> String {
        match self {
            Query::Raw(raw) => raw.clone(),
            Query::Map(pairs) => match encoding {
                QueryEncoding::Entries => pairs
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, encode_uri_component(value)))
                    .collect::<Vec<_>>()
                    .join("&"),
                QueryEncoding::LegacyIndexKeys => (0..pairs.len())
                    .map(|index| {
                        let key = index.to_string();
                        let value = pairs
                            .iter()
                            .find(|(k, _)| *k == key)
                            .map(|(_, v)| v.as_str())
                            .unwrap_or("undefined");
                        format!("{}={}", key, encode_uri_component(value))
                    })
                    .collect::<Vec<_>>()
                    .join("&"),
            },
        }
    }
}

impl From<&str> for Query {
    fn from(raw: &str) -> Self {
        Query::Raw(raw.to_string())
    }
}

impl From<String> for Query {
    fn from(raw: String) -> Self {
        Query::Raw(raw)
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for Query {
    fn from(pairs: Vec<(K, V)>) -> Self {
        Query::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Query {
    fn from(pairs: [(K, V); N]) -> Self {
        Query::from(Vec::from(pairs))
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for Query {
    fn from(map: BTreeMap<K, V>) -> Self {
        Query::from(map.into_iter().collect::<Vec<_>>())
    }
}

impl<K: Into<String>, V: Into<String>> From<HashMap<K, V>> for Query {
    fn from(map: HashMap<K, V>) -> Self {
        Query::from(map.into_iter().collect::<Vec<_>>())
    }
}

/// How a [`Query::Map`] is turned into a query string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryEncoding {
    /// `key=value` for every entry of the mapping.
    #[default]
    Entries,
    /// Positional indices as keys, each value looked up by its index string
    /// and rendered as `undefined` when missing. Matches what existing
    /// consumers of the browser client received.
    LegacyIndexKeys,
}

/// Per-request URL and method configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub host: String,
    /// Stored with its leading `:` separator.
    pub port: Option<String>,
    pub path: String,
    pub query: Option<Query>,
    pub query_encoding: QueryEncoding,
    pub cache_bust: bool,
    pub method: Option<HttpMethod>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        RequestConfig {
            host: String::new(),
            port: None,
            path: "/".to_string(),
            query: None,
            query_encoding: QueryEncoding::default(),
            cache_bust: false,
            method: None,
        }
    }
}

impl RequestConfig {
    /// Encoded query, or `None` when there is nothing to append.
    pub fn encoded_query(&self) -> Option<String> {
        self.query
            .as_ref()
            .map(|query| query.encode(self.query_encoding))
            .filter(|encoded| !encoded.is_empty())
    }

    /// Assemble the request URL, using `epoch_millis` for the cache-bust parameter.
    pub fn url_at(&self, epoch_millis: u128) -> String {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        let mut url = format!(
            "{}{}{}",
            self.host,
            self.port.as_deref().unwrap_or(""),
            path
        );

        let query = self.encoded_query();
        if let Some(query) = &query {
            url.push('?');
            url.push_str(query);
        }

        if self.cache_bust {
            let separator = if query.is_some() { '&' } else { '?' };
            url.push_str(&format!("{}d={}", separator, epoch_millis));
        }

        url
    }
}

/// Transport configuration for the reqwest-backed client
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub user_agent: Option<String>,
    pub connect_timeout: Duration,
    pub follow_redirects: bool,
    pub max_redirects: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            user_agent: Some(format!("restcrud/{}", crate::VERSION)),
            connect_timeout: Duration::from_secs(30),
            follow_redirects: true,
            max_redirects: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpMethod, Query, QueryEncoding, RequestConfig};

    fn config() -> RequestConfig {
        RequestConfig {
            host: "api.example.com".to_string(),
            ..RequestConfig::default()
        }
    }

    #[test]
    fn defaults_to_root_path_without_query() {
        let config = RequestConfig::default();
        assert_eq!(config.path, "/");
        assert!(config.query.is_none());
        assert!(!config.cache_bust);
        assert!(config.method.is_none());
        assert_eq!(config.url_at(0), "/");
    }

    #[test]
    fn url_joins_host_port_and_path() {
        let config = RequestConfig {
            port: Some(":8080".to_string()),
            path: "/users".to_string(),
            ..config()
        };
        assert_eq!(config.url_at(0), "api.example.com:8080/users");
    }

    #[test]
    fn empty_path_falls_back_to_root() {
        let config = RequestConfig {
            path: String::new(),
            ..config()
        };
        assert_eq!(config.url_at(0), "api.example.com/");
    }

    #[test]
    fn raw_query_is_appended_verbatim() {
        let config = RequestConfig {
            query: Some(Query::from("a=1&b=two words")),
            ..config()
        };
        assert_eq!(config.url_at(0), "api.example.com/?a=1&b=two words");
    }

    #[test]
    fn empty_query_is_treated_as_absent() {
        let config = RequestConfig {
            query: Some(Query::from("")),
            cache_bust: true,
            ..config()
        };
        assert_eq!(config.url_at(42), "api.example.com/?d=42");
    }

    #[test]
    fn cache_bust_uses_question_mark_without_query() {
        let config = RequestConfig {
            cache_bust: true,
            ..config()
        };
        assert_eq!(config.url_at(1700000000000), "api.example.com/?d=1700000000000");
    }

    #[test]
    fn cache_bust_uses_ampersand_after_query() {
        let config = RequestConfig {
            query: Some(Query::from("a=1")),
            cache_bust: true,
            ..config()
        };
        assert_eq!(config.url_at(5), "api.example.com/?a=1&d=5");
    }

    #[test]
    fn map_query_encodes_entries() {
        let query = Query::from([("name", "J Doe"), ("tag", "a&b")]);
        assert_eq!(
            query.encode(QueryEncoding::Entries),
            "name=J%20Doe&tag=a%26b"
        );
    }

    #[test]
    fn map_query_legacy_encoding_uses_indices() {
        let query = Query::from([("name", "J Doe"), ("tag", "x")]);
        assert_eq!(
            query.encode(QueryEncoding::LegacyIndexKeys),
            "0=undefined&1=undefined"
        );
    }

    #[test]
    fn map_query_legacy_encoding_reads_numeric_keys() {
        let query = Query::from([("1", "second"), ("name", "x")]);
        assert_eq!(
            query.encode(QueryEncoding::LegacyIndexKeys),
            "0=undefined&1=second"
        );
    }

    #[test]
    fn empty_map_query_is_absent() {
        let config = RequestConfig {
            query: Some(Query::Map(Vec::new())),
            ..config()
        };
        assert_eq!(config.encoded_query(), None);
        assert_eq!(config.url_at(0), "api.example.com/");
    }

    #[test]
    fn method_displays_as_http_verb() {
        let names: Vec<_> = [
            HttpMethod::Get,
            HttpMethod::Post,
            HttpMethod::Put,
            HttpMethod::Delete,
        ]
        .iter()
        .map(|method| method.to_string())
        .collect();
        assert_eq!(names, ["GET", "POST", "PUT", "DELETE"]);
        assert_eq!(HttpMethod::Delete.as_reqwest(), reqwest::Method::DELETE);
    }
}
