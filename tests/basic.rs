use restcrud::utils::UrlUtils;

#[test]
fn test_version() {
    assert!(!restcrud::VERSION.is_empty());
}

#[test]
fn test_url_utils_adds_scheme() {
    let url = UrlUtils::validate_url("example.com").expect("URL should parse");
    assert_eq!(url.scheme(), "http");
}

#[test]
fn test_logging_init_is_idempotent() {
    restcrud::logging::init();
    restcrud::logging::init();
}
