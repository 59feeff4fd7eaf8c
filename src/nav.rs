// address helpers: search fallback for the start page and the navigation script

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search?q={query}";

const QUERY_PLACEHOLDER: &str = "{query}";

/// true for input that already names an http(s) address
pub fn is_absolute_http(input: &str) -> bool {
    let lower = input.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Where a start-page query should go: absolute addresses pass through,
/// everything else is sent to the search template percent-encoded.
pub fn home_target(query: &str, search_url: &str) -> String {
    if is_absolute_http(query) {
        return query.to_string();
    }
    let encoded = urlencoding::encode(query);
    if search_url.contains(QUERY_PLACEHOLDER) {
        search_url.replace(QUERY_PLACEHOLDER, &encoded)
    } else {
        format!("{search_url}{encoded}")
    }
}

/// `location.href` assignment with the url embedded as a json string literal
pub fn location_script(url: &str) -> String {
    let literal = serde_json::Value::from(url).to_string();
    format!("location.href = {literal};")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_param(url: &str) -> String {
        let (_, q) = url.split_once("?q=").unwrap();
        urlencoding::decode(q).unwrap().into_owned()
    }

    #[test]
    fn test_absolute_detection() {
        assert!(is_absolute_http("https://example.com"));
        assert!(is_absolute_http("HTTP://EXAMPLE.COM"));
        assert!(!is_absolute_http("openai.com"));
        assert!(!is_absolute_http("httpbin"));
        assert!(!is_absolute_http("ftp://example.com"));
    }

    #[test]
    fn test_bare_domain_goes_to_search() {
        let target = home_target("openai.com", DEFAULT_SEARCH_URL);
        assert!(target.starts_with("https://www.google.com/search?q="));
        assert_eq!(query_param(&target), "openai.com");
    }

    #[test]
    fn test_query_is_percent_encoded() {
        let target = home_target("rust & tauri?", DEFAULT_SEARCH_URL);
        assert_eq!(target, "https://www.google.com/search?q=rust%20%26%20tauri%3F");
        assert_eq!(query_param(&target), "rust & tauri?");

        let target = home_target("поиск", DEFAULT_SEARCH_URL);
        assert_eq!(query_param(&target), "поиск");
    }

    #[test]
    fn test_absolute_url_passes_through() {
        assert_eq!(
            home_target("https://example.com", DEFAULT_SEARCH_URL),
            "https://example.com"
        );
    }

    #[test]
    fn test_template_without_placeholder_appends() {
        assert_eq!(
            home_target("a b", "https://duckduckgo.com/?q="),
            "https://duckduckgo.com/?q=a%20b"
        );
    }

    #[test]
    fn test_location_script_escapes() {
        assert_eq!(
            location_script("https://example.com"),
            r#"location.href = "https://example.com";"#
        );
        assert_eq!(
            location_script(r#"x";alert(1);""#),
            r#"location.href = "x\";alert(1);\"";"#
        );
        assert_eq!(
            location_script("a\nb</script>"),
            "location.href = \"a\\nb</script>\";"
        );
    }
}
