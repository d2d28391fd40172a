//! Query parameter codec

use url::Url;

use crate::error::NavigationError;
use crate::Result;

pub const STANDARD_TAB_PARAM: &str = "standardTab";
pub const STICKY_TAB_PARAM: &str = "stickyTab";

/// Parse an address that can carry a query string.
///
/// `blob:`, `data:`, `about:` and other cannot-be-a-base addresses are
/// reported as restricted.
pub fn parse_address(href: &str) -> Result<Url> {
    let url = Url::parse(href)?;
    if url.cannot_be_a_base() {
        return Err(NavigationError::Restricted(format!(
            "{} addresses have no query string",
            url.scheme()
        )));
    }
    Ok(url)
}

/// True for no query at all and for a lone `?`
pub fn query_is_empty(url: &Url) -> bool {
    url.query().map_or(true, str::is_empty)
}

/// First value of `name`. An empty value reads as absent.
pub fn get_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Upsert `name`, or remove it when `value` is `None` or empty.
///
/// An existing parameter keeps its place; later duplicates are dropped.
/// A query left without parameters is removed entirely.
pub fn set_param(url: &mut Url, name: &str, value: Option<&str>) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    match value.filter(|v| !v.is_empty()) {
        Some(value) => match pairs.iter().position(|(key, _)| key == name) {
            Some(first) => {
                pairs[first].1 = value.to_string();
                let mut index = 0;
                pairs.retain(|(key, _)| {
                    let keep = index <= first || key != name;
                    index += 1;
                    keep
                });
            }
            None => pairs.push((name.to_string(), value.to_string())),
        },
        None => pairs.retain(|(key, _)| key != name),
    }

    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        parse_address(s).unwrap()
    }

    #[test]
    fn test_get_param() {
        let u = url("https://example.com/page?standardTab=tab-a&stickyTab=&x=1");
        assert_eq!(get_param(&u, STANDARD_TAB_PARAM), Some("tab-a".to_string()));
        assert_eq!(get_param(&u, STICKY_TAB_PARAM), None);
        assert_eq!(get_param(&u, "missing"), None);
    }

    #[test]
    fn test_set_param_upserts_in_place() {
        let mut u = url("https://example.com/?a=1&standardTab=old&b=2&standardTab=dup#top");
        set_param(&mut u, STANDARD_TAB_PARAM, Some("tab-b"));
        assert_eq!(u.as_str(), "https://example.com/?a=1&standardTab=tab-b&b=2#top");

        set_param(&mut u, STICKY_TAB_PARAM, Some("alpha"));
        assert_eq!(
            u.as_str(),
            "https://example.com/?a=1&standardTab=tab-b&b=2&stickyTab=alpha#top"
        );
    }

    #[test]
    fn test_set_param_removes() {
        let mut u = url("https://example.com/?stickyTab=alpha");
        set_param(&mut u, STICKY_TAB_PARAM, Some(""));
        assert_eq!(u.as_str(), "https://example.com/");
        assert!(query_is_empty(&u));

        let mut u = url("https://example.com/?standardTab=a&stickyTab=b");
        set_param(&mut u, STICKY_TAB_PARAM, None);
        assert_eq!(u.as_str(), "https://example.com/?standardTab=a");
    }

    #[test]
    fn test_query_is_empty() {
        assert!(query_is_empty(&url("https://example.com/")));
        assert!(query_is_empty(&url("https://example.com/?")));
        assert!(!query_is_empty(&url("https://example.com/?a=1")));
    }

    #[test]
    fn test_restricted_addresses() {
        for href in ["blob:https://example.com/123", "about:blank", "data:text/html,hi"] {
            let err = parse_address(href).unwrap_err();
            assert!(err.is_access_denied(), "{} should be restricted", href);
        }
        let err = parse_address("not a url").unwrap_err();
        assert!(!err.is_access_denied());
    }
}
