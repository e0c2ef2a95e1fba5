use url::Url;

/// Builds the public address where an account's published feed is served.
///
/// The address depends on the account id only, so subscribers never need to
/// update their link after a push.
#[derive(Debug, Clone)]
pub struct FeedLocator {
    base_url: Url,
}

impl FeedLocator {
    pub fn new(base_url: Url) -> Self {
        FeedLocator { base_url }
    }

    pub fn parse(base_url: &str) -> Result<Self, url::ParseError> {
        Ok(FeedLocator::new(Url::parse(base_url)?))
    }

    pub fn feed_url(&self, account_id: &str) -> String {
        let file = format!("{account_id}.ics");
        let mut url = self.base_url.clone();

        {
            let Ok(mut segments) = url.path_segments_mut() else {
                return format!("{}/feeds/{file}", self.base_url.as_str().trim_end_matches('/'));
            };
            segments.pop_if_empty().push("feeds").push(&file);
        }

        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_on_bare_host() {
        let locator = FeedLocator::parse("https://jobs.example.com").unwrap();
        assert_eq!(
            locator.feed_url("acct-1"),
            "https://jobs.example.com/feeds/acct-1.ics"
        );
    }

    #[test]
    fn test_feed_url_keeps_base_path() {
        let locator = FeedLocator::parse("https://example.com/api/").unwrap();
        assert_eq!(
            locator.feed_url("acct-1"),
            "https://example.com/api/feeds/acct-1.ics"
        );
    }

    #[test]
    fn test_feed_url_encodes_account_id() {
        let locator = FeedLocator::parse("http://127.0.0.1:4096").unwrap();
        assert_eq!(
            locator.feed_url("a b/c"),
            "http://127.0.0.1:4096/feeds/a%20b%2Fc.ics"
        );
    }
}
