use super::{config::SortMode, config::TopPeriod, AccessToken, OAUTH_BASE, PUBLIC_BASE};

/// Placeholder replaced by the computed listing URL in a request URL template
pub const REQUEST_URL_PLACEHOLDER: &str = "{REQUEST-URL}";

/// Sent when no application name is configured; the anonymous API rate limits
/// non-browser agents aggressively.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:135.0) Gecko/20100101 Firefox/135.0";

/// Fully formed outbound listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl ListingRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Inputs of the request builder
#[derive(Debug, Clone, Copy)]
pub struct RequestParams<'a> {
    pub subreddit: &'a str,
    pub sort: SortMode,
    pub top_period: TopPeriod,
    pub search: &'a str,
    pub request_url_template: &'a str,
    pub app_name: &'a str,
}

/// `User-Agent` value for an application name (`<app>/1.0`)
pub fn app_user_agent(app_name: &str) -> String {
    format!("{app_name}/1.0")
}

fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value).replace("%20", "+")
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Compute the listing or search URL before any rewrite template is applied
pub fn listing_url(params: &RequestParams<'_>, authenticated: bool) -> String {
    let base = if authenticated { OAUTH_BASE } else { PUBLIC_BASE };
    let searching = !params.search.is_empty();

    let mut query: Vec<(&str, String)> = Vec::new();

    if searching {
        query.push(("q", format!("{} subreddit:{}", params.search, params.subreddit)));
        query.push(("sort", params.sort.as_str().to_string()));
    }

    if params.sort == SortMode::Top {
        query.push(("t", params.top_period.as_str().to_string()));
    }

    let query = encode_query(&query);

    if searching {
        format!("{base}/search.json?{query}")
    } else {
        format!(
            "{base}/r/{}/{}.json?{query}",
            params.subreddit,
            params.sort.as_str()
        )
    }
}

/// Replace every `{REQUEST-URL}` in the template with the computed URL
pub fn apply_request_url_template(template: &str, request_url: &str) -> String {
    template.replace(REQUEST_URL_PLACEHOLDER, request_url)
}

/// Build the outbound listing request, URL and headers
pub fn build_listing_request(params: &RequestParams<'_>, token: Option<&AccessToken>) -> ListingRequest {
    let mut url = listing_url(params, token.is_some());

    if !params.request_url_template.is_empty() {
        url = apply_request_url_template(params.request_url_template, &url);
    }

    let user_agent = if params.app_name.is_empty() {
        BROWSER_USER_AGENT.to_string()
    } else {
        app_user_agent(params.app_name)
    };

    let mut headers = vec![("User-Agent".to_string(), user_agent)];

    if let Some(token) = token {
        headers.push((
            "Authorization".to_string(),
            format!("Bearer {}", token.secret()),
        ));
    }

    ListingRequest { url, headers }
}
