//! robots.txt courtesy check.
//!
//! Each origin's robots.txt is fetched at most once per run. Rules are
//! evaluated with `texting_robots` for the product token of the configured
//! User-Agent (`IndoNewsCop` for the default agent).
//!
//! | robots.txt response | verdict |
//! |---------------------|---------|
//! | 2xx, parsable | rules decide |
//! | 2xx, unparsable | allowed |
//! | 401 / 403 | everything disallowed |
//! | other 4xx | allowed |
//! | 5xx, timeout, network error | allowed |

use reqwest::Client;
use std::collections::HashMap;
use texting_robots::Robot;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// What a robots.txt fetch told us about an origin.
enum Rules {
    AllowAll,
    DisallowAll,
    Parsed(Robot),
}

impl Rules {
    fn allows(&self, url: &str) -> bool {
        match self {
            Rules::AllowAll => true,
            Rules::DisallowAll => false,
            Rules::Parsed(robot) => robot.allowed(url),
        }
    }
}

/// Location of the robots.txt governing `url`.
pub fn robots_url(url: &str) -> Option<Url> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str()?;
    parsed.join("/robots.txt").ok()
}

/// Product token robots.txt groups are matched against.
///
/// `"Mozilla/5.0 (compatible; IndoNewsCop/1.0; +https://...)"` yields
/// `"IndoNewsCop"`; a plain `"MyBot/2.1"` yields `"MyBot"`.
pub fn robots_agent(user_agent: &str) -> String {
    let candidate = user_agent
        .split_once("compatible;")
        .map(|(_, rest)| rest)
        .unwrap_or(user_agent);
    let token = candidate
        .trim()
        .split(['/', ';', ' ', ')'])
        .find(|t| !t.is_empty())
        .unwrap_or("*");
    token.to_string()
}

fn rules_from_response(agent: &str, status: u16, body: &[u8]) -> Rules {
    match status {
        200..=299 => match Robot::new(agent, body) {
            Ok(robot) => Rules::Parsed(robot),
            Err(e) => {
                warn!(error = %e, "Unparsable robots.txt; treating as allow-all");
                Rules::AllowAll
            }
        },
        401 | 403 => Rules::DisallowAll,
        _ => Rules::AllowAll,
    }
}

/// Decides whether a URL may be fetched.
pub trait RobotsCheck {
    async fn allowed(&mut self, url: &str) -> bool;
}

/// Caches robots.txt rules per origin for the duration of a run.
pub struct RobotsGate {
    client: Client,
    agent: String,
    cache: HashMap<String, Rules>,
}

impl RobotsGate {
    pub fn new(client: Client, user_agent: &str) -> Self {
        Self {
            client,
            agent: robots_agent(user_agent),
            cache: HashMap::new(),
        }
    }

    async fn load(&self, robots: &Url) -> Rules {
        let resp = match self.client.get(robots.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => {
                info!(robots_url = %robots, error = %e, "robots.txt unreachable; allowing");
                return Rules::AllowAll;
            }
        };
        let status = resp.status().as_u16();
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                info!(robots_url = %robots, error = %e, "robots.txt body unreadable; allowing");
                return Rules::AllowAll;
            }
        };
        debug!(robots_url = %robots, status, bytes = body.len(), "Loaded robots.txt");
        rules_from_response(&self.agent, status, &body)
    }
}

impl RobotsCheck for RobotsGate {
    /// Whether the origin's robots.txt lets us fetch `url`.
    #[instrument(level = "debug", skip(self))]
    async fn allowed(&mut self, url: &str) -> bool {
        let Some(robots) = robots_url(url) else {
            return true;
        };
        let origin = robots.origin().ascii_serialization();
        if !self.cache.contains_key(&origin) {
            let rules = self.load(&robots).await;
            self.cache.insert(origin.clone(), rules);
        }
        self.cache
            .get(&origin)
            .map(|rules| rules.allows(url))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::serve_canned;

    fn local_gate() -> RobotsGate {
        let client = Client::builder().no_proxy().build().unwrap();
        RobotsGate::new(client, crate::cli::DEFAULT_USER_AGENT)
    }

    const ROBOTS: &str = "User-agent: *\nDisallow: /private/\n\nUser-agent: IndoNewsCop\nDisallow: /members/\n";

    #[test]
    fn test_robots_url() {
        assert_eq!(
            robots_url("https://news.example.com/2024/03/story?id=1").unwrap().as_str(),
            "https://news.example.com/robots.txt"
        );
        assert_eq!(
            robots_url("http://localhost:8080/a/b").unwrap().as_str(),
            "http://localhost:8080/robots.txt"
        );
        assert!(robots_url("mailto:desk@example.com").is_none());
        assert!(robots_url("not a url").is_none());
    }

    #[test]
    fn test_robots_agent() {
        assert_eq!(robots_agent(crate::cli::DEFAULT_USER_AGENT), "IndoNewsCop");
        assert_eq!(robots_agent("MyBot/2.1"), "MyBot");
        assert_eq!(robots_agent(""), "*");
    }

    #[test]
    fn test_rules_for_specific_agent() {
        let rules = rules_from_response("IndoNewsCop", 200, ROBOTS.as_bytes());
        assert!(!rules.allows("https://example.com/members/story"));
        assert!(rules.allows("https://example.com/news/story"));
    }

    #[test]
    fn test_rules_for_other_agent_use_wildcard_group() {
        let rules = rules_from_response("OtherBot", 200, ROBOTS.as_bytes());
        assert!(!rules.allows("https://example.com/private/x"));
        assert!(rules.allows("https://example.com/members/story"));
    }

    #[test]
    fn test_rules_from_status() {
        assert!(!rules_from_response("IndoNewsCop", 403, b"").allows("https://example.com/"));
        assert!(!rules_from_response("IndoNewsCop", 401, b"").allows("https://example.com/"));
        assert!(rules_from_response("IndoNewsCop", 404, b"").allows("https://example.com/"));
        assert!(rules_from_response("IndoNewsCop", 500, b"").allows("https://example.com/"));
    }

    #[tokio::test]
    async fn test_gate_allows_non_http_urls_without_fetching() {
        let mut gate = RobotsGate::new(Client::new(), "IndoNewsCop/1.0");
        assert!(gate.allowed("file:///etc/passwd").await);
        assert!(gate.cache.is_empty());
    }

    #[tokio::test]
    async fn test_gate_uses_cached_rules() {
        let mut gate = RobotsGate::new(Client::new(), "IndoNewsCop/1.0");
        gate.cache.insert(
            "https://example.com".to_string(),
            rules_from_response("IndoNewsCop", 200, ROBOTS.as_bytes()),
        );
        assert!(!gate.allowed("https://example.com/members/a").await);
        assert!(gate.allowed("https://example.com/news/a").await);
    }

    #[tokio::test]
    async fn test_gate_reads_served_rules() {
        let base = serve_canned(vec![("/robots.txt", 200, ROBOTS)]).await;
        let mut gate = local_gate();
        assert!(!gate.allowed(&format!("{base}/members/story")).await);
        assert!(gate.allowed(&format!("{base}/news/story")).await);
        assert_eq!(gate.cache.len(), 1);
    }

    #[tokio::test]
    async fn test_gate_forbidden_robots_disallows_origin() {
        let base = serve_canned(vec![("/robots.txt", 403, "forbidden")]).await;
        let mut gate = local_gate();
        assert!(!gate.allowed(&format!("{base}/news/story")).await);
    }

    #[tokio::test]
    async fn test_gate_missing_robots_allows() {
        let base = serve_canned(vec![]).await;
        let mut gate = local_gate();
        assert!(gate.allowed(&format!("{base}/news/story")).await);
    }

    #[tokio::test]
    async fn test_gate_unreachable_host_allows() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let mut gate = local_gate();
        assert!(gate.allowed(&format!("http://{addr}/news/story")).await);
    }
}
