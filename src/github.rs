//! GitHub REST API access for branch-sweep
//!
//! Thin read-only client over the two endpoints the filter consumes:
//! legacy branch protection and branch rules. Not-found responses map to
//! `None` ("mechanism absent").

use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SweepError;

const GITHUB_JSON: &str = "application/vnd.github+json";

/// A candidate branch supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Branch name without the `refs/heads/` prefix
    pub name: String,
    /// Commit the branch currently points at, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: None,
        }
    }

    pub fn with_sha(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: Some(sha.into()),
        }
    }
}

/// Legacy branch protection payload (the subset the filter reads)
#[derive(Debug, Clone, Deserialize)]
pub struct BranchProtection {
    #[serde(default)]
    pub allow_deletions: Option<EnabledFlag>,
}

/// GitHub's `{ "enabled": bool }` wrapper
#[derive(Debug, Clone, Deserialize)]
pub struct EnabledFlag {
    #[serde(default)]
    pub enabled: bool,
}

impl BranchProtection {
    /// Deletion is allowed only when the flag is present and enabled
    pub fn allows_deletion(&self) -> bool {
        self.allow_deletions.as_ref().is_some_and(|f| f.enabled)
    }
}

/// One entry from the branch rules endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BranchRule {
    #[serde(rename = "type", default)]
    pub rule_type: String,
    /// A rule blocks deletion unless it explicitly allows it
    #[serde(default)]
    pub allow_deletions: bool,
}

impl BranchRule {
    pub fn blocks_deletion(&self) -> bool {
        !self.allow_deletions
    }
}

/// Read-only client scoped to a single owner/repo
#[derive(Debug)]
pub struct GithubClient {
    http: Client,
    base_url: Url,
    owner: String,
    repo: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client for the given API base URL and repository
    pub fn new(
        api_url: &str,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, SweepError> {
        let base_url = Url::parse(api_url).map_err(|_| SweepError::InvalidApiUrl {
            url: api_url.to_string(),
        })?;
        // cannot-be-a-base URLs (e.g. data:) have no path segments to extend
        if base_url.cannot_be_a_base() {
            return Err(SweepError::InvalidApiUrl {
                url: api_url.to_string(),
            });
        }

        let http = Client::builder()
            .user_agent(concat!("branch-sweep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            owner: owner.into(),
            repo: repo.into(),
            token,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// GET /repos/{owner}/{repo}/branches/{branch}/protection
    ///
    /// # Returns
    /// * `Ok(Some(_))` - legacy protection is configured
    /// * `Ok(None)` - no legacy protection (HTTP 404)
    pub async fn branch_protection(
        &self,
        branch: &str,
    ) -> Result<Option<BranchProtection>, SweepError> {
        let url = self.endpoint(&[
            "repos",
            &self.owner,
            &self.repo,
            "branches",
            branch,
            "protection",
        ])?;
        self.get_optional(url).await
    }

    /// GET /repos/{owner}/{repo}/rules/branches/{branch}
    ///
    /// # Returns
    /// * `Ok(Some(rules))` - rules that apply to the branch (possibly empty)
    /// * `Ok(None)` - endpoint not found for this branch (HTTP 404)
    pub async fn branch_rules(&self, branch: &str) -> Result<Option<Vec<BranchRule>>, SweepError> {
        let url = self.endpoint(&["repos", &self.owner, &self.repo, "rules", "branches", branch])?;
        self.get_optional(url).await
    }

    /// Append path segments to the base URL, percent-encoding each one
    ///
    /// Branch names may contain `/` (e.g. `feature/login`); extending via
    /// path segments encodes it as `%2F` instead of splitting the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SweepError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SweepError::InvalidApiUrl {
                url: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET with 404 mapped to `Ok(None)` and other non-success statuses to errors
    async fn get_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, SweepError> {
        debug!(url = %url, "GET");

        let mut request = self.http.get(url.clone()).header(ACCEPT, GITHUB_JSON);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<T>().await?)),
            status => Err(SweepError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::new(&server.uri(), "octo", "widgets", None).unwrap()
    }

    // --- Wire type tests ---

    #[test]
    fn test_protection_with_deletions_enabled_allows() {
        let protection: BranchProtection =
            serde_json::from_str(r#"{"allow_deletions": {"enabled": true}}"#).unwrap();
        assert!(protection.allows_deletion());
    }

    #[test]
    fn test_protection_with_deletions_disabled_blocks() {
        let protection: BranchProtection =
            serde_json::from_str(r#"{"allow_deletions": {"enabled": false}}"#).unwrap();
        assert!(!protection.allows_deletion());
    }

    #[test]
    fn test_protection_without_flag_blocks() {
        // The API omits allow_deletions for some protection configurations
        let protection: BranchProtection =
            serde_json::from_str(r#"{"required_signatures": {"enabled": true}}"#).unwrap();
        assert!(!protection.allows_deletion());
    }

    #[test]
    fn test_rule_without_allow_deletions_blocks() {
        let rule: BranchRule = serde_json::from_str(r#"{"type": "deletion"}"#).unwrap();
        assert_eq!(rule.rule_type, "deletion");
        assert!(rule.blocks_deletion());
    }

    #[test]
    fn test_rule_with_allow_deletions_permits() {
        let rule: BranchRule =
            serde_json::from_str(r#"{"type": "deletion", "allow_deletions": true}"#).unwrap();
        assert!(!rule.blocks_deletion());
    }

    #[test]
    fn test_branch_constructors() {
        let plain = Branch::new("feature/login");
        assert_eq!(plain.name, "feature/login");
        assert!(plain.commit_sha.is_none());

        let pinned = Branch::with_sha("main", "abc123");
        assert_eq!(pinned.commit_sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_branch_serializes_without_missing_sha() {
        let json = serde_json::to_string(&Branch::new("dev")).unwrap();
        assert_eq!(json, r#"{"name":"dev"}"#);
    }

    // --- Client construction tests ---

    #[test]
    fn test_new_rejects_invalid_url() {
        let err = GithubClient::new("not a url", "o", "r", None).unwrap_err();
        assert!(matches!(err, SweepError::InvalidApiUrl { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_new_rejects_cannot_be_a_base_url() {
        let err = GithubClient::new("data:text/plain,hi", "o", "r", None).unwrap_err();
        assert!(matches!(err, SweepError::InvalidApiUrl { .. }));
    }

    #[test]
    fn test_new_accepts_url_without_trailing_slash() {
        let client = GithubClient::new("https://api.github.com", "o", "r", None).unwrap();
        let url = client
            .endpoint(&["repos", "o", "r", "branches", "main", "protection"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/branches/main/protection"
        );
    }

    #[test]
    fn test_endpoint_preserves_base_path() {
        // GitHub Enterprise installs serve the API under /api/v3
        let client = GithubClient::new("https://ghe.example.com/api/v3", "o", "r", None).unwrap();
        let url = client
            .endpoint(&["repos", "o", "r", "rules", "branches", "dev"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/rules/branches/dev"
        );
    }

    #[test]
    fn test_endpoint_encodes_slash_in_branch_name() {
        let client = GithubClient::new("https://api.github.com", "o", "r", None).unwrap();
        let url = client
            .endpoint(&["repos", "o", "r", "branches", "feature/login", "protection"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/o/r/branches/feature%2Flogin/protection"
        );
    }

    // --- Endpoint behavior tests (wiremock) ---

    #[tokio::test]
    async fn test_branch_protection_404_maps_to_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/dev/protection"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.branch_protection("dev").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_branch_protection_parses_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/main/protection"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"allow_deletions": {"enabled": false}}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let protection = client.branch_protection("main").await.unwrap().unwrap();
        assert!(!protection.allows_deletion());
    }

    #[tokio::test]
    async fn test_branch_rules_parses_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/rules/branches/release"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[{"type": "deletion"}, {"type": "non_fast_forward"}]"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let rules = client.branch_rules("release").await.unwrap().unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(BranchRule::blocks_deletion));
    }

    #[tokio::test]
    async fn test_slash_branch_requested_with_encoded_segment() {
        let server = MockServer::start().await;
        // Only the percent-encoded form is mounted; the raw-slash path would 404
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/feature%2Flogin/protection"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"allow_deletions": {"enabled": false}}"#),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let protection = client
            .branch_protection("feature/login")
            .await
            .unwrap()
            .unwrap();
        assert!(!protection.allows_deletion());
    }

    #[tokio::test]
    async fn test_token_sent_as_bearer_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/dev/protection"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"allow_deletions": {"enabled": true}}"#),
            )
            .mount(&server)
            .await;

        let client =
            GithubClient::new(&server.uri(), "octo", "widgets", Some("test-token".into())).unwrap();
        let protection = client.branch_protection("dev").await.unwrap().unwrap();
        assert!(protection.allows_deletion());
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/dev/protection"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/dev/protection"))
            .respond_with(ResponseTemplate::new(404))
            .with_priority(5)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.branch_protection("dev").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octo/widgets/branches/dev/protection"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.branch_protection("dev").await.unwrap_err();
        match err {
            SweepError::UnexpectedStatus { status, .. } => assert_eq!(status, 500),
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }
}
