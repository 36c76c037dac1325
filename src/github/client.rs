//! GitHub REST API client

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;
use crate::Result;
use crate::config::Config;
use crate::error::Error;
use super::pagination;
use super::pull_request::{PullRequest, PullRequestText};
use super::{Github, Scope, TargetRepository};

/// Header carrying the two-factor code, and GitHub's challenge in responses
const OTP_HEADER: &str = "x-github-otp";

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

const PER_PAGE: u32 = 100;

#[derive(Clone)]
enum Credential {
    Basic { username: String, password: String },
    Token(String),
}

/// GitHub API error body
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Authorization {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    app: Option<AuthorizationApp>,
}

#[derive(Debug, Deserialize)]
struct AuthorizationApp {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewAuthorization<'a> {
    note: &'a str,
    scopes: &'a [Scope],
}

#[derive(Debug, Deserialize)]
struct CreatedAuthorization {
    token: String,
}

#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

#[derive(Debug, Serialize)]
struct RepositoryUpdate<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct NewPullRequest<'a> {
    base: &'a str,
    head: String,
    title: String,
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedPullRequest {
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestSummary {
    number: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    title: String,
    html_url: String,
    user: Account,
    head: BranchRef,
    base: BranchRef,
}

#[derive(Debug, Deserialize)]
struct BranchRef {
    #[serde(rename = "ref")]
    name: String,
}

/// GitHub client over the REST API
///
/// Holds the credential context set by [`Github::authenticate_with_password`]
/// or [`GithubClient::with_token`] and the target repository pull requests
/// are sent to.
pub struct GithubClient {
    http: Client,
    api_url: String,
    target: TargetRepository,
    credential: RwLock<Option<Credential>>,
}

impl GithubClient {
    /// Create an unauthenticated client for `api_url`
    pub fn new(api_url: &str, target: TargetRepository) -> Result<Self> {
        let parsed = Url::parse(api_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!("Unsupported API URL scheme: {}", api_url)));
        }

        let http = Client::builder()
            .user_agent(concat!("liferaft/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            target,
            credential: RwLock::new(None),
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_url, TargetRepository::from(&config.target))
    }

    /// Authenticate subsequent calls with a personal access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.credential = RwLock::new(Some(Credential::Token(token.into())));
        self
    }

    pub fn target(&self) -> &TargetRepository {
        &self.target
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn repo_url(&self, owner: &str, repository: &str, rest: &str) -> String {
        self.url(&format!("/repos/{}/{}{}", owner, repository, rest))
    }

    fn request(&self, method: Method, url: &str, code: Option<&str>) -> RequestBuilder {
        let credential = self
            .credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut builder = self.http.request(method, url).header(ACCEPT, GITHUB_MEDIA_TYPE);

        builder = match credential {
            Some(Credential::Basic { username, password }) => {
                builder.basic_auth(username, Some(password))
            }
            Some(Credential::Token(token)) => {
                builder.header(AUTHORIZATION, format!("token {}", token))
            }
            None => builder,
        };

        if let Some(code) = code {
            builder = builder.header(OTP_HEADER, code);
        }

        builder
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        check_status(response).await
    }
}

/// Map non-success responses onto [`Error`]
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let otp_required = response
        .headers()
        .get(OTP_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().starts_with("required"))
        .unwrap_or(false);

    let message = match response.json::<ApiError>().await {
        Ok(body) => body.message,
        Err(_) => status.to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED if otp_required => Err(Error::TwoFactorRequired),
        StatusCode::UNAUTHORIZED => Err(Error::Auth(message)),
        StatusCode::NOT_FOUND => Err(Error::NotFound(message)),
        _ => Err(Error::Github {
            status: status.as_u16(),
            message,
        }),
    }
}

fn matching_token(authorization: Authorization, name: &str) -> Option<String> {
    let app_name = authorization.app?.name?;
    if app_name.starts_with(name) {
        authorization.token
    } else {
        None
    }
}

fn pick_random(numbers: &[u64]) -> Option<u64> {
    numbers.choose(&mut rand::thread_rng()).copied()
}

#[async_trait]
impl Github for GithubClient {
    fn authenticate_with_password(&self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() {
            return Err(Error::Auth("Username must not be empty".to_string()));
        }

        *self.credential.write().unwrap_or_else(PoisonError::into_inner) = Some(Credential::Basic {
            username: username.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }

    async fn find_authorization(&self, name: &str, code: Option<&str>) -> Result<Option<String>> {
        let mut url = format!("{}?per_page={}", self.url("/authorizations"), PER_PAGE);
        let mut page = 1;

        loop {
            let response = Self::send(self.request(Method::GET, &url, code)).await?;
            let next = pagination::next_page(response.headers());
            let authorizations: Vec<Authorization> = response.json().await?;

            tracing::debug!(page, count = authorizations.len(), "Fetched authorizations");

            if let Some(token) = authorizations
                .into_iter()
                .find_map(|authorization| matching_token(authorization, name))
            {
                return Ok(Some(token));
            }

            match next {
                Some(next) => {
                    url = next;
                    page += 1;
                }
                None => return Ok(None),
            }
        }
    }

    async fn create_authorization(
        &self,
        name: &str,
        scopes: &[Scope],
        code: Option<&str>,
    ) -> Result<String> {
        let body = NewAuthorization { note: name, scopes };
        let response = Self::send(
            self.request(Method::POST, &self.url("/authorizations"), code)
                .json(&body),
        )
        .await?;

        let created: CreatedAuthorization = response.json().await?;
        Ok(created.token)
    }

    async fn username(&self) -> Result<String> {
        let response = Self::send(self.request(Method::GET, &self.url("/user"), None)).await?;
        let account: Account = response.json().await?;
        Ok(account.login)
    }

    async fn fork(&self, owner: &str, repository: &str) -> Result<()> {
        let url = self.repo_url(owner, repository, "/forks");
        Self::send(self.request(Method::POST, &url, None)).await?;
        tracing::info!("Forked {}/{}", owner, repository);
        Ok(())
    }

    async fn rename(&self, owner: &str, repository: &str, name: &str) -> Result<()> {
        let url = self.repo_url(owner, repository, "");
        Self::send(
            self.request(Method::PATCH, &url, None)
                .json(&RepositoryUpdate { name }),
        )
        .await?;
        tracing::info!("Renamed {}/{} to {}", owner, repository, name);
        Ok(())
    }

    async fn send_pull_request(
        &self,
        owner: &str,
        branch: &str,
        to_branch: &str,
        liferaft_file: &str,
    ) -> Result<String> {
        let text = PullRequestText::parse(liferaft_file);
        let body = NewPullRequest {
            base: to_branch,
            head: format!("{}:{}", owner, branch),
            title: text.prefixed_title(),
            body: &text.body,
        };

        let url = self.repo_url(&self.target.owner, &self.target.name, "/pulls");
        let response = Self::send(self.request(Method::POST, &url, None).json(&body)).await?;
        let created: CreatedPullRequest = response.json().await?;
        Ok(created.html_url)
    }

    async fn delete_repository(&self, owner: &str, repository: &str) -> Result<()> {
        let url = self.repo_url(owner, repository, "");
        Self::send(self.request(Method::DELETE, &url, None)).await?;
        tracing::info!("Deleted {}/{}", owner, repository);
        Ok(())
    }

    async fn random_pull_request_id(&self) -> Result<Option<u64>> {
        let url = self.repo_url(&self.target.owner, &self.target.name, "/pulls");
        let response = Self::send(
            self.request(Method::GET, &url, None)
                .query(&[("state", "open")]),
        )
        .await?;

        let pulls: Vec<PullRequestSummary> = response.json().await?;
        let candidates: Vec<u64> = pulls
            .into_iter()
            .filter(|pull| pull.title.to_lowercase().contains("[liferaft]"))
            .map(|pull| pull.number)
            .collect();

        Ok(pick_random(&candidates))
    }

    async fn pull_request(&self, id: u64) -> Result<PullRequest> {
        if id == 0 {
            return Err(Error::InvalidArgument("Invalid ID.".to_string()));
        }

        let url = self.repo_url(&self.target.owner, &self.target.name, &format!("/pulls/{}", id));
        let response = match Self::send(self.request(Method::GET, &url, None)).await {
            Ok(response) => response,
            Err(Error::NotFound(_)) => {
                return Err(Error::NotFound(format!("Pull request #{}", id)));
            }
            Err(e) => return Err(e),
        };

        let pull: PullRequestResponse = response.json().await?;
        Ok(PullRequest {
            id,
            title: pull.title,
            user: pull.user.login,
            url: pull.html_url,
            from_branch: pull.head.name,
            to_branch: pull.base.name,
        })
    }
}
