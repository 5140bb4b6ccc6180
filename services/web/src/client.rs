//! Client for the remote recipe and identity API

use std::time::Duration;

use common::http::{RetryPolicy, fetch_with_retry};
use reqwest::{Method, StatusCode, Url, header::ACCEPT};
use tracing::{debug, warn};

use crate::{
    config::WebConfig,
    error::ApiClientError,
    models::{FavoritesPayload, LoginPayload, Recipe, TokenResponse, User},
};

const JSON: &str = "application/json";

/// Typed access to the recipe API
#[derive(Clone)]
pub struct RecipeApiClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl RecipeApiClient {
    /// Create a new client for the API rooted at `base_url`
    pub fn new(
        base_url: &str,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, ApiClientError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            retry,
        })
    }

    pub fn from_config(config: &WebConfig) -> Result<Self, ApiClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout(),
            config.retry_policy(),
        )
    }

    /// Build `base_url/segment/...`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Exchange credentials for a bearer token
    pub async fn login(&self, payload: &LoginPayload) -> Result<String, ApiClientError> {
        let url = self.endpoint(&["login"])?;

        let response = fetch_with_retry(&self.retry, url.as_str(), || {
            self.http
                .post(url.clone())
                .header(ACCEPT, JSON)
                .json(payload)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }

        // An unreadable body is the same as a body without a token
        let body = response.json::<TokenResponse>().await.ok();
        body.and_then(|body| body.token)
            .filter(|token| !token.is_empty())
            .ok_or(ApiClientError::MissingField("token"))
    }

    /// Look up the username behind a token. Not retried.
    pub async fn current_username(&self, token: &str) -> Result<String, ApiClientError> {
        let url = self.endpoint(&["me"])?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, JSON)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }

        let user: User = response.json().await?;
        if user.username.is_empty() {
            return Err(ApiClientError::MissingField("username"));
        }

        Ok(user.username)
    }

    /// Public recipe catalog
    pub async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiClientError> {
        let url = self.endpoint(&["recipes"])?;

        let response = fetch_with_retry(&self.retry, url.as_str(), || {
            self.http.get(url.clone()).header(ACCEPT, JSON)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }

        Ok(response.json().await?)
    }

    /// A single recipe, `None` when the API does not serve it
    pub async fn get_recipe(&self, id: &str) -> Result<Option<Recipe>, ApiClientError> {
        let url = self.endpoint(&["recipes", id])?;

        let response = fetch_with_retry(&self.retry, url.as_str(), || {
            self.http.get(url.clone()).header(ACCEPT, JSON)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            debug!("Recipe {} not served by the API: {}", id, status);
            return Ok(None);
        }

        Ok(Some(response.json().await?))
    }

    /// Favorites of the token's owner. Uses the per-user listing when the
    /// username is known and the bearer-only listing otherwise. An expired
    /// token yields an empty list.
    pub async fn list_favorites(
        &self,
        token: &str,
        username: Option<&str>,
    ) -> Result<Vec<Recipe>, ApiClientError> {
        let url = match username {
            Some(username) => self.endpoint(&["users", username, "favorites"])?,
            None => self.endpoint(&["favorites"])?,
        };

        let response = fetch_with_retry(&self.retry, url.as_str(), || {
            self.http
                .get(url.clone())
                .bearer_auth(token)
                .header(ACCEPT, JSON)
        })
        .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("Favorites listing rejected the session token");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }

        let payload: FavoritesPayload = response.json().await?;
        Ok(payload.into_recipes())
    }

    pub async fn add_favorite(
        &self,
        token: &str,
        username: &str,
        recipe_id: &str,
    ) -> Result<(), ApiClientError> {
        self.favorite_request(Method::POST, token, username, recipe_id)
            .await
    }

    pub async fn remove_favorite(
        &self,
        token: &str,
        username: &str,
        recipe_id: &str,
    ) -> Result<(), ApiClientError> {
        self.favorite_request(Method::DELETE, token, username, recipe_id)
            .await
    }

    async fn favorite_request(
        &self,
        method: Method,
        token: &str,
        username: &str,
        recipe_id: &str,
    ) -> Result<(), ApiClientError> {
        let mut url = self.endpoint(&["users", username, "favorites"])?;
        url.query_pairs_mut().append_pair("recipeID", recipe_id);

        let response = fetch_with_retry(&self.retry, url.as_str(), || {
            self.http
                .request(method.clone(), url.clone())
                .bearer_auth(token)
                .header(ACCEPT, JSON)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiClientError::Status(status));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RecipeApiClient {
        RecipeApiClient::new(base_url, Duration::from_secs(1), RetryPolicy::none()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("https://gourmet.example.com");
        let url = client.endpoint(&["recipes", "r1"]).unwrap();
        assert_eq!(url.as_str(), "https://gourmet.example.com/recipes/r1");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_segments() {
        let client = client("http://localhost:8080/api/");
        let url = client
            .endpoint(&["users", "chef one", "favorites"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/users/chef%20one/favorites"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let result = RecipeApiClient::new("not a url", Duration::from_secs(1), RetryPolicy::none());
        assert!(matches!(result, Err(ApiClientError::InvalidUrl(_))));

        let result = RecipeApiClient::new(
            "mailto:chef@example.com",
            Duration::from_secs(1),
            RetryPolicy::none(),
        );
        assert!(matches!(result, Err(ApiClientError::InvalidUrl(_))));
    }
}
