//! HTTP plumbing shared by the Radarr and Sonarr clients.

use crate::models::config::BackendConfig;
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "X-Api-Key";

/// Defaults every add request needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDefaults {
    pub quality_profile_id: u32,
    pub root_folder_path: String,
}

/// Quality profile entry.
#[derive(Debug, Deserialize)]
pub struct QualityProfile {
    pub id: u32,
    pub name: Option<String>,
}

/// Root folder entry.
#[derive(Debug, Deserialize)]
pub struct RootFolder {
    pub path: String,
}

/// Authenticated HTTP access to one backend.
#[derive(Debug, Clone)]
pub struct ArrHttp {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

/// Whether a status counts as success.
pub fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

impl ArrHttp {
    /// Create a client with the configured timeout.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::unavailable("build http client", e))?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        operation: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let resp = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Error::unavailable(operation, e))?;

        let status = resp.status().as_u16();
        if !is_success(status) {
            return Err(Error::BackendRejected {
                operation: operation.to_string(),
                status,
            });
        }
        Ok(resp)
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, operation: &str, path: &str) -> Result<T> {
        let resp = self.send(operation, self.client.get(self.url(path))).await?;
        resp.json()
            .await
            .map_err(|e| Error::unavailable(operation, e))
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        operation: &str,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.send(operation, self.client.post(self.url(path)).json(body))
            .await?;
        Ok(())
    }

    /// DELETE a resource.
    pub async fn delete(&self, operation: &str, path: &str) -> Result<()> {
        self.send(operation, self.client.delete(self.url(path)))
            .await?;
        Ok(())
    }

    /// First quality profile the backend knows about.
    pub async fn first_quality_profile(&self) -> Result<u32> {
        let profiles: Vec<QualityProfile> =
            self.get_json("list quality profiles", "qualityprofile").await?;
        profiles
            .first()
            .map(|p| p.id)
            .ok_or_else(|| Error::ConfigurationMissing(format!("no quality profile on {}", self.base_url)))
    }

    /// First root folder the backend knows about.
    pub async fn first_root_folder(&self) -> Result<String> {
        let folders: Vec<RootFolder> = self.get_json("list root folders", "rootfolder").await?;
        folders
            .into_iter()
            .next()
            .map(|f| f.path)
            .ok_or_else(|| Error::ConfigurationMissing(format!("no root folder on {}", self.base_url)))
    }

    /// Use configured defaults, asking the backend for whatever is missing.
    pub async fn resolve_defaults(&self, config: &BackendConfig) -> Result<BackendDefaults> {
        let quality_profile_id = match config.quality_profile_id {
            Some(id) => id,
            None => self.first_quality_profile().await.map_err(missing("quality profile"))?,
        };
        let root_folder_path = match &config.root_folder_path {
            Some(path) => path.clone(),
            None => self.first_root_folder().await.map_err(missing("root folder"))?,
        };

        Ok(BackendDefaults {
            quality_profile_id,
            root_folder_path,
        })
    }
}

/// Any failure to resolve a default is a configuration problem.
fn missing(what: &'static str) -> impl Fn(Error) -> Error {
    move |err| match err {
        Error::ConfigurationMissing(_) => err,
        other => Error::ConfigurationMissing(format!("could not resolve {}: {}", what, other)),
    }
}
