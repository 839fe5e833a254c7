pub mod decoder;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod ui;
pub mod view_model;

use bytes::Bytes;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use url::Url;

pub use crate::endpoint::Endpoint;
pub use crate::error::{FetchError, Result};
pub use crate::models::{Comment, User};
pub use crate::view_model::{FetchResult, ListViewModel, Subscription, UsersViewModel};

/// A wrapped reqwest [`Client`], that issues the GET requests for every fetch cycle. \
/// Optionally redirects every request to another origin (e.g. a mirror or a local server),
/// keeping the path and query of the requested url.
///
/// ```no_run
/// use user_list::{ApiManager, Endpoint, User};
///
/// # async fn run() -> user_list::Result<()> {
/// let api = ApiManager::new()?;
/// let users: Vec<User> = api.fetch_items(Endpoint::UsersFetch.url()).await?;
/// for user in users {
///     println!("{} <{}>", user.name, user.email);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ApiManager {
    client: Client,
    origin: Option<Url>,
}

impl ApiManager {

    fn make_client() -> Result<Client> {
        // No default headers and no timeout, the platform defaults apply
        Ok(ClientBuilder::new()
            .gzip(true)
            .use_rustls_tls()
            .build()?)
    }

    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Self::make_client()?,
            origin: None,
        })
    }

    /// Wraps an already configured [`Client`]
    pub fn with_client(client: Client) -> Self {
        Self { client, origin: None }
    }

    /// Sends every request to `origin` instead of the host of the requested url. \
    /// A path on `origin` is used as a prefix.
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    /// The url a request for `url` will actually be sent to
    pub fn resolve(&self, url: &Url) -> Url {
        let Some(origin) = &self.origin else {
            return url.clone();
        };
        let mut resolved = origin.clone();
        let prefix = origin.path().trim_end_matches('/');
        resolved.set_path(&format!("{}{}", prefix, url.path()));
        resolved.set_query(url.query());
        resolved.set_fragment(None);
        resolved
    }

    /// Issues a single GET request and returns the raw body. \
    /// The status code is not checked, an error page is returned like any other body.
    pub async fn fetch(&self, url: &Url) -> Result<Bytes> {
        let url = self.resolve(url);
        log::debug!("get: {}", url.as_str());
        let response = self.client.get(url).send().await?;
        log::trace!("{} answered with status {}", response.url(), response.status());
        Ok(response.bytes().await?)
    }

    /// [Fetches](Self::fetch) `url` and [decodes](decoder::decode) the body as a JSON array of `T`
    pub async fn fetch_items<T: DeserializeOwned>(&self, url: &Url) -> Result<Vec<T>> {
        let bytes = self.fetch(url).await?;
        decoder::decode(&bytes)
    }

}
