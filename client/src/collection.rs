use std::marker::PhantomData;

use hubview_types::{ListPage, ParamState};
use reqwest::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{ApiError, HubClient};

/// A paginated endpoint of the hub API.
pub trait Collection {
    /// Record type in list responses.
    type Item: DeserializeOwned;
    /// Record type returned by the detail endpoint.
    type Detail: DeserializeOwned;

    /// Path relative to the API base, with a trailing slash.
    const PATH: &'static str;
}

#[derive(Deserialize)]
pub(crate) struct HubMeta {
    count: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum PageEnvelope<T> {
    Hub { meta: HubMeta, data: Vec<T> },
    Pulp { count: u64, results: Vec<T> },
}

impl<T> PageEnvelope<T> {
    pub(crate) fn into_page(self) -> ListPage<T> {
        match self {
            Self::Hub { meta, data } => ListPage::new(data, meta.count),
            Self::Pulp { count, results } => ListPage::new(results, count),
        }
    }
}

/// Typed handle for one collection.
pub struct Resource<C> {
    client: HubClient,
    collection: PhantomData<fn() -> C>,
}

impl<C> Clone for Resource<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            collection: PhantomData,
        }
    }
}

impl<C> std::fmt::Debug for Resource<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resource")
            .field("base_url", &self.client.base_url().as_str())
            .field("collection", &std::any::type_name::<C>())
            .finish()
    }
}

impl<C: Collection> Resource<C> {
    #[must_use]
    pub fn new(client: HubClient) -> Self {
        Self {
            client,
            collection: PhantomData,
        }
    }

    #[must_use]
    pub fn client(&self) -> &HubClient {
        &self.client
    }

    pub(crate) fn detail_path(id: &str) -> String {
        format!("{}{id}/", C::PATH)
    }

    /// Request one page. `params` goes to the server as the query string.
    pub async fn fetch_page(&self, params: &ParamState) -> Result<ListPage<C::Item>, ApiError> {
        self.client.list_page(C::PATH, params).await
    }

    pub async fn get(&self, id: &str) -> Result<C::Detail, ApiError> {
        self.client.get_json(&Self::detail_path(id), None).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .send_empty(Method::DELETE, &Self::detail_path(id))
            .await
    }
}
