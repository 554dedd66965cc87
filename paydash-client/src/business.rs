//! Listing the merchant's businesses and switching the active one.

use paydash_shared::models::{Business, SwitchBusinessRequest, UserProfile};
use serde::Deserialize;
use tracing::info;

use crate::{api::ApiClient, error::ApiResult};

/// Businesses come back either bare or wrapped in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum BusinessList {
    Wrapped { data: Vec<Business> },
    Bare(Vec<Business>),
}

impl From<BusinessList> for Vec<Business> {
    fn from(list: BusinessList) -> Self {
        match list {
            BusinessList::Wrapped { data } | BusinessList::Bare(data) => data,
        }
    }
}

/// Listing and switching the active business.
#[derive(Debug, Clone)]
pub struct BusinessService {
    client: ApiClient,
}

impl BusinessService {
    /// Creates the service over an authenticated client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Businesses the signed-in user belongs to.
    ///
    /// # Errors
    /// Propagates the [`ApiClient`] error.
    pub async fn list(&self) -> ApiResult<Vec<Business>> {
        let list: BusinessList = self.client.get("businesses").await?;
        Ok(list.into())
    }

    /// Makes `business_id` the active business.
    ///
    /// The profile returned by the backend replaces the cached one; when the
    /// backend answers without a body, only the cached `business_id` changes.
    /// Returns the cached profile after the switch, if one exists.
    ///
    /// # Errors
    /// Propagates the [`ApiClient`] error; the cache is untouched on failure.
    pub async fn switch(&self, business_id: i64) -> ApiResult<Option<UserProfile>> {
        let response: Option<UserProfile> = self
            .client
            .post("auth/switch-business", &SwitchBusinessRequest { business_id })
            .await?;

        let session = self.client.session();
        let profile = match response {
            Some(profile) => {
                session.set_user(&profile);
                Some(profile)
            }
            None => session.set_business_id(business_id),
        };
        info!(business_id, "switched active business");
        Ok(profile)
    }

    /// Active business according to the cached profile.
    #[must_use]
    pub fn active_business_id(&self) -> Option<i64> {
        self.client.session().business_id()
    }
}
