use super::MagentoClient;
use crate::error::MagentoError;
use crate::transport::Transport;
use crate::types::{StoreConfig, StoreGroup};

impl<T: Transport> MagentoClient<T> {
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::Deserialize`]
    /// if the body is not an array, or any transport error.
    pub async fn get_store_groups(&self) -> Result<Vec<StoreGroup>, MagentoError> {
        self.get_list("/V1/store/storeGroups", "store groups").await
    }

    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::Deserialize`]
    /// if the body is not an array, or any transport error.
    pub async fn get_store_configs(&self) -> Result<Vec<StoreConfig>, MagentoError> {
        self.get_list("/V1/store/storeConfigs", "store configs").await
    }
}
