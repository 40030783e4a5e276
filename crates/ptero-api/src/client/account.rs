use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::endpoint::client;
use crate::error::Error;
use crate::resource::Resource;
use crate::schema::AccountDetails;

/// The account that owns the client key.
pub struct AccountManager {
    account: Resource<AccountDetails>,
}

impl AccountManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            account: Resource::new(dispatcher, client::ACCOUNT, client::ACCOUNT),
        }
    }

    pub async fn get_details(&self) -> Result<AccountDetails, Error> {
        self.account
            .get(&[], || "Failed to get the account details!".to_owned())
            .await
    }
}
