//! The operations this tool needs from the Dashboard.
use crate::error::ApiError;
use crate::model::{
    GuestAccount, GuestSsidSettings, Network, NewGuestAccount, NewNetwork, Organization,
};

pub type ApiResult<T> = Result<T, ApiError>;

/// Organization, network and guest-account operations.
///
/// Workflows receive this as `&dyn AccountRepository`; the concrete client is
/// built once in `main`.
pub trait AccountRepository {
    fn list_organizations(&self) -> ApiResult<Vec<Organization>>;

    /// Every network of `organization_id`, across all pages.
    fn list_networks(&self, organization_id: &str) -> ApiResult<Vec<Network>>;

    /// Guest accounts of one network, with `network_id` filled in.
    fn list_guest_accounts(&self, network_id: &str) -> ApiResult<Vec<GuestAccount>>;

    fn create_guest_account(
        &self,
        network_id: &str,
        account: &NewGuestAccount,
    ) -> ApiResult<GuestAccount>;

    fn delete_account(&self, network_id: &str, account_id: &str) -> ApiResult<()>;

    fn create_network(&self, organization_id: &str, network: &NewNetwork) -> ApiResult<Network>;

    fn configure_guest_ssid(&self, network_id: &str, settings: &GuestSsidSettings)
        -> ApiResult<()>;
}
