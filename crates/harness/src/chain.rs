use {
    alloy::{
        network::EthereumWallet,
        primitives::{Address, U256},
        providers::{DynProvider, Provider, ProviderBuilder},
        signers::local::PrivateKeySigner,
    },
    anyhow::Result,
    contracts::ERC20,
    url::Url,
};

pub type AlloyProvider = DynProvider;

/// Provider that forwards transactions unsigned to the node. Works for
/// accounts the node can sign for, e.g. impersonated ones.
pub fn provider(url: &Url) -> AlloyProvider {
    ProviderBuilder::new().connect_http(url.clone()).erased()
}

/// Provider that signs transactions locally with `signer`.
pub fn provider_with_signer(url: &Url, signer: PrivateKeySigner) -> AlloyProvider {
    ProviderBuilder::new()
        .wallet(EthereumWallet::new(signer))
        .connect_http(url.clone())
        .erased()
}

/// Read-only chain access needed to look up balances.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait ChainReading: Send + Sync {
    /// Native asset balance of `owner`.
    async fn native_balance(&self, owner: Address) -> Result<U256>;

    /// `token.balanceOf(owner)`.
    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;
}

#[async_trait::async_trait]
impl ChainReading for AlloyProvider {
    async fn native_balance(&self, owner: Address) -> Result<U256> {
        Ok(self.get_balance(owner).await?)
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let token = ERC20::Instance::new(token, self.clone());
        Ok(token.balanceOf(owner).call().await?)
    }
}
