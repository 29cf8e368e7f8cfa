use {
    crate::{
        chain::{self, AlloyProvider, ChainReading},
        signer::{self, ImpersonatedSigner, LocalSigner},
    },
    alloy::{
        primitives::{Address, U256},
        providers::ext::AnvilApi,
        rpc::types::anvil::Forking,
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result},
    std::sync::Arc,
    url::Url,
};

/// An anvil node forking a remote chain.
///
/// Only the methods available on a forking anvil are exposed. Everything the
/// harness mutates lives on the fork, the remote chain is never written to.
#[derive(Clone, Debug)]
pub struct ForkedNode {
    provider: AlloyProvider,
    node_url: Url,
}

impl ForkedNode {
    pub fn connect(node_url: &Url) -> Self {
        Self {
            provider: chain::provider(node_url),
            node_url: node_url.clone(),
        }
    }

    /// Connects and re-forks `fork_url` at `block_number`, discarding
    /// everything that happened on the node so far.
    pub async fn forking(node_url: &Url, fork_url: &Url, block_number: u64) -> Result<Self> {
        let node = Self::connect(node_url);
        node.reset(fork_url, block_number).await?;
        Ok(node)
    }

    pub fn provider(&self) -> &AlloyProvider {
        &self.provider
    }

    /// Balance reads against the fork.
    pub fn chain(&self) -> Arc<dyn ChainReading> {
        Arc::new(self.provider.clone())
    }

    pub async fn reset(&self, fork_url: &Url, block_number: u64) -> Result<()> {
        let mut forking = Forking::default();
        forking.json_rpc_url = Some(fork_url.to_string());
        forking.block_number = Some(block_number);
        self.provider
            .anvil_reset(Some(forking))
            .await
            .context("test network must support anvil_reset")?;
        tracing::info!(block_number, node = %self.node_url, "forked chain");
        Ok(())
    }

    /// Lets the node sign for `address` and returns a signer for it.
    pub async fn impersonate(&self, address: Address) -> Result<ImpersonatedSigner> {
        self.provider
            .anvil_impersonate_account(address)
            .await
            .context("test network must support anvil_impersonateAccount")?;
        tracing::debug!(?address, "impersonating account");
        Ok(ImpersonatedSigner::new(self.provider.clone(), address))
    }

    /// A signer for an account whose key is known locally.
    pub fn local_signer(&self, key: PrivateKeySigner) -> LocalSigner {
        LocalSigner::new(&self.node_url, key)
    }

    /// Sends `wei` from the account behind `key` to `address`. Unlike
    /// [`Self::fund`] this is a regular transfer, so the funding account has
    /// to hold the amount on the fork.
    pub async fn fund_from(
        &self,
        key: &PrivateKeySigner,
        address: Address,
        wei: U256,
    ) -> Result<()> {
        let funder = self.local_signer(key.clone());
        signer::transfer_native(&funder, address, wei).await
    }

    /// Sets the native balance of `address` to `wei`.
    pub async fn fund(&self, address: Address, wei: U256) -> Result<()> {
        self.provider
            .anvil_set_balance(address, wei)
            .await
            .context("test network must support anvil_setBalance")?;
        tracing::debug!(?address, %wei, "funded account");
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<U256> {
        self.provider
            .anvil_snapshot()
            .await
            .context("test network must support evm_snapshot")
    }

    pub async fn revert(&self, snapshot_id: U256) -> Result<bool> {
        self.provider
            .anvil_revert(snapshot_id)
            .await
            .context("test network must support evm_revert")
    }
}
