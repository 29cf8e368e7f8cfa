//! Accounts that can authorize transactions on the fork.

use {
    crate::chain::{self, AlloyProvider},
    alloy::{
        network::{ReceiptResponse, TransactionBuilder},
        primitives::{Address, B256, U256},
        providers::Provider,
        rpc::types::{TransactionReceipt, TransactionRequest},
        signers::local::PrivateKeySigner,
    },
    anyhow::{Result, ensure},
    url::Url,
};

/// Outcome of a mined transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: B256,
    pub success: bool,
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for Receipt {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
            gas_used: receipt.gas_used,
        }
    }
}

/// The capabilities the harness needs from an account: knowing its address
/// and getting a transaction mined on its behalf.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait Signer: Send + Sync {
    fn address(&self) -> Address;

    /// Submits `tx` from this account and waits until it is mined. A reverted
    /// transaction is not an error, it is reported through
    /// [`Receipt::success`].
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Receipt>;
}

async fn send_and_wait(
    provider: &AlloyProvider,
    from: Address,
    tx: TransactionRequest,
) -> Result<Receipt> {
    let pending = provider.send_transaction(tx.with_from(from)).await?;
    let tx_hash = *pending.tx_hash();
    tracing::debug!(?tx_hash, ?from, "submitted transaction");
    let receipt = pending.get_receipt().await?;
    let receipt = Receipt::from(&receipt);
    if receipt.success {
        tracing::debug!(?tx_hash, gas_used = receipt.gas_used, "transaction mined");
    } else {
        tracing::warn!(?tx_hash, "transaction reverted");
    }
    Ok(receipt)
}

/// An account the node signs for after `anvil_impersonateAccount`.
///
/// The provider has no wallet so that alloy does not try to sign the
/// transaction itself and instead forwards it to the node.
#[derive(Clone, Debug)]
pub struct ImpersonatedSigner {
    provider: AlloyProvider,
    address: Address,
}

impl ImpersonatedSigner {
    /// Expects the node to already impersonate `address`, see
    /// [`crate::nodes::forked_node::ForkedNode::impersonate`].
    pub fn new(provider: AlloyProvider, address: Address) -> Self {
        Self { provider, address }
    }
}

#[async_trait::async_trait]
impl Signer for ImpersonatedSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Receipt> {
        send_and_wait(&self.provider, self.address, tx).await
    }
}

/// An account whose private key is known locally, e.g. the funding account.
#[derive(Clone, Debug)]
pub struct LocalSigner {
    provider: AlloyProvider,
    address: Address,
}

impl LocalSigner {
    pub fn new(node_url: &Url, signer: PrivateKeySigner) -> Self {
        let address = signer.address();
        Self {
            provider: chain::provider_with_signer(node_url, signer),
            address,
        }
    }
}

#[async_trait::async_trait]
impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<Receipt> {
        send_and_wait(&self.provider, self.address, tx).await
    }
}

/// Sends `wei` of the native asset from `signer` to `to`.
pub async fn transfer_native(signer: &dyn Signer, to: Address, wei: U256) -> Result<()> {
    let tx = TransactionRequest::default().with_to(to).with_value(wei);
    let receipt = signer.send_transaction(tx).await?;
    ensure!(
        receipt.success,
        "transfer of {wei} wei to {to} reverted in {:?}",
        receipt.tx_hash
    );
    tracing::debug!(from = ?signer.address(), ?to, %wei, "transferred native asset");
    Ok(())
}
