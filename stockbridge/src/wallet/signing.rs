//! Signing client bound to one account and one network.

use std::fmt;

use alloy::consensus::{TxLegacy, TypedTransaction};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::{Ethereum, EthereumWallet, NetworkWallet};
use alloy::primitives::{Address, B256, Bytes};

use super::WalletError;
use crate::chain::NetworkDescriptor;

/// A signed, EIP-2718 encoded transaction ready for raw submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Transaction hash.
    pub hash: B256,
    /// Encoded bytes.
    pub raw: Bytes,
}

/// Produces signed transactions for one account on one network.
#[derive(Clone)]
pub struct SigningClient {
    wallet: EthereumWallet,
    address: Address,
    network: NetworkDescriptor,
}

impl fmt::Debug for SigningClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningClient")
            .field("address", &self.address)
            .field("network", &self.network.name())
            .finish_non_exhaustive()
    }
}

impl SigningClient {
    pub(crate) const fn new(
        wallet: EthereumWallet,
        address: Address,
        network: NetworkDescriptor,
    ) -> Self {
        Self {
            wallet,
            address,
            network,
        }
    }

    /// Account address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Chain ID every signature is bound to.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }

    /// The network this client signs for.
    #[must_use]
    pub const fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    /// Sign a legacy (gas-price) transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction targets another chain or the
    /// signer fails.
    pub async fn sign(&self, tx: TxLegacy) -> Result<SignedTransaction, WalletError> {
        if tx.chain_id != Some(self.chain_id()) {
            return Err(WalletError::signing(format!(
                "transaction chain id {:?} does not match {} ({})",
                tx.chain_id,
                self.network.name(),
                self.chain_id(),
            )));
        }

        let envelope = NetworkWallet::<Ethereum>::sign_transaction_from(
            &self.wallet,
            self.address,
            TypedTransaction::Legacy(tx),
        )
        .await
        .map_err(|e| WalletError::signing(format!("sign_transaction failed: {e}")))?;

        Ok(SignedTransaction {
            hash: *envelope.tx_hash(),
            raw: Bytes::from(envelope.encoded_2718()),
        })
    }
}

#[cfg(test)]
mod tests {
    use alloy::consensus::TxEnvelope;
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::{TxKind, U256, keccak256};
    use alloy::signers::local::PrivateKeySigner;

    use super::*;
    use crate::chain::EvmNetwork;

    fn client() -> SigningClient {
        let signer: PrivateKeySigner = crate::wallet::mock::TEST_PRIVATE_KEY
            .parse()
            .expect("valid key");
        let address = signer.address();
        SigningClient::new(
            EthereumWallet::from(signer),
            address,
            NetworkDescriptor::new(EvmNetwork::AvalancheFuji, None),
        )
    }

    fn legacy(chain_id: u64) -> TxLegacy {
        TxLegacy {
            chain_id: Some(chain_id),
            nonce: 7,
            gas_price: 25_000_000_000,
            gas_limit: 120_000,
            to: TxKind::Call(Address::repeat_byte(0x11)),
            value: U256::from(2u64),
            input: Bytes::from_static(&[0xde, 0xad]),
        }
    }

    #[tokio::test]
    async fn signs_and_encodes() {
        let client = client();
        let signed = client.sign(legacy(43_113)).await.expect("signs");

        assert_eq!(signed.hash, keccak256(&signed.raw));

        let decoded = TxEnvelope::decode_2718(&mut &signed.raw[..]).expect("decodes");
        let tx = decoded.as_legacy().expect("legacy").tx();
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.chain_id, Some(43_113));
        assert_eq!(tx.input, Bytes::from_static(&[0xde, 0xad]));
    }

    #[tokio::test]
    async fn rejects_foreign_chain_id() {
        let err = client().sign(legacy(1)).await.expect_err("wrong chain");
        assert!(matches!(err, WalletError::Signing(_)));
    }
}
