//! Mocked providers for provider-backed tests

use super::{ConnectedWallet, Wallet};
use crate::config::{Config, Network};
use alloy::network::Ethereum;
use alloy::primitives::{address, TxHash, B256};
use alloy::providers::fillers::{FillerControlFlow, TxFiller};
use alloy::providers::{Provider, ProviderBuilder, SendableTx};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::mock::Asserter;
use alloy::transports::TransportResult;

pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Fills nonce, gas limit and fees with fixed values, so signing a
/// transaction needs no RPC round trips and the mock queue only has to
/// answer the submission itself
#[derive(Debug, Clone, Copy)]
pub struct FixedGas;

impl TxFiller<Ethereum> for FixedGas {
    type Fillable = ();

    fn status(&self, tx: &TransactionRequest) -> FillerControlFlow {
        if tx.nonce.is_some()
            && tx.gas.is_some()
            && tx.max_fee_per_gas.is_some()
            && tx.max_priority_fee_per_gas.is_some()
        {
            FillerControlFlow::Finished
        } else {
            FillerControlFlow::Ready
        }
    }

    fn fill_sync(&self, tx: &mut SendableTx<Ethereum>) {
        if let Some(builder) = tx.as_mut_builder() {
            builder.nonce.get_or_insert(0);
            builder.gas.get_or_insert(100_000);
            builder.max_fee_per_gas.get_or_insert(2_000_000_000);
            builder.max_priority_fee_per_gas.get_or_insert(1_000_000_000);
        }
    }

    async fn prepare<P>(&self, _provider: &P, _tx: &TransactionRequest) -> TransportResult<()>
    where
        P: Provider<Ethereum>,
    {
        Ok(())
    }

    async fn fill(
        &self,
        _fillable: (),
        tx: SendableTx<Ethereum>,
    ) -> TransportResult<SendableTx<Ethereum>> {
        Ok(tx)
    }
}

/// The Anvil key 0 wallet bound to a mocked localhost provider
pub fn mocked(asserter: &Asserter, config: &Config) -> ConnectedWallet {
    let wallet = Wallet::from_private_key(TEST_KEY).unwrap();
    let provider = ProviderBuilder::new()
        .disable_recommended_fillers()
        .with_chain_id(Network::Localhost.chain_id())
        .filler(FixedGas)
        .wallet(wallet.ethereum_wallet())
        .connect_mocked_client(asserter.clone())
        .erased();
    ConnectedWallet::with_provider(wallet, Network::Localhost, provider, config)
}

/// `eth_getTransactionReceipt` answer for a plain transfer
pub fn receipt_json(tx_hash: TxHash, block: u64, success: bool) -> serde_json::Value {
    serde_json::json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": B256::repeat_byte(0x11),
        "blockNumber": format!("{:#x}", block),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": address!("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
        "to": address!("0x70997970c51812dc3a010c7d01b50e0d17dc79c8"),
        "contractAddress": null
    })
}
