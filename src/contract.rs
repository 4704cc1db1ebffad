//! Contract method invocation
//!
//! Arguments arrive as strings (from the command line or a workflow plan)
//! and are coerced to the parameter types declared in the ABI. Read-only
//! methods run through `eth_call`; anything else is signed and submitted.

use crate::wallet::{parse_recipient, ConnectedWallet};
use crate::{Result, WalletError};
use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy::hex;
use alloy::json_abi::{Function, JsonAbi, StateMutability};
use alloy::primitives::{Bytes, TxHash};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use serde::Serialize;

/// Result of invoking a contract method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContractOutcome {
    /// Decoded return values of a view/pure call
    Returned { values: Vec<String> },
    /// Hash of the submitted state-changing transaction
    Submitted { tx_hash: TxHash },
}

impl std::fmt::Display for ContractOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractOutcome::Returned { values } => write!(f, "[{}]", values.join(", ")),
            ContractOutcome::Submitted { tx_hash } => write!(f, "submitted {}", tx_hash),
        }
    }
}

/// A method call resolved against an ABI
#[derive(Debug, Clone)]
pub struct EncodedCall {
    pub function: Function,
    pub calldata: Bytes,
}

impl EncodedCall {
    /// Whether the method can be executed without a transaction
    pub fn is_read_only(&self) -> bool {
        matches!(
            self.function.state_mutability,
            StateMutability::View | StateMutability::Pure
        )
    }
}

/// Parse a JSON ABI (the array form emitted by solc)
pub fn parse_abi(json: &str) -> Result<JsonAbi> {
    serde_json::from_str(json).map_err(|e| WalletError::ContractCall(format!("Invalid ABI: {}", e)))
}

/// Resolve `method` in `abi` and encode `args` as its calldata
///
/// Overloads are tried in declaration order; the first whose arity matches
/// and whose parameter types accept every argument wins.
pub fn encode_call(abi: &JsonAbi, method: &str, args: &[String]) -> Result<EncodedCall> {
    let overloads = abi.function(method).ok_or_else(|| {
        WalletError::ContractCall(format!("Method {} not found in ABI", method))
    })?;

    let mut last_error = None;
    for function in overloads.iter().filter(|f| f.inputs.len() == args.len()) {
        match coerce_args(function, args) {
            Ok(values) => {
                let calldata = function
                    .abi_encode_input(&values)
                    .map_err(|e| WalletError::ContractCall(e.to_string()))?;
                return Ok(EncodedCall {
                    function: function.clone(),
                    calldata: calldata.into(),
                });
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        WalletError::ContractCall(format!(
            "No overload of {} takes {} argument(s)",
            method,
            args.len()
        ))
    }))
}

fn coerce_args(function: &Function, args: &[String]) -> Result<Vec<DynSolValue>> {
    function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param
                .resolve()
                .map_err(|e| WalletError::ContractCall(format!("{}: {}", param.ty, e)))?;
            ty.coerce_str(arg).map_err(|e| {
                WalletError::ContractCall(format!(
                    "Argument {:?} is not a valid {}: {}",
                    arg, param.ty, e
                ))
            })
        })
        .collect()
}

/// Render a decoded ABI value for display
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(a) => a.to_checksum(None),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Bytes(b) => hex::encode_prefixed(b),
        DynSolValue::FixedBytes(word, size) => hex::encode_prefixed(&word[..*size]),
        DynSolValue::Array(items)
        | DynSolValue::FixedArray(items)
        | DynSolValue::Tuple(items) => {
            let inner: Vec<String> = items.iter().map(format_value).collect();
            format!("[{}]", inner.join(", "))
        }
        other => format!("{:?}", other),
    }
}

/// Invoke `method` on the contract at `contract_address`
pub async fn invoke(
    wallet: &ConnectedWallet,
    contract_address: &str,
    abi: &JsonAbi,
    method: &str,
    args: &[String],
) -> Result<ContractOutcome> {
    let to = parse_recipient(contract_address)?;

    let call = encode_call(abi, method, args)?;
    let tx = TransactionRequest::default()
        .from(wallet.address())
        .to(to)
        .input(call.calldata.clone().into());

    let outcome = if call.is_read_only() {
        let output = wallet
            .provider()
            .call(tx)
            .await
            .map_err(|e| WalletError::ContractCall(e.to_string()))?;

        let decoded = call
            .function
            .abi_decode_output(&output)
            .map_err(|e| WalletError::ContractCall(format!("Cannot decode output: {}", e)))?;

        ContractOutcome::Returned {
            values: decoded.iter().map(format_value).collect(),
        }
    } else {
        let pending = wallet
            .provider()
            .send_transaction(tx)
            .await
            .map_err(|e| WalletError::ContractCall(e.to_string()))?;

        ContractOutcome::Submitted {
            tx_hash: *pending.tx_hash(),
        }
    };

    tracing::info!(
        contract = %to,
        method = %call.function.signature(),
        result = %outcome,
        "Contract interaction result"
    );
    Ok(outcome)
}
