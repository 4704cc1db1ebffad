//! Wallet workflow driver
//!
//! Runs the demo workflow one step at a time: create and import wallets,
//! connect, check the balance, send a transfer, round-trip a keystore and
//! call a contract. A failing step is logged and recorded in the report;
//! the remaining steps still run.

use crate::config::{Config, RpcConfig};
use crate::contract::{self, ContractOutcome};
use crate::wallet::{keystore, ConnectedWallet, Wallet};
use crate::{Result, WalletError};
use alloy::json_abi::JsonAbi;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{error, info, warn};

/// Steps of the workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Create,
    ImportPrivateKey,
    ImportMnemonic,
    Connect,
    CheckBalance,
    SendTransaction,
    Encrypt,
    Decrypt,
    InvokeContract,
}

/// What happened in one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Succeeded { detail: String },
    Failed { kind: String, message: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: Step,
    #[serde(flatten)]
    pub status: StepStatus,
}

/// Per-step results of a workflow run
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowReport {
    pub steps: Vec<StepOutcome>,
}

impl WorkflowReport {
    pub fn status(&self, step: Step) -> Option<&StepStatus> {
        self.steps.iter().find(|o| o.step == step).map(|o| &o.status)
    }

    pub fn succeeded(&self, step: Step) -> bool {
        matches!(self.status(step), Some(StepStatus::Succeeded { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps
            .iter()
            .filter(|o| matches!(o.status, StepStatus::Failed { .. }))
    }

    fn record<T>(
        &mut self,
        step: Step,
        result: Result<T>,
        detail: impl FnOnce(&T) -> String,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                let detail = detail(&value);
                info!(step = ?step, "{}", detail);
                self.steps.push(StepOutcome {
                    step,
                    status: StepStatus::Succeeded { detail },
                });
                Some(value)
            }
            Err(e) => {
                error!(step = ?step, kind = e.kind(), "{}", e);
                self.steps.push(StepOutcome {
                    step,
                    status: StepStatus::Failed {
                        kind: e.kind().to_string(),
                        message: e.to_string(),
                    },
                });
                None
            }
        }
    }

    fn skip(&mut self, step: Step, reason: &str) {
        warn!(step = ?step, "Skipped: {}", reason);
        self.steps.push(StepOutcome {
            step,
            status: StepStatus::Skipped {
                reason: reason.to_string(),
            },
        });
    }
}

/// Contract interaction performed at the end of the workflow
#[derive(Debug, Clone)]
pub struct ContractCallPlan {
    pub address: String,
    pub abi: JsonAbi,
    pub method: String,
    pub args: Vec<String>,
}

/// Inputs for one workflow run
#[derive(Debug)]
pub struct DemoPlan {
    /// Key to import; when set, this wallet is the one connected
    pub private_key: Option<SecretString>,
    /// Phrase to import
    pub mnemonic: Option<SecretString>,
    /// Network name to connect to
    pub network: String,
    /// Transfer recipient; no transfer is sent without one
    pub recipient: Option<String>,
    /// Transfer amount in ether
    pub amount: String,
    /// Password for the keystore round trip
    pub password: SecretString,
    pub contract: Option<ContractCallPlan>,
}

impl DemoPlan {
    pub fn new(network: impl Into<String>, password: SecretString) -> Self {
        Self {
            private_key: None,
            mnemonic: None,
            network: network.into(),
            recipient: None,
            amount: "0.01".to_string(),
            password,
            contract: None,
        }
    }
}

/// Runs the workflow against configured endpoints
pub struct WorkflowRunner {
    config: Config,
    rpc_config: RpcConfig,
}

impl WorkflowRunner {
    pub fn new(config: Config, rpc_config: RpcConfig) -> Self {
        Self { config, rpc_config }
    }

    /// Run every step of `plan`
    pub async fn run(&self, plan: &DemoPlan) -> WorkflowReport {
        let mut report = WorkflowReport::default();

        info!(network = %plan.network, "Starting wallet workflow");

        let created = report.record(Step::Create, Wallet::create(), |w| {
            format!("New wallet address: {}", w.address_string())
        });

        let imported = match &plan.private_key {
            Some(key) => report.record(
                Step::ImportPrivateKey,
                Wallet::from_private_key(key.expose_secret()),
                |w| format!("Imported wallet address: {}", w.address_string()),
            ),
            None => {
                report.skip(Step::ImportPrivateKey, "no private key given");
                None
            }
        };

        let from_mnemonic = match &plan.mnemonic {
            Some(phrase) => report.record(
                Step::ImportMnemonic,
                Wallet::from_mnemonic_at(phrase.expose_secret(), self.config.derivation_index),
                |w| format!("Imported wallet address: {}", w.address_string()),
            ),
            None => {
                report.skip(Step::ImportMnemonic, "no mnemonic given");
                None
            }
        };

        let connected = match imported.as_ref().or(from_mnemonic.as_ref()).or(created.as_ref()) {
            Some(wallet) => report.record(
                Step::Connect,
                ConnectedWallet::connect(wallet, &plan.network, &self.rpc_config, &self.config)
                    .await,
                |c| format!("Connected {} to {}", c.wallet().address_string(), c.network()),
            ),
            None => {
                report.skip(Step::Connect, "no wallet available");
                None
            }
        };

        self.run_network_steps(connected.as_ref(), plan, &mut report).await;

        match &created {
            Some(wallet) => self.run_keystore_steps(wallet, plan, &mut report),
            None => {
                report.skip(Step::Encrypt, "no wallet created");
                report.skip(Step::Decrypt, "no wallet created");
            }
        }

        match (&connected, &plan.contract) {
            (Some(connected), Some(call)) => {
                let result = contract::invoke(
                    connected,
                    &call.address,
                    &call.abi,
                    &call.method,
                    &call.args,
                )
                .await;
                report.record(Step::InvokeContract, result, |outcome: &ContractOutcome| {
                    format!("Contract interaction result: {}", outcome)
                });
            }
            (None, Some(_)) => report.skip(Step::InvokeContract, "wallet not connected"),
            (_, None) => report.skip(Step::InvokeContract, "no contract given"),
        }

        let failed = report.failures().count();
        info!(steps = report.steps.len(), failed, "Wallet workflow finished");
        report
    }

    async fn run_network_steps(
        &self,
        connected: Option<&ConnectedWallet>,
        plan: &DemoPlan,
        report: &mut WorkflowReport,
    ) {
        let Some(connected) = connected else {
            report.skip(Step::CheckBalance, "wallet not connected");
            report.skip(Step::SendTransaction, "wallet not connected");
            return;
        };

        report.record(Step::CheckBalance, connected.balance().await, |b| {
            format!("Balance: {}", b)
        });

        let Some(recipient) = &plan.recipient else {
            report.skip(Step::SendTransaction, "no recipient given");
            return;
        };

        let result = match connected.send(recipient, &plan.amount).await {
            Ok(pending) => {
                info!(tx_hash = %pending.tx_hash(), "Transaction Hash");
                pending.wait().await
            }
            Err(e) => Err(e),
        };
        report.record(Step::SendTransaction, result, |receipt| {
            if receipt.success {
                format!("Transaction confirmed: {}", receipt.tx_hash)
            } else {
                format!("Transaction reverted: {}", receipt.tx_hash)
            }
        });
    }

    fn run_keystore_steps(&self, wallet: &Wallet, plan: &DemoPlan, report: &mut WorkflowReport) {
        let password = plan.password.expose_secret();

        let encrypted = report.record(
            Step::Encrypt,
            keystore::encrypt(wallet, password, &self.config.keystore_dir),
            |k| format!("Encrypted keystore written to {}", k.path.display()),
        );

        let Some(encrypted) = encrypted else {
            report.skip(Step::Decrypt, "nothing was encrypted");
            return;
        };

        let decrypted = keystore::decrypt(&encrypted.json, password).and_then(|restored| {
            if restored.address() == wallet.address() {
                Ok(restored)
            } else {
                Err(WalletError::Unknown(format!(
                    "keystore decrypted to {} instead of {}",
                    restored.address_string(),
                    wallet.address_string()
                )))
            }
        });
        report.record(Step::Decrypt, decrypted, |w| {
            format!("Decrypted wallet address: {}", w.address_string())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(dir: &std::path::Path) -> WorkflowRunner {
        let config = Config {
            keystore_dir: dir.to_path_buf(),
            ..Config::default()
        };
        WorkflowRunner::new(config, RpcConfig::with_urls(Default::default()))
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let mut plan = DemoPlan::new("bogus-network", SecretString::from("pw".to_string()));
        plan.private_key = Some(SecretString::from("your-private-key-here".to_string()));
        plan.mnemonic = Some(SecretString::from(
            "test test test test test test test test test test test junk".to_string(),
        ));
        plan.recipient = Some("0x70997970C51812dc3A010C7d01b50e0d17dc79C8".to_string());

        let report = runner(dir.path()).run(&plan).await;

        assert!(report.succeeded(Step::Create));
        assert!(matches!(
            report.status(Step::ImportPrivateKey),
            Some(StepStatus::Failed { kind, .. }) if kind == "invalid_key"
        ));
        assert!(report.succeeded(Step::ImportMnemonic));
        assert!(matches!(
            report.status(Step::Connect),
            Some(StepStatus::Failed { kind, .. }) if kind == "network_unreachable"
        ));
        assert!(matches!(
            report.status(Step::CheckBalance),
            Some(StepStatus::Skipped { .. })
        ));
        assert!(matches!(
            report.status(Step::SendTransaction),
            Some(StepStatus::Skipped { .. })
        ));
        // Keystore steps run after the network failure
        assert!(report.succeeded(Step::Encrypt));
        assert!(report.succeeded(Step::Decrypt));
        assert_eq!(report.failures().count(), 2);
        assert_eq!(report.steps.len(), 9);
    }

    #[tokio::test]
    async fn minimal_plan_skips_optional_steps() {
        let dir = tempfile::tempdir().unwrap();
        let plan = DemoPlan::new("nowhere", SecretString::from("pw".to_string()));

        let report = runner(dir.path()).run(&plan).await;

        for step in [Step::ImportPrivateKey, Step::ImportMnemonic, Step::InvokeContract] {
            assert!(
                matches!(report.status(step), Some(StepStatus::Skipped { .. })),
                "{step:?}"
            );
        }
        assert!(report.succeeded(Step::Encrypt));
    }

    #[test]
    fn report_serializes_flat() {
        let mut report = WorkflowReport::default();
        report.skip(Step::Connect, "offline");

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["steps"][0]["step"], "connect");
        assert_eq!(value["steps"][0]["status"], "skipped");
        assert_eq!(value["steps"][0]["reason"], "offline");
    }
}
