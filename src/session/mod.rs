//! Trading session
//!
//! A [`Session`] owns one wallet engine, one decision engine, the session log
//! and the balance chart. It is the only writer of log text; balance comes
//! only from the engine.

mod log;

pub use log::{LogEntry, LogKind, SessionLog};

use alloy::primitives::TxHash;
use serde::Serialize;
use uuid::Uuid;

use crate::chain::{ChainClient, Faucet};
use crate::config::SessionSettings;
use crate::decision::{Action, Decision, DecisionEngine};
use crate::error::TxError;
use crate::wallet::{WalletEngine, WalletStatus};

/// Dashboard figures
#[derive(Debug, Clone, Serialize)]
pub struct SessionMetrics {
    pub session_id: Uuid,
    pub net_asset_value: f64,
    pub total_transactions: u64,
    pub pnl: f64,
    pub status: WalletStatus,
}

/// What an analysis cycle did with the decision
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CycleOutcome {
    Held,
    Bought { tx_hash: TxHash },
    Sold,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub decision: Decision,
    pub outcome: CycleOutcome,
    pub balance: f64,
}

pub struct Session<C> {
    id: Uuid,
    wallet: WalletEngine<C>,
    decisions: DecisionEngine,
    log: SessionLog,
    chart: Vec<f64>,
    pnl_baseline: f64,
}

impl<C: ChainClient + Faucet> Session<C> {
    /// Create a session and connect its wallet
    ///
    /// A failed connection is logged, not returned; [`Session::connect`]
    /// retries.
    pub async fn start(
        wallet: WalletEngine<C>,
        decisions: DecisionEngine,
        settings: &SessionSettings,
    ) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            wallet,
            decisions,
            log: SessionLog::new(),
            chart: Vec::new(),
            pnl_baseline: settings.pnl_baseline,
        };
        tracing::info!(session_id = %session.id, "Session started");

        session.connect().await;
        if !session.decisions.is_online() {
            session
                .log
                .push(LogKind::System, "Decision engine offline: model API key missing");
        }
        session
    }

    /// Connect (or reconnect) the wallet; returns whether it is connected
    pub async fn connect(&mut self) -> bool {
        match self.wallet.connect().await {
            Ok(address) => {
                self.log.push(
                    LogKind::System,
                    format!("Wallet connected: {} ({:.4} ETH)", address, self.wallet.balance()),
                );
                true
            }
            Err(e) => {
                tracing::warn!(session_id = %self.id, error = %e, "Wallet connection failed");
                self.log.push(LogKind::Error, format!("Connection failed: {}", e));
                false
            }
        }
    }

    pub async fn manual_buy(&mut self, amount: f64) -> Result<TxHash, TxError> {
        match self.wallet.buy(amount).await {
            Ok(tx_hash) => {
                self.log
                    .push(LogKind::Execution, format!("Buy Order Filled: {} ETH", amount));
                self.snapshot_balance();
                Ok(tx_hash)
            }
            Err(e) => {
                self.log.push(LogKind::Error, format!("Buy Order Failed: {}", e));
                Err(e)
            }
        }
    }

    pub async fn manual_sell(&mut self, amount: f64) -> Result<(), TxError> {
        match self.wallet.sell(amount).await {
            Ok(()) => {
                self.log.push(
                    LogKind::Execution,
                    format!("Sell Order Filled: Liquidity Added: +{} ETH", amount),
                );
                self.snapshot_balance();
                Ok(())
            }
            Err(e) => {
                self.log.push(LogKind::Error, format!("Sell Order Failed: {}", e));
                Err(e)
            }
        }
    }

    /// Refresh, ask the model, act on its decision
    pub async fn run_cycle(&mut self, strategy: &str) -> CycleReport {
        let balance = self.wallet.refresh().await;
        let decision = self.decisions.analyze(balance, strategy).await;
        self.log.push(LogKind::Algo, decision.thought.clone());

        let outcome = match decision.action {
            Action::Hold => CycleOutcome::Held,
            Action::BuyEntry => match self.wallet.buy(decision.amount).await {
                Ok(tx_hash) => {
                    self.log
                        .push(LogKind::Auto, format!("Buy Executed: {} ETH", decision.amount));
                    CycleOutcome::Bought { tx_hash }
                }
                Err(e) => {
                    self.log.push(LogKind::Error, format!("Auto Buy Failed: {}", e));
                    CycleOutcome::Failed { error: e.to_string() }
                }
            },
            Action::SellExit => match self.wallet.sell(decision.amount).await {
                Ok(()) => {
                    self.log
                        .push(LogKind::Auto, format!("Sell Executed: {} ETH", decision.amount));
                    CycleOutcome::Sold
                }
                Err(e) => {
                    self.log.push(LogKind::Error, format!("Auto Sell Failed: {}", e));
                    CycleOutcome::Failed { error: e.to_string() }
                }
            },
        };

        if !matches!(outcome, CycleOutcome::Failed { .. }) {
            self.snapshot_balance();
        }

        tracing::info!(
            session_id = %self.id,
            action = %decision.action,
            amount = decision.amount,
            outcome = ?outcome,
            "Analysis cycle complete"
        );
        CycleReport {
            decision,
            outcome,
            balance: self.wallet.balance(),
        }
    }
}

impl<C: ChainClient> Session<C> {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn wallet(&self) -> &WalletEngine<C> {
        &self.wallet
    }

    pub fn metrics(&self) -> SessionMetrics {
        let balance = self.wallet.balance();
        SessionMetrics {
            session_id: self.id,
            net_asset_value: balance,
            total_transactions: self.wallet.tx_count(),
            pnl: balance - self.pnl_baseline,
            status: self.wallet.status(),
        }
    }

    /// Clear log and chart; the wallet is untouched
    pub fn reset(&mut self) {
        self.log.clear();
        self.chart.clear();
        tracing::info!(session_id = %self.id, "Session reset");
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    /// Balance snapshots, oldest first
    pub fn chart(&self) -> &[f64] {
        &self.chart
    }

    fn snapshot_balance(&mut self) {
        self.chart.push(self.wallet.balance());
    }
}
