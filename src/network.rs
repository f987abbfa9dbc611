//! Executes the effects produced by the state machine.
//!
//! The worker is the sole owner of the gateway client. Effects arrive in
//! order on the main loop; each fetch snapshots the client at dispatch time
//! and runs as its own tokio task, reporting its completion over the event
//! channel. Pairing completions with requests is entirely the state
//! machine's business (generation stamps), never the worker's, so a fetch
//! dispatched before a network switch simply resolves into a stale
//! generation and is dropped.

use arboard::Clipboard;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use primitive_types::U256;
use tokio::sync::mpsc;

use crate::app::Effect;
use crate::ethereum::{EthClient, Network, TransactionReceipt};
use crate::event::GatewayEvent;

pub struct GatewayWorker {
    client: EthClient,
    api_key: Option<String>,
    runtime: tokio::runtime::Handle,
    sender: mpsc::Sender<GatewayEvent>,
    clipboard: Option<Clipboard>,
}

impl GatewayWorker {
    pub fn new(
        client: EthClient,
        api_key: Option<String>,
        runtime: tokio::runtime::Handle,
        sender: mpsc::Sender<GatewayEvent>,
    ) -> Self {
        Self {
            client,
            api_key,
            runtime,
            sender,
            // Clipboard support is best effort; headless terminals go without.
            clipboard: Clipboard::new().ok(),
        }
    }

    /// Executes a single effect. Fetches return immediately; their results
    /// arrive later as [`GatewayEvent`]s.
    pub fn run(&mut self, effect: Effect) -> Result<()> {
        match effect {
            Effect::FetchHeight { generation } => self.fetch_height(generation),
            Effect::FetchBlock { height, generation } => self.fetch_block(height, generation),
            Effect::FetchReceipt { hash, generation } => self.fetch_receipt(hash, generation),
            Effect::FetchBalance {
                address,
                generation,
            } => self.fetch_balance(address, generation),
            Effect::SwitchNetwork(network) => self.switch_network(network),
            Effect::CopyToClipboard(text) => return self.copy_to_clipboard(text),
        }
        Ok(())
    }

    fn fetch_height(&self, generation: u64) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = client.get_block_number().await.map_err(|e| e.to_string());
            let _ = sender
                .send(GatewayEvent::HeightFetched { generation, result })
                .await;
        });
    }

    fn fetch_block(&self, height: u64, generation: u64) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = client
                .get_block_with_transactions(height)
                .await
                .map_err(|e| e.to_string());
            let _ = sender
                .send(GatewayEvent::BlockFetched { generation, result })
                .await;
        });
    }

    fn fetch_receipt(&self, hash: String, generation: u64) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result: Result<TransactionReceipt, String> = client
                .get_transaction_receipt(&hash)
                .await
                .map_err(|e| e.to_string())
                .and_then(|receipt| {
                    receipt.ok_or_else(|| format!("Transaction {hash} is not yet mined"))
                });
            let _ = sender
                .send(GatewayEvent::ReceiptFetched { generation, result })
                .await;
        });
    }

    fn fetch_balance(&self, address: String, generation: u64) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result: Result<U256, String> =
                client.get_balance(&address).await.map_err(|e| e.to_string());
            let _ = sender
                .send(GatewayEvent::BalanceFetched { generation, result })
                .await;
        });
    }

    /// Replaces the client with one pointed at the new network. Runs
    /// synchronously so any fetch effect that follows in the same batch
    /// already snapshots the new client.
    fn switch_network(&mut self, network: Network) {
        tracing::debug!("Switching gateway client to {}", network.as_str());
        self.client = EthClient::new(network, self.api_key.clone());
    }

    fn copy_to_clipboard(&mut self, text: String) -> Result<()> {
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| eyre!("Clipboard not available"))?;
        clipboard
            .set_text(text)
            .map_err(|e| eyre!("Clipboard error: {e}"))
    }
}
