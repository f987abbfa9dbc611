//! Application state and the pure transition function.
//!
//! All user input and every gateway completion funnels through
//! [`App::update`], which mutates state and returns the [`Effect`]s the
//! caller must execute (fetches, clipboard writes, network switches).
//! Nothing in this module performs I/O besides settings persistence on a
//! network switch, so the whole state machine is exercised in tests without
//! a terminal or a network.
//!
//! Requests and their completions are paired by generation number: each
//! dispatch bumps the owning view's counter and stamps the effect, and a
//! completion whose stamp no longer matches is dropped. A slow response can
//! therefore never overwrite the result of a later request.

use primitive_types::U256;

use crate::config::{self, AppSettings};
use crate::ethereum::{BlockDetails, Network, TransactionReceipt, is_hex_address};
use crate::event::Action;

/// Top-level screens reachable from the header navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Explorer,
    Accounts,
}

/// Input context for key mapping, derived from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// Explorer screen, list mode (or nothing fetched yet).
    Explorer,
    /// Explorer screen with a receipt open.
    ExplorerDetail,
    /// Accounts screen; printable keys go to the address input.
    Accounts,
    /// Network selection popup is open.
    NetworkSelect,
    /// A message popup is open.
    MessagePopup,
}

/// State for popups layered over the active screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupState {
    None,
    NetworkSelect {
        available_networks: Vec<Network>,
        selected_index: usize,
    },
    Message(String),
}

/// Side effects requested by a state transition, executed by the gateway
/// worker in the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchHeight { generation: u64 },
    FetchBlock { height: u64, generation: u64 },
    FetchReceipt { hash: String, generation: u64 },
    FetchBalance { address: String, generation: u64 },
    SwitchNetwork(Network),
    CopyToClipboard(String),
}

/// State owned by the explorer screen.
#[derive(Debug, Default)]
pub struct ExplorerState {
    /// Latest block height, fetched on startup and on refresh.
    pub height: Option<u64>,
    /// The fetched block with its transactions, list-mode data.
    pub block: Option<BlockDetails>,
    /// The open receipt; `Some` switches the screen to detail mode.
    pub receipt: Option<TransactionReceipt>,
    /// Selected row in the transaction table.
    pub selected: Option<usize>,
    /// Inline error from the most recent failed request.
    pub error: Option<String>,
    pub height_generation: u64,
    pub block_generation: u64,
    pub receipt_generation: u64,
}

impl ExplorerState {
    /// List mode renders the transaction table; detail mode the receipt.
    pub fn in_detail_mode(&self) -> bool {
        self.receipt.is_some()
    }

    fn transaction_count(&self) -> usize {
        self.block.as_ref().map_or(0, |b| b.transactions.len())
    }
}

/// State owned by the accounts screen.
#[derive(Debug, Default)]
pub struct AccountsState {
    /// Address text input, edited in place.
    pub address: String,
    /// Balance of the most recently resolved lookup, in wei.
    pub balance: Option<U256>,
    /// Inline error from the most recent failed lookup.
    pub error: Option<String>,
    pub balance_generation: u64,
}

/// The main application struct holding all view state.
pub struct App {
    pub settings: AppSettings,
    pub screen: Screen,
    pub explorer: ExplorerState,
    pub accounts: AccountsState,
    pub popup: PopupState,
    pub exit: bool,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        Self {
            settings,
            screen: Screen::Explorer,
            explorer: ExplorerState::default(),
            accounts: AccountsState::default(),
            popup: PopupState::None,
            exit: false,
        }
    }

    /// Derives the input context used by the key handler.
    pub fn input_context(&self) -> InputContext {
        match &self.popup {
            PopupState::NetworkSelect { .. } => InputContext::NetworkSelect,
            PopupState::Message(_) => InputContext::MessagePopup,
            PopupState::None => match self.screen {
                Screen::Explorer if self.explorer.in_detail_mode() => InputContext::ExplorerDetail,
                Screen::Explorer => InputContext::Explorer,
                Screen::Accounts => InputContext::Accounts,
            },
        }
    }

    /// Applies an action and returns the effects to execute.
    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Quit => {
                self.exit = true;
                Vec::new()
            }
            Action::SwitchScreen(screen) => {
                self.screen = screen;
                Vec::new()
            }
            Action::RefreshHeight => self.dispatch_height_fetch(),
            Action::FetchBlockDetails => self.dispatch_block_fetch(),
            Action::MoveSelectionUp => {
                self.move_selection(-1);
                Vec::new()
            }
            Action::MoveSelectionDown => {
                self.move_selection(1);
                Vec::new()
            }
            Action::SelectTransaction => self.dispatch_receipt_fetch(),
            Action::Back => {
                // Drops the receipt only; the block and its selection stay.
                self.explorer.receipt = None;
                Vec::new()
            }

            Action::AddressInput(c) => {
                self.accounts.address.push(c);
                Vec::new()
            }
            Action::AddressBackspace => {
                self.accounts.address.pop();
                Vec::new()
            }
            Action::LookupBalance => self.dispatch_balance_fetch(),

            Action::OpenNetworkSelector => {
                self.open_network_selector();
                Vec::new()
            }
            Action::SelectNetworkOption(index) => {
                self.select_network_option(index);
                Vec::new()
            }
            Action::SwitchToNetwork(network) => self.switch_network(network),
            Action::CopySelectedHash => self.copy_selected_hash(),
            Action::ShowMessage(msg) => {
                self.popup = PopupState::Message(msg);
                Vec::new()
            }
            Action::ClearPopup => {
                self.popup = PopupState::None;
                Vec::new()
            }

            Action::UpdateHeight { generation, result } => {
                self.apply_height(generation, result);
                Vec::new()
            }
            Action::UpdateBlock { generation, result } => {
                self.apply_block(generation, result);
                Vec::new()
            }
            Action::UpdateReceipt { generation, result } => {
                self.apply_receipt(generation, result);
                Vec::new()
            }
            Action::UpdateBalance { generation, result } => {
                self.apply_balance(generation, result);
                Vec::new()
            }
        }
    }

    // --- Dispatch helpers (bump generation, emit fetch effect) ---

    fn dispatch_height_fetch(&mut self) -> Vec<Effect> {
        self.explorer.height_generation += 1;
        vec![Effect::FetchHeight {
            generation: self.explorer.height_generation,
        }]
    }

    fn dispatch_block_fetch(&mut self) -> Vec<Effect> {
        // Only valid once the height is known.
        let Some(height) = self.explorer.height else {
            return Vec::new();
        };
        self.explorer.block_generation += 1;
        vec![Effect::FetchBlock {
            height,
            generation: self.explorer.block_generation,
        }]
    }

    fn dispatch_receipt_fetch(&mut self) -> Vec<Effect> {
        if self.explorer.in_detail_mode() {
            return Vec::new();
        }
        let hash = match (&self.explorer.block, self.explorer.selected) {
            (Some(block), Some(index)) => match block.transactions.get(index) {
                Some(txn) => txn.hash.clone(),
                None => return Vec::new(),
            },
            _ => return Vec::new(),
        };
        self.explorer.receipt_generation += 1;
        vec![Effect::FetchReceipt {
            hash,
            generation: self.explorer.receipt_generation,
        }]
    }

    fn dispatch_balance_fetch(&mut self) -> Vec<Effect> {
        let address = self.accounts.address.trim().to_string();
        if address.is_empty() {
            return Vec::new();
        }
        if !is_hex_address(&address) {
            self.accounts.error = Some(format!("'{address}' is not an Ethereum address"));
            return Vec::new();
        }
        self.accounts.error = None;
        self.accounts.balance_generation += 1;
        vec![Effect::FetchBalance {
            address,
            generation: self.accounts.balance_generation,
        }]
    }

    // --- Completion handlers (drop stale generations, apply or surface) ---

    fn apply_height(&mut self, generation: u64, result: Result<u64, String>) {
        if generation != self.explorer.height_generation {
            return;
        }
        match result {
            Ok(height) => {
                self.explorer.height = Some(height);
                self.explorer.error = None;
            }
            Err(e) => self.explorer.error = Some(e),
        }
    }

    fn apply_block(&mut self, generation: u64, result: Result<BlockDetails, String>) {
        if generation != self.explorer.block_generation {
            return;
        }
        match result {
            Ok(block) => {
                self.explorer.selected = if block.transactions.is_empty() {
                    None
                } else {
                    Some(0)
                };
                self.explorer.block = Some(block);
                self.explorer.error = None;
            }
            Err(e) => self.explorer.error = Some(e),
        }
    }

    fn apply_receipt(&mut self, generation: u64, result: Result<TransactionReceipt, String>) {
        if generation != self.explorer.receipt_generation {
            return;
        }
        match result {
            Ok(receipt) => {
                self.explorer.receipt = Some(receipt);
                self.explorer.error = None;
            }
            Err(e) => self.explorer.error = Some(e),
        }
    }

    fn apply_balance(&mut self, generation: u64, result: Result<U256, String>) {
        if generation != self.accounts.balance_generation {
            return;
        }
        match result {
            Ok(balance) => {
                self.accounts.balance = Some(balance);
                self.accounts.error = None;
            }
            Err(e) => self.accounts.error = Some(e),
        }
    }

    // --- Selection ---

    fn move_selection(&mut self, delta: isize) {
        if self.explorer.in_detail_mode() || self.screen != Screen::Explorer {
            return;
        }
        let len = self.explorer.transaction_count();
        if len == 0 {
            return;
        }
        let current = self.explorer.selected.unwrap_or(0);
        let next = if delta < 0 {
            if current == 0 { len - 1 } else { current - 1 }
        } else {
            (current + 1) % len
        };
        self.explorer.selected = Some(next);
    }

    // --- Network selection ---

    fn open_network_selector(&mut self) {
        let available_networks = self.settings.available_networks();
        let selected_index = available_networks
            .iter()
            .position(|n| *n == self.settings.selected_network)
            .unwrap_or(0);
        self.popup = PopupState::NetworkSelect {
            available_networks,
            selected_index,
        };
    }

    fn select_network_option(&mut self, target_index: usize) {
        if let PopupState::NetworkSelect {
            available_networks,
            selected_index,
        } = &mut self.popup
        {
            *selected_index = if target_index >= available_networks.len() {
                0
            } else {
                target_index
            };
        }
    }

    fn switch_network(&mut self, network: Network) -> Vec<Effect> {
        if network == self.settings.selected_network {
            self.popup = PopupState::None;
            return Vec::new();
        }

        if let Err(e) = config::set_selected_network(&mut self.settings, network.clone()) {
            self.popup = PopupState::Message(format!("Failed to save network setting: {e}"));
            return Vec::new();
        }

        // Fetched data belongs to the previous chain; drop it and bump
        // every generation so in-flight responses are discarded on arrival.
        self.explorer.height = None;
        self.explorer.block = None;
        self.explorer.receipt = None;
        self.explorer.selected = None;
        self.explorer.error = None;
        self.explorer.block_generation += 1;
        self.explorer.receipt_generation += 1;
        self.accounts.balance = None;
        self.accounts.error = None;
        self.accounts.balance_generation += 1;

        self.popup = PopupState::Message(format!("Switched to {}", network.as_str()));

        let mut effects = vec![Effect::SwitchNetwork(network)];
        effects.extend(self.dispatch_height_fetch());
        effects
    }

    // --- Clipboard ---

    fn copy_selected_hash(&mut self) -> Vec<Effect> {
        let hash = if let Some(receipt) = &self.explorer.receipt {
            Some(receipt.transaction_hash.clone())
        } else {
            match (&self.explorer.block, self.explorer.selected) {
                (Some(block), Some(index)) => {
                    block.transactions.get(index).map(|t| t.hash.clone())
                }
                _ => None,
            }
        };

        match hash {
            Some(hash) => {
                self.popup = PopupState::Message(format!("Copied: {hash}"));
                vec![Effect::CopyToClipboard(hash)]
            }
            None => {
                self.popup = PopupState::Message("No transaction selected.".to_string());
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ethereum::TransactionRecord;
    use serde_json::json;

    fn create_test_app() -> App {
        App::new(AppSettings::default())
    }

    fn create_test_block(number: u64, txn_count: usize) -> BlockDetails {
        let transactions = (0..txn_count)
            .map(|i| TransactionRecord {
                hash: format!("0x{:064x}", i + 1),
                from: format!("0x{:040x}", 0xaa00 + i),
                to: Some(format!("0x{:040x}", 0xbb00 + i)),
            })
            .collect();
        BlockDetails {
            number,
            timestamp: "Sat, 26 Aug 2023 09:02:19 UTC".to_string(),
            transactions,
        }
    }

    fn create_test_receipt(hash: &str) -> TransactionReceipt {
        TransactionReceipt {
            to: Some("0x388c818ca8b9251b393131c08a736a67ccb19297".to_string()),
            from: "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string(),
            contract_address: None,
            transaction_index: 2,
            gas_used: U256::from(21_000u64),
            logs_bloom: format!("0x{}", "00".repeat(256)),
            transaction_hash: hash.to_string(),
            logs: vec![json!({"address": "0x0", "topics": []})],
            block_number: 18_000_000,
            txn_type: 2,
            status: 1,
            cumulative_gas_used: U256::from(240_152u64),
            effective_gas_price: U256::from(20_160_641_732u64),
        }
    }

    /// Loads a block into an app the way a real fetch completion would.
    fn app_with_block(number: u64, txn_count: usize) -> App {
        let mut app = create_test_app();
        app.update(Action::UpdateHeight {
            generation: app.explorer.height_generation,
            result: Ok(number),
        });
        let effects = app.update(Action::FetchBlockDetails);
        assert_eq!(effects.len(), 1);
        app.update(Action::UpdateBlock {
            generation: app.explorer.block_generation,
            result: Ok(create_test_block(number, txn_count)),
        });
        app
    }

    #[test]
    fn test_block_fetch_requires_height() {
        let mut app = create_test_app();
        assert!(app.update(Action::FetchBlockDetails).is_empty());

        app.update(Action::UpdateHeight {
            generation: app.explorer.height_generation,
            result: Ok(18_000_000),
        });
        let effects = app.update(Action::FetchBlockDetails);
        assert_eq!(
            effects,
            vec![Effect::FetchBlock {
                height: 18_000_000,
                generation: app.explorer.block_generation,
            }]
        );
    }

    #[test]
    fn test_block_completion_carries_requested_height() {
        let app = app_with_block(18_000_000, 3);
        assert_eq!(app.explorer.block.as_ref().unwrap().number, 18_000_000);
        assert_eq!(app.explorer.selected, Some(0));
    }

    #[test]
    fn test_select_and_back_is_an_idempotent_toggle() {
        let mut app = app_with_block(18_000_000, 3);

        let effects = app.update(Action::SelectTransaction);
        let Effect::FetchReceipt { hash, generation } = &effects[0] else {
            panic!("expected a receipt fetch");
        };
        app.update(Action::UpdateReceipt {
            generation: *generation,
            result: Ok(create_test_receipt(hash)),
        });
        assert!(app.explorer.in_detail_mode());
        assert_eq!(app.input_context(), InputContext::ExplorerDetail);

        app.update(Action::Back);
        assert!(!app.explorer.in_detail_mode());
        assert_eq!(app.explorer.block.as_ref().unwrap().transactions.len(), 3);
        assert_eq!(app.explorer.selected, Some(0));

        // A second back changes nothing.
        app.update(Action::Back);
        assert!(!app.explorer.in_detail_mode());
        assert_eq!(app.explorer.block.as_ref().unwrap().transactions.len(), 3);
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        struct TestCase {
            name: &'static str,
            moves: Vec<Action>,
            expected: Option<usize>,
        }

        let cases = [
            TestCase {
                name: "down moves to next row",
                moves: vec![Action::MoveSelectionDown],
                expected: Some(1),
            },
            TestCase {
                name: "down wraps past the end",
                moves: vec![
                    Action::MoveSelectionDown,
                    Action::MoveSelectionDown,
                    Action::MoveSelectionDown,
                ],
                expected: Some(0),
            },
            TestCase {
                name: "up from the first row wraps to the last",
                moves: vec![Action::MoveSelectionUp],
                expected: Some(2),
            },
        ];

        for case in cases {
            let mut app = app_with_block(18_000_000, 3);
            for action in case.moves {
                app.update(action);
            }
            assert_eq!(app.explorer.selected, case.expected, "{}", case.name);
        }
    }

    #[test]
    fn test_explorer_scenario_row_selection_to_detail_and_back() {
        let mut app = app_with_block(18_000_000, 4);

        // Move to row index 2 and open it.
        app.update(Action::MoveSelectionDown);
        app.update(Action::MoveSelectionDown);
        let effects = app.update(Action::SelectTransaction);

        let expected_hash = app.explorer.block.as_ref().unwrap().transactions[2]
            .hash
            .clone();
        let Effect::FetchReceipt { hash, generation } = &effects[0] else {
            panic!("expected a receipt fetch");
        };
        assert_eq!(*hash, expected_hash);

        app.update(Action::UpdateReceipt {
            generation: *generation,
            result: Ok(create_test_receipt(&expected_hash)),
        });
        let receipt = app.explorer.receipt.as_ref().unwrap();
        assert_eq!(receipt.transaction_hash, expected_hash);
        assert_eq!(receipt.status, 1);

        app.update(Action::Back);
        assert_eq!(app.explorer.block.as_ref().unwrap().transactions.len(), 4);
        assert_eq!(app.explorer.selected, Some(2));
    }

    #[test]
    fn test_empty_address_lookup_is_a_no_op() {
        let mut app = create_test_app();
        app.screen = Screen::Accounts;

        assert!(app.update(Action::LookupBalance).is_empty());

        for c in "   ".chars() {
            app.update(Action::AddressInput(c));
        }
        assert!(app.update(Action::LookupBalance).is_empty());
        assert_eq!(app.accounts.balance, None);
        assert_eq!(app.accounts.error, None);
    }

    #[test]
    fn test_malformed_address_is_rejected_locally() {
        let mut app = create_test_app();
        for c in "vitalik.eth".chars() {
            app.update(Action::AddressInput(c));
        }
        assert!(app.update(Action::LookupBalance).is_empty());
        assert!(app.accounts.error.as_ref().unwrap().contains("vitalik.eth"));
        assert_eq!(app.accounts.balance, None);
    }

    #[test]
    fn test_balance_lookup_round_trip() {
        let mut app = create_test_app();
        for c in "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".chars() {
            app.update(Action::AddressInput(c));
        }

        let effects = app.update(Action::LookupBalance);
        assert_eq!(
            effects,
            vec![Effect::FetchBalance {
                address: "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".to_string(),
                generation: 1,
            }]
        );

        app.update(Action::UpdateBalance {
            generation: 1,
            result: Ok(U256::from_dec_str("1000000000000000000000").unwrap()),
        });
        assert_eq!(
            app.accounts.balance.unwrap().to_string(),
            "1000000000000000000000"
        );
    }

    #[test]
    fn test_stale_completions_are_discarded() {
        let mut app = create_test_app();
        for c in "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".chars() {
            app.update(Action::AddressInput(c));
        }

        // Two lookups in flight; the first resolves after the second.
        app.update(Action::LookupBalance);
        app.update(Action::LookupBalance);
        assert_eq!(app.accounts.balance_generation, 2);

        app.update(Action::UpdateBalance {
            generation: 2,
            result: Ok(U256::from(777u64)),
        });
        app.update(Action::UpdateBalance {
            generation: 1,
            result: Ok(U256::from(111u64)),
        });

        assert_eq!(app.accounts.balance, Some(U256::from(777u64)));
    }

    #[test]
    fn test_failed_requests_surface_inline_and_keep_prior_state() {
        let mut app = app_with_block(18_000_000, 2);

        let effects = app.update(Action::FetchBlockDetails);
        let Effect::FetchBlock { generation, .. } = &effects[0] else {
            panic!("expected a block fetch");
        };
        app.update(Action::UpdateBlock {
            generation: *generation,
            result: Err("RPC error -32000: header not found".to_string()),
        });

        // Previous block data is retained next to the error.
        assert_eq!(app.explorer.block.as_ref().unwrap().transactions.len(), 2);
        assert!(app.explorer.error.as_ref().unwrap().contains("-32000"));
    }

    #[test]
    fn test_screen_switch_retains_both_screens_state() {
        let mut app = app_with_block(18_000_000, 2);
        for c in "0xd8da6bf26964af9d7eed9e03e53415d37aa96045".chars() {
            app.update(Action::AddressInput(c));
        }

        app.update(Action::SwitchScreen(Screen::Accounts));
        assert_eq!(app.input_context(), InputContext::Accounts);
        app.update(Action::SwitchScreen(Screen::Explorer));

        assert!(app.explorer.block.is_some());
        assert_eq!(
            app.accounts.address,
            "0xd8da6bf26964af9d7eed9e03e53415d37aa96045"
        );
    }

    #[test]
    fn test_network_selector_wraps_and_highlights_current() {
        let mut app = create_test_app();
        app.update(Action::OpenNetworkSelector);

        let PopupState::NetworkSelect {
            available_networks,
            selected_index,
        } = &app.popup
        else {
            panic!("expected the network selector popup");
        };
        assert_eq!(*selected_index, 0); // Mainnet is the default
        let count = available_networks.len();

        app.update(Action::SelectNetworkOption(count));
        let PopupState::NetworkSelect { selected_index, .. } = &app.popup else {
            panic!("expected the network selector popup");
        };
        assert_eq!(*selected_index, 0, "selection wraps past the end");
    }

    #[test]
    fn test_copy_hash_in_list_and_detail_modes() {
        let mut app = app_with_block(18_000_000, 2);
        app.update(Action::MoveSelectionDown);

        let row_hash = app.explorer.block.as_ref().unwrap().transactions[1]
            .hash
            .clone();
        let effects = app.update(Action::CopySelectedHash);
        assert_eq!(effects, vec![Effect::CopyToClipboard(row_hash.clone())]);

        app.update(Action::ClearPopup);
        app.explorer.receipt = Some(create_test_receipt(&row_hash));
        let effects = app.update(Action::CopySelectedHash);
        assert_eq!(effects, vec![Effect::CopyToClipboard(row_hash)]);
    }

    #[test]
    fn test_copy_without_selection_shows_message_only() {
        let mut app = create_test_app();
        let effects = app.update(Action::CopySelectedHash);
        assert!(effects.is_empty());
        assert!(matches!(app.popup, PopupState::Message(_)));
    }
}
