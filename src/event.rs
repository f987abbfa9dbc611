use primitive_types::U256;

use crate::app::Screen;
use crate::ethereum::{BlockDetails, Network, TransactionReceipt};

/// Completions of asynchronous gateway requests, delivered to the main loop
/// over the worker channel. Each carries the generation that was current for
/// its view when the request was dispatched; stale generations are dropped.
#[derive(Debug)]
pub enum GatewayEvent {
    HeightFetched {
        generation: u64,
        result: Result<u64, String>,
    },
    BlockFetched {
        generation: u64,
        result: Result<BlockDetails, String>,
    },
    ReceiptFetched {
        generation: u64,
        result: Result<TransactionReceipt, String>,
    },
    BalanceFetched {
        generation: u64,
        result: Result<U256, String>,
    },
}

/// Application actions triggered by user input or gateway completions.
#[derive(Debug)]
pub enum Action {
    Quit,
    SwitchScreen(Screen),
    RefreshHeight,
    FetchBlockDetails,
    MoveSelectionUp,
    MoveSelectionDown,
    SelectTransaction,
    Back,

    AddressInput(char),
    AddressBackspace,
    LookupBalance,

    OpenNetworkSelector,
    SelectNetworkOption(usize),
    SwitchToNetwork(Network),
    CopySelectedHash,
    ShowMessage(String),
    ClearPopup,

    UpdateHeight {
        generation: u64,
        result: Result<u64, String>,
    },
    UpdateBlock {
        generation: u64,
        result: Result<BlockDetails, String>,
    },
    UpdateReceipt {
        generation: u64,
        result: Result<TransactionReceipt, String>,
    },
    UpdateBalance {
        generation: u64,
        result: Result<U256, String>,
    },
}

impl From<GatewayEvent> for Action {
    fn from(event: GatewayEvent) -> Self {
        match event {
            GatewayEvent::HeightFetched { generation, result } => {
                Action::UpdateHeight { generation, result }
            }
            GatewayEvent::BlockFetched { generation, result } => {
                Action::UpdateBlock { generation, result }
            }
            GatewayEvent::ReceiptFetched { generation, result } => {
                Action::UpdateReceipt { generation, result }
            }
            GatewayEvent::BalanceFetched { generation, result } => {
                Action::UpdateBalance { generation, result }
            }
        }
    }
}
