//! Application constants for the LazyEth TUI.

use std::time::Duration;

/// Target interval between main-loop ticks.
pub const TICK_RATE: Duration = Duration::from_millis(250);

/// Height of the application header area (in rows).
///
/// The header contains the logo, the screen tabs and the network indicator.
pub const HEADER_HEIGHT: u16 = 3;

/// Height of the explorer's block panel (in rows).
pub const PANEL_HEIGHT: u16 = 5;

/// Height of the accounts screen's address input box (in rows).
pub const INPUT_HEIGHT: u16 = 3;

/// Leading characters kept when shortening an address or hash for display.
pub const SHORTEN_PREFIX_LEN: usize = 6;

/// Trailing characters kept when shortening an address or hash for display.
pub const SHORTEN_SUFFIX_LEN: usize = 4;

/// Capacity of the gateway completion channel.
pub const GATEWAY_CHANNEL_CAPACITY: usize = 100;

/// Environment variable holding the hosted-endpoint API credential.
pub const API_KEY_ENV_VAR: &str = "LAZYETH_API_KEY";
