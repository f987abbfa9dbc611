//! Maps terminal events to application actions.
//!
//! Key routing depends on the [`InputContext`] derived from the current
//! state: the accounts screen owns printable keys for its address input, so
//! global shortcuts there are limited to control-modified keys and Tab.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputContext, PopupState, Screen};
use crate::event::Action;

/// Handles a crossterm event and returns an optional Action.
pub fn handle_event(app: &App, event: Event) -> Option<Action> {
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            return map_key(app, key);
        }
    }
    None
}

fn map_key(app: &App, key: KeyEvent) -> Option<Action> {
    // Ctrl+C quits from every context, including text input.
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Action::Quit);
    }

    match app.input_context() {
        InputContext::Explorer => map_explorer_keys(key),
        InputContext::ExplorerDetail => map_detail_keys(key),
        InputContext::Accounts => map_accounts_keys(key),
        InputContext::NetworkSelect => map_network_selector_keys(app, key),
        InputContext::MessagePopup => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(Action::ClearPopup),
            _ => None,
        },
    }
}

/// Explorer screen, list mode.
fn map_explorer_keys(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('r') => Some(Action::RefreshHeight),
        KeyCode::Char('g') => Some(Action::FetchBlockDetails),
        KeyCode::Char('n') => Some(Action::OpenNetworkSelector),
        KeyCode::Char('c') => Some(Action::CopySelectedHash),
        KeyCode::Char('1') => Some(Action::SwitchScreen(Screen::Explorer)),
        KeyCode::Char('2') => Some(Action::SwitchScreen(Screen::Accounts)),
        KeyCode::Tab => Some(Action::SwitchScreen(Screen::Accounts)),
        KeyCode::Up => Some(Action::MoveSelectionUp),
        KeyCode::Down => Some(Action::MoveSelectionDown),
        KeyCode::Enter => Some(Action::SelectTransaction),
        _ => None,
    }
}

/// Explorer screen with a receipt open.
fn map_detail_keys(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('c') => Some(Action::CopySelectedHash),
        KeyCode::Char('1') => Some(Action::SwitchScreen(Screen::Explorer)),
        KeyCode::Char('2') => Some(Action::SwitchScreen(Screen::Accounts)),
        KeyCode::Tab => Some(Action::SwitchScreen(Screen::Accounts)),
        _ => None,
    }
}

/// Accounts screen; printable characters feed the address input.
fn map_accounts_keys(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Enter => Some(Action::LookupBalance),
        KeyCode::Backspace => Some(Action::AddressBackspace),
        KeyCode::Tab | KeyCode::Esc => Some(Action::SwitchScreen(Screen::Explorer)),
        KeyCode::Char(c) => Some(Action::AddressInput(c)),
        _ => None,
    }
}

fn map_network_selector_keys(app: &App, key: KeyEvent) -> Option<Action> {
    let PopupState::NetworkSelect {
        available_networks,
        selected_index,
    } = &app.popup
    else {
        return None;
    };
    let count = available_networks.len();

    match key.code {
        KeyCode::Esc => Some(Action::ClearPopup),
        KeyCode::Up => Some(Action::SelectNetworkOption(
            selected_index.checked_sub(1).unwrap_or(count - 1),
        )),
        KeyCode::Down => Some(Action::SelectNetworkOption((*selected_index + 1) % count)),
        KeyCode::Enter => available_networks
            .get(*selected_index)
            .cloned()
            .map(Action::SwitchToNetwork),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppSettings;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    #[test]
    fn test_explorer_keymap() {
        let app = App::new(AppSettings::default());

        assert!(matches!(
            handle_event(&app, key(KeyCode::Char('q'))),
            Some(Action::Quit)
        ));
        assert!(matches!(
            handle_event(&app, key(KeyCode::Char('g'))),
            Some(Action::FetchBlockDetails)
        ));
        assert!(matches!(
            handle_event(&app, key(KeyCode::Enter)),
            Some(Action::SelectTransaction)
        ));
        assert!(matches!(
            handle_event(&app, key(KeyCode::Tab)),
            Some(Action::SwitchScreen(Screen::Accounts))
        ));
        assert!(handle_event(&app, key(KeyCode::Char('x'))).is_none());
    }

    #[test]
    fn test_accounts_keymap_feeds_text_input() {
        let mut app = App::new(AppSettings::default());
        app.screen = Screen::Accounts;

        // 'q' types rather than quits here.
        assert!(matches!(
            handle_event(&app, key(KeyCode::Char('q'))),
            Some(Action::AddressInput('q'))
        ));
        assert!(matches!(
            handle_event(&app, key(KeyCode::Enter)),
            Some(Action::LookupBalance)
        ));
        assert!(matches!(
            handle_event(&app, key(KeyCode::Backspace)),
            Some(Action::AddressBackspace)
        ));
        assert!(matches!(
            handle_event(&app, ctrl('c')),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_network_selector_keymap_wraps_upward() {
        let mut app = App::new(AppSettings::default());
        app.update(Action::OpenNetworkSelector);

        // Selection starts on Mainnet (index 0); Up wraps to the last entry.
        let Some(Action::SelectNetworkOption(index)) = handle_event(&app, key(KeyCode::Up)) else {
            panic!("expected a selection action");
        };
        assert_eq!(index, 2);

        assert!(matches!(
            handle_event(&app, key(KeyCode::Enter)),
            Some(Action::SwitchToNetwork(_))
        ));
        assert!(matches!(
            handle_event(&app, key(KeyCode::Esc)),
            Some(Action::ClearPopup)
        ));
    }

    #[test]
    fn test_detail_mode_escape_goes_back() {
        let mut app = App::new(AppSettings::default());
        app.screen = Screen::Explorer;
        app.explorer.receipt = Some(crate::ethereum::TransactionReceipt {
            to: None,
            from: "0x0".to_string(),
            contract_address: None,
            transaction_index: 0,
            gas_used: Default::default(),
            logs_bloom: String::new(),
            transaction_hash: "0xabc".to_string(),
            logs: Vec::new(),
            block_number: 0,
            txn_type: 0,
            status: 1,
            cumulative_gas_used: Default::default(),
            effective_gas_price: Default::default(),
        });

        assert!(matches!(
            handle_event(&app, key(KeyCode::Esc)),
            Some(Action::Back)
        ));
        assert!(handle_event(&app, key(KeyCode::Char('g'))).is_none());
    }
}
