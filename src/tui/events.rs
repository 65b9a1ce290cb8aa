//! Keyboard input, translated into app actions.
//!
//! Routing is an explicit match on the active input zone: keys never reach
//! a widget by selector-style broadcast, the zone decides what each key
//! means. Text zones (search field, chat composer, rating comment,
//! calculator fields) swallow printable characters; browse mode uses them
//! as commands.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// Which part of the UI currently owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// Navigating pages: module list, topic body, resource list.
    Browse,
    /// Typing in the search field, suggestion dropdown may be open.
    Search,
    /// Typing in the chat composer.
    Chat,
    /// Answering a quiz sheet.
    Quiz,
    /// Star-rating overlay: stars via Up/Down, comment via typing.
    Rating,
    /// Calculator form: fields via Up/Down, values via typing, Tab to
    /// switch calculators.
    Calculator,
    /// A dismiss-only modal (quiz results, level-up celebration).
    Modal,
}

/// User actions derived from keyboard events.
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Esc: close the active overlay or step back one page.
    Back,
    FocusSearch,
    OpenChat,
    Input(char),
    DeleteChar,
    /// Enter: send / activate / submit, depending on zone.
    Submit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    /// Quiz option by number key, zero-based.
    SelectOption(usize),
    ToggleBookmark,
    OpenRating,
    OpenCalculator,
    /// Tab: advance the calculator form to the next calculator.
    CycleCalculator,
    StartQuiz,
    SummarizePage,
    ExplainPage,
    Recommend,
    StudyPlan,
    CopyReply,
    FeedbackHelpful,
    FeedbackUnhelpful,
    Voice,
    None,
}

/// Poll for a keyboard event and convert it to an action for the zone.
pub fn poll_event(timeout: Duration, zone: Zone) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key, zone));
    }
    Ok(Action::None)
}

pub fn key_to_action(key: KeyEvent, zone: Zone) -> Action {
    // Ctrl+C quits from anywhere
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        return Action::Quit;
    }

    match zone {
        Zone::Browse => browse_key(key),
        Zone::Search | Zone::Chat | Zone::Rating => text_key(key, zone),
        Zone::Quiz => quiz_key(key),
        Zone::Calculator => calculator_key(key),
        Zone::Modal => match key.code {
            KeyCode::Enter | KeyCode::Esc => Action::Back,
            _ => Action::None,
        },
    }
}

fn browse_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Back,
        (KeyCode::Enter, _) => Action::Submit,

        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        (KeyCode::Char('/'), KeyModifiers::NONE) => Action::FocusSearch,
        (KeyCode::Char('c'), KeyModifiers::NONE) => Action::OpenChat,
        (KeyCode::Char('b'), KeyModifiers::NONE) => Action::ToggleBookmark,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::OpenRating,
        (KeyCode::Char('d'), KeyModifiers::NONE) => Action::OpenCalculator,
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::StartQuiz,
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::SummarizePage,
        (KeyCode::Char('e'), KeyModifiers::NONE) => Action::ExplainPage,
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::Recommend,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::StudyPlan,

        _ => Action::None,
    }
}

fn text_key(key: KeyEvent, zone: Zone) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Back,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Backspace, _) => Action::DeleteChar,

        // suggestion rows, quick replies, or the star count
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,

        (KeyCode::Char('y'), KeyModifiers::CONTROL) if zone == Zone::Chat => Action::CopyReply,
        (KeyCode::Char('g'), KeyModifiers::CONTROL) if zone == Zone::Chat => {
            Action::FeedbackHelpful
        }
        (KeyCode::Char('b'), KeyModifiers::CONTROL) if zone == Zone::Chat => {
            Action::FeedbackUnhelpful
        }
        (KeyCode::Char('v'), KeyModifiers::CONTROL) if zone != Zone::Rating => Action::Voice,

        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }

        _ => Action::None,
    }
}

fn calculator_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Back,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Tab, _) => Action::CycleCalculator,
        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        _ => Action::None,
    }
}

fn quiz_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Back,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::SelectOption(c as usize - '1' as usize)
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_c_quits_from_any_zone() {
        for zone in [
            Zone::Browse,
            Zone::Search,
            Zone::Chat,
            Zone::Quiz,
            Zone::Rating,
            Zone::Calculator,
            Zone::Modal,
        ] {
            assert_eq!(key_to_action(ctrl('c'), zone), Action::Quit);
        }
    }

    #[test]
    fn test_browse_characters_are_commands() {
        assert_eq!(key_to_action(key(KeyCode::Char('/')), Zone::Browse), Action::FocusSearch);
        assert_eq!(key_to_action(key(KeyCode::Char('c')), Zone::Browse), Action::OpenChat);
        assert_eq!(key_to_action(key(KeyCode::Char('b')), Zone::Browse), Action::ToggleBookmark);
        assert_eq!(key_to_action(key(KeyCode::Char('r')), Zone::Browse), Action::OpenRating);
        assert_eq!(key_to_action(key(KeyCode::Char('q')), Zone::Browse), Action::StartQuiz);
        assert_eq!(key_to_action(key(KeyCode::Char('s')), Zone::Browse), Action::SummarizePage);
        assert_eq!(key_to_action(key(KeyCode::Char('e')), Zone::Browse), Action::ExplainPage);
        assert_eq!(key_to_action(key(KeyCode::Char('d')), Zone::Browse), Action::OpenCalculator);
    }

    #[test]
    fn test_calculator_digits_are_input_and_tab_switches() {
        assert_eq!(key_to_action(key(KeyCode::Char('7')), Zone::Calculator), Action::Input('7'));
        assert_eq!(key_to_action(key(KeyCode::Char('.')), Zone::Calculator), Action::Input('.'));
        assert_eq!(key_to_action(key(KeyCode::Tab), Zone::Calculator), Action::CycleCalculator);
        assert_eq!(key_to_action(key(KeyCode::Up), Zone::Calculator), Action::MoveUp);
        assert_eq!(key_to_action(key(KeyCode::Enter), Zone::Calculator), Action::Submit);
    }

    #[test]
    fn test_search_characters_are_input() {
        assert_eq!(key_to_action(key(KeyCode::Char('b')), Zone::Search), Action::Input('b'));
        assert_eq!(key_to_action(key(KeyCode::Char('/')), Zone::Search), Action::Input('/'));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('B'), KeyModifiers::SHIFT), Zone::Search),
            Action::Input('B')
        );
    }

    #[test]
    fn test_chat_shortcuts() {
        assert_eq!(key_to_action(ctrl('y'), Zone::Chat), Action::CopyReply);
        assert_eq!(key_to_action(ctrl('g'), Zone::Chat), Action::FeedbackHelpful);
        assert_eq!(key_to_action(ctrl('b'), Zone::Chat), Action::FeedbackUnhelpful);
        assert_eq!(key_to_action(ctrl('v'), Zone::Chat), Action::Voice);
    }

    #[test]
    fn test_chat_shortcuts_do_not_leak_into_other_zones() {
        assert_eq!(key_to_action(ctrl('y'), Zone::Search), Action::None);
        assert_eq!(key_to_action(ctrl('g'), Zone::Rating), Action::None);
    }

    #[test]
    fn test_vim_navigation_in_browse() {
        assert_eq!(key_to_action(key(KeyCode::Char('j')), Zone::Browse), Action::MoveDown);
        assert_eq!(key_to_action(key(KeyCode::Char('k')), Zone::Browse), Action::MoveUp);
        assert_eq!(key_to_action(key(KeyCode::Up), Zone::Browse), Action::MoveUp);
        assert_eq!(key_to_action(key(KeyCode::Down), Zone::Browse), Action::MoveDown);
    }

    #[test]
    fn test_quiz_number_keys_select_options() {
        assert_eq!(key_to_action(key(KeyCode::Char('1')), Zone::Quiz), Action::SelectOption(0));
        assert_eq!(key_to_action(key(KeyCode::Char('4')), Zone::Quiz), Action::SelectOption(3));
        assert_eq!(key_to_action(key(KeyCode::Char('0')), Zone::Quiz), Action::None);
    }

    #[test]
    fn test_quiz_enter_submits_even_unanswered() {
        assert_eq!(key_to_action(key(KeyCode::Enter), Zone::Quiz), Action::Submit);
    }

    #[test]
    fn test_modal_dismisses_on_enter_or_esc_only() {
        assert_eq!(key_to_action(key(KeyCode::Enter), Zone::Modal), Action::Back);
        assert_eq!(key_to_action(key(KeyCode::Esc), Zone::Modal), Action::Back);
        assert_eq!(key_to_action(key(KeyCode::Char('a')), Zone::Modal), Action::None);
    }

    #[test]
    fn test_rating_digits_go_to_comment() {
        // stars move with Up/Down; digits must stay typable in the comment
        assert_eq!(key_to_action(key(KeyCode::Char('5')), Zone::Rating), Action::Input('5'));
        assert_eq!(key_to_action(key(KeyCode::Up), Zone::Rating), Action::MoveUp);
    }

    #[test]
    fn test_escape_backs_out_everywhere() {
        for zone in
            [Zone::Browse, Zone::Search, Zone::Chat, Zone::Quiz, Zone::Rating, Zone::Calculator]
        {
            assert_eq!(key_to_action(key(KeyCode::Esc), zone), Action::Back);
        }
    }

    #[test]
    fn test_unknown_key_is_none() {
        assert_eq!(key_to_action(key(KeyCode::F(1)), Zone::Browse), Action::None);
    }
}
