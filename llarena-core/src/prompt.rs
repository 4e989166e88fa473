//! Prompt construction for move generation.
//!
//! The prompt is an opaque templated string with named placeholders; callers
//! may swap the template as long as the placeholders keep their meaning:
//!
//! - `{symbol}` - the acting player's mark
//! - `{opponent_symbol}` - the other mark
//! - `{rows}` - board size N
//! - `{layout}` - textual rendering of the board
//! - `{previous_move}` - human-readable last move, or a no-moves notice

use crate::board::Mark;
use crate::session::GameSession;

/// The built-in move prompt
pub const DEFAULT_TEMPLATE: &str = r#"You are playing tic-tac-toe. Your mark is {symbol} and your opponent's mark is {opponent_symbol}.
The board has {rows} rows and {rows} columns, numbered from 0.

Current board layout (empty cells are blank):
{layout}
Previous move: {previous_move}

Choose your next move. Reply with ONLY a JSON object of the form
{"move": {"row": <row>, "col": <col>}} and nothing else."#;

/// Render the template for the acting mark over the current session state
pub fn build_prompt(template: &str, session: &GameSession, mark: Mark) -> String {
    template
        .replace("{symbol}", mark.as_str())
        .replace("{opponent_symbol}", mark.opponent().as_str())
        .replace("{rows}", &session.size.to_string())
        .replace("{layout}", &session.board.to_string())
        .replace("{previous_move}", &describe_last_move(session))
}

/// The last applied move in human-readable form
pub fn describe_last_move(session: &GameSession) -> String {
    match session.move_history.last() {
        Some(record) => format!("row {}, column {}", record.position[0], record.position[1]),
        None => "No previous moves".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_moves() -> GameSession {
        let mut session = GameSession::new(3).unwrap();
        session.apply(1, (0, 0)).unwrap();
        session.apply(2, (1, 2)).unwrap();
        session
    }

    #[test]
    fn test_empty_game_prompt() {
        let session = GameSession::new(3).unwrap();
        let prompt = build_prompt(DEFAULT_TEMPLATE, &session, Mark::X);

        assert!(prompt.contains("Your mark is X"));
        assert!(prompt.contains("opponent's mark is O"));
        assert!(prompt.contains("3 rows and 3 columns"));
        assert!(prompt.contains("| | | |"));
        assert!(prompt.contains("Previous move: No previous moves"));
        assert!(!prompt.contains("{symbol}"));
        assert!(!prompt.contains("{layout}"));
    }

    #[test]
    fn test_prompt_embeds_board_and_last_move() {
        let session = session_with_moves();
        let prompt = build_prompt(DEFAULT_TEMPLATE, &session, Mark::X);

        assert!(prompt.contains("|X| | |"));
        assert!(prompt.contains("| | |O|"));
        assert!(prompt.contains("Previous move: row 1, column 2"));
    }

    #[test]
    fn test_prompt_for_second_player() {
        let session = session_with_moves();
        let prompt = build_prompt(DEFAULT_TEMPLATE, &session, Mark::O);

        assert!(prompt.contains("Your mark is O"));
        assert!(prompt.contains("opponent's mark is X"));
    }

    #[test]
    fn test_reply_schema_literal_survives_rendering() {
        let session = GameSession::new(3).unwrap();
        let prompt = build_prompt(DEFAULT_TEMPLATE, &session, Mark::X);
        assert!(prompt.contains(r#"{"move": {"row": <row>, "col": <col>}}"#));
    }
}
