use zapador_core::{CellView, Game, GameStatus, Session, format_elapsed};

fn view_char(view: CellView) -> char {
    match view {
        CellView::Hidden => '.',
        CellView::Flagged => 'F',
        CellView::Open(0) => ' ',
        CellView::Open(count) => char::from_digit(count.into(), 10).unwrap_or('?'),
        CellView::Mine => '*',
        CellView::Exploded => 'X',
    }
}

/// Renders the grid with 1-based row/column rulers.
pub fn board_to_string(game: &Game) -> String {
    let (rows, cols) = game.size();
    let mut out = String::new();

    out.push_str("    ");
    for col in 1..=cols as u16 {
        out.push_str(&format!("{:2}", col % 100));
    }
    out.push('\n');

    for row in 0..rows {
        out.push_str(&format!("{:3} ", row + 1));
        for col in 0..cols {
            out.push(' ');
            out.push(view_char(game.view_at((row, col))));
        }
        out.push('\n');
    }
    out
}

pub fn status_line(session: &Session) -> String {
    let game = session.game();
    let counts = game.counts();
    let mode = if session.flag_mode() {
        "  [flag mode]"
    } else {
        ""
    };
    format!(
        "{}  mines {}/{}  flags {}  time {}{}",
        status_word(game.status()),
        counts.remaining_mines,
        counts.total_mines,
        counts.flagged,
        format_elapsed(game.elapsed_secs()),
        mode,
    )
}

fn status_word(status: GameStatus) -> &'static str {
    match status {
        GameStatus::Ready => "ready",
        GameStatus::Playing => "playing",
        GameStatus::Won => "won",
        GameStatus::Lost => "lost",
    }
}
