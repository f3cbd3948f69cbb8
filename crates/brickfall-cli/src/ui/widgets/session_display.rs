use brickfall_engine::{GameSession, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::{Color, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Full game screen: HOLD and stats on the left, the board in the middle,
/// NEXT on the right, plus a state overlay on top of the board.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    session: &'a GameSession,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(session: &'a GameSession) -> Self {
        Self {
            session,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    fn border_color(&self) -> Color {
        match self.session.state() {
            SessionState::Idle => color::CYAN,
            SessionState::Running => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }

    fn board(&self) -> BoardDisplay<'a> {
        BoardDisplay::new(self.session.grid())
            .falling_piece(self.session.current_piece().copied())
            .ghost(self.session.drop_preview())
            .block(
                Block::bordered()
                    .border_style(self.border_color())
                    .style(style::DEFAULT),
            )
    }

    fn panel(&self, title: &'static str) -> Block<'a> {
        Block::bordered()
            .title(Line::from(title).centered())
            .padding(Padding::symmetric(
                self.horizontal_padding,
                self.vertical_padding,
            ))
            .border_style(self.border_color())
            .style(style::DEFAULT)
    }

    pub fn height(&self) -> u16 {
        let hold = PieceDisplay::new().block(self.panel("HOLD"));
        let stats = StatsDisplay::new(self.session).block(self.panel("STATS"));
        u16::max(self.board().height(), hold.height() + 1 + stats.height())
    }

    /// Overlay text and style for the current state, if any.
    fn popup(&self) -> Option<(Text<'static>, Style)> {
        match self.session.state() {
            SessionState::Running => None,
            SessionState::Idle => Some((
                Text::from(vec![Line::from("BRICKFALL"), Line::from("Press Enter")]),
                Style::new().fg(color::BLACK).bg(color::CYAN),
            )),
            SessionState::Paused => Some((
                Text::from("PAUSED"),
                Style::new().fg(color::BLACK).bg(color::YELLOW),
            )),
            SessionState::GameOver => {
                let summary = self.session.summary();
                Some((
                    Text::from(vec![
                        Line::from("GAME OVER!!"),
                        Line::from(format!("SCORE {}", summary.score)),
                        Line::from(format!("LINES {}  LEVEL {}", summary.lines, summary.level)),
                    ]),
                    Style::new().fg(color::WHITE).bg(color::RED),
                ))
            }
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let game_board = self.board();
        let hold_panel = PieceDisplay::new()
            .piece(self.session.held_piece().copied())
            .block(self.panel("HOLD"));
        let next_panel = PieceDisplay::new()
            .piece(self.session.next_piece().copied())
            .block(self.panel("NEXT"));
        let stats = StatsDisplay::new(self.session).block(self.panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        if let Some((text, style)) = self.popup() {
            let lines = u16::try_from(text.height()).unwrap_or(1);
            let block = Block::new().style(style);
            let text = text.style(style).centered();
            let area = board_area.centered(
                Constraint::Length(game_board_width),
                Constraint::Length(lines + 2),
            );
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(lines)), buf);
        }
    }
}
