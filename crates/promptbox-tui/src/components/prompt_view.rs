use crossterm::event::{KeyCode, KeyEvent};
use promptbox_core::{LayoutMode, PromptRecord};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

const CARD_MIN_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 9;

/// The filtered records in either card grid or table form, with a cursor.
pub struct PromptView {
    records: Vec<PromptRecord>,
    layout: LayoutMode,
    selected: usize,
}

impl PromptView {
    pub fn new(records: Vec<PromptRecord>, layout: LayoutMode) -> Self {
        Self {
            records,
            layout,
            selected: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn layout(&self) -> LayoutMode {
        self.layout
    }

    /// Returns the record under the cursor, if any.
    pub fn selected_record(&self) -> Option<&PromptRecord> {
        self.records.get(self.selected)
    }

    /// Move the cursor to the record with `id`. Returns `false` if it is not shown.
    pub fn select_by_id(&mut self, id: i64) -> bool {
        match self.records.iter().position(|r| r.id == id) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char('l') | KeyCode::Right => {
                if self.selected + 1 < self.records.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up | KeyCode::Char('h') | KeyCode::Left => {
                self.selected = self.selected.saturating_sub(1);
            }
            // Jump to first/last
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                self.selected = self.records.len().saturating_sub(1);
            }
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, empty_message: &str) {
        if self.records.is_empty() {
            let paragraph = Paragraph::new(empty_message)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(paragraph, area);
            return;
        }
        match self.layout {
            LayoutMode::Grid => self.render_grid(frame, area),
            LayoutMode::List => self.render_list(frame, area),
        }
    }

    fn render_grid(&self, frame: &mut Frame, area: Rect) {
        let cols = (area.width / CARD_MIN_WIDTH).max(1) as usize;
        let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
        let selected_row = self.selected / cols;
        let first_row = selected_row.saturating_sub(visible_rows - 1);
        let card_width = area.width / cols as u16;

        for (idx, record) in self.records.iter().enumerate() {
            let row = idx / cols;
            if row < first_row || row >= first_row + visible_rows {
                continue;
            }
            let col = idx % cols;
            let card = Rect {
                x: area.x + col as u16 * card_width,
                y: area.y + (row - first_row) as u16 * CARD_HEIGHT,
                width: card_width,
                height: CARD_HEIGHT.min(area.height),
            };
            self.render_card(frame, record, card, idx == self.selected);
        }
    }

    fn render_card(&self, frame: &mut Frame, record: &PromptRecord, area: Rect, is_selected: bool) {
        let border_style = if is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", record.name),
                Style::default().bold().fg(Color::Yellow),
            ))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut lines = Vec::new();
        if record.has_comment() {
            lines.push(Line::from(vec![
                Span::styled("Comment: ", Style::default().bold()),
                Span::raw(record.comment.as_str()),
            ]));
        }
        if !record.tags.is_empty() {
            lines.push(Line::from(tag_chips(&record.tags, is_selected)));
        }
        lines.push(Line::from(record.prompt.as_str()));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body, actions] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
            .areas(inner);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), body);
        frame.render_widget(action_hints(), actions);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Name", "Comment", "Tags", "Prompt", "Actions"])
            .style(Style::default().bold().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let comment = if record.has_comment() {
                    record.comment.as_str()
                } else {
                    "-"
                };
                Row::new(vec![
                    Cell::from(record.name.as_str()),
                    Cell::from(comment),
                    Cell::from(Line::from(tag_chips(&record.tags, idx == self.selected))),
                    Cell::from(first_line(&record.prompt)),
                    Cell::from("c/e/d"),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(20),
            Constraint::Length(22),
            Constraint::Length(24),
            Constraint::Min(20),
            Constraint::Length(7),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = TableState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }
}

/// Tag chips; on the selected record each chip carries the digit that searches for it.
fn tag_chips(tags: &[String], numbered: bool) -> Vec<Span<'_>> {
    tags.iter()
        .enumerate()
        .flat_map(|(i, tag)| {
            let label = if numbered && i < 9 {
                format!(" {}:{tag} ", i + 1)
            } else {
                format!(" {tag} ")
            };
            [
                Span::styled(label, Style::default().fg(Color::Black).bg(Color::Blue)),
                Span::raw(" "),
            ]
        })
        .collect()
}

fn action_hints() -> Line<'static> {
    Line::from(vec![
        Span::styled("c", Style::default().fg(Color::Yellow).bold()),
        Span::raw(" copy  "),
        Span::styled("e", Style::default().fg(Color::Yellow).bold()),
        Span::raw(" edit  "),
        Span::styled("d", Style::default().fg(Color::Yellow).bold()),
        Span::raw(" delete"),
    ])
    .style(Style::default().fg(Color::DarkGray))
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}
