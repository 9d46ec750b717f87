use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use promptbox_core::validate::{COMMENT_MAX, NAME_MAX, PROMPT_MAX, TAG_MAX};
use promptbox_core::{LayoutMode, PromptForm, PromptRecord};
use promptbox_service::{Command, Controller, NoticeLevel, Notification, Outcome, DELETE_PROMPT};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::components::prompt_view::PromptView;

/// What the app is currently doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Browsing prompts
    Normal,
    /// Typing a search query; the list filters as you type
    Search { input: String },
    /// Filling the add/edit form
    Form {
        form: PromptForm,
        field: FormField,
        editing: bool,
    },
    /// Waiting for a yes/no on deleting a prompt
    ConfirmDelete { record: PromptRecord },
    /// Layout and auto-save toggles
    Settings,
    /// Blocking message; any key dismisses and returns to `resume`
    Alert {
        message: String,
        resume: Option<Box<Mode>>,
    },
    /// Typing a path to export to or import from
    PathInput { kind: Transfer, input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Comment,
    Tags,
    Prompt,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Comment,
            FormField::Comment => FormField::Tags,
            FormField::Tags => FormField::Prompt,
            FormField::Prompt => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Prompt,
            FormField::Comment => FormField::Name,
            FormField::Tags => FormField::Comment,
            FormField::Prompt => FormField::Tags,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Export,
    Import,
}

pub struct App {
    controller: Controller,
    view: PromptView,
    mode: Mode,
    /// Transient message and when it was first shown.
    toast: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let view = build_view(&controller);
        Self {
            controller,
            view,
            mode: Mode::Normal,
            toast: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn view(&self) -> &PromptView {
        &self.view
    }

    pub fn toast(&self) -> Option<&Notification> {
        self.toast.as_ref().map(|(notice, _)| notice)
    }

    fn refresh(&mut self) {
        let selected_id = self.view.selected_record().map(|r| r.id);
        self.view = build_view(&self.controller);
        if let Some(id) = selected_id {
            self.view.select_by_id(id);
        }
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(
            self.mode,
            Mode::Search { .. } | Mode::Form { .. } | Mode::PathInput { .. }
        )
    }

    /// Ctrl+C always quits; `q` only while browsing, so dialogs and input
    /// fields treat it as an ordinary key.
    pub fn is_quit_key(&self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
            KeyCode::Char('q') => self.mode == Mode::Normal,
            _ => false,
        }
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.toast.is_some()
    }

    /// Drop the toast once its time is up. Called on poll timeout.
    pub fn tick(&mut self) {
        self.expire_toast(Instant::now());
    }

    fn expire_toast(&mut self, now: Instant) {
        if let Some((notice, shown_at)) = &self.toast {
            if notice.is_expired(*shown_at, now) {
                self.toast = None;
            }
        }
    }

    fn notify(&mut self, notice: Notification) {
        self.toast = Some((notice, Instant::now()));
    }

    /// Apply a controller outcome. `back` is where an alert returns to.
    fn apply(&mut self, outcome: Outcome, back: Option<Mode>) {
        match outcome {
            Outcome::Changed => {
                self.refresh();
                self.mode = Mode::Normal;
            }
            Outcome::Noop => self.mode = Mode::Normal,
            Outcome::Notice(notice) => {
                self.refresh();
                self.notify(notice);
                self.mode = Mode::Normal;
            }
            Outcome::Alert(message) => {
                self.refresh();
                self.mode = Mode::Alert {
                    message,
                    resume: back.map(Box::new),
                };
            }
            Outcome::Edit(form) => {
                self.mode = Mode::Form {
                    form,
                    field: FormField::Name,
                    editing: true,
                };
            }
            Outcome::ConfirmDelete(record) => self.mode = Mode::ConfirmDelete { record },
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match &self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::Search { input } => self.handle_search(key, input.clone()),
            Mode::Form {
                form,
                field,
                editing,
            } => self.handle_form(key, form.clone(), *field, *editing),
            Mode::ConfirmDelete { .. } => self.handle_confirm_delete(key),
            Mode::Settings => self.handle_settings(key),
            Mode::Alert { resume, .. } => {
                self.mode = resume.as_deref().cloned().unwrap_or(Mode::Normal);
            }
            Mode::PathInput { kind, input } => self.handle_path_input(key, *kind, input.clone()),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        let selected = self.view.selected_record().cloned();
        match key.code {
            KeyCode::Char('/') => {
                self.mode = Mode::Search {
                    input: self.controller.state().query.clone(),
                };
            }
            KeyCode::Esc => {
                if !self.controller.state().query.is_empty() {
                    let outcome = self.controller.dispatch(Command::Filter(String::new()));
                    self.apply(outcome, None);
                }
            }
            KeyCode::Char('n') => {
                self.mode = Mode::Form {
                    form: PromptForm::default(),
                    field: FormField::Name,
                    editing: false,
                };
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(record) = selected {
                    let outcome = self.controller.dispatch(Command::BeginEdit(record.id));
                    self.apply(outcome, None);
                }
            }
            KeyCode::Char('d') => {
                if let Some(record) = selected {
                    let outcome = self.controller.dispatch(Command::RequestDelete(record.id));
                    self.apply(outcome, None);
                }
            }
            KeyCode::Char('c') => {
                if let Some(record) = selected {
                    let outcome = self.controller.dispatch(Command::Copy(record.id));
                    self.apply(outcome, None);
                }
            }
            KeyCode::Char('v') => {
                let layout = self.controller.state().settings.layout.toggled();
                let outcome = self.controller.dispatch(Command::SetLayout(layout));
                self.apply(outcome, None);
            }
            KeyCode::Char('s') => self.mode = Mode::Settings,
            KeyCode::Char('x') => {
                self.mode = Mode::PathInput {
                    kind: Transfer::Export,
                    input: ".".into(),
                };
            }
            KeyCode::Char('i') => {
                self.mode = Mode::PathInput {
                    kind: Transfer::Import,
                    input: String::new(),
                };
            }
            // Digits pick a tag on the selected prompt and search for it
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if let Some(tag) = selected.and_then(|r| r.tags.get(idx).cloned()) {
                    let outcome = self.controller.dispatch(Command::SelectTag(tag));
                    self.apply(outcome, None);
                }
            }
            _ => self.view.handle_key(key),
        }
    }

    fn handle_search(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Esc => {
                let outcome = self.controller.dispatch(Command::Filter(String::new()));
                self.apply(outcome, None);
            }
            KeyCode::Backspace => {
                input.pop();
                self.search(input);
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.search(input);
            }
            _ => {}
        }
    }

    fn search(&mut self, input: String) {
        self.controller.dispatch(Command::Filter(input.clone()));
        self.refresh();
        self.mode = Mode::Search { input };
    }

    fn handle_form(&mut self, key: KeyEvent, mut form: PromptForm, field: FormField, editing: bool) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                let back = Mode::Form {
                    form: form.clone(),
                    field,
                    editing,
                };
                let outcome = self.controller.dispatch(Command::Submit(form));
                let saved = outcome == Outcome::Changed;
                self.apply(outcome, Some(back));
                if saved {
                    let message = if editing { "Prompt updated" } else { "Prompt added" };
                    self.notify(Notification::info(message));
                }
            }
            KeyCode::Esc => {
                if editing {
                    self.controller.dispatch(Command::CancelEdit);
                }
                self.mode = Mode::Normal;
            }
            KeyCode::Tab => {
                self.mode = Mode::Form {
                    form,
                    field: field.next(),
                    editing,
                };
            }
            KeyCode::BackTab => {
                self.mode = Mode::Form {
                    form,
                    field: field.prev(),
                    editing,
                };
            }
            KeyCode::Enter => {
                let field = match field {
                    FormField::Prompt => {
                        form.prompt.push('\n');
                        field
                    }
                    other => other.next(),
                };
                self.mode = Mode::Form {
                    form,
                    field,
                    editing,
                };
            }
            KeyCode::Backspace => {
                field_mut(&mut form, field).pop();
                self.mode = Mode::Form {
                    form,
                    field,
                    editing,
                };
            }
            KeyCode::Char(c) => {
                field_mut(&mut form, field).push(c);
                self.mode = Mode::Form {
                    form,
                    field,
                    editing,
                };
            }
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent) {
        let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
        let outcome = self.controller.dispatch(Command::ConfirmDelete(confirmed));
        self.apply(outcome, None);
    }

    fn handle_settings(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') | KeyCode::Char(' ') => {
                let enabled = !self.controller.state().settings.auto_save;
                let outcome = self.controller.dispatch(Command::SetAutoSave(enabled));
                self.apply(outcome, None);
                self.mode = Mode::Settings;
            }
            KeyCode::Char('v') => {
                let layout = self.controller.state().settings.layout.toggled();
                let outcome = self.controller.dispatch(Command::SetLayout(layout));
                self.apply(outcome, None);
                self.mode = Mode::Settings;
            }
            KeyCode::Esc | KeyCode::Char('s') => self.mode = Mode::Normal,
            _ => {}
        }
    }

    fn handle_path_input(&mut self, key: KeyEvent, kind: Transfer, mut input: String) {
        match key.code {
            KeyCode::Enter => {
                let path = input.trim();
                if path.is_empty() {
                    self.mode = Mode::Normal;
                    return;
                }
                let path = PathBuf::from(path);
                let command = match kind {
                    Transfer::Export => Command::Export(path),
                    Transfer::Import => Command::Import(path),
                };
                let outcome = self.controller.dispatch(command);
                self.apply(outcome, None);
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                input.pop();
                self.mode = Mode::PathInput { kind, input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.mode = Mode::PathInput { kind, input };
            }
            _ => {}
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let [title, search, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        self.render_title_bar(frame, title);
        self.render_search_bar(frame, search);
        let empty = if self.controller.state().records().is_empty() {
            "No prompts yet. Press n to add one."
        } else {
            "No prompts match the search."
        };
        self.view.render(frame, body, empty);
        self.render_status_bar(frame, status);

        // Overlays
        match &self.mode {
            Mode::Normal | Mode::Search { .. } => {}
            Mode::Form {
                form,
                field,
                editing,
            } => self.render_form(frame, form, *field, *editing, area),
            Mode::ConfirmDelete { record } => self.render_confirm_delete(frame, record, area),
            Mode::Settings => self.render_settings(frame, area),
            Mode::Alert { message, .. } => self.render_alert(frame, message, area),
            Mode::PathInput { kind, input } => {
                let label = match kind {
                    Transfer::Export => " Export to (directory or file): ",
                    Transfer::Import => " Import from file: ",
                };
                self.render_input_bar(frame, label, input, area)
            }
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let state = self.controller.state();
        let title = Line::from(vec![
            Span::styled(" promptbox ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(
                format!("{}/{} prompts", self.view.len(), state.records().len()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!(" ({})", state.settings.layout),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(title, area);
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let active = matches!(self.mode, Mode::Search { .. });
        let border = if active { Color::Cyan } else { Color::DarkGray };
        let query = &self.controller.state().query;
        let text = if query.is_empty() && !active {
            Span::styled("Search by name or tag (/)", Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(query.as_str())
        };
        let paragraph = Paragraph::new(Line::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(" Search "),
        );
        frame.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some((notice, _)) = &self.toast {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            let line = Line::from(Span::styled(
                format!(" {}", notice.message),
                Style::default().fg(color),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "move"),
                ("/", "search"),
                ("n", "new"),
                ("e", "edit"),
                ("d", "del"),
                ("c", "copy"),
                ("1-9", "tag"),
                ("v", "layout"),
                ("s", "settings"),
                ("x", "export"),
                ("i", "import"),
            ],
            Mode::Search { .. } => vec![("Enter", "done"), ("Esc", "clear")],
            Mode::Form { .. } => vec![
                ("Tab", "next field"),
                ("Ctrl+S", "save"),
                ("Esc", "cancel"),
            ],
            Mode::ConfirmDelete { .. } => vec![("y", "confirm"), ("any", "cancel")],
            Mode::Settings => vec![("a", "auto-save"), ("v", "layout"), ("Esc", "back")],
            Mode::Alert { .. } => vec![("any", "dismiss")],
            Mode::PathInput { .. } => vec![("Enter", "go"), ("Esc", "cancel")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label);
        let paragraph = Paragraph::new(input).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_form(
        &self,
        frame: &mut Frame,
        form: &PromptForm,
        field: FormField,
        editing: bool,
        area: Rect,
    ) {
        let popup = centered_rect(70, 80, area);
        frame.render_widget(Clear, popup);

        let title = if editing { " Edit Prompt " } else { " New Prompt " };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let label_style = |f: FormField| {
            if f == field {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            }
        };
        let counter = |value: &str, max: usize| {
            let used = value.chars().count();
            let color = if used > max { Color::Red } else { Color::DarkGray };
            Span::styled(format!("  {used}/{max}"), Style::default().fg(color))
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Name:    ", label_style(FormField::Name)),
                Span::raw(form.name.as_str()),
                counter(&form.name, NAME_MAX),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Comment: ", label_style(FormField::Comment)),
                Span::raw(form.comment.as_str()),
                counter(&form.comment, COMMENT_MAX),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Tags:    ", label_style(FormField::Tags)),
                Span::raw(form.tags.as_str()),
                Span::styled(
                    format!("  comma separated, each up to {TAG_MAX}"),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Prompt:", label_style(FormField::Prompt)),
                counter(&form.prompt, PROMPT_MAX),
            ]),
        ];
        lines.extend(form.prompt.split('\n').map(|l| Line::from(format!("  {l}"))));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_confirm_delete(&self, frame: &mut Frame, record: &PromptRecord, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("{DELETE_PROMPT}\n\"{}\"\n\n(y)es / (any key) cancel", record.name);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }

    fn render_settings(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(40, 30, area);
        frame.render_widget(Clear, popup);

        let settings = &self.controller.state().settings;
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let on_off = if settings.auto_save { "on" } else { "off" };
        let mut layouts = vec![Span::styled("(v) Layout:    ", Style::default().bold())];
        for layout in LayoutMode::ALL {
            let style = if *layout == settings.layout {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            layouts.push(Span::styled(format!(" {layout} "), style));
        }
        let lines = vec![
            Line::from(layouts),
            Line::from(vec![
                Span::styled("(a) Auto-save: ", Style::default().bold()),
                Span::raw(on_off),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), popup);
    }

    fn render_alert(&self, frame: &mut Frame, message: &str, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Notice ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new(format!("{message}\n\n(any key) ok"))
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn build_view(controller: &Controller) -> PromptView {
    let records = controller.visible().into_iter().cloned().collect();
    PromptView::new(records, controller.state().settings.layout)
}

fn field_mut(form: &mut PromptForm, field: FormField) -> &mut String {
    match field {
        FormField::Name => &mut form.name,
        FormField::Comment => &mut form.comment,
        FormField::Tags => &mut form.tags,
        FormField::Prompt => &mut form.prompt,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}
