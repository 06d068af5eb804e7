use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

use rust_decimal::prelude::ToPrimitive;

use expense_tracker::{
    load_summary, load_table, BootstrapError, ExpenseForm, ExpenseTable, FormField, Loaded,
    StoreContext, Summary, EXPORT_FILE, HEADERS, NO_EXPENSES, NO_SUMMARY_DATA,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    AddExpense,
    ViewExpenses,
    Summary,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::AddExpense, Page::ViewExpenses, Page::Summary];

    pub fn next(&self) -> Self {
        match self {
            Page::AddExpense => Page::ViewExpenses,
            Page::ViewExpenses => Page::Summary,
            Page::Summary => Page::AddExpense,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::AddExpense => Page::Summary,
            Page::ViewExpenses => Page::AddExpense,
            Page::Summary => Page::ViewExpenses,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::AddExpense => "Add Expense",
            Page::ViewExpenses => "View Expenses",
            Page::Summary => "Summary",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            Page::AddExpense => " ➕ Add a New Expense ",
            Page::ViewExpenses => " 📋 View All Expenses ",
            Page::Summary => " 📊 Expense Summary ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// One-line message shown in the status bar after a pass
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    fn color(&self) -> Color {
        match self.level {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Warning => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        }
    }
}

/// Bootstrap outcome as the dispatcher sees it
pub enum Session {
    Ready(StoreContext),
    Disabled(String),
}

pub struct App {
    pub session: Session,
    pub current_page: Page,
    pub form: ExpenseForm,
    pub table: Option<ExpenseTable>,
    pub table_state: TableState,
    pub summary: Option<Summary>,
    pub notice: Option<Notice>,
    pub export_path: PathBuf,
}

impl App {
    pub fn new(connection: Result<&StoreContext, &BootstrapError>, today: NaiveDate) -> Self {
        let session = match connection {
            Ok(context) => Session::Ready(context.clone()),
            Err(e) => Session::Disabled(e.to_string()),
        };

        Self {
            session,
            current_page: Page::AddExpense,
            form: ExpenseForm::new(today),
            table: None,
            table_state: TableState::default(),
            summary: None,
            notice: None,
            export_path: PathBuf::from(EXPORT_FILE),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.session, Session::Disabled(_))
    }

    /// Menu selection: switch page and run that page's pass
    pub fn select_page(&mut self, page: Page) {
        self.current_page = page;
        self.notice = None;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        self.select_page(self.current_page.next());
    }

    pub fn previous_page(&mut self) {
        self.select_page(self.current_page.previous());
    }

    /// Fetch whatever the current page shows. The add form fetches nothing.
    pub fn refresh(&mut self) {
        let Session::Ready(context) = &self.session else {
            return;
        };

        match self.current_page {
            Page::AddExpense => {}
            Page::ViewExpenses => match load_table(context.collection()) {
                Ok(Loaded::Ready(table)) => {
                    self.table_state.select(Some(0));
                    self.table = Some(table);
                }
                Ok(Loaded::Empty) => {
                    self.table = None;
                    self.notice = Some(Notice::new(NoticeLevel::Warning, NO_EXPENSES));
                }
                Err(e) => {
                    error!(error = %e, "failed to load expenses");
                    self.table = None;
                    self.notice = Some(Notice::new(NoticeLevel::Error, format!("❌ {e}")));
                }
            },
            Page::Summary => match load_summary(context.collection()) {
                Ok(Loaded::Ready(summary)) => self.summary = Some(summary),
                Ok(Loaded::Empty) => {
                    self.summary = None;
                    self.notice = Some(Notice::new(NoticeLevel::Info, NO_SUMMARY_DATA));
                }
                Err(e) => {
                    error!(error = %e, "failed to load summary");
                    self.summary = None;
                    self.notice = Some(Notice::new(NoticeLevel::Error, format!("❌ {e}")));
                }
            },
        }
    }

    pub fn submit(&mut self) {
        let Session::Ready(context) = &self.session else {
            return;
        };

        self.notice = Some(match self.form.submit(context.collection()) {
            Ok(_) => Notice::new(NoticeLevel::Success, "✅ Expense added successfully!"),
            Err(e) => Notice::new(NoticeLevel::Error, format!("❌ Could not add expense: {e}")),
        });
    }

    /// Export the table currently on screen
    pub fn export(&mut self) {
        let Some(table) = &self.table else {
            return;
        };

        self.notice = Some(match table.export(&self.export_path) {
            Ok(_) => Notice::new(
                NoticeLevel::Success,
                format!("✅ Exported as {}", self.export_path.display()),
            ),
            Err(e) => {
                error!(error = %e, "export failed");
                Notice::new(NoticeLevel::Error, format!("❌ Export failed: {e:#}"))
            }
        });
    }

    pub fn next_row(&mut self) {
        let len = self.table.as_ref().map(|t| t.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.table.as_ref().map(|t| t.len()).unwrap_or(0);
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    /// Whether typed characters currently go into a text field
    fn typing(&self) -> bool {
        self.current_page == Page::AddExpense && !self.is_disabled() && self.form.focus.takes_text()
    }

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.next_page();
                return false;
            }
            KeyCode::BackTab => {
                self.previous_page();
                return false;
            }
            KeyCode::Char(c) if !self.typing() => match c {
                'q' => return true,
                '1' => return self.jump(Page::AddExpense),
                '2' => return self.jump(Page::ViewExpenses),
                '3' => return self.jump(Page::Summary),
                _ => {}
            },
            _ => {}
        }

        if self.is_disabled() {
            return false;
        }

        match self.current_page {
            Page::AddExpense => self.handle_form_key(key),
            Page::ViewExpenses => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.next_row(),
                KeyCode::Up | KeyCode::Char('k') => self.previous_row(),
                KeyCode::Char('e') => self.export(),
                KeyCode::Char('r') => {
                    self.notice = None;
                    self.refresh();
                }
                _ => {}
            },
            Page::Summary => {
                if key.code == KeyCode::Char('r') {
                    self.notice = None;
                    self.refresh();
                }
            }
        }
        false
    }

    fn jump(&mut self, page: Page) -> bool {
        self.select_page(page);
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Down => self.form.focus_next(),
            KeyCode::Up => self.form.focus_previous(),
            KeyCode::Right => self.form.adjust(true),
            KeyCode::Left => self.form.adjust(false),
            KeyCode::PageUp if self.form.focus == FormField::Date => self.form.step_months(true),
            KeyCode::PageDown if self.form.focus == FormField::Date => self.form.step_months(false),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => {
                self.form.input_char(c);
            }
            _ => {}
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    info!("ui started");
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                info!("ui closed");
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with menu
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let disabled = match &app.session {
        Session::Disabled(reason) => Some(reason.clone()),
        Session::Ready(_) => None,
    };

    match disabled {
        Some(reason) => render_disabled(f, chunks[1], &reason),
        None => match app.current_page {
            Page::AddExpense => render_form(f, chunks[1], app),
            Page::ViewExpenses => render_table(f, chunks[1], app),
            Page::Summary => render_summary(f, chunks[1], app),
        },
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        "💰 Cloud-Based Expense Tracker",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("  |  "));

    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{} {}", i + 1, page.title()), style));
    }

    if let Session::Ready(context) = &app.session {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            context.endpoint().to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn render_disabled(f: &mut Frame, area: Rect, reason: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  ❌ {reason}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Connection Failed "),
        );
    f.render_widget(paragraph, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let label_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

    let mut content = vec![Line::from("")];
    for field in FormField::ALL {
        let focused = field == form.focus;
        let value = match field {
            FormField::Category => format!("◀ {} ▶", form.category),
            FormField::Amount => form.amount_text().to_string(),
            FormField::Description => form.description.clone(),
            FormField::Date => form.date.format("%Y-%m-%d").to_string(),
        };
        let cursor = if focused && field.takes_text() { "▏" } else { "" };

        content.push(Line::from(vec![
            if focused {
                Span::styled("  → ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            } else {
                Span::raw("    ")
            },
            Span::styled(format!("{:<14}", field.label()), label_style),
            Span::styled(
                format!("{value}{cursor}"),
                if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                },
            ),
        ]));
        content.push(Line::from(""));
    }

    let hint = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);
    content.push(Line::from(Span::styled(
        "  ↑/↓ field  ←/→ change  PgUp/PgDn month (date)  Enter add expense",
        hint,
    )));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(Page::AddExpense.heading()),
    );
    f.render_widget(paragraph, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let Some(table) = &app.table else {
        let block = block.title(Page::ViewExpenses.heading());
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let header_cells = HEADERS
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = table.rows.iter().map(|expense| {
        let [category, amount, description, date] = ExpenseTable::cells(expense);
        Row::new(vec![
            Cell::from(category),
            Cell::from(amount).style(Style::default().fg(Color::Red)),
            Cell::from(truncate(&description, 40)),
            Cell::from(date),
        ])
        .height(1)
    });

    let widget = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Min(20),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(block.title(format!("{}({} expenses) ", Page::ViewExpenses.heading(), table.len())))
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(widget, area, &mut app.table_state);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = &app.summary else {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(Page::Summary.heading());
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let metric = Paragraph::new(vec![
        Line::from(Span::styled(
            "  Total Spent (₹)",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            format!("  {:.2}", summary.total),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("  across {} expenses", summary.record_count),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(Page::Summary.heading()),
    );
    f.render_widget(metric, chunks[0]);

    // Bar heights are whole rupees; the label keeps the paise
    let bars: Vec<Bar> = summary
        .by_category
        .iter()
        .map(|(category, amount)| {
            Bar::default()
                .value(amount.round().to_u64().unwrap_or(0))
                .text_value(format!("{:.2}", amount))
                .label(Line::from(category.as_str()))
                .style(Style::default().fg(Color::Cyan))
                .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Spending by Category "),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(3);

    f.render_widget(chart, chunks[1]);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    if let Some(notice) = &app.notice {
        spans.push(Span::styled(
            format!(" {} ", notice.text),
            Style::default().fg(notice.color()).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("| "));
    }

    let key = Style::default().fg(Color::Yellow);
    spans.push(Span::styled("Tab", key));
    spans.push(Span::raw(" Menu | "));
    if !app.is_disabled() {
        match app.current_page {
            Page::AddExpense => {
                spans.push(Span::styled("Enter", key));
                spans.push(Span::raw(" Add | "));
            }
            Page::ViewExpenses => {
                spans.push(Span::styled("↑/↓", key));
                spans.push(Span::raw(" Nav | "));
                spans.push(Span::styled("e", key));
                spans.push(Span::raw(" Export | "));
                spans.push(Span::styled("r", key));
                spans.push(Span::raw(" Refresh | "));
            }
            Page::Summary => {
                spans.push(Span::styled("r", key));
                spans.push(Span::raw(" Refresh | "));
            }
        }
    }
    spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_tracker::{Bootstrap, Category, Expense, ExpenseCollection, MemoryCollection};
    use std::cell::Cell;
    use rust_decimal::Decimal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn connected() -> (App, MemoryCollection) {
        let collection = MemoryCollection::new();
        let context = StoreContext::new(Arc::new(collection.clone()), "memory");
        let mut bootstrap = Bootstrap::new();
        let app = App::new(bootstrap.initialize(|| Ok(context)), today());
        (app, collection)
    }

    fn disabled() -> App {
        let mut bootstrap = Bootstrap::new();
        let outcome = bootstrap.initialize(|| {
            Err(BootstrapError::InvalidCredentials(
                "missing field `private_key`".to_string(),
            ))
        });
        App::new(outcome, today())
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_second_app_reuses_the_first_connection() {
        let calls = Cell::new(0);
        let collection = MemoryCollection::new();
        let mut bootstrap = Bootstrap::new();
        let connect = || {
            calls.set(calls.get() + 1);
            Ok(StoreContext::new(Arc::new(collection.clone()), "memory"))
        };

        let mut first = App::new(bootstrap.initialize(connect), today());
        first.submit();
        let mut second = App::new(bootstrap.initialize(connect), today());
        second.select_page(Page::ViewExpenses);

        assert_eq!(calls.get(), 1, "Bootstrap connects once per process");
        assert_eq!(second.table.as_ref().map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_page_cycle() {
        assert_eq!(Page::AddExpense.next(), Page::ViewExpenses);
        assert_eq!(Page::Summary.next(), Page::AddExpense);
        assert_eq!(Page::AddExpense.previous(), Page::Summary);
    }

    #[test]
    fn test_enter_submits_and_resets_form() {
        let (mut app, collection) = connected();

        app.handle_key(press(KeyCode::Right)); // Travel
        app.handle_key(press(KeyCode::Down)); // amount
        for c in "99.5".chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
        app.handle_key(press(KeyCode::Enter));

        let stored = collection.fetch_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].1.category, Category::Travel);
        assert_eq!(stored[0].1.amount, "99.5".parse::<Decimal>().unwrap());
        assert_eq!(app.form.amount(), Decimal::ZERO);
        assert_eq!(
            app.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Success)
        );
    }

    #[test]
    fn test_typing_q_in_description_does_not_quit() {
        let (mut app, _) = connected();
        app.form.focus = FormField::Description;

        assert!(!app.handle_key(press(KeyCode::Char('q'))));
        assert!(!app.handle_key(press(KeyCode::Char('1'))));
        assert_eq!(app.form.description, "q1");
        assert_eq!(app.current_page, Page::AddExpense);
    }

    #[test]
    fn test_empty_views_show_no_data() {
        let (mut app, _) = connected();

        app.select_page(Page::ViewExpenses);
        assert!(app.table.is_none());
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some(NO_EXPENSES));

        app.select_page(Page::Summary);
        assert!(app.summary.is_none());
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some(NO_SUMMARY_DATA));
    }

    #[test]
    fn test_view_and_export() {
        let (mut app, collection) = connected();
        let dir = tempfile::tempdir().unwrap();
        app.export_path = dir.path().join(EXPORT_FILE);
        for amount in [Decimal::from(10), Decimal::from(20)] {
            collection
                .append(&Expense::new(Category::Food, amount, "", today()).unwrap())
                .unwrap();
        }

        app.handle_key(press(KeyCode::Char('2')));
        assert_eq!(app.table.as_ref().map(|t| t.len()), Some(2));

        app.handle_key(press(KeyCode::Char('e')));
        let exported = std::fs::read_to_string(&app.export_path).unwrap();
        assert_eq!(exported.lines().count(), 3);
        assert_eq!(
            app.notice.as_ref().map(|n| n.level),
            Some(NoticeLevel::Success)
        );
    }

    #[test]
    fn test_summary_page_loads_totals() {
        let (mut app, collection) = connected();
        collection
            .append(&Expense::new(Category::Bills, Decimal::from(500), "rent share", today()).unwrap())
            .unwrap();

        app.handle_key(press(KeyCode::Char('3')));
        let summary = app.summary.as_ref().unwrap();
        assert_eq!(summary.total, Decimal::from(500));

        let text = screen(&mut app);
        assert!(text.contains("Total Spent"));
        assert!(text.contains("Bills"));
    }

    #[test]
    fn test_disabled_session_shows_one_error_everywhere() {
        let mut app = disabled();

        for page in Page::ALL {
            app.select_page(page);
            let text = screen(&mut app);
            assert_eq!(
                text.matches("missing field").count(),
                1,
                "Exactly one error on {:?}",
                page
            );
            assert!(app.notice.is_none());
        }

        // Add / export / refresh are inert
        app.select_page(Page::AddExpense);
        app.handle_key(press(KeyCode::Enter));
        assert!(app.notice.is_none());
        assert!(!app.handle_key(press(KeyCode::Char('r'))));
        assert!(app.handle_key(press(KeyCode::Esc)));
    }
}
