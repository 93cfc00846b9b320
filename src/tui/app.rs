use crate::error::AppError;
use crate::search::PhotoSearcher;
use crate::sensor::VisibilitySensor;
use crate::session::{Applied, FetchOutcome, FetchTicket, SearchSession};
use crate::tui::input::SearchInput;
use crate::tui::ui;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub(crate) const GRID_COLUMNS: usize = 3;

pub(crate) fn grid_rows(count: usize) -> usize {
    count.div_ceil(GRID_COLUMNS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    Grid,
}

pub struct App {
    pub(crate) session: SearchSession,
    pub(crate) sensor: VisibilitySensor,
    pub(crate) input: SearchInput,
    pub(crate) focus: Focus,
    pub(crate) selected: usize,
    pub(crate) scroll_row: usize,
    /// Grid rows that fit the current viewport; refreshed on every draw.
    pub(crate) visible_rows: usize,
    pub(crate) status: String,
    pub(crate) throbber: ThrobberState,
    searcher: Arc<dyn PhotoSearcher>,
    outcome_tx: UnboundedSender<FetchOutcome>,
    outcome_rx: UnboundedReceiver<FetchOutcome>,
    startup_query: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(searcher: Arc<dyn PhotoSearcher>, startup_query: Option<String>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            session: SearchSession::new(),
            sensor: VisibilitySensor::new(),
            input: SearchInput::new(),
            focus: Focus::Input,
            selected: 0,
            scroll_row: 0,
            visible_rows: 1,
            status: "Type a query and press Enter".to_string(),
            throbber: ThrobberState::default(),
            searcher,
            outcome_tx,
            outcome_rx,
            startup_query,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        let mut terminal = ratatui::init();
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<impl Backend>) -> Result<(), AppError> {
        terminal.clear()?;

        if let Some(query) = self.startup_query.take() {
            self.input.set_text(&query);
            self.start_search();
        }

        let tick_rate = Duration::from_millis(50);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // The sensor observes the freshly drawn viewport, the way an
            // intersection observer reports after render.
            self.poll_sensor();

            let timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(Event::Key(key)) = event::read() {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            if last_tick.elapsed() >= tick_rate {
                self.process_messages();
                self.throbber.calc_next();
                last_tick = Instant::now();
            }

            if self.should_quit {
                return Ok(());
            }
        }
    }

    fn last_row_visible(&self) -> bool {
        let rows = grid_rows(self.session.photos().len());
        rows > 0 && self.scroll_row + self.visible_rows >= rows
    }

    pub(crate) fn poll_sensor(&mut self) {
        let tail_visible = self.last_row_visible();
        if self.sensor.observe(tail_visible) {
            self.start_next_page();
        }
    }

    fn start_search(&mut self) {
        if let Some(ticket) = self.session.submit(self.input.text()) {
            self.status = format!("Searching for \"{}\"…", ticket.query);
            self.spawn_fetch(ticket);
        }
    }

    fn start_next_page(&mut self) {
        if let Some(ticket) = self.session.next_page() {
            self.spawn_fetch(ticket);
        }
    }

    fn spawn_fetch(&self, ticket: FetchTicket) {
        let searcher = Arc::clone(&self.searcher);
        let tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let result = searcher.search_photos(&ticket.query, ticket.page).await;
            let _ = tx.send(FetchOutcome { ticket, result });
        });
    }

    pub(crate) fn process_messages(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            match self.session.apply(outcome) {
                Applied::Replaced => {
                    self.selected = 0;
                    self.scroll_row = 0;
                    self.sensor.watch(self.session.photos().len());
                    self.status = match self.session.photos().len() {
                        0 => format!("No results for \"{}\"", self.session.query()),
                        n => format!("{} of {} photos loaded", n, self.session.total_results()),
                    };
                }
                Applied::Appended => {
                    self.sensor.watch(self.session.photos().len());
                    self.status = format!(
                        "{} of {} photos loaded",
                        self.session.photos().len(),
                        self.session.total_results()
                    );
                }
                Applied::Failed => {
                    self.status = "Search failed; see the log file for details".to_string();
                }
                Applied::Stale => {}
            }
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                match self.focus {
                    Focus::Grid => self.focus = Focus::Input,
                    Focus::Input if !self.input.text().is_empty() => self.input.clear(),
                    Focus::Input => self.should_quit = true,
                }
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Input => self.handle_input_key(key),
            Focus::Grid => self.handle_grid_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.start_search(),
            KeyCode::Tab | KeyCode::Down => {
                if !self.session.photos().is_empty() {
                    self.focus = Focus::Grid;
                }
            }
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) {
        let count = self.session.photos().len();
        if count == 0 {
            self.focus = Focus::Input;
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Char('/') => self.focus = Focus::Input,
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_selection(GRID_COLUMNS as isize),
            KeyCode::PageUp => self.move_selection(-((self.visible_rows * GRID_COLUMNS) as isize)),
            KeyCode::PageDown => self.move_selection((self.visible_rows * GRID_COLUMNS) as isize),
            KeyCode::Home => {
                self.selected = 0;
                self.ensure_selected_visible();
            }
            KeyCode::End => {
                self.selected = count - 1;
                self.ensure_selected_visible();
            }
            KeyCode::Enter | KeyCode::Char('o') => self.open_selected(),
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let count = self.session.photos().len();
        if count == 0 {
            return;
        }
        let max = count as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let row = self.selected / GRID_COLUMNS;
        let visible = self.visible_rows.max(1);
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + visible {
            self.scroll_row = row + 1 - visible;
        }
    }

    fn open_selected(&mut self) {
        if let Some(photo) = self.session.photos().get(self.selected) {
            log::info!("Opening {}", photo.url);
            if let Err(err) = open::that_detached(&photo.url) {
                log::error!("Could not open {}: {}", photo.url, err);
                self.status = "Could not open the browser; see the log file".to_string();
            }
        }
    }
}
