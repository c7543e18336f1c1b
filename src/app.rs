//! Application state and navigation logic.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{info, warn};
use upwatch_types::{MonitorState, Timestamp};

use crate::config::{PageConfig, Settings};
use crate::data::{Filter, Listing, StatusFilter, StatusPage};
use crate::export;
use crate::source::DataSource;
use crate::ui::Theme;
use crate::viewstate::{load_expanded_groups, save_expanded_groups, ViewStateStore};

/// Default file written by the export key.
pub const DEFAULT_EXPORT_PATH: &str = "upwatch_export.json";

/// The current view/tab in the TUI.
///
/// Monitor detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Banner, SLA cards and the monitor list.
    Status,
    /// Active and upcoming maintenance windows.
    Maintenance,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Status => View::Maintenance,
            View::Maintenance => View::Status,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        self.next()
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Status => "Status",
            View::Maintenance => "Maintenance",
        }
    }
}

/// One row of the monitor list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    /// Group header, collapsible.
    Group(String),
    /// A monitor, by id.
    Monitor(String),
}

/// When to reload a state that stopped updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessPolicy {
    /// State older than this many seconds is stale.
    pub stale_after: i64,
    /// No automatic reload within this many seconds of opening.
    pub grace: i64,
}

impl Default for StalenessPolicy {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl StalenessPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            stale_after: i64::try_from(settings.stale_after_secs).unwrap_or(i64::MAX),
            grace: i64::try_from(settings.reload_grace_secs).unwrap_or(i64::MAX),
        }
    }

    /// True if the state is stale and the page has been open long enough.
    pub fn should_reload(&self, now: Timestamp, last_update: Timestamp, opened_at: Timestamp) -> bool {
        now.saturating_sub(last_update) > self.stale_after && now.saturating_sub(opened_at) > self.grace
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub config: PageConfig,
    pub state: Option<MonitorState>,
    pub load_error: Option<String>,

    // Clock
    pub now: Timestamp,
    pub opened_at: Timestamp,
    pub staleness: StalenessPolicy,
    /// False while the terminal reports focus lost.
    pub focused: bool,

    // Navigation state
    pub selected_index: usize,
    pub selected_window_index: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,
    pub status_filter: StatusFilter,

    // View state
    view_store: Box<dyn ViewStateStore>,
    pub expanded_groups: BTreeSet<String>,

    // UI
    pub theme: Theme,
    pub export_path: PathBuf,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App.
    ///
    /// Expanded groups come from the view store; if it has none saved, every
    /// group starts expanded.
    pub fn new(
        source: Box<dyn DataSource>,
        config: PageConfig,
        view_store: Box<dyn ViewStateStore>,
        now: Timestamp,
    ) -> Self {
        let expanded_groups = load_expanded_groups(view_store.as_ref())
            .unwrap_or_else(|| config.groups.iter().map(|g| g.name.clone()).collect());
        let staleness = StalenessPolicy::from_settings(&config.settings);

        Self {
            running: true,
            current_view: View::Status,
            show_help: false,
            show_detail_overlay: false,
            source,
            config,
            state: None,
            load_error: None,
            now,
            opened_at: now,
            staleness,
            focused: true,
            selected_index: 0,
            selected_window_index: 0,
            filter_text: String::new(),
            filter_active: false,
            status_filter: StatusFilter::All,
            view_store,
            expanded_groups,
            theme: Theme::auto_detect(),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data.
    ///
    /// Returns true if a new snapshot replaced the current one. On error the
    /// last good snapshot is kept.
    pub fn reload_data(&mut self) -> bool {
        if let Some(state) = self.source.poll() {
            self.state = Some(state);
            self.load_error = None;
            self.clamp_selection();
            return true;
        }

        self.load_error = self.source.error();
        false
    }

    /// Re-read the source even if it looks unchanged, restarting the grace period.
    pub fn force_reload(&mut self) -> bool {
        self.source.refresh();
        self.opened_at = self.now;
        self.reload_data()
    }

    /// Advance the clock and pull new data.
    ///
    /// Skipped entirely while the terminal is not focused. A state older than
    /// the staleness threshold triggers a forced reload once the grace period
    /// since opening has passed.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        if !self.focused {
            return false;
        }
        self.now = now;

        if self.reload_data() {
            return true;
        }

        let Some(last_update) = self.state.as_ref().map(|s| s.last_update) else {
            return false;
        };
        if self.staleness.should_reload(now, last_update, self.opened_at) {
            info!(age = now - last_update, "state is stale, reloading");
            return self.force_reload();
        }
        false
    }

    /// Record a terminal focus change.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// The current search and status filter.
    pub fn filter(&self) -> Filter {
        Filter::new(self.filter_text.clone(), self.status_filter)
    }

    /// Compute the status page for the current state and filter.
    pub fn page(&self) -> StatusPage<'_> {
        StatusPage::compute(self.state.as_ref(), &self.config, &self.filter(), self.now)
    }

    /// Rows of the monitor list as displayed, collapsed groups hiding
    /// their monitors.
    pub fn visible_items(&self) -> Vec<ListItem> {
        let page = self.page();
        match &page.listing {
            Listing::Flat(monitors) => monitors
                .iter()
                .map(|m| ListItem::Monitor(m.id.clone()))
                .collect(),
            Listing::Grouped(groups) => {
                let mut items = Vec::new();
                for group in groups {
                    items.push(ListItem::Group(group.name.clone()));
                    if self.is_expanded(&group.name) {
                        items.extend(group.monitors.iter().map(|m| ListItem::Monitor(m.id.clone())));
                    }
                }
                items
            }
        }
    }

    /// The selected row.
    pub fn selected_item(&self) -> Option<ListItem> {
        self.visible_items().into_iter().nth(self.selected_index)
    }

    /// The selected monitor id, if a monitor row is selected.
    pub fn selected_monitor_id(&self) -> Option<String> {
        match self.selected_item()? {
            ListItem::Monitor(id) => Some(id),
            ListItem::Group(_) => None,
        }
    }

    pub fn is_expanded(&self, group: &str) -> bool {
        self.expanded_groups.contains(group)
    }

    /// Expand or collapse a group and persist the choice.
    pub fn toggle_group(&mut self, group: &str) {
        if !self.expanded_groups.remove(group) {
            self.expanded_groups.insert(group.to_string());
        }
        if let Err(e) = save_expanded_groups(self.view_store.as_mut(), &self.expanded_groups) {
            warn!("failed to save view state: {}", e);
            self.set_status_message(format!("Could not save view state: {}", e));
        }
        self.clamp_selection();
    }

    /// Toggle the group under the cursor, or the group of the selected monitor.
    pub fn toggle_selected_group(&mut self) {
        let items = self.visible_items();
        let group = items
            .iter()
            .take(self.selected_index + 1)
            .rev()
            .find_map(|item| match item {
                ListItem::Group(name) => Some(name.clone()),
                ListItem::Monitor(_) => None,
            });

        if let Some(group) = group {
            if let Some(pos) = items.iter().position(|i| *i == ListItem::Group(group.clone())) {
                self.selected_index = pos;
            }
            self.toggle_group(&group);
        }
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    fn item_count(&self) -> usize {
        match self.current_view {
            View::Status => self.visible_items().len(),
            View::Maintenance => {
                let page = self.page();
                page.maintenance.active.len() + page.maintenance.upcoming.len()
            }
        }
    }

    fn clamp_selection(&mut self) {
        let max = self.visible_items().len().saturating_sub(1);
        self.selected_index = self.selected_index.min(max);
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.item_count().saturating_sub(1);
        let index = self.selection_mut();
        *index = (*index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let index = self.selection_mut();
        *index = index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selection_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.item_count().saturating_sub(1);
        *self.selection_mut() = last;
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Status => &mut self.selected_index,
            View::Maintenance => &mut self.selected_window_index,
        }
    }

    /// Act on the selected row: open a monitor's detail, or toggle a group.
    pub fn activate(&mut self) {
        if self.current_view != View::Status {
            return;
        }
        match self.selected_item() {
            Some(ListItem::Monitor(_)) => self.show_detail_overlay = true,
            Some(ListItem::Group(name)) => self.toggle_group(&name),
            None => {}
        }
    }

    /// Navigate back: close overlay first, then return to the status view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.current_view != View::Status {
            self.current_view = View::Status;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle the status filter (All, Issues, Maintenance).
    pub fn cycle_status_filter(&mut self) {
        self.status_filter = self.status_filter.next();
        self.selected_index = 0;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
        self.clamp_selection();
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.selected_index = 0;
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
        self.clamp_selection();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current page to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let page = StatusPage::compute(self.state.as_ref(), &self.config, &Filter::default(), self.now);
        export::write_page(&page, self.state.as_ref(), &self.config, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Group, MonitorTarget};
    use crate::source::ChannelSource;
    use crate::viewstate::MemoryViewStore;
    use tokio::sync::watch;

    const NOW: i64 = 1_700_000_000;

    fn config() -> PageConfig {
        PageConfig {
            monitors: vec![
                MonitorTarget::new("api", "API"),
                MonitorTarget::new("web", "Website"),
                MonitorTarget::new("db", "Database"),
            ],
            groups: vec![Group::new("Backend", ["api", "db"]), Group::new("Frontend", ["web"])],
            ..PageConfig::default()
        }
    }

    fn state(last_update: i64) -> MonitorState {
        MonitorState::builder()
            .last_update(last_update)
            .monitor("api", |m| m.incident(|i| i.start(last_update - 60)))
            .monitor("web", |m| m)
            .monitor("db", |m| m)
            .build()
    }

    fn app_with(config: PageConfig) -> (watch::Sender<MonitorState>, App) {
        let (tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), config, Box::new(MemoryViewStore::new()), NOW);
        (tx, app)
    }

    #[test]
    fn test_staleness_policy() {
        let policy = StalenessPolicy::default();
        assert!(policy.should_reload(NOW, NOW - 301, NOW - 31));
        assert!(!policy.should_reload(NOW, NOW - 300, NOW - 31));
        assert!(!policy.should_reload(NOW, NOW - 301, NOW - 30));
    }

    #[test]
    fn test_tick_loads_state() {
        let (tx, mut app) = app_with(config());
        tx.send(state(NOW)).unwrap();

        assert!(app.tick(NOW));
        assert!(app.state.is_some());
        assert!(!app.tick(NOW + 1));
    }

    #[test]
    fn test_tick_paused_without_focus() {
        let (tx, mut app) = app_with(config());
        tx.send(state(NOW)).unwrap();

        app.set_focused(false);
        assert!(!app.tick(NOW));
        assert!(app.state.is_none());

        app.set_focused(true);
        assert!(app.tick(NOW));
    }

    #[test]
    fn test_stale_state_forces_reload() {
        let (tx, mut app) = app_with(config());
        tx.send(state(NOW - 1_000)).unwrap();
        assert!(app.tick(NOW));

        // Still inside the grace period
        assert!(!app.tick(NOW + 10));

        assert!(app.tick(NOW + 60));
        assert_eq!(app.opened_at, NOW + 60);
        // Grace period restarted
        assert!(!app.tick(NOW + 61));
    }

    #[test]
    fn test_grouped_items_and_collapse() {
        let (tx, mut app) = app_with(config());
        tx.send(state(NOW)).unwrap();
        app.tick(NOW);

        assert_eq!(
            app.visible_items(),
            vec![
                ListItem::Group("Backend".to_string()),
                ListItem::Monitor("api".to_string()),
                ListItem::Monitor("db".to_string()),
                ListItem::Group("Frontend".to_string()),
                ListItem::Monitor("web".to_string()),
            ]
        );

        app.selected_index = 2;
        app.toggle_selected_group();
        assert_eq!(app.selected_index, 0);
        assert!(!app.is_expanded("Backend"));
        assert_eq!(app.visible_items().len(), 3);

        app.activate();
        assert!(app.is_expanded("Backend"));
    }

    #[test]
    fn test_expanded_groups_restored_from_store() {
        let mut store = MemoryViewStore::new();
        let saved: BTreeSet<String> = ["Frontend".to_string()].into_iter().collect();
        save_expanded_groups(&mut store, &saved).unwrap();

        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), config(), Box::new(store), NOW);
        assert!(app.is_expanded("Frontend"));
        assert!(!app.is_expanded("Backend"));
    }

    #[test]
    fn test_issue_filter_and_detail() {
        let (tx, mut app) = app_with(config());
        tx.send(state(NOW)).unwrap();
        app.tick(NOW);

        app.cycle_status_filter();
        assert_eq!(app.status_filter, StatusFilter::Issues);
        assert_eq!(app.visible_items().len(), 2);

        app.select_last();
        assert_eq!(app.selected_monitor_id().as_deref(), Some("api"));
        app.activate();
        assert!(app.show_detail_overlay);

        app.go_back();
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_search_flat_list() {
        let mut config = config();
        config.groups.clear();
        let (tx, mut app) = app_with(config);
        tx.send(state(NOW)).unwrap();
        app.tick(NOW);

        for c in "web".chars() {
            app.filter_push(c);
        }
        assert_eq!(app.visible_items(), vec![ListItem::Monitor("web".to_string())]);

        app.clear_filter();
        assert_eq!(app.visible_items().len(), 3);
    }

    #[test]
    fn test_export_writes_json() {
        let (tx, mut app) = app_with(config());
        tx.send(state(NOW)).unwrap();
        app.tick(NOW);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        app.export_state(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["monitors"].as_array().map(|m| m.len()), Some(3));
    }
}
