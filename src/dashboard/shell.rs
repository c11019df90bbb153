//! Shell layout contract and shell-owned UI state.
//!
//! Every dashboard renders inside the same shell: a collapsible sidebar, a
//! top bar with search, notifications and profile, the main content slot, an
//! optional quick-actions panel and a floating chat. [`ShellProps`] is what
//! a dashboard hands to the shell; [`ShellState`] is what the shell keeps for
//! itself. Neither has side effects.

use nucleo::pattern::{CaseMatching, Normalization, Pattern};
use nucleo::{Config as NucleoConfig, Matcher, Utf32Str};
use serde::Serialize;

use crate::core::{
    badge_count, default_notifications, NavigationItem, NavigationRegistry, Notification, Session,
    ThemeDescriptor,
};

/// Number of notifications shown in the side panel.
const RECENT_ALERTS: usize = 3;

/// A shortcut shown in the quick-actions panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    /// Rendered with the theme's primary colour
    pub emphasis: bool,
}

impl QuickAction {
    pub const fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label, emphasis: false }
    }

    pub const fn primary(id: &'static str, label: &'static str) -> Self {
        Self { id, label, emphasis: true }
    }
}

/// Everything the shell needs from a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellProps {
    pub role_label: String,
    pub user_name: String,
    pub avatar: Option<String>,
    pub sidebar_items: Vec<NavigationItem>,
    pub quick_actions: Option<Vec<QuickAction>>,
    pub notifications: Vec<Notification>,
    pub theme: ThemeDescriptor,
}

impl ShellProps {
    /// Props for a session using the role's registered navigation and theme.
    ///
    /// Notifications default to the canned set.
    pub fn new(session: &Session) -> Self {
        Self {
            role_label: session.role.label().to_string(),
            user_name: session.user.display_name.clone(),
            avatar: session.user.avatar.clone(),
            sidebar_items: NavigationRegistry::items_for(session.role),
            quick_actions: None,
            notifications: default_notifications(),
            theme: ThemeDescriptor::resolve(session.role),
        }
    }

    #[must_use]
    pub fn with_role_label(mut self, label: impl Into<String>) -> Self {
        self.role_label = label.into();
        self
    }

    #[must_use]
    pub fn with_sidebar_items(mut self, items: Vec<NavigationItem>) -> Self {
        self.sidebar_items = items;
        self
    }

    #[must_use]
    pub fn with_quick_actions(mut self, actions: Vec<QuickAction>) -> Self {
        self.quick_actions = Some(actions);
        self
    }

    #[must_use]
    pub fn with_notifications(mut self, notifications: Vec<Notification>) -> Self {
        self.notifications = notifications;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: ThemeDescriptor) -> Self {
        self.theme = theme;
        self
    }

    pub fn badge_count(&self) -> usize {
        badge_count(&self.notifications)
    }

    /// Condensed alert list for the side panel.
    ///
    /// Empty unless the dashboard supplies quick actions, since the panel is
    /// not shown otherwise.
    pub fn recent_alerts(&self) -> &[Notification] {
        if self.quick_actions.is_none() {
            return &[];
        }
        let n = self.notifications.len().min(RECENT_ALERTS);
        &self.notifications[..n]
    }

    pub fn active_item(&self) -> Option<&NavigationItem> {
        self.sidebar_items.iter().find(|item| item.active)
    }

    pub fn has_quick_panel(&self) -> bool {
        self.quick_actions.is_some()
    }
}

/// What a search hit points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    Navigation { path: &'static str },
    QuickAction { id: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub label: &'static str,
    pub target: SearchTarget,
    pub score: u32,
}

/// Top-bar search affordance.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub selected: usize,
    pub results: Vec<SearchHit>,
}

impl SearchState {
    /// Fuzzy match the query against navigation and quick-action labels.
    pub fn refresh(&mut self, props: &ShellProps) {
        self.results = search(&self.query, props);
        self.selected = self.selected.min(self.results.len().saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1) % self.results.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.results.is_empty() {
            self.selected = self.selected.checked_sub(1).unwrap_or(self.results.len() - 1);
        }
    }

    pub fn selected_hit(&self) -> Option<&SearchHit> {
        self.results.get(self.selected)
    }
}

/// Rank navigation items and quick actions by fuzzy score.
///
/// An empty query returns nothing.
pub fn search(query: &str, props: &ShellProps) -> Vec<SearchHit> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let mut matcher = Matcher::new(NucleoConfig::DEFAULT);
    let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);
    let mut buf = Vec::new();

    let candidates = props
        .sidebar_items
        .iter()
        .map(|item| (item.label, SearchTarget::Navigation { path: item.path }))
        .chain(
            props
                .quick_actions
                .iter()
                .flatten()
                .map(|action| (action.label, SearchTarget::QuickAction { id: action.id })),
        );

    let mut hits: Vec<SearchHit> = candidates
        .filter_map(|(label, target)| {
            let score = pattern.score(Utf32Str::new(label, &mut buf), &mut matcher)?;
            Some(SearchHit { label, target, score })
        })
        .collect();
    hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.label.cmp(b.label)));
    hits
}

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatSender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: ChatSender,
    pub text: String,
}

impl ChatMessage {
    fn assistant(text: &str) -> Self {
        Self { from: ChatSender::Assistant, text: text.to_string() }
    }

    fn user(text: &str) -> Self {
        Self { from: ChatSender::User, text: text.to_string() }
    }
}

const CHAT_REPLY: &str = "Here's your schedule for today. You have 3 classes and 2 meetings.";

/// Canned assistant conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLog {
    pub messages: Vec<ChatMessage>,
    pub draft: String,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self {
            messages: vec![
                ChatMessage::assistant("Hello! I'm your AI assistant. How can I help you today?"),
                ChatMessage::user("Show me today's schedule"),
                ChatMessage::assistant(CHAT_REPLY),
            ],
            draft: String::new(),
        }
    }
}

impl ChatLog {
    /// Send the draft. Blank drafts are ignored.
    pub fn send(&mut self) -> bool {
        let text = self.draft.trim().to_string();
        self.draft.clear();
        if text.is_empty() {
            return false;
        }
        self.messages.push(ChatMessage::user(&text));
        self.messages.push(ChatMessage::assistant(CHAT_REPLY));
        true
    }
}

/// Local UI state owned by the shell. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct ShellState {
    pub sidebar_collapsed: bool,
    pub notifications_open: bool,
    pub profile_open: bool,
    pub chat_open: bool,
    pub search: SearchState,
    pub chat: ChatLog,
}

impl ShellState {
    pub fn new(sidebar_collapsed: bool) -> Self {
        Self { sidebar_collapsed, ..Self::default() }
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    /// Toggle the notification dropdown; opening it closes the other popovers.
    pub fn toggle_notifications(&mut self) {
        self.notifications_open = !self.notifications_open;
        if self.notifications_open {
            self.chat_open = false;
            self.profile_open = false;
        }
    }

    pub fn toggle_profile(&mut self) {
        self.profile_open = !self.profile_open;
        if self.profile_open {
            self.notifications_open = false;
            self.chat_open = false;
        }
    }

    /// Toggle the chat widget; opening it closes the other popovers.
    pub fn toggle_chat(&mut self) {
        self.chat_open = !self.chat_open;
        if self.chat_open {
            self.notifications_open = false;
            self.profile_open = false;
        }
    }

    pub fn open_search(&mut self) {
        self.search = SearchState { active: true, ..SearchState::default() };
    }

    pub fn close_search(&mut self) {
        self.search.active = false;
    }

    /// Close whichever overlay is open. Returns false if none was.
    pub fn close_overlay(&mut self) -> bool {
        if self.search.active {
            self.close_search();
        } else if self.chat_open {
            self.chat_open = false;
        } else if self.notifications_open {
            self.notifications_open = false;
        } else if self.profile_open {
            self.profile_open = false;
        } else {
            return false;
        }
        true
    }

    pub fn has_overlay(&self) -> bool {
        self.search.active || self.chat_open || self.notifications_open || self.profile_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NotificationKind, Role};

    fn props(role: Role) -> ShellProps {
        ShellProps::new(&Session::demo(role))
    }

    #[test]
    fn test_registered_role_gets_full_nav() {
        let props = props(Role::Student);
        assert_eq!(props.sidebar_items.len(), NavigationRegistry::lookup(Role::Student).unwrap().len());
        assert_eq!(props.active_item().map(|i| i.label), Some("Dashboard"));
    }

    #[test]
    fn test_unregistered_role_gets_empty_nav() {
        let props = props(Role::Faculty);
        assert!(props.sidebar_items.is_empty());
        assert!(props.active_item().is_none());
        assert_eq!(props.theme, ThemeDescriptor::default_blue());
    }

    #[test]
    fn test_defaults_and_badge() {
        let props = props(Role::Librarian);
        assert_eq!(props.badge_count(), 3);
        let empty = props.with_notifications(Vec::new());
        assert_eq!(empty.badge_count(), 0);
    }

    #[test]
    fn test_recent_alerts_need_quick_actions() {
        let mut notifications = default_notifications();
        notifications.push(Notification::new("4", NotificationKind::Error, "x", "y", "now"));

        let without = props(Role::Student).with_notifications(notifications.clone());
        assert!(without.recent_alerts().is_empty());
        assert_eq!(without.badge_count(), 4);

        let with = without.with_quick_actions(vec![QuickAction::new("pay", "Pay Fees")]);
        assert_eq!(with.recent_alerts().len(), 3);
        assert_eq!(with.recent_alerts()[0].title, "System Update");
    }

    #[test]
    fn test_search_ranks_labels() {
        let props = props(Role::Student)
            .with_quick_actions(vec![QuickAction::primary("pay-fees", "Pay Fees Online")]);
        let hits = search("fee", &props);
        assert!(hits.len() >= 2);
        assert!(hits.iter().any(|h| h.target == SearchTarget::Navigation { path: "/fees" }));
        assert!(hits.iter().any(|h| h.target == SearchTarget::QuickAction { id: "pay-fees" }));
        assert!(search("   ", &props).is_empty());
        assert!(search("zzzz", &props).is_empty());
    }

    #[test]
    fn test_popovers_are_exclusive() {
        let mut state = ShellState::default();
        state.toggle_notifications();
        assert!(state.notifications_open);
        state.toggle_chat();
        assert!(state.chat_open);
        assert!(!state.notifications_open);
        assert!(state.close_overlay());
        assert!(!state.has_overlay());
        assert!(!state.close_overlay());
    }

    #[test]
    fn test_chat_send() {
        let mut chat = ChatLog::default();
        assert_eq!(chat.messages.len(), 3);
        chat.draft = "   ".to_string();
        assert!(!chat.send());
        chat.draft = "When is my next exam?".to_string();
        assert!(chat.send());
        assert_eq!(chat.messages.len(), 5);
        assert_eq!(chat.messages[3].from, ChatSender::User);
        assert_eq!(chat.messages[4].from, ChatSender::Assistant);
        assert!(chat.draft.is_empty());
    }

    #[test]
    fn test_search_state_navigation() {
        let props = props(Role::Admin);
        let mut state = ShellState::default();
        state.open_search();
        state.search.query = "s".to_string();
        state.search.refresh(&props);
        let n = state.search.results.len();
        assert!(n > 1);
        state.search.select_prev();
        assert_eq!(state.search.selected, n - 1);
        state.search.select_next();
        assert_eq!(state.search.selected, 0);
    }
}
