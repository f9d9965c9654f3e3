use ratatui::layout::Rect;

use crate::client::{ChatClient, ChatResponse};
use crate::state::{Message, Role, AGENT_AUTHOR, USER_AUTHOR};
use crate::ui;

/// The chat widget: input line, append-only transcript, and the bookkeeping
/// needed to draw them.
pub struct App {
    pub should_quit: bool,

    // Input line
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Transcript (append-only)
    pub transcript: Vec<Message>,
    pub scroll: u16,
    pub follow_bottom: bool,
    pub transcript_height: u16, // inner height of the transcript pane
    pub transcript_width: u16,  // inner width, for wrap calculations
    pub transcript_area: Option<Rect>,

    // Requests
    pub client: ChatClient,
    pub in_flight: usize,
    pub last_failure: Option<String>,

    // Typing indicator, 0-2
    pub animation_frame: u8,
}

impl App {
    pub fn new(client: ChatClient) -> Self {
        Self {
            should_quit: false,
            input: String::new(),
            cursor: 0,
            transcript: Vec::new(),
            scroll: 0,
            follow_bottom: true,
            transcript_height: 0,
            transcript_width: 0,
            transcript_area: None,
            client,
            in_flight: 0,
            last_failure: None,
            animation_frame: 0,
        }
    }

    /// Take the trimmed input for sending.
    ///
    /// Returns `None` and leaves everything untouched when the input is
    /// blank. Otherwise the user's bubble is appended and the input cleared
    /// before the caller issues the request.
    pub fn submit(&mut self) -> Option<String> {
        let message = self.input.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();

        self.append_message(Role::User, USER_AUTHOR, &message);
        self.input.clear();
        self.cursor = 0;
        Some(message)
    }

    pub fn append_message(&mut self, role: Role, author: &str, text: &str) {
        self.transcript.push(Message::new(role, author, text));
        self.follow_bottom = true;
        self.scroll_to_bottom();
    }

    /// Render every truthy field of a reply as an agent bubble.
    pub fn apply_response(&mut self, response: &ChatResponse) {
        for text in response.replies() {
            self.append_message(Role::Agent, AGENT_AUTHOR, text);
        }
        self.last_failure = None;
    }

    pub fn request_started(&mut self) {
        self.in_flight += 1;
        if self.follow_bottom {
            self.scroll_to_bottom();
        }
    }

    pub fn request_finished(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn record_failure(&mut self, notice: String) {
        self.last_failure = Some(notice);
    }

    pub fn is_waiting(&self) -> bool {
        self.in_flight > 0
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.is_waiting() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Number of rows the transcript occupies once wrapped.
    ///
    /// Measured with the same word wrapping and display widths the renderer
    /// uses, typing indicator included.
    pub fn transcript_lines(&self) -> u16 {
        // Use actual pane width for wrap calculation, default to 50 if not drawn yet
        let wrap_width = if self.transcript_width > 0 {
            self.transcript_width
        } else {
            50
        };

        let rows = ui::transcript_paragraph(self).line_count(wrap_width);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    fn visible_height(&self) -> u16 {
        if self.transcript_height > 0 {
            self.transcript_height
        } else {
            20
        }
    }

    fn max_scroll(&self) -> u16 {
        self.transcript_lines().saturating_sub(self.visible_height())
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    /// Keep the newest entry in view after the pane was resized.
    pub fn sync_scroll(&mut self) {
        if self.follow_bottom {
            self.scroll_to_bottom();
        } else {
            self.scroll = self.scroll.min(self.max_scroll());
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.follow_bottom = self.scroll >= self.max_scroll();
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll());
        self.follow_bottom = self.scroll >= self.max_scroll();
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_up(self.visible_height().saturating_sub(1).max(1));
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_down(self.visible_height().saturating_sub(1).max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{agent, app, user};

    #[test]
    fn test_submit_blank_input_has_no_effect() {
        let mut app = app();
        for blank in ["", "   ", "\t\n "] {
            app.input = blank.to_string();
            app.cursor = blank.chars().count();
            assert_eq!(app.submit(), None);
            assert!(app.transcript.is_empty());
            assert_eq!(app.input, blank);
        }
    }

    #[test]
    fn test_submit_appends_user_bubble_and_clears_input() {
        let mut app = app();
        app.input = "  hello ".to_string();
        app.cursor = 8;

        assert_eq!(app.submit().as_deref(), Some("hello"));
        assert_eq!(app.transcript, vec![user("hello")]);
        assert_eq!(app.transcript[0].author, "Tu");
        assert_eq!(app.input, "");
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn test_apply_response_renders_both_fields() {
        let mut app = app();
        app.record_failure("boom".to_string());
        app.apply_response(&ChatResponse {
            response: Some("a".to_string()),
            error: Some("b".to_string()),
        });

        assert_eq!(app.transcript, vec![agent("a"), agent("b")]);
        assert_eq!(app.last_failure, None);
    }

    #[test]
    fn test_apply_empty_response_adds_nothing() {
        let mut app = app();
        app.apply_response(&ChatResponse::default());
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_in_flight_counter() {
        let mut app = app();
        app.request_started();
        app.request_started();
        assert!(app.is_waiting());
        app.request_finished();
        app.request_finished();
        app.request_finished();
        assert_eq!(app.in_flight, 0);
        assert!(!app.is_waiting());
    }

    #[test]
    fn test_append_sticks_to_bottom() {
        let mut app = app();
        app.transcript_height = 4;
        app.transcript_width = 20;
        for i in 0..5 {
            app.append_message(Role::Agent, AGENT_AUTHOR, &format!("line {}", i));
        }
        // 5 messages * 3 rows each, 4 visible
        assert_eq!(app.transcript_lines(), 15);
        assert_eq!(app.scroll, 11);

        app.scroll_up(3);
        assert!(!app.follow_bottom);
        assert_eq!(app.scroll, 8);

        app.append_message(Role::User, "Tu", "again");
        assert!(app.follow_bottom);
        assert_eq!(app.scroll, 14);
    }

    #[test]
    fn test_scroll_down_is_clamped() {
        let mut app = app();
        app.transcript_height = 10;
        app.append_message(Role::User, "Tu", "short");
        app.scroll_down(50);
        assert_eq!(app.scroll, 0);
        assert!(app.follow_bottom);
    }

    #[test]
    fn test_long_words_break_across_rows() {
        let mut app = app();
        app.transcript_width = 6;
        app.append_message(Role::Agent, AGENT_AUTHOR, "ñañañaña\n\nab");
        // author + 2 wrapped rows + empty row + 1 row + separator
        assert_eq!(app.transcript_lines(), 6);
    }

    #[test]
    fn test_word_wrap_counts_whole_words() {
        let mut app = app();
        app.transcript_width = 10;
        // 69 chars would fit 7 rows by length, but each word needs its own row
        app.append_message(Role::Agent, AGENT_AUTHOR, "aaaaaa bbbbbb cccccc dddddd eeeeee ffffff gggggg hhhhhh iiiiii jjjjjj");
        assert_eq!(app.transcript_lines(), 12);
    }

    #[test]
    fn test_wide_chars_count_double_width() {
        let mut app = app();
        app.transcript_width = 10;
        let text = format!("{}末", "日本語".repeat(9));
        app.append_message(Role::Agent, AGENT_AUTHOR, &text);
        // 28 wide chars, 5 per row
        assert_eq!(app.transcript_lines(), 8);
    }

    #[test]
    fn test_typing_indicator_counted() {
        let mut app = app();
        app.append_message(Role::User, USER_AUTHOR, "hola");
        assert_eq!(app.transcript_lines(), 3);
        app.request_started();
        assert_eq!(app.transcript_lines(), 5);
    }
}
