//! Terminal rendition of the note page.

use hashpad_core::presentation::INDICATOR_DURATION;
use hashpad_core::{NoteRow, NoteStats, NoteView};
use std::io::Write;

/// Keeps the editable text in memory and echoes widget updates to a writer.
pub struct TerminalView<W: Write> {
    out: W,
    echo: bool,
    text: String,
    pub note_id: String,
    pub title: String,
    pub stats: NoteStats,
}

impl<W: Write> TerminalView<W> {
    /// `echo` prints every widget update as it happens.
    pub fn new(out: W, echo: bool) -> Self {
        Self {
            out,
            echo,
            text: String::new(),
            note_id: String::new(),
            title: String::new(),
            stats: NoteStats::default(),
        }
    }

    /// Replaces the text as if the user typed it.
    pub fn type_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Appends one typed line.
    pub fn append_line(&mut self, line: &str) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(line);
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    fn echo_line(&mut self, line: &str) {
        if self.echo {
            // Terminal output failures are not note failures.
            let _ = writeln!(self.out, "{line}");
        }
    }
}

impl<W: Write> NoteView for TerminalView<W> {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        if !text.is_empty() {
            self.echo_line(text);
        }
    }

    fn move_cursor_to_end(&mut self) {}

    fn set_note_id(&mut self, id: &str) {
        self.note_id = id.to_string();
        self.echo_line(&format!("# {id}"));
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_stats(&mut self, stats: NoteStats) {
        self.stats = stats;
    }

    fn show_indicator(&mut self, message: &str) {
        let line = format!("[{message}] {}", self.stats);
        self.echo_line(&line);
        log::debug!(
            "event=indicator module=cli status=ok visible_ms={}",
            INDICATOR_DURATION.as_millis()
        );
    }

    fn show_notes_table(&mut self, rows: &[NoteRow]) {
        let mut lines = vec![format!("{:<12} {:<19} {}", "ID", "UPDATED", "PREVIEW")];
        lines.extend(
            rows.iter()
                .map(|row| format!("{:<12} {:<19} {}", row.href, row.updated, row.preview)),
        );
        for line in lines {
            // Listing is always printed, even without echo.
            let _ = writeln!(self.out, "{line}");
        }
    }

    fn hide_notes_table(&mut self) {
        self.echo_line("(listing closed)");
    }
}

#[cfg(test)]
mod tests {
    use super::TerminalView;
    use hashpad_core::{NoteRow, NoteView};

    #[test]
    fn append_line_joins_with_newlines() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.append_line("one");
        view.append_line("two");
        assert_eq!(view.text(), "one\ntwo");
    }

    #[test]
    fn listing_is_printed_without_echo() {
        let mut view = TerminalView::new(Vec::new(), false);
        view.show_notes_table(&[NoteRow {
            id: "ab12c".to_string(),
            href: "#ab12c".to_string(),
            updated: "2023-11-14 22:13:20".to_string(),
            preview: "hello".to_string(),
        }]);
        let printed = String::from_utf8(view.out().clone()).unwrap();
        assert!(printed.contains("#ab12c"));
        assert!(printed.contains("hello"));
    }
}
