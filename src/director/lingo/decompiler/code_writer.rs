// Code writer for generating Lingo source text

pub struct CodeWriter {
    output: String,
    indent_level: u32,
    at_line_start: bool,
    /// Trailing `--` comment for the current line.
    line_note: Option<String>,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            at_line_start: true,
            line_note: None,
        }
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn unindent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    pub fn write(&mut self, text: &str) {
        if self.at_line_start && !text.is_empty() {
            for _ in 0..self.indent_level {
                self.output.push_str("  ");
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn writeln(&mut self, text: &str) {
        self.write(text);
        self.end_line();
    }

    /// Attaches a comment to the end of the current line. Later notes on the
    /// same line are dropped.
    pub fn note(&mut self, text: &str) {
        if self.line_note.is_none() {
            self.line_note = Some(text.to_owned());
        }
    }

    pub fn end_line(&mut self) {
        if let Some(note) = self.line_note.take() {
            self.output.push_str(" -- ");
            self.output.push_str(&note);
        }
        self.output.push('\n');
        self.at_line_start = true;
    }

    /// Writes `items` separated by `", "`.
    pub fn write_list<T>(&mut self, items: &[T], mut write_item: impl FnMut(&mut CodeWriter, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            write_item(self, item);
        }
    }

    pub fn into_string(mut self) -> String {
        if let Some(note) = self.line_note.take() {
            self.output.push_str(" -- ");
            self.output.push_str(&note);
        }
        self.output
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
