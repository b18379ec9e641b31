const INDENT: &str = "    ";

/// Line buffer with a current indentation depth.
///
/// The indentation is applied when a line is appended, never afterwards.
#[derive(Debug, Default)]
pub struct Emitter {
    lines: Vec<String>,
    depth: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            lines: vec![],
            depth: 0,
        }
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        self.lines
            .push(format!("{}{}", INDENT.repeat(self.depth), text.as_ref()));
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}
