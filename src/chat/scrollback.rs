const DEFAULT_LINE_HEIGHT: f32 = 18.0;
/// Frames a reveal may take to land before the reported offset wins again.
const MAX_REVEAL_FRAMES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
    /// Status notices are drawn emphasised.
    pub notice: bool,
}

/// Append-only chat log with sticky-bottom tailing.
///
/// Geometry is in the same units the renderer reports back through
/// [`ChatLog::observe_viewport`]. Until the renderer has reported anything,
/// every line counts as `DEFAULT_LINE_HEIGHT` tall and the viewport is empty.
///
/// A reveal stays in flight from [`ChatLog::take_reveal`] until a reported
/// offset reaches the bottom. Meanwhile the reader counts as tailing, since
/// the renderer may animate towards the end over several frames.
#[derive(Debug, Clone)]
pub struct ChatLog {
    lines: Vec<LogLine>,
    scroll_top: f32,
    viewport_height: f32,
    content_height: f32,
    line_height: f32,
    reveal_pending: bool,
    /// Frames spent since the renderer was asked to reveal, if it was.
    reveal_in_flight: Option<u32>,
    last_reported: f32,
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            scroll_top: 0.0,
            viewport_height: 0.0,
            content_height: 0.0,
            line_height: DEFAULT_LINE_HEIGHT,
            reveal_pending: false,
            reveal_in_flight: None,
            last_reported: 0.0,
        }
    }

    pub fn lines(&self) -> &[LogLine] {
        &self.lines
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push_line(&mut self, text: impl Into<String>) {
        self.append(LogLine {
            text: text.into(),
            notice: false,
        });
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.append(LogLine {
            text: text.into(),
            notice: true,
        });
    }

    fn append(&mut self, line: LogLine) {
        let follow = self.is_at_bottom();
        self.lines.push(line);
        self.content_height += self.line_height;
        if follow {
            self.scroll_top = self.max_scroll();
            self.reveal_pending = true;
        }
    }

    /// True when the reader sits within one unit of the end, or a reveal
    /// towards the end has not landed yet.
    pub fn is_at_bottom(&self) -> bool {
        self.reveal_pending
            || self.reveal_in_flight.is_some()
            || self.scroll_top > self.content_height - self.viewport_height - 1.0
    }

    #[cfg(test)]
    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Moves the reader, clamped to the scrollable range. Cancels any reveal.
    pub fn scroll_to(&mut self, offset: f32) {
        self.reveal_pending = false;
        self.reveal_in_flight = None;
        self.scroll_top = offset.clamp(0.0, self.max_scroll());
    }

    /// Feeds back what the renderer actually laid out this frame.
    pub fn observe_viewport(
        &mut self,
        scroll_top: f32,
        viewport_height: f32,
        content_height: f32,
        line_height: f32,
    ) {
        self.viewport_height = viewport_height.max(0.0);
        self.content_height = content_height.max(0.0);
        if line_height > 0.0 {
            self.line_height = line_height;
        }
        let moved_up = scroll_top < self.last_reported;
        self.last_reported = scroll_top;

        if self.reveal_pending {
            // renderer has not been asked yet
            self.scroll_top = self.max_scroll();
            return;
        }
        match self.reveal_in_flight {
            Some(frames) => {
                let landed = scroll_top >= self.max_scroll() - 1.0;
                if landed || moved_up || frames >= MAX_REVEAL_FRAMES {
                    if !landed {
                        log::trace!("Reveal abandoned after {frames} frames at offset {scroll_top}");
                    }
                    self.scroll_to(scroll_top);
                } else {
                    self.reveal_in_flight = Some(frames + 1);
                    self.scroll_top = self.max_scroll();
                }
            }
            None => self.scroll_to(scroll_top),
        }
    }

    /// Whether the renderer should bring the newest line into view; resets the
    /// flag and marks the reveal in flight.
    pub fn take_reveal(&mut self) -> bool {
        let reveal = std::mem::take(&mut self.reveal_pending);
        if reveal {
            self.reveal_in_flight = Some(0);
        }
        reveal
    }
}
