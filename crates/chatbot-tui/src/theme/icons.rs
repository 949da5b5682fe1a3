//! Glyph sets for Unicode and ASCII terminals.

/// Icon mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconMode {
    /// Standard Unicode symbols.
    #[default]
    Unicode,
    /// ASCII-only fallback (also used with `NO_COLOR`).
    Ascii,
}

impl IconMode {
    /// Pick a mode from the environment, respecting `NO_COLOR`.
    pub fn from_env() -> Self {
        if std::env::var_os("NO_COLOR").is_some() {
            Self::Ascii
        } else {
            Self::Unicode
        }
    }
}

/// Icon set based on configured mode.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    mode: IconMode,
}

impl IconSet {
    /// Create a new icon set with the specified mode.
    pub fn new(mode: IconMode) -> Self {
        Self { mode }
    }

    /// Get the current icon mode.
    pub fn mode(&self) -> IconMode {
        self.mode
    }

    /// Marker in front of the selected message.
    pub fn selected(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "▶",
            IconMode::Ascii => ">",
        }
    }

    /// Marker on the message being edited.
    pub fn editing(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "✎",
            IconMode::Ascii => "*",
        }
    }

    /// Session indicator in the header.
    pub fn session(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "●",
            IconMode::Ascii => "*",
        }
    }

    /// Cursor block in the input bar.
    pub fn cursor(&self) -> &'static str {
        match self.mode {
            IconMode::Unicode => "█",
            IconMode::Ascii => "_",
        }
    }

    // === Spinner Frames (for animation) ===

    pub fn spinner_frames(&self) -> &'static [&'static str] {
        match self.mode {
            IconMode::Unicode => &["◐", "◓", "◑", "◒"],
            IconMode::Ascii => &["|", "/", "-", "\\"],
        }
    }

    /// Spinner frame for a tick counter.
    pub fn spinner(&self, tick: usize) -> &'static str {
        let frames = self.spinner_frames();
        frames[tick % frames.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unicode() {
        assert_eq!(IconSet::default().mode(), IconMode::Unicode);
    }

    #[test]
    fn test_ascii_icons_are_ascii() {
        let icons = IconSet::new(IconMode::Ascii);
        for icon in [icons.selected(), icons.editing(), icons.session(), icons.cursor()] {
            assert!(icon.is_ascii(), "{icon:?} is not ASCII");
        }
        assert!(icons.spinner_frames().iter().all(|f| f.is_ascii()));
    }

    #[test]
    fn test_spinner_wraps() {
        let icons = IconSet::new(IconMode::Unicode);
        assert_eq!(icons.spinner(0), icons.spinner(4));
        assert_ne!(icons.spinner(0), icons.spinner(1));
    }
}
