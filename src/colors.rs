use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy)]
pub struct Colors {
    pub error: &'static str,
    pub success: &'static str,
    enabled: bool,
}

impl Colors {
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self {
                error: "\x1b[31m",   // Red
                success: "\x1b[32m", // Green
                enabled: true,
            }
        } else {
            Self {
                error: "",
                success: "",
                enabled: false,
            }
        }
    }

    pub fn reset(&self) -> &'static str {
        if self.enabled {
            RESET
        } else {
            ""
        }
    }
}

/// Colours apply to diagnostics, which go to stderr.
pub fn should_use_colors(no_color: bool) -> bool {
    // Priority: --no-color > NO_COLOR env > TTY detection
    if no_color {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_colors_are_empty() {
        let colors = Colors::new(false);
        assert_eq!(colors.error, "");
        assert_eq!(colors.reset(), "");
    }

    #[test]
    fn test_enabled_colors_reset() {
        let colors = Colors::new(true);
        assert_eq!(colors.error, "\x1b[31m");
        assert_eq!(colors.reset(), RESET);
    }

    #[test]
    fn test_no_color_flag_wins() {
        assert!(!should_use_colors(true));
    }
}
