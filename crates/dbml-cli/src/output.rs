use console::Term;

use crate::cli::GlobalOpts;
use crate::diagnostic::render_diagnostic;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

/// Output context derived from global flags.
///
/// Results go to stdout; status lines, warnings and errors go to stderr.
pub struct OutputContext {
    pub mode: OutputMode,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    /// Construct from global CLI options.
    pub fn from_global(global: &GlobalOpts) -> Self {
        let mode = match global.format.as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        };

        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode,
            quiet: global.quiet,
            use_color,
        }
    }

    /// Print the end-of-run summary of a human-mode run, tagged `ok` or
    /// `warning:`. Suppressed in quiet mode.
    pub fn summary(&self, ok: bool, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        let tag = if ok {
            self.paint("ok", console::Style::new().green().bold())
        } else {
            self.paint("warning:", console::Style::new().yellow().bold())
        };
        eprintln!("{tag} {msg}");
    }

    fn paint(&self, text: &str, style: console::Style) -> String {
        if self.use_color {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Print an error using the appropriate output mode.
    ///
    /// Single-file parse errors get a full source-highlighted diagnostic in
    /// human mode.
    pub fn print_error(&self, err: &CliError) {
        match self.mode {
            OutputMode::Human => {
                if let CliError::Parse {
                    error,
                    source_text,
                    file,
                } = err
                {
                    let report = render_diagnostic(error, source_text, &file.display().to_string());
                    eprintln!("{report:?}");
                } else {
                    let tag = self.paint("error:", console::Style::new().red().bold());
                    eprintln!("{tag} {err}");
                }
            }
            OutputMode::Json => {
                let json = err.to_json();
                eprintln!("{json}");
            }
            OutputMode::Plain => {
                eprintln!("error\t{err}");
            }
        }
    }

    /// Print JSON data to stdout.
    pub fn print_json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    /// Print a status message to stderr (human mode only, not in quiet mode).
    pub fn status(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        eprintln!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_global(format: &str, quiet: bool, no_color: bool) -> GlobalOpts {
        GlobalOpts {
            config: None,
            format: format.into(),
            verbose: 0,
            quiet,
            no_color,
        }
    }

    #[test]
    fn from_global_human_mode() {
        let ctx = OutputContext::from_global(&make_global("human", false, false));
        assert_eq!(ctx.mode, OutputMode::Human);
        assert!(!ctx.quiet);
    }

    #[test]
    fn from_global_json_mode() {
        let ctx = OutputContext::from_global(&make_global("json", false, false));
        assert_eq!(ctx.mode, OutputMode::Json);
    }

    #[test]
    fn from_global_plain_mode() {
        let ctx = OutputContext::from_global(&make_global("plain", false, false));
        assert_eq!(ctx.mode, OutputMode::Plain);
    }

    #[test]
    fn from_global_no_color_disables_color() {
        let ctx = OutputContext::from_global(&make_global("human", false, true));
        assert!(!ctx.use_color);
    }

    #[test]
    fn paint_without_color_is_plain_text() {
        let ctx = OutputContext::from_global(&make_global("human", false, true));
        assert_eq!(ctx.paint("ok", console::Style::new().green()), "ok");
    }

    #[test]
    fn paint_with_color_wraps_text() {
        let ctx = OutputContext {
            mode: OutputMode::Human,
            quiet: false,
            use_color: true,
        };
        let painted = ctx.paint("error:", console::Style::new().red().force_styling(true));
        assert!(painted.contains("error:"));
        assert_ne!(painted, "error:");
    }

    #[test]
    fn from_global_quiet_flag() {
        let ctx = OutputContext::from_global(&make_global("human", true, false));
        assert!(ctx.quiet);
    }
}
