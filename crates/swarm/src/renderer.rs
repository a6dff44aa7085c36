//! Render composited frames to the user's terminal.

use color_eyre::eyre::Result;
use termwiz::surface::Change as TermwizChange;
use termwiz::terminal::buffered::BufferedTerminal;
use termwiz::terminal::{SystemTerminal, Terminal as TermwizTerminal};

/// Owns the user's terminal for as long as the app runs.
pub(crate) struct Renderer {
    /// The user's terminal, buffered so that only changed cells get redrawn.
    terminal: BufferedTerminal<SystemTerminal>,
    /// The terminal's width
    pub width: u16,
    /// The terminal's height
    pub height: u16,
}

impl Renderer {
    /// Take over the user's terminal: raw mode, which also enables mouse reporting, the alternate
    /// screen and a hidden cursor.
    pub fn new() -> Result<Self> {
        let mut terminal = Self::get_termwiz_terminal()?;

        tracing::debug!("Putting user's terminal into raw mode");
        terminal.set_raw_mode()?;
        terminal.enter_alternate_screen()?;

        let mut buffered = BufferedTerminal::new(terminal)?;
        buffered.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Hidden,
        ));
        buffered.flush()?;

        let (width, height) = buffered.dimensions();
        Ok(Self {
            terminal: buffered,
            width: width.try_into()?,
            height: height.try_into()?,
        })
    }

    /// A handle on the user's terminal.
    fn get_termwiz_terminal() -> Result<SystemTerminal> {
        let capabilities = termwiz::caps::Capabilities::new_from_env()?;
        Ok(SystemTerminal::new(capabilities)?)
    }

    /// The new size of the user's terminal, if it has changed since the last check.
    pub fn check_for_resize(&mut self) -> Result<Option<(u16, u16)>> {
        let is_resized = self.terminal.check_for_resize()?;
        if !is_resized {
            return Ok(None);
        }

        self.terminal.repaint()?;
        let (width, height) = self.terminal.dimensions();
        self.width = width.try_into()?;
        self.height = height.try_into()?;
        tracing::debug!("User's terminal resized to {}x{}", self.width, self.height);

        Ok(Some((self.width, self.height)))
    }

    /// Do a single render to the user's actual terminal. Only the cells that changed since the
    /// previous frame are sent.
    pub fn render(&mut self, frame: &crate::surface::Surface) -> Result<()> {
        self.terminal.draw_from_screen(&frame.surface, 0, 0);
        self.terminal.flush()?;
        Ok(())
    }

    /// Give the terminal back to the user how we found it.
    pub fn restore(&mut self) -> Result<()> {
        tracing::debug!("Setting user's terminal back to cooked mode");
        self.terminal.add_change(TermwizChange::CursorVisibility(
            termwiz::surface::CursorVisibility::Visible,
        ));
        self.terminal.flush()?;

        let terminal = self.terminal.terminal();
        terminal.exit_alternate_screen()?;
        terminal.set_cooked_mode()?;
        Ok(())
    }
}
