// render.rs - ANSI terminal sink: clear screen, then one character per interior cell

use std::io::Write;
use std::thread;
use std::time::Duration;

use conway_csr::{ALIVE, Frame, GenerationSink, SinkError};

pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";      // Cursor home, clear screen
pub const LIVE_CHAR: char = '@';
pub const DEAD_CHAR: char = ' ';

/// Draws every generation it receives, optionally pausing between frames.
pub struct TerminalRenderer<W: Write> {
    out: W,
    delay: Duration,
    clear: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, delay: Duration) -> Self {
        Self { out, delay, clear: true }
    }

    /// Skip the clear-screen escape (useful when piping to a file).
    #[cfg(test)]
    pub fn without_clear(mut self) -> Self {
        self.clear = false;
        self
    }

    pub fn draw(&mut self, frame: &Frame) -> std::io::Result<()> {
        let mut text = String::with_capacity(
            (frame.topology.width() + 1) * frame.topology.height() + 32,
        );
        if self.clear {
            text.push_str(CLEAR_SCREEN);
        }
        text.push_str(&format!("Iteration: {}\n", frame.generation));
        for row in frame.interior_rows() {
            text.extend(row.iter().map(|&c| if c == ALIVE { LIVE_CHAR } else { DEAD_CHAR }));
            text.push('\n');
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> GenerationSink for TerminalRenderer<W> {
    fn accept(&mut self, frame: Frame) -> Result<(), SinkError> {
        self.draw(&frame)?;
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conway_csr::{GridTopology, Pattern, Simulation, SimulationConfig};

    #[test]
    fn draws_interior_only() {
        let topo = GridTopology::new(3, 2).unwrap();
        let state = Pattern::find("Blinker").unwrap().placed_at(&topo, 1, 0);
        let sim = Simulation::new(&SimulationConfig::new(3, 2, 1, 1), state).unwrap();

        let mut renderer = TerminalRenderer::new(Vec::new(), Duration::ZERO).without_clear();
        renderer.draw(&sim.frame()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(text, "Iteration: 0\n   \n@@@\n");
    }

    #[test]
    fn clears_before_each_frame_by_default() {
        let topo = GridTopology::new(1, 1).unwrap();
        let sim = Simulation::new(&SimulationConfig::new(1, 1, 1, 1), topo.empty_state()).unwrap();

        let mut renderer = TerminalRenderer::new(Vec::new(), Duration::ZERO);
        renderer.accept(sim.frame()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.starts_with(CLEAR_SCREEN));
        assert!(text.ends_with("Iteration: 0\n \n"));
    }
}
