//! The Elm-architecture application loop: [`Model`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! Everything runs on one thread. The driver pushes input into a channel,
//! the app drains it one message at a time through [`Model::update`], then
//! redraws and flushes only the cells that changed.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::messages::Msg;
use crate::screen::{Screen, compute_frame, Frame};

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Stop the application loop.
    End,
}

// ---------------------------------------------------------------------------
// Model trait
// ---------------------------------------------------------------------------

/// The application model (Elm architecture).
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg) -> Option<Effect>;

    /// Render the current state into `screen`.
    fn draw(&self, screen: &mut Screen);
}

// ---------------------------------------------------------------------------
// Driver trait
// ---------------------------------------------------------------------------

/// Back-end driver (e.g. a terminal).
pub trait Driver {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Poll for input, sending any messages through `tx`. Should return
    /// promptly (within a frame) even when there is no input.
    fn poll_msgs(&mut self, tx: &Sender<Msg>) -> Result<(), Box<dyn std::error::Error>>;

    /// Flush a computed frame to the screen.
    fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Clean up / restore the terminal.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// AppConfig / App
// ---------------------------------------------------------------------------

/// Configuration for creating an [`App`].
pub struct AppConfig<M: Model, D: Driver> {
    pub model: M,
    pub driver: D,
    pub width: i32,
    pub height: i32,
}

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    width: i32,
    height: i32,
}

impl<M: Model, D: Driver> App<M, D> {
    /// Create a new application from a configuration.
    pub fn new(config: AppConfig<M, D>) -> Self {
        Self {
            model: config.model,
            driver: config.driver,
            width: config.width,
            height: config.height,
        }
    }

    /// Borrow the model, e.g. to inspect it after [`run`](App::run).
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Borrow the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the main Model-View-Update loop.
    ///
    /// 1. Initialises the driver.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: poll → update → draw → diff → flush.
    /// 4. Stops when the model returns [`Effect::End`]. The driver is
    ///    closed on every exit path.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.driver.init()?;
        let result = self.event_loop();
        self.driver.close();
        result
    }

    fn event_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
        tx.send(Msg::Init).ok();

        let mut prev = Screen::new(self.width, self.height);
        let mut curr = Screen::new(self.width, self.height);

        loop {
            if self.process_pending(&rx, &mut prev, &mut curr)? {
                log::debug!("model requested exit");
                return Ok(());
            }
            self.driver.poll_msgs(&tx)?;
        }
    }

    /// Drain queued messages, update the model, draw, diff, and flush.
    /// Returns `true` when the app should stop.
    fn process_pending(
        &mut self,
        rx: &Receiver<Msg>,
        prev: &mut Screen,
        curr: &mut Screen,
    ) -> Result<bool, Box<dyn std::error::Error>> {
        let mut needs_draw = false;
        let mut stop = false;

        while let Ok(msg) = rx.try_recv() {
            needs_draw = true;
            if let Some(Effect::End) = self.model.update(msg) {
                stop = true;
                break;
            }
        }

        if needs_draw && !stop {
            self.model.draw(curr);
            let frame = compute_frame(prev, curr);
            if !frame.cells.is_empty() {
                self.driver.flush(frame)?;
            }
            prev.clone_from(curr);
        }

        Ok(stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Key;
    use crate::style::Style;
    use twenty48_core::Point;

    /// Counts `+` presses and prints the count.
    struct Counter {
        n: i32,
        inits: i32,
    }

    impl Model for Counter {
        fn update(&mut self, msg: Msg) -> Option<Effect> {
            match msg {
                Msg::Init => self.inits += 1,
                Msg::KeyDown {
                    key: Key::Char('+'),
                    ..
                } => self.n += 1,
                Msg::Quit => return Some(Effect::End),
                _ => {}
            }
            None
        }

        fn draw(&self, screen: &mut Screen) {
            screen.print(Point::ZERO, &format!("n={}", self.n), Style::default());
        }
    }

    /// Feeds one batch of messages per poll; quits when out of batches.
    struct Scripted {
        batches: Vec<Vec<Msg>>,
        frames: Vec<Frame>,
        closed: bool,
    }

    impl Driver for Scripted {
        fn init(&mut self) -> Result<(), Box<dyn std::error::Error>> {
            self.batches.reverse();
            Ok(())
        }

        fn poll_msgs(&mut self, tx: &Sender<Msg>) -> Result<(), Box<dyn std::error::Error>> {
            match self.batches.pop() {
                Some(batch) => batch.into_iter().for_each(|m| {
                    tx.send(m).ok();
                }),
                None => {
                    tx.send(Msg::Quit).ok();
                }
            }
            Ok(())
        }

        fn flush(&mut self, frame: Frame) -> Result<(), Box<dyn std::error::Error>> {
            self.frames.push(frame);
            Ok(())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    #[test]
    fn runs_until_end_and_flushes_diffs() {
        let plus = || Msg::key(Key::Char('+'));
        let mut app = App::new(AppConfig {
            model: Counter { n: 0, inits: 0 },
            driver: Scripted {
                batches: vec![vec![plus(), plus()], vec![], vec![Msg::key(Key::Enter)], vec![plus()]],
                frames: Vec::new(),
                closed: false,
            },
            width: 8,
            height: 1,
        });
        app.run().unwrap();

        assert_eq!(app.model().n, 3);
        assert_eq!(app.model().inits, 1);
        assert!(app.driver().closed);

        let frames = &app.driver().frames;
        // Init draws "n=0"; two presses draw "n=2"; Enter changes nothing
        // visible; the last press draws "n=3".
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].cells.len(), 3);
        assert_eq!(frames[1].cells.len(), 1);
        assert_eq!(frames[1].cells[0].cell.ch, '2');
        assert_eq!(frames[2].cells[0].cell.ch, '3');
    }
}
