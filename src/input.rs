// keyboard input arrives as raw bytes on stdin
// a reader thread forwards whole read() chunks so an arrow key's escape
// sequence is never split between two drains
use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use circular_buffer::CircularBuffer;
use log::{debug, warn};
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW};

type InputBuffer = CircularBuffer<1024, u8>; // 1024 bytes in input buffer

const ESC: u8 = 27;
const CSI: u8 = 91; // '['
const CTRL_C: u8 = 3;
const CTRL_D: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    P,
    Escape,
    Space,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(Key),
    /// The player closed the game window (Ctrl-C, Ctrl-D or stdin closed).
    Quit,
}

/// Where the game loop gets its events from.
pub trait EventSource {
    /// Blocks until the next event.
    fn wait(&mut self) -> InputEvent;
    /// Returns the next pending event, if any, without blocking.
    fn poll(&mut self) -> Option<InputEvent>;
}

pub struct KeyDecoder {
    buffer: InputBuffer,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        KeyDecoder {
            buffer: InputBuffer::new(),
        }
    }
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one chunk of stdin into events.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<InputEvent> {
        for byte in chunk {
            // if the buffer is full, ignore the input
            if self.buffer.is_full() {
                warn!("input buffer full, dropping key bytes");
                break;
            }
            self.buffer.push_back(*byte);
        }
        let mut events = Vec::new();
        while let Some(event) = self.next_event() {
            events.push(event);
        }
        // a chunk cut short in the middle of "ESC [" can not be completed later
        self.buffer.clear();
        events
    }

    fn next_event(&mut self) -> Option<InputEvent> {
        loop {
            let first = *self.buffer.nth_front(0)?;
            if first != ESC {
                self.buffer.pop_front();
                return Some(Self::plain_key(first));
            }
            match self.buffer.nth_front(1).copied() {
                // a lone escape at the end of a chunk is the Escape key itself
                None => {
                    self.buffer.pop_front();
                    return Some(InputEvent::Key(Key::Escape));
                }
                Some(CSI) => {
                    // arrows keys are long 3 bytes, first 2 need to be 27 and 91
                    let third = *self.buffer.nth_front(2)?;
                    self.buffer.pop_front();
                    self.buffer.pop_front();
                    self.buffer.pop_front();
                    match third {
                        65 => return Some(InputEvent::Key(Key::Up)),
                        66 => return Some(InputEvent::Key(Key::Down)),
                        67 => return Some(InputEvent::Key(Key::Right)),
                        68 => return Some(InputEvent::Key(Key::Left)),
                        _ => {
                            // other escape sequences (function keys...) are skipped
                            debug!("ignoring escape sequence ending in {}", third);
                        }
                    }
                }
                Some(_) => {
                    self.buffer.pop_front();
                    return Some(InputEvent::Key(Key::Escape));
                }
            }
        }
    }

    fn plain_key(byte: u8) -> InputEvent {
        match byte {
            CTRL_C | CTRL_D => InputEvent::Quit,
            b'p' | b'P' => InputEvent::Key(Key::P),
            b' ' => InputEvent::Key(Key::Space),
            other => InputEvent::Key(Key::Other(other)),
        }
    }
}

fn spawn_stdin_channel() -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel::<Vec<u8>>();
    thread::spawn(move || {
        let mut reader = io::stdin();
        let mut buffer = [0u8; 64];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(read) => {
                    if tx.send(buffer[..read].to_vec()).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        // dropping tx disconnects the channel, which the game sees as a quit
    });
    rx
}

pub struct TerminalInput {
    rx: Receiver<Vec<u8>>,
    decoder: KeyDecoder,
    pending: VecDeque<InputEvent>,
}

impl TerminalInput {
    pub fn spawn() -> Self {
        TerminalInput {
            rx: spawn_stdin_channel(),
            decoder: KeyDecoder::new(),
            pending: VecDeque::new(),
        }
    }

    fn queue(&mut self, chunk: &[u8]) {
        let events = self.decoder.feed(chunk);
        self.pending.extend(events);
    }
}

impl EventSource for TerminalInput {
    fn wait(&mut self) -> InputEvent {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return event;
            }
            match self.rx.recv() {
                Ok(chunk) => self.queue(&chunk),
                Err(_) => return InputEvent::Quit,
            }
        }
    }

    fn poll(&mut self) -> Option<InputEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            match self.rx.try_recv() {
                Ok(chunk) => self.queue(&chunk),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => return Some(InputEvent::Quit),
            }
        }
    }
}

/// Puts stdin in raw mode and hides the cursor until dropped.
pub struct RawTerminal {
    old_termios: Termios,
}

impl RawTerminal {
    pub fn enable() -> io::Result<Self> {
        let old_termios = Termios::from_fd(0)?; // 0 is file descriptor for stdin
        let mut new_termios = old_termios;
        // no echo, no canonical mode and Ctrl-C delivered as a byte
        new_termios.c_lflag &= !(ICANON | ECHO | ISIG);
        tcsetattr(0, TCSANOW, &new_termios)?;
        let mut stdout = io::stdout();
        // clear screen, cursor home, hide cursor
        write!(stdout, "\x1b[2J\x1b[1;1H\x1b[?25l")?;
        stdout.flush()?;
        Ok(RawTerminal { old_termios })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        // reset stdin to default
        if let Err(err) = tcsetattr(0, TCSANOW, &self.old_termios) {
            warn!("failed to restore terminal: {}", err);
        }
        let mut stdout = io::stdout();
        // reset colours, clear screen, cursor home, show cursor
        let _ = write!(stdout, "\x1b[0m\x1b[2J\x1b[1;1H\x1b[?25h");
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_sequences() {
        let mut decoder = KeyDecoder::new();
        let events = decoder.feed(&[27, 91, 65, 27, 91, 66, 27, 91, 67, 27, 91, 68]);
        assert_eq!(
            events,
            vec![
                InputEvent::Key(Key::Up),
                InputEvent::Key(Key::Down),
                InputEvent::Key(Key::Right),
                InputEvent::Key(Key::Left),
            ]
        );
    }

    #[test]
    fn test_lone_escape_and_plain_keys() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed(&[27]), vec![InputEvent::Key(Key::Escape)]);
        assert_eq!(
            decoder.feed(b"pP x"),
            vec![
                InputEvent::Key(Key::P),
                InputEvent::Key(Key::P),
                InputEvent::Key(Key::Space),
                InputEvent::Key(Key::Other(b'x')),
            ]
        );
    }

    #[test]
    fn test_escape_followed_by_other_byte() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(
            decoder.feed(&[27, b'q']),
            vec![InputEvent::Key(Key::Escape), InputEvent::Key(Key::Other(b'q'))]
        );
    }

    #[test]
    fn test_control_bytes_quit() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.feed(&[3]), vec![InputEvent::Quit]);
        assert_eq!(decoder.feed(&[4]), vec![InputEvent::Quit]);
    }

    #[test]
    fn test_unknown_and_truncated_sequences_are_dropped() {
        let mut decoder = KeyDecoder::new();
        // F-key style sequence, then a truncated one
        assert_eq!(decoder.feed(&[27, 91, 72, b' ']), vec![InputEvent::Key(Key::Space)]);
        assert!(decoder.feed(&[27, 91]).is_empty());
        // nothing left over from the truncated chunk
        assert_eq!(decoder.feed(&[65]), vec![InputEvent::Key(Key::Other(65))]);
    }

    #[test]
    fn test_overflowing_chunk_is_truncated() {
        let mut decoder = KeyDecoder::new();
        let chunk = vec![b' '; 2000];
        assert_eq!(decoder.feed(&chunk).len(), 1024);
    }

    #[test]
    fn test_terminal_input_reports_closed_channel_as_quit() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput {
            rx,
            decoder: KeyDecoder::new(),
            pending: VecDeque::new(),
        };
        tx.send(vec![27, 91, 68, b'p']).unwrap();
        assert_eq!(input.poll(), Some(InputEvent::Key(Key::Left)));
        assert_eq!(input.wait(), InputEvent::Key(Key::P));
        assert_eq!(input.poll(), None);
        drop(tx);
        assert_eq!(input.poll(), Some(InputEvent::Quit));
        assert_eq!(input.wait(), InputEvent::Quit);
    }
}
