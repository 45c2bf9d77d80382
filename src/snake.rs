// the snake is stored tail first, head last
// it grows towards a target length: eating bumps the target and the
// tail stops being trimmed until the body catches up
use std::collections::VecDeque;
use std::fmt;
use std::ops::{Add, Neg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub x: i32,
    pub y: i32,
}

impl Coordinates {
    pub fn new(x: i32, y: i32) -> Coordinates {
        Coordinates { x, y }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add<Movement> for Coordinates {
    type Output = Coordinates;

    fn add(self, movement: Movement) -> Coordinates {
        Coordinates::new(self.x + movement.dx, self.y + movement.dy)
    }
}

/// Displacement applied to the head on every tick, one block in a single axis
/// or nothing at all before the first key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Movement {
    pub dx: i32,
    pub dy: i32,
}

impl Movement {
    pub const STILL: Movement = Movement { dx: 0, dy: 0 };

    pub fn left(block: i32) -> Movement {
        Movement { dx: -block, dy: 0 }
    }
    pub fn right(block: i32) -> Movement {
        Movement { dx: block, dy: 0 }
    }
    pub fn up(block: i32) -> Movement {
        Movement { dx: 0, dy: -block }
    }
    pub fn down(block: i32) -> Movement {
        Movement { dx: 0, dy: block }
    }
}

impl Neg for Movement {
    type Output = Movement;

    fn neg(self) -> Movement {
        Movement {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coordinates>, // The head is the last element
    head: Coordinates,
    target_length: usize,
}

impl Snake {
    pub fn new(head: Coordinates) -> Snake {
        let mut body = VecDeque::new();
        body.push_back(head);
        Snake {
            body,
            head,
            target_length: 1,
        }
    }

    pub fn head(&self) -> Coordinates {
        self.head
    }

    pub fn body(&self) -> &VecDeque<Coordinates> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    /// Points shown to the player: ten per food eaten.
    pub fn score(&self) -> usize {
        (self.target_length - 1) * 10
    }

    /// True when `head` lands on any segment older than the current head.
    /// The current head is skipped so a snake standing still never bites itself.
    pub fn bites(&self, head: Coordinates) -> bool {
        self.body
            .iter()
            .rev()
            .skip(1)
            .any(|segment| *segment == head)
    }

    pub fn advance(&mut self, new_head: Coordinates) {
        // a tick that did not move the head must not duplicate it,
        // otherwise the visible tail would shrink
        if new_head != self.head {
            self.body.push_back(new_head);
            self.head = new_head;
        }
        while self.body.len() > self.target_length {
            self.body.pop_front();
        }
    }

    #[cfg(test)]
    pub fn from_segments(segments: &[Coordinates]) -> Snake {
        Snake {
            body: segments.iter().copied().collect(),
            head: segments[segments.len() - 1],
            target_length: segments.len(),
        }
    }
}
