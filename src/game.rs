// one game is a value: every transition takes the state and hands back the next one
// the snake moves one block per tick in the current direction and can
// never reverse onto its own neck once it is longer than a single cell
use log::{debug, info, trace};
use rand::Rng;

use crate::config::GameConfig;
use crate::food;
use crate::input::{InputEvent, Key};
use crate::render::{
    Anchor, Color, DrawCommand, BACKGROUND_COLOR, CRITICAL_MSG_COLOR, FOOD_COLOR,
    ORDINARY_MSG_COLOR, SCORE_COLOR, SNAKE_COLOR,
};
use crate::snake::{Coordinates, Movement, Snake};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    StartMenu,
    Running,
    Paused,
    GameOver,
    Quit,
}

impl GamePhase {
    /// Phases that suspend the loop until the next input event.
    pub fn waits_for_input(&self) -> bool {
        matches!(
            self,
            GamePhase::StartMenu | GamePhase::Paused | GamePhase::GameOver
        )
    }
}

/// Keeps the current direction when the request would turn the head straight back
/// into the segment it just left. A one cell snake may turn any way it likes.
pub fn resolve(current: Movement, requested: Movement, snake_length: usize) -> Movement {
    if snake_length == 1 || requested != -current {
        requested
    } else {
        current
    }
}

/// Walls sit on the closed range `[0, width]` x `[0, height]`: only leaving it ends the game.
pub fn hits_wall(head: Coordinates, width: i32, height: i32) -> bool {
    head.x < 0 || head.x > width || head.y < 0 || head.y > height
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    config: GameConfig,
    phase: GamePhase,
    snake: Snake,
    movement: Movement,
    food: Coordinates,
}

impl GameState {
    pub fn new<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Self {
        // start in the middle of the surface, aligned to the grid
        let head = Coordinates::new(
            config.width / 2 / config.block * config.block,
            config.height / 2 / config.block * config.block,
        );
        let food = food::place_for(rng, head, &config);
        GameState {
            config,
            phase: GamePhase::StartMenu,
            snake: Snake::new(head),
            movement: Movement::STILL,
            food,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn movement(&self) -> Movement {
        self.movement
    }

    pub fn food(&self) -> Coordinates {
        self.food
    }

    pub fn score(&self) -> usize {
        self.snake.score()
    }

    fn enter(mut self, phase: GamePhase) -> Self {
        if self.phase != phase {
            info!("{:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
        self
    }

    fn steer(mut self, requested: Movement) -> Self {
        self.movement = resolve(self.movement, requested, self.snake.target_length());
        self
    }

    /// Applies one input event to the current phase.
    pub fn on_event<R: Rng + ?Sized>(self, event: InputEvent, rng: &mut R) -> Self {
        let block = self.config.block;
        match (self.phase, event) {
            (GamePhase::Quit, _) => self,
            (_, InputEvent::Quit) | (_, InputEvent::Key(Key::Escape)) => {
                self.enter(GamePhase::Quit)
            }
            (GamePhase::StartMenu, InputEvent::Key(_)) => self.enter(GamePhase::Running),
            (GamePhase::Running, InputEvent::Key(key)) => match key {
                Key::Left => self.steer(Movement::left(block)),
                Key::Right => self.steer(Movement::right(block)),
                Key::Up => self.steer(Movement::up(block)),
                Key::Down => self.steer(Movement::down(block)),
                Key::P => self.enter(GamePhase::Paused),
                _ => self,
            },
            (GamePhase::Paused, InputEvent::Key(Key::P)) => self.enter(GamePhase::Running),
            (GamePhase::GameOver, InputEvent::Key(Key::Space)) => {
                info!("restarting with a fresh game");
                GameState::new(self.config, rng)
            }
            _ => self,
        }
    }

    /// Advances a running game by one frame. Other phases are returned untouched.
    pub fn tick<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        if self.phase != GamePhase::Running {
            return self;
        }
        let head = self.snake.head() + self.movement;

        if hits_wall(head, self.config.width, self.config.height) {
            debug!("hit the wall at {}", head);
            self = self.enter(GamePhase::GameOver);
        } else if self.snake.bites(head) {
            debug!("bit itself at {}", head);
            self = self.enter(GamePhase::GameOver);
        }

        if head == self.food {
            self.food = food::place_for(rng, head, &self.config);
            self.snake.grow();
        }

        self.snake.advance(head);
        trace!("snake: {:?}", self.snake.body());
        self
    }

    fn message(text: &str, size: u32, color: Color, center: Coordinates) -> DrawCommand {
        DrawCommand::Text {
            text: text.to_string(),
            size,
            color,
            anchor: Anchor::Centered(center),
        }
    }

    /// Background, food, body and score, whatever the phase. The tick that ends
    /// the game still draws this so the last head position and score show up
    /// under the game over text.
    pub fn playfield(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(self.snake.len() + 3);
        commands.push(DrawCommand::Clear(BACKGROUND_COLOR));
        commands.push(DrawCommand::Rect {
            position: self.food,
            size: self.config.block,
            color: FOOD_COLOR,
        });
        commands.extend(self.snake.body().iter().map(|segment| DrawCommand::Rect {
            position: *segment,
            size: self.config.block,
            color: SNAKE_COLOR,
        }));
        commands.push(DrawCommand::Text {
            text: format!("Score: {}", self.score()),
            size: 25,
            color: SCORE_COLOR,
            anchor: Anchor::TopLeft(Coordinates::new(10, 10)),
        });
        commands
    }

    /// Draw commands for the current phase. Paused and game over only add
    /// their text on top of whatever frame is already on screen.
    pub fn frame(&self) -> Vec<DrawCommand> {
        let width = self.config.width;
        let height = self.config.height;
        match self.phase {
            GamePhase::StartMenu => vec![
                DrawCommand::Clear(BACKGROUND_COLOR),
                Self::message(
                    "SNAKE",
                    50,
                    CRITICAL_MSG_COLOR,
                    Coordinates::new(width / 2, height / 4),
                ),
                Self::message(
                    "Press any key to start the game",
                    30,
                    ORDINARY_MSG_COLOR,
                    Coordinates::new(width / 2, height / 3),
                ),
            ],
            GamePhase::Running => self.playfield(),
            GamePhase::Paused => vec![Self::message(
                "Game Paused. Press P to continue",
                30,
                CRITICAL_MSG_COLOR,
                Coordinates::new(width / 2, 3 * height / 7),
            )],
            GamePhase::GameOver => vec![
                Self::message(
                    "Game over",
                    50,
                    CRITICAL_MSG_COLOR,
                    Coordinates::new(width / 2, height / 4),
                ),
                Self::message(
                    "Press SPACE to play again or ESC to exit",
                    30,
                    CRITICAL_MSG_COLOR,
                    Coordinates::new(width / 2, height / 3),
                ),
            ],
            GamePhase::Quit => Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn with_snake(mut self, snake: Snake, movement: Movement) -> Self {
        self.snake = snake;
        self.movement = movement;
        self
    }

    #[cfg(test)]
    pub fn with_food(mut self, food: Coordinates) -> Self {
        self.food = food;
        self
    }
}
