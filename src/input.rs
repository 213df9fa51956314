//! Pointer gestures
//!
//! Two drag gestures drive the arena between ticks:
//! - Press on empty space, drag, release: spawn a body centered at the press
//!   point with the drag length as radius.
//! - Press on a body, drag, release: slingshot it opposite to the drag.
//!
//! The focused body is held by id and looked up on every use, never by
//! reference across ticks.

use glam::Vec2;

use crate::clamp_length;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::sim::{Arena, BodyId};

/// Current gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    /// Dragging out a new body from `origin`
    Spawning { origin: Vec2 },
    /// Pulling back an existing body
    Launching { body: BodyId },
}

/// What a completed gesture did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// Release without an active gesture
    None,
    Spawned(BodyId),
    Launched { body: BodyId, vel: Vec2 },
}

/// In-progress gesture feedback for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Preview {
    /// Circle that will be spawned on release
    SpawnCircle { center: Vec2, radius: f32 },
    /// Slingshot arrow from the body center in the launch direction
    LaunchArrow { from: Vec2, to: Vec2 },
}

/// Slingshot velocity for a drag vector (body center to pointer)
///
/// Points opposite to the drag, scales inversely with mass, and is capped at
/// `max_speed` with its direction preserved.
pub fn launch_velocity(drag: Vec2, mass: f32, coeff: f32, max_speed: f32) -> Vec2 {
    clamp_length(-coeff * drag / mass, max_speed)
}

/// Pointer state machine turning drags into arena mutations
#[derive(Debug, Clone)]
pub struct GestureController {
    gesture: Gesture,
    pointer: Vec2,
    hovered: Option<BodyId>,
    velocity_coeff: f32,
    max_speed: f32,
}

impl GestureController {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            gesture: Gesture::Idle,
            pointer: Vec2::ZERO,
            hovered: None,
            velocity_coeff: config.velocity_coeff,
            max_speed: config.max_launch_speed,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Body under the pointer while no gesture is active
    pub fn hovered(&self) -> Option<BodyId> {
        self.hovered
    }

    /// Body currently being launched
    pub fn focused(&self) -> Option<BodyId> {
        match self.gesture {
            Gesture::Launching { body } => Some(body),
            _ => None,
        }
    }

    pub fn pointer_move(&mut self, arena: &Arena, pos: Vec2) {
        self.pointer = pos;
        if self.gesture == Gesture::Idle {
            self.hovered = arena.body_at(pos);
        }
    }

    pub fn pointer_down(&mut self, arena: &Arena, pos: Vec2) {
        if self.gesture != Gesture::Idle {
            return;
        }
        self.pointer = pos;
        self.gesture = match arena.body_at(pos) {
            Some(body) => Gesture::Launching { body },
            None => Gesture::Spawning { origin: pos },
        };
    }

    /// Finish the active gesture
    ///
    /// The controller is back to idle afterwards even when the gesture is
    /// rejected.
    pub fn pointer_up(&mut self, arena: &mut Arena) -> Result<GestureOutcome> {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        match gesture {
            Gesture::Idle => Ok(GestureOutcome::None),
            Gesture::Spawning { origin } => {
                let radius = self.pointer.distance(origin);
                let id = arena.add_body(origin, radius).inspect_err(|e| {
                    log::warn!("Spawn rejected: {}", e);
                })?;
                Ok(GestureOutcome::Spawned(id))
            }
            Gesture::Launching { body } => {
                let target = arena.body_mut(body).ok_or(SimError::UnknownBody(body))?;
                let drag = self.pointer - target.pos;
                let vel = launch_velocity(drag, target.mass(), self.velocity_coeff, self.max_speed);
                target.set_velocity(vel);
                log::info!("Launched body {} at ({:.2}, {:.2})", body, vel.x, vel.y);
                Ok(GestureOutcome::Launched { body, vel })
            }
        }
    }

    /// Pointer left the drawing surface: finish the gesture as a release
    pub fn pointer_leave(&mut self, arena: &mut Arena) -> Result<GestureOutcome> {
        self.hovered = None;
        self.pointer_up(arena)
    }

    /// Feedback for the gesture in progress
    pub fn preview(&self, arena: &Arena) -> Option<Preview> {
        match self.gesture {
            Gesture::Idle => None,
            Gesture::Spawning { origin } => Some(Preview::SpawnCircle {
                center: origin,
                radius: self.pointer.distance(origin),
            }),
            Gesture::Launching { body } => {
                let from = arena.body(body)?.pos;
                let drag = self.pointer - from;
                Some(Preview::LaunchArrow {
                    from,
                    to: from - drag,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GestureController, Arena) {
        let config = SimConfig::default();
        (GestureController::new(&config), Arena::from_config(&config).unwrap())
    }

    #[test]
    fn test_spawn_gesture_creates_resting_body() {
        let (mut input, mut arena) = setup();
        input.pointer_down(&arena, Vec2::new(100.0, 100.0));
        input.pointer_move(&arena, Vec2::new(130.0, 100.0));
        assert_eq!(
            input.preview(&arena),
            Some(Preview::SpawnCircle {
                center: Vec2::new(100.0, 100.0),
                radius: 30.0
            })
        );

        let outcome = input.pointer_up(&mut arena).unwrap();
        let GestureOutcome::Spawned(id) = outcome else {
            panic!("expected spawn, got {outcome:?}");
        };
        let body = arena.body(id).unwrap();
        assert_eq!(body.pos, Vec2::new(100.0, 100.0));
        assert_eq!(body.radius(), 30.0);
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(input.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_click_without_drag_is_rejected() {
        let (mut input, mut arena) = setup();
        input.pointer_down(&arena, Vec2::new(100.0, 100.0));
        assert!(matches!(
            input.pointer_up(&mut arena),
            Err(SimError::InvalidRadius(_))
        ));
        assert!(arena.is_empty());
        assert_eq!(input.gesture(), Gesture::Idle);
    }

    #[test]
    fn test_launch_gesture_slingshots_opposite_to_drag() {
        let (mut input, mut arena) = setup();
        let id = arena.add_body(Vec2::new(500.0, 500.0), 10.0).unwrap();

        input.pointer_down(&arena, Vec2::new(502.0, 500.0));
        assert_eq!(input.focused(), Some(id));
        input.pointer_move(&arena, Vec2::new(520.0, 500.0));
        assert_eq!(
            input.preview(&arena),
            Some(Preview::LaunchArrow {
                from: Vec2::new(500.0, 500.0),
                to: Vec2::new(480.0, 500.0)
            })
        );

        let outcome = input.pointer_up(&mut arena).unwrap();
        // -100 * 20 / 100 = -20
        let expected = Vec2::new(-20.0, 0.0);
        assert_eq!(outcome, GestureOutcome::Launched { body: id, vel: expected });
        assert_eq!(arena.body(id).unwrap().vel, expected);
    }

    #[test]
    fn test_launch_speed_is_capped() {
        let vel = launch_velocity(Vec2::new(0.0, -500.0), 1.0, 100.0, 300.0);
        assert!((vel.length() - 300.0).abs() < 1e-3);
        assert!(vel.x.abs() < 1e-3 && vel.y > 0.0);
    }

    #[test]
    fn test_launch_of_missing_body_fails() {
        let (mut input, mut arena) = setup();
        let id = arena.add_body(Vec2::new(500.0, 500.0), 10.0).unwrap();
        input.pointer_down(&arena, Vec2::new(500.0, 500.0));

        let mut other = Arena::new(1000.0).unwrap();
        assert!(matches!(
            input.pointer_up(&mut other),
            Err(SimError::UnknownBody(b)) if b == id
        ));
    }

    #[test]
    fn test_hover_tracks_body_under_pointer() {
        let (mut input, mut arena) = setup();
        let id = arena.add_body(Vec2::new(200.0, 200.0), 25.0).unwrap();
        input.pointer_move(&arena, Vec2::new(210.0, 200.0));
        assert_eq!(input.hovered(), Some(id));
        input.pointer_move(&arena, Vec2::new(400.0, 200.0));
        assert_eq!(input.hovered(), None);
    }

    #[test]
    fn test_pointer_leave_completes_spawn() {
        let (mut input, mut arena) = setup();
        input.pointer_down(&arena, Vec2::new(300.0, 300.0));
        input.pointer_move(&arena, Vec2::new(300.0, 340.0));
        let outcome = input.pointer_leave(&mut arena).unwrap();
        assert!(matches!(outcome, GestureOutcome::Spawned(_)));
        assert_eq!(arena.bodies()[0].radius(), 40.0);
    }

    #[test]
    fn test_release_without_press_does_nothing() {
        let (mut input, mut arena) = setup();
        assert_eq!(input.pointer_up(&mut arena).unwrap(), GestureOutcome::None);
    }
}
