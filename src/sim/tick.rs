//! Per-frame simulation tick
//!
//! Moves the bucket from input, spawns raindrops on the interval, drops
//! them by the fall speed and resolves catches and misses.

use rand::Rng;

use super::state::{GameEvent, GameState};

/// Input commands for a single tick, already in world units
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// World x of an active pointer press (bucket centers on it)
    pub pointer_x: Option<f32>,
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
}

/// Advance the game state by one frame of `dt` seconds
///
/// Negative or non-finite deltas count as zero. Returns the events of
/// this frame in the order they happened.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    rng: &mut impl Rng,
) -> Vec<GameEvent> {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut events = Vec::new();

    state.clock += f64::from(dt);

    // Pointer press jumps the bucket, keys nudge it
    let bucket = &mut state.bucket.rect;
    if let Some(x) = input.pointer_x {
        bucket.x = x - bucket.width / 2.0;
    }
    if input.left {
        bucket.x -= state.tuning.bucket_speed * dt;
    }
    if input.right {
        bucket.x += state.tuning.bucket_speed * dt;
    }
    bucket.clamp_x(state.tuning.world_width);

    if state.since_last_spawn() >= f64::from(state.tuning.spawn_interval) {
        let id = state.spawn_raindrop(rng);
        events.push(GameEvent::Spawned { id });
    }

    let fall = state.tuning.drop_speed * dt;
    let bucket = state.bucket.rect;
    let mut caught = 0;
    let mut missed = 0;

    state.raindrops.retain_mut(|drop| {
        drop.rect.y -= fall;
        if drop.rect.bottom() < 0.0 {
            log::debug!("Missed drop {}", drop.id);
            events.push(GameEvent::Missed { id: drop.id });
            missed += 1;
            false
        } else if drop.rect.overlaps(&bucket) {
            log::debug!("Caught drop {}", drop.id);
            events.push(GameEvent::Caught { id: drop.id });
            caught += 1;
            false
        } else {
            true
        }
    });

    state.caught += caught;
    state.missed += missed;

    events
}

/// Demo-mode input: chase the lowest raindrop that can still be caught
pub fn autopilot(state: &GameState) -> TickInput {
    let bucket = &state.bucket.rect;

    let target = state
        .raindrops
        .iter()
        .filter(|d| d.rect.top() > bucket.bottom())
        .min_by(|a, b| {
            a.rect
                .y
                .partial_cmp(&b.rect.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = target else {
        return TickInput::default();
    };

    // Dead zone so the bucket doesn't jitter once lined up
    let offset = target.rect.center().x - bucket.center().x;
    let dead_zone = bucket.width / 8.0;
    TickInput {
        pointer_x: None,
        left: offset < -dead_zone,
        right: offset > dead_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::DropSprite;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }

    #[test]
    fn test_keys_move_and_clamp() {
        let mut rng = rng();
        let mut state = GameState::empty(Tuning::default());
        let left = TickInput {
            left: true,
            ..Default::default()
        };

        tick(&mut state, &left, 0.5, &mut rng);
        assert_eq!(state.bucket.rect.x, 268.0);

        // Far more than enough to hit the wall
        tick(&mut state, &left, 10.0, &mut rng);
        assert_eq!(state.bucket.rect.x, 0.0);

        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 10.0, &mut rng);
        assert_eq!(state.bucket.rect.x, 736.0);

        // Both held cancel out
        let both = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        tick(&mut state, &both, 0.5, &mut rng);
        assert_eq!(state.bucket.rect.x, 736.0);
    }

    #[test]
    fn test_pointer_centers_bucket() {
        let mut rng = rng();
        let mut state = GameState::empty(Tuning::default());
        let input = TickInput {
            pointer_x: Some(100.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.0, &mut rng);
        assert_eq!(state.bucket.rect.x, 68.0);

        // Pointer near the edge is clamped
        let input = TickInput {
            pointer_x: Some(5.0),
            ..Default::default()
        };
        tick(&mut state, &input, 0.0, &mut rng);
        assert_eq!(state.bucket.rect.x, 0.0);
    }

    #[test]
    fn test_drop_missed_after_falling_past_bottom() {
        let mut rng = rng();
        let mut state = GameState::empty(Tuning::default());
        let id = state.push_raindrop(0.0, 480.0, DropSprite::Droplet);
        let input = TickInput::default();

        // 2.25s: still above the bottom edge
        for _ in 0..9 {
            let events = tick(&mut state, &input, 0.25, &mut rng);
            assert!(!events.contains(&GameEvent::Missed { id }));
        }
        let drop = state.raindrops.iter().find(|d| d.id == id).unwrap();
        assert_eq!(drop.rect.y, 30.0);
        assert_eq!(state.missed, 0);

        // 2.5s: past it
        let events = tick(&mut state, &input, 0.25, &mut rng);
        assert!(events.contains(&GameEvent::Missed { id }));
        assert_eq!(state.missed, 1);
        assert_eq!(state.caught, 0);
        assert!(state.raindrops.iter().all(|d| d.id != id));
    }

    #[test]
    fn test_drop_caught_once() {
        let mut rng = rng();
        let mut state = GameState::empty(Tuning::default());
        // Directly above the bucket, just out of reach
        let id = state.push_raindrop(368.0, 88.0, DropSprite::Ice);
        let input = TickInput::default();

        let events = tick(&mut state, &input, 0.025, &mut rng);
        assert_eq!(events, vec![GameEvent::Caught { id }]);
        assert_eq!(state.caught, 1);
        assert_eq!(state.missed, 0);
        assert!(state.raindrops.is_empty());

        let events = tick(&mut state, &input, 0.025, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.caught, 1);
    }

    #[test]
    fn test_below_bottom_is_miss_not_catch() {
        let mut rng = rng();
        let mut state = GameState::empty(Tuning::default());
        // Overlaps the bucket horizontally, but this frame takes it below zero
        let id = state.push_raindrop(368.0, 1.0, DropSprite::Fire);
        let events = tick(&mut state, &TickInput::default(), 0.01, &mut rng);
        assert_eq!(events, vec![GameEvent::Missed { id }]);
        assert_eq!(state.missed, 1);
        assert_eq!(state.caught, 0);
    }

    #[test]
    fn test_spawn_interval() {
        let mut rng = rng();
        let mut state = GameState::new(Tuning::default(), &mut rng);
        let input = TickInput::default();

        let events = tick(&mut state, &input, 0.5, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.raindrops.len(), 1);

        let events = tick(&mut state, &input, 0.5, &mut rng);
        assert!(matches!(events.as_slice(), [GameEvent::Spawned { .. }]));
        assert_eq!(state.raindrops.len(), 2);
        assert_eq!(state.last_spawn_at, 1.0);
    }

    #[test]
    fn test_three_one_second_frames_spawn_at_least_twice() {
        let mut rng = rng();
        let mut state = GameState::new(Tuning::default(), &mut rng);
        let mut spawns = 0;
        for _ in 0..3 {
            let events = tick(&mut state, &TickInput::default(), 1.0, &mut rng);
            spawns += events
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { .. }))
                .count();
        }
        assert!(spawns >= 2, "only {} spawns", spawns);
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut rng = rng();
        let mut state = GameState::new(Tuning::default(), &mut rng);
        let before = state.raindrops[0].rect.y;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &input, -1.0, &mut rng);
        assert_eq!(state.raindrops[0].rect.y, before);
        assert_eq!(state.bucket.rect.x, 368.0);
        assert_eq!(state.clock, 0.0);
    }

    #[test]
    fn test_new_drop_moves_in_its_spawn_frame() {
        let mut rng = rng();
        let mut state = GameState::empty(Tuning::default());
        state.clock = 0.9;
        let events = tick(&mut state, &TickInput::default(), 0.1, &mut rng);
        assert_eq!(events.len(), 1);
        assert!((state.raindrops[0].rect.y - 460.0).abs() < 1e-3);
    }

    #[test]
    fn test_autopilot_chases_lowest_drop() {
        let mut state = GameState::empty(Tuning::default());
        state.push_raindrop(700.0, 400.0, DropSprite::Droplet);
        state.push_raindrop(10.0, 200.0, DropSprite::Droplet);

        let input = autopilot(&state);
        assert!(input.left);
        assert!(!input.right);

        // Lined up: no movement
        state.bucket.rect.x = 10.0;
        let input = autopilot(&state);
        assert!(!input.left && !input.right);

        // Nothing to chase
        let empty = GameState::empty(Tuning::default());
        assert_eq!(autopilot(&empty), TickInput::default());
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = GameState::new(Tuning::default(), &mut rng1);
        let mut state2 = GameState::new(Tuning::default(), &mut rng2);

        for _ in 0..600 {
            let input = autopilot(&state1);
            tick(&mut state1, &input, 1.0 / 60.0, &mut rng1);
            let input = autopilot(&state2);
            tick(&mut state2, &input, 1.0 / 60.0, &mut rng2);
        }

        assert_eq!(state1.caught, state2.caught);
        assert_eq!(state1.missed, state2.missed);
        assert_eq!(state1.raindrops.len(), state2.raindrops.len());
        assert_eq!(state1.bucket.rect.x, state2.bucket.rect.x);
    }
}
