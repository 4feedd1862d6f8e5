use super::utils::chase_direction;
use super::*;
use crate::constants::{ADVERSARY_CHASE_PROBABILITY, ADVERSARY_RETHINK_TICKS};
use crate::motion::try_step;

impl<R: RandomSource> GameEngine<R> {
    pub(super) fn update_adversary(&mut self, idx: usize) {
        let target = self.player.pos;
        let Some(adversary) = self.adversaries.get_mut(idx) else {
            return;
        };

        adversary.direction_change_counter += 1;
        if adversary.direction_change_counter >= ADVERSARY_RETHINK_TICKS {
            adversary.dir = if self.rng.chance(ADVERSARY_CHASE_PROBABILITY) {
                chase_direction(adversary.pos, target)
            } else {
                random_direction(&mut self.rng)
            };
            adversary.direction_change_counter = 0;
        }

        match try_step(
            &self.maze,
            adversary.pos,
            adversary.dir,
            adversary.speed,
            adversary.radius,
        ) {
            Some(next) => adversary.pos = next,
            // Blocked: stay put with a fresh heading.
            None => adversary.dir = random_direction(&mut self.rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::tests::{pickup_corridor, scripted_engine, ScriptedRandom};
    use crate::engine::GameEngine;
    use crate::types::{Direction, InputEvent, Vec2};

    // Open 6x5 field of 40x30 px cells; the player sits at (60, 45).
    fn open_field() -> GameEngine<ScriptedRandom> {
        let mut layout = vec![vec![0; 6]; 5];
        layout[1][1] = 4;
        let mut engine = scripted_engine(vec![layout]);
        engine.handle_input(InputEvent::Confirm);
        engine.adversaries.truncate(1);
        engine
    }

    fn place(engine: &mut GameEngine<ScriptedRandom>, pos: Vec2, dir: Direction, counter: u32) {
        let adversary = &mut engine.adversaries[0];
        adversary.pos = pos;
        adversary.dir = dir;
        adversary.direction_change_counter = counter;
    }

    #[test]
    fn heading_is_only_reconsidered_every_sixty_ticks() {
        let mut engine = open_field();
        place(&mut engine, Vec2::new(180.0, 105.0), Direction::Right, 58);
        engine.rng.queue.extend([0.1]);

        engine.update_adversary(0);
        assert_eq!(engine.adversaries[0].dir, Direction::Right);
        assert_eq!(engine.adversaries[0].pos, Vec2::new(182.0, 105.0));
        assert_eq!(engine.adversaries[0].direction_change_counter, 59);
        assert_eq!(engine.rng.queue.len(), 1);

        // 0.1 < 0.7 chases: the player is further away horizontally.
        engine.update_adversary(0);
        assert_eq!(engine.adversaries[0].dir, Direction::Left);
        assert_eq!(engine.adversaries[0].pos, Vec2::new(180.0, 105.0));
        assert_eq!(engine.adversaries[0].direction_change_counter, 0);
    }

    #[test]
    fn failed_chase_roll_picks_a_random_heading() {
        let mut engine = open_field();
        place(&mut engine, Vec2::new(180.0, 105.0), Direction::Left, 59);
        // 0.9 fails the chase roll; 0.1 selects the first heading.
        engine.rng.queue.extend([0.9, 0.1]);

        engine.update_adversary(0);

        assert_eq!(engine.adversaries[0].dir, Direction::Up);
        assert_eq!(engine.adversaries[0].pos, Vec2::new(180.0, 103.0));
    }

    #[test]
    fn blocked_adversary_stays_and_rerolls_heading() {
        let mut engine = scripted_engine(vec![pickup_corridor()]);
        engine.handle_input(InputEvent::Confirm);
        let pocket = engine.adversaries[0].pos;
        engine.adversaries[0].dir = Direction::Up;
        engine.rng.queue.extend([0.6]);

        engine.update_adversary(0);

        assert_eq!(engine.adversaries[0].pos, pocket);
        assert_eq!(engine.adversaries[0].dir, Direction::Left);
        assert_eq!(engine.adversaries[0].direction_change_counter, 1);
    }

    #[test]
    fn adversary_wraps_at_the_screen_edge() {
        let mut engine = open_field();
        place(&mut engine, Vec2::new(1.0, 75.0), Direction::Left, 0);

        engine.update_adversary(0);

        assert_eq!(engine.adversaries[0].pos, Vec2::new(240.0, 75.0));
    }

    #[test]
    fn adversary_treats_a_walled_tunnel_exit_as_blocked() {
        let mut layout = vec![vec![1; 6]; 5];
        layout[1] = vec![0, 0, 0, 0, 4, 1];
        let mut engine = scripted_engine(vec![layout]);
        engine.handle_input(InputEvent::Confirm);
        engine.adversaries.truncate(1);
        place(&mut engine, Vec2::new(1.0, 45.0), Direction::Left, 0);
        // 0.9 selects the last heading.
        engine.rng.queue.extend([0.9]);

        engine.update_adversary(0);

        assert_eq!(engine.adversaries[0].pos, Vec2::new(1.0, 45.0));
        assert_eq!(engine.adversaries[0].dir, Direction::Right);

        engine.update_adversary(0);
        assert_eq!(engine.adversaries[0].pos, Vec2::new(3.0, 45.0));
    }
}
