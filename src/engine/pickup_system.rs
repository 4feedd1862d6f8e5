use super::*;
use crate::constants::pickup_score;

impl<R: RandomSource> GameEngine<R> {
    /// Collects every uncollected pickup whose box overlaps the player's.
    /// Collected pickups never score again.
    pub(super) fn resolve_pickups(&mut self) {
        let player_box = bounding_box(self.player.pos, self.player.radius);
        for pickup in self.pickups.iter_mut() {
            if pickup.collected || !player_box.intersects(&bounding_box(pickup.pos, pickup.radius)) {
                continue;
            }
            pickup.collected = true;
            self.score += pickup_score(pickup.kind);
            let (x, y) = (pickup.pos.x, pickup.pos.y);
            self.events.push(match pickup.kind {
                PickupKind::Dot => RuntimeEvent::DotEaten { x, y },
                PickupKind::Power => RuntimeEvent::PowerPickupTaken { x, y },
            });
        }
    }

    pub(super) fn check_level_complete(&mut self) {
        if self.pickups.iter().any(|pickup| !pickup.collected) {
            return;
        }
        self.levels_cleared += 1;
        self.events.push(RuntimeEvent::LevelCleared {
            level: self.level_index,
        });
        if self.level_index + 1 < self.levels.len() {
            self.set_state(GameState::LevelComplete);
        } else {
            self.set_state(GameState::Win);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::tests::{pickup_corridor, scripted_engine};
    use crate::types::{GameState, InputEvent, RuntimeEvent, Vec2};

    #[test]
    fn pickup_scores_once() {
        let mut engine = scripted_engine(vec![pickup_corridor()]);
        engine.handle_input(InputEvent::Confirm);
        let _ = engine.build_snapshot(true);
        engine.player.pos = Vec2::new(100.0, 45.0);

        engine.resolve_pickups();
        engine.resolve_pickups();

        assert_eq!(engine.score(), 10);
        assert_eq!(engine.remaining_pickups().len(), 2);
        assert_eq!(
            engine.build_snapshot(true).events,
            vec![RuntimeEvent::DotEaten { x: 100.0, y: 45.0 }]
        );
    }

    #[test]
    fn power_pickup_scores_fifty() {
        let mut engine = scripted_engine(vec![pickup_corridor()]);
        engine.handle_input(InputEvent::Confirm);
        let _ = engine.build_snapshot(true);
        engine.player.pos = Vec2::new(180.0, 45.0);

        engine.resolve_pickups();

        assert_eq!(engine.score(), 50);
        assert_eq!(
            engine.build_snapshot(true).events,
            vec![RuntimeEvent::PowerPickupTaken { x: 180.0, y: 45.0 }]
        );
    }

    #[test]
    fn edge_contact_does_not_collect() {
        let mut engine = scripted_engine(vec![pickup_corridor()]);
        engine.handle_input(InputEvent::Confirm);
        // Player box ends at x = 96, the dot box starts there.
        engine.player.pos = Vec2::new(81.0, 45.0);

        engine.resolve_pickups();

        assert_eq!(engine.score(), 0);
        assert_eq!(engine.remaining_pickups().len(), 3);
    }

    #[test]
    fn level_stays_open_while_pickups_remain() {
        let mut engine = scripted_engine(vec![pickup_corridor(), pickup_corridor()]);
        engine.handle_input(InputEvent::Confirm);
        engine.player.pos = Vec2::new(100.0, 45.0);
        engine.resolve_pickups();

        engine.check_level_complete();

        assert_eq!(engine.state(), GameState::Playing);
        assert_eq!(engine.build_summary().levels_cleared, 0);
    }

    #[test]
    fn clearing_a_level_reports_the_cleared_index() {
        let mut engine = scripted_engine(vec![pickup_corridor(), pickup_corridor()]);
        engine.handle_input(InputEvent::Confirm);
        let _ = engine.build_snapshot(true);
        for pickup in engine.pickups.iter_mut() {
            pickup.collected = true;
        }

        engine.check_level_complete();

        let events = engine.build_snapshot(true).events;
        assert_eq!(
            events,
            vec![
                RuntimeEvent::LevelCleared { level: 0 },
                RuntimeEvent::StateChanged {
                    from: GameState::Playing,
                    to: GameState::LevelComplete,
                },
            ]
        );
    }
}
