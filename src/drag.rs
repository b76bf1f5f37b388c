use crate::animation::{Animator, Pose};
use crate::config::SwipeConfig;
use crate::direction::{classify_with, Classification, Direction};
use crate::session::{CommitTicket, Session};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEvent {
    pub index: usize,
    pub dx: f64,
    pub dy: f64,
    pub active: bool,
    pub velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub dx: f64,
    pub dy: f64,
    pub velocity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    Ignored,
    Moved {
        indicator: Option<Classification>,
        pose: Pose,
    },
    Committed(CommitTicket),
    SnappedBack,
}

#[derive(Debug, Clone)]
pub struct DragTracker {
    config: SwipeConfig,
    state: Option<DragState>,
    indicator: Option<Classification>,
}

impl DragTracker {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            state: None,
            indicator: None,
        }
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn indicator(&self) -> Option<Classification> {
        self.indicator
    }

    pub fn set_indicator(&mut self, indicator: Option<Classification>) {
        self.indicator = indicator;
    }

    pub fn reset(&mut self) {
        self.state = None;
        self.indicator = None;
    }

    pub fn hint_direction(&self, dx: f64, dy: f64) -> Option<Direction> {
        classify_with(dx, dy, self.config.hint_threshold, self.config.tie_break)
    }

    pub fn release_direction(&self, dx: f64, dy: f64) -> Option<Direction> {
        let direction = self.hint_direction(dx, dy)?;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance > self.config.commit_threshold {
            Some(direction)
        } else {
            None
        }
    }

    pub fn live_pose(&self, dx: f64, dy: f64) -> Pose {
        Pose {
            x: dx,
            y: dy,
            rotation: dx / self.config.rotation_divisor,
            scale: self.config.drag_scale,
            opacity: 1.0,
        }
    }

    pub fn on_drag_event(
        &mut self,
        event: DragEvent,
        session: &mut Session,
        animator: &mut Animator,
    ) -> DragOutcome {
        if !session.accepts_input(event.index) {
            return DragOutcome::Ignored;
        }

        if event.active {
            let indicator = self
                .hint_direction(event.dx, event.dy)
                .map(Direction::classification);
            let pose = if event.dx.is_finite() && event.dy.is_finite() {
                self.live_pose(event.dx, event.dy)
            } else {
                Pose::CENTER
            };
            self.state = Some(DragState {
                dx: event.dx,
                dy: event.dy,
                velocity: event.velocity,
            });
            self.indicator = indicator;
            animator.drag(event.index, session.cursor(), pose);
            return DragOutcome::Moved { indicator, pose };
        }

        self.state = None;
        let committed = self
            .release_direction(event.dx, event.dy)
            .and_then(|direction| session.commit(event.index, direction));

        match committed {
            Some(ticket) => {
                self.indicator = Some(ticket.classification);
                animator.fly_off(ticket.index, ticket.direction);
                DragOutcome::Committed(ticket)
            }
            None => {
                debug!(
                    "Snapping back card {} (dx={:.1}, dy={:.1}, v={:.2})",
                    event.index, event.dx, event.dy, event.velocity
                );
                self.indicator = None;
                animator.snap_back(event.index);
                DragOutcome::SnappedBack
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Card;

    fn setup(count: usize) -> (DragTracker, Session, Animator) {
        let config = SwipeConfig::default();
        let cards = (0..count)
            .map(|i| Card {
                id: format!("card-{}", i),
                image_ref: String::new(),
                price: 20.0,
            })
            .collect();
        let session = Session::new(cards);
        let animator = Animator::new(count, 0, &config);
        (DragTracker::new(config), session, animator)
    }

    fn event(index: usize, dx: f64, dy: f64, active: bool) -> DragEvent {
        DragEvent {
            index,
            dx,
            dy,
            active,
            velocity: 0.5,
        }
    }

    #[test]
    fn active_drag_updates_pose_and_indicator_every_event() {
        let (mut tracker, mut session, mut animator) = setup(2);

        let outcome = tracker.on_drag_event(event(0, 10.0, 0.0, true), &mut session, &mut animator);
        assert!(matches!(outcome, DragOutcome::Moved { indicator: None, .. }));

        let outcome = tracker.on_drag_event(event(0, -35.0, 4.0, true), &mut session, &mut animator);
        let DragOutcome::Moved { indicator, pose } = outcome else {
            panic!("expected a move, got {:?}", outcome);
        };
        assert_eq!(indicator, Some(Classification::Reject));
        assert_eq!(pose.x, -35.0);
        assert_eq!(pose.rotation, -3.5);
        assert_eq!(pose.scale, 1.05);
        assert_eq!(animator.visual(0).unwrap().pose, pose);
        assert_eq!(tracker.indicator(), Some(Classification::Reject));
        assert!(tracker.state().is_some());
        assert!(session.history().is_empty());
    }

    #[test]
    fn release_past_gate_commits_and_flies_off() {
        let (mut tracker, mut session, mut animator) = setup(2);
        tracker.on_drag_event(event(0, 40.0, 0.0, true), &mut session, &mut animator);
        let outcome = tracker.on_drag_event(event(0, 40.0, 0.0, false), &mut session, &mut animator);

        let DragOutcome::Committed(ticket) = outcome else {
            panic!("expected commit, got {:?}", outcome);
        };
        assert_eq!(ticket.classification, Classification::Fair);
        assert_eq!(animator.visual(0).unwrap().pose.x, 500.0);
        assert!(tracker.state().is_none());
    }

    #[test]
    fn release_inside_gate_snaps_back() {
        let (mut tracker, mut session, mut animator) = setup(2);
        tracker.on_drag_event(event(0, 25.0, 0.0, true), &mut session, &mut animator);
        let outcome = tracker.on_drag_event(event(0, 25.0, 0.0, false), &mut session, &mut animator);

        assert_eq!(outcome, DragOutcome::SnappedBack);
        assert_eq!(animator.visual(0).unwrap().pose, Pose::CENTER);
        assert_eq!(tracker.indicator(), None);
        assert!(session.history().is_empty());
        assert_eq!(session.cursor(), 0);
    }

    #[test]
    fn long_diagonal_below_axis_threshold_snaps_back() {
        let (tracker, _, _) = setup(1);
        assert_eq!(tracker.release_direction(19.0, 19.0), None);
        assert_eq!(tracker.release_direction(21.0, 25.0), Some(Direction::Right));
    }

    #[test]
    fn non_cursor_and_committed_cards_are_ignored() {
        let (mut tracker, mut session, mut animator) = setup(2);
        let outcome = tracker.on_drag_event(event(1, 80.0, 0.0, false), &mut session, &mut animator);
        assert_eq!(outcome, DragOutcome::Ignored);

        tracker.on_drag_event(event(0, 0.0, 80.0, false), &mut session, &mut animator);
        let outcome = tracker.on_drag_event(event(0, 0.0, 80.0, false), &mut session, &mut animator);
        assert_eq!(outcome, DragOutcome::Ignored);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn nan_release_snaps_back() {
        let (mut tracker, mut session, mut animator) = setup(1);
        let outcome =
            tracker.on_drag_event(event(0, f64::NAN, 90.0, true), &mut session, &mut animator);
        assert!(matches!(outcome, DragOutcome::Moved { indicator: None, pose } if pose == Pose::CENTER));

        let outcome =
            tracker.on_drag_event(event(0, f64::NAN, 90.0, false), &mut session, &mut animator);
        assert_eq!(outcome, DragOutcome::SnappedBack);
        assert!(session.history().is_empty());
    }
}
