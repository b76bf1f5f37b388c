use crate::animation::{Animator, HintAnimation};
use crate::config::SwipeConfig;
use crate::data::Card;
use crate::direction::Classification;
use crate::drag::{DragEvent, DragOutcome, DragTracker};
use crate::session::{CommitTicket, Session, Summary};
use log::debug;
use std::cell::Cell;
use std::rc::Rc;

pub trait CommitEffects {
    fn submit(&self, ticket: &CommitTicket);
    fn schedule_advance(&self, ticket: CommitTicket, delay_ms: u32);
}

#[derive(Debug, Clone)]
pub struct Liveness(Rc<Cell<bool>>);

impl Liveness {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.get()
    }

    pub fn kill(&self) {
        self.0.set(false);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Swiper {
    session: Session,
    animator: Animator,
    tracker: DragTracker,
    hint: Option<HintAnimation>,
}

impl Swiper {
    pub fn new(cards: Vec<Card>, config: SwipeConfig, hint_seen: bool) -> Self {
        let mut session = Session::new(cards);
        if hint_seen {
            session.mark_hint_seen();
        }
        let animator = Animator::new(session.cards().len(), session.cursor(), &config);
        let hint = if session.is_finished() {
            None
        } else {
            HintAnimation::start(session.hint_seen())
        };
        Self {
            session,
            animator,
            tracker: DragTracker::new(config),
            hint,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn indicator(&self) -> Option<Classification> {
        self.tracker.indicator()
    }

    pub fn hint(&self) -> Option<&HintAnimation> {
        self.hint.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.session.is_finished()
    }

    pub fn summary(&self) -> Summary {
        self.session.summary()
    }

    pub fn on_drag_event<E: CommitEffects>(&mut self, event: DragEvent, effects: &E) -> DragOutcome {
        let outcome = self
            .tracker
            .on_drag_event(event, &mut self.session, &mut self.animator);
        if let DragOutcome::Committed(ticket) = &outcome {
            self.dispatch(ticket.clone(), effects);
        }
        outcome
    }

    pub fn press<E: CommitEffects>(
        &mut self,
        classification: Classification,
        effects: &E,
    ) -> Option<CommitTicket> {
        let index = self.session.cursor();
        let direction = classification.direction();
        let ticket = self.session.commit(index, direction)?;
        self.tracker.set_indicator(Some(classification));
        self.animator.fly_off(index, direction);
        self.dispatch(ticket.clone(), effects);
        Some(ticket)
    }

    fn dispatch<E: CommitEffects>(&self, ticket: CommitTicket, effects: &E) {
        effects.submit(&ticket);
        effects.schedule_advance(ticket, self.tracker.config().advance_delay_ms);
    }

    pub fn advance(&mut self, ticket: &CommitTicket) -> bool {
        if !self.session.advance(ticket) {
            return false;
        }
        self.tracker.reset();
        self.animator.sync(self.session.cursor());
        true
    }

    /// No-op once the view has been torn down.
    pub fn advance_if(&mut self, alive: &Liveness, ticket: &CommitTicket) -> bool {
        if !alive.is_alive() {
            return false;
        }
        self.advance(ticket)
    }

    pub fn step_hint_if(&mut self, alive: &Liveness) -> bool {
        alive.is_alive() && self.step_hint()
    }

    pub fn restart(&mut self) {
        debug!("Restarting session over {} cards", self.session.cards().len());
        self.session.restart();
        self.tracker.reset();
        self.animator.sync(self.session.cursor());
    }

    pub fn step_hint(&mut self) -> bool {
        let Some(hint) = self.hint.as_mut() else {
            return false;
        };
        if hint.next() {
            return false;
        }
        self.hint = None;
        self.session.mark_hint_seen();
        true
    }
}
