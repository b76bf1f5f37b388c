use crate::config::SwipeConfig;
use crate::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl Pose {
    pub const CENTER: Pose = Pose {
        x: 0.0,
        y: 0.0,
        rotation: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    pub const HIDDEN: Pose = Pose {
        opacity: 0.0,
        ..Pose::CENTER
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Immediate,
    Follow,
    Spring,
    FlyOff,
}

impl Transition {
    pub fn css(self) -> &'static str {
        match self {
            Transition::Immediate => "none",
            Transition::Follow => "transform 0s",
            Transition::Spring => {
                "transform 0.35s cubic-bezier(0.175, 0.885, 0.32, 1.275), opacity 0.25s ease"
            }
            Transition::FlyOff => "transform 0.3s ease-out, opacity 0.3s ease-out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardVisual {
    pub pose: Pose,
    pub transition: Transition,
    pub z_index: usize,
    pub interactive: bool,
}

impl CardVisual {
    pub fn style(&self) -> String {
        format!(
            "transform: translate({:.1}px, {:.1}px) rotate({:.2}deg) scale({:.2}); opacity: {:.2}; z-index: {}; transition: {}; {}",
            self.pose.x,
            self.pose.y,
            self.pose.rotation,
            self.pose.scale,
            self.pose.opacity,
            self.z_index,
            self.transition.css(),
            if self.interactive {
                "pointer-events: auto; touch-action: none;"
            } else {
                "pointer-events: none;"
            }
        )
    }
}

#[derive(Debug, Clone)]
pub struct Animator {
    visuals: Vec<CardVisual>,
    fly_off_distance: f64,
    fly_off_rotation: f64,
}

impl Animator {
    pub fn new(count: usize, cursor: usize, config: &SwipeConfig) -> Self {
        let mut animator = Self {
            visuals: (0..count)
                .map(|index| CardVisual {
                    pose: Pose::HIDDEN,
                    transition: Transition::Immediate,
                    z_index: count - index,
                    interactive: false,
                })
                .collect(),
            fly_off_distance: config.fly_off_distance,
            fly_off_rotation: config.fly_off_rotation,
        };
        animator.sync(cursor);
        animator
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn visual(&self, index: usize) -> Option<&CardVisual> {
        self.visuals.get(index)
    }

    pub fn z_order(&self, index: usize) -> usize {
        self.visuals.len().saturating_sub(index)
    }

    pub fn idle(&mut self, index: usize, cursor: usize) {
        let Some(visual) = self.visuals.get_mut(index) else {
            return;
        };
        if index == cursor {
            visual.pose = Pose::CENTER;
            visual.transition = Transition::Spring;
        } else {
            visual.pose = Pose::HIDDEN;
            visual.transition = Transition::Immediate;
        }
        visual.interactive = index == cursor;
    }

    pub fn sync(&mut self, cursor: usize) {
        for index in 0..self.visuals.len() {
            self.idle(index, cursor);
        }
    }

    pub fn drag(&mut self, index: usize, cursor: usize, pose: Pose) {
        if index != cursor {
            return;
        }
        if let Some(visual) = self.visuals.get_mut(index) {
            visual.pose = pose;
            visual.transition = Transition::Follow;
        }
    }

    pub fn snap_back(&mut self, index: usize) {
        if let Some(visual) = self.visuals.get_mut(index) {
            visual.pose = Pose::CENTER;
            visual.transition = Transition::Spring;
        }
    }

    pub fn fly_off(&mut self, index: usize, direction: Direction) {
        let distance = self.fly_off_distance;
        let (x, y, rotation) = match direction {
            Direction::Right => (distance, 0.0, self.fly_off_rotation),
            Direction::Left => (-distance, 0.0, -self.fly_off_rotation),
            Direction::Up => (0.0, -distance, 0.0),
            Direction::Down => (0.0, distance, 0.0),
        };
        if let Some(visual) = self.visuals.get_mut(index) {
            visual.pose = Pose {
                x,
                y,
                rotation,
                scale: visual.pose.scale,
                opacity: 0.0,
            };
            visual.transition = Transition::FlyOff;
            visual.interactive = false;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HintStep {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub delay_ms: u32,
    pub duration_ms: u32,
}

const HINT_REACH: f64 = 100.0;
const HINT_MOVE_MS: u32 = 450;

const fn hint(x: f64, y: f64, opacity: f64, delay_ms: u32) -> HintStep {
    HintStep {
        x,
        y,
        opacity,
        delay_ms,
        duration_ms: HINT_MOVE_MS,
    }
}

const HINT_STEPS: [HintStep; 10] = [
    hint(0.0, 0.0, 1.0, 500),
    hint(HINT_REACH, 0.0, 1.0, 0),
    hint(0.0, 0.0, 1.0, 300),
    hint(-HINT_REACH, 0.0, 1.0, 0),
    hint(0.0, 0.0, 1.0, 300),
    hint(0.0, -HINT_REACH, 1.0, 0),
    hint(0.0, 0.0, 1.0, 300),
    hint(0.0, HINT_REACH, 1.0, 0),
    hint(0.0, 0.0, 1.0, 300),
    hint(0.0, 0.0, 0.0, 0),
];

#[derive(Debug, Clone, PartialEq)]
pub struct HintAnimation {
    step: usize,
}

impl HintAnimation {
    pub fn start(seen: bool) -> Option<Self> {
        if seen {
            None
        } else {
            Some(Self { step: 0 })
        }
    }

    pub fn current(&self) -> Option<&HintStep> {
        HINT_STEPS.get(self.step)
    }

    pub fn next(&mut self) -> bool {
        if self.step < HINT_STEPS.len() {
            self.step += 1;
        }
        self.step < HINT_STEPS.len()
    }

    pub fn is_done(&self) -> bool {
        self.step >= HINT_STEPS.len()
    }

    pub fn style(&self) -> String {
        let step = self.current().copied().unwrap_or(hint(0.0, 0.0, 0.0, 0));
        format!(
            "pointer-events: none; transform: translate({:.0}px, {:.0}px); opacity: {:.2}; transition: transform {}ms ease-in-out {}ms, opacity {}ms ease {}ms;",
            step.x,
            step.y,
            step.opacity,
            step.duration_ms,
            step.delay_ms,
            step.duration_ms,
            step.delay_ms
        )
    }
}
