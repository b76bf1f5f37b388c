use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Left,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Fair,
    TooHigh,
    TooLow,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    #[default]
    HorizontalFirst,
    DominantAxis,
}

const MAPPING: [(Direction, Classification); 4] = [
    (Direction::Right, Classification::Fair),
    (Direction::Up, Classification::TooHigh),
    (Direction::Down, Classification::TooLow),
    (Direction::Left, Classification::Reject),
];

impl Direction {
    pub fn classification(self) -> Classification {
        MAPPING
            .iter()
            .find(|(dir, _)| *dir == self)
            .map(|(_, class)| *class)
            .unwrap_or(Classification::Reject)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl Classification {
    pub fn direction(self) -> Direction {
        MAPPING
            .iter()
            .find(|(_, class)| *class == self)
            .map(|(dir, _)| *dir)
            .unwrap_or(Direction::Left)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Fair => "fair",
            Classification::TooHigh => "too-high",
            Classification::TooLow => "too-low",
            Classification::Reject => "reject",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Classification::Fair => "Fair Price",
            Classification::TooHigh => "Price Higher",
            Classification::TooLow => "Price Lower",
            Classification::Reject => "Not Interested",
        }
    }
}

/// Screen coordinates: negative `dy` is up.
pub fn classify(dx: f64, dy: f64, threshold: f64) -> Option<Direction> {
    classify_with(dx, dy, threshold, TieBreak::HorizontalFirst)
}

pub fn classify_with(dx: f64, dy: f64, threshold: f64, tie_break: TieBreak) -> Option<Direction> {
    if !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    let horizontal = if dx > threshold {
        Some(Direction::Right)
    } else if dx < -threshold {
        Some(Direction::Left)
    } else {
        None
    };
    let vertical = if dy < -threshold {
        Some(Direction::Up)
    } else if dy > threshold {
        Some(Direction::Down)
    } else {
        None
    };

    match tie_break {
        TieBreak::HorizontalFirst => horizontal.or(vertical),
        TieBreak::DominantAxis => {
            if dx.abs() > dy.abs() {
                horizontal.or(vertical)
            } else {
                vertical.or(horizontal)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_axis_moves() {
        assert_eq!(classify(40.0, 0.0, 20.0), Some(Direction::Right));
        assert_eq!(classify(-40.0, 5.0, 20.0), Some(Direction::Left));
        assert_eq!(classify(0.0, -60.0, 20.0), Some(Direction::Up));
        assert_eq!(classify(3.0, 25.0, 20.0), Some(Direction::Down));
    }

    #[test]
    fn within_threshold_is_none() {
        assert_eq!(classify(10.0, 10.0, 20.0), None);
        assert_eq!(classify(20.0, -20.0, 20.0), None);
        assert_eq!(classify(0.0, 0.0, 20.0), None);
    }

    #[test]
    fn horizontal_wins_when_both_axes_clear() {
        assert_eq!(classify(25.0, -90.0, 20.0), Some(Direction::Right));
        assert_eq!(classify(-21.0, 200.0, 20.0), Some(Direction::Left));
    }

    #[test]
    fn dominant_axis_prefers_larger_component() {
        let t = TieBreak::DominantAxis;
        assert_eq!(classify_with(25.0, -90.0, 20.0, t), Some(Direction::Up));
        assert_eq!(classify_with(-90.0, 25.0, 20.0, t), Some(Direction::Left));
        assert_eq!(classify_with(5.0, 30.0, 20.0, t), Some(Direction::Down));
    }

    #[test]
    fn non_finite_displacement_is_none() {
        assert_eq!(classify(f64::NAN, 100.0, 20.0), None);
        assert_eq!(classify(f64::INFINITY, 0.0, 20.0), None);
        assert_eq!(classify(0.0, f64::NEG_INFINITY, 20.0), None);
    }

    #[test]
    fn sweep_matches_axis_rules() {
        let t = 20.0;
        for dx in (-60..=60).step_by(5) {
            for dy in (-60..=60).step_by(5) {
                let (dx, dy) = (dx as f64, dy as f64);
                let got = classify(dx, dy, t);
                if dx.abs() > t && dx.abs() > dy.abs() {
                    let want = if dx > 0.0 { Direction::Right } else { Direction::Left };
                    assert_eq!(got, Some(want), "dx={dx} dy={dy}");
                } else if dy.abs() > t && dx.abs() <= t {
                    let want = if dy < 0.0 { Direction::Up } else { Direction::Down };
                    assert_eq!(got, Some(want), "dx={dx} dy={dy}");
                } else if dx.abs() <= t && dy.abs() <= t {
                    assert_eq!(got, None, "dx={dx} dy={dy}");
                }
            }
        }
    }

    #[test]
    fn mapping_is_bijective() {
        for dir in [Direction::Right, Direction::Left, Direction::Up, Direction::Down] {
            assert_eq!(dir.classification().direction(), dir);
        }
        assert_eq!(Direction::Up.classification(), Classification::TooHigh);
        assert_eq!(Direction::Left.classification(), Classification::Reject);
    }

    #[test]
    fn mapping_table_covers_each_variant_once() {
        let directions = [Direction::Right, Direction::Left, Direction::Up, Direction::Down];
        for dir in directions {
            let count = MAPPING.iter().filter(|(d, _)| *d == dir).count();
            assert_eq!(count, 1, "{:?}", dir);
        }
        let classes = [
            Classification::Fair,
            Classification::TooHigh,
            Classification::TooLow,
            Classification::Reject,
        ];
        for class in classes {
            let count = MAPPING.iter().filter(|(_, c)| *c == class).count();
            assert_eq!(count, 1, "{:?}", class);
            assert_eq!(class.direction().classification(), class);
        }
    }

    #[test]
    fn classification_wire_names() {
        let json = serde_json::to_string(&Classification::TooHigh).unwrap();
        assert_eq!(json, "\"too-high\"");
        assert_eq!(Classification::TooLow.as_str(), "too-low");
    }
}
