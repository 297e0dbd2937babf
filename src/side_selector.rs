use log::debug;

use crate::body::{BodyPart, Person};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySide {
    Left,
    Right,
}

const LEFT_PARTS: [BodyPart; 6] = [
    BodyPart::LeftShoulder,
    BodyPart::LeftElbow,
    BodyPart::LeftWrist,
    BodyPart::LeftHip,
    BodyPart::LeftKnee,
    BodyPart::LeftAnkle,
];

const RIGHT_PARTS: [BodyPart; 6] = [
    BodyPart::RightShoulder,
    BodyPart::RightElbow,
    BodyPart::RightWrist,
    BodyPart::RightHip,
    BodyPart::RightKnee,
    BodyPart::RightAnkle,
];

const LEFT_PARTS_TO_CORRECT: [BodyPart; 4] = [
    BodyPart::LeftShoulder,
    BodyPart::LeftElbow,
    BodyPart::LeftHip,
    BodyPart::LeftKnee,
];

const RIGHT_PARTS_TO_CORRECT: [BodyPart; 4] = [
    BodyPart::RightShoulder,
    BodyPart::RightElbow,
    BodyPart::RightHip,
    BodyPart::RightKnee,
];

const LEFT_SKELETON: [(BodyPart, BodyPart); 5] = [
    (BodyPart::LeftShoulder, BodyPart::LeftElbow),
    (BodyPart::LeftElbow, BodyPart::LeftWrist),
    (BodyPart::LeftShoulder, BodyPart::LeftHip),
    (BodyPart::LeftHip, BodyPart::LeftKnee),
    (BodyPart::LeftKnee, BodyPart::LeftAnkle),
];

const RIGHT_SKELETON: [(BodyPart, BodyPart); 5] = [
    (BodyPart::RightShoulder, BodyPart::RightElbow),
    (BodyPart::RightElbow, BodyPart::RightWrist),
    (BodyPart::RightShoulder, BodyPart::RightHip),
    (BodyPart::RightHip, BodyPart::RightKnee),
    (BodyPart::RightKnee, BodyPart::RightAnkle),
];

impl BodySide {
    pub fn is_left(self) -> bool {
        self == BodySide::Left
    }

    /// Start of the reference segment
    pub fn wrist(self) -> BodyPart {
        match self {
            BodySide::Left => BodyPart::LeftWrist,
            BodySide::Right => BodyPart::RightWrist,
        }
    }

    /// End of the reference segment
    pub fn ankle(self) -> BodyPart {
        match self {
            BodySide::Left => BodyPart::LeftAnkle,
            BodySide::Right => BodyPart::RightAnkle,
        }
    }

    pub fn hip(self) -> BodyPart {
        match self {
            BodySide::Left => BodyPart::LeftHip,
            BodySide::Right => BodyPart::RightHip,
        }
    }

    pub fn knee(self) -> BodyPart {
        match self {
            BodySide::Left => BodyPart::LeftKnee,
            BodySide::Right => BodyPart::RightKnee,
        }
    }

    /// The six joints used for the confidence score; also the joints drawn as circles
    pub fn parts(self) -> &'static [BodyPart] {
        match self {
            BodySide::Left => &LEFT_PARTS,
            BodySide::Right => &RIGHT_PARTS,
        }
    }

    /// Joints checked against the reference segment, in check order
    pub fn parts_to_correct(self) -> &'static [BodyPart] {
        match self {
            BodySide::Left => &LEFT_PARTS_TO_CORRECT,
            BodySide::Right => &RIGHT_PARTS_TO_CORRECT,
        }
    }

    /// Pairs of key points to draw lines between
    pub fn skeleton(self) -> &'static [(BodyPart, BodyPart)] {
        match self {
            BodySide::Left => &LEFT_SKELETON,
            BodySide::Right => &RIGHT_SKELETON,
        }
    }
}

/// Product of the confidence scores of each side's six joints, as (left, right)
pub fn side_scores(person: &Person) -> (f32, f32) {
    let product = |parts: &[BodyPart]| {
        parts
            .iter()
            .fold(1., |acc, part| acc * person.score_of(*part))
    };
    (product(&LEFT_PARTS), product(&RIGHT_PARTS))
}

/// Pick the side to render and check.
///
/// The right score is added into the left score before comparing, which
/// biases the choice toward the left side (and hands it any tie).
pub fn select_side(person: &Person) -> BodySide {
    let (left_score, right_score) = side_scores(person);
    let biased_left = left_score + right_score;
    let side = if biased_left > right_score {
        BodySide::Left
    } else {
        BodySide::Right
    };
    debug!(
        "Side scores left={} (biased {}), right={}; selected {:?}",
        left_score, biased_left, right_score, side
    );
    side
}
