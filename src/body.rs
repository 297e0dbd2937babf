use std::fmt;

use anyhow::{anyhow, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{side_selector::BodySide, Point2D};

/// Landmarks produced by the pose detector, in detector index order
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BodyPart {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    pub const ALL: [BodyPart; 17] = [
        BodyPart::Nose,
        BodyPart::LeftEye,
        BodyPart::RightEye,
        BodyPart::LeftEar,
        BodyPart::RightEar,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::RightElbow,
        BodyPart::LeftWrist,
        BodyPart::RightWrist,
        BodyPart::LeftHip,
        BodyPart::RightHip,
        BodyPart::LeftKnee,
        BodyPart::RightKnee,
        BodyPart::LeftAnkle,
        BodyPart::RightAnkle,
    ];

    /// Index of this part in a detector's key point list
    pub fn position(self) -> usize {
        self as usize
    }

    pub fn from_position(position: usize) -> Option<BodyPart> {
        BodyPart::ALL.get(position).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyPart::Nose => "NOSE",
            BodyPart::LeftEye => "LEFT_EYE",
            BodyPart::RightEye => "RIGHT_EYE",
            BodyPart::LeftEar => "LEFT_EAR",
            BodyPart::RightEar => "RIGHT_EAR",
            BodyPart::LeftShoulder => "LEFT_SHOULDER",
            BodyPart::RightShoulder => "RIGHT_SHOULDER",
            BodyPart::LeftElbow => "LEFT_ELBOW",
            BodyPart::RightElbow => "RIGHT_ELBOW",
            BodyPart::LeftWrist => "LEFT_WRIST",
            BodyPart::RightWrist => "RIGHT_WRIST",
            BodyPart::LeftHip => "LEFT_HIP",
            BodyPart::RightHip => "RIGHT_HIP",
            BodyPart::LeftKnee => "LEFT_KNEE",
            BodyPart::RightKnee => "RIGHT_KNEE",
            BodyPart::LeftAnkle => "LEFT_ANKLE",
            BodyPart::RightAnkle => "RIGHT_ANKLE",
        }
    }

    /// Which side of the body this part belongs to; None for the nose
    pub fn side(self) -> Option<BodySide> {
        match self {
            BodyPart::Nose => None,
            BodyPart::LeftEye
            | BodyPart::LeftEar
            | BodyPart::LeftShoulder
            | BodyPart::LeftElbow
            | BodyPart::LeftWrist
            | BodyPart::LeftHip
            | BodyPart::LeftKnee
            | BodyPart::LeftAnkle => Some(BodySide::Left),
            _ => Some(BodySide::Right),
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KeyPoint {
    pub body_part: BodyPart,
    pub coordinate: Point2D,
    pub score: f32,
}

impl KeyPoint {
    pub fn new(body_part: BodyPart, coordinate: Point2D, score: f32) -> Self {
        KeyPoint {
            body_part,
            coordinate,
            score,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        RectF {
            left,
            top,
            right,
            bottom,
        }
    }
}

/// One detected person, as produced (once per frame) by the pose detector
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Only meaningful when a tracker is assigning identities
    #[serde(default)]
    pub id: Option<i32>,
    pub key_points: Vec<KeyPoint>,
    #[serde(default)]
    pub bounding_box: Option<RectF>,
    #[serde(default)]
    pub score: f32,
}

impl Person {
    pub fn new(key_points: Vec<KeyPoint>) -> Self {
        Person {
            id: None,
            key_points,
            bounding_box: None,
            score: 0.,
        }
    }

    pub fn key_point(&self, part: BodyPart) -> Option<&KeyPoint> {
        // Detectors normally list points in index order, so try that first
        match self.key_points.get(part.position()) {
            Some(kp) if kp.body_part == part => Some(kp),
            _ => self.key_points.iter().find(|kp| kp.body_part == part),
        }
    }

    pub fn coordinate(&self, part: BodyPart) -> Option<Point2D> {
        self.key_point(part).map(|kp| kp.coordinate)
    }

    /// Confidence for the given part; a missing point counts as zero confidence
    pub fn score_of(&self, part: BodyPart) -> f32 {
        self.key_point(part).map_or(0., |kp| kp.score)
    }
}

pub fn parse_persons(text: &str) -> Result<Vec<Person>> {
    serde_json::from_str::<Vec<Person>>(text)
        .map_err(|e| anyhow!("Failed to parse persons data: {}", e))
}

pub fn load_persons_from_file(persons_file_path: &str) -> Result<Vec<Person>> {
    let text = std::fs::read_to_string(persons_file_path)
        .map_err(|e| anyhow!("Failed to read \"{}\": {}", persons_file_path, e))?;
    let persons = parse_persons(&text)?;
    info!(
        "Loaded {} person(s) from \"{}\"",
        persons.len(),
        persons_file_path
    );
    debug!("Persons: {:?}", &persons);
    Ok(persons)
}
