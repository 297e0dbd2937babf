use std::fmt;

use log::debug;

use crate::{
    body::{BodyPart, Person},
    error::{OverlayError, Result},
    geometry_utils::{angle_at, distance_points, project_onto_line},
    side_selector::BodySide,
    Point2D,
};

/// A joint may stray this fraction (1/n) of the reference segment's length
/// from the line before a correction is suggested
pub const DEFAULT_DEVIATION_RATIO: f32 = 20.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionHint {
    Forward,
    Back,
}

impl fmt::Display for CorrectionHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionHint::Forward => f.write_str("forward"),
            CorrectionHint::Back => f.write_str("back"),
        }
    }
}

/// Only used to pick a highlight colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Good,
    NeedsCorrection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviationResult {
    /// Closest point to the joint on the (unclamped) reference line
    pub projected: Point2D,
    /// Lateral distance from the joint to `projected`
    pub distance: f32,
    pub threshold: f32,
    pub hint: Option<CorrectionHint>,
    pub classification: Classification,
}

impl DeviationResult {
    pub fn is_triggered(&self) -> bool {
        self.hint.is_some()
    }

    /// Text to show for the given joint, empty if the joint is in line
    pub fn label(&self, part: BodyPart) -> String {
        match self.hint {
            Some(hint) => correction_text(part, hint),
            None => String::new(),
        }
    }
}

pub fn correction_text(part: BodyPart, hint: CorrectionHint) -> String {
    format!("Move {} {}", part.name(), hint)
}

/// The wrist-to-ankle reference line for one side of the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    wrist: Point2D,
    ankle: Point2D,
    length: f32,
}

impl Segment {
    /// Fails if the endpoints coincide, since no direction can be derived
    pub fn new(wrist: Point2D, ankle: Point2D) -> Result<Self> {
        let length = distance_points(&wrist, &ankle);
        if length == 0. || !length.is_finite() {
            return Err(OverlayError::DegenerateSegment { wrist, ankle });
        }
        Ok(Segment {
            wrist,
            ankle,
            length,
        })
    }

    pub fn wrist(&self) -> Point2D {
        self.wrist
    }

    pub fn ankle(&self) -> Point2D {
        self.ankle
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn check(&self, joint: Point2D, side: BodySide, deviation_ratio: f32) -> DeviationResult {
        // Segment::new guarantees a non-zero length, so the projection exists
        let projected = project_onto_line(&self.wrist, &self.ankle, &joint).unwrap_or(self.wrist);
        let distance = distance_points(&joint, &projected);
        let threshold = self.length / deviation_ratio;

        let hint = if distance > threshold {
            // Assumes the subject is filmed side-on with a fixed facing; not mirror-invariant
            let behind = match side {
                BodySide::Right => joint.0 > projected.0,
                BodySide::Left => joint.0 < projected.0,
            };
            Some(if behind {
                CorrectionHint::Back
            } else {
                CorrectionHint::Forward
            })
        } else {
            None
        };

        let classification = if distance < threshold {
            Classification::Good
        } else {
            Classification::NeedsCorrection
        };

        DeviationResult {
            projected,
            distance,
            threshold,
            hint,
            classification,
        }
    }
}

/// Check how far `joint` strays from the line through `wrist` and `ankle`
pub fn check_deviation(
    wrist: Point2D,
    ankle: Point2D,
    joint: Point2D,
    side: BodySide,
    deviation_ratio: f32,
) -> Result<DeviationResult> {
    Ok(Segment::new(wrist, ankle)?.check(joint, side, deviation_ratio))
}

/// One line of stacked correction text
#[derive(Debug, Clone, PartialEq)]
pub struct Correction {
    pub body_part: BodyPart,
    pub text: String,
    pub offset_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionReport {
    pub side: BodySide,
    pub segment: Segment,
    /// Every joint that was checked, in check order
    pub checked: Vec<(BodyPart, DeviationResult)>,
    pub corrections: Vec<Correction>,
}

impl CorrectionReport {
    pub fn is_all_clear(&self) -> bool {
        self.corrections.is_empty()
    }
}

/// Run the deviation check over the side's joints, stacking a message line for
/// each joint that needs correcting. Fails if the reference segment is missing
/// or degenerate, in which case nothing should be drawn for this person.
pub fn collect_corrections(
    person: &Person,
    side: BodySide,
    deviation_ratio: f32,
    line_spacing: f32,
) -> Result<CorrectionReport> {
    let wrist = person
        .coordinate(side.wrist())
        .ok_or(OverlayError::MissingKeyPoint(side.wrist()))?;
    let ankle = person
        .coordinate(side.ankle())
        .ok_or(OverlayError::MissingKeyPoint(side.ankle()))?;
    let segment = Segment::new(wrist, ankle)?;

    let report = side.parts_to_correct().iter().fold(
        CorrectionReport {
            side,
            segment,
            checked: Vec::new(),
            corrections: Vec::new(),
        },
        |mut report, part| {
            match person.coordinate(*part) {
                Some(joint) => {
                    let result = segment.check(joint, side, deviation_ratio);
                    if result.is_triggered() {
                        let offset_y =
                            report.corrections.last().map_or(0., |c| c.offset_y) + line_spacing;
                        report.corrections.push(Correction {
                            body_part: *part,
                            text: result.label(*part),
                            offset_y,
                        });
                    }
                    report.checked.push((*part, result));
                }
                None => debug!("No key point for {}; skip posture check", part),
            }
            report
        },
    );

    Ok(report)
}

/// Angle at the knee (hip -> knee -> ankle) for the given side, in degrees
pub fn knee_angle(person: &Person, side: BodySide) -> Option<f32> {
    let hip = person.coordinate(side.hip())?;
    let knee = person.coordinate(side.knee())?;
    let ankle = person.coordinate(side.ankle())?;
    angle_at(&hip, &knee, &ankle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::KeyPoint;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_joint_on_segment_is_good() {
        let wrist = (10., 20.);
        let ankle = (70., 100.);
        let midpoint = (
            wrist.0 + 0.5 * (ankle.0 - wrist.0),
            wrist.1 + 0.5 * (ankle.1 - wrist.1),
        );
        let result = check_deviation(wrist, ankle, midpoint, BodySide::Left, 20.).unwrap();
        assert!(close(result.distance, 0.));
        assert!(close(result.projected.0, midpoint.0));
        assert!(close(result.projected.1, midpoint.1));
        assert_eq!(result.hint, None);
        assert_eq!(result.classification, Classification::Good);
        assert_eq!(result.label(BodyPart::LeftHip), "");
    }

    #[test]
    fn test_worked_example_triggers_back_on_right_side() {
        let result = check_deviation((0., 0.), (0., 100.), (10., 50.), BodySide::Right, 20.).unwrap();
        assert_eq!(result.projected, (0., 50.));
        assert_eq!(result.distance, 10.);
        assert_eq!(result.threshold, 5.);
        assert_eq!(result.hint, Some(CorrectionHint::Back));
        assert_eq!(result.classification, Classification::NeedsCorrection);
        assert_eq!(
            result.label(BodyPart::RightKnee),
            "Move RIGHT_KNEE back"
        );
    }

    #[test]
    fn test_worked_example_small_offset_is_good() {
        let result = check_deviation((0., 0.), (0., 100.), (2., 50.), BodySide::Right, 20.).unwrap();
        assert_eq!(result.distance, 2.);
        assert_eq!(result.hint, None);
        assert_eq!(result.classification, Classification::Good);
    }

    #[test]
    fn test_hint_direction_is_side_dependent() {
        let segment = Segment::new((0., 0.), (0., 100.)).unwrap();
        let right_of_line = (10., 50.);
        let left_of_line = (-10., 50.);

        assert_eq!(
            segment.check(right_of_line, BodySide::Right, 20.).hint,
            Some(CorrectionHint::Back)
        );
        assert_eq!(
            segment.check(left_of_line, BodySide::Right, 20.).hint,
            Some(CorrectionHint::Forward)
        );
        assert_eq!(
            segment.check(left_of_line, BodySide::Left, 20.).hint,
            Some(CorrectionHint::Back)
        );
        assert_eq!(
            segment.check(right_of_line, BodySide::Left, 20.).hint,
            Some(CorrectionHint::Forward)
        );
    }

    #[test]
    fn test_perpendicular_offset_threshold() {
        // Segment of length 200 along x; threshold is 10
        let segment = Segment::new((0., 0.), (200., 0.)).unwrap();
        assert!(segment.check((80., 10.5), BodySide::Left, 20.).is_triggered());
        assert!(!segment.check((80., 9.5), BodySide::Left, 20.).is_triggered());
        assert!(segment.check((80., -12.), BodySide::Left, 20.).is_triggered());
    }

    #[test]
    fn test_exactly_on_threshold() {
        // No hint, but not "good" either
        let result = check_deviation((0., 0.), (0., 100.), (5., 50.), BodySide::Left, 20.).unwrap();
        assert_eq!(result.hint, None);
        assert_eq!(result.classification, Classification::NeedsCorrection);
    }

    #[test]
    fn test_joint_beyond_segment_projects_outside() {
        let result = check_deviation((0., 0.), (0., 100.), (1., 150.), BodySide::Left, 20.).unwrap();
        assert_eq!(result.projected, (0., 150.));
        assert_eq!(result.hint, None);
    }

    #[test]
    fn test_consistent_under_affine_transform() {
        let transform = |p: Point2D| (p.0 * 2.5 + 30., p.1 * 2.5 - 12.);
        let (wrist, ankle, joint) = ((3., 4.), (40., 90.), (30., 30.));

        let original = check_deviation(wrist, ankle, joint, BodySide::Right, 20.).unwrap();
        let moved = check_deviation(
            transform(wrist),
            transform(ankle),
            transform(joint),
            BodySide::Right,
            20.,
        )
        .unwrap();

        let expected = transform(original.projected);
        assert!(close(moved.projected.0, expected.0));
        assert!(close(moved.projected.1, expected.1));
        assert!(close(moved.distance, original.distance * 2.5));
        assert!(close(moved.threshold, original.threshold * 2.5));
        assert_eq!(moved.hint, original.hint);
        assert_eq!(moved.classification, original.classification);
    }

    #[test]
    fn test_degenerate_segment() {
        let result = check_deviation((5., 5.), (5., 5.), (10., 50.), BodySide::Left, 20.);
        assert_eq!(
            result,
            Err(OverlayError::DegenerateSegment {
                wrist: (5., 5.),
                ankle: (5., 5.)
            })
        );
    }

    #[test]
    fn test_long_segment_is_not_degenerate() {
        let segment = Segment::new((0., 0.), (1e20, 0.)).unwrap();
        assert_eq!(segment.length(), 1e20);

        let result = segment.check((5e19, 1e18), BodySide::Right, 20.);
        assert_eq!(result.projected, (5e19, 0.));
        assert_eq!(result.classification, Classification::Good);
    }

    fn right_side_person(joints: &[(BodyPart, Point2D)]) -> Person {
        let mut key_points = vec![
            KeyPoint::new(BodyPart::RightWrist, (0., 0.), 0.9),
            KeyPoint::new(BodyPart::RightAnkle, (0., 100.), 0.9),
        ];
        key_points.extend(joints.iter().map(|(p, c)| KeyPoint::new(*p, *c, 0.9)));
        Person::new(key_points)
    }

    #[test]
    fn test_collect_all_clear() {
        let person = right_side_person(&[
            (BodyPart::RightShoulder, (1., 10.)),
            (BodyPart::RightElbow, (0., 5.)),
            (BodyPart::RightHip, (-2., 50.)),
            (BodyPart::RightKnee, (0., 75.)),
        ]);
        let report = collect_corrections(&person, BodySide::Right, 20., 50.).unwrap();
        assert_eq!(report.checked.len(), 4);
        assert!(report.is_all_clear());
    }

    #[test]
    fn test_collect_stacks_messages_in_check_order() {
        let person = right_side_person(&[
            (BodyPart::RightShoulder, (20., 10.)),
            (BodyPart::RightElbow, (0., 5.)),
            (BodyPart::RightHip, (-20., 50.)),
            (BodyPart::RightKnee, (30., 75.)),
        ]);
        let report = collect_corrections(&person, BodySide::Right, 20., 50.).unwrap();

        let lines: Vec<(&str, f32)> = report
            .corrections
            .iter()
            .map(|c| (c.text.as_str(), c.offset_y))
            .collect();
        assert_eq!(
            lines,
            vec![
                ("Move RIGHT_SHOULDER back", 50.),
                ("Move RIGHT_HIP forward", 100.),
                ("Move RIGHT_KNEE back", 150.),
            ]
        );
        assert!(!report.is_all_clear());
        assert_eq!(
            report.checked.iter().map(|(p, _)| *p).collect::<Vec<_>>(),
            BodySide::Right.parts_to_correct().to_vec()
        );
    }

    #[test]
    fn test_collect_skips_missing_joints() {
        let person = right_side_person(&[(BodyPart::RightHip, (40., 50.))]);
        let report = collect_corrections(&person, BodySide::Right, 20., 50.).unwrap();
        assert_eq!(report.checked.len(), 1);
        assert_eq!(report.corrections.len(), 1);
        assert_eq!(report.corrections[0].offset_y, 50.);
    }

    #[test]
    fn test_collect_degenerate_segment_fails() {
        let person = Person::new(vec![
            KeyPoint::new(BodyPart::LeftWrist, (7., 7.), 0.9),
            KeyPoint::new(BodyPart::LeftAnkle, (7., 7.), 0.9),
            KeyPoint::new(BodyPart::LeftHip, (30., 30.), 0.9),
        ]);
        assert!(matches!(
            collect_corrections(&person, BodySide::Left, 20., 50.),
            Err(OverlayError::DegenerateSegment { .. })
        ));
    }

    #[test]
    fn test_collect_missing_ankle_fails() {
        let person = Person::new(vec![KeyPoint::new(BodyPart::LeftWrist, (7., 7.), 0.9)]);
        assert_eq!(
            collect_corrections(&person, BodySide::Left, 20., 50.),
            Err(OverlayError::MissingKeyPoint(BodyPart::LeftAnkle))
        );
    }

    #[test]
    fn test_knee_angle() {
        let person = Person::new(vec![
            KeyPoint::new(BodyPart::LeftHip, (0., 0.), 0.9),
            KeyPoint::new(BodyPart::LeftKnee, (0., 50.), 0.9),
            KeyPoint::new(BodyPart::LeftAnkle, (50., 50.), 0.9),
        ]);
        assert!(close(knee_angle(&person, BodySide::Left).unwrap(), 90.));
        assert_eq!(knee_angle(&person, BodySide::Right), None);
    }
}
