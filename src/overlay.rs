use image::RgbaImage;
use log::{debug, warn};
use rusttype::Font;

use crate::{
    body::Person,
    canvas::Canvas,
    error::Result,
    geometry_utils::angle_between_lines,
    overlay_config::{OverlayConfig, OverlayPaints},
    posture::{collect_corrections, knee_angle, Classification, CorrectionReport},
    raster::RasterCanvas,
    side_selector::{select_side, BodySide},
    Point2D,
};

/// Draw skeletons, joints and posture hints for every person onto a copy of
/// `input`. The input bitmap is left untouched.
pub fn draw_body_keypoints(
    input: &RgbaImage,
    persons: &[Person],
    config: &OverlayConfig,
    font: Option<&Font<'static>>,
) -> Result<RgbaImage> {
    let paints = config.paints()?;
    let mut output = input.clone();
    if persons.is_empty() {
        debug!("No persons detected; nothing to draw");
        return Ok(output);
    }

    let mut canvas = RasterCanvas::new(&mut output, font);
    render_persons(&mut canvas, persons, config, &paints);

    Ok(output)
}

pub fn render_persons<C: Canvas>(
    canvas: &mut C,
    persons: &[Person],
    config: &OverlayConfig,
    paints: &OverlayPaints,
) {
    if persons.is_empty() {
        return;
    }
    if let Some((front, back)) = config.wheel_centres {
        canvas.draw_line(front, back, &paints.reference);
    }
    for person in persons {
        render_person(canvas, person, config, paints);
    }
}

fn render_person<C: Canvas>(
    canvas: &mut C,
    person: &Person,
    config: &OverlayConfig,
    paints: &OverlayPaints,
) {
    if config.tracker_enabled {
        draw_person_id(canvas, person, config, paints);
    }

    let side = select_side(person);
    debug!("Person {:?}: drawing {:?} side", person.id, side);

    for (a, b) in side.skeleton() {
        if let (Some(from), Some(to)) = (person.coordinate(*a), person.coordinate(*b)) {
            canvas.draw_line(from, to, &paints.line);
        }
    }
    if let (Some(wrist), Some(ankle)) = (
        person.coordinate(side.wrist()),
        person.coordinate(side.ankle()),
    ) {
        canvas.draw_line(wrist, ankle, &paints.reference);
    }

    for part in side.parts() {
        if let Some(centre) = person.coordinate(*part) {
            canvas.draw_circle(centre, config.circle_radius, &paints.joint);
        }
    }

    match collect_corrections(person, side, config.deviation_ratio, config.line_spacing) {
        Ok(report) => draw_corrections(canvas, person, &report, config, paints),
        Err(e) => warn!("Skipping posture check for person {:?}: {}", person.id, e),
    }

    if config.show_knee_angle {
        draw_knee_angle(canvas, person, side, config, paints);
    }

    if let Some(wheels) = config.wheel_centres {
        draw_perpendicular_angle(canvas, person, side, wheels, config, paints);
    }
}

fn draw_person_id<C: Canvas>(
    canvas: &mut C,
    person: &Person,
    config: &OverlayConfig,
    paints: &OverlayPaints,
) {
    let Some(bounding_box) = &person.bounding_box else {
        return;
    };
    if let Some(id) = person.id {
        let x = bounding_box.left.max(0.);
        let y = bounding_box.top.max(0.);
        canvas.draw_text(
            &id.to_string(),
            (x, y - config.person_id_margin),
            &paints.person_id_text,
        );
    }
    canvas.draw_rect(bounding_box, &paints.line);
}

fn draw_corrections<C: Canvas>(
    canvas: &mut C,
    person: &Person,
    report: &CorrectionReport,
    config: &OverlayConfig,
    paints: &OverlayPaints,
) {
    for (part, result) in report.checked.iter() {
        let Some(joint) = person.coordinate(*part) else {
            continue;
        };
        canvas.draw_circle(result.projected, config.circle_radius, &paints.reference);
        let paint = match result.classification {
            Classification::Good => &paints.good,
            Classification::NeedsCorrection => &paints.bad,
        };
        canvas.draw_line(joint, result.projected, paint);
    }

    if report.is_all_clear() {
        canvas.draw_text(
            &config.all_clear_text,
            (config.text_x, config.all_clear_y),
            &paints.ok_text,
        );
    } else {
        for correction in report.corrections.iter() {
            debug!("Person {:?}: {}", person.id, correction.text);
            canvas.draw_text(
                &correction.text,
                (config.text_x, correction.offset_y),
                &paints.warning_text,
            );
        }
    }
}

fn draw_knee_angle<C: Canvas>(
    canvas: &mut C,
    person: &Person,
    side: BodySide,
    config: &OverlayConfig,
    paints: &OverlayPaints,
) {
    match knee_angle(person, side) {
        Some(angle) => {
            let y = canvas.height() as f32 - config.knee_angle_margin_bottom;
            canvas.draw_text(
                &format!("Knee Angle: {} deg", angle as i32),
                (config.text_x, y),
                &paints.ok_text,
            );
        }
        None => debug!("Knee angle unavailable for person {:?}", person.id),
    }
}

/// Angle of the lower leg against the line through both wheel centres
fn draw_perpendicular_angle<C: Canvas>(
    canvas: &mut C,
    person: &Person,
    side: BodySide,
    (front, back): (Point2D, Point2D),
    config: &OverlayConfig,
    paints: &OverlayPaints,
) {
    let (Some(knee), Some(ankle)) = (person.coordinate(side.knee()), person.coordinate(side.ankle()))
    else {
        debug!("No lower leg for person {:?}", person.id);
        return;
    };
    let Some(angle) = angle_between_lines(&front, &back, &knee, &ankle) else {
        debug!("Perpendicular angle undefined for person {:?}", person.id);
        return;
    };
    let paint = if (angle - 90.).abs() <= config.perpendicular_tolerance {
        &paints.good_text
    } else {
        &paints.bad_text
    };
    let y = canvas.height() as f32 - config.perpendicular_margin_bottom;
    canvas.draw_text(
        &format!("Perpendicular Angle: {} deg", angle as i32),
        (config.text_x, y),
        paint,
    );
}
