use bodycap_core::{joint::BODY_34_JOINTS, point::Point};
use bodycap_zed::{Bodies, BodyData, Frame, ScriptedTracker};

// Grabs per sway period, and how often the subject steps out of view.
const PERIOD: f32 = 40.0;
const ABSENT_EVERY: usize = 50;

/// A single subject swaying sideways two meters in front of the camera.
pub fn tracker() -> ScriptedTracker {
    ScriptedTracker::from_fn(frame)
}

fn frame(grab: usize) -> Frame {
    if grab % ABSENT_EVERY == ABSENT_EVERY - 1 {
        return Frame::Bodies(Bodies::fresh(Vec::new()));
    }

    let phase = grab as f32 / PERIOD * std::f32::consts::TAU;
    let root = Point::new(0.3 * phase.sin(), 0.95, -2.0);
    let mut body = BodyData::new(0, root);
    for (index, keypoint) in body.keypoints.iter_mut().enumerate() {
        *keypoint = offset(index, root);
    }
    Frame::Bodies(Bodies::fresh(vec![body]))
}

// Spreads joints over a rough standing silhouette around the root.
fn offset(index: usize, root: Point) -> Point {
    let side = match index % 3 {
        0 => 0.0,
        1 => -0.2,
        _ => 0.2,
    };
    let height = 0.8 - 1.6 * index as f32 / BODY_34_JOINTS as f32;
    Point::new(root.x + side, root.y + height, root.z)
}
