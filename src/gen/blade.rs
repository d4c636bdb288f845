//! Single grass-blade synthesis.
//!
//! A blade is five vertices and three triangles: a quad that narrows at half
//! height plus a tip vertex. The color channel is not a color at all but the
//! bend mask the grass shader reads for wind: black at the base (rigid), gray
//! at mid height, white at the tip (fully bent).

use cgmath::Vector3;

use crate::config::{BLADE_HEIGHT, BLADE_HEIGHT_VARIATION, BLADE_TIP_OFFSET, BLADE_WIDTH};
use crate::r#gen::rng::SeededRng;

/// One blade's vertex data, indices already offset for its slot in the field.
#[derive(Clone, Debug)]
pub struct Blade {
    /// 5 vertices, `[x, y, z]` each.
    pub positions: [[f32; 3]; 5],
    /// Bend mask per vertex.
    pub colors: [[f32; 3]; 5],
    /// 3 triangles referencing `offset..offset + 5` only.
    pub indices: [u32; 9],
}

pub const VERTS_PER_BLADE: usize = 5;
pub const INDICES_PER_BLADE: usize = 9;

const BLACK: [f32; 3] = [0.0, 0.0, 0.0];
const GRAY: [f32; 3] = [0.5, 0.5, 0.5];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Map an angle to a unit vector in the ground plane.
fn planar_unit(angle: f32) -> Vector3<f32> {
    Vector3::new(angle.sin(), 0.0, -angle.cos())
}

/// Build one blade standing at `center` (y = 0).
///
/// `offset` is the index of the blade's first vertex in the combined field
/// buffer; the caller passes `blade_index * 5` and must keep it monotonic.
/// Facing (yaw) and tip lean are drawn independently, so a blade can face one
/// way and droop another.
pub fn generate_blade(center: Vector3<f32>, offset: u32, rng: &mut SeededRng) -> Blade {
    let mid_width = BLADE_WIDTH * 0.5;
    let height = BLADE_HEIGHT + rng.next_f32() * BLADE_HEIGHT_VARIATION;

    let yaw = planar_unit(rng.angle());
    let tip_bend = planar_unit(rng.angle());

    let bottom_left = center + yaw * (BLADE_WIDTH / 2.0);
    let bottom_right = center - yaw * (BLADE_WIDTH / 2.0);
    let mut top_left = center + yaw * (mid_width / 2.0);
    let mut top_right = center - yaw * (mid_width / 2.0);
    let mut tip = center + tip_bend * BLADE_TIP_OFFSET;

    top_left.y += height / 2.0;
    top_right.y += height / 2.0;
    tip.y += height;

    Blade {
        positions: [
            bottom_left.into(),
            bottom_right.into(),
            top_right.into(),
            top_left.into(),
            tip.into(),
        ],
        colors: [BLACK, BLACK, GRAY, GRAY, WHITE],
        indices: [
            offset,
            offset + 1,
            offset + 2,
            offset + 2,
            offset + 4,
            offset + 3,
            offset + 3,
            offset,
            offset + 2,
        ],
    }
}
