//! Vertex and fragment entry points of the kernel.

use crate::channel::Channel;
use crate::compositor::{FrameCompositor, PrimarySample};
use crate::math::Vec2;
use crate::params::FrameParams;
use crate::post::PostProcessor;

pub const QUAD_VERTEX_COUNT: u32 = 6;

const QUAD_CORNERS: [[f32; 2]; 6] = [
    [-1.0, -1.0],
    [1.0, -1.0],
    [-1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [1.0, 1.0],
];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadVertex {
    pub position: [f32; 4],
    pub uv: [f32; 2],
}

/// Vertex `index` of the two triangles covering the viewport; no vertex buffer needed.
pub fn fullscreen_vertex(index: u32) -> QuadVertex {
    let [x, y] = QUAD_CORNERS[(index % QUAD_VERTEX_COUNT) as usize];
    QuadVertex {
        position: [x, y, 0.0, 1.0],
        uv: [(x * 0.5) + 0.5, 0.5 - (y * 0.5)],
    }
}

/// One frame's worth of kernel state. Evaluating it is pure, so a single instance can be
/// shared by any number of threads.
pub struct Kernel<'a> {
    compositor: FrameCompositor,
    post: PostProcessor,
    channel: &'a Channel,
}

impl<'a> Kernel<'a> {
    pub fn new(params: &FrameParams, channel: &'a Channel) -> Self {
        Self {
            compositor: FrameCompositor::new(params),
            post: PostProcessor::new(params),
            channel,
        }
    }

    /// Display color for normalized `uv`; channels in [0, 1], alpha 1.
    pub fn fragment(&self, uv: [f32; 2]) -> [f32; 4] {
        let uv = Vec2::from_array(uv);
        let color = self.post.apply(self.compositor.render(uv), uv);
        [color.x, color.y, color.z, 1.0]
    }

    /// Unjittered primary sample at `uv`, before post-processing.
    pub fn trace(&self, uv: [f32; 2]) -> PrimarySample {
        self.compositor
            .sample(Vec2::from_array(uv), Vec2::new(0.0, 0.0))
    }

    /// Texture bound as channel0. The default materials never sample it.
    pub fn channel(&self) -> &Channel {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_clip_space_with_two_triangles() {
        let vertices: Vec<QuadVertex> = (0..QUAD_VERTEX_COUNT).map(fullscreen_vertex).collect();
        let area = |a: &QuadVertex, b: &QuadVertex, c: &QuadVertex| {
            let (ax, ay) = (a.position[0], a.position[1]);
            let (bx, by) = (b.position[0], b.position[1]);
            let (cx, cy) = (c.position[0], c.position[1]);
            (((bx - ax) * (cy - ay)) - ((cx - ax) * (by - ay))).abs() * 0.5
        };
        let total = area(&vertices[0], &vertices[1], &vertices[2])
            + area(&vertices[3], &vertices[4], &vertices[5]);
        assert_eq!(total, 4.0);
        assert!(vertices.iter().all(|v| v.position[3] == 1.0));
    }

    #[test]
    fn quad_uv_origin_is_top_left() {
        let top_left = QUAD_CORNERS
            .iter()
            .position(|c| *c == [-1.0, 1.0])
            .expect("top-left corner present");
        assert_eq!(fullscreen_vertex(top_left as u32).uv, [0.0, 0.0]);
        assert_eq!(fullscreen_vertex(0).uv, [0.0, 1.0]);
        assert_eq!(fullscreen_vertex(6), fullscreen_vertex(0));
    }

    #[test]
    fn fragment_alpha_is_opaque() {
        let channel = Channel::default();
        let kernel = Kernel::new(&FrameParams::default(), &channel);
        let color = kernel.fragment([0.5, 0.1]);
        assert_eq!(color[3], 1.0);
        assert!(color[..3].iter().all(|c| (0.0..=1.0).contains(c)));
        assert_eq!(kernel.channel().dimensions(), (1, 1));
    }
}
