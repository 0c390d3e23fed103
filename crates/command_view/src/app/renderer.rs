use std::sync::Arc;

use command_input::{HandleCorner, OrbitCamera, SceneRaycaster, SelectionRect};
use glam::{Vec2, Vec3};
use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::store::ViewStore;

const CLEAR_COLOR: [u8; 4] = [20, 22, 28, 255];
const GRID_MINOR_COLOR: [u8; 4] = [35, 39, 46, 255];
const GRID_MAJOR_COLOR: [u8; 4] = [52, 58, 70, 255];
const AGENT_COLOR: [u8; 4] = [220, 220, 240, 255];
const ASSIGNED_AGENT_COLOR: [u8; 4] = [150, 220, 160, 255];
const BUILDING_COLOR: [u8; 4] = [150, 120, 90, 255];
const AREA_COLOR: [u8; 4] = [90, 160, 110, 255];
const DRAFT_AREA_COLOR: [u8; 4] = [140, 200, 150, 255];
const HANDLE_COLOR: [u8; 4] = [200, 230, 200, 255];
const FOLDER_ICON_COLOR: [u8; 4] = [240, 200, 120, 255];
const SELECTED_HIGHLIGHT_COLOR: [u8; 4] = [80, 220, 255, 255];
const HOVER_HIGHLIGHT_COLOR: [u8; 4] = [255, 210, 70, 255];
const ORDER_MARKER_COLOR: [u8; 4] = [255, 120, 120, 255];
const SELECTION_BOX_COLOR: [u8; 4] = [120, 200, 255, 255];

const GRID_CELL_WORLD: f32 = 2.0;
const GRID_MAJOR_EVERY: i32 = 5;
const GRID_SEGMENTS_PER_LINE: i32 = 24;
const AGENT_HALF_SIZE_PX: i32 = 4;
const SELECTED_HIGHLIGHT_HALF_SIZE_PX: i32 = 7;
const HOVER_HIGHLIGHT_HALF_SIZE_PX: i32 = 9;
const HANDLE_HALF_SIZE_PX: i32 = 3;
const FOLDER_ICON_HALF_SIZE_PX: i32 = 5;
const ORDER_MARKER_HALF_SIZE_PX: i32 = 5;
const FOLDER_ICON_INSET: f32 = 1.2;
const FOLDER_ICON_HEIGHT: f32 = 0.8;
const HANDLE_HEIGHT: f32 = 0.3;
/// Segments reaching further than this many frame sizes off screen are skipped.
const LINE_CULL_FACTOR: f32 = 4.0;

/// Everything one frame draws, borrowed from the loop.
pub(crate) struct FrameView<'a> {
    pub(crate) camera: &'a OrbitCamera,
    pub(crate) raycaster: &'a SceneRaycaster,
    pub(crate) store: &'a ViewStore,
    pub(crate) selection: Option<SelectionRect>,
}

pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render(&mut self, view: &FrameView<'_>) -> Result<(), Error> {
        let mut frame = Frame::new(self.pixels.frame_mut(), self.width, self.height);
        frame.clear(CLEAR_COLOR);

        let layout = view.store.layout();
        let project = |world: Vec3| view.raycaster.project_to_screen(view.camera, world);

        if let Some(half_extents) = layout.ground_half_extents {
            draw_ground_grid(&mut frame, &project, half_extents);
        }

        for area in &layout.areas {
            let color = if view.store.selected_area() == Some(&area.id) {
                SELECTED_HIGHLIGHT_COLOR
            } else {
                AREA_COLOR
            };
            draw_ground_rect(&mut frame, &project, area.center, area.half_extents, color);
            for corner in HandleCorner::ALL {
                let at = area.corner(corner);
                if let Some(screen) = project(Vec3::new(at.x, HANDLE_HEIGHT, at.y)) {
                    let (x, y) = pixel(screen);
                    frame.fill_square(x, y, HANDLE_HALF_SIZE_PX, HANDLE_COLOR);
                }
            }
            let icon = area.corner(HandleCorner::NorthWest) + Vec2::splat(FOLDER_ICON_INSET);
            if let Some(screen) = project(Vec3::new(icon.x, FOLDER_ICON_HEIGHT, icon.y)) {
                let (x, y) = pixel(screen);
                frame.square_outline(x, y, FOLDER_ICON_HALF_SIZE_PX, FOLDER_ICON_COLOR);
            }
        }
        if let Some(draft) = view.store.draft_area() {
            draw_ground_rect(
                &mut frame,
                &project,
                draft.center,
                draft.half_extents,
                DRAFT_AREA_COLOR,
            );
        }

        for building in &layout.buildings {
            let color = if view.store.is_building_selected(&building.id) {
                SELECTED_HIGHLIGHT_COLOR
            } else if view.store.hovered_building() == Some(&building.id) {
                HOVER_HIGHLIGHT_COLOR
            } else {
                BUILDING_COLOR
            };
            draw_ground_rect(
                &mut frame,
                &project,
                Vec2::new(building.position.x, building.position.z),
                Vec2::new(building.half_size.x, building.half_size.z),
                color,
            );
            if let Some(screen) = project(building.position) {
                let (x, y) = pixel(screen);
                frame.cross(x, y, ORDER_MARKER_HALF_SIZE_PX, color);
            }
        }

        for destination in view.store.destinations() {
            if let Some(screen) = project(destination) {
                let (x, y) = pixel(screen);
                frame.cross(x, y, ORDER_MARKER_HALF_SIZE_PX, ORDER_MARKER_COLOR);
            }
        }

        for agent in &layout.agents {
            let Some(screen) = project(agent.position) else {
                continue;
            };
            let (x, y) = pixel(screen);
            let color = if view.store.assigned_area(&agent.id).is_some() {
                ASSIGNED_AGENT_COLOR
            } else {
                AGENT_COLOR
            };
            frame.fill_square(x, y, AGENT_HALF_SIZE_PX, color);
            if view.store.is_selected(&agent.id) {
                frame.square_outline(x, y, SELECTED_HIGHLIGHT_HALF_SIZE_PX, SELECTED_HIGHLIGHT_COLOR);
            }
            if view.store.hovered_agent() == Some(&agent.id) {
                frame.square_outline(x, y, HOVER_HIGHLIGHT_HALF_SIZE_PX, HOVER_HIGHLIGHT_COLOR);
            }
        }

        if let Some(rect) = view.selection {
            frame.rect_outline(rect.min, rect.max, SELECTION_BOX_COLOR);
        }

        self.pixels.render()
    }
}

fn draw_ground_grid(
    frame: &mut Frame<'_>,
    project: &impl Fn(Vec3) -> Option<Vec2>,
    half_extents: Vec2,
) {
    let lines_x = (half_extents.x / GRID_CELL_WORLD).floor() as i32;
    let lines_z = (half_extents.y / GRID_CELL_WORLD).floor() as i32;
    for index in -lines_x..=lines_x {
        let x = index as f32 * GRID_CELL_WORLD;
        let color = grid_color(index);
        draw_world_polyline(
            frame,
            project,
            Vec3::new(x, 0.0, -half_extents.y),
            Vec3::new(x, 0.0, half_extents.y),
            color,
        );
    }
    for index in -lines_z..=lines_z {
        let z = index as f32 * GRID_CELL_WORLD;
        let color = grid_color(index);
        draw_world_polyline(
            frame,
            project,
            Vec3::new(-half_extents.x, 0.0, z),
            Vec3::new(half_extents.x, 0.0, z),
            color,
        );
    }
}

fn grid_color(index: i32) -> [u8; 4] {
    if index.rem_euclid(GRID_MAJOR_EVERY) == 0 {
        GRID_MAJOR_COLOR
    } else {
        GRID_MINOR_COLOR
    }
}

/// Straight world line drawn in pieces so a segment behind the camera only
/// drops its own piece.
fn draw_world_polyline(
    frame: &mut Frame<'_>,
    project: &impl Fn(Vec3) -> Option<Vec2>,
    from: Vec3,
    to: Vec3,
    color: [u8; 4],
) {
    let mut previous = project(from);
    for step in 1..=GRID_SEGMENTS_PER_LINE {
        let point = from.lerp(to, step as f32 / GRID_SEGMENTS_PER_LINE as f32);
        let current = project(point);
        if let (Some(a), Some(b)) = (previous, current) {
            frame.line(a, b, color);
        }
        previous = current;
    }
}

fn draw_ground_rect(
    frame: &mut Frame<'_>,
    project: &impl Fn(Vec3) -> Option<Vec2>,
    center: Vec2,
    half_extents: Vec2,
    color: [u8; 4],
) {
    let corners = HandleCorner::ALL.map(|corner| {
        let (sx, sz) = corner.signs();
        Vec3::new(
            center.x + sx * half_extents.x,
            0.0,
            center.y + sz * half_extents.y,
        )
    });
    for (index, corner) in corners.iter().enumerate() {
        let next = corners[(index + 1) % corners.len()];
        draw_world_polyline(frame, project, *corner, next, color);
    }
}

fn pixel(screen: Vec2) -> (i32, i32) {
    (screen.x.round() as i32, screen.y.round() as i32)
}

/// RGBA frame buffer with clipped drawing primitives.
struct Frame<'a> {
    bytes: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Frame<'a> {
    fn new(bytes: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.bytes.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn put(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let x = x as usize;
        let y = y as usize;
        let Some(pixel_offset) = y
            .checked_mul(self.width as usize)
            .and_then(|row| row.checked_add(x))
        else {
            return;
        };
        let Some(byte_offset) = pixel_offset.checked_mul(4) else {
            return;
        };
        let Some(end) = byte_offset.checked_add(4) else {
            return;
        };
        if end > self.bytes.len() {
            return;
        }
        self.bytes[byte_offset..end].copy_from_slice(&color);
    }

    fn fill_square(&mut self, cx: i32, cy: i32, half_size: i32, color: [u8; 4]) {
        for y in (cy - half_size)..=(cy + half_size) {
            for x in (cx - half_size)..=(cx + half_size) {
                self.put(x, y, color);
            }
        }
    }

    fn square_outline(&mut self, cx: i32, cy: i32, half_size: i32, color: [u8; 4]) {
        let half = half_size as f32;
        let center = Vec2::new(cx as f32, cy as f32);
        self.rect_outline(center - Vec2::splat(half), center + Vec2::splat(half), color);
    }

    fn rect_outline(&mut self, min: Vec2, max: Vec2, color: [u8; 4]) {
        let (left, top) = pixel(min);
        let (right, bottom) = pixel(max);
        for x in left..=right {
            self.put(x, top, color);
            self.put(x, bottom, color);
        }
        for y in top..=bottom {
            self.put(left, y, color);
            self.put(right, y, color);
        }
    }

    fn cross(&mut self, cx: i32, cy: i32, half_size: i32, color: [u8; 4]) {
        for x in (cx - half_size)..=(cx + half_size) {
            self.put(x, cy, color);
        }
        for y in (cy - half_size)..=(cy + half_size) {
            self.put(cx, y, color);
        }
    }

    /// Bresenham line between two screen points.
    fn line(&mut self, from: Vec2, to: Vec2, color: [u8; 4]) {
        let limit_x = self.width as f32 * LINE_CULL_FACTOR;
        let limit_y = self.height as f32 * LINE_CULL_FACTOR;
        let out_of_reach = |point: Vec2| point.x.abs() > limit_x || point.y.abs() > limit_y;
        if out_of_reach(from) || out_of_reach(to) {
            return;
        }

        let (mut x, mut y) = pixel(from);
        let (x1, y1) = pixel(to);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let step_x = if x < x1 { 1 } else { -1 };
        let step_y = if y < y1 { 1 } else { -1 };
        let mut error = dx + dy;
        loop {
            self.put(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let doubled = error * 2;
            if doubled >= dy {
                error += dy;
                x += step_x;
            }
            if doubled <= dx {
                error += dx;
                y += step_y;
            }
        }
    }
}
