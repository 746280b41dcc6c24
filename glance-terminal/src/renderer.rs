/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector4};
use std::io::{stdout, Write};
use tracing::trace;

use glance_core::rotation::{rotation_matrix_degrees, transform_direction, transform_point};
use glance_core::{
    Frustum, LightParameters, Material, MeshMode, RenderBackend, Transform, Vector3, Vertex,
};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 2.0;

/// Vertices at or behind this clip-space `w` are dropped with their triangle
const MIN_CLIP_W: f32 = 1e-6;

#[derive(Debug, Clone, Copy, Default)]
struct LightSlot {
    enabled: bool,
    parameters: Option<LightParameters>,
}

/// A vertex after projection
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
}

/// Region of the character grid the viewport maps onto
#[derive(Debug, Clone, Copy, PartialEq)]
struct Region {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    background: Color,
    viewport: (u32, u32),
    region: Region,
    eye: Vector3,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    model: Matrix4<f32>,
    model_stack: Vec<Matrix4<f32>>,
    mode: MeshMode,
    material: Option<Material>,
    lights: Vec<LightSlot>,
    status: String,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        let mut renderer = Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::White; size],
            background: Color::Reset,
            viewport: (width as u32, height as u32),
            region: Region {
                x: 0.0,
                y: 0.0,
                width: width as f32,
                height: height as f32,
            },
            eye: Vector3::ZERO,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            model: Matrix4::identity(),
            model_stack: Vec::new(),
            mode: MeshMode::Solid,
            material: None,
            lights: Vec::new(),
            status: String::new(),
        };
        renderer.update_region();
        renderer
    }

    /// Follow a terminal resize. Buffers are cleared.
    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
        self.color_buffer = vec![Color::White; size];
        self.update_region();
    }

    /// Text drawn over the first row when the frame is presented.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Character at a grid cell, mostly useful in tests.
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Current model matrix.
    pub fn model_matrix(&self) -> &Matrix4<f32> {
        &self.model
    }

    pub fn clear(&mut self) {
        for i in 0..self.depth_buffer.len() {
            self.depth_buffer[i] = f32::INFINITY;
            self.char_buffer[i] = ' ';
            self.color_buffer[i] = Color::White;
        }
    }

    /// Fit the viewport's aspect ratio into the grid, centred.
    fn update_region(&mut self) {
        let (vw, vh) = self.viewport;
        let (gw, gh) = (self.width as f32, self.height as f32);
        if vw == 0 || vh == 0 || gw == 0.0 || gh == 0.0 {
            self.region = Region {
                x: 0.0,
                y: 0.0,
                width: gw,
                height: gh,
            };
            return;
        }

        let aspect = vw as f32 / vh as f32;
        let (width, height) = if gw / (gh * CELL_ASPECT) > aspect {
            (gh * CELL_ASPECT * aspect, gh)
        } else {
            (gw, gw / aspect / CELL_ASPECT)
        };

        self.region = Region {
            x: (gw - width) / 2.0,
            y: (gh - height) / 2.0,
            width,
            height,
        };
    }

    fn slot(&mut self, index: usize) -> &mut LightSlot {
        if index >= self.lights.len() {
            self.lights.resize(index + 1, LightSlot::default());
        }
        &mut self.lights[index]
    }

    /// Model transform applied after whatever is already on the model.
    fn apply(&mut self, matrix: Matrix4<f32>) {
        self.model = matrix * self.model;
    }

    fn project(&self, world: Vector3) -> Option<ScreenVertex> {
        let clip = self.projection * self.view * Vector4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= MIN_CLIP_W {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        Some(ScreenVertex {
            x: self.region.x + (ndc_x + 1.0) * 0.5 * self.region.width,
            y: self.region.y + (1.0 - ndc_y) * 0.5 * self.region.height,
            depth,
        })
    }

    /// Fixed-function style Phong shading at one world-space vertex.
    fn shade(&self, position: Vector3, normal: Vector3) -> Vector3 {
        let Some(material) = self.material else {
            return Vector3::new(1.0, 1.0, 1.0);
        };

        let to_eye = (self.eye - position).normalized();
        let mut color = Vector3::ZERO;

        for light in self.lights.iter().filter(|l| l.enabled) {
            let Some(parameters) = light.parameters else {
                continue;
            };

            color += parameters.ambient.intensify(&material.ambient);

            let to_light = (parameters.position - position).normalized();
            let lambert = normal.dot(&to_light).max(0.0);
            color += parameters.diffuse.intensify(&material.diffuse) * lambert;

            if lambert > 0.0 {
                let half = (to_light + to_eye).normalized();
                let highlight = normal.dot(&half).max(0.0).powf(material.phong_exponent);
                color += parameters.specular.intensify(&material.specular) * highlight;
            }
        }

        Vector3::new(
            color.x.clamp(0.0, 1.0),
            color.y.clamp(0.0, 1.0),
            color.z.clamp(0.0, 1.0),
        )
    }

    fn rasterize_triangle(&mut self, coords: &[ScreenVertex; 3], character: char, color: Color) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i32;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i32;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i32;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    fn draw_edge(&mut self, from: ScreenVertex, to: ScreenVertex, character: char, color: Color) {
        let steps = (to.x - from.x).abs().max((to.y - from.y).abs()).ceil().max(1.0) as i32;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t;
            let depth = from.depth + (to.depth - from.depth) * t;
            self.plot(x.floor() as i32, y.floor() as i32, depth, character, color);
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        if !(-1.0..=1.0).contains(&depth) {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.queue(SetBackgroundColor(self.background))?;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            if y == 0 && !self.status.is_empty() {
                let line: String = self.status.chars().take(self.width).collect();
                writer.queue(SetForegroundColor(Color::Yellow))?;
                writer.queue(Print(format!("{:<width$}", line, width = self.width)))?;
                continue;
            }
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl RenderBackend for AsciiRenderer {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.update_region();
    }

    fn set_view(&mut self, eye: Vector3, target: Vector3, up: Vector3) {
        self.eye = eye;
        self.view = glance_core::ViewParameters { eye, target, up }.view_matrix();
    }

    fn set_projection(&mut self, frustum: &Frustum) {
        self.projection = frustum.matrix();
    }

    fn push_transform(&mut self) {
        self.model_stack.push(self.model);
    }

    fn pop_transform(&mut self) {
        self.model = self.model_stack.pop().unwrap_or_else(Matrix4::identity);
    }

    fn translate(&mut self, offset: Vector3) {
        self.apply(Transform::translation_matrix(offset.x, offset.y, offset.z));
    }

    fn rotate(&mut self, degrees: f32, axis: Vector3) {
        self.apply(rotation_matrix_degrees(axis, degrees));
    }

    fn scale(&mut self, factors: Vector3) {
        self.apply(Transform::scale_matrix(factors.x, factors.y, factors.z));
    }

    fn set_polygon_mode(&mut self, mode: MeshMode) {
        self.mode = mode;
    }

    fn set_material(&mut self, material: &Material) {
        self.material = Some(*material);
    }

    fn enable_light(&mut self, index: usize) {
        self.slot(index).enabled = true;
    }

    fn disable_light(&mut self, index: usize) {
        self.slot(index).enabled = false;
    }

    fn set_light_parameters(&mut self, index: usize, parameters: &LightParameters) {
        self.slot(index).parameters = Some(*parameters);
    }

    fn emit_triangle(&mut self, vertices: [&Vertex; 3]) {
        let normal_matrix = Transform::normal_matrix(&self.model);

        let mut screen = [ScreenVertex {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        let mut color = Vector3::ZERO;

        for (slot, vertex) in screen.iter_mut().zip(vertices) {
            let world = transform_point(&self.model, vertex.position);
            let normal = transform_direction(&normal_matrix, vertex.normal).normalized();

            // Triangle crosses the eye plane
            let Some(projected) = self.project(world) else {
                return;
            };
            *slot = projected;
            color += self.shade(world, normal) / 3.0;
        }

        let luminance = 0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z;
        let ramp_top = LUMINOSITY_RAMP.len() - 1;
        // Covered cells never use the blank entry
        let char_index = (1 + (luminance * (ramp_top - 1) as f32).round() as usize).min(ramp_top);
        let character = LUMINOSITY_RAMP[char_index];
        let fg = to_terminal_color(color);

        match self.mode {
            MeshMode::Solid => self.rasterize_triangle(&screen, character, fg),
            MeshMode::Wireframe => {
                let [a, b, c] = screen;
                self.draw_edge(a, b, '#', fg);
                self.draw_edge(b, c, '#', fg);
                self.draw_edge(c, a, '#', fg);
            }
        }
    }

    fn clear_frame(&mut self, color: Vector3) {
        self.background = to_terminal_color(color);
        self.clear();
    }

    fn present_frame(&mut self) -> glance_core::Result<()> {
        let mut stdout = stdout();
        stdout.queue(cursor::MoveTo(0, 0))?;
        self.draw(&mut stdout)?;
        stdout.flush()?;
        trace!(width = self.width, height = self.height, "frame presented");
        Ok(())
    }
}

/// RGB in `[0, 1]` to a 24-bit terminal color
fn to_terminal_color(color: Vector3) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
