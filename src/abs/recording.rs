//! A [`RenderContext`] that records what it is asked to do.
//!
//! Shader sources are scanned line by line: `in <type> <name>;` in a vertex
//! shader declares an attribute and `uniform <type> <name>;` declares a
//! uniform. A source compiles when it contains `void main`. Every driver
//! object is tracked so tests can check that nothing leaks.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet, VecDeque},
};

use crate::{
    abs::{BufferUsage, Primitive, RenderContext, ShaderStage, UniformValue},
    bundle::AttributeDescriptor,
};

const MAX_VERTEX_ATTRIBS: u32 = 16;

struct MockShader {
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

#[derive(Default)]
struct MockProgram {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, MockShader>,
    created_shaders: usize,
    programs: HashMap<u32, MockProgram>,
    buffers: HashSet<u32>,
    vertex_arrays: HashSet<u32>,
    errors: VecDeque<u32>,
    link_failure: Option<String>,
    bound_buffer: Option<u32>,
    bound_vertex_array: Option<u32>,
    current_program: Option<u32>,
    enabled: Vec<u32>,
    pointers: Vec<(u32, AttributeDescriptor, Option<u32>)>,
    uploads: Vec<(usize, BufferUsage)>,
    uniform_uploads: Vec<((u32, u32), UniformValue, bool)>,
    draws: Vec<(Primitive, i32, i32)>,
    viewport: Option<[i32; 4]>,
    clear_color: Option<[f32; 4]>,
    clears: usize,
}

impl State {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn raise(&mut self, code: u32) {
        self.errors.push_back(code);
    }
}

/// Test double for a graphics context.
#[derive(Default)]
pub struct RecordingContext {
    state: RefCell<State>,
}

fn declared_name(line: &str, keyword: &str) -> Option<String> {
    let mut tokens = line.trim().trim_end_matches(';').split_whitespace();
    if tokens.next()? != keyword {
        return None;
    }
    tokens.last().map(str::to_string)
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a code for the next `get_error` calls.
    pub fn push_error(&self, code: u32) {
        self.state.borrow_mut().raise(code);
    }

    /// Makes the next `link_program` fail with `log`.
    pub fn fail_next_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn created_shaders(&self) -> usize {
        self.state.borrow().created_shaders
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.state.borrow().vertex_arrays.len()
    }

    pub fn bound_buffer(&self) -> Option<u32> {
        self.state.borrow().bound_buffer
    }

    pub fn bound_vertex_array(&self) -> Option<u32> {
        self.state.borrow().bound_vertex_array
    }

    pub fn current_program(&self) -> Option<u32> {
        self.state.borrow().current_program
    }

    pub fn enabled_attributes(&self) -> Vec<u32> {
        self.state.borrow().enabled.clone()
    }

    /// `(index, layout, buffer bound at the time)` for every pointer call.
    pub fn attrib_pointers(&self) -> Vec<(u32, AttributeDescriptor, Option<u32>)> {
        self.state.borrow().pointers.clone()
    }

    pub fn uploads(&self) -> Vec<(usize, BufferUsage)> {
        self.state.borrow().uploads.clone()
    }

    pub fn uniform_uploads(&self) -> Vec<((u32, u32), UniformValue, bool)> {
        self.state.borrow().uniform_uploads.clone()
    }

    pub fn draws(&self) -> Vec<(Primitive, i32, i32)> {
        self.state.borrow().draws.clone()
    }

    pub fn viewport_rect(&self) -> Option<[i32; 4]> {
        self.state.borrow().viewport
    }

    pub fn last_clear_color(&self) -> Option<[f32; 4]> {
        self.state.borrow().clear_color
    }

    pub fn clears(&self) -> usize {
        self.state.borrow().clears
    }

    pub fn pending_errors(&self) -> usize {
        self.state.borrow().errors.len()
    }
}

impl RenderContext for RecordingContext {
    type Shader = u32;
    type Program = u32;
    type UniformLocation = (u32, u32);
    type Buffer = u32;
    type VertexArray = u32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.created_shaders += 1;
        state.shaders.insert(
            id,
            MockShader {
                stage,
                source: String::new(),
                compiled: false,
            },
        );
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(s) => s.source = source.to_string(),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    fn compile_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        match state.shaders.get_mut(&shader) {
            Some(s) => s.compiled = s.source.contains("void main"),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .is_some_and(|s| s.compiled)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        match self.state.borrow().shaders.get(&shader) {
            Some(s) if !s.compiled => {
                "0:1(1): error: syntax error, unexpected end of file".to_string()
            }
            _ => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        let mut state = self.state.borrow_mut();
        if state.shaders.remove(&shader).is_none() {
            state.raise(glow::INVALID_VALUE);
        }
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.programs.insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        if !state.shaders.contains_key(&shader) {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        match state.programs.get_mut(&program) {
            Some(p) => p.attached.push(shader),
            None => state.raise(glow::INVALID_VALUE),
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        let mut state = self.state.borrow_mut();
        match state.programs.get_mut(&program) {
            Some(p) if p.attached.contains(&shader) => p.attached.retain(|&s| s != shader),
            _ => state.raise(glow::INVALID_OPERATION),
        }
    }

    fn link_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        let forced = state.link_failure.take();
        let Some(attached) = state.programs.get(&program).map(|p| p.attached.clone()) else {
            state.raise(glow::INVALID_VALUE);
            return;
        };

        let mut attributes = Vec::new();
        let mut uniforms: Vec<String> = Vec::new();
        let mut stages = Vec::new();
        for id in &attached {
            let Some(shader) = state.shaders.get(id) else {
                continue;
            };
            if !shader.compiled {
                continue;
            }
            stages.push(shader.stage);
            for line in shader.source.lines() {
                if shader.stage == ShaderStage::Vertex {
                    if let Some(name) = declared_name(line, "in") {
                        attributes.push(name);
                    }
                }
                if let Some(name) = declared_name(line, "uniform") {
                    if !uniforms.contains(&name) {
                        uniforms.push(name);
                    }
                }
            }
        }

        let complete =
            stages.contains(&ShaderStage::Vertex) && stages.contains(&ShaderStage::Fragment);
        let log = match forced {
            Some(log) => log,
            None if !complete => "error: program needs a vertex and a fragment shader".to_string(),
            None => String::new(),
        };

        if let Some(p) = state.programs.get_mut(&program) {
            p.linked = log.is_empty();
            p.log = log;
            if p.linked {
                p.attributes = attributes;
                p.uniforms = uniforms;
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: u32) {
        let mut state = self.state.borrow_mut();
        if state.programs.remove(&program).is_none() {
            state.raise(glow::INVALID_VALUE);
        }
        if state.current_program == Some(program) {
            state.current_program = None;
        }
    }

    fn use_program(&self, program: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match program {
            Some(id) if !state.programs.get(&id).is_some_and(|p| p.linked) => {
                state.raise(glow::INVALID_OPERATION)
            }
            _ => state.current_program = program,
        }
    }

    fn attrib_location(&self, program: u32, name: &str) -> Option<u32> {
        let mut state = self.state.borrow_mut();
        let location = match state.programs.get(&program) {
            Some(p) if p.linked => p.attributes.iter().position(|a| a == name),
            _ => {
                state.raise(glow::INVALID_OPERATION);
                return None;
            }
        };
        location.map(|index| index as u32)
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<(u32, u32)> {
        let mut state = self.state.borrow_mut();
        let location = match state.programs.get(&program) {
            Some(p) if p.linked => p.uniforms.iter().position(|u| u == name),
            _ => {
                state.raise(glow::INVALID_OPERATION);
                return None;
            }
        };
        location.map(|index| (program, index as u32))
    }

    fn set_uniform(&self, location: &(u32, u32), value: &UniformValue, transpose: bool) {
        let mut state = self.state.borrow_mut();
        if state.current_program != Some(location.0) {
            state.raise(glow::INVALID_OPERATION);
            return;
        }
        state
            .uniform_uploads
            .push((*location, value.clone(), transpose));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.buffers.insert(id);
        Ok(id)
    }

    fn bind_array_buffer(&self, buffer: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match buffer {
            Some(id) if !state.buffers.contains(&id) => state.raise(glow::INVALID_OPERATION),
            _ => state.bound_buffer = buffer,
        }
    }

    fn array_buffer_data(&self, data: &[u8], usage: BufferUsage) {
        let mut state = self.state.borrow_mut();
        if state.bound_buffer.is_none() {
            state.raise(glow::INVALID_OPERATION);
            return;
        }
        state.uploads.push((data.len(), usage));
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        if !state.buffers.remove(&buffer) {
            state.raise(glow::INVALID_VALUE);
        }
        if state.bound_buffer == Some(buffer) {
            state.bound_buffer = None;
        }
    }

    fn create_vertex_array(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        state.vertex_arrays.insert(id);
        Ok(id)
    }

    fn bind_vertex_array(&self, vertex_array: Option<u32>) {
        let mut state = self.state.borrow_mut();
        match vertex_array {
            Some(id) if !state.vertex_arrays.contains(&id) => state.raise(glow::INVALID_OPERATION),
            _ => state.bound_vertex_array = vertex_array,
        }
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        let mut state = self.state.borrow_mut();
        if !state.vertex_arrays.remove(&vertex_array) {
            state.raise(glow::INVALID_VALUE);
        }
        if state.bound_vertex_array == Some(vertex_array) {
            state.bound_vertex_array = None;
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBS {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        state.enabled.push(index);
    }

    fn vertex_attrib_pointer(&self, index: u32, layout: &AttributeDescriptor) {
        let mut state = self.state.borrow_mut();
        if index >= MAX_VERTEX_ATTRIBS || !(1..=4).contains(&layout.size) {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        let bound = state.bound_buffer;
        state.pointers.push((index, *layout, bound));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        let mut state = self.state.borrow_mut();
        if width < 0 || height < 0 {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        state.viewport = Some([x, y, width, height]);
    }

    fn clear_color(&self, rgba: [f32; 4]) {
        self.state.borrow_mut().clear_color = Some(rgba);
    }

    fn clear_color_buffer(&self) {
        self.state.borrow_mut().clears += 1;
    }

    fn draw_arrays(&self, primitive: Primitive, first: i32, count: i32) {
        let mut state = self.state.borrow_mut();
        if first < 0 || count < 0 {
            state.raise(glow::INVALID_VALUE);
            return;
        }
        if state.current_program.is_none() || state.bound_vertex_array.is_none() {
            state.raise(glow::INVALID_OPERATION);
            return;
        }
        state.draws.push((primitive, first, count));
    }

    fn get_error(&self) -> u32 {
        self.state
            .borrow_mut()
            .errors
            .pop_front()
            .unwrap_or(glow::NO_ERROR)
    }
}
