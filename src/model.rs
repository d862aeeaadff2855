//! Render-ready models.
//!
//! A [`Model`] owns a linked program, the locations of every name its two
//! bundles asked for, a configured vertex array and the vertex buffer behind
//! it. Models are put together by [`ModelBuilder`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    abs::{
        Buffer, Primitive, Program, RenderContext, ShaderStage, Uniform, VertexArray, compile,
        link, setup_vertex_array,
    },
    bundle::{AttributeLocation, Resolution, ShaderBundle, resolve},
    error::{self, GlError, ModelError, Result},
};

/// What [`Model::draw`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawProperties {
    pub primitive: Primitive,
    /// Index of the first vertex.
    pub offset: i32,
    pub count: i32,
}

impl Default for DrawProperties {
    fn default() -> Self {
        Self {
            primitive: Primitive::Triangles,
            offset: 0,
            count: 3,
        }
    }
}

/// Collects the parts of a [`Model`] and sets it up on a context.
pub struct ModelBuilder<C: RenderContext> {
    name: String,
    vertex: Option<ShaderBundle>,
    fragment: Option<ShaderBundle>,
    buffer: Option<Buffer<C>>,
    draw: DrawProperties,
    debug: bool,
    viewport: Option<(i32, i32)>,
    clear_color: [f32; 4],
}

impl<C: RenderContext> ModelBuilder<C> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex: None,
            fragment: None,
            buffer: None,
            draw: DrawProperties::default(),
            debug: false,
            viewport: None,
            clear_color: [0.0; 4],
        }
    }

    pub fn vertex(mut self, bundle: ShaderBundle) -> Self {
        self.vertex = Some(bundle);
        self
    }

    pub fn fragment(mut self, bundle: ShaderBundle) -> Self {
        self.fragment = Some(bundle);
        self
    }

    /// The buffer every vertex attribute reads from.
    pub fn buffer(mut self, buffer: Buffer<C>) -> Self {
        self.buffer = Some(buffer);
        self
    }

    pub fn draw_properties(mut self, draw: DrawProperties) -> Self {
        self.draw = draw;
        self
    }

    /// Logs the resolved tables and attribute layouts while building.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the viewport to `width` x `height` and clears the color buffer during setup.
    pub fn viewport(mut self, width: i32, height: i32) -> Self {
        self.viewport = Some((width, height));
        self
    }

    pub fn clear_color(mut self, rgba: [f32; 4]) -> Self {
        self.clear_color = rgba;
        self
    }

    /// Compiles, links, resolves and binds.
    ///
    /// On success the model's program is active and its vertex array is bound.
    pub fn build(self, ctx: &Arc<C>) -> Result<Model<C>> {
        let Self {
            name,
            vertex,
            fragment,
            buffer,
            draw,
            debug,
            viewport,
            clear_color,
        } = self;

        let vertex = vertex.ok_or_else(|| ModelError::Incomplete {
            model: name.clone(),
            part: "vertex bundle",
        })?;
        let fragment = fragment.ok_or_else(|| ModelError::Incomplete {
            model: name.clone(),
            part: "fragment bundle",
        })?;
        let buffer = buffer.ok_or_else(|| ModelError::Incomplete {
            model: name.clone(),
            part: "vertex buffer",
        })?;

        let program = {
            let vs = compile(ctx, ShaderStage::Vertex, &vertex.source);
            let fs = compile(ctx, ShaderStage::Fragment, &fragment.source);
            link(ctx, &name, vs.as_ref(), fs.as_ref())?
                .ok_or_else(|| ModelError::LinkFailed(name.clone()))?
        };

        let vertex_locations = resolve(&**ctx, &program, &vertex);
        let fragment_locations = resolve(&**ctx, &program, &fragment);
        if debug {
            log_resolution(&name, ShaderStage::Vertex, &vertex_locations);
            log_resolution(&name, ShaderStage::Fragment, &fragment_locations);
        }

        let vertex_array = setup_vertex_array(ctx, &buffer, &vertex, &vertex_locations)?;
        if debug {
            for (attribute, layout) in &vertex.attributes {
                log::debug!(
                    "[{} VAO attribute setup] {attribute} at {:?}: size {}, type {:?}, \
                     normalize {}, stride {}, offset {}",
                    name.to_uppercase(),
                    vertex_locations.attribute(attribute),
                    layout.size,
                    layout.component_type,
                    layout.normalize,
                    layout.stride,
                    layout.offset,
                );
            }
        }

        if let Some((width, height)) = viewport {
            ctx.viewport(0, 0, width, height);
            ctx.clear_color(clear_color);
            ctx.clear_color_buffer();
        }

        program.use_program();
        vertex_array.bind();

        Ok(Model {
            ctx: Arc::clone(ctx),
            name,
            vertex,
            fragment,
            vertex_locations,
            fragment_locations,
            program,
            vertex_array,
            buffer,
            draw,
        })
    }
}

fn log_resolution<L: std::fmt::Debug>(model: &str, stage: ShaderStage, resolution: &Resolution<L>) {
    log::debug!(
        "[{} {}'s bundle attributes + uniforms]",
        model.to_uppercase(),
        stage.to_string().to_uppercase()
    );
    log::debug!("[Attribute Map] {:?}", resolution.attributes);
    log::debug!("[Uniform Map] {:?}", resolution.uniforms);
}

/// A program and vertex array ready to draw.
pub struct Model<C: RenderContext> {
    ctx: Arc<C>,
    name: String,
    vertex: ShaderBundle,
    fragment: ShaderBundle,
    vertex_locations: Resolution<C::UniformLocation>,
    fragment_locations: Resolution<C::UniformLocation>,
    program: Program<C>,
    vertex_array: VertexArray<C>,
    buffer: Buffer<C>,
    draw: DrawProperties,
}

impl<C: RenderContext> Model<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> &Program<C> {
        &self.program
    }

    pub fn vertex_array(&self) -> &VertexArray<C> {
        &self.vertex_array
    }

    pub fn buffer(&self) -> &Buffer<C> {
        &self.buffer
    }

    pub fn draw_properties(&self) -> DrawProperties {
        self.draw
    }

    pub fn set_draw_properties(&mut self, draw: DrawProperties) {
        self.draw = draw;
    }

    pub fn vertex_locations(&self) -> &Resolution<C::UniformLocation> {
        &self.vertex_locations
    }

    pub fn fragment_locations(&self) -> &Resolution<C::UniformLocation> {
        &self.fragment_locations
    }

    pub fn attribute_location(&self, name: &str) -> AttributeLocation {
        self.vertex_locations.attribute(name)
    }

    /// Location of a uniform from either bundle, vertex first.
    pub fn uniform_location(&self, name: &str) -> Option<&C::UniformLocation> {
        self.vertex_locations
            .uniform(name)
            .or_else(|| self.fragment_locations.uniform(name))
    }

    pub fn enabled_attributes(&self) -> &[u32] {
        self.vertex_array.enabled_attributes()
    }

    /// Draws with the model's [`DrawProperties`].
    pub fn draw(&self) {
        self.vertex_array
            .draw(self.draw.primitive, self.draw.offset, self.draw.count);
    }

    /// Runs every uniform's update function and uploads the result.
    ///
    /// Uniforms the program does not expose are skipped.
    pub fn update(&mut self) {
        upload_uniforms(&*self.ctx, &self.name, &mut self.vertex, &self.vertex_locations);
        upload_uniforms(&*self.ctx, &self.name, &mut self.fragment, &self.fragment_locations);
    }

    /// Uploads a one-off value by name. Returns `false` if no active uniform has that name.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) -> bool {
        let found = [
            (&self.vertex, &self.vertex_locations),
            (&self.fragment, &self.fragment_locations),
        ]
        .into_iter()
        .find_map(|(bundle, locations)| {
            let location = locations.uniform(name)?;
            let transpose = bundle
                .uniforms
                .get(name)
                .is_some_and(|desc| desc.matrix && desc.transpose);
            Some((location, transpose))
        });

        let Some((location, transpose)) = found else {
            return false;
        };
        let value = value.to_uniform();
        let transpose = transpose && value.is_matrix();
        self.ctx.set_uniform(location, &value, transpose);
        true
    }

    /// Checks the context for a pending driver error, see [`error::check_error`].
    pub fn check_error(&self, hard_fail: bool, context: &str) -> Result<Option<GlError>> {
        error::check_error(&*self.ctx, hard_fail, context)
    }
}

fn upload_uniforms<C: RenderContext>(
    ctx: &C,
    model: &str,
    bundle: &mut ShaderBundle,
    locations: &Resolution<C::UniformLocation>,
) {
    for (name, descriptor) in bundle.uniforms.iter_mut() {
        let Some(location) = locations.uniform(name) else {
            continue;
        };
        let value = descriptor.next_value();
        if value.is_matrix() != descriptor.matrix {
            log::warn!(
                "{model}: uniform {name} produced {value:?} but is declared {}a matrix, skipping",
                if descriptor.matrix { "" } else { "not " }
            );
            continue;
        }
        ctx.set_uniform(location, &value, descriptor.matrix && descriptor.transpose);
    }
}
