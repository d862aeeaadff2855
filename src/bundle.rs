//! Shader bundles and name resolution.
//!
//! A [`ShaderBundle`] is the source of one shader stage together with the
//! attributes and uniforms the caller wants to reach by name. After the
//! program is linked, [`resolve`] looks every name up and returns a
//! [`Resolution`]; the bundle itself is never modified.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::abs::{Program, RenderContext, Uniform, UniformValue};

/// The data type of each component of a vertex attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Byte = glow::BYTE as isize,
    UnsignedByte = glow::UNSIGNED_BYTE as isize,
    Short = glow::SHORT as isize,
    UnsignedShort = glow::UNSIGNED_SHORT as isize,
    Int = glow::INT as isize,
    UnsignedInt = glow::UNSIGNED_INT as isize,
    HalfFloat = glow::HALF_FLOAT as isize,
    #[default]
    Float = glow::FLOAT as isize,
}

impl ComponentType {
    /// Size of one component in bytes.
    pub fn size_bytes(self) -> u32 {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort | ComponentType::HalfFloat => 2,
            ComponentType::Int | ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

/// Layout of one vertex attribute inside the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeDescriptor {
    /// Components per vertex, 1 to 4.
    pub size: u8,
    pub component_type: ComponentType,
    pub normalize: bool,
    /// Bytes between consecutive vertices, 0 for tightly packed.
    pub stride: u32,
    /// Byte offset of the first component.
    pub offset: u32,
}

impl Default for AttributeDescriptor {
    fn default() -> Self {
        Self {
            size: 4,
            component_type: ComponentType::Float,
            normalize: false,
            stride: 0,
            offset: 0,
        }
    }
}

impl AttributeDescriptor {
    pub fn new(size: u8, component_type: ComponentType) -> Self {
        Self {
            size,
            component_type,
            ..Default::default()
        }
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = stride;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// First byte past the attribute's last component, relative to the vertex start.
    pub fn end(&self) -> u32 {
        self.offset + u32::from(self.size) * self.component_type.size_bytes()
    }
}

/// A uniform the model keeps up to date.
///
/// `update` produces the value uploaded on every [`Model::update`](crate::Model::update).
pub struct UniformDescriptor {
    pub matrix: bool,
    /// Only honoured for matrices.
    pub transpose: bool,
    update: Box<dyn FnMut() -> UniformValue>,
}

impl UniformDescriptor {
    /// A scalar or vector uniform driven by `update`.
    pub fn new<T: Uniform + 'static>(mut update: impl FnMut() -> T + 'static) -> Self {
        Self {
            matrix: false,
            transpose: false,
            update: Box::new(move || update().to_uniform()),
        }
    }

    /// A matrix uniform driven by `update`.
    pub fn matrix<T: Uniform + 'static>(
        transpose: bool,
        mut update: impl FnMut() -> T + 'static,
    ) -> Self {
        Self {
            matrix: true,
            transpose,
            update: Box::new(move || update().to_uniform()),
        }
    }

    /// A uniform that always uploads the same value.
    pub fn constant<T: Uniform + 'static>(value: T) -> Self {
        let value = value.to_uniform();
        Self {
            matrix: value.is_matrix(),
            transpose: false,
            update: Box::new(move || value.clone()),
        }
    }

    /// Produces the next value to upload.
    pub fn next_value(&mut self) -> UniformValue {
        (self.update)()
    }
}

impl std::fmt::Debug for UniformDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniformDescriptor")
            .field("matrix", &self.matrix)
            .field("transpose", &self.transpose)
            .finish_non_exhaustive()
    }
}

/// Source text of one shader stage plus the names to resolve against the
/// linked program.
#[derive(Debug)]
pub struct ShaderBundle {
    pub source: String,
    pub attributes: IndexMap<String, AttributeDescriptor>,
    pub uniforms: IndexMap<String, UniformDescriptor>,
}

impl ShaderBundle {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            attributes: IndexMap::new(),
            uniforms: IndexMap::new(),
        }
    }

    pub fn with_attribute(
        mut self,
        name: impl Into<String>,
        descriptor: AttributeDescriptor,
    ) -> Self {
        self.attributes.insert(name.into(), descriptor);
        self
    }

    pub fn with_attributes(mut self, attributes: IndexMap<String, AttributeDescriptor>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn with_uniform(mut self, name: impl Into<String>, descriptor: UniformDescriptor) -> Self {
        self.uniforms.insert(name.into(), descriptor);
        self
    }
}

/// Where an attribute ended up in a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeLocation {
    Active(u32),
    /// The program has no active input of this name, it was never declared
    /// or got optimized out.
    NotFound,
}

impl AttributeLocation {
    pub fn index(self) -> Option<u32> {
        match self {
            AttributeLocation::Active(index) => Some(index),
            AttributeLocation::NotFound => None,
        }
    }
}

/// Locations of a bundle's names in one linked program.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<L> {
    pub attributes: IndexMap<String, AttributeLocation>,
    /// `None` is stored for uniforms the program does not expose.
    pub uniforms: IndexMap<String, Option<L>>,
}

impl<L> Resolution<L> {
    /// Location of `name`; names the bundle never declared are also `NotFound`.
    pub fn attribute(&self, name: &str) -> AttributeLocation {
        self.attributes
            .get(name)
            .copied()
            .unwrap_or(AttributeLocation::NotFound)
    }

    pub fn uniform(&self, name: &str) -> Option<&L> {
        self.uniforms.get(name).and_then(Option::as_ref)
    }
}

/// Looks up every attribute and uniform of `bundle` in `program`.
///
/// Must run after the program is linked. Names are visited in bundle order,
/// and running it twice against the same program gives equal results.
pub fn resolve<C: RenderContext>(
    ctx: &C,
    program: &Program<C>,
    bundle: &ShaderBundle,
) -> Resolution<C::UniformLocation> {
    let attributes = bundle
        .attributes
        .keys()
        .map(|name| {
            let location = match ctx.attrib_location(program.id(), name) {
                Some(index) => AttributeLocation::Active(index),
                None => AttributeLocation::NotFound,
            };
            (name.clone(), location)
        })
        .collect();

    let uniforms = bundle
        .uniforms
        .keys()
        .map(|name| (name.clone(), ctx.uniform_location(program.id(), name)))
        .collect();

    Resolution {
        attributes,
        uniforms,
    }
}
