//! Uniform values.
//!
//! [`UniformValue`] is what gets uploaded to a uniform location, and the
//! [`Uniform`] trait turns the usual scalar, vector and matrix types into one.

use glam::{IVec3, Mat3, Mat4, Vec2, Vec3, Vec4};

/// A value that can be uploaded to a shader uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    IVec3(IVec3),
    Vec3Array(Vec<Vec3>),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    /// Whether this value is uploaded with a matrix call.
    pub fn is_matrix(&self) -> bool {
        matches!(self, UniformValue::Mat3(_) | UniformValue::Mat4(_))
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Converts the value into something a context can upload.
    fn to_uniform(&self) -> UniformValue;
}

impl Uniform for UniformValue {
    fn to_uniform(&self) -> UniformValue {
        self.clone()
    }
}

impl Uniform for bool {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Bool(*self)
    }
}

impl Uniform for i32 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Int(*self)
    }
}

impl Uniform for f32 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Float(*self)
    }
}

impl Uniform for Vec2 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec2(*self)
    }
}

impl Uniform for Vec3 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec3(*self)
    }
}

impl Uniform for Vec4 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec4(*self)
    }
}

impl Uniform for IVec3 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::IVec3(*self)
    }
}

impl Uniform for Mat3 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Mat3(*self)
    }
}

impl Uniform for Mat4 {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Mat4(*self)
    }
}

impl<const N: usize> Uniform for [Vec3; N] {
    fn to_uniform(&self) -> UniformValue {
        UniformValue::Vec3Array(self.to_vec())
    }
}

impl<T: Uniform> Uniform for &T {
    fn to_uniform(&self) -> UniformValue {
        (*self).to_uniform()
    }
}
