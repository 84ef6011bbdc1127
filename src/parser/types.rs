use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Built-in GLSL types the debugger knows how to visualize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslType {
    Float,
    Int,
    Uint,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    UVec2,
    UVec3,
    UVec4,
    BVec2,
    BVec3,
    BVec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,
}

/// Coarse shape of a type, which decides how it maps onto a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Scalar,
    Vector(usize),
    Matrix(usize),
    Sampler,
}

impl GlslType {
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "float" => GlslType::Float,
            "int" => GlslType::Int,
            "uint" => GlslType::Uint,
            "bool" => GlslType::Bool,
            "vec2" => GlslType::Vec2,
            "vec3" => GlslType::Vec3,
            "vec4" => GlslType::Vec4,
            "ivec2" => GlslType::IVec2,
            "ivec3" => GlslType::IVec3,
            "ivec4" => GlslType::IVec4,
            "uvec2" => GlslType::UVec2,
            "uvec3" => GlslType::UVec3,
            "uvec4" => GlslType::UVec4,
            "bvec2" => GlslType::BVec2,
            "bvec3" => GlslType::BVec3,
            "bvec4" => GlslType::BVec4,
            "mat2" | "mat2x2" => GlslType::Mat2,
            "mat3" | "mat3x3" => GlslType::Mat3,
            "mat4" | "mat4x4" => GlslType::Mat4,
            "sampler2D" => GlslType::Sampler2D,
            "sampler3D" => GlslType::Sampler3D,
            "samplerCube" => GlslType::SamplerCube,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(self) -> &'static str {
        match self {
            GlslType::Float => "float",
            GlslType::Int => "int",
            GlslType::Uint => "uint",
            GlslType::Bool => "bool",
            GlslType::Vec2 => "vec2",
            GlslType::Vec3 => "vec3",
            GlslType::Vec4 => "vec4",
            GlslType::IVec2 => "ivec2",
            GlslType::IVec3 => "ivec3",
            GlslType::IVec4 => "ivec4",
            GlslType::UVec2 => "uvec2",
            GlslType::UVec3 => "uvec3",
            GlslType::UVec4 => "uvec4",
            GlslType::BVec2 => "bvec2",
            GlslType::BVec3 => "bvec3",
            GlslType::BVec4 => "bvec4",
            GlslType::Mat2 => "mat2",
            GlslType::Mat3 => "mat3",
            GlslType::Mat4 => "mat4",
            GlslType::Sampler2D => "sampler2D",
            GlslType::Sampler3D => "sampler3D",
            GlslType::SamplerCube => "samplerCube",
        }
    }

    pub fn shape(self) -> TypeShape {
        use GlslType::*;
        match self {
            Float | Int | Uint | Bool => TypeShape::Scalar,
            Vec2 | IVec2 | UVec2 | BVec2 => TypeShape::Vector(2),
            Vec3 | IVec3 | UVec3 | BVec3 => TypeShape::Vector(3),
            Vec4 | IVec4 | UVec4 | BVec4 => TypeShape::Vector(4),
            Mat2 => TypeShape::Matrix(2),
            Mat3 => TypeShape::Matrix(3),
            Mat4 => TypeShape::Matrix(4),
            Sampler2D | Sampler3D | SamplerCube => TypeShape::Sampler,
        }
    }

    /// True for types whose components are already floats.
    pub fn is_float_based(self) -> bool {
        use GlslType::*;
        matches!(self, Float | Vec2 | Vec3 | Vec4 | Mat2 | Mat3 | Mat4)
    }

    /// A zero-valued constructor expression, or `None` for opaque types.
    pub fn zero_value(self) -> Option<String> {
        use GlslType::*;
        let value = match self {
            Float => "0.0".to_string(),
            Int => "0".to_string(),
            Uint => "0u".to_string(),
            Bool => "false".to_string(),
            Vec2 | Vec3 | Vec4 | Mat2 | Mat3 | Mat4 => format!("{}(0.0)", self.name()),
            IVec2 | IVec3 | IVec4 => format!("{}(0)", self.name()),
            UVec2 | UVec3 | UVec4 => format!("{}(0u)", self.name()),
            BVec2 | BVec3 | BVec4 => format!("{}(false)", self.name()),
            Sampler2D | Sampler3D | SamplerCube => return None,
        };
        Some(value)
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of the probed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarInfo {
    pub name: String,
    pub ty: GlslType,
}

impl VarInfo {
    pub fn new(name: impl Into<String>, ty: GlslType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Name -> type of everything visible at a line.
pub type TypeEnv = HashMap<String, GlslType>;

/// Parameter storage qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamQualifier {
    In,
    Out,
    InOut,
}

impl ParamQualifier {
    /// Whether the argument must be an assignable lvalue.
    pub fn is_writable(self) -> bool {
        matches!(self, ParamQualifier::Out | ParamQualifier::InOut)
    }
}

/// One declared function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub qualifier: Option<ParamQualifier>,
    pub ty: String,
    pub name: String,
}

/// Boundaries of a function definition.
///
/// `end` is the line holding the closing brace; when the body never closes,
/// `end` is the last scanned line and `terminated` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub name: String,
    pub return_type: String,
    pub params: Vec<Param>,
    pub start: usize,
    pub brace_line: usize,
    pub end: usize,
    pub terminated: bool,
}

impl FunctionInfo {
    pub fn returns_value(&self) -> bool {
        self.return_type != "void"
    }
}

/// A `for`/`while` loop discovered by the canonical source-order scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopInfo {
    pub loop_index: usize,
    pub line_number: usize,
    /// Line of the matching closing brace; `None` if it never closes or the loop has no braces.
    pub end_line: Option<usize>,
    /// Line holding the opening brace of the body.
    #[serde(skip)]
    pub brace_line: Option<usize>,
    pub header: String,
    pub max_iter: Option<u32>,
}

impl LoopInfo {
    pub fn contains(&self, line: usize) -> bool {
        match self.end_line {
            Some(end) => self.line_number < line && line < end,
            None => false,
        }
    }
}
