/*!
 * Primitive Values
 * Leaf values of the object graph and their type classification
 */

use crate::core::types::TypeName;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

/// Kind tag of a primitive value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Guid,
    Timestamp,
    Duration,
    Enum,
}

/// Families of primitive kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveTypeSet {
    /// Every primitive kind
    Primitive,
    /// Integral and floating-point kinds
    Numeric,
    /// Signed and unsigned integers
    Integral,
    /// `f32` and `f64`
    FloatingPoint,
}

impl PrimitiveKind {
    /// Canonical type name of this kind
    pub const fn type_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::String => "string",
            PrimitiveKind::Guid => "guid",
            PrimitiveKind::Timestamp => "timestamp",
            PrimitiveKind::Duration => "duration",
            PrimitiveKind::Enum => "enum",
        }
    }

    /// Resolve a built-in type name
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "bool" => PrimitiveKind::Bool,
            "char" => PrimitiveKind::Char,
            "i8" => PrimitiveKind::I8,
            "i16" => PrimitiveKind::I16,
            "i32" => PrimitiveKind::I32,
            "i64" => PrimitiveKind::I64,
            "u8" => PrimitiveKind::U8,
            "u16" => PrimitiveKind::U16,
            "u32" => PrimitiveKind::U32,
            "u64" => PrimitiveKind::U64,
            "f32" => PrimitiveKind::F32,
            "f64" => PrimitiveKind::F64,
            "string" => PrimitiveKind::String,
            "guid" => PrimitiveKind::Guid,
            "timestamp" => PrimitiveKind::Timestamp,
            "duration" => PrimitiveKind::Duration,
            _ => return None,
        })
    }

    #[inline]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::I8
                | PrimitiveKind::I16
                | PrimitiveKind::I32
                | PrimitiveKind::I64
                | PrimitiveKind::U8
                | PrimitiveKind::U16
                | PrimitiveKind::U32
                | PrimitiveKind::U64
        )
    }

    #[inline]
    pub const fn is_floating_point(self) -> bool {
        matches!(self, PrimitiveKind::F32 | PrimitiveKind::F64)
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        self.is_integral() || self.is_floating_point()
    }

    /// Membership test against a kind family
    pub const fn belongs_to(self, set: PrimitiveTypeSet) -> bool {
        match set {
            PrimitiveTypeSet::Primitive => true,
            PrimitiveTypeSet::Numeric => self.is_numeric(),
            PrimitiveTypeSet::Integral => self.is_integral(),
            PrimitiveTypeSet::FloatingPoint => self.is_floating_point(),
        }
    }
}

impl PrimitiveTypeSet {
    /// Built-in kinds belonging to this family
    pub fn kinds(self) -> impl Iterator<Item = PrimitiveKind> {
        const ALL: [PrimitiveKind; 17] = [
            PrimitiveKind::Bool,
            PrimitiveKind::Char,
            PrimitiveKind::I8,
            PrimitiveKind::I16,
            PrimitiveKind::I32,
            PrimitiveKind::I64,
            PrimitiveKind::U8,
            PrimitiveKind::U16,
            PrimitiveKind::U32,
            PrimitiveKind::U64,
            PrimitiveKind::F32,
            PrimitiveKind::F64,
            PrimitiveKind::String,
            PrimitiveKind::Guid,
            PrimitiveKind::Timestamp,
            PrimitiveKind::Duration,
            PrimitiveKind::Enum,
        ];
        ALL.into_iter().filter(move |kind| kind.belongs_to(self))
    }
}

/// A leaf value, copied by value and compared natively
#[derive(Clone)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(Arc<str>),
    Guid(Uuid),
    Timestamp(OffsetDateTime),
    Duration(Duration),
    /// Named enumeration member, stored by its underlying value
    Enum { ty: TypeName, value: i64 },
}

impl Primitive {
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Primitive::Bool(_) => PrimitiveKind::Bool,
            Primitive::Char(_) => PrimitiveKind::Char,
            Primitive::I8(_) => PrimitiveKind::I8,
            Primitive::I16(_) => PrimitiveKind::I16,
            Primitive::I32(_) => PrimitiveKind::I32,
            Primitive::I64(_) => PrimitiveKind::I64,
            Primitive::U8(_) => PrimitiveKind::U8,
            Primitive::U16(_) => PrimitiveKind::U16,
            Primitive::U32(_) => PrimitiveKind::U32,
            Primitive::U64(_) => PrimitiveKind::U64,
            Primitive::F32(_) => PrimitiveKind::F32,
            Primitive::F64(_) => PrimitiveKind::F64,
            Primitive::Str(_) => PrimitiveKind::String,
            Primitive::Guid(_) => PrimitiveKind::Guid,
            Primitive::Timestamp(_) => PrimitiveKind::Timestamp,
            Primitive::Duration(_) => PrimitiveKind::Duration,
            Primitive::Enum { .. } => PrimitiveKind::Enum,
        }
    }

    /// Runtime type name: the kind name, or the enum's declared type
    pub fn type_name(&self) -> &str {
        match self {
            Primitive::Enum { ty, .. } => ty.as_str(),
            other => other.kind().type_name(),
        }
    }

    pub fn enum_member(ty: impl Into<TypeName>, value: i64) -> Self {
        Primitive::Enum {
            ty: ty.into(),
            value,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Primitive::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integral value widened to `i128`
    pub fn as_i128(&self) -> Option<i128> {
        Some(match *self {
            Primitive::I8(v) => v as i128,
            Primitive::I16(v) => v as i128,
            Primitive::I32(v) => v as i128,
            Primitive::I64(v) => v as i128,
            Primitive::U8(v) => v as i128,
            Primitive::U16(v) => v as i128,
            Primitive::U32(v) => v as i128,
            Primitive::U64(v) => v as i128,
            _ => return None,
        })
    }

    /// Numeric value widened to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Primitive::F32(v) => Some(v as f64),
            Primitive::F64(v) => Some(v),
            _ => self.as_i128().map(|v| v as f64),
        }
    }

    /// Natural ordering between two primitives
    ///
    /// Numbers compare across widths; other kinds only against themselves.
    /// Returns `None` when the kinds have no common ordering.
    pub fn try_compare(&self, other: &Primitive) -> Option<Ordering> {
        use Primitive::*;
        match (self, other) {
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Char(a), Char(b)) => Some(a.cmp(b)),
            (Str(a), Str(b)) => Some(a.cmp(b)),
            (Guid(a), Guid(b)) => Some(a.cmp(b)),
            (Timestamp(a), Timestamp(b)) => Some(a.cmp(b)),
            (Duration(a), Duration(b)) => Some(a.cmp(b)),
            (Enum { ty: ta, value: a }, Enum { ty: tb, value: b }) if ta == tb => Some(a.cmp(b)),
            _ if self.kind().is_numeric() && other.kind().is_numeric() => {
                match (self.as_i128(), other.as_i128()) {
                    (Some(a), Some(b)) => Some(a.cmp(&b)),
                    _ => {
                        let a = self.as_f64()?;
                        let b = other.as_f64()?;
                        Some(a.total_cmp(&b))
                    }
                }
            }
            _ => None,
        }
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        use Primitive::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (F32(a), F32(b)) => a.total_cmp(b).is_eq(),
            (F64(a), F64(b)) => a.total_cmp(b).is_eq(),
            (Str(a), Str(b)) => a == b,
            (Guid(a), Guid(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (Duration(a), Duration(b)) => a == b,
            (Enum { ty: ta, value: a }, Enum { ty: tb, value: b }) => ta == tb && a == b,
            _ => false,
        }
    }
}

impl Eq for Primitive {}

impl Hash for Primitive {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Primitive::Bool(v) => v.hash(state),
            Primitive::Char(v) => v.hash(state),
            Primitive::I8(v) => v.hash(state),
            Primitive::I16(v) => v.hash(state),
            Primitive::I32(v) => v.hash(state),
            Primitive::I64(v) => v.hash(state),
            Primitive::U8(v) => v.hash(state),
            Primitive::U16(v) => v.hash(state),
            Primitive::U32(v) => v.hash(state),
            Primitive::U64(v) => v.hash(state),
            Primitive::F32(v) => v.to_bits().hash(state),
            Primitive::F64(v) => v.to_bits().hash(state),
            Primitive::Str(v) => v.hash(state),
            Primitive::Guid(v) => v.hash(state),
            Primitive::Timestamp(v) => v.hash(state),
            Primitive::Duration(v) => v.hash(state),
            Primitive::Enum { ty, value } => {
                ty.hash(state);
                value.hash(state);
            }
        }
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Bool(v) => write!(f, "{v}"),
            Primitive::Char(v) => write!(f, "{v:?}"),
            Primitive::I8(v) => write!(f, "{v}i8"),
            Primitive::I16(v) => write!(f, "{v}i16"),
            Primitive::I32(v) => write!(f, "{v}"),
            Primitive::I64(v) => write!(f, "{v}i64"),
            Primitive::U8(v) => write!(f, "{v}u8"),
            Primitive::U16(v) => write!(f, "{v}u16"),
            Primitive::U32(v) => write!(f, "{v}u32"),
            Primitive::U64(v) => write!(f, "{v}u64"),
            Primitive::F32(v) => write!(f, "{v}f32"),
            Primitive::F64(v) => write!(f, "{v}"),
            Primitive::Str(v) => write!(f, "{v:?}"),
            Primitive::Guid(v) => write!(f, "{v}"),
            Primitive::Timestamp(v) => write!(f, "{v}"),
            Primitive::Duration(v) => write!(f, "{v}"),
            Primitive::Enum { ty, value } => write!(f, "{ty}({value})"),
        }
    }
}

macro_rules! primitive_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Primitive {
                #[inline]
                fn from(value: $ty) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

primitive_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Uuid => Guid,
    OffsetDateTime => Timestamp,
    Duration => Duration,
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::Str(Arc::from(value))
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::Str(Arc::from(value))
    }
}
