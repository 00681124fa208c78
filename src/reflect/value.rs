/*!
 * Value Model
 *
 * Dynamic object graph walked by the deep equality and clone operations:
 * - `Value::Primitive` and `Value::Struct` have value semantics
 * - `Value::Object` is a shared, lockable reference object with an identity
 */

use super::layout::Layout;
use super::primitive::Primitive;
use crate::core::errors::{FicheError, Result};
use crate::core::types::{Identity, TypeKind, TypeName};
use crate::core::validation::ensure_argument;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Fields of a composite, stored in layout slot order
#[derive(Clone)]
pub struct Composite {
    layout: Arc<Layout>,
    fields: Vec<Value>,
}

impl Composite {
    /// All fields start out null
    pub fn new(layout: Arc<Layout>) -> Self {
        let fields = vec![Value::Null; layout.len()];
        Self { layout, fields }
    }

    #[inline]
    pub fn layout(&self) -> &Arc<Layout> {
        &self.layout
    }

    #[inline]
    pub fn type_name(&self) -> &TypeName {
        &self.layout.type_name
    }

    #[inline]
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.layout.index_of(name).map(|i| &self.fields[i])
    }

    /// Assign a field by segment or field name
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.layout.index_of(name).ok_or_else(|| {
            FicheError::invalid_argument(
                "name",
                format!("{} has no field '{}'", self.layout.type_name, name),
            )
        })?;
        self.fields[index] = value.into();
        Ok(())
    }

    /// Builder form of [`Composite::set`]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    #[inline]
    pub(crate) fn set_at(&mut self, index: usize, value: Value) {
        self.fields[index] = value;
    }
}

/// Multi-dimensional array with row-major storage
#[derive(Debug, Clone)]
pub struct ArrayValue {
    element_type: TypeName,
    dims: Vec<usize>,
    items: Vec<Value>,
}

impl ArrayValue {
    /// Single-dimensional array
    pub fn new(element_type: impl Into<TypeName>, items: Vec<Value>) -> Self {
        Self {
            element_type: element_type.into(),
            dims: vec![items.len()],
            items,
        }
    }

    /// Array of the given shape, all elements null
    pub fn with_dims(element_type: impl Into<TypeName>, dims: Vec<usize>) -> Result<Self> {
        ensure_argument(!dims.is_empty(), "dims", "an array needs at least one dimension")?;
        let len = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| FicheError::out_of_range("dims", "array too large"))?;
        Ok(Self {
            element_type: element_type.into(),
            dims,
            items: vec![Value::Null; len],
        })
    }

    #[inline]
    pub fn element_type(&self) -> &TypeName {
        &self.element_type
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in row-major order
    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Runtime type name, e.g. `i32[]` or `Node[,]`
    pub fn type_name(&self) -> TypeName {
        let mut name = self.element_type.clone();
        name.push('[');
        for _ in 1..self.rank() {
            name.push(',');
        }
        name.push(']');
        name
    }

    fn offset(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.dims.len() {
            return Err(FicheError::invalid_argument(
                "index",
                format!("expected {} indices, got {}", self.dims.len(), index.len()),
            ));
        }
        let mut offset = 0usize;
        for (dim, (&i, &len)) in index.iter().zip(&self.dims).enumerate() {
            if i >= len {
                return Err(FicheError::out_of_range(
                    "index",
                    format!("{} exceeds length {} of dimension {}", i, len, dim),
                ));
            }
            offset = offset * len + i;
        }
        Ok(offset)
    }

    pub fn get(&self, index: &[usize]) -> Result<&Value> {
        let offset = self.offset(index)?;
        Ok(&self.items[offset])
    }

    pub fn set(&mut self, index: &[usize], value: impl Into<Value>) -> Result<()> {
        let offset = self.offset(index)?;
        self.items[offset] = value.into();
        Ok(())
    }

    /// Every full index of this array in row-major order
    pub fn indices(&self) -> ArrayIndices {
        ArrayIndices::new(&self.dims)
    }
}

/// Walks all positions of a multi-dimensional array, last dimension fastest
#[derive(Debug, Clone)]
pub struct ArrayIndices {
    dims: Vec<usize>,
    current: Vec<usize>,
    done: bool,
}

impl ArrayIndices {
    fn new(dims: &[usize]) -> Self {
        Self {
            dims: dims.to_vec(),
            current: vec![0; dims.len()],
            done: dims.is_empty() || dims.contains(&0),
        }
    }
}

impl Iterator for ArrayIndices {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.current.clone();
        let mut dim = self.dims.len();
        loop {
            if dim == 0 {
                self.done = true;
                break;
            }
            dim -= 1;
            self.current[dim] += 1;
            if self.current[dim] < self.dims[dim] {
                break;
            }
            self.current[dim] = 0;
        }
        Some(item)
    }
}

/// Named growable sequence class
#[derive(Debug, Clone)]
pub struct ListValue {
    type_name: TypeName,
    pub items: Vec<Value>,
}

impl ListValue {
    pub fn new(type_name: impl Into<TypeName>, items: Vec<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            items,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }
}

/// User-defined sequence whose cursor may fail to open
pub trait Enumerable: Send + Sync {
    fn type_name(&self) -> &str;

    /// Current elements, in order
    fn enumerate(&self) -> Result<Vec<Value>>;
}

/// Contents of a reference object
pub enum Object {
    Instance(Composite),
    Array(ArrayValue),
    List(ListValue),
    Custom(Box<dyn Enumerable>),
}

impl Object {
    pub fn type_name(&self) -> TypeName {
        match self {
            Object::Instance(c) => c.type_name().clone(),
            Object::Array(a) => a.type_name(),
            Object::List(l) => l.type_name().clone(),
            Object::Custom(e) => TypeName::from(e.type_name()),
        }
    }

    #[inline]
    pub fn is_sequence(&self) -> bool {
        !matches!(self, Object::Instance(_))
    }

    /// Current elements of a sequence object
    pub fn elements(&self) -> Result<Vec<Value>> {
        match self {
            Object::Array(a) => Ok(a.items.clone()),
            Object::List(l) => Ok(l.items.clone()),
            Object::Custom(e) => e.enumerate(),
            Object::Instance(c) => Err(FicheError::invalid_argument(
                "source",
                format!("{} is not a sequence", c.type_name()),
            )),
        }
    }

    /// Memberwise copy; custom sequences materialize into a list of the same type name
    pub fn shallow_copy(&self) -> Result<Object> {
        Ok(match self {
            Object::Instance(c) => Object::Instance(c.clone()),
            Object::Array(a) => Object::Array(a.clone()),
            Object::List(l) => Object::List(l.clone()),
            Object::Custom(e) => Object::List(ListValue::new(e.type_name(), e.enumerate()?)),
        })
    }

    pub fn as_instance(&self) -> Option<&Composite> {
        match self {
            Object::Instance(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_instance_mut(&mut self) -> Option<&mut Composite> {
        match self {
            Object::Instance(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut ArrayValue> {
        match self {
            Object::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListValue> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListValue> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Shared handle to a reference object
///
/// Cloning the handle shares the object; identity is the allocation address.
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    pub fn new(object: Object) -> Self {
        Self(Arc::new(RwLock::new(object)))
    }

    /// Recursive read lock; walkers re-enter the same object through cycles
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, Object> {
        self.0.read_recursive()
    }

    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, Object> {
        self.0.write()
    }

    #[inline]
    pub fn identity(&self) -> Identity {
        Arc::as_ptr(&self.0) as *const () as usize
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn type_name(&self) -> TypeName {
        self.read().type_name()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_read_recursive() {
            Some(object) => write!(f, "{}@{:#x}", object.type_name(), self.identity()),
            None => write!(f, "<locked>@{:#x}", self.identity()),
        }
    }
}

/// A node of the object graph
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Primitive(Primitive),
    Struct(Box<Composite>),
    Object(ObjectRef),
}

impl Value {
    /// New class instance or array/list wrapped as a reference object
    pub fn object(object: Object) -> Self {
        Value::Object(ObjectRef::new(object))
    }

    /// Wrap a composite according to its layout's kind
    pub fn from_composite(composite: Composite) -> Self {
        match composite.layout().kind {
            TypeKind::Class => Value::object(Object::Instance(composite)),
            TypeKind::Struct => Value::Struct(Box::new(composite)),
        }
    }

    /// Single-dimensional array object
    pub fn array(element_type: impl Into<TypeName>, items: Vec<Value>) -> Self {
        Value::object(Object::Array(ArrayValue::new(element_type, items)))
    }

    /// List object
    pub fn list(type_name: impl Into<TypeName>, items: Vec<Value>) -> Self {
        Value::object(Object::List(ListValue::new(type_name, items)))
    }

    /// Custom sequence object
    pub fn custom(sequence: impl Enumerable + 'static) -> Self {
        Value::object(Object::Custom(Box::new(sequence)))
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            Value::Primitive(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Runtime type name; `None` for null
    pub fn type_name(&self) -> Option<TypeName> {
        match self {
            Value::Null => None,
            Value::Primitive(p) => Some(TypeName::from(p.type_name())),
            Value::Struct(c) => Some(c.type_name().clone()),
            Value::Object(o) => Some(o.type_name()),
        }
    }

    /// Same reference object; never true for values without identity
    pub fn ref_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Read a field of a class instance or struct
    pub fn field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Struct(c) => c.get(name).cloned(),
            Value::Object(o) => o.read().as_instance().and_then(|c| c.get(name).cloned()),
            _ => None,
        }
    }

    /// Assign a field of a class instance or struct
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        match self {
            Value::Struct(c) => c.set(name, value),
            Value::Object(o) => match o.write().as_instance_mut() {
                Some(c) => c.set(name, value),
                None => Err(FicheError::invalid_operation("sequence objects have no fields")),
            },
            _ => Err(FicheError::invalid_operation("value has no fields")),
        }
    }

    /// Elements of a sequence value
    pub fn elements(&self) -> Result<Vec<Value>> {
        match self {
            Value::Object(o) => o.read().elements(),
            _ => Err(FicheError::invalid_argument("source", "value is not a sequence")),
        }
    }
}

impl PartialEq for Value {
    /// Native equality: primitives by value, structs memberwise, objects by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            (Value::Struct(a), Value::Struct(b)) => {
                a.type_name() == b.type_name() && a.fields == b.fields
            }
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Primitive(p) => p.hash(state),
            Value::Struct(c) => {
                c.type_name().hash(state);
                c.fields.hash(state);
            }
            Value::Object(o) => o.identity().hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Primitive(p) => fmt::Debug::fmt(p, f),
            Value::Struct(c) => fmt::Debug::fmt(c, f),
            Value::Object(o) => fmt::Debug::fmt(o, f),
        }
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.type_name());
        for (slot, value) in self.layout.slots().iter().zip(&self.fields) {
            s.field(&slot.segment, value);
        }
        s.finish()
    }
}

macro_rules! value_from_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::Primitive(Primitive::from(value))
                }
            }
        )*
    };
}

value_from_primitive!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    &str,
    String,
    uuid::Uuid,
    time::OffsetDateTime,
    time::Duration,
);

impl From<Primitive> for Value {
    #[inline]
    fn from(value: Primitive) -> Self {
        Value::Primitive(value)
    }
}

impl From<ObjectRef> for Value {
    #[inline]
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}
