//! Runtime values.
//!
//! Scalars are held inline. Arrays and objects are shared: copying the value
//! copies the reference, and equality on them is identity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use exp_ir::{ClassId, FieldId, MethodId};
use rustc_hash::FxHashMap;

#[derive(Clone, Debug)]
pub enum Value {
    Void,
    /// Default of reference-typed storage that was never assigned.
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    /// Half-open `min...max`.
    Range { min: i64, max: i64 },
    Array(Rc<RefCell<Vec<Value>>>),
    Object(Rc<Object>),
    /// A method read as a value, bound to its receiver unless static.
    Method {
        method: MethodId,
        receiver: Option<Rc<Object>>,
    },
}

impl Value {
    pub fn string(text: &str) -> Self {
        Value::Str(Rc::from(text))
    }

    pub fn array(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(values)))
    }

    /// Name used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "Void",
            Value::Null => "null",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "String",
            Value::Range { .. } => "Range",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Method { .. } => "method",
        }
    }
}

impl PartialEq for Value {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) | (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Range { min: a, max: b }, Value::Range { min: c, max: d }) => {
                a == c && b == d
            }
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (
                Value::Method {
                    method: m1,
                    receiver: r1,
                },
                Value::Method {
                    method: m2,
                    receiver: r2,
                },
            ) => {
                m1 == m2
                    && match (r1, r2) {
                        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                        (None, None) => true,
                        _ => false,
                    }
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => f.write_str("void"),
            Value::Null => f.write_str("null"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Range { min, max } => write!(f, "{min}...{max}"),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(object) => write!(f, "<object {:?}>", object.class),
            Value::Method { method, .. } => write!(f, "<method {method:?}>"),
        }
    }
}

/// An instance of a user class. Fields are keyed by id; only instance fields
/// live here.
#[derive(Debug)]
pub struct Object {
    pub class: ClassId,
    fields: RefCell<FxHashMap<FieldId, Value>>,
}

impl Object {
    pub fn new(class: ClassId) -> Self {
        Object {
            class,
            fields: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn get(&self, field: FieldId) -> Option<Value> {
        self.fields.borrow().get(&field).cloned()
    }

    pub fn set(&self, field: FieldId, value: Value) {
        self.fields.borrow_mut().insert(field, value);
    }
}
