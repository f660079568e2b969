use std::fmt;
use std::rc::Rc;

/// A callback bound to a named event on a live node.
///
/// Handlers compare by identity: two handlers are equal only when they share
/// the same allocation.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn()>);

impl EventHandler {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Value stored under a property name of a virtual node.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Handler(EventHandler),
}

impl PropValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }

    pub fn is_handler(&self) -> bool {
        matches!(self, PropValue::Handler(_))
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Text(s) => f.write_str(s),
            PropValue::Int(i) => write!(f, "{i}"),
            PropValue::Float(x) => write!(f, "{x}"),
            PropValue::Bool(b) => write!(f, "{b}"),
            PropValue::Handler(_) => f.write_str("<handler>"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}
impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}
impl From<&String> for PropValue {
    fn from(s: &String) -> Self {
        PropValue::Text(s.clone())
    }
}
impl From<char> for PropValue {
    fn from(c: char) -> Self {
        PropValue::Text(c.to_string())
    }
}
impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}
impl From<f32> for PropValue {
    fn from(x: f32) -> Self {
        PropValue::Float(x as f64)
    }
}
impl From<f64> for PropValue {
    fn from(x: f64) -> Self {
        PropValue::Float(x)
    }
}
impl From<EventHandler> for PropValue {
    fn from(h: EventHandler) -> Self {
        PropValue::Handler(h)
    }
}

macro_rules! int_from {
    ($($t:ty),*) => {
        $(impl From<$t> for PropValue {
            fn from(i: $t) -> Self {
                PropValue::Int(i64::from(i))
            }
        })*
    };
}
int_from!(i8, i16, i32, i64, u8, u16, u32);

// Out-of-range values clamp to the nearest bound.
macro_rules! int_from_saturating {
    ($($t:ty),*) => {
        $(impl From<$t> for PropValue {
            fn from(i: $t) -> Self {
                PropValue::Int(i64::try_from(i).unwrap_or(if i > 0 { i64::MAX } else { i64::MIN }))
            }
        })*
    };
}
int_from_saturating!(u64, usize, isize);
