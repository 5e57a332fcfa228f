//! host data, each tagged by what it is

use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::Error;
use crate::flag::{Atom, Tag};
use crate::pattern::Pattern;

/// anything reporting its classification
pub trait Typed {
    fn tag(&self) -> Tag;

    fn pattern(&self) -> Pattern {
        Pattern::atom(self.tag())
    }
}

/// a normalized fraction, denominator always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    num: i64,
    den: i64,
}

impl Ratio {
    /// `None` on a zero denominator or when the sign cannot be normalized
    pub fn new(num: i64, den: i64) -> Option<Ratio> {
        if 0 == den {
            return None;
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1);
        let (num, den) = (num / g as i64, den / g as i64);
        if den < 0 {
            Some(Ratio {
                num: num.checked_neg()?,
                den: den.checked_neg()?,
            })
        } else {
            Some(Ratio { num, den })
        }
    }

    pub fn numer(self) -> i64 {
        self.num
    }

    pub fn denom(self) -> i64 {
        self.den
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while 0 != b {
        (a, b) = (b, a % b);
    }
    a
}

impl From<i64> for Ratio {
    fn from(n: i64) -> Self {
        Ratio { num: n, den: 1 }
    }
}

impl Display for Ratio {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Ratio(Ratio),
    Byte(u8),
    Rune(char),
    Bytes(Rc<[u8]>),
    Str(Rc<str>),
    Error(Rc<Error>),
    Flag(Tag),
    Slice(Rc<[Value]>),
    Pair(Rc<(Value, Value)>),
    Map(Rc<IndexMap<Rc<str>, Value>>),
}

impl Typed for Value {
    fn tag(&self) -> Tag {
        match self {
            Value::Nil => Atom::Nil.into(),
            Value::Bool(_) => Atom::Bool.into(),
            Value::Int(_) => Atom::Int.into(),
            Value::Uint(_) => Atom::Uint.into(),
            Value::Float(_) => Atom::Float.into(),
            Value::Ratio(_) => Atom::Ratio.into(),
            Value::Byte(_) => Atom::Byte.into(),
            Value::Rune(_) => Atom::Rune.into(),
            Value::Bytes(_) => Atom::Bytes.into(),
            Value::Str(_) => Atom::String.into(),
            Value::Error(_) => Atom::Error.into(),
            Value::Flag(_) => Atom::Flag.into(),
            Value::Slice(items) => Atom::Vector | items.iter().map(Value::tag).collect::<Tag>(),
            Value::Pair(p) => Atom::Pair | p.0.tag() | p.1.tag(),
            Value::Map(m) => Atom::Map | m.values().map(Value::tag).collect::<Tag>(),
        }
    }
}

impl Value {
    /// `Nil` for a zero denominator
    pub fn ratio(num: i64, den: i64) -> Value {
        Ratio::new(num, den).map_or(Value::Nil, Value::Ratio)
    }

    pub fn map(entries: impl IntoIterator<Item = (impl Into<Rc<str>>, Value)>) -> Value {
        Value::Map(Rc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bytes(b) => b.is_empty(),
            Value::Str(s) => s.is_empty(),
            Value::Slice(s) => s.is_empty(),
            Value::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    // capabilities {{{
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// any integer that fits
    pub fn as_int(&self) -> Option<i64> {
        if !Tag::INTEGERS.matches(self.tag()) && !Tag::from(Atom::Rune).matches(self.tag()) {
            return None;
        }
        match self {
            Value::Int(n) => Some(*n),
            Value::Uint(n) => i64::try_from(*n).ok(),
            Value::Byte(n) => Some(*n as i64),
            Value::Rune(c) => Some(*c as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        if !Tag::NUMBERS.matches(self.tag()) {
            return None;
        }
        match self {
            Value::Float(x) => Some(*x),
            Value::Ratio(r) => Some(r.to_f64()),
            Value::Uint(n) => Some(*n as f64),
            other => other.as_int().map(|n| n as f64),
        }
    }

    pub fn as_ratio(&self) -> Option<Ratio> {
        match self {
            Value::Ratio(r) => Some(*r),
            other if Tag::INTEGERS.matches(other.tag()) => other.as_int().map(Ratio::from),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            Value::Str(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Slice(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&Value, &Value)> {
        match self {
            Value::Pair(p) => Some((&p.0, &p.1)),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Rc<str>, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&Error> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<Tag> {
        match self {
            Value::Flag(t) => Some(*t),
            _ => None,
        }
    }
    // }}}

    /// Order within a class: integers, then any numbers, letters by their
    /// text, booleans, flags by their bits, pairs by their left side. `None`
    /// across classes.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
            (Value::Flag(l), Value::Flag(r)) => Some(l.bits().cmp(&r.bits())),
            (Value::Rune(l), Value::Rune(r)) => Some(l.cmp(r)),
            (Value::Pair(l), Value::Pair(r)) => l.0.compare(&r.0),
            _ => {
                if let (Some(l), Some(r)) = (self.as_int(), other.as_int()) {
                    return Some(l.cmp(&r));
                }
                if let (Some(l), Some(r)) = (self.as_float(), other.as_float()) {
                    return Some(l.total_cmp(&r));
                }
                self.as_bytes().zip(other.as_bytes()).map(|(l, r)| l.cmp(r))
            }
        }
    }
}

// from host {{{
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Value::Byte(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Rune(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.into())
    }
}

impl From<Ratio> for Value {
    fn from(r: Ratio) -> Self {
        Value::Ratio(r)
    }
}

impl From<Tag> for Value {
    fn from(t: Tag) -> Self {
        Value::Flag(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Slice(v.into())
    }
}

impl From<(Value, Value)> for Value {
    fn from(p: (Value, Value)) -> Self {
        Value::Pair(Rc::new(p))
    }
}

impl From<Error> for Value {
    fn from(e: Error) -> Self {
        Value::Error(Rc::new(e))
    }
}

impl From<std::io::Error> for Value {
    fn from(e: std::io::Error) -> Self {
        Error::from(e).into()
    }
}
// }}}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Ratio(r) => write!(f, "{r}"),
            Value::Byte(b) => write!(f, "{b:#04x}"),
            Value::Rune(c) => write!(f, "{c:?}"),
            Value::Bytes(b) => write!(f, "{:?}", String::from_utf8_lossy(b)),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Error(e) => write!(f, "Error({e})"),
            Value::Flag(t) => write!(f, "{t}"),
            Value::Slice(items) => {
                write!(f, "[")?;
                for (k, it) in items.iter().enumerate() {
                    if 0 < k {
                        write!(f, ", ")?;
                    }
                    write!(f, "{it}")?;
                }
                write!(f, "]")
            }
            Value::Pair(p) => write!(f, "({}, {})", p.0, p.1),
            Value::Map(m) => {
                write!(f, "{{")?;
                for (k, (key, it)) in m.iter().enumerate() {
                    if 0 < k {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {it}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
