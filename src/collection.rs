//! product and sequence values: pair, key, vector, list, tuple, record

use std::cmp::Ordering;
use std::rc::Rc;

use crate::cont::{map, Continuation, Sequence};
use crate::curry::{define, FuncDef};
use crate::expr::Expr;
use crate::flag::Atom;
use crate::pattern::{Def, Pattern};

impl Expr {
    pub fn pair(left: Expr, right: Expr) -> Expr {
        Expr::Pair(Rc::new((left, right)))
    }

    pub fn key(name: &str, value: Expr) -> Expr {
        Expr::Key(name.into(), Rc::new(value))
    }

    pub fn vector(items: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Vector(items.into_iter().collect())
    }

    pub fn list(items: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::List(items.into_iter().collect())
    }

    /// index into a tuple, vector or pair; None when out of range
    pub fn get(&self, index: usize) -> Expr {
        let found = match self {
            Expr::Tuple(items) | Expr::Vector(items) => items.get(index),
            Expr::Pair(p) => match index {
                0 => Some(&p.0),
                1 => Some(&p.1),
                _ => None,
            },
            Expr::Record(fields) => fields.get(index).map(|(_, v)| v),
            _ => None,
        };
        found.cloned().unwrap_or(Expr::None)
    }

    /// a record's field by name
    pub fn field(&self, name: &str) -> Expr {
        match self {
            Expr::Record(fields) => fields
                .iter()
                .find(|(k, _)| &**k == name)
                .map_or(Expr::None, |(_, v)| v.clone()),
            Expr::Key(k, v) if &**k == name => Expr::clone(v),
            _ => Expr::None,
        }
    }

    /// A product or vector is empty when every one of its fields is None (or
    /// it has none), a list when no element is left. Data defers to the value.
    pub fn is_empty(&self) -> bool {
        match self {
            Expr::None => true,
            Expr::Data(v) => v.is_empty(),
            Expr::Pair(p) => p.0.is_none() && p.1.is_none(),
            Expr::Key(_, v) => v.is_none(),
            Expr::List(c) => c.first().is_none(),
            Expr::Vector(items) | Expr::Tuple(items) => items.iter().all(Expr::is_none),
            Expr::Record(fields) => fields.iter().all(|(_, v)| v.is_none()),
            _ => false,
        }
    }
}

// pairs and keys {{{
impl Expr {
    /// a pair with its sides exchanged, a key as `(value, name)`
    pub fn swap(&self) -> Expr {
        match self {
            Expr::Pair(p) => Expr::pair(p.1.clone(), p.0.clone()),
            Expr::Key(k, v) => Expr::pair(Expr::clone(v), Expr::from(&**k)),
            _ => Expr::None,
        }
    }

    /// the left side of a pair, the name of a key
    pub fn left(&self) -> Expr {
        match self {
            Expr::Pair(p) => p.0.clone(),
            Expr::Key(k, _) => Expr::from(&**k),
            _ => Expr::None,
        }
    }

    /// the right side of a pair, the value of a key
    pub fn right(&self) -> Expr {
        match self {
            Expr::Pair(p) => p.1.clone(),
            Expr::Key(_, v) => Expr::clone(v),
            _ => Expr::None,
        }
    }

    /// Left sides of the elements, for a record its field names. Elements
    /// that are neither pairs nor keys are left out.
    pub fn keys(&self) -> Continuation {
        match self {
            Expr::Pair(_) | Expr::Key(..) => Continuation::cons(self.left(), Continuation::empty()),
            seq => map(seq, Expr::left),
        }
    }

    /// right sides of the elements, for a record its field values
    pub fn values(&self) -> Continuation {
        match self {
            Expr::Pair(_) | Expr::Key(..) => Continuation::cons(self.right(), Continuation::empty()),
            seq => map(seq, Expr::right),
        }
    }

    /// Data by [`Value::compare`](crate::value::Value::compare), pairs and
    /// keys by their left side, wrappers by their content; `None` when the two
    /// do not compare.
    pub fn compare(&self, other: &Expr) -> Option<Ordering> {
        match (self, other) {
            (Expr::Data(l), Expr::Data(r)) => l.compare(r),
            (Expr::Pair(_) | Expr::Key(..), Expr::Pair(_) | Expr::Key(..)) => {
                self.left().compare(&other.left())
            }
            (Expr::Pair(_) | Expr::Key(..), _) => self.left().compare(other),
            (Expr::Just(l), Expr::Just(r))
            | (Expr::Either(l), Expr::Either(r))
            | (Expr::Or(l), Expr::Or(r)) => l.compare(r),
            _ => None,
        }
    }
}
// }}}

impl Sequence for Expr {
    /// Sequences walk their elements, a pair its two sides, a record its
    /// fields as keys, a wrapper its content; anything else is the one
    /// element of itself and None is empty.
    fn continuation(&self) -> Continuation {
        match self {
            Expr::None => Continuation::empty(),
            Expr::List(c) => c.clone(),
            Expr::Vector(items) | Expr::Tuple(items) => Continuation::from_vec(items.clone()),
            Expr::Pair(p) => Continuation::from_vec([p.0.clone(), p.1.clone()].into()),
            Expr::Record(fields) => fields
                .iter()
                .map(|(k, v)| Expr::Key(k.clone(), Rc::new(v.clone())))
                .collect(),
            Expr::Just(x) | Expr::Either(x) | Expr::Or(x) => {
                Continuation::cons(Expr::clone(x), Continuation::empty())
            }
            other => Continuation::cons(other.clone(), Continuation::empty()),
        }
    }
}

/// Constructor of tuples with the given field patterns. Going through the
/// curry dispatch, it can be given fields a few at a time and rejects a field
/// of the wrong type.
pub fn tuple_def(fields: impl IntoIterator<Item = Pattern>) -> FuncDef {
    let fields: Vec<_> = fields.into_iter().collect();
    let ret = Pattern::tuple(fields.iter().cloned());
    let pattern = Pattern::function(fields, ret).with_ident(Atom::Constructor);
    define(|args| Expr::Tuple(args.into()), pattern)
}

/// Constructor of records; each argument is a key with the name and value
/// type of its slot.
pub fn record_def<'a>(fields: impl IntoIterator<Item = (&'a str, Pattern)>) -> FuncDef {
    let slots: Vec<_> = fields
        .into_iter()
        .map(|(k, v)| Pattern::field(k, v))
        .collect();
    let ret = Pattern::Def(Rc::new(Def {
        name: None,
        ident: Atom::Record.into(),
        ret: Pattern::atom(Atom::Record),
        args: slots.iter().cloned().collect(),
    }));
    let pattern = Pattern::function(slots, ret).with_ident(Atom::Constructor);
    define(
        |args| {
            let fields: Option<Rc<[_]>> = args
                .iter()
                .map(|a| match a {
                    Expr::Key(k, v) => Some((k.clone(), Expr::clone(v))),
                    _ => None,
                })
                .collect();
            fields.map_or(Expr::None, Expr::Record)
        },
        pattern,
    )
}
