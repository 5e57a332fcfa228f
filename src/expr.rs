//! the expression every part of the engine trades in

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::rc::Rc;

use crate::cont::{self, Continuation};
use crate::curry::FuncDef;
use crate::error::Error;
use crate::flag::{Atom, Tag};
use crate::pattern::Pattern;
use crate::sumtype::{Alternate, Case, Maybe, Switch};
use crate::value::{Ratio, Typed, Value};

#[derive(Clone)]
pub enum Expr {
    /// absence, and the result of anything that did not fit
    None,
    Data(Value),
    Pattern(Pattern),
    Func(FuncDef),

    Pair(Rc<(Expr, Expr)>),
    Key(Rc<str>, Rc<Expr>),
    List(Continuation),
    Vector(Rc<[Expr]>),
    Tuple(Rc<[Expr]>),
    Record(Rc<[(Rc<str>, Expr)]>),

    Just(Rc<Expr>),
    Either(Rc<Expr>),
    Or(Rc<Expr>),
    Case(Case),
    Switch(Switch),
    Maybe(Maybe),
    Alternate(Alternate),
}

impl Expr {
    pub fn is_none(&self) -> bool {
        matches!(self, Expr::None)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Expr::Data(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_func(&self) -> Option<&FuncDef> {
        match self {
            Expr::Func(f) => Some(f),
            _ => None,
        }
    }

    /// Invoke with further arguments. Functions and branches dispatch,
    /// wrappers forward, and sequences take the arguments in (a list or vector
    /// appends them, a tuple or record is indexed by them). Data ignores them.
    pub fn call(&self, args: &[Expr]) -> Expr {
        match self {
            Expr::None => Expr::None,
            Expr::Data(_) | Expr::Pattern(_) => self.clone(),
            Expr::Func(f) => f.call(args),
            Expr::Case(c) => c.call(args),
            Expr::Switch(s) => s.call(args),
            Expr::Maybe(m) => m.call(args),
            Expr::Alternate(a) => a.call(args),

            _ if args.is_empty() => self.clone(),

            Expr::Pair(p) => Expr::pair(p.0.call(args), p.1.call(args)),
            Expr::Key(k, v) => Expr::Key(k.clone(), Rc::new(v.call(args))),
            Expr::List(c) => Expr::List(cont::concat(c, &Continuation::from_vec(args.into()))),
            Expr::Vector(items) => Expr::Vector(items.iter().chain(args).cloned().collect()),
            Expr::Tuple(_) => select(args, |a| {
                a.as_value()
                    .and_then(Value::as_int)
                    .and_then(|n| usize::try_from(n).ok())
                    .map_or(Expr::None, |k| self.get(k))
            }),
            Expr::Record(_) => select(args, |a| {
                a.as_value()
                    .and_then(Value::as_str)
                    .map_or(Expr::None, |k| self.field(k))
            }),

            Expr::Just(x) => Expr::just(x.call(args)),
            Expr::Either(x) => Expr::either(x.call(args)),
            Expr::Or(x) => Expr::or(x.call(args)),
        }
    }

    /// Functor map: None stays None, wrappers keep their branch, lists map
    /// lazily, vectors element-wise, anything else is given directly to `f`.
    pub fn fmap(&self, f: impl Fn(&Expr) -> Expr + 'static) -> Expr {
        match self {
            Expr::None => Expr::None,
            Expr::Just(x) => Expr::just(f(x.as_ref())),
            Expr::Either(x) => Expr::either(f(x.as_ref())),
            Expr::Or(x) => Expr::or(f(x.as_ref())),
            Expr::List(c) => Expr::List(cont::map(c, f)),
            Expr::Vector(items) => Expr::Vector(items.iter().map(f).collect()),
            other => f(other),
        }
    }

    /// the content of a Just, Either, Or or Key
    pub fn inner(&self) -> Option<&Expr> {
        match self {
            Expr::Just(x) | Expr::Either(x) | Expr::Or(x) | Expr::Key(_, x) => Some(x),
            _ => None,
        }
    }
}

fn select(args: &[Expr], each: impl Fn(&Expr) -> Expr) -> Expr {
    match args {
        [one] => each(one),
        many => Expr::Vector(many.iter().map(each).collect()),
    }
}

// wrappers {{{
impl Expr {
    /// None stays None and a Just is not wrapped again
    pub fn just(x: Expr) -> Expr {
        match x {
            Expr::None => Expr::None,
            Expr::Just(_) => x,
            x => Expr::Just(Rc::new(x)),
        }
    }

    pub fn either(x: Expr) -> Expr {
        match x {
            Expr::None => Expr::None,
            Expr::Either(_) => x,
            x => Expr::Either(Rc::new(x)),
        }
    }

    pub fn or(x: Expr) -> Expr {
        match x {
            Expr::None => Expr::None,
            Expr::Or(_) => x,
            x => Expr::Or(Rc::new(x)),
        }
    }

    pub fn error(e: impl Into<Error>) -> Expr {
        Expr::Data(Value::from(e.into()))
    }
}
// }}}

/// The shared pattern of the items, or the union of their tags when they
/// differ. Only an empty vector has a generic element.
fn common_pattern(items: &[Expr]) -> Pattern {
    let Some((first, rest)) = items.split_first() else {
        return Pattern::generic();
    };
    let first = first.pattern();
    if rest.iter().all(|it| it.pattern() == first) {
        first
    } else {
        Pattern::atom(items.iter().map(Expr::tag).collect::<Tag>())
    }
}

/// how many raw heads a list's element pattern is looked for in
const LOOKAHEAD: usize = 8;

impl Typed for Expr {
    fn tag(&self) -> Tag {
        self.pattern().ident()
    }

    fn pattern(&self) -> Pattern {
        match self {
            Expr::None => Pattern::atom(Atom::None),
            Expr::Data(v) => v.pattern(),
            Expr::Pattern(_) => Pattern::atom(Atom::Flag),
            Expr::Func(f) => f.pattern().clone(),

            Expr::Pair(p) => Pattern::pair(p.0.pattern(), p.1.pattern()),
            Expr::Key(k, v) => Pattern::field(k, v.pattern()),
            Expr::List(c) => Pattern::list(match c.first_within(LOOKAHEAD) {
                Some(h) => h.pattern(),
                None => Pattern::generic(),
            }),
            Expr::Vector(items) => Pattern::vector(common_pattern(items)),
            Expr::Tuple(fields) => Pattern::tuple(fields.iter().map(Expr::pattern)),
            Expr::Record(fields) => Pattern::record(fields.iter().map(|(k, v)| (&**k, v.pattern()))),

            Expr::Just(x) => Pattern::wrapped(Atom::Just, x.pattern()),
            Expr::Either(x) => Pattern::wrapped(Atom::Either, x.pattern()),
            Expr::Or(x) => Pattern::wrapped(Atom::Or, x.pattern()),
            Expr::Case(c) => c.pattern(),
            Expr::Switch(s) => s.pattern(),
            Expr::Maybe(m) => m.pattern(),
            Expr::Alternate(a) => a.pattern(),
        }
    }
}

impl PartialEq for Expr {
    /// structural for data, by identity for functions and sequences
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::None, Expr::None) => true,
            (Expr::Data(l), Expr::Data(r)) => l == r,
            (Expr::Pattern(l), Expr::Pattern(r)) => l == r,
            (Expr::Func(l), Expr::Func(r)) => l == r,
            (Expr::Pair(l), Expr::Pair(r)) => l == r,
            (Expr::Key(lk, lv), Expr::Key(rk, rv)) => lk == rk && lv == rv,
            (Expr::List(l), Expr::List(r)) => l == r,
            (Expr::Vector(l), Expr::Vector(r)) => l == r,
            (Expr::Tuple(l), Expr::Tuple(r)) => l == r,
            (Expr::Record(l), Expr::Record(r)) => l == r,
            (Expr::Just(l), Expr::Just(r)) => l == r,
            (Expr::Either(l), Expr::Either(r)) => l == r,
            (Expr::Or(l), Expr::Or(r)) => l == r,
            (Expr::Case(l), Expr::Case(r)) => l == r,
            (Expr::Switch(l), Expr::Switch(r)) => l == r,
            (Expr::Maybe(l), Expr::Maybe(r)) => l == r,
            (Expr::Alternate(l), Expr::Alternate(r)) => l == r,
            _ => false,
        }
    }
}

// from host {{{
macro_rules! from_data {
    ($($t:ty),*) => {
        $(impl From<$t> for Expr {
            fn from(it: $t) -> Self {
                Expr::Data(it.into())
            }
        })*
    };
}

from_data!(Value, bool, i32, i64, u64, f64, u8, char, &str, String, Ratio, Tag, Error);

impl From<FuncDef> for Expr {
    fn from(f: FuncDef) -> Self {
        Expr::Func(f)
    }
}

impl From<Pattern> for Expr {
    fn from(p: Pattern) -> Self {
        Expr::Pattern(p)
    }
}

impl From<Continuation> for Expr {
    fn from(c: Continuation) -> Self {
        Expr::List(c)
    }
}

impl<T: Into<Expr>> From<Option<T>> for Expr {
    fn from(o: Option<T>) -> Self {
        o.map_or(Expr::None, |it| Expr::just(it.into()))
    }
}
// }}}

// to host {{{
fn not_a(expected: impl Into<Tag>, actual: &Expr) -> Error {
    Error::NotA {
        expected: expected.into(),
        actual: actual.tag(),
    }
}

impl TryFrom<&Expr> for i64 {
    type Error = Error;
    fn try_from(e: &Expr) -> Result<Self, Error> {
        e.as_value()
            .and_then(Value::as_int)
            .ok_or_else(|| not_a(Tag::INTEGERS, e))
    }
}

impl TryFrom<&Expr> for f64 {
    type Error = Error;
    fn try_from(e: &Expr) -> Result<Self, Error> {
        e.as_value()
            .and_then(Value::as_float)
            .ok_or_else(|| not_a(Tag::NUMBERS, e))
    }
}

impl TryFrom<&Expr> for bool {
    type Error = Error;
    fn try_from(e: &Expr) -> Result<Self, Error> {
        e.as_value()
            .and_then(Value::as_bool)
            .ok_or_else(|| not_a(Atom::Bool, e))
    }
}

impl TryFrom<&Expr> for String {
    type Error = Error;
    fn try_from(e: &Expr) -> Result<Self, Error> {
        e.as_value()
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| not_a(Atom::String, e))
    }
}
// }}}

/// how many leading elements of a list are shown
const SHOWN: usize = 8;

fn comma_sep<'a>(f: &mut Formatter, items: impl IntoIterator<Item = &'a Expr>) -> FmtResult {
    for (k, it) in items.into_iter().enumerate() {
        if 0 < k {
            write!(f, ", ")?;
        }
        write!(f, "{it}")?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Expr::None => write!(f, "None"),
            Expr::Data(v) => write!(f, "{v}"),
            Expr::Pattern(p) => write!(f, "{p}"),
            Expr::Func(func) => write!(f, "fn({})", func.pattern()),

            Expr::Pair(p) => write!(f, "({}, {})", p.0, p.1),
            Expr::Key(k, v) => write!(f, "{k}: {v}"),
            Expr::List(c) => {
                let shown: Vec<_> = c.iter().take(SHOWN + 1).collect();
                write!(f, "[")?;
                comma_sep(f, shown.iter().take(SHOWN))?;
                if SHOWN < shown.len() {
                    write!(f, ", ..")?;
                }
                write!(f, "]")
            }
            Expr::Vector(items) => {
                write!(f, "Vector[")?;
                comma_sep(f, items.iter())?;
                write!(f, "]")
            }
            Expr::Tuple(fields) => {
                write!(f, "(")?;
                comma_sep(f, fields.iter())?;
                write!(f, ")")
            }
            Expr::Record(fields) => {
                write!(f, "{{")?;
                for (k, (key, it)) in fields.iter().enumerate() {
                    if 0 < k {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {it}")?;
                }
                write!(f, "}}")
            }

            Expr::Just(x) => write!(f, "Just {x}"),
            Expr::Either(x) => write!(f, "Either {x}"),
            Expr::Or(x) => write!(f, "Or {x}"),
            Expr::Case(c) => write!(f, "case({})", c.pattern()),
            Expr::Switch(s) => write!(f, "switch({})", s.len()),
            Expr::Maybe(m) => write!(f, "maybe({})", m.pattern()),
            Expr::Alternate(a) => write!(f, "alternate({})", a.pattern()),
        }
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{self}")
    }
}
