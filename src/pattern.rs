//! type patterns: what a function takes and gives, and what a structure holds

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::rc::Rc;

use crate::expr::Expr;
use crate::flag::{Atom, Tag};
use crate::value::Typed;

/// builds a [`Pattern`] from Rust tokens, eg. `pattern!(Int -> [Int] -> Int)`;
/// `_` is a generic slot
#[macro_export]
macro_rules! pattern {
    (@args [$($acc:expr),*] $p:tt -> $($r:tt)+) => {
        $crate::pattern!(@args [$($acc,)* $crate::pattern!($p)] $($r)+)
    };
    (@args [$($acc:expr),*] $($r:tt)+) => {
        $crate::pattern::Pattern::function([$($acc),*], $crate::pattern!($($r)+))
    };

    ($p:tt -> $($r:tt)+) => {
        $crate::pattern!(@args [$crate::pattern!($p)] $($r)+)
    };

    (_) => {
        $crate::pattern::Pattern::generic()
    };

    ([$($i:tt)+]) => {
        $crate::pattern::Pattern::list($crate::pattern!($($i)+))
    };

    (($a:tt, $b:tt)) => {
        $crate::pattern::Pattern::pair($crate::pattern!($a), $crate::pattern!($b))
    };
    (($a:tt, $($b:tt),+)) => {
        $crate::pattern::Pattern::tuple([$crate::pattern!($a), $($crate::pattern!($b)),+])
    };

    (($($t:tt)+)) => {
        $crate::pattern!($($t)+)
    };

    ($a:ident $(| $b:ident)*) => {
        $crate::pattern::Pattern::atom(
            $crate::flag::Tag::from($crate::flag::Atom::$a) $(| $crate::flag::Atom::$b)*
        )
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Atom(Tag),
    Def(Rc<Def>),
}

/// a composed pattern node
///
/// Functions keep their parameters in `args` and result in `ret`. Homogeneous
/// containers (list, vector, just, either, or) hold their element in `ret`,
/// products (pair, tuple, record) their members in `args`. A record field is
/// a node with the `Key` identity, its key as `name` and value as `ret`.
#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub name: Option<Rc<str>>,
    pub ident: Tag,
    pub ret: Pattern,
    pub args: Box<[Pattern]>,
}

enum Shape {
    Key,
    Product,
    Record,
    Container(&'static str),
    Function,
}

impl Def {
    fn shape(&self) -> Shape {
        let ident = self.ident;
        if ident.contains(Atom::Key) {
            Shape::Key
        } else if ident.contains(Atom::Record) {
            Shape::Record
        } else if ident.meets(Atom::Pair | Atom::Tuple) {
            Shape::Product
        } else if !self.args.is_empty() {
            Shape::Function
        } else if ident == Tag::MAYBE {
            Shape::Container("Maybe")
        } else if ident == Tag::ALTERNATE {
            Shape::Container("Alternate")
        } else if let Some(c) = [Atom::List, Atom::Vector, Atom::Just, Atom::Either, Atom::Or]
            .into_iter()
            .find(|c| ident.contains(*c))
        {
            Shape::Container(c.name())
        } else {
            Shape::Function
        }
    }
}

// construction {{{
impl Pattern {
    pub fn atom(tag: impl Into<Tag>) -> Pattern {
        Pattern::Atom(tag.into())
    }

    pub fn generic() -> Pattern {
        Pattern::Atom(Atom::Type.into())
    }

    /// identity is `Function`, or `Constant` with no argument; the display
    /// name is derived when `name` is empty
    pub fn define(name: &str, ret: Pattern, args: impl IntoIterator<Item = Pattern>) -> Pattern {
        let args: Box<[Pattern]> = args.into_iter().collect();
        let ident = if args.is_empty() {
            Atom::Constant
        } else {
            Atom::Function
        };
        Pattern::Def(Rc::new(Def {
            name: (!name.is_empty()).then(|| name.into()),
            ident: ident.into(),
            ret,
            args,
        }))
    }

    pub fn function(args: impl IntoIterator<Item = Pattern>, ret: Pattern) -> Pattern {
        Pattern::define("", ret, args)
    }

    pub fn wrapped(ident: impl Into<Tag>, inner: Pattern) -> Pattern {
        Pattern::Def(Rc::new(Def {
            name: None,
            ident: ident.into(),
            ret: inner,
            args: [].into(),
        }))
    }

    pub fn list(elem: Pattern) -> Pattern {
        Pattern::wrapped(Atom::List, elem)
    }

    pub fn vector(elem: Pattern) -> Pattern {
        Pattern::wrapped(Atom::Vector, elem)
    }

    fn product(ident: Atom, members: impl IntoIterator<Item = Pattern>) -> Pattern {
        Pattern::Def(Rc::new(Def {
            name: None,
            ident: ident.into(),
            ret: Pattern::atom(ident),
            args: members.into_iter().collect(),
        }))
    }

    pub fn pair(left: Pattern, right: Pattern) -> Pattern {
        Pattern::product(Atom::Pair, [left, right])
    }

    pub fn tuple(fields: impl IntoIterator<Item = Pattern>) -> Pattern {
        Pattern::product(Atom::Tuple, fields)
    }

    pub fn field(key: &str, value: Pattern) -> Pattern {
        Pattern::Def(Rc::new(Def {
            name: Some(key.into()),
            ident: Atom::Key.into(),
            ret: value,
            args: [].into(),
        }))
    }

    pub fn record<'a>(fields: impl IntoIterator<Item = (&'a str, Pattern)>) -> Pattern {
        Pattern::product(
            Atom::Record,
            fields.into_iter().map(|(k, v)| Pattern::field(k, v)),
        )
    }

    /// same node, other identity; atoms are returned as is
    pub fn with_ident(&self, ident: impl Into<Tag>) -> Pattern {
        match self {
            Pattern::Atom(_) => self.clone(),
            Pattern::Def(d) => Pattern::Def(Rc::new(Def {
                ident: ident.into(),
                ..Def::clone(d)
            })),
        }
    }

    pub fn named(&self, name: &str) -> Pattern {
        match self {
            Pattern::Atom(_) => self.clone(),
            Pattern::Def(d) => Pattern::Def(Rc::new(Def {
                name: Some(name.into()),
                ..Def::clone(d)
            })),
        }
    }

    /// the pattern left after giving the first `n` arguments
    pub fn applied(&self, n: usize) -> Pattern {
        match self {
            Pattern::Def(d) if 0 < n => Pattern::Def(Rc::new(Def {
                name: None,
                ident: Atom::Partial.into(),
                ret: d.ret.clone(),
                args: d.args.iter().skip(n).cloned().collect(),
            })),
            _ => self.clone(),
        }
    }
}
// }}}

// accessors {{{
impl Pattern {
    pub fn arity(&self) -> usize {
        self.args().len()
    }

    pub fn args(&self) -> &[Pattern] {
        match self {
            Pattern::Atom(_) => &[],
            Pattern::Def(d) => &d.args,
        }
    }

    /// an atom is its own result
    pub fn ret(&self) -> &Pattern {
        match self {
            Pattern::Atom(_) => self,
            Pattern::Def(d) => &d.ret,
        }
    }

    pub fn ident(&self) -> Tag {
        match self {
            Pattern::Atom(t) => *t,
            Pattern::Def(d) => d.ident,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Pattern::Def(d) if d.ident.contains(Atom::Key) => d.name.as_deref(),
            _ => None,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Pattern::Atom(t) if t.contains(Atom::Type))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Pattern::Def(d) if matches!(d.shape(), Shape::Function) && !d.args.is_empty())
    }
}
// }}}

/// any function kind fills a slot asking for one
fn widen(t: Tag) -> Tag {
    if t.meets(Tag::FUNCTIONS) {
        t | Tag::FUNCTIONS
    } else {
        t
    }
}

impl Pattern {
    /// union of the identity with every tag it mentions
    pub fn tag(&self) -> Tag {
        match self {
            Pattern::Atom(t) => *t,
            Pattern::Def(d) => d
                .args
                .iter()
                .map(Pattern::tag)
                .fold(d.ident | d.ret.tag(), |acc, t| acc | t),
        }
    }

    /// whether `cand` can fill a slot described by `self`
    pub fn matches(&self, cand: &Pattern) -> bool {
        if self.is_generic() || matches!(cand, Pattern::Atom(Tag::Atom(Atom::Type))) {
            return true;
        }
        match (self, cand) {
            (Pattern::Atom(t), Pattern::Atom(c)) => t.matches(*c),
            (Pattern::Atom(t), Pattern::Def(c)) => widen(*t).matches(c.ident),
            // an optional slot takes the bare None
            (Pattern::Def(p), Pattern::Atom(c)) => {
                p.ident.contains(Atom::None) && p.ident.matches(*c)
            }
            (Pattern::Def(p), Pattern::Def(c)) => {
                widen(p.ident).matches(c.ident)
                    && p.args.len() == c.args.len()
                    && (!p.ident.contains(Atom::Key) || p.name == c.name)
                    && p.ret.matches(&c.ret)
                    && p.args.iter().zip(c.args.iter()).all(|(p, c)| p.matches(c))
            }
        }
    }

    pub fn accepts(&self, expr: &Expr) -> bool {
        self.matches(&expr.pattern())
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        let d = match self {
            Pattern::Atom(t) => return write!(f, "{t}"),
            Pattern::Def(d) => d,
        };

        match d.shape() {
            Shape::Key => write!(f, "{} ∷ {}", d.name.as_deref().unwrap_or("_"), d.ret),
            _ if d.name.is_some() => write!(f, "{}", d.name.as_deref().unwrap_or_default()),
            Shape::Record => {
                write!(f, "{{")?;
                comma_sep(f, &d.args)?;
                write!(f, "}}")
            }
            Shape::Product => {
                write!(f, "(")?;
                comma_sep(f, &d.args)?;
                write!(f, ")")
            }
            Shape::Container(c) => {
                write!(f, "{c} ")?;
                paren(f, &d.ret, true)
            }
            Shape::Function if d.args.is_empty() => write!(f, "{}", d.ret),
            Shape::Function => {
                for it in d.args.iter() {
                    paren(f, it, false)?;
                    write!(f, " → ")?;
                }
                paren(f, &d.ret, false)
            }
        }
    }
}

fn comma_sep(f: &mut Formatter, items: &[Pattern]) -> FmtResult {
    for (k, it) in items.iter().enumerate() {
        if 0 < k {
            write!(f, ", ")?;
        }
        write!(f, "{it}")?;
    }
    Ok(())
}

fn paren(f: &mut Formatter, p: &Pattern, containers_too: bool) -> FmtResult {
    let container = containers_too
        && matches!(p, Pattern::Def(d) if d.name.is_none() && matches!(d.shape(), Shape::Container(_)));
    if p.is_function() || container {
        write!(f, "({p})")
    } else {
        write!(f, "{p}")
    }
}
