//! branching: case, switch, and the maybe/alternate wrappers built on them

use std::cmp::Ordering;
use std::rc::Rc;

use tracing::trace;

use crate::curry::define;
use crate::expr::Expr;
use crate::flag::{Atom, Tag};
use crate::pattern::Pattern;
use crate::value::Typed;

pub type Test = Rc<dyn Fn(&[Expr]) -> bool>;

pub enum Outcome {
    Matched(Expr),
    /// the arguments, handed back so the next case can be tried
    Unmatched(Rc<[Expr]>),
}

struct CaseInner {
    test: Test,
    /// none gives the arguments back
    expr: Option<Expr>,
}

/// an expression guarded by a test on its arguments
#[derive(Clone)]
pub struct Case(Rc<CaseInner>);

impl Case {
    pub fn new(test: impl Fn(&[Expr]) -> bool + 'static, expr: impl Into<Expr>) -> Case {
        Case(Rc::new(CaseInner {
            test: Rc::new(test),
            expr: Some(expr.into()),
        }))
    }

    /// gives back its arguments when they match: one as is, two as a pair,
    /// more as a vector
    pub fn when(test: impl Fn(&[Expr]) -> bool + 'static) -> Case {
        Case(Rc::new(CaseInner {
            test: Rc::new(test),
            expr: None,
        }))
    }

    /// matches when `test` decides for it, `None` being undecided
    pub fn trinary(
        test: impl Fn(&[Expr]) -> Option<bool> + 'static,
        expr: impl Into<Expr>,
    ) -> Case {
        Case::new(move |args| Some(true) == test(args), expr)
    }

    /// matches when `test` finds the arguments equal to what it compares with
    pub fn compare(test: impl Fn(&[Expr]) -> Ordering + 'static, expr: impl Into<Expr>) -> Case {
        Case::new(move |args| test(args).is_eq(), expr)
    }

    /// only tests the tags of the arguments against `pattern`'s slots
    pub fn typed(pattern: Pattern, expr: impl Into<Expr>) -> Case {
        Case::new(
            move |args| {
                args.len() == pattern.arity()
                    && pattern.args().iter().zip(args).all(|(p, a)| p.accepts(a))
            },
            expr,
        )
    }

    pub fn apply(&self, args: &[Expr]) -> Outcome {
        if !(self.0.test)(args) {
            return Outcome::Unmatched(args.into());
        }
        Outcome::Matched(match (&self.0.expr, args) {
            (Some(expr), _) => expr.call(args),
            (None, [one]) => one.clone(),
            (None, [l, r]) => Expr::pair(l.clone(), r.clone()),
            (None, many) => Expr::vector(many.iter().cloned()),
        })
    }

    pub fn call(&self, args: &[Expr]) -> Expr {
        if args.is_empty() {
            return Expr::Pattern(self.pattern());
        }
        match self.apply(args) {
            Outcome::Matched(r) => r,
            Outcome::Unmatched(_) => Expr::None,
        }
    }

    pub fn pattern(&self) -> Pattern {
        let inner = match &self.0.expr {
            Some(expr) => expr.pattern(),
            None => Pattern::function([Pattern::generic()], Pattern::generic()),
        };
        Pattern::function(inner.args().iter().cloned(), inner.ret().clone()).with_ident(Atom::Case)
    }
}

impl PartialEq for Case {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

enum State {
    Remaining(usize),
    Matched(usize, Expr),
    Depleted,
}

/// The first of its cases to match. The case list never changes, so every
/// call starts over from the first one.
#[derive(Clone)]
pub struct Switch(Rc<[Case]>);

impl Switch {
    pub fn new(cases: impl IntoIterator<Item = Case>) -> Switch {
        Switch(cases.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// index of the matching case with its result
    pub fn eval(&self, args: &[Expr]) -> Option<(usize, Expr)> {
        let mut state = State::Remaining(0);
        loop {
            state = match state {
                State::Remaining(k) if k < self.0.len() => match self.0[k].apply(args) {
                    Outcome::Matched(r) => State::Matched(k, r),
                    Outcome::Unmatched(_) => State::Remaining(k + 1),
                },
                State::Remaining(_) => State::Depleted,
                State::Matched(k, r) => {
                    trace!(case = k, "switch matched");
                    return Some((k, r));
                }
                State::Depleted => {
                    trace!(cases = self.0.len(), "switch depleted");
                    return None;
                }
            };
        }
    }

    pub fn call(&self, args: &[Expr]) -> Expr {
        if args.is_empty() {
            return Expr::Pattern(self.pattern());
        }
        self.eval(args).map_or(Expr::None, |(_, r)| r)
    }

    pub fn pattern(&self) -> Pattern {
        let ret: Tag = self.0.iter().map(|c| c.pattern().ret().tag()).collect();
        Pattern::function([], Pattern::atom(ret)).with_ident(Atom::Switch)
    }
}

impl PartialEq for Switch {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct MaybeInner {
    switch: Switch,
    expr: Expr,
}

/// `Just` of `expr` applied to what the switch gave, or None when the switch
/// did not match (or `expr` gave None)
#[derive(Clone)]
pub struct Maybe(Rc<MaybeInner>);

impl Maybe {
    pub fn new(switch: Switch, expr: impl Into<Expr>) -> Maybe {
        Maybe(Rc::new(MaybeInner {
            switch,
            expr: expr.into(),
        }))
    }

    /// keeps the switch's result as is
    pub fn guard(switch: Switch) -> Maybe {
        let same = Pattern::function([Pattern::generic()], Pattern::generic());
        Maybe::new(switch, define(|args| args[0].clone(), same))
    }

    pub fn call(&self, args: &[Expr]) -> Expr {
        if args.is_empty() {
            return Expr::Pattern(self.pattern());
        }
        match self.0.switch.call(args) {
            Expr::None => Expr::None,
            r => Expr::just(self.0.expr.call(&[r])),
        }
    }

    pub fn pattern(&self) -> Pattern {
        Pattern::wrapped(Tag::MAYBE, self.0.expr.pattern().ret().clone())
    }
}

impl PartialEq for Maybe {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

struct AlternateInner {
    either: Case,
    or: Case,
}

/// `Either` when the first case matches, `Or` when only the second does
#[derive(Clone)]
pub struct Alternate(Rc<AlternateInner>);

impl Alternate {
    pub fn new(either: Case, or: Case) -> Alternate {
        Alternate(Rc::new(AlternateInner { either, or }))
    }

    pub fn call(&self, args: &[Expr]) -> Expr {
        if args.is_empty() {
            return Expr::Pattern(self.pattern());
        }
        if let Outcome::Matched(r) = self.0.either.apply(args) {
            if !r.is_none() {
                return Expr::either(r);
            }
        }
        match self.0.or.apply(args) {
            Outcome::Matched(r) => Expr::or(r),
            Outcome::Unmatched(_) => Expr::None,
        }
    }

    pub fn pattern(&self) -> Pattern {
        let (l, r) = (self.0.either.pattern(), self.0.or.pattern());
        Pattern::function(
            l.args().iter().cloned(),
            Pattern::wrapped(Tag::ALTERNATE, Pattern::atom(l.ret().tag() | r.ret().tag())),
        )
        .with_ident(Tag::ALTERNATE)
    }
}

impl PartialEq for Alternate {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
