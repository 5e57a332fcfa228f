//! turning a plain function and its pattern into an arity-aware callable

use std::cmp::Ordering;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::expr::Expr;
use crate::flag::Atom;
use crate::pattern::Pattern;
use crate::value::Typed;

pub type Raw = Rc<dyn Fn(&[Expr]) -> Expr>;

/// A function with its pattern. Calling it checks every argument against the
/// slots of the pattern and then, depending on how many were given, runs it,
/// returns a partial, or chunks the arguments into a vector of results.
#[derive(Clone)]
pub struct FuncDef {
    raw: Raw,
    pattern: Pattern,
}

/// `raw` is only ever given exactly as many arguments as `pattern` has slots,
/// each matching its slot
pub fn define(raw: impl Fn(&[Expr]) -> Expr + 'static, pattern: Pattern) -> FuncDef {
    FuncDef {
        raw: Rc::new(raw),
        pattern,
    }
}

/// makes any callable expression go through the dispatch
pub fn define_expr(expr: Expr, pattern: Pattern) -> FuncDef {
    define(move |args| expr.call(args), pattern)
}

/// ignores all arguments
pub fn constant(expr: Expr) -> FuncDef {
    let pattern = Pattern::define("", expr.pattern(), []);
    define(move |_| expr.clone(), pattern)
}

/// `f ∘ g`, when `f` takes one argument and it accepts what `g` returns
pub fn compose(f: &FuncDef, g: &FuncDef) -> Expr {
    if 1 != f.arity() || !f.pattern.args()[0].matches(g.pattern.ret()) {
        debug!(f = %f.pattern, g = %g.pattern, "not composable");
        return Expr::None;
    }
    let (outer, inner) = (f.clone(), g.clone());
    let pattern = Pattern::function(g.pattern.args().iter().cloned(), f.pattern.ret().clone());
    Expr::Func(define(
        move |args| match inner.call(args) {
            Expr::None => Expr::None,
            r => outer.call(&[r]),
        },
        pattern,
    ))
}

impl FuncDef {
    pub fn new(
        raw: impl Fn(&[Expr]) -> Expr + 'static,
        ret: Pattern,
        args: impl IntoIterator<Item = Pattern>,
    ) -> FuncDef {
        define(raw, Pattern::function(args, ret))
    }

    pub fn named(&self, name: &str) -> FuncDef {
        FuncDef {
            raw: self.raw.clone(),
            pattern: self.pattern.named(name),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn arity(&self) -> usize {
        self.pattern.arity()
    }

    pub fn is_partial(&self) -> bool {
        self.pattern.ident().contains(Atom::Partial)
    }

    /// Zero arguments gives back the pattern, except for a constant which
    /// always gives its value. Any argument not fitting its slot (the k-th
    /// against slot `k mod arity`) makes the whole call None.
    pub fn call(&self, args: &[Expr]) -> Expr {
        let arity = self.arity();
        if 0 == arity {
            return (self.raw)(&[]);
        }
        if args.is_empty() {
            return Expr::Pattern(self.pattern.clone());
        }

        let slots = self.pattern.args();
        if let Some(at) = (0..args.len()).find(|&k| !slots[k % arity].accepts(&args[k])) {
            debug!(
                pattern = %self.pattern,
                at,
                slot = %slots[at % arity],
                given = %args[at].pattern(),
                "argument rejected"
            );
            return Expr::None;
        }

        match args.len().cmp(&arity) {
            Ordering::Equal => {
                trace!(pattern = %self.pattern, "exact");
                (self.raw)(args)
            }
            Ordering::Less => {
                trace!(pattern = %self.pattern, given = args.len(), "partial");
                Expr::Func(self.partial(args))
            }
            Ordering::Greater => {
                trace!(pattern = %self.pattern, given = args.len(), "oversaturated");
                let mut chunks = args.chunks_exact(arity);
                let mut results: Vec<_> = chunks.by_ref().map(|c| (self.raw)(c)).collect();
                let rest = chunks.remainder();
                if !rest.is_empty() {
                    results.push(Expr::Func(self.partial(rest)));
                }
                Expr::Vector(results.into())
            }
        }
    }

    fn partial(&self, given: &[Expr]) -> FuncDef {
        let raw = self.raw.clone();
        let given: Rc<[Expr]> = given.into();
        let pattern = self.pattern.applied(given.len());
        define(
            move |late| {
                let all: Vec<_> = given.iter().chain(late).cloned().collect();
                raw(&all)
            },
            pattern,
        )
    }
}

impl PartialEq for FuncDef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.raw, &other.raw) && self.pattern == other.pattern
    }
}

impl Debug for FuncDef {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "FuncDef({})", self.pattern)
    }
}
