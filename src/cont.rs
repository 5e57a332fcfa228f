//! lazy sequences as head/tail continuations, and the traversals over them

use std::cell::{Cell, OnceCell};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::rc::Rc;

use crate::expr::Expr;
use crate::value::Value;

#[derive(Clone)]
pub enum Step {
    Empty,
    Cons(Expr, Continuation),
}

type Suspended = Box<dyn FnOnce() -> Step>;

struct Thunk {
    value: OnceCell<Step>,
    init: Cell<Option<Suspended>>,
}

/// A possibly-unevaluated sequence. It is evaluated at most once, so every
/// clone sees the same head and tail.
#[derive(Clone)]
pub struct Continuation(Rc<Thunk>);

impl Continuation {
    fn ready(step: Step) -> Continuation {
        Continuation(Rc::new(Thunk {
            value: OnceCell::from(step),
            init: Cell::new(None),
        }))
    }

    pub fn empty() -> Continuation {
        Continuation::ready(Step::Empty)
    }

    pub fn cons(head: Expr, tail: Continuation) -> Continuation {
        Continuation::ready(Step::Cons(head, tail))
    }

    pub fn lazy(f: impl FnOnce() -> Step + 'static) -> Continuation {
        Continuation(Rc::new(Thunk {
            value: OnceCell::new(),
            init: Cell::new(Some(Box::new(f))),
        }))
    }

    pub fn from_vec(items: Rc<[Expr]>) -> Continuation {
        Continuation::from_slice_at(items, 0)
    }

    fn from_slice_at(items: Rc<[Expr]>, at: usize) -> Continuation {
        if items.len() <= at {
            return Continuation::empty();
        }
        Continuation::lazy(move || {
            let head = items[at].clone();
            Step::Cons(head, Continuation::from_slice_at(items, at + 1))
        })
    }

    /// pulls from `it` only as the sequence is walked
    pub fn unfold(it: impl Iterator<Item = Expr> + 'static) -> Continuation {
        let mut it = it;
        Continuation::lazy(move || match it.next() {
            Some(head) => Step::Cons(head, Continuation::unfold(it)),
            None => Step::Empty,
        })
    }

    pub fn step(&self) -> &Step {
        self.0.value.get_or_init(|| match self.0.init.take() {
            Some(f) => f(),
            None => Step::Empty,
        })
    }

    fn forced(&self) -> Step {
        self.step().clone()
    }

    /// A depleted continuation gives `(None, empty)`.
    pub fn next(&self) -> (Expr, Continuation) {
        match self.step() {
            Step::Empty => (Expr::None, Continuation::empty()),
            Step::Cons(h, t) => (h.clone(), t.clone()),
        }
    }

    pub fn head(&self) -> Expr {
        self.next().0
    }

    pub fn tail(&self) -> Continuation {
        self.next().1
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.step(), Step::Empty)
    }

    /// known empty without evaluating anything
    fn known_empty(&self) -> bool {
        matches!(self.0.value.get(), Some(Step::Empty))
    }

    /// first head that is not None, with what follows it
    pub fn next_present(&self) -> Option<(Expr, Continuation)> {
        let mut cur = self.clone();
        loop {
            let (h, t) = match cur.step() {
                Step::Empty => return None,
                Step::Cons(h, t) => (h.clone(), t.clone()),
            };
            if !h.is_none() {
                return Some((h, t));
            }
            cur = t;
        }
    }

    pub fn first(&self) -> Option<Expr> {
        self.next_present().map(|(h, _)| h)
    }

    /// like [`first`](Self::first), giving up after `limit` heads
    pub fn first_within(&self, limit: usize) -> Option<Expr> {
        let mut cur = self.clone();
        for _ in 0..limit {
            let next = match cur.step() {
                Step::Empty => return None,
                Step::Cons(h, _) if !h.is_none() => return Some(h.clone()),
                Step::Cons(_, t) => t.clone(),
            };
            cur = next;
        }
        None
    }

    /// walks the heads, skipping None
    pub fn iter(&self) -> Iter {
        Iter(self.clone())
    }

    pub fn to_vec(&self) -> Vec<Expr> {
        self.iter().collect()
    }
}

pub struct Iter(Continuation);

impl Iterator for Iter {
    type Item = Expr;
    fn next(&mut self) -> Option<Expr> {
        let (h, t) = self.0.next_present()?;
        self.0 = t;
        Some(h)
    }
}

impl FromIterator<Expr> for Continuation {
    fn from_iter<I: IntoIterator<Item = Expr>>(iter: I) -> Self {
        Continuation::from_vec(iter.into_iter().collect())
    }
}

impl Drop for Thunk {
    // unlinks the chain iteratively, a long list would overflow otherwise
    fn drop(&mut self) {
        let mut next = match self.value.take() {
            Some(Step::Cons(_, tail)) => Some(tail),
            _ => None,
        };
        while let Some(Continuation(rc)) = next {
            next = match Rc::try_unwrap(rc) {
                Ok(mut thunk) => match thunk.value.take() {
                    Some(Step::Cons(_, tail)) => Some(tail),
                    _ => None,
                },
                Err(_) => None,
            };
        }
    }
}

impl PartialEq for Continuation {
    /// same cell, or both already known empty
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || (self.known_empty() && other.known_empty())
    }
}

impl Debug for Continuation {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self.0.value.get() {
            None => write!(f, "Continuation(..)"),
            Some(Step::Empty) => write!(f, "Continuation()"),
            Some(Step::Cons(h, _)) => write!(f, "Continuation({h}, ..)"),
        }
    }
}

/// anything that can be walked as a continuation
pub trait Sequence {
    fn continuation(&self) -> Continuation;
}

impl Sequence for Continuation {
    fn continuation(&self) -> Continuation {
        self.clone()
    }
}

impl Sequence for [Expr] {
    fn continuation(&self) -> Continuation {
        Continuation::from_vec(self.into())
    }
}

impl Sequence for Vec<Expr> {
    fn continuation(&self) -> Continuation {
        self.as_slice().continuation()
    }
}

// traversals {{{
type Func = Rc<dyn Fn(&Expr) -> Expr>;
type Pred = Rc<dyn Fn(&Expr) -> bool>;
type Func2 = Rc<dyn Fn(&Expr, &Expr) -> Expr>;

/// `a` then `b`; `b` itself when `a` is already known empty
pub fn concat(a: &Continuation, b: &Continuation) -> Continuation {
    if a.known_empty() {
        return b.clone();
    }
    let (a, b) = (a.clone(), b.clone());
    Continuation::lazy(move || match a.step() {
        Step::Empty => b.forced(),
        Step::Cons(h, t) => Step::Cons(h.clone(), concat(t, &b)),
    })
}

pub fn map(seq: &(impl Sequence + ?Sized), f: impl Fn(&Expr) -> Expr + 'static) -> Continuation {
    map_with(seq.continuation(), Rc::new(f))
}

fn map_with(c: Continuation, f: Func) -> Continuation {
    Continuation::lazy(move || match c.next_present() {
        Some((h, t)) => Step::Cons(f(&h), map_with(t, f)),
        None => Step::Empty,
    })
}

pub fn filter(
    seq: &(impl Sequence + ?Sized),
    pred: impl Fn(&Expr) -> bool + 'static,
) -> Continuation {
    filter_with(seq.continuation(), Rc::new(pred))
}

fn filter_with(c: Continuation, pred: Pred) -> Continuation {
    Continuation::lazy(move || {
        let mut cur = c;
        while let Some((h, t)) = cur.next_present() {
            if pred(&h) {
                return Step::Cons(h, filter_with(t, pred));
            }
            cur = t;
        }
        Step::Empty
    })
}

/// the elements `pred` does not hold for
pub fn reject(
    seq: &(impl Sequence + ?Sized),
    pred: impl Fn(&Expr) -> bool + 'static,
) -> Continuation {
    filter(seq, move |x| !pred(x))
}

/// A pair of the elements `left` holds for and those `right` holds for. An
/// element can end up on both sides, or on neither.
pub fn split(
    seq: &(impl Sequence + ?Sized),
    left: impl Fn(&Expr) -> bool + 'static,
    right: impl Fn(&Expr) -> bool + 'static,
) -> Expr {
    let c = seq.continuation();
    Expr::pair(
        Expr::List(filter_with(c.clone(), Rc::new(left))),
        Expr::List(filter_with(c, Rc::new(right))),
    )
}

/// every element called with `args`, results that are None left out
pub fn apply(seq: &(impl Sequence + ?Sized), args: &[Expr]) -> Continuation {
    let args: Rc<[Expr]> = args.into();
    map_with(seq.continuation(), Rc::new(move |x: &Expr| x.call(&args)))
}

/// Eager left fold over a finite sequence. A None result leaves the
/// accumulator as it was, so `f` can also be used to ignore elements.
pub fn fold(seq: &(impl Sequence + ?Sized), init: Expr, f: impl Fn(&Expr, &Expr) -> Expr) -> Expr {
    seq.continuation().iter().fold(init, |acc, it| {
        let r = f(&acc, &it);
        if r.is_none() {
            acc
        } else {
            r
        }
    })
}

/// the lazy sequence of every intermediate accumulator of a [`fold`]
pub fn scan(
    seq: &(impl Sequence + ?Sized),
    init: Expr,
    f: impl Fn(&Expr, &Expr) -> Expr + 'static,
) -> Continuation {
    scan_with(seq.continuation(), init, Rc::new(f))
}

fn scan_with(c: Continuation, acc: Expr, f: Func2) -> Continuation {
    Continuation::lazy(move || {
        let mut cur = c;
        while let Some((h, t)) = cur.next_present() {
            let r = f(&acc, &h);
            if !r.is_none() {
                return Step::Cons(r.clone(), scan_with(t, r, f));
            }
            cur = t;
        }
        Step::Empty
    })
}

/// stops with the shorter of the two
pub fn zip(
    a: &(impl Sequence + ?Sized),
    b: &(impl Sequence + ?Sized),
    f: impl Fn(&Expr, &Expr) -> Expr + 'static,
) -> Continuation {
    zip_with(a.continuation(), b.continuation(), Rc::new(f))
}

fn zip_with(a: Continuation, b: Continuation, f: Func2) -> Continuation {
    Continuation::lazy(move || match (a.next_present(), b.next_present()) {
        (Some((l, lt)), Some((r, rt))) => Step::Cons(f(&l, &r), zip_with(lt, rt, f)),
        _ => Step::Empty,
    })
}

/// each element to a sequence, all of them one after the other
pub fn bind(
    seq: &(impl Sequence + ?Sized),
    f: impl Fn(&Expr) -> Continuation + 'static,
) -> Continuation {
    bind_with(seq.continuation(), Rc::new(f))
}

fn bind_with(c: Continuation, f: Rc<dyn Fn(&Expr) -> Continuation>) -> Continuation {
    Continuation::lazy(move || {
        let mut cur = c;
        while let Some((h, t)) = cur.next_present() {
            let inner = f(&h);
            if !inner.is_empty() {
                return concat(&inner, &bind_with(t, f)).forced();
            }
            cur = t;
        }
        Step::Empty
    })
}

/// one level of nesting removed, elements that are not sequences kept as is
pub fn flatten(seq: &(impl Sequence + ?Sized)) -> Continuation {
    bind(seq, Expr::continuation)
}

pub fn take(seq: &(impl Sequence + ?Sized), n: usize) -> Continuation {
    take_from(seq.continuation(), n)
}

fn take_from(c: Continuation, n: usize) -> Continuation {
    if 0 == n {
        return Continuation::empty();
    }
    Continuation::lazy(move || match c.next_present() {
        Some((h, t)) => Step::Cons(h, take_from(t, n - 1)),
        None => Step::Empty,
    })
}

/// vectors of `n` elements, the last one possibly shorter
pub fn chunks(seq: &(impl Sequence + ?Sized), n: usize) -> Continuation {
    chunks_from(seq.continuation(), n.max(1))
}

fn chunks_from(c: Continuation, n: usize) -> Continuation {
    Continuation::lazy(move || {
        let mut chunk = Vec::with_capacity(n);
        let mut cur = c;
        while chunk.len() < n {
            match cur.next_present() {
                Some((h, t)) => {
                    chunk.push(h);
                    cur = t;
                }
                None => break,
            }
        }
        if chunk.is_empty() {
            Step::Empty
        } else {
            Step::Cons(Expr::Vector(chunk.into()), chunks_from(cur, n))
        }
    })
}

fn rank(x: &Expr) -> u8 {
    let Expr::Data(v) = x else {
        return match x {
            Expr::Pair(_) | Expr::Key(..) => 6,
            _ => 7,
        };
    };
    match v {
        Value::Nil => 0,
        Value::Bool(_) => 1,
        Value::Str(_) | Value::Bytes(_) => 3,
        Value::Flag(_) => 4,
        Value::Pair(_) => 5,
        Value::Error(_) | Value::Slice(_) | Value::Map(_) => 7,
        _ => 2,
    }
}

/// total order used for sorting: data grouped by class first, pairs and keys
/// by their left side
fn order(a: &Expr, b: &Expr) -> Ordering {
    match (a, b) {
        (Expr::Pair(_) | Expr::Key(..), Expr::Pair(_) | Expr::Key(..)) => {
            order(&a.left(), &b.left())
        }
        _ => rank(a)
            .cmp(&rank(b))
            .then_with(|| a.compare(b).unwrap_or(Ordering::Equal)),
    }
}

/// stable, eager: the whole sequence is pulled
pub fn sort_by(
    seq: &(impl Sequence + ?Sized),
    cmp: impl FnMut(&Expr, &Expr) -> Ordering,
) -> Continuation {
    let mut items = seq.continuation().to_vec();
    items.sort_by(cmp);
    Continuation::from_vec(items.into())
}

/// Numbers, letters, booleans and flags each in their order, in this order
/// of classes; pairs and keys by their left side.
pub fn sort(seq: &(impl Sequence + ?Sized)) -> Continuation {
    sort_by(seq, order)
}

/// position of `target` in a sequence ordered by [`sort`]
pub fn search(seq: &(impl Sequence + ?Sized), target: &Expr) -> Option<usize> {
    let items = seq.continuation().to_vec();
    items.binary_search_by(|it| order(it, target)).ok()
}

/// bounds of the elements whose left side equals `key`, in a sorted sequence
/// of pairs or keys
fn key_bounds(items: &[Expr], key: &Expr) -> (usize, usize) {
    let lo = items.partition_point(|it| order(&it.left(), key).is_lt());
    let hi = items.partition_point(|it| order(&it.left(), key).is_le());
    (lo, hi.max(lo))
}

/// first pair or key by its left side, in a sequence ordered by [`sort`]
pub fn lookup(seq: &(impl Sequence + ?Sized), key: &Expr) -> Expr {
    let items = seq.continuation().to_vec();
    match key_bounds(&items, key) {
        (lo, hi) if lo < hi => items[lo].clone(),
        _ => Expr::None,
    }
}

/// every pair or key with that left side, in a sequence ordered by [`sort`]
pub fn range(seq: &(impl Sequence + ?Sized), key: &Expr) -> Continuation {
    let items = seq.continuation().to_vec();
    let (lo, hi) = key_bounds(&items, key);
    Continuation::from_vec(items[lo..hi].into())
}

/// `seed`, `step(seed)`, `step(step(seed))`.. each computed only when the
/// tail before it is pulled; ends if `step` gives None, otherwise never
pub fn generator(seed: Expr, step: impl Fn(&Expr) -> Expr + 'static) -> Continuation {
    generate(seed, Rc::new(step))
}

fn generate(seed: Expr, step: Func) -> Continuation {
    let tail = {
        let seed = seed.clone();
        Continuation::lazy(move || {
            let next = step(&seed);
            if next.is_none() {
                Step::Empty
            } else {
                generate(next, step).forced()
            }
        })
    };
    Continuation::cons(seed, tail)
}
// }}}
