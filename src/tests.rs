use std::cell::Cell;
use std::cmp::Ordering;
use std::io;
use std::rc::Rc;

use insta::assert_snapshot;
use tracing_subscriber::EnvFilter;

use crate::cont::{self, Continuation, Sequence};
use crate::{
    compose, constant, define, pattern, record_def, tuple_def, Alternate, Atom, Case, Error, Expr,
    FuncDef, Maybe, Outcome, Pattern, Ratio, Registry, Switch, Tag, Typed, Value,
};

// utils {{{
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn int(n: i64) -> Expr {
    Expr::from(n)
}

fn as_int(e: &Expr) -> i64 {
    i64::try_from(e).unwrap_or_else(|err| panic!("{err}"))
}

fn add() -> FuncDef {
    define(
        |args| int(as_int(&args[0]) + as_int(&args[1])),
        pattern!(Int -> Int -> Int),
    )
}

fn digits() -> FuncDef {
    define(
        |args| int(as_int(&args[0]) * 100 + as_int(&args[1]) * 10 + as_int(&args[2])),
        pattern!(Int -> Int -> Int -> Int),
    )
}

fn double() -> FuncDef {
    define(|args| int(as_int(&args[0]) * 2), pattern!(Int -> Int))
}

fn is_int(args: &[Expr]) -> bool {
    matches!(args, [Expr::Data(Value::Int(_))])
}

fn is_str(args: &[Expr]) -> bool {
    matches!(args, [Expr::Data(Value::Str(_))])
}

fn ints(range: std::ops::RangeInclusive<i64>) -> Vec<Expr> {
    range.map(int).collect()
}
// }}}

// tags {{{
#[test]
fn tag_algebra() {
    let (a, b) = (Tag::from(Atom::Int), Tag::from(Atom::Float));

    assert!(a.matches(a));
    assert!(!a.matches(b));
    assert!(!b.matches(a));
    assert!((a | b).matches(a));
    assert!(!a.matches(a | b));

    assert_eq!(vec![a, b], (a | b).decompose());
    assert_eq!(vec![a, b], (b | a).decompose());
    assert_eq!(2, (a | b).count());
    assert_eq!(a, (a | b).mask(b));
    assert_eq!(a, !!a);

    assert!(Tag::NUMBERS.matches(Atom::Ratio));
    assert!(Tag::MAYBE.matches(Atom::Just | Atom::None));
    assert!(matches!(Tag::NUMBERS, Tag::Composed(_)));
    assert_eq!(Tag::Atom(Atom::Int), Tag::from_bits(Atom::Int.bit()));
}

#[test]
fn zero_tag() {
    let a = Tag::from(Atom::Int);

    assert_eq!(Tag::Never, Tag::from_bits(0));
    assert_eq!(Tag::Never, a & Atom::Float);
    assert!(!Tag::Never.matches(Tag::Never));
    assert!(!a.matches(Tag::Never));
    assert!(!Tag::Never.matches(a));
    assert!(Tag::Never.decompose().is_empty());
    assert_eq!(0, Tag::Never.count());
}

#[test]
fn tag_elements() {
    assert_eq!(
        Some(Tag::from(Atom::Int)),
        (Atom::Vector | Atom::Int).element(Atom::Vector)
    );
    assert_eq!(None, Tag::from(Atom::Vector).element(Atom::Vector));
    assert_eq!(None, Tag::from(Atom::Int).element(Atom::Vector));
}

#[test]
fn tag_names() {
    assert_eq!(Some(Atom::Ratio), Atom::try_from_name("Ratio"));
    assert_eq!(None, Atom::try_from_name("ratio"));
    assert_snapshot!((Atom::String | Atom::Int).to_string(), @"Int|String");
    assert_snapshot!(Tag::Never.to_string(), @"Never");
    assert_snapshot!(Tag::INTEGERS.to_string(), @"Int|Uint|Byte");
}
// }}}

// values {{{
#[test]
fn value_tags() {
    let v = Value::from(vec![Value::from(1), Value::from(2)]);
    assert_eq!(Atom::Vector | Atom::Int, v.tag());
    assert_eq!(
        Atom::Pair | Atom::Int | Atom::String,
        Value::from((Value::from(1), Value::from("a"))).tag()
    );
    assert_eq!(Tag::from(Atom::Vector), Value::from(Vec::new()).tag());
    assert_eq!(Tag::from(Atom::Flag), Value::from(Tag::NUMBERS).tag());
}

#[test]
fn value_views() {
    let v = Value::from(vec![Value::from(1), Value::from(2)]);
    assert_eq!(Some(2), v.as_slice().map(<[Value]>::len));
    assert_eq!(None, v.as_int());

    assert_eq!(Some(3), Value::Byte(3).as_int());
    assert_eq!(Some(0.5), Value::ratio(2, 4).as_float());
    assert_eq!(Value::Nil, Value::ratio(1, 0));
    assert_eq!(Ratio::new(-1, 2), Value::ratio(2, -4).as_ratio());
    assert_eq!(Some(Ratio::from(7)), Value::from(7).as_ratio());
    assert_eq!(None, Value::from(1.5).as_ratio());
    assert_eq!(None, Value::from("a").as_bool());
    assert_eq!(Some("a"), Value::from("a").as_str());
    assert_eq!(None, Value::Uint(u64::MAX).as_int());
}

#[test]
fn value_display() {
    assert_snapshot!(Value::ratio(6, 4).to_string(), @"3/2");
    assert_snapshot!(Value::map([("a", Value::from(1)), ("b", Value::from("x"))]).to_string(), @r#"{a: 1, b: "x"}"#);
    assert_snapshot!(Value::from(vec![Value::from(true), Value::Nil]).to_string(), @"[true, nil]");
}

#[test]
fn host_errors_are_data() {
    let e = Expr::from(Value::from(io::Error::new(io::ErrorKind::NotFound, "gone")));
    assert_eq!(Tag::from(Atom::Error), e.tag());
    assert!(matches!(
        e.as_value().and_then(Value::as_error),
        Some(Error::Io {
            kind: io::ErrorKind::NotFound,
            ..
        })
    ));

    let kept = Expr::list([int(1), e]);
    let tags: Vec<_> = cont::map(&kept, Expr::clone)
        .iter()
        .map(|x| x.tag())
        .collect();
    assert_eq!(vec![Tag::from(Atom::Int), Atom::Error.into()], tags);
}

#[test]
fn to_host() {
    assert_eq!(Ok(3), i64::try_from(&int(3)));
    assert_eq!(Ok(true), bool::try_from(&Expr::from(true)));
    assert_eq!(Ok("a".to_string()), String::try_from(&Expr::from("a")));
    let err = i64::try_from(&Expr::from("x")).unwrap_err();
    assert_snapshot!(err.to_string(), @"expected a value of type Int|Uint|Byte, but got String");
}
// }}}

// patterns {{{
#[test]
fn pattern_names() {
    let p = Pattern::define(
        "",
        pattern!(Int),
        [pattern!(Int), pattern!(String)],
    );
    assert_eq!(2, p.arity());
    assert_snapshot!(p.to_string(), @"Int → String → Int");

    let named = Pattern::define("add", pattern!(Int), [pattern!(Int), pattern!(Int)]);
    assert_snapshot!(named.to_string(), @"add");

    assert_snapshot!(pattern!((Int -> Int) -> [Int] -> [Int]).to_string(), @"(Int → Int) → List Int → List Int");
    assert_snapshot!(pattern!(Int -> (Int -> Int)).to_string(), @"Int → (Int → Int)");
    assert_snapshot!(pattern!((Int, String)).to_string(), @"(Int, String)");
    assert_snapshot!(pattern!((Int, String, Float)).to_string(), @"(Int, String, Float)");
    assert_snapshot!(pattern!([[Int]]).to_string(), @"List (List Int)");
    assert_snapshot!(pattern!(Int | Float).to_string(), @"Int|Float");
    assert_snapshot!(Pattern::record([("x", pattern!(Int)), ("y", pattern!(Float))]).to_string(), @"{x ∷ Int, y ∷ Float}");
}

#[test]
fn constant_pattern() {
    let p = Pattern::define("", pattern!(Int), []);
    assert_eq!(0, p.arity());
    assert!(p.ident().contains(Atom::Constant));
    assert_snapshot!(p.to_string(), @"Int");
}

#[test]
fn pattern_matching() {
    assert!(pattern!(Int).matches(&pattern!(Int)));
    assert!(!pattern!(Int).matches(&pattern!(Float)));
    assert!(pattern!(Int | Float).matches(&pattern!(Float)));
    assert!(!pattern!(Int).matches(&pattern!(Int | Float)));

    assert!(pattern!(_).matches(&pattern!([Int])));
    assert!(pattern!([Int]).matches(&pattern!([_])));
    assert!(!pattern!([Int]).matches(&pattern!(Int)));
    assert!(!pattern!([Int]).matches(&pattern!([Float])));
    assert!(pattern!(List).matches(&pattern!([Float])));

    let x = Pattern::record([("x", pattern!(Int))]);
    let y = Pattern::record([("y", pattern!(Int))]);
    assert!(x.matches(&x));
    assert!(!x.matches(&y));
}

#[test]
fn function_slots() {
    let partial = add().call(&[int(1)]).pattern();
    assert!(pattern!(Int -> Int).matches(&partial));
    assert!(!pattern!(Int -> Int).matches(add().pattern()));
    assert!(!pattern!(String -> Int).matches(&partial));
    assert!(Pattern::atom(Tag::FUNCTIONS).matches(add().pattern()));
    assert!(Pattern::atom(Atom::Function).matches(&partial));
}

#[test]
fn vector_slots() {
    let reg = Registry::default();
    let sum = define(
        |args| cont::fold(&args[0], int(0), |a, b| int(as_int(a) + as_int(b))),
        reg.parse("Vector Int -> Int").unwrap(),
    );

    assert_eq!(int(3), sum.call(&[Expr::vector(ints(1..=2))]));
    assert_eq!(Expr::None, sum.call(&[Expr::vector([int(1), "x".into()])]));
    assert_eq!(Expr::None, sum.call(&[Expr::vector(["x".into(), "y".into()])]));
    assert_eq!(int(0), sum.call(&[Expr::vector([])]));
}

#[test]
fn list_slots_check_the_head() {
    let reg = Registry::default();
    let count = define(
        |args| int(args[0].continuation().iter().count() as i64),
        reg.parse("[Int] -> Int").unwrap(),
    );

    assert_eq!(int(2), count.call(&[Expr::list([int(1), "x".into()])]));
    assert_eq!(Expr::None, count.call(&[Expr::list(["x".into(), int(1)])]));

    let nones = Expr::List(Continuation::unfold(std::iter::repeat(Expr::None)));
    assert_snapshot!(nones.pattern().to_string(), @"List Type");
}
// }}}

// signatures {{{
#[test]
fn signatures() {
    let reg = Registry::default();

    assert_eq!(Ok(pattern!(Int -> [Int] -> Int)), reg.parse("Int → [Int] → Int"));
    assert_eq!(reg.parse("Int → [Int] → Int"), reg.parse("Int -> List Int -> Int"));
    assert_eq!(Ok(pattern!((Int, String))), reg.parse("(Int, String)"));
    assert_eq!(Ok(Pattern::generic()), reg.parse("a"));
    assert_eq!(Ok(pattern!(_ -> _)), reg.parse("a -> b"));
    assert_eq!(Ok(Pattern::atom(Tag::NUMBERS)), reg.parse("Numbers"));
}

#[test]
fn signatures_display_back() {
    let reg = Registry::default();
    for sig in [
        "(Int → Int) → List Int → List Int",
        "{x ∷ Int, y ∷ Float}",
        "(Int, String, Float)",
        "Maybe Int → Int|Float",
        "Vector (List Int)",
    ] {
        assert_eq!(Ok(sig.to_string()), reg.parse(sig).map(|p| p.to_string()));
    }
}

#[test]
fn signature_errors() {
    init_tracing();
    let reg = Registry::default();

    assert_eq!(
        Err(Error::UnknownType {
            name: "Integer".into(),
            at: 7
        }),
        reg.parse("Int -> Integer")
    );
    assert_eq!(
        Err(Error::UnexpectedEnd {
            expected: "close ']'"
        }),
        reg.parse("[Int")
    );
    assert!(matches!(
        reg.parse("Int ]"),
        Err(Error::Unexpected { at: 4, .. })
    ));
    assert!(matches!(
        reg.parse("Int -> %"),
        Err(Error::Unexpected { at: 7, .. })
    ));
}

#[test]
fn registered_names() {
    let mut reg = Registry::default();
    reg.register(
        "Point",
        Pattern::record([("x", pattern!(Float)), ("y", pattern!(Float))]),
    );
    assert!(reg.names().any(|n| "Point" == n));
    assert_snapshot!(reg.parse("Point -> Float").unwrap().to_string(), @"{x ∷ Float, y ∷ Float} → Float");
}
// }}}

// currying {{{
#[test]
fn currying() {
    init_tracing();
    let add = add();

    assert_eq!(int(7), add.call(&[int(3), int(4)]));
    assert_eq!(int(7), add.call(&[int(3)]).call(&[int(4)]));
    assert_eq!(Expr::None, add.call(&["x".into(), int(4)]));
    assert_eq!(Expr::None, add.call(&[int(3)]).call(&["x".into()]));
    assert_eq!(Expr::Pattern(add.pattern().clone()), add.call(&[]));
}

#[test]
fn currying_is_associative() {
    let f = digits();
    let all = f.call(&[int(1), int(2), int(3)]);

    assert_eq!(int(123), all);
    assert_eq!(all, f.call(&[int(1)]).call(&[int(2)]).call(&[int(3)]));
    assert_eq!(all, f.call(&[int(1), int(2)]).call(&[int(3)]));
    assert_eq!(all, f.call(&[int(1)]).call(&[int(2), int(3)]));
}

#[test]
fn partial_pattern() {
    let p = digits().call(&[int(1)]);
    let Expr::Func(p) = p else {
        panic!("expected a partial, got {p}")
    };
    assert!(p.is_partial());
    assert_eq!(2, p.arity());
    assert_snapshot!(p.pattern().to_string(), @"Int → Int → Int");
}

#[test]
fn oversaturation() {
    let r = add().call(&ints(1..=5));
    let Expr::Vector(items) = &r else {
        panic!("expected a vector, got {r}")
    };
    assert_eq!(3, items.len());
    assert_eq!(int(3), items[0]);
    assert_eq!(int(7), items[1]);

    let Expr::Func(rest) = &items[2] else {
        panic!("expected a partial, got {}", items[2])
    };
    assert_eq!(1, rest.arity());
    assert_eq!(int(11), rest.call(&[int(6)]));
}

#[test]
fn oversaturation_exact_multiple() {
    assert_eq!(
        Expr::vector([int(3), int(7)]),
        add().call(&ints(1..=4))
    );
}

#[test]
fn any_mismatch_is_none() {
    let mut args = ints(1..=3);
    args.push("x".into());
    assert_eq!(Expr::None, add().call(&args));
    assert_eq!(Expr::None, add().call(&[Expr::None]));
}

#[test]
fn constants() {
    let c = constant(int(42));
    assert_eq!(0, c.arity());
    assert_eq!(int(42), c.call(&[]));
    assert_eq!(int(42), c.call(&["anything".into(), int(1)]));
}

#[test]
fn composition() {
    let inc = add().call(&[int(1)]);
    let inc = inc.as_func().unwrap();

    let f = compose(&double(), inc);
    assert_eq!(int(10), f.call(&[int(4)]));
    assert_snapshot!(f.pattern().to_string(), @"Int → Int");

    let len = define(
        |args| int(String::try_from(&args[0]).map_or(0, |s| s.len() as i64)),
        pattern!(String -> Int),
    );
    assert_eq!(Expr::None, compose(&add(), &double()));
    assert_eq!(Expr::None, compose(&len, &double()));
    assert_eq!(int(6), compose(&double(), &len).call(&["abc".into()]));
}

#[test]
fn named_function() {
    let add = add().named("add");
    assert_snapshot!(Expr::from(add.clone()).to_string(), @"fn(add)");
    assert_eq!(int(3), add.call(&[int(1), int(2)]));
}
// }}}

// sum types {{{
#[test]
fn case() {
    let c = Case::new(is_int, "int");

    match c.apply(&[int(1)]) {
        Outcome::Matched(r) => assert_eq!(Expr::from("int"), r),
        Outcome::Unmatched(_) => panic!("should have matched"),
    }
    match c.apply(&["x".into()]) {
        Outcome::Matched(r) => panic!("should not have matched, got {r}"),
        Outcome::Unmatched(args) => assert_eq!(&[Expr::from("x")][..], &*args),
    }
    assert_eq!(Expr::None, c.call(&["x".into()]));
}

#[test]
fn typed_case() {
    let c = Case::typed(pattern!(Int -> Int), double());
    assert_eq!(int(4), c.call(&[int(2)]));
    assert_eq!(Expr::None, c.call(&["x".into()]));
    assert_eq!(Expr::None, c.call(&[int(1), int(2)]));
}

#[test]
fn switch_is_stateless() {
    init_tracing();
    let sw = Switch::new([Case::new(is_int, "int"), Case::new(is_str, "str")]);

    assert_eq!(Expr::from("str"), sw.call(&["a".into()]));
    assert_eq!(Expr::from("int"), sw.call(&[int(1)]));
    assert_eq!(Expr::from("str"), sw.call(&["a".into()]));
    assert_eq!(Expr::from("int"), sw.call(&[int(2)]));
    assert_eq!(Expr::None, sw.call(&[Expr::from(1.5)]));
    assert_eq!(Some((1, "str".into())), sw.eval(&["b".into()]));
    assert_eq!(None, Switch::new([]).eval(&[int(1)]));
}

#[test]
fn option_idempotence() {
    let just = Expr::just(int(1));
    assert_eq!(just, Expr::just(just.clone()));
    assert_eq!(Expr::None, Expr::just(Expr::None));
    assert_eq!(Expr::None, Expr::None.fmap(|x| x.clone()));
    assert_eq!(Expr::just(int(4)), Expr::just(int(2)).fmap(|x| double().call(&[x.clone()])));
    assert_eq!(Expr::None, just.fmap(|_| Expr::None));
    assert_eq!(Expr::from(Some(3)), Expr::just(int(3)));
    assert_eq!(Expr::from(None::<i64>), Expr::None);
}

#[test]
fn maybe() {
    let positive = Case::new(
        |args| matches!(args, [Expr::Data(Value::Int(n))] if 0 < *n),
        define(|args| args[0].clone(), pattern!(Int -> Int)),
    );
    let m = Maybe::new(Switch::new([positive.clone()]), double());

    assert_snapshot!(m.call(&[int(3)]).to_string(), @"Just 6");
    assert_eq!(Expr::None, m.call(&[int(-1)]));
    assert_eq!(Tag::from(Atom::Just), m.call(&[int(3)]).tag());

    let wraps = Maybe::new(
        Switch::new([positive.clone()]),
        define(
            |args| Expr::just(args[0].clone()),
            Pattern::function([pattern!(Int)], Pattern::wrapped(Atom::Just, pattern!(Int))),
        ),
    );
    assert_eq!(Expr::just(int(5)), wraps.call(&[int(5)]));

    let guard = Maybe::guard(Switch::new([positive]));
    assert_eq!(Expr::just(int(5)), guard.call(&[int(5)]));
    assert_eq!(Expr::None, guard.call(&[int(0)]));
}

#[test]
fn optional_slots() {
    let reg = Registry::default();
    let given = define(
        |args| int(if args[0].is_none() { 0 } else { 1 }),
        reg.parse("Maybe Int -> Int").unwrap(),
    );

    assert_eq!(int(1), given.call(&[Expr::just(int(2))]));
    assert_eq!(int(0), given.call(&[Expr::None]));
    assert_eq!(Expr::None, given.call(&[Expr::just("x".into())]));
    assert_eq!(Expr::None, given.call(&[int(2)]));

    let m = Maybe::guard(Switch::new([Case::new(is_int, double())]));
    assert!(m.pattern().accepts(&Expr::None));
    assert!(!pattern!([Int]).accepts(&Expr::None));
}

#[test]
fn alternate() {
    let alt = Alternate::new(Case::new(is_int, double()), Case::new(is_str, "text"));

    let either = alt.call(&[int(2)]);
    assert_eq!(Expr::either(int(4)), either);
    assert_eq!(Tag::from(Atom::Either), either.tag());

    let or = alt.call(&["a".into()]);
    assert_eq!(Expr::or("text".into()), or);
    assert_eq!(Tag::from(Atom::Or), or.tag());

    assert_eq!(Expr::None, alt.call(&[Expr::from(1.5)]));
}

#[test]
fn case_kinds() {
    let sign = |args: &[Expr]| match as_int(&args[0]) {
        0 => None,
        n => Some(0 < n),
    };
    let positive = Case::trinary(sign, "positive");
    assert_eq!(Expr::from("positive"), positive.call(&[int(2)]));
    assert_eq!(Expr::None, positive.call(&[int(0)]));
    assert_eq!(Expr::None, positive.call(&[int(-2)]));

    let answer = Case::compare(
        |args| args[0].compare(&int(42)).unwrap_or(Ordering::Less),
        "found",
    );
    assert_eq!(Expr::from("found"), answer.call(&[int(42)]));
    assert_eq!(Expr::None, answer.call(&[int(41)]));
    assert_eq!(Expr::None, answer.call(&["x".into()]));

    let only_ints = Case::when(|args| args.iter().all(|a| Tag::from(Atom::Int) == a.tag()));
    assert_eq!(int(1), only_ints.call(&[int(1)]));
    assert_eq!(Expr::pair(int(1), int(2)), only_ints.call(&[int(1), int(2)]));
    assert_eq!(Expr::vector(ints(1..=3)), only_ints.call(&ints(1..=3)));
    assert_eq!(Expr::None, only_ints.call(&["x".into()]));
}

#[test]
fn wrappers_forward_calls() {
    let e = Expr::either(add().into());
    assert_eq!(Expr::either(int(3)), e.call(&[int(1), int(2)]));
    assert_eq!(Expr::None, e.call(&["x".into(), int(2)]));
    assert_eq!(Expr::just(int(8)), Expr::just(double().into()).call(&[int(4)]));
}

#[test]
fn introspection() {
    let sw = Switch::new([Case::typed(pattern!(Int -> Int), double())]);
    assert!(matches!(sw.call(&[]), Expr::Pattern(_)));
    assert_eq!(Tag::from(Atom::Flag), Expr::Switch(sw).call(&[]).tag());
}
// }}}

// continuations {{{
#[test]
fn continuation_laws() {
    let c = Continuation::from_vec([int(2), int(3)].into());
    let x = int(1);
    let l = Continuation::cons(x.clone(), c.clone());

    assert_eq!(x, l.head());
    assert_eq!(c, l.tail());
    assert_eq!(c, cont::concat(&Continuation::empty(), &c));

    let (h, t) = Continuation::empty().next();
    assert_eq!(Expr::None, h);
    assert!(t.is_empty());
}

#[test]
fn continuations_are_memoized() {
    let calls = Rc::new(Cell::new(0));
    let counted = {
        let calls = calls.clone();
        cont::map(&ints(1..=2), move |x| {
            calls.set(calls.get() + 1);
            x.clone()
        })
    };
    assert_eq!(counted.to_vec(), counted.clone().to_vec());
    assert_eq!(2, calls.get());
}

#[test]
fn concatenation() {
    let a = Continuation::from_iter(ints(1..=2));
    let b = Continuation::from_iter(ints(3..=4));
    assert_eq!(ints(1..=4), cont::concat(&a, &b).to_vec());
    assert_eq!(ints(1..=2), cont::concat(&a, &Continuation::empty()).to_vec());
}

#[test]
fn lazy_filter_map() {
    let mapped = Rc::new(Cell::new(0));
    let evens = cont::filter(&Expr::list(ints(1..=5)), |x| 0 == as_int(x) % 2);
    let doubled = {
        let mapped = mapped.clone();
        cont::map(&evens, move |x| {
            mapped.set(mapped.get() + 1);
            int(as_int(x) * 2)
        })
    };

    assert_eq!(0, mapped.get());
    assert_eq!(int(4), doubled.head());
    assert_eq!(1, mapped.get());
    assert_eq!(vec![int(4), int(8)], doubled.to_vec());
    assert_eq!(2, mapped.get());
}

#[test]
fn none_heads_are_skipped() {
    let c = Continuation::from_vec(
        [Expr::None, int(1), Expr::None, Expr::None, int(2), Expr::None].into(),
    );
    assert_eq!(Expr::None, c.head());
    assert_eq!(Some(int(1)), c.first());
    assert_eq!(
        vec![int(2), int(4)],
        cont::map(&c, |x| int(as_int(x) * 2)).to_vec()
    );
    assert!(Expr::List(Continuation::from_vec([Expr::None].into())).is_empty());
}

#[test]
fn folding() {
    let xs = Expr::vector(ints(1..=4));
    let sum = |a: &Expr, b: &Expr| int(as_int(a) + as_int(b));

    assert_eq!(int(10), cont::fold(&xs, int(0), sum));
    assert_eq!(
        vec![int(1), int(3), int(6), int(10)],
        cont::scan(&xs, int(0), sum).to_vec()
    );
    let evens_only = |a: &Expr, b: &Expr| {
        if 0 == as_int(b) % 2 {
            int(as_int(a) + as_int(b))
        } else {
            Expr::None
        }
    };
    assert_eq!(int(6), cont::fold(&xs, int(0), evens_only));
}

#[test]
fn zipping() {
    let pairs = cont::zip(
        &Expr::vector(ints(1..=3)),
        &Expr::list(ints(10..=11)),
        |a, b| Expr::pair(a.clone(), b.clone()),
    );
    assert_snapshot!(Expr::List(pairs).to_string(), @"[(1, 10), (2, 11)]");
}

#[test]
fn binding() {
    let xs = ints(1..=4);
    let twice = cont::bind(&xs, |x| Continuation::from_vec(vec![x.clone(), x.clone()].into()));
    assert_eq!(
        vec![int(1), int(1), int(2), int(2)],
        cont::take(&twice, 4).to_vec()
    );

    let evens = cont::bind(&xs, |x| {
        if 0 == as_int(x) % 2 {
            x.continuation()
        } else {
            Continuation::empty()
        }
    });
    assert_eq!(vec![int(2), int(4)], evens.to_vec());
}

#[test]
fn flattening() {
    let nested = Expr::list([
        Expr::vector(ints(1..=2)),
        int(3),
        Expr::list([int(4)]),
        Expr::None,
    ]);
    assert_eq!(ints(1..=4), cont::flatten(&nested).to_vec());
}

#[test]
fn rejecting_and_splitting() {
    let xs = ints(1..=6);
    let even = |x: &Expr| 0 == as_int(x) % 2;

    assert_eq!(vec![int(1), int(3), int(5)], cont::reject(&xs, even).to_vec());
    let parts = cont::split(&xs, even, |x| 4 < as_int(x));
    assert_snapshot!(parts.to_string(), @"([2, 4, 6], [5, 6])");
}

#[test]
fn applying_arguments() {
    let fs = Expr::list([add().call(&[int(1)]), double().into(), "k".into()]);

    assert_eq!(
        vec![int(3), int(4), Expr::from("k")],
        cont::apply(&fs, &[int(2)]).to_vec()
    );
    assert_eq!(vec![Expr::from("k")], cont::apply(&fs, &["x".into()]).to_vec());
}

#[test]
fn sorting() {
    let mixed = vec![
        Expr::from("b"),
        int(3),
        Expr::from(1.5),
        Expr::from("a"),
        int(-2),
        Expr::from(true),
    ];
    let sorted = cont::sort(&mixed);
    assert_snapshot!(Expr::List(sorted.clone()).to_string(), @r#"[true, -2, 1.5, 3, "a", "b"]"#);

    assert_eq!(Some(3), cont::search(&sorted, &int(3)));
    assert_eq!(Some(4), cont::search(&sorted, &Expr::from("a")));
    assert_eq!(None, cont::search(&sorted, &int(4)));

    assert_eq!(
        vec![int(3), int(2), int(1)],
        cont::sort_by(&ints(1..=3), |a, b| as_int(b).cmp(&as_int(a))).to_vec()
    );
}

#[test]
fn lookup_by_key() {
    let table = cont::sort(&vec![
        Expr::pair("b".into(), int(2)),
        Expr::pair("a".into(), int(1)),
        Expr::pair("b".into(), int(3)),
    ]);

    assert_eq!(Expr::pair("b".into(), int(2)), cont::lookup(&table, &Expr::from("b")));
    assert_eq!(Expr::None, cont::lookup(&table, &Expr::from("c")));
    assert_eq!(
        vec![Expr::pair("b".into(), int(2)), Expr::pair("b".into(), int(3))],
        cont::range(&table, &Expr::from("b")).to_vec()
    );
    assert!(cont::range(&table, &int(1)).is_empty());
}

#[test]
fn generators() {
    let nat = cont::generator(int(0), |x| int(as_int(x) + 1));
    assert_eq!(ints(0..=2), cont::take(&nat, 3).to_vec());

    let evens = cont::filter(&nat, |x| 0 == as_int(x) % 2);
    assert_eq!(
        vec![int(0), int(2), int(4)],
        cont::take(&evens, 3).to_vec()
    );

    assert_eq!(
        vec![
            Expr::vector(ints(0..=1)),
            Expr::vector(ints(2..=3)),
            Expr::vector([int(4)]),
        ],
        cont::chunks(&cont::take(&nat, 5), 2).to_vec()
    );

    let countdown = cont::generator(int(3), |x| match as_int(x) {
        0 => Expr::None,
        n => int(n - 1),
    });
    assert_eq!(4, countdown.iter().count());

    assert_snapshot!(Expr::List(nat).to_string(), @"[0, 1, 2, 3, 4, 5, 6, 7, ..]");
}

#[test]
fn unfolding_is_lazy() {
    let pulled = Rc::new(Cell::new(0));
    let source = {
        let pulled = pulled.clone();
        (0..).map(move |n| {
            pulled.set(pulled.get() + 1);
            int(n)
        })
    };
    let c = Continuation::unfold(source);
    assert_eq!(0, pulled.get());
    assert_eq!(ints(0..=1), cont::take(&c, 2).to_vec());
    assert_eq!(2, pulled.get());
}

#[test]
fn long_lists_drop() {
    let c: Continuation = (0..200_000).map(int).collect();
    assert_eq!(200_000, c.iter().count());
    drop(c);
}
// }}}

// collections {{{
#[test]
fn sequences_take_arguments() {
    assert_eq!(ints(1..=3), Expr::list(ints(1..=2)).call(&[int(3)]).continuation().to_vec());
    assert_eq!(Expr::vector(ints(1..=2)), Expr::vector([int(1)]).call(&[int(2)]));
    assert_eq!(
        Expr::pair(int(4), int(9)),
        Expr::pair(double().into(), int(9)).call(&[int(2)])
    );
}

#[test]
fn tuples() {
    let point = tuple_def([pattern!(Int), pattern!(String)]);
    assert_snapshot!(point.pattern().to_string(), @"Int → String → (Int, String)");

    let t = point.call(&[int(1), "a".into()]);
    assert_eq!(Expr::Tuple([int(1), Expr::from("a")].into()), t);
    assert_eq!(t, point.call(&[int(1)]).call(&["a".into()]));
    assert_eq!(Expr::None, point.call(&["a".into(), int(1)]));

    assert_eq!(Expr::from("a"), t.get(1));
    assert_eq!(Expr::None, t.get(2));
    assert_eq!(Expr::from("a"), t.call(&[int(1)]));
    assert_eq!(Expr::vector([int(1), "a".into()]), t.call(&[int(0), int(1)]));
    assert!(point.pattern().ret().matches(&t.pattern()));
}

#[test]
fn records() {
    let person = record_def([("name", pattern!(String)), ("age", pattern!(Int))]);
    let r = person.call(&[Expr::key("name", "Ann".into()), Expr::key("age", int(30))]);

    assert_eq!(int(30), r.field("age"));
    assert_eq!(Expr::None, r.field("height"));
    assert_eq!(Expr::from("Ann"), r.call(&["name".into()]));
    assert_snapshot!(r.to_string(), @r#"{name: "Ann", age: 30}"#);
    assert_snapshot!(r.pattern().to_string(), @"{name ∷ String, age ∷ Int}");

    assert_eq!(
        Expr::None,
        person.call(&[Expr::key("age", int(30)), Expr::key("name", "Ann".into())])
    );
    assert_eq!(
        Expr::None,
        person.call(&[Expr::key("name", int(3)), Expr::key("age", int(30))])
    );
}

#[test]
fn emptiness() {
    assert!(Expr::pair(Expr::None, Expr::None).is_empty());
    assert!(!Expr::pair(int(1), Expr::None).is_empty());
    assert!(Expr::Tuple([Expr::None].into()).is_empty());
    assert!(!Expr::Tuple([int(0)].into()).is_empty());
    assert!(Expr::list([]).is_empty());
    assert!(!Expr::list([int(1)]).is_empty());
    assert!(Expr::from("").is_empty());
}

#[test]
fn pairs_and_keys() {
    let p = Expr::pair(int(1), "a".into());
    assert_eq!(Expr::pair("a".into(), int(1)), p.swap());
    assert_eq!(Expr::pair(int(2), "k".into()), Expr::key("k", int(2)).swap());
    assert_eq!(Expr::None, int(1).swap());
    assert_eq!(vec![int(1)], p.keys().to_vec());

    let person = record_def([("name", pattern!(String)), ("age", pattern!(Int))])
        .call(&[Expr::key("name", "Ann".into()), Expr::key("age", int(30))]);
    assert_eq!(vec![Expr::from("name"), "age".into()], person.keys().to_vec());
    assert_eq!(vec![Expr::from("Ann"), int(30)], person.values().to_vec());

    let pairs = Expr::list([p.clone(), Expr::pair(int(2), "b".into()), int(3)]);
    assert_eq!(vec![Expr::from("a"), "b".into()], pairs.values().to_vec());
}

#[test]
fn expression_patterns() {
    assert_snapshot!(Expr::list([int(1)]).pattern().to_string(), @"List Int");
    assert_snapshot!(Expr::vector([int(1), "a".into()]).pattern().to_string(), @"Vector Int|String");
    assert_snapshot!(Expr::just(int(1)).pattern().to_string(), @"Just Int");
    assert_snapshot!(Expr::pair(int(1), "a".into()).pattern().to_string(), @"(Int, String)");
    assert_eq!(Tag::from(Atom::None), Expr::None.tag());
}

#[test]
fn functor_map() {
    let l = Expr::list(ints(1..=3)).fmap(|x| double().call(&[x.clone()]));
    assert_eq!(Tag::from(Atom::List), l.tag());
    assert_eq!(vec![int(2), int(4), int(6)], l.continuation().to_vec());
    assert_eq!(
        Expr::vector([int(2)]),
        Expr::vector([int(1)]).fmap(|x| double().call(&[x.clone()]))
    );
    assert_eq!(Expr::or(int(2)), Expr::or(int(1)).fmap(|x| double().call(&[x.clone()])));
}
// }}}
