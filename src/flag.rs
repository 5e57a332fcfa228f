//! type tags, the bit-set algebra types are classified with

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::{BitAnd, BitOr, Not};

/// generates the `Atom` enum with its names, in bit order
macro_rules! make {
    ($($(#[$doc:meta])* $var:ident($name:literal),)*) => {
        /// a single classification, `1 << (atom as u8)` in a [`Tag`]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum Atom {
            $($(#[$doc])* $var,)*
        }

        impl Atom {
            pub const ALL: &'static [Atom] = &[$(Atom::$var,)*];

            pub fn try_from_name(name: &str) -> Option<Atom> {
                match name {
                    $($name => Some(Atom::$var),)*
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Atom::$var => $name,)*
                }
            }
        }
    };
}

make! {
    /// generic slot, the element of unknown type
    Type("Type"),
    Data("Data"),
    Constant("Constant"),
    Function("Function"),
    Partial("Partial"),
    Constructor("Constructor"),

    Nil("Nil"),
    Bool("Bool"),
    Int("Int"),
    Uint("Uint"),
    Float("Float"),
    Ratio("Ratio"),
    Byte("Byte"),
    Rune("Rune"),
    Bytes("Bytes"),
    String("String"),
    Error("Error"),
    /// a tag held as a value
    Flag("Flag"),

    None("None"),
    Just("Just"),
    Either("Either"),
    Or("Or"),
    Case("Case"),
    Switch("Switch"),

    List("List"),
    Vector("Vector"),
    Pair("Pair"),
    Tuple("Tuple"),
    Record("Record"),
    Key("Key"),
    Map("Map"),
}

const _: () = assert!(Atom::ALL.len() <= 64);

impl Atom {
    pub const fn bit(self) -> u64 {
        1 << self as u8
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}", self.name())
    }
}

/// a set of [`Atom`]s, always kept in its normal form: no member is
/// `Never`, one member is `Atom` and the rest is `Composed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    #[default]
    Never,
    Atom(Atom),
    Composed(Atoms),
}

/// raw member bits of a composed tag, at least two set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atoms(u64);

const USED: u64 = if Atom::ALL.len() == 64 {
    u64::MAX
} else {
    (1 << Atom::ALL.len()) - 1
};

const fn union(atoms: &[Atom]) -> Tag {
    let mut bits = 0;
    let mut k = 0;
    while k < atoms.len() {
        bits |= atoms[k].bit();
        k += 1;
    }
    Tag::from_bits(bits)
}

// classes {{{
impl Tag {
    pub const FUNCTIONS: Tag = union(&[
        Atom::Constant,
        Atom::Function,
        Atom::Partial,
        Atom::Constructor,
    ]);
    pub const INTEGERS: Tag = union(&[Atom::Int, Atom::Uint, Atom::Byte]);
    pub const NUMBERS: Tag = union(&[
        Atom::Int,
        Atom::Uint,
        Atom::Byte,
        Atom::Float,
        Atom::Ratio,
    ]);
    pub const LETTERS: Tag = union(&[Atom::Rune, Atom::Bytes, Atom::String]);
    pub const NATIVES: Tag = union(&[
        Atom::Nil,
        Atom::Bool,
        Atom::Int,
        Atom::Uint,
        Atom::Float,
        Atom::Ratio,
        Atom::Byte,
        Atom::Rune,
        Atom::Bytes,
        Atom::String,
        Atom::Error,
        Atom::Flag,
    ]);
    pub const MAYBE: Tag = union(&[Atom::Just, Atom::None]);
    pub const ALTERNATE: Tag = union(&[Atom::Either, Atom::Or]);
    pub const BRANCHES: Tag = union(&[
        Atom::None,
        Atom::Just,
        Atom::Either,
        Atom::Or,
        Atom::Case,
        Atom::Switch,
    ]);
    pub const CONSUMEABLES: Tag = union(&[Atom::List, Atom::Vector]);
    pub const PRODUCTS: Tag = union(&[
        Atom::Pair,
        Atom::Tuple,
        Atom::Record,
        Atom::Key,
        Atom::Map,
    ]);
    pub const COLLECTIONS: Tag = union(&[
        Atom::List,
        Atom::Vector,
        Atom::Pair,
        Atom::Tuple,
        Atom::Record,
        Atom::Key,
        Atom::Map,
    ]);

    /// names the classes are registered under
    pub const CLASSES: &'static [(&'static str, Tag)] = &[
        ("Functions", Tag::FUNCTIONS),
        ("Integers", Tag::INTEGERS),
        ("Numbers", Tag::NUMBERS),
        ("Letters", Tag::LETTERS),
        ("Natives", Tag::NATIVES),
        ("Maybe", Tag::MAYBE),
        ("Alternate", Tag::ALTERNATE),
        ("Branches", Tag::BRANCHES),
        ("Consumeables", Tag::CONSUMEABLES),
        ("Products", Tag::PRODUCTS),
        ("Collections", Tag::COLLECTIONS),
    ];
}
// }}}

impl Tag {
    pub const fn from_bits(bits: u64) -> Tag {
        let bits = bits & USED;
        match bits.count_ones() {
            0 => Tag::Never,
            1 => Tag::Atom(Atom::ALL[bits.trailing_zeros() as usize]),
            _ => Tag::Composed(Atoms(bits)),
        }
    }

    pub const fn bits(self) -> u64 {
        match self {
            Tag::Never => 0,
            Tag::Atom(a) => a.bit(),
            Tag::Composed(Atoms(bits)) => bits,
        }
    }

    pub fn is_never(self) -> bool {
        matches!(self, Tag::Never)
    }

    /// `other` is a non-zero subset of `self`; the zero tag is neither
    /// matching nor matched
    pub fn matches(self, other: impl Into<Tag>) -> bool {
        let (this, other) = (self.bits(), other.into().bits());
        0 != this && 0 != other && other & this == other
    }

    pub fn contains(self, atom: Atom) -> bool {
        0 != self.bits() & atom.bit()
    }

    /// any member in common
    pub fn meets(self, other: impl Into<Tag>) -> bool {
        0 != self.bits() & other.into().bits()
    }

    /// removes the members of `other`
    pub fn mask(self, other: impl Into<Tag>) -> Tag {
        Tag::from_bits(self.bits() & !other.into().bits())
    }

    pub fn count(self) -> usize {
        self.bits().count_ones() as usize
    }

    pub fn atoms(self) -> impl Iterator<Item = Atom> {
        let bits = self.bits();
        Atom::ALL
            .iter()
            .copied()
            .filter(move |a| 0 != bits & a.bit())
    }

    /// single-atom tags, lowest bit first
    pub fn decompose(self) -> Vec<Tag> {
        self.atoms().map(Tag::Atom).collect()
    }

    /// the element part of a container tag (eg. `Vector|Int` -> `Int`);
    /// `None` when the container is not in it or nothing else is, which
    /// reads "element type not known"
    pub fn element(self, container: Atom) -> Option<Tag> {
        if !self.contains(container) {
            return None;
        }
        match self.mask(container) {
            Tag::Never => None,
            elem => Some(elem),
        }
    }
}

impl From<Atom> for Tag {
    fn from(atom: Atom) -> Tag {
        Tag::Atom(atom)
    }
}

impl<T: Into<Tag>> BitOr<T> for Tag {
    type Output = Tag;
    fn bitor(self, rhs: T) -> Tag {
        Tag::from_bits(self.bits() | rhs.into().bits())
    }
}

impl<T: Into<Tag>> BitOr<T> for Atom {
    type Output = Tag;
    fn bitor(self, rhs: T) -> Tag {
        Tag::from(self) | rhs
    }
}

impl<T: Into<Tag>> BitAnd<T> for Tag {
    type Output = Tag;
    fn bitand(self, rhs: T) -> Tag {
        Tag::from_bits(self.bits() & rhs.into().bits())
    }
}

impl Not for Tag {
    type Output = Tag;
    fn not(self) -> Tag {
        Tag::from_bits(!self.bits())
    }
}

impl FromIterator<Tag> for Tag {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Tag {
        iter.into_iter().fold(Tag::Never, |acc, t| acc | t)
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        if let Tag::Never = self {
            return write!(f, "Never");
        }
        let mut first = true;
        for atom in self.atoms() {
            if !first {
                write!(f, "|")?;
            }
            first = false;
            write!(f, "{atom}")?;
        }
        Ok(())
    }
}
