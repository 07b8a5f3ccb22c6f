//! Operator and cast signatures.
//!
//! Every operator key owns an ordered list of signatures. Resolution is by
//! exact match on operand types and returns the first accepting entry, so
//! the registration order below is also the priority order.

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{BinOp, UnOp};
use crate::codegen::opcode::Opcode;
use crate::codegen::strategy::Strategy;
use crate::types::{display_types, Ty};

/// Identity of an operator or cast, independent of its spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperatorKey {
    Add,
    Subtract,
    Multiply,
    Divide,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Not,
    /// `[e | type]`; parameters are `(source, target)`.
    Cast,
    /// `x := e`; parameters are `(target, value)`.
    Assign,
}

impl OperatorKey {
    pub const ALL: [OperatorKey; 15] = [
        OperatorKey::Add,
        OperatorKey::Subtract,
        OperatorKey::Multiply,
        OperatorKey::Divide,
        OperatorKey::Greater,
        OperatorKey::GreaterEqual,
        OperatorKey::Less,
        OperatorKey::LessEqual,
        OperatorKey::Equal,
        OperatorKey::NotEqual,
        OperatorKey::And,
        OperatorKey::Or,
        OperatorKey::Not,
        OperatorKey::Cast,
        OperatorKey::Assign,
    ];

    pub fn for_binary(op: BinOp) -> Self {
        match op {
            BinOp::Add => OperatorKey::Add,
            BinOp::Sub => OperatorKey::Subtract,
            BinOp::Mul => OperatorKey::Multiply,
            BinOp::Div => OperatorKey::Divide,
            BinOp::Gt => OperatorKey::Greater,
            BinOp::GtEq => OperatorKey::GreaterEqual,
            BinOp::Lt => OperatorKey::Less,
            BinOp::LtEq => OperatorKey::LessEqual,
            BinOp::Eq => OperatorKey::Equal,
            BinOp::NotEq => OperatorKey::NotEqual,
            BinOp::And => OperatorKey::And,
            BinOp::Or => OperatorKey::Or,
        }
    }

    pub fn for_unary(op: UnOp) -> Self {
        match op {
            UnOp::Not => OperatorKey::Not,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OperatorKey::Add => "add",
            OperatorKey::Subtract => "subtract",
            OperatorKey::Multiply => "multiply",
            OperatorKey::Divide => "divide",
            OperatorKey::Greater => "greater",
            OperatorKey::GreaterEqual => "greater-equal",
            OperatorKey::Less => "less",
            OperatorKey::LessEqual => "less-equal",
            OperatorKey::Equal => "equal",
            OperatorKey::NotEqual => "not-equal",
            OperatorKey::And => "and",
            OperatorKey::Or => "or",
            OperatorKey::Not => "not",
            OperatorKey::Cast => "cast",
            OperatorKey::Assign => "assign",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Source spelling, for diagnostics.
    pub fn symbol(&self) -> &'static str {
        match self {
            OperatorKey::Add => "+",
            OperatorKey::Subtract => "-",
            OperatorKey::Multiply => "*",
            OperatorKey::Divide => "/",
            OperatorKey::Greater => ">",
            OperatorKey::GreaterEqual => ">=",
            OperatorKey::Less => "<",
            OperatorKey::LessEqual => "<=",
            OperatorKey::Equal => "==",
            OperatorKey::NotEqual => "!=",
            OperatorKey::And => "&&",
            OperatorKey::Or => "||",
            OperatorKey::Not => "!",
            OperatorKey::Cast => "|",
            OperatorKey::Assign => ":=",
        }
    }
}

impl fmt::Display for OperatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a signature is lowered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    Opcode(Opcode),
    Strategy(Strategy),
    /// Only the null signature has no lowering.
    None,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Opcode(op) => write!(f, "{}", op),
            Variant::Strategy(strategy) => write!(f, "{}", strategy),
            Variant::None => write!(f, "-"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Signature {
    params: Vec<Ty>,
    result: Ty,
    variant: Variant,
}

static NULL_SIGNATURE: Signature = Signature {
    params: Vec::new(),
    result: Ty::Error,
    variant: Variant::None,
};

impl Signature {
    pub fn new(variant: Variant, params: &[Ty], result: Ty) -> Self {
        Self {
            params: params.to_vec(),
            result,
            variant,
        }
    }

    /// The distinguished "nothing matched" signature.
    pub fn null() -> &'static Signature {
        &NULL_SIGNATURE
    }

    pub fn is_null(&self) -> bool {
        self.variant == Variant::None
    }

    /// Exact, component-wise match; no implicit widening.
    pub fn accepts(&self, types: &[Ty]) -> bool {
        !self.is_null() && self.params == types
    }

    pub fn params(&self) -> &[Ty] {
        &self.params
    }

    /// Type of the first operand, which picks the integer or floating
    /// instruction family.
    pub fn param_type(&self) -> Ty {
        self.params.first().copied().unwrap_or(Ty::NoType)
    }

    pub fn result(&self) -> Ty {
        self.result
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} [{}]",
            display_types(&self.params),
            self.result,
            self.variant
        )
    }
}

/// Every signature registered under one key, in priority order.
#[derive(Clone, Debug)]
pub struct SignatureSet {
    key: OperatorKey,
    signatures: Vec<Signature>,
}

impl SignatureSet {
    fn new(key: OperatorKey, signatures: Vec<Signature>) -> Self {
        Self { key, signatures }
    }

    pub fn key(&self) -> OperatorKey {
        self.key
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn accepting(&self, types: &[Ty]) -> Option<&Signature> {
        self.signatures.iter().find(|sig| sig.accepts(types))
    }

    pub fn count_accepting(&self, types: &[Ty]) -> usize {
        self.signatures.iter().filter(|sig| sig.accepts(types)).count()
    }
}

/// Immutable table of all operator signatures. Build once, share by
/// reference.
#[derive(Clone, Debug)]
pub struct SignatureRegistry {
    sets: BTreeMap<OperatorKey, SignatureSet>,
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SignatureRegistry {
    pub fn new() -> Self {
        use crate::types::Ty::{
            Boolean as B, Character as C, Floating as F, Integer as I, String as S,
        };

        let op = Variant::Opcode;
        let strategy = Variant::Strategy;
        let mut sets = BTreeMap::new();
        let mut register = |key: OperatorKey, signatures: Vec<Signature>| {
            sets.insert(key, SignatureSet::new(key, signatures));
        };

        let arithmetic = [
            (OperatorKey::Add, Opcode::Add, Opcode::FAdd),
            (OperatorKey::Subtract, Opcode::Subtract, Opcode::FSubtract),
            (OperatorKey::Multiply, Opcode::Multiply, Opcode::FMultiply),
            (OperatorKey::Divide, Opcode::Divide, Opcode::FDivide),
        ];
        for (key, int_op, float_op) in arithmetic {
            register(
                key,
                vec![
                    Signature::new(op(int_op), &[I, I], I),
                    Signature::new(op(float_op), &[F, F], F),
                ],
            );
        }

        // Comparisons reduce to a sign or zero test on the difference.
        let ordering = [
            OperatorKey::Greater,
            OperatorKey::GreaterEqual,
            OperatorKey::Less,
            OperatorKey::LessEqual,
        ];
        for key in ordering {
            register(
                key,
                vec![
                    Signature::new(op(Opcode::Subtract), &[I, I], B),
                    Signature::new(op(Opcode::FSubtract), &[F, F], B),
                    Signature::new(op(Opcode::Subtract), &[C, C], B),
                ],
            );
        }
        for key in [OperatorKey::Equal, OperatorKey::NotEqual] {
            register(
                key,
                vec![
                    Signature::new(op(Opcode::Subtract), &[I, I], B),
                    Signature::new(op(Opcode::FSubtract), &[F, F], B),
                    Signature::new(strategy(Strategy::BooleanDifference), &[B, B], B),
                    Signature::new(op(Opcode::Subtract), &[C, C], B),
                ],
            );
        }

        let identity = strategy(Strategy::Identity);
        register(
            OperatorKey::Cast,
            vec![
                Signature::new(identity, &[C, C], C),
                Signature::new(identity, &[C, I], I),
                Signature::new(identity, &[I, I], I),
                Signature::new(identity, &[F, F], F),
                Signature::new(identity, &[B, B], B),
                Signature::new(identity, &[S, S], S),
                Signature::new(strategy(Strategy::CastToBool(I)), &[I, B], B),
                Signature::new(strategy(Strategy::CastToBool(C)), &[C, B], B),
                Signature::new(strategy(Strategy::CastIntToChar), &[I, C], C),
                Signature::new(op(Opcode::ConvertF), &[I, F], F),
                Signature::new(op(Opcode::ConvertI), &[F, I], I),
            ],
        );

        register(
            OperatorKey::And,
            vec![Signature::new(op(Opcode::And), &[B, B], B)],
        );
        register(
            OperatorKey::Or,
            vec![Signature::new(op(Opcode::Or), &[B, B], B)],
        );
        register(
            OperatorKey::Not,
            vec![Signature::new(op(Opcode::BNegate), &[B], B)],
        );

        register(
            OperatorKey::Assign,
            Ty::PRIMITIVES
                .iter()
                .map(|&ty| Signature::new(identity, &[ty, ty], ty))
                .collect(),
        );

        tracing::debug!(operators = sets.len(), "built signature registry");
        Self { sets }
    }

    /// First signature under `key` accepting `types`, or the null
    /// signature.
    pub fn resolve(&self, key: OperatorKey, types: &[Ty]) -> &Signature {
        let found = self
            .sets
            .get(&key)
            .and_then(|set| set.accepting(types))
            .unwrap_or(Signature::null());
        tracing::trace!(
            operator = %key,
            operands = %display_types(types),
            signature = %found,
            "resolved signature"
        );
        found
    }

    pub fn accepts(&self, key: OperatorKey, types: &[Ty]) -> bool {
        !self.resolve(key, types).is_null()
    }

    pub fn count_accepting(&self, key: OperatorKey, types: &[Ty]) -> usize {
        self.sets
            .get(&key)
            .map_or(0, |set| set.count_accepting(types))
    }

    pub fn signatures_of(&self, key: OperatorKey) -> &[Signature] {
        self.sets.get(&key).map_or(&[], |set| set.signatures())
    }

    pub fn sets(&self) -> impl Iterator<Item = &SignatureSet> {
        self.sets.values()
    }

    /// Human-readable dump, one signature per line grouped by operator.
    pub fn table(&self, only: Option<OperatorKey>) -> String {
        let mut out = String::new();
        for set in self.sets.values() {
            if only.is_some_and(|key| key != set.key()) {
                continue;
            }
            out.push_str(&format!("{} ({})\n", set.key(), set.key().symbol()));
            for sig in set.signatures() {
                out.push_str(&format!("    {}\n", sig));
            }
        }
        out
    }

    /// Operand tuples accepted by more than one signature of the same key.
    /// A non-empty result is an authoring bug in the table.
    pub fn ambiguities(&self) -> Vec<(OperatorKey, Vec<Ty>)> {
        let mut found = Vec::new();
        for set in self.sets.values() {
            for sig in set.signatures() {
                if set.count_accepting(sig.params()) > 1
                    && !found.iter().any(|(k, p): &(OperatorKey, Vec<Ty>)| {
                        *k == set.key() && p.as_slice() == sig.params()
                    })
                {
                    found.push((set.key(), sig.params().to_vec()));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_pairs() -> Vec<[Ty; 2]> {
        let mut pairs = Vec::new();
        for a in Ty::PRIMITIVES {
            for b in Ty::PRIMITIVES {
                pairs.push([a, b]);
            }
        }
        pairs
    }

    #[test]
    fn test_registry_has_no_ambiguities() {
        let registry = SignatureRegistry::new();
        assert!(registry.ambiguities().is_empty());
    }

    #[test]
    fn test_resolve_matches_unique_acceptor() {
        let registry = SignatureRegistry::new();
        for key in OperatorKey::ALL {
            for pair in all_pairs() {
                let count = registry.count_accepting(key, &pair);
                let sig = registry.resolve(key, &pair);
                match count {
                    0 => assert!(sig.is_null(), "{} {:?} should not resolve", key, pair),
                    1 => {
                        assert!(sig.accepts(&pair));
                        let expected = registry
                            .signatures_of(key)
                            .iter()
                            .find(|s| s.accepts(&pair));
                        assert_eq!(Some(sig), expected);
                    }
                    n => panic!("{} {:?} accepted {} times", key, pair, n),
                }
            }
        }
    }

    #[test]
    fn test_null_signature() {
        let registry = SignatureRegistry::new();
        let sig = registry.resolve(OperatorKey::Add, &[Ty::Integer, Ty::Floating]);
        assert!(sig.is_null());
        assert_eq!(sig.result(), Ty::Error);
        assert_eq!(sig.variant(), Variant::None);
        assert!(!sig.accepts(&[]));
        assert!(!registry.accepts(OperatorKey::Add, &[Ty::Integer, Ty::Floating]));
        assert_eq!(sig.param_type(), Ty::NoType);
        assert_eq!(Ty::NoType.size(), 0);
    }

    #[test]
    fn test_arithmetic_signatures() {
        let registry = SignatureRegistry::new();
        let sig = registry.resolve(OperatorKey::Divide, &[Ty::Floating, Ty::Floating]);
        assert_eq!(sig.result(), Ty::Floating);
        assert_eq!(sig.variant(), Variant::Opcode(Opcode::FDivide));
        assert_eq!(registry.signatures_of(OperatorKey::Multiply).len(), 2);
    }

    #[test]
    fn test_comparisons_yield_boolean() {
        let registry = SignatureRegistry::new();
        for key in [OperatorKey::Greater, OperatorKey::LessEqual] {
            assert_eq!(registry.signatures_of(key).len(), 3);
            let sig = registry.resolve(key, &[Ty::Character, Ty::Character]);
            assert_eq!(sig.result(), Ty::Boolean);
            assert!(registry
                .resolve(key, &[Ty::Boolean, Ty::Boolean])
                .is_null());
        }
        let eq = registry.resolve(OperatorKey::Equal, &[Ty::Boolean, Ty::Boolean]);
        assert_eq!(eq.variant(), Variant::Strategy(Strategy::BooleanDifference));
        assert_eq!(registry.signatures_of(OperatorKey::NotEqual).len(), 4);
    }

    #[test]
    fn test_cast_table() {
        let registry = SignatureRegistry::new();
        let cast = |from, to| registry.resolve(OperatorKey::Cast, &[from, to]).clone();

        assert_eq!(cast(Ty::Character, Ty::Integer).result(), Ty::Integer);
        assert_eq!(
            cast(Ty::Integer, Ty::Boolean).variant(),
            Variant::Strategy(Strategy::CastToBool(Ty::Integer))
        );
        assert_eq!(
            cast(Ty::Integer, Ty::Character).variant(),
            Variant::Strategy(Strategy::CastIntToChar)
        );
        assert_eq!(
            cast(Ty::Integer, Ty::Floating).variant(),
            Variant::Opcode(Opcode::ConvertF)
        );
        assert_eq!(
            cast(Ty::Floating, Ty::Integer).variant(),
            Variant::Opcode(Opcode::ConvertI)
        );
        assert!(cast(Ty::Boolean, Ty::Integer).is_null());
        assert!(cast(Ty::String, Ty::Character).is_null());
        assert!(cast(Ty::Floating, Ty::Boolean).is_null());
        assert_eq!(registry.signatures_of(OperatorKey::Cast).len(), 11);
    }

    #[test]
    fn test_logical_and_assign() {
        let registry = SignatureRegistry::new();
        assert!(registry.accepts(OperatorKey::And, &[Ty::Boolean, Ty::Boolean]));
        assert!(!registry.accepts(OperatorKey::Or, &[Ty::Integer, Ty::Integer]));
        assert_eq!(
            registry.resolve(OperatorKey::Not, &[Ty::Boolean]).variant(),
            Variant::Opcode(Opcode::BNegate)
        );
        for ty in Ty::PRIMITIVES {
            assert_eq!(registry.resolve(OperatorKey::Assign, &[ty, ty]).result(), ty);
        }
        assert!(!registry.accepts(OperatorKey::Assign, &[Ty::Integer, Ty::Floating]));
    }

    #[test]
    fn test_ambiguity_detection() {
        let registry = SignatureRegistry {
            sets: BTreeMap::from([(
                OperatorKey::Add,
                SignatureSet::new(
                    OperatorKey::Add,
                    vec![
                        Signature::new(
                            Variant::Opcode(Opcode::Add),
                            &[Ty::Integer, Ty::Integer],
                            Ty::Integer,
                        ),
                        Signature::new(
                            Variant::Opcode(Opcode::FAdd),
                            &[Ty::Integer, Ty::Integer],
                            Ty::Integer,
                        ),
                    ],
                ),
            )]),
        };
        assert_eq!(
            registry.ambiguities(),
            vec![(OperatorKey::Add, vec![Ty::Integer, Ty::Integer])]
        );
        // first registration wins
        assert_eq!(
            registry.resolve(OperatorKey::Add, &[Ty::Integer, Ty::Integer]).variant(),
            Variant::Opcode(Opcode::Add)
        );
    }

    #[test]
    fn test_table_dump() {
        let registry = SignatureRegistry::new();
        assert_eq!(
            registry.table(Some(OperatorKey::Divide)),
            "divide (/)\n    (int, int) -> int [Divide]\n    (float, float) -> float [FDivide]\n"
        );
        let full = registry.table(None);
        assert_eq!(full.lines().filter(|l| !l.starts_with(' ')).count(), 15);
        assert!(full.contains("    (int, bool) -> bool [cast-to-bool(int)]"));
    }

    #[test]
    fn test_operator_names_round_trip() {
        for key in OperatorKey::ALL {
            assert_eq!(OperatorKey::from_name(key.name()), Some(key));
        }
        assert_eq!(OperatorKey::from_name("modulo"), None);
    }
}
