//! Decorator-type vocabulary registry.
//!
//! A decorator type is the lifecycle role of a registered function. Suite definitions group their functions by it.

use std::fmt;

use crate::vocab::registry::{self, VocabInfo};

/// Stable identifier for the lifecycle role of a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecoratorType {
    BeforeClass,
    AfterClass,
    BeforeTest,
    AfterTest,
    TestCase,
}

impl DecoratorType {
    /// All decorator types in the order a suite iteration first touches them.
    pub const ALL: [DecoratorType; 5] = [
        DecoratorType::BeforeClass,
        DecoratorType::BeforeTest,
        DecoratorType::TestCase,
        DecoratorType::AfterTest,
        DecoratorType::AfterClass,
    ];

    /// Whether functions of this type are lifecycle hooks rather than test cases.
    pub fn is_hook(self) -> bool {
        !matches!(self, DecoratorType::TestCase)
    }
}

impl fmt::Display for DecoratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(as_str(*self))
    }
}

/// Metadata entry for a decorator type.
pub type DecoratorInfo = VocabInfo<DecoratorType>;

/// Registry of decorator types.
pub const DECORATORS: &[DecoratorInfo] = &[
    DecoratorInfo {
        id: DecoratorType::BeforeClass,
        canonical: "before_class",
        aliases: &["setup_class"],
        description: "Runs once before the test cases of each suite iteration.",
    },
    DecoratorInfo {
        id: DecoratorType::AfterClass,
        canonical: "after_class",
        aliases: &["teardown_class"],
        description: "Runs once after the test cases of each suite iteration.",
    },
    DecoratorInfo {
        id: DecoratorType::BeforeTest,
        canonical: "before_test",
        aliases: &["setup"],
        description: "Runs before every attempt of every test case.",
    },
    DecoratorInfo {
        id: DecoratorType::AfterTest,
        canonical: "after_test",
        aliases: &["teardown"],
        description: "Runs after every successful test body.",
    },
    DecoratorInfo {
        id: DecoratorType::TestCase,
        canonical: "test_case",
        aliases: &["test"],
        description: "A test function, executed once per declared parameter.",
    },
];

/// Resolve a decorator spelling to its stable id.
pub fn from_str(name: &str) -> Option<DecoratorType> {
    registry::lookup(DECORATORS, name)
}

/// Return the canonical spelling for a decorator type.
pub fn as_str(id: DecoratorType) -> &'static str {
    info_for(id).canonical
}

/// Return the metadata entry for a decorator type.
pub fn info_for(id: DecoratorType) -> &'static DecoratorInfo {
    registry::entry(DECORATORS, id)
}
