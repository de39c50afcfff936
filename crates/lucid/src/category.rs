//! Cause categories and classification results.

use smallvec::SmallVec;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Closed set of recognised mistake patterns.
///
/// Each variant displays as its message-template identifier (kebab-case);
/// the template text itself lives in a [`TemplateStore`](crate::TemplateStore).
/// `Unknown` is the well-defined "no plausible cause found" outcome.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    IntoStaticStr,
    EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CauseCategory {
    Unknown,

    // --- attribute faults ---
    UsesSlots,
    ReadOnlySlots,
    ReadOnlyAttribute,
    NoneAttribute,
    CircularImportShadowingStdlib,
    CircularImport,
    ShadowedStdlibModule,
    ModuleAttributeTypo,
    ModuleAttributeTypoMany,
    AttributeInOtherModule,
    AttributeInOtherModules,
    TupleByAccident,
    UseBuiltinFunction,
    UseSynonym,
    UseJoinWithStr,
    BuiltinFunctionAttribute,
    PerhapsComma,
    ClassNameConfusion,
    AttributeTypo,
    ModuleAttributeGeneric,
    AttributeGenericClass,
    AttributeGenericInstance,

    // --- name faults ---
    FreeVariableUnbound,
    MissingImport,
    NameTypo,
    NameGeneric,
    UnboundLocalNonlocal,
    UnboundLocalGlobal,
    UnboundLocalGeneric,

    // --- type / value / arithmetic / lookup faults ---
    OperandTypeMismatch,
    StrConcatenation,
    UnaryOperandType,
    ComparisonTypeMismatch,
    NotCallable,
    NotSubscriptable,
    NotIterable,
    Unhashable,
    ImmutableItemAssignment,
    WrongArgumentCount,
    MissingArgument,
    UnexpectedKeyword,
    TooManyValuesToUnpack,
    NotEnoughValuesToUnpack,
    InvalidIntLiteral,
    InvalidFloatLiteral,
    MathDomain,
    DivisionByZero,
    ModuloByZero,
    IndexOutOfRange,
    MissingKeyTypo,
    MissingKey,
    RecursionDepth,

    // --- import faults ---
    ImportNameTypo,
    ImportNameGeneric,
    ModuleNotFoundTypo,
    ModuleNotFoundGeneric,

    // --- compile faults: structure ---
    UnclosedBracket,
    UnmatchedClosingBracket,
    MismatchedBracket,
    MissingColon,
    SemicolonInsteadOfColon,
    MissingComma,
    MissingCodeBlock,
    TooManyNestedBlocks,
    TooManyParentheses,

    // --- compile faults: assignment ---
    AssignInsteadOfEqual,
    AssignToLiteral,
    AssignToKeywordConstant,
    AssignToFunctionCall,
    AssignToOperator,
    AssignToConditional,
    AssignToGenerator,
    AssignToFString,
    AssignToYield,
    AssignToEllipsis,
    HyphenInName,
    StarredExpressionMisuse,
    DeleteFunctionCall,
    DeleteLiteral,

    // --- compile faults: keywords and statements ---
    ElseIfInsteadOfElif,
    ElseifInsteadOfElif,
    MisspelledKeyword,
    KeywordAsAttribute,
    DefMissingParens,
    DefMissingName,
    ClassMissingName,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    ReturnOutsideFunction,
    YieldOutsideFunction,
    AwaitOutsideFunction,
    NonlocalAtModule,
    NoBindingForNonlocal,
    AssignedBeforeGlobal,
    UsedBeforeGlobal,
    AssignedBeforeNonlocal,
    UsedBeforeNonlocal,
    ParameterAndGlobal,
    ParameterAndNonlocal,
    GlobalAndNonlocal,
    DuplicateArgument,
    KeywordArgumentRepeated,
    PositionalAfterKeyword,
    NonDefaultAfterDefault,
    FutureNotFirst,
    FutureBraces,
    FutureUnknown,
    WalrusUnsupported,
    TrailingCommaInImport,
    AndInImport,
    Backquote,
    Python2Raise,

    // --- compile faults: things that are not code ---
    PrintIsFunction,
    CopyPastedCode,
    PipInstall,
    PythonCommand,

    // --- compile faults: tokens ---
    TripleEqual,
    InvertedOperators,
    FancyQuote,
    UnicodeFraction,
    InvalidCharacter,
    NonPrintableCharacter,
    LeadingZero,
    IdentifierStartsWithDigit,
    ImaginaryI,
    InvalidHexLiteral,
    InvalidOctalLiteral,
    UnterminatedString,
    UnterminatedTripleQuote,
    FStringBackslash,
    FStringUnmatchedClosing,
    FStringExpectingClosing,
    UnicodeEscapeBackslash,

    // --- compile faults: indentation ---
    ExpectedIndentedBlock,
    UnexpectedIndent,
    MissingContinuation,
    UnindentMismatch,
    TabsAndSpaces,
}

impl CauseCategory {
    /// Message-template identifier for this category.
    #[must_use]
    pub fn template_id(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub fn is_unknown(self) -> bool {
        self == Self::Unknown
    }
}

/// A parameter substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ParamValue {
    /// Plain text taken from the fault or the source (names, type names).
    Text(String),
    /// Rendering of a live object value bound to variable `var`; always passes
    /// through the redaction collaborator before display.
    Value { var: String, repr: String },
    /// A list of names, rendered as "`a`, `b`".
    List(Vec<String>),
}

/// Ordered `{key}` substitutions extracted by classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Params(SmallVec<[(String, ParamValue); 4]>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an earlier value.
    pub fn set(&mut self, key: &str, value: ParamValue) {
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        } else {
            self.0.push((key.to_owned(), value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The text of a [`ParamValue::Text`] entry.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(ParamValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of the classifier and of the Compile-Fault Locator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Classification {
    pub category: CauseCategory,
    pub params: Params,
}

impl Classification {
    #[must_use]
    pub fn new(category: CauseCategory) -> Self {
        Self {
            category,
            params: Params::new(),
        }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self::new(CauseCategory::Unknown)
    }

    #[must_use]
    pub fn text(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.set(key, ParamValue::Text(value.into()));
        self
    }

    #[must_use]
    pub fn value(mut self, key: &str, var: impl Into<String>, repr: impl Into<String>) -> Self {
        self.params.set(
            key,
            ParamValue::Value {
                var: var.into(),
                repr: repr.into(),
            },
        );
        self
    }

    #[must_use]
    pub fn list<I, S>(mut self, key: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params
            .set(key, ParamValue::List(names.into_iter().map(Into::into).collect()));
        self
    }
}
