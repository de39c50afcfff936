//! Message templates.
//!
//! A template is plain text with `{key}` placeholders filled from a
//! classification's [`Params`](crate::Params). Text between `[[` and `]]` is
//! an optional section: it is dropped when any placeholder inside it has no
//! value. `{{` and `}}` stand for literal braces.
//!
//! Only an English catalogue ships with the crate; [`TemplateStore`] is the
//! seam for translations.

use std::borrow::Cow;

use crate::{category::CauseCategory, fault::FaultKind};

/// Language every store is expected to cover.
pub const DEFAULT_LANG: &str = "en";

/// Source of the format strings an explanation is composed from.
pub trait TemplateStore {
    /// Cause text for `category`.
    fn template_for(&self, category: CauseCategory, lang: &str) -> Option<Cow<'_, str>>;

    /// Short hint shown after the cause. `many` selects the wording for a
    /// classification carrying more than one suggested name.
    fn suggestion_for(&self, _category: CauseCategory, _many: bool, _lang: &str) -> Option<Cow<'_, str>> {
        None
    }

    /// Kind-level description, independent of the cause. `{kind}` is the
    /// fault's class name.
    fn generic_for(&self, kind: &FaultKind, lang: &str) -> Option<Cow<'_, str>>;
}

/// The English catalogue compiled into the crate.
///
/// Any language it does not know falls back to English.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplates;

impl TemplateStore for BuiltinTemplates {
    fn template_for(&self, category: CauseCategory, _lang: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(cause_en(category)))
    }

    fn suggestion_for(&self, category: CauseCategory, many: bool, _lang: &str) -> Option<Cow<'_, str>> {
        suggestion_en(category, many).map(Cow::Borrowed)
    }

    fn generic_for(&self, kind: &FaultKind, _lang: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(generic_en(kind)))
    }
}

const DID_YOU_MEAN: &str = "Did you mean `{suggestion}`?";
const ONE_OF: &str = "Did you mean one of the following: {suggestions}?";

fn suggestion_en(category: CauseCategory, many: bool) -> Option<&'static str> {
    use CauseCategory as C;
    Some(match category {
        C::ModuleAttributeTypo
        | C::ModuleAttributeTypoMany
        | C::UseSynonym
        | C::AttributeTypo
        | C::NameTypo
        | C::ImportNameTypo
        | C::ModuleNotFoundTypo
        | C::MissingKeyTypo
        | C::ClassNameConfusion
        | C::FutureUnknown => {
            if many {
                ONE_OF
            } else {
                DID_YOU_MEAN
            }
        }
        C::UseBuiltinFunction | C::BuiltinFunctionAttribute | C::UseJoinWithStr => "Did you mean `{call}`?",
        C::AttributeInOtherModule => "Did you mean `{other}.{attr}`?",
        C::AttributeInOtherModules => "Did you mean one of the following modules: {modules}?",
        C::TupleByAccident => "Did you write a comma by mistake?",
        C::PerhapsComma => "Did you mean to separate object names by a comma (instead of a period)?",
        C::ShadowedStdlibModule => "You have a file with the same name as a standard library module.",
        C::CircularImport | C::CircularImportShadowingStdlib => "You likely have a circular import.",
        C::MissingImport => "Did you forget to import `{name}`?",
        C::UnboundLocalGlobal => "Did you forget to add `global {name}`?",
        C::UnboundLocalNonlocal => "Did you forget to add `nonlocal {name}`?",
        C::StrConcatenation => "Did you forget to convert `{right}` into a string?",
        C::UnclosedBracket => "Did you forget a closing {bracket_name}?",
        C::MissingColon => "Did you forget a colon `:`?",
        C::MissingComma => "Did you forget a comma?",
        C::AssignInsteadOfEqual | C::TripleEqual => "Perhaps you needed `==` or `is` instead of `=`.",
        C::ElseIfInsteadOfElif | C::ElseifInsteadOfElif => "Did you mean `elif`?",
        C::MisspelledKeyword => "Did you mean `{fixed}`?",
        C::LeadingZero | C::ImaginaryI => "Did you mean `{suggestion}`?",
        C::IdentifierStartsWithDigit => "Perhaps you forgot a multiplication operator, `{product}`.",
        C::HyphenInName => "Did you mean `{name}`?",
        C::DefMissingParens => "Did you forget parentheses?",
        C::PrintIsFunction => "Did you forget parentheses?",
        C::FancyQuote => "Did you mean to use a normal quote character, `{meant}`?",
        C::UnicodeFraction => "Did you mean `{fraction}`?",
        C::InvertedOperators => "Did you write operators in an incorrect order?",
        C::SemicolonInsteadOfColon => "Did you mean to write a colon?",
        C::Backquote => "To convert `x` into a string, use the function `repr(x)`.",
        C::CopyPastedCode => "Did you use copy-paste?",
        C::PipInstall => "Pip cannot be used to install packages from a Python program.",
        C::MissingContinuation => "Did you forget a continuation character `\\`?",
        _ => return None,
    })
}

fn cause_en(category: CauseCategory) -> &'static str {
    use CauseCategory as C;
    match category {
        C::Unknown => "Currently, I cannot guess the likely cause of this error.",

        // attribute faults
        C::UsesSlots => {
            "The object `{obj}` has no attribute `{attr}`. Note that object `{obj}` uses `__slots__` which \
             prevents the creation of new attributes. The following are some of its known attributes: {slots}."
        }
        C::ReadOnlySlots => {
            "Object `{obj}` uses `__slots__` to specify which attributes can be changed. The value of attribute \
             `{attr}` cannot be changed. The only attribute of `{obj}` whose value can be changed is one of: {slots}."
        }
        C::ReadOnlyAttribute => "The attribute `{attr}` of the object `{obj}` is read-only: its value cannot be changed.",
        C::NoneAttribute => {
            "You are attempting to access the attribute `{attr}` for a variable whose value is `None`. \
             Perhaps a function that returns nothing was used to compute it."
        }
        C::CircularImportShadowingStdlib => {
            "You imported a module named `{module}` from your own code. It has the same name as a module \
             from Python's standard library and it is still being initialized: you likely have a circular import."
        }
        C::CircularImport => {
            "The module `{module}` is being used while it is still being initialized. \
             This usually happens when you have a circular import."
        }
        C::ShadowedStdlibModule => {
            "You imported a module `{module}` from `{file}`. There is also a module named `{module}` in \
             Python's standard library. Perhaps you wanted to import a module with the same name from \
             Python's standard library, and your own file is hiding it."
        }
        C::ModuleAttributeTypo => {
            "Instead of writing `{obj}.{attr}`, perhaps you meant to write `{module}.{suggestion}`."
        }
        C::ModuleAttributeTypoMany => {
            "Instead of writing `{obj}.{attr}`, perhaps you meant to write one of the following names \
             which are attributes of module `{module}`: {suggestions}."
        }
        C::AttributeInOtherModule => {
            "The module `{module}` has no attribute named `{attr}`. However, the module `{other}`, \
             which is also in scope, has an attribute with that name."
        }
        C::AttributeInOtherModules => {
            "The module `{module}` has no attribute named `{attr}`. However, the following modules \
             in scope have an attribute with that name: {modules}."
        }
        C::TupleByAccident => {
            "The object `{obj}` is a tuple containing a single item[[, `{value}`]]. That item has an attribute \
             named `{attr}` but the tuple does not. Perhaps you added a trailing comma by mistake."
        }
        C::UseBuiltinFunction => {
            "The object `{obj}` has no attribute named `{attr}`. \
             Perhaps you can use the Python builtin function `{function}` instead: `{call}`."
        }
        C::UseSynonym => {
            "The object `{obj}` has no attribute named `{attr}`. However, it has the following attributes \
             with similar meanings: {suggestions}."
        }
        C::UseJoinWithStr => {
            "The object `{obj}` has no attribute named `{attr}`. Perhaps you wanted something like `{call}`."
        }
        C::BuiltinFunctionAttribute => {
            "`{function}` is a function, and functions have no attribute named `{attr}`. \
             Perhaps you meant to write `{call}`."
        }
        C::PerhapsComma => {
            "`{attr}` is not an attribute of `{obj}`. However, both `{obj}` and `{attr}` are known names. \
             Perhaps you wrote a period to separate these two objects instead of a comma."
        }
        C::ClassNameConfusion => {
            "The object `{obj}` is an instance of a class named `{class}`, which has no attribute `{attr}`. \
             Your program defines more than one class named `{class}`, and you may be using the wrong one."
        }
        C::AttributeTypo => {
            "The object `{obj}` has no attribute named `{attr}`. \
             The following are its attributes with similar names: {suggestions}."
        }
        C::ModuleAttributeGeneric => "The module `{module}` has no attribute named `{attr}`.",
        C::AttributeGenericClass => "The class `{obj}` has no attribute named `{attr}`.",
        C::AttributeGenericInstance => "The object `{obj}` has no attribute named `{attr}`. Its type is `{type}`.",

        // name faults
        C::FreeVariableUnbound => {
            "The variable `{name}` is used in a nested function but it has not been assigned a value \
             in the enclosing function before that point."
        }
        C::MissingImport => {
            "The name `{name}` is not defined in your program. `{name}` is the name of a module from \
             Python's standard library which you have not imported."
        }
        C::NameTypo => {
            "In your program, no object with the name `{name}` exists. \
             The most similar names, found in the {origin} scope, are: {suggestions}."
        }
        C::NameGeneric => {
            "In your program, no object with the name `{name}` exists. \
             You might have made a typo, or forgotten to define `{name}` before using it."
        }
        C::UnboundLocalNonlocal => {
            "The variable `{name}` exists in an enclosing function but it is assigned to in the current \
             function, which makes it a local variable that does not have a value yet."
        }
        C::UnboundLocalGlobal => {
            "The variable `{name}` exists in the global scope but it is assigned to in the current \
             function, which makes it a local variable that does not have a value yet."
        }
        C::UnboundLocalGeneric => "The local variable `{name}` is used before it has been assigned a value.",

        // type, value, arithmetic and lookup faults
        C::OperandTypeMismatch => {
            "You tried to use the operator `{op}` with an object of type `{left}` and an object of type \
             `{right}`. These types are not compatible with this operator."
        }
        C::StrConcatenation => {
            "You tried to concatenate (add) two different types of objects: a `{left}` and a `{right}`."
        }
        C::UnaryOperandType => {
            "You tried to use the unary operator `{op}` with an object of type `{operand}`, which does not support it."
        }
        C::ComparisonTypeMismatch => {
            "You tried to compare an object of type `{left}` with an object of type `{right}` using \
             the operator `{op}`. Such a comparison is not defined."
        }
        C::NotCallable => {
            "An object of type `{type}` is not callable, yet it is followed by parentheses as if it were a function."
        }
        C::NotSubscriptable => "Objects of type `{type}` cannot be indexed with square brackets.",
        C::NotIterable => "An object of type `{type}` cannot be iterated over, for example in a `for` loop.",
        C::Unhashable => {
            "Objects of type `{type}` are mutable and therefore unhashable: they cannot be used as \
             dict keys or set elements."
        }
        C::ImmutableItemAssignment => {
            "Objects of type `{type}` are immutable: one of their items cannot be changed by assignment."
        }
        C::WrongArgumentCount => {
            "The function `{function}` expects {expected} positional argument(s), but {given} were given."
        }
        C::MissingArgument => {
            "The function `{function}` is missing {count} required positional argument(s): {names}."
        }
        C::UnexpectedKeyword => {
            "The function `{function}` was called with the keyword argument `{keyword}`, which it does not accept."
        }
        C::TooManyValuesToUnpack => {
            "Unpacking assigns a name to each item of an iterable. Here there are more values than names: \
             {expected} name(s) were given[[ for {given} values]]."
        }
        C::NotEnoughValuesToUnpack => {
            "Unpacking assigns a name to each item of an iterable. Here there are fewer values than names: \
             {expected} name(s) were given but only {given} value(s) were found."
        }
        C::InvalidIntLiteral => "`int()` cannot convert {value} into an integer in base {base}.",
        C::InvalidFloatLiteral => "`float()` cannot convert {value} into a number.",
        C::MathDomain => {
            "You passed a value to a function of the `math` module which is outside of its domain, \
             such as the square root of a negative number."
        }
        C::DivisionByZero => "You are dividing by zero.",
        C::ModuloByZero => "You are using the modulo operator `%` with zero as the divisor.",
        C::IndexOutOfRange => {
            "You have tried to get an item from a `{type}` using an index that is out of range.\
             [[ `{sequence}` contains {length} item(s), so the valid index values are from 0 to {max_index}.]]"
        }
        C::MissingKeyTypo => "The key `{key}` cannot be found in `{mapping}`. Similar keys exist: {suggestions}.",
        C::MissingKey => "The key `{key}` cannot be found in the dict.",
        C::RecursionDepth => {
            "Your program exceeded the maximum recursion depth. \
             A function kept calling itself without ever reaching a case that stops the recursion."
        }

        // import faults
        C::ImportNameTypo => "The name[[ `{name}`]] cannot be imported from module `{module}`.",
        C::ImportNameGeneric => "The name[[ `{name}`]] cannot be imported from module `{module}`.",
        C::ModuleNotFoundTypo => "No module named `{module}` can be imported. Perhaps you made a typo in its name.",
        C::ModuleNotFoundGeneric => {
            "No module named `{module}` can be imported. Perhaps you need to install it, \
             or it is not on the module search path."
        }

        // compile faults: structure
        C::UnclosedBracket => {
            "The opening {bracket_name} `{bracket}` on line {line} is not closed."
        }
        C::UnmatchedClosingBracket => {
            "The closing {bracket_name} `{bracket}` on line {line} does not match any opening bracket."
        }
        C::MismatchedBracket => {
            "The closing {close_name} `{close}` on line {line} does not match the opening \
             {open_name} `{open}` on line {open_line}."
        }
        C::MissingColon => {
            "You wrote a statement[[ beginning with `{keyword}`]] but forgot to add a colon `:` at the end."
        }
        C::SemicolonInsteadOfColon => {
            "You wrote a semicolon, `;`, where a colon was expected.[[ A `{keyword}` statement must end with a colon.]]"
        }
        C::MissingComma => {
            "Python could not understand the code.[[ It looks like you forgot a comma between `{first}` and `{second}`.]]"
        }
        C::MissingCodeBlock => {
            "Python tells us that it reached the end of the file and expected more content. \
             A statement that ends with a colon must be followed by an indented block of code."
        }
        C::TooManyNestedBlocks => {
            "Your code is too complex for Python: you need to reduce the number of indented code blocks."
        }
        C::TooManyParentheses => {
            "Your code is too complex for Python: you need to reduce the number of parentheses \
             contained inside other parentheses."
        }

        // compile faults: assignment
        C::AssignInsteadOfEqual => {
            "You used an assignment operator `=` instead of an equality operator `==`. \
             The `=` sign is only used to assign a value to a variable."
        }
        C::AssignToLiteral => {
            "You wrote an expression like `{target} = ...` where `{target}` is or includes an actual \
             object of type `{type}`. You can only assign objects to identifiers (variable names)."
        }
        C::AssignToKeywordConstant => {
            "`{keyword}` is a constant in Python; you cannot assign it a different value."
        }
        C::AssignToFunctionCall => {
            "You wrote an expression like `{target} = ...` where `{target}` is a function call and \
             is not simply the name of a variable."
        }
        C::AssignToOperator => {
            "You wrote an expression like `{target} = ...` where `{target}` includes an operator. \
             Only names of variables can appear on the left of `=`."
        }
        C::AssignToConditional => {
            "On the left-hand side of an equal sign, you have a conditional expression instead of \
             the name of a variable: `{target}`."
        }
        C::AssignToGenerator => {
            "On the left-hand side of an equal sign, you have a generator expression instead of \
             the name of a variable: `{target}`."
        }
        C::AssignToFString => {
            "You wrote an expression that has the f-string `{target}` on the left-hand side of the equal sign. \
             An f-string should only appear on the right-hand side."
        }
        C::AssignToYield => {
            "You wrote an expression that includes the `yield` keyword on the left-hand side of the \
             equal sign: `{target}`."
        }
        C::AssignToEllipsis => {
            "The ellipsis symbol `...` is a constant in Python; you cannot assign it a different value."
        }
        C::HyphenInName => {
            "You wrote a name that contains a hyphen, `-`. Python reads it as a subtraction. \
             Valid names can contain underscores, `_`, but not hyphens."
        }
        C::StarredExpressionMisuse => {
            "The star operator `*` can only be used when unpacking several values, \
             not on its own in an expression."
        }
        C::DeleteFunctionCall => {
            "You attempted to delete a function call instead of deleting the function's name."
        }
        C::DeleteLiteral => "You cannot delete the literal value. You can only delete names of objects.",

        // compile faults: keywords and statements
        C::ElseIfInsteadOfElif => "You likely meant to use Python's `elif` keyword but wrote `else if` instead.",
        C::ElseifInsteadOfElif => "You likely meant to use Python's `elif` keyword but wrote `elseif` instead.",
        C::MisspelledKeyword => "You wrote `{word}`, which looks like a misspelling of the keyword `{keyword}`.",
        C::KeywordAsAttribute => {
            "You cannot use the Python keyword `{keyword}` as an attribute."
        }
        C::DefMissingParens => {
            "You defined a function `{name}` but forgot the parentheses that enclose its parameters."
        }
        C::DefMissingName => "You tried to define a function and forgot to name your function.",
        C::ClassMissingName => "A class needs a name.",
        C::BreakOutsideLoop => {
            "The Python keyword `break` can only be used inside a `for` loop or inside a `while` loop."
        }
        C::ContinueOutsideLoop => {
            "The Python keyword `continue` can only be used inside a `for` loop or inside a `while` loop."
        }
        C::ReturnOutsideFunction => "You can only use a `return` statement inside a function or method.",
        C::YieldOutsideFunction => "You can only use a `yield` statement inside a function.",
        C::AwaitOutsideFunction => "You can only use `await` inside an `async` function.",
        C::NonlocalAtModule => {
            "You used the nonlocal keyword at a module level. The nonlocal keyword refers to \
             a variable inside a function given a value outside that function."
        }
        C::NoBindingForNonlocal => {
            "You declared the variable `{name}` as being a nonlocal variable but it cannot be found."
        }
        C::AssignedBeforeGlobal => {
            "You assigned a value to the variable `{name}` before declaring it as a global variable."
        }
        C::UsedBeforeGlobal => "You used the variable `{name}` before declaring it as a global variable.",
        C::AssignedBeforeNonlocal => {
            "You assigned a value to the variable `{name}` before declaring it as a nonlocal variable."
        }
        C::UsedBeforeNonlocal => "You used the variable `{name}` before declaring it as a nonlocal variable.",
        C::ParameterAndGlobal => {
            "You used `{name}` as a parameter for a function before declaring it also as a global variable: \
             `{name}` cannot be both at the same time."
        }
        C::ParameterAndNonlocal => {
            "You used `{name}` as a parameter for a function before declaring it also as a nonlocal variable: \
             `{name}` cannot be both at the same time."
        }
        C::GlobalAndNonlocal => "You declared `{name}` as being both a global and nonlocal variable.",
        C::DuplicateArgument => {
            "You have defined a function repeating the keyword argument `{name}`. \
             Each argument should appear only once in a function definition."
        }
        C::KeywordArgumentRepeated => {
            "You have called a function repeating the same keyword argument. \
             Each keyword argument should appear only once in a function call."
        }
        C::PositionalAfterKeyword => {
            "In Python, you can call functions with only positional arguments, with only keyword arguments, \
             or with a combination of the two, but positional arguments must come first."
        }
        C::NonDefaultAfterDefault => {
            "In Python, you can define functions with only positional arguments, with only keyword arguments, \
             or with a combination of the two, but arguments without a default value must come first."
        }
        C::FutureNotFirst => {
            "A `from __future__ import` statement changes the way Python interprets the code in a file. \
             It must appear at the beginning of the file."
        }
        C::FutureBraces => {
            "I suspect you wrote `from __future__ import braces` following someone else's suggestion. \
             This will never work: Python uses indentation, not braces, to delimit code blocks."
        }
        C::FutureUnknown => {
            "`{feature}` is not a valid feature of module `__future__`. The available features are: {features}."
        }
        C::WalrusUnsupported => {
            "You appear to be using the walrus operator `:=`, which is only available in Python 3.8 and newer."
        }
        C::TrailingCommaInImport => {
            "Python indicates that you need to surround an expression ending with a comma by parentheses. \
             However, if you remove the last comma, there will be no syntax error."
        }
        C::AndInImport => {
            "The Python keyword `and` can only be used for boolean expressions. \
             Separate the names you import with commas instead."
        }
        C::Backquote => {
            "You are using the backquote character. Either you meant to write a single quote, `'`, \
             or copied Python 2 code; in that case, use the function `repr(x)`."
        }
        C::Python2Raise => {
            "It looks like you are trying to raise an exception using Python 2 syntax. \
             Write `raise Error(message)` instead."
        }

        // compile faults: not code
        C::PrintIsFunction => {
            "In older version of Python, `print` was a keyword. Now, `print` is a function; \
             you need to use parentheses to call it."
        }
        C::CopyPastedCode => {
            "It looks like you copy-pasted code from an interactive interpreter. \
             The Python prompt, `{prompt}`, should not be included in your code."
        }
        C::PipInstall => {
            "It looks as if you are attempting to use pip to install a module. \
             `pip` is a command that needs to run in a terminal, not from Python."
        }
        C::PythonCommand => {
            "I am guessing that you are attempting to use Python to run a program. \
             You must do so from a terminal and not from a Python interpreter."
        }

        // compile faults: tokens
        C::TripleEqual => {
            "You wrote three equal signs in a row, which is allowed in some other languages but not in Python. \
             To check if two objects are the exact same object, use the operator `is`."
        }
        C::InvertedOperators => {
            "You wrote the operator `{wrong}`. Did you write operators in an incorrect order? \
             The correct operator is `{right}`."
        }
        C::FancyQuote => {
            "There is a fancy unicode quotation mark, `{char}`, in your code where a normal quote \
             character, `{meant}`, was expected."
        }
        C::UnicodeFraction => {
            "You used the unicode character `{char}` which is known as a vulgar fraction. \
             I suspect that you meant to write the fraction `{fraction}`."
        }
        C::InvalidCharacter => "Your code contains the invalid character `{char}` ({code}).",
        C::NonPrintableCharacter => {
            "Your code contains the invalid non-printable character {code}. It is often added \
             unintentionally when copying code from a web page."
        }
        C::LeadingZero => {
            "Integers written with leading zeros are not allowed. `{number}` is not valid Python; \
             an octal number is written with a `0o` prefix."
        }
        C::IdentifierStartsWithDigit => {
            "Valid names cannot begin with a number, and `{name}` does."
        }
        C::ImaginaryI => {
            "Python uses `j` rather than `i` for the imaginary unit of a complex number, \
             so `{number}` is not valid."
        }
        C::InvalidHexLiteral => {
            "`{number}` is not a valid hexadecimal number. Only digits and the letters `a` to `f` may follow `0x`."
        }
        C::InvalidOctalLiteral => {
            "`{number}` is not a valid octal number. Only the digits `0` to `7` may follow `0o`."
        }
        C::UnterminatedString => {
            "You started writing a string with a single or double quote but never ended the string \
             with another quote on that line."
        }
        C::UnterminatedTripleQuote => {
            "You started writing a triple-quoted string but never wrote the triple quotes needed to end the string."
        }
        C::FStringBackslash => {
            "You have written an f-string whose expression contains a backslash character. \
             To fix this, you can replace the part that contains a backslash by a variable."
        }
        C::FStringUnmatchedClosing => {
            "You have written an f-string which has an unmatched `}}`. \
             If you want to print a single `}}`, you need to write `}}}}` in the f-string."
        }
        C::FStringExpectingClosing => {
            "You have written an f-string which has an unmatched `{{`. \
             If you want to print a single `{{`, you need to write `{{{{` in the f-string."
        }
        C::UnicodeEscapeBackslash => {
            "You have written a string containing one backslash character, `\\` followed by an uppercase `U` \
             and some other characters. Python reads this as the start of a unicode escape sequence. \
             Use a raw string, or write `\\\\` to get a single backslash."
        }

        // compile faults: indentation
        C::ExpectedIndentedBlock => {
            "The line above ends with a colon, so Python expected to begin a new indented block, \
             but this line is not indented."
        }
        C::UnexpectedIndent => "This line is more indented than expected.",
        C::MissingContinuation => {
            "The previous line ends in the middle of an expression. \
             Perhaps you meant to include a continuation character, `\\`, at the end of it."
        }
        C::UnindentMismatch => {
            "This line is less indented than expected: its indentation does not match any outer block."
        }
        C::TabsAndSpaces => {
            "A `TabError` indicates that you have used both spaces and tab characters to indent your code."
        }
    }
}

fn generic_en(kind: &FaultKind) -> &'static str {
    match kind {
        FaultKind::AttributeError => {
            "An `AttributeError` occurs when the code contains something like `object.x` \
             and `x` is not a method or attribute of `object`."
        }
        FaultKind::NameError => {
            "A `NameError` exception indicates that a variable or function name is not known to Python."
        }
        FaultKind::UnboundLocalError => {
            "In Python, variables that are used inside a function are known as local variables. \
             An `UnboundLocalError` is raised when one is used before it has been assigned a value."
        }
        FaultKind::TypeError => {
            "A `TypeError` is usually caused by trying to combine two incompatible types of objects, \
             by calling a function with the wrong type of object, or by operating on an object that \
             does not support the operation."
        }
        FaultKind::ValueError => {
            "A `ValueError` indicates that a function or an operation received an argument of the right type, \
             but an inappropriate value."
        }
        FaultKind::UnicodeDecodeError => {
            "A `UnicodeDecodeError` is raised when bytes cannot be decoded with the chosen encoding."
        }
        FaultKind::ArithmeticError => "An `ArithmeticError` indicates that an arithmetic operation failed.",
        FaultKind::ZeroDivisionError => {
            "A `ZeroDivisionError` occurs when you are attempting to divide a value by zero \
             either directly or by using some other mathematical operation."
        }
        FaultKind::OverflowError => {
            "An `OverflowError` is raised when the result of an arithmetic operation is too large to be represented."
        }
        FaultKind::LookupError => "A `LookupError` indicates that a key or an index was not found in a container.",
        FaultKind::IndexError => {
            "An `IndexError` occurs when you try to get an item from a list, a tuple, or a similar object \
             (sequence), and use an index which does not exist."
        }
        FaultKind::KeyError => {
            "A `KeyError` is raised when a value is not found as a key in a Python dict \
             or in a similar object."
        }
        FaultKind::ImportError => {
            "An `ImportError` exception indicates that a certain object could not be imported \
             from a module or package."
        }
        FaultKind::ModuleNotFoundError => {
            "A `ModuleNotFoundError` exception indicates that you are trying to import a module \
             that cannot be found by Python."
        }
        FaultKind::RuntimeError => "A `RuntimeError` is raised when an error does not fit any other category.",
        FaultKind::RecursionError => {
            "A `RecursionError` is raised when a function calls itself, directly or indirectly, too many times."
        }
        FaultKind::SyntaxError => {
            "A `SyntaxError` occurs when Python cannot understand your code."
        }
        FaultKind::IndentationError => {
            "An `IndentationError` occurs when a given line of code is not indented (aligned vertically \
             with other lines) as expected."
        }
        FaultKind::TabError => {
            "A `TabError` indicates that you have used both spaces and tab characters to indent your code."
        }
        FaultKind::Other(_) => "An exception of type `{kind}` was raised.",
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_category_has_a_cause_template() {
        for category in CauseCategory::iter() {
            let template = BuiltinTemplates.template_for(category, DEFAULT_LANG);
            assert!(
                template.is_some_and(|text| !text.trim().is_empty()),
                "no template for {category}"
            );
        }
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let en = BuiltinTemplates.template_for(CauseCategory::DivisionByZero, "en");
        let xx = BuiltinTemplates.template_for(CauseCategory::DivisionByZero, "xx");
        assert_eq!(en, xx);
    }

    #[test]
    fn suggestion_wording_depends_on_count() {
        let one = BuiltinTemplates.suggestion_for(CauseCategory::AttributeTypo, false, "en");
        let many = BuiltinTemplates.suggestion_for(CauseCategory::AttributeTypo, true, "en");
        assert_eq!(one.as_deref(), Some(DID_YOU_MEAN));
        assert_eq!(many.as_deref(), Some(ONE_OF));
        assert_eq!(BuiltinTemplates.suggestion_for(CauseCategory::DivisionByZero, false, "en"), None);
    }

    #[test]
    fn other_kinds_get_a_generic_text() {
        let text = BuiltinTemplates.generic_for(&FaultKind::Other("OSError".to_owned()), "en");
        assert_eq!(text.as_deref(), Some("An exception of type `{kind}` was raised."));
    }
}
