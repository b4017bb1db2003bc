//! Declaration grammar for namespaces, enums, templates and classes.
//!
//! A hand-written recursive descent over the shared [`Cursor`]. Top-level
//! alternatives are tried in a fixed order at every position:
//!
//! ```text
//! program    := ( '{' | namespace | enum | template | class | '}' )*
//! namespace  := 'namespace' IDENT ('::' IDENT)* '{'
//! enum       := 'enum' ['class'|'struct'] IDENT [':' type] '{' (IDENT ['=' expr] [','])* '}' ';'
//! template   := 'template' <...> ('class'|'struct'|'union') ... '{...}' ';'
//! class      := annotation* ('class'|'struct') IDENT ['final'] [':' parents] '{' item* '}' ';'
//! ```
//!
//! Class body items, in priority order: annotation, constructor/destructor,
//! member template, access specifier, nested type, ignored declaration,
//! member or method.
//!
//! A rule that has not yet matched its leading keyword gives way to the next
//! alternative with the cursor restored. Once a rule has committed, a
//! mismatch ends the whole parse.

use crate::events::{EventBus, EventKind, ParseEvent, ParseListener, SubscriptionId};
use crate::lexical::{skip_ignorable, Cursor};
use crate::scope::{skip_balanced, skip_literal, ScopeTracker};
use cppfacts::Visibility;
use log::{debug, warn};

/// Result of one call to [`ParserDriver::parse`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome<'s> {
    /// Every non-ignorable character was matched
    pub success: bool,

    /// Bytes matched before the declaration that failed (the whole input on
    /// success)
    pub consumed: usize,

    /// Unconsumed trailing text, empty on success
    pub remainder: &'s str,

    /// Tracked scope depth when matching stopped
    pub depth: u32,

    /// Byte offset where the failing rule gave up
    pub failed_at: Option<usize>,
}

/// Entry point of the grammar engine.
///
/// Owns the event bus; every listener sees every matching event in source
/// order while [`ParserDriver::parse`] runs.
///
/// ```rust
/// use cppfacts_cpp::{ParseEvent, ParserDriver};
///
/// let mut names = Vec::new();
/// {
///     let mut parser = ParserDriver::new();
///     parser.subscribe(|event: &ParseEvent| {
///         if let ParseEvent::EnumMemberSeen { identifier, .. } = event {
///             names.push(identifier.clone());
///         }
///     });
///     assert!(parser.parse("enum Colors { red, green, blue };").success);
/// }
/// assert_eq!(names, ["red", "green", "blue"]);
/// ```
#[derive(Debug, Default)]
pub struct ParserDriver<'l> {
    bus: EventBus<'l>,
}

impl<'l> ParserDriver<'l> {
    pub fn new() -> Self {
        Self {
            bus: EventBus::new(),
        }
    }

    pub fn subscribe<L>(&mut self, listener: L) -> SubscriptionId
    where
        L: ParseListener + 'l,
    {
        self.bus.subscribe(listener)
    }

    pub fn subscribe_to<L>(&mut self, kinds: &[EventKind], listener: L) -> SubscriptionId
    where
        L: ParseListener + 'l,
    {
        self.bus.subscribe_to(kinds, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Match `source` from start to end, emitting events as declarations
    /// are recognized. Each call starts at depth 0.
    pub fn parse<'s>(&mut self, source: &'s str) -> ParseOutcome<'s> {
        debug!("Parsing {} bytes", source.len());
        let grammar = Grammar {
            cursor: Cursor::new(source),
            scope: ScopeTracker::new(),
            bus: &mut self.bus,
        };
        let outcome = grammar.program();
        if outcome.success {
            if outcome.depth != 0 {
                warn!("Input ended with {} unclosed scope(s)", outcome.depth);
            }
        } else {
            debug!(
                "Parse stopped at byte {} of {}",
                outcome.consumed,
                source.len()
            );
        }
        outcome
    }
}

/// A committed rule failed at this byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mismatch(usize);

/// `Ok(false)`: not this rule, cursor restored. `Ok(true)`: matched.
type Rule = Result<bool, Mismatch>;

#[derive(Debug, Default, Clone, Copy)]
struct Modifiers {
    is_static: bool,
    is_const: bool,
    is_virtual: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct FunctionTail {
    is_const: bool,
    is_override: bool,
}

/// Accepted before a member or method and otherwise ignored
const IGNORED_MODIFIERS: &[&str] = &[
    "inline",
    "constexpr",
    "consteval",
    "constinit",
    "mutable",
    "explicit",
    "extern",
    "thread_local",
    "volatile",
];

/// Words that combine into a single builtin type (`unsigned long long`)
const BUILTIN_TYPE_WORDS: &[&str] = &[
    "unsigned", "signed", "short", "long", "int", "char", "wchar_t", "char8_t", "char16_t",
    "char32_t", "bool", "float", "double", "void", "auto",
];

/// Words that can never start a type name
const RESERVED: &[&str] = &[
    "public",
    "protected",
    "private",
    "operator",
    "template",
    "friend",
    "using",
    "typedef",
    "class",
    "struct",
    "enum",
    "union",
    "namespace",
    "static",
    "virtual",
    "const",
    "return",
];

const OPERATOR_SYMBOLS: &[u8] = b"+-*/%^&|~!=<>,";

struct Grammar<'a, 's, 'l> {
    cursor: Cursor<'s>,
    scope: ScopeTracker,
    bus: &'a mut EventBus<'l>,
}

impl<'s> Grammar<'_, 's, '_> {
    fn program(mut self) -> ParseOutcome<'s> {
        loop {
            self.skip();
            if self.cursor.is_eof() {
                return self.finish(None);
            }
            let start = self.cursor.pos();
            let failed_at = match self.top_level() {
                Ok(true) => continue,
                Ok(false) => start,
                Err(Mismatch(at)) => at,
            };
            self.cursor.reset(start);
            return self.finish(Some(failed_at));
        }
    }

    fn finish(self, failed_at: Option<usize>) -> ParseOutcome<'s> {
        ParseOutcome {
            success: failed_at.is_none(),
            consumed: self.cursor.pos(),
            remainder: self.cursor.rest(),
            depth: self.scope.depth(),
            failed_at,
        }
    }

    fn top_level(&mut self) -> Rule {
        if self.cursor.peek() == Some(b'{') {
            self.open_scope();
            return Ok(true);
        }
        if self.namespace_decl()? || self.enum_decl()? || self.template_decl(None)? {
            return Ok(true);
        }
        if self.class_decl()? {
            return Ok(true);
        }
        if self.peek() == Some(b'}') {
            self.close_scope()?;
            return Ok(true);
        }
        Ok(false)
    }

    // Declarations

    fn namespace_decl(&mut self) -> Rule {
        if !self.keyword("namespace") {
            return Ok(false);
        }
        let mut names = Vec::new();
        if let Some(first) = self.ident() {
            names.push(first);
            while self.punct("::") {
                match self.ident() {
                    Some(name) => names.push(name),
                    None => return self.fail(),
                }
            }
        }
        if names.len() == 1 && self.punct("=") {
            debug!("Skipping namespace alias {}", names[0]);
            self.skip_statement()?;
            return Ok(true);
        }
        if !self.punct("{") {
            return self.fail();
        }
        let depth = self.scope.depth();
        for name in names {
            self.emit(ParseEvent::NamespaceSeen {
                name: name.to_string(),
                depth,
            });
        }
        self.open_scope_after_brace();
        Ok(true)
    }

    fn enum_decl(&mut self) -> Rule {
        if !self.keyword("enum") {
            return Ok(false);
        }
        let is_class = self.keyword("class") || self.keyword("struct");
        // Anonymous enums are not matched
        let Some(name) = self.ident() else {
            return self.fail();
        };
        if self.single_colon() {
            self.cursor.bump();
            if self.type_name().is_none() {
                return self.fail();
            }
        }
        if self.punct(";") {
            debug!("Skipping opaque enum declaration {name}");
            return Ok(true);
        }
        if !self.punct("{") {
            return self.fail();
        }

        let depth = self.scope.depth();
        let name = name.to_string();
        self.emit(if is_class {
            ParseEvent::EnumClassSeen {
                name: name.clone(),
                depth,
            }
        } else {
            ParseEvent::EnumSeen {
                name: name.clone(),
                depth,
            }
        });
        self.open_scope_after_brace();

        loop {
            match self.peek() {
                Some(b'}') => break,
                None => return self.fail(),
                _ => {}
            }
            let Some(identifier) = self.ident() else {
                return self.fail();
            };
            self.emit(ParseEvent::EnumMemberSeen {
                enum_name: name.clone(),
                identifier: identifier.to_string(),
            });
            if self.punct("=") {
                self.skip();
                let start = self.cursor.pos();
                self.consume_expression(b",}")?;
                if self.cursor.pos() == start {
                    return self.fail();
                }
            }
            self.punct(",");
        }
        self.close_scope()?;
        self.expect(";")
    }

    /// `template <...>` followed by a type definition, or inside a class
    /// body by any member. Nothing inside is reported.
    fn template_decl(&mut self, class_name: Option<&str>) -> Rule {
        if !self.keyword("template") {
            return Ok(false);
        }
        self.skip_group(b'<', b'>')?;
        if self.nested_type()? {
            return Ok(true);
        }
        let Some(class_name) = class_name else {
            return self.fail();
        };
        if self.ignored_declaration()?
            || self.constructor(class_name)?
            || self.member_or_method()?.is_some()
        {
            return Ok(true);
        }
        self.fail()
    }

    fn class_decl(&mut self) -> Rule {
        let mark = self.cursor.pos();
        let mut annotations = Vec::new();
        while let Some(text) = self.annotation()? {
            annotations.push(text);
        }
        let is_struct = if self.keyword("class") {
            false
        } else if self.keyword("struct") {
            true
        } else {
            self.cursor.reset(mark);
            return Ok(false);
        };
        let Some(name) = self.ident() else {
            return self.fail();
        };
        self.keyword("final");
        if self.punct(";") {
            debug!("Skipping forward declaration of {name}");
            return Ok(true);
        }

        let default_visibility = Visibility::default_for(is_struct);
        let mut parents = Vec::new();
        if self.single_colon() {
            self.cursor.bump();
            loop {
                let visibility = self.parent_visibility().unwrap_or(default_visibility);
                let Some(parent) = self.type_name() else {
                    return self.fail();
                };
                parents.push((parent, visibility));
                if !self.punct(",") {
                    break;
                }
            }
        }
        if !self.punct("{") {
            return self.fail();
        }

        let depth = self.scope.depth();
        for text in annotations {
            self.emit(ParseEvent::AnnotationSeen { text });
        }
        let name_owned = name.to_string();
        self.emit(if is_struct {
            ParseEvent::StructSeen {
                name: name_owned,
                depth,
            }
        } else {
            ParseEvent::ClassSeen {
                name: name_owned,
                depth,
            }
        });
        for (name, visibility) in parents {
            self.emit(ParseEvent::ParentSeen { name, visibility });
        }
        self.class_body(name)?;
        Ok(true)
    }

    /// Items up to and including the closing `};`. The opening brace is not
    /// a tracked scope, so the close emits `ClassPop` only.
    fn class_body(&mut self, class_name: &str) -> Result<(), Mismatch> {
        loop {
            match self.peek() {
                None => return self.fail(),
                Some(b'}') => {
                    self.cursor.bump();
                    self.expect(";")?;
                    self.emit(ParseEvent::ClassPop);
                    return Ok(());
                }
                _ => {}
            }
            if let Some(text) = self.annotation()? {
                self.emit(ParseEvent::AnnotationSeen { text });
                continue;
            }
            if self.constructor(class_name)? || self.template_decl(Some(class_name))? {
                continue;
            }
            if let Some(visibility) = self.access_specifier() {
                self.emit(ParseEvent::VisibilityChange { visibility });
                continue;
            }
            if self.nested_type()? || self.ignored_declaration()? {
                continue;
            }
            match self.member_or_method()? {
                Some(events) => {
                    for event in events {
                        self.emit(event);
                    }
                }
                None => return self.fail(),
            }
        }
    }

    fn annotation(&mut self) -> Result<Option<String>, Mismatch> {
        self.skip();
        if !self.cursor.starts_with("[[") {
            return Ok(None);
        }
        let rest = &self.cursor.rest()[2..];
        match rest.find("]]") {
            Some(end) => {
                let text = rest[..end].trim().to_string();
                self.cursor.advance(end + 4);
                Ok(Some(text))
            }
            None => self.fail(),
        }
    }

    /// Constructors and destructors are consumed and not reported
    fn constructor(&mut self, class_name: &str) -> Rule {
        let mark = self.cursor.pos();
        while self.keyword("explicit")
            || self.keyword("virtual")
            || self.keyword("inline")
            || self.keyword("constexpr")
        {}
        self.punct("~");
        let named = self.ident() == Some(class_name);
        if !named || self.peek() != Some(b'(') {
            self.cursor.reset(mark);
            return Ok(false);
        }
        self.skip_group(b'(', b')')?;
        self.function_tail(true)?;
        Ok(true)
    }

    fn access_specifier(&mut self) -> Option<Visibility> {
        let mark = self.cursor.pos();
        let visibility = self.ident().and_then(Visibility::from_keyword);
        if visibility.is_some() && self.single_colon() {
            self.cursor.bump();
            return visibility;
        }
        self.cursor.reset(mark);
        None
    }

    fn parent_visibility(&mut self) -> Option<Visibility> {
        let mut visibility = None;
        loop {
            if self.keyword("virtual") {
                continue;
            }
            let mark = self.cursor.pos();
            match self.ident().and_then(Visibility::from_keyword) {
                Some(v) if visibility.is_none() => visibility = Some(v),
                _ => {
                    self.cursor.reset(mark);
                    return visibility;
                }
            }
        }
    }

    /// Nested `enum`/`class`/`struct`/`union` definitions and forward
    /// declarations, skipped whole
    fn nested_type(&mut self) -> Rule {
        if !(self.keyword("enum")
            || self.keyword("class")
            || self.keyword("struct")
            || self.keyword("union"))
        {
            return Ok(false);
        }
        if self.skip_to_body()? == b'{' {
            self.skip_group(b'{', b'}')?;
            self.skip_statement()?;
        } else {
            self.cursor.bump();
        }
        Ok(true)
    }

    /// Declarations with nothing to report: `using`, `typedef`,
    /// `static_assert`, `friend` and stray `;`
    fn ignored_declaration(&mut self) -> Rule {
        if self.punct(";") {
            return Ok(true);
        }
        if self.keyword("friend") {
            self.skip_declaration(true)?;
            return Ok(true);
        }
        if self.keyword("using") || self.keyword("typedef") || self.keyword("static_assert") {
            self.skip_declaration(false)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Leading modifiers, a type and a name, then a parameter list for a
    /// method or a terminator for members. Returns the events to emit
    /// without emitting them, or `None` with the cursor restored.
    fn member_or_method(&mut self) -> Result<Option<Vec<ParseEvent>>, Mismatch> {
        let mark = self.cursor.pos();
        let modifiers = self.modifiers();

        let (type_name, name) = if self.keyword("operator") {
            match self.type_name() {
                Some(target) => (String::new(), format!("operator {target}")),
                None => {
                    self.cursor.reset(mark);
                    return Ok(None);
                }
            }
        } else {
            let Some(type_name) = self.type_name() else {
                self.cursor.reset(mark);
                return Ok(None);
            };
            let Some(name) = self.declarator_name() else {
                self.cursor.reset(mark);
                return Ok(None);
            };
            (type_name, name)
        };

        if self.peek() == Some(b'(') {
            self.skip_group(b'(', b')')?;
            let tail = self.function_tail(false)?;
            return Ok(Some(vec![ParseEvent::MethodSeen {
                return_type: type_name,
                name,
                is_const: modifiers.is_const || tail.is_const,
                is_static: modifiers.is_static,
                is_virtual: modifiers.is_virtual || tail.is_override,
            }]));
        }

        let mut events = Vec::new();
        let mut name = name;
        loop {
            self.member_suffix()?;
            events.push(ParseEvent::MemberSeen {
                type_name: type_name.clone(),
                name,
                is_const: modifiers.is_const,
                is_static: modifiers.is_static,
            });
            if !self.punct(",") {
                break;
            }
            while self.punct("*") || self.punct("&") {}
            name = match self.declarator_name() {
                Some(next) => next,
                None => return self.fail(),
            };
        }
        self.expect(";")?;
        Ok(Some(events))
    }

    fn modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::default();
        loop {
            if self.keyword("static") {
                modifiers.is_static = true;
            } else if self.keyword("const") {
                modifiers.is_const = true;
            } else if self.keyword("virtual") {
                modifiers.is_virtual = true;
            } else if !IGNORED_MODIFIERS.iter().any(|kw| self.keyword(kw)) {
                return modifiers;
            }
        }
    }

    /// Array extents, bit-field width and initializer of a member declarator
    fn member_suffix(&mut self) -> Result<(), Mismatch> {
        while self.peek() == Some(b'[') {
            self.skip_group(b'[', b']')?;
        }
        if self.single_colon() {
            self.cursor.bump();
            self.consume_expression(b";,={")?;
        }
        if self.punct("=") {
            // Balanced: a `;` inside brackets or a lambda body does not end it
            self.consume_expression(b";")?;
        } else if self.peek() == Some(b'{') {
            self.skip_group(b'{', b'}')?;
        }
        Ok(())
    }

    /// Qualifiers, initializer list and body or terminator after a
    /// parameter list
    fn function_tail(&mut self, constructor: bool) -> Result<FunctionTail, Mismatch> {
        let mut tail = FunctionTail::default();
        loop {
            if self.keyword("const") {
                tail.is_const = true;
            } else if self.keyword("override") {
                tail.is_override = true;
            } else if self.keyword("final") || self.keyword("volatile") {
            } else if self.keyword("noexcept") || self.keyword("throw") {
                if self.peek() == Some(b'(') {
                    self.skip_group(b'(', b')')?;
                }
            } else if self.punct("->") {
                if self.type_name().is_none() {
                    return self.fail();
                }
            } else if self.punct("&&") || self.punct("&") || self.annotation()?.is_some() {
            } else {
                break;
            }
        }

        if constructor && self.single_colon() {
            self.cursor.bump();
            loop {
                if self.type_name().is_none() {
                    return self.fail();
                }
                match self.peek() {
                    Some(b'(') => self.skip_group(b'(', b')')?,
                    Some(b'{') => self.skip_group(b'{', b'}')?,
                    _ => return self.fail(),
                }
                if !self.punct(",") {
                    break;
                }
            }
        }

        if self.punct("=") {
            if !(self.keyword("0") || self.keyword("default") || self.keyword("delete")) {
                return self.fail();
            }
            self.expect(";")?;
        } else if self.peek() == Some(b'{') {
            self.skip_group(b'{', b'}')?;
            self.punct(";");
        } else if !self.punct(";") {
            return self.fail();
        }
        Ok(tail)
    }

    // Types and names

    /// A type with whitespace normalized, or `None` with the cursor restored
    fn type_name(&mut self) -> Option<String> {
        let mark = self.cursor.pos();
        self.skip();
        let start = self.cursor.pos();
        self.keyword("typename");

        let mut end = None;
        loop {
            self.skip();
            match BUILTIN_TYPE_WORDS
                .iter()
                .find(|word| self.cursor.at_keyword(word))
            {
                Some(word) => {
                    self.cursor.advance(word.len());
                    end = Some(self.cursor.pos());
                }
                None => break,
            }
        }

        if end.is_none() {
            self.skip();
            self.cursor.eat("::");
            loop {
                match self.ident() {
                    Some(word) if !RESERVED.contains(&word) => {}
                    _ => {
                        self.cursor.reset(mark);
                        return None;
                    }
                }
                self.skip();
                if self.cursor.peek() == Some(b'<')
                    && !skip_balanced(&mut self.cursor, b'<', b'>')
                {
                    self.cursor.reset(mark);
                    return None;
                }
                end = Some(self.cursor.pos());
                if !self.punct("::") {
                    break;
                }
            }
        }

        let mut end = end?;
        loop {
            if self.keyword("const")
                || self.keyword("volatile")
                || self.punct("*")
                || self.punct("&&")
                || self.punct("&")
            {
                end = self.cursor.pos();
            } else {
                break;
            }
        }
        self.cursor.reset(end);
        Some(normalize_type(self.cursor.slice(start, end)))
    }

    /// Identifier or `operator` followed by its symbol
    fn declarator_name(&mut self) -> Option<String> {
        let mark = self.cursor.pos();
        let name = self.ident()?;
        if name != "operator" {
            return Some(name.to_string());
        }
        self.skip();
        let start = self.cursor.pos();
        if self.cursor.eat("()") || self.cursor.eat("[]") {
        } else if self.cursor.eat_keyword("new") || self.cursor.eat_keyword("delete") {
            self.skip();
            self.cursor.eat("[]");
        } else {
            while self
                .cursor
                .peek()
                .is_some_and(|b| OPERATOR_SYMBOLS.contains(&b))
            {
                self.cursor.bump();
            }
        }
        let symbol = normalize_type(self.cursor.slice(start, self.cursor.pos()));
        if symbol.is_empty() {
            self.cursor.reset(mark);
            return None;
        }
        if symbol.starts_with(|c: char| c.is_ascii_alphabetic()) {
            Some(format!("operator {symbol}"))
        } else {
            Some(format!("operator{symbol}"))
        }
    }

    // Skipping

    /// Stop before `stops` at bracket depth 0, stepping over groups,
    /// literals and comments
    fn consume_expression(&mut self, stops: &[u8]) -> Result<(), Mismatch> {
        loop {
            self.skip();
            match self.cursor.peek() {
                None => return self.fail(),
                Some(b) if stops.contains(&b) => return Ok(()),
                Some(b'(') => self.skip_group(b'(', b')')?,
                Some(b'[') => self.skip_group(b'[', b']')?,
                Some(b'{') => self.skip_group(b'{', b'}')?,
                Some(b'\'') if self.cursor.at_digit_separator() => self.cursor.bump(),
                Some(b'"' | b'\'') => self.literal()?,
                Some(b'}') => return self.fail(),
                Some(_) => self.cursor.bump(),
            }
        }
    }

    fn skip_statement(&mut self) -> Result<(), Mismatch> {
        self.consume_expression(b";")?;
        self.expect(";")?;
        Ok(())
    }

    /// Skip to the end of a declaration. With `body_ends`, a brace group
    /// finishes it (a friend function defined inline).
    fn skip_declaration(&mut self, body_ends: bool) -> Result<(), Mismatch> {
        self.consume_expression(b";{")?;
        if self.cursor.peek() == Some(b';') {
            self.cursor.bump();
            return Ok(());
        }
        self.skip_group(b'{', b'}')?;
        if body_ends {
            self.punct(";");
            Ok(())
        } else {
            self.skip_statement()
        }
    }

    /// Advance to the `{` or `;` that follows a type head, without
    /// consuming it
    fn skip_to_body(&mut self) -> Result<u8, Mismatch> {
        loop {
            self.skip();
            match self.cursor.peek() {
                None | Some(b'}') => return self.fail(),
                Some(b @ (b'{' | b';')) => return Ok(b),
                Some(b'(') => self.skip_group(b'(', b')')?,
                Some(b'<') => {
                    if !skip_balanced(&mut self.cursor, b'<', b'>') {
                        self.cursor.bump();
                    }
                }
                Some(b'\'') if self.cursor.at_digit_separator() => self.cursor.bump(),
                Some(b'"' | b'\'') => self.literal()?,
                Some(_) => self.cursor.bump(),
            }
        }
    }

    fn skip_group(&mut self, open: u8, close: u8) -> Result<(), Mismatch> {
        self.skip();
        if skip_balanced(&mut self.cursor, open, close) {
            Ok(())
        } else {
            self.fail()
        }
    }

    fn literal(&mut self) -> Result<(), Mismatch> {
        if skip_literal(&mut self.cursor) {
            Ok(())
        } else {
            self.fail()
        }
    }

    // Scopes and events

    fn open_scope(&mut self) {
        self.cursor.bump();
        self.open_scope_after_brace();
    }

    fn open_scope_after_brace(&mut self) {
        self.scope.push();
        self.emit(ParseEvent::ScopePush);
    }

    /// Tracked `}`; closing below depth 0 is a mismatch
    fn close_scope(&mut self) -> Result<(), Mismatch> {
        if self.scope.pop().is_none() {
            return self.fail();
        }
        self.cursor.bump();
        self.emit(ParseEvent::ScopePop);
        Ok(())
    }

    fn emit(&mut self, event: ParseEvent) {
        self.bus.emit(&event);
    }

    // Tokens. Each one skips ignorable text first.

    fn skip(&mut self) {
        skip_ignorable(&mut self.cursor);
    }

    fn keyword(&mut self, kw: &str) -> bool {
        self.skip();
        self.cursor.eat_keyword(kw)
    }

    fn punct(&mut self, p: &str) -> bool {
        self.skip();
        self.cursor.eat(p)
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip();
        self.cursor.peek()
    }

    fn ident(&mut self) -> Option<&'s str> {
        self.skip();
        self.cursor.ident()
    }

    /// At a `:` that is not part of `::`
    fn single_colon(&mut self) -> bool {
        self.peek() == Some(b':') && self.cursor.peek_at(1) != Some(b':')
    }

    fn expect(&mut self, p: &str) -> Rule {
        if self.punct(p) {
            Ok(true)
        } else {
            self.fail()
        }
    }

    fn fail<T>(&self) -> Result<T, Mismatch> {
        Err(Mismatch(self.cursor.pos()))
    }
}

/// Collapse whitespace in a type, keeping a space only where removing it
/// would join two words (`unsigned long`, `char* const`, `a, b`)
fn normalize_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            let prev = out.chars().last().unwrap_or(' ');
            let word = |ch: char| ch.is_ascii_alphanumeric() || ch == '_';
            if (word(prev) || matches!(prev, ',' | '*' | '&' | '>')) && word(c) {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> (ParseOutcome<'_>, Vec<ParseEvent>) {
        let mut events = Vec::new();
        let outcome = {
            let mut parser = ParserDriver::new();
            parser.subscribe(|event: &ParseEvent| events.push(event.clone()));
            parser.parse(source)
        };
        (outcome, events)
    }

    fn ns(name: &str, depth: u32) -> ParseEvent {
        ParseEvent::NamespaceSeen {
            name: name.into(),
            depth,
        }
    }

    fn member(enum_name: &str, identifier: &str) -> ParseEvent {
        ParseEvent::EnumMemberSeen {
            enum_name: enum_name.into(),
            identifier: identifier.into(),
        }
    }

    fn kinds(events: &[ParseEvent]) -> Vec<EventKind> {
        events.iter().map(ParseEvent::kind).collect()
    }

    #[test]
    fn test_nested_namespace_segments() {
        let (outcome, events) = run("namespace foo::bar::baz {");
        assert!(outcome.success);
        assert_eq!(outcome.depth, 1);
        assert_eq!(
            events,
            vec![ns("foo", 0), ns("bar", 0), ns("baz", 0), ParseEvent::ScopePush]
        );
    }

    #[test]
    fn test_plain_enum() {
        let (outcome, events) = run("enum Colors { red, green = 0x2, blue = (1 << 2) };");
        assert!(outcome.success);
        assert_eq!(outcome.consumed, 50);
        assert_eq!(
            events,
            vec![
                ParseEvent::EnumSeen {
                    name: "Colors".into(),
                    depth: 0
                },
                ParseEvent::ScopePush,
                member("Colors", "red"),
                member("Colors", "green"),
                member("Colors", "blue"),
                ParseEvent::ScopePop,
            ]
        );
    }

    #[test]
    fn test_enum_class_in_namespace() {
        let (outcome, events) =
            run("namespace foo { namespace bar { enum class Colors : std::uint8_t { red = 3, green, blue }; }}");
        assert!(outcome.success);
        assert_eq!(outcome.depth, 0);
        assert_eq!(
            events[4],
            ParseEvent::EnumClassSeen {
                name: "Colors".into(),
                depth: 2
            }
        );
        assert_eq!(events.last(), Some(&ParseEvent::ScopePop));
    }

    #[test]
    fn test_enum_word_is_not_keyword() {
        let (outcome, _) = run("enumerate { };");
        assert!(!outcome.success);
        assert_eq!(outcome.remainder, "enumerate { };");
    }

    #[test]
    fn test_anonymous_enum_fails() {
        let (outcome, events) = run("namespace a { enum { x, y }; }");
        assert!(!outcome.success);
        assert_eq!(outcome.remainder, "enum { x, y }; }");
        assert_eq!(kinds(&events), vec![EventKind::NamespaceSeen, EventKind::ScopePush]);
    }

    #[test]
    fn test_template_class_is_silent() {
        let source = r#"namespace fun { template <typename Wombat> class OZAnimals { void help() { std::cout << "HELP WOMBAT" << std::endl ; }}; enum WombatColors { red, green, blue};}"#;
        let (outcome, events) = run(source);
        assert!(outcome.success);
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::NamespaceSeen,
                EventKind::ScopePush,
                EventKind::EnumSeen,
                EventKind::ScopePush,
                EventKind::EnumMemberSeen,
                EventKind::EnumMemberSeen,
                EventKind::EnumMemberSeen,
                EventKind::ScopePop,
                EventKind::ScopePop,
            ]
        );
    }

    #[test]
    fn test_class_members_and_methods() {
        let source = r#"
class Widget : public Base, private detail::Helper<int> {
public:
    Widget() : size(0) {}
    explicit Widget(int size);
    virtual ~Widget() = default;

    static const int limit = 4;
    std::vector<std::string> names;
    int area() const { return size * size; }
    virtual void draw() = 0;
    Widget& operator=(const Widget& other);
protected:
    unsigned long long size{0};
};
"#;
        let (outcome, events) = run(source);
        assert!(outcome.success, "remainder: {}", outcome.remainder);
        assert_eq!(
            events,
            vec![
                ParseEvent::ClassSeen {
                    name: "Widget".into(),
                    depth: 0
                },
                ParseEvent::ParentSeen {
                    name: "Base".into(),
                    visibility: Visibility::Public
                },
                ParseEvent::ParentSeen {
                    name: "detail::Helper<int>".into(),
                    visibility: Visibility::Private
                },
                ParseEvent::VisibilityChange {
                    visibility: Visibility::Public
                },
                ParseEvent::MemberSeen {
                    type_name: "int".into(),
                    name: "limit".into(),
                    is_const: true,
                    is_static: true
                },
                ParseEvent::MemberSeen {
                    type_name: "std::vector<std::string>".into(),
                    name: "names".into(),
                    is_const: false,
                    is_static: false
                },
                ParseEvent::MethodSeen {
                    return_type: "int".into(),
                    name: "area".into(),
                    is_const: true,
                    is_static: false,
                    is_virtual: false
                },
                ParseEvent::MethodSeen {
                    return_type: "void".into(),
                    name: "draw".into(),
                    is_const: false,
                    is_static: false,
                    is_virtual: true
                },
                ParseEvent::MethodSeen {
                    return_type: "Widget&".into(),
                    name: "operator=".into(),
                    is_const: false,
                    is_static: false,
                    is_virtual: false
                },
                ParseEvent::VisibilityChange {
                    visibility: Visibility::Protected
                },
                ParseEvent::MemberSeen {
                    type_name: "unsigned long long".into(),
                    name: "size".into(),
                    is_const: false,
                    is_static: false
                },
                ParseEvent::ClassPop,
            ]
        );
    }

    #[test]
    fn test_class_braces_are_not_tracked() {
        let (outcome, events) = run("namespace a { struct Point { int x; void f() { if (x) { } } }; }");
        assert!(outcome.success);
        assert_eq!(outcome.depth, 0);
        let pushes = events.iter().filter(|e| **e == ParseEvent::ScopePush).count();
        let pops = events.iter().filter(|e| **e == ParseEvent::ScopePop).count();
        assert_eq!((pushes, pops), (1, 1));
        assert!(events.contains(&ParseEvent::StructSeen {
            name: "Point".into(),
            depth: 1
        }));
    }

    #[test]
    fn test_annotations_are_reported() {
        let source = "[[cereal]] struct Address { [[cereal, get]] std::string city; [[set]] int zip; };";
        let (outcome, events) = run(source);
        assert!(outcome.success);
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::AnnotationSeen,
                EventKind::StructSeen,
                EventKind::AnnotationSeen,
                EventKind::MemberSeen,
                EventKind::AnnotationSeen,
                EventKind::MemberSeen,
                EventKind::ClassPop,
            ]
        );
        assert_eq!(
            events[2],
            ParseEvent::AnnotationSeen {
                text: "cereal, get".into()
            }
        );
    }

    #[test]
    fn test_initializer_with_nested_semicolons() {
        let source = "struct Hooks { std::function<void()> cb = [] { log(\"a;b\"); return; }; int after; };";
        let (outcome, events) = run(source);
        assert!(outcome.success);
        let members: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ParseEvent::MemberSeen { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(members, vec!["cb", "after"]);
    }

    #[test]
    fn test_nested_types_and_member_templates_are_silent() {
        let source = r#"
class Outer {
    enum class Mode { fast, slow };
    struct Inner { int hidden; };
    template <typename T> T get(const std::string& key) const { return T{}; }
    using Map = std::map<int, int>;
    friend bool operator==(const Outer& a, const Outer& b) { return true; }
public:
    Mode mode;
};
"#;
        let (outcome, events) = run(source);
        assert!(outcome.success, "remainder: {}", outcome.remainder);
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::ClassSeen,
                EventKind::VisibilityChange,
                EventKind::MemberSeen,
                EventKind::ClassPop,
            ]
        );
    }

    #[test]
    fn test_digit_separators_in_initializers_and_bodies() {
        let source = "enum Big { k = 1'000'000, m };\nclass W { int x = 1'000; void f() { int y = 0xFF'FF; char c = '}'; } };";
        let (outcome, events) = run(source);
        assert!(outcome.success, "remainder: {}", outcome.remainder);
        assert!(events.contains(&member("Big", "k")));
        assert!(events.contains(&member("Big", "m")));
        assert!(events.contains(&ParseEvent::MemberSeen {
            type_name: "int".into(),
            name: "x".into(),
            is_const: false,
            is_static: false
        }));
        assert_eq!(events.last(), Some(&ParseEvent::ClassPop));
    }

    #[test]
    fn test_deeply_nested_method_body() {
        let depth = 200_000;
        let source = format!(
            "struct S {{ void f() {}{} int after; }};",
            "{".repeat(depth),
            "}".repeat(depth)
        );
        let (outcome, events) = run(&source);
        assert!(outcome.success);
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::StructSeen,
                EventKind::MethodSeen,
                EventKind::MemberSeen,
                EventKind::ClassPop,
            ]
        );
    }

    #[test]
    fn test_statements_after_skipped_bodies() {
        let source = "namespace fs = std::filesystem;\nstruct Holder { typedef struct { int a; } Pair; Pair p; };";
        let (outcome, events) = run(source);
        assert!(outcome.success, "remainder: {}", outcome.remainder);
        assert_eq!(
            kinds(&events),
            vec![
                EventKind::StructSeen,
                EventKind::MemberSeen,
                EventKind::ClassPop,
            ]
        );

        let (outcome, _) = run("struct Holder { typedef struct { int a; } Pair }; enum E { a };");
        assert!(!outcome.success);
        assert_eq!(outcome.consumed, 0);
    }

    #[test]
    fn test_multiple_declarators() {
        let (outcome, events) = run("struct P { int x, *y, z[3]; };");
        assert!(outcome.success);
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_forward_declarations() {
        let (outcome, events) = run("class Later; enum class Opaque : int; template <typename T> struct Box;");
        assert!(outcome.success);
        assert!(events.is_empty());
    }

    #[test]
    fn test_unmatched_close_brace_fails() {
        let (outcome, events) = run("enum A { x }; }");
        assert!(!outcome.success);
        assert_eq!(outcome.remainder, "}");
        assert_eq!(outcome.depth, 0);
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn test_trailing_line_comment_without_newline_fails() {
        let (outcome, _) = run("enum A { x }; // done");
        assert!(!outcome.success);
        assert_eq!(outcome.remainder, "// done");

        let (outcome, _) = run("enum A { x }; // done\n");
        assert!(outcome.success);
        assert_eq!(outcome.remainder, "");
    }

    #[test]
    fn test_failure_offset_points_inside_declaration() {
        let source = "struct S { int x; ??? };";
        let (outcome, _) = run(source);
        assert!(!outcome.success);
        assert_eq!(outcome.consumed, 0);
        assert_eq!(outcome.failed_at, Some(18));
    }

    #[test]
    fn test_filtered_subscription() {
        let mut names = Vec::new();
        {
            let mut parser = ParserDriver::new();
            parser.subscribe_to(&[EventKind::NamespaceSeen], |event: &ParseEvent| {
                if let ParseEvent::NamespaceSeen { name, .. } = event {
                    names.push(name.clone());
                }
            });
            assert!(parser.parse("namespace a { namespace b { } }").success);
        }
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_type() {
        assert_eq!(normalize_type("std::map< int ,  std::string >"), "std::map<int, std::string>");
        assert_eq!(normalize_type("unsigned   long\nlong"), "unsigned long long");
        assert_eq!(normalize_type("const char * const"), "const char* const");
        assert_eq!(normalize_type("Foo &&"), "Foo&&");
    }
}
