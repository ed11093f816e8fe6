//! The suite assembler.
//!
//! One [`ParseSession`] exists per document. It owns a stack of in-progress
//! builder frames (one per open element) plus the [`ScopeStack`]; each start
//! event pushes exactly one frame and each end event pops it and folds it into
//! whatever encloses it.

use miette::SourceSpan;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::attributes::Attributes;
use super::scope::{Scope, ScopeStack};
use super::tags::Tag;
use super::{ParseWarning, ParsedDocument};
use crate::config::ParseOptions;
use crate::entity::{Doctype, EntityGuard, EntityResolver};
use crate::errors::{DocumentContext, ErrorKind, ErrorReporting, SourceContext, SuiteError};
use crate::interpolate::Interpolator;
use crate::model::{
    ClassRef, FailurePolicy, GroupDependency, GroupRun, Groups, MetaGroup, MethodInclude,
    MethodSelector, PackageFilter, ParallelMode, Parameters, Script, Suite, Test,
};

// ============================================================================
// BUILDER FRAMES
// ============================================================================

/// An `<include>` whose target is only known once it closes.
#[derive(Debug)]
struct PendingInclude {
    name: Option<String>,
    invocation_numbers: Vec<i32>,
    description: Option<String>,
    parameters: Parameters,
}

#[derive(Debug)]
enum Frame {
    Suite { suite: Box<Suite>, next_test: usize },
    SuiteFiles,
    SuiteFile,
    Test { test: Box<Test>, next_class: usize },
    Classes,
    Class { class: ClassRef, next_include: usize },
    /// A `<class>` that was not kept. It still holds the class scope so its
    /// children cannot leak into the enclosing test.
    DroppedClass,
    Methods,
    Include(PendingInclude),
    Exclude,
    Packages(Vec<PackageFilter>),
    Package(PackageFilter),
    Groups,
    Define(MetaGroup),
    Run(GroupRun),
    Dependencies,
    Group,
    Listeners(Vec<String>),
    Listener,
    Parameter,
    MethodSelectors(Vec<MethodSelector>),
    MethodSelector(Option<MethodSelector>),
    SelectorClass,
    Script(Script),
    /// Unknown or misplaced element; its children are still visited.
    Ignored,
}

impl Frame {
    fn tag(&self) -> Tag {
        match self {
            Frame::Suite { .. } => Tag::Suite,
            Frame::SuiteFiles => Tag::SuiteFiles,
            Frame::SuiteFile => Tag::SuiteFile,
            Frame::Test { .. } => Tag::Test,
            Frame::Classes => Tag::Classes,
            Frame::Class { .. } | Frame::DroppedClass => Tag::Class,
            Frame::Methods => Tag::Methods,
            Frame::Include(_) => Tag::Include,
            Frame::Exclude => Tag::Exclude,
            Frame::Packages(_) => Tag::Packages,
            Frame::Package(_) => Tag::Package,
            Frame::Groups => Tag::Groups,
            Frame::Define(_) => Tag::Define,
            Frame::Run(_) => Tag::Run,
            Frame::Dependencies => Tag::Dependencies,
            Frame::Group => Tag::Group,
            Frame::Listeners(_) => Tag::Listeners,
            Frame::Listener => Tag::Listener,
            Frame::Parameter => Tag::Parameter,
            Frame::MethodSelectors(_) => Tag::MethodSelectors,
            Frame::MethodSelector(_) => Tag::MethodSelector,
            Frame::SelectorClass => Tag::SelectorClass,
            Frame::Script(_) => Tag::Script,
            Frame::Ignored => Tag::Unknown,
        }
    }

    /// The scope marker this frame holds open, if any.
    fn scope(&self) -> Option<Scope> {
        match self {
            Frame::Suite { .. } | Frame::SuiteFile => Some(Scope::Suite),
            Frame::Test { .. } => Some(Scope::Test),
            Frame::Class { .. } | Frame::DroppedClass => Some(Scope::Class),
            Frame::Include(_) => Some(Scope::Include),
            Frame::Exclude => Some(Scope::Exclude),
            _ => None,
        }
    }
}

// ============================================================================
// PARSE SESSION
// ============================================================================

pub(crate) struct ParseSession<'a> {
    ctx: DocumentContext,
    options: &'a ParseOptions,
    origin: Option<String>,
    interpolator: Interpolator<'a>,
    guard: EntityGuard<'a>,
    scopes: ScopeStack,
    frames: Vec<Frame>,
    suites: Vec<Suite>,
    warnings: Vec<ParseWarning>,
    schema_declared: bool,
    schema_warned: bool,
    span: SourceSpan,
}

impl<'a> ParseSession<'a> {
    pub(crate) fn new(
        source: SourceContext,
        origin: Option<String>,
        options: &'a ParseOptions,
        resolver: &'a dyn EntityResolver,
    ) -> Self {
        Self {
            ctx: DocumentContext::new(source),
            options,
            origin,
            interpolator: Interpolator::for_options(options),
            guard: EntityGuard::new(resolver, options.allow_insecure_dtd),
            scopes: ScopeStack::new(),
            frames: Vec::new(),
            suites: Vec::new(),
            warnings: Vec::new(),
            schema_declared: false,
            schema_warned: false,
            span: (0..0).into(),
        }
    }

    /// Drive the event source over `text` until the end of the document.
    pub(crate) fn run(mut self, text: &str) -> Result<ParsedDocument, SuiteError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);

        loop {
            let from = reader.buffer_position() as usize;
            let event = reader.read_event();
            let to = reader.buffer_position() as usize;
            self.span = (from..to.max(from)).into();

            match event.map_err(|e| self.ctx.malformed(e, self.span))? {
                Event::DocType(doctype) => {
                    self.doctype(&String::from_utf8_lossy(&doctype))?;
                }
                Event::Start(start) => self.start_element(&start)?,
                Event::Empty(start) => {
                    self.start_element(&start)?;
                    self.end_element()?;
                }
                Event::End(_) => self.end_element()?,
                Event::Text(chunk) => {
                    let chunk = chunk.unescape().map_err(|e| self.ctx.malformed(e, self.span))?;
                    self.characters(&chunk);
                }
                Event::CData(cdata) => {
                    self.characters(&String::from_utf8_lossy(&cdata));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(frame) = self.frames.last() {
            return Err(self.ctx.malformed(
                format!("document ended inside <{}>", frame.tag().as_str()),
                self.span,
            ));
        }

        Ok(ParsedDocument {
            suites: self.suites,
            warnings: self.warnings,
            schema_declared: self.schema_declared,
        })
    }

    // ------------------------------------------------------------------------
    // Event callbacks
    // ------------------------------------------------------------------------

    fn doctype(&mut self, content: &str) -> Result<(), SuiteError> {
        let Some(doctype) = Doctype::parse(content) else {
            return Ok(());
        };
        let resolution = self.guard.resolve(&doctype, &self.ctx, self.span)?;
        if resolution.declares_schema() {
            self.schema_declared = true;
        }
        Ok(())
    }

    fn start_element(&mut self, start: &BytesStart<'_>) -> Result<(), SuiteError> {
        if !self.schema_declared && !self.schema_warned {
            self.schema_warned = true;
            self.warn(ParseWarning::MissingSchemaDeclaration);
        }

        let tag = Tag::from_name(start.name().as_ref());
        let attrs = Attributes::from_start(start).map_err(|e| self.ctx.malformed(e, self.span))?;

        let frame = match tag {
            Tag::Suite => self.open_suite(&attrs)?,
            Tag::SuiteFiles => Frame::SuiteFiles,
            Tag::SuiteFile => self.open_suite_file(&attrs),
            Tag::Test => self.open_test(&attrs)?,
            Tag::Classes => Frame::Classes,
            Tag::Class => self.open_class(&attrs),
            Tag::Methods => self.open_methods(),
            Tag::Include => self.open_include(&attrs)?,
            Tag::Exclude => self.open_exclude(&attrs),
            Tag::Packages => Frame::Packages(Vec::new()),
            Tag::Package => self.open_package(&attrs),
            Tag::Groups => Frame::Groups,
            Tag::Define => Frame::Define(MetaGroup {
                name: attrs.string("name").unwrap_or_default(),
                includes: Vec::new(),
            }),
            Tag::Run => Frame::Run(GroupRun::default()),
            Tag::Dependencies => Frame::Dependencies,
            Tag::Group => self.open_group(&attrs),
            Tag::Listeners => Frame::Listeners(Vec::new()),
            Tag::Listener => self.open_listener(&attrs),
            Tag::Parameter => self.open_parameter(&attrs)?,
            Tag::MethodSelectors => Frame::MethodSelectors(Vec::new()),
            Tag::MethodSelector => Frame::MethodSelector(None),
            Tag::SelectorClass => self.open_selector_class(&attrs)?,
            Tag::Script => Frame::Script(Script {
                language: attrs.string("language"),
                expression: String::new(),
            }),
            Tag::Unknown => {
                tracing::debug!(
                    tag = %String::from_utf8_lossy(start.name().as_ref()),
                    "ignoring unrecognized element"
                );
                Frame::Ignored
            }
        };

        if let Some(scope) = frame.scope() {
            self.scopes.push(scope);
        }
        self.frames.push(frame);
        Ok(())
    }

    fn end_element(&mut self) -> Result<(), SuiteError> {
        let Some(frame) = self.frames.pop() else {
            return Err(self.ctx.malformed("unbalanced end tag", self.span));
        };
        if frame.scope().is_some() {
            self.scopes.pop();
        }

        match frame {
            Frame::Suite { suite, .. } => self.suites.push(*suite),
            Frame::Test { test, .. } => self.close_test(*test),
            Frame::Class { class, .. } => self.close_class(class),
            Frame::Include(pending) => self.close_include(pending),
            Frame::Packages(packages) => self.close_packages(packages)?,
            Frame::Package(package) => self.close_package(package),
            Frame::Define(define) => self.close_define(define),
            Frame::Run(run) => self.close_run(run),
            Frame::Listeners(listeners) => self.close_listeners(listeners),
            Frame::MethodSelectors(selectors) => self.close_method_selectors(selectors),
            Frame::MethodSelector(selector) => self.close_method_selector(selector),
            Frame::Script(script) => self.close_script(script),
            _ => {}
        }
        Ok(())
    }

    fn characters(&mut self, text: &str) {
        if let Some(Frame::Script(script)) = self.frames.last_mut() {
            if !text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r')) {
                script.expression.push_str(text);
            }
        }
    }

    // ------------------------------------------------------------------------
    // <suite>, <suite-file>, <test>
    // ------------------------------------------------------------------------

    fn open_suite(&mut self, attrs: &Attributes) -> Result<Frame, SuiteError> {
        let Some(name) = attrs.non_blank("name") else {
            return Err(self.ctx.missing_attribute("suite", "name", self.span));
        };
        let mut suite = Suite::new(name);
        suite.file_name = self.options.file_name.clone().or_else(|| self.origin.clone());

        if let Some(v) = self.typed(attrs.number("verbose"))? {
            suite.verbose = v;
        }
        if let Some(v) = self.typed(attrs.flag("junit"))? {
            suite.junit = v;
        }
        let owner = format!("suite '{}'", suite.name);
        if let Some(mode) = self.enum_attr(attrs, "parallel", &owner, ParallelMode::from_attr) {
            suite.parallel = mode;
        }
        suite.parent_module = attrs.string("parent-module");
        suite.guice_stage = attrs.string("guice-stage");
        if let Some(policy) =
            self.enum_attr(attrs, "configfailurepolicy", &owner, FailurePolicy::from_attr)
        {
            suite.config_failure_policy = policy;
        }
        if let Some(v) = self.typed(attrs.flag("group-by-instances"))? {
            suite.group_by_instances = v;
        }
        if let Some(v) = self.typed(attrs.flag("skipfailedinvocationcounts"))? {
            suite.skip_failed_invocation_counts = v;
        }
        if let Some(v) = self.typed(attrs.number("thread-count"))? {
            suite.thread_count = v;
        }
        if let Some(v) = self.typed(attrs.number("data-provider-thread-count"))? {
            suite.data_provider_thread_count = v;
        }
        suite.time_out = self.typed(attrs.number("time-out"))?;
        suite.object_factory = attrs.string("object-factory");
        if let Some(v) = self.typed(attrs.flag("preserve-order"))? {
            suite.preserve_order = v;
        }
        if let Some(v) = self.typed(attrs.flag("allow-return-values"))? {
            suite.allow_return_values = v;
        }

        Ok(Frame::Suite {
            suite: Box::new(suite),
            next_test: 0,
        })
    }

    fn open_suite_file(&mut self, attrs: &Attributes) -> Frame {
        match (attrs.non_blank("path"), self.suite_mut().is_some()) {
            (Some(path), true) => {
                let path = path.to_string();
                if let Some(suite) = self.suite_mut() {
                    suite.suite_files.push(path);
                }
            }
            (None, _) => self.warn(ParseWarning::MissingAttribute {
                tag: "suite-file".into(),
                attribute: "path".into(),
            }),
            (Some(_), false) => self.dropped(Tag::SuiteFile, "no enclosing <suite>"),
        }
        Frame::SuiteFile
    }

    fn open_test(&mut self, attrs: &Attributes) -> Result<Frame, SuiteError> {
        let Some(index) = self.next_test_index() else {
            self.dropped(Tag::Test, "no enclosing <suite>");
            return Ok(Frame::Ignored);
        };
        let Some(name) = attrs.non_blank("name") else {
            return Err(self.ctx.missing_attribute("test", "name", self.span));
        };
        let mut test = Test::new(name, index);

        test.verbose = self.typed(attrs.number("verbose"))?;
        test.junit = self.typed(attrs.flag("junit"))?;
        test.skip_failed_invocation_counts = self.typed(attrs.flag("skipfailedinvocationcounts"))?;
        test.group_by_instances = self.typed(attrs.flag("group-by-instances"))?;
        test.preserve_order = self.typed(attrs.flag("preserve-order"))?;
        let owner = format!("test '{}'", test.name);
        test.parallel = self.enum_attr(attrs, "parallel", &owner, ParallelMode::from_attr);
        test.thread_count = self.typed(attrs.number("thread-count"))?;
        test.time_out = self.typed(attrs.number("time-out"))?;
        test.enabled = self.typed(attrs.flag("enabled"))?.unwrap_or(true);

        Ok(Frame::Test {
            test: Box::new(test),
            next_class: 0,
        })
    }

    fn close_test(&mut self, test: Test) {
        if !test.enabled {
            tracing::debug!(test = %test.name, index = test.index, "discarding disabled test");
            return;
        }
        if let Some(suite) = self.suite_mut() {
            suite.tests.push(test);
        }
    }

    // ------------------------------------------------------------------------
    // <classes>, <class>, <methods>, <include>, <exclude>
    // ------------------------------------------------------------------------

    fn open_class(&mut self, attrs: &Attributes) -> Frame {
        // Tolerate a misplaced <class>; the document structure is the event
        // source's to police.
        if self.parent_tag() != Some(Tag::Classes) {
            self.dropped(Tag::Class, "not inside <classes>");
            return Frame::DroppedClass;
        }
        let Some(name) = attrs.non_blank("name") else {
            self.warn(ParseWarning::MissingAttribute {
                tag: "class".into(),
                attribute: "name".into(),
            });
            return Frame::DroppedClass;
        };
        let Some(index) = self.next_class_index() else {
            self.dropped(Tag::Class, "no enclosing <test>");
            return Frame::DroppedClass;
        };
        Frame::Class {
            class: ClassRef::new(name, index),
            next_include: 0,
        }
    }

    fn close_class(&mut self, class: ClassRef) {
        if let Some(test) = self.test_mut() {
            test.classes.push(class);
        }
    }

    fn open_methods(&mut self) -> Frame {
        if self.parent_tag() != Some(Tag::Class) {
            self.dropped(Tag::Methods, "not inside <class>");
            return Frame::Ignored;
        }
        Frame::Methods
    }

    fn open_include(&mut self, attrs: &Attributes) -> Result<Frame, SuiteError> {
        Ok(Frame::Include(PendingInclude {
            name: attrs.non_blank("name").map(String::from),
            invocation_numbers: self.typed(attrs.number_list("invocation-numbers"))?,
            description: attrs.string("description"),
            parameters: Parameters::new(),
        }))
    }

    /// The enclosing frame decides what an `<include>` means.
    fn close_include(&mut self, pending: PendingInclude) {
        // A method include takes its index even when it is skipped below.
        let index = match self.frames.last() {
            Some(Frame::Methods) => self.next_include_index(),
            _ => None,
        };
        let Some(name) = pending.name else {
            self.warn(ParseWarning::MissingAttribute {
                tag: "include".into(),
                attribute: "name".into(),
            });
            return;
        };
        match self.frames.last_mut() {
            Some(Frame::Methods) => {
                if let (Some(index), Some(Frame::Class { class, .. })) =
                    (index, self.nearest(Tag::Class))
                {
                    class.included_methods.push(MethodInclude {
                        index,
                        name,
                        invocation_numbers: pending.invocation_numbers,
                        parameters: pending.parameters,
                        description: pending.description,
                    });
                }
            }
            Some(Frame::Define(define)) => define.includes.push(name),
            Some(Frame::Run(run)) => run.include.push(name),
            Some(Frame::Package(package)) => package.include.push(name),
            _ => self.dropped(Tag::Include, "no method, group or package list is open"),
        }
    }

    fn open_exclude(&mut self, attrs: &Attributes) -> Frame {
        let Some(name) = attrs.non_blank("name").map(String::from) else {
            self.warn(ParseWarning::MissingAttribute {
                tag: "exclude".into(),
                attribute: "name".into(),
            });
            return Frame::Exclude;
        };
        match self.frames.last_mut() {
            Some(Frame::Methods) => {
                if let Some(Frame::Class { class, .. }) = self.nearest(Tag::Class) {
                    class.excluded_methods.insert(name);
                }
            }
            Some(Frame::Run(run)) => run.exclude.push(name),
            Some(Frame::Package(package)) => package.exclude.push(name),
            _ => self.dropped(Tag::Exclude, "no method, group or package list is open"),
        }
        Frame::Exclude
    }

    // ------------------------------------------------------------------------
    // <packages>, <package>
    // ------------------------------------------------------------------------

    fn open_package(&mut self, attrs: &Attributes) -> Frame {
        if self.parent_tag() != Some(Tag::Packages) {
            self.dropped(Tag::Package, "not inside <packages>");
            return Frame::Ignored;
        }
        Frame::Package(PackageFilter::new(attrs.get("name").unwrap_or_default()))
    }

    fn close_package(&mut self, package: PackageFilter) {
        if let Some(Frame::Packages(packages)) = self.frames.last_mut() {
            packages.push(package);
        }
    }

    fn close_packages(&mut self, packages: Vec<PackageFilter>) -> Result<(), SuiteError> {
        match self.scopes.current() {
            Some(Scope::Test) => {
                if let Some(test) = self.test_mut() {
                    test.packages.extend(packages);
                }
            }
            Some(Scope::Suite) => {
                if let Some(suite) = self.suite_mut() {
                    suite.packages.extend(packages);
                }
            }
            other => return Err(self.scope_error(Tag::Packages, other)),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // <groups>, <define>, <run>, <group>
    // ------------------------------------------------------------------------

    fn open_group(&mut self, attrs: &Attributes) -> Frame {
        let Some(name) = attrs.non_blank("name") else {
            self.warn(ParseWarning::MissingAttribute {
                tag: "group".into(),
                attribute: "name".into(),
            });
            return Frame::Group;
        };
        let dependency = GroupDependency::parse(name, attrs.get("depends-on").unwrap_or_default());
        match self.scoped_groups() {
            Some(groups) => groups.dependencies.push(dependency),
            None => self.dropped(Tag::Group, "not inside a <suite> or <test>"),
        }
        Frame::Group
    }

    fn close_define(&mut self, define: MetaGroup) {
        match self.scoped_groups() {
            Some(groups) => groups.defines.push(define),
            None => self.dropped(Tag::Define, "not inside a <suite> or <test>"),
        }
    }

    fn close_run(&mut self, run: GroupRun) {
        match self.scoped_groups() {
            Some(groups) => groups.merge(Groups {
                run,
                ..Groups::default()
            }),
            None => self.dropped(Tag::Run, "not inside a <suite> or <test>"),
        }
    }

    // ------------------------------------------------------------------------
    // <listeners>, <listener>
    // ------------------------------------------------------------------------

    fn open_listener(&mut self, attrs: &Attributes) -> Frame {
        let Some(class_name) = attrs.non_blank("class-name").map(String::from) else {
            self.warn(ParseWarning::MissingAttribute {
                tag: "listener".into(),
                attribute: "class-name".into(),
            });
            return Frame::Listener;
        };
        match self.frames.last_mut() {
            Some(Frame::Listeners(listeners)) => listeners.push(class_name),
            _ => self.dropped(Tag::Listener, "not inside <listeners>"),
        }
        Frame::Listener
    }

    fn close_listeners(&mut self, listeners: Vec<String>) {
        if let Some(suite) = self.suite_mut() {
            suite.listeners.extend(listeners);
        }
    }

    // ------------------------------------------------------------------------
    // <parameter>
    // ------------------------------------------------------------------------

    fn open_parameter(&mut self, attrs: &Attributes) -> Result<Frame, SuiteError> {
        let (Some(name), Some(value)) = (attrs.get("name"), attrs.get("value")) else {
            let missing = if attrs.get("name").is_none() { "name" } else { "value" };
            self.warn(ParseWarning::MissingAttribute {
                tag: "parameter".into(),
                attribute: missing.into(),
            });
            return Ok(Frame::Parameter);
        };
        let name = self.interpolator.expand(name);
        let value = self.interpolator.expand(value);

        let target = match self.scopes.current() {
            Some(Scope::Suite) => self.suite_mut().map(|s| &mut s.parameters),
            Some(Scope::Test) => self.test_mut().map(|t| &mut t.parameters),
            Some(Scope::Class) => match self.nearest(Tag::Class) {
                Some(Frame::Class { class, .. }) => Some(&mut class.parameters),
                _ => None,
            },
            Some(Scope::Include) => match self.nearest(Tag::Include) {
                Some(Frame::Include(pending)) => Some(&mut pending.parameters),
                _ => None,
            },
            other => return Err(self.scope_error(Tag::Parameter, other)),
        };
        match target {
            Some(parameters) => {
                parameters.insert(name, value);
            }
            None => self.dropped(Tag::Parameter, "its enclosing element was dropped"),
        }
        Ok(Frame::Parameter)
    }

    // ------------------------------------------------------------------------
    // <method-selectors>, <method-selector>, <selector-class>, <script>
    // ------------------------------------------------------------------------

    fn open_selector_class(&mut self, attrs: &Attributes) -> Result<Frame, SuiteError> {
        let priority = self.typed(attrs.number::<i32>("priority"))?.unwrap_or(0);
        let Some(name) = attrs.non_blank("name").map(String::from) else {
            self.warn(ParseWarning::MissingAttribute {
                tag: "selector-class".into(),
                attribute: "name".into(),
            });
            return Ok(Frame::SelectorClass);
        };
        match self.frames.last_mut() {
            Some(Frame::MethodSelector(slot)) => {
                *slot = Some(MethodSelector::Class { name, priority });
            }
            _ => self.dropped(Tag::SelectorClass, "not inside <method-selector>"),
        }
        Ok(Frame::SelectorClass)
    }

    fn close_script(&mut self, script: Script) {
        let in_test = self.scopes.current() == Some(Scope::Test);
        let mut attached = false;

        if let Some(Frame::MethodSelector(slot)) = self.frames.last_mut() {
            *slot = Some(MethodSelector::Script(script.clone()));
            attached = true;
        }
        if in_test {
            if let Some(test) = self.test_mut() {
                test.script = Some(script);
                attached = true;
            }
        }
        if !attached {
            self.dropped(Tag::Script, "not inside <method-selector> or <test>");
        }
    }

    fn close_method_selector(&mut self, selector: Option<MethodSelector>) {
        let Some(selector) = selector else {
            self.dropped(Tag::MethodSelector, "neither <selector-class> nor <script> given");
            return;
        };
        match self.frames.last_mut() {
            Some(Frame::MethodSelectors(selectors)) => selectors.push(selector),
            _ => self.dropped(Tag::MethodSelector, "not inside <method-selectors>"),
        }
    }

    fn close_method_selectors(&mut self, selectors: Vec<MethodSelector>) {
        if self.scopes.current() == Some(Scope::Test) {
            if let Some(test) = self.test_mut() {
                test.method_selectors.extend(selectors);
            }
        } else if let Some(suite) = self.suite_mut() {
            suite.method_selectors.extend(selectors);
        }
    }

    // ------------------------------------------------------------------------
    // Frame lookup
    // ------------------------------------------------------------------------

    fn parent_tag(&self) -> Option<Tag> {
        self.frames.last().map(Frame::tag)
    }

    fn nearest(&mut self, tag: Tag) -> Option<&mut Frame> {
        self.frames.iter_mut().rev().find(|f| f.tag() == tag)
    }

    fn suite_mut(&mut self) -> Option<&mut Suite> {
        match self.nearest(Tag::Suite) {
            Some(Frame::Suite { suite, .. }) => Some(&mut **suite),
            _ => None,
        }
    }

    fn test_mut(&mut self) -> Option<&mut Test> {
        match self.nearest(Tag::Test) {
            Some(Frame::Test { test, .. }) => Some(&mut **test),
            _ => None,
        }
    }

    fn next_test_index(&mut self) -> Option<usize> {
        match self.nearest(Tag::Suite) {
            Some(Frame::Suite { next_test, .. }) => {
                let index = *next_test;
                *next_test += 1;
                Some(index)
            }
            _ => None,
        }
    }

    fn next_class_index(&mut self) -> Option<usize> {
        match self.nearest(Tag::Test) {
            Some(Frame::Test { next_class, .. }) => {
                let index = *next_class;
                *next_class += 1;
                Some(index)
            }
            _ => None,
        }
    }

    fn next_include_index(&mut self) -> Option<usize> {
        match self.nearest(Tag::Class) {
            Some(Frame::Class { next_include, .. }) => {
                let index = *next_include;
                *next_include += 1;
                Some(index)
            }
            _ => None,
        }
    }

    /// Groups of the innermost suite or test scope.
    fn scoped_groups(&mut self) -> Option<&mut Groups> {
        match self.scopes.current() {
            Some(Scope::Test) => self.test_mut().map(|t| &mut t.groups),
            Some(Scope::Suite) => self.suite_mut().map(|s| &mut s.groups),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------------

    fn typed<T>(&self, value: Result<T, ErrorKind>) -> Result<T, SuiteError> {
        value.map_err(|kind| self.ctx.report(kind, self.span))
    }

    /// Unknown enumeration values keep the previous value and only warn.
    fn enum_attr<T>(
        &mut self,
        attrs: &Attributes,
        attribute: &str,
        owner: &str,
        parse: fn(&str) -> Option<T>,
    ) -> Option<T> {
        let raw = attrs.get(attribute)?;
        let parsed = parse(raw);
        if parsed.is_none() {
            self.warn(ParseWarning::UnknownValue {
                attribute: attribute.into(),
                value: raw.into(),
                owner: owner.into(),
            });
        }
        parsed
    }

    fn scope_error(&self, tag: Tag, scope: Option<Scope>) -> SuiteError {
        let scope = scope.map_or_else(|| "the document root".to_string(), |s| s.to_string());
        self.ctx.unexpected_scope(tag.as_str(), &scope, self.span)
    }

    fn dropped(&mut self, tag: Tag, reason: &str) {
        self.warn(ParseWarning::Dropped {
            tag: tag.as_str().into(),
            reason: reason.into(),
        });
    }

    fn warn(&mut self, warning: ParseWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }
}
