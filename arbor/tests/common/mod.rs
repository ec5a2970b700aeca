#![allow(dead_code)]

use arbor::testing::{Journal, MemoryTemplateSource, RecordingEngine, RecordingPresenter};
use arbor::{
    BoxError, Capabilities, Component, ComponentTree, ComponentType, DynComponent, Handlers,
    Multiplier, Params, PersistentState, PropertyDescriptor, TemplateVars, Value,
};
use arbor_macros::Persistent;
use lazy_static::lazy_static;
use std::sync::Arc;

pub const TEST_TEMPLATES: &str = "/app/TestControl/templates";
pub const DERIVED_TEMPLATES: &str = "/app/DerivedControl/templates";

// ============================================================================
// Test Components
// ============================================================================

lazy_static! {
    pub static ref TEST_CONTROL_TYPE: ComponentType = ComponentType::builder("TestControl")
        .properties(TestControl::properties())
        .template_dir(TEST_TEMPLATES)
        .build();
    static ref TEST_CONTROL_HANDLERS: Handlers<TestControl> = Handlers::builder()
        .view("default", TestControl::view_default)
        .view("foo", TestControl::view_foo)
        .view("link", TestControl::view_link)
        .view("broken", TestControl::view_broken)
        .before_render("", TestControl::before_render)
        .before_render("bar", TestControl::before_render_bar)
        .signal("testSignal", TestControl::handle_test_signal)
        .build()
        .expect("valid handler table");
    pub static ref DERIVED_CONTROL_TYPE: ComponentType =
        ComponentType::builder("DerivedControl")
            .extends(&TEST_CONTROL_TYPE)
            .properties(DerivedControl::properties())
            .template_dir(DERIVED_TEMPLATES)
            .build();
    static ref DERIVED_CONTROL_HANDLERS: Handlers<DerivedControl> = Handlers::builder()
        .view("default", DerivedControl::view_default)
        .view("edit", DerivedControl::view_default)
        .view("missing", DerivedControl::view_default)
        .before_render("", DerivedControl::before_render)
        .build()
        .expect("valid handler table");
    pub static ref PLAIN_CONTROL_TYPE: ComponentType = ComponentType::builder("PlainControl")
        // Declared on the type, but the struct keeps no field for it.
        .property(PropertyDescriptor::persistent("page"))
        .capabilities(Capabilities::RENDERABLE)
        .build();
    static ref PLAIN_CONTROL_HANDLERS: Handlers<PlainControl> = Handlers::builder()
        .view("default", PlainControl::view_default)
        .before_render("", PlainControl::before_render)
        .build()
        .expect("valid handler table");
}

/// The workhorse control: records everything that happens to it.
#[derive(Persistent, Default)]
pub struct TestControl {
    #[persistent(rename = "testPersistentParam")]
    pub test_persistent_param: Option<String>,
    #[persistent]
    secret: Option<String>,
    pub signal_received: bool,
    pub signal_params: Params,
    pub view_params: Params,
    pub render_params: Params,
    pub destinations: Vec<(String, Option<String>)>,
    pub journal: Journal,
}

impl TestControl {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    fn view_default(&mut self, params: &Params) -> Result<(), BoxError> {
        self.journal.push("viewDefault");
        self.view_params = params.clone();
        Ok(())
    }

    fn view_foo(&mut self, _params: &Params) -> Result<(), BoxError> {
        self.journal.push("viewFoo");
        Ok(())
    }

    fn view_link(&mut self, _params: &Params) -> Result<(), BoxError> {
        self.journal.push("viewLink");
        Ok(())
    }

    fn view_broken(&mut self, _params: &Params) -> Result<(), BoxError> {
        Err("database unavailable".into())
    }

    fn before_render(&mut self, params: &Params) -> Result<(), BoxError> {
        self.journal.push("beforeRender");
        self.render_params = params.clone();
        Ok(())
    }

    fn before_render_bar(&mut self, _params: &Params) -> Result<(), BoxError> {
        self.journal.push("beforeRenderBar");
        Ok(())
    }

    fn handle_test_signal(&mut self, params: &Params) -> Result<(), BoxError> {
        self.journal.push("handleTestSignal");
        self.signal_received = true;
        self.signal_params = params.clone();
        Ok(())
    }
}

impl Component for TestControl {
    fn component_type() -> &'static ComponentType {
        &TEST_CONTROL_TYPE
    }

    fn handlers() -> &'static Handlers<Self> {
        &TEST_CONTROL_HANDLERS
    }

    fn create_child(&mut self, name: &str) -> Option<Box<dyn DynComponent>> {
        let journal = self.journal.clone();
        match name {
            "a" | "b" | "child" | "testControl" => {
                Some(Box::new(TestControl::with_journal(journal)))
            }
            "derived" => Some(Box::new(DerivedControl {
                base: TestControl::with_journal(journal),
                extra: 0,
            })),
            "multiplied" => Some(Box::new(Multiplier::new(move |_| {
                Box::new(TestControl::with_journal(journal.clone()))
            }))),
            "plain" => Some(Box::new(PlainControl::default())),
            _ => None,
        }
    }

    fn process_destination(&mut self, url: &str, anchor: Option<&str>) {
        self.destinations
            .push((url.to_owned(), anchor.map(str::to_owned)));
    }

    fn template_vars(&self, vars: &mut TemplateVars) {
        vars.insert("title".into(), Value::from("Test"));
    }
}

/// A subtype of [`TestControl`] that only ships some of its templates.
#[derive(Persistent)]
pub struct DerivedControl {
    #[inherit]
    pub base: TestControl,
    #[persistent]
    pub extra: i64,
}

impl DerivedControl {
    fn view_default(&mut self, params: &Params) -> Result<(), BoxError> {
        self.base.view_default(params)
    }

    fn before_render(&mut self, params: &Params) -> Result<(), BoxError> {
        self.base.before_render(params)
    }
}

impl Component for DerivedControl {
    fn component_type() -> &'static ComponentType {
        &DERIVED_CONTROL_TYPE
    }

    fn handlers() -> &'static Handlers<Self> {
        &DERIVED_CONTROL_HANDLERS
    }
}

/// Renderable, but does not take part in AJAX propagation. Its type
/// declares a persistent `page` the struct does not store.
#[derive(Persistent, Default)]
pub struct PlainControl {
    pub hits: u32,
}

impl PlainControl {
    fn view_default(&mut self, _params: &Params) -> Result<(), BoxError> {
        self.hits += 1;
        Ok(())
    }

    fn before_render(&mut self, _params: &Params) -> Result<(), BoxError> {
        Ok(())
    }
}

impl Component for PlainControl {
    fn component_type() -> &'static ComponentType {
        &PLAIN_CONTROL_TYPE
    }

    fn handlers() -> &'static Handlers<Self> {
        &PLAIN_CONTROL_HANDLERS
    }
}

// ============================================================================
// Fixture
// ============================================================================

/// A tree rooted at a [`TestControl`], wired to recording doubles.
pub struct Fixture {
    pub tree: ComponentTree,
    pub presenter: RecordingPresenter,
    pub journal: Journal,
    pub templates: MemoryTemplateSource,
    pub engine: RecordingEngine,
}

pub fn fixture(ajax: bool) -> Fixture {
    let journal = Journal::new();
    let presenter = if ajax {
        RecordingPresenter::ajax()
    } else {
        RecordingPresenter::new()
    };
    let templates = MemoryTemplateSource::new()
        .with(format!("{TEST_TEMPLATES}/Default.html"), "<div{ajax}>{$title}</div>")
        .with(format!("{TEST_TEMPLATES}/Foo.Bar.html"), "foo bar")
        .with(format!("{TEST_TEMPLATES}/Broken.html"), "broken")
        .with(format!("{DERIVED_TEMPLATES}/Edit.html"), "edit")
        .with_journal(journal.clone());
    let engine = RecordingEngine::new().with_journal(journal.clone());

    let tree = ComponentTree::builder(TestControl::with_journal(journal.clone()), presenter.clone())
        .template_source(Arc::new(templates.clone()))
        .engine(engine.clone())
        .build();

    Fixture {
        tree,
        presenter,
        journal,
        templates,
        engine,
    }
}

pub fn params<const N: usize>(pairs: [(&str, Value); N]) -> Params {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}
