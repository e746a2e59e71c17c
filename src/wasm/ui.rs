use std::cell::RefCell;
use std::rc::Rc;

use log::info;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::config::VizConfig;
use crate::error::VizError;
use crate::pseudo_code;
use crate::scene::SceneLayout;
use crate::session::{PanelText, Session};

/// Pseudo-code and status text elements.
pub struct Panels {
    code: HtmlElement,
    status: HtmlElement,
}

impl Panels {
    pub fn find(document: &Document, cfg: &VizConfig) -> Result<Self, VizError> {
        Ok(Self {
            code: element(document, cfg.pseudo_code_id)?,
            status: element(document, cfg.status_id)?,
        })
    }

    fn show(&self, text: &PanelText) {
        self.code.set_inner_text(&pseudo_code::render_panel(text.op, text.line));
        self.status.set_inner_text(&text.status);
    }
}

/// Everything a click or a frame touches.
pub struct App {
    cfg: VizConfig,
    session: Session,
    panels: Panels,
    input: HtmlInputElement,
}

impl App {
    pub fn new(document: &Document, cfg: VizConfig) -> Result<Self, VizError> {
        let panels = Panels::find(document, &cfg)?;
        let input = element(document, cfg.value_input_id)?;
        let session = Session::new(&cfg);
        panels.show(&session.intro());
        Ok(Self {
            cfg,
            session,
            panels,
            input,
        })
    }

    fn add(&mut self) {
        match self.session.add(&self.input.value()) {
            Ok(_) => self.input.set_value(""),
            Err(e) => self.panels.show(&PanelText::rejected(&e)),
        }
    }

    fn remove(&mut self) {
        if let Err(e) = self.session.remove() {
            self.panels.show(&PanelText::rejected(&e.into()));
        }
    }

    fn grow(&mut self) {
        self.session.grow();
    }

    /// Show the next queued change, if any, and lay out the scene for
    /// time `now_ms`.
    pub fn frame(&mut self, now_ms: f64) -> SceneLayout {
        if let Some(text) = self.session.step(now_ms) {
            self.panels.show(&text);
        }
        self.session.layout(now_ms)
    }
}

fn element<T: JsCast>(document: &Document, id: &'static str) -> Result<T, VizError> {
    document
        .get_element_by_id(id)
        .ok_or(VizError::Dom(id))?
        .dyn_into::<T>()
        .map_err(|_| VizError::Dom(id))
}

fn on_click(
    document: &Document,
    id: &'static str,
    app: &Rc<RefCell<App>>,
    action: fn(&mut App),
) -> Result<(), JsValue> {
    let button: HtmlElement = element(document, id)?;
    let app = Rc::clone(app);
    let closure = Closure::wrap(Box::new(move || {
        // A click arriving mid-frame is dropped rather than re-entering.
        if let Ok(mut app) = app.try_borrow_mut() {
            action(&mut *app);
        }
    }) as Box<dyn FnMut()>);
    button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Hook the three buttons up to `app`.
pub fn wire_buttons(document: &Document, app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
    let cfg = app.borrow().cfg.clone();
    on_click(document, cfg.add_button_id, app, App::add)?;
    on_click(document, cfg.remove_button_id, app, App::remove)?;
    on_click(document, cfg.grow_button_id, app, App::grow)?;
    info!("buttons wired");
    Ok(())
}
