//! DOM binding for the page: builds the elements, wires the listeners, and
//! mirrors [`Controller`] state into inline styles after every event.
//!
//! Listener closures are kept (not `forget()`-ed) so [`unmount`] can remove
//! exactly what [`mount`] added.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, HtmlImageElement, MouseEvent, window};

use crate::config::PageConfig;
use crate::controller::Controller;
use crate::cursor;
use crate::error::PageError;
use crate::particles::{self, BURST_LIFETIME_MS};
use crate::shake;
use crate::speech::WebSpeech;
use crate::timers::{Deferred, Scheduler, WindowScheduler};

const OVERLAY_KEYFRAMES_CSS: &str = r#"
@keyframes sunglasses-appear {
  0% { opacity: 0; transform: scale(0.5) rotate(-10deg); }
  100% { opacity: 1; transform: scale(1) rotate(0deg); }
}
"#;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(MouseEvent) + 'static,
    ) -> Result<Self, PageError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(MouseEvent)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            closure,
        })
    }

    fn detach(&self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref())
        {
            tracing::warn!(?err, kind = self.kind, "failed to remove listener");
        }
    }
}

struct Elements {
    style: Element,
    root: HtmlElement,
    cursor: HtmlElement,
    particles: HtmlElement,
    shake: HtmlElement,
    overlay: HtmlElement,
}

struct MountedPage {
    controller: Controller,
    els: Elements,
    listeners: Vec<Listener>,
    // What the DOM currently shows, to avoid rebuilding unchanged parts.
    rendered_batch: Option<u64>,
    rendered_shake: Option<u64>,
}

thread_local! {
    static PAGE: RefCell<Option<MountedPage>> = const { RefCell::new(None) };
}

fn with_page<R>(f: impl FnOnce(&mut MountedPage) -> R) -> Option<R> {
    PAGE.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => slot.as_mut().map(f),
        Err(_) => {
            tracing::warn!("page state busy; event dropped");
            None
        }
    })
}

/// Re-render after `f` mutated the page.
fn update(f: impl FnOnce(&mut MountedPage)) {
    with_page(|page| {
        f(page);
        if let Err(err) = page.render() {
            tracing::warn!(%err, "render failed");
        }
    });
}

pub(crate) fn run_deferred(task: Deferred) {
    update(|page| page.controller.run_deferred(task));
}

pub(crate) fn trigger_explosion(x: f64, y: f64) {
    update(|page| {
        let generation = page.controller.trigger_explosion(x, y);
        WindowScheduler.schedule(BURST_LIFETIME_MS, page.controller.particle_clear(generation));
    });
}

pub(crate) fn trigger_click() {
    update(|page| page.controller.trigger_click());
}

fn html_el(doc: &Document, tag: &str, style: &str) -> Result<HtmlElement, PageError> {
    let el = doc
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PageError::Dom(format!("<{tag}> is not an HtmlElement")))?;
    el.set_attribute("style", style)?;
    Ok(el)
}

fn stylesheet() -> String {
    let mut css = String::from(particles::KEYFRAMES_CSS);
    css.push_str(&shake::keyframes_css());
    css.push_str(OVERLAY_KEYFRAMES_CSS);
    css
}

/// Build the element tree under a detached root; nothing touches the document.
fn build_elements(doc: &Document, config: &PageConfig) -> Result<Elements, PageError> {
    let style = doc.create_element("style")?;
    style.set_text_content(Some(&stylesheet()));

    let root = html_el(
        doc,
        "div",
        "position:fixed; inset:0; background:#111827; display:flex; align-items:center; \
         justify-content:center; overflow:hidden; cursor:none;",
    )?;
    root.set_id("cs-root");

    let cursor_el = html_el(doc, "div", &cursor::base_style())?;
    cursor_el.set_id("cs-cursor");
    cursor_el.set_text_content(Some(&config.cursor_glyph));

    let particles_el = html_el(
        doc,
        "div",
        "position:fixed; inset:0; pointer-events:none; z-index:2;",
    )?;
    let shake_el = html_el(doc, "div", "animation:none;")?;
    shake_el.set_id("cs-shake");

    let main = html_el(
        doc,
        "main",
        "position:relative; z-index:10; display:flex; flex-direction:column; align-items:center; \
         padding:2rem; user-select:none;",
    )?;
    let frame = html_el(doc, "div", "position:relative;")?;

    let img = doc
        .create_element("img")?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| PageError::Dom("<img> is not an HtmlImageElement".into()))?;
    img.set_src(&config.portrait_src);
    img.set_alt(&config.portrait_alt);
    img.set_attribute(
        "style",
        "width:320px; height:auto; border-radius:8px; border:4px solid #d1d5db; \
         box-shadow:0 25px 50px -12px rgba(0,0,0,0.5); filter:sepia(0.3) contrast(1.1);",
    )?;

    let overlay_el = html_el(
        doc,
        "div",
        "position:absolute; left:0; right:0; bottom:0; top:15%; display:none; \
         align-items:flex-start; justify-content:center; pointer-events:none; font-size:4rem; \
         text-shadow:2px 2px 4px rgba(0,0,0,0.8); animation:sunglasses-appear 0.3s ease-out;",
    )?;
    overlay_el.set_id("cs-overlay");
    overlay_el.set_text_content(Some(&config.overlay_glyph));

    let heading = html_el(
        doc,
        "h1",
        "margin-top:1.5rem; font-size:2.25rem; font-weight:bold; letter-spacing:0.05em; \
         color:#d1d5db; text-align:center; text-shadow:2px 2px 4px rgba(0,0,0,0.8);",
    )?;
    heading.set_text_content(Some(&config.heading));

    frame.append_child(&img)?;
    frame.append_child(&overlay_el)?;
    main.append_child(&frame)?;
    main.append_child(&heading)?;
    shake_el.append_child(&main)?;
    root.append_child(&cursor_el)?;
    root.append_child(&particles_el)?;
    root.append_child(&shake_el)?;

    Ok(Elements {
        style,
        root,
        cursor: cursor_el,
        particles: particles_el,
        shake: shake_el,
        overlay: overlay_el,
    })
}

pub fn mount(config: PageConfig) -> Result<(), PageError> {
    config.validate()?;
    if PAGE.with(|cell| cell.borrow().is_some()) {
        unmount();
    }

    let win = window().ok_or(PageError::NoWindow)?;
    let doc = win.document().ok_or(PageError::NoDocument)?;
    let body = doc.body().ok_or(PageError::NoBody)?;

    let els = build_elements(&doc, &config)?;
    let mut page = MountedPage {
        controller: Controller::new(config),
        els,
        listeners: Vec::new(),
        rendered_batch: None,
        rendered_shake: None,
    };
    if let Err(err) = page.attach(&win, &body) {
        page.teardown();
        return Err(err);
    }

    WebSpeech::prime_voices();
    PAGE.with(|cell| cell.replace(Some(page)));
    tracing::info!("page mounted");
    Ok(())
}

/// Remove listeners and nodes added by [`mount`]. Timers armed by this page
/// still fire but are ignored by any later page.
pub fn unmount() {
    let Some(page) = PAGE.with(|cell| cell.borrow_mut().take()) else {
        return;
    };
    page.teardown();
    tracing::info!("page unmounted");
}

impl MountedPage {
    /// Insert the nodes, register listeners and draw the first frame. On
    /// error whatever was attached so far stays recorded for `teardown`.
    fn attach(&mut self, win: &web_sys::Window, body: &HtmlElement) -> Result<(), PageError> {
        body.append_child(&self.els.style)?;
        body.append_child(&self.els.root)?;

        let win_target: &EventTarget = win.as_ref();
        let body_target: &EventTarget = body.as_ref();
        let root_target: &EventTarget = self.els.root.as_ref();

        self.listeners
            .push(Listener::attach(win_target, "mousemove", |evt: MouseEvent| {
                update(|p| {
                    p.controller
                        .cursor_mut()
                        .on_move(evt.client_x() as f64, evt.client_y() as f64)
                })
            })?);
        self.listeners
            .push(Listener::attach(body_target, "mouseenter", |_| {
                update(|p| p.controller.cursor_mut().on_enter())
            })?);
        self.listeners
            .push(Listener::attach(body_target, "mouseleave", |_| {
                update(|p| p.controller.cursor_mut().on_leave())
            })?);
        self.listeners
            .push(Listener::attach(win_target, "mousedown", |_| {
                update(|p| p.controller.cursor_mut().on_press())
            })?);
        self.listeners
            .push(Listener::attach(win_target, "mouseup", |_| {
                update(|p| p.controller.cursor_mut().on_release())
            })?);
        self.listeners
            .push(Listener::attach(root_target, "click", |evt: MouseEvent| {
                update(|p| {
                    p.controller.handle_click(
                        evt.client_x() as f64,
                        evt.client_y() as f64,
                        &mut WindowScheduler,
                        &mut WebSpeech,
                    )
                })
            })?);

        self.render()
    }

    /// Undo `attach`. Safe on a partially attached page: removing a node that
    /// was never inserted is a no-op.
    fn teardown(&self) {
        for listener in &self.listeners {
            listener.detach();
        }
        self.els.root.remove();
        self.els.style.remove();
    }

    fn render(&mut self) -> Result<(), PageError> {
        self.render_cursor()?;
        self.render_shake()?;
        self.render_overlay()?;
        self.render_particles()
    }

    fn render_cursor(&self) -> Result<(), PageError> {
        let c = self.controller.cursor();
        let style = self.els.cursor.style();
        style.set_property("left", &format!("{}px", c.x))?;
        style.set_property("top", &format!("{}px", c.y))?;
        style.set_property("transform", &c.transform_css())?;
        style.set_property("display", c.display_css())?;
        Ok(())
    }

    fn render_shake(&mut self) -> Result<(), PageError> {
        let want = self
            .controller
            .is_shaking()
            .then(|| self.controller.shake_generation());
        if want == self.rendered_shake {
            return Ok(());
        }
        let style = self.els.shake.style();
        style.set_property("animation", shake::animation_for(false))?;
        if let Some(generation) = want {
            // Force a reflow so re-applying the same animation restarts it.
            let _ = self.els.shake.offset_width();
            style.set_property("animation", shake::animation_for(true))?;
            self.els
                .shake
                .set_attribute("data-shake-generation", &generation.to_string())?;
        }
        self.rendered_shake = want;
        Ok(())
    }

    fn render_overlay(&self) -> Result<(), PageError> {
        let display = if self.controller.is_overlay_visible() { "flex" } else { "none" };
        self.els.overlay.style().set_property("display", display)?;
        Ok(())
    }

    fn render_particles(&mut self) -> Result<(), PageError> {
        let emitter = self.controller.emitter();
        let want = (!emitter.particles().is_empty()).then(|| emitter.generation());
        if want == self.rendered_batch {
            return Ok(());
        }
        self.els.particles.set_inner_html("");
        if want.is_some() {
            let doc = window()
                .and_then(|w| w.document())
                .ok_or(PageError::NoDocument)?;
            for particle in emitter.particles() {
                let el = doc.create_element("div")?;
                el.set_class_name("cs-particle");
                el.set_attribute("style", &particle.style_css())?;
                if let Some(glyph) = particle.text() {
                    el.set_text_content(Some(glyph));
                }
                self.els.particles.append_child(&el)?;
            }
        }
        self.rendered_batch = want;
        Ok(())
    }
}
